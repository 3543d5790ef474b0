//! Processing options and the marker text derived from them

use crate::tokens::CommentStyle;
use serde::{Deserialize, Serialize};

/// Default character that turns a comment into a directive (`//#`, `/*#`)
pub const DEFAULT_COMMAND_PREFIX: char = '#';
/// Default character that marks a comment as disabled code (`//-`, `/*-`)
pub const DEFAULT_DISABLED_PREFIX: char = '-';

/// Options shared by the lexer, the directive applier and the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JcyoOptions {
    pub command_prefix: char,
    pub disabled_prefix: char,
    /// Write the editable form back over the input file
    pub update_input: bool,
}

impl Default for JcyoOptions {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX,
            disabled_prefix: DEFAULT_DISABLED_PREFIX,
            update_input: false,
        }
    }
}

impl JcyoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command_prefix(mut self, prefix: char) -> Self {
        self.command_prefix = prefix;
        self
    }

    pub fn with_disabled_prefix(mut self, prefix: char) -> Self {
        self.disabled_prefix = prefix;
        self
    }

    pub fn with_update_input(mut self, update: bool) -> Self {
        self.update_input = update;
        self
    }

    /// Command and disabled prefixes must differ and must not collide with comment syntax
    pub fn validate(&self) -> Result<(), String> {
        if self.command_prefix == self.disabled_prefix {
            return Err(format!(
                "Command prefix and disabled prefix must differ (both are '{}')",
                self.command_prefix
            ));
        }
        for prefix in [self.command_prefix, self.disabled_prefix] {
            if prefix == '/' || prefix == '*' || prefix.is_whitespace() {
                return Err(format!("'{}' cannot be used as a prefix", prefix.escape_debug()));
            }
        }
        Ok(())
    }

    pub fn markers(&self) -> Markers {
        Markers::new(self)
    }
}

/// Literal comment text used to render disabled regions.
///
/// Computed once per pipeline from [`JcyoOptions`] and handed to every stage that
/// needs it. Every opening marker carries exactly one padding space; the
/// unpadder removes exactly that space again when a file is re-processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    line: String,
    line_bare: String,
    flex_start: String,
    flex_start_bare: String,
}

impl Markers {
    const FLEX_END: &'static str = " */";
    const FLEX_END_BARE: &'static str = "*/";

    pub fn new(options: &JcyoOptions) -> Self {
        let line_bare = format!("//{}", options.disabled_prefix);
        let flex_start_bare = format!("/*{}", options.disabled_prefix);
        Self {
            line: format!("{} ", line_bare),
            line_bare,
            flex_start: format!("{} ", flex_start_bare),
            flex_start_bare,
        }
    }

    /// `//- `
    pub fn disabled_for_line(&self) -> &str {
        &self.line
    }

    /// `//-`
    pub fn disabled_for_line_no_whitespace(&self) -> &str {
        &self.line_bare
    }

    /// `/*- `
    pub fn disabled_for_flex_start(&self) -> &str {
        &self.flex_start
    }

    /// `/*-`
    pub fn disabled_for_flex_start_no_whitespace(&self) -> &str {
        &self.flex_start_bare
    }

    /// ` */`
    pub fn disabled_for_flex_end(&self) -> &str {
        Self::FLEX_END
    }

    /// `*/`
    pub fn disabled_for_flex_end_no_whitespace(&self) -> &str {
        Self::FLEX_END_BARE
    }

    pub fn disabled_start(&self, style: CommentStyle) -> &str {
        match style {
            CommentStyle::Line => self.disabled_for_line(),
            CommentStyle::Flex => self.disabled_for_flex_start(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(&JcyoOptions::default())
    }
}
