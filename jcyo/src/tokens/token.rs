//! Token model shared by every pipeline stage
//!
//! Every token except [`Token::Eof`] and the two synthetic disabled-region markers
//! is *representable*: it carries the exact source text it was lexed from, so
//! concatenating [`Token::raw`] over a lexed stream reproduces the input.

use super::keywords::JavaKeyword;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Comment form used by a directive or disabled marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentStyle {
    /// `//` comment running to the end of the physical line
    Line,
    /// `/* */` comment with an explicit end
    Flex,
}

impl CommentStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStyle::Line => "line",
            CommentStyle::Flex => "flex",
        }
    }
}

impl fmt::Display for CommentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// End of input. Streams return it forever once reached.
    Eof,
    Identifier(String),
    Keyword(JavaKeyword),
    /// Any single code point that starts no other token
    Operator(char),
    /// Maximal run of non-line-break whitespace
    Whitespace(String),
    /// One logical line break (`\n`, `\r`, `\r\n` or `\n\r`)
    LineBreak(String),
    /// Permissively lexed numeric literal (`1`, `.5`, `1E100`, `0xFFL`)
    Number(String),
    CharLiteral(String),
    /// Normal or triple-quoted string literal, quotes included
    StringLiteral(String),
    /// Comment that carries no jcyo meaning
    Comment {
        raw: String,
        style: CommentStyle,
        doc: bool,
    },
    /// `//#` or `/*#`
    DirectiveStart { raw: String, style: CommentStyle },
    /// `//-` or `/*-`
    DisabledStart { raw: String, style: CommentStyle },
    /// `*/` closing a directive or disabled comment; empty when implicit
    End(String),
    /// Synthetic: following tokens must be rendered commented out
    DisabledRegionStart { style: CommentStyle, indent: String },
    /// Synthetic: closes the current disabled region
    DisabledRegionEnd,
}

impl Token {
    pub fn identifier(text: impl Into<String>) -> Self {
        Token::Identifier(text.into())
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Token::Whitespace(text.into())
    }

    pub fn line_break(text: impl Into<String>) -> Self {
        Token::LineBreak(text.into())
    }

    pub fn number(text: impl Into<String>) -> Self {
        Token::Number(text.into())
    }

    pub fn end(text: impl Into<String>) -> Self {
        Token::End(text.into())
    }

    /// End token synthesized by the lexer when a disabled flex comment closes implicitly
    pub fn implicit_end() -> Self {
        Token::End(String::new())
    }

    pub fn comment(raw: impl Into<String>, style: CommentStyle, doc: bool) -> Self {
        Token::Comment {
            raw: raw.into(),
            style,
            doc,
        }
    }

    pub fn directive_start(raw: impl Into<String>, style: CommentStyle) -> Self {
        Token::DirectiveStart {
            raw: raw.into(),
            style,
        }
    }

    pub fn disabled_start(raw: impl Into<String>, style: CommentStyle) -> Self {
        Token::DisabledStart {
            raw: raw.into(),
            style,
        }
    }

    pub fn region_start(style: CommentStyle, indent: impl Into<String>) -> Self {
        Token::DisabledRegionStart {
            style,
            indent: indent.into(),
        }
    }

    /// Source text of this token; empty for end-of-input and synthetic markers
    pub fn raw(&self) -> Cow<'_, str> {
        match self {
            Token::Eof | Token::DisabledRegionStart { .. } | Token::DisabledRegionEnd => {
                Cow::Borrowed("")
            }
            Token::Keyword(keyword) => Cow::Borrowed(keyword.as_str()),
            Token::Operator(c) => Cow::Owned(c.to_string()),
            Token::Identifier(text)
            | Token::Whitespace(text)
            | Token::LineBreak(text)
            | Token::Number(text)
            | Token::CharLiteral(text)
            | Token::StringLiteral(text)
            | Token::End(text) => Cow::Borrowed(text),
            Token::Comment { raw, .. }
            | Token::DirectiveStart { raw, .. }
            | Token::DisabledStart { raw, .. } => Cow::Borrowed(raw),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    pub fn is_representable(&self) -> bool {
        !matches!(
            self,
            Token::Eof | Token::DisabledRegionStart { .. } | Token::DisabledRegionEnd
        )
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, Token::LineBreak(_))
    }

    pub fn is_operator(&self, c: char) -> bool {
        matches!(self, Token::Operator(op) if *op == c)
    }

    pub fn is_keyword(&self, keyword: JavaKeyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }

    pub fn is_implicit_end(&self) -> bool {
        matches!(self, Token::End(raw) if raw.is_empty())
    }

    /// Identifiers and keywords, the tokens that can name a directive or variable
    pub fn word(&self) -> Option<&str> {
        match self {
            Token::Identifier(text) => Some(text),
            Token::Keyword(keyword) => Some(keyword.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => f.write_str("end of input"),
            Token::DisabledRegionStart { style, .. } => {
                write!(f, "disabled region start ({})", style)
            }
            Token::DisabledRegionEnd => f.write_str("disabled region end"),
            Token::LineBreak(_) => f.write_str("line break"),
            Token::End(raw) if raw.is_empty() => f.write_str("implicit end"),
            other => write!(f, "'{}'", other.raw().escape_debug()),
        }
    }
}
