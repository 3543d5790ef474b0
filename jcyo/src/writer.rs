//! Renders a token stream back to source text
//!
//! Representable tokens are written verbatim. Synthetic disabled regions are
//! expanded into comment syntax:
//!
//! - A **line** region puts the line marker (`//- `) in front of the code of
//!   every line it covers. Leading whitespace that matches the indentation of
//!   the directive that opened the region is kept in front of the marker, so
//!   the commented-out code stays aligned with its directive. Block comments
//!   and text blocks that span several lines get the marker on each line.
//! - A **flex** region wraps its code in `/*- ` and ` */`. A comment or `*/`
//!   inside the region ends the wrapping comment early, so a fresh opening
//!   marker is written in front of whatever follows it. A `//` comment would
//!   swallow the closing ` */`, so the wrapper is closed in front of it and
//!   only reopened on the next line.

use crate::error::{JcyoError, JcyoResult};
use crate::options::Markers;
use crate::tokens::{CommentStyle, Token, TokenStream};
use std::fmt;

#[derive(Debug)]
enum Region {
    Line {
        indent: String,
        /// Bytes of `indent` reproduced so far on the current line
        matched: usize,
        /// The marker has been written on the current line
        marked: bool,
    },
    Flex {
        /// The wrapping comment is closed and must be reopened before more code
        pending: bool,
        /// Whitespace after the last code token, written once the next token is known
        trailing: String,
        /// A `//` comment runs to the end of the current line
        in_line_comment: bool,
    },
}

pub struct TokenWriter<W> {
    out: W,
    markers: Markers,
    region: Option<Region>,
}

impl<W: fmt::Write> TokenWriter<W> {
    pub fn new(out: W, markers: Markers) -> Self {
        Self {
            out,
            markers,
            region: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write every token up to end of input
    pub fn write_stream<S: TokenStream>(&mut self, mut stream: S) -> JcyoResult<()> {
        loop {
            let token = stream.next_token()?;
            if token.is_eof() {
                return match self.region {
                    Some(_) => Err(JcyoError::output("Input ended inside a disabled region")),
                    None => Ok(()),
                };
            }
            self.write_token(&token)?;
        }
    }

    pub fn write_token(&mut self, token: &Token) -> JcyoResult<()> {
        match self.region.take() {
            None => self.write_plain(token),
            Some(Region::Line {
                indent,
                matched,
                marked,
            }) => self.write_line_region(token, indent, matched, marked),
            Some(Region::Flex {
                pending,
                trailing,
                in_line_comment,
            }) => self.write_flex_region(token, pending, trailing, in_line_comment),
        }
    }

    fn write_plain(&mut self, token: &Token) -> JcyoResult<()> {
        match token {
            Token::DisabledRegionStart {
                style: CommentStyle::Line,
                indent,
            } => {
                self.region = Some(Region::Line {
                    indent: indent.clone(),
                    matched: 0,
                    marked: false,
                });
            }
            Token::DisabledRegionStart {
                style: CommentStyle::Flex,
                ..
            } => {
                self.region = Some(Region::Flex {
                    pending: true,
                    trailing: String::new(),
                    in_line_comment: false,
                });
            }
            Token::DisabledRegionEnd => {
                return Err(JcyoError::output("Disabled region end without a start"));
            }
            other => self.out.write_str(&other.raw())?,
        }
        Ok(())
    }

    fn write_line_region(
        &mut self,
        token: &Token,
        indent: String,
        mut matched: usize,
        mut marked: bool,
    ) -> JcyoResult<()> {
        match token {
            Token::DisabledRegionEnd => return Ok(()),
            Token::DisabledRegionStart { .. } => {
                return Err(JcyoError::output("Disabled regions cannot nest"));
            }
            Token::LineBreak(raw) => {
                self.out.write_str(raw)?;
                matched = 0;
                marked = false;
            }
            Token::Whitespace(text) if !marked => {
                let rest = match_indent(text, &indent, &mut matched);
                if !rest.is_empty() {
                    self.out.write_str(&text[..text.len() - rest.len()])?;
                    self.out.write_str(self.markers.disabled_for_line())?;
                    self.out.write_str(rest)?;
                    marked = true;
                } else {
                    self.out.write_str(text)?;
                }
            }
            Token::Comment {
                raw,
                style: CommentStyle::Flex,
                ..
            }
            | Token::StringLiteral(raw) => {
                if !marked {
                    self.out.write_str(self.markers.disabled_for_line())?;
                }
                self.write_marked_lines(raw, &indent)?;
                marked = true;
            }
            other => {
                if !marked {
                    self.out.write_str(self.markers.disabled_for_line())?;
                    marked = true;
                }
                self.out.write_str(&other.raw())?;
            }
        }
        self.region = Some(Region::Line {
            indent,
            matched,
            marked,
        });
        Ok(())
    }

    /// Every line of a multi-line token after the first gets its own marker
    fn write_marked_lines(&mut self, raw: &str, indent: &str) -> JcyoResult<()> {
        let mut lines = raw.split_inclusive('\n');
        if let Some(first) = lines.next() {
            self.out.write_str(first)?;
        }
        for line in lines {
            let (body, line_break) = match line.strip_suffix('\n') {
                Some(body) => match body.strip_suffix('\r') {
                    Some(body) => (body, "\r\n"),
                    None => (body, "\n"),
                },
                None => (line, ""),
            };
            let mut matched = 0;
            let rest = match_indent(body, indent, &mut matched);
            self.out.write_str(&body[..body.len() - rest.len()])?;
            if rest.is_empty() {
                self.out
                    .write_str(self.markers.disabled_for_line_no_whitespace())?;
            } else {
                self.out.write_str(self.markers.disabled_for_line())?;
                self.out.write_str(rest)?;
            }
            self.out.write_str(line_break)?;
        }
        Ok(())
    }

    fn write_flex_region(
        &mut self,
        token: &Token,
        mut pending: bool,
        mut trailing: String,
        mut in_line_comment: bool,
    ) -> JcyoResult<()> {
        match token {
            Token::DisabledRegionEnd => {
                self.out.write_str(&trailing)?;
                if !pending {
                    self.out.write_str(self.markers.disabled_for_flex_end())?;
                }
                return Ok(());
            }
            Token::DisabledRegionStart { .. } => {
                return Err(JcyoError::output("Disabled regions cannot nest"));
            }
            Token::Whitespace(text) if !pending => trailing.push_str(text),
            Token::Comment {
                raw,
                style: CommentStyle::Line,
                ..
            } => {
                if !pending {
                    self.out.write_str(self.markers.disabled_for_flex_end())?;
                }
                self.out.write_str(&trailing)?;
                trailing.clear();
                self.out.write_str(raw)?;
                pending = true;
                in_line_comment = true;
            }
            Token::LineBreak(raw) if in_line_comment => {
                self.out.write_str(raw)?;
                in_line_comment = false;
            }
            Token::End(raw)
            | Token::Comment {
                raw,
                style: CommentStyle::Flex,
                ..
            } => {
                self.out.write_str(&trailing)?;
                trailing.clear();
                self.out.write_str(raw)?;
                pending = true;
            }
            other => {
                self.out.write_str(&trailing)?;
                trailing.clear();
                if pending {
                    let marker = if other.is_line_break() {
                        self.markers.disabled_for_flex_start_no_whitespace()
                    } else {
                        self.markers.disabled_for_flex_start()
                    };
                    self.out.write_str(marker)?;
                    pending = false;
                }
                self.out.write_str(&other.raw())?;
            }
        }
        self.region = Some(Region::Flex {
            pending,
            trailing,
            in_line_comment,
        });
        Ok(())
    }
}

/// Advance `matched` over the prefix of `text` that continues `indent`; returns the unmatched rest
fn match_indent<'t>(text: &'t str, indent: &str, matched: &mut usize) -> &'t str {
    let mut expected = indent.get(*matched..).unwrap_or_default().chars();
    for (index, c) in text.char_indices() {
        if !c.is_whitespace() || expected.next() != Some(c) {
            return &text[index..];
        }
        *matched += c.len_utf8();
    }
    ""
}

/// Render a token stream to a string
pub fn render<S: TokenStream>(stream: S, markers: Markers) -> JcyoResult<String> {
    let mut writer = TokenWriter::new(String::new(), markers);
    writer.write_stream(stream)?;
    Ok(writer.into_inner())
}
