//! Restores the logical source before directives are applied again
//!
//! Removes `generated` blocks entirely and strips the disabled markers a
//! previous run left behind, so that re-processing a file starts from the code
//! as if every region were enabled.

use super::unpadder::Unpadder;
use crate::directive::{Directive, DirectiveParser};
use crate::error::{JcyoError, JcyoResult};
use crate::options::Markers;
use crate::tokens::{
    CommentStyle, Peekable, PeekableTokenStream, Token, TokenBuffer, TokenStream,
};

pub struct GeneratedCodeRemover<S: TokenStream> {
    input: Peekable<Unpadder<S>>,
    buffer: TokenBuffer,
    line_marker: String,
    in_disabled_flex: bool,
    /// A line marker was seen on the current line
    in_disabled_line: bool,
    at_line_start: bool,
}

impl<S: TokenStream> GeneratedCodeRemover<S> {
    pub fn new(input: S, markers: &Markers) -> Self {
        Self {
            input: Peekable::new(Unpadder::new(input)),
            buffer: TokenBuffer::new(),
            line_marker: markers.disabled_for_line_no_whitespace().to_string(),
            in_disabled_flex: false,
            in_disabled_line: false,
            at_line_start: true,
        }
    }

    /// Parse the directive ahead into the buffer; a generated block is dropped whole
    fn check_directive(&mut self) -> JcyoResult<()> {
        let (directive, style) =
            DirectiveParser::new(&mut self.buffer.copying(&mut self.input)).parse()?;
        if directive != Directive::Generated {
            return Ok(());
        }
        self.buffer.clear();
        self.skip_generated(style)
    }

    fn skip_generated(&mut self, style: CommentStyle) -> JcyoResult<()> {
        loop {
            match self.input.peek_token()? {
                Token::Eof => {
                    return Err(JcyoError::parse("Unclosed block directive generated"));
                }
                Token::DirectiveStart { .. } => {
                    let (closing, closing_style) = DirectiveParser::new(&mut self.input).parse()?;
                    if closing.is_block_begin() {
                        return Err(JcyoError::parse(
                            "Nesting directives is not allowed inside generated code",
                        ));
                    }
                    if !closing.ends(&Directive::Generated) {
                        return Err(JcyoError::parse(format!(
                            "Incorrect end directive for generated: {}",
                            closing
                        )));
                    }
                    if closing_style != style {
                        return Err(JcyoError::parse(
                            "You must not mix comment styles for start and end of block directives",
                        ));
                    }
                    self.at_line_start = closing_style == CommentStyle::Line;
                    return Ok(());
                }
                _ => {
                    self.input.next_token()?;
                }
            }
        }
    }

    /// Remove the line marker the writer puts in front of every continuation line
    fn strip_line_markers(&self, raw: &str) -> String {
        let mut text = String::with_capacity(raw.len());
        for (index, line) in raw.split_inclusive('\n').enumerate() {
            let body = line.trim_start_matches([' ', '\t']);
            let indent = &line[..line.len() - body.len()];
            match body.strip_prefix(self.line_marker.as_str()) {
                Some(rest) if index > 0 => {
                    text.push_str(indent);
                    text.push_str(rest.strip_prefix(' ').unwrap_or(rest));
                }
                _ => text.push_str(line),
            }
        }
        text
    }
}

impl<S: TokenStream> TokenStream for GeneratedCodeRemover<S> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        loop {
            if !self.buffer.is_empty() {
                let token = self.buffer.next_token()?;
                self.at_line_start = token.is_line_break();
                return Ok(token);
            }

            if self.at_line_start && self.input.peek_token()?.is_whitespace() {
                // Indentation in front of a generated block goes with it
                let whitespace = self.input.next_token()?;
                if matches!(self.input.peek_token()?, Token::DirectiveStart { .. }) {
                    self.buffer.push_token(whitespace)?;
                    self.check_directive()?;
                    continue;
                }
                self.at_line_start = false;
                return Ok(whitespace);
            }

            if matches!(self.input.peek_token()?, Token::DirectiveStart { .. }) {
                self.check_directive()?;
                continue;
            }

            let token = self.input.next_token()?;
            self.at_line_start = token.is_line_break();
            if token.is_line_break() {
                self.in_disabled_line = false;
            }
            match token {
                Token::DisabledStart { style, .. } => match style {
                    CommentStyle::Flex => self.in_disabled_flex = true,
                    CommentStyle::Line => self.in_disabled_line = true,
                },
                Token::End(ref raw) if self.in_disabled_flex || raw.is_empty() => {
                    self.in_disabled_flex = false;
                }
                Token::Comment {
                    raw,
                    style: CommentStyle::Flex,
                    doc,
                } => {
                    let raw = self.strip_line_markers(&raw);
                    return Ok(Token::comment(raw, CommentStyle::Flex, doc));
                }
                Token::StringLiteral(raw) if self.in_disabled_line => {
                    return Ok(Token::StringLiteral(self.strip_line_markers(&raw)));
                }
                other => return Ok(other),
            }
        }
    }
}
