//! Strips all jcyo syntax, leaving only the code that is compiled
//!
//! Directives, raw disabled comments and synthetic disabled regions are
//! dropped. Whitespace is held until the next token so that a line holding
//! nothing but a line directive or a line region disappears completely,
//! indentation included.

use crate::error::JcyoResult;
use crate::tokens::{CommentStyle, Token, TokenBuffer, TokenStream};

pub struct Cleaner<S> {
    input: S,
    output: TokenBuffer,
    whitespace: Vec<Token>,
    line_has_code: bool,
}

impl<S: TokenStream> Cleaner<S> {
    pub fn new(input: S) -> Self {
        Self {
            input,
            output: TokenBuffer::new(),
            whitespace: Vec::new(),
            line_has_code: false,
        }
    }

    fn step(&mut self) -> JcyoResult<()> {
        let token = self.input.next_token()?;
        match token {
            Token::Whitespace(_) => self.whitespace.push(token),
            Token::DirectiveStart {
                style: CommentStyle::Line,
                ..
            }
            | Token::DisabledStart {
                style: CommentStyle::Line,
                ..
            } => {
                self.whitespace.clear();
                self.skip_line()?;
            }
            Token::DirectiveStart {
                style: CommentStyle::Flex,
                ..
            }
            | Token::DisabledStart {
                style: CommentStyle::Flex,
                ..
            } => self.skip_until(|token| matches!(token, Token::End(_)))?,
            Token::DisabledRegionStart { style, .. } => {
                if style == CommentStyle::Line {
                    self.whitespace.clear();
                }
                self.skip_until(|token| matches!(token, Token::DisabledRegionEnd))?;
            }
            Token::DisabledRegionEnd | Token::End(_) => {}
            Token::LineBreak(_) => {
                self.flush_whitespace()?;
                self.line_has_code = false;
                self.output.push_token(token)?;
            }
            Token::Eof => {
                self.flush_whitespace()?;
                self.output.push_token(token)?;
            }
            other => {
                self.flush_whitespace()?;
                self.line_has_code = true;
                self.output.push_token(other)?;
            }
        }
        Ok(())
    }

    /// Drop the rest of a line directive; its line break stays only if code precedes it
    fn skip_line(&mut self) -> JcyoResult<()> {
        loop {
            match self.input.next_token()? {
                Token::LineBreak(raw) => {
                    if self.line_has_code {
                        self.line_has_code = false;
                        self.output.push_token(Token::LineBreak(raw))?;
                    }
                    return Ok(());
                }
                Token::Eof => return self.output.push_token(Token::Eof),
                _ => {}
            }
        }
    }

    fn skip_until(&mut self, is_end: impl Fn(&Token) -> bool) -> JcyoResult<()> {
        loop {
            let token = self.input.next_token()?;
            if token.is_eof() {
                return self.output.push_token(token);
            }
            if is_end(&token) {
                return Ok(());
            }
        }
    }

    fn flush_whitespace(&mut self) -> JcyoResult<()> {
        for token in self.whitespace.drain(..) {
            self.output.push_token(token)?;
        }
        Ok(())
    }
}

impl<S: TokenStream> TokenStream for Cleaner<S> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        while self.output.is_empty() && !self.output.has_eof() {
            self.step()?;
        }
        self.output.next_token()
    }
}
