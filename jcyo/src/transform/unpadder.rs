//! Removes the padding spaces the writer puts around disabled code
//!
//! Disabled code is rendered as `//- code` or `/*- code */`. The space after
//! the opening marker and the space before a closing `*/` belong to the marker,
//! not to the code, and are removed here so the code comes back unchanged.

use crate::error::JcyoResult;
use crate::tokens::{CommentStyle, Peekable, PeekableTokenStream, Token, TokenStream};

pub struct Unpadder<S: TokenStream> {
    input: Peekable<S>,
    after_start: bool,
    in_disabled_flex: bool,
}

impl<S: TokenStream> Unpadder<S> {
    pub fn new(input: S) -> Self {
        Self {
            input: Peekable::new(input),
            after_start: false,
            in_disabled_flex: false,
        }
    }

    fn before_explicit_end(&mut self) -> JcyoResult<bool> {
        Ok(matches!(self.input.peek_token()?, Token::End(raw) if !raw.is_empty()))
    }
}

impl<S: TokenStream> TokenStream for Unpadder<S> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        loop {
            let token = self.input.next_token()?;
            let after_start = std::mem::take(&mut self.after_start);
            match token {
                Token::DisabledStart { style, .. } => {
                    self.after_start = true;
                    if style == CommentStyle::Flex {
                        self.in_disabled_flex = true;
                    }
                    return Ok(token);
                }
                Token::End(_) => {
                    self.in_disabled_flex = false;
                    return Ok(token);
                }
                Token::Whitespace(mut text) => {
                    if after_start && text.starts_with(' ') {
                        text.remove(0);
                    }
                    if self.in_disabled_flex && text.ends_with(' ') && self.before_explicit_end()? {
                        text.pop();
                    }
                    if !text.is_empty() {
                        return Ok(Token::Whitespace(text));
                    }
                }
                other => return Ok(other),
            }
        }
    }
}
