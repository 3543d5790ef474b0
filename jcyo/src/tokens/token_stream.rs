//! Pull-based token streams
//!
//! Every pipeline stage is a [`TokenStream`] that pulls from the stage before
//! it. Stages needing one token of lookahead wrap their input in [`Peekable`].
//! [`TokenBuffer`] is the queue stages use to stage output or to replay tokens
//! they had to consume speculatively.

use super::token::Token;
use crate::error::{JcyoError, JcyoResult};
use std::collections::VecDeque;

static EOF: Token = Token::Eof;

/// Source of tokens. After yielding [`Token::Eof`] a stream keeps yielding it.
pub trait TokenStream {
    fn next_token(&mut self) -> JcyoResult<Token>;
}

impl<T: TokenStream + ?Sized> TokenStream for &mut T {
    fn next_token(&mut self) -> JcyoResult<Token> {
        (**self).next_token()
    }
}

impl<T: TokenStream + ?Sized> TokenStream for Box<T> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        (**self).next_token()
    }
}

/// Token stream with one token of lookahead
pub trait PeekableTokenStream: TokenStream {
    fn peek_token(&mut self) -> JcyoResult<&Token>;
}

impl<T: PeekableTokenStream + ?Sized> PeekableTokenStream for &mut T {
    fn peek_token(&mut self) -> JcyoResult<&Token> {
        (**self).peek_token()
    }
}

// ============================================================================
// Peekable adapter
// ============================================================================

/// Adds lookahead to any stream
#[derive(Debug)]
pub struct Peekable<S> {
    inner: S,
    peeked: Option<Token>,
}

impl<S: TokenStream> Peekable<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            peeked: None,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TokenStream> TokenStream for Peekable<S> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.inner.next_token(),
        }
    }
}

impl<S: TokenStream> PeekableTokenStream for Peekable<S> {
    fn peek_token(&mut self) -> JcyoResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.inner.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }
}

// ============================================================================
// Fixed token sequences
// ============================================================================

/// Yields a fixed sequence of tokens, then [`Token::Eof`] forever
#[derive(Debug, Clone, Default)]
pub struct StaticTokenStream {
    tokens: VecDeque<Token>,
}

impl StaticTokenStream {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

impl TokenStream for StaticTokenStream {
    fn next_token(&mut self) -> JcyoResult<Token> {
        Ok(self.tokens.pop_front().unwrap_or(Token::Eof))
    }
}

impl PeekableTokenStream for StaticTokenStream {
    fn peek_token(&mut self) -> JcyoResult<&Token> {
        Ok(self.tokens.front().unwrap_or(&EOF))
    }
}

// ============================================================================
// Token buffer
// ============================================================================

/// FIFO of tokens that is also a stream.
///
/// Reading from an empty buffer that has not seen [`Token::Eof`] is a stream
/// error: the owner is expected to refill it before pulling again.
#[derive(Debug, Clone, Default)]
pub struct TokenBuffer {
    tokens: VecDeque<Token>,
    eof_pushed: bool,
    eof_reached: bool,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_token(&mut self, token: Token) -> JcyoResult<()> {
        if self.eof_pushed {
            return Err(JcyoError::stream(format!(
                "Cannot push {} after end of input",
                token
            )));
        }
        if token.is_eof() {
            self.eof_pushed = true;
        }
        self.tokens.push_back(token);
        Ok(())
    }

    /// Put a token back in front of the queue. Pushing EOF discards everything queued.
    pub fn push_front(&mut self, token: Token) -> JcyoResult<()> {
        if self.eof_reached {
            return Err(JcyoError::stream(format!(
                "Cannot push {} back after end of input was read",
                token
            )));
        }
        if token.is_eof() {
            self.tokens.clear();
            self.eof_pushed = true;
        }
        self.tokens.push_front(token);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.eof_pushed = false;
    }

    pub fn has_eof(&self) -> bool {
        self.eof_pushed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Tee `inner`: every token pulled through the returned stream is also queued here
    pub fn copying<'a, S: TokenStream>(&'a mut self, inner: &'a mut S) -> Copying<'a, S> {
        Copying {
            buffer: self,
            inner,
        }
    }
}

impl TokenStream for TokenBuffer {
    fn next_token(&mut self) -> JcyoResult<Token> {
        if self.eof_reached {
            return Ok(Token::Eof);
        }
        match self.tokens.pop_front() {
            Some(Token::Eof) => {
                self.eof_reached = true;
                Ok(Token::Eof)
            }
            Some(token) => Ok(token),
            None => Err(JcyoError::stream("Read from an empty token buffer")),
        }
    }
}

impl PeekableTokenStream for TokenBuffer {
    fn peek_token(&mut self) -> JcyoResult<&Token> {
        if self.eof_reached {
            return Ok(&EOF);
        }
        self.tokens
            .front()
            .ok_or_else(|| JcyoError::stream("Peek into an empty token buffer"))
    }
}

impl FromIterator<Token> for TokenBuffer {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut buffer = TokenBuffer::new();
        for token in iter {
            if buffer.eof_pushed {
                break;
            }
            buffer.eof_pushed = token.is_eof();
            buffer.tokens.push_back(token);
        }
        buffer
    }
}

/// Stream returned by [`TokenBuffer::copying`]
pub struct Copying<'a, S> {
    buffer: &'a mut TokenBuffer,
    inner: &'a mut S,
}

impl<S: TokenStream> TokenStream for Copying<'_, S> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        let token = self.inner.next_token()?;
        if !(token.is_eof() && self.buffer.eof_pushed) {
            self.buffer.push_token(token.clone())?;
        }
        Ok(token)
    }
}

impl<S: PeekableTokenStream> PeekableTokenStream for Copying<'_, S> {
    fn peek_token(&mut self) -> JcyoResult<&Token> {
        self.inner.peek_token()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Drain a stream up to (not including) EOF
pub fn collect_tokens<S: TokenStream>(mut stream: S) -> JcyoResult<Vec<Token>> {
    let mut tokens = Vec::new();
    loop {
        match stream.next_token()? {
            Token::Eof => return Ok(tokens),
            token => tokens.push(token),
        }
    }
}

/// Concatenate the raw text of every token up to EOF
pub fn concat_raw<S: TokenStream>(mut stream: S) -> JcyoResult<String> {
    let mut text = String::new();
    loop {
        match stream.next_token()? {
            Token::Eof => return Ok(text),
            token => text.push_str(&token.raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn words(items: &[&str]) -> Vec<Token> {
        items.iter().map(|w| Token::identifier(*w)).collect()
    }

    #[test]
    fn test_static_stream_repeats_eof() {
        let mut stream = StaticTokenStream::new(words(&["a"]));
        assert_eq!(stream.next_token().unwrap(), Token::identifier("a"));
        assert_eq!(stream.next_token().unwrap(), Token::Eof);
        assert_eq!(stream.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_peekable_does_not_consume() {
        let mut stream = Peekable::new(StaticTokenStream::new(words(&["a", "b"])));
        assert_eq!(stream.peek_token().unwrap(), &Token::identifier("a"));
        assert_eq!(stream.peek_token().unwrap(), &Token::identifier("a"));
        assert_eq!(stream.next_token().unwrap(), Token::identifier("a"));
        assert_eq!(stream.next_token().unwrap(), Token::identifier("b"));
        assert!(stream.peek_token().unwrap().is_eof());
    }

    #[test]
    fn test_buffer_rejects_push_after_eof() {
        let mut buffer = TokenBuffer::new();
        buffer.push_token(Token::identifier("a")).unwrap();
        buffer.push_token(Token::Eof).unwrap();
        assert_matches!(
            buffer.push_token(Token::identifier("b")),
            Err(JcyoError::Stream { .. })
        );
        assert_eq!(buffer.next_token().unwrap(), Token::identifier("a"));
        assert_eq!(buffer.next_token().unwrap(), Token::Eof);
        assert_eq!(buffer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_buffer_empty_read_is_error() {
        let mut buffer = TokenBuffer::new();
        assert_matches!(buffer.next_token(), Err(JcyoError::Stream { .. }));
        assert_matches!(buffer.peek_token(), Err(JcyoError::Stream { .. }));
    }

    #[test]
    fn test_push_front_eof_discards_queue() {
        let mut buffer: TokenBuffer = words(&["a", "b"]).into_iter().collect();
        buffer.push_front(Token::identifier("z")).unwrap();
        assert_eq!(buffer.next_token().unwrap(), Token::identifier("z"));
        buffer.push_front(Token::Eof).unwrap();
        assert_eq!(buffer.len(), 1);
        assert!(buffer.next_token().unwrap().is_eof());
        assert_matches!(
            buffer.push_front(Token::identifier("x")),
            Err(JcyoError::Stream { .. })
        );
    }

    #[test]
    fn test_copying_tees_tokens() {
        let mut source = StaticTokenStream::new(words(&["a", "b"]));
        let mut buffer = TokenBuffer::new();
        {
            let mut tee = buffer.copying(&mut source);
            assert_eq!(tee.next_token().unwrap(), Token::identifier("a"));
            assert!(tee.peek_token().is_ok());
            assert_eq!(tee.next_token().unwrap(), Token::identifier("b"));
            assert!(tee.next_token().unwrap().is_eof());
            assert!(tee.next_token().unwrap().is_eof());
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(concat_raw(&mut buffer).unwrap(), "ab");
    }

    #[test]
    fn test_collect_tokens_stops_at_eof() {
        let tokens = collect_tokens(StaticTokenStream::new(words(&["x", "y"]))).unwrap();
        assert_eq!(tokens, words(&["x", "y"]));
    }
}
