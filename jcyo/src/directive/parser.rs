//! Directive parser
//!
//! Reads one complete directive, from its start token through its terminator:
//! the line break of a `//#` directive (end of input also counts) or the `*/`
//! of a `/*#` directive. The terminator is consumed with the directive.

use super::Directive;
use crate::error::{JcyoError, JcyoResult};
use crate::expression::{Expression, ExpressionParser};
use crate::tokens::{CommentStyle, PeekableTokenStream, Token};

pub struct DirectiveParser<'s, S> {
    stream: &'s mut S,
}

impl<'s, S: PeekableTokenStream> DirectiveParser<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        Self { stream }
    }

    /// Parse the directive whose start token is next in the stream
    pub fn parse(&mut self) -> JcyoResult<(Directive, CommentStyle)> {
        let style = match self.stream.next_token()? {
            Token::DirectiveStart { style, .. } => style,
            other => {
                return Err(JcyoError::parse(format!(
                    "Expected a directive start but got {}",
                    other
                )))
            }
        };

        self.skip_whitespace(style)?;
        let token = self.stream.next_token()?;
        let Some(name) = token.word() else {
            return Err(JcyoError::parse(format!(
                "Expected a directive identifier token but got {}",
                token
            )));
        };

        let directive = match name {
            "if" => Directive::If(self.parse_condition()?),
            "elif" => Directive::Elif(self.parse_condition()?),
            "else" => Directive::Else,
            "end" => Directive::End(self.parse_end_target(style)?),
            "generated" => Directive::Generated,
            other => return Err(JcyoError::parse(format!("Unknown directive {}", other))),
        };

        self.finish(style)?;
        Ok((directive, style))
    }

    fn parse_condition(&mut self) -> JcyoResult<Expression> {
        ExpressionParser::new(&mut *self.stream).parse()
    }

    fn parse_end_target(&mut self, style: CommentStyle) -> JcyoResult<Option<String>> {
        self.skip_whitespace(style)?;
        if !self.stream.peek_token()?.is_operator(':') {
            return Ok(None);
        }
        self.stream.next_token()?;
        self.skip_whitespace(style)?;

        let token = self.stream.next_token()?;
        match token.word() {
            Some(target) => Ok(Some(target.to_string())),
            None => Err(JcyoError::parse(format!(
                "Expected a directive identifier as end directive target but got {}",
                token
            ))),
        }
    }

    fn finish(&mut self, style: CommentStyle) -> JcyoResult<()> {
        self.skip_whitespace(style)?;
        match style {
            CommentStyle::Line => match self.stream.peek_token()? {
                Token::Eof => Ok(()),
                Token::LineBreak(_) => self.stream.next_token().map(|_| ()),
                other => Err(JcyoError::parse(format!(
                    "Expected a line break after full line directive but got {}",
                    other
                ))),
            },
            CommentStyle::Flex => match self.stream.next_token()? {
                Token::End(_) => Ok(()),
                other => Err(JcyoError::parse(format!(
                    "Expected end of directive but got {}",
                    other
                ))),
            },
        }
    }

    /// Whitespace, and line breaks as well inside a flex directive
    fn skip_whitespace(&mut self, style: CommentStyle) -> JcyoResult<()> {
        loop {
            let skip = match self.stream.peek_token()? {
                Token::Whitespace(_) => true,
                Token::LineBreak(_) => style == CommentStyle::Flex,
                _ => false,
            };
            if !skip {
                return Ok(());
            }
            self.stream.next_token()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Lexer;
    use crate::options::JcyoOptions;
    use crate::tokens::{Peekable, TokenStream};
    use assert_matches::assert_matches;

    fn parse_with_rest(source: &str) -> (JcyoResult<(Directive, CommentStyle)>, Token) {
        let mut stream = Peekable::new(Lexer::new(source, &JcyoOptions::default()));
        let result = DirectiveParser::new(&mut stream).parse();
        let rest = stream.next_token().unwrap_or(Token::Eof);
        (result, rest)
    }

    fn parse(source: &str) -> JcyoResult<(Directive, CommentStyle)> {
        parse_with_rest(source).0
    }

    #[test]
    fn test_line_directives() {
        let (directive, style) = parse("//# if A && B\n").unwrap();
        assert_eq!(style, CommentStyle::Line);
        assert_eq!(directive.to_string(), "if (A && B)");

        assert_eq!(parse("//#else\n").unwrap().0, Directive::Else);
        assert_eq!(parse("//# end").unwrap().0, Directive::End(None));
        assert_eq!(parse("//# generated  \n").unwrap().0, Directive::Generated);
    }

    #[test]
    fn test_end_targets() {
        assert_eq!(
            parse("//# end:if\n").unwrap().0,
            Directive::End(Some("if".into()))
        );
        assert_eq!(
            parse("/*# end : generated */").unwrap().0,
            Directive::End(Some("generated".into()))
        );
        assert_matches!(parse("//# end: 3\n"), Err(JcyoError::Parse { .. }));
    }

    #[test]
    fn test_line_break_is_consumed() {
        let (result, rest) = parse_with_rest("//# else\nx");
        assert!(result.is_ok());
        assert_eq!(rest, Token::identifier("x"));
    }

    #[test]
    fn test_flex_directive_may_span_lines() {
        let (result, rest) = parse_with_rest("/*#\n  elif VERSION >= 17\n*/x");
        let (directive, style) = result.unwrap();
        assert_eq!(style, CommentStyle::Flex);
        assert_eq!(directive.to_string(), "elif (VERSION >= 17)");
        assert_eq!(rest, Token::identifier("x"));
    }

    #[test]
    fn test_trailing_content_is_rejected() {
        assert_matches!(parse("//# else x\n"), Err(JcyoError::Parse { .. }));
        assert_matches!(parse("/*# else x */"), Err(JcyoError::Parse { .. }));
        assert_matches!(parse("/*# else\n"), Err(JcyoError::Parse { .. }));
    }

    #[test]
    fn test_unknown_and_missing_names() {
        let error = parse("//# ifdef A\n").unwrap_err();
        assert_eq!(error, JcyoError::parse("Unknown directive ifdef"));
        assert_matches!(parse("//# \"if\"\n"), Err(JcyoError::Parse { .. }));
        assert_matches!(parse("x"), Err(JcyoError::Parse { .. }));
    }
}
