//! Lossless Java lexer with jcyo comment recognition
//!
//! The lexer is a pull stream over a borrowed `&str`: each call to
//! [`TokenStream::next_token`] consumes exactly the characters of one token. Two
//! kinds of token are synthesized rather than read: the implicit end that
//! follows a comment closing a disabled flex comment, and the operators a
//! nested `/*-` degrades to. Both are queued in `pending` and handed out before
//! any more input is read.

use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::error::{JcyoError, JcyoResult};
use crate::logging::codes;
use crate::options::JcyoOptions;
use crate::tokens::{CommentStyle, JavaKeyword, Token, TokenStream};
use crate::log_warning;
use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    command_prefix: char,
    disabled_prefix: char,
    pending: VecDeque<Token>,
    in_disabled_flex: bool,
    token_count: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, options: &JcyoOptions) -> Self {
        Self {
            chars: source.chars().peekable(),
            command_prefix: options.command_prefix,
            disabled_prefix: options.disabled_prefix,
            pending: VecDeque::new(),
            in_disabled_flex: false,
            token_count: 0,
        }
    }

    /// Number of tokens handed out so far, excluding EOF
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    fn lex(&mut self) -> Token {
        let Some(c) = self.chars.next() else {
            return Token::Eof;
        };

        match c {
            '/' => self.lex_slash(),
            '*' => {
                if self.chars.next_if_eq(&'/').is_some() {
                    self.leave_disabled_flex();
                    Token::end("*/")
                } else {
                    Token::Operator('*')
                }
            }
            '\'' => self.lex_char_literal(),
            '"' => self.lex_string_literal(),
            '\n' | '\r' => {
                let partner = if c == '\n' { '\r' } else { '\n' };
                let mut raw = String::from(c);
                if let Some(p) = self.chars.next_if_eq(&partner) {
                    raw.push(p);
                }
                Token::LineBreak(raw)
            }
            '.' => {
                if self.chars.peek().is_some_and(|p| p.is_ascii_digit()) {
                    self.lex_number('.')
                } else {
                    Token::Operator('.')
                }
            }
            c if is_identifier_start(c) => {
                let mut raw = String::from(c);
                while let Some(p) = self.chars.next_if(|p| is_identifier_part(*p)) {
                    raw.push(p);
                }
                match JavaKeyword::from_str(&raw) {
                    Some(keyword) => Token::Keyword(keyword),
                    None => Token::Identifier(raw),
                }
            }
            c if is_inline_whitespace(c) => {
                let mut raw = String::from(c);
                while let Some(p) = self.chars.next_if(|p| is_inline_whitespace(*p)) {
                    raw.push(p);
                }
                Token::Whitespace(raw)
            }
            c if c.is_ascii_digit() => self.lex_number(c),
            c => Token::Operator(c),
        }
    }

    /// Everything starting with `/`: directive and disabled starts, comments, division
    fn lex_slash(&mut self) -> Token {
        if self.chars.next_if_eq(&'/').is_some() {
            let mut raw = String::from("//");
            match self.chars.peek().copied() {
                Some(c) if c == self.command_prefix => {
                    self.chars.next();
                    raw.push(c);
                    Token::directive_start(raw, CommentStyle::Line)
                }
                Some(c) if c == self.disabled_prefix => {
                    self.chars.next();
                    raw.push(c);
                    Token::disabled_start(raw, CommentStyle::Line)
                }
                Some('/') => {
                    self.chars.next();
                    raw.push('/');
                    self.take_to_line_end(&mut raw);
                    Token::comment(raw, CommentStyle::Line, true)
                }
                _ => {
                    self.take_to_line_end(&mut raw);
                    Token::comment(raw, CommentStyle::Line, false)
                }
            }
        } else if self.chars.next_if_eq(&'*').is_some() {
            match self.chars.peek().copied() {
                Some(c) if c == self.command_prefix => {
                    self.chars.next();
                    Token::directive_start(format!("/*{}", c), CommentStyle::Flex)
                }
                Some(c) if c == self.disabled_prefix => {
                    self.chars.next();
                    if self.in_disabled_flex {
                        log_warning!(
                            codes::lexical::NESTED_DISABLED_FLEX,
                            "Nested disabled flex comment is not supported and is kept as plain text"
                        );
                        self.pending.push_back(Token::Operator('*'));
                        self.pending.push_back(Token::Operator(c));
                        return Token::Operator('/');
                    }
                    self.in_disabled_flex = true;
                    Token::disabled_start(format!("/*{}", c), CommentStyle::Flex)
                }
                _ => self.lex_block_comment(),
            }
        } else {
            Token::Operator('/')
        }
    }

    /// Plain `/* */` comment; `/**` opens a doc comment unless it is the empty `/**/`
    fn lex_block_comment(&mut self) -> Token {
        let mut raw = String::from("/*");
        let mut doc = false;
        let mut closed = false;

        if self.chars.next_if_eq(&'*').is_some() {
            raw.push('*');
            if self.chars.next_if_eq(&'/').is_some() {
                raw.push('/');
                closed = true;
            } else {
                doc = true;
            }
        }

        let mut previous_star = false;
        while !closed {
            let Some(c) = self.chars.next() else { break };
            raw.push(c);
            closed = previous_star && c == '/';
            previous_star = c == '*';
        }

        self.leave_disabled_flex();
        Token::comment(raw, CommentStyle::Flex, doc)
    }

    /// A `*/` of any kind closes an open disabled flex comment implicitly
    fn leave_disabled_flex(&mut self) {
        if self.in_disabled_flex {
            self.in_disabled_flex = false;
            self.pending.push_back(Token::implicit_end());
        }
    }

    fn lex_char_literal(&mut self) -> Token {
        let mut raw = String::from('\'');
        while let Some(c) = self.chars.next_if(|c| !is_line_break(*c)) {
            raw.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = self.chars.next_if(|c| !is_line_break(*c)) {
                        raw.push(escaped);
                    }
                }
                '\'' => break,
                _ => {}
            }
        }
        Token::CharLiteral(raw)
    }

    fn lex_string_literal(&mut self) -> Token {
        let mut raw = String::from('"');
        if self.chars.next_if_eq(&'"').is_some() {
            raw.push('"');
            if self.chars.next_if_eq(&'"').is_none() {
                return Token::StringLiteral(raw);
            }
            raw.push('"');

            // Text block: closes on three consecutive unescaped quotes
            let mut quotes = 0;
            while let Some(c) = self.chars.next() {
                raw.push(c);
                match c {
                    '\\' => {
                        quotes = 0;
                        if let Some(escaped) = self.chars.next() {
                            raw.push(escaped);
                        }
                    }
                    '"' => {
                        quotes += 1;
                        if quotes >= 3 {
                            break;
                        }
                    }
                    _ => quotes = 0,
                }
            }
            return Token::StringLiteral(raw);
        }

        while let Some(c) = self.chars.next_if(|c| !is_line_break(*c)) {
            raw.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = self.chars.next_if(|c| !is_line_break(*c)) {
                        raw.push(escaped);
                    }
                }
                '"' => break,
                _ => {}
            }
        }
        Token::StringLiteral(raw)
    }

    fn lex_number(&mut self, first: char) -> Token {
        let mut raw = String::from(first);
        while let Some(c) = self
            .chars
            .next_if(|c| c.is_ascii_digit() || *c == '.' || c.is_alphabetic())
        {
            raw.push(c);
        }
        Token::Number(raw)
    }

    fn take_to_line_end(&mut self, raw: &mut String) {
        while let Some(c) = self.chars.next_if(|c| !is_line_break(*c)) {
            raw.push(c);
        }
    }
}

impl TokenStream for Lexer<'_> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        let token = match self.pending.pop_front() {
            Some(token) => token,
            None => self.lex(),
        };

        if !token.is_eof() {
            self.token_count += 1;
            if self.token_count > MAX_TOKEN_COUNT {
                return Err(JcyoError::read(format!(
                    "Source produces more than {} tokens",
                    MAX_TOKEN_COUNT
                )));
            }
        }
        Ok(token)
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && !is_line_break(c)
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{collect_tokens, concat_raw};

    fn lex(source: &str) -> Vec<Token> {
        collect_tokens(Lexer::new(source, &JcyoOptions::default())).unwrap()
    }

    fn roundtrip(source: &str) -> String {
        concat_raw(Lexer::new(source, &JcyoOptions::default())).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let mut lexer = Lexer::new("", &JcyoOptions::default());
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_directive_and_disabled_starts() {
        assert_eq!(
            lex("//# if A\n"),
            vec![
                Token::directive_start("//#", CommentStyle::Line),
                Token::whitespace(" "),
                Token::Keyword(JavaKeyword::If),
                Token::whitespace(" "),
                Token::identifier("A"),
                Token::line_break("\n"),
            ]
        );
        assert_eq!(
            lex("/*- x */"),
            vec![
                Token::disabled_start("/*-", CommentStyle::Flex),
                Token::whitespace(" "),
                Token::identifier("x"),
                Token::whitespace(" "),
                Token::end("*/"),
                Token::implicit_end(),
            ]
        );
    }

    #[test]
    fn test_plain_and_doc_comments() {
        assert_eq!(
            lex("// hi\n/// doc"),
            vec![
                Token::comment("// hi", CommentStyle::Line, false),
                Token::line_break("\n"),
                Token::comment("/// doc", CommentStyle::Line, true),
            ]
        );
        assert_eq!(
            lex("/** doc */ /**/"),
            vec![
                Token::comment("/** doc */", CommentStyle::Flex, true),
                Token::whitespace(" "),
                Token::comment("/**/", CommentStyle::Flex, false),
            ]
        );
        assert_eq!(
            lex("/* a **/x"),
            vec![
                Token::comment("/* a **/", CommentStyle::Flex, false),
                Token::identifier("x"),
            ]
        );
    }

    #[test]
    fn test_plain_comment_implicitly_ends_disabled_flex() {
        assert_eq!(
            lex("/*- a /* b */"),
            vec![
                Token::disabled_start("/*-", CommentStyle::Flex),
                Token::whitespace(" "),
                Token::identifier("a"),
                Token::whitespace(" "),
                Token::comment("/* b */", CommentStyle::Flex, false),
                Token::implicit_end(),
            ]
        );
    }

    #[test]
    fn test_nested_disabled_flex_is_kept_as_text() {
        let tokens = lex("/*- /*- a */");
        assert_eq!(
            &tokens[..5],
            &[
                Token::disabled_start("/*-", CommentStyle::Flex),
                Token::whitespace(" "),
                Token::Operator('/'),
                Token::Operator('*'),
                Token::Operator('-'),
            ]
        );
        assert_eq!(roundtrip("/*- /*- a */"), "/*- /*- a */");
    }

    #[test]
    fn test_line_breaks_pair_up() {
        assert_eq!(
            lex("\r\n\n\r\n"),
            vec![
                Token::line_break("\r\n"),
                Token::line_break("\n\r"),
                Token::line_break("\n"),
            ]
        );
    }

    #[test]
    fn test_numbers_are_permissive() {
        assert_eq!(
            lex("1E100 .5 0xFFL a.b"),
            vec![
                Token::number("1E100"),
                Token::whitespace(" "),
                Token::number(".5"),
                Token::whitespace(" "),
                Token::number("0xFFL"),
                Token::whitespace(" "),
                Token::identifier("a"),
                Token::Operator('.'),
                Token::identifier("b"),
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            lex(r#""a\"b" "" x"#),
            vec![
                Token::StringLiteral(r#""a\"b""#.to_string()),
                Token::whitespace(" "),
                Token::StringLiteral(r#""""#.to_string()),
                Token::whitespace(" "),
                Token::identifier("x"),
            ]
        );
        let block = "\"\"\"\n  a \\\"\"\" \"\"\n\"\"\"";
        assert_eq!(lex(block), vec![Token::StringLiteral(block.to_string())]);
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(
            lex(r"'a' '\''"),
            vec![
                Token::CharLiteral("'a'".to_string()),
                Token::whitespace(" "),
                Token::CharLiteral(r"'\''".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            lex("import $x _y Import"),
            vec![
                Token::Keyword(JavaKeyword::Import),
                Token::whitespace(" "),
                Token::identifier("$x"),
                Token::whitespace(" "),
                Token::identifier("_y"),
                Token::whitespace(" "),
                Token::identifier("Import"),
            ]
        );
    }

    #[test]
    fn test_custom_prefixes() {
        let options = JcyoOptions::new()
            .with_command_prefix('@')
            .with_disabled_prefix('~');
        let tokens = collect_tokens(Lexer::new("//@ //~ //#", &options)).unwrap();
        assert_eq!(tokens[0], Token::directive_start("//@", CommentStyle::Line));
        assert_eq!(tokens[1], Token::whitespace(" "));
        assert_eq!(tokens[2], Token::disabled_start("//~", CommentStyle::Line));
        assert_eq!(tokens[4], Token::comment("//#", CommentStyle::Line, false));
    }

    #[test]
    fn test_roundtrip_corpus() {
        let corpus = [
            "package a.b;\n\nimport java.util.*;\n",
            "class A {\n\tint x = 1 + 2 * 3 / 4;\r\n}\n",
            "//# if A && B\n  foo();\n//# else\n//- bar();\n//# end\n",
            "/*# if X */ a /*# end */",
            "/*- disabled */ /*- a /* nested */",
            "String s = \"unterminated\nchar c = '\\u0041';",
            "\"\"\"\nblock \"\" text\n\"\"\"",
            "/** doc\n * more\n */\n/**/\n/* unterminated",
            "x = .5e-3f + 0x1F; y = a.b.c;",
            "\t \u{00A0}\u{3000}ü = 'ö'; // trailing",
            "*/ * / //",
            "",
        ];
        for source in corpus {
            assert_eq!(roundtrip(source), source, "round trip failed for {:?}", source);
        }
    }
}
