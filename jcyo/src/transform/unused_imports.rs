//! Disables imports whose name is never used
//!
//! Usages are collected from the cleaned code, so code in disabled branches
//! does not keep an import alive. An unused import that ends its line becomes
//! a line region covering the statement and its line break; any other unused
//! import becomes a flex region around the statement alone.

use super::cleaner::Cleaner;
use crate::error::JcyoResult;
use crate::log_debug;
use crate::tokens::{
    CommentStyle, JavaKeyword, PeekableTokenStream, Token, TokenBuffer, TokenStream,
};
use std::collections::HashSet;

pub struct UnusedImportDisabler<S> {
    input: S,
    source: TokenBuffer,
    prepared: bool,
    used: HashSet<String>,
    output: TokenBuffer,
    in_region: bool,
    line_text: String,
}

impl<S: TokenStream> UnusedImportDisabler<S> {
    pub fn new(input: S) -> Self {
        Self {
            input,
            source: TokenBuffer::new(),
            prepared: false,
            used: HashSet::new(),
            output: TokenBuffer::new(),
            in_region: false,
            line_text: String::new(),
        }
    }

    /// Read the whole input, recording usages from a cleaned copy
    fn prepare(&mut self) -> JcyoResult<()> {
        self.used = collect_usages(Cleaner::new(self.source.copying(&mut self.input)))?;
        self.prepared = true;
        Ok(())
    }

    fn step(&mut self) -> JcyoResult<()> {
        let token = self.source.next_token()?;
        match &token {
            Token::DisabledRegionStart { .. } => self.in_region = true,
            Token::DisabledRegionEnd => self.in_region = false,
            Token::Keyword(JavaKeyword::Import) if !self.in_region => {
                return self.check_import(token);
            }
            _ => {}
        }
        self.emit(token)
    }

    fn check_import(&mut self, import: Token) -> JcyoResult<()> {
        let mut statement = vec![import];
        loop {
            let token = self.source.peek_token()?;
            if !token.is_representable() {
                break;
            }
            let ends_path = matches!(token, Token::Operator(c) if *c != '.' && *c != '*');
            statement.push(self.source.next_token()?);
            if ends_path {
                break;
            }
        }

        let name = statement
            .iter()
            .rev()
            .find_map(|token| match token {
                Token::Operator('*') => Some("*"),
                other => other.word(),
            })
            .unwrap_or_default()
            .to_string();

        let used = name == "*" || self.used.contains(&name);
        log_debug!("Checked import", "name" => name, "used" => used);
        if used {
            return statement.into_iter().try_for_each(|token| self.emit(token));
        }

        let mut trailing = Vec::new();
        while self.source.peek_token()?.is_whitespace() {
            trailing.push(self.source.next_token()?);
        }

        if self.source.peek_token()?.is_line_break() {
            let line_break = self.source.next_token()?;
            let indent = self.line_text.clone();
            self.output
                .push_token(Token::region_start(CommentStyle::Line, indent))?;
            for token in statement.into_iter().chain(trailing) {
                self.output.push_token(token)?;
            }
            self.emit(line_break)?;
            self.output.push_token(Token::DisabledRegionEnd)
        } else {
            self.output
                .push_token(Token::region_start(CommentStyle::Flex, ""))?;
            for token in statement {
                self.emit(token)?;
            }
            self.output.push_token(Token::DisabledRegionEnd)?;
            trailing.into_iter().try_for_each(|token| self.emit(token))
        }
    }

    fn emit(&mut self, token: Token) -> JcyoResult<()> {
        if token.is_line_break() {
            self.line_text.clear();
        } else {
            self.line_text.push_str(&token.raw());
        }
        self.output.push_token(token)
    }
}

impl<S: TokenStream> TokenStream for UnusedImportDisabler<S> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        if !self.prepared {
            self.prepare()?;
        }
        while self.output.is_empty() && !self.output.has_eof() {
            self.step()?;
        }
        self.output.next_token()
    }
}

/// Identifiers referenced by code, outside `package` and `import` statements
/// and not as the member part of a qualified name
fn collect_usages<S: TokenStream>(mut stream: S) -> JcyoResult<HashSet<String>> {
    let mut used = HashSet::new();
    let mut after_dot = false;
    loop {
        let token = stream.next_token()?;
        let is_dot = token.is_operator('.');
        match token {
            Token::Eof => return Ok(used),
            Token::Keyword(JavaKeyword::Package | JavaKeyword::Import) => loop {
                match stream.next_token()? {
                    Token::Operator(';') => break,
                    Token::Eof => return Ok(used),
                    _ => {}
                }
            },
            Token::Identifier(name) if !after_dot => {
                used.insert(name);
            }
            _ => {}
        }
        after_dot = is_dot;
    }
}
