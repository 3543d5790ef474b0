//! Directive applier
//!
//! Evaluates `if`/`elif`/`else`/`end` blocks and marks the code of every
//! disabled branch with synthetic [`Token::DisabledRegionStart`] /
//! [`Token::DisabledRegionEnd`] tokens for the writer.
//!
//! Regions only ever contain code. Directives always stay outside them, so a
//! region is closed before each directive and reopened lazily at the next
//! code token of a disabled scope. Whitespace and line breaks seen while
//! disabled are held back until it is known whether they fall inside a region
//! or between a region and the next directive.

use crate::config::compile_time::directive::MAX_DIRECTIVE_DEPTH;
use crate::directive::{Directive, DirectiveParser};
use crate::error::{JcyoError, JcyoResult};
use crate::expression::{Evaluator, Expression, Variables};
use crate::log_debug;
use crate::tokens::{CommentStyle, Peekable, PeekableTokenStream, Token, TokenBuffer, TokenStream};

#[derive(Debug, Clone)]
struct StackEntry {
    directive: Directive,
    enabled: bool,
    style: CommentStyle,
    /// Some branch of this `if` chain was already taken
    encountered_enabled_branch: bool,
    /// Text in front of the opening directive on its line
    indent: String,
}

pub struct DirectiveApplier<'v, S: TokenStream> {
    input: Peekable<S>,
    evaluator: Evaluator<'v>,
    output: TokenBuffer,
    stack: Vec<StackEntry>,
    held: Vec<Token>,
    region: Option<CommentStyle>,
    line_text: String,
    done: bool,
}

impl<'v, S: TokenStream> DirectiveApplier<'v, S> {
    pub fn new(input: S, variables: &'v Variables) -> Self {
        Self {
            input: Peekable::new(input),
            evaluator: Evaluator::new(variables),
            output: TokenBuffer::new(),
            stack: Vec::new(),
            held: Vec::new(),
            region: None,
            line_text: String::new(),
            done: false,
        }
    }

    fn enabled(&self) -> bool {
        self.stack.last().map_or(true, |entry| entry.enabled)
    }

    fn step(&mut self) -> JcyoResult<()> {
        if matches!(self.input.peek_token()?, Token::DirectiveStart { .. }) {
            return self.apply_next_directive();
        }

        let token = self.input.next_token()?;
        if token.is_eof() {
            if let Some(entry) = self.stack.last() {
                return Err(JcyoError::parse(format!(
                    "Unclosed block directive {}",
                    entry.directive
                )));
            }
            self.close_region()?;
            self.flush_held()?;
            self.done = true;
            return self.output.push_token(Token::Eof);
        }

        self.track_line(&token);
        if self.enabled() {
            return self.output.push_token(token);
        }

        if token.is_whitespace() || token.is_line_break() {
            self.held.push(token);
            return Ok(());
        }

        self.open_region()?;
        self.flush_held()?;
        self.output.push_token(token)
    }

    fn open_region(&mut self) -> JcyoResult<()> {
        if self.region.is_some() {
            return Ok(());
        }
        let (style, indent) = match self.stack.last() {
            Some(entry) => (entry.style, entry.indent.clone()),
            None => (CommentStyle::Line, String::new()),
        };
        // A flex region starts right at the code; a line region at the start of its line
        if style == CommentStyle::Flex {
            self.flush_held()?;
        }
        self.region = Some(style);
        self.output.push_token(Token::region_start(style, indent))
    }

    fn close_region(&mut self) -> JcyoResult<()> {
        if self.region.take().is_some() {
            self.output.push_token(Token::DisabledRegionEnd)?;
        }
        Ok(())
    }

    fn flush_held(&mut self) -> JcyoResult<()> {
        for token in self.held.drain(..) {
            self.output.push_token(token)?;
        }
        Ok(())
    }

    fn track_line(&mut self, token: &Token) {
        if token.is_line_break() {
            self.line_text.clear();
        } else {
            self.line_text.push_str(&token.raw());
        }
    }

    fn apply_next_directive(&mut self) -> JcyoResult<()> {
        self.close_region()?;
        self.flush_held()?;

        let indent = self.line_text.clone();
        let mark = self.output.len();
        let (directive, style) =
            DirectiveParser::new(&mut self.output.copying(&mut self.input)).parse()?;
        let consumed: Vec<Token> = self.output.iter().skip(mark).cloned().collect();
        for token in &consumed {
            self.track_line(token);
        }

        let scope_enabled = self.enabled();
        match &directive {
            Directive::If(condition) => {
                let enabled = scope_enabled && self.truthy(condition)?;
                self.push(StackEntry {
                    directive: directive.clone(),
                    enabled,
                    style,
                    encountered_enabled_branch: enabled,
                    indent,
                })?;
            }
            Directive::Elif(_) | Directive::Else => {
                let previous = self.pop(&directive, style)?;
                let scope_enabled = self.enabled();
                let enabled = scope_enabled
                    && !previous.encountered_enabled_branch
                    && match &directive {
                        Directive::Elif(condition) => self.truthy(condition)?,
                        _ => true,
                    };
                self.push(StackEntry {
                    directive: directive.clone(),
                    enabled,
                    style,
                    encountered_enabled_branch: previous.encountered_enabled_branch || enabled,
                    indent,
                })?;
            }
            Directive::End(_) => {
                self.pop(&directive, style)?;
            }
            Directive::Generated => {
                self.push(StackEntry {
                    directive: directive.clone(),
                    enabled: scope_enabled,
                    style,
                    encountered_enabled_branch: scope_enabled,
                    indent,
                })?;
            }
        }

        log_debug!("Applied directive",
            "directive" => directive,
            "style" => style,
            "enabled" => self.enabled(),
            "depth" => self.stack.len()
        );
        Ok(())
    }

    fn truthy(&self, condition: &Expression) -> JcyoResult<bool> {
        self.evaluator.is_truthy(condition)
    }

    fn push(&mut self, entry: StackEntry) -> JcyoResult<()> {
        if self.stack.len() >= MAX_DIRECTIVE_DEPTH {
            return Err(JcyoError::parse(format!(
                "Directive nesting exceeds {} levels",
                MAX_DIRECTIVE_DEPTH
            )));
        }
        self.stack.push(entry);
        Ok(())
    }

    /// Pop the innermost block, checking that `closing` may close it
    fn pop(&mut self, closing: &Directive, style: CommentStyle) -> JcyoResult<StackEntry> {
        let entry = self.stack.pop().ok_or_else(|| {
            JcyoError::parse(format!("Unexpected {} without an open block", closing))
        })?;
        if !closing.ends(&entry.directive) {
            return Err(JcyoError::parse(format!(
                "Incorrect end directive for {}: {}",
                entry.directive, closing
            )));
        }
        if entry.style != style {
            return Err(JcyoError::parse(
                "You must not mix comment styles for start and end of block directives",
            ));
        }
        Ok(entry)
    }
}

impl<S: TokenStream> TokenStream for DirectiveApplier<'_, S> {
    fn next_token(&mut self) -> JcyoResult<Token> {
        while self.output.is_empty() && !self.done {
            self.step()?;
        }
        self.output.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Lexer;
    use crate::options::JcyoOptions;
    use crate::tokens::collect_tokens;
    use assert_matches::assert_matches;

    fn apply_with(source: &str, variables: &Variables) -> JcyoResult<Vec<Token>> {
        let lexer = Lexer::new(source, &JcyoOptions::default());
        collect_tokens(DirectiveApplier::new(lexer, variables))
    }

    fn apply(source: &str) -> JcyoResult<Vec<Token>> {
        apply_with(source, &Variables::new())
    }

    /// Raw text with regions shown as `[` and `]`
    fn render(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|token| match token {
                Token::DisabledRegionStart { .. } => "[".into(),
                Token::DisabledRegionEnd => "]".into(),
                other => other.raw().into_owned(),
            })
            .collect()
    }

    fn enabled_branches(source: &str, variables: &Variables) -> Vec<String> {
        let tokens = apply_with(source, variables).unwrap();
        let mut in_region = false;
        let mut in_directive = false;
        let mut taken = Vec::new();
        for token in &tokens {
            match token {
                Token::DisabledRegionStart { .. } => in_region = true,
                Token::DisabledRegionEnd => in_region = false,
                Token::DirectiveStart { .. } => in_directive = true,
                Token::LineBreak(_) => in_directive = false,
                Token::Identifier(name) if !in_region && !in_directive => {
                    taken.push(name.clone())
                }
                _ => {}
            }
        }
        taken
    }

    #[test]
    fn test_false_branch_is_wrapped() {
        let tokens = apply("//# if false\nA\n//# end\n").unwrap();
        assert_eq!(render(&tokens), "//# if false\n[A]\n//# end\n");
        assert!(tokens.contains(&Token::region_start(CommentStyle::Line, "")));
    }

    #[test]
    fn test_region_carries_directive_indent() {
        let tokens = apply("\t   //# if false\n\t   A\n\t   //# end\n").unwrap();
        let indent = tokens.iter().find_map(|token| match token {
            Token::DisabledRegionStart { indent, .. } => Some(indent.clone()),
            _ => None,
        });
        assert_eq!(indent.as_deref(), Some("\t   "));
        assert_eq!(
            render(&tokens),
            "\t   //# if false\n[\t   A]\n\t   //# end\n"
        );
    }

    #[test]
    fn test_flex_region_starts_at_code() {
        let tokens = apply("/*# if false */\n  a();\n  b();\n/*# end */").unwrap();
        assert_eq!(
            render(&tokens),
            "/*# if false */\n  [a();\n  b();]\n/*# end */"
        );
    }

    #[test]
    fn test_branch_exclusivity() {
        let source = "//# if V == 1\nOne\n//# elif V >= 1\nAtLeastOne\n//# elif V > 0\nPositive\n//# else\nOther\n//# end\n";
        let with = |v: f64| {
            let mut variables = Variables::new();
            variables.set("v", v);
            enabled_branches(source, &variables)
        };
        assert_eq!(with(1.0), vec!["One"]);
        assert_eq!(with(2.0), vec!["AtLeastOne"]);
        assert_eq!(with(0.5), vec!["Positive"]);
        assert_eq!(with(-1.0), vec!["Other"]);

        let no_else = "//# if A\nX\n//# elif B\nY\n//# end\n";
        assert!(enabled_branches(no_else, &Variables::new()).is_empty());
    }

    #[test]
    fn test_nested_blocks_inside_disabled_scope() {
        let mut variables = Variables::new();
        variables.set("inner", true);
        let source = "//# if OUTER\nA\n//# if INNER\nB\n//# else\nC\n//# end\nD\n//# end\n";
        assert!(enabled_branches(source, &variables).is_empty());

        variables.set("outer", true);
        assert_eq!(enabled_branches(source, &variables), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_conditions_not_evaluated_in_disabled_scope() {
        let source = "//# if false\n//# if -\"x\"\nA\n//# end\n//# end\n";
        assert!(apply(source).is_ok());
        assert_matches!(
            apply("//# if -\"x\"\nA\n//# end\n"),
            Err(JcyoError::Evaluation { .. })
        );
    }

    #[test]
    fn test_named_end_matching() {
        assert!(apply("//# if A\nx\n//# else\ny\n//# end:if\n").is_ok());
        assert!(apply("//# generated\nx\n//# end:generated\n").is_ok());
        assert_matches!(
            apply("//# generated\nx\n//# end:if\n"),
            Err(JcyoError::Parse { .. })
        );
        assert_matches!(
            apply("//# if A\nx\n//# end:generated\n"),
            Err(JcyoError::Parse { .. })
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_matches!(apply("//# if A\nx\n"), Err(JcyoError::Parse { .. }));
        assert_matches!(apply("x\n//# end\n"), Err(JcyoError::Parse { .. }));
        assert_matches!(apply("//# else\n"), Err(JcyoError::Parse { .. }));
        assert_matches!(
            apply("//# if A\nx\n/*# end */\n"),
            Err(JcyoError::Parse { .. })
        );
        assert_matches!(
            apply("//# generated\n//# else\n//# end\n"),
            Err(JcyoError::Parse { .. })
        );
    }

    #[test]
    fn test_depth_limit() {
        let source = "//# if true\n".repeat(MAX_DIRECTIVE_DEPTH + 1);
        assert_matches!(apply(&source), Err(JcyoError::Parse { .. }));
    }
}
