//! Directive model
//!
//! A directive is the instruction inside a `//#` or `/*#` comment. Block
//! openers (`if`, `elif`, `else`, `generated`) push an entry on the applier's
//! stack; block enders (`elif`, `else`, `end`) pop one, subject to
//! [`Directive::ends`].

pub mod parser;

pub use parser::DirectiveParser;

use crate::expression::Expression;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    If(Expression),
    Elif(Expression),
    Else,
    /// `end` or `end:name`
    End(Option<String>),
    Generated,
}

impl Directive {
    /// Name as written after the command prefix
    pub fn name(&self) -> &'static str {
        match self {
            Directive::If(_) => "if",
            Directive::Elif(_) => "elif",
            Directive::Else => "else",
            Directive::End(_) => "end",
            Directive::Generated => "generated",
        }
    }

    pub fn is_block_begin(&self) -> bool {
        !matches!(self, Directive::End(_))
    }

    pub fn is_block_end(&self) -> bool {
        matches!(
            self,
            Directive::Elif(_) | Directive::Else | Directive::End(_)
        )
    }

    /// Whether an `if` chain continues through this directive
    fn is_if_family(&self) -> bool {
        matches!(self, Directive::If(_) | Directive::Elif(_) | Directive::Else)
    }

    /// Whether this directive may close the block opened by `opener`.
    ///
    /// `elif` and `else` only continue an `if`/`elif` block. A bare `end` closes
    /// anything. `end:name` closes a block whose opener is called `name`, where
    /// `end:if` also covers the `elif`/`else` branches of an `if` chain.
    pub fn ends(&self, opener: &Directive) -> bool {
        match self {
            Directive::Elif(_) | Directive::Else => {
                matches!(opener, Directive::If(_) | Directive::Elif(_))
            }
            Directive::End(None) => true,
            Directive::End(Some(target)) => {
                target == opener.name() || (target == "if" && opener.is_if_family())
            }
            Directive::If(_) | Directive::Generated => false,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::If(condition) | Directive::Elif(condition) => {
                write!(f, "{} {}", self.name(), condition)
            }
            Directive::End(Some(target)) => write!(f, "end:{}", target),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond() -> Expression {
        Expression::variable("A")
    }

    #[test]
    fn test_block_roles() {
        assert!(Directive::If(cond()).is_block_begin());
        assert!(!Directive::If(cond()).is_block_end());
        assert!(Directive::Elif(cond()).is_block_begin());
        assert!(Directive::Elif(cond()).is_block_end());
        assert!(Directive::Else.is_block_end());
        assert!(Directive::Generated.is_block_begin());
        assert!(!Directive::End(None).is_block_begin());
        assert!(Directive::End(None).is_block_end());
    }

    #[test]
    fn test_else_only_continues_if_chains() {
        assert!(Directive::Else.ends(&Directive::If(cond())));
        assert!(Directive::Elif(cond()).ends(&Directive::Elif(cond())));
        assert!(!Directive::Else.ends(&Directive::Else));
        assert!(!Directive::Else.ends(&Directive::Generated));
    }

    #[test]
    fn test_named_end_matches_opener() {
        let end_if = Directive::End(Some("if".into()));
        assert!(end_if.ends(&Directive::If(cond())));
        assert!(end_if.ends(&Directive::Elif(cond())));
        assert!(end_if.ends(&Directive::Else));
        assert!(!end_if.ends(&Directive::Generated));

        let end_generated = Directive::End(Some("generated".into()));
        assert!(end_generated.ends(&Directive::Generated));
        assert!(!end_generated.ends(&Directive::If(cond())));

        assert!(Directive::End(None).ends(&Directive::Generated));
        assert!(Directive::End(Some("else".into())).ends(&Directive::Else));
    }

    #[test]
    fn test_display() {
        assert_eq!(Directive::If(cond()).to_string(), "if A");
        assert_eq!(Directive::End(Some("if".into())).to_string(), "end:if");
        assert_eq!(Directive::Generated.to_string(), "generated");
    }
}
