//! Java keyword table
//!
//! Contextual keywords (`record`, `sealed`, `yield`, module directives, ...) are
//! included so that they are never mistaken for plain identifiers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JavaKeyword {
    Underscore,
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Exports,
    False,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    NonSealed,
    Null,
    Open,
    Opens,
    Module,
    Package,
    Permits,
    Private,
    Protected,
    Provides,
    Public,
    Record,
    Requires,
    Return,
    Sealed,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    To,
    Transient,
    Transitive,
    True,
    Try,
    Var,
    Void,
    Volatile,
    While,
    With,
    When,
    Yield,
}

impl JavaKeyword {
    pub const ALL: &'static [JavaKeyword] = &[
        JavaKeyword::Underscore,
        JavaKeyword::Abstract,
        JavaKeyword::Assert,
        JavaKeyword::Boolean,
        JavaKeyword::Break,
        JavaKeyword::Byte,
        JavaKeyword::Case,
        JavaKeyword::Catch,
        JavaKeyword::Char,
        JavaKeyword::Class,
        JavaKeyword::Const,
        JavaKeyword::Continue,
        JavaKeyword::Default,
        JavaKeyword::Do,
        JavaKeyword::Double,
        JavaKeyword::Else,
        JavaKeyword::Enum,
        JavaKeyword::Extends,
        JavaKeyword::Exports,
        JavaKeyword::False,
        JavaKeyword::Final,
        JavaKeyword::Finally,
        JavaKeyword::Float,
        JavaKeyword::For,
        JavaKeyword::Goto,
        JavaKeyword::If,
        JavaKeyword::Implements,
        JavaKeyword::Import,
        JavaKeyword::Instanceof,
        JavaKeyword::Int,
        JavaKeyword::Interface,
        JavaKeyword::Long,
        JavaKeyword::Native,
        JavaKeyword::New,
        JavaKeyword::NonSealed,
        JavaKeyword::Null,
        JavaKeyword::Open,
        JavaKeyword::Opens,
        JavaKeyword::Module,
        JavaKeyword::Package,
        JavaKeyword::Permits,
        JavaKeyword::Private,
        JavaKeyword::Protected,
        JavaKeyword::Provides,
        JavaKeyword::Public,
        JavaKeyword::Record,
        JavaKeyword::Requires,
        JavaKeyword::Return,
        JavaKeyword::Sealed,
        JavaKeyword::Short,
        JavaKeyword::Static,
        JavaKeyword::Strictfp,
        JavaKeyword::Super,
        JavaKeyword::Switch,
        JavaKeyword::Synchronized,
        JavaKeyword::This,
        JavaKeyword::Throw,
        JavaKeyword::Throws,
        JavaKeyword::To,
        JavaKeyword::Transient,
        JavaKeyword::Transitive,
        JavaKeyword::True,
        JavaKeyword::Try,
        JavaKeyword::Var,
        JavaKeyword::Void,
        JavaKeyword::Volatile,
        JavaKeyword::While,
        JavaKeyword::With,
        JavaKeyword::When,
        JavaKeyword::Yield,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            JavaKeyword::Underscore => "_",
            JavaKeyword::Abstract => "abstract",
            JavaKeyword::Assert => "assert",
            JavaKeyword::Boolean => "boolean",
            JavaKeyword::Break => "break",
            JavaKeyword::Byte => "byte",
            JavaKeyword::Case => "case",
            JavaKeyword::Catch => "catch",
            JavaKeyword::Char => "char",
            JavaKeyword::Class => "class",
            JavaKeyword::Const => "const",
            JavaKeyword::Continue => "continue",
            JavaKeyword::Default => "default",
            JavaKeyword::Do => "do",
            JavaKeyword::Double => "double",
            JavaKeyword::Else => "else",
            JavaKeyword::Enum => "enum",
            JavaKeyword::Extends => "extends",
            JavaKeyword::Exports => "exports",
            JavaKeyword::False => "false",
            JavaKeyword::Final => "final",
            JavaKeyword::Finally => "finally",
            JavaKeyword::Float => "float",
            JavaKeyword::For => "for",
            JavaKeyword::Goto => "goto",
            JavaKeyword::If => "if",
            JavaKeyword::Implements => "implements",
            JavaKeyword::Import => "import",
            JavaKeyword::Instanceof => "instanceof",
            JavaKeyword::Int => "int",
            JavaKeyword::Interface => "interface",
            JavaKeyword::Long => "long",
            JavaKeyword::Native => "native",
            JavaKeyword::New => "new",
            JavaKeyword::NonSealed => "non-sealed",
            JavaKeyword::Null => "null",
            JavaKeyword::Open => "open",
            JavaKeyword::Opens => "opens",
            JavaKeyword::Module => "module",
            JavaKeyword::Package => "package",
            JavaKeyword::Permits => "permits",
            JavaKeyword::Private => "private",
            JavaKeyword::Protected => "protected",
            JavaKeyword::Provides => "provides",
            JavaKeyword::Public => "public",
            JavaKeyword::Record => "record",
            JavaKeyword::Requires => "requires",
            JavaKeyword::Return => "return",
            JavaKeyword::Sealed => "sealed",
            JavaKeyword::Short => "short",
            JavaKeyword::Static => "static",
            JavaKeyword::Strictfp => "strictfp",
            JavaKeyword::Super => "super",
            JavaKeyword::Switch => "switch",
            JavaKeyword::Synchronized => "synchronized",
            JavaKeyword::This => "this",
            JavaKeyword::Throw => "throw",
            JavaKeyword::Throws => "throws",
            JavaKeyword::To => "to",
            JavaKeyword::Transient => "transient",
            JavaKeyword::Transitive => "transitive",
            JavaKeyword::True => "true",
            JavaKeyword::Try => "try",
            JavaKeyword::Var => "var",
            JavaKeyword::Void => "void",
            JavaKeyword::Volatile => "volatile",
            JavaKeyword::While => "while",
            JavaKeyword::With => "with",
            JavaKeyword::When => "when",
            JavaKeyword::Yield => "yield",
        }
    }

    /// Look up the keyword spelled exactly as `text`
    pub fn from_str(text: &str) -> Option<Self> {
        static KEYWORDS: OnceLock<HashMap<&'static str, JavaKeyword>> = OnceLock::new();
        KEYWORDS
            .get_or_init(|| {
                JavaKeyword::ALL
                    .iter()
                    .map(|keyword| (keyword.as_str(), *keyword))
                    .collect()
            })
            .get(text)
            .copied()
    }

    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            JavaKeyword::True | JavaKeyword::False | JavaKeyword::Null
        )
    }
}

impl fmt::Display for JavaKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_round_trips() {
        for keyword in JavaKeyword::ALL {
            assert_eq!(JavaKeyword::from_str(keyword.as_str()), Some(*keyword));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(JavaKeyword::from_str("import"), Some(JavaKeyword::Import));
        assert_eq!(JavaKeyword::from_str("Import"), None);
        assert_eq!(JavaKeyword::from_str("end"), None);
        assert_eq!(JavaKeyword::from_str("generated"), None);
    }
}
