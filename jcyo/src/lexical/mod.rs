//! Lexical analysis
//!
//! Turns Java source into the lossless token stream consumed by every later
//! stage. See [`Lexer`] for the recognized comment sub-dialects.

pub mod lexer;

use crate::error::JcyoResult;
use crate::options::JcyoOptions;
use crate::tokens::{collect_tokens, Token};

pub use lexer::Lexer;

/// Tokenize a whole source text, excluding the trailing EOF
pub fn tokenize(source: &str, options: &JcyoOptions) -> JcyoResult<Vec<Token>> {
    collect_tokens(Lexer::new(source, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_is_lossless() {
        let source = "int a = 1; //# if X\n";
        let tokens = tokenize(source, &JcyoOptions::default()).unwrap();
        let text: String = tokens.iter().map(|t| t.raw()).collect();
        assert_eq!(text, source);
    }
}
