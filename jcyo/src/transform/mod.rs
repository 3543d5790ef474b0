//! Token stream transformations
//!
//! Each stage wraps exactly one upstream stream and is itself a
//! [`TokenStream`](crate::tokens::TokenStream):
//!
//! ```text
//! Lexer -> GeneratedCodeRemover (with Unpadder) -> DirectiveApplier -> UnusedImportDisabler
//! ```
//!
//! [`Cleaner`] runs on a buffered copy of the final stage to produce the clean form.

pub mod applier;
pub mod cleaner;
pub mod remover;
pub mod unpadder;
pub mod unused_imports;

pub use applier::DirectiveApplier;
pub use cleaner::Cleaner;
pub use remover::GeneratedCodeRemover;
pub use unpadder::Unpadder;
pub use unused_imports::UnusedImportDisabler;
