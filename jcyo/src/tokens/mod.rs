//! Token system for jcyo
//!
//! Java source is turned into a lossless token stream: every source character
//! belongs to exactly one token, so the raw texts of the tokens concatenate back
//! to the input. Later stages add two synthetic tokens marking disabled regions
//! and never emit anything else that does not come from the source.
//!
//! ## Key Components
//!
//! - **[`Token`]** - Token kinds with their source text
//! - **[`JavaKeyword`]** - Reserved words, recognized case-sensitively
//! - **[`TokenStream`]** / **[`PeekableTokenStream`]** - Pull interface shared by every stage
//! - **[`TokenBuffer`]** - Queue used for staging output and replaying lookahead

pub mod keywords;
pub mod token;
pub mod token_stream;

pub use keywords::JavaKeyword;
pub use token::{CommentStyle, Token};
pub use token_stream::{
    collect_tokens, concat_raw, Copying, Peekable, PeekableTokenStream, StaticTokenStream,
    TokenBuffer, TokenStream,
};
