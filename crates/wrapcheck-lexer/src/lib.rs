//! Lexer for the analyzed TypeScript subset.
//!
//! Tokenizes source code into a stream of tokens for the parser.

mod lexer;

pub use lexer::{LexError, LexErrorKind, LexResult, Lexer};
