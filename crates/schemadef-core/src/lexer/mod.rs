//! DDL lexer.
//!
//! A hand-written lexer producing a stream of tokens. Quoting rules depend on
//! the [`Dialect`](crate::Dialect) being lexed.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
