//! Recursive-descent DDL parser.
//!
//! Expressions inside DEFAULT, CHECK and WHERE clauses are parsed with a
//! Pratt parser.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;
