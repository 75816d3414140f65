//! Parser error types.

use crate::lexer::{Span, TokenKind};

/// Distinguishes malformed input from valid input the engine does not model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The text is not valid DDL.
    Syntax,
    /// The statement is valid SQL that the schema model cannot represent.
    Unsupported,
}

/// A parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
    /// Whether the input was malformed or merely unsupported.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a new syntax error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
            kind: ParseErrorKind::Syntax,
        }
    }

    /// Creates an "unsupported construct" error.
    #[must_use]
    pub fn unsupported(what: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Unsupported,
            ..Self::new(format!("Unsupported: {}", what.into()), span)
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        let expected_str: String = expected.into();
        if found == TokenKind::Eof {
            return Self::unexpected_eof(expected_str, span);
        }
        let message = match &found {
            TokenKind::Error(lex_error) => lex_error.clone(),
            other => format!("Unexpected token: expected {expected_str}, found {other:?}"),
        };
        Self {
            message,
            span,
            expected: Some(expected_str),
            found: Some(found),
            kind: ParseErrorKind::Syntax,
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected_str: String = expected.into();
        Self {
            message: format!("Unexpected end of input: expected {expected_str}"),
            span,
            expected: Some(expected_str),
            found: Some(TokenKind::Eof),
            kind: ParseErrorKind::Syntax,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at position {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}
