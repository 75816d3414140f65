//! Operator precedence for DDL expressions.
//!
//! DEFAULT values, CHECK conditions and partial index predicates share one
//! expression grammar. Every infix token maps to an [`Infix`] operator on a
//! precedence level `p`, which binds as `(2p - 1, 2p)`: higher levels bind
//! tighter and operators on one level associate to the left.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Level of comparisons and the `IS`/`IN`/`BETWEEN`/`LIKE` predicates.
const COMPARISON: u8 = 3;

/// Level of the postfix `::` cast, above every other operator.
const CAST: u8 = 10;

/// An operator that appears after its left operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infix {
    /// A plain binary operator.
    Binary(BinaryOp),
    /// `expr::type`.
    Cast,
    /// `IS [NOT] NULL`.
    IsNull,
    /// `NOT IN`, `NOT BETWEEN` or `NOT LIKE`.
    Not,
    /// `IN`, `BETWEEN` or `LIKE`.
    Predicate,
}

impl Infix {
    const fn level(self) -> u8 {
        match self {
            Self::Binary(op) => match op {
                BinaryOp::Or => 1,
                BinaryOp::And => 2,
                BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::Like => COMPARISON,
                BinaryOp::BitOr => 4,
                BinaryOp::BitAnd => 5,
                BinaryOp::LeftShift | BinaryOp::RightShift => 6,
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat => 7,
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 8,
            },
            Self::IsNull | Self::Not | Self::Predicate => COMPARISON,
            Self::Cast => CAST,
        }
    }

    /// Returns `(left_bp, right_bp)`.
    #[must_use]
    pub const fn binding_power(self) -> (u8, u8) {
        let level = self.level();
        (2 * level - 1, 2 * level)
    }
}

/// Classifies the token after a complete operand.
#[must_use]
pub const fn infix_operator(kind: &TokenKind) -> Option<Infix> {
    let op = match kind {
        TokenKind::DoubleColon => return Some(Infix::Cast),
        TokenKind::Keyword(Keyword::Is) => return Some(Infix::IsNull),
        TokenKind::Keyword(Keyword::Not) => return Some(Infix::Not),
        TokenKind::Keyword(Keyword::In | Keyword::Between | Keyword::Like) => {
            return Some(Infix::Predicate)
        }
        TokenKind::Keyword(Keyword::Or) => BinaryOp::Or,
        TokenKind::Keyword(Keyword::And) => BinaryOp::And,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::BitOr => BinaryOp::BitOr,
        TokenKind::BitAnd => BinaryOp::BitAnd,
        TokenKind::LeftShift => BinaryOp::LeftShift,
        TokenKind::RightShift => BinaryOp::RightShift,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Concat => BinaryOp::Concat,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        _ => return None,
    };
    Some(Infix::Binary(op))
}

/// Classifies a token that starts a prefix expression, returning the
/// operator (`None` for unary plus, which is dropped) and the binding power
/// of its operand.
///
/// `NOT` takes a whole comparison; the sign and `~` bind tighter than any
/// binary operator but looser than a cast.
#[must_use]
pub const fn prefix_operator(kind: &TokenKind) -> Option<(Option<UnaryOp>, u8)> {
    const SIGN: u8 = 2 * CAST - 3;
    match kind {
        TokenKind::Keyword(Keyword::Not) => Some((Some(UnaryOp::Not), 2 * COMPARISON - 1)),
        TokenKind::Minus => Some((Some(UnaryOp::Neg), SIGN)),
        TokenKind::BitNot => Some((Some(UnaryOp::BitNot), SIGN)),
        TokenKind::Plus => Some((None, SIGN)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left(kind: &TokenKind) -> u8 {
        infix_operator(kind).unwrap().binding_power().0
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(left(&TokenKind::Star) > left(&TokenKind::Plus));
        assert!(left(&TokenKind::Keyword(Keyword::And)) > left(&TokenKind::Keyword(Keyword::Or)));
        assert!(left(&TokenKind::DoubleColon) > left(&TokenKind::Star));
        assert_eq!(
            left(&TokenKind::Keyword(Keyword::Like)),
            left(&TokenKind::Eq)
        );
    }

    #[test]
    fn test_prefix_binding() {
        let (_, not_bp) = prefix_operator(&TokenKind::Keyword(Keyword::Not)).unwrap();
        assert!(not_bp > left(&TokenKind::Keyword(Keyword::And)));
        assert!(not_bp <= left(&TokenKind::Eq));

        let (_, neg_bp) = prefix_operator(&TokenKind::Minus).unwrap();
        assert!(neg_bp > left(&TokenKind::Star));
        assert!(neg_bp < left(&TokenKind::DoubleColon));
    }

    #[test]
    fn test_operator_classes() {
        assert_eq!(
            infix_operator(&TokenKind::Concat),
            Some(Infix::Binary(BinaryOp::Concat))
        );
        assert_eq!(infix_operator(&TokenKind::Keyword(Keyword::Is)), Some(Infix::IsNull));
        assert_eq!(infix_operator(&TokenKind::LeftParen), None);
        assert_eq!(prefix_operator(&TokenKind::Plus), Some((None, 17)));
    }
}
