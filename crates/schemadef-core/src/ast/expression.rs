//! Expression AST types for DEFAULT values, CHECK constraints and index
//! predicates.

use std::fmt::{self, Write};

use serde::Serialize;

use super::DataType;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Blob literal.
    Blob(Vec<u8>),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,
    Like,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::Like => "LIKE",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// A function call expression. Names are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    /// The function name.
    pub name: String,
    /// The arguments.
    pub args: Vec<Expr>,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A column reference (optionally qualified with table name).
    Column {
        /// Table name (optional).
        table: Option<String>,
        /// Column name.
        name: String,
    },

    /// A parameterless builtin written without parentheses, such as
    /// `CURRENT_TIMESTAMP`. Stored upper-cased.
    Niladic(String),

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A function call.
    Function(FunctionCall),

    /// IS NULL expression.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },

    /// IN expression.
    In {
        /// The expression to check.
        expr: Box<Expr>,
        /// The list of values.
        list: Vec<Expr>,
        /// Whether this is NOT IN.
        negated: bool,
    },

    /// BETWEEN expression.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN clauses.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_clause: Option<Box<Expr>>,
    },

    /// CAST(expr AS type).
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type.
        data_type: DataType,
    },

    /// PostgreSQL `expr::type`.
    TypeCast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type.
        data_type: DataType,
    },

    /// Parenthesized expression.
    Paren(Box<Expr>),
}

/// Quotes an identifier with double quotes when it is not a plain word.
fn default_quote(name: &str) -> String {
    let plain = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

impl Expr {
    /// Creates a new column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a new integer literal.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// Creates a new string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Returns true for the NULL literal.
    #[must_use]
    pub const fn is_null_literal(&self) -> bool {
        matches!(self, Self::Literal(Literal::Null))
    }

    /// Removes any number of enclosing parentheses.
    #[must_use]
    pub fn strip_parens(self) -> Self {
        match self {
            Self::Paren(inner) => inner.strip_parens(),
            other => other,
        }
    }

    /// Renders the expression, quoting identifiers with `quote`.
    #[must_use]
    pub fn to_sql(&self, quote: &dyn Fn(&str) -> String) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, quote);
        out
    }

    fn write_list(list: &[Self], out: &mut String, quote: &dyn Fn(&str) -> String) {
        for (i, expr) in list.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            expr.write_sql(out, quote);
        }
    }

    fn write_sql(&self, out: &mut String, quote: &dyn Fn(&str) -> String) {
        match self {
            Self::Literal(literal) => write_literal(literal, out),
            Self::Column { table, name } => {
                if let Some(table) = table {
                    out.push_str(&quote(table));
                    out.push('.');
                }
                out.push_str(&quote(name));
            }
            Self::Niladic(name) => out.push_str(name),
            Self::Binary { left, op, right } => {
                left.write_sql(out, quote);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                right.write_sql(out, quote);
            }
            Self::Unary { op, operand } => {
                let mut rendered = String::new();
                operand.write_sql(&mut rendered, quote);
                out.push_str(op.as_str());
                // `--` would start a line comment.
                let nested_sign = matches!(op, UnaryOp::Neg) && rendered.starts_with('-');
                if matches!(op, UnaryOp::Not) || nested_sign {
                    out.push(' ');
                }
                out.push_str(&rendered);
            }
            Self::Function(call) => {
                out.push_str(&call.name);
                out.push('(');
                Self::write_list(&call.args, out, quote);
                out.push(')');
            }
            Self::IsNull { expr, negated } => {
                expr.write_sql(out, quote);
                out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Self::In {
                expr,
                list,
                negated,
            } => {
                expr.write_sql(out, quote);
                out.push_str(if *negated { " NOT IN (" } else { " IN (" });
                Self::write_list(list, out, quote);
                out.push(')');
            }
            Self::Between {
                expr,
                low,
                high,
                negated,
            } => {
                expr.write_sql(out, quote);
                out.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                low.write_sql(out, quote);
                out.push_str(" AND ");
                high.write_sql(out, quote);
            }
            Self::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                out.push_str("CASE");
                if let Some(operand) = operand {
                    out.push(' ');
                    operand.write_sql(out, quote);
                }
                for (when, then) in when_clauses {
                    out.push_str(" WHEN ");
                    when.write_sql(out, quote);
                    out.push_str(" THEN ");
                    then.write_sql(out, quote);
                }
                if let Some(else_clause) = else_clause {
                    out.push_str(" ELSE ");
                    else_clause.write_sql(out, quote);
                }
                out.push_str(" END");
            }
            Self::Cast { expr, data_type } => {
                out.push_str("CAST(");
                expr.write_sql(out, quote);
                let _ = write!(out, " AS {data_type})");
            }
            Self::TypeCast { expr, data_type } => {
                expr.write_sql(out, quote);
                let _ = write!(out, "::{data_type}");
            }
            Self::Paren(inner) => {
                out.push('(');
                inner.write_sql(out, quote);
                out.push(')');
            }
        }
    }
}

fn write_literal(literal: &Literal, out: &mut String) {
    match literal {
        Literal::Integer(n) => {
            let _ = write!(out, "{n}");
        }
        Literal::Float(f) => {
            let _ = write!(out, "{f:?}");
        }
        Literal::String(s) => {
            out.push('\'');
            out.push_str(&s.replace('\'', "''"));
            out.push('\'');
        }
        Literal::Blob(bytes) => {
            out.push_str("X'");
            for byte in bytes {
                let _ = write!(out, "{byte:02X}");
            }
            out.push('\'');
        }
        Literal::Boolean(true) => out.push_str("TRUE"),
        Literal::Boolean(false) => out.push_str("FALSE"),
        Literal::Null => out.push_str("NULL"),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql(&default_quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Expr::integer(42).to_string(), "42");
        assert_eq!(Expr::string("it's").to_string(), "'it''s'");
        assert_eq!(Expr::Literal(Literal::Float(1.5)).to_string(), "1.5");
        assert_eq!(Expr::Literal(Literal::Float(1000.0)).to_string(), "1000.0");
        assert_eq!(Expr::Literal(Literal::Blob(vec![0xCA, 0xFE])).to_string(), "X'CAFE'");
        assert_eq!(Expr::null().to_string(), "NULL");
    }

    #[test]
    fn test_binary_rendering() {
        let expr = Expr::column("age").binary(BinaryOp::Gt, Expr::integer(18));
        assert_eq!(expr.to_string(), "age > 18");
    }

    #[test]
    fn test_nested_negation_is_not_a_comment() {
        let expr = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::integer(-1)),
        };
        assert_eq!(expr.to_string(), "- -1");

        let expr = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(expr),
        };
        assert_eq!(expr.to_string(), "- - -1");

        let expr = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::integer(1)),
        };
        assert_eq!(expr.to_string(), "-1");
    }

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(Expr::column("Weird Name").to_string(), "\"Weird Name\"");
        let backtick = |name: &str| format!("`{name}`");
        assert_eq!(Expr::column("a").to_sql(&backtick), "`a`");
    }

    #[test]
    fn test_type_cast_rendering() {
        let expr = Expr::TypeCast {
            expr: Box::new(Expr::string("x")),
            data_type: DataType::new("character varying"),
        };
        assert_eq!(expr.to_string(), "'x'::character varying");
    }

    #[test]
    fn test_strip_parens() {
        let expr = Expr::Paren(Box::new(Expr::Paren(Box::new(Expr::integer(1)))));
        assert_eq!(expr.strip_parens(), Expr::integer(1));
    }

    #[test]
    fn test_in_and_between_rendering() {
        let expr = Expr::In {
            expr: Box::new(Expr::column("status")),
            list: vec![Expr::string("a"), Expr::string("b")],
            negated: true,
        };
        assert_eq!(expr.to_string(), "status NOT IN ('a', 'b')");
        let expr = Expr::Between {
            expr: Box::new(Expr::column("n")),
            low: Box::new(Expr::integer(1)),
            high: Box::new(Expr::integer(9)),
            negated: false,
        };
        assert_eq!(expr.to_string(), "n BETWEEN 1 AND 9");
    }
}
