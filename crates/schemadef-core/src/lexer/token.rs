//! Token types for the DDL lexer.

use super::Span;

/// SQL keywords recognized by the lexer.
///
/// Data type names are not keywords; the parser reads them as plain words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Statements
    Create,
    Drop,
    Alter,
    Table,
    Index,
    View,
    Temporary,
    If,
    Exists,
    Or,
    Replace,
    As,
    On,
    Using,
    Where,

    // ALTER TABLE actions
    Add,
    Column,
    Modify,
    Change,
    Rename,
    To,
    Only,
    Type,
    Set,
    Data,
    First,
    After,

    // Constraints
    Primary,
    Key,
    Foreign,
    References,
    Unique,
    Check,
    Default,
    Constraint,
    Cascade,
    Restrict,
    No,
    Action,
    Delete,
    Update,

    // Column attributes
    AutoIncrement,
    Autoincrement,
    Unsigned,
    Comment,
    Collate,
    Character,
    Charset,
    Asc,
    Desc,
    With,
    Without,

    // Expressions
    Not,
    Null,
    And,
    In,
    Is,
    Between,
    Like,
    True,
    False,
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "DROP" => Some(Self::Drop),
            "ALTER" => Some(Self::Alter),
            "TABLE" => Some(Self::Table),
            "INDEX" => Some(Self::Index),
            "VIEW" => Some(Self::View),
            "TEMPORARY" => Some(Self::Temporary),
            "IF" => Some(Self::If),
            "EXISTS" => Some(Self::Exists),
            "OR" => Some(Self::Or),
            "REPLACE" => Some(Self::Replace),
            "AS" => Some(Self::As),
            "ON" => Some(Self::On),
            "USING" => Some(Self::Using),
            "WHERE" => Some(Self::Where),
            "ADD" => Some(Self::Add),
            "COLUMN" => Some(Self::Column),
            "MODIFY" => Some(Self::Modify),
            "CHANGE" => Some(Self::Change),
            "RENAME" => Some(Self::Rename),
            "TO" => Some(Self::To),
            "ONLY" => Some(Self::Only),
            "TYPE" => Some(Self::Type),
            "SET" => Some(Self::Set),
            "DATA" => Some(Self::Data),
            "PRIMARY" => Some(Self::Primary),
            "KEY" => Some(Self::Key),
            "FOREIGN" => Some(Self::Foreign),
            "REFERENCES" => Some(Self::References),
            "UNIQUE" => Some(Self::Unique),
            "CHECK" => Some(Self::Check),
            "DEFAULT" => Some(Self::Default),
            "CONSTRAINT" => Some(Self::Constraint),
            "CASCADE" => Some(Self::Cascade),
            "RESTRICT" => Some(Self::Restrict),
            "NO" => Some(Self::No),
            "ACTION" => Some(Self::Action),
            "DELETE" => Some(Self::Delete),
            "UPDATE" => Some(Self::Update),
            "AUTO_INCREMENT" => Some(Self::AutoIncrement),
            "AUTOINCREMENT" => Some(Self::Autoincrement),
            "UNSIGNED" => Some(Self::Unsigned),
            "COMMENT" => Some(Self::Comment),
            "COLLATE" => Some(Self::Collate),
            "CHARACTER" => Some(Self::Character),
            "CHARSET" => Some(Self::Charset),
            "FIRST" => Some(Self::First),
            "AFTER" => Some(Self::After),
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            "NOT" => Some(Self::Not),
            "NULL" => Some(Self::Null),
            "AND" => Some(Self::And),
            "IN" => Some(Self::In),
            "IS" => Some(Self::Is),
            "BETWEEN" => Some(Self::Between),
            "LIKE" => Some(Self::Like),
            "TRUE" => Some(Self::True),
            "FALSE" => Some(Self::False),
            "CASE" => Some(Self::Case),
            "WHEN" => Some(Self::When),
            "THEN" => Some(Self::Then),
            "ELSE" => Some(Self::Else),
            "END" => Some(Self::End),
            "CAST" => Some(Self::Cast),
            "WITH" => Some(Self::With),
            "WITHOUT" => Some(Self::Without),
            _ => None,
        }
    }

    /// Returns the keyword as an uppercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::View => "VIEW",
            Self::Temporary => "TEMPORARY",
            Self::If => "IF",
            Self::Exists => "EXISTS",
            Self::Or => "OR",
            Self::Replace => "REPLACE",
            Self::As => "AS",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Where => "WHERE",
            Self::Add => "ADD",
            Self::Column => "COLUMN",
            Self::Modify => "MODIFY",
            Self::Change => "CHANGE",
            Self::Rename => "RENAME",
            Self::To => "TO",
            Self::Only => "ONLY",
            Self::Type => "TYPE",
            Self::Set => "SET",
            Self::Data => "DATA",
            Self::Primary => "PRIMARY",
            Self::Key => "KEY",
            Self::Foreign => "FOREIGN",
            Self::References => "REFERENCES",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::Default => "DEFAULT",
            Self::Constraint => "CONSTRAINT",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::No => "NO",
            Self::Action => "ACTION",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::AutoIncrement => "AUTO_INCREMENT",
            Self::Autoincrement => "AUTOINCREMENT",
            Self::Unsigned => "UNSIGNED",
            Self::Comment => "COMMENT",
            Self::Collate => "COLLATE",
            Self::Character => "CHARACTER",
            Self::Charset => "CHARSET",
            Self::First => "FIRST",
            Self::After => "AFTER",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::And => "AND",
            Self::In => "IN",
            Self::Is => "IS",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::With => "WITH",
            Self::Without => "WITHOUT",
        }
    }

    /// Returns true if the keyword can never be used as a bare identifier.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::Create
                | Self::Drop
                | Self::Alter
                | Self::Table
                | Self::Index
                | Self::Primary
                | Self::Foreign
                | Self::References
                | Self::Unique
                | Self::Check
                | Self::Default
                | Self::Constraint
                | Self::Not
                | Self::Null
                | Self::And
                | Self::Or
                | Self::In
                | Self::Is
                | Self::Between
                | Self::Like
                | Self::True
                | Self::False
                | Self::Case
                | Self::When
                | Self::Then
                | Self::Else
                | Self::End
                | Self::As
                | Self::On
                | Self::Using
                | Self::Where
                | Self::Collate
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Float literal (e.g., 3.14)
    Float(f64),
    /// String literal (e.g., 'hello')
    String(String),
    /// Blob literal (e.g., X'1234')
    Blob(Vec<u8>),

    // Identifiers and keywords
    /// Bare identifier (e.g., column_name)
    Identifier(String),
    /// Quoted identifier with quotes removed (e.g., "Column Name")
    QuotedIdentifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,
    /// @
    At,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source text.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("CREATE"), Some(Keyword::Create));
        assert_eq!(Keyword::from_str("create"), Some(Keyword::Create));
        assert_eq!(Keyword::from_str("auto_increment"), Some(Keyword::AutoIncrement));
        assert_eq!(Keyword::from_str("varchar"), None);
    }

    #[test]
    fn test_keyword_as_str_round_trips() {
        for kw in [Keyword::Primary, Keyword::AutoIncrement, Keyword::Autoincrement] {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn test_reserved_keywords() {
        assert!(Keyword::Table.is_reserved());
        assert!(!Keyword::Comment.is_reserved());
        assert!(!Keyword::Key.is_reserved());
    }

    #[test]
    fn test_token_as_keyword() {
        let create = Token::new(TokenKind::Keyword(Keyword::Create), Span::new(0, 6));
        let plus = Token::new(TokenKind::Plus, Span::new(0, 1));
        assert_eq!(create.as_keyword(), Some(Keyword::Create));
        assert_eq!(plus.as_keyword(), None);
        assert!(!create.is_eof());
    }
}
