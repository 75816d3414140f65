//! DDL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};
use crate::Dialect;

/// Characters that always form a token of their own.
fn punctuation(c: char) -> Option<TokenKind> {
    let kind = match c {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        '[' => TokenKind::LeftBracket,
        ']' => TokenKind::RightBracket,
        ',' => TokenKind::Comma,
        ';' => TokenKind::Semicolon,
        '.' => TokenKind::Dot,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '~' => TokenKind::BitNot,
        '&' => TokenKind::BitAnd,
        '@' => TokenKind::At,
        '=' => TokenKind::Eq,
        _ => return None,
    };
    Some(kind)
}

/// A lexer that tokenizes DDL input for one dialect.
///
/// Quoting follows the dialect: MySQL reads `"..."` as a string and
/// decodes backslash escapes, backticks quote identifiers everywhere but
/// PostgreSQL, and `#` starts a comment only in MySQL.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    dialect: Dialect,
    /// Byte offset of the next unread character.
    pos: usize,
    /// Byte offset where the token being scanned starts.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str, dialect: Dialect) -> Self {
        Self {
            input,
            dialect,
            pos: 0,
            start: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn starts_line_comment(&self) -> bool {
        self.rest().starts_with("--")
            || (self.dialect == Dialect::Mysql && self.peek() == Some('#'))
    }

    /// Skips whitespace, `--` and `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            if self.starts_line_comment() {
                self.eat_while(|c| c != '\n');
            } else if self.rest().starts_with("/*") {
                self.pos += 2;
                match self.rest().find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => self.pos = self.input.len(),
                }
            } else {
                return;
            }
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.token(TokenKind::Error(message.into()))
    }

    /// Emits `long` if the next character is `second`, otherwise `short`.
    fn either(&mut self, second: char, long: TokenKind, short: TokenKind) -> Token {
        let kind = if self.eat(second) { long } else { short };
        self.token(kind)
    }

    fn scan_word(&mut self) -> Token {
        self.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.token(TokenKind::Keyword(keyword)),
            None => self.token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Reads the body of a quoted token whose opening `quote` is consumed.
    /// A doubled quote stands for itself.
    fn scan_quoted(&mut self, quote: char, backslash_escapes: bool) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.advance()? {
                c if c == quote => {
                    if !self.eat(quote) {
                        return Some(value);
                    }
                    value.push(quote);
                }
                '\\' if backslash_escapes => value.push(match self.advance()? {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                }),
                c => value.push(c),
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> Token {
        let escapes = self.dialect == Dialect::Mysql;
        match self.scan_quoted(quote, escapes) {
            Some(value) => self.token(TokenKind::String(value)),
            None => self.error("Unterminated string literal"),
        }
    }

    fn scan_quoted_identifier(&mut self, quote: char) -> Token {
        match self.scan_quoted(quote, false) {
            Some(value) => self.token(TokenKind::QuotedIdentifier(value)),
            None => self.error("Unterminated quoted identifier"),
        }
    }

    /// Scans an integer, a decimal or an exponent form. The first digit is
    /// already consumed.
    fn scan_number(&mut self) -> Token {
        self.eat_while(|c| c.is_ascii_digit());
        let mut is_float = false;

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.eat_while(|c| c.is_ascii_digit());
        }

        let exponent = matches!(self.peek(), Some('e' | 'E'))
            && self
                .peek_next()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-');
        if exponent {
            is_float = true;
            self.advance();
            if !self.eat('+') {
                self.eat('-');
            }
            self.eat_while(|c| c.is_ascii_digit());
        }

        let text = &self.input[self.start..self.pos];
        if is_float {
            text.parse::<f64>().map_or_else(
                |e| self.error(format!("Invalid float: {e}")),
                |f| self.token(TokenKind::Float(f)),
            )
        } else {
            text.parse::<i64>().map_or_else(
                |e| self.error(format!("Invalid integer: {e}")),
                |i| self.token(TokenKind::Integer(i)),
            )
        }
    }

    /// Scans the hex digits of `X'...'`; the `X` is already consumed.
    fn scan_blob(&mut self) -> Token {
        self.advance();
        let Some(len) = self.rest().find('\'') else {
            self.pos = self.input.len();
            return self.error("Unterminated blob literal");
        };
        let digits = &self.rest()[..len];
        self.pos += len + 1;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return self.error("Invalid character in blob literal");
        }
        if digits.len() % 2 != 0 {
            return self.error("Odd number of hex digits in blob literal");
        }
        let bytes = (0..digits.len())
            .step_by(2)
            .filter_map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
            .collect();
        self.token(TokenKind::Blob(bytes))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.token(TokenKind::Eof);
        };
        if let Some(kind) = punctuation(c) {
            return self.token(kind);
        }

        match c {
            ':' => self.either(':', TokenKind::DoubleColon, TokenKind::Colon),
            '|' => self.either('|', TokenKind::Concat, TokenKind::BitOr),
            '<' => {
                let kind = if self.eat('=') {
                    TokenKind::LtEq
                } else if self.eat('>') {
                    TokenKind::NotEq
                } else if self.eat('<') {
                    TokenKind::LeftShift
                } else {
                    TokenKind::Lt
                };
                self.token(kind)
            }
            '>' => {
                let kind = if self.eat('=') {
                    TokenKind::GtEq
                } else if self.eat('>') {
                    TokenKind::RightShift
                } else {
                    TokenKind::Gt
                };
                self.token(kind)
            }
            '!' if self.eat('=') => self.token(TokenKind::NotEq),
            '\'' => self.scan_string('\''),
            '"' if self.dialect.double_quote_is_string() => self.scan_string('"'),
            '"' => self.scan_quoted_identifier('"'),
            '`' if self.dialect.accepts_backticks() => self.scan_quoted_identifier('`'),
            'X' | 'x' if self.peek() == Some('\'') => self.scan_blob(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            _ => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with EOF.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input, Dialect::Postgres).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn mysql_kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input, Dialect::Mysql)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("   \n\t  ");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            token_kinds("CREATE -- comment\n/* block */ TABLE"),
            vec![
                TokenKind::Keyword(Keyword::Create),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_hash_comment_in_mysql_only() {
        assert_eq!(
            mysql_kinds("DROP # gone\nTABLE"),
            vec![
                TokenKind::Keyword(Keyword::Drop),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Eof,
            ]
        );
        assert!(matches!(token_kinds("#")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("create TaBlE"),
            vec![
                TokenKind::Keyword(Keyword::Create),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_type_names_are_identifiers() {
        assert_eq!(
            token_kinds("varchar text"),
            vec![
                TokenKind::Identifier("varchar".to_string()),
                TokenKind::Identifier("text".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            token_kinds("\"Column \"\"A\"\"\""),
            vec![
                TokenKind::QuotedIdentifier("Column \"A\"".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            mysql_kinds("`order`"),
            vec![TokenKind::QuotedIdentifier("order".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_double_quotes_are_strings_in_mysql() {
        assert_eq!(
            mysql_kinds("\"hello\""),
            vec![TokenKind::String("hello".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_mysql_backslash_escapes() {
        assert_eq!(
            mysql_kinds(r"'it\'s'"),
            vec![TokenKind::String("it's".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            token_kinds(r"'a\b'"),
            vec![TokenKind::String(r"a\b".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("42 3.5 1e3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(3.5),
                TokenKind::Float(1e3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings_with_escaped_quote() {
        assert_eq!(
            token_kinds("'it''s'"),
            vec![TokenKind::String("it's".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_blob() {
        let tokens = tokenize("X'CAFE'");
        assert!(matches!(&tokens[0].kind, TokenKind::Blob(b) if b == &[0xCA, 0xFE]));
    }

    #[test]
    fn test_cast_operator_and_delimiters() {
        assert_eq!(
            token_kinds("'a'::text[]"),
            vec![
                TokenKind::String("a".to_string()),
                TokenKind::DoubleColon,
                TokenKind::Identifier("text".to_string()),
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(token_kinds("'abc")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("CREATE TABLE");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 12));
    }
}
