//! DDL parser implementation.

use super::error::{ParseError, ParseErrorKind};
use super::pratt::{infix_operator, prefix_operator, Infix};
use crate::ast::{
    AlterColumnChange, AlterTableAction, AlterTableStatement, ColumnConstraint, ColumnDef,
    ColumnPosition, CommentStatement, CommentTarget, CreateIndexStatement, CreateTableStatement,
    CreateViewStatement, DataType, DropIndexStatement, DropStatement, Expr, FunctionCall,
    IndexColumn, Literal, QualifiedName, ReferencesClause, ReferentialAction, SortDirection,
    Statement, StatementKind, TableConstraint, UnaryOp,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::Dialect;

/// Builtins that are written without parentheses.
const NILADIC_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "CURRENT_USER",
    "SESSION_USER",
];

/// DDL parser for one dialect.
pub struct Parser<'a> {
    input: &'a str,
    dialect: Dialect,
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str, dialect: Dialect) -> Self {
        let mut lexer = Lexer::new(input, dialect);
        let current = lexer.next_token();
        Self {
            input,
            dialect,
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
        }
    }

    /// Parses every statement in the input.
    ///
    /// Statements are separated by `;`. Empty statements and a missing final
    /// terminator are accepted.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` for malformed input. Errors of kind
    /// [`ParseErrorKind::Unsupported`] span the whole offending statement.
    pub fn parse_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.current.is_eof() {
                break;
            }

            let start = self.current.span.start;
            let kind = match self.parse_statement() {
                Ok(kind) => kind,
                Err(mut err) => {
                    if err.kind == ParseErrorKind::Unsupported {
                        let end = self.skip_statement();
                        err.span = Span::new(start, end.max(start));
                    }
                    return Err(err);
                }
            };
            let end = self.previous.span.end;

            if !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
                return Err(ParseError::unexpected(
                    "';' or end of input",
                    self.current.kind.clone(),
                    self.current.span,
                ));
            }

            statements.push(Statement {
                kind,
                text: self.input[start..end].trim().to_string(),
                span: Span::new(start, end),
            });
        }
        Ok(statements)
    }

    /// Parses a single statement without its terminator.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a supported DDL statement.
    pub fn parse_statement(&mut self) -> Result<StatementKind, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Keyword(Keyword::Alter) => {
                self.advance();
                if !self.check_keyword(Keyword::Table) {
                    return Err(self.unsupported_here("ALTER statement"));
                }
                self.advance();
                Ok(StatementKind::AlterTable(self.parse_alter_table()?))
            }
            TokenKind::Keyword(Keyword::Drop) => self.parse_drop(),
            TokenKind::Keyword(Keyword::Comment) => self.parse_comment_on(),
            TokenKind::Error(_) => Err(ParseError::unexpected(
                "statement",
                self.current.kind.clone(),
                self.current.span,
            )),
            _ => Err(self.unsupported_here("statement")),
        }
    }

    fn parse_create(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Create)?;

        let mut or_replace = false;
        if self.check_keyword(Keyword::Or) {
            self.advance();
            self.expect_keyword(Keyword::Replace)?;
            or_replace = true;
        }

        // Temporary objects are not part of a persistent schema.
        if self.check_keyword(Keyword::Temporary) || self.is_word("TEMP") {
            return Err(self.unsupported_here("temporary object"));
        }

        // MySQL view prefixes: ALGORITHM=..., DEFINER=user@host, SQL SECURITY ...
        while self.is_word("ALGORITHM") || self.is_word("DEFINER") || self.is_word("SQL") {
            if self.is_word("SQL") {
                self.advance();
                self.expect_word("SECURITY")?;
                self.advance();
                self.parse_word("DEFINER or INVOKER")?;
                continue;
            }
            self.advance();
            self.expect(&TokenKind::Eq)?;
            while !self.check_keyword(Keyword::View)
                && !self.is_word("SQL")
                && !self.is_word("ALGORITHM")
                && !self.is_word("DEFINER")
                && !self.current.is_eof()
            {
                self.advance();
            }
        }

        match &self.current.kind {
            TokenKind::Keyword(Keyword::Table) if !or_replace => {
                self.advance();
                Ok(StatementKind::CreateTable(self.parse_create_table()?))
            }
            TokenKind::Keyword(Keyword::Unique | Keyword::Index) if !or_replace => {
                Ok(StatementKind::CreateIndex(self.parse_create_index()?))
            }
            TokenKind::Keyword(Keyword::View) => {
                self.advance();
                Ok(StatementKind::CreateView(self.parse_create_view(or_replace)?))
            }
            _ => Err(self.unsupported_here("CREATE statement")),
        }
    }

    /// Parses the remainder of CREATE TABLE after the TABLE keyword.
    fn parse_create_table(&mut self) -> Result<CreateTableStatement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;

        if self.check_keyword(Keyword::As) || self.is_word("LIKE") {
            return Err(self.unsupported_here("CREATE TABLE without column list"));
        }

        self.expect(&TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        loop {
            if self.starts_table_constraint() {
                constraints.push(self.parse_table_constraint()?);
            } else {
                columns.push(self.parse_column_def()?);
            }
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;

        let options = self.parse_table_options()?;

        Ok(CreateTableStatement {
            name,
            if_not_exists,
            columns,
            constraints,
            options,
        })
    }

    /// Returns true if the current token opens a table-level constraint.
    fn starts_table_constraint(&self) -> bool {
        match &self.current.kind {
            TokenKind::Keyword(
                Keyword::Constraint
                | Keyword::Primary
                | Keyword::Unique
                | Keyword::Foreign
                | Keyword::Check,
            ) => true,
            TokenKind::Keyword(Keyword::Key | Keyword::Index) => self.dialect == Dialect::Mysql,
            TokenKind::Identifier(word) => {
                self.dialect == Dialect::Mysql
                    && (word.eq_ignore_ascii_case("FULLTEXT")
                        || word.eq_ignore_ascii_case("SPATIAL"))
            }
            _ => false,
        }
    }

    /// Parses a table-level constraint or MySQL key definition.
    fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        let mut name = None;
        if self.check_keyword(Keyword::Constraint) {
            self.advance();
            if !self.check_keyword(Keyword::Primary)
                && !self.check_keyword(Keyword::Unique)
                && !self.check_keyword(Keyword::Foreign)
                && !self.check_keyword(Keyword::Check)
            {
                name = Some(self.parse_name()?);
            }
        }

        match &self.current.kind {
            TokenKind::Keyword(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                self.parse_optional_index_method()?;
                let columns = self.parse_index_columns()?;
                self.parse_optional_index_method()?;
                Ok(TableConstraint::PrimaryKey { name, columns })
            }
            TokenKind::Keyword(Keyword::Unique) => {
                self.advance();
                if self.check_keyword(Keyword::Key) || self.check_keyword(Keyword::Index) {
                    self.advance();
                }
                if name.is_none()
                    && !self.check(&TokenKind::LeftParen)
                    && !self.check_keyword(Keyword::Using)
                {
                    name = Some(self.parse_name()?);
                }
                let before = self.parse_optional_index_method()?;
                let columns = self.parse_index_columns()?;
                let method = self.parse_optional_index_method()?.or(before);
                Ok(TableConstraint::Unique {
                    name,
                    columns,
                    method,
                })
            }
            TokenKind::Keyword(Keyword::Key | Keyword::Index) => {
                self.advance();
                if !self.check(&TokenKind::LeftParen) && !self.check_keyword(Keyword::Using) {
                    name = Some(self.parse_name()?);
                }
                let before = self.parse_optional_index_method()?;
                let columns = self.parse_index_columns()?;
                let method = self.parse_optional_index_method()?.or(before);
                Ok(TableConstraint::Index {
                    name,
                    columns,
                    method,
                })
            }
            TokenKind::Keyword(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                if name.is_none() && !self.check(&TokenKind::LeftParen) {
                    name = Some(self.parse_name()?);
                }
                let columns = self.parse_name_list()?;
                let references = self.parse_references()?;
                Ok(TableConstraint::ForeignKey {
                    name,
                    columns,
                    references,
                })
            }
            TokenKind::Keyword(Keyword::Check) => {
                self.advance();
                let expr = self.parse_parenthesized_expression()?;
                Ok(TableConstraint::Check { name, expr })
            }
            TokenKind::Identifier(_) => Err(self.unsupported_here("index kind")),
            _ => Err(ParseError::unexpected(
                "PRIMARY KEY, UNIQUE, FOREIGN KEY, or CHECK",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    /// Parses `USING method` if present and returns the method upper-cased.
    fn parse_optional_index_method(&mut self) -> Result<Option<String>, ParseError> {
        if !self.check_keyword(Keyword::Using) {
            return Ok(None);
        }
        self.advance();
        let method = self.parse_word("index method")?;
        Ok(Some(method.to_ascii_uppercase()))
    }

    /// Parses a column definition.
    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.parse_name()?;
        let data_type = self.parse_data_type()?;
        let mut constraints = Vec::new();

        loop {
            let mut constraint_name = None;
            if self.check_keyword(Keyword::Constraint) {
                self.advance();
                constraint_name = Some(self.parse_name()?);
            }

            let constraint = match &self.current.kind {
                TokenKind::Keyword(Keyword::Not) => {
                    self.advance();
                    self.expect_keyword(Keyword::Null)?;
                    ColumnConstraint::NotNull
                }
                TokenKind::Keyword(Keyword::Null) => {
                    self.advance();
                    ColumnConstraint::Null
                }
                TokenKind::Keyword(Keyword::Default) => {
                    self.advance();
                    ColumnConstraint::Default(self.parse_expression(0)?)
                }
                TokenKind::Keyword(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    if self.check_keyword(Keyword::Asc) || self.check_keyword(Keyword::Desc) {
                        self.advance();
                    }
                    ColumnConstraint::PrimaryKey {
                        name: constraint_name.take(),
                    }
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    self.advance();
                    if self.check_keyword(Keyword::Key) {
                        self.advance();
                    }
                    ColumnConstraint::Unique {
                        name: constraint_name.take(),
                    }
                }
                TokenKind::Keyword(Keyword::AutoIncrement | Keyword::Autoincrement) => {
                    self.advance();
                    ColumnConstraint::AutoIncrement
                }
                TokenKind::Keyword(Keyword::References) => ColumnConstraint::References {
                    name: constraint_name.take(),
                    clause: self.parse_references()?,
                },
                TokenKind::Keyword(Keyword::Check) => {
                    self.advance();
                    ColumnConstraint::Check {
                        name: constraint_name.take(),
                        expr: self.parse_parenthesized_expression()?,
                    }
                }
                TokenKind::Keyword(Keyword::Comment) => {
                    self.advance();
                    ColumnConstraint::Comment(self.expect_string()?)
                }
                TokenKind::Keyword(Keyword::Collate) => {
                    self.advance();
                    ColumnConstraint::Collate(self.parse_option_value()?)
                }
                TokenKind::Keyword(Keyword::Character) => {
                    self.advance();
                    self.expect_keyword(Keyword::Set)?;
                    ColumnConstraint::CharacterSet(self.parse_option_value()?)
                }
                TokenKind::Keyword(Keyword::Charset) => {
                    self.advance();
                    ColumnConstraint::CharacterSet(self.parse_option_value()?)
                }
                TokenKind::Keyword(Keyword::On) => {
                    self.advance();
                    self.expect_keyword(Keyword::Update)?;
                    ColumnConstraint::OnUpdate(self.parse_expression(0)?)
                }
                TokenKind::Identifier(word)
                    if word.eq_ignore_ascii_case("GENERATED")
                        || word.eq_ignore_ascii_case("AS")
                        || word.eq_ignore_ascii_case("VIRTUAL") =>
                {
                    return Err(self.unsupported_here("generated column"));
                }
                _ => {
                    if constraint_name.is_some() {
                        return Err(ParseError::unexpected(
                            "constraint",
                            self.current.kind.clone(),
                            self.current.span,
                        ));
                    }
                    break;
                }
            };
            constraints.push(constraint);
        }

        Ok(ColumnDef {
            name,
            data_type,
            constraints,
        })
    }

    /// Parses `REFERENCES table [(cols)] [ON DELETE action] [ON UPDATE action]`.
    fn parse_references(&mut self) -> Result<ReferencesClause, ParseError> {
        self.expect_keyword(Keyword::References)?;
        let table = self.parse_qualified_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_name_list()?
        } else {
            Vec::new()
        };

        let mut on_delete = None;
        let mut on_update = None;
        while self.check_keyword(Keyword::On) {
            let lookahead = self.peek_kind();
            if lookahead == TokenKind::Keyword(Keyword::Delete) {
                self.advance();
                self.advance();
                on_delete = Some(self.parse_referential_action()?);
            } else if lookahead == TokenKind::Keyword(Keyword::Update) {
                self.advance();
                self.advance();
                on_update = Some(self.parse_referential_action()?);
            } else {
                break;
            }
        }

        Ok(ReferencesClause {
            table,
            columns,
            on_delete,
            on_update,
        })
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, ParseError> {
        let action = match &self.current.kind {
            TokenKind::Keyword(Keyword::Cascade) => ReferentialAction::Cascade,
            TokenKind::Keyword(Keyword::Restrict) => ReferentialAction::Restrict,
            TokenKind::Keyword(Keyword::Set) => {
                self.advance();
                if self.check_keyword(Keyword::Null) {
                    ReferentialAction::SetNull
                } else if self.check_keyword(Keyword::Default) {
                    ReferentialAction::SetDefault
                } else {
                    return Err(ParseError::unexpected(
                        "NULL or DEFAULT",
                        self.current.kind.clone(),
                        self.current.span,
                    ));
                }
            }
            TokenKind::Keyword(Keyword::No) => {
                self.advance();
                if !self.check_keyword(Keyword::Action) {
                    return Err(ParseError::unexpected(
                        "ACTION",
                        self.current.kind.clone(),
                        self.current.span,
                    ));
                }
                ReferentialAction::NoAction
            }
            _ => {
                return Err(ParseError::unexpected(
                    "referential action",
                    self.current.kind.clone(),
                    self.current.span,
                ))
            }
        };
        self.advance();
        Ok(action)
    }

    /// Parses table options after the closing parenthesis of CREATE TABLE.
    fn parse_table_options(&mut self) -> Result<Vec<(String, String)>, ParseError> {
        let mut options = Vec::new();
        while !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            if self.check_keyword(Keyword::Default) {
                self.advance();
            }
            if self.is_word("PARTITION")
                || self.is_word("INHERITS")
                || self.check_keyword(Keyword::With)
            {
                return Err(self.unsupported_here("table option"));
            }

            let key = match &self.current.kind {
                TokenKind::Keyword(Keyword::Character) => {
                    self.advance();
                    self.expect_keyword(Keyword::Set)?;
                    "CHARSET".to_string()
                }
                TokenKind::Keyword(Keyword::Without) => {
                    self.advance();
                    self.expect_word("ROWID")?;
                    self.advance();
                    options.push(("WITHOUT ROWID".to_string(), String::new()));
                    continue;
                }
                _ => {
                    let key = self.parse_word("table option")?.to_ascii_uppercase();
                    if key == "STRICT" {
                        options.push((key, String::new()));
                        continue;
                    }
                    key
                }
            };
            if self.check(&TokenKind::Eq) {
                self.advance();
            }
            let value = match &self.current.kind {
                TokenKind::String(s) => {
                    let quoted = format!("'{}'", s.replace('\'', "''"));
                    self.advance();
                    quoted
                }
                TokenKind::Integer(n) => {
                    let n = n.to_string();
                    self.advance();
                    n
                }
                _ => self.parse_word("option value")?,
            };
            options.push((key, value));
        }
        Ok(options)
    }

    /// Parses the remainder of ALTER TABLE after the TABLE keyword.
    fn parse_alter_table(&mut self) -> Result<AlterTableStatement, ParseError> {
        if self.check_keyword(Keyword::If) {
            self.advance();
            self.expect_keyword(Keyword::Exists)?;
        }
        if self.check_keyword(Keyword::Only) {
            self.advance();
        }
        let name = self.parse_qualified_name()?;

        let mut actions = vec![self.parse_alter_action()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            actions.push(self.parse_alter_action()?);
        }

        Ok(AlterTableStatement { name, actions })
    }

    fn parse_alter_action(&mut self) -> Result<AlterTableAction, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Add) => {
                self.advance();
                if matches!(
                    self.current.kind,
                    TokenKind::Keyword(
                        Keyword::Constraint
                            | Keyword::Primary
                            | Keyword::Unique
                            | Keyword::Foreign
                            | Keyword::Check
                            | Keyword::Key
                            | Keyword::Index
                    )
                ) {
                    return Ok(AlterTableAction::AddConstraint(self.parse_table_constraint()?));
                }
                if self.check_keyword(Keyword::Column) {
                    self.advance();
                }
                if self.check_keyword(Keyword::If) {
                    return Err(self.unsupported_here("ADD COLUMN IF NOT EXISTS"));
                }
                let column = self.parse_column_def()?;
                let position = self.parse_column_position()?;
                Ok(AlterTableAction::AddColumn { column, position })
            }
            TokenKind::Keyword(Keyword::Drop) => {
                self.advance();
                self.parse_alter_drop()
            }
            TokenKind::Keyword(Keyword::Modify) => {
                self.advance();
                if self.check_keyword(Keyword::Column) {
                    self.advance();
                }
                let column = self.parse_column_def()?;
                let position = self.parse_column_position()?;
                Ok(AlterTableAction::ModifyColumn {
                    old_name: column.name.clone(),
                    column,
                    position,
                })
            }
            TokenKind::Keyword(Keyword::Change) => {
                self.advance();
                if self.check_keyword(Keyword::Column) {
                    self.advance();
                }
                let old_name = self.parse_name()?;
                let column = self.parse_column_def()?;
                let position = self.parse_column_position()?;
                Ok(AlterTableAction::ModifyColumn {
                    old_name,
                    column,
                    position,
                })
            }
            TokenKind::Keyword(Keyword::Alter) => {
                self.advance();
                if self.check_keyword(Keyword::Column) {
                    self.advance();
                }
                let name = self.parse_name()?;
                let change = self.parse_alter_column_change()?;
                Ok(AlterTableAction::AlterColumn { name, change })
            }
            TokenKind::Keyword(Keyword::Rename) => {
                self.advance();
                self.parse_alter_rename()
            }
            _ => Err(self.unsupported_here("ALTER TABLE action")),
        }
    }

    fn parse_alter_drop(&mut self) -> Result<AlterTableAction, ParseError> {
        let action = match &self.current.kind {
            TokenKind::Keyword(Keyword::Constraint) => {
                self.advance();
                self.parse_if_exists()?;
                AlterTableAction::DropConstraint {
                    name: self.parse_name()?,
                }
            }
            TokenKind::Keyword(Keyword::Index | Keyword::Key) => {
                self.advance();
                AlterTableAction::DropIndex {
                    name: self.parse_name()?,
                }
            }
            TokenKind::Keyword(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                AlterTableAction::DropForeignKey {
                    name: self.parse_name()?,
                }
            }
            TokenKind::Keyword(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                AlterTableAction::DropPrimaryKey
            }
            TokenKind::Keyword(Keyword::Check) => {
                self.advance();
                AlterTableAction::DropCheck {
                    name: self.parse_name()?,
                }
            }
            _ => {
                if self.check_keyword(Keyword::Column) {
                    self.advance();
                }
                let if_exists = self.parse_if_exists()?;
                AlterTableAction::DropColumn {
                    name: self.parse_name()?,
                    if_exists,
                }
            }
        };
        if self.check_keyword(Keyword::Cascade) || self.check_keyword(Keyword::Restrict) {
            self.advance();
        }
        Ok(action)
    }

    fn parse_alter_column_change(&mut self) -> Result<AlterColumnChange, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Type) => {
                self.advance();
                self.parse_set_type()
            }
            TokenKind::Keyword(Keyword::Set) => {
                self.advance();
                match &self.current.kind {
                    TokenKind::Keyword(Keyword::Not) => {
                        self.advance();
                        self.expect_keyword(Keyword::Null)?;
                        Ok(AlterColumnChange::SetNotNull)
                    }
                    TokenKind::Keyword(Keyword::Default) => {
                        self.advance();
                        Ok(AlterColumnChange::SetDefault(self.parse_expression(0)?))
                    }
                    TokenKind::Keyword(Keyword::Data) => {
                        self.advance();
                        self.expect_keyword(Keyword::Type)?;
                        self.parse_set_type()
                    }
                    _ => Err(self.unsupported_here("ALTER COLUMN SET")),
                }
            }
            TokenKind::Keyword(Keyword::Drop) => {
                self.advance();
                match &self.current.kind {
                    TokenKind::Keyword(Keyword::Not) => {
                        self.advance();
                        self.expect_keyword(Keyword::Null)?;
                        Ok(AlterColumnChange::DropNotNull)
                    }
                    TokenKind::Keyword(Keyword::Default) => {
                        self.advance();
                        Ok(AlterColumnChange::DropDefault)
                    }
                    _ => Err(self.unsupported_here("ALTER COLUMN DROP")),
                }
            }
            _ => Err(self.unsupported_here("ALTER COLUMN action")),
        }
    }

    /// Parses `type [COLLATE c] [USING expr]`. The USING expression only
    /// affects data and is skipped.
    fn parse_set_type(&mut self) -> Result<AlterColumnChange, ParseError> {
        let data_type = self.parse_data_type()?;
        let collation = if self.check_keyword(Keyword::Collate) {
            self.advance();
            Some(self.parse_option_value()?)
        } else {
            None
        };
        if self.check_keyword(Keyword::Using) {
            self.advance();
            self.parse_expression(0)?;
        }
        Ok(AlterColumnChange::SetType {
            data_type,
            collation,
        })
    }

    fn parse_alter_rename(&mut self) -> Result<AlterTableAction, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::To | Keyword::As) => {
                self.advance();
                Ok(AlterTableAction::RenameTable {
                    to: self.parse_qualified_name()?,
                })
            }
            TokenKind::Keyword(Keyword::Index | Keyword::Key | Keyword::Constraint) => {
                Err(self.unsupported_here("RENAME INDEX"))
            }
            _ => {
                if self.check_keyword(Keyword::Column) {
                    self.advance();
                }
                let from = self.parse_name()?;
                self.expect_keyword(Keyword::To)?;
                let to = self.parse_name()?;
                Ok(AlterTableAction::RenameColumn { from, to })
            }
        }
    }

    fn parse_column_position(&mut self) -> Result<ColumnPosition, ParseError> {
        if self.check_keyword(Keyword::First) {
            self.advance();
            Ok(ColumnPosition::First)
        } else if self.check_keyword(Keyword::After) {
            self.advance();
            Ok(ColumnPosition::After(self.parse_name()?))
        } else {
            Ok(ColumnPosition::Last)
        }
    }

    /// Parses CREATE [UNIQUE] INDEX starting at UNIQUE or INDEX.
    fn parse_create_index(&mut self) -> Result<CreateIndexStatement, ParseError> {
        let unique = if self.check_keyword(Keyword::Unique) {
            self.advance();
            true
        } else {
            false
        };
        self.expect_keyword(Keyword::Index)?;
        if self.is_word("CONCURRENTLY") {
            self.advance();
        }
        let if_not_exists = self.parse_if_not_exists()?;
        if self.check_keyword(Keyword::On) {
            return Err(self.unsupported_here("unnamed index"));
        }
        let name = self.parse_qualified_name()?.name;

        let mut method = self.parse_optional_index_method()?;
        self.expect_keyword(Keyword::On)?;
        if self.check_keyword(Keyword::Only) {
            self.advance();
        }
        let table = self.parse_qualified_name()?;
        if method.is_none() {
            method = self.parse_optional_index_method()?;
        }
        let columns = self.parse_index_columns()?;
        if let Some(after) = self.parse_optional_index_method()? {
            method = Some(after);
        }
        if self.is_word("INCLUDE") || self.check_keyword(Keyword::With) {
            return Err(self.unsupported_here("index option"));
        }

        let condition = if self.check_keyword(Keyword::Where) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(CreateIndexStatement {
            name,
            table,
            unique,
            if_not_exists,
            method,
            columns,
            condition,
        })
    }

    /// Parses `(col [(len)] [ASC|DESC], ...)`.
    fn parse_index_columns(&mut self) -> Result<Vec<IndexColumn>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            if self.check(&TokenKind::LeftParen) {
                return Err(self.unsupported_here("expression index"));
            }
            let mut column = IndexColumn::new(self.parse_name()?);
            if self.check(&TokenKind::LeftParen) {
                let start = self.current.span;
                self.advance();
                match self.current.kind {
                    TokenKind::Integer(n) if n >= 0 => {
                        column.length = u32::try_from(n).ok();
                        self.advance();
                        self.expect(&TokenKind::RightParen)?;
                    }
                    _ => return Err(ParseError::unsupported("expression index", start)),
                }
            }
            if self.check_keyword(Keyword::Asc) {
                self.advance();
                column.direction = Some(SortDirection::Asc);
            } else if self.check_keyword(Keyword::Desc) {
                self.advance();
                column.direction = Some(SortDirection::Desc);
            }
            columns.push(column);

            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(columns)
    }

    /// Parses the remainder of CREATE VIEW after the VIEW keyword.
    fn parse_create_view(&mut self, or_replace: bool) -> Result<CreateViewStatement, ParseError> {
        let name = self.parse_qualified_name()?;
        if self.check(&TokenKind::LeftParen) {
            return Err(self.unsupported_here("view column list"));
        }
        self.expect_keyword(Keyword::As)?;

        let mut parts = Vec::new();
        let mut depth = 0usize;
        while !self.current.is_eof() && !(depth == 0 && self.check(&TokenKind::Semicolon)) {
            match self.current.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                TokenKind::Error(_) => {
                    return Err(ParseError::unexpected(
                        "view query",
                        self.current.kind.clone(),
                        self.current.span,
                    ))
                }
                _ => {}
            }
            parts.push(&self.input[self.current.span.start..self.current.span.end]);
            self.advance();
        }
        if parts.is_empty() {
            return Err(ParseError::unexpected_eof("view query", self.current.span));
        }

        Ok(CreateViewStatement {
            name,
            or_replace,
            definition: parts.join(" "),
        })
    }

    fn parse_drop(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Drop)?;
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Table) => {
                self.advance();
                Ok(StatementKind::DropTable(self.parse_drop_names()?))
            }
            TokenKind::Keyword(Keyword::View) => {
                self.advance();
                Ok(StatementKind::DropView(self.parse_drop_names()?))
            }
            TokenKind::Keyword(Keyword::Index) => {
                self.advance();
                if self.is_word("CONCURRENTLY") {
                    self.advance();
                }
                let if_exists = self.parse_if_exists()?;
                let name = self.parse_qualified_name()?.name;
                let table = if self.check_keyword(Keyword::On) {
                    self.advance();
                    Some(self.parse_qualified_name()?)
                } else {
                    None
                };
                if self.check_keyword(Keyword::Cascade) || self.check_keyword(Keyword::Restrict) {
                    self.advance();
                }
                Ok(StatementKind::DropIndex(DropIndexStatement {
                    name,
                    table,
                    if_exists,
                }))
            }
            _ => Err(self.unsupported_here("DROP statement")),
        }
    }

    fn parse_drop_names(&mut self) -> Result<DropStatement, ParseError> {
        let if_exists = self.parse_if_exists()?;
        let mut names = vec![self.parse_qualified_name()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            names.push(self.parse_qualified_name()?);
        }
        if self.check_keyword(Keyword::Cascade) || self.check_keyword(Keyword::Restrict) {
            self.advance();
        }
        Ok(DropStatement { names, if_exists })
    }

    fn parse_comment_on(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Comment)?;
        self.expect_keyword(Keyword::On)?;

        let target = match &self.current.kind {
            TokenKind::Keyword(Keyword::Table) => {
                self.advance();
                CommentTarget::Table(self.parse_qualified_name()?)
            }
            TokenKind::Keyword(Keyword::Column) => {
                self.advance();
                let mut parts = vec![self.parse_name()?];
                while self.check(&TokenKind::Dot) {
                    self.advance();
                    parts.push(self.parse_name()?);
                }
                let column = parts.pop().unwrap_or_default();
                let table = match parts.len() {
                    1 => QualifiedName::new(parts.remove(0)),
                    2 => {
                        let table = parts.remove(1);
                        self.qualify(Some(parts.remove(0)), table)
                    }
                    _ => {
                        return Err(ParseError::new(
                            "COMMENT ON COLUMN needs table.column",
                            self.previous.span,
                        ))
                    }
                };
                CommentTarget::Column { table, column }
            }
            _ => return Err(self.unsupported_here("COMMENT ON target")),
        };

        self.expect_keyword(Keyword::Is)?;
        let comment = if self.check_keyword(Keyword::Null) {
            self.advance();
            None
        } else {
            Some(self.expect_string()?)
        };
        Ok(StatementKind::Comment(CommentStatement { target, comment }))
    }

    // --- Data types ---

    /// Parses a data type.
    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let first = self.parse_word("data type")?.to_ascii_lowercase();
        let mut data_type = DataType::new(first);

        if data_type.name == "double" && self.is_word("PRECISION") {
            self.advance();
            data_type.name = "double precision".to_string();
        } else if matches!(data_type.name.as_str(), "character" | "char" | "bit")
            && self.is_word("VARYING")
        {
            self.advance();
            data_type.name = format!("{} varying", data_type.name);
        }

        if self.check(&TokenKind::LeftParen) {
            self.advance();
            loop {
                let param = match &self.current.kind {
                    TokenKind::Integer(n) => n.to_string(),
                    TokenKind::String(s) => format!("'{}'", s.replace('\'', "''")),
                    TokenKind::Identifier(word) => word.to_ascii_lowercase(),
                    _ => {
                        return Err(ParseError::unexpected(
                            "type parameter",
                            self.current.kind.clone(),
                            self.current.span,
                        ))
                    }
                };
                self.advance();
                data_type.params.push(param);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }

        if matches!(data_type.name.as_str(), "timestamp" | "time")
            && (self.check_keyword(Keyword::With) || self.check_keyword(Keyword::Without))
        {
            let with = self.check_keyword(Keyword::With);
            self.advance();
            self.expect_word("TIME")?;
            self.advance();
            self.expect_word("ZONE")?;
            self.advance();
            data_type.suffix = Some(
                if with {
                    "with time zone"
                } else {
                    "without time zone"
                }
                .to_string(),
            );
        }

        if self.check_keyword(Keyword::Unsigned) {
            self.advance();
            data_type.unsigned = true;
        }

        if self.check(&TokenKind::LeftBracket) {
            self.advance();
            self.expect(&TokenKind::RightBracket)?;
            data_type.array = true;
        }

        Ok(data_type)
    }

    // --- Expressions ---

    /// Parses `( expr )` and returns the inner expression.
    fn parse_parenthesized_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(expr)
    }

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some(infix) = infix_operator(&self.current.kind) {
            let (l_bp, r_bp) = infix.binding_power();
            if l_bp < min_bp {
                break;
            }

            match infix {
                Infix::Cast => {
                    self.advance();
                    let data_type = self.parse_data_type()?;
                    lhs = Expr::TypeCast {
                        expr: Box::new(lhs),
                        data_type,
                    };
                }
                Infix::IsNull => {
                    self.advance();
                    let negated = if self.check_keyword(Keyword::Not) {
                        self.advance();
                        true
                    } else {
                        false
                    };
                    self.expect_keyword(Keyword::Null)?;
                    lhs = Expr::IsNull {
                        expr: Box::new(lhs),
                        negated,
                    };
                }
                Infix::Not => {
                    let next = self.peek_kind();
                    if !matches!(
                        next,
                        TokenKind::Keyword(Keyword::In | Keyword::Between | Keyword::Like)
                    ) {
                        break;
                    }
                    self.advance();
                    lhs = self.parse_negatable_infix(lhs, r_bp, true)?;
                }
                Infix::Predicate => {
                    lhs = self.parse_negatable_infix(lhs, r_bp, false)?;
                }
                Infix::Binary(op) => {
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    lhs = lhs.binary(op, rhs);
                }
            }
        }

        Ok(lhs)
    }

    /// Parses IN, BETWEEN, or LIKE with the current token at the keyword.
    fn parse_negatable_infix(
        &mut self,
        lhs: Expr,
        r_bp: u8,
        negated: bool,
    ) -> Result<Expr, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::In) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let list = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::In {
                    expr: Box::new(lhs),
                    list,
                    negated,
                })
            }
            TokenKind::Keyword(Keyword::Between) => {
                self.advance();
                let low = self.parse_expression(r_bp)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_expression(r_bp)?;
                Ok(Expr::Between {
                    expr: Box::new(lhs),
                    low: Box::new(low),
                    high: Box::new(high),
                    negated,
                })
            }
            _ => {
                self.expect_keyword(Keyword::Like)?;
                let rhs = self.parse_expression(r_bp)?;
                let like = lhs.binary(crate::ast::BinaryOp::Like, rhs);
                Ok(if negated {
                    Expr::Unary {
                        op: UnaryOp::Not,
                        operand: Box::new(like),
                    }
                } else {
                    like
                })
            }
        }
    }

    /// Parses a prefix expression.
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if let Some((op, bp)) = prefix_operator(&self.current.kind) {
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(match op {
                Some(op) => Expr::Unary {
                    op,
                    operand: Box::new(operand),
                },
                None => operand,
            });
        }

        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();

        match &token.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Integer(*n)))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(Expr::Literal(Literal::Float(*f)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(s.clone())))
            }
            TokenKind::Blob(b) => {
                self.advance();
                Ok(Expr::Literal(Literal::Blob(b.clone())))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }

            TokenKind::LeftParen => {
                self.advance();
                if self.is_word("SELECT") {
                    return Err(self.unsupported_here("subquery"));
                }
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::Paren(Box::new(expr)))
            }

            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => {
                self.advance();
                self.parse_cast_expression()
            }

            TokenKind::QuotedIdentifier(_) | TokenKind::Identifier(_) | TokenKind::Keyword(_) => {
                let quoted = matches!(token.kind, TokenKind::QuotedIdentifier(_));
                let raw = self.token_text(&token).to_string();
                let name = self.parse_name()?;

                if !quoted && self.check(&TokenKind::LeftParen) {
                    return self.parse_function_call(raw.to_ascii_uppercase());
                }

                if self.check(&TokenKind::Dot) {
                    self.advance();
                    let column = self.parse_name()?;
                    return Ok(Expr::Column {
                        table: Some(name),
                        name: column,
                    });
                }

                let upper = raw.to_ascii_uppercase();
                if !quoted && NILADIC_FUNCTIONS.contains(&upper.as_str()) {
                    return Ok(Expr::Niladic(upper));
                }

                Ok(Expr::Column { table: None, name })
            }

            _ => Err(ParseError::unexpected(
                "expression",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    /// Parses a function call's argument list.
    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else {
            self.parse_expression_list()?
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Function(FunctionCall { name, args }))
    }

    /// Parses a CAST expression after the CAST keyword.
    fn parse_cast_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
        })
    }

    /// Parses a CASE expression.
    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;

        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        let mut when_clauses = vec![];
        while self.check_keyword(Keyword::When) {
            self.advance();
            let when_expr = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then_expr = self.parse_expression(0)?;
            when_clauses.push((when_expr, then_expr));
        }

        let else_clause = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    /// Parses a comma-separated list of expressions.
    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expression(0)?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            exprs.push(self.parse_expression(0)?);
        }
        Ok(exprs)
    }

    // --- Names ---

    /// Parses an identifier, folding unquoted names where the dialect does.
    fn parse_name(&mut self) -> Result<String, ParseError> {
        let name = match &self.current.kind {
            TokenKind::QuotedIdentifier(name) => name.clone(),
            TokenKind::Identifier(name) => self.fold(name),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                let text = self.token_text(&self.current).to_string();
                self.fold(&text)
            }
            _ => {
                return Err(ParseError::unexpected(
                    "identifier",
                    self.current.kind.clone(),
                    self.current.span,
                ))
            }
        };
        self.advance();
        Ok(name)
    }

    /// Parses `name` or `schema.name`, dropping the dialect's default schema.
    fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let first = self.parse_name()?;
        if self.check(&TokenKind::Dot) {
            self.advance();
            let name = self.parse_name()?;
            Ok(self.qualify(Some(first), name))
        } else {
            Ok(QualifiedName::new(first))
        }
    }

    fn qualify(&self, schema: Option<String>, name: String) -> QualifiedName {
        match schema {
            Some(schema) if Some(schema.as_str()) != self.dialect.default_schema() => {
                QualifiedName::qualified(schema, name)
            }
            _ => QualifiedName::new(name),
        }
    }

    /// Parses `(a, b, ...)`.
    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut names = vec![self.parse_name()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            names.push(self.parse_name()?);
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(names)
    }

    /// Parses any bare word (identifier or keyword) and returns its text.
    fn parse_word(&mut self, expected: &str) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(_) | TokenKind::Keyword(_) | TokenKind::QuotedIdentifier(_) => {
                let text = match &self.current.kind {
                    TokenKind::QuotedIdentifier(name) => name.clone(),
                    _ => self.token_text(&self.current).to_string(),
                };
                self.advance();
                Ok(text)
            }
            _ => Err(ParseError::unexpected(
                expected,
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    /// Parses the value of COLLATE or CHARACTER SET.
    fn parse_option_value(&mut self) -> Result<String, ParseError> {
        if let TokenKind::String(s) = &self.current.kind {
            let value = s.clone();
            self.advance();
            return Ok(value);
        }
        self.parse_word("name")
    }

    fn fold(&self, name: &str) -> String {
        if self.dialect.folds_identifiers() {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.check_keyword(Keyword::If) {
            self.advance();
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool, ParseError> {
        if self.check_keyword(Keyword::If) {
            self.advance();
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // --- Helper methods ---

    /// Advances to the next token.
    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Returns the kind of the token after the current one.
    fn peek_kind(&self) -> TokenKind {
        self.lexer.clone().next_token().kind
    }

    /// Skips to the end of the current statement and returns its end offset.
    fn skip_statement(&mut self) -> usize {
        let mut depth = 0usize;
        let mut end = self.previous.span.end;
        while !self.current.is_eof() && !(depth == 0 && self.check(&TokenKind::Semicolon)) {
            match self.current.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            end = self.current.span.end;
            self.advance();
        }
        end
    }

    fn token_text(&self, token: &Token) -> &'a str {
        &self.input[token.span.start..token.span.end]
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Checks if the current token is a bare word with the given text.
    fn is_word(&self, word: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(_) | TokenKind::Keyword(_))
            && self.token_text(&self.current).eq_ignore_ascii_case(word)
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                format!("{kind:?}"),
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                keyword.as_str(),
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    /// Expects the current token to be the given bare word, without consuming it.
    fn expect_word(&self, word: &str) -> Result<(), ParseError> {
        if self.is_word(word) {
            Ok(())
        } else {
            Err(ParseError::unexpected(
                word,
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    /// Expects and returns a string literal.
    fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::String(s) => {
                let value = s.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(ParseError::unexpected(
                "string literal",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    fn unsupported_here(&self, what: &str) -> ParseError {
        if let TokenKind::Error(_) = self.current.kind {
            return ParseError::unexpected(what, self.current.kind.clone(), self.current.span);
        }
        ParseError::unsupported(what, self.current.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    fn parse(sql: &str) -> Result<Vec<Statement>, ParseError> {
        Parser::new(sql, Dialect::Mysql).parse_statements()
    }

    fn parse_pg(sql: &str) -> Result<Vec<Statement>, ParseError> {
        Parser::new(sql, Dialect::Postgres).parse_statements()
    }

    fn create_table(stmt: &Statement) -> &CreateTableStatement {
        match &stmt.kind {
            StatementKind::CreateTable(create) => create,
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn test_create_table_columns() {
        let stmts = parse("CREATE TABLE users (id bigint NOT NULL, name varchar(100))").unwrap();
        assert_eq!(stmts.len(), 1);
        let create = create_table(&stmts[0]);
        assert_eq!(create.name, QualifiedName::new("users"));
        assert_eq!(create.columns.len(), 2);
        assert_eq!(create.columns[1].data_type.to_string(), "varchar(100)");
        assert_eq!(create.columns[0].constraints, vec![ColumnConstraint::NotNull]);
    }

    #[test]
    fn test_statement_text_and_terminators() {
        let stmts = parse(";; CREATE TABLE a (id int);\n\nCREATE TABLE b (id int)").unwrap();
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].sql(), "CREATE TABLE a (id int)");
        assert_eq!(stmts[1].sql(), "CREATE TABLE b (id int)");
    }

    #[test]
    fn test_mysql_table_with_keys_and_options() {
        let sql = "CREATE TABLE `posts` (
            `id` int unsigned NOT NULL AUTO_INCREMENT,
            `user_id` int NOT NULL,
            `title` varchar(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin DEFAULT '' COMMENT 'Title',
            PRIMARY KEY (`id`),
            UNIQUE KEY `title_idx` (`title`(20)),
            KEY `user_idx` (`user_id`) USING BTREE,
            CONSTRAINT `posts_user_fk` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";
        let stmts = parse(sql).unwrap();
        let create = create_table(&stmts[0]);
        assert_eq!(create.columns.len(), 3);
        assert!(create.columns[0].data_type.unsigned);
        assert_eq!(create.constraints.len(), 4);
        assert!(matches!(
            &create.constraints[1],
            TableConstraint::Unique { name: Some(name), columns, .. }
                if name == "title_idx" && columns[0].length == Some(20)
        ));
        assert!(matches!(
            &create.constraints[2],
            TableConstraint::Index { method: Some(method), .. } if method == "BTREE"
        ));
        assert_eq!(
            create.options,
            vec![
                ("ENGINE".to_string(), "InnoDB".to_string()),
                ("CHARSET".to_string(), "utf8mb4".to_string()),
            ]
        );
    }

    #[test]
    fn test_postgres_folds_and_strips_public() {
        let stmts = parse_pg("CREATE TABLE public.Users (ID integer, \"Mixed\" text)").unwrap();
        let create = create_table(&stmts[0]);
        assert_eq!(create.name, QualifiedName::new("users"));
        assert_eq!(create.columns[0].name, "id");
        assert_eq!(create.columns[1].name, "Mixed");
    }

    #[test]
    fn test_non_reserved_keywords_as_column_names() {
        let stmts = parse_pg("CREATE TABLE t (type text, comment text, key int)").unwrap();
        let names: Vec<_> = create_table(&stmts[0])
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["type", "comment", "key"]);
    }

    #[test]
    fn test_multi_word_types() {
        let stmts = parse_pg(
            "CREATE TABLE t (a double precision, b character varying(20), c timestamp(3) with time zone, d int[])",
        )
        .unwrap();
        let types: Vec<_> = create_table(&stmts[0])
            .columns
            .iter()
            .map(|c| c.data_type.to_string())
            .collect();
        assert_eq!(
            types,
            vec![
                "double precision",
                "character varying(20)",
                "timestamp(3) with time zone",
                "int[]"
            ]
        );
    }

    #[test]
    fn test_default_expressions() {
        let stmts = parse_pg(
            "CREATE TABLE t (a int DEFAULT -1 NOT NULL, b text DEFAULT 'x'::text, c timestamp DEFAULT now(), d timestamp DEFAULT current_timestamp)",
        )
        .unwrap();
        let create = create_table(&stmts[0]);
        let default = |i: usize| match &create.columns[i].constraints[0] {
            ColumnConstraint::Default(expr) => expr.to_string(),
            other => panic!("expected default, got {other:?}"),
        };
        assert_eq!(default(0), "-1");
        assert_eq!(create.columns[0].constraints[1], ColumnConstraint::NotNull);
        assert_eq!(default(1), "'x'::text");
        assert_eq!(default(2), "NOW()");
        assert_eq!(default(3), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn test_check_expression_precedence() {
        let stmts =
            parse_pg("CREATE TABLE t (a int, CHECK (a > 0 AND a < 10 OR a IS NULL))").unwrap();
        let create = create_table(&stmts[0]);
        let TableConstraint::Check { expr, .. } = &create.constraints[0] else {
            panic!("expected check");
        };
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Or, .. }));
        assert_eq!(expr.to_string(), "a > 0 AND a < 10 OR a IS NULL");
    }

    #[test]
    fn test_not_in_and_not_like() {
        let stmts = parse_pg(
            "CREATE TABLE t (s text CHECK (s NOT IN ('a', 'b') AND s NOT LIKE 'x%'))",
        )
        .unwrap();
        let create = create_table(&stmts[0]);
        let ColumnConstraint::Check { expr, .. } = &create.columns[0].constraints[0] else {
            panic!("expected check");
        };
        assert_eq!(expr.to_string(), "s NOT IN ('a', 'b') AND NOT s LIKE 'x%'");
    }

    #[test]
    fn test_not_binds_one_comparison() {
        let stmts = parse_pg("CREATE TABLE t (a int, b int, CHECK (NOT a = 1 AND b = 2))").unwrap();
        let create = create_table(&stmts[0]);
        let TableConstraint::Check { expr, .. } = &create.constraints[0] else {
            panic!("expected check");
        };
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected AND, got {expr:?}");
        };
        assert_eq!(*op, BinaryOp::And);
        assert!(matches!(**left, Expr::Unary { op: UnaryOp::Not, .. }));
    }

    #[test]
    fn test_alter_table_actions() {
        let stmts = parse(
            "ALTER TABLE users ADD COLUMN age int AFTER name, DROP COLUMN legacy, \
             MODIFY name varchar(200) NOT NULL, CHANGE old_col new_col int FIRST, \
             DROP INDEX idx, DROP FOREIGN KEY fk, ADD KEY k (age), RENAME COLUMN a TO b",
        )
        .unwrap();
        let StatementKind::AlterTable(alter) = &stmts[0].kind else {
            panic!("expected ALTER TABLE");
        };
        assert_eq!(alter.actions.len(), 8);
        assert!(matches!(
            &alter.actions[0],
            AlterTableAction::AddColumn { position: ColumnPosition::After(after), .. } if after == "name"
        ));
        assert!(matches!(
            &alter.actions[3],
            AlterTableAction::ModifyColumn { old_name, column, position: ColumnPosition::First }
                if old_name == "old_col" && column.name == "new_col"
        ));
        assert!(matches!(
            &alter.actions[6],
            AlterTableAction::AddConstraint(TableConstraint::Index { .. })
        ));
    }

    #[test]
    fn test_postgres_alter_column() {
        let stmts = parse_pg(
            "ALTER TABLE ONLY users ALTER COLUMN age TYPE bigint USING age::bigint, \
             ALTER age SET NOT NULL, ALTER COLUMN age DROP DEFAULT",
        )
        .unwrap();
        let StatementKind::AlterTable(alter) = &stmts[0].kind else {
            panic!("expected ALTER TABLE");
        };
        assert!(matches!(
            &alter.actions[0],
            AlterTableAction::AlterColumn {
                change: AlterColumnChange::SetType { data_type, collation: None },
                ..
            } if data_type.name == "bigint"
        ));
        assert!(matches!(
            &alter.actions[1],
            AlterTableAction::AlterColumn { change: AlterColumnChange::SetNotNull, .. }
        ));
        assert!(matches!(
            &alter.actions[2],
            AlterTableAction::AlterColumn { change: AlterColumnChange::DropDefault, .. }
        ));
    }

    #[test]
    fn test_create_index() {
        let stmts = parse_pg(
            "CREATE UNIQUE INDEX IF NOT EXISTS users_email ON users USING btree (email DESC) WHERE deleted_at IS NULL",
        )
        .unwrap();
        let StatementKind::CreateIndex(index) = &stmts[0].kind else {
            panic!("expected CREATE INDEX");
        };
        assert!(index.unique);
        assert_eq!(index.method.as_deref(), Some("BTREE"));
        assert_eq!(index.columns[0].direction, Some(SortDirection::Desc));
        assert!(index.condition.is_some());
    }

    #[test]
    fn test_create_view_definition_is_canonical() {
        let stmts = parse(
            "CREATE VIEW active_users AS\n  SELECT id,   name\n  FROM users WHERE (active = 1);",
        )
        .unwrap();
        let StatementKind::CreateView(view) = &stmts[0].kind else {
            panic!("expected CREATE VIEW");
        };
        assert_eq!(
            view.definition,
            "SELECT id , name FROM users WHERE ( active = 1 )"
        );
    }

    #[test]
    fn test_mysql_view_prefixes() {
        let stmts = parse(
            "CREATE ALGORITHM=UNDEFINED DEFINER=`root`@`localhost` SQL SECURITY DEFINER VIEW `v` AS select 1",
        )
        .unwrap();
        assert!(matches!(&stmts[0].kind, StatementKind::CreateView(v) if v.name.name == "v"));
    }

    #[test]
    fn test_drop_statements() {
        let stmts = parse("DROP TABLE IF EXISTS a, b; DROP INDEX idx ON a; DROP VIEW v").unwrap();
        assert!(matches!(&stmts[0].kind, StatementKind::DropTable(d) if d.names.len() == 2 && d.if_exists));
        assert!(matches!(&stmts[1].kind, StatementKind::DropIndex(d) if d.table.is_some()));
        assert!(matches!(&stmts[2].kind, StatementKind::DropView(_)));
    }

    #[test]
    fn test_comment_on_column() {
        let stmts = parse_pg("COMMENT ON COLUMN public.users.name IS 'Full name'").unwrap();
        assert!(matches!(
            &stmts[0].kind,
            StatementKind::Comment(CommentStatement {
                target: CommentTarget::Column { table, column },
                comment: Some(text),
            }) if table.name == "users" && table.schema.is_none() && column == "name" && text == "Full name"
        ));
    }

    #[test]
    fn test_unsupported_statement_spans_whole_statement() {
        let sql = "CREATE TABLE a (id int); CREATE TRIGGER t BEFORE INSERT ON a FOR EACH ROW SET x = 1; CREATE TABLE b (id int)";
        let err = parse(sql).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Unsupported);
        assert_eq!(
            &sql[err.span.start..err.span.end],
            "CREATE TRIGGER t BEFORE INSERT ON a FOR EACH ROW SET x = 1"
        );
    }

    #[test]
    fn test_temporary_table_is_unsupported() {
        for sql in [
            "CREATE TEMPORARY TABLE t (id int)",
            "CREATE TEMP TABLE t (id int)",
            "CREATE TEMP VIEW v AS SELECT 1",
        ] {
            let err = parse(sql).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::Unsupported, "{sql}");
            assert_eq!(&sql[err.span.start..err.span.end], sql);
        }
    }

    #[test]
    fn test_insert_is_unsupported() {
        let err = parse("INSERT INTO t VALUES (1)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Unsupported);
    }

    #[test]
    fn test_syntax_error_position() {
        let err = parse("CREATE TABLE t (id int,)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert_eq!(err.span.start, 23);
    }

    #[test]
    fn test_missing_terminator_between_statements() {
        let err = parse("CREATE TABLE a (id int) CREATE TABLE b (id int)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
    }
}
