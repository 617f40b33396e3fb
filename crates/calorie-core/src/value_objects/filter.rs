//! List filter expressions
//!
//! A filter is a small boolean expression over an allow-listed set of typed
//! fields, e.g. `(date eq '2020-01-01') and (calories gt 100)`.
//!
//! ```text
//! expr     := and_expr ("or" and_expr)*
//! and_expr := primary ("and" primary)*
//! primary  := "(" expr ")" | FIELD OP VALUE
//! OP       := eq | ne | gt | lt
//! VALUE    := 'quoted text' | bare-token
//! ```
//!
//! Parsing produces a typed AST; storage backends bind the values as query
//! parameters and never splice raw filter text into a statement.

use chrono::{NaiveDate, NaiveTime};

use crate::error::DomainError;

/// Characters rejected anywhere in a raw filter
const FORBIDDEN_CHARS: [char; 5] = ['*', ';', '&', '"', '\\'];

/// Maximum parenthesis nesting
const MAX_DEPTH: usize = 16;

/// Value type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Time,
    Text,
    Integer,
}

/// A field that may appear on the left side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Fields accepted when listing meals
pub const MEAL_FILTER_FIELDS: &[FilterField] = &[
    FilterField { name: "date", kind: FieldKind::Date },
    FilterField { name: "time", kind: FieldKind::Time },
    FilterField { name: "name", kind: FieldKind::Text },
    FilterField { name: "calories", kind: FieldKind::Integer },
];

/// Fields accepted when listing users
pub const USER_FILTER_FIELDS: &[FilterField] = &[
    FilterField { name: "username", kind: FieldKind::Text },
    FilterField { name: "role_id", kind: FieldKind::Integer },
];

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Lt,
}

impl FilterOp {
    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            _ => None,
        }
    }

    /// SQL operator token
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

/// Typed right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterValue {
    Date(NaiveDate),
    Time(NaiveTime),
    Text(String),
    Integer(i64),
}

impl FilterValue {
    fn parse(field: &FilterField, raw: &str) -> Result<Self, DomainError> {
        let invalid = || {
            DomainError::InvalidQuery(format!("invalid value '{raw}' for field '{}'", field.name))
        };
        match field.kind {
            FieldKind::Text => Ok(Self::Text(raw.to_string())),
            FieldKind::Integer => raw.parse().map(Self::Integer).map_err(|_| invalid()),
            FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Self::Date)
                .map_err(|_| invalid()),
            FieldKind::Time => NaiveTime::parse_from_str(raw, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
                .map(Self::Time)
                .map_err(|_| invalid()),
        }
    }
}

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Compare {
        field: FilterField,
        op: FilterOp,
        value: FilterValue,
    },
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
}

impl FilterExpr {
    /// Parse a raw filter against an allow-list of fields
    ///
    /// Returns `Ok(None)` for an empty filter. Forbidden characters fail with
    /// `InvalidFilter`; every other problem fails with `InvalidQuery`.
    pub fn parse(raw: &str, fields: &[FilterField]) -> Result<Option<Self>, DomainError> {
        let text = raw.replace("%20", " ");
        if text.contains(FORBIDDEN_CHARS) {
            return Err(DomainError::InvalidFilter(raw.to_string()));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        let tokens = tokenize(&text)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            fields,
        };
        let expr = parser.expr(0)?;
        if let Some(token) = parser.peek() {
            return Err(DomainError::InvalidQuery(format!(
                "unexpected token {token}"
            )));
        }
        Ok(Some(expr))
    }

    /// Evaluate the expression against a row
    ///
    /// `resolve` returns the row's value for a field name.
    pub fn matches<F>(&self, resolve: &F) -> bool
    where
        F: Fn(&str) -> Option<FilterValue>,
    {
        match self {
            Self::And(lhs, rhs) => lhs.matches(resolve) && rhs.matches(resolve),
            Self::Or(lhs, rhs) => lhs.matches(resolve) || rhs.matches(resolve),
            Self::Compare { field, op, value } => match resolve(field.name) {
                Some(actual) => match op {
                    FilterOp::Eq => actual == *value,
                    FilterOp::Ne => actual != *value,
                    FilterOp::Gt => actual > *value,
                    FilterOp::Lt => actual < *value,
                },
                None => false,
            },
        }
    }

}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Quoted(String),
    Word(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Open => f.write_str("'('"),
            Token::Close => f.write_str("')'"),
            Token::Quoted(s) | Token::Word(s) => write!(f, "'{s}'"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, DomainError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '\'' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        // '' inside a quoted value is a literal quote
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            text.push('\'');
                        }
                        Some('\'') => break,
                        Some(ch) => text.push(ch),
                        None => {
                            return Err(DomainError::InvalidQuery(
                                "unterminated quoted value".to_string(),
                            ))
                        }
                    }
                }
                tokens.push(Token::Quoted(text));
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '\'' {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'f> {
    tokens: Vec<Token>,
    pos: usize,
    fields: &'f [FilterField],
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expr(&mut self, depth: usize) -> Result<FilterExpr, DomainError> {
        let mut lhs = self.and_expr(depth)?;
        while self.eat_keyword("or") {
            let rhs = self.and_expr(depth)?;
            lhs = FilterExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self, depth: usize) -> Result<FilterExpr, DomainError> {
        let mut lhs = self.primary(depth)?;
        while self.eat_keyword("and") {
            let rhs = self.primary(depth)?;
            lhs = FilterExpr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn primary(&mut self, depth: usize) -> Result<FilterExpr, DomainError> {
        match self.next() {
            Some(Token::Open) => {
                if depth >= MAX_DEPTH {
                    return Err(DomainError::InvalidQuery(
                        "filter is nested too deeply".to_string(),
                    ));
                }
                let inner = self.expr(depth + 1)?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(DomainError::InvalidQuery(
                        "unbalanced parentheses".to_string(),
                    )),
                }
            }
            Some(Token::Word(name)) => self.comparison(&name),
            Some(token) => Err(DomainError::InvalidQuery(format!(
                "expected a field name, found {token}"
            ))),
            None => Err(DomainError::InvalidQuery(
                "unexpected end of filter".to_string(),
            )),
        }
    }

    fn comparison(&mut self, name: &str) -> Result<FilterExpr, DomainError> {
        let field = *self
            .fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| DomainError::InvalidQuery(format!("unknown field '{name}'")))?;

        let op = match self.next() {
            Some(Token::Word(w)) => FilterOp::parse(&w)
                .ok_or_else(|| DomainError::InvalidQuery(format!("unknown operator '{w}'")))?,
            _ => {
                return Err(DomainError::InvalidQuery(format!(
                    "missing operator after '{name}'"
                )))
            }
        };

        let value = match self.next() {
            Some(Token::Quoted(v) | Token::Word(v)) => FilterValue::parse(&field, &v)?,
            _ => {
                return Err(DomainError::InvalidQuery(format!(
                    "missing value for '{name}'"
                )))
            }
        };

        Ok(FilterExpr::Compare { field, op, value })
    }
}
