//! A small boolean filter language over albums.
//!
//! Filters are written as comparisons joined with `and`, `or` and `not`,
//! with parentheses for grouping:
//!
//! ```text
//! tracks == 3 and title contains "The"
//! genre == "Progressive Rock" and not (artist == "Queen" or longest > 10:00)
//! ```
//!
//! | field     | kind        | operators                          |
//! |-----------|-------------|------------------------------------|
//! | `title`   | text        | `==` `!=` `contains`               |
//! | `artist`  | text list   | `==` `!=` (membership) `contains`  |
//! | `genre`   | text list   | `==` `!=` (membership) `contains`  |
//! | `tracks`  | number      | `==` `!=` `<` `<=` `>` `>=`        |
//! | `longest` | seconds     | `==` `!=` `<` `<=` `>` `>=`        |
//! | `total`   | seconds     | `==` `!=` `<` `<=` `>` `>=`        |
//!
//! Numbers may be written as plain integers or as `MM:SS` clock values.
//! All text matching is case-sensitive. Every mistake is reported as
//! [`Error::Query`] with the byte offset where it was found.
//!
//! # Example
//!
//! ```
//! use discograph_core::{Album, Filter};
//!
//! let filter = Filter::parse(r#"tracks == 1 and title contains "Opera""#).unwrap();
//! let album = Album::new("A Night at the Opera").with_composition("X", 367);
//! assert!(filter.matches(&album));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{parse_clock, Album};

/// How deep `not` and parentheses may nest.
const MAX_DEPTH: usize = 64;

/// How many comparisons one filter may hold.
const MAX_COMPARISONS: usize = 256;

/// Albums with exactly three compositions whose title contains "The".
pub const REFERENCE_FILTER: &str = r#"tracks == 3 and title contains "The""#;

// ---------------------------------------------------------------------------
// AST
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Artist,
    Genre,
    Tracks,
    Longest,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    List,
    Number,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "artist" | "artists" => Some(Self::Artist),
            "genre" | "genres" => Some(Self::Genre),
            "tracks" => Some(Self::Tracks),
            "longest" => Some(Self::Longest),
            "total" => Some(Self::Total),
            _ => None,
        }
    }

    const fn kind(self) -> Kind {
        match self {
            Self::Title => Kind::Text,
            Self::Artist | Self::Genre => Kind::List,
            Self::Tracks | Self::Longest | Self::Total => Kind::Number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
}

impl Op {
    const fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    fn compare(self, left: u64, right: u64) -> bool {
        match self {
            Self::Eq => left == right,
            Self::Ne => left != right,
            Self::Lt => left < right,
            Self::Le => left <= right,
            Self::Gt => left > right,
            Self::Ge => left >= right,
            Self::Contains => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Text(String),
    Number(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare { field: Field, op: Op, value: Value },
}

impl Expr {
    fn eval(&self, album: &Album) -> bool {
        match self {
            Self::And(left, right) => left.eval(album) && right.eval(album),
            Self::Or(left, right) => left.eval(album) || right.eval(album),
            Self::Not(inner) => !inner.eval(album),
            Self::Compare { field, op, value } => compare(album, *field, *op, value),
        }
    }
}

fn compare(album: &Album, field: Field, op: Op, value: &Value) -> bool {
    match (field, value) {
        (Field::Title, Value::Text(text)) => match op {
            Op::Eq => album.title == *text,
            Op::Ne => album.title != *text,
            Op::Contains => album.title.contains(text.as_str()),
            _ => false,
        },
        (Field::Artist | Field::Genre, Value::Text(text)) => {
            let list = if field == Field::Artist {
                &album.artists
            } else {
                &album.genres
            };
            match op {
                Op::Eq => list.iter().any(|item| item == text),
                Op::Ne => !list.iter().any(|item| item == text),
                Op::Contains => list.iter().any(|item| item.contains(text.as_str())),
                _ => false,
            }
        }
        (Field::Tracks, Value::Number(n)) => op.compare(album.track_count() as u64, *n),
        (Field::Longest, Value::Number(n)) => op.compare(u64::from(album.longest_secs()), *n),
        (Field::Total, Value::Number(n)) => op.compare(album.total_secs(), *n),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// A compiled album filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    source: String,
    expr: Expr,
}

impl Filter {
    /// Compile a filter expression.
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens: &tokens,
            cursor: 0,
            end: source.len(),
            depth: 0,
            comparisons: 0,
        };
        let expr = parser.expression()?;
        if let Some(token) = parser.peek() {
            return Err(Error::query(
                token.pos,
                format!("unexpected {} after complete expression", token.kind),
            ));
        }
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    /// The reference filter: three compositions and "The" in the title.
    pub fn reference() -> Self {
        Self {
            source: REFERENCE_FILTER.to_string(),
            expr: Expr::And(
                Box::new(Expr::Compare {
                    field: Field::Tracks,
                    op: Op::Eq,
                    value: Value::Number(3),
                }),
                Box::new(Expr::Compare {
                    field: Field::Title,
                    op: Op::Contains,
                    value: Value::Text("The".to_string()),
                }),
            ),
        }
    }

    pub fn matches(&self, album: &Album) -> bool {
        self.expr.eval(album)
    }

    /// The expression text this filter was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Word(String),
    Text(String),
    Number(u64),
    Op(Op),
    Open,
    Close,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(word) => write!(f, "'{word}'"),
            Self::Text(text) => write!(f, "string {text:?}"),
            Self::Number(n) => write!(f, "number {n}"),
            Self::Op(op) => write!(f, "operator {op:?}"),
            Self::Open => write!(f, "'('"),
            Self::Close => write!(f, "')'"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        let kind = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                TokenKind::Open
            }
            ')' => {
                chars.next();
                TokenKind::Close
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, escaped)) => text.push(escaped),
                            None => break,
                        },
                        _ => text.push(c),
                    }
                }
                if !closed {
                    return Err(Error::query(pos, "unterminated string literal"));
                }
                TokenKind::Text(text)
            }
            '=' | '!' | '<' | '>' => {
                chars.next();
                let followed_by_eq = chars.peek().is_some_and(|&(_, next)| next == '=');
                if followed_by_eq {
                    chars.next();
                }
                let op = match (c, followed_by_eq) {
                    ('=', true) => Op::Eq,
                    ('!', true) => Op::Ne,
                    ('<', false) => Op::Lt,
                    ('<', true) => Op::Le,
                    ('>', false) => Op::Gt,
                    ('>', true) => Op::Ge,
                    _ => return Err(Error::query(pos, format!("unknown operator '{c}'"))),
                };
                TokenKind::Op(op)
            }
            c if c.is_ascii_digit() => {
                let mut literal = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == ':' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = parse_clock(&literal)
                    .ok_or_else(|| Error::query(pos, format!("invalid number '{literal}'")))?;
                TokenKind::Number(u64::from(value))
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, w)) = chars.peek() {
                    if w.is_alphanumeric() || w == '_' {
                        word.push(w);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if word == "contains" {
                    TokenKind::Op(Op::Contains)
                } else {
                    TokenKind::Word(word)
                }
            }
            other => return Err(Error::query(pos, format!("unexpected character '{other}'"))),
        };
        tokens.push(Token { kind, pos });
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Recursive descent; `or` binds loosest, then `and`, then `not`.
///
/// Nesting and comparison counts are bounded so that neither parsing nor
/// evaluating a hostile filter can exhaust the stack.
struct Parser<'t> {
    tokens: &'t [Token],
    cursor: usize,
    end: usize,
    depth: usize,
    comparisons: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.cursor);
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn descend(&mut self, pos: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::query(pos, "filter nested too deeply"));
        }
        Ok(())
    }

    fn eat_word(&mut self, keyword: &str) -> bool {
        let matched = matches!(
            self.peek(),
            Some(Token { kind: TokenKind::Word(word), .. }) if word == keyword
        );
        if matched {
            self.cursor += 1;
        }
        matched
    }

    fn expression(&mut self) -> Result<Expr> {
        let mut left = self.conjunction()?;
        while self.eat_word("or") {
            let right = self.conjunction()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Expr> {
        let mut left = self.negation()?;
        while self.eat_word("and") {
            let right = self.negation()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn negation(&mut self) -> Result<Expr> {
        let pos = self.peek().map_or(self.end, |token| token.pos);
        if self.eat_word("not") {
            self.descend(pos)?;
            let inner = self.negation()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let end = self.end;
        let Some(token) = self.next().cloned() else {
            return Err(Error::query(end, "unexpected end of filter"));
        };

        match token.kind {
            TokenKind::Open => {
                self.descend(token.pos)?;
                let inner = self.expression()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::Close,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(Error::query(
                        other.pos,
                        format!("expected ')', found {}", other.kind),
                    )),
                    None => Err(Error::query(end, "missing ')'")),
                }
            }
            TokenKind::Word(name) => self.comparison(&name, token.pos),
            other => Err(Error::query(
                token.pos,
                format!("expected a field name, found {other}"),
            )),
        }
    }

    fn comparison(&mut self, name: &str, pos: usize) -> Result<Expr> {
        let field = Field::from_name(name)
            .ok_or_else(|| Error::query(pos, format!("unknown field '{name}'")))?;
        self.comparisons += 1;
        if self.comparisons > MAX_COMPARISONS {
            return Err(Error::query(
                pos,
                format!("filter has more than {MAX_COMPARISONS} comparisons"),
            ));
        }
        let end = self.end;

        let (op, op_pos) = match self.next() {
            Some(Token {
                kind: TokenKind::Op(op),
                pos,
            }) => (*op, *pos),
            Some(other) => {
                return Err(Error::query(
                    other.pos,
                    format!("expected an operator after '{name}', found {}", other.kind),
                ))
            }
            None => return Err(Error::query(end, format!("expected an operator after '{name}'"))),
        };

        let (value, value_pos) = match self.next() {
            Some(Token {
                kind: TokenKind::Text(text),
                pos,
            }) => (Value::Text(text.clone()), *pos),
            Some(Token {
                kind: TokenKind::Number(n),
                pos,
            }) => (Value::Number(*n), *pos),
            Some(other) => {
                return Err(Error::query(
                    other.pos,
                    format!("expected a value, found {}", other.kind),
                ))
            }
            None => return Err(Error::query(end, "expected a value")),
        };

        check_types(field, name, op, op_pos, &value, value_pos)?;
        Ok(Expr::Compare { field, op, value })
    }
}

fn check_types(
    field: Field,
    name: &str,
    op: Op,
    op_pos: usize,
    value: &Value,
    value_pos: usize,
) -> Result<()> {
    match field.kind() {
        Kind::Text | Kind::List => {
            if op.is_ordering() {
                return Err(Error::query(
                    op_pos,
                    format!("'{name}' only supports ==, != and contains"),
                ));
            }
            if !matches!(value, Value::Text(_)) {
                return Err(Error::query(
                    value_pos,
                    format!("'{name}' must be compared with a quoted string"),
                ));
            }
        }
        Kind::Number => {
            if op == Op::Contains {
                return Err(Error::query(
                    op_pos,
                    format!("'{name}' is numeric and does not support contains"),
                ));
            }
            if !matches!(value, Value::Number(_)) {
                return Err(Error::query(
                    value_pos,
                    format!("'{name}' must be compared with a number"),
                ));
            }
        }
    }
    Ok(())
}
