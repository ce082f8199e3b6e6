//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Plural expression parser and evaluator
//!
//! This module parses and evaluates the `plural=` expression of a gettext
//! `Plural-Forms` header. The expression is C-like and computes the index
//! of the translated variant to use for a count `n`.
//!
//! Example expressions:
//! - English: `n != 1` - 2 forms
//! - Russian: `n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2` - 3 forms

use std::iter::Peekable;
use std::str::CharIndices;

/// Nesting limit for parentheses and `?:` branches
const MAX_DEPTH: usize = 64;

/// Limit on the number of nodes in one expression
const MAX_NODES: usize = 512;

/// A parsed plural expression that can be evaluated
#[derive(Debug, Clone, PartialEq)]
pub enum PluralExpr {
    /// The variable `n` (the count)
    N,
    /// A numeric literal
    Literal(i64),
    /// Logical negation
    Not(Box<PluralExpr>),
    /// Binary operation
    BinaryOp(Box<PluralExpr>, BinaryOp, Box<PluralExpr>),
    /// Ternary conditional: condition ? if_true : if_false
    Ternary(Box<PluralExpr>, Box<PluralExpr>, Box<PluralExpr>),
}

/// Binary operators supported in plural expressions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Error type for plural expression parsing and evaluation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluralError {
    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected {0}")]
    Expected(String),
    #[error("invalid Plural-Forms header: {0}")]
    InvalidHeader(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("plural index {index} out of range for {nplurals} forms")]
    IndexOutOfRange { index: i64, nplurals: usize },
    #[error("expression too complex")]
    TooComplex,
}

/// Token types for the lexer
#[derive(Debug, Clone, PartialEq)]
enum Token {
    N,
    Number(i64),
    LParen,
    RParen,
    Question,
    Colon,
    Not,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Eof,
}

/// Lexer for plural expressions
struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.char_indices().peekable(),
        }
    }

    /// Consume `second` if it follows, yielding `double`, else `single`
    fn pair(
        &mut self,
        second: char,
        double: Token,
        single: Option<Token>,
    ) -> Result<Token, PluralError> {
        if matches!(self.chars.peek(), Some(&(_, c)) if c == second) {
            self.chars.next();
            return Ok(double);
        }
        single.ok_or_else(|| PluralError::Expected(format!("'{}'", second)))
    }

    fn next_token(&mut self) -> Result<Token, PluralError> {
        self.skip_whitespace();

        let (offset, c) = match self.chars.peek().copied() {
            None => return Ok(Token::Eof),
            Some(next) => next,
        };

        if c.is_ascii_digit() {
            return self.read_number();
        }
        // End of expression (in Plural-Forms header)
        if c == ';' {
            return Ok(Token::Eof);
        }

        self.chars.next();
        match c {
            'n' => Ok(Token::N),
            '(' => Ok(Token::LParen),
            ')' => Ok(Token::RParen),
            '?' => Ok(Token::Question),
            ':' => Ok(Token::Colon),
            '+' => Ok(Token::Plus),
            '-' => Ok(Token::Minus),
            '*' => Ok(Token::Star),
            '/' => Ok(Token::Slash),
            '%' => Ok(Token::Percent),
            '=' => self.pair('=', Token::Eq, None),
            '!' => self.pair('=', Token::Ne, Some(Token::Not)),
            '<' => self.pair('=', Token::Le, Some(Token::Lt)),
            '>' => self.pair('=', Token::Ge, Some(Token::Gt)),
            '&' => self.pair('&', Token::And, None),
            '|' => self.pair('|', Token::Or, None),
            _ => Err(PluralError::UnexpectedChar(c, offset)),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, PluralError> {
        let mut value: i64 = 0;
        while let Some(&(_, c)) = self.chars.peek() {
            if let Some(digit) = c.to_digit(10) {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(i64::from(digit)))
                    .ok_or_else(|| PluralError::Expected("a smaller number".to_string()))?;
                self.chars.next();
            } else {
                break;
            }
        }
        Ok(Token::Number(value))
    }
}

/// Parser for plural expressions
///
/// Operator precedence (lowest to highest):
/// 1. Ternary: ? :
/// 2. Logical OR: ||
/// 3. Logical AND: &&
/// 4. Equality: == !=
/// 5. Relational: < <= > >=
/// 6. Additive: + -
/// 7. Multiplicative: * / %
/// 8. Unary: !
/// 9. Primary: n, literals, (expr)
///
/// Nesting depth and node count are bounded, so neither parsing nor
/// evaluating the resulting tree can exhaust the stack.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
    nodes: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> Result<Self, PluralError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            depth: 0,
            nodes: 0,
        })
    }

    /// Parse the whole input as one expression
    pub fn parse(&mut self) -> Result<PluralExpr, PluralError> {
        let expr = self.parse_ternary()?;
        if self.current != Token::Eof {
            return Err(PluralError::Expected("end of expression".to_string()));
        }
        Ok(expr)
    }

    fn advance(&mut self) -> Result<(), PluralError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    /// Account for one more node in the tree
    fn node(&mut self) -> Result<(), PluralError> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(PluralError::TooComplex);
        }
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), PluralError> {
        if self.current == expected {
            self.advance()
        } else if self.current == Token::Eof {
            Err(PluralError::UnexpectedEof)
        } else {
            Err(PluralError::Expected(format!("{:?}", expected)))
        }
    }

    fn parse_ternary(&mut self) -> Result<PluralExpr, PluralError> {
        if self.depth >= MAX_DEPTH {
            return Err(PluralError::TooComplex);
        }
        self.depth += 1;
        let result = self.parse_conditional();
        self.depth -= 1;
        result
    }

    // Ternary: or_expr ('?' ternary ':' ternary)?
    fn parse_conditional(&mut self) -> Result<PluralExpr, PluralError> {
        let cond = self.parse_or()?;

        if self.current == Token::Question {
            self.node()?;
            self.advance()?;
            let if_true = self.parse_ternary()?;
            self.expect(Token::Colon)?;
            let if_false = self.parse_ternary()?;
            Ok(PluralExpr::Ternary(
                Box::new(cond),
                Box::new(if_true),
                Box::new(if_false),
            ))
        } else {
            Ok(cond)
        }
    }

    /// Left-associative chain of the operators `ops` over `next`
    fn parse_chain(
        &mut self,
        ops: &[(Token, BinaryOp)],
        next: fn(&mut Self) -> Result<PluralExpr, PluralError>,
    ) -> Result<PluralExpr, PluralError> {
        let mut left = next(self)?;

        while let Some(&(_, op)) = ops.iter().find(|(tok, _)| *tok == self.current) {
            self.node()?;
            self.advance()?;
            let right = next(self)?;
            left = PluralExpr::BinaryOp(Box::new(left), op, Box::new(right));
        }

        Ok(left)
    }

    fn parse_or(&mut self) -> Result<PluralExpr, PluralError> {
        self.parse_chain(&[(Token::Or, BinaryOp::Or)], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<PluralExpr, PluralError> {
        self.parse_chain(&[(Token::And, BinaryOp::And)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<PluralExpr, PluralError> {
        self.parse_chain(
            &[(Token::Eq, BinaryOp::Eq), (Token::Ne, BinaryOp::Ne)],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result<PluralExpr, PluralError> {
        self.parse_chain(
            &[
                (Token::Lt, BinaryOp::Lt),
                (Token::Le, BinaryOp::Le),
                (Token::Gt, BinaryOp::Gt),
                (Token::Ge, BinaryOp::Ge),
            ],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<PluralExpr, PluralError> {
        self.parse_chain(
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<PluralExpr, PluralError> {
        self.parse_chain(
            &[
                (Token::Star, BinaryOp::Mul),
                (Token::Slash, BinaryOp::Div),
                (Token::Percent, BinaryOp::Mod),
            ],
            Self::parse_unary,
        )
    }

    // Unary: '!'* primary
    fn parse_unary(&mut self) -> Result<PluralExpr, PluralError> {
        let mut nots = 0;
        while self.current == Token::Not {
            self.node()?;
            self.advance()?;
            nots += 1;
        }
        let mut expr = self.parse_primary()?;
        for _ in 0..nots {
            expr = PluralExpr::Not(Box::new(expr));
        }
        Ok(expr)
    }

    // Primary: 'n' | number | '(' ternary ')'
    fn parse_primary(&mut self) -> Result<PluralExpr, PluralError> {
        match self.current.clone() {
            Token::N => {
                self.node()?;
                self.advance()?;
                Ok(PluralExpr::N)
            }
            Token::Number(v) => {
                self.node()?;
                self.advance()?;
                Ok(PluralExpr::Literal(v))
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_ternary()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Eof => Err(PluralError::UnexpectedEof),
            _ => Err(PluralError::Expected("n, number, or '('".to_string())),
        }
    }
}

impl PluralExpr {
    /// Parse a plural expression from a string
    pub fn parse(input: &str) -> Result<Self, PluralError> {
        let mut parser = Parser::new(input)?;
        parser.parse()
    }

    /// Evaluate the expression with the given value of n
    ///
    /// Arithmetic wraps on overflow; `/` and `%` truncate toward zero.
    pub fn evaluate(&self, n: i64) -> Result<i64, PluralError> {
        match self {
            PluralExpr::N => Ok(n),
            PluralExpr::Literal(v) => Ok(*v),
            PluralExpr::Not(operand) => Ok(i64::from(operand.evaluate(n)? == 0)),
            PluralExpr::BinaryOp(left, op, right) => {
                let l = left.evaluate(n)?;
                // && and || short-circuit like C
                match op {
                    BinaryOp::And if l == 0 => return Ok(0),
                    BinaryOp::Or if l != 0 => return Ok(1),
                    _ => {}
                }
                let r = right.evaluate(n)?;
                let v = match op {
                    BinaryOp::Add => l.wrapping_add(r),
                    BinaryOp::Sub => l.wrapping_sub(r),
                    BinaryOp::Mul => l.wrapping_mul(r),
                    BinaryOp::Div => {
                        if r == 0 {
                            return Err(PluralError::DivisionByZero);
                        }
                        l.wrapping_div(r)
                    }
                    BinaryOp::Mod => {
                        if r == 0 {
                            return Err(PluralError::DivisionByZero);
                        }
                        l.wrapping_rem(r)
                    }
                    BinaryOp::Eq => i64::from(l == r),
                    BinaryOp::Ne => i64::from(l != r),
                    BinaryOp::Lt => i64::from(l < r),
                    BinaryOp::Le => i64::from(l <= r),
                    BinaryOp::Gt => i64::from(l > r),
                    BinaryOp::Ge => i64::from(l >= r),
                    BinaryOp::And | BinaryOp::Or => i64::from(r != 0),
                };
                Ok(v)
            }
            PluralExpr::Ternary(cond, if_true, if_false) => {
                if cond.evaluate(n)? != 0 {
                    if_true.evaluate(n)
                } else {
                    if_false.evaluate(n)
                }
            }
        }
    }
}

/// A parsed `Plural-Forms` rule: number of forms and the selecting expression
#[derive(Debug, Clone, PartialEq)]
pub struct PluralForms {
    pub nplurals: usize,
    pub expr: PluralExpr,
}

impl Default for PluralForms {
    /// Germanic rule: `nplurals=2; plural=n != 1`
    fn default() -> Self {
        PluralForms {
            nplurals: 2,
            expr: PluralExpr::BinaryOp(
                Box::new(PluralExpr::N),
                BinaryOp::Ne,
                Box::new(PluralExpr::Literal(1)),
            ),
        }
    }
}

impl PluralForms {
    /// Zero-based variant index for `count`
    ///
    /// The result is not clamped: an expression yielding a negative index
    /// or one past `nplurals` is an error.
    pub fn select(&self, count: i64) -> Result<usize, PluralError> {
        let index = self.expr.evaluate(count)?;
        match usize::try_from(index) {
            Ok(i) if i < self.nplurals => Ok(i),
            _ => Err(PluralError::IndexOutOfRange {
                index,
                nplurals: self.nplurals,
            }),
        }
    }
}

/// Parse the value of a "Plural-Forms:" header
///
/// Expected format: "nplurals=N; plural=EXPR;"
pub fn parse_plural_forms(header: &str) -> Result<PluralForms, PluralError> {
    let mut nplurals = None;
    let mut plural_expr = None;

    for part in header.split(';') {
        let part = part.trim();
        if let Some(val) = strip_assignment(part, "nplurals") {
            let n: usize = val
                .parse()
                .map_err(|_| PluralError::InvalidHeader(format!("bad nplurals '{}'", val)))?;
            nplurals = Some(n);
        } else if let Some(val) = strip_assignment(part, "plural") {
            plural_expr = Some(PluralExpr::parse(val)?);
        }
    }

    match (nplurals, plural_expr) {
        (Some(0), _) => Err(PluralError::InvalidHeader(
            "nplurals must be positive".to_string(),
        )),
        (Some(nplurals), Some(expr)) => Ok(PluralForms { nplurals, expr }),
        (None, _) => Err(PluralError::InvalidHeader("missing nplurals".to_string())),
        (_, None) => Err(PluralError::InvalidHeader("missing plural".to_string())),
    }
}

/// Match `name = value`, tolerating spaces around '='
fn strip_assignment<'a>(part: &'a str, name: &str) -> Option<&'a str> {
    let rest = part.strip_prefix(name)?.trim_start();
    Some(rest.strip_prefix('=')?.trim())
}
