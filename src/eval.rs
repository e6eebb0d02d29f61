//! Evaluation of documentation examples
//!
//! Examples are written in a small expression language: integer, float,
//! string and boolean literals, arithmetic and comparison operators,
//! `and`/`or`/`not`, variable assignment, and a handful of builtins
//! (`print`, `len`, `str`, `abs`). Each example is evaluated against a
//! [`Context`] holding the variable bindings accumulated by the earlier
//! examples of the same doctest, so a later example can reference a name an
//! earlier one bound.
//!
//! An expression statement echoes the repr of its value, REPL style;
//! assignments and `None`-valued expressions echo nothing.
//!
//! All evaluation failures are reported as [`EvalError`] values. They never
//! abort a run; the caller records them in the report.

use logos::Logos;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while evaluating one example
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The example source could not be tokenized or parsed.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A variable was referenced before being assigned.
    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    /// An operator was applied to operands it does not support.
    #[error("unsupported operand type(s) for {op}: {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// `and`, `or` or `not` was given a non-boolean operand.
    #[error("'{op}' requires a boolean operand, got {actual}")]
    NotBoolean {
        op: &'static str,
        actual: &'static str,
    },

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed.
    #[error("integer overflow")]
    Overflow,

    /// A call named a function that does not exist.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// A builtin was called with the wrong number of arguments.
    #[error("{name}() takes {expected} argument(s), got {got}")]
    BadArity {
        name: String,
        expected: usize,
        got: usize,
    },
}

/// A value produced by evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    /// The result of statements that produce no value, e.g. `print(..)`.
    /// Never echoed.
    None,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
            Value::None => "None",
        }
    }

    /// Inspectable form: like [`Display`](fmt::Display), but strings are
    /// single-quoted with escapes so output comparisons are unambiguous.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => repr_str(s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // {:?} keeps a trailing .0 on whole floats, distinguishing
            // them from ints in expected output.
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::None => write!(f, "None"),
        }
    }
}

/// Render a string in single-quoted escaped form, e.g. `'a\nb'`.
///
/// Used for value reprs and for the Expected/Got halves of failure
/// diagnostics, so reports stay readable even when outputs contain
/// newlines or quotes.
pub fn repr_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Token {
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r#"'([^'\\]|\\.)*'"#)]
    Str,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("not")]
    Not,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LessEq,

    #[token(">=")]
    GreaterEq,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("=")]
    Assign,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(";")]
    Semi,
}

fn lex(line: &str) -> Result<Vec<(Token, String)>, EvalError> {
    let mut lexer = Token::lexer(line);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.slice().to_string())),
            Err(()) => {
                return Err(EvalError::Syntax(format!(
                    "unexpected character '{}'",
                    lexer.slice()
                )))
            }
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Literal(Value),
    Var(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone)]
enum Stmt {
    Assign(String, Expr),
    Expr(Expr),
}

struct Parser {
    tokens: Vec<(Token, String)>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, String)>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_ahead(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).map(|(t, _)| *t)
    }

    fn advance(&mut self) -> Option<(Token, String)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<String, EvalError> {
        match self.advance() {
            Some((t, slice)) if t == token => Ok(slice),
            Some((_, slice)) => Err(EvalError::Syntax(format!(
                "expected {}, found '{}'",
                what, slice
            ))),
            None => Err(EvalError::Syntax(format!(
                "expected {}, found end of input",
                what
            ))),
        }
    }

    /// Parse a full line: one or more statements separated by `;`.
    fn parse_statements(&mut self) -> Result<Vec<Stmt>, EvalError> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            if self.peek() == Some(Token::Semi) {
                self.advance();
                continue;
            }
            statements.push(self.parse_statement()?);
            match self.advance() {
                None => break,
                Some((Token::Semi, _)) => {}
                Some((_, slice)) => {
                    return Err(EvalError::Syntax(format!(
                        "unexpected token '{}' after expression",
                        slice
                    )));
                }
            }
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Stmt, EvalError> {
        if self.peek() == Some(Token::Ident) && self.peek_ahead(1) == Some(Token::Assign) {
            let name = self.expect(Token::Ident, "a name")?;
            self.expect(Token::Assign, "'='")?;
            let expr = self.parse_expr()?;
            return Ok(Stmt::Assign(name, expr));
        }
        Ok(Stmt::Expr(self.parse_expr()?))
    }

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(Token::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_not()?;
        while self.peek() == Some(Token::And) {
            self.advance();
            let rhs = self.parse_not()?;
            lhs = Expr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, EvalError> {
        if self.peek() == Some(Token::Not) {
            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, EvalError> {
        let lhs = self.parse_additive()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::Ne,
            Some(Token::Less) => BinaryOp::Lt,
            Some(Token::LessEq) => BinaryOp::Le,
            Some(Token::Greater) => BinaryOp::Gt,
            Some(Token::GreaterEq) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        if self.peek() == Some(Token::Minus) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, EvalError> {
        match self.advance() {
            Some((Token::Int, slice)) => {
                let n: i64 = slice
                    .parse()
                    .map_err(|_| EvalError::Syntax(format!("integer literal '{}' too large", slice)))?;
                Ok(Expr::Literal(Value::Int(n)))
            }
            Some((Token::Float, slice)) => {
                let x: f64 = slice
                    .parse()
                    .map_err(|_| EvalError::Syntax(format!("bad float literal '{}'", slice)))?;
                Ok(Expr::Literal(Value::Float(x)))
            }
            Some((Token::Str, slice)) => Ok(Expr::Literal(Value::Str(unescape(&slice)))),
            Some((Token::True, _)) => Ok(Expr::Literal(Value::Bool(true))),
            Some((Token::False, _)) => Ok(Expr::Literal(Value::Bool(false))),
            Some((Token::Ident, name)) => {
                if self.peek() == Some(Token::LParen) {
                    self.advance();
                    let mut args = Vec::new();
                    if self.peek() != Some(Token::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if self.peek() == Some(Token::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(Token::RParen, "')'")?;
                    return Ok(Expr::Call { name, args });
                }
                Ok(Expr::Var(name))
            }
            Some((Token::LParen, _)) => {
                let expr = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            Some((_, slice)) => Err(EvalError::Syntax(format!("unexpected token '{}'", slice))),
            None => Err(EvalError::Syntax("unexpected end of input".to_string())),
        }
    }
}

/// Strip the quotes from a string literal slice and process escapes.
fn unescape(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// The execution namespace shared by the examples of one doctest
///
/// Bindings persist across `eval_source` calls, so `>>> x = 2` in one
/// example makes `x` visible to the next example in the same doctest.
#[derive(Debug, Default)]
pub struct Context {
    vars: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Context {
            vars: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Evaluate one example's source and return what it printed/echoed.
    ///
    /// The returned output has no trailing newline, matching the way
    /// expected-output blocks are collected from doc comments.
    pub fn eval_source(&mut self, source: &str) -> Result<String, EvalError> {
        let mut out = String::new();
        for line in source.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let tokens = lex(line)?;
            let statements = Parser::new(tokens).parse_statements()?;
            for stmt in statements {
                match stmt {
                    Stmt::Assign(name, expr) => {
                        let value = self.eval(&expr, &mut out)?;
                        self.vars.insert(name, value);
                    }
                    Stmt::Expr(expr) => {
                        let value = self.eval(&expr, &mut out)?;
                        if value != Value::None {
                            out.push_str(&value.repr());
                            out.push('\n');
                        }
                    }
                }
            }
        }
        while out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    fn eval(&self, expr: &Expr, out: &mut String) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Var(name) => self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedName(name.clone())),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, out)?;
                match op {
                    UnaryOp::Neg => match value {
                        Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(EvalError::Overflow),
                        Value::Float(x) => Ok(Value::Float(-x)),
                        other => Err(EvalError::TypeMismatch {
                            op: "-",
                            lhs: other.type_name(),
                            rhs: "nothing",
                        }),
                    },
                    UnaryOp::Not => match value {
                        Value::Bool(b) => Ok(Value::Bool(!b)),
                        other => Err(EvalError::NotBoolean {
                            op: "not",
                            actual: other.type_name(),
                        }),
                    },
                }
            }
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, out),
            Expr::Call { name, args } => self.eval_call(name, args, out),
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        out: &mut String,
    ) -> Result<Value, EvalError> {
        // `and`/`or` short-circuit, so the right side is only evaluated
        // when the left side does not decide the result.
        if op == BinaryOp::And || op == BinaryOp::Or {
            let left = self.eval(lhs, out)?;
            let left = match left {
                Value::Bool(b) => b,
                other => {
                    return Err(EvalError::NotBoolean {
                        op: op.symbol(),
                        actual: other.type_name(),
                    })
                }
            };
            if op == BinaryOp::And && !left {
                return Ok(Value::Bool(false));
            }
            if op == BinaryOp::Or && left {
                return Ok(Value::Bool(true));
            }
            return match self.eval(rhs, out)? {
                Value::Bool(b) => Ok(Value::Bool(b)),
                other => Err(EvalError::NotBoolean {
                    op: op.symbol(),
                    actual: other.type_name(),
                }),
            };
        }

        let left = self.eval(lhs, out)?;
        let right = self.eval(rhs, out)?;
        let mismatch = |op: BinaryOp| EvalError::TypeMismatch {
            op: op.symbol(),
            lhs: left.type_name(),
            rhs: right.type_name(),
        };

        match op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_add(*b).map(Value::Int).ok_or(EvalError::Overflow)
                }
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
                _ => numeric_pair(&left, &right)
                    .map(|(a, b)| Value::Float(a + b))
                    .ok_or_else(|| mismatch(op)),
            },
            BinaryOp::Sub => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_sub(*b).map(Value::Int).ok_or(EvalError::Overflow)
                }
                _ => numeric_pair(&left, &right)
                    .map(|(a, b)| Value::Float(a - b))
                    .ok_or_else(|| mismatch(op)),
            },
            BinaryOp::Mul => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_mul(*b).map(Value::Int).ok_or(EvalError::Overflow)
                }
                (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                    let count = usize::try_from(*n).unwrap_or(0);
                    Ok(Value::Str(s.repeat(count)))
                }
                _ => numeric_pair(&left, &right)
                    .map(|(a, b)| Value::Float(a * b))
                    .ok_or_else(|| mismatch(op)),
            },
            BinaryOp::Div => match (&left, &right) {
                (Value::Int(_), Value::Int(0)) => Err(EvalError::DivisionByZero),
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_div(*b).map(Value::Int).ok_or(EvalError::Overflow)
                }
                _ => numeric_pair(&left, &right)
                    .map(|(a, b)| Value::Float(a / b))
                    .ok_or_else(|| mismatch(op)),
            },
            BinaryOp::Rem => match (&left, &right) {
                (Value::Int(_), Value::Int(0)) => Err(EvalError::DivisionByZero),
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_rem(*b).map(Value::Int).ok_or(EvalError::Overflow)
                }
                _ => numeric_pair(&left, &right)
                    .map(|(a, b)| Value::Float(a % b))
                    .ok_or_else(|| mismatch(op)),
            },
            BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
            BinaryOp::Ne => Ok(Value::Bool(!values_equal(&left, &right))),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = match (&left, &right) {
                    (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
                    _ => numeric_pair(&left, &right).and_then(|(a, b)| a.partial_cmp(&b)),
                }
                .ok_or_else(|| mismatch(op))?;
                let result = match op {
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::Le => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    BinaryOp::Ge => ordering.is_ge(),
                    _ => unreachable!(),
                };
                Ok(Value::Bool(result))
            }
            BinaryOp::And | BinaryOp::Or => unreachable!(),
        }
    }

    fn eval_call(&self, name: &str, args: &[Expr], out: &mut String) -> Result<Value, EvalError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, out)?);
        }
        match name {
            "print" => {
                let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
                out.push_str(&rendered.join(" "));
                out.push('\n');
                Ok(Value::None)
            }
            "len" => {
                expect_arity(name, &values, 1)?;
                match &values[0] {
                    Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                    other => Err(EvalError::TypeMismatch {
                        op: "len",
                        lhs: other.type_name(),
                        rhs: "nothing",
                    }),
                }
            }
            "str" => {
                expect_arity(name, &values, 1)?;
                Ok(Value::Str(values[0].to_string()))
            }
            "abs" => {
                expect_arity(name, &values, 1)?;
                match &values[0] {
                    Value::Int(n) => n.checked_abs().map(Value::Int).ok_or(EvalError::Overflow),
                    Value::Float(x) => Ok(Value::Float(x.abs())),
                    other => Err(EvalError::TypeMismatch {
                        op: "abs",
                        lhs: other.type_name(),
                        rhs: "nothing",
                    }),
                }
            }
            _ => Err(EvalError::UnknownFunction(name.to_string())),
        }
    }
}

fn expect_arity(name: &str, values: &[Value], expected: usize) -> Result<(), EvalError> {
    if values.len() != expected {
        return Err(EvalError::BadArity {
            name: name.to_string(),
            expected,
            got: values.len(),
        });
    }
    Ok(())
}

fn numeric_pair(lhs: &Value, rhs: &Value) -> Option<(f64, f64)> {
    let coerce = |v: &Value| match v {
        Value::Int(n) => Some(*n as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    };
    Some((coerce(lhs)?, coerce(rhs)?))
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        _ => lhs == rhs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_one(source: &str) -> Result<String, EvalError> {
        Context::new().eval_source(source)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_one("1 + 1").unwrap(), "2");
        assert_eq!(eval_one("2 * 3 + 4").unwrap(), "10");
        assert_eq!(eval_one("2 + 3 * 4").unwrap(), "14");
        assert_eq!(eval_one("(2 + 3) * 4").unwrap(), "20");
        assert_eq!(eval_one("7 / 2").unwrap(), "3");
        assert_eq!(eval_one("7 % 2").unwrap(), "1");
        assert_eq!(eval_one("-5 + 2").unwrap(), "-3");
    }

    #[test]
    fn test_float_arithmetic() {
        assert_eq!(eval_one("1.5 + 2.5").unwrap(), "4.0");
        assert_eq!(eval_one("1 + 0.5").unwrap(), "1.5");
        assert_eq!(eval_one("7.0 / 2").unwrap(), "3.5");
    }

    #[test]
    fn test_strings() {
        assert_eq!(eval_one("'abc'").unwrap(), "'abc'");
        assert_eq!(eval_one("\"a\" + 'b'").unwrap(), "'ab'");
        assert_eq!(eval_one("'ab' * 3").unwrap(), "'ababab'");
        assert_eq!(eval_one("len('hello')").unwrap(), "5");
        assert_eq!(eval_one("print('hello')").unwrap(), "hello");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(eval_one(r"'a\nb'").unwrap(), r"'a\nb'");
        assert_eq!(eval_one(r"len('a\nb')").unwrap(), "3");
    }

    #[test]
    fn test_booleans_and_comparison() {
        assert_eq!(eval_one("1 < 2").unwrap(), "true");
        assert_eq!(eval_one("2 <= 1").unwrap(), "false");
        assert_eq!(eval_one("'a' < 'b'").unwrap(), "true");
        assert_eq!(eval_one("1 == 1.0").unwrap(), "true");
        assert_eq!(eval_one("1 != 'one'").unwrap(), "true");
        assert_eq!(eval_one("true and false").unwrap(), "false");
        assert_eq!(eval_one("true or false").unwrap(), "true");
        assert_eq!(eval_one("not false").unwrap(), "true");
    }

    #[test]
    fn test_short_circuit() {
        // The undefined right side must not be evaluated.
        assert_eq!(eval_one("false and missing").unwrap(), "false");
        assert_eq!(eval_one("true or missing").unwrap(), "true");
    }

    #[test]
    fn test_assignment_echoes_nothing() {
        assert_eq!(eval_one("x = 5").unwrap(), "");
    }

    #[test]
    fn test_bindings_persist_across_calls() {
        let mut ctx = Context::new();
        assert_eq!(ctx.eval_source("x = 5").unwrap(), "");
        assert_eq!(ctx.eval_source("x * 2").unwrap(), "10");
        assert_eq!(ctx.get("x"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_multiple_statements() {
        assert_eq!(eval_one("x = 2; x + 1").unwrap(), "3");
        assert_eq!(eval_one("print(1)\nprint(2)").unwrap(), "1\n2");
    }

    #[test]
    fn test_undefined_name() {
        assert_eq!(
            eval_one("nope").unwrap_err(),
            EvalError::UndefinedName("nope".to_string())
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval_one("1 / 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(eval_one("1 % 0").unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(
            eval_one("'a' - 1").unwrap_err(),
            EvalError::TypeMismatch { op: "-", .. }
        ));
        assert!(matches!(
            eval_one("1 and true").unwrap_err(),
            EvalError::NotBoolean { op: "and", .. }
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(eval_one("1 +").unwrap_err(), EvalError::Syntax(_)));
        assert!(matches!(
            eval_one("(1 + 2").unwrap_err(),
            EvalError::Syntax(_)
        ));
        assert!(matches!(eval_one("1 @ 2").unwrap_err(), EvalError::Syntax(_)));
    }

    #[test]
    fn test_unknown_function_and_arity() {
        assert_eq!(
            eval_one("frobnicate(1)").unwrap_err(),
            EvalError::UnknownFunction("frobnicate".to_string())
        );
        assert!(matches!(
            eval_one("len('a', 'b')").unwrap_err(),
            EvalError::BadArity { expected: 1, got: 2, .. }
        ));
    }

    #[test]
    fn test_builtins() {
        assert_eq!(eval_one("str(12)").unwrap(), "'12'");
        assert_eq!(eval_one("abs(-4)").unwrap(), "4");
        assert_eq!(eval_one("abs(-4.5)").unwrap(), "4.5");
        assert_eq!(eval_one("print(1, 'two', 3.0)").unwrap(), "1 two 3.0");
    }

    #[test]
    fn test_repr_str() {
        assert_eq!(repr_str("abc"), "'abc'");
        assert_eq!(repr_str("a'b"), r"'a\'b'");
        assert_eq!(repr_str("a\nb"), r"'a\nb'");
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            eval_one("9223372036854775807 + 1").unwrap_err(),
            EvalError::Overflow
        );
    }
}
