/*
 * expression.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Directive expressions.
//!
//! The renderer never interprets expression text itself; it hands it to an
//! [`ExpressionEvaluator`]. [`StandardEvaluator`] is the default and
//! supports a small expression language:
//!
//! - Literals: `null`, `true`, `false`, integers, decimals and strings in
//!   `"..."` or `'...'` (with `\"`, `\'`, `\\`, `\n`, `\t` escapes)
//! - Names bound in the context; an unbound name is `null`
//! - Member access `a.b` on maps, and `size`/`length` on lists, strings
//!   and maps
//! - Method calls: `isEmpty()`, `isNotEmpty()`, `isBlank()`,
//!   `isNotBlank()`, `trim()`, `lowercase()`, `uppercase()`,
//!   `startsWith(s)`, `endsWith(s)`, `contains(x)`, and the LIKE helpers
//!   `escape()`, `asPrefix()`, `asInfix()`, `asSuffix()`
//! - Operators, loosest first: `||`/`or`, `&&`/`and`, `==` `!=`,
//!   `<` `<=` `>` `>=`, `+` `-`, `*` `/` `%`, and unary `!`/`not`, `-`
//!
//! The expression is parsed with a Pratt parser and evaluated directly.

use crate::eval_context::EvaluationContext;
use crate::value::{TypedValue, Value};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors raised while parsing or evaluating an expression.
///
/// The renderer wraps these into
/// [`TemplateError::Eval`](crate::error::TemplateError::Eval) together with
/// the directive location.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("cannot parse `{expression}`: {message}")]
    Parse { expression: String, message: String },

    #[error("{0}")]
    Type(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown method `{method}` on {receiver}")]
    UnknownMethod { method: String, receiver: String },
}

pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Evaluates directive expressions against the render context.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(
        &self,
        expression: &str,
        context: &EvaluationContext<'_>,
    ) -> ExpressionResult<TypedValue>;
}

/// The default expression evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl ExpressionEvaluator for StandardEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        context: &EvaluationContext<'_>,
    ) -> ExpressionResult<TypedValue> {
        let expr = parse(expression)?;
        eval(&expr, context)
    }
}

// ============================================================================
// Lexing
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
    Dot,
    Comma,
}

/// Longest operators first.
const OPERATORS: &[&str] = &[
    "||", "&&", "==", "!=", "<=", ">=", "<", ">", "+", "-", "*", "/", "%", "!",
];

fn lex(input: &str) -> Result<Vec<Tok>, String> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = rest.trim_start();
            continue;
        }
        let len = match c {
            '(' => {
                tokens.push(Tok::LParen);
                1
            }
            ')' => {
                tokens.push(Tok::RParen);
                1
            }
            '.' => {
                tokens.push(Tok::Dot);
                1
            }
            ',' => {
                tokens.push(Tok::Comma);
                1
            }
            '"' | '\'' => {
                let (s, len) = lex_string(rest, c)?;
                tokens.push(Tok::Str(s));
                len
            }
            c if c.is_ascii_digit() => {
                let (tok, len) = lex_number(rest)?;
                tokens.push(tok);
                len
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let len = rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                    .unwrap_or(rest.len());
                tokens.push(Tok::Ident(rest[..len].to_string()));
                len
            }
            _ => {
                let op = OPERATORS
                    .iter()
                    .find(|op| rest.starts_with(**op))
                    .ok_or_else(|| format!("unexpected character `{c}`"))?;
                tokens.push(Tok::Op(*op));
                op.len()
            }
        };
        rest = &rest[len..];
    }
    Ok(tokens)
}

fn lex_string(rest: &str, quote: char) -> Result<(String, usize), String> {
    let mut value = String::new();
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| "unterminated string".to_string())?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
            c if c == quote => return Ok((value, i + 1)),
            c => value.push(c),
        }
    }
    Err("unterminated string".to_string())
}

fn lex_number(rest: &str) -> Result<(Tok, usize), String> {
    let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut len = digits(rest);
    let fraction = rest[len..]
        .strip_prefix('.')
        .filter(|f| f.starts_with(|c: char| c.is_ascii_digit()));
    match fraction {
        Some(f) => {
            len += 1 + digits(f);
            let text = &rest[..len];
            let x = text
                .parse::<f64>()
                .map_err(|_| format!("invalid number `{text}`"))?;
            Ok((Tok::Float(x), len))
        }
        None => {
            let text = &rest[..len];
            let i = text
                .parse::<i64>()
                .map_err(|_| format!("integer `{text}` is out of range"))?;
            Ok((Tok::Int(i), len))
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Value),
    Name(String),
    Member(Box<Expr>, String),
    Call {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Binding power for operators in Pratt parser style.
///
/// All binary operators here are left-associative: `left < right`.
#[derive(Debug, Clone, Copy)]
struct BindingPower {
    left: u8,
    right: u8,
}

impl BindingPower {
    const fn left(power: u8) -> Self {
        Self {
            left: power,
            right: power + 1,
        }
    }
}

/// Right binding power of the prefix operators.
const PREFIX: u8 = 14;

impl BinaryOp {
    fn binding_power(self) -> BindingPower {
        match self {
            BinaryOp::Or => BindingPower::left(2),
            BinaryOp::And => BindingPower::left(4),
            BinaryOp::Eq | BinaryOp::Ne => BindingPower::left(6),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => BindingPower::left(8),
            BinaryOp::Add | BinaryOp::Sub => BindingPower::left(10),
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => BindingPower::left(12),
        }
    }

    fn from_token(tok: &Tok) -> Option<Self> {
        let op = match tok {
            Tok::Op("||") => BinaryOp::Or,
            Tok::Op("&&") => BinaryOp::And,
            Tok::Ident(word) if word == "or" => BinaryOp::Or,
            Tok::Ident(word) if word == "and" => BinaryOp::And,
            Tok::Op("==") => BinaryOp::Eq,
            Tok::Op("!=") => BinaryOp::Ne,
            Tok::Op("<") => BinaryOp::Lt,
            Tok::Op("<=") => BinaryOp::Le,
            Tok::Op(">") => BinaryOp::Gt,
            Tok::Op(">=") => BinaryOp::Ge,
            Tok::Op("+") => BinaryOp::Add,
            Tok::Op("-") => BinaryOp::Sub,
            Tok::Op("*") => BinaryOp::Mul,
            Tok::Op("/") => BinaryOp::Div,
            Tok::Op("%") => BinaryOp::Rem,
            _ => return None,
        };
        Some(op)
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
}

fn parse(expression: &str) -> ExpressionResult<Expr> {
    let parse_error = |message: String| ExpressionError::Parse {
        expression: expression.to_string(),
        message,
    };
    let tokens = lex(expression).map_err(parse_error)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0).map_err(parse_error)?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(parse_error(format!("unexpected {}", describe(tok)))),
    }
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Int(i) => format!("number `{i}`"),
        Tok::Float(x) => format!("number `{x}`"),
        Tok::Str(s) => format!("string {s:?}"),
        Tok::Ident(name) => format!("`{name}`"),
        Tok::Op(op) => format!("`{op}`"),
        Tok::LParen => "`(`".to_string(),
        Tok::RParen => "`)`".to_string(),
        Tok::Dot => "`.`".to_string(),
        Tok::Comma => "`,`".to_string(),
    }
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: Tok) -> Result<(), String> {
        match self.next() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(format!(
                "expected {}, found {}",
                describe(&expected),
                describe(&tok)
            )),
            None => Err(format!("expected {}", describe(&expected))),
        }
    }

    /// Core Pratt loop: a prefix expression, then binary operators whose
    /// left binding power is at least `min_bp`.
    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, String> {
        let mut lhs = self.parse_prefix()?;
        while let Some(op) = self.peek().and_then(BinaryOp::from_token) {
            let bp = op.binding_power();
            if bp.left < min_bp {
                break;
            }
            self.pos += 1;
            let rhs = self.parse_expr(bp.right)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Tok::Op("!")) => {
                self.pos += 1;
                Ok(Expr::Not(Box::new(self.parse_expr(PREFIX)?)))
            }
            Some(Tok::Ident(word)) if word == "not" => {
                self.pos += 1;
                Ok(Expr::Not(Box::new(self.parse_expr(PREFIX)?)))
            }
            Some(Tok::Op("-")) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.parse_expr(PREFIX)?)))
            }
            _ => {
                let primary = self.parse_primary()?;
                self.parse_postfix(primary)
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Tok::Int(i)) => Ok(Expr::Literal(Value::Int(i))),
            Some(Tok::Float(x)) => Ok(Expr::Literal(Value::Float(x))),
            Some(Tok::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Tok::Ident(name)) => Ok(match name.as_str() {
                "null" => Expr::Literal(Value::Null),
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                _ => Expr::Name(name),
            }),
            Some(Tok::LParen) => {
                let inner = self.parse_expr(0)?;
                self.expect(Tok::RParen)?;
                Ok(inner)
            }
            Some(tok) => Err(format!("unexpected {}", describe(&tok))),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    /// `.name` and `.name(args)` after a primary expression.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, String> {
        while self.peek() == Some(&Tok::Dot) {
            self.pos += 1;
            let name = match self.next() {
                Some(Tok::Ident(name)) => name,
                Some(tok) => return Err(format!("expected a name after `.`, found {}", describe(&tok))),
                None => return Err("expected a name after `.`".to_string()),
            };
            if self.peek() == Some(&Tok::LParen) {
                self.pos += 1;
                let args = self.parse_args()?;
                expr = Expr::Call {
                    receiver: Box::new(expr),
                    method: name,
                    args,
                };
            } else {
                expr = Expr::Member(Box::new(expr), name);
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, String> {
        let mut args = Vec::new();
        if self.peek() == Some(&Tok::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr(0)?);
            match self.next() {
                Some(Tok::Comma) => continue,
                Some(Tok::RParen) => return Ok(args),
                Some(tok) => return Err(format!("expected `,` or `)`, found {}", describe(&tok))),
                None => return Err("expected `)`".to_string()),
            }
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

fn type_error(message: impl Into<String>) -> ExpressionError {
    ExpressionError::Type(message.into())
}

fn eval(expr: &Expr, ctx: &EvaluationContext<'_>) -> ExpressionResult<TypedValue> {
    match expr {
        Expr::Literal(value) => Ok(TypedValue::inferred(value.clone())),
        // Declared types flow through bare names only.
        Expr::Name(name) => Ok(ctx.get(name).cloned().unwrap_or_else(TypedValue::null)),
        Expr::Member(receiver, name) => {
            let receiver = eval(receiver, ctx)?.value;
            member(&receiver, name).map(TypedValue::inferred)
        }
        Expr::Call {
            receiver,
            method,
            args,
        } => {
            let receiver = eval(receiver, ctx)?.value;
            let args = args
                .iter()
                .map(|arg| eval(arg, ctx).map(|t| t.value))
                .collect::<ExpressionResult<Vec<_>>>()?;
            call(&receiver, method, &args).map(TypedValue::inferred)
        }
        Expr::Not(inner) => match eval(inner, ctx)?.value {
            Value::Bool(b) => Ok(TypedValue::inferred(!b)),
            other => Err(type_error(format!(
                "`!` expects a bool, found {}",
                other.value_type()
            ))),
        },
        Expr::Neg(inner) => match eval(inner, ctx)?.value {
            Value::Int(i) => i
                .checked_neg()
                .map(TypedValue::inferred)
                .ok_or_else(|| type_error("integer overflow")),
            Value::Float(x) => Ok(TypedValue::inferred(-x)),
            other => Err(type_error(format!(
                "`-` expects a number, found {}",
                other.value_type()
            ))),
        },
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            Ok(TypedValue::inferred(bool_operand(lhs, ctx, "&&")? && bool_operand(rhs, ctx, "&&")?))
        }
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            Ok(TypedValue::inferred(bool_operand(lhs, ctx, "||")? || bool_operand(rhs, ctx, "||")?))
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval(lhs, ctx)?.value;
            let rhs = eval(rhs, ctx)?.value;
            binary(*op, &lhs, &rhs).map(TypedValue::inferred)
        }
    }
}

fn bool_operand(expr: &Expr, ctx: &EvaluationContext<'_>, op: &str) -> ExpressionResult<bool> {
    match eval(expr, ctx)?.value {
        Value::Bool(b) => Ok(b),
        other => Err(type_error(format!(
            "`{op}` expects bool operands, found {}",
            other.value_type()
        ))),
    }
}

fn member(receiver: &Value, name: &str) -> ExpressionResult<Value> {
    match receiver {
        Value::Null => Ok(Value::Null),
        Value::Map(map) => Ok(match map.get(name) {
            Some(value) => value.clone(),
            None if is_size(name) => Value::from(map.len()),
            None => Value::Null,
        }),
        Value::List(items) if is_size(name) => Ok(Value::from(items.len())),
        Value::String(s) if is_size(name) => Ok(Value::from(s.chars().count())),
        other => Err(type_error(format!(
            "{} has no property `{name}`",
            other.value_type()
        ))),
    }
}

fn is_size(name: &str) -> bool {
    name == "size" || name == "length"
}

fn call(receiver: &Value, method: &str, args: &[Value]) -> ExpressionResult<Value> {
    let arity = |expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(type_error(format!(
                "`{method}` expects {expected} argument(s), found {}",
                args.len()
            )))
        }
    };
    let string_arg = || match args.first() {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(type_error(format!(
            "`{method}` expects a string argument, found {}",
            other.value_type()
        ))),
        None => Err(type_error(format!("`{method}` expects an argument"))),
    };

    match method {
        "isEmpty" | "isNotEmpty" => {
            arity(0)?;
            let empty = match receiver {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::List(items) => items.is_empty(),
                Value::Map(map) => map.is_empty(),
                other => return Err(unknown_method(method, other)),
            };
            Ok(Value::Bool(empty == (method == "isEmpty")))
        }
        "isBlank" | "isNotBlank" => {
            arity(0)?;
            let blank = match receiver {
                Value::Null => true,
                Value::String(s) => s.trim().is_empty(),
                other => return Err(unknown_method(method, other)),
            };
            Ok(Value::Bool(blank == (method == "isBlank")))
        }
        "trim" | "lowercase" | "uppercase" | "escape" | "asPrefix" | "asInfix" | "asSuffix" => {
            arity(0)?;
            let s = match receiver {
                Value::Null => return Ok(Value::Null),
                Value::String(s) => s,
                other => return Err(unknown_method(method, other)),
            };
            Ok(Value::String(match method {
                "trim" => s.trim().to_string(),
                "lowercase" => s.to_lowercase(),
                "uppercase" => s.to_uppercase(),
                "escape" => escape_like(s),
                "asPrefix" => format!("{}%", escape_like(s)),
                "asInfix" => format!("%{}%", escape_like(s)),
                _ => format!("%{}", escape_like(s)),
            }))
        }
        "startsWith" | "endsWith" => {
            arity(1)?;
            let needle = string_arg()?;
            match receiver {
                Value::String(s) if method == "startsWith" => Ok(Value::Bool(s.starts_with(needle))),
                Value::String(s) => Ok(Value::Bool(s.ends_with(needle))),
                other => Err(unknown_method(method, other)),
            }
        }
        "contains" => {
            arity(1)?;
            match receiver {
                Value::String(s) => Ok(Value::Bool(s.contains(string_arg()?))),
                Value::List(items) => Ok(Value::Bool(items.iter().any(|item| values_equal(item, &args[0])))),
                Value::Map(map) => Ok(Value::Bool(map.contains_key(string_arg()?))),
                other => Err(unknown_method(method, other)),
            }
        }
        _ => Err(unknown_method(method, receiver)),
    }
}

fn unknown_method(method: &str, receiver: &Value) -> ExpressionError {
    ExpressionError::UnknownMethod {
        method: method.to_string(),
        receiver: receiver.value_type().to_string(),
    }
}

/// Escape `\`, `%` and `_` for use in a LIKE pattern with `\` as the escape
/// character.
pub fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(i), Value::Float(x)) | (Value::Float(x), Value::Int(i)) => *i as f64 == *x,
        _ => a == b,
    }
}

fn compare(op: BinaryOp, a: &Value, b: &Value) -> ExpressionResult<Option<Ordering>> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Some(x.cmp(y))),
        (Value::String(x), Value::String(y)) => Ok(Some(x.cmp(y))),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            Ok(as_f64(a).partial_cmp(&as_f64(b)))
        }
        _ => Err(type_error(format!(
            "cannot compare {} {} {}",
            a.value_type(),
            op.symbol(),
            b.value_type()
        ))),
    }
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Int(i) => *i as f64,
        Value::Float(x) => *x,
        _ => f64::NAN,
    }
}

fn binary(op: BinaryOp, a: &Value, b: &Value) -> ExpressionResult<Value> {
    let mismatch = || {
        type_error(format!(
            "unsupported operands {} {} {}",
            a.value_type(),
            op.symbol(),
            b.value_type()
        ))
    };
    let overflow = || type_error("integer overflow");

    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(a, b))),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(a, b))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(op, a, b)?;
            Ok(Value::Bool(match (op, ordering) {
                (_, None) => false,
                (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
                (BinaryOp::Le, Some(o)) => o != Ordering::Greater,
                (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
                (_, Some(o)) => o != Ordering::Less,
            }))
        }
        BinaryOp::Add => match (a, b) {
            (Value::String(_), _) | (_, Value::String(_)) => Ok(Value::String(format!("{a}{b}"))),
            (Value::Int(x), Value::Int(y)) => x.checked_add(*y).map(Value::Int).ok_or_else(overflow),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                Ok(Value::Float(as_f64(a) + as_f64(b)))
            }
            _ => Err(mismatch()),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => match (a, b) {
            (Value::Int(x), Value::Int(y)) => {
                let (x, y) = (*x, *y);
                if y == 0 && matches!(op, BinaryOp::Div | BinaryOp::Rem) {
                    return Err(ExpressionError::DivisionByZero);
                }
                let result = match op {
                    BinaryOp::Sub => x.checked_sub(y),
                    BinaryOp::Mul => x.checked_mul(y),
                    BinaryOp::Div => x.checked_div(y),
                    _ => x.checked_rem(y),
                };
                result.map(Value::Int).ok_or_else(overflow)
            }
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let (x, y) = (as_f64(a), as_f64(b));
                if y == 0.0 && matches!(op, BinaryOp::Div | BinaryOp::Rem) {
                    return Err(ExpressionError::DivisionByZero);
                }
                Ok(Value::Float(match op {
                    BinaryOp::Sub => x - y,
                    BinaryOp::Mul => x * y,
                    BinaryOp::Div => x / y,
                    _ => x % y,
                }))
            }
            _ => Err(mismatch()),
        },
        // short-circuited in `eval`
        BinaryOp::And | BinaryOp::Or => Err(mismatch()),
    }
}
