//! Sandboxed expression evaluator.
//!
//! Backs the shell's expression command. Expressions can only see the names
//! in an explicit [`Bindings`] table handed in by the caller; there is no
//! ambient interpreter state and no way to reach the process.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := or
//! or      := and ("or" and)*
//! and     := not ("and" not)*
//! not     := "not" not | compare
//! compare := sum (("==" | "!=" | "<" | "<=" | ">" | ">=") sum)?
//! sum     := product (("+" | "-") product)*
//! product := unary (("*" | "/" | "%") unary)*
//! unary   := "-" unary | atom
//! atom    := number | string | name | name "(" args ")" | "(" expr ")"
//! ```
//!
//! Booleans are represented as the integers `1` and `0`, as in SQL.

use std::collections::BTreeMap;

use bqlsh_foundation::{Error, Result, Value};

/// Names visible to an expression.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    /// Creates an empty binding table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to bind a name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    /// Binds `name` to `value`, replacing any earlier binding.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Looks up a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the bound names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Evaluates `source` against `bindings`.
///
/// # Errors
///
/// Returns an evaluation error for syntax errors, unknown names or
/// functions, type mismatches, overflow, and division by zero.
pub fn evaluate(source: &str, bindings: &Bindings) -> Result<Value> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        bindings,
    };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(tok) => Err(Error::eval(format!("unexpected {tok}"))),
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Int(i64),
    Real(f64),
    Str(String),
    Name(String),
    Op(&'static str),
}

impl std::fmt::Display for Tok {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "number {i}"),
            Self::Real(r) => write!(f, "number {r}"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Name(n) => write!(f, "name {n}"),
            Self::Op(op) => write!(f, "'{op}'"),
        }
    }
}

const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "<", ">", "+", "-", "*", "/", "%", "(", ")", ",",
];

fn lex(source: &str) -> Result<Vec<Tok>> {
    let mut tokens = Vec::new();
    let mut rest = source;
    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
        } else if c.is_ascii_digit() {
            let end = rest
                .find(|ch: char| !(ch.is_ascii_digit() || ch == '.' || ch == '_'))
                .unwrap_or(rest.len());
            let text = rest[..end].replace('_', "");
            let tok = if text.contains('.') {
                text.parse().map(Tok::Real).ok()
            } else {
                text.parse().map(Tok::Int).ok()
            };
            tokens.push(tok.ok_or_else(|| Error::eval(format!("bad number: {text}")))?);
            rest = &rest[end..];
        } else if c == '\'' || c == '"' {
            let (text, len) = lex_string(rest, c)?;
            tokens.push(Tok::Str(text));
            rest = &rest[len..];
        } else if c.is_alphabetic() || c == '_' {
            let end = rest
                .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                .unwrap_or(rest.len());
            tokens.push(Tok::Name(rest[..end].to_string()));
            rest = &rest[end..];
        } else if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(*op)) {
            tokens.push(Tok::Op(*op));
            rest = &rest[op.len()..];
        } else {
            return Err(Error::eval(format!("unexpected character {c:?}")));
        }
    }
    Ok(tokens)
}

/// Lexes a quoted string starting at `rest[0]`, returning the unescaped text
/// and the number of bytes consumed.
fn lex_string(rest: &str, quote: char) -> Result<(String, usize)> {
    let mut text = String::new();
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, other)) => text.push(other),
                None => break,
            },
            c if c == quote => return Ok((text, i + c.len_utf8())),
            c => text.push(c),
        }
    }
    Err(Error::eval("unterminated string"))
}

struct Parser<'b> {
    tokens: Vec<Tok>,
    pos: usize,
    bindings: &'b Bindings,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if matches!(self.peek(), Some(Tok::Op(o)) if *o == op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(Tok::Name(n)) if n == word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<Value> {
        let mut lhs = self.and()?;
        while self.eat_word("or") {
            let rhs = self.and()?;
            lhs = boolean(truthy(&lhs) || truthy(&rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Value> {
        let mut lhs = self.not()?;
        while self.eat_word("and") {
            let rhs = self.not()?;
            lhs = boolean(truthy(&lhs) && truthy(&rhs));
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<Value> {
        if self.eat_word("not") {
            let value = self.not()?;
            return Ok(boolean(!truthy(&value)));
        }
        self.compare()
    }

    fn compare(&mut self) -> Result<Value> {
        let lhs = self.sum()?;
        for op in ["==", "!=", "<=", ">=", "<", ">"] {
            if self.eat_op(op) {
                let rhs = self.sum()?;
                return compare(op, &lhs, &rhs);
            }
        }
        Ok(lhs)
    }

    fn sum(&mut self) -> Result<Value> {
        let mut lhs = self.product()?;
        loop {
            if self.eat_op("+") {
                let rhs = self.product()?;
                lhs = arith('+', &lhs, &rhs)?;
            } else if self.eat_op("-") {
                let rhs = self.product()?;
                lhs = arith('-', &lhs, &rhs)?;
            } else {
                return Ok(lhs);
            }
        }
    }

    fn product(&mut self) -> Result<Value> {
        let mut lhs = self.unary()?;
        loop {
            let op = if self.eat_op("*") {
                '*'
            } else if self.eat_op("/") {
                '/'
            } else if self.eat_op("%") {
                '%'
            } else {
                return Ok(lhs);
            };
            let rhs = self.unary()?;
            lhs = arith(op, &lhs, &rhs)?;
        }
    }

    fn unary(&mut self) -> Result<Value> {
        if self.eat_op("-") {
            let value = self.unary()?;
            return arith('-', &Value::Integer(0), &value);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Value> {
        match self.next() {
            Some(Tok::Int(i)) => Ok(Value::Integer(i)),
            Some(Tok::Real(r)) => Ok(Value::Real(r)),
            Some(Tok::Str(s)) => Ok(Value::Text(s)),
            Some(Tok::Op("(")) => {
                let value = self.expr()?;
                if self.eat_op(")") {
                    Ok(value)
                } else {
                    Err(Error::eval("expected ')'"))
                }
            }
            Some(Tok::Name(name)) if self.eat_op("(") => {
                let mut args = Vec::new();
                if !self.eat_op(")") {
                    loop {
                        args.push(self.expr()?);
                        if self.eat_op(")") {
                            break;
                        }
                        if !self.eat_op(",") {
                            return Err(Error::eval("expected ',' or ')'"));
                        }
                    }
                }
                call(&name, &args)
            }
            Some(Tok::Name(name)) => self.name(&name),
            Some(tok) => Err(Error::eval(format!("unexpected {tok}"))),
            None => Err(Error::eval("unexpected end of expression")),
        }
    }

    fn name(&self, name: &str) -> Result<Value> {
        match name {
            "True" | "true" => Ok(boolean(true)),
            "False" | "false" => Ok(boolean(false)),
            "None" | "null" | "NULL" => Ok(Value::Null),
            _ => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| Error::eval(format!("name '{name}' is not defined"))),
        }
    }
}

fn boolean(b: bool) -> Value {
    Value::Integer(i64::from(b))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Integer(i) => *i != 0,
        Value::Real(r) => *r != 0.0,
        Value::Text(s) => !s.is_empty(),
        Value::Blob(b) => !b.is_empty(),
    }
}

fn arith(op: char, lhs: &Value, rhs: &Value) -> Result<Value> {
    let overflow = || Error::eval("integer overflow");
    match (op, lhs, rhs) {
        ('+', Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
        ('+', Value::Integer(a), Value::Integer(b)) => a.checked_add(*b).map(Value::Integer).ok_or_else(overflow),
        ('-', Value::Integer(a), Value::Integer(b)) => a.checked_sub(*b).map(Value::Integer).ok_or_else(overflow),
        ('*', Value::Integer(a), Value::Integer(b)) => a.checked_mul(*b).map(Value::Integer).ok_or_else(overflow),
        ('%', Value::Integer(_), Value::Integer(0)) | ('/', _, Value::Integer(0)) => {
            Err(Error::eval("division by zero"))
        }
        ('%', Value::Integer(a), Value::Integer(b)) => a.checked_rem_euclid(*b).map(Value::Integer).ok_or_else(overflow),
        (op, a, b) => {
            let (Some(x), Some(y)) = (a.as_real(), b.as_real()) else {
                return Err(Error::eval(format!(
                    "unsupported operand types for {op}: {} and {}",
                    a.type_name(),
                    b.type_name()
                )));
            };
            match op {
                '+' => Ok(Value::Real(x + y)),
                '-' => Ok(Value::Real(x - y)),
                '*' => Ok(Value::Real(x * y)),
                '/' if y == 0.0 => Err(Error::eval("division by zero")),
                '/' => Ok(Value::Real(x / y)),
                _ => Ok(Value::Real(x % y)),
            }
        }
    }
}

fn compare(op: &str, lhs: &Value, rhs: &Value) -> Result<Value> {
    let ordering = match (lhs, rhs) {
        (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
        (Value::Null, Value::Null) => Some(std::cmp::Ordering::Equal),
        (Value::Null, _) | (_, Value::Null) => None,
        (a, b) => match (a.as_real(), b.as_real()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => {
                return Err(Error::eval(format!(
                    "cannot compare {} with {}",
                    a.type_name(),
                    b.type_name()
                )));
            }
        },
    };
    let result = match (op, ordering) {
        ("==", ord) => ord.is_some_and(std::cmp::Ordering::is_eq),
        ("!=", ord) => !ord.is_some_and(std::cmp::Ordering::is_eq),
        (_, None) => false,
        ("<", Some(ord)) => ord.is_lt(),
        ("<=", Some(ord)) => ord.is_le(),
        (">", Some(ord)) => ord.is_gt(),
        (_, Some(ord)) => ord.is_ge(),
    };
    Ok(boolean(result))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn call(name: &str, args: &[Value]) -> Result<Value> {
    match (name, args) {
        ("len", [Value::Text(s)]) => Ok(Value::Integer(s.chars().count() as i64)),
        ("len", [Value::Blob(b)]) => Ok(Value::Integer(b.len() as i64)),
        ("str", [v]) => Ok(Value::Text(v.to_string())),
        ("abs", [Value::Integer(i)]) => i.checked_abs().map(Value::Integer).ok_or_else(|| Error::eval("integer overflow")),
        ("abs", [Value::Real(r)]) => Ok(Value::Real(r.abs())),
        ("int", [Value::Integer(i)]) => Ok(Value::Integer(*i)),
        ("int", [Value::Real(r)]) if r.is_finite() => Ok(Value::Integer(r.trunc() as i64)),
        ("int", [Value::Text(s)]) => s
            .trim()
            .parse()
            .map(Value::Integer)
            .map_err(|_| Error::eval(format!("invalid literal for int(): {s:?}"))),
        ("float", [v]) => match v {
            Value::Text(s) => s
                .trim()
                .parse()
                .map(Value::Real)
                .map_err(|_| Error::eval(format!("could not convert string to float: {s:?}"))),
            other => other
                .as_real()
                .map(Value::Real)
                .ok_or_else(|| Error::eval(format!("float() of {}", other.type_name()))),
        },
        ("len" | "str" | "abs" | "int" | "float", _) => Err(Error::eval(format!(
            "bad arguments to {name}() ({} given)",
            args.len()
        ))),
        _ => Err(Error::eval(format!("name '{name}' is not a function"))),
    }
}
