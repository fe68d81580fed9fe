//! A small boolean expression language for page rules.
//!
//! # Grammar
//!
//! ```text
//! expr       := or
//! or         := and ( "||" and )*
//! and        := unary ( "&&" unary )*
//! unary      := "!" unary | comparison
//! comparison := primary ( ( "==" | "!=" | "<" | "<=" | ">" | ">=" ) primary )?
//! primary    := string | number | "true" | "false" | "null" | path | "(" expr ")"
//! path       := ident ( "." ident )*
//! ```
//!
//! Paths are looked up in the variable map, descending into JSON objects;
//! anything missing resolves to `null`. `&&`, `||` and `!` need booleans and
//! short-circuit. Ordering comparisons work on two numbers or two strings.
//! Integers compare exactly; floats only when either side is fractional.
//! Nesting of `!` and parentheses is capped at [`MAX_NESTING_DEPTH`].

use std::cmp::Ordering;

use serde_json::Value;

use super::{RuleError, RuleVars};

/// Deepest run of `!` and `(` a rule may nest.
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Num(serde_json::Number),
    True,
    False,
    Null,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Dot,
    LParen,
    RParen,
}

/// Comparison operator in a parsed expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Parsed rule expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Path(Vec<String>),
    Not(Box<Expr>),
    /// Operands of a `&&` chain, in source order.
    And(Vec<Expr>),
    /// Operands of a `||` chain, in source order.
    Or(Vec<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parse `source` into an expression tree.
    pub fn parse(source: &str) -> Result<Self, RuleError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_or()?;
        if let Some((offset, token)) = parser.tokens.get(parser.pos) {
            return Err(RuleError::parse(
                *offset,
                format!("unexpected {:?} after end of expression", token),
            ));
        }
        Ok(expr)
    }

    /// Evaluate to a boolean against `vars`.
    pub fn evaluate(&self, vars: &RuleVars) -> Result<bool, RuleError> {
        match self.value(vars)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuleError::NotBoolean(other.to_string())),
        }
    }

    fn value(&self, vars: &RuleVars) -> Result<Value, RuleError> {
        match self {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Path(segments) => Ok(lookup(vars, segments)),
            Expr::Not(inner) => Ok(Value::Bool(!inner.evaluate(vars)?)),
            Expr::And(operands) => {
                for operand in operands {
                    if !operand.evaluate(vars)? {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
            Expr::Or(operands) => {
                for operand in operands {
                    if operand.evaluate(vars)? {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Expr::Compare(op, lhs, rhs) => {
                let (lhs, rhs) = (lhs.value(vars)?, rhs.value(vars)?);
                compare(*op, &lhs, &rhs).map(Value::Bool)
            }
        }
    }
}

fn lookup(vars: &RuleVars, segments: &[String]) -> Value {
    let Some((first, rest)) = segments.split_first() else {
        return Value::Null;
    };
    let mut current = match vars.get(first) {
        Some(v) => v,
        None => return Value::Null,
    };
    for segment in rest {
        match current.get(segment.as_str()) {
            Some(v) => current = v,
            None => return Value::Null,
        }
    }
    current.clone()
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool, RuleError> {
    match op {
        CompareOp::Eq => Ok(values_equal(lhs, rhs)),
        CompareOp::Ne => Ok(!values_equal(lhs, rhs)),
        _ => {
            let ordering = order(lhs, rhs)?;
            Ok(match op {
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Le => ordering != Ordering::Greater,
                CompareOp::Gt => ordering == Ordering::Greater,
                CompareOp::Ge => ordering != Ordering::Less,
                CompareOp::Eq | CompareOp::Ne => unreachable!("handled above"),
            })
        }
    }
}

// Numbers compare by value so `1` equals `1.0`.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
        _ => lhs == rhs,
    }
}

/// Exact for integer pairs; f64 only when a side has a fraction.
fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (integer(a), integer(b)) {
        return Some(a.cmp(&b));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

fn integer(n: &serde_json::Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn order(lhs: &Value, rhs: &Value) -> Result<Ordering, RuleError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b)
            .ok_or_else(|| RuleError::TypeMismatch("numbers are not comparable".into())),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => Err(RuleError::TypeMismatch(format!(
            "cannot order {} against {}",
            type_name(lhs),
            type_name(rhs)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, RuleError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            '.' => {
                chars.next();
                Token::Dot
            }
            '=' | '!' | '<' | '>' | '&' | '|' => {
                chars.next();
                let next = chars.peek().map(|&(_, n)| n);
                let (token, doubled) = match (c, next) {
                    ('=', Some('=')) => (Token::Eq, true),
                    ('!', Some('=')) => (Token::Ne, true),
                    ('<', Some('=')) => (Token::Le, true),
                    ('>', Some('=')) => (Token::Ge, true),
                    ('&', Some('&')) => (Token::And, true),
                    ('|', Some('|')) => (Token::Or, true),
                    ('!', _) => (Token::Not, false),
                    ('<', _) => (Token::Lt, false),
                    ('>', _) => (Token::Gt, false),
                    _ => {
                        return Err(RuleError::parse(offset, format!("unexpected '{}'", c)));
                    }
                };
                if doubled {
                    chars.next();
                }
                token
            }
            '\'' | '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        ch if ch == c => {
                            closed = true;
                            break;
                        }
                        ch => value.push(ch),
                    }
                }
                if !closed {
                    return Err(RuleError::parse(offset, "unterminated string literal"));
                }
                Token::Str(value)
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut text = String::new();
                text.push(c);
                chars.next();
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_ascii_digit() || n == '.' {
                        text.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Num(parse_number(&text).ok_or_else(|| {
                    RuleError::parse(offset, format!("invalid number '{}'", text))
                })?)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' {
                        ident.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match ident.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    _ => Token::Ident(ident),
                }
            }
            other => {
                return Err(RuleError::parse(offset, format!("unexpected '{}'", other)));
            }
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

fn parse_number(text: &str) -> Option<serde_json::Number> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n.into());
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(n.into());
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(o, _)| *o)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Run `f` one nesting level deeper, failing past the cap.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RuleError>,
    ) -> Result<T, RuleError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(RuleError::parse(
                self.offset(),
                format!("expression nested deeper than {}", MAX_NESTING_DEPTH),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_or(&mut self) -> Result<Expr, RuleError> {
        let mut operands = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.advance();
            operands.push(self.parse_and()?);
        }
        Ok(match operands.len() {
            1 => operands.remove(0),
            _ => Expr::Or(operands),
        })
    }

    fn parse_and(&mut self) -> Result<Expr, RuleError> {
        let mut operands = vec![self.parse_unary()?];
        while self.peek() == Some(&Token::And) {
            self.advance();
            operands.push(self.parse_unary()?);
        }
        Ok(match operands.len() {
            1 => operands.remove(0),
            _ => Expr::And(operands),
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, RuleError> {
        if self.peek() == Some(&Token::Not) {
            self.advance();
            let inner = self.nested(Self::parse_unary)?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, RuleError> {
        let lhs = self.parse_primary()?;
        let op = match self.peek() {
            Some(Token::Eq) => CompareOp::Eq,
            Some(Token::Ne) => CompareOp::Ne,
            Some(Token::Lt) => CompareOp::Lt,
            Some(Token::Le) => CompareOp::Le,
            Some(Token::Gt) => CompareOp::Gt,
            Some(Token::Ge) => CompareOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_primary()?;
        Ok(Expr::Compare(op, Box::new(lhs), Box::new(rhs)))
    }

    fn parse_primary(&mut self) -> Result<Expr, RuleError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::Num(n)) => Ok(Expr::Literal(Value::Number(n))),
            Some(Token::True) => Ok(Expr::Literal(Value::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(Value::Bool(false))),
            Some(Token::Null) => Ok(Expr::Literal(Value::Null)),
            Some(Token::Ident(first)) => {
                let mut segments = vec![first];
                while self.peek() == Some(&Token::Dot) {
                    self.advance();
                    let offset = self.offset();
                    match self.advance() {
                        Some(Token::Ident(segment)) => segments.push(segment),
                        _ => return Err(RuleError::parse(offset, "expected property name after '.'")),
                    }
                }
                Ok(Expr::Path(segments))
            }
            Some(Token::LParen) => {
                let inner = self.nested(Self::parse_or)?;
                let offset = self.offset();
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(RuleError::parse(offset, "expected ')'")),
                }
            }
            Some(token) => Err(RuleError::parse(offset, format!("unexpected {:?}", token))),
            None => Err(RuleError::parse(offset, "unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> RuleVars {
        match value {
            Value::Object(map) => map,
            _ => panic!("vars must be an object"),
        }
    }

    fn eval(source: &str, context: Value) -> Result<bool, RuleError> {
        Expr::parse(source)?.evaluate(&vars(context))
    }

    #[test]
    fn test_literals_and_logic() {
        assert_eq!(eval("true", json!({})), Ok(true));
        assert_eq!(eval("!true || false", json!({})), Ok(false));
        assert_eq!(eval("true && (false || true)", json!({})), Ok(true));
        assert_eq!(eval("!!true", json!({})), Ok(true));
    }

    #[test]
    fn test_paths_and_comparisons() {
        let ctx = json!({
            "customer": { "registered": true, "age": 34, "tier": "gold" },
            "locale": "en_US"
        });
        assert_eq!(eval("customer.registered", ctx.clone()), Ok(true));
        assert_eq!(eval("customer.age >= 18", ctx.clone()), Ok(true));
        assert_eq!(eval("customer.age < 30.5", ctx.clone()), Ok(false));
        assert_eq!(eval("customer.tier == 'gold'", ctx.clone()), Ok(true));
        assert_eq!(eval("locale != \"fr_FR\"", ctx.clone()), Ok(true));
        assert_eq!(eval("customer.age == 34.0", ctx.clone()), Ok(true));
        assert_eq!(eval("'abc' < 'abd'", ctx), Ok(true));
    }

    #[test]
    fn test_missing_variable_is_null() {
        assert_eq!(eval("cart.total == null", json!({})), Ok(true));
        assert_eq!(eval("customer.name == null", json!({"customer": {}})), Ok(true));
    }

    #[test]
    fn test_short_circuit_skips_type_errors() {
        assert_eq!(eval("false && ('a' < 1)", json!({})), Ok(false));
        assert_eq!(eval("true || ('a' < 1)", json!({})), Ok(true));
    }

    #[test]
    fn test_type_errors() {
        assert!(matches!(
            eval("'a' < 1", json!({})),
            Err(RuleError::TypeMismatch(_))
        ));
        assert!(matches!(
            eval("customer.age", json!({"customer": {"age": 3}})),
            Err(RuleError::NotBoolean(_))
        ));
        assert!(matches!(
            eval("missing && true", json!({})),
            Err(RuleError::NotBoolean(_))
        ));
    }

    #[test]
    fn test_parse_errors_report_offset() {
        match Expr::parse("customer.age >") {
            Err(RuleError::Parse { offset, .. }) => assert_eq!(offset, 13),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(Expr::parse(""), Err(RuleError::Parse { .. })));
        assert!(matches!(Expr::parse("a = b"), Err(RuleError::Parse { .. })));
        assert!(matches!(Expr::parse("(true"), Err(RuleError::Parse { .. })));
        assert!(matches!(Expr::parse("'open"), Err(RuleError::Parse { .. })));
        assert!(matches!(Expr::parse("true false"), Err(RuleError::Parse { .. })));
        assert!(matches!(Expr::parse("customer."), Err(RuleError::Parse { .. })));
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let at_cap = format!("{}true", "!".repeat(MAX_NESTING_DEPTH));
        assert_eq!(eval(&at_cap, json!({})), Ok(true));

        let parens = format!(
            "{}true{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert_eq!(eval(&parens, json!({})), Ok(true));

        for source in [
            format!("{}true", "!".repeat(MAX_NESTING_DEPTH + 1)),
            format!("{}true", "!".repeat(100_000)),
            format!("{}true", "(".repeat(100_000)),
            format!("{}true", "(!".repeat(50_000)),
        ] {
            assert!(matches!(
                Expr::parse(&source),
                Err(RuleError::Parse { .. })
            ));
        }
    }

    #[test]
    fn test_long_chains_stay_flat() {
        let source = vec!["true"; 100_000].join(" && ");
        let expr = Expr::parse(&source).unwrap();
        assert!(matches!(&expr, Expr::And(operands) if operands.len() == 100_000));
        assert_eq!(expr.evaluate(&RuleVars::new()), Ok(true));

        let source = format!("{} || true", vec!["false"; 100_000].join(" || "));
        assert_eq!(eval(&source, json!({})), Ok(true));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let ctx = json!({ "id": 9007199254740993u64, "big": u64::MAX, "neg": i64::MIN });
        assert_eq!(eval("id == 9007199254740992", ctx.clone()), Ok(false));
        assert_eq!(eval("id == 9007199254740993", ctx.clone()), Ok(true));
        assert_eq!(eval("id > 9007199254740992", ctx.clone()), Ok(true));
        assert_eq!(eval("big == 18446744073709551615", ctx.clone()), Ok(true));
        assert_eq!(eval("big > 18446744073709551614", ctx.clone()), Ok(true));
        assert_eq!(eval("neg < 0", ctx.clone()), Ok(true));
        assert_eq!(eval("neg == -9223372036854775808", ctx.clone()), Ok(true));
        assert_eq!(eval("id > 1.5", ctx.clone()), Ok(true));
        assert_eq!(eval("1 == 1.0", ctx), Ok(true));
    }
}
