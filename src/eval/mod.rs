//! Sandboxed parsing and evaluation of arithmetic expressions.
//!
//! Untrusted text goes through a staged pipeline: a character-class gate, a
//! denylist scan for dangerous token sequences, a lexer, a recursive-descent
//! parser over a closed AST, and a tree-walk evaluator. No stage ever hands
//! the text to a general-purpose interpreter, so the reachable operation set
//! is exactly the whitelist below.

use miette::Diagnostic;
use thiserror::Error;

mod guard;
mod lexer;
mod parser;

/// Why an expression was rejected.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum EvalError {
    #[error("expression contains disallowed character '{ch}' at byte {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    #[error("expression matches unsafe pattern `{pattern}`")]
    UnsafePattern { pattern: &'static str },

    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("domain error: {reason}")]
    Domain { reason: String },
}

/// Whitelisted function names and their arity.
///
/// An identifier followed by `(` must appear here (case-insensitively) or the
/// expression is rejected outright.
const FUNCTIONS: &[(&str, usize)] = &[
    ("sin", 1),
    ("cos", 1),
    ("tan", 1),
    ("asin", 1),
    ("acos", 1),
    ("atan", 1),
    ("atan2", 2),
    ("sinh", 1),
    ("cosh", 1),
    ("tanh", 1),
    ("log", 1),
    ("log10", 1),
    ("ln", 1),
    ("exp", 1),
    ("sqrt", 1),
    ("abs", 1),
    ("pow", 2),
    ("ceil", 1),
    ("floor", 1),
    ("fabs", 1),
    ("fmod", 2),
    ("degrees", 1),
    ("radians", 1),
    ("hypot", 2),
];

fn function_arity(name: &str) -> Option<usize> {
    FUNCTIONS
        .iter()
        .find_map(|(f, arity)| name.eq_ignore_ascii_case(f).then_some(*arity))
}

/// Whitelisted constants. Resolved at identifier boundaries during parsing,
/// never by substring replacement, so `pi` inside a longer identifier does
/// not match.
fn constant(name: &str) -> Option<f64> {
    if name.eq_ignore_ascii_case("pi") {
        Some(std::f64::consts::PI)
    } else if name.eq_ignore_ascii_case("e") {
        Some(std::f64::consts::E)
    } else {
        None
    }
}

/// Evaluate an untrusted arithmetic expression.
///
/// Supports `+ - * / % ^` (power is right-associative), parentheses, unary
/// minus, the constants `pi` and `e`, and a fixed set of math functions.
/// Every failure path is a typed [`EvalError`]; bad input never panics.
///
/// # Example
/// ```rust
/// assert_eq!(safecalc::evaluate("3 * (4 + 2) / 2").unwrap(), 9.0);
/// assert_eq!(safecalc::evaluate("2^3^2").unwrap(), 512.0);
/// assert!(safecalc::evaluate("sqrt(-1)").is_err());
/// ```
pub fn evaluate(raw: &str) -> Result<f64, EvalError> {
    guard::check_characters(raw)?;
    guard::check_unsafe_patterns(raw)?;

    let tokens = lexer::lex(raw)?;
    let expr = parser::parse(&tokens)?;
    let value = expr.eval()?;

    if !value.is_finite() {
        return Err(EvalError::Domain {
            reason: "expression does not evaluate to a finite number".into(),
        });
    }

    tracing::debug!(expr = raw, value, "evaluated expression");

    Ok(value)
}
