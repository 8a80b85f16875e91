//! Formula language used by interactive states.
//!
//! Formulas are compiled once with [`parse`] and evaluated every frame with [`evaluate`] against
//! a [`Symbols`] table. Per-frame consumers wrap a formula in a [`Formula`], which never fails
//! and falls back to a default value instead.

mod evaluator;
mod lexer;
mod parser;

pub use evaluator::{Builtin, builtin, evaluate};
pub use parser::{BinaryOp, Expr, UnaryOp, parse};

use crate::ExpressionError;
use std::collections::{BTreeMap, HashMap};

/// Result of a formula: formulas mix numbers and booleans freely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    /// Numeric view of the value; `true` is 1 and `false` is 0.
    pub fn as_number(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Value::Number(n) => n != 0.0 && !n.is_nan(),
            Value::Bool(b) => b,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// A read-only symbol table consulted before the built-in math symbols.
pub trait Symbols {
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl Symbols for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).copied()
    }
}

impl Symbols for BTreeMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).copied()
    }
}

impl<S: Symbols + ?Sized> Symbols for &S {
    fn lookup(&self, name: &str) -> Option<Value> {
        (**self).lookup(name)
    }
}

/// A compiled formula that always produces a number.
///
/// Parse failures and evaluation failures (undefined symbols, arity mismatches) both yield the
/// default value.
#[derive(Clone, Debug)]
pub struct Formula {
    source: String,
    compiled: Result<Expr, ExpressionError>,
    default: f64,
}

impl Formula {
    pub fn new(source: impl Into<String>, default: f64) -> Self {
        let source = source.into();
        let compiled = parse(&source);
        Self {
            source,
            compiled,
            default,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    pub fn compile_error(&self) -> Option<&ExpressionError> {
        self.compiled.as_ref().err()
    }

    pub fn call<S: Symbols + ?Sized>(&self, symbols: &S) -> f64 {
        match &self.compiled {
            Ok(expr) => evaluate(expr, symbols)
                .map(Value::as_number)
                .unwrap_or(self.default),
            Err(_) => self.default,
        }
    }
}

/// Compiles `formula` into a callback that substitutes `default` for any failure.
pub fn formula_to_function(formula: &str, default: f64) -> Formula {
    Formula::new(formula, default)
}
