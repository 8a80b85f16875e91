use super::parser::{BinaryOp, Expr, UnaryOp};
use super::{Symbols, Value};
use crate::ExpressionError;

/// A built-in math symbol, available to every formula unless shadowed by a user symbol.
#[derive(Clone, Copy, Debug)]
pub enum Builtin {
    Constant(f64),
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
}

impl Builtin {
    /// Number of operands a function expects, `None` for constants.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Builtin::Constant(_) => None,
            Builtin::Unary(_) => Some(1),
            Builtin::Binary(_) => Some(2),
        }
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn sign(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 { x } else { x.signum() }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}

/// Looks up a built-in constant or function by name.
pub fn builtin(name: &str) -> Option<Builtin> {
    use std::f64::consts;

    let symbol = match name {
        "E" => Builtin::Constant(consts::E),
        "LN10" => Builtin::Constant(consts::LN_10),
        "LN2" => Builtin::Constant(consts::LN_2),
        "LOG10E" => Builtin::Constant(consts::LOG10_E),
        "LOG2E" => Builtin::Constant(consts::LOG2_E),
        "PI" => Builtin::Constant(consts::PI),
        "SQRT1_2" => Builtin::Constant(consts::FRAC_1_SQRT_2),
        "SQRT2" => Builtin::Constant(consts::SQRT_2),

        "abs" => Builtin::Unary(f64::abs),
        "acos" => Builtin::Unary(f64::acos),
        "acosh" => Builtin::Unary(f64::acosh),
        "asin" => Builtin::Unary(f64::asin),
        "asinh" => Builtin::Unary(f64::asinh),
        "atan" => Builtin::Unary(f64::atan),
        "atanh" => Builtin::Unary(f64::atanh),
        "cbrt" => Builtin::Unary(f64::cbrt),
        "ceil" => Builtin::Unary(f64::ceil),
        "cos" => Builtin::Unary(f64::cos),
        "cosh" => Builtin::Unary(f64::cosh),
        "exp" => Builtin::Unary(f64::exp),
        "expm1" => Builtin::Unary(f64::exp_m1),
        "floor" => Builtin::Unary(f64::floor),
        "fround" => Builtin::Unary(|x| x as f32 as f64),
        "log" => Builtin::Unary(f64::ln),
        "log1p" => Builtin::Unary(f64::ln_1p),
        "log10" => Builtin::Unary(f64::log10),
        "log2" => Builtin::Unary(f64::log2),
        "round" => Builtin::Unary(round_half_up),
        "sign" => Builtin::Unary(sign),
        "sin" => Builtin::Unary(f64::sin),
        "sinh" => Builtin::Unary(f64::sinh),
        "sqrt" => Builtin::Unary(f64::sqrt),
        "tan" => Builtin::Unary(f64::tan),
        "tanh" => Builtin::Unary(f64::tanh),
        "trunc" => Builtin::Unary(f64::trunc),

        "atan2" => Builtin::Binary(f64::atan2),
        "hypot" => Builtin::Binary(f64::hypot),
        "max" => Builtin::Binary(nan_max),
        "min" => Builtin::Binary(nan_min),
        "pow" => Builtin::Binary(f64::powf),
        _ => return None,
    };
    Some(symbol)
}

fn evaluate_unary(op: UnaryOp, operand: Value) -> Value {
    match op {
        UnaryOp::Plus => Value::Number(operand.as_number()),
        UnaryOp::Minus => Value::Number(-operand.as_number()),
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
    }
}

// Booleans coerce to 0/1 in arithmetic and ordering, matching dynamic-language arithmetic.
// `&&`/`||` return one of their operands rather than a fresh boolean.
fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> Value {
    let (l, r) = (left.as_number(), right.as_number());
    match op {
        BinaryOp::Add => Value::Number(l + r),
        BinaryOp::Subtract => Value::Number(l - r),
        BinaryOp::Multiply => Value::Number(l * r),
        BinaryOp::Divide => Value::Number(l / r),
        BinaryOp::Power => Value::Number(l.powf(r)),
        BinaryOp::Less => Value::Bool(l < r),
        BinaryOp::LessEqual => Value::Bool(l <= r),
        BinaryOp::Greater => Value::Bool(l > r),
        BinaryOp::GreaterEqual => Value::Bool(l >= r),
        BinaryOp::Equal => Value::Bool(match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => l == r,
        }),
        BinaryOp::And => {
            if left.is_truthy() {
                right
            } else {
                left
            }
        }
        BinaryOp::Or => {
            if left.is_truthy() {
                left
            } else {
                right
            }
        }
    }
}

/// Evaluates a syntax tree against a symbol table.
///
/// Both operands of every binary operator are evaluated, including `&&` and `||`; only the taken
/// branch of a conditional is evaluated.
pub fn evaluate<S: Symbols + ?Sized>(expr: &Expr, symbols: &S) -> Result<Value, ExpressionError> {
    match expr {
        Expr::Number(value) => Ok(Value::Number(*value)),

        Expr::Identifier(name) => {
            if let Some(value) = symbols.lookup(name) {
                return Ok(value);
            }
            match builtin(name) {
                Some(Builtin::Constant(value)) => Ok(Value::Number(value)),
                Some(_) => Err(ExpressionError::NotAValue { name: name.clone() }),
                None => Err(ExpressionError::UndefinedSymbol { name: name.clone() }),
            }
        }

        Expr::Unary { op, operand } => {
            let operand = evaluate(operand, symbols)?;
            Ok(evaluate_unary(*op, operand))
        }

        Expr::Binary { op, left, right } => {
            let left = evaluate(left, symbols)?;
            let right = evaluate(right, symbols)?;
            Ok(evaluate_binary(*op, left, right))
        }

        Expr::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            if evaluate(condition, symbols)?.is_truthy() {
                evaluate(then_branch, symbols)
            } else {
                evaluate(else_branch, symbols)
            }
        }

        Expr::Call { name, args } => {
            if symbols.lookup(name).is_some() {
                return Err(ExpressionError::NotCallable { name: name.clone() });
            }
            let function = match builtin(name) {
                Some(Builtin::Constant(_)) => {
                    return Err(ExpressionError::NotCallable { name: name.clone() });
                }
                Some(function) => function,
                None => return Err(ExpressionError::UndefinedSymbol { name: name.clone() }),
            };

            let expected = function.arity().unwrap_or(0);
            if expected != args.len() {
                return Err(ExpressionError::Arity {
                    name: name.clone(),
                    expected,
                    received: args.len(),
                });
            }

            let mut operands = [0.0f64; 2];
            for (slot, arg) in operands.iter_mut().zip(args) {
                *slot = evaluate(arg, symbols)?.as_number();
            }

            let result = match function {
                Builtin::Unary(f) => f(operands[0]),
                Builtin::Binary(f) => f(operands[0], operands[1]),
                Builtin::Constant(value) => value,
            };
            Ok(Value::Number(result))
        }
    }
}
