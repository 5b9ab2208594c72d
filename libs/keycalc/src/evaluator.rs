//! Expression evaluator
//!
//! Evaluates canonical buffer text over a closed namespace:
//!
//! - Arithmetic: `+ - * / // % **`, unary `+ -`, parentheses
//! - Functions: `sin cos tan sqrt log log10 exp fabs abs floor ceil factorial pow round`
//! - Constants: `pi`, `e`
//!
//! No other identifier resolves. The whole text is parsed before anything is
//! evaluated, so a syntax error always wins over a runtime error. Operands are
//! then evaluated left to right and the first failure is reported.

use crate::builtin_functions::{self, Builtin};
use crate::error::{CalcError, Result};
use crate::history::HistoryLog;
use crate::lexer::tokenize;
use crate::parser::{parse, BinaryOp, Expr, UnaryOp};
use crate::value::{finite, Value};
use std::fmt;
use tracing::debug;

/// Outcome of evaluating the buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Nothing to evaluate; displays as `0`
    Empty,
    Value(Value),
    Error(CalcError),
}

impl Evaluation {
    pub fn is_error(&self) -> bool {
        matches!(self, Evaluation::Error(_))
    }

    pub fn value(&self) -> Option<Value> {
        match self {
            Evaluation::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Display string: the result, `0`, or the fixed error text
impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Empty => f.write_str("0"),
            Evaluation::Value(v) => write!(f, "{}", v),
            Evaluation::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Evaluate the buffer and update it with the outcome
///
/// On success `"<expr> = <result>"` is recorded in `history` and the buffer
/// is replaced by the result text so the next key continues from it. On
/// failure the buffer is cleared and history is left untouched.
pub fn evaluate(buffer: &mut String, history: &mut HistoryLog) -> Evaluation {
    if buffer.is_empty() {
        return Evaluation::Empty;
    }

    match evaluate_expression(buffer) {
        Ok(value) => {
            let result = value.to_string();
            debug!(expr = %buffer, %result, "Evaluated expression");
            history.push(format!("{} = {}", buffer, result));
            *buffer = result;
            Evaluation::Value(value)
        },
        Err(err) => {
            debug!(expr = %buffer, detail = err.detail(), "Evaluation failed: {}", err);
            buffer.clear();
            Evaluation::Error(err)
        },
    }
}

/// Evaluate canonical expression text without touching any state
pub fn evaluate_expression(text: &str) -> Result<Value> {
    let expr = parse(tokenize(text.trim())?)?;
    match eval(&expr)? {
        Object::Number(Value::Float(x)) => finite(x),
        Object::Number(v) => Ok(v),
        Object::Function(f) => Err(CalcError::invalid(format!("result is {}, not a number", f))),
    }
}

/// Intermediate result: a number or a function that has not been called yet
#[derive(Debug, Clone, Copy)]
enum Object {
    Number(Value),
    Function(Builtin),
}

impl Object {
    fn number(self, context: &str) -> Result<Value> {
        match self {
            Object::Number(v) => Ok(v),
            Object::Function(f) => Err(CalcError::invalid(format!(
                "unsupported operand {} for {}",
                f, context
            ))),
        }
    }
}

fn eval(expr: &Expr) -> Result<Object> {
    match expr {
        Expr::Number(v) => Ok(Object::Number(*v)),
        Expr::Name(name) => resolve(name),
        Expr::Tuple(items) => {
            for item in items {
                eval(item)?;
            }
            Err(CalcError::invalid("tuple is not a number"))
        },
        Expr::Unary { op, operand } => {
            let v = eval(operand)?.number("unary operator")?;
            match op {
                UnaryOp::Plus => Ok(Object::Number(v)),
                UnaryOp::Minus => v.neg().map(Object::Number),
            }
        },
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs)?;
            let rhs = eval(rhs)?;
            apply(*op, lhs, rhs).map(Object::Number)
        },
        Expr::Chain { first, rest } => {
            let mut acc = eval(first)?;
            for (op, operand) in rest {
                let rhs = eval(operand)?;
                acc = Object::Number(apply(*op, acc, rhs)?);
            }
            Ok(acc)
        },
        Expr::Call { callee, args } => {
            let callee = eval(callee)?;
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(arg)?);
            }
            let Object::Function(function) = callee else {
                return Err(CalcError::invalid("a number is not callable"));
            };
            let values = values
                .into_iter()
                .map(|v| v.number(function.name()))
                .collect::<Result<Vec<_>>>()?;
            function.call(&values).map(Object::Number)
        },
    }
}

fn apply(op: BinaryOp, lhs: Object, rhs: Object) -> Result<Value> {
    let (a, b) = (lhs.number("binary operator")?, rhs.number("binary operator")?);
    match op {
        BinaryOp::Add => a.add(b),
        BinaryOp::Sub => a.sub(b),
        BinaryOp::Mul => a.mul(b),
        BinaryOp::Div => a.div(b),
        BinaryOp::FloorDiv => a.floor_div(b),
        BinaryOp::Mod => a.rem(b),
        BinaryOp::Pow => a.pow(b),
    }
}

fn resolve(name: &str) -> Result<Object> {
    if let Some(value) = builtin_functions::constant(name) {
        return Ok(Object::Number(Value::Float(value)));
    }
    Builtin::lookup(name)
        .map(Object::Function)
        .ok_or_else(|| CalcError::invalid(format!("name '{}' is not defined", name)))
}
