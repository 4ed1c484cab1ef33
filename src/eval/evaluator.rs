//! Tree-walking evaluator for compiled procedures.

use std::rc::Rc;

use crate::escape::esc_html;
use crate::syntax::{AssignOp, BinaryOp, Expr, Procedure, Stmt, UnaryOp};

use super::environment::Environment;
use super::value::Value;

/// Runtime error raised by embedded code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }
}

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Statement-level control flow.
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Invoke a procedure with one argument bound to its parameter.
///
/// Each call builds a fresh environment; repeated invocations are
/// independent.
pub fn call_procedure(procedure: &Procedure, argument: Value) -> EvalResult {
    let mut evaluator = Evaluator::new();
    evaluator.env.assign(procedure.param.clone(), argument);
    match evaluator.exec_block(&procedure.body)? {
        Flow::Return(value) => Ok(value),
        Flow::Normal => Ok(Value::Null),
        Flow::Break | Flow::Continue => {
            Err(EvalError::new("`break` or `continue` outside of a loop"))
        }
    }
}

/// Tree-walking evaluator over one call frame.
pub struct Evaluator {
    env: Environment,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            env: Environment::new(),
        }
    }

    fn exec_block(&mut self, body: &[Stmt]) -> EvalResult<Flow> {
        for stmt in body {
            match self.exec(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Assign { name, op, value } => {
                let value = self.eval(value)?;
                let value = match op {
                    AssignOp::Set => value,
                    AssignOp::Add => {
                        let current = self.env.lookup(name).ok_or_else(|| {
                            EvalError::new(format!("undefined variable: {name}"))
                        })?;
                        apply_binary(BinaryOp::Add, current, value)?
                    }
                };
                self.env.assign(name.clone(), value);
                Ok(Flow::Normal)
            }
            Stmt::If { arms, else_body } => {
                for arm in arms {
                    if self.eval(&arm.cond)?.is_truthy() {
                        return self.exec_block(&arm.body);
                    }
                }
                if let Some(body) = else_body {
                    return self.exec_block(body);
                }
                Ok(Flow::Normal)
            }
            Stmt::For { var, iter, body } => {
                let items = self.iterable(iter)?;
                for item in items {
                    self.env.assign(var.clone(), item);
                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::While { cond, body } => {
                while self.eval(cond)?.is_truthy() {
                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Return(expr) => Ok(Flow::Return(self.eval(expr)?)),
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
            Stmt::Expr(expr) => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Evaluate a `for` iterable into owned items: list elements, or the
    /// characters of a string as one-char strings.
    fn iterable(&mut self, iter: &Expr) -> EvalResult<Vec<Value>> {
        match self.eval(iter)? {
            Value::List(items) => Ok(items.iter().cloned().collect()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
            other => Err(EvalError::new(format!(
                "`for` requires a list or str, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Str(s) => Ok(Value::str(s.clone())),
            Expr::Ident(name) => self
                .env
                .lookup(name)
                .ok_or_else(|| EvalError::new(format!("undefined variable: {name}"))),
            Expr::Field { base, name } => {
                let base = self.eval(base)?;
                field_access(&base, name)
            }
            Expr::Index { base, index } => {
                let base = self.eval(base)?;
                let index = self.eval(index)?;
                index_access(&base, &index)
            }
            Expr::Call { callee, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                call_builtin(callee, &values)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                apply_unary(*op, value)
            }
            Expr::Binary { op, left, right } => match op {
                // Short-circuit forms evaluate the right side lazily.
                BinaryOp::And => {
                    if !self.eval(left)?.is_truthy() {
                        return Ok(Value::Bool(false));
                    }
                    Ok(Value::Bool(self.eval(right)?.is_truthy()))
                }
                BinaryOp::Or => {
                    if self.eval(left)?.is_truthy() {
                        return Ok(Value::Bool(true));
                    }
                    Ok(Value::Bool(self.eval(right)?.is_truthy()))
                }
                _ => {
                    let left = self.eval(left)?;
                    let right = self.eval(right)?;
                    apply_binary(*op, left, right)
                }
            },
        }
    }
}

fn field_access(base: &Value, name: &str) -> EvalResult {
    match base {
        Value::Map(map) => map
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::new(format!("no field `{name}` on map"))),
        other => Err(EvalError::new(format!(
            "cannot access field `{name}` on {}",
            other.type_name()
        ))),
    }
}

fn index_access(base: &Value, index: &Value) -> EvalResult {
    match (base, index) {
        (Value::Map(map), Value::Str(key)) => map
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| EvalError::new(format!("key not found: {key:?}"))),
        (Value::List(items), Value::Int(i)) => {
            let len = items.len() as i64;
            // Negative indices count from the end.
            let effective = if *i < 0 { len + *i } else { *i };
            if effective < 0 || effective >= len {
                return Err(EvalError::new(format!(
                    "index out of bounds: {i} (len {len})"
                )));
            }
            Ok(items[usize::try_from(effective).unwrap_or(0)].clone())
        }
        (base, index) => Err(EvalError::new(format!(
            "cannot index {} with {}",
            base.type_name(),
            index.type_name()
        ))),
    }
}

fn apply_unary(op: UnaryOp, value: Value) -> EvalResult {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| EvalError::new("integer overflow in negation")),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Neg, other) => Err(EvalError::new(format!(
            "cannot negate {}",
            other.type_name()
        ))),
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
    }
}

fn apply_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    match op {
        BinaryOp::Add => match (&left, &right) {
            (Value::Str(a), Value::Str(b)) => {
                let mut s = String::with_capacity(a.len() + b.len());
                s.push_str(a);
                s.push_str(b);
                Ok(Value::Str(Rc::new(s)))
            }
            _ => arithmetic(op, &left, &right, i64::checked_add, |a, b| a + b),
        },
        BinaryOp::Sub => arithmetic(op, &left, &right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, &left, &right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => match (&left, &right) {
            (_, Value::Int(0)) => Err(EvalError::new("division by zero")),
            _ => arithmetic(op, &left, &right, i64::checked_div, |a, b| a / b),
        },
        BinaryOp::Mod => match (&left, &right) {
            (_, Value::Int(0)) => Err(EvalError::new("modulo by zero")),
            _ => arithmetic(op, &left, &right, i64::checked_rem, |a, b| a % b),
        },
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            compare(op, &left, &right)
        }
        BinaryOp::And | BinaryOp::Or => {
            // Handled short-circuit in the evaluator.
            Err(EvalError::new("internal: non-short-circuit logic op"))
        }
    }
}

fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| EvalError::new(format!("integer overflow in `{}`", op.symbol()))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(float_op(*a as f64, *b))),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(float_op(*a, *b as f64))),
        (left, right) => Err(EvalError::new(format!(
            "cannot apply `{}` to {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        _ => left == right,
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return Err(EvalError::new(format!(
            "cannot compare {} and {} with `{}`",
            left.type_name(),
            right.type_name(),
            op.symbol()
        )));
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => false,
    };
    Ok(Value::Bool(result))
}

/// Ambient builtins. `esc` is the output-escaping capability the synthesized
/// escaped-substitution fragments call.
fn call_builtin(name: &str, args: &[Value]) -> EvalResult {
    match name {
        "str" => {
            expect_arity(name, args, 1)?;
            Ok(Value::str(args[0].to_string()))
        }
        "esc" => {
            expect_arity(name, args, 1)?;
            Ok(Value::str(esc_html(&args[0].to_string())))
        }
        "len" => {
            expect_arity(name, args, 1)?;
            let len = match &args[0] {
                Value::Str(s) => s.chars().count(),
                Value::List(items) => items.len(),
                Value::Map(map) => map.len(),
                other => {
                    return Err(EvalError::new(format!(
                        "cannot take the length of {}",
                        other.type_name()
                    )))
                }
            };
            Ok(Value::Int(len as i64))
        }
        "range" => {
            let (start, end) = match args {
                [Value::Int(end)] => (0, *end),
                [Value::Int(start), Value::Int(end)] => (*start, *end),
                _ => {
                    return Err(EvalError::new(
                        "range expects one or two integer arguments",
                    ))
                }
            };
            let items: Vec<Value> = (start..end).map(Value::Int).collect();
            Ok(Value::from(items))
        }
        _ => Err(EvalError::new(format!("undefined function: {name}"))),
    }
}

fn expect_arity(name: &str, args: &[Value], arity: usize) -> EvalResult<()> {
    if args.len() == arity {
        Ok(())
    } else {
        Err(EvalError::new(format!(
            "{name} expects {arity} argument(s), found {}",
            args.len()
        )))
    }
}
