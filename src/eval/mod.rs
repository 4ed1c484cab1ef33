//! Tree-walking interpreter for compiled procedures.
//!
//! The compiled form of a template is a `Procedure` AST; invocation walks
//! that tree against a `Value` data context in a fresh `Environment` per
//! call. Values share storage through `Rc`, so they stay on one thread.

mod environment;
mod evaluator;
mod value;

pub use environment::Environment;
pub use evaluator::{call_procedure, EvalError, EvalResult, Evaluator};
pub use value::Value;
