use crate::{
    ast::{Expr, UnaryOp},
    error::{Location, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operator applied to its operand.
    ///
    /// `-` negates an `int` or `float`; `!` inverts a `bool`. Anything else
    /// is a type error naming the operand's actual type.
    pub(crate) fn eval_unary(&mut self,
                             op: UnaryOp,
                             expr: &Expr,
                             loc: &Location)
                             -> EvalResult<Value> {
        let value = self.eval_expr(expr)?;

        match op {
            UnaryOp::Negate => match value {
                Value::Int(n) => Ok(Value::Int(-n)),
                Value::Float(v) => Ok(Value::Float(-v)),
                other => Err(RuntimeError::TypeMismatch {
                    what: format!("unary operator '-' is currently used on type '{}'",
                                  other.type_name()),
                    expected: "unary operator '-' can only be used on types 'int' or 'float'"
                        .to_string(),
                    loc: loc.clone(),
                }),
            },
            UnaryOp::Not => match value {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(RuntimeError::TypeMismatch {
                    what: format!("unary operator '!' is currently used on type '{}'",
                                  other.type_name()),
                    expected: "unary operator '!' can only be used on type 'bool'".to_string(),
                    loc: loc.clone(),
                }),
            },
        }
    }
}
