use crate::{
    ast::{DeclaredType, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, reject_range},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates an expression into a value.
    ///
    /// This is the main entry point for expression evaluation. The
    /// evaluator dispatches on the expression variant; operators enforce
    /// their operand types as they go and raise [`RuntimeError`]s with the
    /// node's source location on mismatch.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, loc } => {
                self.get_variable(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone(),
                                                                   loc:  loc.clone(), })
            },
            Expr::Array { elements, .. } => self.eval_array_literal(elements),
            Expr::Unary { op, expr, loc } => self.eval_unary(*op, expr, loc),
            Expr::Binary { op, left, right, loc } => self.eval_binary_expr(*op, left, right, loc),
            Expr::Subscript { value, index, loc } => {
                let container = self.eval_expr(value)?;
                reject_range(&container, loc)?;
                let index = self.eval_expr(index)?;
                self.eval_subscript(&container, &index, loc)
            },
            Expr::Call { name, arguments, loc } => {
                self.call_function(name, arguments, loc)?
                    .ok_or_else(|| RuntimeError::MissingReturn { function: name.clone(),
                                                                 loc:      loc.clone(), })
            },
            Expr::Method { object,
                           name,
                           arguments,
                           loc, } => self.eval_method(object, name, arguments, loc),
        }
    }

    /// Evaluates the elements of an array literal.
    ///
    /// Elements evaluate in order; an element that produces a range expands
    /// in place, ascending for `a..b` with `a < b` and descending from
    /// `a-1` down to `b` otherwise.
    fn eval_array_literal(&mut self, elements: &[Expr]) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(elements.len());

        for element in elements {
            match self.eval_expr(element)? {
                Value::Range(start, end) => {
                    if start < end {
                        values.extend((start..end).map(Value::Int));
                    } else {
                        values.extend((end..start).rev().map(Value::Int));
                    }
                },
                value => values.push(value),
            }
        }

        Ok(Value::Array(values))
    }

    /// Evaluates a subscript applied to a string or an array.
    ///
    /// A string yields a one-character string; an array yields a copy of
    /// the element. The index must be a non-negative `int` inside the
    /// container's bounds.
    fn eval_subscript(&mut self,
                      container: &Value,
                      index: &Value,
                      loc: &crate::error::Location)
                      -> EvalResult<Value> {
        let index = index.as_int().ok_or_else(|| {
                                       RuntimeError::IndexType { found:
                                                                     index.type_name().to_string(),
                                                                 loc:   loc.clone(), }
                                   })?;
        if index < 0 {
            return Err(RuntimeError::NegativeIndex { index,
                                                     loc: loc.clone() });
        }

        #[allow(clippy::cast_sign_loss)]
        let at = index as usize;

        match container {
            Value::Str(s) => match s.chars().nth(at) {
                Some(c) => Ok(Value::Str(c.to_string())),
                None => Err(RuntimeError::IndexOutOfRange { container: "string",
                                                            index,
                                                            len: s.chars().count(),
                                                            loc: loc.clone() }),
            },
            Value::Array(items) => {
                items.get(at)
                     .cloned()
                     .ok_or_else(|| RuntimeError::IndexOutOfRange { container: "array",
                                                                    index,
                                                                    len: items.len(),
                                                                    loc: loc.clone() })
            },
            other => {
                Err(RuntimeError::TypeMismatch { what:     format!("subscript operator is currently used on type '{}'",
                                                                   other.type_name()),
                                                 expected: "subscript operator can only be used on types 'str' or 'arr'"
                                                           .to_string(),
                                                 loc:      loc.clone(), })
            },
        }
    }

    /// Builds the value a typed declaration takes when no initializer is
    /// written: the type's default, wrapped in one array layer per declared
    /// dimension (innermost dimension last).
    pub(crate) fn default_value(&mut self,
                                ty: DeclaredType,
                                dims: &[Option<Expr>])
                                -> EvalResult<Value> {
        let mut value = Value::default_of(ty);

        for dim in dims.iter().rev() {
            value = match dim {
                None => Value::Array(Vec::new()),
                Some(expr) => {
                    let len = self.eval_expr(expr)?;
                    let len = len.as_int().ok_or_else(|| {
                        RuntimeError::TypeMismatch {
                            what: format!("array dimension is currently type '{}'",
                                          len.type_name()),
                            expected: "array dimensions can only be type 'int'".to_string(),
                            loc: expr.loc().clone(),
                        }
                    })?;

                    if len < 0 {
                        return Err(RuntimeError::NegativeIndex { index: len,
                                                                 loc:   expr.loc().clone(), });
                    }

                    #[allow(clippy::cast_sign_loss)]
                    let len = len as usize;
                    Value::Array(vec![value; len])
                },
            };
        }

        Ok(value)
    }
}
