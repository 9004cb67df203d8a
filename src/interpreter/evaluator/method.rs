use crate::{
    ast::Expr,
    error::{Location, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult, reject_range},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a method call `object.name(arguments)`.
    ///
    /// Arrays provide `len()`, `push(v)`, `push(v, i)`, `pop()`, and
    /// `pop(i)`; strings provide `len()`. The mutating array methods write
    /// the updated array back to the receiver's binding when the receiver
    /// is a plain variable, so `xs.push(4)` is visible through `xs`
    /// afterwards; they also return the updated array.
    pub(crate) fn eval_method(&mut self,
                              object: &Expr,
                              name: &str,
                              arguments: &[Expr],
                              loc: &Location)
                              -> EvalResult<Value> {
        let receiver = self.eval_expr(object)?;

        match receiver {
            Value::Array(items) => {
                if name == "len" {
                    check_method_arity("len", "0", arguments.len(), 0, loc)?;

                    #[allow(clippy::cast_possible_wrap)]
                    let len = items.len() as i64;
                    return Ok(Value::Int(len));
                }

                let updated = self.eval_array_method(items, name, arguments, loc)?;

                if let Expr::Variable { name: var, .. } = object {
                    self.assign_nearest(var, updated.clone());
                }

                Ok(updated)
            },
            Value::Str(s) => match name {
                "len" => {
                    check_method_arity("len", "0", arguments.len(), 0, loc)?;

                    #[allow(clippy::cast_possible_wrap)]
                    let len = s.chars().count() as i64;
                    Ok(Value::Int(len))
                },
                _ => Err(RuntimeError::UnknownMethod { method: name.to_string(),
                                                       object: "str".to_string(),
                                                       loc:    loc.clone(), }),
            },
            other => Err(RuntimeError::TypeMismatch {
                what: format!("operator '.' is currently used on type '{}'", other.type_name()),
                expected: "operator '.' can only be used on types 'str' or 'arr'".to_string(),
                loc: loc.clone(),
            }),
        }
    }

    /// Runs one of the mutating array methods over the receiver's elements
    /// and returns the updated array.
    fn eval_array_method(&mut self,
                         mut items: Vec<Value>,
                         name: &str,
                         arguments: &[Expr],
                         loc: &Location)
                         -> EvalResult<Value> {
        match (name, arguments.len()) {
            ("push", 1) => {
                let value = self.eval_expr(&arguments[0])?;
                reject_range(&value, arguments[0].loc())?;

                items.push(value);
                Ok(Value::Array(items))
            },
            ("push", 2) => {
                let value = self.eval_expr(&arguments[0])?;
                reject_range(&value, arguments[0].loc())?;
                let at = self.method_index(&arguments[1], name)?;

                // inserting right past the last element is allowed
                if at > items.len() {
                    return Err(out_of_range(at, items.len(), loc));
                }

                items.insert(at, value);
                Ok(Value::Array(items))
            },
            ("pop", 0) => {
                if items.pop().is_none() {
                    return Err(RuntimeError::TypeMismatch {
                        what: "function call 'pop' is used on an empty array".to_string(),
                        expected: "the array must have at least one element".to_string(),
                        loc: loc.clone(),
                    });
                }

                Ok(Value::Array(items))
            },
            ("pop", 1) => {
                let at = self.method_index(&arguments[0], name)?;
                if at >= items.len() {
                    return Err(out_of_range(at, items.len(), loc));
                }

                items.remove(at);
                Ok(Value::Array(items))
            },
            ("push", found) => check_method_arity("push", "1 or 2", found, usize::MAX, loc)
                .map(|()| Value::Array(items)),
            ("pop", found) => check_method_arity("pop", "0 or 1", found, usize::MAX, loc)
                .map(|()| Value::Array(items)),
            _ => Err(RuntimeError::UnknownMethod { method: name.to_string(),
                                                   object: "arr".to_string(),
                                                   loc:    loc.clone(), }),
        }
    }

    /// Evaluates an index argument of `push`/`pop`, requiring a
    /// non-negative `int`.
    fn method_index(&mut self, argument: &Expr, method: &str) -> EvalResult<usize> {
        let value = self.eval_expr(argument)?;
        let index = value.as_int().ok_or_else(|| RuntimeError::TypeMismatch {
            what: format!("function call '{method}', argument number 2, can only be type 'int'"),
            expected: format!("argument is currently type '{}'", value.type_name()),
            loc: argument.loc().clone(),
        })?;

        if index < 0 {
            return Err(RuntimeError::NegativeIndex { index,
                                                     loc: argument.loc().clone() });
        }

        #[allow(clippy::cast_sign_loss)]
        let index = index as usize;
        Ok(index)
    }
}

/// Fails with an argument-count error unless `found == expected`. The
/// multi-arity methods pass `usize::MAX` so the error always fires with
/// their full count description.
fn check_method_arity(method: &str,
                      description: &str,
                      found: usize,
                      expected: usize,
                      loc: &Location)
                      -> EvalResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCount { function: method.to_string(),
                                          expected: description.to_string(),
                                          found,
                                          loc: loc.clone() })
    }
}

/// The out-of-range error for a method's index argument.
fn out_of_range(at: usize, len: usize, loc: &Location) -> RuntimeError {
    #[allow(clippy::cast_possible_wrap)]
    let index = at as i64;
    RuntimeError::IndexOutOfRange { container: "array",
                                    index,
                                    len,
                                    loc: loc.clone() }
}
