use crate::{
    ast::{AssignOp, BinaryOp, Expr},
    error::{Location, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult, reject_range},
        value::core::Value,
    },
};

impl Context {
    /// Applies an assignment statement to an existing binding.
    ///
    /// Plain `=` overwrites. Compound operators combine the current value
    /// with the right hand side: numbers follow the usual int/float
    /// promotion, and `+=` on a string concatenates. The binding mutates in
    /// the scope where the name was found.
    pub(crate) fn exec_assign(&mut self,
                              name: &str,
                              op: AssignOp,
                              rhs: Value,
                              loc: &Location)
                              -> EvalResult<()> {
        let updated = match op {
            AssignOp::Assign => rhs,
            _ => {
                let current = self.get_variable(name)
                                  .cloned()
                                  .ok_or_else(|| RuntimeError::UnknownVariable {
                                      name: name.to_string(),
                                      loc: loc.clone(),
                                  })?;

                Self::compound_value(op, &current, &rhs, loc)?
            },
        };

        self.assign_nearest(name, updated);
        Ok(())
    }

    /// Combines the current value of a binding with the right hand side of
    /// a compound assignment.
    fn compound_value(op: AssignOp,
                      current: &Value,
                      rhs: &Value,
                      loc: &Location)
                      -> EvalResult<Value> {
        if let Value::Str(s) = current {
            if op != AssignOp::Add {
                return Err(RuntimeError::TypeMismatch {
                    what: format!("assignment '{op}' is used on type 'str'"),
                    expected: "only assignments '=' and '+=' can be used on type 'str'"
                        .to_string(),
                    loc: loc.clone(),
                });
            }

            return match rhs {
                Value::Str(other) => Ok(Value::Str(s.clone() + other)),
                other => Err(RuntimeError::TypeMismatch {
                    what: format!("value is type 'str' but expression is type '{}'",
                                  other.type_name()),
                    expected: "type 'str' can only be concatenated with type 'str'".to_string(),
                    loc: loc.clone(),
                }),
            };
        }

        if !current.is_num() || !rhs.is_num() {
            let offender = if current.is_num() { rhs } else { current };
            return Err(RuntimeError::TypeMismatch {
                what: format!("assignment '{op}' is used on type '{}'", offender.type_name()),
                expected: format!("assignment '{op}' can only be used on types 'int' or 'float'"),
                loc: loc.clone(),
            });
        }

        let binop = match op {
            AssignOp::Add => BinaryOp::Add,
            AssignOp::Sub => BinaryOp::Sub,
            AssignOp::Mul => BinaryOp::Mul,
            AssignOp::Div => BinaryOp::Div,
            AssignOp::Mod | AssignOp::Assign => BinaryOp::Mod,
        };

        Self::eval_numeric(binop, current, rhs, loc)
    }

    /// Applies an assignment through a chain of subscripts.
    ///
    /// All indices evaluate first, then the chain walks mutably into the
    /// nested containers. An array target replaces the indexed element; a
    /// string target replaces one character and requires a one-character
    /// string value.
    pub(crate) fn exec_element_assign(&mut self,
                                      name: &str,
                                      subscripts: &[Expr],
                                      value: &Expr,
                                      loc: &Location)
                                      -> EvalResult<()> {
        let mut indices = Vec::with_capacity(subscripts.len());
        for subscript in subscripts {
            let index = self.eval_expr(subscript)?;
            let index = index.as_int().ok_or_else(|| RuntimeError::IndexType {
                found: index.type_name().to_string(),
                loc: subscript.loc().clone(),
            })?;

            if index < 0 {
                return Err(RuntimeError::NegativeIndex { index,
                                                         loc: subscript.loc().clone() });
            }

            indices.push(index);
        }

        let new_value = self.eval_expr(value)?;
        reject_range(&new_value, loc)?;
        let mut new_value = Some(new_value);

        let mut slot =
            self.get_variable_mut(name)
                .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                               loc:  loc.clone(), })?;

        for (k, &index) in indices.iter().enumerate() {
            let last = k + 1 == indices.len();
            #[allow(clippy::cast_sign_loss)]
            let at = index as usize;

            slot = match slot {
                Value::Str(s) => {
                    if !last {
                        return Err(RuntimeError::TypeMismatch {
                            what: "subscript operator is applied to a single character"
                                .to_string(),
                            expected: "only strings and arrays can be subscripted".to_string(),
                            loc: loc.clone(),
                        });
                    }

                    let len = s.chars().count();
                    if at >= len {
                        return Err(RuntimeError::IndexOutOfRange { container: "string",
                                                                   index,
                                                                   len,
                                                                   loc: loc.clone() });
                    }

                    let replacement = match new_value.take() {
                        Some(Value::Str(r)) if r.chars().count() == 1 => r,
                        Some(other) => {
                            return Err(RuntimeError::TypeMismatch {
                                what: "characters can only be assigned to other characters"
                                    .to_string(),
                                expected: format!("character is currently assigned a value of type '{}'",
                                                  other.type_name()),
                                loc: loc.clone(),
                            });
                        },
                        None => return Ok(()),
                    };

                    let rebuilt: String = s.chars()
                                           .enumerate()
                                           .map(|(i, c)| {
                                               if i == at {
                                                   replacement.chars().next().unwrap_or(c)
                                               } else {
                                                   c
                                               }
                                           })
                                           .collect();
                    *s = rebuilt;

                    return Ok(());
                },
                Value::Array(items) => {
                    if at >= items.len() {
                        return Err(RuntimeError::IndexOutOfRange { container: "array",
                                                                   index,
                                                                   len: items.len(),
                                                                   loc: loc.clone() });
                    }

                    if last {
                        if let Some(v) = new_value.take() {
                            items[at] = v;
                        }

                        return Ok(());
                    }

                    &mut items[at]
                },
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        what: format!("subscript operator is currently used on type '{}'",
                                      other.type_name()),
                        expected: "subscript operator can only be used on types 'str' or 'arr'"
                            .to_string(),
                        loc: loc.clone(),
                    });
                },
            };
        }

        Ok(())
    }
}
