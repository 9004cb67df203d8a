use crate::{
    ast::{BinaryOp, Expr},
    error::{Location, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult, reject_range},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation between two expressions.
    ///
    /// `&&` and `||` short-circuit, so the right operand only evaluates
    /// when the left does not already decide the result. Every other
    /// operator evaluates both sides left to right and dispatches on the
    /// operand types.
    pub(crate) fn eval_binary_expr(&mut self,
                                   op: BinaryOp,
                                   left: &Expr,
                                   right: &Expr,
                                   loc: &Location)
                                   -> EvalResult<Value> {
        use BinaryOp::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Range, Sub,
        };

        match op {
            And | Or => {
                let lhs = self.eval_expr(left)?;
                let lhs = bool_operand(op, "left", &lhs, loc)?;

                if op == Or && lhs {
                    return Ok(Value::Bool(true));
                }
                if op == And && !lhs {
                    return Ok(Value::Bool(false));
                }

                let rhs = self.eval_expr(right)?;
                Ok(Value::Bool(bool_operand(op, "right", &rhs, loc)?))
            },

            Range => {
                let lhs = self.eval_expr(left)?;
                let start = int_operand(op, "left", &lhs, loc)?;
                let rhs = self.eval_expr(right)?;
                let end = int_operand(op, "right", &rhs, loc)?;

                Ok(Value::Range(start, end))
            },

            Equal | NotEqual => {
                let lhs = self.eval_expr(left)?;
                reject_range(&lhs, loc)?;
                let rhs = self.eval_expr(right)?;
                reject_range(&rhs, loc)?;

                if lhs.type_name() != rhs.type_name() {
                    return Err(RuntimeError::TypeMismatch {
                        what: format!("operator '{op}' can only be used on values with the same type"),
                        expected: format!("left hand value has type '{}' but right hand value has type '{}'",
                                          lhs.type_name(),
                                          rhs.type_name()),
                        loc: loc.clone(),
                    });
                }

                let equal = lhs == rhs;
                Ok(Value::Bool(if op == Equal { equal } else { !equal }))
            },

            Add | Sub | Mul | Div | Mod => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;

                if op == Add
                   && (matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_)))
                {
                    return match (lhs, rhs) {
                        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                        (a, b) => Err(RuntimeError::TypeMismatch {
                            what: format!("operator '+' is used on types '{}' and '{}'",
                                          a.type_name(),
                                          b.type_name()),
                            expected: "type 'str' can only be concatenated with type 'str'"
                                .to_string(),
                            loc: loc.clone(),
                        }),
                    };
                }

                Self::eval_numeric(op, &lhs, &rhs, loc)
            },

            Less | Greater | LessEqual | GreaterEqual => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Self::eval_comparison(op, &lhs, &rhs, loc)
            },
        }
    }

    /// Evaluates an arithmetic operation between two numbers.
    ///
    /// The promotion rule is centralised here: two `int`s produce an `int`;
    /// any `float` operand promotes the result to `float`, where `%` takes
    /// `fmod` semantics. Integer `/` and `%` by zero are errors.
    pub(crate) fn eval_numeric(op: BinaryOp,
                               lhs: &Value,
                               rhs: &Value,
                               loc: &Location)
                               -> EvalResult<Value> {
        use BinaryOp::{Add, Div, Mod, Mul, Sub};

        let a = num_operand(op, "left", lhs, loc)?;
        let b = num_operand(op, "right", rhs, loc)?;

        if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
            if *b == 0 && matches!(op, Div | Mod) {
                return Err(RuntimeError::DivisionByZero { loc: loc.clone() });
            }

            return Ok(Value::Int(match op {
                                     Add => a + b,
                                     Sub => a - b,
                                     Mul => a * b,
                                     Div => a / b,
                                     Mod => a % b,
                                     _ => return Self::eval_comparison(op, lhs, rhs, loc),
                                 }));
        }

        Ok(Value::Float(match op {
                            Add => a + b,
                            Sub => a - b,
                            Mul => a * b,
                            Div => a / b,
                            Mod => a % b,
                            _ => return Self::eval_comparison(op, lhs, rhs, loc),
                        }))
    }

    /// Evaluates a relational comparison between two numbers.
    fn eval_comparison(op: BinaryOp,
                       lhs: &Value,
                       rhs: &Value,
                       loc: &Location)
                       -> EvalResult<Value> {
        use BinaryOp::{Greater, GreaterEqual, Less, LessEqual};

        let ordered = if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
            match op {
                Less => a < b,
                Greater => a > b,
                LessEqual => a <= b,
                GreaterEqual => a >= b,
                _ => false,
            }
        } else {
            let a = num_operand(op, "left", lhs, loc)?;
            let b = num_operand(op, "right", rhs, loc)?;

            match op {
                Less => a < b,
                Greater => a > b,
                LessEqual => a <= b,
                GreaterEqual => a >= b,
                _ => false,
            }
        };

        Ok(Value::Bool(ordered))
    }
}

/// Extracts a boolean operand, describing the offending side on failure.
fn bool_operand(op: BinaryOp, side: &str, value: &Value, loc: &Location) -> EvalResult<bool> {
    value.as_bool().ok_or_else(|| RuntimeError::TypeMismatch {
        what: format!("{side} hand value of operator '{op}' has type '{}'", value.type_name()),
        expected: format!("operator '{op}' can only be used on type 'bool'"),
        loc: loc.clone(),
    })
}

/// Extracts an integer operand, describing the offending side on failure.
fn int_operand(op: BinaryOp, side: &str, value: &Value, loc: &Location) -> EvalResult<i64> {
    value.as_int().ok_or_else(|| RuntimeError::TypeMismatch {
        what: format!("{side} hand value of operator '{op}' is currently type '{}'",
                      value.type_name()),
        expected: format!("operator '{op}' can only be used on type 'int'"),
        loc: loc.clone(),
    })
}

/// Extracts a numeric operand as `f32`, describing the offending side on
/// failure.
fn num_operand(op: BinaryOp, side: &str, value: &Value, loc: &Location) -> EvalResult<f32> {
    value.as_float().ok_or_else(|| RuntimeError::TypeMismatch {
        what: format!("{side} hand value of operator '{op}' is currently type '{}'",
                      value.type_name()),
        expected: format!("operator '{op}' can only be used on types 'int' or 'float'"),
        loc: loc.clone(),
    })
}
