use std::{io::Write, process::Command};

use crate::{
    ast::Expr,
    error::{Location, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, reject_range},
        value::core::Value,
    },
};

/// The builtin function names.
///
/// These are dispatched before the user function table is consulted, so a
/// program can never shadow them (the parser also refuses to define a
/// function under one of these names).
pub const BUILTIN_FUNCTIONS: &[&str] = &["print", "input", "int", "float", "str", "system"];

/// How many nested active calls of a single named function are allowed.
pub const RECURSION_LIMIT: usize = 1000;

impl Context {
    /// Evaluates a function call, builtin or user-defined.
    ///
    /// Builtins resolve by name first. `Ok(None)` means the call completed
    /// without producing a value, which a call statement discards and an
    /// expression position turns into an error.
    pub(crate) fn call_function(&mut self,
                                name: &str,
                                arguments: &[Expr],
                                loc: &Location)
                                -> EvalResult<Option<Value>> {
        match name {
            "print" => {
                let value = self.eval_argument(name, arguments, 0, 1, loc)?;

                // stdout failing mid-print is not a language-level error
                let _ = write!(self.output, "{value}");
                let _ = self.output.flush();

                Ok(None)
            },
            "input" => {
                check_arity(name, arguments.len(), 0, loc)?;

                let mut line = String::new();
                let _ = std::io::stdin().read_line(&mut line);
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }

                Ok(Some(Value::Str(line)))
            },
            "int" => {
                let value = self.eval_argument(name, arguments, 0, 1, loc)?;
                Ok(Some(Value::Int(convert_to_int(&value, loc)?)))
            },
            "float" => {
                let value = self.eval_argument(name, arguments, 0, 1, loc)?;
                Ok(Some(Value::Float(convert_to_float(&value, loc)?)))
            },
            "str" => {
                let value = self.eval_argument(name, arguments, 0, 1, loc)?;

                match value {
                    Value::Bool(_) | Value::Int(_) | Value::Float(_) => {
                        Ok(Some(Value::Str(value.to_string())))
                    },
                    Value::Str(_) => Ok(Some(value)),
                    other => Err(RuntimeError::TypeMismatch {
                        what: format!("type '{}' cannot be converted into type 'str'",
                                      other.type_name()),
                        expected: "only types 'bool', 'int', 'float', and 'str' have a text form"
                            .to_string(),
                        loc: loc.clone(),
                    }),
                }
            },
            "system" => {
                let value = self.eval_argument(name, arguments, 0, 1, loc)?;

                let command = match value {
                    Value::Str(command) => command,
                    other => {
                        return Err(RuntimeError::TypeMismatch {
                            what: "function call 'system', argument number 1, must be type 'str'"
                                .to_string(),
                            expected: format!("argument is currently type '{}'",
                                              other.type_name()),
                            loc: loc.clone(),
                        });
                    },
                };

                Ok(Some(Value::Int(run_shell(&command, loc)?)))
            },
            _ => self.call_user_function(name, arguments, loc),
        }
    }

    /// Executes a user-defined function: binds the evaluated arguments into
    /// a fresh scope, runs the body, and absorbs its `return`.
    fn call_user_function(&mut self,
                          name: &str,
                          arguments: &[Expr],
                          loc: &Location)
                          -> EvalResult<Option<Value>> {
        let func = self.functions
                       .get(name)
                       .cloned()
                       .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                      loc:  loc.clone(), })?;

        if arguments.len() != func.params.len() {
            return Err(RuntimeError::ArgumentCount { function: name.to_string(),
                                                     expected: func.params.len().to_string(),
                                                     found:    arguments.len(),
                                                     loc:      loc.clone(), });
        }

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let value = self.eval_expr(argument)?;
            reject_range(&value, argument.loc())?;
            values.push(value);
        }

        let counted;
        match &mut self.recursion {
            Some((current, depth)) if current == name => {
                *depth += 1;
                if *depth > RECURSION_LIMIT {
                    return Err(RuntimeError::RecursionLimit { function: name.to_string(),
                                                              limit:    RECURSION_LIMIT,
                                                              loc:      loc.clone(), });
                }
                counted = true;
            },
            Some(_) => counted = false,
            None => counted = true,
        }
        if counted && self.recursion.is_none() {
            self.recursion = Some((name.to_string(), 1));
        }

        self.push_scope();
        for (param, value) in func.params.iter().zip(values) {
            self.define_local(param, value);
        }

        let mut flow = Flow::Normal;
        for stmt in &func.body {
            match self.exec_stmt(stmt) {
                Ok(Flow::Normal) => {},
                Ok(returned) => {
                    flow = returned;
                    break;
                },
                Err(e) => {
                    self.pop_scope();
                    return Err(e);
                },
            }
        }
        self.pop_scope();

        if counted && let Some((_, depth)) = &mut self.recursion {
            *depth -= 1;
            if *depth == 0 {
                self.recursion = None;
            }
        }

        Ok(match flow {
            Flow::Return(value) => value,
            Flow::Normal => None,
        })
    }

    /// Evaluates the single argument of a unary builtin, checking arity
    /// and rejecting stray ranges.
    fn eval_argument(&mut self,
                     name: &str,
                     arguments: &[Expr],
                     index: usize,
                     arity: usize,
                     loc: &Location)
                     -> EvalResult<Value> {
        check_arity(name, arguments.len(), arity, loc)?;

        let value = self.eval_expr(&arguments[index])?;
        reject_range(&value, arguments[index].loc())?;

        Ok(value)
    }
}

/// Checks that a builtin received exactly `expected` arguments.
fn check_arity(name: &str, found: usize, expected: usize, loc: &Location) -> EvalResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCount { function: name.to_string(),
                                          expected: expected.to_string(),
                                          found,
                                          loc: loc.clone() })
    }
}

/// Converts a value to `int`: booleans and floats by their usual
/// truncations, strings by decimal parse.
fn convert_to_int(value: &Value, loc: &Location) -> EvalResult<i64> {
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Int(n) => Ok(*n),
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(v) => Ok(*v as i64),
        Value::Str(s) => {
            s.trim()
             .parse()
             .map_err(|_| RuntimeError::InvalidConversion { target:   "int",
                                                            argument: s.clone(),
                                                            loc:      loc.clone(), })
        },
        other => Err(conversion_type_error("int", other, loc)),
    }
}

/// Converts a value to `float`, symmetric to [`convert_to_int`].
fn convert_to_float(value: &Value, loc: &Location) -> EvalResult<f32> {
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        #[allow(clippy::cast_precision_loss)]
        Value::Int(n) => Ok(*n as f32),
        Value::Float(v) => Ok(*v),
        Value::Str(s) => {
            s.trim()
             .parse()
             .map_err(|_| RuntimeError::InvalidConversion { target:   "float",
                                                            argument: s.clone(),
                                                            loc:      loc.clone(), })
        },
        other => Err(conversion_type_error("float", other, loc)),
    }
}

/// The error for a conversion builtin applied to an inconvertible type.
fn conversion_type_error(target: &str, value: &Value, loc: &Location) -> RuntimeError {
    RuntimeError::TypeMismatch { what:     format!("function call '{target}', argument number 1, is currently type '{}'",
                                                   value.type_name()),
                                 expected: "argument can only be types 'bool', 'int', 'float', or 'str'"
                                           .to_string(),
                                 loc:      loc.clone(), }
}

/// Runs a command line through the host shell and reports its exit code.
fn run_shell(command: &str, loc: &Location) -> EvalResult<i64> {
    #[cfg(windows)]
    let status = Command::new("cmd").args(["/C", command]).status();
    #[cfg(not(windows))]
    let status = Command::new("sh").args(["-c", command]).status();

    match status {
        Ok(status) => Ok(i64::from(status.code().unwrap_or(-1))),
        Err(e) => Err(RuntimeError::ShellFailure { message: e.to_string(),
                                                   loc:     loc.clone(), }),
    }
}
