use std::{
    collections::HashMap,
    io::{self, Write},
};

use crate::{
    ast::{Expr, Stmt},
    error::{Location, RuntimeError},
    interpreter::value::core::Value,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// [`RuntimeError`] describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement left the surrounding block.
///
/// `Return` carries the optional value of a `return` statement upward
/// through every enclosing block until a function call (or the program
/// itself) absorbs it.
#[derive(Debug)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` is unwinding; `None` marks a bare `return;`.
    Return(Option<Value>),
}

/// A user-defined function as the interpreter stores it.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Parameter names, in order.
    pub params: Vec<String>,
    /// The statements of the body.
    pub body:   Vec<Stmt>,
}

/// Stores the runtime evaluation state.
///
/// This struct holds the interpreter state: the lexical scope stack, the
/// program-wide function table, the recursion counter, and the stream
/// `print` writes to.
///
/// ## Usage
///
/// A `Context` is created once per program run. [`Context::run`] executes a
/// parsed statement list against it; everything else hangs off that.
pub struct Context {
    /// The chain of lexical scopes, innermost last.
    pub scope_stack:      Vec<HashMap<String, Value>>,
    /// A mapping from function names to their definitions. Populated when a
    /// `fn` statement executes.
    pub functions:        HashMap<String, FunctionDef>,
    /// The `(function name, depth)` pair guarding against runaway
    /// recursion.
    pub(crate) recursion: Option<(String, usize)>,
    /// Where `print` writes. Stdout by default; tests substitute a buffer.
    pub(crate) output:    Box<dyn Write>,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a context that prints to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates a context that prints to the given writer.
    #[must_use]
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self { scope_stack: vec![HashMap::new()],
               functions: HashMap::new(),
               recursion: None,
               output }
    }

    /// Executes a whole program.
    ///
    /// Statements run in source order in the global scope. A top-level
    /// `return` simply stops execution.
    ///
    /// # Errors
    /// Propagates the first [`RuntimeError`] any statement raises.
    pub fn run(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        for stmt in stmts {
            if let Flow::Return(_) = self.exec_stmt(stmt)? {
                break;
            }
        }

        Ok(())
    }

    /// Executes a list of statements inside a fresh child scope.
    ///
    /// The scope is popped again on every exit path. A `Return` flow from
    /// any statement stops the block and propagates.
    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        self.push_scope();

        let mut flow = Flow::Normal;
        for stmt in stmts {
            match self.exec_stmt(stmt) {
                Ok(Flow::Normal) => {},
                Ok(ret) => {
                    flow = ret;
                    break;
                },
                Err(e) => {
                    self.pop_scope();
                    return Err(e);
                },
            }
        }

        self.pop_scope();
        Ok(flow)
    }

    /// Executes a single statement.
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::VariableInit { name,
                                 ty,
                                 dims,
                                 init,
                                 loc, } => {
                let value = match init {
                    Some(expr) => {
                        let value = self.eval_expr(expr)?;
                        reject_range(&value, loc)?;
                        value
                    },
                    None => match ty {
                        Some(ty) => self.default_value(*ty, dims)?,
                        // the parser rejects `let x;` outright
                        None => return Err(RuntimeError::UnknownVariable { name: name.clone(),
                                                                           loc:  loc.clone(), }),
                    },
                };

                self.define_local(name, value);
                Ok(Flow::Normal)
            },
            Stmt::VariableAssign { name, op, value, loc } => {
                let rhs = self.eval_expr(value)?;
                reject_range(&rhs, loc)?;
                self.exec_assign(name, *op, rhs, loc)?;
                Ok(Flow::Normal)
            },
            Stmt::ElementAssign { name,
                                  subscripts,
                                  value,
                                  loc, } => {
                self.exec_element_assign(name, subscripts, value, loc)?;
                Ok(Flow::Normal)
            },
            Stmt::If { branches, .. } => {
                for (condition, body) in branches {
                    match condition {
                        None => return self.exec_block(body),
                        Some(expr) => {
                            let value = self.eval_expr(expr)?;
                            let truthy = value.as_bool().ok_or_else(|| {
                                RuntimeError::TypeMismatch {
                                    what: "if statement condition must be type 'bool'".to_string(),
                                    expected: format!("condition is currently type '{}'",
                                                      value.type_name()),
                                    loc: expr.loc().clone(),
                                }
                            })?;

                            if truthy {
                                return self.exec_block(body);
                            }
                        },
                    }
                }

                Ok(Flow::Normal)
            },
            Stmt::Loop { sections, body, loc } => self.exec_loop(sections, body, loc),
            Stmt::Function { name, params, body, .. } => {
                let def = FunctionDef { params: params.iter().map(|p| p.name.clone()).collect(),
                                        body:   body.clone(), };
                self.functions.insert(name.clone(), def);
                Ok(Flow::Normal)
            },
            Stmt::Return { value, loc } => {
                let value = match value {
                    Some(expr) => {
                        let value = self.eval_expr(expr)?;
                        reject_range(&value, loc)?;
                        Some(value)
                    },
                    None => None,
                };

                Ok(Flow::Return(value))
            },
            Stmt::Expression { expr, loc } => {
                match expr {
                    // a call statement tolerates functions that return
                    // nothing; the value, if any, is discarded
                    Expr::Call { name, arguments, .. } => {
                        self.call_function(name, arguments, loc)?;
                    },
                    _ => {
                        self.eval_expr(expr)?;
                    },
                }

                Ok(Flow::Normal)
            },
        }
    }

    /// Pushes a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Removes the innermost scope.
    pub fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    /// Retrieves a variable, walking the chain from the innermost scope
    /// outward. Returns `None` if no scope binds the name.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.scope_stack.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Like [`Context::get_variable`], but mutable.
    pub fn get_variable_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scope_stack
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }

    /// Binds a variable in the current (innermost) scope.
    pub fn define_local(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Assigns to the nearest scope already binding the variable, falling
    /// back to the current scope when none does.
    pub fn assign_nearest(&mut self, name: &str, value: Value) {
        for scope in self.scope_stack.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return;
            }
        }

        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }
}

/// Fails with a [`RuntimeError::StrayRange`] when `value` is a range.
///
/// Ranges are transient: they may only appear as a loop range or inside an
/// array literal, and every other position runs this check.
pub(crate) fn reject_range(value: &Value, loc: &Location) -> EvalResult<()> {
    if matches!(value, Value::Range(..)) {
        Err(RuntimeError::StrayRange { loc: loc.clone() })
    } else {
        Ok(())
    }
}
