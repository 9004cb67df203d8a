use crate::{
    ast::{LoopSection, Stmt},
    error::{Location, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, reject_range},
        value::core::Value,
    },
};

impl Context {
    /// Executes a `loop` statement.
    ///
    /// A loop scope is pushed for the whole run. Init sections evaluate
    /// once into it (or overwrite an outer binding when one already
    /// exists); condition and range sections re-evaluate every iteration.
    /// The loop exits when a condition turns false or a range runs out; a
    /// `return` inside the body exits both the loop and the enclosing
    /// function.
    pub(crate) fn exec_loop(&mut self,
                            sections: &[LoopSection],
                            body: &[Stmt],
                            loc: &Location)
                            -> EvalResult<Flow> {
        self.push_scope();
        let result = self.loop_in_scope(sections, body, loc);
        self.pop_scope();

        result
    }

    /// The loop proper, run with the loop scope already on the stack.
    fn loop_in_scope(&mut self,
                     sections: &[LoopSection],
                     body: &[Stmt],
                     loc: &Location)
                     -> EvalResult<Flow> {
        for section in sections {
            if let LoopSection::Init { name, value } = section {
                let initial = self.eval_expr(value)?;
                reject_range(&initial, loc)?;

                if self.get_variable(name).is_some() {
                    self.assign_nearest(name, initial);
                } else {
                    self.define_local(name, initial);
                }
            }
        }

        let mut iteration: usize = 0;

        'run: loop {
            for section in sections {
                match section {
                    LoopSection::Init { .. } => {},
                    LoopSection::Condition(expr) => {
                        let value = self.eval_expr(expr)?;
                        let keep_going = value.as_bool().ok_or_else(|| {
                            RuntimeError::TypeMismatch {
                                what: "loop condition must be type 'bool'".to_string(),
                                expected: format!("condition is currently type '{}'",
                                                  value.type_name()),
                                loc: expr.loc().clone(),
                            }
                        })?;

                        if !keep_going {
                            break 'run;
                        }
                    },
                    LoopSection::Range { name, value } => {
                        match self.next_element(value, iteration)? {
                            Some(element) => self.define_local(name, element),
                            None => break 'run,
                        }
                    },
                }
            }

            match self.exec_block(body)? {
                Flow::Normal => {},
                returned => return Ok(returned),
            }

            iteration += 1;
        }

        Ok(Flow::Normal)
    }

    /// Produces the value a range section binds on the given iteration, or
    /// `None` once the sequence is exhausted.
    ///
    /// The section expression is re-evaluated every time, so a loop over a
    /// variable observes mutations the body makes to it.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn next_element(&mut self,
                    value: &crate::ast::Expr,
                    iteration: usize)
                    -> EvalResult<Option<Value>> {
        let sequence = self.eval_expr(value)?;

        match sequence {
            Value::Range(start, end) => {
                let count = start.abs_diff(end) as usize;
                if iteration >= count {
                    return Ok(None);
                }

                let step = iteration as i64;
                Ok(Some(Value::Int(if start < end { start + step } else { start - 1 - step })))
            },
            Value::Str(s) => Ok(s.chars().nth(iteration).map(|c| Value::Str(c.to_string()))),
            Value::Array(items) => Ok(items.get(iteration).cloned()),
            other => Err(RuntimeError::TypeMismatch {
                what: "loop range must be type 'str', 'arr', or 'rng'".to_string(),
                expected: format!("range is currently type '{}'", other.type_name()),
                loc: value.loc().clone(),
            }),
        }
    }
}
