use log::{debug, trace};

use crate::ast::{Application, Clause, Expression, Let, Pattern};

use super::{Context, Environment, Interpreter, RuntimeError, RuntimeErrorKind};

/// Remaining stack below which evaluation continues on a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

impl Interpreter {
    /// Evaluate `expr` in `env`. With `safe` set, a failure yields the falsy
    /// label instead of an error.
    ///
    /// The native stack grows on demand, so deep recursion ends in
    /// [`RuntimeErrorKind::RecursionLimit`] rather than a stack overflow.
    pub fn eval(
        &self,
        expr: &Expression,
        env: &Environment,
        safe: bool,
    ) -> Result<Expression, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_unchecked(expr, env, safe)
                .or_else(|err| contain(err, safe))
        })
    }

    /// Apply a single argument to an evaluated callee.
    pub fn apply(
        &self,
        callee: &Expression,
        argument: Expression,
        safe: bool,
    ) -> Result<Expression, RuntimeError> {
        trace!("applying {} to {}", callee.kind(), argument);
        self.apply_unchecked(callee, argument, safe)
            .or_else(|err| contain(err, safe))
    }

    fn eval_unchecked(
        &self,
        expr: &Expression,
        env: &Environment,
        safe: bool,
    ) -> Result<Expression, RuntimeError> {
        match expr {
            Expression::Identifier(id) => env
                .get(&id.value)
                .ok_or_else(|| RuntimeError::unbound(id.value.clone())),
            Expression::Number(_)
            | Expression::String(_)
            | Expression::Label(_)
            | Expression::Builtin(_) => Ok(expr.clone()),
            Expression::List(list) => list
                .values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    self.eval(value, env, safe)
                        .with_context(|| format!("unable to evaluate element {index} of list"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Expression::list),
            Expression::Application(application) => self.eval_application(application, env, safe),
            Expression::Let(let_expr) => self.eval_let(let_expr, env, safe),
            Expression::Pattern(pattern) if pattern.is_closure() => Ok(expr.clone()),
            Expression::Pattern(pattern) => Ok(Expression::Pattern(pattern.close_over(env.clone()))),
            Expression::ListConstructor(_) => {
                Err(RuntimeErrorKind::MatchOnly("list constructor").into())
            }
            Expression::Where(_) => Err(RuntimeErrorKind::MatchOnly("where").into()),
        }
    }

    fn eval_application(
        &self,
        application: &Application,
        env: &Environment,
        safe: bool,
    ) -> Result<Expression, RuntimeError> {
        let Some((callee, arguments)) = application.body.split_first() else {
            return Err(RuntimeErrorKind::EmptyApplication.into());
        };

        let mut value = self
            .eval(callee, env, safe)
            .context("unable to evaluate callee of application")?;

        for (index, argument) in arguments.iter().enumerate() {
            let position = index + 1;
            let argument = self
                .eval(argument, env, safe)
                .with_context(|| format!("unable to evaluate argument {position} of application"))?;
            value = self
                .apply(&value, argument, safe)
                .with_context(|| format!("unable to apply argument {position} of application"))?;
        }

        Ok(value)
    }

    fn eval_let(
        &self,
        let_expr: &Let,
        env: &Environment,
        safe: bool,
    ) -> Result<Expression, RuntimeError> {
        let mut scope = env.clone();
        for (id, value) in let_expr.bindings() {
            scope = match value {
                Expression::Pattern(pattern) if !pattern.is_closure() => {
                    scope.bind_recursive(id.value.clone(), pattern.clone())
                }
                _ => {
                    let value = self.eval(value, &scope, safe).with_context(|| {
                        format!("unable to evaluate binding '{}' of let", id.value)
                    })?;
                    scope.bind(id.value.clone(), value)
                }
            };
        }

        self.eval(&let_expr.body, &scope, safe)
            .context("unable to evaluate body of let")
    }

    fn apply_unchecked(
        &self,
        callee: &Expression,
        argument: Expression,
        safe: bool,
    ) -> Result<Expression, RuntimeError> {
        match callee {
            Expression::Pattern(pattern) => self.apply_pattern(pattern, argument),
            Expression::Builtin(builtin) => builtin
                .call(argument, safe)
                .with_context(|| format!("unable to apply builtin '{}'", builtin.name)),
            other => Err(RuntimeErrorKind::NotApplicable {
                callee: other.kind().to_string(),
                argument: argument.to_string(),
            }
            .into()),
        }
    }

    /// Feed one argument to every clause of a closure. Clauses whose first
    /// formal does not match are dropped. Once the remaining match rows are
    /// empty the first surviving clause is committed to.
    fn apply_pattern(
        &self,
        pattern: &Pattern,
        argument: Expression,
    ) -> Result<Expression, RuntimeError> {
        if !pattern.is_closure() {
            return Err(RuntimeErrorKind::UnevaluatedPattern.into());
        }

        let mut survivors = Pattern {
            clauses: Vec::new(),
            captured: Vec::new(),
        };

        for (clause, captured) in pattern.clauses.iter().zip(&pattern.captured) {
            let Some((formal, rest)) = clause.matches.split_first() else {
                return Err(RuntimeErrorKind::NothingToApply.into());
            };

            if let Some(extended) = self.try_match(formal, &argument, captured)? {
                survivors
                    .clauses
                    .push(Clause::new(rest.to_vec(), clause.body.clone()));
                survivors.captured.push(extended);
            }
        }

        if survivors.clauses.is_empty() {
            return Err(RuntimeErrorKind::MatchFailure {
                argument: argument.to_string(),
            }
            .into());
        }

        let remaining = survivors.check_arity().map_err(|mismatch| {
            RuntimeError::from(RuntimeErrorKind::ArityMismatch {
                expected: mismatch.expected,
                found: mismatch.found,
            })
        })?;

        if remaining > 0 {
            return Ok(Expression::Pattern(survivors));
        }

        self.saturate(&survivors.clauses[0].body, &survivors.captured[0])
            .context("unable to evaluate body of matched clause")
    }

    fn saturate(&self, body: &Expression, env: &Environment) -> Result<Expression, RuntimeError> {
        let depth = self.depth.get() + 1;
        if depth > self.config.max_depth {
            return Err(RuntimeErrorKind::RecursionLimit(self.config.max_depth).into());
        }

        self.depth.set(depth);
        let result = self.eval(body, env, false);
        self.depth.set(depth - 1);
        result
    }
}

fn contain(err: RuntimeError, safe: bool) -> Result<Expression, RuntimeError> {
    if safe {
        debug!("safe evaluation yields false: {}", err.kind);
        Ok(Expression::falsy())
    } else {
        Err(err)
    }
}
