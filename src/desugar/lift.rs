//! Lambda Lifting - Turn every pattern literal into a top-level binding
//!
//! Each pattern literal is moved to a fresh top-level name. The variables it
//! captured from enclosing scopes become explicit leading formals of every
//! clause, and the literal itself is replaced by the fresh name applied
//! to those variables.
//!
//! Example transformation:
//! ```text
//! let make_adder = { x -> { y -> (+ x y) } }
//! ((make_adder 5) 3)
//! ```
//!
//! The inner pattern captures `x`. After lifting:
//! ```text
//! let lambda_1 = { x y -> (+ x y) }
//!     lambda_0 = { x -> (lambda_1 x) }
//! let make_adder = lambda_0
//! ((make_adder 5) 3)
//! ```
//!
//! A pattern bound by a `let` may call itself by that name. Clauses that do so
//! rebind the name locally to the lifted call expression. Guards are checked
//! before the rest of their row is bound, so a guard that uses a captured
//! name shadowed later in the row rebinds it to its alias formal.

use std::collections::HashSet;

use log::debug;

use crate::ast::{Clause, Expression, Identifier, Let, Pattern, Where};

use super::free_vars::{free_variables, match_bindings};
use super::LiftError;

pub struct LambdaLifter {
    builtins: HashSet<String>,
    taken: HashSet<String>,
    counter: usize,
    lifted: Vec<(String, Pattern)>,
}

impl LambdaLifter {
    pub fn new(builtins: HashSet<String>) -> Self {
        Self {
            builtins,
            taken: HashSet::new(),
            counter: 0,
            lifted: Vec::new(),
        }
    }

    /// Lift every pattern literal of `program`.
    ///
    /// The lifted patterns are bound by one `let` around the rewritten program,
    /// innermost first. A program without patterns is returned unchanged.
    pub fn lift(mut self, program: &Expression) -> Result<Expression, LiftError> {
        self.taken = program.identifiers().into_iter().collect();

        let body = self.defun(program, &HashSet::new())?;
        if self.lifted.is_empty() {
            return Ok(body);
        }

        let (ids, values) = self
            .lifted
            .into_iter()
            .map(|(name, pattern)| (Identifier::new(name), Expression::Pattern(pattern)))
            .unzip();

        Ok(Expression::Let(Let {
            ids,
            values,
            body: Box::new(body),
        }))
    }

    fn fresh_name(&mut self, prefix: &str) -> String {
        loop {
            let name = format!("{prefix}_{}", self.counter);
            self.counter += 1;
            if self.taken.insert(name.clone()) {
                return name;
            }
        }
    }

    fn defun(
        &mut self,
        expr: &Expression,
        has_def: &HashSet<String>,
    ) -> Result<Expression, LiftError> {
        match expr {
            Expression::Pattern(pattern) => self.lift_pattern(pattern, has_def, None),
            Expression::Let(let_expr) => self.defun_let(let_expr, has_def),
            Expression::Application(app) => Ok(Expression::apply(
                app.body
                    .iter()
                    .map(|e| self.defun(e, has_def))
                    .collect::<Result<_, _>>()?,
            )),
            Expression::List(list) => Ok(Expression::list(
                list.values
                    .iter()
                    .map(|e| self.defun(e, has_def))
                    .collect::<Result<_, _>>()?,
            )),
            Expression::Identifier(_)
            | Expression::Label(_)
            | Expression::String(_)
            | Expression::Number(_)
            | Expression::ListConstructor(_)
            | Expression::Where(_)
            | Expression::Builtin(_) => Ok(expr.clone()),
        }
    }

    fn defun_let(
        &mut self,
        let_expr: &Let,
        has_def: &HashSet<String>,
    ) -> Result<Expression, LiftError> {
        let mut defs = has_def.clone();
        let mut values = Vec::with_capacity(let_expr.values.len());

        for (id, value) in let_expr.bindings() {
            let value = match value {
                Expression::Pattern(pattern) => {
                    self.lift_pattern(pattern, &defs, Some(&id.value))?
                }
                other => self.defun(other, &defs)?,
            };
            values.push(value);
            defs.insert(id.value.clone());
        }

        Ok(Expression::Let(Let {
            ids: let_expr.ids.clone(),
            values,
            body: Box::new(self.defun(&let_expr.body, &defs)?),
        }))
    }

    /// Lift one pattern literal and return the expression replacing it.
    fn lift_pattern(
        &mut self,
        pattern: &Pattern,
        has_def: &HashSet<String>,
        self_name: Option<&str>,
    ) -> Result<Expression, LiftError> {
        let captured = free_variables(pattern, has_def, &self.builtins, self_name)?;
        let name = self.fresh_name("lambda");

        let mut clauses = Vec::with_capacity(pattern.clauses.len());
        for clause in &pattern.clauses {
            clauses.push(self.lift_clause(clause, &name, &captured, has_def, self_name)?);
        }

        debug!("lifted pattern {name} capturing [{}]", captured.join(", "));
        self.lifted.push((name.clone(), Pattern::new(clauses)));

        Ok(call(&name, &captured))
    }

    fn lift_clause(
        &mut self,
        clause: &Clause,
        name: &str,
        captured: &[String],
        has_def: &HashSet<String>,
        self_name: Option<&str>,
    ) -> Result<Clause, LiftError> {
        let locals = match_bindings(&clause.matches);

        // a captured name the row rebinds needs a formal of its own
        let params: Vec<String> = captured
            .iter()
            .map(|fv| {
                if locals.contains(fv) {
                    self.fresh_name(fv)
                } else {
                    fv.clone()
                }
            })
            .collect();

        // names a guard may still need from outside before the row shadows them
        let outer: Vec<(String, Expression)> = captured
            .iter()
            .zip(&params)
            .filter(|(fv, param)| fv != param)
            .map(|(fv, param)| (fv.clone(), Expression::ident(param.as_str())))
            .chain(self_name.map(|self_name| (self_name.to_string(), call(name, &params))))
            .collect();

        let mut defs = has_def.clone();
        defs.extend(params.iter().cloned());
        defs.extend(locals.iter().cloned());

        let mut row: Vec<Expression> = params
            .iter()
            .map(|param| Expression::ident(param.as_str()))
            .collect();
        for (index, formal) in clause.matches.iter().enumerate() {
            // a guard sees its own formal and the ones before it
            let bound = match_bindings(&clause.matches[..=index]);
            let rebinds = unbound(&outer, &bound);
            row.push(self.defun_match(formal, &defs, &rebinds)?);
        }

        let body = rebind(&clause.body, &unbound(&outer, &locals));
        let body = self.defun(&body, &defs)?;

        Ok(Clause::new(row, body))
    }

    fn defun_match(
        &mut self,
        formal: &Expression,
        defs: &HashSet<String>,
        rebinds: &[(String, Expression)],
    ) -> Result<Expression, LiftError> {
        match formal {
            Expression::ListConstructor(cons) => Ok(Expression::cons(
                self.defun_match(&cons.head, defs, rebinds)?,
                self.defun_match(&cons.tail, defs, rebinds)?,
            )),
            Expression::Where(guard) => {
                let inner = self.defun_match(&guard.inner, defs, rebinds)?;
                let condition = rebind(&guard.condition, rebinds);
                let condition = if guard.constant_time {
                    condition
                } else {
                    self.defun(&condition, defs)?
                };
                Ok(Expression::Where(Where::new(
                    inner,
                    condition,
                    guard.constant_time,
                )))
            }
            other => Ok(other.clone()),
        }
    }
}

/// `name` applied to the captured variables, or just `name` when nothing was
/// captured.
fn call(name: &str, captured: &[String]) -> Expression {
    if captured.is_empty() {
        return Expression::ident(name);
    }

    let mut body = vec![Expression::ident(name)];
    body.extend(captured.iter().map(|name| Expression::ident(name.as_str())));
    Expression::apply(body)
}

/// The entries of `outer` whose names are not in `bound`.
fn unbound(outer: &[(String, Expression)], bound: &[String]) -> Vec<(String, Expression)> {
    outer
        .iter()
        .filter(|(name, _)| !bound.contains(name))
        .cloned()
        .collect()
}

/// Wrap `expr` in a `let` for each of `bindings` it mentions.
fn rebind(expr: &Expression, bindings: &[(String, Expression)]) -> Expression {
    let mentioned = expr.identifiers();
    let used: Vec<(&str, Expression)> = bindings
        .iter()
        .filter(|(name, _)| mentioned.contains(name))
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();

    if used.is_empty() {
        expr.clone()
    } else {
        Expression::let_in(used, expr.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::builtin_names;

    fn id(name: &str) -> Expression {
        Expression::ident(name)
    }

    fn lifter() -> LambdaLifter {
        LambdaLifter::new(builtin_names().into_iter().map(String::from).collect())
    }

    #[test]
    fn program_without_patterns_is_unchanged() {
        let program = Expression::let_in(vec![("a", Expression::number(1))], id("a"));

        assert_eq!(lifter().lift(&program), Ok(program));
    }

    #[test]
    fn closed_pattern_becomes_bare_name() {
        let program = Expression::apply(vec![
            Expression::pattern(vec![Clause::new(vec![id("x")], id("x"))]),
            Expression::number(1),
        ]);

        let expected = Expression::let_in(
            vec![(
                "lambda_0",
                Expression::pattern(vec![Clause::new(vec![id("x")], id("x"))]),
            )],
            Expression::apply(vec![id("lambda_0"), Expression::number(1)]),
        );
        assert_eq!(lifter().lift(&program), Ok(expected));
    }

    #[test]
    fn fresh_names_skip_existing_identifiers() {
        let program = Expression::let_in(
            vec![(
                "lambda_0",
                Expression::pattern(vec![Clause::new(vec![id("x")], id("x"))]),
            )],
            id("lambda_0"),
        );

        let Ok(Expression::Let(lifted)) = lifter().lift(&program) else {
            panic!("expected a let");
        };
        assert_eq!(lifted.ids, vec![Identifier::new("lambda_1")]);
    }

    #[test]
    fn captured_name_rebound_by_row_gets_alias() {
        // let x = 1 let f = { 0 -> x   x -> x } ...
        let program = Expression::let_in(
            vec![
                ("x", Expression::number(1)),
                (
                    "f",
                    Expression::pattern(vec![
                        Clause::new(vec![Expression::number(0)], id("x")),
                        Clause::new(vec![id("x")], id("x")),
                    ]),
                ),
            ],
            id("f"),
        );

        let Ok(Expression::Let(lifted)) = lifter().lift(&program) else {
            panic!("expected a let");
        };
        let Expression::Pattern(pattern) = &lifted.values[0] else {
            panic!("expected a pattern");
        };
        assert_eq!(pattern.clauses[0].matches[0], id("x"));
        assert_eq!(pattern.clauses[1].matches[0], id("x_1"));
        assert_eq!(pattern.clauses[1].matches[1], id("x"));
    }

    #[test]
    fn self_reference_is_rebound_to_lifted_call() {
        let program = Expression::let_in(
            vec![
                ("k", Expression::number(2)),
                (
                    "f",
                    Expression::pattern(vec![Clause::new(
                        vec![id("n")],
                        Expression::apply(vec![id("f"), id("k")]),
                    )]),
                ),
            ],
            id("f"),
        );

        let Ok(Expression::Let(lifted)) = lifter().lift(&program) else {
            panic!("expected a let");
        };
        let Expression::Pattern(pattern) = &lifted.values[0] else {
            panic!("expected a pattern");
        };
        assert_eq!(
            pattern.clauses[0].body,
            Expression::let_in(
                vec![("f", Expression::apply(vec![id("lambda_0"), id("k")]))],
                Expression::apply(vec![id("f"), id("k")]),
            )
        );
    }
}
