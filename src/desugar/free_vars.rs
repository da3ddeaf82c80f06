//! Free Variable Analysis
//!
//! Classifies every identifier referenced by a pattern literal as local
//! (bound by a match row of the pattern or of anything nested in it), free
//! (defined by an enclosing scope) or undefined.
//!
//! Free variables are reported in the order they are first seen, walking the
//! clauses in source order and every clause's match row before its body.

use std::collections::HashSet;

use crate::ast::{Clause, Expression, Let, Pattern, DISCARD};

use super::LiftError;

/// Names bound by a match row, left to right. The discard name is skipped.
pub fn match_bindings(row: &[Expression]) -> Vec<String> {
    let mut names = Vec::new();
    row.iter().for_each(|formal| collect_bindings(formal, &mut names));
    names
}

fn collect_bindings(formal: &Expression, names: &mut Vec<String>) {
    match formal {
        Expression::Identifier(id) if !id.is_discard() => names.push(id.value.clone()),
        Expression::ListConstructor(cons) => {
            collect_bindings(&cons.head, names);
            collect_bindings(&cons.tail, names);
        }
        Expression::Where(guard) => collect_bindings(&guard.inner, names),
        _ => {}
    }
}

/// Compute the free variables of `pattern`, in first-seen order.
///
/// `has_def` holds the names defined by enclosing scopes. `self_name` is the
/// name the pattern is bound to by a `let`, which the pattern may refer to
/// without capturing it.
pub fn free_variables(
    pattern: &Pattern,
    has_def: &HashSet<String>,
    builtins: &HashSet<String>,
    self_name: Option<&str>,
) -> Result<Vec<String>, LiftError> {
    let mut analyzer = FreeVarsAnalyzer {
        has_def,
        builtins,
        self_name,
        scopes: Vec::new(),
        free: Vec::new(),
        seen: HashSet::new(),
    };
    analyzer.visit_pattern(pattern)?;
    Ok(analyzer.free)
}

struct FreeVarsAnalyzer<'a> {
    has_def: &'a HashSet<String>,
    builtins: &'a HashSet<String>,
    self_name: Option<&'a str>,
    scopes: Vec<HashSet<String>>,
    free: Vec<String>,
    seen: HashSet<String>,
}

impl FreeVarsAnalyzer<'_> {
    fn visit_pattern(&mut self, pattern: &Pattern) -> Result<(), LiftError> {
        pattern.check_arity().map_err(|mismatch| LiftError::ArityMismatch {
            expected: mismatch.expected,
            found: mismatch.found,
        })?;

        for clause in &pattern.clauses {
            self.visit_clause(clause)?;
        }
        Ok(())
    }

    fn visit_clause(&mut self, clause: &Clause) -> Result<(), LiftError> {
        self.scopes.push(HashSet::new());
        let result = clause
            .matches
            .iter()
            .try_for_each(|formal| self.visit_match(formal))
            .and_then(|_| self.visit(&clause.body));
        self.scopes.pop();
        result
    }

    /// Bind the names of one formal, then check its guard conditions.
    fn visit_match(&mut self, formal: &Expression) -> Result<(), LiftError> {
        match formal {
            Expression::Identifier(id) => {
                self.bind(&id.value);
                Ok(())
            }
            Expression::ListConstructor(cons) => {
                self.visit_match(&cons.head)?;
                self.visit_match(&cons.tail)
            }
            Expression::Where(guard) => {
                self.visit_match(&guard.inner)?;
                self.visit(&guard.condition)
            }
            _ => Ok(()),
        }
    }

    fn visit(&mut self, expr: &Expression) -> Result<(), LiftError> {
        match expr {
            Expression::Identifier(id) => self.reference(&id.value),
            Expression::Application(app) => app.body.iter().try_for_each(|e| self.visit(e)),
            Expression::List(list) => list.values.iter().try_for_each(|e| self.visit(e)),
            Expression::Let(let_expr) => self.visit_let(let_expr),
            Expression::Pattern(pattern) => self.visit_pattern(pattern),
            Expression::Where(guard) => {
                self.visit(&guard.inner)?;
                self.visit(&guard.condition)
            }
            Expression::ListConstructor(cons) => {
                self.visit(&cons.head)?;
                self.visit(&cons.tail)
            }
            Expression::Label(_)
            | Expression::String(_)
            | Expression::Number(_)
            | Expression::Builtin(_) => Ok(()),
        }
    }

    fn visit_let(&mut self, let_expr: &Let) -> Result<(), LiftError> {
        self.scopes.push(HashSet::new());
        let result = let_expr
            .bindings()
            .try_for_each(|(id, value)| {
                // a pattern literal bound by a let may call itself
                if matches!(value, Expression::Pattern(_)) {
                    self.bind(&id.value);
                    self.visit(value)
                } else {
                    self.visit(value)?;
                    self.bind(&id.value);
                    Ok(())
                }
            })
            .and_then(|_| self.visit(&let_expr.body));
        self.scopes.pop();
        result
    }

    fn bind(&mut self, name: &str) {
        if name == DISCARD {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn reference(&mut self, name: &str) -> Result<(), LiftError> {
        if name == DISCARD
            || self.scopes.iter().any(|scope| scope.contains(name))
            || self.self_name == Some(name)
        {
            return Ok(());
        }

        if self.has_def.contains(name) {
            if self.seen.insert(name.to_string()) {
                self.free.push(name.to_string());
            }
            return Ok(());
        }

        if self.builtins.contains(name) {
            return Ok(());
        }

        Err(LiftError::UndefinedIdentifier {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::builtin_names;

    fn id(name: &str) -> Expression {
        Expression::ident(name)
    }

    fn apply(body: Vec<Expression>) -> Expression {
        Expression::apply(body)
    }

    fn defs(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn builtins() -> HashSet<String> {
        builtin_names().into_iter().map(String::from).collect()
    }

    fn analyze(pattern: &Pattern, has_def: &[&str]) -> Result<Vec<String>, LiftError> {
        free_variables(pattern, &defs(has_def), &builtins(), None)
    }

    #[test]
    fn row_identifiers_are_local() {
        let pattern = Pattern::new(vec![Clause::new(
            vec![id("y")],
            apply(vec![id("+"), id("x"), id("y")]),
        )]);

        assert_eq!(analyze(&pattern, &["x", "y"]), Ok(vec!["x".to_string()]));
    }

    #[test]
    fn order_is_first_seen_not_alphabetical() {
        let pattern = Pattern::new(vec![
            Clause::new(vec![Expression::number(0)], id("zeta")),
            Clause::new(
                vec![id("n")],
                apply(vec![id("+"), id("alpha"), id("zeta")]),
            ),
        ]);

        assert_eq!(
            analyze(&pattern, &["alpha", "zeta"]),
            Ok(vec!["zeta".to_string(), "alpha".to_string()])
        );
    }

    #[test]
    fn undefined_identifier_is_an_error() {
        let pattern = Pattern::new(vec![Clause::new(vec![id("x")], id("nowhere"))]);

        assert_eq!(
            analyze(&pattern, &[]),
            Err(LiftError::UndefinedIdentifier {
                name: "nowhere".into()
            })
        );
    }

    #[test]
    fn builtins_are_never_captured() {
        let pattern = Pattern::new(vec![Clause::new(
            vec![id("x")],
            apply(vec![id("print"), id("x")]),
        )]);

        assert_eq!(analyze(&pattern, &[]), Ok(vec![]));
    }

    #[test]
    fn shadowed_builtin_is_captured() {
        let pattern = Pattern::new(vec![Clause::new(
            vec![id("x")],
            apply(vec![id("+"), id("x"), id("x")]),
        )]);

        assert_eq!(analyze(&pattern, &["+"]), Ok(vec!["+".to_string()]));
    }

    #[test]
    fn guard_and_cons_bindings_are_local() {
        let pattern = Pattern::new(vec![Clause::new(
            vec![Expression::guard(
                Expression::cons(id("h"), id("t")),
                apply(vec![id(">"), id("h"), id("limit")]),
            )],
            id("t"),
        )]);

        assert_eq!(
            analyze(&pattern, &["limit", "h"]),
            Ok(vec!["limit".to_string()])
        );
    }

    #[test]
    fn nested_scopes_do_not_leak() {
        // { x -> ({ y -> y } y) }: the inner `y` does not bind the outer one
        let pattern = Pattern::new(vec![Clause::new(
            vec![id("x")],
            apply(vec![
                Expression::pattern(vec![Clause::new(vec![id("y")], id("y"))]),
                id("y"),
            ]),
        )]);

        assert_eq!(analyze(&pattern, &["y"]), Ok(vec!["y".to_string()]));
    }

    #[test]
    fn let_inside_body_binds_sequentially() {
        let pattern = Pattern::new(vec![Clause::new(
            vec![id("x")],
            Expression::let_in(vec![("a", id("x")), ("b", id("a"))], id("b")),
        )]);

        assert_eq!(analyze(&pattern, &[]), Ok(vec![]));
    }

    #[test]
    fn self_name_is_not_captured() {
        let pattern = Pattern::new(vec![Clause::new(
            vec![id("n")],
            apply(vec![id("f"), id("n")]),
        )]);

        assert_eq!(
            free_variables(&pattern, &defs(&["f"]), &builtins(), Some("f")),
            Ok(vec![])
        );
    }

    #[test]
    fn differing_arity_is_rejected() {
        let pattern = Pattern::new(vec![
            Clause::new(vec![id("a")], id("a")),
            Clause::new(vec![id("a"), id("b")], id("a")),
        ]);

        assert_eq!(
            analyze(&pattern, &[]),
            Err(LiftError::ArityMismatch {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn match_bindings_follow_row_order() {
        let row = vec![
            id("a"),
            id("_"),
            Expression::cons(id("h"), id("t")),
            Expression::guard(id("g"), Expression::truthy()),
        ];

        assert_eq!(match_bindings(&row), vec!["a", "h", "t", "g"]);
    }
}
