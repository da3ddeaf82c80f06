use std::fmt;
use std::rc::Rc;

use crate::ast::{Expression, Pattern, DISCARD};

use super::builtins;

#[derive(Clone)]
enum Binding {
    Value(Expression),
    /// A pattern literal that closes over the frame binding it.
    Recursive(Pattern),
}

struct Frame {
    bindings: Vec<(String, Binding)>,
    parent: Option<Environment>,
}

/// Chained, append-only binding frames for lexical scoping.
///
/// Frames are immutable once created. Extending an environment allocates a new
/// child frame, so every closure holding an `Environment` keeps seeing exactly
/// the bindings that existed when it was captured.
#[derive(Clone)]
pub struct Environment {
    frame: Rc<Frame>,
}

impl Environment {
    /// An empty root environment.
    pub fn new() -> Self {
        Self::from_frame(Vec::new(), None)
    }

    /// A root environment seeded with the builtin library.
    pub fn with_builtins() -> Self {
        let bindings = builtins::builtins()
            .into_iter()
            .map(|builtin| (builtin.name.clone(), Binding::Value(Expression::Builtin(builtin))))
            .collect();
        Self::from_frame(bindings, None)
    }

    fn from_frame(bindings: Vec<(String, Binding)>, parent: Option<Environment>) -> Self {
        Self {
            frame: Rc::new(Frame { bindings, parent }),
        }
    }

    /// A child environment binding `name` to `value`.
    pub fn bind(&self, name: impl Into<String>, value: Expression) -> Environment {
        self.extend(vec![(name.into(), value)])
    }

    /// A child environment holding all `bindings` in a single frame. Later
    /// duplicates overwrite earlier ones and `_` is dropped.
    pub fn extend(&self, bindings: Vec<(String, Expression)>) -> Environment {
        let mut frame: Vec<(String, Binding)> = Vec::with_capacity(bindings.len());
        for (name, value) in bindings {
            if name == DISCARD {
                continue;
            }
            match frame.iter_mut().find(|(key, _)| *key == name) {
                Some(slot) => slot.1 = Binding::Value(value),
                None => frame.push((name, Binding::Value(value))),
            }
        }

        if frame.is_empty() {
            return self.clone();
        }

        Self::from_frame(frame, Some(self.clone()))
    }

    /// A child environment in which `name` is bound to `pattern` closed over
    /// this very child, so the clauses can refer to `name` themselves.
    pub fn bind_recursive(&self, name: impl Into<String>, pattern: Pattern) -> Environment {
        let name = name.into();
        if name == DISCARD {
            return self.clone();
        }

        Self::from_frame(
            vec![(name, Binding::Recursive(pattern))],
            Some(self.clone()),
        )
    }

    /// Look `name` up, innermost frame first.
    pub fn get(&self, name: &str) -> Option<Expression> {
        if name == DISCARD {
            return None;
        }

        let mut current = Some(self);
        while let Some(env) = current {
            if let Some((_, binding)) = env.frame.bindings.iter().find(|(key, _)| key == name) {
                return Some(match binding {
                    Binding::Value(value) => value.clone(),
                    Binding::Recursive(pattern) => {
                        Expression::Pattern(pattern.close_over(env.clone()))
                    }
                });
            }
            current = env.frame.parent.as_ref();
        }

        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every visible name, innermost first, without duplicates.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut current = Some(self);
        while let Some(env) = current {
            for (key, _) in &env.frame.bindings {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
            current = env.frame.parent.as_ref();
        }
        names
    }

    /// Number of frames from this one up to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = Some(self);
        while let Some(env) = current {
            depth += 1;
            current = env.frame.parent.as_ref();
        }
        depth
    }

    /// Whether both handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Clause;

    #[test]
    fn lookup_walks_parents() {
        let root = Environment::new().bind("x", Expression::number(1));
        let child = root.bind("y", Expression::number(2));

        assert_eq!(child.get("x"), Some(Expression::number(1)));
        assert_eq!(child.get("y"), Some(Expression::number(2)));
        assert_eq!(child.get("z"), None);
    }

    #[test]
    fn extending_does_not_touch_parent() {
        let parent = Environment::new().bind("x", Expression::number(1));
        let child = parent.bind("x", Expression::number(2));

        assert_eq!(parent.get("x"), Some(Expression::number(1)));
        assert_eq!(child.get("x"), Some(Expression::number(2)));
    }

    #[test]
    fn discard_is_never_bound() {
        let env = Environment::new();
        let same = env.bind("_", Expression::number(1));

        assert!(same.ptr_eq(&env));
        assert_eq!(same.get("_"), None);
    }

    #[test]
    fn extend_keeps_latest_duplicate() {
        let env = Environment::new().extend(vec![
            ("a".to_string(), Expression::number(1)),
            ("a".to_string(), Expression::number(2)),
        ]);

        assert_eq!(env.get("a"), Some(Expression::number(2)));
        assert_eq!(env.depth(), 2);
    }

    #[test]
    fn recursive_binding_closes_over_its_own_frame() {
        let pattern = Pattern::new(vec![Clause::new(
            vec![Expression::ident("n")],
            Expression::ident("f"),
        )]);
        let env = Environment::new().bind_recursive("f", pattern);

        let Some(Expression::Pattern(found)) = env.get("f") else {
            panic!("expected a pattern");
        };
        assert_eq!(found.captured.len(), 1);
        assert!(found.captured[0].ptr_eq(&env));
        assert!(found.captured[0].contains("f"));
    }

    #[test]
    fn debug_lists_visible_names() {
        let env = Environment::new()
            .bind("a", Expression::number(1))
            .bind("b", Expression::number(2));

        assert_eq!(
            format!("{env:?}"),
            r#"Environment { names: ["b", "a"], depth: 3 }"#
        );
    }

    #[test]
    fn names_are_innermost_first() {
        let env = Environment::new()
            .bind("a", Expression::number(1))
            .bind("b", Expression::number(2))
            .bind("a", Expression::number(3));

        assert_eq!(env.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn builtins_are_seeded() {
        let env = Environment::with_builtins();

        assert!(env.contains("+"));
        assert!(env.contains("print"));
    }
}
