use crate::ast::{Expression, ListConstructor};

use super::{Environment, Interpreter, RuntimeError, RuntimeErrorKind};

type Bindings = Vec<(String, Expression)>;

impl Interpreter {
    /// Match one formal parameter against one argument value.
    ///
    /// Returns `Ok(None)` when the argument does not match and `Ok(Some(_))`
    /// with every new binding committed in one child frame of `env` when it
    /// does. Repeated identifiers rebind, so the last occurrence wins.
    ///
    /// Only identifiers, literals, lists, cons patterns and guards can appear
    /// in a match row; anything else is reported as
    /// [`RuntimeErrorKind::MalformedPattern`].
    pub fn try_match(
        &self,
        pattern: &Expression,
        argument: &Expression,
        env: &Environment,
    ) -> Result<Option<Environment>, RuntimeError> {
        let mut bindings = Bindings::new();
        if self.match_into(pattern, argument, env, &mut bindings)? {
            Ok(Some(env.extend(bindings)))
        } else {
            Ok(None)
        }
    }

    fn match_into(
        &self,
        pattern: &Expression,
        argument: &Expression,
        env: &Environment,
        bindings: &mut Bindings,
    ) -> Result<bool, RuntimeError> {
        match pattern {
            Expression::Identifier(id) => {
                if !id.is_discard() {
                    bindings.push((id.value.clone(), argument.clone()));
                }
                Ok(true)
            }
            Expression::Number(_)
            | Expression::String(_)
            | Expression::Label(_)
            | Expression::List(_) => Ok(pattern == argument),
            Expression::Where(guard) => {
                if !self.match_into(&guard.inner, argument, env, bindings)? {
                    return Ok(false);
                }
                let tentative = env.extend(bindings.clone());
                let verdict = self.eval(&guard.condition, &tentative, true)?;
                Ok(verdict.is_truthy())
            }
            Expression::ListConstructor(cons) => self.match_cons(cons, argument, env, bindings),
            Expression::Application(_)
            | Expression::Let(_)
            | Expression::Pattern(_)
            | Expression::Builtin(_) => {
                Err(RuntimeErrorKind::MalformedPattern(pattern.kind().to_string()).into())
            }
        }
    }

    fn match_cons(
        &self,
        cons: &ListConstructor,
        argument: &Expression,
        env: &Environment,
        bindings: &mut Bindings,
    ) -> Result<bool, RuntimeError> {
        let (head, tail) = match argument {
            Expression::List(list) => {
                let Some((first, rest)) = list.values.split_first() else {
                    return Ok(false);
                };
                (first.clone(), Expression::list(rest.to_vec()))
            }
            Expression::String(string) => {
                let Some((head, tail)) = split_string(&cons.head, &string.value) else {
                    return Ok(false);
                };
                (Expression::string(head), Expression::string(tail))
            }
            _ => return Ok(false),
        };

        Ok(self.match_into(&cons.head, &head, env, bindings)?
            && self.match_into(&cons.tail, &tail, env, bindings)?)
    }
}

/// Split `value` for a cons pattern. A string literal head takes a prefix of
/// its own length, any other head takes a single character.
fn split_string<'a>(head: &Expression, value: &'a str) -> Option<(&'a str, &'a str)> {
    if value.is_empty() {
        return None;
    }

    let width = match head {
        Expression::String(prefix) => prefix.value.chars().count(),
        _ => 1,
    };

    if value.chars().count() < width {
        return None;
    }

    let at = value
        .char_indices()
        .nth(width)
        .map_or(value.len(), |(index, _)| index);
    Some(value.split_at(at))
}
