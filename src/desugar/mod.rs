//! Desugaring - Closure conversion by lambda lifting
//!
//! This module rewrites a program so that no pattern depends on an implicitly
//! captured environment:
//! - [`free_vars`] classifies the identifiers a pattern literal refers to
//! - [`lift`] moves every pattern literal to a fresh top-level binding whose
//!   captured variables are explicit leading formals
//!
//! Evaluating a program before and after [`defun`] yields the same value.

pub mod free_vars;
pub mod lift;

use std::collections::HashSet;

use thiserror::Error;

use crate::ast::Expression;
use crate::interpreter::builtin_names;

pub use free_vars::{free_variables, match_bindings};
pub use lift::LambdaLifter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiftError {
    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier { name: String },
    #[error("pattern clauses have differing arity: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}

/// Lambda-lift `program` against the builtin library.
pub fn defun(program: &Expression) -> Result<Expression, LiftError> {
    defun_with(program, builtin_names())
}

/// Lambda-lift `program`, treating `builtins` as always defined.
pub fn defun_with<I, S>(program: &Expression, builtins: I) -> Result<Expression, LiftError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let builtins: HashSet<String> = builtins.into_iter().map(Into::into).collect();
    LambdaLifter::new(builtins).lift(program)
}
