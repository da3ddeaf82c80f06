//! # Pattern AST Nodes
//!
//! This module defines the nodes that make up a multi-clause function
//! ("pattern") and the match components that only appear in its match rows.
//!
//! ## Overview
//!
//! A pattern is an ordered list of clauses. Each clause has a match row (one
//! formal per parameter) and a body:
//!
//! ```text
//! {
//!     0 -> 1
//!     1 -> 1
//!     n -> (+ (fib (- n 1)) (fib (- n 2)))
//! }
//! ```
//!
//! Every match row of a pattern has the same length, its **arity**. Match
//! components are:
//!
//! - **Identifiers** bind the argument (`n`, or `_` to discard it)
//! - **Literals** (`0`, `"abc"`, `.pos`, `[1 2]`) match by structural equality
//! - **Cons patterns** (`[h : t]`) split a non-empty list or string
//! - **Guards** (`n : (> n 0)`) add a condition evaluated after the inner match
//!
//! ## Closures
//!
//! A pattern literal in the source has no captured environments. Evaluating it
//! snapshots the defining scope once per clause (see [`Pattern::close_over`]).
//! Applying a closure to an argument keeps only the clauses that matched, each
//! with its extended environment, until the arity is saturated.
//!
//! ## Related Modules
//!
//! - [`crate::interpreter`] - Matching and application of patterns
//! - [`crate::desugar`] - Lambda lifting of pattern literals

use std::fmt;
use std::rc::Rc;

use super::Expression;
use crate::interpreter::{Environment, RuntimeError};

/// One `(match row, body)` pair of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub matches: Vec<Expression>,
    pub body: Expression,
}

impl Clause {
    pub fn new(matches: Vec<Expression>, body: Expression) -> Self {
        Self { matches, body }
    }
}

/// A multi-clause function value.
///
/// `captured` is empty for a literal and holds exactly one environment per
/// clause once the pattern has been evaluated.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub clauses: Vec<Clause>,
    pub captured: Vec<Environment>,
}

/// The clause arities of a pattern disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityMismatch {
    pub expected: usize,
    pub found: usize,
}

impl Pattern {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self {
            clauses,
            captured: Vec::new(),
        }
    }

    /// Number of formal parameters still expected. Zero for a pattern
    /// without clauses.
    pub fn arity(&self) -> usize {
        self.clauses.first().map_or(0, |clause| clause.matches.len())
    }

    /// Check that all match rows have the same length.
    pub fn check_arity(&self) -> Result<usize, ArityMismatch> {
        let expected = self.arity();
        match self
            .clauses
            .iter()
            .find(|clause| clause.matches.len() != expected)
        {
            Some(clause) => Err(ArityMismatch {
                expected,
                found: clause.matches.len(),
            }),
            None => Ok(expected),
        }
    }

    pub fn is_closure(&self) -> bool {
        !self.captured.is_empty()
    }

    /// The closure form of this pattern: every clause closes over `env`.
    pub fn close_over(&self, env: Environment) -> Pattern {
        Pattern {
            clauses: self.clauses.clone(),
            captured: vec![env; self.clauses.len()],
        }
    }
}

/// Two closures are equal when they share code and captured frames. Equal
/// code over different frames, as in `(make_adder 1)` and `(make_adder 2)`,
/// is not equal.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.clauses == other.clauses
            && self.captured.len() == other.captured.len()
            && self
                .captured
                .iter()
                .zip(&other.captured)
                .all(|(left, right)| left.ptr_eq(right))
    }
}

/// A cons pattern: destructures the first element (or character) and the
/// remainder of a list (or string).
#[derive(Debug, Clone, PartialEq)]
pub struct ListConstructor {
    pub head: Box<Expression>,
    pub tail: Box<Expression>,
}

/// A guarded match component.
///
/// `constant_time` marks a condition the lambda lifter leaves untouched; it
/// does not change evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    pub inner: Box<Expression>,
    pub condition: Box<Expression>,
    pub constant_time: bool,
}

impl Where {
    pub fn new(inner: Expression, condition: Expression, constant_time: bool) -> Self {
        Self {
            inner: Box::new(inner),
            condition: Box::new(condition),
            constant_time,
        }
    }
}

/// Native operation behind a [`Builtin`]: receives the argument and the safe flag.
pub type NativeFn = Rc<dyn Fn(Expression, bool) -> Result<Expression, RuntimeError>>;

/// An opaque, atomically applied primitive.
#[derive(Clone)]
pub struct Builtin {
    pub name: String,
    op: NativeFn,
}

impl Builtin {
    pub fn new<F>(name: impl Into<String>, op: F) -> Self
    where
        F: Fn(Expression, bool) -> Result<Expression, RuntimeError> + 'static,
    {
        Self {
            name: name.into(),
            op: Rc::new(op),
        }
    }

    pub fn call(&self, argument: Expression, safe: bool) -> Result<Expression, RuntimeError> {
        (self.op)(argument, safe)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
