//! # Runtime Errors
//!
//! A [`RuntimeError`] is a [`RuntimeErrorKind`] describing what went wrong at
//! the innermost point, plus a chain of context lines added by every
//! enclosing evaluation step on the way out:
//!
//! ```text
//! runtime error: cannot get value for identifier 'y'
//!   0: unable to evaluate argument 2 of application
//!   1: unable to evaluate body of let
//! ```
//!
//! In safe mode these errors never leave the evaluator; they are converted to
//! the falsy label where they occur.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeErrorKind {
    #[error("cannot get value for identifier '{0}'")]
    UnboundIdentifier(String),
    #[error("failed to match argument {argument} to pattern")]
    MatchFailure { argument: String },
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("cannot apply {callee} to {argument}")]
    NotApplicable { callee: String, argument: String },
    #[error("{0} cannot be used as a formal parameter")]
    MalformedPattern(String),
    #[error("cannot evaluate {0} outside of a match row")]
    MatchOnly(&'static str),
    #[error("pattern clauses have differing arity: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("pattern has no formal parameters left to apply")]
    NothingToApply,
    #[error("pattern was applied before it was evaluated")]
    UnevaluatedPattern,
    #[error("empty application")]
    EmptyApplication,
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in '{0}'")]
    IntegerOverflow(String),
    #[error("recursion limit of {0} nested applications exceeded")]
    RecursionLimit(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    /// Context lines, innermost first.
    pub context: Vec<String>,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind) -> Self {
        Self {
            kind,
            context: Vec::new(),
        }
    }

    pub fn unbound(name: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::UnboundIdentifier(name.into()))
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::TypeMismatch(message.into()))
    }

    /// Wrap this error with a description of what the caller was doing.
    pub fn context(mut self, message: impl Into<String>) -> Self {
        self.context.push(message.into());
        self
    }

    /// The full chain, innermost first, starting with the kind itself.
    pub fn chain(&self) -> Vec<String> {
        std::iter::once(self.kind.to_string())
            .chain(self.context.iter().cloned())
            .collect()
    }
}

impl From<RuntimeErrorKind> for RuntimeError {
    fn from(kind: RuntimeErrorKind) -> Self {
        RuntimeError::new(kind)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime error: {}", self.kind)?;
        for (index, line) in self.context.iter().enumerate() {
            write!(f, "\n  {index}: {line}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}

/// Attach context to the error of a `Result`.
pub trait Context<T> {
    fn context(self, message: impl Into<String>) -> Result<T, RuntimeError>;

    fn with_context<F, S>(self, message: F) -> Result<T, RuntimeError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> Context<T> for Result<T, RuntimeError> {
    fn context(self, message: impl Into<String>) -> Result<T, RuntimeError> {
        self.map_err(|err| err.context(message))
    }

    fn with_context<F, S>(self, message: F) -> Result<T, RuntimeError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|err| err.context(message()))
    }
}
