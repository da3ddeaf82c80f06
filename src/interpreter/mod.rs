//! # Interpreter
//!
//! A tree-walking evaluator over [`Expression`]s. Values are expressions too:
//! evaluation maps a program to a literal, a list, a closure (an evaluated
//! [`Pattern`](crate::ast::Pattern)) or a builtin.
//!
//! ## Safe mode
//!
//! Every [`Interpreter::eval`] and [`Interpreter::apply`] call carries a
//! `safe` flag. Guard conditions are evaluated with `safe = true`: any
//! runtime error raised while evaluating them is turned into the falsy label
//! right where it happens, so a guard can only fail to match. The body of a
//! clause that was committed to is evaluated with `safe = false` and its
//! errors propagate to the caller.
//!
//! ## Recursion
//!
//! Each saturated pattern application counts towards
//! [`InterpreterConfig::max_depth`]. Exceeding it is reported as
//! [`RuntimeErrorKind::RecursionLimit`].

mod builtins;
mod environment;
mod error;
mod eval;
mod matcher;

use std::cell::Cell;

pub use builtins::{builtin_names, builtins, is_builtin};
pub use environment::Environment;
pub use error::{Context, RuntimeError, RuntimeErrorKind};

use crate::ast::Expression;

pub const DEFAULT_MAX_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of nested saturated applications.
    pub max_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
    depth: Cell<usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            config,
            depth: Cell::new(0),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Evaluate a whole program against a fresh root environment holding the
    /// builtins.
    pub fn run(&self, program: &Expression) -> Result<Expression, RuntimeError> {
        self.eval(program, &Environment::with_builtins(), false)
    }
}

/// Evaluate `program` with the default configuration.
pub fn run(program: &Expression) -> Result<Expression, RuntimeError> {
    Interpreter::new().run(program)
}
