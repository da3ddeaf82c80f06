//! # Clausal - a small pattern-matching functional language
//!
//! Programs are built from multi-clause functions ("patterns") with guards,
//! list and string cons-destructuring and lexical closures, evaluated by an
//! environment-based tree-walking interpreter. A lambda-lifting pass can
//! rewrite every nested closure into a flat, explicitly parameterized
//! top-level binding.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → Expression
//!     ↓
//! [Lambda Lifter] → Expression without implicit captures (optional)
//!     ↓
//! [Interpreter] → Expression (the program's value)
//! ```
//!
//! ## Example Program
//!
//! ```text
//! # naive fibonacci
//! let fib = {
//!     0 -> 1
//!     1 -> 1
//!     n -> (+ (fib (- n 1)) (fib (- n 2)))
//! }
//! (fib 10)
//! ```
//!
//! Applying fewer arguments than a pattern expects yields a partially
//! applied pattern that keeps only the clauses that matched so far.
//!
//! ## Module Structure
//!
//! - [`ast`] - The expression tree, shared by source and runtime values
//! - [`interpreter`] - Environments, matching, evaluation and builtins
//! - [`desugar`] - Free-variable analysis and lambda lifting
//! - [`lexer`] - Tokenization using lachs
//! - [`parser`] - Parsing using combinator-based grammar
//! - [`fmt`] - Pretty-printing

pub mod ast;
pub mod desugar;
pub mod fmt;
pub mod interpreter;
pub mod lexer;
pub mod parser;

use thiserror::Error;

use ast::Expression;
use desugar::LiftError;
use interpreter::RuntimeError;
use parser::ParseError;

/// Any failure between source text and a final value.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Lift(#[from] LiftError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Parse `source` into a program.
pub fn parse_source(source: &str) -> Result<Expression, Error> {
    Ok(parser::parse(source)?)
}

/// Parse and evaluate `source` with the default configuration.
pub fn run_source(source: &str) -> Result<Expression, Error> {
    let program = parse_source(source)?;
    Ok(interpreter::run(&program)?)
}

/// Parse, lambda-lift and evaluate `source` with the default configuration.
pub fn run_lifted_source(source: &str) -> Result<Expression, Error> {
    let program = desugar::defun(&parse_source(source)?)?;
    Ok(interpreter::run(&program)?)
}
