//! # Parser
//!
//! Combinator-based recursive descent over the token stream produced by
//! [`crate::lexer`]. The result is a single [`Expression`](crate::ast::Expression).
//!
//! - [`state`] holds the token cursor and the furthest error seen so far
//! - [`combinators`] provides [`BoxedParser`] and its operators
//!   (`+` sequence, `-` keep left, `*` keep right, `|` choice, `>>` map)
//! - `grammar` contains the rules themselves

pub mod combinators;
mod grammar;
pub mod state;

pub use combinators::BoxedParser;
pub use grammar::{expression, match_component, parse, parse_tokens, pattern};
pub use state::{ParseError, ParseResult, ParseState, Parser};
