//! Grammar module
//!
//! This module contains all the parsing rules organized by category:
//! - `literal`: identifiers, operators, labels, strings and integers
//! - `expression`: lets, applications, lists
//! - `pattern`: patterns, clauses and match components
//!
//! A program is a single expression.

mod expression;
mod literal;
mod pattern;

use crate::ast::Expression;
use crate::lexer::{strip_comments, Token};

use super::state::{ParseError, ParseResult, ParseState, Parser};

pub use expression::expression;
pub use pattern::{match_component, pattern};

/// Lex and parse a complete program.
pub fn parse(source: &str) -> ParseResult<Expression> {
    let tokens = Token::lex(&strip_comments(source))
        .map_err(|err| ParseError::new(format!("lexing failed: {err}")))?;
    parse_tokens(&mut ParseState::new(tokens))
}

/// Parse a complete program from the token stream. The whole stream must be
/// consumed.
pub fn parse_tokens(state: &mut ParseState) -> ParseResult<Expression> {
    match expression().parse(state) {
        Ok(program) if !state.has_next() => Ok(program),
        Ok(_) => match state.furthest_error() {
            Some((index, furthest)) if index > state.position() => Err(furthest.clone()),
            _ => Err(state.error_here("unexpected token after end of program")),
        },
        // errors without expectations come from checks on a complete construct
        Err(err) if err.expected.is_empty() => Err(err),
        Err(err) => Err(state
            .furthest_error()
            .map(|(_, furthest)| furthest.clone())
            .unwrap_or(err)),
    }
}
