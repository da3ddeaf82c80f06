//! Pattern parsers
//!
//! ```text
//! pattern := "{" clause+ "}"
//! clause  := match+ "->" expression
//!          | "=>" expression
//!          | match+
//! match   := ident ":" expression
//!          | ident "::" expression
//!          | ident | label | string | integer
//!          | "[" simple ":" simple "]"
//!          | "[" expression* "]"
//! ```

use crate::ast::{Clause, Expression, Pattern, DISCARD};
use crate::lexer::Token;
use crate::parser::combinators::{
    expect_arrow, expect_colon, expect_double_colon, expect_fat_arrow, expect_lbrace,
    expect_lbracket, expect_rbrace, expect_rbracket, many1, optional, BoxedParser,
};
use crate::parser::state::{ParseError, ParseState, Parser};

use super::expression::{expression, list};
use super::literal::{ident, literal};

/// pattern := "{" clause+ "}"
pub fn pattern() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let open = expect_lbrace().parse(state)?;
        let mut clauses: Vec<Clause> = Vec::new();
        let mut predicate = false;

        while !matches!(state.peek(), Some(Token::RBrace(_)) | None) {
            if let Some(Token::FatArrow(tok)) = state.peek() {
                let Some(first) = clauses.first() else {
                    return Err(ParseError::new("a default clause cannot be the first clause")
                        .at(tok.position.clone()));
                };
                let arity = first.matches.len();
                expect_fat_arrow().parse(state)?;
                let body = expression().parse(state)?;
                clauses.push(Clause::new(
                    vec![Expression::ident(DISCARD); arity],
                    body,
                ));
                continue;
            }

            let matches = many1(match_component()).label("match").parse(state)?;
            if matches!(state.peek(), Some(Token::Arrow(_))) {
                expect_arrow().parse(state)?;
                let body = expression().parse(state)?;
                clauses.push(Clause::new(matches, body));
            } else {
                predicate = true;
                clauses.push(Clause::new(matches, Expression::truthy()));
            }
        }

        expect_rbrace().parse(state)?;

        if clauses.is_empty() {
            return Err(ParseError::new("a pattern needs at least one clause").at(open.pos()));
        }

        if predicate {
            if clauses.len() > 1 {
                return Err(ParseError::new(
                    "a clause without '->' must be the only clause of its pattern",
                )
                .at(open.pos()));
            }
            let arity = clauses[0].matches.len();
            clauses.push(Clause::new(
                vec![Expression::ident(DISCARD); arity],
                Expression::falsy(),
            ));
        }

        let pattern = Pattern::new(clauses);
        if let Err(mismatch) = pattern.check_arity() {
            return Err(ParseError::new(format!(
                "pattern clauses have differing arity: expected {}, found {}",
                mismatch.expected, mismatch.found
            ))
            .at(open.pos()));
        }

        Ok(Expression::Pattern(pattern))
    })
}

/// One formal parameter of a match row.
pub fn match_component() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(_)) => guarded().parse(state),
        Some(Token::LBracket(_)) => (cons() | list()).parse(state),
        _ => literal().parse(state),
    })
}

/// ident (":" expression | "::" expression)?
fn guarded() -> BoxedParser<Expression> {
    let condition = (expect_colon() * expression() >> |c| (false, c))
        | (expect_double_colon() * expression() >> |c| (true, c));

    ident() + optional(condition) >> |(name, condition)| {
        let name = Expression::ident(name);
        match condition {
            Some((false, condition)) => Expression::guard(name, condition),
            Some((true, condition)) => Expression::constant_guard(name, condition),
            None => name,
        }
    }
}

/// "[" simple ":" simple "]"
fn cons() -> BoxedParser<Expression> {
    expect_lbracket() * simple() - expect_colon() + simple() - expect_rbracket()
        >> |(head, tail)| Expression::cons(head, tail)
}

/// A match component without a guard, used inside cons patterns.
fn simple() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(_)) => ident().parse(state).map(|name| Expression::ident(name)),
        Some(Token::LBracket(_)) => (cons() | list()).parse(state),
        _ => literal().parse(state),
    })
}
