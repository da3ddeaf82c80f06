//! Literal parsers

use crate::ast::Expression;
use crate::lexer::{unescape, Token};
use crate::parser::combinators::{token_with_error, BoxedParser};
use crate::parser::state::ParseError;

/// ident := [a-zA-Z_][a-zA-Z0-9_]*
pub fn ident() -> BoxedParser<String> {
    token_with_error(
        |tok| match tok {
            Token::Ident(inner) => Some(inner.value.clone()),
            _ => None,
        },
        "identifier",
    )
}

/// operator := "+" | "-" | "==" | "++" | ...
///
/// Operators are ordinary identifiers naming builtins.
pub fn operator() -> BoxedParser<String> {
    token_with_error(
        |tok| match tok {
            Token::Operator(inner) => Some(inner.value.clone()),
            _ => None,
        },
        "operator",
    )
}

/// label := "." [a-zA-Z0-9_]+
pub fn label() -> BoxedParser<Expression> {
    token_with_error(
        |tok| match tok {
            Token::Label(inner) => Some(Expression::label(inner.value.trim_start_matches('.'))),
            _ => None,
        },
        "label",
    )
}

pub fn string_literal() -> BoxedParser<Expression> {
    token_with_error(
        |tok| match tok {
            Token::StringLiteral(inner) => Some(Expression::string(unescape(&inner.value))),
            _ => None,
        },
        "string",
    )
}

/// Integers outside the `i64` range are rejected.
pub fn integer() -> BoxedParser<Expression> {
    token_with_error(
        |tok| match tok {
            Token::Integer(inner) => Some((inner.value.clone(), inner.position.clone())),
            _ => None,
        },
        "integer",
    )
    .and_then(|(text, position)| {
        text.parse().map(Expression::number).map_err(|_| {
            ParseError::new(format!("integer literal {text} is out of range")).at(position)
        })
    })
}

/// literal := label | string | integer
pub fn literal() -> BoxedParser<Expression> {
    label() | string_literal() | integer()
}
