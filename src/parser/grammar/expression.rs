//! Expression parsers

use crate::ast::{Expression, Identifier, Let};
use crate::lexer::Token;
use crate::parser::combinators::{
    expect_equals, expect_lbracket, expect_let, expect_lparen, expect_rbracket, expect_rparen,
    many, BoxedParser,
};
use crate::parser::state::{ParseState, Parser};

use super::literal::{ident, literal, operator};
use super::pattern::pattern;

/// expression := let | pattern | application | list | identifier | operator
///             | label | string | integer
pub fn expression() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Let(_)) => let_expression().parse(state),
        Some(Token::LBrace(_)) => pattern().parse(state),
        Some(Token::LParen(_)) => application().parse(state),
        Some(Token::LBracket(_)) => list().parse(state),
        _ => atom().parse(state),
    })
}

/// atom := identifier | operator | literal
fn atom() -> BoxedParser<Expression> {
    let name = (ident() | operator()) >> |name: String| Expression::ident(name);
    (name | literal()).label("expression")
}

/// let := "let" ident "=" expression expression
///
/// Directly nested lets merge into a single node.
pub fn let_expression() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_let().parse(state)?;
        let name = ident().label("binding name").parse(state)?;
        expect_equals().parse(state)?;
        let value = expression().parse(state)?;
        let body = expression().parse(state)?;

        Ok(match body {
            Expression::Let(mut inner) => {
                inner.ids.insert(0, Identifier::new(name));
                inner.values.insert(0, value);
                Expression::Let(inner)
            }
            body => Expression::Let(Let {
                ids: vec![Identifier::new(name)],
                values: vec![value],
                body: Box::new(body),
            }),
        })
    })
}

/// application := "(" expression* ")"
pub fn application() -> BoxedParser<Expression> {
    expect_lparen() * many(expression()) - expect_rparen() >> |body| Expression::apply(body)
}

/// list := "[" expression* "]"
pub fn list() -> BoxedParser<Expression> {
    expect_lbracket() * many(expression()) - expect_rbracket() >> |values| Expression::list(values)
}
