//! Parser combinators
//!
//! [`BoxedParser`] erases the concrete parser type so grammar rules can be
//! stored, cloned and composed. The operators read left to right:
//!
//! ```text
//! a + b    both, as a tuple
//! a - b    both, keep a
//! a * b    both, keep b
//! a | b    a, or b from the same position if a fails
//! a >> f   a, mapped through f
//! ```
//!
//! Primitive parsers record every failure in the [`ParseState`], so choice and
//! repetition can backtrack without losing the best error message.

use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use crate::lexer::Token;

use super::state::{ParseError, ParseResult, ParseState, Parser};

type ParserFn<T> = Rc<dyn Fn(&mut ParseState) -> ParseResult<T>>;

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        (self.parser)(state)
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |state| parser.parse(state)),
        }
    }

    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |state: &mut ParseState| {
            let first = self.parse(state)?;
            Ok((first, other.parse(state)?))
        })
    }

    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        self.seq(other).map(|(kept, _)| kept)
    }

    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        self.seq(other).map(|(_, kept)| kept)
    }

    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        self.and_then(move |value| Ok(f(value)))
    }

    /// Like `map`, but the transformation may reject the value.
    pub fn and_then<U: 'static, F: Fn(T) -> ParseResult<U> + 'static>(
        self,
        f: F,
    ) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| f(self.parse(state)?))
    }

    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| match attempt(&self, state) {
            Some(value) => Ok(value),
            None => other.parse(state),
        })
    }

    /// Report a failure as "expected `name`" instead of the inner expectations.
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            self.parse(state).map_err(|mut err| {
                err.expected = vec![name.to_string()];
                state.record_error(err.clone());
                err
            })
        })
    }
}

/// Run `parser`, rewinding to where it started if it fails. The failure itself
/// is already recorded in `state`.
fn attempt<T>(parser: &BoxedParser<T>, state: &mut ParseState) -> Option<T> {
    let start = state.position();
    match parser.parse(state) {
        Ok(value) => Some(value),
        Err(_) => {
            state.restore(start);
            None
        }
    }
}

impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

/// Consume the next token if `extract` accepts it.
pub fn token_with_error<T: 'static, F: Fn(&Token) -> Option<T> + 'static>(
    extract: F,
    expected: &'static str,
) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        let Some(tok) = state.peek() else {
            let err = ParseError::new("unexpected end of input")
                .expected(expected)
                .found("end of input");
            state.record_error(err.clone());
            return Err(err);
        };

        match extract(tok) {
            Some(value) => {
                state.advance();
                Ok(value)
            }
            None => {
                let err = ParseError::new("unexpected token")
                    .expected(expected)
                    .found(tok.describe())
                    .at(tok.pos());
                state.record_error(err.clone());
                Err(err)
            }
        }
    })
}

fn expect(matches: fn(&Token) -> bool, expected: &'static str) -> BoxedParser<Token> {
    token_with_error(
        move |tok| if matches(tok) { Some(tok.clone()) } else { None },
        expected,
    )
}

pub fn expect_let() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::Let(_)), "'let'")
}

pub fn expect_lbrace() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::LBrace(_)), "'{'")
}

pub fn expect_rbrace() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::RBrace(_)), "'}'")
}

pub fn expect_lparen() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::LParen(_)), "'('")
}

pub fn expect_rparen() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::RParen(_)), "')'")
}

pub fn expect_lbracket() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::LBracket(_)), "'['")
}

pub fn expect_rbracket() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::RBracket(_)), "']'")
}

pub fn expect_fat_arrow() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::FatArrow(_)), "'=>'")
}

pub fn expect_equals() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::Equals(_)), "'='")
}

pub fn expect_arrow() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::Arrow(_)), "'->'")
}

pub fn expect_colon() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::Colon(_)), "':'")
}

pub fn expect_double_colon() -> BoxedParser<Token> {
    expect(|t| matches!(t, Token::DoubleColon(_)), "'::'")
}

/// Zero or more occurrences, as many as match.
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut items = Vec::new();
        while let Some(item) = attempt(&parser, state) {
            items.push(item);
        }
        Ok(items)
    })
}

pub fn many1<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    parser.clone() + many(parser) >> |(first, rest)| {
        std::iter::once(first).chain(rest).collect::<Vec<_>>()
    }
}

pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |state: &mut ParseState| Ok(attempt(&parser, state)))
}
