use std::fmt;

use lachs::Span;

use crate::lexer::Token;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub expected: Vec<String>,
    pub found: Option<String>,
    pub position: Option<Span>,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            expected: Vec::new(),
            found: None,
            position: None,
        }
    }

    pub fn expected(mut self, what: impl Into<String>) -> Self {
        self.expected.push(what.into());
        self
    }

    pub fn found(mut self, what: impl Into<String>) -> Self {
        self.found = Some(what.into());
        self
    }

    pub fn at(mut self, position: Span) -> Self {
        self.position = Some(position);
        self
    }

    fn summary(&self) -> String {
        let mut summary = self.message.clone();
        if !self.expected.is_empty() {
            summary.push_str(&format!(": expected {}", self.expected.join(" or ")));
        }
        if let Some(found) = &self.found {
            summary.push_str(&format!(", found {found}"));
        }
        summary
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();
        match &self.position {
            Some(span) if !span.source.is_empty() => write!(f, "{}", span.to_string(&summary)),
            _ => f.write_str(&summary),
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
    furthest: Option<(usize, ParseError)>,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            furthest: None,
        }
    }

    pub fn advance(&mut self) -> Option<Token> {
        if self.has_next() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    /// Remember `err` if no alternative got further into the input. Errors at
    /// the same position merge their expectations.
    pub fn record_error(&mut self, err: ParseError) {
        let here = self.index;
        match &mut self.furthest {
            Some((index, furthest)) if *index == here => {
                for expected in err.expected {
                    if !furthest.expected.contains(&expected) {
                        furthest.expected.push(expected);
                    }
                }
                return;
            }
            Some((index, _)) if *index > here => return,
            _ => {}
        }
        self.furthest = Some((here, err));
    }

    /// The error recorded furthest into the input, with its token index.
    pub fn furthest_error(&self) -> Option<(usize, &ParseError)> {
        self.furthest.as_ref().map(|(index, err)| (*index, err))
    }

    /// An error describing the current token.
    pub fn error_here(&self, msg: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::new(msg).found(tok.describe()).at(tok.pos()),
            None => ParseError::new(msg).found("end of input"),
        }
    }
}

pub trait Parser<T>: Sized {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        self(state)
    }
}
