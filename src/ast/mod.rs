//! # Abstract Syntax Tree
//!
//! A program is a single [`Expression`]. The same type is used for source
//! expressions and for runtime values: evaluating an expression yields another
//! expression (a literal, a list, a closure or a builtin).
//!
//! ## Variants
//!
//! ```text
//! (f a b)          Application   callee followed by arguments
//! x                Identifier    `_` is the discard name
//! .pos             Label         `.true` / `.false` are the booleans
//! "abc" 42         String/Number literals
//! [1 2 3]          List
//! [h : t]          ListConstructor (cons pattern)
//! let x = 1 body   Let           sequential bindings
//! n : (> n 0)      Where         guarded match
//! { n -> body }    Pattern       multi-clause function
//! <+>              Builtin       native operation
//! ```
//!
//! `ListConstructor` and `Where` only appear in the match rows of a pattern.

pub mod pattern;

pub use pattern::{Builtin, Clause, ListConstructor, NativeFn, Pattern, Where};

/// The discard identifier. It is never bound and never looked up.
pub const DISCARD: &str = "_";

pub const TRUE: &str = "true";
pub const FALSE: &str = "false";

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Application(Application),
    Identifier(Identifier),
    Label(Label),
    String(StringLiteral),
    Number(Number),
    List(List),
    ListConstructor(ListConstructor),
    Let(Let),
    Where(Where),
    Pattern(Pattern),
    Builtin(Builtin),
}

/// Juxtaposition: the first element is the callee, the rest are arguments
/// applied left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub body: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub value: String,
}

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn is_discard(&self) -> bool {
        self.value == DISCARD
    }
}

/// A nullary symbolic constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Number {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub values: Vec<Expression>,
}

/// Sequential bindings: `values[i]` is evaluated with `ids[..i]` in scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub ids: Vec<Identifier>,
    pub values: Vec<Expression>,
    pub body: Box<Expression>,
}

impl Let {
    pub fn bindings(&self) -> impl Iterator<Item = (&Identifier, &Expression)> {
        self.ids.iter().zip(self.values.iter())
    }
}

impl Expression {
    pub fn ident(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    pub fn label(name: impl Into<String>) -> Self {
        Expression::Label(Label { value: name.into() })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String(StringLiteral {
            value: value.into(),
        })
    }

    pub fn number(value: i64) -> Self {
        Expression::Number(Number { value })
    }

    pub fn list(values: Vec<Expression>) -> Self {
        Expression::List(List { values })
    }

    pub fn cons(head: Expression, tail: Expression) -> Self {
        Expression::ListConstructor(ListConstructor {
            head: Box::new(head),
            tail: Box::new(tail),
        })
    }

    pub fn apply(body: Vec<Expression>) -> Self {
        Expression::Application(Application { body })
    }

    pub fn let_in(bindings: Vec<(&str, Expression)>, body: Expression) -> Self {
        let (ids, values) = bindings
            .into_iter()
            .map(|(name, value)| (Identifier::new(name), value))
            .unzip();
        Expression::Let(Let {
            ids,
            values,
            body: Box::new(body),
        })
    }

    pub fn pattern(clauses: Vec<Clause>) -> Self {
        Expression::Pattern(Pattern::new(clauses))
    }

    /// A guarded match component `inner : condition`.
    pub fn guard(inner: Expression, condition: Expression) -> Self {
        Expression::Where(Where::new(inner, condition, false))
    }

    /// A guard whose condition is left alone by the lambda lifter.
    pub fn constant_guard(inner: Expression, condition: Expression) -> Self {
        Expression::Where(Where::new(inner, condition, true))
    }

    pub fn truthy() -> Self {
        Expression::label(TRUE)
    }

    pub fn falsy() -> Self {
        Expression::label(FALSE)
    }

    pub fn boolean(value: bool) -> Self {
        if value {
            Expression::truthy()
        } else {
            Expression::falsy()
        }
    }

    pub fn is_truthy(&self) -> bool {
        matches!(self, Expression::Label(Label { value }) if value == TRUE)
    }

    /// Short human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Application(_) => "application",
            Expression::Identifier(_) => "identifier",
            Expression::Label(_) => "label",
            Expression::String(_) => "string",
            Expression::Number(_) => "number",
            Expression::List(_) => "list",
            Expression::ListConstructor(_) => "list constructor",
            Expression::Let(_) => "let",
            Expression::Where(_) => "where",
            Expression::Pattern(_) => "pattern",
            Expression::Builtin(_) => "builtin",
        }
    }

    /// Every identifier name that occurs anywhere in this expression,
    /// including binding positions.
    pub fn identifiers(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers(&self, names: &mut Vec<String>) {
        match self {
            Expression::Identifier(id) => names.push(id.value.clone()),
            Expression::Application(app) => {
                app.body.iter().for_each(|e| e.collect_identifiers(names))
            }
            Expression::List(list) => list.values.iter().for_each(|e| e.collect_identifiers(names)),
            Expression::ListConstructor(cons) => {
                cons.head.collect_identifiers(names);
                cons.tail.collect_identifiers(names);
            }
            Expression::Let(let_expr) => {
                for (id, value) in let_expr.bindings() {
                    names.push(id.value.clone());
                    value.collect_identifiers(names);
                }
                let_expr.body.collect_identifiers(names);
            }
            Expression::Where(guard) => {
                guard.inner.collect_identifiers(names);
                guard.condition.collect_identifiers(names);
            }
            Expression::Pattern(pattern) => {
                for clause in &pattern.clauses {
                    clause.matches.iter().for_each(|m| m.collect_identifiers(names));
                    clause.body.collect_identifiers(names);
                }
            }
            Expression::Label(_)
            | Expression::String(_)
            | Expression::Number(_)
            | Expression::Builtin(_) => {}
        }
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::number(value)
    }
}
