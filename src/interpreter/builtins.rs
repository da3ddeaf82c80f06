//! The builtin library seeded into the root environment.
//!
//! Binary operations are curried: applying `+` to `1` yields a new builtin
//! `<+ 1>` that waits for the second operand.

use crate::ast::{Builtin, Expression, Number, TRUE, FALSE};

use super::error::{RuntimeError, RuntimeErrorKind};

type BinaryOp = fn(&str, Expression, Expression) -> Result<Expression, RuntimeError>;

const BINARY: &[(&str, BinaryOp)] = &[
    ("+", arithmetic),
    ("-", arithmetic),
    ("*", arithmetic),
    ("/", arithmetic),
    ("%", arithmetic),
    (">", comparison),
    (">=", comparison),
    ("<", comparison),
    ("<=", comparison),
    ("==", equality),
    ("!=", equality),
    ("&&", logical),
    ("||", logical),
    ("++", concat),
];

const UNARY: &[&str] = &["abs", "len", "print"];

pub fn builtin_names() -> Vec<&'static str> {
    BINARY
        .iter()
        .map(|(name, _)| *name)
        .chain(UNARY.iter().copied())
        .collect()
}

pub fn is_builtin(name: &str) -> bool {
    BINARY.iter().any(|(builtin, _)| *builtin == name) || UNARY.contains(&name)
}

pub fn builtins() -> Vec<Builtin> {
    let mut table: Vec<Builtin> = BINARY.iter().map(|(name, op)| binary(name, *op)).collect();
    table.push(Builtin::new("abs", |arg, _| match arg {
        Expression::Number(Number { value }) => value
            .checked_abs()
            .map(Expression::number)
            .ok_or_else(|| RuntimeErrorKind::IntegerOverflow("abs".into()).into()),
        other => Err(expected("abs", "a number", &other)),
    }));
    table.push(Builtin::new("len", |arg, _| match arg {
        Expression::String(s) => Ok(Expression::number(s.value.chars().count() as i64)),
        Expression::List(list) => Ok(Expression::number(list.values.len() as i64)),
        other => Err(expected("len", "a string or a list", &other)),
    }));
    table.push(Builtin::new("print", |arg, _| {
        println!("{arg}");
        Ok(arg)
    }));
    table
}

fn binary(name: &'static str, op: BinaryOp) -> Builtin {
    Builtin::new(name, move |left, _| {
        let partial = format!("{name} {left}");
        Ok(Expression::Builtin(Builtin::new(partial, move |right, _| {
            op(name, left.clone(), right)
        })))
    })
}

fn expected(name: &str, what: &str, found: &Expression) -> RuntimeError {
    RuntimeError::type_mismatch(format!("'{name}' expects {what}, found {}", found.kind()))
}

fn numbers(name: &str, left: &Expression, right: &Expression) -> Result<(i64, i64), RuntimeError> {
    match (left, right) {
        (Expression::Number(a), Expression::Number(b)) => Ok((a.value, b.value)),
        _ => Err(RuntimeError::type_mismatch(format!(
            "'{name}' expects two numbers, found {} and {}",
            left.kind(),
            right.kind()
        ))),
    }
}

fn arithmetic(name: &str, left: Expression, right: Expression) -> Result<Expression, RuntimeError> {
    let (a, b) = numbers(name, &left, &right)?;
    if matches!(name, "/" | "%") && b == 0 {
        return Err(RuntimeErrorKind::DivisionByZero.into());
    }

    let result = match name {
        "+" => a.checked_add(b),
        "-" => a.checked_sub(b),
        "*" => a.checked_mul(b),
        "/" => a.checked_div(b),
        "%" => a.checked_rem(b),
        _ => unreachable!("'{name}' is not an arithmetic builtin"),
    };

    result
        .map(Expression::number)
        .ok_or_else(|| RuntimeErrorKind::IntegerOverflow(name.to_string()).into())
}

fn comparison(name: &str, left: Expression, right: Expression) -> Result<Expression, RuntimeError> {
    let (a, b) = numbers(name, &left, &right)?;
    let result = match name {
        ">" => a > b,
        ">=" => a >= b,
        "<" => a < b,
        "<=" => a <= b,
        _ => unreachable!("'{name}' is not a comparison builtin"),
    };
    Ok(Expression::boolean(result))
}

fn equality(name: &str, left: Expression, right: Expression) -> Result<Expression, RuntimeError> {
    let equal = left == right;
    Ok(Expression::boolean(if name == "==" { equal } else { !equal }))
}

fn as_bool(name: &str, value: &Expression) -> Result<bool, RuntimeError> {
    match value {
        Expression::Label(label) if label.value == TRUE => Ok(true),
        Expression::Label(label) if label.value == FALSE => Ok(false),
        other => Err(expected(name, "a boolean label", other)),
    }
}

fn logical(name: &str, left: Expression, right: Expression) -> Result<Expression, RuntimeError> {
    let (a, b) = (as_bool(name, &left)?, as_bool(name, &right)?);
    Ok(Expression::boolean(if name == "&&" { a && b } else { a || b }))
}

fn concat(name: &str, left: Expression, right: Expression) -> Result<Expression, RuntimeError> {
    match (left, right) {
        (Expression::List(mut a), Expression::List(b)) => {
            a.values.extend(b.values);
            Ok(Expression::List(a))
        }
        (Expression::String(a), Expression::String(b)) => {
            Ok(Expression::string(a.value + &b.value))
        }
        (left, right) => Err(RuntimeError::type_mismatch(format!(
            "'{name}' expects two lists or two strings, found {} and {}",
            left.kind(),
            right.kind()
        ))),
    }
}
