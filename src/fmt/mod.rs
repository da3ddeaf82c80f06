//! Pretty printer for expressions
//!
//! [`Display`] renders any [`Expression`] in the concrete syntax accepted by
//! the parser. Applications, lists and single-clause patterns stay on one
//! line; patterns with several clauses and `let` bindings are spread over
//! several lines:
//!
//! ```text
//! let fib = {
//!   0 -> 1
//!   1 -> 1
//!   n -> (+ (fib (- n 1)) (fib (- n 2)))
//! }
//! (fib 10)
//! ```
//!
//! Closures print like the literal they were created from. Builtins print as
//! `<name>`.

use std::fmt::{self, Display};

use crate::ast::{Clause, Expression, Let, Pattern};

const INDENT: &str = "  ";

struct Formatter {
    buffer: String,
    indent_level: usize,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Start a new line at the current indentation.
    fn write_newline(&mut self) {
        self.buffer.push('\n');
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    fn finish(self) -> String {
        self.buffer
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_pattern(self, &mut formatter);
        f.write_str(&formatter.finish())
    }
}

fn render(expr: &Expression) -> String {
    let mut formatter = Formatter::new();
    format_expression(expr, &mut formatter);
    formatter.finish()
}

fn format_expression(expr: &Expression, fmt: &mut Formatter) {
    match expr {
        Expression::Identifier(id) => fmt.write_str(&id.value),
        Expression::Label(label) => {
            fmt.write_str(".");
            fmt.write_str(&label.value);
        }
        Expression::String(string) => fmt.write_str(&quote(&string.value)),
        Expression::Number(number) => fmt.write_str(&number.value.to_string()),
        Expression::Application(app) => format_sequence("(", &app.body, ")", fmt),
        Expression::List(list) => format_sequence("[", &list.values, "]", fmt),
        Expression::ListConstructor(cons) => {
            fmt.write_str("[");
            format_expression(&cons.head, fmt);
            fmt.write_str(" : ");
            format_expression(&cons.tail, fmt);
            fmt.write_str("]");
        }
        Expression::Where(guard) => {
            format_expression(&guard.inner, fmt);
            fmt.write_str(if guard.constant_time { " :: " } else { " : " });
            format_expression(&guard.condition, fmt);
        }
        Expression::Let(let_expr) => format_let(let_expr, fmt),
        Expression::Pattern(pattern) => format_pattern(pattern, fmt),
        Expression::Builtin(builtin) => {
            fmt.write_str("<");
            fmt.write_str(&builtin.name);
            fmt.write_str(">");
        }
    }
}

fn format_sequence(open: &str, items: &[Expression], close: &str, fmt: &mut Formatter) {
    fmt.write_str(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            fmt.write_str(" ");
        }
        format_expression(item, fmt);
    }
    fmt.write_str(close);
}

fn format_let(let_expr: &Let, fmt: &mut Formatter) {
    for (id, value) in let_expr.bindings() {
        fmt.write_str("let ");
        fmt.write_str(&id.value);
        fmt.write_str(" = ");
        format_expression(value, fmt);
        fmt.write_newline();
    }
    format_expression(&let_expr.body, fmt);
}

fn format_pattern(pattern: &Pattern, fmt: &mut Formatter) {
    if let [clause] = pattern.clauses.as_slice() {
        if !render(&clause.body).contains('\n') {
            fmt.write_str("{ ");
            format_clause(clause, fmt);
            fmt.write_str(" }");
            return;
        }
    }

    fmt.write_str("{");
    fmt.indent();
    for clause in &pattern.clauses {
        fmt.write_newline();
        format_clause(clause, fmt);
    }
    fmt.dedent();
    fmt.write_newline();
    fmt.write_str("}");
}

fn format_clause(clause: &Clause, fmt: &mut Formatter) {
    for formal in &clause.matches {
        format_expression(formal, fmt);
        fmt.write_str(" ");
    }
    fmt.write_str("-> ");
    format_expression(&clause.body, fmt);
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
