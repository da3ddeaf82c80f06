use clausal::ast::{Clause, Expression, Identifier};
use clausal::parse_source;
use clausal::parser::parse;

fn id(name: &str) -> Expression {
    Expression::ident(name)
}

fn n(value: i64) -> Expression {
    Expression::number(value)
}

fn clauses_of(expr: &Expression) -> &[Clause] {
    match expr {
        Expression::Pattern(pattern) => &pattern.clauses,
        other => panic!("expected a pattern, got {other:?}"),
    }
}

#[test]
fn parse_atoms() {
    assert_eq!(parse("x").unwrap(), id("x"));
    assert_eq!(parse("+").unwrap(), id("+"));
    assert_eq!(parse("42").unwrap(), n(42));
    assert_eq!(parse("-7").unwrap(), n(-7));
    assert_eq!(parse(".pos").unwrap(), Expression::label("pos"));
    assert_eq!(parse(r#""a\nb""#).unwrap(), Expression::string("a\nb"));
}

#[test]
fn parse_application() {
    let expr = parse("(+ (f 1) x)").unwrap();

    assert_eq!(
        expr,
        Expression::apply(vec![
            id("+"),
            Expression::apply(vec![id("f"), n(1)]),
            id("x"),
        ])
    );
}

#[test]
fn parse_list() {
    assert_eq!(
        parse("[1 .a \"b\" []]").unwrap(),
        Expression::list(vec![
            n(1),
            Expression::label("a"),
            Expression::string("b"),
            Expression::list(vec![]),
        ])
    );
}

#[test]
fn nested_lets_merge_into_one_node() {
    let expr = parse("let a = 1 let b = a (+ a b)").unwrap();

    let Expression::Let(let_expr) = expr else {
        panic!("expected a let");
    };
    assert_eq!(let_expr.ids, vec![Identifier::new("a"), Identifier::new("b")]);
    assert_eq!(let_expr.values, vec![n(1), id("a")]);
    assert_eq!(*let_expr.body, Expression::apply(vec![id("+"), id("a"), id("b")]));
}

#[test]
fn parse_multi_clause_pattern() {
    let expr = parse(
        r#"{
            0 -> 1
            1 -> 1
            n -> (+ (fib (- n 1)) (fib (- n 2)))
        }"#,
    )
    .unwrap();

    let clauses = clauses_of(&expr);
    assert_eq!(clauses.len(), 3);
    assert_eq!(clauses[0].matches, vec![n(0)]);
    assert_eq!(clauses[1].matches, vec![n(1)]);
    assert_eq!(clauses[2].matches, vec![id("n")]);
}

#[test]
fn parse_multi_parameter_clause() {
    let expr = parse("{ x y z -> (+ x (+ y z)) }").unwrap();

    let clauses = clauses_of(&expr);
    assert_eq!(clauses.len(), 1);
    assert_eq!(clauses[0].matches, vec![id("x"), id("y"), id("z")]);
}

#[test]
fn default_clause_discards_every_parameter() {
    let expr = parse("{ 0 0 -> .origin => .elsewhere }").unwrap();

    let clauses = clauses_of(&expr);
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[1].matches, vec![id("_"), id("_")]);
    assert_eq!(clauses[1].body, Expression::label("elsewhere"));
}

#[test]
fn default_clause_cannot_come_first() {
    let err = parse("{ => 1 }").unwrap_err();

    assert!(err.message.contains("default clause"), "{err}");
}

#[test]
fn clause_without_arrow_is_a_predicate() {
    let expr = parse("{ [h : t] }").unwrap();

    let clauses = clauses_of(&expr);
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0].matches, vec![Expression::cons(id("h"), id("t"))]);
    assert_eq!(clauses[0].body, Expression::truthy());
    assert_eq!(clauses[1].matches, vec![id("_")]);
    assert_eq!(clauses[1].body, Expression::falsy());
}

#[test]
fn predicate_clause_must_be_alone() {
    assert!(parse("{ 0 -> .zero 1 }").is_err());
}

#[test]
fn differing_clause_arity_is_rejected() {
    let err = parse("{ 0 -> 1 x y -> 2 }").unwrap_err();

    assert!(err.message.contains("differing arity"), "{err}");
}

#[test]
fn parse_guards() {
    let expr = parse("{ n : (> n 0) -> .pos m :: (< m 0) -> .neg }").unwrap();

    let clauses = clauses_of(&expr);
    assert_eq!(
        clauses[0].matches,
        vec![Expression::guard(
            id("n"),
            Expression::apply(vec![id(">"), id("n"), n(0)])
        )]
    );
    assert_eq!(
        clauses[1].matches,
        vec![Expression::constant_guard(
            id("m"),
            Expression::apply(vec![id("<"), id("m"), n(0)])
        )]
    );
}

#[test]
fn parse_cons_patterns() {
    let expr = parse(r#"{ [h : [g : t]] -> h ["ab" : rest] -> rest [] -> .empty }"#).unwrap();

    let clauses = clauses_of(&expr);
    assert_eq!(
        clauses[0].matches,
        vec![Expression::cons(id("h"), Expression::cons(id("g"), id("t")))]
    );
    assert_eq!(
        clauses[1].matches,
        vec![Expression::cons(Expression::string("ab"), id("rest"))]
    );
    assert_eq!(clauses[2].matches, vec![Expression::list(vec![])]);
}

#[test]
fn comments_are_ignored() {
    let expr = parse_source(
        r#"
        # the answer
        let answer = 42 # bound here
        answer
        "#,
    )
    .unwrap();

    assert_eq!(expr, Expression::let_in(vec![("answer", n(42))], id("answer")));
}

#[test]
fn trailing_tokens_are_rejected() {
    assert!(parse("(f 1) )").is_err());
}

#[test]
fn unclosed_application_is_rejected() {
    let err = parse("(f 1").unwrap_err();

    assert_eq!(err.found.as_deref(), Some("end of input"));
}

#[test]
fn missing_arrow_body_reports_position() {
    let err = parse("let f = { x -> }\n(f 1)").unwrap_err();

    assert!(err.position.is_some(), "{err}");
}
