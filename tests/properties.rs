use proptest::prelude::*;

use clausal::ast::{Clause, Expression};
use clausal::interpreter::{Environment, Interpreter};
use clausal::{run_lifted_source, run_source};

fn id(name: &str) -> Expression {
    Expression::ident(name)
}

/// `{ x0 .. xn -> [x0 .. xn] }` closed over the builtin environment.
fn collecting_pattern(arity: usize) -> Expression {
    let names: Vec<Expression> = (0..arity).map(|i| id(&format!("x{i}"))).collect();
    let literal = Expression::pattern(vec![Clause::new(names.clone(), Expression::list(names))]);
    Interpreter::new()
        .eval(&literal, &Environment::with_builtins(), false)
        .unwrap()
}

fn value() -> impl Strategy<Value = Expression> {
    prop_oneof![
        any::<i64>().prop_map(Expression::number),
        "[a-z]{0,6}".prop_map(Expression::string),
        "[a-z]{1,6}".prop_map(Expression::label),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn applying_fewer_arguments_leaves_the_rest(
        arity in 1usize..6,
        args in prop::collection::vec(any::<i64>(), 6),
        applied in 0usize..6,
    ) {
        let applied = applied.min(arity - 1);
        let interpreter = Interpreter::new();

        let mut value = collecting_pattern(arity);
        for arg in &args[..applied] {
            value = interpreter.apply(&value, Expression::number(*arg), false).unwrap();
        }

        let Expression::Pattern(partial) = &value else {
            panic!("expected a partially applied pattern, got {value}");
        };
        prop_assert_eq!(partial.arity(), arity - applied);

        for arg in &args[applied..arity] {
            value = interpreter.apply(&value, Expression::number(*arg), false).unwrap();
        }
        prop_assert_eq!(
            value,
            Expression::list(args[..arity].iter().map(|a| Expression::number(*a)).collect())
        );
    }

    #[test]
    fn first_matching_clause_wins(arg in value()) {
        let literal = Expression::pattern(vec![
            Clause::new(vec![id("x")], Expression::label("first")),
            Clause::new(vec![id("_")], Expression::label("second")),
        ]);
        let program = Expression::apply(vec![literal, arg]);

        prop_assert_eq!(Interpreter::new().run(&program), Ok(Expression::label("first")));
    }

    #[test]
    fn guard_failures_never_escape(arg in value()) {
        let source = format!(
            "let f = {{ n : (> n 0) -> .pos => .other }} (f {arg})"
        );
        let expected = match &arg {
            Expression::Number(n) if n.value > 0 => Expression::label("pos"),
            _ => Expression::label("other"),
        };

        prop_assert_eq!(run_source(&source).unwrap(), expected);
    }

    #[test]
    fn lifting_preserves_fibonacci(n in 0i64..12) {
        let source = format!(
            "let fib = {{ 0 -> 1 1 -> 1 n -> (+ (fib (- n 1)) (fib (- n 2))) }} (fib {n})"
        );

        prop_assert_eq!(run_lifted_source(&source).unwrap(), run_source(&source).unwrap());
    }

    #[test]
    fn lifting_preserves_closures(a in -1000i64..1000, b in -1000i64..1000) {
        let source = format!(
            "let make_adder = {{ x -> {{ y -> (+ x y) }} }} ((make_adder {a}) {b})"
        );

        prop_assert_eq!(run_lifted_source(&source).unwrap(), Expression::number(a + b));
        prop_assert_eq!(run_source(&source).unwrap(), Expression::number(a + b));
    }

    #[test]
    fn lifting_preserves_list_recursion(
        values in prop::collection::vec(-1000i64..1000, 0..20),
        k in -1000i64..1000,
    ) {
        let list = values.iter().map(i64::to_string).collect::<Vec<_>>().join(" ");
        let source = format!(
            "let k = {k} \
             let sum = {{ [] -> 0 [h : t] -> (+ (+ h k) (sum t)) }} \
             (sum [{list}])"
        );
        let expected: i64 = values.iter().map(|v| v + k).sum();

        prop_assert_eq!(run_source(&source).unwrap(), Expression::number(expected));
        prop_assert_eq!(run_lifted_source(&source).unwrap(), Expression::number(expected));
    }

    #[test]
    fn extending_never_changes_the_parent(
        names in prop::collection::vec("[a-z]{1,4}", 1..8),
        shadow in any::<i64>(),
    ) {
        let parent = names
            .iter()
            .enumerate()
            .fold(Environment::new(), |env, (i, name)| env.bind(name.as_str(), Expression::number(i as i64)));
        let before: Vec<_> = names.iter().map(|name| parent.get(name)).collect();

        let child = parent.extend(
            names
                .iter()
                .map(|name| (name.clone(), Expression::number(shadow)))
                .collect(),
        );

        let after: Vec<_> = names.iter().map(|name| parent.get(name)).collect();
        prop_assert_eq!(before, after);
        for name in &names {
            prop_assert_eq!(child.get(name), Some(Expression::number(shadow)));
        }
    }
}
