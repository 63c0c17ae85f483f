// ABOUTME: Comprehensive integration tests verifying all features work together

use ver_lang::eval::Evaluator;
use ver_lang::parser::parse;
use ver_lang::value::Value;

fn run(src: &str) -> Value {
    let program = parse(src).expect("parse failed");
    let mut evaluator = Evaluator::new();
    evaluator.run(&program)
}

#[test]
fn print_arithmetic_example_from_overview() {
    let program = parse("print(1 + 2 * 3)").unwrap();
    let mut evaluator = Evaluator::new();
    evaluator.run(&program);
}

#[test]
fn for_loop_over_range_counts_up() {
    let result = run(
        r#"
        let total = 0
        for i in range(1, 4)
            total = total + i
        end
        total
        "#,
    );
    assert!(matches!(result, Value::Number(n) if n == 6.0));
}

#[test]
fn fibonacci_function_matches_closed_form() {
    let result = run(
        r#"
        fn fib(n)
            if n < 2
                return n
            end
            return fib(n - 1) + fib(n - 2)
        end
        fib(10)
        "#,
    );
    assert!(matches!(result, Value::Number(n) if n == 55.0));
}

#[test]
fn class_instances_have_independent_state() {
    let result = run(
        r#"
        class Counter
            fn __init__()
                self.n = 0
            end
            fn bump()
                self.n = self.n + 1
                return self.n
            end
        end
        let a = new Counter()
        let b = new Counter()
        a.bump()
        a.bump()
        b.bump()
        a.n - b.n
        "#,
    );
    assert!(matches!(result, Value::Number(n) if n == 1.0));
}

#[test]
fn map_filter_reduce_compose_over_a_range() {
    let result = run(
        r#"
        let doubled = map(range(1, 6), fn(x) => x * 2)
        let evens = filter(doubled, fn(x) => x % 4 == 0)
        reduce(evens, fn(acc, x) => acc + x)
        "#,
    );
    assert!(matches!(result, Value::Number(n) if n == 12.0));
}

#[test]
fn try_catch_recovers_from_a_thrown_value() {
    let result = run(
        r#"
        let caught = nil
        try
            throw "boom"
        catch e
            caught = e
        end
        caught
        "#,
    );
    assert!(matches!(result, Value::String(s) if s == "boom"));
}

#[test]
fn list_and_map_literals_index_correctly() {
    let result = run(
        r#"
        let xs = [10, 20, 30]
        let m = { "a": 1, "b": 2 }
        xs[1] + m["b"]
        "#,
    );
    assert!(matches!(result, Value::Number(n) if n == 22.0));
}

#[test]
fn const_reassignment_is_rejected_but_program_continues() {
    let result = run(
        r#"
        const pi = 3
        pi = 4
        pi
        "#,
    );
    assert!(matches!(result, Value::Number(n) if n == 3.0));
}
