//! List operations and numeric utilities: `len`, `range`, `map`, `filter`,
//! `reduce`, `sum`, `max`, `min`, `abs`

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Caller, Value};
use std::rc::Rc;

pub fn builtin_len(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("len", "1", args.len()));
    }
    let n = match &args[0] {
        Value::String(s) => s.len(),
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        other => return Err(EvalError::type_error("len", "string, list, or map", other.type_name())),
    };
    Ok(Value::Number(n as f64))
}

pub fn builtin_range(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    let (start, stop, step) = match args.len() {
        1 => {
            let stop = args[0].as_number();
            let step = if 0.0 >= stop { -1.0 } else { 1.0 };
            (0.0, stop, step)
        }
        2 => {
            let start = args[0].as_number();
            let stop = args[1].as_number();
            let step = if start >= stop { -1.0 } else { 1.0 };
            (start, stop, step)
        }
        3 => (args[0].as_number(), args[1].as_number(), args[2].as_number()),
        _ => return Err(EvalError::arity_error("range", "1, 2, or 3", args.len())),
    };
    if step == 0.0 {
        return Err(EvalError::runtime_error("range", "step must not be zero"));
    }
    let mut items = Vec::new();
    let mut i = start;
    if step > 0.0 {
        while i < stop {
            items.push(Value::Number(i));
            i += step;
        }
    } else {
        while i > stop {
            items.push(Value::Number(i));
            i += step;
        }
    }
    Ok(Value::List(items))
}

fn as_list<'a>(name: &str, v: &'a Value) -> Result<&'a [Value], EvalError> {
    match v {
        Value::List(items) => Ok(items),
        other => Err(EvalError::type_error(name, "list", other.type_name())),
    }
}

pub fn builtin_map(args: &[Value], caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("map", "2", args.len()));
    }
    let items = as_list("map", &args[0])?;
    let mapped: Vec<Value> = items.iter().map(|item| caller.call(&args[1], &[item.clone()])).collect();
    Ok(Value::List(mapped))
}

pub fn builtin_filter(args: &[Value], caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("filter", "2", args.len()));
    }
    let items = as_list("filter", &args[0])?;
    let filtered: Vec<Value> = items
        .iter()
        .filter(|item| caller.call(&args[1], std::slice::from_ref(item)).is_truthy())
        .cloned()
        .collect();
    Ok(Value::List(filtered))
}

pub fn builtin_reduce(args: &[Value], caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 2 && args.len() != 3 {
        return Err(EvalError::arity_error("reduce", "2 or 3", args.len()));
    }
    let items = as_list("reduce", &args[0])?;
    let (mut acc, rest): (Value, &[Value]) = if args.len() == 3 {
        (args[2].clone(), items)
    } else {
        match items.split_first() {
            Some((first, rest)) => (first.clone(), rest),
            None => return Ok(Value::Nil),
        }
    };
    for item in rest {
        acc = caller.call(&args[1], &[acc, item.clone()]);
    }
    Ok(acc)
}

pub fn builtin_sum(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("sum", "1", args.len()));
    }
    let items = as_list("sum", &args[0])?;
    Ok(Value::Number(items.iter().map(|v| v.as_number()).sum()))
}

pub fn builtin_max(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("max", "1", args.len()));
    }
    let items = as_list("max", &args[0])?;
    items
        .iter()
        .map(|v| v.as_number())
        .fold(None, |acc, n| Some(acc.map_or(n, |m: f64| m.max(n))))
        .map(Value::Number)
        .ok_or_else(|| EvalError::runtime_error("max", "list is empty"))
}

pub fn builtin_min(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("min", "1", args.len()));
    }
    let items = as_list("min", &args[0])?;
    items
        .iter()
        .map(|v| v.as_number())
        .fold(None, |acc, n| Some(acc.map_or(n, |m: f64| m.min(n))))
        .map(Value::Number)
        .ok_or_else(|| EvalError::runtime_error("min", "list is empty"))
}

pub fn builtin_abs(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("abs", "1", args.len()));
    }
    Ok(Value::Number(args[0].as_number().abs()))
}

pub fn register(env: &Rc<Environment>) {
    let entries: [(&str, Rc<dyn Fn(&[Value], &mut dyn Caller) -> Result<Value, EvalError>>); 9] = [
        ("len", Rc::new(builtin_len)),
        ("range", Rc::new(builtin_range)),
        ("map", Rc::new(builtin_map)),
        ("filter", Rc::new(builtin_filter)),
        ("reduce", Rc::new(builtin_reduce)),
        ("sum", Rc::new(builtin_sum)),
        ("max", Rc::new(builtin_max)),
        ("min", Rc::new(builtin_min)),
        ("abs", Rc::new(builtin_abs)),
    ];
    for (name, func) in entries {
        env.define(
            name,
            Value::Native(Rc::new(crate::value::NativeFunctionData {
                name: name.to_string(),
                func,
            })),
            false,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Evaluator;

    #[test]
    fn range_single_arg_counts_up_from_zero() {
        let mut evaluator = Evaluator::new();
        let result = builtin_range(&[Value::Number(5.0)], &mut evaluator).unwrap();
        assert_eq!(result.to_string(), "[0, 1, 2, 3, 4]");
    }

    #[test]
    fn range_two_arg_infers_descending_step() {
        let mut evaluator = Evaluator::new();
        let result = builtin_range(&[Value::Number(5.0), Value::Number(0.0)], &mut evaluator).unwrap();
        assert_eq!(result.to_string(), "[5, 4, 3, 2, 1]");
    }

    #[test]
    fn range_length_matches_bounds() {
        let mut evaluator = Evaluator::new();
        let result = builtin_range(&[Value::Number(2.0), Value::Number(9.0)], &mut evaluator).unwrap();
        if let Value::List(items) = result {
            assert_eq!(items.len(), 7);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn sum_max_min_abs() {
        let mut evaluator = Evaluator::new();
        let xs = Value::List(vec![Value::Number(1.0), Value::Number(5.0), Value::Number(2.0)]);
        assert!(matches!(builtin_sum(&[xs.clone()], &mut evaluator), Ok(Value::Number(n)) if n == 8.0));
        assert!(matches!(builtin_max(&[xs.clone()], &mut evaluator), Ok(Value::Number(n)) if n == 5.0));
        assert!(matches!(builtin_min(&[xs], &mut evaluator), Ok(Value::Number(n)) if n == 1.0));
        assert!(matches!(builtin_abs(&[Value::Number(-3.0)], &mut evaluator), Ok(Value::Number(n)) if n == 3.0));
    }
}
