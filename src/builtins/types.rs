//! Conversion and introspection: `str`, `int`, `float`, `type`

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Caller, Value};
use std::rc::Rc;

pub fn builtin_str(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("str", "1", args.len()));
    }
    Ok(Value::String(args[0].to_string()))
}

/// Parses a numeric string to an integer-valued number; an unparsable
/// string yields 0, per the built-in's contract.
pub fn builtin_int(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("int", "1", args.len()));
    }
    let n = match &args[0] {
        Value::Number(n) => *n,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => if *b { 1.0 } else { 0.0 },
        _ => 0.0,
    };
    Ok(Value::Number(n.trunc()))
}

pub fn builtin_float(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("float", "1", args.len()));
    }
    let n = match &args[0] {
        Value::Number(n) => *n,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => if *b { 1.0 } else { 0.0 },
        _ => 0.0,
    };
    Ok(Value::Number(n))
}

pub fn builtin_type(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("type", "1", args.len()));
    }
    Ok(Value::String(args[0].type_name().to_string()))
}

pub fn register(env: &Rc<Environment>) {
    let entries: [(&str, Rc<dyn Fn(&[Value], &mut dyn Caller) -> Result<Value, EvalError>>); 4] = [
        ("str", Rc::new(builtin_str)),
        ("int", Rc::new(builtin_int)),
        ("float", Rc::new(builtin_float)),
        ("type", Rc::new(builtin_type)),
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
    fn int_parses_numeric_string() {
        let mut evaluator = Evaluator::new();
        let result = builtin_int(&[Value::String("42".into())], &mut evaluator).unwrap();
        assert!(matches!(result, Value::Number(n) if n == 42.0));
    }

    #[test]
    fn int_of_unparsable_string_is_zero() {
        let mut evaluator = Evaluator::new();
        let result = builtin_int(&[Value::String("abc".into())], &mut evaluator).unwrap();
        assert!(matches!(result, Value::Number(n) if n == 0.0));
    }

    #[test]
    fn type_reports_variant_name() {
        let mut evaluator = Evaluator::new();
        let result = builtin_type(&[Value::List(vec![])], &mut evaluator).unwrap();
        assert_eq!(result.to_string(), "list");
    }
}
