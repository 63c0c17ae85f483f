//! Console I/O: `print`, `input`

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Caller, Value};
use std::io::{self, Write};
use std::rc::Rc;

/// Writes the space-separated string form of each argument to stdout,
/// followed by a newline. Yields nil.
pub fn builtin_print(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Nil)
}

/// Reads a line from stdin with the trailing newline stripped, printing an
/// optional prompt first.
pub fn builtin_input(args: &[Value], _caller: &mut dyn Caller) -> Result<Value, EvalError> {
    if args.len() > 1 {
        return Err(EvalError::arity_error("input", "0 or 1", args.len()));
    }
    if let Some(prompt) = args.first() {
        print!("{}", prompt);
        io::stdout().flush().ok();
    }
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| EvalError::runtime_error("input", e.to_string()))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::String(line))
}

pub fn register(env: &Rc<Environment>) {
    env.define(
        "print",
        Value::Native(Rc::new(crate::value::NativeFunctionData {
            name: "print".to_string(),
            func: Rc::new(builtin_print),
        })),
        false,
    );
    env.define(
        "input",
        Value::Native(Rc::new(crate::value::NativeFunctionData {
            name: "input".to_string(),
            func: Rc::new(builtin_input),
        })),
        false,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Evaluator;

    #[test]
    fn print_joins_args_with_spaces_and_yields_nil() {
        let mut evaluator = Evaluator::new();
        let result = builtin_print(&[Value::Number(1.0), Value::String("x".into())], &mut evaluator);
        assert!(matches!(result, Ok(Value::Nil)));
    }
}
