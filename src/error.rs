// ABOUTME: Error types for lexing, parsing, and evaluation failures

use thiserror::Error;

/// Carries a source location so the REPL and script runner can point at
/// the offending line without re-scanning the input.
#[derive(Error, Debug, Clone)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Raised by native (built-in) functions when a call cannot proceed at
/// all (wrong arity, wrong argument type). This is distinct from the
/// log-and-recover runtime errors the evaluator handles directly (§7 of
/// the interpreter's error-handling design) -- those are reported with
/// `eprintln!` and resolved with a sentinel value instead of propagated
/// as a `Result::Err`.
#[allow(dead_code)]
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("{function}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
    },

    #[error("{function}: expected {expected} argument(s), got {actual}")]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("{function}: {message}")]
    RuntimeError { function: String, message: String },

    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("value is not callable")]
    NotCallable,

    #[error("cannot assign to const binding '{0}'")]
    ConstAssignment(String),
}

impl EvalError {
    pub fn type_error(function: &str, expected: &str, actual: &str) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::RuntimeError {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
