// ABOUTME: Version info and welcome banner for the interpreter's CLI/REPL

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "the Language, v0.1";
pub const WELCOME_SUBTITLE: &str = "a small dynamically-typed scripting language";

pub const HELP_TEXT: &str = r#"
REPL commands:
  exit / quit   - leave the REPL
  help          - show available built-in functions
  vars          - list current global bindings

Type any statement or expression to evaluate it. Results of expression
statements that are not nil are printed automatically.
"#;
