mod ast;
mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod help;
mod highlighter;
mod include;
mod lexer;
mod parser;
mod signal;
mod token;
mod value;

use clap::Parser;
use config::{HELP_TEXT, VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use eval::Evaluator;
use highlighter::LanguageHelper;
use parser::parse;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::PathBuf;

/// Interpreter for the Language, a small dynamically-typed scripting language
#[derive(Parser, Debug)]
#[command(name = "ver")]
#[command(version = VERSION)]
#[command(about = "A tree-walking interpreter for the Language")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Run a short menu of example snippets showing source and output
    #[arg(long = "examples")]
    examples: bool,
}

/// A handful of snippets drawn straight from the language's end-to-end
/// scenarios, shown with their source and their output.
const EXAMPLES: &[(&str, &str)] = &[
    ("arithmetic precedence", "print(1 + 2 * 3)"),
    (
        "counting with range",
        "for i in range(1, 4)\n    print(i)\nend",
    ),
    (
        "recursive fibonacci",
        "fn fib(n)\n    if n < 2\n        return n\n    end\n    return fib(n - 1) + fib(n - 2)\nend\nprint(fib(10))",
    ),
    (
        "a class with a method",
        "class Counter\n    fn __init__()\n        self.n = 0\n    end\n    fn inc()\n        self.n += 1\n        return self.n\n    end\nend\nlet c = new Counter()\nprint(c.inc())\nprint(c.inc())",
    ),
    (
        "building a list with +",
        "let xs = []\nfor i in range(5)\n    xs = xs + [i * i]\nend\nprint(xs)",
    ),
];

fn run_examples() {
    let mut evaluator = Evaluator::new();
    for (title, source) in EXAMPLES {
        println!("--- {} ---", title);
        println!("{}", source);
        println!();
        match parse(source) {
            Ok(program) => {
                evaluator.run(&program);
            }
            Err(e) => eprintln!("Parse error: {}", e),
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    if args.examples {
        run_examples();
        return Ok(());
    }

    let mut evaluator = Evaluator::new();

    if let Some(script_path) = args.script {
        run_script(&script_path, &mut evaluator)?;
        return Ok(());
    }

    run_repl(&mut evaluator)
}

/// Parse and evaluate an entire script file, stopping at the first parse
/// error. Runtime errors are already reported by the evaluator itself and
/// do not abort the program.
fn run_script(path: &PathBuf, evaluator: &mut Evaluator) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read script file {}: {}", path.display(), e))?;

    let program = parse(&contents).map_err(|e| format!("Parse error: {}", e))?;
    evaluator.run(&program);
    Ok(())
}

fn run_repl(evaluator: &mut Evaluator) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = Editor::with_config(config).map_err(|e| format!("Failed to initialize REPL: {}", e))?;

    rl.set_helper(Some(LanguageHelper::new()));

    let history_file = ".ver_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        let readline = rl.readline("ver> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match trimmed {
                    "exit" | "quit" => {
                        println!("Goodbye!");
                        break;
                    }
                    "help" => {
                        println!("{}", HELP_TEXT);
                        println!("{}", help::format_quick_reference());
                        continue;
                    }
                    "vars" => {
                        print_vars(evaluator);
                        continue;
                    }
                    _ => {}
                }

                match parse(&line) {
                    Ok(program) => {
                        let result = evaluator.run(&program);
                        if !matches!(result, value::Value::Nil) {
                            println!("=> {}", result);
                        }
                    }
                    Err(e) => eprintln!("Parse error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);

    Ok(())
}

fn print_vars(evaluator: &Evaluator) {
    let mut bindings = evaluator.globals.own_bindings();
    bindings.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in bindings {
        println!("{} = {}", name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_args_script_argument() {
        let args = CliArgs {
            script: Some(PathBuf::from("test.ver")),
            examples: false,
        };
        assert!(args.script.is_some());
        assert_eq!(args.script.as_ref().unwrap(), &PathBuf::from("test.ver"));
    }

    #[test]
    fn cli_args_defaults_to_repl() {
        let args = CliArgs {
            script: None,
            examples: false,
        };
        assert!(args.script.is_none());
        assert!(!args.examples);
    }

    #[test]
    fn run_examples_executes_every_snippet_without_panicking() {
        run_examples();
    }

    #[test]
    fn run_script_executes_and_does_not_error() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("ver_main_test_{}.ver", std::process::id()));
        std::fs::write(&path, "let x = 1 + 2\n").unwrap();
        let mut evaluator = Evaluator::new();
        let result = run_script(&path, &mut evaluator);
        std::fs::remove_file(&path).ok();
        assert!(result.is_ok());
    }
}
