// ABOUTME: Syntax highlighter for REPL with color support
// Implements rustyline's Highlighter trait to provide ANSI color codes
// for the language's tokens while preserving display width

use rustyline::Helper;
use rustyline::completion::Completer;
use rustyline::highlight::{Highlighter, CmdKind};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use std::borrow::Cow;
use std::collections::HashSet;

// ANSI color codes (using 3-bit/4-bit colors for maximum terminal compatibility)
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_DELIM: &str = "\x1b[1;34m"; // Bold blue
const COLOR_KEYWORD: &str = "\x1b[1;35m"; // Bold magenta
const COLOR_BUILTIN: &str = "\x1b[36m"; // Cyan
const COLOR_NUMBER: &str = "\x1b[33m"; // Yellow
const COLOR_STRING: &str = "\x1b[32m"; // Green
const COLOR_BOOLEAN: &str = "\x1b[33m"; // Yellow
const COLOR_COMMENT: &str = "\x1b[90m"; // Bright black (gray)
const COLOR_OPERATOR: &str = "\x1b[1;33m"; // Bold yellow

/// Main highlighter helper for the REPL
pub struct LanguageHelper;

impl LanguageHelper {
    pub fn new() -> Self {
        LanguageHelper
    }
}

impl Default for LanguageHelper {
    fn default() -> Self {
        Self::new()
    }
}

// Implement the required rustyline traits
impl Helper for LanguageHelper {}

impl Completer for LanguageHelper {
    type Candidate = String;
}

impl Hinter for LanguageHelper {
    type Hint = String;
}

impl Validator for LanguageHelper {}

impl Highlighter for LanguageHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let keywords = get_keywords();
        let builtins = get_builtins();

        let highlighted = highlight_line(line, &keywords, &builtins);

        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true // Always trigger re-highlighting on character input or cursor movement
    }
}

const DELIMS: [char; 6] = ['(', ')', '[', ']', '{', '}'];
const OPERATOR_CHARS: [char; 13] = [
    '+', '-', '*', '/', '%', '=', '!', '<', '>', '&', '|', '^', '~',
];

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || DELIMS.contains(&c) || c == '"' || c == ',' || c == ':' || c == '.'
}

/// Tokenize a line and apply syntax highlighting
fn highlight_line(line: &str, keywords: &HashSet<&'static str>, builtins: &HashSet<&'static str>) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // Comments: everything from # to end of line
            '#' => {
                result.push_str(COLOR_COMMENT);
                while i < chars.len() && chars[i] != '\n' {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }

            // Strings
            '"' => {
                result.push_str(COLOR_STRING);
                result.push('"');
                i += 1;

                let mut found_close = false;
                while i < chars.len() {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        result.push(chars[i]);
                        result.push(chars[i + 1]);
                        i += 2;
                    } else if chars[i] == '"' {
                        result.push('"');
                        i += 1;
                        found_close = true;
                        break;
                    } else {
                        result.push(chars[i]);
                        i += 1;
                    }
                }

                result.push_str(COLOR_RESET);
                if !found_close {
                    while i < chars.len() && chars[i] != '\n' {
                        result.push(chars[i]);
                        i += 1;
                    }
                }
            }

            // Numbers
            '0'..='9' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len() && chars[i] == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit() {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let num_str: String = chars[start..i].iter().collect();
                result.push_str(COLOR_NUMBER);
                result.push_str(&num_str);
                result.push_str(COLOR_RESET);
            }

            // Delimiters
            '(' | ')' | '[' | ']' | '{' | '}' => {
                result.push_str(COLOR_DELIM);
                result.push(chars[i]);
                i += 1;
                result.push_str(COLOR_RESET);
            }

            // Operators
            c if OPERATOR_CHARS.contains(&c) => {
                let start = i;
                while i < chars.len() && OPERATOR_CHARS.contains(&chars[i]) {
                    i += 1;
                }
                let op: String = chars[start..i].iter().collect();
                result.push_str(COLOR_OPERATOR);
                result.push_str(&op);
                result.push_str(COLOR_RESET);
            }

            // Whitespace and punctuation passed through untouched
            ' ' | '\t' | '\n' | '\r' | ',' | ':' | '.' => {
                result.push(chars[i]);
                i += 1;
            }

            // Identifiers / keywords / builtins / booleans
            _ => {
                let start = i;
                while i < chars.len() && !is_word_boundary(chars[i]) && !OPERATOR_CHARS.contains(&chars[i]) {
                    i += 1;
                }

                if start == i {
                    // Unrecognized single character, pass through to avoid an infinite loop
                    result.push(chars[i]);
                    i += 1;
                    continue;
                }

                let word: String = chars[start..i].iter().collect();

                if word == "true" || word == "false" {
                    result.push_str(COLOR_BOOLEAN);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if keywords.contains(word.as_str()) {
                    result.push_str(COLOR_KEYWORD);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if builtins.contains(word.as_str()) {
                    result.push_str(COLOR_BUILTIN);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else {
                    result.push_str(&word);
                }
            }
        }
    }

    result
}

/// Get all reserved keywords
fn get_keywords() -> HashSet<&'static str> {
    [
        "let", "const", "fn", "class", "new", "self", "if", "elif", "else", "for", "in", "while",
        "return", "break", "continue", "match", "case", "end", "nil", "and", "or", "not",
        "include", "try", "catch", "finally", "throw",
    ]
    .iter()
    .copied()
    .collect()
}

/// Get all built-in function names
fn get_builtins() -> HashSet<&'static str> {
    [
        "print", "input", "str", "int", "float", "type", "len", "range", "map", "filter",
        "reduce", "sum", "max", "min", "abs",
    ]
    .iter()
    .copied()
    .collect()
}
