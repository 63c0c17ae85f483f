//! # Built-in Functions Module
//!
//! The interpreter's global built-in functions, organized into three
//! categories:
//!
//! - **[console]** (2): `print`, `input` - terminal I/O
//! - **[types]** (4): `str`, `int`, `float`, `type` - conversion and introspection
//! - **[lists]** (9): `len`, `range`, `map`, `filter`, `reduce`, `sum`, `max`, `min`, `abs`
//!
//! Each category is a sub-module with its own `register` function that sets
//! up both the function bindings and their help documentation entries.

use crate::env::Environment;
use std::rc::Rc;

pub mod console;
pub mod lists;
pub mod types;

/// Registers every built-in function in the global environment.
pub fn register(env: &Rc<Environment>) {
    console::register(env);
    types::register(env);
    lists::register(env);
    crate::help::populate_builtin_help();
}
