// ABOUTME: Help and documentation system for the interpreter's built-in functions

use std::cell::RefCell;
use std::collections::HashMap;

/// A help entry for a built-in function.
#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub name: String,
    pub signature: String,
    pub description: String,
    pub examples: Vec<String>,
    pub related: Vec<String>,
    pub category: String,
}

/// Defines a help entry with less boilerplate.
/// Usage: help_entry!("name", "category", "signature", "description", ["ex1"], ["related1"])
macro_rules! help_entry {
    (
        $name:literal,
        $category:literal,
        $signature:literal,
        $description:literal,
        [$($example:literal),* $(,)?],
        [$($related:literal),* $(,)?]
    ) => {
        register_help(HelpEntry {
            name: $name.to_string(),
            category: $category.to_string(),
            signature: $signature.to_string(),
            description: $description.trim().to_string(),
            examples: vec![$($example.to_string()),*],
            related: vec![$($related.to_string()),*],
        });
    };
}

pub struct HelpRegistry {
    entries: HashMap<String, HelpEntry>,
}

impl HelpRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register(&mut self, entry: HelpEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn get(&self, name: &str) -> Option<HelpEntry> {
        self.entries.get(name).cloned()
    }

    pub fn by_category(&self) -> HashMap<String, Vec<HelpEntry>> {
        let mut by_cat: HashMap<String, Vec<HelpEntry>> = HashMap::new();
        for entry in self.entries.values() {
            by_cat.entry(entry.category.clone()).or_default().push(entry.clone());
        }
        for entries in by_cat.values_mut() {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
        by_cat
    }

    #[allow(dead_code)]
    pub fn all_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for HelpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static HELP_REGISTRY: RefCell<HelpRegistry> = RefCell::new(HelpRegistry::new());
}

pub fn register_help(entry: HelpEntry) {
    HELP_REGISTRY.with(|reg| {
        reg.borrow_mut().register(entry);
    });
}

pub fn get_help(name: &str) -> Option<HelpEntry> {
    HELP_REGISTRY.with(|reg| reg.borrow().get(name))
}

pub fn all_by_category() -> HashMap<String, Vec<HelpEntry>> {
    HELP_REGISTRY.with(|reg| reg.borrow().by_category())
}

#[allow(dead_code)]
pub fn all_names() -> Vec<String> {
    HELP_REGISTRY.with(|reg| reg.borrow().all_names())
}

pub fn format_help_entry(entry: &HelpEntry) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} - {}\n", entry.name, entry.category));
    output.push_str("------------------------------------------------\n");
    output.push_str("Signature:\n");
    for line in entry.signature.lines() {
        output.push_str(&format!("  {}\n", line));
    }
    output.push('\n');
    output.push_str("Description:\n");
    for line in entry.description.lines() {
        output.push_str(&format!("  {}\n", line));
    }
    output.push('\n');
    if !entry.examples.is_empty() {
        output.push_str("Examples:\n");
        for example in &entry.examples {
            output.push_str("  ");
            output.push_str(example);
            output.push('\n');
        }
        output.push('\n');
    }
    if !entry.related.is_empty() {
        output.push_str("Related:\n");
        output.push_str(&format!("  {}\n", entry.related.join(", ")));
        output.push('\n');
    }
    output.push_str("------------------------------------------------");
    output
}

pub fn format_quick_reference() -> String {
    let mut output = String::new();
    let by_cat = all_by_category();
    let total = by_cat.values().map(|v| v.len()).sum::<usize>();

    output.push_str(&format!("Available Functions ({} total)\n", total));
    output.push_str("------------------------------------------------\n\n");

    let categories = vec!["Console I/O", "Type conversion", "List operations", "Numeric utilities"];
    for category in categories {
        if let Some(entries) = by_cat.get(category) {
            let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            output.push_str(&format!("{} ({})\n", category, names.len()));
            output.push_str(&format!("  {}\n\n", names.join(", ")));
        }
    }

    output.push_str("Type `help` with no arguments in the REPL, or look up a name with `vars`.\n");
    output.push_str("------------------------------------------------");
    output
}

/// Populates the registry with documentation for every built-in function.
pub fn populate_builtin_help() {
    help_entry!("print", "Console I/O", "print(...)",
        "Writes the space-separated string form of each argument to stdout, followed by a newline. Yields nil.",
        ["print(\"hi\", 1, true)"], ["str"]);
    help_entry!("input", "Console I/O", "input() / input(prompt)",
        "Reads a line from stdin with the newline stripped, optionally printing a prompt first.",
        ["let name = input(\"name? \")"], ["print"]);

    help_entry!("str", "Type conversion", "str(x)", "Converts any value to its display string.",
        ["str(42) => \"42\"", "str(true) => \"true\""], ["int", "float", "type"]);
    help_entry!("int", "Type conversion", "int(x)",
        "Converts to an integer-valued number. Parses numeric strings; unparsable strings yield 0.",
        ["int(\"42\") => 42", "int(\"abc\") => 0"], ["str", "float"]);
    help_entry!("float", "Type conversion", "float(x)", "Converts to a number.",
        ["float(\"3.5\") => 3.5"], ["int", "str"]);
    help_entry!("type", "Type conversion", "type(x)",
        "Returns the name of x's runtime type as a string.",
        ["type(1) => \"number\"", "type([1]) => \"list\""], ["str"]);

    help_entry!("len", "List operations", "len(x)", "Length of a string (bytes), list, or map.",
        ["len([1,2,3]) => 3", "len(\"abc\") => 3"], ["range"]);
    help_entry!("range", "List operations", "range(stop) / range(start, stop) / range(start, stop, step)",
        "Builds a list of integers. Two-arg form infers step -1 if start >= stop else +1.",
        ["range(5) => [0,1,2,3,4]", "range(5, 0) => [5,4,3,2,1]"], ["len", "map"]);
    help_entry!("map", "List operations", "map(list, fn)", "Applies fn to each element, returning a new list.",
        ["map([1,2,3], fn(x) => x*2) => [2,4,6]"], ["filter", "reduce"]);
    help_entry!("filter", "List operations", "filter(list, fn)", "Keeps elements for which fn returns truthy.",
        ["filter([1,2,3,4], fn(x) => x % 2 == 0) => [2,4]"], ["map", "reduce"]);
    help_entry!("reduce", "List operations", "reduce(list, fn[, init])",
        "Folds the list into a single value. Without init, the first element seeds the accumulator.",
        ["reduce([1,2,3,4,5], fn(a,b) => a+b, 0) => 15"], ["map", "filter"]);

    help_entry!("sum", "Numeric utilities", "sum(list)", "Sum of a list's numbers.", ["sum([1,2,3]) => 6"], ["max", "min"]);
    help_entry!("max", "Numeric utilities", "max(list)", "Largest number in a list.", ["max([1,5,2]) => 5"], ["min", "sum"]);
    help_entry!("min", "Numeric utilities", "min(list)", "Smallest number in a list.", ["min([1,5,2]) => 1"], ["max", "sum"]);
    help_entry!("abs", "Numeric utilities", "abs(x)", "Absolute value of a number.", ["abs(-3) => 3"], ["sum"]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut registry = HelpRegistry::new();
        registry.register(HelpEntry {
            name: "test-fn".to_string(),
            signature: "test-fn(x)".to_string(),
            description: "Test function".to_string(),
            examples: vec![],
            related: vec![],
            category: "Test".to_string(),
        });
        assert_eq!(registry.get("test-fn").unwrap().name, "test-fn");
    }

    #[test]
    fn by_category_groups_entries() {
        let mut registry = HelpRegistry::new();
        for name in ["fn1", "fn2"] {
            registry.register(HelpEntry {
                name: name.to_string(),
                signature: String::new(),
                description: String::new(),
                examples: vec![],
                related: vec![],
                category: "Numeric utilities".to_string(),
            });
        }
        assert_eq!(registry.by_category()["Numeric utilities"].len(), 2);
    }

    #[test]
    fn populate_builtin_help_registers_spec_functions() {
        populate_builtin_help();
        assert!(get_help("print").is_some());
        assert!(get_help("reduce").is_some());
        assert!(get_help("range").is_some());
    }
}
