// ABOUTME: Resolves `include` paths against the session's working directory

use std::collections::HashSet;
use std::path::Path;

/// Tracks which resolved paths have already been included this session, so
/// a diamond include (two files each including a shared library) runs the
/// library's top-level effects only once.
pub struct Includer {
    loaded: HashSet<String>,
}

impl Includer {
    pub fn new() -> Self {
        Includer {
            loaded: HashSet::new(),
        }
    }

    /// Resolves `path` by (a) exact path, (b) `path.ver`, (c) `lib/path.ver`.
    /// Returns `Ok(None)` both when nothing resolves and when the resolved
    /// path was already included -- in either case the caller does nothing
    /// further.
    pub fn resolve(&mut self, path: &str) -> Result<Option<String>, String> {
        let candidates = [path.to_string(), format!("{}.ver", path), format!("lib/{}.ver", path)];
        let found = candidates.into_iter().find(|c| Path::new(c).is_file());
        match found {
            Some(resolved) => {
                if self.loaded.contains(&resolved) {
                    Ok(None)
                } else {
                    self.loaded.insert(resolved.clone());
                    Ok(Some(resolved))
                }
            }
            None => Err(format!("cannot resolve include path '{}'", path)),
        }
    }
}

impl Default for Includer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolves_exact_path() {
        let dir = std::env::temp_dir().join("ver_lang_include_test_exact");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("a.ver");
        std::fs::File::create(&file).unwrap().write_all(b"let x = 1").unwrap();
        let mut includer = Includer::new();
        let resolved = includer.resolve(file.to_str().unwrap()).unwrap();
        assert_eq!(resolved, Some(file.to_str().unwrap().to_string()));
    }

    #[test]
    fn missing_path_errors() {
        let mut includer = Includer::new();
        assert!(includer.resolve("/no/such/path/at/all").is_err());
    }

    #[test]
    fn repeated_include_resolves_once() {
        let dir = std::env::temp_dir().join("ver_lang_include_test_repeat");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("b.ver");
        std::fs::File::create(&file).unwrap().write_all(b"let x = 1").unwrap();
        let mut includer = Includer::new();
        let path = file.to_str().unwrap().to_string();
        assert_eq!(includer.resolve(&path).unwrap(), Some(path.clone()));
        assert_eq!(includer.resolve(&path).unwrap(), None);
    }
}
