//! Classpath handling
//!
//! Classpath resolution follows javac's priority order:
//! 1. explicit classpath argument (highest priority)
//! 2. `CLASSPATH` environment variable
//! 3. `JAVAMODEL_CLASSPATH` environment variable
//!
//! Each directory entry becomes a [`ClasspathSource`] answering existence
//! queries from `.java` and `.class` files.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, trace};
use walkdir::WalkDir;

use super::ClassSource;

/// Classpath priority and entry splitting
pub struct ClasspathResolver;

impl ClasspathResolver {
    /// Resolve the classpath string; `None` when nothing is configured
    pub fn resolve_classpath(explicit: Option<&str>) -> Option<String> {
        if let Some(classpath) = explicit {
            debug!(classpath, "using explicit classpath");
            return Some(classpath.to_string());
        }

        for variable in ["CLASSPATH", "JAVAMODEL_CLASSPATH"] {
            if let Ok(value) = env::var(variable) {
                if !value.is_empty() {
                    debug!(variable, classpath = %value, "using classpath from environment");
                    return Some(value);
                }
            }
        }
        None
    }

    /// Parse classpath string into individual entries
    /// Handles platform-specific path separators (: on Unix, ; on Windows)
    pub fn parse_classpath_entries(classpath: &str) -> Vec<String> {
        if classpath.is_empty() {
            return vec![];
        }

        classpath
            .split(Self::separator())
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    /// Combine multiple classpath strings with proper separator
    pub fn combine_classpaths<S: AsRef<str>>(classpaths: &[S]) -> String {
        classpaths
            .iter()
            .map(|cp| cp.as_ref())
            .filter(|cp| !cp.is_empty())
            .collect::<Vec<_>>()
            .join(&Self::separator().to_string())
    }

    fn separator() -> char {
        if cfg!(windows) {
            ';'
        } else {
            ':'
        }
    }
}

/// One classpath directory
#[derive(Debug)]
pub struct ClasspathSource {
    root: PathBuf,
    label: String,
    cache: RwLock<HashMap<String, bool>>,
}

impl ClasspathSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let label = format!("classpath:{}", root.display());
        Self {
            root,
            label,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lookup(&self, name: &str) -> bool {
        let relative = name.replace('.', "/");
        if self.root.join(format!("{}.class", relative)).is_file() {
            return true;
        }
        // nested classes only exist as class files
        !name.contains('$') && self.root.join(format!("{}.java", relative)).is_file()
    }
}

impl ClassSource for ClasspathSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn contains(&self, name: &str) -> bool {
        if let Some(found) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return *found;
        }
        let found = self.lookup(name);
        trace!(name, found, root = %self.root.display(), "classpath lookup");
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), found);
        found
    }

    fn all(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                let extension = path.extension()?.to_str()?;
                if extension != "java" && extension != "class" {
                    return None;
                }
                let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
                let parts: Vec<&str> = relative.iter().filter_map(|p| p.to_str()).collect();
                let last = parts.last()?;
                if *last == "module-info" || *last == "package-info" {
                    return None;
                }
                Some(parts.join("."))
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_classpath_wins() {
        let result = ClasspathResolver::resolve_classpath(Some("/path/explicit"));
        assert_eq!(result.as_deref(), Some("/path/explicit"));
    }

    #[test]
    fn test_parse_classpath_entries() {
        let separator = if cfg!(windows) { ";" } else { ":" };
        let classpath = format!("/path1{0}/path2{0} {0}/path3", separator);
        let entries = ClasspathResolver::parse_classpath_entries(&classpath);
        assert_eq!(entries, vec!["/path1", "/path2", "/path3"]);
        assert!(ClasspathResolver::parse_classpath_entries("").is_empty());
    }

    #[test]
    fn test_combine_classpaths() {
        let combined = ClasspathResolver::combine_classpaths(&["/path1", "/path2", ""]);
        let separator = if cfg!(windows) { ";" } else { ":" };
        assert_eq!(combined, format!("/path1{}/path2", separator));
    }
}
