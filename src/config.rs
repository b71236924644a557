use std::path::Path;

use crate::error::{Error, Result};
use crate::library::ClasspathResolver;

/// Precedence between nested-class scope lookup and single-type imports
/// when resolving a simple type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopePrecedence {
    /// Classes visible through the lexical scope chain win over imports
    #[default]
    NestedFirst,
    /// Single-type imports win over the lexical scope chain
    ImportsFirst,
}

/// Project configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Classpath string, entries separated by the platform separator
    pub classpath: Option<String>,
    /// Register the built-in JDK names (`java.lang`, `java.util`, `java.io`)
    pub jdk_defaults: bool,
    pub scope_precedence: ScopePrecedence,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classpath: None,
            jdk_defaults: true,
            scope_precedence: ScopePrecedence::default(),
        }
    }
}

impl Config {
    /// Configuration with the classpath taken from the environment
    pub fn from_env() -> Self {
        Self {
            classpath: ClasspathResolver::resolve_classpath(None),
            ..Self::default()
        }
    }

    pub fn with_classpath(mut self, classpath: impl Into<String>) -> Self {
        self.classpath = Some(classpath.into());
        self
    }

    pub fn with_jdk_defaults(mut self, enabled: bool) -> Self {
        self.jdk_defaults = enabled;
        self
    }

    pub fn with_scope_precedence(mut self, precedence: ScopePrecedence) -> Self {
        self.scope_precedence = precedence;
        self
    }

    /// Classpath entries in order
    pub fn classpath_entries(&self) -> Vec<String> {
        self.classpath
            .as_deref()
            .map(ClasspathResolver::parse_classpath_entries)
            .unwrap_or_default()
    }

    /// Check that every classpath entry is an existing directory
    pub fn validate(&self) -> Result<()> {
        if let Some(classpath) = &self.classpath {
            if classpath.trim().is_empty() {
                return Err(Error::Config {
                    message: "classpath is set but empty".to_string(),
                });
            }
        }
        for entry in self.classpath_entries() {
            if !Path::new(&entry).is_dir() {
                return Err(Error::Config {
                    message: format!("classpath entry '{}' is not a directory", entry),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_jdk_names_and_nested_first() {
        let config = Config::default();
        assert!(config.jdk_defaults);
        assert!(config.classpath.is_none());
        assert_eq!(config.scope_precedence, ScopePrecedence::NestedFirst);
        assert!(config.classpath_entries().is_empty());
    }

    #[test]
    fn validate_rejects_missing_directories() {
        assert!(Config::default().validate().is_ok());

        let err = Config::default()
            .with_classpath("/no/such/javamodel/dir")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("/no/such/javamodel/dir"));

        let err = Config::default().with_classpath("  ").validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn builder_style_setters() {
        let config = Config::default()
            .with_classpath("a:b")
            .with_jdk_defaults(false)
            .with_scope_precedence(ScopePrecedence::ImportsFirst);
        assert!(!config.jdk_defaults);
        assert_eq!(config.scope_precedence, ScopePrecedence::ImportsFirst);
        if cfg!(windows) {
            assert_eq!(config.classpath_entries(), vec!["a:b"]);
        } else {
            assert_eq!(config.classpath_entries(), vec!["a", "b"]);
        }
    }
}
