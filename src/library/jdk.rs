use indexmap::IndexSet;

use super::ClassSource;
use crate::consts::{JAVA_IO_SIMPLE_TYPES, JAVA_LANG_SIMPLE_TYPES, JAVA_UTIL_SIMPLE_TYPES};

/// Fixed set of core JDK type names
#[derive(Debug, Clone)]
pub struct JdkSource {
    names: IndexSet<String>,
}

impl Default for JdkSource {
    fn default() -> Self {
        Self::new()
    }
}

impl JdkSource {
    pub fn new() -> Self {
        let packages: [(&str, &[&str]); 3] = [
            ("java.lang", JAVA_LANG_SIMPLE_TYPES),
            ("java.util", JAVA_UTIL_SIMPLE_TYPES),
            ("java.io", JAVA_IO_SIMPLE_TYPES),
        ];
        let mut names: IndexSet<String> = packages
            .iter()
            .flat_map(|(package, simple)| simple.iter().map(move |name| format!("{}.{}", package, name)))
            .collect();
        names.insert("java.util.Map$Entry".to_string());
        Self { names }
    }
}

impl ClassSource for JdkSource {
    fn name(&self) -> &str {
        "jdk"
    }

    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn all(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knows_core_types() {
        let jdk = JdkSource::new();
        assert!(jdk.contains("java.lang.String"));
        assert!(jdk.contains("java.util.ArrayList"));
        assert!(jdk.contains("java.io.Serializable"));
        assert!(!jdk.contains("String"));
        assert!(!jdk.contains("java.lang.List"));
    }
}
