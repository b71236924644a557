use super::{ClassId, JavaAnnotation, JavaModule};

/// Package declaration of a compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaPackage {
    pub name: String,
    pub annotations: Vec<JavaAnnotation>,
    pub comment: Option<String>,
    pub line: usize,
}

/// One parsed compilation unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaSource {
    pub package: Option<JavaPackage>,
    /// Imports as written, e.g. `java.util.*` or `static a.B.c`
    pub imports: Vec<String>,
    /// Top-level classes in declaration order
    pub classes: Vec<ClassId>,
    pub module: Option<JavaModule>,
}

impl JavaSource {
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }

    /// Single-type imports, static ones included, without the `static ` prefix
    pub fn single_imports(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .filter(|i| !i.ends_with(".*"))
            .map(|i| i.strip_prefix("static ").unwrap_or(i))
    }

    /// Wildcard imports as `(prefix, is_static)`
    pub fn wildcard_imports(&self) -> impl Iterator<Item = (&str, bool)> {
        self.imports.iter().filter_map(|i| {
            let prefix = i.strip_suffix(".*")?;
            match prefix.strip_prefix("static ") {
                Some(prefix) => Some((prefix, true)),
                None => Some((prefix, false)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_views() {
        let source = JavaSource {
            imports: vec![
                "java.util.List".to_string(),
                "java.io.*".to_string(),
                "static org.junit.Assert.*".to_string(),
                "static java.util.Map.Entry".to_string(),
            ],
            ..JavaSource::default()
        };
        let singles: Vec<&str> = source.single_imports().collect();
        assert_eq!(singles, vec!["java.util.List", "java.util.Map.Entry"]);
        let wildcards: Vec<(&str, bool)> = source.wildcard_imports().collect();
        assert_eq!(wildcards, vec![("java.io", false), ("org.junit.Assert", true)]);
    }
}
