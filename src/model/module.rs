use super::{JavaAnnotation, TypeReference};

/// Module declaration (`module-info`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaModule {
    pub name: String,
    pub open: bool,
    pub requires: Vec<ModuleRequires>,
    pub exports: Vec<ModuleExports>,
    pub opens: Vec<ModuleExports>,
    pub uses: Vec<TypeReference>,
    pub provides: Vec<ModuleProvides>,
    pub annotations: Vec<JavaAnnotation>,
    pub comment: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequires {
    pub name: String,
    /// `transitive` and/or `static`
    pub modifiers: Vec<String>,
    pub line: usize,
}

impl ModuleRequires {
    pub fn is_transitive(&self) -> bool {
        self.modifiers.iter().any(|m| m == "transitive")
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }
}

/// `exports` or `opens` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleExports {
    pub package: String,
    /// Qualified targets; empty when unqualified
    pub targets: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProvides {
    pub service: TypeReference,
    pub implementations: Vec<TypeReference>,
    pub line: usize,
}
