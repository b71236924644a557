//! Definition records handed from the parser to a [`Builder`](super::Builder).
//!
//! These are plain values: they carry no back-references into any model and
//! can be cloned, recorded and replayed freely.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDef {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDef {
    /// Dotted name without the trailing `.*`
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub line: usize,
}

impl ImportDef {
    /// Import as written after `import`, e.g. `java.util.*` or `static a.B.c`
    pub fn to_import_string(&self) -> String {
        let mut text = String::new();
        if self.is_static {
            text.push_str("static ");
        }
        text.push_str(&self.name);
        if self.is_wildcard {
            text.push_str(".*");
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Vec<String>,
    /// Superclass for classes; super-interfaces for interfaces
    pub extends: Vec<TypeDef>,
    pub implements: Vec<TypeDef>,
    pub type_parameters: Vec<TypeVariableDef>,
    pub line: usize,
    /// Synthetic class standing for an enum constant's body
    pub enum_constant_body: bool,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            type_parameters: Vec::new(),
            line,
            enum_constant_body: false,
        }
    }
}

/// Method or constructor; constructors carry no return type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub return_type: Option<TypeDef>,
    pub modifiers: Vec<String>,
    pub exceptions: Vec<TypeDef>,
    pub type_parameters: Vec<TypeVariableDef>,
    pub constructor: bool,
    /// Body text between the braces; `None` for `;`-terminated declarations
    pub body: Option<String>,
    /// Annotation element default value, verbatim
    pub default_value: Option<String>,
    pub line: usize,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            return_type: None,
            modifiers: Vec::new(),
            exceptions: Vec::new(),
            type_parameters: Vec::new(),
            constructor: false,
            body: None,
            default_value: None,
            line,
        }
    }
}

/// Field, parameter or enum constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// Declared type with all bracket pairs already summed into its dimensions
    pub type_def: TypeDef,
    pub modifiers: Vec<String>,
    pub initializer: Option<String>,
    pub enum_constant: bool,
    /// Enum constant constructor arguments, verbatim
    pub args: Vec<String>,
    pub varargs: bool,
    pub line: usize,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_def: TypeDef, line: usize) -> Self {
        Self {
            name: name.into(),
            type_def,
            modifiers: Vec::new(),
            initializer: None,
            enum_constant: false,
            args: Vec::new(),
            varargs: false,
            line,
        }
    }

    /// Array dimensions of the declared variable
    pub fn dimensions(&self) -> usize {
        self.type_def.dimensions
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDef {
    /// Simple or dotted name as written, without type arguments
    pub name: String,
    pub dimensions: usize,
    pub args: Vec<TypeArgDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: 0,
            args: Vec::new(),
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_args(mut self, args: Vec<TypeArgDef>) -> Self {
        self.args = args;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgDef {
    Type(TypeDef),
    Wildcard(WildcardTypeDef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Extends,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardTypeDef {
    pub bound: Option<(BoundKind, TypeDef)>,
}

impl WildcardTypeDef {
    pub fn unbounded() -> Self {
        Self { bound: None }
    }

    pub fn bounded(kind: BoundKind, type_def: TypeDef) -> Self {
        Self {
            bound: Some((kind, type_def)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVariableDef {
    pub name: String,
    pub bounds: Vec<TypeDef>,
}

impl TypeVariableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDef {
    pub type_def: TypeDef,
    /// Element values in source order; an unnamed single value is keyed `value`
    pub values: IndexMap<String, AnnotationValueDef>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValueDef {
    /// Single literal token, verbatim (`1`, `"x"`, `'c'`, `true`)
    Constant(String),
    /// `Foo.class`
    Type(TypeDef),
    Annotation(Box<AnnotationDef>),
    Array(Vec<AnnotationValueDef>),
    /// Anything else, verbatim source text
    Expression(String),
}

/// Block tag split off a doc comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDef {
    pub name: String,
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerDef {
    pub is_static: bool,
    pub body: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDef {
    pub name: String,
    pub open: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiresDef {
    pub name: String,
    pub modifiers: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportsDef {
    pub source: String,
    pub targets: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpensDef {
    pub source: String,
    pub targets: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsesDef {
    pub service: TypeDef,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidesDef {
    pub service: TypeDef,
    pub implementations: Vec<TypeDef>,
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_string_forms() {
        let import = ImportDef {
            name: "java.util".to_string(),
            is_static: false,
            is_wildcard: true,
            line: 1,
        };
        assert_eq!(import.to_import_string(), "java.util.*");

        let import = ImportDef {
            name: "org.junit.Assert.assertEquals".to_string(),
            is_static: true,
            is_wildcard: false,
            line: 2,
        };
        assert_eq!(import.to_import_string(), "static org.junit.Assert.assertEquals");
    }
}
