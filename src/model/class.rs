use super::tag::tags_by_name;
use super::{
    ClassId, DocletTag, FieldId, JavaAnnotation, JavaInitializer, MethodId, SourceId, TypeReference,
    TypeVariable,
};
use crate::parser::defs::ClassKind;

/// Class, interface, enum or annotation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaClass {
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Vec<String>,
    /// `p.Outer$Inner`
    pub binary_name: String,
    /// `p.Outer.Inner`; equals the binary name for enum constant bodies
    pub canonical_name: String,
    pub package: Option<String>,
    pub source: SourceId,
    pub enclosing: Option<ClassId>,
    pub type_parameters: Vec<TypeVariable>,
    /// Superclass as written; `None` when no `extends` clause applies
    pub superclass: Option<TypeReference>,
    /// Implemented interfaces, or extended interfaces for an interface
    pub interfaces: Vec<TypeReference>,
    /// Nested member types; enum constant bodies are reached through their field
    pub nested: Vec<ClassId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    pub constructors: Vec<MethodId>,
    pub initializers: Vec<JavaInitializer>,
    pub annotations: Vec<JavaAnnotation>,
    pub comment: Option<String>,
    pub tags: Vec<DocletTag>,
    pub line: usize,
    pub is_enum_constant_body: bool,
}

impl JavaClass {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn is_annotation(&self) -> bool {
        self.kind == ClassKind::Annotation
    }

    pub fn is_inner(&self) -> bool {
        self.enclosing.is_some()
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn is_public(&self) -> bool {
        self.has_modifier("public")
    }

    pub fn is_abstract(&self) -> bool {
        self.has_modifier("abstract") || self.is_interface()
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier("static")
    }

    pub fn is_final(&self) -> bool {
        self.has_modifier("final")
    }

    pub fn tags_by_name(&self, name: &str) -> Vec<&DocletTag> {
        tags_by_name(&self.tags, name)
    }

    /// Annotation whose type is written as `name` (simple or qualified)
    pub fn annotation(&self, name: &str) -> Option<&JavaAnnotation> {
        self.annotations.iter().find(|a| a.type_name() == name)
    }
}
