use super::tag::tags_by_name;
use super::{ClassId, DocletTag, JavaAnnotation, TypeReference, TypeVariable};

fn has_modifier(modifiers: &[String], modifier: &str) -> bool {
    modifiers.iter().any(|m| m == modifier)
}

/// Method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaMethod {
    pub name: String,
    pub constructor: bool,
    pub declaring_class: ClassId,
    /// `None` for constructors
    pub return_type: Option<TypeReference>,
    pub parameters: Vec<JavaParameter>,
    pub exceptions: Vec<TypeReference>,
    pub type_parameters: Vec<TypeVariable>,
    pub modifiers: Vec<String>,
    /// Body text between the braces
    pub body: Option<String>,
    /// Default value of an annotation type element
    pub default_value: Option<String>,
    /// Taken from the last parameter
    pub varargs: bool,
    pub annotations: Vec<JavaAnnotation>,
    pub comment: Option<String>,
    pub tags: Vec<DocletTag>,
    pub line: usize,
}

impl JavaMethod {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        has_modifier(&self.modifiers, modifier)
    }

    pub fn is_public(&self) -> bool {
        self.has_modifier("public")
    }

    pub fn is_private(&self) -> bool {
        self.has_modifier("private")
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier("static")
    }

    pub fn is_abstract(&self) -> bool {
        self.has_modifier("abstract")
    }

    pub fn tags_by_name(&self, name: &str) -> Vec<&DocletTag> {
        tags_by_name(&self.tags, name)
    }

    /// Declaration as written, e.g. `public <T> T get(int index, String... keys) throws IOException`
    pub fn declaration_signature(&self, with_modifiers: bool) -> String {
        let mut text = String::new();
        if with_modifiers {
            for modifier in &self.modifiers {
                text.push_str(modifier);
                text.push(' ');
            }
        }
        if !self.type_parameters.is_empty() {
            let names: Vec<&str> = self.type_parameters.iter().map(|t| t.name.as_str()).collect();
            text.push('<');
            text.push_str(&names.join(", "));
            text.push_str("> ");
        }
        if let Some(return_type) = &self.return_type {
            text.push_str(&return_type.to_string());
            text.push(' ');
        }
        text.push_str(&self.name);
        text.push('(');
        let params: Vec<String> = self.parameters.iter().map(JavaParameter::declaration).collect();
        text.push_str(&params.join(", "));
        text.push(')');
        if !self.exceptions.is_empty() {
            let exceptions: Vec<String> = self.exceptions.iter().map(|e| e.to_string()).collect();
            text.push_str(" throws ");
            text.push_str(&exceptions.join(", "));
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaParameter {
    pub name: String,
    pub type_ref: TypeReference,
    pub varargs: bool,
    pub modifiers: Vec<String>,
    pub annotations: Vec<JavaAnnotation>,
    pub line: usize,
}

impl JavaParameter {
    fn declaration(&self) -> String {
        if self.varargs {
            format!("{}... {}", self.type_ref, self.name)
        } else {
            format!("{} {}", self.type_ref, self.name)
        }
    }
}

/// Field or enum constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaField {
    pub name: String,
    pub declaring_class: ClassId,
    pub type_ref: TypeReference,
    pub modifiers: Vec<String>,
    /// Initializer expression, verbatim
    pub initializer: Option<String>,
    pub enum_constant: bool,
    /// Enum constant constructor arguments, verbatim
    pub arguments: Vec<String>,
    /// Synthetic class for an enum constant body
    pub body_class: Option<ClassId>,
    pub annotations: Vec<JavaAnnotation>,
    pub comment: Option<String>,
    pub tags: Vec<DocletTag>,
    pub line: usize,
}

impl JavaField {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        has_modifier(&self.modifiers, modifier)
    }

    pub fn is_private(&self) -> bool {
        self.has_modifier("private")
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier("static") || self.enum_constant
    }

    pub fn tags_by_name(&self, name: &str) -> Vec<&DocletTag> {
        tags_by_name(&self.tags, name)
    }
}

/// Static or instance initializer block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInitializer {
    pub is_static: bool,
    pub body: String,
    pub line: usize,
}
