use indexmap::IndexMap;

use super::{EntityRef, TypeReference, TypeScope};
use crate::parser::defs::{AnnotationDef, AnnotationValueDef};

/// Annotation attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaAnnotation {
    pub type_ref: TypeReference,
    /// Element values in source order; a lone unnamed value is keyed `value`
    pub properties: IndexMap<String, AnnotationValue>,
    /// Declaration carrying this annotation
    pub context: EntityRef,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// Literal token, verbatim
    Constant(String),
    /// Class literal (`Foo.class`)
    Type(TypeReference),
    Annotation(Box<JavaAnnotation>),
    List(Vec<AnnotationValue>),
    /// Any other expression, verbatim
    Expression(String),
}

impl JavaAnnotation {
    pub(crate) fn from_def(def: &AnnotationDef, context: EntityRef, scope: TypeScope) -> Self {
        let properties = def
            .values
            .iter()
            .map(|(name, value)| (name.clone(), AnnotationValue::from_def(value, context, scope)))
            .collect();
        Self {
            type_ref: TypeReference::from_def(&def.type_def, scope),
            properties,
            context,
            line: def.line,
        }
    }

    pub fn property(&self, name: &str) -> Option<&AnnotationValue> {
        self.properties.get(name)
    }

    /// Simple name of the annotation type as written
    pub fn type_name(&self) -> &str {
        self.type_ref.name()
    }
}

impl AnnotationValue {
    fn from_def(def: &AnnotationValueDef, context: EntityRef, scope: TypeScope) -> Self {
        match def {
            AnnotationValueDef::Constant(text) => AnnotationValue::Constant(text.clone()),
            AnnotationValueDef::Type(type_def) => {
                AnnotationValue::Type(TypeReference::from_def(type_def, scope))
            }
            AnnotationValueDef::Annotation(nested) => {
                AnnotationValue::Annotation(Box::new(JavaAnnotation::from_def(nested, context, scope)))
            }
            AnnotationValueDef::Array(items) => AnnotationValue::List(
                items
                    .iter()
                    .map(|item| AnnotationValue::from_def(item, context, scope))
                    .collect(),
            ),
            AnnotationValueDef::Expression(text) => AnnotationValue::Expression(text.clone()),
        }
    }

    /// Source text for constants and expressions
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Constant(text) | AnnotationValue::Expression(text) => Some(text),
            _ => None,
        }
    }
}
