//! Semantic model: compilation units, classes and their members.
//!
//! Every entity lives in a [`Model`] arena and is addressed by a typed id.
//! Cross references (declaring class, enclosing class, annotation context)
//! are ids, never owning pointers.

use std::collections::HashMap;

pub mod annotation;
pub mod builder;
pub mod class;
pub mod member;
pub mod module;
pub mod source;
pub mod tag;
pub mod types;

pub use annotation::{AnnotationValue, JavaAnnotation};
pub use builder::ModelBuilder;
pub use class::JavaClass;
pub use member::{JavaField, JavaInitializer, JavaMethod, JavaParameter};
pub use module::{JavaModule, ModuleExports, ModuleProvides, ModuleRequires};
pub use source::{JavaPackage, JavaSource};
pub use tag::DocletTag;
pub use types::{
    GenericOwner, JavaType, Resolution, TypeArgument, TypeReference, TypeScope, TypeVariable,
};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Compilation unit handle
    SourceId
);
arena_id!(
    /// Class, interface, enum or annotation type handle
    ClassId
);
arena_id!(
    /// Method or constructor handle
    MethodId
);
arena_id!(
    /// Field or enum constant handle
    FieldId
);

/// Entity an annotation or doc tag is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// Package declaration or module of a source
    Source(SourceId),
    Class(ClassId),
    Method(MethodId),
    Field(FieldId),
    Parameter { method: MethodId, index: usize },
}

/// Arena sizes captured before a build, see [`Model::rollback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    sources: usize,
    classes: usize,
    methods: usize,
    fields: usize,
}

/// Arena owning every parsed entity
#[derive(Debug, Default)]
pub struct Model {
    sources: Vec<JavaSource>,
    classes: Vec<JavaClass>,
    methods: Vec<JavaMethod>,
    fields: Vec<JavaField>,
    /// Binary (`p.Outer$Inner`) and canonical (`p.Outer.Inner`) names
    class_index: HashMap<String, ClassId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self, id: SourceId) -> &JavaSource {
        &self.sources[id.0]
    }

    pub fn class(&self, id: ClassId) -> &JavaClass {
        &self.classes[id.0]
    }

    pub fn method(&self, id: MethodId) -> &JavaMethod {
        &self.methods[id.0]
    }

    pub fn field(&self, id: FieldId) -> &JavaField {
        &self.fields[id.0]
    }

    pub fn sources(&self) -> impl Iterator<Item = (SourceId, &JavaSource)> {
        self.sources.iter().enumerate().map(|(i, s)| (SourceId(i), s))
    }

    /// Every class in creation order, nested classes and enum constant bodies included
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &JavaClass)> {
        self.classes.iter().enumerate().map(|(i, c)| (ClassId(i), c))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Look a class up by binary or canonical name
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_index.get(name).copied()
    }

    /// All classes declared in `source`, outer classes before their nested ones
    pub fn classes_in_source(&self, source: SourceId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut stack: Vec<ClassId> = self.source(source).classes.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let class = self.class(id);
            let bodies = class
                .fields
                .iter()
                .filter_map(|f| self.field(*f).body_class);
            let children: Vec<ClassId> = class.nested.iter().copied().chain(bodies).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            sources: self.sources.len(),
            classes: self.classes.len(),
            methods: self.methods.len(),
            fields: self.fields.len(),
        }
    }

    /// Drop every entity created after `checkpoint`
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.sources.truncate(checkpoint.sources);
        self.classes.truncate(checkpoint.classes);
        self.methods.truncate(checkpoint.methods);
        self.fields.truncate(checkpoint.fields);
        self.class_index.retain(|_, id| id.0 < checkpoint.classes);
    }

    // Construction, used by the model builder

    pub(crate) fn add_source(&mut self, source: JavaSource) -> SourceId {
        self.sources.push(source);
        SourceId(self.sources.len() - 1)
    }

    pub(crate) fn next_class_id(&self) -> ClassId {
        ClassId(self.classes.len())
    }

    pub(crate) fn next_method_id(&self) -> MethodId {
        MethodId(self.methods.len())
    }

    pub(crate) fn next_field_id(&self) -> FieldId {
        FieldId(self.fields.len())
    }

    pub(crate) fn add_class(&mut self, class: JavaClass) -> ClassId {
        let id = self.next_class_id();
        self.class_index.entry(class.binary_name.clone()).or_insert(id);
        self.class_index.entry(class.canonical_name.clone()).or_insert(id);
        self.classes.push(class);
        id
    }

    pub(crate) fn add_method(&mut self, method: JavaMethod) -> MethodId {
        self.methods.push(method);
        MethodId(self.methods.len() - 1)
    }

    pub(crate) fn add_field(&mut self, field: JavaField) -> FieldId {
        self.fields.push(field);
        FieldId(self.fields.len() - 1)
    }

    pub(crate) fn source_mut(&mut self, id: SourceId) -> &mut JavaSource {
        &mut self.sources[id.0]
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> &mut JavaClass {
        &mut self.classes[id.0]
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> &mut JavaField {
        &mut self.fields[id.0]
    }
}
