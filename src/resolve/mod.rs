//! Resolution engine layered on the semantic model.
//!
//! - `names`: simple or dotted name → fully-qualified name, memoised per reference
//! - `generics`: type-variable substitution through a viewing class, erasure fallback
//! - `members`: inherited member aggregation exposing members through delegates

use crate::config::ScopePrecedence;
use crate::library::ClassLibrary;
use crate::model::{ClassId, Model};

pub mod generics;
pub mod members;
pub mod names;

pub use members::{Delegate, Member};

/// Read-only view over a model and the library it resolves against
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    model: &'a Model,
    library: &'a ClassLibrary,
    precedence: ScopePrecedence,
}

impl<'a> Resolver<'a> {
    pub fn new(model: &'a Model, library: &'a ClassLibrary, precedence: ScopePrecedence) -> Self {
        Self {
            model,
            library,
            precedence,
        }
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn library(&self) -> &'a ClassLibrary {
        self.library
    }

    /// Resolved superclass declared in the model, if any
    pub fn superclass_of(&self, class: ClassId) -> Option<ClassId> {
        let superclass = self.model.class(class).superclass.as_ref()?;
        self.class_of(superclass)
    }

    /// Resolved supertypes declared in the model: superclass first, then interfaces
    pub fn supertypes_of(&self, class: ClassId) -> Vec<ClassId> {
        let class = self.model.class(class);
        class
            .superclass
            .iter()
            .chain(class.interfaces.iter())
            .filter_map(|tref| self.class_of(tref))
            .collect()
    }
}
