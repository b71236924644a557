//! Name resolution
//!
//! A name used at some lexical scope resolves, first match wins, to:
//! 1. itself when primitive, or when already qualified (contains `.`)
//! 2. a type variable of the enclosing method, class or outer classes
//! 3. a class visible through the scope chain (current class, enclosing
//!    classes outward, then top-level classes of the unit)
//! 4. a single-type import ending in `.name`
//! 5. `package.name`
//! 6. `java.lang.name`
//! 7. `prefix.name` for wildcard imports, in declaration order
//!
//! Steps 3 and 4 swap under [`ScopePrecedence::ImportsFirst`]. Steps 3, 5, 6
//! and 7 only accept names the [`ClassLibrary`](crate::library::ClassLibrary)
//! knows; otherwise the name stays unresolved.

use tracing::trace;

use super::Resolver;
use crate::config::ScopePrecedence;
use crate::consts::{self, JAVA_LANG};
use crate::model::{ClassId, GenericOwner, Resolution, TypeReference, TypeScope};

impl<'a> Resolver<'a> {
    /// Resolve `tref`, memoised on the reference itself
    pub fn resolve(&self, tref: &TypeReference) -> Option<Resolution> {
        tref.resolve_with(self.library.generation(), || {
            self.resolve_name(tref.name(), &tref.scope())
        })
    }

    /// Fully-qualified name of `tref`; the declared name for type variables
    pub fn fully_qualified_name(&self, tref: &TypeReference) -> Option<String> {
        match self.resolve(tref)? {
            Resolution::Name(name) => Some(name),
            Resolution::TypeVariable { owner, index } => {
                self.type_parameter(owner, index).map(|tv| tv.name.clone())
            }
        }
    }

    /// Class in the model that `tref` resolves to
    pub fn class_of(&self, tref: &TypeReference) -> Option<ClassId> {
        match self.resolve(tref)? {
            Resolution::Name(name) => self.model.class_by_name(&name),
            Resolution::TypeVariable { .. } => None,
        }
    }

    /// Uncached resolution of `name` as written at `scope`
    pub fn resolve_name(&self, name: &str, scope: &TypeScope) -> Option<Resolution> {
        if consts::is_primitive(name) || name.contains('.') {
            return Some(Resolution::Name(name.to_string()));
        }
        if let Some(variable) = self.find_type_variable(name, scope) {
            return Some(variable);
        }

        let found = match self.precedence {
            ScopePrecedence::NestedFirst => self
                .find_in_scope_chain(name, scope)
                .or_else(|| self.find_single_import(name, scope)),
            ScopePrecedence::ImportsFirst => self
                .find_single_import(name, scope)
                .or_else(|| self.find_in_scope_chain(name, scope)),
        }
        .or_else(|| self.find_in_package(name, scope))
        .or_else(|| self.known(format!("{}.{}", JAVA_LANG, name)))
        .or_else(|| self.find_wildcard_import(name, scope));

        trace!(name, resolved = ?found, "resolved type name");
        found.map(Resolution::Name)
    }

    fn known(&self, candidate: String) -> Option<String> {
        if self.library.contains(&candidate) {
            Some(candidate)
        } else {
            None
        }
    }

    fn find_type_variable(&self, name: &str, scope: &TypeScope) -> Option<Resolution> {
        if let Some(method) = scope.method {
            let params = &self.model.method(method).type_parameters;
            if let Some(index) = params.iter().position(|tv| tv.name == name) {
                return Some(Resolution::TypeVariable {
                    owner: GenericOwner::Method(method),
                    index,
                });
            }
        }
        let mut current = scope.class;
        while let Some(id) = current {
            let class = self.model.class(id);
            if let Some(index) = class.type_parameters.iter().position(|tv| tv.name == name) {
                return Some(Resolution::TypeVariable {
                    owner: GenericOwner::Class(id),
                    index,
                });
            }
            current = class.enclosing;
        }
        None
    }

    fn find_in_scope_chain(&self, name: &str, scope: &TypeScope) -> Option<String> {
        let mut current = scope.class;
        while let Some(id) = current {
            let class = self.model.class(id);
            if class.name == name && !class.is_enum_constant_body {
                return self.known(class.binary_name.clone());
            }
            let nested = class
                .nested
                .iter()
                .map(|n| self.model.class(*n))
                .find(|n| n.name == name);
            if let Some(nested) = nested {
                return self.known(nested.binary_name.clone());
            }
            current = class.enclosing;
        }
        self.model
            .source(scope.source)
            .classes
            .iter()
            .map(|c| self.model.class(*c))
            .find(|c| c.name == name)
            .and_then(|c| self.known(c.binary_name.clone()))
    }

    fn find_single_import(&self, name: &str, scope: &TypeScope) -> Option<String> {
        let suffix = format!(".{}", name);
        self.model
            .source(scope.source)
            .single_imports()
            .find(|import| import.ends_with(&suffix))
            .map(str::to_string)
    }

    fn find_in_package(&self, name: &str, scope: &TypeScope) -> Option<String> {
        match self.model.source(scope.source).package_name() {
            Some(package) => self.known(format!("{}.{}", package, name)),
            None => self.known(name.to_string()),
        }
    }

    fn find_wildcard_import(&self, name: &str, scope: &TypeScope) -> Option<String> {
        self.model
            .source(scope.source)
            .wildcard_imports()
            .find_map(|(prefix, _)| {
                self.known(format!("{}.{}", prefix, name))
                    .or_else(|| self.known(format!("{}${}", prefix, name)))
            })
    }
}
