//! Generics substitution
//!
//! A class type variable `T` declared by `D` is looked at through a viewing
//! class `C`. The argument `C` supplies for `D` is found on `C`'s direct
//! supertypes first, then by walking up through intermediate generic
//! supertypes; an argument that is itself a type variable of an intermediate
//! class is resolved again relative to `C`. When nothing is supplied the
//! variable degrades to its erasure: first bound, else `java.lang.Object`.

use std::collections::HashSet;

use tracing::trace;

use super::Resolver;
use crate::consts::{RESOLVE_MAX_HIERARCHY_STEPS, RESOLVE_MAX_SUBSTITUTION_DEPTH};
use crate::model::{ClassId, GenericOwner, JavaType, Resolution, TypeArgument, TypeReference, TypeVariable};

impl<'a> Resolver<'a> {
    /// Declared type parameter `index` of `owner`
    pub fn type_parameter(&self, owner: GenericOwner, index: usize) -> Option<&'a TypeVariable> {
        let params = match owner {
            GenericOwner::Class(id) => &self.model.class(id).type_parameters,
            GenericOwner::Method(id) => &self.model.method(id).type_parameters,
        };
        params.get(index)
    }

    /// Type of `tref` as seen from `viewing`; type variables are substituted
    pub fn to_java_type(&self, tref: &TypeReference, viewing: Option<ClassId>) -> JavaType {
        self.java_type_at(tref, viewing, 0)
    }

    fn java_type_at(&self, tref: &TypeReference, viewing: Option<ClassId>, depth: usize) -> JavaType {
        if depth > RESOLVE_MAX_SUBSTITUTION_DEPTH {
            return JavaType::object();
        }
        match self.resolve(tref) {
            Some(Resolution::TypeVariable { owner, index }) => {
                let supplied = match (owner, viewing) {
                    (GenericOwner::Class(declaring), Some(viewing)) => {
                        self.supplied_argument(viewing, declaring, index, depth)
                    }
                    _ => None,
                };
                let mut java_type = supplied.unwrap_or_else(|| self.erasure(owner, index, depth));
                java_type.add_dimensions(tref.dimensions());
                java_type
            }
            resolved => JavaType::Class {
                name: match &resolved {
                    Some(Resolution::Name(name)) => name.clone(),
                    _ => tref.name().to_string(),
                },
                resolved: resolved.is_some(),
                dimensions: tref.dimensions(),
                arguments: tref
                    .arguments()
                    .iter()
                    .map(|arg| self.argument_type(arg, viewing, depth + 1))
                    .collect(),
            },
        }
    }

    fn argument_type(&self, arg: &TypeArgument, viewing: Option<ClassId>, depth: usize) -> JavaType {
        match arg {
            TypeArgument::Type(tref) => self.java_type_at(tref, viewing, depth),
            TypeArgument::Wildcard(bound) => JavaType::Wildcard {
                bound: bound
                    .as_ref()
                    .map(|(kind, tref)| (*kind, Box::new(self.java_type_at(tref, viewing, depth)))),
            },
        }
    }

    /// Erasure of a type variable: its first bound without arguments, else `Object`
    pub fn erasure(&self, owner: GenericOwner, index: usize, depth: usize) -> JavaType {
        let bound = self
            .type_parameter(owner, index)
            .and_then(|tv| tv.bounds.first());
        match bound {
            Some(bound) if depth < RESOLVE_MAX_SUBSTITUTION_DEPTH => {
                self.java_type_at(bound, None, depth + 1).erased()
            }
            _ => JavaType::object(),
        }
    }

    /// Argument `viewing` supplies for parameter `index` of `declaring`
    fn supplied_argument(
        &self,
        viewing: ClassId,
        declaring: ClassId,
        index: usize,
        depth: usize,
    ) -> Option<JavaType> {
        if viewing == declaring {
            return None;
        }
        let mut visited = HashSet::new();
        let found = self.search_supertypes(viewing, viewing, declaring, index, depth, &mut visited);
        trace!(
            viewing = %self.model.class(viewing).binary_name,
            declaring = %self.model.class(declaring).binary_name,
            index,
            found = ?found.as_ref().map(|t| t.to_string()),
            "type argument lookup"
        );
        found
    }

    fn search_supertypes(
        &self,
        current: ClassId,
        viewing: ClassId,
        declaring: ClassId,
        index: usize,
        depth: usize,
        visited: &mut HashSet<ClassId>,
    ) -> Option<JavaType> {
        if !visited.insert(current) || visited.len() > RESOLVE_MAX_HIERARCHY_STEPS {
            return None;
        }
        let class = self.model.class(current);
        let supertypes: Vec<&TypeReference> =
            class.superclass.iter().chain(class.interfaces.iter()).collect();

        for supertype in &supertypes {
            if self.class_of(supertype) == Some(declaring) {
                // a raw supertype supplies nothing
                let arg = supertype.arguments().get(index)?;
                return Some(self.argument_type(arg, Some(viewing), depth + 1));
            }
        }
        supertypes.iter().find_map(|supertype| {
            let next = self.class_of(supertype)?;
            self.search_supertypes(next, viewing, declaring, index, depth, visited)
        })
    }
}
