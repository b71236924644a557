use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;

use super::{ClassId, MethodId, SourceId};
use crate::consts;
use crate::parser::defs::{BoundKind, TypeArgDef, TypeDef};

const NO_MISS: u64 = u64::MAX;

/// Lexical position a type name was written at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeScope {
    pub source: SourceId,
    /// Innermost class around the reference; for a class header, the class itself
    pub class: Option<ClassId>,
    /// Method or constructor whose signature contains the reference
    pub method: Option<MethodId>,
}

impl TypeScope {
    pub fn source(source: SourceId) -> Self {
        Self {
            source,
            class: None,
            method: None,
        }
    }

    pub fn class(source: SourceId, class: ClassId) -> Self {
        Self {
            source,
            class: Some(class),
            method: None,
        }
    }

    pub fn method(source: SourceId, class: ClassId, method: MethodId) -> Self {
        Self {
            source,
            class: Some(class),
            method: Some(method),
        }
    }
}

/// Declaration owning a type parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    Class(ClassId),
    Method(MethodId),
}

/// Outcome of resolving a type name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Fully-qualified (or primitive) type name
    Name(String),
    /// The `index`-th type parameter of `owner`
    TypeVariable { owner: GenericOwner, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    Type(TypeReference),
    Wildcard(Option<(BoundKind, Box<TypeReference>)>),
}

/// A type as written in source, resolved lazily.
///
/// A successful resolution is cached for the lifetime of the reference. A
/// miss is remembered together with the library generation it was computed
/// against and is only retried once the library has changed.
pub struct TypeReference {
    name: String,
    dimensions: usize,
    arguments: Vec<TypeArgument>,
    scope: TypeScope,
    resolved: OnceCell<Resolution>,
    miss_generation: AtomicU64,
}

impl TypeReference {
    pub fn new(name: impl Into<String>, dimensions: usize, arguments: Vec<TypeArgument>, scope: TypeScope) -> Self {
        Self {
            name: name.into(),
            dimensions,
            arguments,
            scope,
            resolved: OnceCell::new(),
            miss_generation: AtomicU64::new(NO_MISS),
        }
    }

    pub(crate) fn from_def(def: &TypeDef, scope: TypeScope) -> Self {
        let arguments = def
            .args
            .iter()
            .map(|arg| match arg {
                TypeArgDef::Type(inner) => TypeArgument::Type(TypeReference::from_def(inner, scope)),
                TypeArgDef::Wildcard(wildcard) => TypeArgument::Wildcard(
                    wildcard
                        .bound
                        .as_ref()
                        .map(|(kind, bound)| (*kind, Box::new(TypeReference::from_def(bound, scope)))),
                ),
            })
            .collect();
        Self::new(def.name.clone(), def.dimensions, arguments, scope)
    }

    /// Name as written, without type arguments or dimensions
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn arguments(&self) -> &[TypeArgument] {
        &self.arguments
    }

    pub fn scope(&self) -> TypeScope {
        self.scope
    }

    pub fn is_primitive(&self) -> bool {
        self.dimensions == 0 && consts::is_primitive(&self.name)
    }

    pub fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    /// Cached resolution, without triggering a lookup
    pub fn cached(&self) -> Option<&Resolution> {
        self.resolved.get()
    }

    /// Whether this reference has been resolved to a class or primitive name
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolved.get(), Some(Resolution::Name(_)))
    }

    /// Resolved name if known, otherwise the name as written
    pub fn value(&self) -> &str {
        match self.resolved.get() {
            Some(Resolution::Name(name)) => name,
            _ => &self.name,
        }
    }

    /// Return the memoised resolution or compute it with `lookup`.
    ///
    /// `generation` identifies the library snapshot `lookup` answers against.
    pub(crate) fn resolve_with<F>(&self, generation: u64, lookup: F) -> Option<Resolution>
    where
        F: FnOnce() -> Option<Resolution>,
    {
        if let Some(found) = self.resolved.get() {
            return Some(found.clone());
        }
        if self.miss_generation.load(Ordering::Acquire) == generation {
            return None;
        }
        match lookup() {
            Some(found) => Some(self.resolved.get_or_init(|| found).clone()),
            None => {
                self.miss_generation.store(generation, Ordering::Release);
                None
            }
        }
    }
}

impl Clone for TypeReference {
    fn clone(&self) -> Self {
        let resolved = OnceCell::new();
        if let Some(found) = self.resolved.get() {
            let _ = resolved.set(found.clone());
        }
        Self {
            name: self.name.clone(),
            dimensions: self.dimensions,
            arguments: self.arguments.clone(),
            scope: self.scope,
            resolved,
            miss_generation: AtomicU64::new(self.miss_generation.load(Ordering::Acquire)),
        }
    }
}

impl PartialEq for TypeReference {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.dimensions == other.dimensions
            && self.arguments == other.arguments
            && self.scope == other.scope
    }
}

impl Eq for TypeReference {}

impl fmt::Debug for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeReference")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions)
            .field("arguments", &self.arguments)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                match arg {
                    TypeArgument::Type(inner) => write!(f, "{}", inner)?,
                    TypeArgument::Wildcard(None) => f.write_str("?")?,
                    TypeArgument::Wildcard(Some((kind, bound))) => {
                        write!(f, "? {} {}", bound_keyword(*kind), bound)?
                    }
                }
            }
            f.write_str(">")?;
        }
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

fn bound_keyword(kind: BoundKind) -> &'static str {
    match kind {
        BoundKind::Extends => "extends",
        BoundKind::Super => "super",
    }
}

/// Declared type parameter, e.g. `T extends Comparable<T>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVariable {
    pub name: String,
    pub bounds: Vec<TypeReference>,
}

/// A type after resolution and generics substitution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    Class {
        /// Fully-qualified name, or the name as written when unresolved
        name: String,
        resolved: bool,
        dimensions: usize,
        arguments: Vec<JavaType>,
    },
    Wildcard {
        bound: Option<(BoundKind, Box<JavaType>)>,
    },
}

impl JavaType {
    pub fn named(name: impl Into<String>) -> Self {
        JavaType::Class {
            name: name.into(),
            resolved: true,
            dimensions: 0,
            arguments: Vec::new(),
        }
    }

    pub fn object() -> Self {
        Self::named(consts::OBJECT)
    }

    /// Fully-qualified name without arguments or dimensions; `?` for wildcards
    pub fn name(&self) -> &str {
        match self {
            JavaType::Class { name, .. } => name,
            JavaType::Wildcard { .. } => "?",
        }
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            JavaType::Class { resolved, .. } => *resolved,
            JavaType::Wildcard { .. } => true,
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            JavaType::Class { dimensions, .. } => *dimensions,
            JavaType::Wildcard { .. } => 0,
        }
    }

    pub fn arguments(&self) -> &[JavaType] {
        match self {
            JavaType::Class { arguments, .. } => arguments,
            JavaType::Wildcard { .. } => &[],
        }
    }

    /// Same type with type arguments dropped
    pub fn erased(self) -> Self {
        match self {
            JavaType::Class {
                name,
                resolved,
                dimensions,
                ..
            } => JavaType::Class {
                name,
                resolved,
                dimensions,
                arguments: Vec::new(),
            },
            JavaType::Wildcard {
                bound: Some((BoundKind::Extends, bound)),
            } => (*bound).erased(),
            JavaType::Wildcard { .. } => JavaType::object(),
        }
    }

    pub(crate) fn add_dimensions(&mut self, extra: usize) {
        if let JavaType::Class { dimensions, .. } = self {
            *dimensions += extra;
        }
    }

    /// Name with array brackets but no type arguments, e.g. `java.lang.String[]`
    pub fn erased_value(&self) -> String {
        let mut text = self.name().to_string();
        for _ in 0..self.dimensions() {
            text.push_str("[]");
        }
        text
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Class {
                name,
                dimensions,
                arguments,
                ..
            } => {
                f.write_str(name)?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                for _ in 0..*dimensions {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            JavaType::Wildcard { bound: None } => f.write_str("?"),
            JavaType::Wildcard {
                bound: Some((kind, bound)),
            } => write!(f, "? {} {}", bound_keyword(*kind), bound),
        }
    }
}
