//! Class library: the oracle answering "is this fully-qualified name a known type".
//!
//! Names come from two places: names registered from parsed sources, and an
//! ordered list of [`ClassSource`]s (built-in JDK names, classpath directories).
//! The library never resolves names itself.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use indexmap::IndexSet;
use tracing::debug;

pub mod classpath;
pub mod jdk;

pub use classpath::{ClasspathResolver, ClasspathSource};
pub use jdk::JdkSource;

/// Pluggable source of known type names
pub trait ClassSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    fn contains(&self, name: &str) -> bool;

    /// Every name this source knows, in a stable order
    fn all(&self) -> Vec<String>;
}

/// Shared, thread-safe registry of known type names.
///
/// Every change bumps [`ClassLibrary::generation`], which resolution caches
/// use to decide whether a remembered miss is still valid.
pub struct ClassLibrary {
    registered: RwLock<IndexSet<String>>,
    sources: RwLock<Vec<Box<dyn ClassSource>>>,
    generation: AtomicU64,
}

impl Default for ClassLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassLibrary {
    pub fn new() -> Self {
        Self {
            registered: RwLock::new(IndexSet::new()),
            sources: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Library seeded with the built-in JDK names
    pub fn with_jdk_defaults() -> Self {
        let library = Self::new();
        library.add_source(Box::new(JdkSource::new()));
        library
    }

    /// Append a source; it is consulted after all earlier ones
    pub fn add_source(&self, source: Box<dyn ClassSource>) {
        debug!(source = source.name(), "adding class source");
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(source);
        self.bump();
    }

    /// Register one name; returns whether it was new
    pub fn register(&self, name: impl Into<String>) -> bool {
        let inserted = self
            .registered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into());
        if inserted {
            self.bump();
        }
        inserted
    }

    /// Register many names under a single lock and generation bump
    pub fn register_all<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        {
            let mut registered = self.registered.write().unwrap_or_else(PoisonError::into_inner);
            for name in names {
                if registered.insert(name.into()) {
                    added += 1;
                }
            }
        }
        if added > 0 {
            debug!(added, "registered class names");
            self.bump();
        }
        added
    }

    pub fn contains(&self, name: &str) -> bool {
        if self
            .registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
        {
            return true;
        }
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|source| source.contains(name))
    }

    /// Registered names first, then each source in order, without duplicates
    pub fn all(&self) -> Vec<String> {
        let mut names: IndexSet<String> = self
            .registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        for source in self.sources.read().unwrap_or_else(PoisonError::into_inner).iter() {
            names.extend(source.all());
        }
        names.into_iter().collect()
    }

    /// Counter bumped on every change to the set of known names
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for ClassLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<String> = self
            .sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        f.debug_struct("ClassLibrary")
            .field(
                "registered",
                &self.registered.read().unwrap_or_else(PoisonError::into_inner).len(),
            )
            .field("sources", &sources)
            .field("generation", &self.generation())
            .finish()
    }
}
