//! Project façade: one model, one shared class library, one configuration.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::library::{ClassLibrary, ClasspathSource, JdkSource};
use crate::model::{
    ClassId, FieldId, JavaClass, JavaField, JavaMethod, JavaSource, JavaType, MethodId, Model,
    ModelBuilder, Resolution, SourceId, TypeReference,
};
use crate::parser::{self, Parser};
use crate::resolve::{Member, Resolver};

/// A set of parsed compilation units and the library they resolve against
#[derive(Debug)]
pub struct JavaProject {
    model: Model,
    library: Arc<ClassLibrary>,
    config: Config,
}

impl Default for JavaProject {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaProject {
    /// Project with the default configuration (JDK names, no classpath)
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let library = ClassLibrary::new();
        if config.jdk_defaults {
            library.add_source(Box::new(JdkSource::new()));
        }
        for entry in config.classpath_entries() {
            library.add_source(Box::new(ClasspathSource::new(entry)));
        }
        Self {
            model: Model::new(),
            library: Arc::new(library),
            config,
        }
    }

    /// Project sharing an existing library, e.g. between several projects
    pub fn with_library(library: Arc<ClassLibrary>) -> Self {
        Self {
            model: Model::new(),
            library,
            config: Config::default(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn library(&self) -> &Arc<ClassLibrary> {
        &self.library
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and build `source`, then register its classes in the library
    pub fn add_source(&mut self, source: &str) -> Result<SourceId> {
        let id = self.build_source(source)?;
        self.register_source(id);
        Ok(id)
    }

    /// Read a compilation unit from disk and add it like [`JavaProject::add_source`]
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<SourceId> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "adding source file");
        self.add_source(&text)
    }

    /// Parse and build `source` without registering its classes.
    ///
    /// On a parse error nothing of the unit is left in the model.
    pub fn build_source(&mut self, source: &str) -> Result<SourceId> {
        let checkpoint = self.model.checkpoint();
        let mut builder = ModelBuilder::new(&mut self.model);
        match Parser::parse_source(source, &mut builder) {
            Ok(()) => Ok(builder.finish()),
            Err(err) => {
                drop(builder);
                self.model.rollback(checkpoint);
                debug!(error = %err, "discarded compilation unit");
                Err(err.into())
            }
        }
    }

    /// Register the binary names of every class declared in `source`
    pub fn register_source(&self, source: SourceId) -> usize {
        let names: Vec<String> = self
            .model
            .classes_in_source(source)
            .into_iter()
            .map(|id| self.model.class(id).binary_name.clone())
            .collect();
        self.library.register_all(names)
    }

    /// Parse several units in parallel and add them in input order.
    ///
    /// Names are registered in one pass once every unit is built. The first
    /// parse error aborts the whole batch and leaves the project unchanged.
    pub fn add_sources(&mut self, sources: &[&str]) -> Result<Vec<SourceId>> {
        let recorded = thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| scope.spawn(move || parser::record_source(source)))
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect::<std::result::Result<Vec<_>, _>>()
        })?;

        let ids: Vec<SourceId> = recorded
            .into_iter()
            .map(|recorder| {
                let mut builder = ModelBuilder::new(&mut self.model);
                recorder.replay_into(&mut builder);
                builder.finish()
            })
            .collect();
        let names: Vec<String> = ids
            .iter()
            .flat_map(|id| self.model.classes_in_source(*id))
            .map(|id| self.model.class(id).binary_name.clone())
            .collect();
        let added = self.library.register_all(names);
        debug!(units = ids.len(), added, "added compilation units");
        Ok(ids)
    }

    pub fn sources(&self) -> impl Iterator<Item = (SourceId, &JavaSource)> {
        self.model.sources()
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &JavaClass)> {
        self.model.classes()
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.model.class_by_name(name)
    }

    pub fn source(&self, id: SourceId) -> &JavaSource {
        self.model.source(id)
    }

    pub fn class(&self, id: ClassId) -> &JavaClass {
        self.model.class(id)
    }

    pub fn method(&self, id: MethodId) -> &JavaMethod {
        self.model.method(id)
    }

    pub fn field(&self, id: FieldId) -> &JavaField {
        self.model.field(id)
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.model, &self.library, self.config.scope_precedence)
    }

    pub fn resolve(&self, tref: &TypeReference) -> Option<Resolution> {
        self.resolver().resolve(tref)
    }

    pub fn fully_qualified_name(&self, tref: &TypeReference) -> Option<String> {
        self.resolver().fully_qualified_name(tref)
    }

    /// Resolved name, or the name as written when it cannot be resolved
    pub fn value(&self, tref: &TypeReference) -> String {
        match self.resolve(tref) {
            Some(Resolution::Name(name)) => name,
            _ => tref.name().to_string(),
        }
    }

    /// Type of `tref` in the class it was written in
    pub fn resolve_type(&self, tref: &TypeReference) -> JavaType {
        self.resolver().to_java_type(tref, tref.scope().class)
    }

    /// Type of `tref` as seen from `viewing`
    pub fn resolve_type_in(&self, tref: &TypeReference, viewing: ClassId) -> JavaType {
        self.resolver().to_java_type(tref, Some(viewing))
    }

    pub fn superclass_of(&self, class: ClassId) -> Option<ClassId> {
        self.resolver().superclass_of(class)
    }

    pub fn methods(&self, class: ClassId, inherited: bool) -> Vec<Member<MethodId>> {
        self.resolver().methods(class, inherited)
    }

    pub fn fields(&self, class: ClassId, inherited: bool) -> Vec<Member<FieldId>> {
        self.resolver().fields(class, inherited)
    }

    pub fn member_return_type(&self, member: Member<MethodId>) -> Option<JavaType> {
        self.resolver().member_return_type(member)
    }

    pub fn member_parameter_types(&self, member: Member<MethodId>) -> Vec<JavaType> {
        self.resolver().member_parameter_types(member)
    }

    pub fn member_field_type(&self, member: Member<FieldId>) -> JavaType {
        self.resolver().member_field_type(member)
    }
}
