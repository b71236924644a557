use super::defs::{
    AnnotationDef, ClassDef, ExportsDef, FieldDef, ImportDef, InitializerDef, MethodDef, ModuleDef,
    OpensDef, PackageDef, ProvidesDef, RequiresDef, TagDef, UsesDef,
};

/// Receiver of the parser's output.
///
/// Calls arrive in source order. `begin_*`/`end_*` pairs are strictly nested;
/// documentation and annotations are announced before the declaration they
/// belong to, and method parameters arrive between `begin_method` and
/// `end_method` (resp. the constructor pair).
pub trait Builder {
    fn add_package(&mut self, package: PackageDef);
    fn add_import(&mut self, import: ImportDef);
    fn add_javadoc(&mut self, comment: String);
    fn add_javadoc_tag(&mut self, tag: TagDef);
    fn add_annotation(&mut self, annotation: AnnotationDef);

    fn begin_class(&mut self, class: ClassDef);
    fn end_class(&mut self);

    fn begin_constructor(&mut self);
    fn end_constructor(&mut self, constructor: MethodDef);
    fn begin_method(&mut self);
    fn end_method(&mut self, method: MethodDef);
    fn add_parameter(&mut self, parameter: FieldDef);

    fn begin_field(&mut self, field: FieldDef);
    fn end_field(&mut self);

    fn add_initializer(&mut self, initializer: InitializerDef);

    fn set_module(&mut self, module: ModuleDef);
    fn add_requires(&mut self, requires: RequiresDef);
    fn add_exports(&mut self, exports: ExportsDef);
    fn add_opens(&mut self, opens: OpensDef);
    fn add_uses(&mut self, uses: UsesDef);
    fn add_provides(&mut self, provides: ProvidesDef);
}

/// One recorded [`Builder`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderEvent {
    Package(PackageDef),
    Import(ImportDef),
    JavaDoc(String),
    JavaDocTag(TagDef),
    Annotation(AnnotationDef),
    BeginClass(ClassDef),
    EndClass,
    BeginConstructor,
    EndConstructor(MethodDef),
    BeginMethod,
    EndMethod(MethodDef),
    Parameter(FieldDef),
    BeginField(FieldDef),
    EndField,
    Initializer(InitializerDef),
    Module(ModuleDef),
    Requires(RequiresDef),
    Exports(ExportsDef),
    Opens(OpensDef),
    Uses(UsesDef),
    Provides(ProvidesDef),
}

impl BuilderEvent {
    /// Re-issue this call against another builder
    pub fn replay(self, builder: &mut dyn Builder) {
        match self {
            BuilderEvent::Package(def) => builder.add_package(def),
            BuilderEvent::Import(def) => builder.add_import(def),
            BuilderEvent::JavaDoc(comment) => builder.add_javadoc(comment),
            BuilderEvent::JavaDocTag(def) => builder.add_javadoc_tag(def),
            BuilderEvent::Annotation(def) => builder.add_annotation(def),
            BuilderEvent::BeginClass(def) => builder.begin_class(def),
            BuilderEvent::EndClass => builder.end_class(),
            BuilderEvent::BeginConstructor => builder.begin_constructor(),
            BuilderEvent::EndConstructor(def) => builder.end_constructor(def),
            BuilderEvent::BeginMethod => builder.begin_method(),
            BuilderEvent::EndMethod(def) => builder.end_method(def),
            BuilderEvent::Parameter(def) => builder.add_parameter(def),
            BuilderEvent::BeginField(def) => builder.begin_field(def),
            BuilderEvent::EndField => builder.end_field(),
            BuilderEvent::Initializer(def) => builder.add_initializer(def),
            BuilderEvent::Module(def) => builder.set_module(def),
            BuilderEvent::Requires(def) => builder.add_requires(def),
            BuilderEvent::Exports(def) => builder.add_exports(def),
            BuilderEvent::Opens(def) => builder.add_opens(def),
            BuilderEvent::Uses(def) => builder.add_uses(def),
            BuilderEvent::Provides(def) => builder.add_provides(def),
        }
    }
}

/// Builder that records every call for later replay
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Vec<BuilderEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BuilderEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BuilderEvent> {
        self.events
    }

    /// Replay all recorded calls, in order
    pub fn replay_into(self, builder: &mut dyn Builder) {
        for event in self.events {
            event.replay(builder);
        }
    }
}

impl Builder for EventRecorder {
    fn add_package(&mut self, package: PackageDef) {
        self.events.push(BuilderEvent::Package(package));
    }

    fn add_import(&mut self, import: ImportDef) {
        self.events.push(BuilderEvent::Import(import));
    }

    fn add_javadoc(&mut self, comment: String) {
        self.events.push(BuilderEvent::JavaDoc(comment));
    }

    fn add_javadoc_tag(&mut self, tag: TagDef) {
        self.events.push(BuilderEvent::JavaDocTag(tag));
    }

    fn add_annotation(&mut self, annotation: AnnotationDef) {
        self.events.push(BuilderEvent::Annotation(annotation));
    }

    fn begin_class(&mut self, class: ClassDef) {
        self.events.push(BuilderEvent::BeginClass(class));
    }

    fn end_class(&mut self) {
        self.events.push(BuilderEvent::EndClass);
    }

    fn begin_constructor(&mut self) {
        self.events.push(BuilderEvent::BeginConstructor);
    }

    fn end_constructor(&mut self, constructor: MethodDef) {
        self.events.push(BuilderEvent::EndConstructor(constructor));
    }

    fn begin_method(&mut self) {
        self.events.push(BuilderEvent::BeginMethod);
    }

    fn end_method(&mut self, method: MethodDef) {
        self.events.push(BuilderEvent::EndMethod(method));
    }

    fn add_parameter(&mut self, parameter: FieldDef) {
        self.events.push(BuilderEvent::Parameter(parameter));
    }

    fn begin_field(&mut self, field: FieldDef) {
        self.events.push(BuilderEvent::BeginField(field));
    }

    fn end_field(&mut self) {
        self.events.push(BuilderEvent::EndField);
    }

    fn add_initializer(&mut self, initializer: InitializerDef) {
        self.events.push(BuilderEvent::Initializer(initializer));
    }

    fn set_module(&mut self, module: ModuleDef) {
        self.events.push(BuilderEvent::Module(module));
    }

    fn add_requires(&mut self, requires: RequiresDef) {
        self.events.push(BuilderEvent::Requires(requires));
    }

    fn add_exports(&mut self, exports: ExportsDef) {
        self.events.push(BuilderEvent::Exports(exports));
    }

    fn add_opens(&mut self, opens: OpensDef) {
        self.events.push(BuilderEvent::Opens(opens));
    }

    fn add_uses(&mut self, uses: UsesDef) {
        self.events.push(BuilderEvent::Uses(uses));
    }

    fn add_provides(&mut self, provides: ProvidesDef) {
        self.events.push(BuilderEvent::Provides(provides));
    }
}
