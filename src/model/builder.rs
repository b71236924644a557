use tracing::{debug, trace};

use super::{
    ClassId, DocletTag, EntityRef, FieldId, JavaAnnotation, JavaClass, JavaField, JavaInitializer,
    JavaMethod, JavaModule, JavaPackage, JavaParameter, JavaSource, Model, SourceId, TypeReference,
    TypeScope, TypeVariable,
};
use crate::model::module::{ModuleExports, ModuleProvides, ModuleRequires};
use crate::parser::builder::Builder;
use crate::parser::defs::{
    AnnotationDef, ClassDef, ClassKind, ExportsDef, FieldDef, ImportDef, InitializerDef, MethodDef,
    ModuleDef, OpensDef, PackageDef, ProvidesDef, RequiresDef, TagDef, TypeVariableDef, UsesDef,
};

/// Method or constructor between its `begin_*` and `end_*` calls
struct MethodFrame {
    constructor: bool,
    comment: Option<String>,
    tags: Vec<TagDef>,
    annotations: Vec<AnnotationDef>,
    parameters: Vec<(FieldDef, Vec<AnnotationDef>)>,
}

/// Folds builder calls for one compilation unit into a [`Model`].
///
/// Protocol violations (an `end_class` without a `begin_class`, a parameter
/// outside a method, ...) mean the parser is broken and panic.
pub struct ModelBuilder<'m> {
    model: &'m mut Model,
    source: SourceId,
    classes: Vec<ClassId>,
    fields: Vec<FieldId>,
    method: Option<MethodFrame>,
    pending_comment: Option<String>,
    pending_tags: Vec<TagDef>,
    pending_annotations: Vec<AnnotationDef>,
}

impl<'m> ModelBuilder<'m> {
    /// Start a new compilation unit in `model`
    pub fn new(model: &'m mut Model) -> Self {
        let source = model.add_source(JavaSource::default());
        Self {
            model,
            source,
            classes: Vec::new(),
            fields: Vec::new(),
            method: None,
            pending_comment: None,
            pending_tags: Vec::new(),
            pending_annotations: Vec::new(),
        }
    }

    pub fn source_id(&self) -> SourceId {
        self.source
    }

    /// Number of currently open classes
    pub fn depth(&self) -> usize {
        self.classes.len()
    }

    /// Finish the unit; every opened class must have been closed
    pub fn finish(self) -> SourceId {
        if !self.classes.is_empty() || !self.fields.is_empty() || self.method.is_some() {
            panic!(
                "unbalanced builder calls: {} classes, {} fields and {} methods still open",
                self.classes.len(),
                self.fields.len(),
                usize::from(self.method.is_some())
            );
        }
        debug!(
            source = self.source.index(),
            classes = self.model.source(self.source).classes.len(),
            "built compilation unit"
        );
        self.source
    }

    fn current_class(&self, call: &str) -> ClassId {
        match self.classes.last() {
            Some(id) => *id,
            None => panic!("{} called outside of any class", call),
        }
    }

    fn take_comment(&mut self) -> (Option<String>, Vec<TagDef>) {
        (self.pending_comment.take(), std::mem::take(&mut self.pending_tags))
    }

    fn take_annotations(&mut self) -> Vec<AnnotationDef> {
        std::mem::take(&mut self.pending_annotations)
    }

    fn package_name(&self) -> Option<String> {
        self.model.source(self.source).package_name().map(str::to_string)
    }

    fn type_variables(defs: &[TypeVariableDef], scope: TypeScope) -> Vec<TypeVariable> {
        defs.iter()
            .map(|def| TypeVariable {
                name: def.name.clone(),
                bounds: def.bounds.iter().map(|b| TypeReference::from_def(b, scope)).collect(),
            })
            .collect()
    }

    fn annotations(defs: &[AnnotationDef], context: EntityRef, scope: TypeScope) -> Vec<JavaAnnotation> {
        defs.iter()
            .map(|def| JavaAnnotation::from_def(def, context, scope))
            .collect()
    }

    fn tags(defs: Vec<TagDef>, context: EntityRef) -> Vec<DocletTag> {
        defs.into_iter()
            .map(|tag| DocletTag {
                name: tag.name,
                value: tag.value,
                line: tag.line,
                context,
            })
            .collect()
    }

    fn module_mut(&mut self, call: &str) -> &mut JavaModule {
        match self.model.source_mut(self.source).module.as_mut() {
            Some(module) => module,
            None => panic!("{} called before set_module", call),
        }
    }
}

impl Builder for ModelBuilder<'_> {
    fn add_package(&mut self, package: PackageDef) {
        let (comment, _) = self.take_comment();
        let scope = TypeScope::source(self.source);
        let annotations = Self::annotations(&self.take_annotations(), EntityRef::Source(self.source), scope);
        self.model.source_mut(self.source).package = Some(JavaPackage {
            name: package.name,
            annotations,
            comment,
            line: package.line,
        });
    }

    fn add_import(&mut self, import: ImportDef) {
        self.take_comment();
        self.model
            .source_mut(self.source)
            .imports
            .push(import.to_import_string());
    }

    fn add_javadoc(&mut self, comment: String) {
        self.pending_comment = Some(comment);
        self.pending_tags.clear();
    }

    fn add_javadoc_tag(&mut self, tag: TagDef) {
        self.pending_tags.push(tag);
    }

    fn add_annotation(&mut self, annotation: AnnotationDef) {
        self.pending_annotations.push(annotation);
    }

    fn begin_class(&mut self, def: ClassDef) {
        let id = self.model.next_class_id();
        let parent = self.classes.last().copied();
        let scope = TypeScope::class(self.source, id);
        let package = self.package_name();

        let (binary_name, canonical_name) = match parent {
            Some(parent_id) => {
                let parent = self.model.class(parent_id);
                let binary = format!("{}${}", parent.binary_name, def.name);
                let canonical = if def.enum_constant_body {
                    binary.clone()
                } else {
                    format!("{}.{}", parent.canonical_name, def.name)
                };
                (binary, canonical)
            }
            None => {
                if def.enum_constant_body {
                    panic!("enum constant body '{}' outside of an enum", def.name);
                }
                let name = match &package {
                    Some(package) => format!("{}.{}", package, def.name),
                    None => def.name.clone(),
                };
                (name.clone(), name)
            }
        };

        let mut extends = def.extends.iter().map(|t| TypeReference::from_def(t, scope));
        let (superclass, mut interfaces): (Option<TypeReference>, Vec<TypeReference>) = match def.kind {
            ClassKind::Interface | ClassKind::Annotation => (None, extends.collect()),
            ClassKind::Class | ClassKind::Enum => (extends.next(), Vec::new()),
        };
        interfaces.extend(def.implements.iter().map(|t| TypeReference::from_def(t, scope)));

        let (comment, tags) = self.take_comment();
        let annotations = self.take_annotations();
        let context = EntityRef::Class(id);
        let class = JavaClass {
            name: def.name,
            kind: def.kind,
            modifiers: def.modifiers,
            binary_name,
            canonical_name,
            package,
            source: self.source,
            enclosing: parent,
            type_parameters: Self::type_variables(&def.type_parameters, scope),
            superclass,
            interfaces,
            nested: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            initializers: Vec::new(),
            annotations: Self::annotations(&annotations, context, scope),
            comment,
            tags: Self::tags(tags, context),
            line: def.line,
            is_enum_constant_body: def.enum_constant_body,
        };
        trace!(name = %class.binary_name, line = class.line, "begin class");
        self.model.add_class(class);

        if def.enum_constant_body {
            let field = match self.fields.last() {
                Some(field) => *field,
                None => panic!("enum constant body opened outside of its constant"),
            };
            self.model.field_mut(field).body_class = Some(id);
        } else {
            match parent {
                Some(parent_id) => self.model.class_mut(parent_id).nested.push(id),
                None => self.model.source_mut(self.source).classes.push(id),
            }
        }
        self.classes.push(id);
    }

    fn end_class(&mut self) {
        if self.classes.pop().is_none() {
            panic!("end_class without matching begin_class");
        }
        // a comment or annotation trailing the class body belongs to nothing
        self.pending_comment = None;
        self.pending_tags.clear();
        self.pending_annotations.clear();
    }

    fn begin_constructor(&mut self) {
        self.begin_method_frame(true);
    }

    fn end_constructor(&mut self, constructor: MethodDef) {
        self.end_method_frame(true, constructor);
    }

    fn begin_method(&mut self) {
        self.begin_method_frame(false);
    }

    fn end_method(&mut self, method: MethodDef) {
        self.end_method_frame(false, method);
    }

    fn add_parameter(&mut self, parameter: FieldDef) {
        let annotations = self.take_annotations();
        match self.method.as_mut() {
            Some(frame) => frame.parameters.push((parameter, annotations)),
            None => panic!("add_parameter called outside of a method"),
        }
    }

    fn begin_field(&mut self, def: FieldDef) {
        if self.method.is_some() {
            panic!("begin_field called inside a method");
        }
        let class = self.current_class("begin_field");
        let id = self.model.next_field_id();
        let scope = TypeScope::class(self.source, class);
        let context = EntityRef::Field(id);
        let (comment, tags) = self.take_comment();
        let annotations = self.take_annotations();

        let field = JavaField {
            name: def.name,
            declaring_class: class,
            type_ref: TypeReference::from_def(&def.type_def, scope),
            modifiers: def.modifiers,
            initializer: def.initializer,
            enum_constant: def.enum_constant,
            arguments: def.args,
            body_class: None,
            annotations: Self::annotations(&annotations, context, scope),
            comment,
            tags: Self::tags(tags, context),
            line: def.line,
        };
        self.model.add_field(field);
        self.model.class_mut(class).fields.push(id);
        self.fields.push(id);
    }

    fn end_field(&mut self) {
        if self.fields.pop().is_none() {
            panic!("end_field without matching begin_field");
        }
    }

    fn add_initializer(&mut self, initializer: InitializerDef) {
        let class = self.current_class("add_initializer");
        self.take_comment();
        self.take_annotations();
        self.model.class_mut(class).initializers.push(JavaInitializer {
            is_static: initializer.is_static,
            body: initializer.body,
            line: initializer.line,
        });
    }

    fn set_module(&mut self, def: ModuleDef) {
        let (comment, _) = self.take_comment();
        let scope = TypeScope::source(self.source);
        let annotations = Self::annotations(&self.take_annotations(), EntityRef::Source(self.source), scope);
        self.model.source_mut(self.source).module = Some(JavaModule {
            name: def.name,
            open: def.open,
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
            annotations,
            comment,
            line: def.line,
        });
    }

    fn add_requires(&mut self, requires: RequiresDef) {
        self.module_mut("add_requires").requires.push(ModuleRequires {
            name: requires.name,
            modifiers: requires.modifiers,
            line: requires.line,
        });
    }

    fn add_exports(&mut self, exports: ExportsDef) {
        self.module_mut("add_exports").exports.push(ModuleExports {
            package: exports.source,
            targets: exports.targets,
            line: exports.line,
        });
    }

    fn add_opens(&mut self, opens: OpensDef) {
        self.module_mut("add_opens").opens.push(ModuleExports {
            package: opens.source,
            targets: opens.targets,
            line: opens.line,
        });
    }

    fn add_uses(&mut self, uses: UsesDef) {
        let scope = TypeScope::source(self.source);
        self.module_mut("add_uses")
            .uses
            .push(TypeReference::from_def(&uses.service, scope));
    }

    fn add_provides(&mut self, provides: ProvidesDef) {
        let scope = TypeScope::source(self.source);
        let entry = ModuleProvides {
            service: TypeReference::from_def(&provides.service, scope),
            implementations: provides
                .implementations
                .iter()
                .map(|t| TypeReference::from_def(t, scope))
                .collect(),
            line: provides.line,
        };
        self.module_mut("add_provides").provides.push(entry);
    }
}

impl ModelBuilder<'_> {
    fn begin_method_frame(&mut self, constructor: bool) {
        if self.method.is_some() {
            panic!("method opened while another method is still open");
        }
        self.current_class(if constructor { "begin_constructor" } else { "begin_method" });
        let (comment, tags) = self.take_comment();
        let annotations = self.take_annotations();
        self.method = Some(MethodFrame {
            constructor,
            comment,
            tags,
            annotations,
            parameters: Vec::new(),
        });
    }

    fn end_method_frame(&mut self, constructor: bool, def: MethodDef) {
        let frame = match self.method.take() {
            Some(frame) if frame.constructor == constructor => frame,
            Some(_) => panic!("end_method/end_constructor does not match the open declaration"),
            None => panic!("end of method '{}' without a matching begin", def.name),
        };
        let class = self.current_class("end_method");
        let id = self.model.next_method_id();
        let scope = TypeScope::method(self.source, class, id);
        let context = EntityRef::Method(id);

        let parameters: Vec<JavaParameter> = frame
            .parameters
            .iter()
            .enumerate()
            .map(|(index, (param, annotations))| JavaParameter {
                name: param.name.clone(),
                type_ref: TypeReference::from_def(&param.type_def, scope),
                varargs: param.varargs,
                modifiers: param.modifiers.clone(),
                annotations: Self::annotations(
                    annotations,
                    EntityRef::Parameter { method: id, index },
                    scope,
                ),
                line: param.line,
            })
            .collect();
        let varargs = parameters.last().map_or(false, |p| p.varargs);

        let method = JavaMethod {
            name: def.name,
            constructor,
            declaring_class: class,
            return_type: def.return_type.as_ref().map(|t| TypeReference::from_def(t, scope)),
            parameters,
            exceptions: def.exceptions.iter().map(|t| TypeReference::from_def(t, scope)).collect(),
            type_parameters: Self::type_variables(&def.type_parameters, scope),
            modifiers: def.modifiers,
            body: def.body,
            default_value: def.default_value,
            varargs,
            annotations: Self::annotations(&frame.annotations, context, scope),
            comment: frame.comment,
            tags: Self::tags(frame.tags, context),
            line: def.line,
        };
        self.model.add_method(method);
        let owner = self.model.class_mut(class);
        if constructor {
            owner.constructors.push(id);
        } else {
            owner.methods.push(id);
        }
    }
}
