mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{class_named, field_named, project_with};
use javamodel::model::Resolution;
use javamodel::{ClassLibrary, ClassSource, Config, JavaProject, ScopePrecedence};

fn field_type(project: &JavaProject, class: &str, field: &str) -> Option<String> {
    let class = class_named(project, class);
    let field = field_named(project, class, field);
    project.fully_qualified_name(&project.field(field).type_ref)
}

#[test]
fn single_type_import_beats_same_package() {
    let project = project_with(&[
        "package q; public class Helper {}",
        "package p; class Helper {}",
        "package p; import q.Helper; class C { Helper h; }",
    ]);
    assert_eq!(field_type(&project, "p.C", "h").as_deref(), Some("q.Helper"));
}

#[test]
fn same_package_beats_java_lang() {
    let project = project_with(&[
        "package p; class String {}",
        "package p; class C { String s; }",
    ]);
    assert_eq!(field_type(&project, "p.C", "s").as_deref(), Some("p.String"));
}

#[test]
fn java_lang_beats_wildcard_import() {
    let project = project_with(&[
        "package q; public class Integer {}",
        "package p; import q.*; class C { Integer i; }",
    ]);
    assert_eq!(field_type(&project, "p.C", "i").as_deref(), Some("java.lang.Integer"));
}

#[test]
fn wildcard_import_is_the_last_resort() {
    let project = project_with(&[
        "package q; public class Helper { public static class Nested {} }",
        "package p; import q.*; import q.Helper.*; class C { Helper h; Nested n; }",
    ]);
    assert_eq!(field_type(&project, "p.C", "h").as_deref(), Some("q.Helper"));
    assert_eq!(field_type(&project, "p.C", "n").as_deref(), Some("q.Helper$Nested"));
}

#[test]
fn jdk_wildcard_import() {
    let project = project_with(&["import java.util.*; class C { List<String> items; Map.Entry<String, String> e; }"]);
    assert_eq!(field_type(&project, "C", "items").as_deref(), Some("java.util.List"));
    // dotted names are taken as written
    assert_eq!(field_type(&project, "C", "e").as_deref(), Some("Map.Entry"));
}

#[test]
fn superclass_resolves_once_registered() {
    let mut project = JavaProject::new();
    let source = project
        .build_source("package p; class A {} class B extends A {}")
        .unwrap();
    let b = class_named(&project, "p.B");
    let superclass = project.class(b).superclass.clone().unwrap();

    assert_eq!(project.resolve(&superclass), None);
    assert!(!superclass.is_resolved());
    assert_eq!(project.value(&superclass), "A");
    assert_eq!(superclass.value(), "A");
    assert_eq!(project.superclass_of(b), None);

    project.register_source(source);
    let superclass = &project.class(b).superclass;
    let superclass = superclass.as_ref().unwrap();
    assert_eq!(project.fully_qualified_name(superclass).as_deref(), Some("p.A"));
    assert!(superclass.is_resolved());
    assert_eq!(superclass.value(), "p.A");
    assert_eq!(project.superclass_of(b), Some(class_named(&project, "p.A")));
}

#[test]
fn nested_scope_first_by_default() {
    let source = "package p; import q.Inner; class Outer { class Inner {} Inner field; }";
    let project = project_with(&["package q; public class Inner {}", source]);
    assert_eq!(field_type(&project, "p.Outer", "field").as_deref(), Some("p.Outer$Inner"));
}

#[test]
fn imports_first_precedence() {
    let config = Config::default().with_scope_precedence(ScopePrecedence::ImportsFirst);
    let mut project = JavaProject::with_config(config);
    project.add_source("package q; public class Inner {}").unwrap();
    project
        .add_source("package p; import q.Inner; class Outer { class Inner {} Inner field; }")
        .unwrap();
    assert_eq!(field_type(&project, "p.Outer", "field").as_deref(), Some("q.Inner"));
}

#[test]
fn sibling_nested_classes_are_visible_from_inner_scopes() {
    let project = project_with(&[r#"
package p;
class Outer {
    static class Node {}
    static class Tree {
        Node root;
        Outer owner;
    }
}
"#]);
    assert_eq!(field_type(&project, "p.Outer$Tree", "root").as_deref(), Some("p.Outer$Node"));
    assert_eq!(field_type(&project, "p.Outer$Tree", "owner").as_deref(), Some("p.Outer"));
}

#[test]
fn type_variables_shadow_classes() {
    let project = project_with(&[
        "package p; class T {}",
        "package p; class Box<T> { T value; <E> E pick(E e) { return e; } }",
    ]);
    let boxed = class_named(&project, "p.Box");
    let value = field_named(&project, boxed, "value");
    let resolved = project.resolve(&project.field(value).type_ref);
    assert!(matches!(resolved, Some(Resolution::TypeVariable { index: 0, .. })));
    assert_eq!(field_type(&project, "p.Box", "value").as_deref(), Some("T"));

    let pick = project.method(project.class(boxed).methods[0]);
    let param = &pick.parameters[0].type_ref;
    assert!(matches!(project.resolve(param), Some(Resolution::TypeVariable { .. })));
}

#[test]
fn primitives_and_unknown_names() {
    let project = project_with(&["class C { int[] counts; Unknown u; }"]);
    assert_eq!(field_type(&project, "C", "counts").as_deref(), Some("int"));
    let c = class_named(&project, "C");
    let u = &project.field(field_named(&project, c, "u")).type_ref;
    assert_eq!(project.resolve(u), None);
    assert_eq!(project.value(u), "Unknown");
    let java_type = project.resolve_type(u);
    assert!(!java_type.is_resolved());
    assert_eq!(java_type.name(), "Unknown");
}

struct CountingSource {
    names: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl ClassSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn contains(&self, name: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names.iter().any(|n| n == name)
    }

    fn all(&self) -> Vec<String> {
        self.names.clone()
    }
}

#[test]
fn resolution_is_memoised_per_reference() {
    let calls = Arc::new(AtomicUsize::new(0));
    let library = ClassLibrary::new();
    library.add_source(Box::new(CountingSource {
        names: vec!["x.Found".to_string()],
        calls: Arc::clone(&calls),
    }));
    let mut project = JavaProject::with_library(Arc::new(library));
    project
        .add_source("package p; import x.*; class C { Found f; Missing m; }")
        .unwrap();
    let c = class_named(&project, "p.C");
    let found = project.field(field_named(&project, c, "f")).type_ref.clone();
    let missing = project.field(field_named(&project, c, "m")).type_ref.clone();

    let first = project.resolve(&found);
    assert_eq!(first, Some(Resolution::Name("x.Found".to_string())));
    let after_found = calls.load(Ordering::SeqCst);
    assert!(after_found > 0);
    assert_eq!(project.resolve(&found), first);
    assert_eq!(calls.load(Ordering::SeqCst), after_found);

    assert_eq!(project.resolve(&missing), None);
    let after_missing = calls.load(Ordering::SeqCst);
    assert!(after_missing > after_found);
    assert_eq!(project.resolve(&missing), None);
    assert_eq!(calls.load(Ordering::SeqCst), after_missing);

    // a library change invalidates remembered misses, never successes
    project.library().register("y.Other");
    assert_eq!(project.resolve(&missing), None);
    assert!(calls.load(Ordering::SeqCst) > after_missing);
    let settled = calls.load(Ordering::SeqCst);
    assert_eq!(project.resolve(&found), first);
    assert_eq!(calls.load(Ordering::SeqCst), settled);
}

#[test]
fn shared_library_between_projects() {
    let library = Arc::new(ClassLibrary::with_jdk_defaults());
    let mut api = JavaProject::with_library(Arc::clone(&library));
    api.add_source("package api; public interface Service {}").unwrap();

    let mut app = JavaProject::with_library(library);
    app.add_source("package app; import api.*; class Impl implements Service {}")
        .unwrap();
    let imp = class_named(&app, "app.Impl");
    let iface = &app.class(imp).interfaces[0];
    assert_eq!(app.fully_qualified_name(iface).as_deref(), Some("api.Service"));
    // the interface lives in the other project's model
    assert!(app.resolver().class_of(iface).is_none());
}
