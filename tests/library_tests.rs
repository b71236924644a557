//! Class library and classpath tests

mod common;

use std::env;
use std::fs;
use std::path::Path;

use common::{class_named, field_named};
use javamodel::library::ClasspathResolver;
use javamodel::{ClassLibrary, ClassSource, ClasspathSource, Config, JavaProject, JdkSource};
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

fn sample_classpath() -> TempDir {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "lib/Widget.java");
    touch(dir.path(), "lib/Gadget.class");
    touch(dir.path(), "lib/Gadget$Part.class");
    touch(dir.path(), "lib/Source$Nested.java");
    touch(dir.path(), "lib/package-info.java");
    touch(dir.path(), "module-info.java");
    touch(dir.path(), "lib/notes.txt");
    dir
}

#[test]
fn classpath_source_answers_from_files() {
    let dir = sample_classpath();
    let source = ClasspathSource::new(dir.path());
    assert!(source.contains("lib.Widget"));
    assert!(source.contains("lib.Gadget"));
    assert!(source.contains("lib.Gadget$Part"));
    assert!(!source.contains("lib.Source$Nested"));
    assert!(!source.contains("lib.Missing"));
    assert!(!source.contains("Widget"));
    assert!(source.name().starts_with("classpath:"));
}

#[test]
fn classpath_source_remembers_answers() {
    let dir = sample_classpath();
    let source = ClasspathSource::new(dir.path());
    assert!(!source.contains("lib.Later"));
    touch(dir.path(), "lib/Later.java");
    assert!(!source.contains("lib.Later"));
    assert!(ClasspathSource::new(dir.path()).contains("lib.Later"));
}

#[test]
fn classpath_source_lists_every_type() {
    let dir = sample_classpath();
    let names = ClasspathSource::new(dir.path()).all();
    assert_eq!(
        names,
        vec!["lib.Gadget", "lib.Gadget$Part", "lib.Source$Nested", "lib.Widget"]
    );
}

#[test]
fn library_consults_sources_in_order() {
    let dir = sample_classpath();
    let library = ClassLibrary::new();
    library.register("app.Main");
    library.add_source(Box::new(JdkSource::new()));
    library.add_source(Box::new(ClasspathSource::new(dir.path())));

    assert!(library.contains("app.Main"));
    assert!(library.contains("java.lang.Object"));
    assert!(library.contains("lib.Widget"));

    let all = library.all();
    assert_eq!(all[0], "app.Main");
    let object = all.iter().position(|n| n == "java.lang.Object").unwrap();
    let widget = all.iter().position(|n| n == "lib.Widget").unwrap();
    assert!(object < widget);
}

#[test]
fn generation_tracks_library_changes() {
    let library = ClassLibrary::new();
    let start = library.generation();
    library.add_source(Box::new(JdkSource::new()));
    assert!(library.generation() > start);
    let after_source = library.generation();
    assert_eq!(library.register_all(Vec::<String>::new()), 0);
    assert_eq!(library.generation(), after_source);
    assert_eq!(library.register_all(["a.B", "a.C"]), 2);
    assert_eq!(library.generation(), after_source + 1);
}

#[test]
fn project_resolves_against_configured_classpath() {
    let dir = sample_classpath();
    let classpath = dir.path().to_string_lossy().to_string();
    let mut project = JavaProject::with_config(Config::default().with_classpath(classpath));
    project
        .add_source("package app; import lib.*; import lib.Gadget.*; class Main { Widget w; Part p; }")
        .unwrap();
    let main = class_named(&project, "app.Main");
    let w = &project.field(field_named(&project, main, "w")).type_ref;
    let p = &project.field(field_named(&project, main, "p")).type_ref;
    assert_eq!(project.fully_qualified_name(w).as_deref(), Some("lib.Widget"));
    assert_eq!(project.fully_qualified_name(p).as_deref(), Some("lib.Gadget$Part"));
}

#[test]
fn project_without_jdk_defaults_leaves_jdk_names_unresolved() {
    let mut project = JavaProject::with_config(Config::default().with_jdk_defaults(false));
    project.add_source("class C { String s; }").unwrap();
    let c = class_named(&project, "C");
    let s = &project.field(field_named(&project, c, "s")).type_ref;
    assert_eq!(project.fully_qualified_name(s), None);
    assert_eq!(project.value(s), "String");
}

#[test]
fn classpath_priority() {
    let original = env::var("CLASSPATH").ok();
    let original_own = env::var("JAVAMODEL_CLASSPATH").ok();

    env::set_var("CLASSPATH", "/env/path");
    env::set_var("JAVAMODEL_CLASSPATH", "/own/path");
    assert_eq!(ClasspathResolver::resolve_classpath(Some("/cmd/cp")).as_deref(), Some("/cmd/cp"));
    assert_eq!(ClasspathResolver::resolve_classpath(None).as_deref(), Some("/env/path"));

    env::remove_var("CLASSPATH");
    assert_eq!(ClasspathResolver::resolve_classpath(None).as_deref(), Some("/own/path"));
    assert_eq!(Config::from_env().classpath.as_deref(), Some("/own/path"));

    env::remove_var("JAVAMODEL_CLASSPATH");
    assert_eq!(ClasspathResolver::resolve_classpath(None), None);

    match original {
        Some(cp) => env::set_var("CLASSPATH", cp),
        None => env::remove_var("CLASSPATH"),
    }
    match original_own {
        Some(cp) => env::set_var("JAVAMODEL_CLASSPATH", cp),
        None => env::remove_var("JAVAMODEL_CLASSPATH"),
    }
}
