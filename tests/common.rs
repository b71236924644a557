// Common test utilities
#![allow(dead_code)]

use javamodel::model::{ClassId, FieldId, MethodId};
use javamodel::parser::{record_source, BuilderEvent};
use javamodel::{Config, JavaProject};

/// Project with the JDK names and every source added in order
pub fn project_with(sources: &[&str]) -> JavaProject {
    let mut project = JavaProject::new();
    for source in sources {
        project.add_source(source).expect("source should parse");
    }
    project
}

/// Project without any built-in names
pub fn bare_project() -> JavaProject {
    JavaProject::with_config(Config::default().with_jdk_defaults(false))
}

pub fn class_named(project: &JavaProject, name: &str) -> ClassId {
    project
        .class_by_name(name)
        .unwrap_or_else(|| panic!("class {} not found", name))
}

pub fn method_named(project: &JavaProject, class: ClassId, name: &str) -> MethodId {
    project
        .class(class)
        .methods
        .iter()
        .copied()
        .find(|m| project.method(*m).name == name)
        .unwrap_or_else(|| panic!("method {} not found", name))
}

pub fn field_named(project: &JavaProject, class: ClassId, name: &str) -> FieldId {
    project
        .class(class)
        .fields
        .iter()
        .copied()
        .find(|f| project.field(*f).name == name)
        .unwrap_or_else(|| panic!("field {} not found", name))
}

/// Builder calls the parser makes for `source`
pub fn events(source: &str) -> Vec<BuilderEvent> {
    record_source(source).expect("source should parse").into_events()
}
