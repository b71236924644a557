mod common;

use common::events;
use javamodel::parser::defs::{AnnotationValueDef, ClassKind, TypeArgDef};
use javamodel::parser::{record_source, BuilderEvent, ParseError};

fn fields(events: &[BuilderEvent]) -> Vec<javamodel::parser::defs::FieldDef> {
    events
        .iter()
        .filter_map(|e| match e {
            BuilderEvent::BeginField(def) => Some(def.clone()),
            _ => None,
        })
        .collect()
}

fn methods(events: &[BuilderEvent]) -> Vec<javamodel::parser::defs::MethodDef> {
    events
        .iter()
        .filter_map(|e| match e {
            BuilderEvent::EndMethod(def) | BuilderEvent::EndConstructor(def) => Some(def.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn begin_end_calls_are_balanced() {
    let source = r#"
class Outer {
    int a;
    class Inner {
        void m(int x) {}
    }
    enum Color { RED { void f() {} }, GREEN }
}
"#;
    let mut depth = 0i32;
    let mut max_depth = 0;
    for event in events(source) {
        match event {
            BuilderEvent::BeginClass(_) => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            BuilderEvent::EndClass => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
    assert_eq!(max_depth, 3);
}

#[test]
fn multi_variable_field_gets_per_declarator_dimensions() {
    let fields = fields(&events("class C { T a, b[]; }"));
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "a");
    assert_eq!(fields[0].dimensions(), 0);
    assert_eq!(fields[1].name, "b");
    assert_eq!(fields[1].dimensions(), 1);
    assert!(fields.iter().all(|f| f.type_def.name == "T"));
}

#[test]
fn nested_generic_field_type() {
    let fields = fields(&events("class C { List<List<String>> x; }"));
    let outer = &fields[0].type_def;
    assert_eq!(outer.name, "List");
    match &outer.args[0] {
        TypeArgDef::Type(inner) => {
            assert_eq!(inner.name, "List");
            match &inner.args[0] {
                TypeArgDef::Type(leaf) => assert_eq!(leaf.name, "String"),
                other => panic!("unexpected argument {:?}", other),
            }
        }
        other => panic!("unexpected argument {:?}", other),
    }
}

#[test]
fn wildcard_arguments() {
    let fields = fields(&events("class C { Map<? extends Number, ?> m; }"));
    let args = &fields[0].type_def.args;
    assert_eq!(args.len(), 2);
    assert!(matches!(&args[0], TypeArgDef::Wildcard(w) if w.bound.is_some()));
    assert!(matches!(&args[1], TypeArgDef::Wildcard(w) if w.bound.is_none()));
}

#[test]
fn unnamed_annotation_value_is_stored_as_value() {
    let events = events("@Foo(1) class C {}");
    let annotation = events
        .iter()
        .find_map(|e| match e {
            BuilderEvent::Annotation(def) => Some(def.clone()),
            _ => None,
        })
        .expect("annotation event");
    assert_eq!(annotation.type_def.name, "Foo");
    assert_eq!(annotation.values.len(), 1);
    assert_eq!(
        annotation.values.get("value"),
        Some(&AnnotationValueDef::Constant("1".to_string()))
    );
}

#[test]
fn annotation_values_of_every_shape() {
    let source = r#"@Spec(name = "x", types = {String.class, int[].class}, nested = @Inner, expr = 1 + 2)
class C {}"#;
    let events = events(source);
    let annotation = events
        .iter()
        .find_map(|e| match e {
            BuilderEvent::Annotation(def) => Some(def.clone()),
            _ => None,
        })
        .unwrap();
    let keys: Vec<&str> = annotation.values.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "types", "nested", "expr"]);
    assert!(matches!(annotation.values["types"], AnnotationValueDef::Array(ref items) if items.len() == 2));
    assert!(matches!(annotation.values["nested"], AnnotationValueDef::Annotation(_)));
    assert_eq!(
        annotation.values["expr"],
        AnnotationValueDef::Expression("1 + 2".to_string())
    );
}

#[test]
fn annotation_precedes_the_declaration_it_belongs_to() {
    let events = events("class C { @Deprecated int x; }");
    let annotation = events.iter().position(|e| matches!(e, BuilderEvent::Annotation(_))).unwrap();
    let field = events.iter().position(|e| matches!(e, BuilderEvent::BeginField(_))).unwrap();
    assert_eq!(field, annotation + 1);
}

#[test]
fn annotations_repeat_for_each_declarator() {
    let events = events("class C { @Inject A a, b; }");
    let count = events.iter().filter(|e| matches!(e, BuilderEvent::Annotation(_))).count();
    assert_eq!(count, 2);
}

#[test]
fn javadoc_and_tags_are_announced_before_the_method() {
    let source = r#"
class C {
    /**
     * Adds numbers.
     * @param a first
     * @return sum
     */
    int add(int a) { return a; }
}
"#;
    let events = events(source);
    let doc = events.iter().position(|e| matches!(e, BuilderEvent::JavaDoc(_))).unwrap();
    let begin = events.iter().position(|e| matches!(e, BuilderEvent::BeginMethod)).unwrap();
    assert!(doc < begin);
    match &events[doc] {
        BuilderEvent::JavaDoc(text) => assert_eq!(text, "Adds numbers."),
        _ => unreachable!(),
    }
    let tags: Vec<(String, String)> = events
        .iter()
        .filter_map(|e| match e {
            BuilderEvent::JavaDocTag(tag) => Some((tag.name.clone(), tag.value.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        tags,
        vec![
            ("param".to_string(), "a first".to_string()),
            ("return".to_string(), "sum".to_string())
        ]
    );
}

#[test]
fn method_details() {
    let source = r#"
class C {
    public <T extends Comparable<T>> T max(T a, T... rest) throws IllegalStateException {
        return a;
    }
    abstract int[] values();
}
"#;
    let methods = methods(&events(source));
    assert_eq!(methods.len(), 2);
    let max = &methods[0];
    assert_eq!(max.name, "max");
    assert_eq!(max.modifiers, vec!["public"]);
    assert_eq!(max.type_parameters[0].name, "T");
    assert_eq!(max.type_parameters[0].bounds[0].name, "Comparable");
    assert_eq!(max.exceptions[0].name, "IllegalStateException");
    assert!(max.body.as_deref().unwrap().contains("return a;"));

    let values = &methods[1];
    assert_eq!(values.return_type.as_ref().unwrap().dimensions, 1);
    assert!(values.body.is_none());
}

#[test]
fn dimensions_after_parameters_add_to_the_return_type() {
    let source = "abstract class A { int f()[] { return null; } int[] g()[]; int[] a[], b; }";
    let events = events(source);
    let methods = methods(&events);
    assert_eq!(methods[0].name, "f");
    assert_eq!(methods[0].return_type.as_ref().unwrap().dimensions, 1);
    assert_eq!(methods[1].name, "g");
    assert_eq!(methods[1].return_type.as_ref().unwrap().dimensions, 2);
    assert!(methods[1].body.is_none());

    let fields = fields(&events);
    assert_eq!(fields[0].dimensions(), 2);
    assert_eq!(fields[1].dimensions(), 1);
}

#[test]
fn dimensions_after_constructor_parameters_are_rejected() {
    assert!(record_source("class A { A()[] {} }").is_err());
}

#[test]
fn stray_semicolons_between_type_declarations() {
    let events = events("package p; ; class A {} ; class B {};");
    let names: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            BuilderEvent::BeginClass(def) => Some(def.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn parameters_arrive_inside_the_method() {
    let events = events("class C { void m(final int a, String... b) {} }");
    let begin = events.iter().position(|e| matches!(e, BuilderEvent::BeginMethod)).unwrap();
    let params: Vec<_> = events
        .iter()
        .enumerate()
        .filter_map(|(i, e)| match e {
            BuilderEvent::Parameter(def) => Some((i, def.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(params.len(), 2);
    assert!(params.iter().all(|(i, _)| *i > begin));
    assert_eq!(params[0].1.modifiers, vec!["final"]);
    assert!(params[1].1.varargs);
}

#[test]
fn receiver_parameter_is_ignored() {
    let events = events("class C { void m(C this, int x) {} }");
    let count = events.iter().filter(|e| matches!(e, BuilderEvent::Parameter(_))).count();
    assert_eq!(count, 1);
}

#[test]
fn annotation_type_element_default() {
    let methods = methods(&events("@interface Ann { String name() default \"none\"; }"));
    assert_eq!(methods[0].default_value.as_deref(), Some("\"none\""));
}

#[test]
fn enum_constant_with_body_opens_a_synthetic_class() {
    let source = r#"enum Op { PLUS("+") { int apply(int a) { return a; } }, MINUS("-"); Op(String s) {} }"#;
    let events = events(source);
    let classes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BuilderEvent::BeginClass(def) => Some(def.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].kind, ClassKind::Enum);
    assert!(classes[1].enum_constant_body);
    assert_eq!(classes[1].name, "PLUS");
    assert_eq!(classes[1].extends[0].name, "Op");

    let constants = fields(&events);
    assert_eq!(constants.len(), 2);
    assert!(constants.iter().all(|f| f.enum_constant));
    assert_eq!(constants[0].args, vec!["\"+\""]);
}

#[test]
fn initializer_blocks() {
    let events = events("class C { static { init(); } { count++; } }");
    let inits: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BuilderEvent::Initializer(def) => Some(def.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(inits.len(), 2);
    assert!(inits[0].is_static);
    assert!(!inits[1].is_static);
    assert!(inits[1].body.contains("count++;"));
}

#[test]
fn interface_extends_several_types() {
    let events = events("interface I extends A, B<String> {}");
    match &events[0] {
        BuilderEvent::BeginClass(def) => {
            assert_eq!(def.kind, ClassKind::Interface);
            assert_eq!(def.extends.len(), 2);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn imports_are_reported_in_order() {
    let events = events("package p.q;\nimport java.util.*;\nimport static java.lang.Math.max;\nclass C {}");
    match &events[0] {
        BuilderEvent::Package(def) => assert_eq!(def.name, "p.q"),
        other => panic!("unexpected event {:?}", other),
    }
    match (&events[1], &events[2]) {
        (BuilderEvent::Import(first), BuilderEvent::Import(second)) => {
            assert!(first.is_wildcard);
            assert_eq!(first.to_import_string(), "java.util.*");
            assert!(second.is_static);
            assert_eq!(second.to_import_string(), "static java.lang.Math.max");
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[test]
fn module_declaration() {
    let source = r#"
open module com.example.app {
    requires transitive java.sql;
    requires static lombok;
    requires transitive;
    exports com.example.api to other.mod, third.mod;
    uses com.example.spi.Plugin;
    provides com.example.spi.Plugin with com.example.impl.PluginImpl;
}
"#;
    let events = events(source);
    match &events[0] {
        BuilderEvent::Module(def) => {
            assert_eq!(def.name, "com.example.app");
            assert!(def.open);
        }
        other => panic!("unexpected event {:?}", other),
    }
    let requires: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BuilderEvent::Requires(def) => Some(def.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(requires.len(), 3);
    assert_eq!(requires[0].modifiers, vec!["transitive"]);
    assert_eq!(requires[1].modifiers, vec!["static"]);
    assert_eq!(requires[2].name, "transitive");
    assert!(requires[2].modifiers.is_empty());
    assert!(events.iter().any(|e| matches!(e, BuilderEvent::Exports(def) if def.targets.len() == 2)));
    assert!(events.iter().any(|e| matches!(e, BuilderEvent::Provides(def) if def.implementations.len() == 1)));
}

#[test]
fn syntax_error_reports_position() {
    let err = record_source("class C {\n  int x\n}").unwrap_err();
    assert_eq!(err.line(), 3);
    assert!(!err.message().is_empty());
}

#[test]
fn missing_closing_brace_is_end_of_input() {
    let err = record_source("class C {").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. } | ParseError::UnexpectedToken { .. }));
}
