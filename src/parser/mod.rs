//! Parser module: lexing and grammar-driven emission of definition records.
//!
//! The parser builds nothing itself. Every construct it recognises is reported
//! through the [`Builder`] trait, which the model layer implements.

pub mod builder;
pub mod defs;
pub mod error;
pub mod javadoc;
pub mod lexer;
pub mod parser;
pub mod span;

pub use builder::{Builder, BuilderEvent, EventRecorder};
pub use error::{ParseError, ParseResult};
pub use lexer::{LexicalToken, Lexer, Token};
pub use parser::Parser;
pub use span::{Location, Span};

/// Parse one compilation unit, recording every builder call
pub fn record_source(source: &str) -> ParseResult<EventRecorder> {
    let mut recorder = EventRecorder::new();
    Parser::parse_source(source, &mut recorder)?;
    Ok(recorder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_class() {
        let source = r#"
package com.example;

public class HelloWorld {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

        let recorder = record_source(source).expect("Failed to parse");
        let classes = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, BuilderEvent::BeginClass(_)))
            .count();
        assert_eq!(classes, 1);
    }

    #[test]
    fn test_parse_with_imports() {
        let source = r#"
package com.example;

import java.util.List;
import java.util.ArrayList;

public class TestClass {
    private List<String> items = new ArrayList<>();
}
"#;

        let recorder = record_source(source).expect("Failed to parse");
        let imports = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, BuilderEvent::Import(_)))
            .count();
        assert_eq!(imports, 2);
    }
}
