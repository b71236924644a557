//! javamodel
//!
//! Source-level parser and declaration model for Java-family sources.
//!
//! ## Architecture
//!
//! - **parser**: lexing and parsing of one compilation unit into a stream of
//!   definition records reported through the `Builder` trait
//! - **model**: the arena-backed semantic model and the `ModelBuilder` that folds
//!   builder calls into it
//! - **library**: the `ClassLibrary` name oracle and its sources (JDK names, classpath)
//! - **resolve**: lazy name resolution, generics substitution and inherited members
//! - **project**: `JavaProject`, the façade tying the pieces together
//!
//! ## Flow
//!
//! ```text
//! Source → Lexer → Parser → Builder calls → ModelBuilder → Model
//!                                                           ↓
//!                                  queries → Resolution (names, generics) ⇄ ClassLibrary
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod library;
pub mod model;
pub mod parser;
pub mod project;
pub mod resolve;

pub use config::{Config, ScopePrecedence};
pub use error::{Error, Result};
pub use library::{ClassLibrary, ClassSource, ClasspathSource, JdkSource};
pub use model::{
    ClassId, FieldId, JavaClass, JavaField, JavaMethod, JavaSource, JavaType, MethodId, Model,
    ModelBuilder, SourceId, TypeReference,
};
pub use project::JavaProject;
pub use resolve::Member;

/// Parse a single compilation unit into a fresh project
pub fn parse_source(source: &str) -> Result<JavaProject> {
    let mut project = JavaProject::new();
    project.add_source(source)?;
    Ok(project)
}
