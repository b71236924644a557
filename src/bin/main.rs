use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::{Context, Result};
use javamodel::library::ClasspathResolver;
use javamodel::model::ClassId;
use javamodel::{Config, JavaProject};
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "javamodel")]
#[command(about = "Java source declaration model explorer")]
#[command(version)]
struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a source file and list its declarations
    Parse {
        /// Input source file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Classpath entries to resolve against (repeatable)
        #[arg(long, value_name = "CP")]
        classpath: Vec<String>,

        /// Show member signatures and resolved types
        #[arg(short, long)]
        detailed: bool,
    },

    /// Lexically analyze a source file
    Lex {
        /// Input source file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Parse { input, classpath, detailed } => {
            parse_file(input, classpath, *detailed)?;
        }
        Commands::Lex { input, locations } => {
            lex_file(input, *locations)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_file(input: &PathBuf, classpath: &[String], detailed: bool) -> Result<()> {
    let config = if classpath.is_empty() {
        Config::from_env()
    } else {
        Config::default().with_classpath(ClasspathResolver::combine_classpaths(classpath))
    };
    config.validate()?;
    let mut project = JavaProject::with_config(config);
    project
        .add_source_file(input)
        .with_context(|| format!("parsing {}", input.display()))?;

    let ids: Vec<ClassId> = project.classes().map(|(id, _)| id).collect();
    for id in ids {
        print_class(&project, id, detailed);
    }

    Ok(())
}

fn print_class(project: &JavaProject, id: ClassId, detailed: bool) {
    let class = project.class(id);
    print!("{} {}", class.kind.keyword(), class.binary_name);
    if let Some(superclass) = &class.superclass {
        print!(" extends {}", project.value(superclass));
    }
    if !class.interfaces.is_empty() {
        let names: Vec<String> = class.interfaces.iter().map(|i| project.value(i)).collect();
        let keyword = if class.is_interface() { "extends" } else { "implements" };
        print!(" {} {}", keyword, names.join(", "));
    }
    println!();

    for field in project.fields(id, false) {
        let declared = project.field(field.id());
        if detailed {
            println!(
                "  field {}: {} (line {})",
                declared.name,
                project.member_field_type(field),
                declared.line
            );
        } else {
            println!("  field {}", declared.name);
        }
    }
    for &ctor in &class.constructors {
        println!("  constructor {}", project.method(ctor).declaration_signature(detailed));
    }
    for method in project.methods(id, false) {
        let declared = project.method(method.id());
        if detailed {
            let returns = project
                .member_return_type(method)
                .map(|t| t.to_string())
                .unwrap_or_default();
            println!(
                "  method {} -> {} (line {})",
                declared.declaration_signature(true),
                returns,
                declared.line
            );
        } else {
            println!("  method {}", declared.declaration_signature(false));
        }
    }
}

fn lex_file(input: &PathBuf, locations: bool) -> Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let lexer = javamodel::parser::Lexer::new(&source);
    let tokens = lexer.tokenize().map_err(|e| anyhow::anyhow!("Lexical error: {}", e))?;

    for token in tokens {
        if locations {
            println!("{:?} at {}:{}", token.token_type(), token.location().line, token.location().column);
        } else {
            println!("{:?}: '{}'", token.token_type(), token.lexeme());
        }
    }

    Ok(())
}
