//! pith - an indentation-sensitive, dynamically typed scripting language
//!
//! This crate provides a complete lexer, parser, and tree-walking
//! interpreter (with a mark-and-sweep garbage collector) for Pith.

pub mod ast;
pub mod diagnostics;
pub mod env;
pub mod heap;
pub mod interpreter;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod pith_env;
pub mod token;
pub mod value;

pub use diagnostics::{CollectingReporter, Diagnostic, PrintReporter, Reporter};
pub use interpreter::errors::{ErrorKind, PithError};
pub use interpreter::Interpreter;
pub use loader::{FsLoader, MapLoader, SourceLoader};
pub use parser::{parse, ParseError};
pub use pith_env::Pith;
pub use value::Value;
