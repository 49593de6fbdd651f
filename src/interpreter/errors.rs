//! Error kinds distinguished by the core evaluator (spec §7).
//!
//! One struct with a kind tag rather than one `thiserror` variant per
//! category, since every kind shares the exact same user-visible format
//! (`[line N] Error: message`) — matching the teacher's `ShellError`
//! in `examples/arthur-zhang-just-bash/src/interpreter/errors.rs`, which
//! also carries a single formatted message rather than fanning out into a
//! deep variant tree.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntactic,
    Name,
    Type,
    Bounds,
    Arithmetic,
    /// Allocator failure or temporary-root-stack overflow; spec §7 marks
    /// both fatal.
    Resource,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("[line {line}] Error: {message}")]
pub struct PithError {
    pub kind: ErrorKind,
    pub line: u32,
    pub message: String,
}

impl PithError {
    pub fn new(kind: ErrorKind, line: u32, message: impl Into<String>) -> Self {
        Self { kind, line, message: message.into() }
    }

    pub fn lexical(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Lexical, line, message)
    }

    pub fn syntactic(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntactic, line, message)
    }

    pub fn name_error(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Name, line, message)
    }

    pub fn type_error(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, line, message)
    }

    pub fn bounds(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Bounds, line, message)
    }

    pub fn arithmetic(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Arithmetic, line, message)
    }

    pub fn resource(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resource, line, message)
    }
}
