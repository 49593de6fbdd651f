//! The `Pith` driver: ties lexer, parser, and interpreter together behind
//! one entry point, analogous to the teacher's `Bash` struct
//! (`examples/arthur-zhang-just-bash/src/bash.rs`) wrapping its own
//! parser/interpreter/filesystem. Unlike `Bash::exec`, a `Pith` run is
//! synchronous (spec §5: single-threaded) and persists its global scope
//! across calls, which is what lets the interactive REPL and the `-i`
//! hybrid mode (spec §6) keep previously defined variables and functions
//! alive between runs.

use crate::diagnostics::{self, Reporter};
use crate::interpreter::exec::exec_block;
use crate::interpreter::Interpreter;
use crate::loader::SourceLoader;
use crate::parser;

pub struct Pith {
    pub interp: Interpreter,
}

impl Pith {
    pub fn new(loader: Box<dyn SourceLoader>) -> Self {
        Self { interp: Interpreter::new(loader) }
    }

    /// Lexes, parses, and executes `source` against the persistent global
    /// scope. A lex/parse error or a runtime `PithError` is forwarded to
    /// `reporter` and the run stops; prior global bindings are left
    /// intact either way. Returns `true` if the run completed with no
    /// error reported.
    pub fn run(&mut self, source: &str, reporter: &mut dyn Reporter) -> bool {
        let program = match parser::parse(source) {
            Ok(p) => p,
            Err(e) => {
                reporter.report(e.line, &e.message);
                return false;
            }
        };

        let mut scope = self.interp.global;
        match exec_block(&mut self.interp, &program.statements, &mut scope) {
            Ok(_) => {
                self.interp.global = scope;
                true
            }
            Err(err) => {
                self.interp.global = scope;
                diagnostics::report_error(reporter, &err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingReporter;
    use crate::loader::MapLoader;

    #[test]
    fn global_bindings_persist_across_runs() {
        let mut pith = Pith::new(Box::new(MapLoader::default()));
        let mut reporter = CollectingReporter::default();
        assert!(pith.run("int x = 1\n", &mut reporter));
        assert!(pith.run("print(x)\n", &mut reporter));
        assert!(reporter.diagnostics.is_empty());
    }

    #[test]
    fn runtime_error_is_reported_and_does_not_panic() {
        let mut pith = Pith::new(Box::new(MapLoader::default()));
        let mut reporter = CollectingReporter::default();
        assert!(!pith.run("print(undefined_name)\n", &mut reporter));
        assert_eq!(reporter.diagnostics.len(), 1);
    }

    #[test]
    fn parse_error_is_reported() {
        let mut pith = Pith::new(Box::new(MapLoader::default()));
        let mut reporter = CollectingReporter::default();
        assert!(!pith.run("if\n", &mut reporter));
        assert_eq!(reporter.diagnostics.len(), 1);
    }
}
