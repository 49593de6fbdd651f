//! Error reporting (spec §7 "Diagnostics").
//!
//! The evaluator never decides how a `PithError` reaches the user; it
//! hands the error to a `Reporter`, matching spec §7's "reporter is
//! configurable" policy and the teacher's pattern of keeping error
//! *formatting* out of the interpreter core (`examples/arthur-zhang-just-bash/src/interpreter/errors.rs`
//! builds structured errors; `main.rs` decides how to print them).

use crate::interpreter::errors::PithError;

pub trait Reporter {
    fn report(&mut self, line: u32, message: &str);
}

/// Batch-mode reporter: prints `[line N] Error: message` to stderr as
/// each error arrives, per spec §7's diagnostic format.
#[derive(Default)]
pub struct PrintReporter {
    pub error_count: usize,
}

impl Reporter for PrintReporter {
    fn report(&mut self, line: u32, message: &str) {
        eprintln!("[line {}] Error: {}", line, message);
        self.error_count += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub message: String,
}

/// Interactive/test reporter: records every diagnostic instead of
/// printing it, so a REPL can keep running after an error and tests can
/// assert on exactly what was reported.
#[derive(Default)]
pub struct CollectingReporter {
    pub diagnostics: Vec<Diagnostic>,
}

impl Reporter for CollectingReporter {
    fn report(&mut self, line: u32, message: &str) {
        self.diagnostics.push(Diagnostic { line, message: message.to_string() });
    }
}

pub fn report_error(reporter: &mut dyn Reporter, err: &PithError) {
    reporter.report(err.line, &err.message);
}
