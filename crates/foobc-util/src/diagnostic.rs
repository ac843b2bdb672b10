//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! Phases report into a shared [`Handler`] and keep going where recovery is
//! cheap; the driver checks [`Handler::has_errors`] after each phase and
//! aborts the pipeline on the first phase that produced errors.
//!
//! # Examples
//!
//! ```
//! use foobc_util::{Handler, Span};
//!
//! let handler = Handler::new();
//! handler.error("unexpected token", Span::new(1, 5));
//!
//! assert!(handler.has_errors());
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::Span;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents compilation.
    Error,
    /// A warning that doesn't prevent compilation.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with severity and location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Main diagnostic message.
    pub message: String,
    /// Source location.
    pub span: Span,
    /// Extra hint lines printed under the message.
    pub hints: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            hints: Vec::new(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Attach a hint line.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_dummy() {
            write!(f, "{}: {}", self.level, self.message)?;
        } else {
            write!(f, "{} at {}: {}", self.level, self.span, self.message)?;
        }
        for hint in &self.hints {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

/// Collects diagnostics emitted during a compilation.
///
/// The handler is shared by reference between phases; interior mutability
/// lets the lexer and parser report without threading `&mut` through every
/// recursive call.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new, empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Record an error at the given location.
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::error(message, span));
    }

    /// Record a warning at the given location.
    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::warning(message, span));
    }

    /// Returns true if any error-level diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics recorded.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Drain all recorded diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Print every recorded diagnostic to stderr, in emission order.
    pub fn print_to_stderr(&self) {
        for diag in self.diagnostics.borrow().iter() {
            eprintln!("{}", diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_starts_clean() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        assert_eq!(handler.error_count(), 0);
    }

    #[test]
    fn test_error_is_counted() {
        let handler = Handler::new();
        handler.error("boom", Span::new(2, 3));
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_warning_is_not_an_error() {
        let handler = Handler::new();
        handler.warning("careful", Span::DUMMY);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_take_drains() {
        let handler = Handler::new();
        handler.error("one", Span::new(1, 1));
        handler.error("two", Span::new(2, 1));
        let drained = handler.take();
        assert_eq!(drained.len(), 2);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_display_includes_span_and_hint() {
        let diag = Diagnostic::error("expected semicolon", Span::new(4, 9))
            .with_hint("Did you forget a semicolon (;) at the end of the statement?");
        let text = format!("{}", diag);
        assert!(text.contains("4:9"));
        assert!(text.contains("hint:"));
    }
}
