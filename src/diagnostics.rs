//! Diagnostics collection for container loading and data table decoding.
//!
//! This module provides types for collecting and reporting diagnostic messages
//! during container parsing and descriptor decoding. Game data files in the wild
//! carry assets whose names cannot be recovered or whose attached descriptor
//! payloads fail calibration; such issues are reported here while loading
//! continues with the data that remains usable.
//!
//! The [`Diagnostics`] container uses `boxcar::Vec` for thread-safe, lock-free
//! append operations, so diagnostics can be collected from parallel decoding
//! without synchronization overhead.
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - Individual diagnostic entry with severity and context
//! - [`DiagnosticSeverity`] - Severity level (Info, Warning, Error)
//! - [`DiagnosticCategory`] - Category of the diagnostic source
//!
//! # Usage Examples
//!
//! ```rust
//! use dysonscope::diagnostics::{Diagnostics, DiagnosticCategory};
//! use std::sync::Arc;
//!
//! let diagnostics = Arc::new(Diagnostics::new());
//!
//! diagnostics.warning(
//!     DiagnosticCategory::NameRecovery,
//!     "Asset name at payload offset 0x40 failed plausibility checks",
//! );
//!
//! diagnostics.error(
//!     DiagnosticCategory::Calibration,
//!     "No descriptor layout consumed the 152-byte reference payload exactly",
//! );
//!
//! if diagnostics.has_errors() {
//!     println!("{}", diagnostics.summary());
//! }
//! ```

use std::fmt::{self, Write};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Informational message, not indicating a problem.
    Info,

    /// Warning about recoverable issues.
    ///
    /// The container can still be loaded, but some data may be missing,
    /// such as an asset whose name could not be recovered.
    Warning,

    /// Error indicating data that could not be decoded.
    ///
    /// Loading continues, but the affected asset or descriptor is
    /// unavailable.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Category indicating the source or type of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Issues with descriptor layout calibration.
    ///
    /// Examples: a reference payload no layout consumed exactly, a layout
    /// that decoded but failed plausibility checks.
    Calibration,

    /// Issues with asset name recovery.
    ///
    /// Examples: implausible length prefixes, control bytes in name data.
    NameRecovery,

    /// Issues with object reference resolution.
    ///
    /// Examples: a component pointer whose target path is absent from the
    /// directory, a script reference with no known descriptor layout.
    Resolution,

    /// General loading issues not fitting other categories.
    ///
    /// Examples: unexpected directory entries, truncated payload regions.
    General,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Calibration => write!(f, "Calibration"),
            DiagnosticCategory::NameRecovery => write!(f, "NameRecovery"),
            DiagnosticCategory::Resolution => write!(f, "Resolution"),
            DiagnosticCategory::General => write!(f, "General"),
        }
    }
}

/// A single diagnostic entry with context information.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional file offset where the issue was found.
    pub offset: Option<u64>,

    /// Optional directory path identifier of the affected asset.
    pub path_id: Option<i64>,

    /// Optional serialized class identifier of the affected asset.
    pub class_id: Option<i32>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            offset: None,
            path_id: None,
            class_id: None,
        }
    }

    /// Adds file offset information to the diagnostic.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Adds the affected asset's path identifier to the diagnostic.
    #[must_use]
    pub fn with_path_id(mut self, path_id: i64) -> Self {
        self.path_id = Some(path_id);
        self
    }

    /// Adds the affected asset's class identifier to the diagnostic.
    #[must_use]
    pub fn with_class_id(mut self, class_id: i32) -> Self {
        self.class_id = Some(class_id);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(offset) = self.offset {
            write!(f, " (offset: 0x{:08x})", offset)?;
        }

        if let Some(path_id) = self.path_id {
            write!(f, " (path: {})", path_id)?;
        }

        if let Some(class_id) = self.class_id {
            write!(f, " (class: {})", class_id)?;
        }

        Ok(())
    }
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations.
/// Multiple threads can safely add diagnostics simultaneously.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds an informational diagnostic.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Adds a warning diagnostic.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Adds an error diagnostic.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Adds a diagnostic entry directly.
    ///
    /// Use this for diagnostics that need additional context like
    /// offset, path or class information.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns true if any warning-level diagnostics have been collected.
    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Warning)
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Error)
            .count()
    }

    /// Returns the number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns all errors as a vector.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Error)
            .map(|(_, d)| d)
            .collect()
    }

    /// Returns all warnings as a vector.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Warning)
            .map(|(_, d)| d)
            .collect()
    }

    /// Returns diagnostics filtered by category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.category == category)
            .map(|(_, d)| d)
            .collect()
    }

    /// Formats a summary of all diagnostics for display.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let error_count = self.error_count();
        let warning_count = self.warning_count();

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s)",
            error_count, warning_count
        );

        if error_count > 0 {
            output.push_str("\nErrors:\n");
            for diag in self.errors() {
                let _ = writeln!(output, "  {diag}");
            }
        }

        if warning_count > 0 {
            output.push_str("\nWarnings:\n");
            for diag in self.warnings() {
                let _ = writeln!(output, "  {diag}");
            }
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn diagnostic_with_context() {
        let diag = Diagnostic::new(
            DiagnosticSeverity::Error,
            DiagnosticCategory::Calibration,
            "Layout mismatch",
        )
        .with_offset(0x1000)
        .with_path_id(42)
        .with_class_id(114);

        assert_eq!(diag.offset, Some(0x1000));
        assert_eq!(diag.path_id, Some(42));
        assert_eq!(diag.class_id, Some(114));

        let display = format!("{}", diag);
        assert!(display.contains("ERROR"));
        assert!(display.contains("Calibration"));
        assert!(display.contains("(path: 42)"));
        assert!(display.contains("(class: 114)"));
    }

    #[test]
    fn container_counts() {
        let diagnostics = Diagnostics::new();

        diagnostics.info(DiagnosticCategory::General, "Info message");
        diagnostics.warning(DiagnosticCategory::NameRecovery, "Warning message");
        diagnostics.error(DiagnosticCategory::Calibration, "Error message");

        assert_eq!(diagnostics.count(), 3);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.has_warnings());
        assert!(diagnostics.has_any());
    }

    #[test]
    fn filter_by_category() {
        let diagnostics = Diagnostics::new();

        diagnostics.error(DiagnosticCategory::Calibration, "Layout 1");
        diagnostics.error(DiagnosticCategory::Calibration, "Layout 2");
        diagnostics.warning(DiagnosticCategory::Resolution, "Dangling pointer");

        assert_eq!(
            diagnostics
                .by_category(DiagnosticCategory::Calibration)
                .len(),
            2
        );
        assert_eq!(
            diagnostics.by_category(DiagnosticCategory::Resolution).len(),
            1
        );
    }

    #[test]
    fn concurrent_append() {
        let diagnostics = Arc::new(Diagnostics::new());
        let mut handles = vec![];

        for i in 0..10 {
            let diag_clone = Arc::clone(&diagnostics);
            handles.push(thread::spawn(move || {
                diag_clone.warning(
                    DiagnosticCategory::General,
                    format!("Thread {} warning", i),
                );
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(diagnostics.count(), 10);
    }
}
