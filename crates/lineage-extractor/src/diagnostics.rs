//! Non-fatal extraction diagnostics

use std::fmt;

/// Category of a recoverable extraction problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// A referenced file does not exist
    MissingSource,
    /// An anchor or comment marker could not be located
    SectionNotFound,
    /// No index entry matched a reference
    LinkUnresolved,
    /// A metric recurs along its own recursion path
    CircularReference,
    /// A formula link whose referent type could not be determined
    UnclassifiedReference,
}

impl DiagnosticKind {
    /// All kinds, in reporting order
    pub const ALL: [DiagnosticKind; 5] = [
        DiagnosticKind::MissingSource,
        DiagnosticKind::SectionNotFound,
        DiagnosticKind::LinkUnresolved,
        DiagnosticKind::CircularReference,
        DiagnosticKind::UnclassifiedReference,
    ];

    /// Short label
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingSource => "missing-source",
            DiagnosticKind::SectionNotFound => "section-not-found",
            DiagnosticKind::LinkUnresolved => "link-unresolved",
            DiagnosticKind::CircularReference => "circular-reference",
            DiagnosticKind::UnclassifiedReference => "unclassified-reference",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable problem, logged and counted but never returned as an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category
    pub kind: DiagnosticKind,
    /// What was being looked for
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
