//! Error types for command scripts

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::layout::LayoutError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Syntax error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    /// A gate reference that names nothing
    #[error("unknown gate reference '{name}'")]
    UnknownReference { span: Span, name: String },

    /// The layout refused the command
    #[error("{source}")]
    Rejected {
        span: Span,
        source: LayoutError,
        suggestions: Vec<String>,
    },

    /// A `check` found the layout in a state it must never reach
    #[error("layout check failed: {detail}")]
    Inconsistent { span: Span, detail: String },
}

impl ScriptError {
    pub fn span(&self) -> &Span {
        match self {
            ScriptError::Syntax { span, .. }
            | ScriptError::UnknownReference { span, .. }
            | ScriptError::Rejected { span, .. }
            | ScriptError::Inconsistent { span, .. } => span,
        }
    }

    /// Whether this is a layout rejection rather than a broken script
    pub fn is_rejection(&self) -> bool {
        matches!(self, ScriptError::Rejected { .. })
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let (kind, color, note) = match self {
            ScriptError::Syntax { expected, .. } if !expected.is_empty() => (
                ReportKind::Error,
                Color::Red,
                Some(format!("Expected: {}", expected.join(", "))),
            ),
            ScriptError::Rejected {
                source: LayoutError::Blocked { .. },
                ..
            } => (ReportKind::Warning, Color::Yellow, None),
            ScriptError::Rejected { suggestions, .. } if !suggestions.is_empty() => (
                ReportKind::Error,
                Color::Red,
                Some(format!("Did you mean: {}?", suggestions.join(", "))),
            ),
            _ => (ReportKind::Error, Color::Red, None),
        };

        let message = self.to_string();
        let mut report = Report::build(kind, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(color),
            );
        if let Some(note) = note {
            report = report.with_note(note);
        }

        let mut buf = Vec::new();
        if report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .is_err()
        {
            return message;
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
