//! Compile errors and warnings.
//!
//! Code generation fails fast: the first structural problem aborts the whole
//! compilation. Errors carry the offending node's span so the public boundary
//! can quote the source with a position marker. Component-lookalike tags that
//! were never imported only produce a deduplicated warning.

use crate::parse_util::ParseSourceSpan;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, Error)]
#[error("{}", self.render())]
pub struct CompileError {
    pub message: String,
    pub span: Option<ParseSourceSpan>,
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Option<&ParseSourceSpan>) -> Self {
        CompileError {
            message: message.into(),
            span: span.cloned(),
        }
    }

    pub fn at(message: impl Into<String>, span: &ParseSourceSpan) -> Self {
        Self::new(message, Some(span))
    }

    /// Render the error the way it is shown to the user: message, position,
    /// and a source snippet with a marker at the offending column.
    pub fn render(&self) -> String {
        let span = match &self.span {
            Some(span) => span,
            None => return self.message.clone(),
        };

        let mut out = format!("{} at {}", self.message, span.start);
        if let Some((before, after)) = span.start.get_context(100, 2) {
            out.push('\n');
            out.push_str(&before);
            out.push_str("[-->]");
            out.push_str(&after);
        }
        out
    }
}

/// A non-fatal diagnostic. Compilation continues and the generated code is
/// still usable; the construct that triggered the warning may only fail at
/// runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileWarning {
    pub message: String,
    pub span: Option<ParseSourceSpan>,
}
