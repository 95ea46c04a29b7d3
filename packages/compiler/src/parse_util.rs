//! Source positions and spans carried by every template AST node.
//!
//! The compiler never re-reads the template text; all error rendering and
//! source-map emission works off the spans the parser attached to the AST.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseSourceFile {
    pub content: String,
    pub url: String,
}

impl ParseSourceFile {
    pub fn new(content: String, url: String) -> Self {
        ParseSourceFile { content, url }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseLocation {
    pub file: ParseSourceFile,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(file: ParseSourceFile, offset: usize, line: usize, col: usize) -> Self {
        ParseLocation {
            file,
            offset,
            line,
            col,
        }
    }

    /// Return the source around the location,
    /// up to `max_chars` or `max_lines` on each side of it.
    pub fn get_context(&self, max_chars: usize, max_lines: usize) -> Option<(String, String)> {
        let content = &self.file.content;
        if content.is_empty() {
            return None;
        }

        let mut start_offset = self.offset.min(content.len().saturating_sub(1));
        let mut end_offset = start_offset;
        let mut ctx_chars = 0;
        let mut ctx_lines = 0;

        while ctx_chars < max_chars && start_offset > 0 {
            start_offset -= 1;
            ctx_chars += 1;
            if content.as_bytes()[start_offset] == b'\n' {
                ctx_lines += 1;
                if ctx_lines >= max_lines {
                    break;
                }
            }
        }

        ctx_chars = 0;
        ctx_lines = 0;
        while ctx_chars < max_chars && end_offset < content.len().saturating_sub(1) {
            end_offset += 1;
            ctx_chars += 1;
            if content.as_bytes()[end_offset] == b'\n' {
                ctx_lines += 1;
                if ctx_lines >= max_lines {
                    break;
                }
            }
        }

        let anchor = self.offset.min(content.len());
        Some((
            content[start_offset..anchor].to_string(),
            content[anchor..=end_offset].to_string(),
        ))
    }
}

impl std::fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.file.url, self.line, self.col)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
    pub details: Option<String>,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan {
            start,
            end,
            details: None,
        }
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }

    /// The source text covered by the span.
    pub fn text(&self) -> &str {
        &self.start.file.content[self.start.offset..self.end.offset]
    }
}

/// Make an arbitrary template name usable as part of a JS identifier.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> ParseSourceFile {
        ParseSourceFile::new("<div>\n  {foo}\n</div>".to_string(), "app.html".to_string())
    }

    #[test]
    fn location_renders_context_around_offset() {
        let loc = ParseLocation::new(file(), 8, 1, 2);
        let (before, after) = loc.get_context(100, 3).unwrap();
        assert!(before.ends_with("  "));
        assert!(after.starts_with("{foo}"));
    }

    #[test]
    fn sanitize_replaces_non_identifier_chars() {
        assert_eq!(sanitize_identifier("my-widget.2"), "my_widget_2");
    }
}
