//! Renders resolved chunks into source text and a source map.
//!
//! Each printed part keeps the source span of the template construct it was
//! generated from; `to_source_map_generator` replays those spans into
//! mappings without re-scanning the emitted text.

use crate::output::chunk::{Chunk, Part};
use crate::output::source_map::SourceMapGenerator;
use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone)]
struct EmittedLine {
    parts_length: usize,
    parts: Vec<String>,
    src_spans: Vec<Option<ParseSourceSpan>>,
    indent: usize,
}

impl EmittedLine {
    fn new(indent: usize) -> Self {
        EmittedLine {
            parts_length: 0,
            parts: Vec::new(),
            src_spans: Vec::new(),
            indent,
        }
    }
}

pub struct EmitterContext {
    lines: Vec<EmittedLine>,
    indent: usize,
    indent_with: String,
}

impl EmitterContext {
    pub fn new(indent_with: impl Into<String>) -> Self {
        EmitterContext {
            lines: vec![EmittedLine::new(0)],
            indent: 0,
            indent_with: indent_with.into(),
        }
    }

    fn current_line_mut(&mut self) -> &mut EmittedLine {
        self.lines.last_mut().unwrap()
    }

    pub fn line_is_empty(&self) -> bool {
        self.lines.last().unwrap().parts.is_empty()
    }

    pub fn print(&mut self, span: Option<&ParseSourceSpan>, part: &str, new_line: bool) {
        if !part.is_empty() {
            let current = self.current_line_mut();
            current.parts.push(part.to_string());
            current.parts_length += part.len();
            current.src_spans.push(span.cloned());
        }
        if new_line {
            let indent = self.indent;
            self.lines.push(EmittedLine::new(indent));
        }
    }

    pub fn println(&mut self, span: Option<&ParseSourceSpan>, part: &str) {
        self.print(span, part, true);
    }

    pub fn inc_indent(&mut self) {
        self.indent += 1;
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    /// Print a fully resolved chunk. Deferred symbol parts are a caller bug
    /// at this point; blocks resolve them before handing chunks over.
    pub fn print_chunk(&mut self, chunk: &Chunk) {
        for part in chunk.parts() {
            match part {
                Part::Text(text) => self.print(None, text, false),
                Part::Spanned { text, span } => self.print(Some(span), text, false),
                Part::Symbol { .. } => {
                    debug_assert!(false, "unresolved symbol part reached the emitter");
                }
                Part::Newline => self.println(None, ""),
                Part::Indent => self.inc_indent(),
                Part::Dedent => self.dec_indent(),
            }
        }
    }

    pub fn to_source(&self) -> String {
        self.lines
            .iter()
            .map(|l| {
                if !l.parts.is_empty() {
                    format!("{}{}", self.indent_with.repeat(l.indent), l.parts.join(""))
                } else {
                    String::new()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_source_map_generator(&self, gen_file_path: &str) -> SourceMapGenerator {
        let mut map = SourceMapGenerator::new(Some(gen_file_path.to_string()));

        let mut first_offset_mapped = false;
        let mut last_file_url: Option<String> = None;
        let mut last_line: Option<usize> = None;
        let mut last_col: Option<usize> = None;

        let effective_len = if !self.lines.is_empty() && self.lines.last().unwrap().parts.is_empty()
        {
            self.lines.len() - 1
        } else {
            self.lines.len()
        };

        for line in &self.lines[0..effective_len] {
            map.add_line();
            let mut col0 = line.indent * self.indent_with.len();

            for (i, part) in line.parts.iter().enumerate() {
                if !first_offset_mapped {
                    let has_span = line.src_spans.get(i).and_then(|s| s.as_ref()).is_some();
                    if !has_span || col0 > 0 {
                        // Add a single space so that tools won't try to load the file from disk.
                        map.add_source(gen_file_path.to_string(), Some(" ".to_string()));
                        let _ =
                            map.add_mapping(0, Some(gen_file_path.to_string()), Some(0), Some(0));
                        last_file_url = Some(gen_file_path.to_string());
                        last_line = Some(0);
                        last_col = Some(0);
                    }
                    first_offset_mapped = true;
                }

                if let Some(Some(span)) = line.src_spans.get(i) {
                    let url = span.start.file.url.clone();
                    let src_line = span.start.line;
                    let src_col = span.start.col;

                    // Coalesce identical spans
                    let is_identical = last_file_url.as_ref() == Some(&url)
                        && last_line == Some(src_line)
                        && last_col == Some(src_col);

                    if !is_identical {
                        map.add_source(url.clone(), Some(span.start.file.content.clone()));
                        let _ =
                            map.add_mapping(col0, Some(url.clone()), Some(src_line), Some(src_col));
                        last_file_url = Some(url);
                        last_line = Some(src_line);
                        last_col = Some(src_col);
                    }
                }
                col0 += part.len();
            }
        }

        map
    }
}
