//! Template-to-JavaScript compiler.
//!
//! Takes a parsed template [`Program`](template::ast::Program) and produces
//! an ES module whose default export mounts the template into a host
//! component, plus optional update and unmount functions and a v3 source
//! map. The generated code targets the runtime module configured in
//! [`CompileOptions`]; every runtime symbol, helper and component import it
//! relies on is emitted in the module prologue.

pub mod codegen;
pub mod error;
pub mod expression;
pub mod options;
pub mod output;
pub mod parse_util;
pub mod template;
pub mod util;
pub mod visitor;

pub use error::{CompileError, CompileWarning, Result};
pub use options::CompileOptions;
pub use output::SourceMap;
pub use template::ast::Program;

use codegen::state::CompileState;
use output::{Chunk, EmitterContext};
use util::quote_object_key;

/// The result of a successful compilation.
#[derive(Debug)]
pub struct CompileResult {
    /// Generated ES module source.
    pub code: String,
    /// v3 source map for `code`; `None` when nothing maps back to the
    /// template source.
    pub map: Option<SourceMap>,
    /// Soft diagnostics collected along the way, deduplicated.
    pub warnings: Vec<CompileWarning>,
}

/// Compile a parsed template into a JS module.
pub fn compile(program: &Program, options: CompileOptions) -> Result<CompileResult> {
    let mut state = CompileState::new(options);
    visitor::compile_template(&mut state, program)?;

    let mut sections: Vec<Chunk> = Vec::new();
    let imports = import_section(&state);
    if !imports.is_empty() {
        sections.push(imports);
    }

    let ns_consts = state.namespace_constants();
    if !ns_consts.is_empty() {
        let mut chunk = Chunk::new();
        for (i, (symbol, uri)) in ns_consts.iter().enumerate() {
            if i > 0 {
                chunk.newline();
            }
            chunk.push_text(format!("const {} = {};", symbol, util::quote_string(uri)));
        }
        sections.push(chunk);
    }

    if let Some(chunk) = partials_section(&state) {
        sections.push(chunk);
    }
    sections.append(&mut state.output);

    let mut emitter = EmitterContext::new(state.options.indent.clone());
    for (i, chunk) in sections.iter().enumerate() {
        if i > 0 {
            emitter.println(None, "");
        }
        emitter.print_chunk(chunk);
        emitter.println(None, "");
    }

    let code = emitter.to_source();
    let gen_file = format!("{}.js", program.span.start.file.url);
    let map = emitter.to_source_map_generator(&gen_file).to_json();

    Ok(CompileResult {
        code,
        map,
        warnings: std::mem::take(&mut state.warnings),
    })
}

fn import_section(state: &CompileState) -> Chunk {
    let mut chunk = Chunk::new();
    if !state.used_runtime.is_empty() {
        let names = state
            .used_runtime
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        chunk.push_text(format!(
            "import {{ {} }} from \"{}\";",
            names, state.options.module
        ));
    }
    for (symbol, href) in state.component_imports() {
        if !chunk.is_empty() {
            chunk.newline();
        }
        chunk.push_text(format!("import {} from \"{}\";", symbol, href));
    }
    for (module, names) in &state.options.helpers {
        let used: Vec<&str> = names
            .iter()
            .filter(|name| state.used_helpers.contains(name.as_str()))
            .map(String::as_str)
            .collect();
        if used.is_empty() {
            continue;
        }
        if !chunk.is_empty() {
            chunk.newline();
        }
        chunk.push_text(format!(
            "import {{ {} }} from \"{}\";",
            used.join(", "),
            module
        ));
    }
    chunk
}

fn partials_section(state: &CompileState) -> Option<Chunk> {
    if state.partials.is_empty() {
        return None;
    }
    let mut chunk = Chunk::text(format!("const {} = {{", state.options.partials));
    chunk.indent();
    let last = state.partials.len() - 1;
    for (i, (name, decl)) in state.partials.iter().enumerate() {
        chunk.newline();
        chunk.push_text(format!("{}: {{", quote_object_key(name)));
        chunk.indent();
        chunk.newline();
        chunk.push_text(format!("body: {},", decl.block));
        chunk.newline();
        chunk.push_text("defaults: ");
        chunk.append(decl.defaults.clone());
        chunk.dedent();
        chunk.newline();
        chunk.push_text(if i == last { "}" } else { "}," });
    }
    chunk.dedent();
    chunk.newline();
    chunk.push_text("};");
    Some(chunk)
}
