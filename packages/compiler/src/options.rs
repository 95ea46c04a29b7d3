//! Compile options, consumed verbatim by the code generators.

use crate::error::CompileWarning;
use indexmap::IndexMap;

/// Callback invoked for every deduplicated soft warning.
pub type WarnCallback = Box<dyn Fn(&CompileWarning)>;

pub struct CompileOptions {
    /// Symbol for referencing the host component of the rendered template.
    pub host: String,
    /// Symbol for referencing the variable scope of the generated functions.
    pub scope: String,
    /// Symbol for referencing local partial definitions.
    pub partials: String,
    /// String to generate indentation with.
    pub indent: String,
    /// Prefix and suffix added to every generated symbol.
    pub prefix: String,
    pub suffix: String,
    /// Module path the runtime helpers are imported from.
    pub module: String,
    /// Component name the template is compiled for; used to disambiguate
    /// top-level symbols when several templates land in one bundle.
    pub component: Option<String>,
    /// CSS scoping token passed to element factories when set.
    pub css_scope: Option<String>,
    /// Helper functions available to template expressions, keyed by the
    /// module they are imported from.
    pub helpers: IndexMap<String, Vec<String>>,
    /// Receives every soft warning as it is reported.
    pub warn: Option<WarnCallback>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            host: "host".to_string(),
            scope: "scope".to_string(),
            partials: "partials".to_string(),
            indent: "  ".to_string(),
            prefix: String::new(),
            suffix: "$".to_string(),
            module: "@plasma/runtime".to_string(),
            component: None,
            css_scope: None,
            helpers: IndexMap::new(),
            warn: None,
        }
    }
}

impl std::fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileOptions")
            .field("host", &self.host)
            .field("scope", &self.scope)
            .field("partials", &self.partials)
            .field("indent", &self.indent)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("module", &self.module)
            .field("component", &self.component)
            .field("css_scope", &self.css_scope)
            .field("helpers", &self.helpers)
            .field("warn", &self.warn.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl CompileOptions {
    /// Find the module a helper is imported from, if any.
    pub fn helper_module(&self, name: &str) -> Option<&str> {
        self.helpers
            .iter()
            .find(|(_, names)| names.iter().any(|n| n == name))
            .map(|(module, _)| module.as_str())
    }
}
