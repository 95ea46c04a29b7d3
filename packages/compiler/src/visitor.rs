//! Template AST dispatch.
//!
//! One pass over the parsed template: each node kind hands off to its
//! entity builder. The builders recurse back through [`visit_children`]
//! for nested content, so the traversal order is exactly the emission
//! order of the generated mount code.

use crate::codegen::entities::{
    attribute, condition, element, inner_html, iterator, partial, text, variable,
};
use crate::codegen::state::CompileState;
use crate::error::{CompileError, Result};
use crate::template::ast::{Node, Program};
use crate::util::{capitalize, dash_case_to_camel_case};

/// Compile a whole template program into the state's output chunks.
/// Returns the name of the exported template function.
pub fn compile_template(state: &mut CompileState, program: &Program) -> Result<String> {
    for import in &program.imports {
        state.register_component(import);
    }
    let name = match &state.options.component {
        Some(component) => format!(
            "template{}",
            capitalize(&dash_case_to_camel_case(component))
        ),
        None => "template".to_string(),
    };
    state.run_template_block(&name, |s| {
        element::mount_template_root(s, &program.template)
    })
}

pub fn visit_children(state: &mut CompileState, nodes: &[Node]) -> Result<()> {
    for node in nodes {
        visit_node(state, node)?;
    }
    Ok(())
}

pub fn visit_node(state: &mut CompileState, node: &Node) -> Result<()> {
    match node {
        Node::Element(elem) => element::compile_element(state, elem),
        Node::Attribute(attr) => {
            let elem = state.current_element().ok_or_else(|| {
                CompileError::at("Attribute statement outside of an element", &attr.span)
            })?;
            attribute::compile_attribute(state, elem, attr)
        }
        Node::Text(node) => text::compile_text(state, node),
        Node::ExpressionText(node) => text::compile_expression_text(state, node),
        Node::If(stmt) => condition::compile_if(state, stmt),
        Node::Choose(stmt) => condition::compile_choose(state, stmt),
        Node::ForEach(stmt) => iterator::compile_for_each(state, stmt),
        Node::Variable(stmt) => variable::compile_variable(state, stmt),
        Node::InnerHtml(node) => inner_html::compile_inner_html(state, node),
        Node::PartialDefinition(def) => partial::compile_partial_definition(state, def),
        Node::Partial(stmt) => partial::compile_partial(state, stmt),
    }
}
