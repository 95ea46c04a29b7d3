//! Conditional rendering: `<if>` chains and `<choose>` groups.
//!
//! Both normalize into a branch list and compile the same way. A condition
//! whose branches only toggle attributes never re-renders content: it
//! becomes a single shared function run against the element's injector in
//! both mount and update, returning 0 because nothing structural changed.
//! Anything else becomes an entry function that picks a content block, and
//! the runtime block primitives handle the swap.

use crate::codegen::entities::element;
use crate::codegen::entity::EntityKind;
use crate::codegen::expression::compile_expr;
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::Result;
use crate::output::Chunk;
use crate::parse_util::ParseSourceSpan;
use crate::template::ast::{Attribute, ChooseStatement, ConditionBranch, IfStatement, Node};
use crate::util::quote_string;

pub fn compile_if(state: &mut CompileState, stmt: &IfStatement) -> Result<()> {
    compile_condition(state, &stmt.branches, &stmt.span, "if")
}

pub fn compile_choose(state: &mut CompileState, stmt: &ChooseStatement) -> Result<()> {
    compile_condition(state, &stmt.branches, &stmt.span, "choose")
}

fn compile_condition(
    state: &mut CompileState,
    branches: &[ConditionBranch],
    span: &ParseSourceSpan,
    prefix: &str,
) -> Result<()> {
    if branches.is_empty() {
        return Ok(());
    }
    if let Some(attrs) = attribute_only(branches) {
        return compile_simple_condition(state, branches, &attrs, span, prefix);
    }

    let mut arms: Vec<(Option<Chunk>, Option<String>)> = Vec::with_capacity(branches.len());
    for branch in branches {
        let test = match &branch.test {
            Some(test) => Some(compile_expr(state, test)?),
            None => None,
        };
        let block = if branch.children.is_empty() {
            None
        } else {
            Some(state.run_child_block(&format!("{}Body", prefix), |s| {
                crate::visitor::visit_children(s, &branch.children)
            })?)
        };
        arms.push((test, block));
    }

    let entry = state.symbol(&format!("{}Entry", prefix));
    let entry_chunk = entry_fn(state, &entry, arms);
    state.output.push(entry_chunk);

    let id = state.add_entity(EntityKind::Condition, prefix, Some(span));
    let inj = element::block_anchor(state, id)?;
    state.append_entity(id);

    state.set_mount(id, |s| {
        let mut chunk = Chunk::text(format!("{}({}, ", s.runtime(Runtime::MOUNT_BLOCK), s.host()));
        chunk.append(s.read_chunk(inj));
        chunk.push_text(format!(", {})", entry));
        Ok(chunk)
    })?;
    state.set_update(id, |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::UPDATE_BLOCK)));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.entity_mut(id).update_dirty = true;
    state.set_unmount(id, |s| {
        let mut chunk = Chunk::text(format!(
            "{} = {}(",
            s.scope_ref(id),
            s.runtime(Runtime::UNMOUNT_BLOCK)
        ));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    Ok(())
}

fn entry_fn(state: &CompileState, name: &str, arms: Vec<(Option<Chunk>, Option<String>)>) -> Chunk {
    let mut chunk = Chunk::text(format!(
        "function {}({}, {}) {{",
        name,
        state.host(),
        state.scope()
    ));
    chunk.indent();
    let single = arms.len() == 1 && arms[0].0.is_none();
    for (i, (test, block)) in arms.into_iter().enumerate() {
        match test {
            Some(test) => {
                chunk.newline();
                chunk.push_text(if i == 0 { "if (" } else { "} else if (" });
                chunk.append(test);
                chunk.push_text(") {");
            }
            None if single => {}
            None => {
                chunk.newline();
                chunk.push_text("} else {");
            }
        }
        if let Some(block) = block {
            if !single {
                chunk.indent();
            }
            chunk.newline();
            chunk.push_text(format!("return {};", block));
            if !single {
                chunk.dedent();
            }
        }
    }
    if !single {
        chunk.newline();
        chunk.push_text("}");
    }
    chunk.dedent();
    chunk.newline();
    chunk.push_text("}");
    chunk
}

fn attribute_only(branches: &[ConditionBranch]) -> Option<Vec<Vec<&Attribute>>> {
    let mut per_branch = Vec::with_capacity(branches.len());
    for branch in branches {
        let mut attrs = Vec::new();
        for node in &branch.children {
            match node {
                Node::Attribute(attr) => attrs.push(attr),
                _ => return None,
            }
        }
        per_branch.push(attrs);
    }
    Some(per_branch)
}

/// Attribute-only condition: one shared function that stages attributes on
/// the live injector and reports no structural change.
fn compile_simple_condition(
    state: &mut CompileState,
    branches: &[ConditionBranch],
    attrs: &[Vec<&Attribute>],
    span: &ParseSourceSpan,
    prefix: &str,
) -> Result<()> {
    let name = state.symbol(&format!("{}Attr", prefix));

    let mut chunk = Chunk::text(format!(
        "function {}({}, injector, {}) {{",
        name,
        state.host(),
        state.scope()
    ));
    chunk.indent();
    for (i, branch) in branches.iter().enumerate() {
        chunk.newline();
        match &branch.test {
            Some(test) => {
                chunk.push_text(if i == 0 { "if (" } else { "} else if (" });
                chunk.append(compile_expr(state, test)?);
                chunk.push_text(") {");
            }
            None => {
                chunk.push_text("} else {");
            }
        }
        chunk.indent();
        for attr in &attrs[i] {
            chunk.newline();
            chunk.append(staged_attribute(state, attr)?);
        }
        chunk.dedent();
    }
    chunk.newline();
    chunk.push_text("}");
    chunk.newline();
    chunk.push_text("return 0;");
    chunk.dedent();
    chunk.newline();
    chunk.push_text("}");
    state.output.push(chunk);

    let id = state.add_entity(EntityKind::Condition, prefix, Some(span));
    let inj = element::block_anchor(state, id)?;
    state.append_entity(id);
    state.set_shared(id, move |s| {
        let mut call = Chunk::text(format!("{}({}, ", name, s.host()));
        call.append(s.read_chunk(inj));
        call.push_text(format!(", {})", s.scope()));
        Ok(call)
    })?;
    Ok(())
}

fn staged_attribute(state: &mut CompileState, attr: &Attribute) -> Result<Chunk> {
    let (prefix, local) = attr.split_name();
    let ns = match prefix {
        Some(p) => state.namespace(p),
        None => None,
    };
    let name = if ns.is_some() { local } else { attr.name.as_str() };
    let runtime = if ns.is_some() {
        Runtime::SET_ATTRIBUTE_NS
    } else {
        Runtime::SET_ATTRIBUTE
    };
    let mut chunk = Chunk::spanned(format!("{}(injector", state.runtime(runtime)), &attr.span);
    if let Some(ns) = ns {
        chunk.push_text(format!(", {}", ns));
    }
    chunk.push_text(format!(", {}, ", quote_string(name)));
    match &attr.value {
        crate::template::ast::AttrValue::Expression(expr) => {
            chunk.append(compile_expr(state, expr)?);
        }
        crate::template::ast::AttrValue::Literal { value, .. } => {
            chunk.push_text(quote_string(value));
        }
        crate::template::ast::AttrValue::Empty => {
            chunk.push_text("''");
        }
    }
    chunk.push_text(");");
    Ok(chunk)
}
