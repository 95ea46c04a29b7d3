//! Attribute entities.
//!
//! An attribute renders as a direct `.setAttribute()` call when both the
//! value and the owning element's attribute set are fully static. As soon
//! as any attribute of the element needs re-evaluation, every attribute of
//! that element is routed through the injector, so conditionally applied
//! attributes and plain ones resolve against the same pending set before a
//! single `finalizeAttributes` commit.

use crate::codegen::entities::element;
use crate::codegen::entity::{EntityId, EntityKind};
use crate::codegen::expression::compile_expr;
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::Result;
use crate::output::Chunk;
use crate::template::ast::{Attribute, AttrValue};
use crate::util::quote_string;

pub fn compile_attribute(state: &mut CompileState, elem: EntityId, attr: &Attribute) -> Result<()> {
    let (prefix, local) = attr.split_name();
    let ns = match prefix {
        Some(p) => state.namespace(p),
        None => None,
    };
    // An unbound prefix is kept as part of a literal attribute name.
    let name = if ns.is_some() { local } else { attr.name.as_str() };

    let data = state.entity(elem);
    let routed = data.kind == EntityKind::BlockRoot
        || data.flags.attrs_via_injector()
        || attr.value.is_dynamic();

    if !routed {
        let value = literal_value(&attr.value);
        let id = state.add_entity(EntityKind::Attribute, local, Some(&attr.span));
        let span = attr.span.clone();
        state.set_mount(id, move |s| {
            let mut chunk = s.read_chunk(elem);
            match ns {
                Some(ns) => chunk.push_spanned(
                    format!(".setAttributeNS({}, {}, {})", ns, quote_string(name), value),
                    &span,
                ),
                None => chunk.push_spanned(
                    format!(".setAttribute({}, {})", quote_string(name), value),
                    &span,
                ),
            };
            Ok(chunk)
        })?;
        state.append_entity(id);
        return Ok(());
    }

    let inj = element::injector(state, elem)?;
    let value = value_chunk(state, &attr.value)?;
    let id = state.add_entity(EntityKind::Attribute, local, Some(&attr.span));
    let span = attr.span.clone();
    state.set_shared(id, move |s| {
        let runtime = if ns.is_some() {
            Runtime::SET_ATTRIBUTE_NS
        } else {
            Runtime::SET_ATTRIBUTE
        };
        let mut chunk = Chunk::spanned(format!("{}(", s.runtime(runtime)), &span);
        chunk.append(s.read_chunk(inj));
        if let Some(ns) = &ns {
            chunk.push_text(format!(", {}", ns));
        }
        chunk.push_text(format!(", {}, ", quote_string(name)));
        chunk.append(value.clone());
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.append_entity(id);
    Ok(())
}

fn literal_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Literal { value, .. } => quote_string(value),
        _ => "''".to_string(),
    }
}

fn value_chunk(state: &mut CompileState, value: &AttrValue) -> Result<Chunk> {
    match value {
        AttrValue::Expression(expr) => compile_expr(state, expr),
        other => Ok(Chunk::text(literal_value(other))),
    }
}
