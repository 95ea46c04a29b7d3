//! Element and component entities: DOM factories, attachment strategy,
//! refs, animation directives and component lifecycle.
//!
//! Every element decides once, at construction, whether its content can be
//! attached with plain `appendChild` or must go through an injector. The
//! decision is a bounded classification of the subtree: conditions and
//! loops are opaque recomputation units, so the walk never descends into
//! them, and a nested element hides its own dynamics behind its own
//! injector.

use crate::codegen::entities::{attribute, event};
use crate::codegen::entity::{ElementFlags, EntityId, EntityKind};
use crate::codegen::expression::compile_expr;
use crate::codegen::state::CompileState;
use crate::codegen::symbols::Runtime;
use crate::error::{CompileError, Result};
use crate::output::Chunk;
use crate::parse_util::ParseSourceSpan;
use crate::template::ast::{self, AttrValue, Node};
use crate::util::{dash_case_to_camel_case, quote_string};
use std::collections::HashMap;

/// How a mounted node reaches the DOM.
pub enum AttachVia {
    /// Direct `parent.appendChild(node)`.
    Append(EntityId),
    /// `insert(injector, node[, slot])`.
    Injector(EntityId, Option<String>),
}

/// Classify an element-like subtree. `attributes` are the element's own;
/// `children` its content nodes.
pub fn classify(attributes: &[ast::Attribute], children: &[Node]) -> ElementFlags {
    let mut flags = ElementFlags::empty();
    // `ref` and `xmlns:*` are consumed by the compiler, not written to the
    // DOM, so they never force attributes through the injector.
    if attributes.iter().any(|attr| {
        attr.value.is_dynamic()
            && attr.name != "ref"
            && !matches!(attr.split_name(), (Some("xmlns"), _))
    }) {
        flags |= ElementFlags::DYNAMIC_ATTRIBUTES;
    }
    classify_nodes(children, &mut flags);
    flags
}

fn classify_nodes(nodes: &[Node], flags: &mut ElementFlags) {
    for node in nodes {
        match node {
            Node::Element(elem) => {
                // A nested element manages its own dynamics; only partials
                // deeper inside leak out, since an overridden partial can
                // replace any part of the subtree.
                let mut inner = ElementFlags::empty();
                classify_nodes(&elem.children, &mut inner);
                if inner.contains(ElementFlags::PARTIALS) {
                    *flags |= ElementFlags::PARTIALS;
                }
            }
            Node::Attribute(_) => *flags |= ElementFlags::DYNAMIC_ATTRIBUTES,
            Node::Text(_) | Node::ExpressionText(_) => {}
            Node::If(stmt) => classify_branches(&stmt.branches, flags),
            Node::Choose(stmt) => classify_branches(&stmt.branches, flags),
            Node::ForEach(_) | Node::InnerHtml(_) => *flags |= ElementFlags::DYNAMIC_CONTENT,
            Node::Variable(_) | Node::PartialDefinition(_) => {}
            Node::Partial(_) => *flags |= ElementFlags::PARTIALS,
        }
    }
}

fn classify_branches(branches: &[ast::ConditionBranch], flags: &mut ElementFlags) {
    // Attribute-only branches rewrite attributes in place; anything else
    // re-renders content through the injector.
    let attrs_only = branches.iter().all(|branch| {
        branch
            .children
            .iter()
            .all(|node| matches!(node, Node::Attribute(_)))
    });
    if attrs_only {
        *flags |= ElementFlags::DYNAMIC_ATTRIBUTES;
    } else {
        *flags |= ElementFlags::DYNAMIC_CONTENT;
    }
}

/// The lazily created injector entity of an element, mounted before any
/// content that goes through it.
pub fn injector(state: &mut CompileState, element: EntityId) -> Result<EntityId> {
    if let Some(inj) = state.entity(element).injector {
        return Ok(inj);
    }
    let inj = state.add_entity(EntityKind::Injector, "inj", None);
    let is_component = state.entity(element).kind == EntityKind::Component;
    state.set_mount(inj, |s| {
        if is_component {
            let mut chunk = s.read_chunk(element);
            chunk.push_text(".componentModel.input");
            Ok(chunk)
        } else {
            let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::CREATE_INJECTOR)));
            chunk.append(s.read_chunk(element));
            chunk.push_text(")");
            Ok(chunk)
        }
    })?;
    let data = state.entity_mut(element);
    data.injector = Some(inj);
    data.children.insert(0, inj);
    Ok(inj)
}

/// Decide how `child` attaches under the current element. Must run before
/// the child's own element frame is pushed.
pub fn attach_point(
    state: &mut CompileState,
    child: EntityId,
    slot: Option<String>,
) -> Result<AttachVia> {
    let parent = state
        .current_element()
        .ok_or_else(|| CompileError::new("Content is not allowed outside of template", None))?;
    let data = state.entity(parent);
    let is_component = data.kind == EntityKind::Component;
    let via_injector = data.kind == EntityKind::BlockRoot || data.flags.content_via_injector();
    if is_component {
        // Component content is grouped into slots for targeted updates.
        state.entity_mut(child).slot = Some(slot.clone().unwrap_or_default());
    }
    if via_injector {
        let inj = injector(state, parent)?;
        let slot = if is_component {
            slot.filter(|name| !name.is_empty())
        } else {
            None
        };
        Ok(AttachVia::Injector(inj, slot))
    } else {
        Ok(AttachVia::Append(parent))
    }
}

/// The enclosing element's injector for block-style content (conditions,
/// iterators, partials, inner HTML), with component slot membership
/// recorded so slot accumulators pick the block's updates up.
pub fn block_anchor(state: &mut CompileState, child: EntityId) -> Result<EntityId> {
    let parent = state
        .current_element()
        .ok_or_else(|| CompileError::new("Content is not allowed outside of template", None))?;
    if state.entity(parent).kind == EntityKind::Component {
        state.entity_mut(child).slot = Some(String::new());
    }
    injector(state, parent)
}

/// Register the mount value of `id`: the factory output attached at `via`.
pub fn mount_attached(
    state: &mut CompileState,
    id: EntityId,
    via: AttachVia,
    value: Chunk,
) -> Result<()> {
    state.set_mount(id, move |s| match via {
        AttachVia::Append(parent) => {
            let mut chunk = s.read_chunk(parent);
            chunk.push_text(".appendChild(");
            chunk.append(value);
            chunk.push_text(")");
            Ok(chunk)
        }
        AttachVia::Injector(inj, slot) => {
            let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::INSERT)));
            chunk.append(s.read_chunk(inj));
            chunk.push_text(", ");
            chunk.append(value);
            if let Some(slot) = slot {
                chunk.push_text(format!(", {}", quote_string(&slot)));
            }
            chunk.push_text(")");
            Ok(chunk)
        }
    })
}

/// The root mount target of a template block: the host's component view.
pub fn mount_template_root(state: &mut CompileState, template: &ast::Template) -> Result<()> {
    let id = state.add_entity(EntityKind::Element, "target", Some(&template.span));
    state.entity_mut(id).flags = classify(&[], &template.children);
    if !template.children.is_empty() {
        let host = state.host().to_string();
        state.set_mount(id, move |_| Ok(Chunk::text(format!("{}.componentView", host))))?;
    }
    state.current_block_mut().entities.push(id);
    state.run_element_frame(id, HashMap::new(), |s| {
        crate::visitor::visit_children(s, &template.children)
    })
}

pub fn compile_element(state: &mut CompileState, elem: &ast::Element) -> Result<()> {
    let (prefix, local) = elem.split_name();
    if prefix.is_none() && state.is_component(&elem.name, &elem.span) {
        return compile_component(state, elem);
    }

    let id = state.add_entity(EntityKind::Element, local, Some(&elem.span));
    state.entity_mut(id).flags = classify(&elem.attributes, &elem.children);
    let parent_is_component = current_is_component(state);
    let via = attach_point(state, id, slot_attribute(elem))?;
    state.append_entity(id);

    let local = local.to_string();
    let prefix = prefix.map(str::to_string);
    let ns_frame = namespace_frame(&elem.attributes);
    state.run_element_frame(id, ns_frame, move |s| {
        let ns = match &prefix {
            Some(p) => match s.namespace(p) {
                Some(symbol) => Some(symbol),
                None => {
                    return Err(CompileError::at(
                        format!("Unknown namespace prefix {}", p),
                        &elem.span,
                    ))
                }
            },
            None => None,
        };
        let static_text = static_text_child(s, id, elem);
        let factory = element_factory(s, &local, &elem.span, ns.as_deref(), static_text)?;
        mount_attached(s, id, via, factory)?;

        for attr in &elem.attributes {
            if attr.name == "xmlns" || matches!(attr.split_name(), (Some("xmlns"), _)) {
                continue;
            }
            if attr.name == "slot" && parent_is_component {
                continue;
            }
            if attr.name == "ref" {
                compile_ref(s, id, &attr.value, &attr.span)?;
                continue;
            }
            attribute::compile_attribute(s, id, attr)?;
        }

        let mut animate_out = None;
        for dir in &elem.directives {
            match (dir.prefix.as_str(), dir.name.as_str()) {
                ("on", _) => event::compile_event(s, id, dir)?,
                ("ref", name) => compile_static_ref(s, id, name)?,
                ("animate", "in") => animate_in(s, id, &dir.value, &dir.span)?,
                ("animate", "out") => animate_out = Some(dir),
                _ => s.warn_once(
                    &format!("{}:{}", dir.prefix, dir.name),
                    format!("Unknown directive {}:{}", dir.prefix, dir.name),
                    Some(&dir.span),
                ),
            }
        }

        if static_text.is_none() {
            crate::visitor::visit_children(s, &elem.children)?;
        }
        finalize_element(s, id)?;
        if let Some(dir) = animate_out {
            apply_animate_out(s, id, &dir.value, &dir.span)?;
        }
        Ok(())
    })
}

fn current_is_component(state: &CompileState) -> bool {
    state
        .current_element()
        .map(|id| state.entity(id).kind == EntityKind::Component)
        .unwrap_or(false)
}

fn slot_attribute(elem: &ast::Element) -> Option<String> {
    elem.attributes
        .iter()
        .find(|attr| attr.name == "slot")
        .and_then(|attr| attr.value.as_literal())
        .map(str::to_string)
}

fn namespace_frame(attributes: &[ast::Attribute]) -> HashMap<String, String> {
    let mut frame = HashMap::new();
    for attr in attributes {
        if let (Some("xmlns"), prefix) = attr.split_name() {
            if let Some(uri) = attr.value.as_literal() {
                frame.insert(prefix.to_string(), uri.to_string());
            }
        }
    }
    frame
}

/// A single static text child of a fully static element folds into an
/// `elemWithText` factory call.
fn static_text_child<'a>(
    state: &CompileState,
    id: EntityId,
    elem: &'a ast::Element,
) -> Option<&'a str> {
    if state.entity(id).flags.content_via_injector() {
        return None;
    }
    match elem.children.as_slice() {
        [Node::Text(text)] => Some(&text.value),
        _ => None,
    }
}

fn element_factory(
    state: &mut CompileState,
    name: &str,
    span: &ParseSourceSpan,
    ns: Option<&str>,
    static_text: Option<&str>,
) -> Result<Chunk> {
    let css = state.options.css_scope.clone();
    let mut chunk = match (ns, static_text) {
        (Some(ns), _) => {
            // Namespaced elements cannot fold text; keep the factory simple.
            let mut chunk = Chunk::spanned(
                format!("{}(", state.runtime(Runtime::ELEM_NS)),
                span,
            );
            chunk.push_text(format!("{}, {}", quote_string(name), ns));
            chunk
        }
        (None, Some(text)) => {
            let mut chunk = Chunk::spanned(
                format!("{}(", state.runtime(Runtime::ELEM_WITH_TEXT)),
                span,
            );
            chunk.push_text(format!("{}, {}", quote_string(name), quote_string(text)));
            chunk
        }
        (None, None) => {
            let mut chunk = Chunk::spanned(format!("{}(", state.runtime(Runtime::ELEM)), span);
            chunk.push_text(quote_string(name));
            chunk
        }
    };
    if let Some(css) = css {
        chunk.push_text(format!(", {}", quote_string(&css)));
    }
    chunk.push_text(")");
    Ok(chunk)
}

fn compile_ref(
    state: &mut CompileState,
    elem: EntityId,
    value: &AttrValue,
    span: &ParseSourceSpan,
) -> Result<()> {
    match value {
        AttrValue::Literal { value, .. } => compile_static_ref(state, elem, value),
        AttrValue::Expression(expr) => {
            let rendered = compile_expr(state, expr)?;
            let id = state.add_entity(EntityKind::Statement, "ref", Some(span));
            state.set_shared(id, |s| {
                let mut chunk = Chunk::text(format!("{}({}, ", s.runtime(Runtime::SET_REF), s.host()));
                chunk.append(rendered.clone());
                chunk.push_text(", ");
                chunk.append(s.read_chunk(elem));
                chunk.push_text(")");
                Ok(chunk)
            })?;
            state.append_entity(id);
            let block = state.current_block_mut();
            block.refs_in_mount = true;
            block.refs_in_update = true;
            Ok(())
        }
        AttrValue::Empty => Err(CompileError::at("Ref attribute must have a name", span)),
    }
}

fn compile_static_ref(state: &mut CompileState, elem: EntityId, name: &str) -> Result<()> {
    let name = quote_string(name);
    let id = state.add_entity(EntityKind::Statement, "ref", None);
    state.set_mount(id, |s| {
        let mut chunk = Chunk::text(format!("{}({}, {}, ", s.runtime(Runtime::SET_REF), s.host(), name));
        chunk.append(s.read_chunk(elem));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.append_entity(id);
    state.current_block_mut().refs_in_mount = true;
    Ok(())
}

fn animation_name(
    state: &mut CompileState,
    value: &AttrValue,
    span: &ParseSourceSpan,
) -> Result<Chunk> {
    match value {
        AttrValue::Literal { value, .. } => Ok(Chunk::text(quote_string(value))),
        AttrValue::Expression(expr) => compile_expr(state, expr),
        AttrValue::Empty => Err(CompileError::at("Animation must have a name", span)),
    }
}

fn animate_in(
    state: &mut CompileState,
    elem: EntityId,
    value: &AttrValue,
    span: &ParseSourceSpan,
) -> Result<()> {
    let animation = animation_name(state, value, span)?;
    let css = state.options.css_scope.clone();
    let id = state.add_entity(EntityKind::Statement, "anim", Some(span));
    state.set_mount(id, move |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::ANIMATE_IN)));
        chunk.append(s.read_chunk(elem));
        chunk.push_text(", ");
        chunk.append(animation);
        if let Some(css) = css {
            chunk.push_text(format!(", {}", quote_string(&css)));
        }
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.append_entity(id);
    Ok(())
}

/// `animate:out` defers the subtree's unmount code into a callback that
/// runs when the animation finishes, so the DOM stays alive until then.
fn apply_animate_out(
    state: &mut CompileState,
    elem: EntityId,
    value: &AttrValue,
    span: &ParseSourceSpan,
) -> Result<()> {
    let animation = state.unmount(|s| animation_name(s, value, span))?;
    let mut body = Vec::new();
    transplant_unmount(state, elem, &mut body);
    body.push(Chunk::text(format!("{} = null", state.scope_ref(elem))));

    let callback = state.symbol("animOut");
    let callback_ref = callback.clone();
    state
        .current_block_mut()
        .deferred_fns
        .push(crate::codegen::block::DeferredFn {
            name: callback,
            body,
        });

    state.set_unmount(elem, move |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::ANIMATE_OUT)));
        chunk.append(s.read_chunk(elem));
        chunk.push_text(", ");
        chunk.append(animation);
        chunk.push_text(format!(", {}, {})", s.scope(), callback_ref));
        Ok(chunk)
    })
}

fn transplant_unmount(state: &mut CompileState, root: EntityId, body: &mut Vec<Chunk>) {
    let children = state.entity(root).children.clone();
    for child in children {
        if let Some(unmount) = state.entity_mut(child).unmount.take() {
            body.push(unmount);
        }
        if state.entity(child).needs_nulling() {
            body.push(Chunk::text(format!("{} = null", state.scope_ref(child))));
            state.entity_mut(child).no_null = true;
        }
        transplant_unmount(state, child, body);
    }
}

/// Injector-routed attributes and events are double-buffered by the
/// runtime; a finalize call commits them after every render pass.
fn finalize_element(state: &mut CompileState, id: EntityId) -> Result<()> {
    let flags = state.entity(id).flags;
    if flags.contains(ElementFlags::DYNAMIC_ATTRIBUTES) && !flags.contains(ElementFlags::COMPONENT)
    {
        let inj = injector(state, id)?;
        let fin = state.add_entity(EntityKind::Statement, "finAttrs", None);
        state.set_shared(fin, |s| {
            let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::FINALIZE_ATTRIBUTES)));
            chunk.append(s.read_chunk(inj));
            chunk.push_text(")");
            Ok(chunk)
        })?;
        state.entity_mut(fin).update_dirty = true;
        state.add_child(id, fin);
    }
    if flags.contains(ElementFlags::DYNAMIC_EVENTS) {
        let inj = injector(state, id)?;
        let fin = state.add_entity(EntityKind::Statement, "finEvents", None);
        state.set_shared(fin, |s| {
            let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::FINALIZE_EVENTS)));
            chunk.append(s.read_chunk(inj));
            chunk.push_text(")");
            Ok(chunk)
        })?;
        state.add_child(id, fin);
    }
    Ok(())
}

/* Components */

fn compile_component(state: &mut CompileState, elem: &ast::Element) -> Result<()> {
    let registration = match state.get_component(&elem.name) {
        Some(reg) => reg,
        None => return Ok(()),
    };

    let id = state.add_entity(
        EntityKind::Component,
        &dash_case_to_camel_case(&elem.name),
        Some(&elem.span),
    );
    state.entity_mut(id).flags =
        classify(&elem.attributes, &elem.children) | ElementFlags::COMPONENT;
    let parent_is_component = current_is_component(state);
    let via = attach_point(state, id, slot_attribute(elem))?;
    state.append_entity(id);

    state.run_element_frame(id, HashMap::new(), move |s| {
        let mut factory = Chunk::spanned(
            format!("{}(", s.runtime(Runtime::CREATE_COMPONENT)),
            &elem.span,
        );
        factory.push_text(format!(
            "{}, {}, {}",
            quote_string(&elem.name),
            registration.symbol,
            s.host()
        ));
        factory.push_text(")");
        mount_attached(s, id, via, factory)?;

        let mut props: Vec<(String, Chunk)> = Vec::new();
        for attr in &elem.attributes {
            if attr.name == "slot" && parent_is_component {
                continue;
            }
            if attr.name == "ref" {
                compile_ref(s, id, &attr.value, &attr.span)?;
                continue;
            }
            match &attr.value {
                AttrValue::Literal { value, .. } => {
                    props.push((attr.name.clone(), Chunk::text(quote_string(value))));
                }
                AttrValue::Empty => {
                    props.push((attr.name.clone(), Chunk::text("true")));
                }
                AttrValue::Expression(_) => attribute::compile_attribute(s, id, attr)?,
            }
        }

        for dir in &elem.directives {
            match dir.prefix.as_str() {
                "on" => event::compile_event(s, id, dir)?,
                "partial" => {
                    let partials = s.options.partials.clone();
                    props.push((
                        format!("partial:{}", dir.name),
                        Chunk::text(crate::util::property_access(&partials, &dir.name)),
                    ));
                }
                _ => s.warn_once(
                    &format!("{}:{}", dir.prefix, dir.name),
                    format!("Unknown directive {}:{}", dir.prefix, dir.name),
                    Some(&dir.span),
                ),
            }
        }

        crate::visitor::visit_children(s, &elem.children)?;
        mount_component(s, id, props)
    })
}

/// The deferred `mountComponent` call: runs after all input attributes and
/// slot content are in place, so the component renders exactly once.
fn mount_component(
    state: &mut CompileState,
    id: EntityId,
    props: Vec<(String, Chunk)>,
) -> Result<()> {
    slot_accumulators(state, id)?;
    let dynamic_input = state
        .entity(id)
        .flags
        .contains(ElementFlags::DYNAMIC_ATTRIBUTES);

    let stmt = state.add_entity(EntityKind::Statement, "mount", None);
    state.set_mount(stmt, move |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::MOUNT_COMPONENT)));
        chunk.append(s.read_chunk(id));
        if !props.is_empty() {
            chunk.push_text(", { ");
            for (i, (key, value)) in props.into_iter().enumerate() {
                if i > 0 {
                    chunk.push_text(", ");
                }
                chunk.push_text(crate::util::quote_object_key(&key));
                chunk.push_text(": ");
                chunk.append(value);
            }
            chunk.push_text(" }");
        }
        chunk.push_text(")");
        Ok(chunk)
    })?;
    if dynamic_input {
        state.set_update(stmt, |s| {
            let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::UPDATE_COMPONENT)));
            chunk.append(s.read_chunk(id));
            chunk.push_text(")");
            Ok(chunk)
        })?;
        state.entity_mut(stmt).update_dirty = true;
    }
    state.set_unmount(stmt, |s| {
        let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::UNMOUNT_COMPONENT)));
        chunk.append(s.read_chunk(id));
        chunk.push_text(")");
        Ok(chunk)
    })?;
    state.add_child(id, stmt);
    Ok(())
}

/// Fold slot content updates into per-slot dirty accumulators so the child
/// component only re-renders slots whose content actually changed.
fn slot_accumulators(state: &mut CompileState, comp: EntityId) -> Result<()> {
    let direct = state.entity(comp).children.clone();
    let mut groups: Vec<(String, Vec<EntityId>)> = Vec::new();
    for &child in &direct {
        let slot = match state.entity(child).slot.clone() {
            Some(slot) => slot,
            None => continue,
        };
        let mut dirty = Vec::new();
        collect_dirty(state, child, &mut dirty);
        if dirty.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(name, _)| *name == slot) {
            Some((_, ids)) => ids.extend(dirty),
            None => groups.push((slot, dirty)),
        }
    }

    for (slot, dirty) in groups {
        let accumulator = state.symbol("su");
        for id in dirty {
            if let Some(update) = state.entity_mut(id).update.as_mut() {
                update.prepend_text(format!("{} |= ", accumulator));
            }
        }
        let opener = state.add_entity(EntityKind::Statement, "slot", None);
        let decl = format!("let {} = 0", accumulator);
        state.set_update(opener, move |_| Ok(Chunk::text(decl)))?;
        state.entity_mut(comp).children.insert(0, opener);

        let closer = state.add_entity(EntityKind::Statement, "slot", None);
        state.set_update(closer, move |s| {
            let mut chunk = Chunk::text(format!("{}(", s.runtime(Runtime::MARK_SLOT_UPDATE)));
            chunk.append(s.read_chunk(comp));
            chunk.push_text(format!(", {}, {}", quote_string(&slot), accumulator));
            chunk.push_text(")");
            Ok(chunk)
        })?;
        state.add_child(comp, closer);
    }
    Ok(())
}

fn collect_dirty(state: &CompileState, id: EntityId, out: &mut Vec<EntityId>) {
    let data = state.entity(id);
    if data.update_dirty && data.update.is_some() {
        out.push(id);
    }
    for &child in &data.children {
        collect_dirty(state, child, out);
    }
}
