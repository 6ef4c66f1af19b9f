//! Materializer: virtual subtree in, detached live subtree out.

use tracing::trace;

use super::error::{ReconcileError, Result};
use super::props::apply_property;
use crate::dom::{Document, LiveNode};
use crate::vdom::{Child, NodeKind, VNode};

/// Create the live counterpart of `child`.
///
/// The result is not attached anywhere; inserting it is the caller's job.
/// Every virtual node in the subtree ends up owning its new live node.
///
/// # Errors
///
/// [`ReconcileError::AlreadyMounted`] if any node in the subtree already owns
/// a live node. Nothing is created in that case.
pub fn render(document: &Document, child: &Child) -> Result<LiveNode> {
    if let Child::Element(node) = child {
        ensure_unmounted(node)?;
    }
    materialize(document, child)
}

fn ensure_unmounted(node: &VNode) -> Result<()> {
    if node.is_mounted() {
        return Err(ReconcileError::AlreadyMounted);
    }
    for child in node.children().iter() {
        if let Child::Element(child) = child {
            ensure_unmounted(child)?;
        }
    }
    Ok(())
}

fn materialize(document: &Document, child: &Child) -> Result<LiveNode> {
    match child {
        Child::Text(text) => {
            trace!(len = text.len(), "materializing text");
            Ok(document.create_text_node(text))
        }
        Child::Element(node) => render_node(document, node),
    }
}

fn render_node(document: &Document, node: &VNode) -> Result<LiveNode> {
    let live = match node.kind() {
        NodeKind::Text(text) => document.create_text_node(&text),
        NodeKind::Element(tag) => {
            trace!(%tag, namespace = ?node.namespace(), "materializing element");
            let element = document.create_element(node.namespace(), &tag)?;
            for (key, prop) in node.properties().iter() {
                apply_property(&element, key, prop);
            }

            let children = node.children().to_vec();
            for child in &children {
                let live_child = materialize(document, child)?;
                element.append_child(&live_child)?;
            }
            element
        }
    };

    node.set_live(Some(live.clone()));
    Ok(live)
}
