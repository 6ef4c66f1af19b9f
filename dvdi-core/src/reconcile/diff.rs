//! Tree Reconciliation
//!
//! `reconcile` compares the tree previously rendered at one slot of a live
//! parent with the tree that should be there now, and applies the smallest
//! set of live-tree changes that gets from one to the other.
//!
//! # Algorithm
//!
//! For one slot (`index` within `live_parent`):
//!
//! 1. Nothing before, something now: materialize and insert, then fire
//!    mount hooks.
//! 2. Something before, nothing now: fire unmount hooks, then detach.
//! 3. Both present but changed (kind, text, tag or namespace differ):
//!    materialize the new node and swap it in.
//! 4. Both present, same tag and namespace: patch properties on the existing
//!    live node, hand it over to the new virtual node, then recurse into the
//!    children pairwise by position.
//!
//! Children are matched by index. Removing an item from the middle of a list
//! re-diffs every following sibling against its shifted neighbour rather than
//! detecting a move. The exception is a child that is still mounted, such as
//! a component's current tree reused in the new page: if it was one of the
//! old children it keeps its live node and is moved to its new position.
//! Any other mounted node is rejected with
//! [`ReconcileError::AlreadyMounted`] before the live tree is touched.

use tracing::{error, trace};

use super::error::{ReconcileError, Result};
use super::lifecycle::{fire_mount, fire_unmount, release};
use super::props::diff_properties;
use super::render::render;
use crate::dom::{Document, LiveNode};
use crate::vdom::{Child, VNode};

/// Reconcile `old` against `new` at `index` within `live_parent`.
///
/// `parent_vnode` is the virtual node that owns `live_parent`, if any; new
/// nodes get their parent link pointed at it. `old` must be the tree that was
/// last applied at this slot, and the caller keeps `new` as the next `old`.
///
/// # Errors
///
/// Returns a [`ReconcileError`] if `old` does not describe what is actually at
/// `index`, or if `index` is past the end on an insertion. These are
/// programming errors; the live tree may be partially updated.
pub fn reconcile(
    live_parent: &LiveNode,
    parent_vnode: Option<&VNode>,
    old: Option<&Child>,
    new: Option<&Child>,
    index: usize,
) -> Result<()> {
    let document = live_parent.owner_document();
    let result = patch(&document, live_parent, parent_vnode, old, new, index);
    if let Err(err) = &result {
        error!(%err, index, "reconciliation hit a structural mismatch");
    }
    result
}

/// Whether `old` and `new` cannot share a live node.
///
/// A distinct `new` that already owns a live node never takes over `old`'s.
pub fn changed(old: &Child, new: &Child) -> bool {
    match (old, new) {
        (Child::Text(a), Child::Text(b)) => a != b,
        (Child::Element(a), Child::Element(b)) => {
            !a.ptr_eq(b)
                && (b.is_mounted() || a.namespace() != b.namespace() || a.kind() != b.kind())
        }
        _ => true,
    }
}

fn patch(
    document: &Document,
    live_parent: &LiveNode,
    parent_vnode: Option<&VNode>,
    old: Option<&Child>,
    new: Option<&Child>,
    index: usize,
) -> Result<()> {
    match (old, new) {
        (None, None) => Ok(()),
        (None, Some(new)) => add(document, live_parent, parent_vnode, new, index),
        (Some(old), None) => remove(live_parent, old, index),
        (Some(old), Some(new)) if changed(old, new) => {
            replace(document, live_parent, parent_vnode, old, new, index)
        }
        (Some(Child::Element(old)), Some(Child::Element(new))) => {
            update(document, live_parent, parent_vnode, old, new, index)
        }
        // Identical strings.
        (Some(_), Some(_)) => Ok(()),
    }
}

/// The live node at `index`, checked against what `old` claims to own.
fn owned_live(live_parent: &LiveNode, old: &Child, index: usize) -> Result<LiveNode> {
    let live = live_parent
        .child_at(index)
        .ok_or(ReconcileError::MissingLiveChild {
            index,
            len: live_parent.child_count(),
        })?;

    let owns = match old {
        Child::Element(node) => match node.live() {
            Some(owned) => owned.ptr_eq(&live),
            None => return Err(ReconcileError::NotMounted { index }),
        },
        Child::Text(text) => live.text().as_deref() == Some(text.as_str()),
    };

    if owns {
        Ok(live)
    } else {
        Err(ReconcileError::LiveNodeMismatch { index })
    }
}

fn add(
    document: &Document,
    live_parent: &LiveNode,
    parent_vnode: Option<&VNode>,
    new: &Child,
    index: usize,
) -> Result<()> {
    let len = live_parent.child_count();
    if index > len {
        return Err(ReconcileError::IndexOutOfBounds { index, len });
    }

    trace!(index, "adding node");
    let live = render(document, new)?;
    live_parent.insert_child(&live, index)?;
    if let Child::Element(node) = new {
        node.set_parent(parent_vnode);
    }
    fire_mount(new);
    Ok(())
}

fn remove(live_parent: &LiveNode, old: &Child, index: usize) -> Result<()> {
    owned_live(live_parent, old, index)?;

    trace!(index, "removing node");
    fire_unmount(old);
    live_parent.remove_child_at(index)?;
    release(old);
    if let Child::Element(node) = old {
        node.set_parent(None);
    }
    Ok(())
}

fn replace(
    document: &Document,
    live_parent: &LiveNode,
    parent_vnode: Option<&VNode>,
    old: &Child,
    new: &Child,
    index: usize,
) -> Result<()> {
    owned_live(live_parent, old, index)?;

    trace!(index, "replacing node");
    let live = render(document, new)?;
    fire_unmount(old);
    live_parent.replace_child_at(&live, index)?;
    release(old);
    if let Child::Element(node) = old {
        node.set_parent(None);
    }
    if let Child::Element(node) = new {
        node.set_parent(parent_vnode);
    }
    fire_mount(new);
    Ok(())
}

fn update(
    document: &Document,
    live_parent: &LiveNode,
    parent_vnode: Option<&VNode>,
    old: &VNode,
    new: &VNode,
    index: usize,
) -> Result<()> {
    let live = owned_live(live_parent, &Child::Element(old.clone()), index)?;
    let old_children = old.children().to_vec();
    let new_children = new.children().to_vec();
    let kept = retained(&old_children, &new_children)?;

    if !old.ptr_eq(new) {
        trace!(index, "updating node in place");
        diff_properties(&live, &old.properties(), &new.properties());

        // The live node changes owner; it stays mounted, so the teardown
        // obligation moves with it.
        old.take_live();
        new.set_live(Some(live.clone()));
        if !new.has_on_unmount() {
            if let Some(hook) = old.take_on_unmount() {
                new.put_on_unmount(hook);
            }
        }
    }
    new.set_parent(parent_vnode);

    if kept.iter().all(|&(from, to)| from == to) {
        return patch_children(document, &live, new, &old_children, &new_children);
    }
    move_retained(document, &live, new, &old_children, &new_children, &kept)
}

/// Mounted children of `new`, as `(old index, new index)` pairs.
///
/// A mounted node is only accepted if it is one of `old`'s own children, and
/// at most once; anything else owns a live node this parent cannot hand out.
fn retained(old: &[Child], new: &[Child]) -> Result<Vec<(usize, usize)>> {
    let mut kept: Vec<(usize, usize)> = Vec::new();
    for (to, child) in new.iter().enumerate() {
        match child {
            Child::Element(node) if node.is_mounted() => {
                let from = if old.get(to) == Some(child) {
                    to
                } else {
                    old.iter()
                        .position(|candidate| candidate == child)
                        .ok_or(ReconcileError::AlreadyMounted)?
                };
                if kept.iter().any(|&(seen, _)| seen == from) {
                    return Err(ReconcileError::AlreadyMounted);
                }
                kept.push((from, to));
            }
            _ => {}
        }
    }
    Ok(kept)
}

/// Pairwise positional diff of two child lists under `live`.
fn patch_children(
    document: &Document,
    live: &LiveNode,
    parent: &VNode,
    old_children: &[Child],
    new_children: &[Child],
) -> Result<()> {
    let common = old_children.len().min(new_children.len());

    for i in 0..common {
        patch(document, live, Some(parent), Some(&old_children[i]), Some(&new_children[i]), i)?;
    }
    for (i, child) in new_children.iter().enumerate().skip(common) {
        patch(document, live, Some(parent), None, Some(child), i)?;
    }
    // Highest index first so the remaining positions stay valid.
    for i in (common..old_children.len()).rev() {
        patch(document, live, Some(parent), Some(&old_children[i]), None, i)?;
    }
    Ok(())
}

/// Retained children changed position: detach them, diff the rest by
/// position, then put them back at their new indices. Their subtrees are not
/// touched and no hooks fire for them.
fn move_retained(
    document: &Document,
    live: &LiveNode,
    parent: &VNode,
    old_children: &[Child],
    new_children: &[Child],
    kept: &[(usize, usize)],
) -> Result<()> {
    let mut by_old = kept.to_vec();
    by_old.sort_unstable_by(|a, b| b.0.cmp(&a.0));

    let mut detached = Vec::with_capacity(by_old.len());
    for &(from, to) in &by_old {
        let node = owned_live(live, &old_children[from], from)?;
        live.remove_child_at(from)?;
        detached.push((to, node));
    }
    trace!(moved = detached.len(), "moving retained children");

    let old_rest: Vec<Child> = old_children
        .iter()
        .enumerate()
        .filter(|(i, _)| !kept.iter().any(|&(from, _)| from == *i))
        .map(|(_, child)| child.clone())
        .collect();
    let new_rest: Vec<Child> = new_children
        .iter()
        .enumerate()
        .filter(|(i, _)| !kept.iter().any(|&(_, to)| to == *i))
        .map(|(_, child)| child.clone())
        .collect();
    patch_children(document, live, parent, &old_rest, &new_rest)?;

    detached.sort_unstable_by_key(|&(to, _)| to);
    for (to, node) in detached {
        live.insert_child(&node, to)?;
        if let Child::Element(vnode) = &new_children[to] {
            vnode.set_parent(Some(parent));
        }
    }
    Ok(())
}
