//! Mount and unmount hooks over whole subtrees.
//!
//! Hooks are taken out of their node before they run, so no borrow is held
//! while user code executes and a hook can never fire twice.

use crate::vdom::{Child, VNode};

fn child_nodes(node: &VNode) -> Vec<VNode> {
    node.children()
        .iter()
        .filter_map(|c| c.as_element().cloned())
        .collect()
}

/// Fire `on_mount` for every node of a freshly attached subtree, children
/// before their parent.
pub(crate) fn fire_mount(child: &Child) {
    if let Child::Element(node) = child {
        mount_node(node);
    }
}

fn mount_node(node: &VNode) {
    for child in child_nodes(node) {
        mount_node(&child);
    }
    if let Some(hook) = node.take_on_mount() {
        hook();
    }
}

/// Fire `on_unmount` for every node of a subtree about to be detached,
/// parent before its children.
pub(crate) fn fire_unmount(child: &Child) {
    if let Child::Element(node) = child {
        unmount_node(node);
    }
}

fn unmount_node(node: &VNode) {
    if let Some(hook) = node.take_on_unmount() {
        hook();
    }
    for child in child_nodes(node) {
        unmount_node(&child);
    }
}

/// Drop the live nodes owned by a detached subtree.
pub(crate) fn release(child: &Child) {
    if let Child::Element(node) = child {
        release_node(node);
    }
}

fn release_node(node: &VNode) {
    node.set_live(None);
    for child in child_nodes(node) {
        release_node(&child);
    }
}
