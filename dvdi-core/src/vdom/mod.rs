//! Virtual Tree
//!
//! This module implements the in-memory description of the UI: virtual
//! nodes, their properties, and the factory used to build trees.
//!
//! # Overview
//!
//! A virtual tree is a tree of [`VNode`]s whose children are [`Child`] values,
//! either nested nodes or bare strings. Order is the only identity a child
//! has: the reconciler pairs old and new children by position.
//!
//! The tree-mutation primitives on [`VNode`] (`append_child`, `remove_child`,
//! `replace_child`) keep parent links consistent and touch only the virtual
//! tree. Changing the live tree is the reconciler's job.
//!
//! # Design Decisions
//!
//! 1. Nodes are reference-counted handles so components can keep the tree they
//!    last rendered while it also sits in its parent's child list.
//!
//! 2. Parent links are weak. A child never keeps its parent alive.
//!
//! 3. Lifecycle hooks are `FnOnce`, so firing one consumes it.

mod build;
mod node;
mod props;

pub use build::{build, h, svg, IntoChildren};
pub use node::{Child, Namespace, NodeKind, VNode};
pub use props::{listener_event, AttrValue, Listener, Prop, Properties, LISTENER_PREFIX};
