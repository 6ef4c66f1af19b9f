//! Events dispatched through the live tree.

use std::cell::{Cell, RefCell};

use super::node::LiveNode;

/// An event travelling from its target up through the target's ancestors.
#[derive(Debug)]
pub struct Event {
    name: String,
    target: LiveNode,
    current_target: RefCell<Option<LiveNode>>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    pub(crate) fn new(name: &str, target: LiveNode) -> Self {
        Self {
            name: name.to_string(),
            target,
            current_target: RefCell::new(None),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the event was dispatched on.
    pub fn target(&self) -> &LiveNode {
        &self.target
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> Option<LiveNode> {
        self.current_target.borrow().clone()
    }

    pub(crate) fn set_current_target(&self, node: &LiveNode) {
        *self.current_target.borrow_mut() = Some(node.clone());
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
