//! Live Nodes
//!
//! The live tree is what the reconciler materializes into: elements with
//! attributes, listeners and children, plus text nodes. Every node belongs to
//! the [`Document`] that created it, and every mutation is counted in that
//! document's [`MutationStats`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::{DomError, Result};
use super::event::Event;
use super::html::is_valid_name;
use crate::vdom::{AttrValue, Listener, Namespace};

/// Counters for operations performed on a document's nodes.
///
/// Node creation is not a tree mutation: a created node is invisible until it
/// is inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationStats {
    pub nodes_created: u64,
    pub nodes_inserted: u64,
    pub nodes_removed: u64,
    pub nodes_replaced: u64,
    pub properties_set: u64,
    pub properties_cleared: u64,
    pub listeners_added: u64,
    pub listeners_removed: u64,
}

impl MutationStats {
    /// Number of operations that changed an existing tree.
    pub fn tree_mutations(&self) -> u64 {
        self.nodes_inserted
            + self.nodes_removed
            + self.nodes_replaced
            + self.properties_set
            + self.properties_cleared
            + self.listeners_added
            + self.listeners_removed
    }
}

#[derive(Default)]
struct DocumentShared {
    stats: Cell<MutationStats>,
}

impl DocumentShared {
    fn record(&self, f: impl FnOnce(&mut MutationStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Factory and owner of live nodes.
#[derive(Clone, Default)]
pub struct Document {
    shared: Rc<DocumentShared>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element. `tag` must be a valid markup name.
    pub fn create_element(&self, namespace: Namespace, tag: &str) -> Result<LiveNode> {
        if !is_valid_name(tag) {
            return Err(DomError::InvalidName {
                name: tag.to_string(),
            });
        }
        self.shared.record(|s| s.nodes_created += 1);
        Ok(LiveNode::new(
            LiveKind::Element {
                namespace,
                tag: tag.to_string(),
            },
            Rc::clone(&self.shared),
        ))
    }

    pub fn create_text_node(&self, text: &str) -> LiveNode {
        self.shared.record(|s| s.nodes_created += 1);
        LiveNode::new(LiveKind::Text(text.to_string()), Rc::clone(&self.shared))
    }

    /// Snapshot of the mutation counters.
    pub fn mutations(&self) -> MutationStats {
        self.shared.stats.get()
    }

    pub fn reset_mutations(&self) {
        self.shared.stats.set(MutationStats::default());
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("mutations", &self.mutations())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum LiveKind {
    Element { namespace: Namespace, tag: String },
    Text(String),
}

pub(crate) struct LiveData {
    pub(crate) kind: LiveKind,
    pub(crate) properties: IndexMap<String, AttrValue>,
    pub(crate) listeners: SmallVec<[(String, Listener); 2]>,
    pub(crate) children: Vec<LiveNode>,
    parent: Weak<RefCell<LiveData>>,
    document: Rc<DocumentShared>,
}

/// Handle to a node in the live tree. Equality is identity.
#[derive(Clone)]
pub struct LiveNode(pub(crate) Rc<RefCell<LiveData>>);

impl LiveNode {
    fn new(kind: LiveKind, document: Rc<DocumentShared>) -> Self {
        Self(Rc::new(RefCell::new(LiveData {
            kind,
            properties: IndexMap::new(),
            listeners: SmallVec::new(),
            children: Vec::new(),
            parent: Weak::new(),
            document,
        })))
    }

    /// The document that created this node.
    pub fn owner_document(&self) -> Document {
        Document {
            shared: Rc::clone(&self.0.borrow().document),
        }
    }

    fn record(&self, f: impl FnOnce(&mut MutationStats)) {
        self.0.borrow().document.record(f);
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, LiveKind::Text(_))
    }

    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().kind {
            LiveKind::Element { tag, .. } => Some(tag.clone()),
            LiveKind::Text(_) => None,
        }
    }

    pub fn namespace(&self) -> Option<Namespace> {
        match &self.0.borrow().kind {
            LiveKind::Element { namespace, .. } => Some(*namespace),
            LiveKind::Text(_) => None,
        }
    }

    /// Content of a text node; `None` for elements.
    pub fn text(&self) -> Option<String> {
        match &self.0.borrow().kind {
            LiveKind::Text(text) => Some(text.clone()),
            LiveKind::Element { .. } => None,
        }
    }

    /// Concatenated text of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let data = self.0.borrow();
        match &data.kind {
            LiveKind::Text(text) => out.push_str(text),
            LiveKind::Element { .. } => {
                for child in &data.children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn parent(&self) -> Option<LiveNode> {
        self.0.borrow().parent.upgrade().map(LiveNode)
    }

    /// Position of this node within its parent.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.parent().and_then(|parent| parent.index_of(self))
    }

    pub fn index_of(&self, child: &LiveNode) -> Option<usize> {
        self.0.borrow().children.iter().position(|c| c.ptr_eq(child))
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child_at(&self, index: usize) -> Option<LiveNode> {
        self.0.borrow().children.get(index).cloned()
    }

    pub fn children(&self) -> Vec<LiveNode> {
        self.0.borrow().children.clone()
    }

    fn ensure_element(&self) -> Result<()> {
        if self.is_text() {
            return Err(DomError::NotAnElement);
        }
        Ok(())
    }

    /// Detach `child` from wherever it currently lives, without counting a
    /// mutation; the caller records the insert that follows.
    fn adopt(&self, child: &LiveNode) -> Result<()> {
        let mut ancestor = Some(self.clone());
        while let Some(node) = ancestor {
            if node.ptr_eq(child) {
                return Err(DomError::HierarchyCycle);
            }
            ancestor = node.parent();
        }

        if let Some(previous) = child.parent() {
            previous.0.borrow_mut().children.retain(|c| !c.ptr_eq(child));
        }
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        Ok(())
    }

    /// Insert `child` at `index`; `index == child_count()` appends.
    pub fn insert_child(&self, child: &LiveNode, index: usize) -> Result<()> {
        self.ensure_element()?;
        let len = self.child_count();
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        self.adopt(child)?;
        // Adopting may have shifted our own children if `child` was one of them.
        let index = index.min(self.child_count());
        self.0.borrow_mut().children.insert(index, child.clone());
        self.record(|s| s.nodes_inserted += 1);
        Ok(())
    }

    pub fn append_child(&self, child: &LiveNode) -> Result<()> {
        self.insert_child(child, self.child_count())
    }

    /// Remove and return the child at `index`.
    pub fn remove_child_at(&self, index: usize) -> Result<LiveNode> {
        let len = self.child_count();
        if index >= len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        let removed = self.0.borrow_mut().children.remove(index);
        removed.0.borrow_mut().parent = Weak::new();
        self.record(|s| s.nodes_removed += 1);
        Ok(removed)
    }

    /// Put `new_child` at `index` and return the node it displaced.
    pub fn replace_child_at(&self, new_child: &LiveNode, index: usize) -> Result<LiveNode> {
        let len = self.child_count();
        if index >= len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        if self.child_at(index).is_some_and(|c| c.ptr_eq(new_child)) {
            return Ok(new_child.clone());
        }
        if new_child.parent().is_some_and(|p| p.ptr_eq(self)) {
            return Err(DomError::AlreadyChild);
        }

        self.adopt(new_child)?;
        let old = std::mem::replace(&mut self.0.borrow_mut().children[index], new_child.clone());
        old.0.borrow_mut().parent = Weak::new();
        self.record(|s| s.nodes_replaced += 1);
        Ok(old)
    }

    /// Remove every child, returning how many were removed.
    pub fn clear_children(&self) -> usize {
        let removed: Vec<LiveNode> = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &removed {
            child.0.borrow_mut().parent = Weak::new();
        }
        let count = removed.len();
        self.record(|s| s.nodes_removed += count as u64);
        count
    }

    pub fn set_property(&self, key: &str, value: impl Into<AttrValue>) {
        self.0
            .borrow_mut()
            .properties
            .insert(key.to_string(), value.into());
        self.record(|s| s.properties_set += 1);
    }

    /// Clear a property. Returns the value it had.
    pub fn remove_property(&self, key: &str) -> Option<AttrValue> {
        let removed = self.0.borrow_mut().properties.shift_remove(key);
        if removed.is_some() {
            self.record(|s| s.properties_cleared += 1);
        }
        removed
    }

    pub fn property(&self, key: &str) -> Option<AttrValue> {
        self.0.borrow().properties.get(key).cloned()
    }

    pub fn property_keys(&self) -> Vec<String> {
        self.0.borrow().properties.keys().cloned().collect()
    }

    /// Attach `listener` for `event`. Attaching the same reference twice for
    /// the same event is a no-op.
    pub fn add_event_listener(&self, event: &str, listener: Listener) {
        {
            let mut data = self.0.borrow_mut();
            if data
                .listeners
                .iter()
                .any(|(name, l)| name == event && l.ptr_eq(&listener))
            {
                return;
            }
            data.listeners.push((event.to_string(), listener));
        }
        self.record(|s| s.listeners_added += 1);
    }

    /// Detach `listener` from `event`. Only the exact reference that was
    /// attached is removed; anything else is silently ignored.
    pub fn remove_event_listener(&self, event: &str, listener: &Listener) -> bool {
        let removed = {
            let mut data = self.0.borrow_mut();
            let before = data.listeners.len();
            data.listeners
                .retain(|(name, l)| !(name == event && l.ptr_eq(listener)));
            data.listeners.len() != before
        };
        if removed {
            self.record(|s| s.listeners_removed += 1);
        }
        removed
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    pub fn has_listener(&self, event: &str, listener: &Listener) -> bool {
        self.0
            .borrow()
            .listeners
            .iter()
            .any(|(name, l)| name == event && l.ptr_eq(listener))
    }

    /// Dispatch `name` on this node and bubble it through the ancestors.
    pub fn dispatch_event(&self, name: &str) -> Event {
        let event = Event::new(name, self.clone());
        let mut current = Some(self.clone());

        while let Some(node) = current {
            let listeners: SmallVec<[Listener; 2]> = node
                .0
                .borrow()
                .listeners
                .iter()
                .filter(|(event_name, _)| event_name == name)
                .map(|(_, l)| l.clone())
                .collect();

            event.set_current_target(&node);
            for listener in listeners {
                listener.call(&event);
            }
            if event.is_propagation_stopped() {
                break;
            }
            current = node.parent();
        }

        event
    }

    /// First node in this subtree (pre-order, self included) whose `id`
    /// property equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<LiveNode> {
        let matches = matches!(
            self.0.borrow().properties.get("id"),
            Some(AttrValue::Text(value)) if value == id
        );
        if matches {
            return Some(self.clone());
        }
        self.children()
            .into_iter()
            .find_map(|child| child.find_by_id(id))
    }

    pub fn ptr_eq(&self, other: &LiveNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for LiveNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for LiveNode {}

impl fmt::Debug for LiveNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        match &data.kind {
            LiveKind::Text(text) => f.debug_tuple("Text").field(text).finish(),
            LiveKind::Element { namespace, tag } => f
                .debug_struct("Element")
                .field("namespace", namespace)
                .field("tag", tag)
                .field("properties", &data.properties)
                .field("listeners", &data.listeners.len())
                .field("children", &data.children)
                .finish(),
        }
    }
}
