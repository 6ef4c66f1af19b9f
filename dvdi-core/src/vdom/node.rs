//! Virtual Nodes
//!
//! A [`VNode`] describes one intended element (or text node) of the UI tree.
//! It is a cheap handle around shared state, so the same node can be held by
//! its parent's `children`, by a component that re-renders it, and by a
//! lifecycle hook at once. Identity is pointer identity.
//!
//! The parent link is a [`Weak`] reference. Parents own their children, never
//! the other way round.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::props::{Prop, Properties};
use crate::dom::LiveNode;

/// Lifecycle hook, consumed when it fires.
pub(crate) type Hook = Box<dyn FnOnce()>;

/// Which construction and property rules apply to a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    #[default]
    Html,
    Svg,
}

impl Namespace {
    /// The XML namespace URI used when creating elements of this kind.
    pub fn uri(&self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
        }
    }
}

/// What a virtual node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with the given tag name.
    Element(String),
    /// A text node with the given content.
    Text(String),
}

struct VNodeData {
    namespace: Namespace,
    kind: NodeKind,
    props: Properties,
    children: Vec<Child>,
    parent: Weak<RefCell<VNodeData>>,
    live: Option<LiveNode>,
    on_mount: Option<Hook>,
    on_unmount: Option<Hook>,
}

/// Handle to a virtual node.
#[derive(Clone)]
pub struct VNode(Rc<RefCell<VNodeData>>);

/// A child slot: either a virtual node or a bare string.
///
/// Strings carry no identity. Two equal strings at the same position are the
/// same child as far as reconciliation is concerned.
#[derive(Debug, Clone)]
pub enum Child {
    Element(VNode),
    Text(String),
}

impl VNode {
    /// Create an element node. Element children get their parent link set.
    pub fn new(
        namespace: Namespace,
        tag: impl Into<String>,
        props: Properties,
        children: Vec<Child>,
    ) -> Self {
        let node = Self(Rc::new(RefCell::new(VNodeData {
            namespace,
            kind: NodeKind::Element(tag.into()),
            props,
            children: Vec::new(),
            parent: Weak::new(),
            live: None,
            on_mount: None,
            on_unmount: None,
        })));

        for child in &children {
            if let Child::Element(element) = child {
                element.set_parent(Some(&node));
            }
        }
        node.0.borrow_mut().children = children;
        node
    }

    /// Create a text node that carries identity and lifecycle hooks.
    pub fn text(content: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(VNodeData {
            namespace: Namespace::Html,
            kind: NodeKind::Text(content.into()),
            props: Properties::new(),
            children: Vec::new(),
            parent: Weak::new(),
            live: None,
            on_mount: None,
            on_unmount: None,
        })))
    }

    pub fn namespace(&self) -> Namespace {
        self.0.borrow().namespace
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().kind.clone()
    }

    /// Tag name, or `None` for a text node.
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(tag) => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Text(_))
    }

    pub fn properties(&self) -> Ref<'_, Properties> {
        Ref::map(self.0.borrow(), |data| &data.props)
    }

    pub fn property(&self, key: &str) -> Option<Prop> {
        self.0.borrow().props.get(key).cloned()
    }

    /// Set a property on the virtual node. The live tree is not touched.
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<Prop>) {
        self.0.borrow_mut().props.insert(key.into(), value.into());
    }

    pub fn children(&self) -> Ref<'_, [Child]> {
        Ref::map(self.0.borrow(), |data| data.children.as_slice())
    }

    pub fn child(&self, index: usize) -> Option<Child> {
        self.0.borrow().children.get(index).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Append `child`, taking over its parent link.
    pub fn append_child(&self, child: impl Into<Child>) {
        let child = child.into();
        if let Child::Element(element) = &child {
            element.set_parent(Some(self));
        }
        self.0.borrow_mut().children.push(child);
    }

    /// Remove the first occurrence of `child`. Returns whether it was found.
    pub fn remove_child(&self, child: &Child) -> bool {
        let removed = {
            let mut data = self.0.borrow_mut();
            match data.children.iter().position(|c| c == child) {
                Some(index) => Some(data.children.remove(index)),
                None => None,
            }
        };

        match removed {
            Some(Child::Element(element)) => {
                element.set_parent(None);
                true
            }
            Some(Child::Text(_)) => true,
            None => false,
        }
    }

    /// Replace `old_child` with `new_child` in place. Returns whether
    /// `old_child` was found.
    pub fn replace_child(&self, new_child: impl Into<Child>, old_child: &Child) -> bool {
        let new_child = new_child.into();
        let replaced = {
            let mut data = self.0.borrow_mut();
            match data.children.iter().position(|c| c == old_child) {
                Some(index) => Some(std::mem::replace(
                    &mut data.children[index],
                    new_child.clone(),
                )),
                None => None,
            }
        };

        let Some(outgoing) = replaced else {
            return false;
        };
        if let Child::Element(element) = outgoing {
            element.set_parent(None);
        }
        if let Child::Element(element) = &new_child {
            element.set_parent(Some(self));
        }
        true
    }

    /// The owning virtual node, if this node is somebody's child.
    pub fn parent(&self) -> Option<VNode> {
        self.0.borrow().parent.upgrade().map(VNode)
    }

    pub(crate) fn set_parent(&self, parent: Option<&VNode>) {
        self.0.borrow_mut().parent = parent.map_or_else(Weak::new, |p| Rc::downgrade(&p.0));
    }

    /// The live node this virtual node currently owns.
    pub fn live(&self) -> Option<LiveNode> {
        self.0.borrow().live.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.0.borrow().live.is_some()
    }

    pub(crate) fn set_live(&self, live: Option<LiveNode>) {
        self.0.borrow_mut().live = live;
    }

    pub(crate) fn take_live(&self) -> Option<LiveNode> {
        self.0.borrow_mut().live.take()
    }

    /// Run `hook` once, right after this node's live node is attached.
    pub fn set_on_mount<F>(&self, hook: F)
    where
        F: FnOnce() + 'static,
    {
        self.0.borrow_mut().on_mount = Some(Box::new(hook));
    }

    /// Run `hook` once, right before this node's live node is detached.
    pub fn set_on_unmount<F>(&self, hook: F)
    where
        F: FnOnce() + 'static,
    {
        self.0.borrow_mut().on_unmount = Some(Box::new(hook));
    }

    pub fn has_on_mount(&self) -> bool {
        self.0.borrow().on_mount.is_some()
    }

    pub fn has_on_unmount(&self) -> bool {
        self.0.borrow().on_unmount.is_some()
    }

    pub(crate) fn take_on_mount(&self) -> Option<Hook> {
        self.0.borrow_mut().on_mount.take()
    }

    pub(crate) fn take_on_unmount(&self) -> Option<Hook> {
        self.0.borrow_mut().on_unmount.take()
    }

    pub(crate) fn put_on_unmount(&self, hook: Hook) {
        self.0.borrow_mut().on_unmount = Some(hook);
    }

    pub fn ptr_eq(&self, other: &VNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("VNode")
            .field("namespace", &data.namespace)
            .field("kind", &data.kind)
            .field("props", &data.props.keys().collect::<Vec<_>>())
            .field("children", &data.children)
            .field("mounted", &data.live.is_some())
            .finish()
    }
}

impl Child {
    pub fn as_element(&self) -> Option<&VNode> {
        match self {
            Child::Element(element) => Some(element),
            Child::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(text) => Some(text),
            Child::Element(_) => None,
        }
    }
}

impl PartialEq for Child {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Child::Element(a), Child::Element(b)) => a.ptr_eq(b),
            (Child::Text(a), Child::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Element(node)
    }
}

impl From<&VNode> for Child {
    fn from(node: &VNode) -> Self {
        Child::Element(node.clone())
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}
