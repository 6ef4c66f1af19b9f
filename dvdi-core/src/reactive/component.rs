//! Function Components
//!
//! A component is anything that produces a fresh tree on demand. There is no
//! base type to inherit from: a closure returning a [`VNode`] qualifies.
//!
//! [`Mounted`] is one instance of a component. It keeps the tree it rendered
//! last and, when asked to re-render, reconciles a fresh tree against it at
//! whatever slot that tree currently occupies in the live document.
//!
//! # Locating the slot
//!
//! The instance does not remember where it was mounted. It walks upward from
//! the previous tree: its live node gives the live parent and the index
//! within it, and its parent link gives the owning virtual node. Moving the
//! subtree elsewhere therefore needs no bookkeeping.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::observable::Observable;
use crate::reconcile::{reconcile, ReconcileError, Result};
use crate::scheduler::{Update, UpdateScheduler};
use crate::vdom::{Child, VNode};

/// Anything that can render a tree.
pub trait Component {
    fn render(&self) -> VNode;
}

impl<F> Component for F
where
    F: Fn() -> VNode,
{
    fn render(&self) -> VNode {
        self()
    }
}

struct MountedInner {
    component: Box<dyn Component>,
    tree: RefCell<VNode>,
    update: RefCell<Option<Update>>,
}

/// A component instance that re-renders itself in place.
///
/// Clones are handles to the same instance.
#[derive(Clone)]
pub struct Mounted {
    inner: Rc<MountedInner>,
}

impl Mounted {
    /// Render `component` once. The returned instance owns that first tree,
    /// which the caller places into a larger tree or mounts directly.
    pub fn new(component: impl Component + 'static) -> Self {
        let tree = component.render();
        Self {
            inner: Rc::new(MountedInner {
                component: Box::new(component),
                tree: RefCell::new(tree),
                update: RefCell::new(None),
            }),
        }
    }

    /// The tree rendered last.
    pub fn tree(&self) -> VNode {
        self.inner.tree.borrow().clone()
    }

    /// Render a fresh tree and reconcile it against the previous one.
    ///
    /// An instance whose tree was never materialized just swaps trees,
    /// keeping its virtual parent's children consistent.
    pub fn rerender(&self) -> Result<()> {
        let old = self.tree();
        let new = self.inner.component.render();
        let old_child = Child::from(&old);
        let parent_vnode = old.parent();

        if let Some(live) = old.live() {
            let live_parent = live
                .parent()
                .ok_or(ReconcileError::NotMounted { index: 0 })?;
            let index = live_parent
                .index_of(&live)
                .ok_or(ReconcileError::NotMounted { index: 0 })?;

            debug!(index, "re-rendering component");
            reconcile(
                &live_parent,
                parent_vnode.as_ref(),
                Some(&old_child),
                Some(&Child::from(&new)),
                index,
            )?;
        } else {
            debug!("re-rendering unmounted component");
        }

        if let Some(parent) = &parent_vnode {
            parent.replace_child(&new, &old_child);
        }
        *self.inner.tree.borrow_mut() = new;
        Ok(())
    }

    /// The update that re-renders this instance. Every call returns the same
    /// update, so the scheduler coalesces requests for one instance.
    ///
    /// The update does nothing once every handle to the instance is gone.
    pub fn update(&self) -> Update {
        self.inner
            .update
            .borrow_mut()
            .get_or_insert_with(|| {
                let weak = Rc::downgrade(&self.inner);
                Update::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        // The reconciler already logged the mismatch.
                        if let Err(err) = (Mounted { inner }).rerender() {
                            debug!(%err, "component re-render abandoned");
                        }
                    }
                })
            })
            .clone()
    }

    /// Re-render at the next frame whenever `observable` changes.
    pub fn bind<T>(&self, observable: &Observable<T>, scheduler: &UpdateScheduler)
    where
        T: Clone + PartialEq + 'static,
    {
        let update = self.update();
        let scheduler = scheduler.clone();
        observable.subscribe(move || scheduler.enqueue(update.clone()));
    }
}

impl fmt::Debug for Mounted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mounted")
            .field("tag", &self.tree().tag_name())
            .field("mounted", &self.tree().is_mounted())
            .finish()
    }
}
