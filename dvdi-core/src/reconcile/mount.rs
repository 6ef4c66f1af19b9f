//! Root-level entry points for putting whole pages into a container.

use tracing::debug;

use super::diff::reconcile;
use super::error::{ReconcileError, Result};
use crate::dom::LiveNode;
use crate::vdom::{Child, VNode};

/// Append `tree` as the last child of `container`.
pub fn mount(container: &LiveNode, tree: &VNode) -> Result<()> {
    let index = container.child_count();
    debug!(index, "mounting root");
    reconcile(container, None, None, Some(&Child::from(tree)), index)
}

/// Remove a tree previously mounted into `container`.
pub fn unmount(container: &LiveNode, tree: &VNode) -> Result<()> {
    let index = tree
        .live()
        .and_then(|live| container.index_of(&live))
        .ok_or(ReconcileError::NotMounted {
            index: container.child_count(),
        })?;
    debug!(index, "unmounting root");
    reconcile(container, None, Some(&Child::from(tree)), None, index)
}

/// Swap the page currently shown in `container` for `next`.
///
/// Used on navigation, where the old page has no structural relation to the
/// new one. With no `current` page this simply mounts `next`.
pub fn replace_root(container: &LiveNode, current: Option<&VNode>, next: &VNode) -> Result<()> {
    match current {
        Some(current) => {
            let index = current
                .live()
                .and_then(|live| container.index_of(&live))
                .ok_or(ReconcileError::NotMounted { index: 0 })?;
            reconcile(
                container,
                None,
                Some(&Child::from(current)),
                Some(&Child::from(next)),
                index,
            )
        }
        None => mount(container, next),
    }
}
