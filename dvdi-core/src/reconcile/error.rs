use thiserror::Error;

use crate::dom::DomError;

/// Structural misuse of the reconciler.
///
/// Every variant means the virtual tree handed in does not match the live
/// tree at the given slot. Continuing after one of these would break the
/// one-to-one correspondence between virtual and live nodes, so callers
/// should treat them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("cannot add a node at index {index}: parent has only {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("no live child at index {index}: parent has {len} children")]
    MissingLiveChild { index: usize, len: usize },

    #[error("live child at index {index} is not the node the old tree rendered")]
    LiveNodeMismatch { index: usize },

    #[error("old virtual node at index {index} is not mounted")]
    NotMounted { index: usize },

    #[error("new virtual node already owns a live node outside this slot")]
    AlreadyMounted,

    #[error(transparent)]
    Dom(#[from] DomError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
