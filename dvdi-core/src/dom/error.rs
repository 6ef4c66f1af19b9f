use thiserror::Error;

/// Errors raised by structural operations on the live tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("index {index} is out of bounds for a node with {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("text nodes cannot have children")]
    NotAnElement,

    #[error("a node cannot be inserted into its own subtree")]
    HierarchyCycle,

    #[error("node is already a child of this parent")]
    AlreadyChild,

    #[error("`{name}` is not a valid element name")]
    InvalidName { name: String },
}

pub type Result<T> = std::result::Result<T, DomError>;
