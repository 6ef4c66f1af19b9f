//! Live Tree
//!
//! The host-side UI tree that virtual trees are materialized into. It keeps
//! the same shape a browser document has (elements with attributes and
//! listeners, text nodes, ordered children, bubbling events) but lives
//! entirely in memory, so pages can be rendered natively and serialized to
//! HTML.
//!
//! Every mutation goes through a [`LiveNode`] method and is counted in the
//! owning [`Document`]'s [`MutationStats`]. That is how callers check that a
//! reconciliation pass touched nothing it did not have to.

mod error;
mod event;
mod html;
mod node;

pub use error::DomError;
pub use event::Event;
pub use html::Snapshot;
pub use node::{Document, LiveNode, MutationStats};
