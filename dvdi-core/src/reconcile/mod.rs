//! Materialization and Reconciliation
//!
//! This module turns virtual trees into live ones and keeps them in step.
//!
//! - [`render`] materializes a virtual subtree into a new, detached live
//!   subtree.
//! - [`reconcile`] diffs the previously applied tree against a new one at a
//!   single slot of a live parent and patches the live tree, firing lifecycle
//!   hooks on the way.
//! - [`mount`], [`unmount`] and [`replace_root`] wrap `reconcile` for the
//!   common case of a page root inside a container.
//!
//! The rest of the crate never mutates the live tree directly.

mod diff;
mod error;
mod lifecycle;
mod mount;
mod props;
mod render;

pub use diff::{changed, reconcile};
pub use error::{ReconcileError, Result};
pub use mount::{mount, replace_root, unmount};
pub use render::render;
