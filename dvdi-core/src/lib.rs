//! dvdi Core
//!
//! This crate provides a small virtual-tree UI engine. It implements:
//!
//! - A virtual tree of elements and text, built with [`h!`] and [`svg!`]
//! - An in-memory live document the virtual tree is materialized into
//! - Positional reconciliation with mount and unmount lifecycle hooks
//! - Observable state and function components
//! - A frame-coalescing update scheduler
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `vdom`: Virtual nodes, properties and the tree factory
//! - `dom`: The live document, its events and HTML serialization
//! - `reconcile`: Materialization and the diff/patch algorithm
//! - `reactive`: Observables and component instances
//! - `scheduler`: Per-frame update batching and frame hosts
//!
//! Everything is single-threaded. Trees, observables and the scheduler are
//! `Rc` handles and are neither `Send` nor `Sync`.
//!
//! # Example
//!
//! ```rust,ignore
//! use dvdi_core::dom::Document;
//! use dvdi_core::reconcile::{mount, reconcile};
//! use dvdi_core::vdom::Namespace;
//! use dvdi_core::h;
//!
//! let doc = Document::new();
//! let app = doc.create_element(Namespace::Html, "div")?;
//!
//! let before = h!("p", { "className" => "note" }, "draft");
//! mount(&app, &before)?;
//!
//! let after = h!("p", { "className" => "note" }, "final");
//! reconcile(&app, None, Some(&before.into()), Some(&after.into()), 0)?;
//! assert_eq!(app.to_html(), r#"<div><p class="note">final</p></div>"#);
//! ```

pub mod dom;
pub mod reactive;
pub mod reconcile;
pub mod scheduler;
pub mod vdom;

pub use dom::{Document, LiveNode};
pub use reactive::{create_observable, Component, Mounted, Observable};
pub use reconcile::{reconcile, render, ReconcileError};
pub use scheduler::{Update, UpdateScheduler};
pub use vdom::{build, Child, Namespace, VNode};
