//! Reactive Primitives
//!
//! State lives in [`Observable`] cells; UI lives in components, which are
//! plain functions that read observables and return a tree.
//!
//! # Concepts
//!
//! ## Observables
//!
//! An Observable holds one value. Setting a different value notifies its
//! subscribers synchronously, in the order they subscribed. Setting an equal
//! value is ignored.
//!
//! ## Components
//!
//! A component closes over the observables it reads. [`Mounted`] turns one
//! into a live instance, and [`Mounted::bind`] wires an observable to it
//! through the [`UpdateScheduler`](crate::scheduler::UpdateScheduler), so a
//! burst of changes within one frame costs a single re-render that sees the
//! final value.
//!
//! # Implementation Notes
//!
//! There is no dependency tracking. A component re-renders because it was
//! explicitly bound to an observable, not because it happened to read one.

mod component;
mod observable;

pub use component::{Component, Mounted};
pub use observable::{create_observable, Observable};
