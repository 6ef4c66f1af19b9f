//! Update Scheduling
//!
//! Components do not re-render the moment their state changes. They enqueue
//! an [`Update`] with the [`UpdateScheduler`], which runs every distinct
//! pending update once at the next frame. Any number of state changes inside
//! one frame therefore cost one reconciliation per component, and that pass
//! sees the final state.
//!
//! # Design Decisions
//!
//! 1. The scheduler is an explicit value with an explicit
//!    [`SchedulerState`] rather than process-wide state, so tests can own one
//!    and drive it deterministically.
//!
//! 2. Frames come from a [`FrameHost`]. Tests use [`ManualFrames`]; native
//!    programs use [`TokioFrames`].
//!
//! 3. There is no cancellation. An enqueued update always runs.

mod frame;
mod queue;

pub use frame::{FrameCallback, FrameConfig, FrameHost, ManualFrames, TokioFrames};
pub use queue::{SchedulerState, SchedulerStats, Update, UpdateScheduler};
