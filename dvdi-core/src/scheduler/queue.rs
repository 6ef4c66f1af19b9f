//! Update Scheduler
//!
//! The scheduler collects re-render requests and runs them once per frame.
//!
//! # Algorithm
//!
//! 1. `enqueue` adds an update to the pending set, keyed by callback identity.
//!    An update already pending is not added again.
//! 2. The first update added while idle arms the scheduler and requests one
//!    frame from the host.
//! 3. At the frame, the pending set is taken, the scheduler goes back to idle,
//!    and every update runs once, in the order it was first enqueued.
//!
//! Updates enqueued while a frame is running land in a fresh set and arm the
//! scheduler for the following frame.
//!
//! At most one frame is outstanding. A direct `flush` empties the set without
//! cancelling the frame already requested; updates enqueued after it wait for
//! that frame, and a frame that finds the scheduler idle does nothing.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use super::frame::FrameHost;

/// A re-render request. Two updates are the same update only if they share
/// the same callback allocation.
#[derive(Clone)]
pub struct Update(Rc<dyn Fn()>);

impl Update {
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self(Rc::new(run))
    }

    pub fn run(&self) {
        (self.0)();
    }

    pub fn ptr_eq(&self, other: &Update) -> bool {
        self.key() == other.key()
    }

    fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Update({:#x})", self.key())
    }
}

/// Whether a frame has been requested for the pending updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending, no frame requested.
    Idle,
    /// A frame has been requested and will flush the pending set.
    Armed,
}

/// Running totals kept by the scheduler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub frames_requested: u64,
    pub frames_flushed: u64,
    pub updates_run: u64,
    /// Enqueues dropped because the update was already pending.
    pub updates_coalesced: u64,
}

struct SchedulerInner {
    state: Cell<SchedulerState>,
    frame_outstanding: Cell<bool>,
    pending: RefCell<IndexMap<usize, Update>>,
    stats: Cell<SchedulerStats>,
    host: Rc<dyn FrameHost>,
}

impl SchedulerInner {
    fn record(&self, f: impl FnOnce(&mut SchedulerStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Coalesces update requests into one pass per frame.
#[derive(Clone)]
pub struct UpdateScheduler {
    inner: Rc<SchedulerInner>,
}

impl UpdateScheduler {
    /// Create an idle scheduler that requests frames from `host`.
    pub fn new(host: Rc<dyn FrameHost>) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                state: Cell::new(SchedulerState::Idle),
                frame_outstanding: Cell::new(false),
                pending: RefCell::new(IndexMap::new()),
                stats: Cell::new(SchedulerStats::default()),
                host,
            }),
        }
    }

    /// Request that `update` runs at the next frame.
    pub fn enqueue(&self, update: Update) {
        let added = match self.inner.pending.borrow_mut().entry(update.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(update);
                true
            }
        };

        if !added {
            trace!("update already pending");
            self.inner.record(|s| s.updates_coalesced += 1);
            return;
        }

        if self.inner.state.get() == SchedulerState::Idle {
            self.inner.state.set(SchedulerState::Armed);
            self.request_frame();
        }
    }

    fn request_frame(&self) {
        if self.inner.frame_outstanding.replace(true) {
            debug!("scheduler armed, frame already outstanding");
            return;
        }
        self.inner.record(|s| s.frames_requested += 1);
        debug!("scheduler armed, requesting frame");

        let weak = Rc::downgrade(&self.inner);
        self.inner.host.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                UpdateScheduler { inner }.on_frame();
            }
        }));
    }

    fn on_frame(&self) {
        self.inner.frame_outstanding.set(false);
        if self.inner.state.get() == SchedulerState::Idle {
            trace!("frame found nothing pending");
            return;
        }
        self.run_pending();
        self.inner.record(|s| s.frames_flushed += 1);
    }

    /// Run every pending update now, ahead of the frame. The frame already
    /// requested stays outstanding and serves later enqueues.
    ///
    /// Returns the number of updates run.
    pub fn flush(&self) -> usize {
        self.run_pending()
    }

    fn run_pending(&self) -> usize {
        let pending = std::mem::take(&mut *self.inner.pending.borrow_mut());
        self.inner.state.set(SchedulerState::Idle);

        let count = pending.len();
        debug!(count, "flushing updates");
        for update in pending.into_values() {
            update.run();
        }

        self.inner.record(|s| s.updates_run += count as u64);
        count
    }

    pub fn state(&self) -> SchedulerState {
        self.inner.state.get()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    pub fn is_pending(&self, update: &Update) -> bool {
        self.inner.pending.borrow().contains_key(&update.key())
    }

    pub fn stats(&self) -> SchedulerStats {
        self.inner.stats.get()
    }
}

impl fmt::Debug for UpdateScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateScheduler")
            .field("state", &self.state())
            .field("frame_outstanding", &self.inner.frame_outstanding.get())
            .field("pending", &self.pending_count())
            .field("stats", &self.stats())
            .finish()
    }
}
