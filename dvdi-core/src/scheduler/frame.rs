//! Frame pacing hosts.
//!
//! The scheduler never decides when a frame happens. It asks a
//! [`FrameHost`] for one callback at the next frame and the host decides when
//! that is: a test tick, or a timer on a tokio `LocalSet`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

/// Work to run at the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// The host environment's frame-pacing facility.
pub trait FrameHost {
    /// Run `callback` once, at the next frame.
    fn request_frame(&self, callback: FrameCallback);
}

/// A host whose frames only happen when [`ManualFrames::tick`] is called.
#[derive(Clone, Default)]
pub struct ManualFrames {
    queue: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the callbacks requested before this tick. Callbacks requested while
    /// the tick runs wait for the next one. Returns how many ran.
    pub fn tick(&self) -> usize {
        let batch: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        let count = batch.len();
        for callback in batch {
            callback();
        }
        count
    }

    /// Number of callbacks waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameHost for ManualFrames {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

/// Frame timing for [`TokioFrames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Delay between a frame request and the frame.
    pub interval: Duration,
}

impl FrameConfig {
    pub fn with_fps(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(16),
        }
    }
}

/// A host that runs frames as local tasks on the current tokio `LocalSet`.
///
/// Requesting a frame outside a `LocalSet` panics, as `spawn_local` does.
#[derive(Debug, Clone, Default)]
pub struct TokioFrames {
    config: FrameConfig,
}

impl TokioFrames {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> FrameConfig {
        self.config
    }
}

impl FrameHost for TokioFrames {
    fn request_frame(&self, callback: FrameCallback) {
        let interval = self.config.interval;
        trace!(?interval, "frame requested");
        tokio::task::spawn_local(async move {
            tokio::time::sleep(interval).await;
            callback();
        });
    }
}
