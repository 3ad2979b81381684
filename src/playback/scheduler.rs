//! Per-viewport frame scheduling against monotonic time.

use std::time::{Duration, Instant};

use log::trace;

use crate::container::{Container, FrameRecord};

/// Playback state of a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No container bound; every operation is a no-op.
    Unbound,
    /// A container is bound and frames advance on `tick`.
    Playing,
}

/// Advances one viewport's current frame as time passes.
///
/// The scheduler does not own a clock. The driving thread passes `now` into
/// every call, which keeps playback deterministic under test.
///
/// ## Example
///
/// ```ignore
/// let mut scheduler = PlaybackScheduler::new();
/// scheduler.bind(container, Instant::now());
///
/// // From the timer callback:
/// if scheduler.tick(Instant::now()) {
///     request_redraw(scheduler.current_frame().unwrap());
/// }
/// ```
#[derive(Debug)]
pub struct PlaybackScheduler<H> {
    container: Option<Container<H>>,
    current_frame: usize,
    last_advance: Option<Instant>,
}

impl<H> Default for PlaybackScheduler<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> PlaybackScheduler<H> {
    /// Create an unbound scheduler.
    pub fn new() -> Self {
        Self {
            container: None,
            current_frame: 0,
            last_advance: None,
        }
    }

    /// Bind a container and start playing from its first frame.
    ///
    /// Any previously bound container is released.
    pub fn bind(&mut self, container: Container<H>, now: Instant) {
        self.container = Some(container);
        self.current_frame = 0;
        self.last_advance = Some(now);
    }

    /// Release the bound container, returning to `Unbound`.
    pub fn unbind(&mut self) -> Option<Container<H>> {
        self.current_frame = 0;
        self.last_advance = None;
        self.container.take()
    }

    /// Advance at most one frame if the current frame's delay has elapsed.
    ///
    /// Returns true if the frame changed. A tick that finds several delays
    /// elapsed still advances a single frame and restarts the delay from `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(container) = self.container.as_ref() else {
            return false;
        };
        // Nothing to cycle through, and no modulus by zero.
        if container.is_empty() {
            return false;
        }
        let Some(last) = self.last_advance else {
            return false;
        };

        let delay = Duration::from_millis(u64::from(container.frame(self.current_frame).delay_ms));
        if now.saturating_duration_since(last) < delay {
            return false;
        }

        self.current_frame = (self.current_frame + 1) % container.frame_count();
        self.last_advance = Some(now);
        trace!("advanced to frame {}", self.current_frame);
        true
    }

    /// Rewind to the first frame and restart its delay from `now`.
    ///
    /// Returns true if a container is bound.
    pub fn reset(&mut self, now: Instant) -> bool {
        if self.container.is_none() {
            return false;
        }
        self.current_frame = 0;
        self.last_advance = Some(now);
        true
    }

    /// Get the current playback state.
    #[inline]
    pub fn state(&self) -> PlaybackState {
        if self.container.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Unbound
        }
    }

    /// Check if a container is bound.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.container.is_some()
    }

    /// Get the current frame index.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_frame
    }

    /// Get the current frame, if a non-empty container is bound.
    pub fn current_frame(&self) -> Option<&FrameRecord<H>> {
        self.container.as_ref()?.get(self.current_frame)
    }

    /// Time of the last advance (or bind/reset), if bound.
    pub fn last_advance(&self) -> Option<Instant> {
        self.last_advance
    }

    pub fn container(&self) -> Option<&Container<H>> {
        self.container.as_ref()
    }
}
