//! Viewport playback: per-viewport scheduling and the tick/redraw driver.
//!
//! Everything here runs on the single driving thread. The windowing layer
//! calls [`CompositorDriver::on_timer`] from its periodic timer and
//! [`CompositorDriver::on_reset`] from its reset input; the driver forwards
//! changed frames to a [`SurfaceCompositor`].

mod driver;
mod scheduler;
mod viewport;

pub use driver::{CompositorDriver, DriverStats, SurfaceCompositor};
pub use scheduler::{PlaybackScheduler, PlaybackState};
pub use viewport::{Rect, SurfaceId, Viewport, load_viewports};
