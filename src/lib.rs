//! datview - Multi-viewport playback of `.dat` image sequences.
//!
//! This crate loads animated image sequences from a small binary container
//! format and plays each one back in its own viewport, advancing frames
//! against wall-clock time.
//!
//! # Architecture
//!
//! - `container`: parsing and validating containers into decoded frames
//! - `decode`: the image decoding capability the parser relies on
//! - `playback`: per-viewport scheduling and the timer/redraw driver
//! - `schema`: player configuration
//!
//! Windowing and the final blit are left to the embedding application,
//! which implements [`SurfaceCompositor`] and calls the driver from its
//! timer.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Instant;
//!
//! use datview::{
//!     CompositorDriver, ContainerParser, PlayerConfig, RasterDecoder, Rect, SurfaceCompositor,
//!     SurfaceId, decode::Bitmap, load_viewports,
//! };
//!
//! struct Screen;
//!
//! impl SurfaceCompositor<Bitmap> for Screen {
//!     fn on_redraw_requested(&mut self, surface: SurfaceId, image: &Bitmap, target: Rect) {
//!         println!("{surface:?}: {}x{} -> {target:?}", image.width, image.height);
//!     }
//! }
//!
//! let config = PlayerConfig::default();
//! let mut parser = ContainerParser::new(RasterDecoder::new());
//! let mut viewports = load_viewports(&config, &mut parser, Instant::now());
//!
//! let mut driver = CompositorDriver::new();
//! driver.on_timer(&mut viewports, Instant::now(), &mut Screen);
//! ```

pub mod container;
pub mod decode;
pub mod playback;
pub mod schema;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use container::{Container, ContainerParser, FrameRecord, ParseError};
pub use decode::{FnDecoder, ImageDecoder, RasterDecoder};
pub use playback::{
    CompositorDriver, PlaybackScheduler, PlaybackState, Rect, SurfaceCompositor, SurfaceId,
    Viewport, load_viewports,
};
pub use schema::{PlayerConfig, ViewportConfig};
