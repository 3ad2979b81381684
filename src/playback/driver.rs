//! Ticks every viewport and forwards redraw requests to the compositor.

use std::time::Instant;

use super::viewport::{Rect, SurfaceId, Viewport};

/// External capability that puts an image on screen.
///
/// Scaling the image into `target` and presenting it are up to the
/// implementation.
pub trait SurfaceCompositor<H> {
    fn on_redraw_requested(&mut self, surface: SurfaceId, image: &H, target: Rect);
}

impl<H, C: SurfaceCompositor<H> + ?Sized> SurfaceCompositor<H> for &mut C {
    fn on_redraw_requested(&mut self, surface: SurfaceId, image: &H, target: Rect) {
        (**self).on_redraw_requested(surface, image, target);
    }
}

/// Counters accumulated by a [`CompositorDriver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Timer signals handled.
    pub ticks: u64,
    /// Reset signals handled.
    pub resets: u64,
    /// Redraw requests issued.
    pub redraws: u64,
}

impl std::fmt::Display for DriverStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ticks, {} resets, {} redraws",
            self.ticks, self.resets, self.redraws
        )
    }
}

/// Drives all viewports from the external timer and reset signals.
#[derive(Debug, Default)]
pub struct CompositorDriver {
    stats: DriverStats,
}

impl CompositorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Handle one timer signal.
    ///
    /// Ticks every viewport and requests a redraw for each one whose frame
    /// changed. Returns the number of redraws requested.
    pub fn on_timer<H, C>(
        &mut self,
        viewports: &mut [Viewport<H>],
        now: Instant,
        compositor: &mut C,
    ) -> usize
    where
        C: SurfaceCompositor<H> + ?Sized,
    {
        self.stats.ticks += 1;
        let mut redraws = 0;
        for viewport in viewports.iter_mut() {
            if viewport.scheduler_mut().tick(now) && request_redraw(viewport, compositor) {
                redraws += 1;
            }
        }
        self.stats.redraws += redraws as u64;
        redraws
    }

    /// Handle a reset signal: rewind every playing viewport and redraw it.
    ///
    /// Returns the number of redraws requested.
    pub fn on_reset<H, C>(
        &mut self,
        viewports: &mut [Viewport<H>],
        now: Instant,
        compositor: &mut C,
    ) -> usize
    where
        C: SurfaceCompositor<H> + ?Sized,
    {
        self.stats.resets += 1;
        let mut redraws = 0;
        for viewport in viewports.iter_mut() {
            if viewport.scheduler_mut().reset(now) && request_redraw(viewport, compositor) {
                redraws += 1;
            }
        }
        self.stats.redraws += redraws as u64;
        redraws
    }
}

/// Returns false if the viewport has no frame to show (empty container).
fn request_redraw<H, C>(viewport: &Viewport<H>, compositor: &mut C) -> bool
where
    C: SurfaceCompositor<H> + ?Sized,
{
    match viewport.scheduler().current_frame() {
        Some(frame) => {
            compositor.on_redraw_requested(viewport.surface(), &frame.image, viewport.target());
            true
        }
        None => false,
    }
}
