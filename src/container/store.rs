//! Parsed containers: ordered, fully decoded frame records.

/// One decoded frame plus its playback delay.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameRecord<H> {
    /// Renderable handle produced by the image decoder.
    pub image: H,
    /// Time this frame stays on screen, in milliseconds.
    pub delay_ms: u32,
}

/// A fully validated container.
///
/// Only the parser builds these, and only after every frame decoded and
/// checked out, so a `Container` always holds exactly the header's frame
/// count. Dropping it releases every image handle it owns.
#[derive(Debug, PartialEq, Eq)]
pub struct Container<H> {
    format_version: u8,
    frames: Vec<FrameRecord<H>>,
}

impl<H> Container<H> {
    pub(crate) fn new(format_version: u8, frames: Vec<FrameRecord<H>>) -> Self {
        Self {
            format_version,
            frames,
        }
    }

    /// Get total number of frames.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Check if the container holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the frame at `index`.
    ///
    /// # Panics
    /// Panics if `index >= frame_count()`. Callers keep their index in range.
    #[inline]
    pub fn frame(&self, index: usize) -> &FrameRecord<H> {
        &self.frames[index]
    }

    /// Get the frame at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&FrameRecord<H>> {
        self.frames.get(index)
    }

    /// Iterate frames in playback order.
    pub fn frames(&self) -> std::slice::Iter<'_, FrameRecord<H>> {
        self.frames.iter()
    }

    /// Format version byte from the container header.
    pub fn format_version(&self) -> u8 {
        self.format_version
    }

    /// Sum of all frame delays: one full loop of the animation.
    pub fn cycle_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.delay_ms)).sum()
    }
}

impl<'a, H> IntoIterator for &'a Container<H> {
    type Item = &'a FrameRecord<H>;
    type IntoIter = std::slice::Iter<'a, FrameRecord<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(n: usize, delay_ms: u32) -> Container<usize> {
        let frames = (0..n).map(|image| FrameRecord { image, delay_ms }).collect();
        Container::new(1, frames)
    }

    #[test]
    fn test_lookup_in_order() {
        let c = container(3, 40);
        assert_eq!(c.frame_count(), 3);
        assert!(!c.is_empty());
        for i in 0..3 {
            assert_eq!(c.frame(i).image, i);
            assert_eq!(c.frame(i).delay_ms, 40);
        }
        assert!(c.get(3).is_none());
    }

    #[test]
    fn test_empty_container() {
        let c = container(0, 100);
        assert!(c.is_empty());
        assert_eq!(c.cycle_duration_ms(), 0);
        assert_eq!(c.frames().count(), 0);
    }

    #[test]
    fn test_cycle_duration() {
        let c = container(4, 250);
        assert_eq!(c.cycle_duration_ms(), 1000);
        assert_eq!((&c).into_iter().count(), 4);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let c = container(2, 10);
        let _ = c.frame(2);
    }
}
