//! Image decoding capability consumed by the container parser.
//!
//! The parser never interprets payload bytes itself. It hands each payload to
//! an [`ImageDecoder`] and stores whatever handle comes back. Releasing a
//! handle is dropping it: a handle type that owns an external resource frees
//! it in its `Drop` impl, so a container and everything it decoded go away as
//! a unit.

use std::fmt;

pub mod raster;

pub use raster::{Bitmap, RasterDecoder};

/// Turns raw payload bytes into a renderable handle.
pub trait ImageDecoder {
    /// Renderable resource produced for one frame.
    type Handle;

    /// Decode one payload. `None` means the payload was rejected.
    fn decode(&mut self, bytes: &[u8]) -> Option<Self::Handle>;
}

impl<D: ImageDecoder + ?Sized> ImageDecoder for &mut D {
    type Handle = D::Handle;

    fn decode(&mut self, bytes: &[u8]) -> Option<Self::Handle> {
        (**self).decode(bytes)
    }
}

/// Adapts a closure into an [`ImageDecoder`].
///
/// ```
/// use datview::decode::{FnDecoder, ImageDecoder};
///
/// let mut decoder = FnDecoder::new(|bytes: &[u8]| (!bytes.is_empty()).then(|| bytes.len()));
/// assert_eq!(decoder.decode(b"abc"), Some(3));
/// assert_eq!(decoder.decode(b""), None);
/// ```
#[derive(Clone, Copy)]
pub struct FnDecoder<F>(F);

impl<F> FnDecoder<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }

    pub fn into_inner(self) -> F {
        self.0
    }
}

impl<F> fmt::Debug for FnDecoder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDecoder").finish_non_exhaustive()
    }
}

impl<F, H> ImageDecoder for FnDecoder<F>
where
    F: FnMut(&[u8]) -> Option<H>,
{
    type Handle = H;

    fn decode(&mut self, bytes: &[u8]) -> Option<H> {
        (self.0)(bytes)
    }
}
