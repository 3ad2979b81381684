//! In-memory raster decoding backed by the `image` crate.

use log::debug;

use super::ImageDecoder;

/// A decoded frame as straight RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub rgba8: Vec<u8>,
}

impl Bitmap {
    /// Total size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.rgba8.len()
    }
}

/// Decodes payloads (BMP, or anything else `image` recognizes) straight from memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for RasterDecoder {
    type Handle = Bitmap;

    fn decode(&mut self, bytes: &[u8]) -> Option<Bitmap> {
        if bytes.is_empty() {
            return None;
        }

        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                debug!("raster decode failed: {e}");
                return None;
            }
        };
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Some(Bitmap {
            width,
            height,
            rgba8: rgba.into_raw(),
        })
    }
}
