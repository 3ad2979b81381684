//! Test fixtures: container byte builders and a leak-tracking decoder.

use std::cell::Cell;
use std::rc::Rc;

use crate::container::format::{CONTENT_MAGIC, FILE_MAGIC, TRAILER_MAGIC};
use crate::decode::ImageDecoder;

/// Builds raw container bytes frame by frame.
#[derive(Debug, Clone)]
pub struct ContainerBytes {
    version: u8,
    cycle_ms: u16,
    frames: Vec<(Vec<u8>, u64)>,
}

impl ContainerBytes {
    pub fn new(version: u8, cycle_ms: u16) -> Self {
        Self {
            version,
            cycle_ms,
            frames: Vec::new(),
        }
    }

    /// Append a well-formed frame.
    pub fn frame(self, payload: &[u8]) -> Self {
        let size = payload.len() as u64;
        self.frame_with_echo(payload, size)
    }

    /// Append a frame whose trailer echoes `echo` instead of the payload size.
    pub fn frame_with_echo(mut self, payload: &[u8], echo: u64) -> Self {
        self.frames.push((payload.to_vec(), echo));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(FILE_MAGIC);
        buf.push(self.version);
        buf.extend_from_slice(&(self.frames.len() as u16).to_le_bytes());
        buf.extend_from_slice(&self.cycle_ms.to_le_bytes());

        for (payload, echo) in &self.frames {
            buf.extend_from_slice(CONTENT_MAGIC);
            buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
            buf.extend_from_slice(payload);
            buf.extend_from_slice(TRAILER_MAGIC);
            buf.extend_from_slice(&echo.to_le_bytes());
        }
        buf
    }
}

/// Handle that keeps its payload and counts itself while alive.
#[derive(Debug)]
pub struct TestImage {
    bytes: Vec<u8>,
    live: Rc<Cell<usize>>,
}

impl TestImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for TestImage {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Decoder whose clones share counters, so tests can check for leaked handles.
#[derive(Debug, Clone, Default)]
pub struct CountingDecoder {
    live: Rc<Cell<usize>>,
    decoded: Rc<Cell<usize>>,
    reject_empty: bool,
}

impl CountingDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_empty() -> Self {
        Self {
            reject_empty: true,
            ..Self::default()
        }
    }

    /// Handles currently alive.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Handles ever produced.
    pub fn decoded(&self) -> usize {
        self.decoded.get()
    }
}

impl ImageDecoder for CountingDecoder {
    type Handle = TestImage;

    fn decode(&mut self, bytes: &[u8]) -> Option<TestImage> {
        if self.reject_empty && bytes.is_empty() {
            return None;
        }
        self.live.set(self.live.get() + 1);
        self.decoded.set(self.decoded.get() + 1);
        Some(TestImage {
            bytes: bytes.to_vec(),
            live: Rc::clone(&self.live),
        })
    }
}
