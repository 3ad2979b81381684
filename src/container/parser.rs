//! Strict, all-or-nothing container parsing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use super::error::ParseError;
use super::format::{ContainerHeader, FrameContentHeader, FrameTrailer, read_payload};
use super::store::{Container, FrameRecord};
use super::trace::TraceSink;
use crate::decode::ImageDecoder;

/// Container parser bound to an image decoder.
///
/// Usage:
/// ```ignore
/// let mut parser = ContainerParser::new(RasterDecoder::new());
/// let container = parser.load("v0.dat")?;
/// println!("{} frames", container.frame_count());
/// ```
pub struct ContainerParser<D> {
    decoder: D,
    trace: Option<Box<dyn TraceSink>>,
}

impl<D: ImageDecoder> ContainerParser<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            trace: None,
        }
    }

    /// Attach a sink that sees every raw payload before it is decoded.
    pub fn with_trace<T: TraceSink + 'static>(mut self, sink: T) -> Self {
        self.trace = Some(Box::new(sink));
        self
    }

    /// Replace (or clear) the trace sink.
    pub fn set_trace(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.trace = sink;
    }

    /// Detach the current trace sink, leaving none installed.
    pub fn take_trace(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace.take()
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Parse a container held in memory.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<Container<D::Handle>, ParseError> {
        let mut reader = bytes;
        self.parse_reader(&mut reader)
    }

    /// Open and parse a container file.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Container<D::Handle>, ParseError> {
        let path = path.as_ref();
        debug!("loading container {}", path.display());
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    /// Parse a container from any byte stream.
    ///
    /// Frames decoded before a failure are held only by a local buffer, so an
    /// early return drops (and thereby releases) all of them.
    pub fn parse_reader<R: Read>(&mut self, mut r: R) -> Result<Container<D::Handle>, ParseError> {
        let header = ContainerHeader::read_from(&mut r)?;
        let delay_ms = u32::from(header.default_cycle_ms);

        let mut frames = Vec::with_capacity(usize::from(header.frame_count));
        for frame in 0..usize::from(header.frame_count) {
            let content = FrameContentHeader::read_from(&mut r, frame)?;
            let payload = read_payload(&mut r, content.payload_size, frame)?;

            if let Some(trace) = self.trace.as_mut()
                && let Err(e) = trace.payload(frame, &payload)
            {
                warn!("trace sink failed on frame {frame}: {e}");
            }

            let image = self
                .decoder
                .decode(&payload)
                .ok_or(ParseError::DecodeFailed { frame })?;
            frames.push(FrameRecord { image, delay_ms });

            let trailer = FrameTrailer::read_from(&mut r, frame)?;
            trailer.verify(&content, frame)?;
        }

        Ok(Container::new(header.format_version, frames))
    }
}

/// Parse `bytes` with `decoder`, without keeping a parser around.
pub fn parse<D: ImageDecoder>(
    bytes: &[u8],
    decoder: &mut D,
) -> Result<Container<D::Handle>, ParseError> {
    ContainerParser::new(decoder).parse(bytes)
}
