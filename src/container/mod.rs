//! `.dat` image-sequence containers.
//!
//! This module turns an untrusted byte stream into a [`Container`]: an
//! ordered list of decoded frames, each with its playback delay. Parsing is
//! all-or-nothing. Either every declared frame is read, decoded and checked,
//! or the caller gets a [`ParseError`] and nothing the parse decoded survives.
//!
//! # File Format
//!
//! All integers are little-endian. Tags are compared on their 4 bytes only.
//!
//! ```text
//! Header (9 bytes):
//!   Magic: "FILE" (4 bytes)
//!   Version: u8 (informational)
//!   Frame count: u16
//!   Cycle time: u16 (milliseconds, applied to every frame)
//!
//! Frame record (repeated frame-count times):
//!   Magic: "IMAG" (4 bytes)
//!   Payload size: u64
//!   Payload: raw image bytes (BMP), handed to the image decoder
//!   Magic: "TRAI" (4 bytes)
//!   Echoed size: u64 (must equal payload size)
//! ```

mod error;
pub mod format;
mod parser;
mod store;
mod trace;

pub use error::{Location, ParseError};
pub use format::{
    CONTENT_MAGIC, ContainerHeader, FILE_MAGIC, FrameContentHeader, FrameTrailer, TRAILER_MAGIC,
};
pub use parser::{ContainerParser, parse};
pub use store::{Container, FrameRecord};
pub use trace::{DirTraceSink, NullTrace, TraceSink};
