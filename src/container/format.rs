//! Binary layout of `.dat` containers.

use std::io::{self, Read};

use log::debug;

use super::error::{Location, ParseError};

/// Tag opening every container.
pub const FILE_MAGIC: &[u8; 4] = b"FILE";

/// Tag opening every frame record.
pub const CONTENT_MAGIC: &[u8; 4] = b"IMAG";

/// Tag closing every frame record.
pub const TRAILER_MAGIC: &[u8; 4] = b"TRAI";

/// Container file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Format version byte. Informational only.
    pub format_version: u8,
    /// Number of frame records that follow.
    pub frame_count: u16,
    /// Delay applied to every frame, in milliseconds.
    pub default_cycle_ms: u16,
}

impl ContainerHeader {
    /// Size of header in bytes.
    /// Magic(4) + Version(1) + FrameCount(2) + CycleMs(2) = 9
    pub const SIZE: usize = 9;

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, ParseError> {
        let location = Location::ContainerHeader;
        let mut buf = [0u8; Self::SIZE];
        read_exact(r, &mut buf, location)?;

        check_magic(&buf[0..4], FILE_MAGIC, location)?;

        let header = Self {
            format_version: buf[4],
            frame_count: u16::from_le_bytes([buf[5], buf[6]]),
            default_cycle_ms: u16::from_le_bytes([buf[7], buf[8]]),
        };
        debug!(
            "container header: version={} frames={} cycle={}ms",
            header.format_version, header.frame_count, header.default_cycle_ms
        );
        Ok(header)
    }
}

/// Header preceding each frame's raw image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContentHeader {
    /// Number of payload bytes that follow.
    pub payload_size: u64,
}

impl FrameContentHeader {
    /// Magic(4) + PayloadSize(8) = 12
    pub const SIZE: usize = 12;

    pub fn read_from<R: Read>(r: &mut R, frame: usize) -> Result<Self, ParseError> {
        let location = Location::ContentHeader { frame };
        let (magic, payload_size) = read_tagged_size(r, location)?;
        check_magic(&magic, CONTENT_MAGIC, location)?;

        debug!("frame {frame} header: payload={payload_size} bytes");
        Ok(Self { payload_size })
    }
}

/// Trailer closing each frame record.
///
/// The echoed size restates the content header's payload size so that a
/// desynchronized stream is caught at the frame where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTrailer {
    pub echoed_payload_size: u64,
}

impl FrameTrailer {
    /// Magic(4) + EchoedSize(8) = 12
    pub const SIZE: usize = 12;

    pub fn read_from<R: Read>(r: &mut R, frame: usize) -> Result<Self, ParseError> {
        let location = Location::Trailer { frame };
        let (magic, echoed_payload_size) = read_tagged_size(r, location)?;
        check_magic(&magic, TRAILER_MAGIC, location)?;

        debug!("frame {frame} trailer: echoed={echoed_payload_size} bytes");
        Ok(Self {
            echoed_payload_size,
        })
    }

    /// Check the echoed size against the header that opened this frame.
    pub fn verify(&self, header: &FrameContentHeader, frame: usize) -> Result<(), ParseError> {
        if self.echoed_payload_size != header.payload_size {
            return Err(ParseError::SizeMismatch {
                frame,
                declared: header.payload_size,
                echoed: self.echoed_payload_size,
            });
        }
        Ok(())
    }
}

/// Read exactly `size` payload bytes.
///
/// Reads through `Take` so a forged size never drives the allocation.
pub fn read_payload<R: Read>(r: &mut R, size: u64, frame: usize) -> Result<Vec<u8>, ParseError> {
    let location = Location::Payload { frame };
    let mut payload = Vec::new();
    r.by_ref().take(size).read_to_end(&mut payload)?;
    if (payload.len() as u64) < size {
        return Err(ParseError::Truncated { location });
    }
    Ok(payload)
}

fn read_tagged_size<R: Read>(r: &mut R, location: Location) -> Result<([u8; 4], u64), ParseError> {
    let mut buf = [0u8; 12];
    read_exact(r, &mut buf, location)?;

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);
    let mut size = [0u8; 8];
    size.copy_from_slice(&buf[4..12]);
    Ok((magic, u64::from_le_bytes(size)))
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8], location: Location) -> Result<(), ParseError> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ParseError::Truncated { location },
        _ => ParseError::Io(e),
    })
}

fn check_magic(found: &[u8], expected: &[u8; 4], location: Location) -> Result<(), ParseError> {
    if found != expected {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(found);
        return Err(ParseError::BadMagic {
            location,
            found: tag,
        });
    }
    Ok(())
}
