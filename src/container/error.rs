use std::fmt;

/// Where in the container a parse failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    ContainerHeader,
    ContentHeader { frame: usize },
    Payload { frame: usize },
    Trailer { frame: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::ContainerHeader => write!(f, "container header"),
            Location::ContentHeader { frame } => write!(f, "content header of frame {frame}"),
            Location::Payload { frame } => write!(f, "payload of frame {frame}"),
            Location::Trailer { frame } => write!(f, "trailer of frame {frame}"),
        }
    }
}

/// Errors that can occur while parsing a container.
///
/// Every variant aborts the whole parse; no partially built container survives.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The underlying byte stream could not be read.
    #[error("container I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A structural tag did not match its expected constant.
    #[error("bad magic {} in {location}", String::from_utf8_lossy(.found))]
    BadMagic { location: Location, found: [u8; 4] },

    /// The stream ended before a declared field was complete.
    #[error("container truncated in {location}")]
    Truncated { location: Location },

    /// The trailer's echoed size disagrees with the content header.
    #[error("size mismatch in frame {frame}: header declared {declared} bytes, trailer echoed {echoed}")]
    SizeMismatch {
        frame: usize,
        declared: u64,
        echoed: u64,
    },

    /// The image decoder rejected a payload.
    #[error("image decoder rejected payload of frame {frame}")]
    DecodeFailed { frame: usize },
}
