//! Display regions and their container bindings.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use super::scheduler::PlaybackScheduler;
use crate::container::{ContainerParser, DirTraceSink, ParseError};
use crate::decode::ImageDecoder;
use crate::schema::PlayerConfig;

/// Opaque identifier of the surface a viewport draws into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

/// Target rectangle in the owning surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A display region with its own, independent playback.
#[derive(Debug)]
pub struct Viewport<H> {
    surface: SurfaceId,
    target: Rect,
    source: Option<PathBuf>,
    load_error: Option<ParseError>,
    scheduler: PlaybackScheduler<H>,
}

impl<H> Viewport<H> {
    /// Create an unbound viewport.
    pub fn new(surface: SurfaceId, target: Rect) -> Self {
        Self {
            surface,
            target,
            source: None,
            load_error: None,
            scheduler: PlaybackScheduler::new(),
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn target(&self) -> Rect {
        self.target
    }

    pub fn set_target(&mut self, target: Rect) {
        self.target = target;
    }

    /// Path the container was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Why the container failed to load. A failed viewport stays unbound.
    pub fn load_error(&self) -> Option<&ParseError> {
        self.load_error.as_ref()
    }

    pub fn scheduler(&self) -> &PlaybackScheduler<H> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut PlaybackScheduler<H> {
        &mut self.scheduler
    }

    /// Load the container at `path` and bind it.
    ///
    /// On failure the viewport is left unbound and the error is kept for
    /// reporting. It is not retried.
    pub fn load<D>(
        &mut self,
        path: &Path,
        parser: &mut ContainerParser<D>,
        now: Instant,
    ) -> Result<(), &ParseError>
    where
        D: ImageDecoder<Handle = H>,
    {
        self.source = Some(path.to_path_buf());
        self.scheduler.unbind();

        match parser.load(path) {
            Ok(container) => {
                self.scheduler.bind(container, now);
                self.load_error = None;
                Ok(())
            }
            Err(e) => Err(&*self.load_error.insert(e)),
        }
    }
}

/// Build one viewport per configured entry and load its container.
///
/// A failed load is logged and leaves that viewport unbound; the others are
/// unaffected.
///
/// With `trace_dir` set, each viewport's payloads go to `<trace_dir>/v<i>`
/// and the parser's own sink is put back afterwards. Without it, the
/// parser's sink is used as is.
pub fn load_viewports<D: ImageDecoder>(
    config: &PlayerConfig,
    parser: &mut ContainerParser<D>,
    now: Instant,
) -> Vec<Viewport<D::Handle>> {
    let mut viewports = Vec::with_capacity(config.viewports.len());
    let attached = match config.trace_dir {
        Some(_) => parser.take_trace(),
        None => None,
    };

    for (i, entry) in config.viewports.iter().enumerate() {
        let mut viewport = Viewport::new(SurfaceId(i), entry.target);

        if let Some(dir) = &config.trace_dir {
            match DirTraceSink::new(dir.join(format!("v{i}"))) {
                Ok(sink) => parser.set_trace(Some(Box::new(sink))),
                Err(e) => {
                    warn!("viewport {i}: trace dir unavailable: {e}");
                    parser.set_trace(None);
                }
            }
        }

        if viewport.load(&entry.path, parser, now).is_ok() {
            let frames = viewport
                .scheduler()
                .container()
                .map_or(0, |c| c.frame_count());
            info!(
                "viewport {i}: loaded {} ({frames} frames)",
                entry.path.display()
            );
        } else if let Some(e) = viewport.load_error() {
            error!(
                "viewport {i} failed to load {}: {e}",
                entry.path.display()
            );
        }

        viewports.push(viewport);
    }

    if config.trace_dir.is_some() {
        parser.set_trace(attached);
    }

    viewports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use crate::schema::ViewportConfig;
    use crate::container::TraceSink;
    use crate::testutil::{ContainerBytes, CountingDecoder};
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;
    use tempfile::tempdir;

    /// Sink recording the payloads it sees, shared with the test.
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Vec<u8>>>>);

    impl TraceSink for Recorder {
        fn payload(&mut self, _frame: usize, bytes: &[u8]) -> io::Result<()> {
            self.0.borrow_mut().push(bytes.to_vec());
            Ok(())
        }
    }

    fn two_single_frame_viewports(dir: &Path) -> Vec<ViewportConfig> {
        (0..2)
            .map(|i| {
                let path = dir.join(format!("v{i}.dat"));
                let payload = format!("frame-of-{i}");
                std::fs::write(&path, ContainerBytes::new(1, 40).frame(payload.as_bytes()).build())
                    .unwrap();
                ViewportConfig::new(path, Rect::new(0, 0, 4, 4))
            })
            .collect()
    }

    #[test]
    fn test_rect_empty() {
        assert!(Rect::default().is_empty());
        assert!(Rect::new(0, 0, 10, 0).is_empty());
        assert!(!Rect::new(-5, 5, 1, 1).is_empty());
    }

    #[test]
    fn test_failed_load_stays_unbound() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.dat");
        std::fs::write(&path, b"NOPE").unwrap();

        let mut parser = ContainerParser::new(CountingDecoder::new());
        let mut viewport = Viewport::new(SurfaceId(0), Rect::new(0, 0, 10, 10));

        assert!(viewport.load(&path, &mut parser, Instant::now()).is_err());
        assert_eq!(viewport.scheduler().state(), PlaybackState::Unbound);
        assert!(matches!(
            viewport.load_error(),
            Some(ParseError::Truncated { .. })
        ));
        assert_eq!(viewport.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_viewports_isolates_failures() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("v0.dat");
        std::fs::write(&good, ContainerBytes::new(1, 40).frame(b"a").build()).unwrap();
        let corrupt = dir.path().join("v1.dat");
        std::fs::write(
            &corrupt,
            ContainerBytes::new(1, 40).frame_with_echo(b"a", 2).build(),
        )
        .unwrap();
        let missing = dir.path().join("v2.dat");

        let config = PlayerConfig {
            viewports: vec![
                ViewportConfig::new(&good, Rect::new(0, 0, 10, 10)),
                ViewportConfig::new(&corrupt, Rect::new(10, 0, 10, 10)),
                ViewportConfig::new(&missing, Rect::new(0, 10, 10, 10)),
            ],
            ..PlayerConfig::default()
        };

        let decoder = CountingDecoder::new();
        let mut parser = ContainerParser::new(decoder.clone());
        let viewports = load_viewports(&config, &mut parser, Instant::now());

        assert_eq!(viewports.len(), 3);
        assert!(viewports[0].scheduler().is_playing());
        assert!(!viewports[1].scheduler().is_playing());
        assert!(matches!(
            viewports[1].load_error(),
            Some(ParseError::SizeMismatch { .. })
        ));
        assert!(matches!(viewports[2].load_error(), Some(ParseError::Io(_))));
        assert_eq!(viewports[2].surface(), SurfaceId(2));
        assert_eq!(decoder.live(), 1);

        drop(viewports);
        assert_eq!(decoder.live(), 0);
    }

    #[test]
    fn test_load_viewports_with_trace_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("v0.dat");
        std::fs::write(&path, ContainerBytes::new(1, 40).frame(b"dump-me").build()).unwrap();

        let trace_dir = dir.path().join("trace");
        let config = PlayerConfig {
            viewports: vec![ViewportConfig::new(&path, Rect::new(0, 0, 4, 4))],
            trace_dir: Some(trace_dir.clone()),
            ..PlayerConfig::default()
        };

        let mut parser = ContainerParser::new(CountingDecoder::new());
        let viewports = load_viewports(&config, &mut parser, Instant::now());

        assert!(viewports[0].scheduler().is_playing());
        let dumped = std::fs::read(trace_dir.join("v0").join("frame_0.bmp")).unwrap();
        assert_eq!(dumped, b"dump-me");
    }

    #[test]
    fn test_load_viewports_keeps_attached_trace() {
        let dir = tempdir().unwrap();
        let config = PlayerConfig {
            viewports: two_single_frame_viewports(dir.path()),
            trace_dir: None,
            ..PlayerConfig::default()
        };

        let recorder = Recorder::default();
        let mut parser = ContainerParser::new(CountingDecoder::new()).with_trace(recorder.clone());
        let viewports = load_viewports(&config, &mut parser, Instant::now());

        assert!(viewports.iter().all(|v| v.scheduler().is_playing()));
        assert_eq!(
            *recorder.0.borrow(),
            vec![b"frame-of-0".to_vec(), b"frame-of-1".to_vec()]
        );
        assert!(parser.take_trace().is_some());
    }

    #[test]
    fn test_load_viewports_restores_trace_after_trace_dir() {
        let dir = tempdir().unwrap();
        let config = PlayerConfig {
            viewports: two_single_frame_viewports(dir.path()),
            trace_dir: Some(dir.path().join("trace")),
            ..PlayerConfig::default()
        };

        let recorder = Recorder::default();
        let mut parser = ContainerParser::new(CountingDecoder::new()).with_trace(recorder.clone());
        load_viewports(&config, &mut parser, Instant::now());

        // Payloads went to the per-viewport dirs, not the attached sink.
        assert!(recorder.0.borrow().is_empty());
        assert!(dir.path().join("trace/v1/frame_0.bmp").exists());

        let bytes = ContainerBytes::new(1, 40).frame(b"after").build();
        parser.parse(&bytes).unwrap();
        assert_eq!(*recorder.0.borrow(), vec![b"after".to_vec()]);
    }
}
