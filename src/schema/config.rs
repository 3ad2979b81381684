//! Configuration types for the viewport player.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::playback::Rect;

/// Number of viewports in the default layout.
pub const DEFAULT_VIEWPORT_COUNT: usize = 4;

/// Default timer period in milliseconds.
fn default_timer_interval_ms() -> u32 {
    16
}

/// Top-level player configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// One entry per viewport, in surface order.
    pub viewports: Vec<ViewportConfig>,
    /// Period of the tick timer in milliseconds.
    #[serde(default = "default_timer_interval_ms")]
    pub timer_interval_ms: u32,
    /// If set, raw frame payloads are dumped under `<trace_dir>/v<n>/`.
    #[serde(default)]
    pub trace_dir: Option<PathBuf>,
}

impl Default for PlayerConfig {
    /// Four viewports `v0.dat`..`v3.dat` tiling an 800x600 area 2x2.
    fn default() -> Self {
        let (half_w, half_h) = (400u32, 300u32);
        let viewports = (0..DEFAULT_VIEWPORT_COUNT)
            .map(|i| {
                let col = (i % 2) as u32;
                let row = (i / 2) as u32;
                ViewportConfig {
                    path: PathBuf::from(format!("v{i}.dat")),
                    target: Rect::new(
                        (col * half_w) as i32,
                        (row * half_h) as i32,
                        half_w,
                        half_h,
                    ),
                }
            })
            .collect();

        Self {
            viewports,
            timer_interval_ms: default_timer_interval_ms(),
            trace_dir: None,
        }
    }
}

/// Configuration for a single viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Container file to play.
    pub path: PathBuf,
    /// Where on the surface the frames go.
    pub target: Rect,
}

impl ViewportConfig {
    pub fn new(path: impl Into<PathBuf>, target: Rect) -> Self {
        Self {
            path: path.into(),
            target,
        }
    }
}

impl PlayerConfig {
    /// Read and validate a JSON configuration file.
    ///
    /// Relative container paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut config: PlayerConfig = serde_json::from_str(&text)?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Prefix every relative path with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for viewport in &mut self.viewports {
            if viewport.path.is_relative() {
                viewport.path = base.join(&viewport.path);
            }
        }
        if let Some(dir) = self.trace_dir.as_mut()
            && dir.is_relative()
        {
            *dir = base.join(&*dir);
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewports.is_empty() {
            return Err(ConfigError::NoViewports);
        }
        if self.timer_interval_ms == 0 {
            return Err(ConfigError::InvalidTimerInterval);
        }
        for (i, viewport) in self.viewports.iter().enumerate() {
            if viewport.target.is_empty() {
                return Err(ConfigError::EmptyTarget { viewport: i });
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("At least one viewport must be configured")]
    NoViewports,
    #[error("Timer interval must be non-zero")]
    InvalidTimerInterval,
    #[error("Viewport {viewport} has an empty target rectangle")]
    EmptyTarget { viewport: usize },
    #[error("Error reading config: {0}")]
    Io(#[from] io::Error),
    #[error("Error parsing config: {0}")]
    Json(#[from] serde_json::Error),
}
