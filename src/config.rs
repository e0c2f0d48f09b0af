//! Driver configuration parsed from flags and `ISLANDSIM_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use clap::Parser;
use island::camera::Size;
use island::storage::PlayerId;

pub const DEFAULT_FPS: u32 = 60;
pub const MAX_FPS: u32 = 240;
pub const DEFAULT_VIEWPORT: &str = "1280x800";

/// Give up on a run that is still asking for frames after this many.
pub const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 10;

#[derive(Parser, Debug)]
#[command(name = "islandsim", about = "Replay an input script against the island engine")]
pub struct Cli {
    /// Scene content JSON (`width`, `height`, `hotspots`, ...).
    pub scene: PathBuf,

    /// Timed input script JSON.
    pub script: PathBuf,

    #[arg(long, env = "ISLANDSIM_FPS", default_value_t = DEFAULT_FPS, value_parser = parse_fps)]
    pub fps: u32,

    #[arg(long, env = "ISLANDSIM_PLAYER", default_value = "guest")]
    pub player: String,

    /// JSON file backing discovery progress. In-memory when absent.
    #[arg(long, env = "ISLANDSIM_STORE")]
    pub store: Option<PathBuf>,

    /// Viewport as `WIDTHxHEIGHT` CSS pixels.
    #[arg(long, default_value = DEFAULT_VIEWPORT, value_parser = parse_viewport)]
    pub viewport: Size,

    /// Pace frames on a wall-clock interval instead of replaying as fast as possible.
    #[arg(long, default_value_t = false)]
    pub realtime: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    pub max_frames: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub scene: PathBuf,
    pub script: PathBuf,
    pub fps: u32,
    pub player: PlayerId,
    pub store: Option<PathBuf>,
    pub viewport: Size,
    pub realtime: bool,
    pub max_frames: u64,
}

impl SimConfig {
    #[must_use]
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            scene: cli.scene,
            script: cli.script,
            fps: cli.fps,
            player: PlayerId::new(cli.player),
            store: cli.store,
            viewport: cli.viewport,
            realtime: cli.realtime,
            max_frames: cli.max_frames,
        }
    }

    /// Milliseconds between simulated frames.
    #[must_use]
    pub fn frame_ms(&self) -> f64 {
        1000.0 / f64::from(self.fps.max(1))
    }
}

fn parse_fps(raw: &str) -> Result<u32, String> {
    let fps: u32 = raw.trim().parse().map_err(|_| format!("`{raw}` is not a frame rate"))?;
    if fps == 0 || fps > MAX_FPS {
        return Err(format!("fps must be between 1 and {MAX_FPS}"));
    }
    Ok(fps)
}

/// Parse `1280x800` (also accepts `X` and `*`).
pub fn parse_viewport(raw: &str) -> Result<Size, String> {
    let Some((w, h)) = raw.trim().split_once(['x', 'X', '*']) else {
        return Err(format!("`{raw}` is not WIDTHxHEIGHT"));
    };
    let width: f64 = w.trim().parse().map_err(|_| format!("bad width `{w}`"))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("bad height `{h}`"))?;
    let size = Size::new(width, height);
    if !size.is_valid() {
        return Err(format!("viewport `{raw}` must be positive"));
    }
    Ok(size)
}
