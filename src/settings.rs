use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::carver::Shuffle;
use crate::logging::DEFAULT_LOG_FILTER;
use crate::run::{Pacing, DEFAULT_SOLVE_PAUSE};

pub const DEFAULT_RENDER_FPS: u64 = 60;

/// Everything a worker run needs besides the maze itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSettings {
    pub pacing: Pacing,
    pub seed: Option<u64>,
    pub shuffle: Shuffle,
    pub max_runs: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub render_fps: u64,
    pub run: RunSettings,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let render_fps = number("MAZE_FPS")
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_RENDER_FPS);
        let solve = number("MAZE_SOLVE_MS")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SOLVE_PAUSE);
        let carve = number("MAZE_CARVE_US")
            .map(Duration::from_micros)
            .unwrap_or(Duration::ZERO);
        let shuffle = match lookup("MAZE_SHUFFLE").as_deref().map(str::trim) {
            Some("cell") => Shuffle::PerCell,
            _ => Shuffle::PerRun,
        };
        let log_file = lookup("MAZE_LOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let log_filter = lookup("MAZE_LOG_LEVEL")
            .filter(|v| EnvFilter::try_new(v).is_ok())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            render_fps,
            run: RunSettings {
                pacing: Pacing { carve, solve },
                seed: number("MAZE_SEED"),
                shuffle,
                max_runs: None,
            },
            log_file,
            log_filter,
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}
