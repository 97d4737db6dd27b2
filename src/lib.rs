//! Animated maze generation and solving.
//!
//! A worker thread carves a perfect maze out of a shared grid with randomized
//! backtracking, then walks it depth-first from the center to the deepest cell
//! it carved. The grid and run state are lock-free, so a renderer can sample
//! them every frame while the worker is still mutating them.

pub mod carver;
pub mod error;
pub mod grid;
pub mod logging;
pub mod render;
pub mod run;
pub mod settings;
pub mod solver;
pub mod state;
pub mod supervisor;

pub use carver::{CarveStep, Carver, Rejection, Shuffle};
pub use error::{Error, Result};
pub use grid::{Direction, DirectionOrder, Grid, Pos};
pub use run::{run_once, Pacing, RunOutcome, RunReport};
pub use settings::{RunSettings, Settings};
pub use solver::{SolveOutcome, SolveStep, Solver};
pub use state::{Maze, Phase, RunState};
pub use supervisor::Supervisor;
