use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::carver::{CarveStep, Carver, Shuffle};
use crate::grid::{DirectionOrder, Pos};
use crate::solver::{SolveStep, Solver};
use crate::state::{Maze, Phase};

pub const DEFAULT_SOLVE_PAUSE: Duration = Duration::from_millis(25);

/// Pauses between worker steps so the renderer can keep up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    pub carve: Duration,
    pub solve: Duration,
}

impl Pacing {
    pub const NONE: Pacing = Pacing {
        carve: Duration::ZERO,
        solve: Duration::ZERO,
    };

    fn carve_pause(&self) {
        pause(self.carve);
    }

    fn solve_pause(&self) {
        pause(self.solve);
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            carve: Duration::ZERO,
            solve: DEFAULT_SOLVE_PAUSE,
        }
    }
}

fn pause(dur: Duration) {
    if dur.is_zero() {
        thread::yield_now();
    } else {
        thread::sleep(dur);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Solved,
    Exhausted,
    Interrupted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub run: u64,
    pub outcome: RunOutcome,
    pub target: Pos,
    pub depth: usize,
    pub carved: usize,
}

/// One generate-then-solve cycle on a freshly reset grid.
pub fn run_once<R: Rng + ?Sized>(
    maze: &Maze,
    rng: &mut R,
    pacing: &Pacing,
    shuffle: Shuffle,
    stop: &AtomicBool,
) -> RunReport {
    let start = maze.start();
    let run = maze.state.begin(start);
    maze.grid.reset();
    let order = DirectionOrder::shuffled(rng);

    let mut report = RunReport {
        run,
        outcome: RunOutcome::Interrupted,
        target: start,
        depth: 0,
        carved: 0,
    };

    let mut carver = Carver::new(maze, order, shuffle, rng);
    loop {
        if stop.load(Ordering::Relaxed) {
            maze.state.set_phase(Phase::Finished);
            return report;
        }
        match carver.step() {
            CarveStep::Carved { .. } => {
                report.carved += 1;
                pacing.carve_pause();
            }
            CarveStep::Done { target, depth } => {
                report.target = target;
                report.depth = depth;
                break;
            }
            _ => {}
        }
    }
    debug!(run, carved = report.carved, depth = report.depth, "maze carved");

    maze.state.set_phase(Phase::Solving);
    let mut solver = Solver::new(maze, order, report.target);
    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        match solver.step() {
            SolveStep::Entered { .. } => pacing.solve_pause(),
            SolveStep::Solved { .. } => {
                report.outcome = RunOutcome::Solved;
                break;
            }
            SolveStep::Exhausted => {
                report.outcome = RunOutcome::Exhausted;
                break;
            }
            SolveStep::Backtracked { .. } => {}
        }
    }
    maze.state.set_phase(Phase::Finished);
    report
}
