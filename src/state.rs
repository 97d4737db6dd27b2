use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use crate::grid::{AtomicPos, Grid, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Carving,
    Solving,
    Finished,
}

impl Phase {
    fn from_u8(raw: u8) -> Phase {
        match raw {
            1 => Phase::Carving,
            2 => Phase::Solving,
            3 => Phase::Finished,
            _ => Phase::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Phase::Idle => 0,
            Phase::Carving => 1,
            Phase::Solving => 2,
            Phase::Finished => 3,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Carving => "carving",
            Phase::Solving => "solving",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Per-run values shared with the renderer. Written only by the active worker.
pub struct RunState {
    run: AtomicU64,
    phase: AtomicU8,
    target: AtomicPos,
    max_depth: AtomicUsize,
    cursor: AtomicPos,
}

impl RunState {
    pub fn new(start: Pos) -> Self {
        Self {
            run: AtomicU64::new(0),
            phase: AtomicU8::new(Phase::Idle.as_u8()),
            target: AtomicPos::new(start),
            max_depth: AtomicUsize::new(0),
            cursor: AtomicPos::new(start),
        }
    }

    /// Starts a new run: bumps the run counter and points target and cursor at
    /// the entry cell. Returns the new run number.
    pub fn begin(&self, start: Pos) -> u64 {
        self.target.store(start);
        self.max_depth.store(0, Ordering::Relaxed);
        self.cursor.store(start);
        self.set_phase(Phase::Carving);
        self.run.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn run(&self) -> u64 {
        self.run.load(Ordering::Relaxed)
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Relaxed))
    }

    pub fn set_phase(&self, phase: Phase) {
        self.phase.store(phase.as_u8(), Ordering::Relaxed);
    }

    pub fn target(&self) -> Pos {
        self.target.load()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth.load(Ordering::Relaxed)
    }

    pub fn set_target(&self, pos: Pos, depth: usize) {
        self.target.store(pos);
        self.max_depth.store(depth, Ordering::Relaxed);
    }

    pub fn cursor(&self) -> Pos {
        self.cursor.load()
    }

    pub fn set_cursor(&self, pos: Pos) {
        self.cursor.store(pos);
    }
}

/// The grid plus its run state: everything a worker mutates and a renderer reads.
pub struct Maze {
    pub grid: Grid,
    pub state: RunState,
}

impl Maze {
    pub fn new(width: usize, height: usize) -> Self {
        let grid = Grid::new(width, height);
        let state = RunState::new(grid.center());
        Self { grid, state }
    }

    pub fn start(&self) -> Pos {
        self.grid.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_run_values() {
        let maze = Maze::new(10, 10);
        maze.state.set_target(Pos::new(2, 7), 31);
        maze.state.set_cursor(Pos::new(3, 3));
        maze.state.set_phase(Phase::Finished);

        let run = maze.state.begin(maze.start());
        assert_eq!(run, 1);
        assert_eq!(maze.state.target(), Pos::new(5, 5));
        assert_eq!(maze.state.cursor(), Pos::new(5, 5));
        assert_eq!(maze.state.max_depth(), 0);
        assert_eq!(maze.state.phase(), Phase::Carving);
        assert_eq!(maze.state.begin(maze.start()), 2);
    }

    #[test]
    fn phase_survives_the_atomic() {
        let state = RunState::new(Pos::new(0, 0));
        for phase in [Phase::Idle, Phase::Carving, Phase::Solving, Phase::Finished] {
            state.set_phase(phase);
            assert_eq!(state.phase(), phase);
        }
        assert_eq!(Phase::Solving.to_string(), "solving");
    }
}
