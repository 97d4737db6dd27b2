use crate::grid::{Direction, DirectionOrder, Pos, DIRECTIONS};
use crate::state::Maze;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStep {
    Entered {
        pos: Pos,
        dir: Option<Direction>,
        previous: Option<Direction>,
    },
    Backtracked {
        from: Pos,
        cursor: Pos,
    },
    Solved {
        pos: Pos,
    },
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved,
    Exhausted,
}

struct Frame {
    pos: Pos,
    arrived_by: Option<Direction>,
    restore: Pos,
    next: usize,
}

pub struct Solver<'a> {
    maze: &'a Maze,
    order: DirectionOrder,
    target: Pos,
    stack: Vec<Frame>,
    pending: Option<Pos>,
    outcome: Option<SolveOutcome>,
}

impl<'a> Solver<'a> {
    pub fn new(maze: &'a Maze, order: DirectionOrder, target: Pos) -> Self {
        Self {
            maze,
            order,
            target,
            stack: Vec::new(),
            pending: Some(maze.start()),
            outcome: None,
        }
    }

    pub fn outcome(&self) -> Option<SolveOutcome> {
        self.outcome
    }

    /// Cells from the start to the current position, in walk order.
    pub fn path(&self) -> Vec<Pos> {
        self.stack.iter().map(|frame| frame.pos).collect()
    }

    /// Advances the walk by one move or one backtrack. Once the walk has ended
    /// every further call repeats the terminal step.
    pub fn step(&mut self) -> SolveStep {
        match self.outcome {
            Some(SolveOutcome::Solved) => return SolveStep::Solved { pos: self.target },
            Some(SolveOutcome::Exhausted) => return SolveStep::Exhausted,
            None => {}
        }
        if let Some(start) = self.pending.take() {
            return self.enter(start, None, None);
        }

        let maze = self.maze;
        let grid = &maze.grid;
        let Some(frame) = self.stack.last_mut() else {
            self.outcome = Some(SolveOutcome::Exhausted);
            return SolveStep::Exhausted;
        };
        while frame.next < DIRECTIONS {
            let dir = self.order.get(frame.next);
            frame.next += 1;
            let Some(dir) = dir else { continue };
            if frame.arrived_by.map(Direction::opposite) == Some(dir) {
                continue;
            }
            let Some(next) = grid.neighbor(frame.pos, dir) else {
                continue;
            };
            if grid.get(next) {
                let previous = frame.arrived_by;
                return self.enter(next, Some(dir), previous);
            }
        }

        let from = frame.pos;
        let cursor = frame.restore;
        self.stack.pop();
        maze.state.set_cursor(cursor);
        if self.stack.is_empty() {
            self.outcome = Some(SolveOutcome::Exhausted);
        }
        SolveStep::Backtracked { from, cursor }
    }

    pub fn run(mut self) -> SolveOutcome {
        loop {
            match self.step() {
                SolveStep::Solved { .. } => return SolveOutcome::Solved,
                SolveStep::Exhausted => return SolveOutcome::Exhausted,
                _ => {}
            }
        }
    }

    fn enter(&mut self, pos: Pos, dir: Option<Direction>, previous: Option<Direction>) -> SolveStep {
        let state = &self.maze.state;
        let restore = state.cursor();
        state.set_cursor(pos);
        if pos == self.target {
            self.outcome = Some(SolveOutcome::Solved);
            return SolveStep::Solved { pos };
        }
        self.stack.push(Frame {
            pos,
            arrived_by: dir,
            restore,
            next: 0,
        });
        SolveStep::Entered { pos, dir, previous }
    }
}
