use rand::Rng;
use tracing::debug;

use crate::grid::{Direction, DirectionOrder, Pos, DIRECTIONS};
use crate::state::Maze;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Shuffle {
    /// One permutation per run, reused at every cell.
    #[default]
    PerRun,
    /// A fresh permutation for every carved cell.
    PerCell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Border,
    Visited,
    Branch { passable: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveStep {
    Carved { pos: Pos, depth: usize },
    Rejected { pos: Pos, reason: Rejection },
    Backtracked { pos: Pos },
    Done { target: Pos, depth: usize },
}

struct Frame {
    pos: Pos,
    depth: usize,
    order: DirectionOrder,
    next: usize,
}

pub struct Carver<'a, R: Rng + ?Sized> {
    maze: &'a Maze,
    order: DirectionOrder,
    shuffle: Shuffle,
    rng: &'a mut R,
    stack: Vec<Frame>,
    pending: Option<Pos>,
    target: Pos,
    max_depth: usize,
}

impl<'a, R: Rng + ?Sized> Carver<'a, R> {
    pub fn new(maze: &'a Maze, order: DirectionOrder, shuffle: Shuffle, rng: &'a mut R) -> Self {
        let start = maze.start();
        Self {
            maze,
            order,
            shuffle,
            rng,
            stack: Vec::new(),
            pending: Some(start),
            target: start,
            max_depth: 0,
        }
    }

    /// Makes one carving decision.
    pub fn step(&mut self) -> CarveStep {
        if let Some(start) = self.pending.take() {
            return self.visit(start, 0);
        }
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return CarveStep::Done {
                    target: self.target,
                    depth: self.max_depth,
                };
            };
            if frame.next >= DIRECTIONS {
                let pos = frame.pos;
                self.stack.pop();
                return CarveStep::Backtracked { pos };
            }
            let dir = frame.order.get(frame.next);
            frame.next += 1;
            let (pos, depth) = (frame.pos, frame.depth);
            if let Some(next) = dir.and_then(|dir| self.inward(pos, dir)) {
                return self.visit(next, depth + 1);
            }
        }
    }

    /// Runs to completion and returns the target and its depth.
    pub fn run(mut self) -> (Pos, usize) {
        loop {
            if let CarveStep::Done { target, depth } = self.step() {
                return (target, depth);
            }
        }
    }

    fn visit(&mut self, pos: Pos, depth: usize) -> CarveStep {
        let maze = self.maze;
        let grid = &maze.grid;
        if grid.on_border(pos) {
            return CarveStep::Rejected {
                pos,
                reason: Rejection::Border,
            };
        }
        if grid.get(pos) {
            return CarveStep::Rejected {
                pos,
                reason: Rejection::Visited,
            };
        }
        let passable = grid.passable_neighbors(pos);
        if passable > 1 {
            return CarveStep::Rejected {
                pos,
                reason: Rejection::Branch { passable },
            };
        }

        grid.carve(pos);
        if depth > self.max_depth {
            self.max_depth = depth;
            self.target = pos;
            maze.state.set_target(pos, depth);
            debug!(x = pos.x, y = pos.y, depth, "new deepest cell");
        }

        let order = match self.shuffle {
            Shuffle::PerRun => self.order,
            Shuffle::PerCell => DirectionOrder::shuffled(&mut *self.rng),
        };
        self.stack.push(Frame {
            pos,
            depth,
            order,
            next: 0,
        });
        CarveStep::Carved { pos, depth }
    }

    // Only step into cells that keep a two-cell margin from the edge they head
    // towards.
    fn inward(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let width = self.maze.grid.width();
        let height = self.maze.grid.height();
        let ok = match dir {
            Direction::Left => pos.x > 2,
            Direction::Right => pos.x + 2 < width,
            Direction::Up => pos.y > 2,
            Direction::Down => pos.y + 2 < height,
        };
        if ok {
            self.maze.grid.neighbor(pos, dir)
        } else {
            None
        }
    }
}
