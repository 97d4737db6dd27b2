use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rand::seq::SliceRandom;
use rand::Rng;

pub const DIRECTIONS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; DIRECTIONS] =
        [Direction::Right, Direction::Left, Direction::Up, Direction::Down];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// A permutation of the four directions, tried in order at every cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionOrder([Direction; DIRECTIONS]);

impl DirectionOrder {
    pub fn new(order: [Direction; DIRECTIONS]) -> Self {
        Self(order)
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut order = Direction::ALL;
        order.shuffle(rng);
        Self(order)
    }

    pub fn get(&self, idx: usize) -> Option<Direction> {
        self.0.get(idx).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.0.iter().copied()
    }
}

impl Default for DirectionOrder {
    fn default() -> Self {
        Self(Direction::ALL)
    }
}

/// Passable/impassable cells, written by the run worker and read by the
/// renderer concurrently. Each cell is its own atomic, so a reader can observe
/// a grid that is half reset or half carved, but never a torn cell.
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<AtomicBool>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        let cells = (0..width * height).map(|_| AtomicBool::new(false)).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.width / 2, self.height / 2)
    }

    pub fn reset(&self) {
        for cell in &self.cells {
            cell.store(false, Ordering::Relaxed);
        }
    }

    /// Signed lookup; anything outside the grid is a wall.
    pub fn is_passable(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.get(Pos::new(x as usize, y as usize))
    }

    pub fn get(&self, pos: Pos) -> bool {
        match self.index(pos) {
            Some(idx) => self.cells[idx].load(Ordering::Relaxed),
            None => false,
        }
    }

    /// Returns false (and leaves the grid untouched) when `pos` is out of bounds.
    pub fn carve(&self, pos: Pos) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx].store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn on_border(&self, pos: Pos) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 >= self.width || pos.y + 1 >= self.height
    }

    pub fn neighbor(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let next = Pos::new(nx as usize, ny as usize);
        if self.contains(next) {
            Some(next)
        } else {
            None
        }
    }

    pub fn passable_neighbors(&self, pos: Pos) -> usize {
        Direction::ALL
            .iter()
            .filter_map(|dir| self.neighbor(pos, *dir))
            .filter(|next| self.get(*next))
            .count()
    }

    pub fn passable_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos::new(x, y);
                if self.get(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }
}

/// A position packed into a single word so readers never see a mixed x/y pair.
pub struct AtomicPos(AtomicU64);

impl AtomicPos {
    pub fn new(pos: Pos) -> Self {
        Self(AtomicU64::new(pack(pos)))
    }

    pub fn load(&self) -> Pos {
        unpack(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, pos: Pos) {
        self.0.store(pack(pos), Ordering::Relaxed);
    }
}

fn pack(pos: Pos) -> u64 {
    ((pos.x as u32 as u64) << 32) | pos.y as u32 as u64
}

fn unpack(word: u64) -> Pos {
    Pos::new((word >> 32) as usize, (word & 0xffff_ffff) as usize)
}
