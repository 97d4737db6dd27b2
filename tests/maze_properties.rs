//! Property tests for carved mazes and the solver walking them.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::AtomicBool;

use backtrack_maze::{
    run_once, CarveStep, Carver, Direction, DirectionOrder, Maze, Pacing, Pos, RunOutcome,
    Shuffle, SolveStep, Solver,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn carve(maze: &Maze, seed: u64, shuffle: Shuffle) -> (DirectionOrder, Vec<(Pos, usize)>, Pos) {
    let mut rng = StdRng::seed_from_u64(seed);
    let order = DirectionOrder::shuffled(&mut rng);
    let mut carver = Carver::new(maze, order, shuffle, &mut rng);
    let mut carved = Vec::new();
    loop {
        match carver.step() {
            CarveStep::Carved { pos, depth } => carved.push((pos, depth)),
            CarveStep::Done { target, .. } => return (order, carved, target),
            _ => {}
        }
    }
}

/// Number of passable cells reachable from `start`.
fn reachable(maze: &Maze, start: Pos) -> usize {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);
    while let Some(pos) = queue.pop_front() {
        for dir in Direction::ALL {
            if let Some(next) = maze.grid.neighbor(pos, dir) {
                if maze.grid.get(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    seen.len()
}

fn open_edges(maze: &Maze) -> usize {
    maze.grid
        .passable_cells()
        .into_iter()
        .map(|pos| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter_map(|dir| maze.grid.neighbor(pos, dir))
                .filter(|next| maze.grid.get(*next))
                .count()
        })
        .sum()
}

fn assert_perfect(maze: &Maze) {
    let cells = maze.grid.passable_cells();
    assert!(!cells.is_empty());
    assert_eq!(reachable(maze, maze.start()), cells.len(), "maze is disconnected");
    assert_eq!(open_edges(maze), cells.len() - 1, "maze has a loop");
}

#[test]
fn ten_by_ten_end_to_end() {
    let maze = Maze::new(10, 10);
    let mut rng = StdRng::seed_from_u64(2024);
    let stop = AtomicBool::new(false);
    let report = run_once(&maze, &mut rng, &Pacing::NONE, Shuffle::PerRun, &stop);

    assert!(maze.grid.get(Pos::new(5, 5)));
    for pos in maze.grid.passable_cells() {
        assert!(!maze.grid.on_border(pos));
    }
    assert_perfect(&maze);
    assert_eq!(report.outcome, RunOutcome::Solved);
    assert_eq!(maze.state.cursor(), report.target);

    assert!(!maze.grid.is_passable(-1, 0));
    assert!(!maze.grid.is_passable(10, 10));
}

#[test]
fn grid_reset_after_a_run_clears_everything() {
    let maze = Maze::new(25, 19);
    let mut rng = StdRng::seed_from_u64(8);
    let stop = AtomicBool::new(false);
    run_once(&maze, &mut rng, &Pacing::NONE, Shuffle::PerRun, &stop);
    assert!(!maze.grid.passable_cells().is_empty());
    maze.grid.reset();
    assert!(maze.grid.passable_cells().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn carved_maze_is_perfect_and_off_the_border(
        seed in any::<u64>(),
        width in 5usize..48,
        height in 5usize..36,
        per_cell in any::<bool>(),
    ) {
        let maze = Maze::new(width, height);
        let shuffle = if per_cell { Shuffle::PerCell } else { Shuffle::PerRun };
        carve(&maze, seed, shuffle);

        prop_assert!(maze.grid.get(maze.start()));
        for pos in maze.grid.passable_cells() {
            prop_assert!(!maze.grid.on_border(pos), "{:?} on border", pos);
        }
        let cells = maze.grid.passable_cells().len();
        prop_assert_eq!(reachable(&maze, maze.start()), cells);
        prop_assert_eq!(open_edges(&maze), cells - 1);
    }

    #[test]
    fn target_is_first_deepest_cell(seed in any::<u64>(), width in 5usize..40, height in 5usize..30) {
        let maze = Maze::new(width, height);
        let (_, carved, target) = carve(&maze, seed, Shuffle::PerRun);
        let max = carved.iter().map(|(_, d)| *d).max().unwrap_or(0);
        let first = carved.iter().find(|(_, d)| *d == max).map(|(p, _)| *p);
        prop_assert_eq!(Some(target), first);
        // The deepest cell cannot have children, so it is a dead end unless it is the start.
        if max > 0 {
            prop_assert_eq!(maze.grid.passable_neighbors(target), 1);
        }
    }

    #[test]
    fn solver_reaches_target_without_u_turns(seed in any::<u64>(), width in 5usize..40, height in 5usize..30) {
        let maze = Maze::new(width, height);
        let (order, _, target) = carve(&maze, seed, Shuffle::PerRun);
        maze.state.set_cursor(maze.start());

        let mut solver = Solver::new(&maze, order, target);
        // Cursor value in effect before each open frame was entered.
        let mut before: Vec<Pos> = Vec::new();
        let mut cursor = maze.start();
        loop {
            match solver.step() {
                SolveStep::Entered { pos, dir, previous } => {
                    if let (Some(dir), Some(previous)) = (dir, previous) {
                        prop_assert_ne!(dir, previous.opposite());
                    }
                    before.push(cursor);
                    cursor = pos;
                }
                SolveStep::Backtracked { cursor: restored, .. } => {
                    prop_assert_eq!(Some(restored), before.pop());
                    prop_assert_eq!(maze.state.cursor(), restored);
                    cursor = restored;
                }
                SolveStep::Solved { pos } => {
                    prop_assert_eq!(pos, target);
                    break;
                }
                SolveStep::Exhausted => prop_assert!(false, "perfect maze left unsolved"),
            }
        }
        prop_assert_eq!(maze.state.cursor(), target);
    }
}
