use crate::cells::{Cell, CompassPrimary, CoordinateSmallVec, GridCoordinate, WallSide};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

use bit_set::BitSet;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FusedIterator;

/// Every run starts carving from here.
pub const START_CELL: GridCoordinate = GridCoordinate { x: 0, y: 0 };

/// Chooses which unvisited neighbour the backtracker carves into next.
pub trait IndexSource {
    /// Returns an index in `[0, count)`. `count` is never zero.
    fn choose_index(&mut self, count: usize) -> usize;
}

/// Uniform choice from a pseudo random generator seeded once per run.
/// The same seed always yields the same sequence of choices.
pub struct SeededIndexSource {
    rng: StdRng,
}

impl SeededIndexSource {
    pub fn new(seed: u64) -> SeededIndexSource {
        SeededIndexSource { rng: StdRng::seed_from_u64(seed) }
    }
}

impl IndexSource for SeededIndexSource {
    fn choose_index(&mut self, count: usize) -> usize {
        self.rng.gen_range(0..count)
    }
}

/// Replays a recorded sequence of choices, e.g. the `choice` fields of a previous run's steps.
/// Draws wrap modulo the option count and an exhausted sequence keeps choosing the first option.
#[derive(Clone, Debug, Default)]
pub struct ReplayDraws {
    draws: Vec<usize>,
    next: usize,
}

impl ReplayDraws {
    pub fn new(draws: Vec<usize>) -> ReplayDraws {
        ReplayDraws { draws, next: 0 }
    }
}

impl IndexSource for ReplayDraws {
    fn choose_index(&mut self, count: usize) -> usize {
        let draw = self.draws.get(self.next).cloned().unwrap_or(0);
        self.next += 1;
        draw % count
    }
}

/// One atomic unit of generation work.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Step {
    /// The wall on `side` of `from` (and the matching side of `to`) was removed and `to` became
    /// the frontier. `choice` is the index drawn from `options` unvisited neighbours.
    Carved {
        from: GridCoordinate,
        to: GridCoordinate,
        side: WallSide,
        choice: usize,
        options: usize,
    },
    /// `cell` had no unvisited neighbours left and was dropped from the stack.
    Backtracked { cell: GridCoordinate },
}

impl Step {
    /// The frontier cell once this step has been applied.
    pub fn frontier(&self) -> GridCoordinate {
        match *self {
            Step::Carved { to, .. } => to,
            Step::Backtracked { cell } => cell,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GeneratorState {
    Idle,
    Running,
}

/// Unvisited cells next to `coord`, in north, east, south, west order.
pub fn unvisited_neighbours(coord: GridCoordinate, grid: &Grid, visited: &BitSet) -> CoordinateSmallVec {
    unvisited_directions(coord, grid, visited)
        .into_iter()
        .map(|dir| dir.offset_coordinate(coord))
        .collect()
}

fn unvisited_directions(coord: GridCoordinate,
                        grid: &Grid,
                        visited: &BitSet)
                        -> SmallVec<[CompassPrimary; 4]> {
    CompassPrimary::SEARCH_ORDER
        .iter()
        .cloned()
        .filter(|dir| {
            grid.neighbour_at_direction(coord, *dir)
                .map_or(false, |neighbour| !visited.contains(grid.unchecked_index(neighbour)))
        })
        .collect()
}

// Everything scoped to a single generation run. Replaced wholesale, never merged.
struct Run {
    source: Box<dyn IndexSource>,
    visited: BitSet,
    stack: Vec<GridCoordinate>,
    frontier: Option<GridCoordinate>,
    steps_taken: usize,
}

/// Randomised depth first maze generation driven one step at a time.
///
/// The generator is the only writer of the grid's walls and of the visitation state while a run
/// exists; observers read through `grid()`, `current_frontier_cell()` and `is_visited()` between
/// steps, when the grid, visitation bitmap and stack are always consistent.
pub struct RecursiveBacktracker {
    grid: Grid,
    run: Option<Run>,
}

impl fmt::Debug for RecursiveBacktracker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RecursiveBacktracker :: grid: {:?}x{:?}, state: {:?}, frontier: {:?}, steps: {}",
               self.grid.width(), self.grid.height(), self.state(),
               self.current_frontier(), self.steps_taken())
    }
}

impl RecursiveBacktracker {
    pub fn new(grid: Grid) -> RecursiveBacktracker {
        RecursiveBacktracker { grid, run: None }
    }

    /// Allocate a fresh `width * height` grid with every wall present.
    pub fn initialize_grid(width: Width, height: Height) -> Result<RecursiveBacktracker> {
        Ok(RecursiveBacktracker::new(Grid::new(width, height)?))
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Start a run seeded with `seed`, cancelling any run in progress.
    pub fn generate(&mut self, seed: u64) {
        debug!("Starting maze generation with seed {}", seed);
        self.generate_with(SeededIndexSource::new(seed));
    }

    /// Start a run whose neighbour choices come from `source`, cancelling any run in progress.
    pub fn generate_with<S: IndexSource + 'static>(&mut self, source: S) {
        self.cancel_run();

        // Wall removal is cumulative, so each run starts from a fully walled grid.
        self.grid.reset_walls();

        let cells_count = self.grid.size();
        let mut visited = BitSet::with_capacity(cells_count);
        let mut stack = Vec::with_capacity(cells_count);
        let mut frontier = None;
        if let Ok(start_index) = self.grid.grid_coordinate_to_index(START_CELL) {
            visited.insert(start_index);
            stack.push(START_CELL);
            frontier = Some(START_CELL);
        }

        self.run = Some(Run {
            source: Box::new(source),
            visited,
            stack,
            frontier,
            steps_taken: 0,
        });
    }

    /// Discard the current run, if any. Walls already removed stay removed until the next run.
    pub fn stop(&mut self) {
        self.cancel_run();
    }

    fn cancel_run(&mut self) {
        if let Some(previous) = self.run.take() {
            if !previous.stack.is_empty() {
                debug!("Cancelled maze generation after {} steps", previous.steps_taken);
            }
        }
    }

    /// Perform the next step of the run. `None` once the run is complete or when there is no run.
    pub fn step(&mut self) -> Option<Step> {
        let grid = &mut self.grid;
        let run = self.run.as_mut()?;

        let current = run.stack.pop()?;
        run.frontier = Some(current);
        run.steps_taken += 1;

        let directions = unvisited_directions(current, grid, &run.visited);
        let step = if directions.is_empty() {
            trace!("Backtracked from {}", current);
            Step::Backtracked { cell: current }
        } else {
            run.stack.push(current);

            let options = directions.len();
            let choice = run.source.choose_index(options) % options;
            let (next, side) = grid.carve(current, directions[choice]);
            run.visited.insert(grid.unchecked_index(next));
            run.stack.push(next);
            run.frontier = Some(next);

            trace!("Carved {} -> {} ({} of {})", current, next, choice, options);
            Step::Carved {
                from: current,
                to: next,
                side,
                choice,
                options,
            }
        };

        if run.stack.is_empty() {
            info!("Maze generation complete: {} cells visited in {} steps",
                  run.visited.len(), run.steps_taken);
        }

        Some(step)
    }

    /// Lazily pull the remaining steps of the current run.
    pub fn steps(&mut self) -> Steps {
        Steps { generator: self }
    }

    /// Step until the run is complete, returning the number of steps taken by this call.
    pub fn run_to_completion(&mut self) -> usize {
        self.steps().count()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.run.as_ref().map_or(false, |run| !run.stack.is_empty())
    }

    pub fn state(&self) -> GeneratorState {
        if self.is_running() {
            GeneratorState::Running
        } else {
            GeneratorState::Idle
        }
    }

    /// Coordinate of the last cell processed by the current (or just completed) run.
    #[inline]
    pub fn current_frontier(&self) -> Option<GridCoordinate> {
        self.run.as_ref().and_then(|run| run.frontier)
    }

    pub fn current_frontier_cell(&self) -> Option<&Cell> {
        self.current_frontier().and_then(|coord| self.grid.cell(coord).ok())
    }

    /// Has the current run reached this cell. Always false when there is no run.
    pub fn is_visited(&self, coord: GridCoordinate) -> Result<bool> {
        let index = self.grid.grid_coordinate_to_index(coord)?;
        Ok(self.run.as_ref().map_or(false, |run| run.visited.contains(index)))
    }

    pub fn visited_count(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.visited.len())
    }

    /// Backtracking stack of the current run, bottom first.
    pub fn stack(&self) -> &[GridCoordinate] {
        match self.run {
            Some(ref run) => &run.stack,
            None => &[],
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.steps_taken)
    }
}

/// The remaining steps of a run. Finite, and ends for good once the stack is empty.
pub struct Steps<'a> {
    generator: &'a mut RecursiveBacktracker,
}

impl<'a> Iterator for Steps<'a> {
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        self.generator.step()
    }
}
impl<'a> FusedIterator for Steps<'a> {}
