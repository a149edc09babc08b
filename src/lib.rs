//! **mazegen** generates perfect mazes with a steppable recursive backtracker, so a host can
//! animate or inspect the carving cell by cell.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod passages;
pub mod units;
