use crate::cells::{GridCoordinate, WallSide};
use crate::generators::RecursiveBacktracker;
use crate::grid::Grid;

use std::fmt;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from("   ")
    }
}

/// Empty cell bodies, walls only.
#[derive(Debug, Copy, Clone)]
pub struct PlainDisplay;

impl GridDisplay for PlainDisplay {}

/// Marks the frontier and/or visited cells of a generator's current run.
pub struct RunOverlay<'a> {
    generator: &'a RecursiveBacktracker,
    show_visited: bool,
    show_frontier: bool,
}

impl<'a> RunOverlay<'a> {
    pub fn new(generator: &'a RecursiveBacktracker,
               show_visited: bool,
               show_frontier: bool)
               -> RunOverlay<'a> {
        RunOverlay {
            generator,
            show_visited,
            show_frontier,
        }
    }
}

impl<'a> GridDisplay for RunOverlay<'a> {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.show_frontier && self.generator.current_frontier() == Some(coord) {
            String::from(" @ ")
        } else if self.show_visited && self.generator.is_visited(coord).unwrap_or(false) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

/// Text rendering of a grid, north (highest `y`) at the top.
///
/// ```text
/// +---+---+
/// |       |
/// +---+   +
/// |       |
/// +---+---+
/// ```
pub struct MazeText<'a> {
    grid: &'a Grid,
    display: &'a dyn GridDisplay,
}

impl<'a> MazeText<'a> {
    pub fn new(grid: &'a Grid, display: &'a dyn GridDisplay) -> MazeText<'a> {
        MazeText { grid, display }
    }
}

impl<'a> fmt::Display for MazeText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const CORNER: &str = "+";
        const WALL_LR_3: &str = "---";
        const OPEN_LR_3: &str = "   ";
        const WALL_UD: &str = "|";
        const OPEN_UD: &str = " ";

        let wall_present = |coord, side| self.grid.wall(coord, side).unwrap_or(true);

        let mut bottom_row = Vec::new();
        for row in self.grid.iter_row().rev() {

            // The northern boundary of each row, shared with the southern side of the row above.
            let mut row_top_section_render = String::from(CORNER);
            let mut row_middle_section_render = String::new();

            for (index_column, &cell_coord) in row.iter().enumerate() {
                row_top_section_render.push_str(if wall_present(cell_coord, WallSide::Top) {
                    WALL_LR_3
                } else {
                    OPEN_LR_3
                });
                row_top_section_render.push_str(CORNER);

                if index_column == 0 {
                    row_middle_section_render.push_str(if wall_present(cell_coord, WallSide::Left) {
                        WALL_UD
                    } else {
                        OPEN_UD
                    });
                }
                row_middle_section_render.push_str(&self.display.render_cell_body(cell_coord));
                row_middle_section_render.push_str(if wall_present(cell_coord, WallSide::Right) {
                    WALL_UD
                } else {
                    OPEN_UD
                });
            }

            writeln!(f, "{}", row_top_section_render)?;
            writeln!(f, "{}", row_middle_section_render)?;
            bottom_row = row;
        }

        let mut southern_boundary = String::from(CORNER);
        for &cell_coord in &bottom_row {
            southern_boundary.push_str(if wall_present(cell_coord, WallSide::Bottom) {
                WALL_LR_3
            } else {
                OPEN_LR_3
            });
            southern_boundary.push_str(CORNER);
        }
        writeln!(f, "{}", southern_boundary)
    }
}
