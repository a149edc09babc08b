//! Graph view of a carved grid: cells are nodes, open walls are edges.

use crate::cells::{GridCoordinate, WallSide};
use crate::grid::Grid;

use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};

pub type PassageGraph = Graph<GridCoordinate, (), Undirected>;

/// Build an undirected graph with one node per cell (node index == row major grid index) and one
/// edge per wall that is open on both sides.
pub fn passage_graph(grid: &Grid) -> PassageGraph {
    let cells_count = grid.size();
    let mut graph = PassageGraph::with_capacity(cells_count, cells_count.saturating_sub(1));
    for coord in grid.iter() {
        let _ = graph.add_node(coord);
    }

    for (index, coord) in grid.iter().enumerate() {
        // Each shared wall is seen from exactly one of its cells via top or right.
        for side in &[WallSide::Top, WallSide::Right] {
            let neighbour_index = grid.neighbour_at_direction(coord, side.direction())
                .filter(|neighbour| grid.is_open_between(coord, *neighbour))
                .and_then(|neighbour| grid.grid_coordinate_to_index(neighbour).ok());
            if let Some(neighbour_index) = neighbour_index {
                let _ = graph.add_edge(NodeIndex::new(index), NodeIndex::new(neighbour_index), ());
            }
        }
    }

    graph
}

/// A perfect maze is a spanning tree: connected, acyclic, `cells - 1` passages.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    let graph = passage_graph(grid);
    graph.node_count() > 0 &&
    graph.edge_count() == graph.node_count() - 1 &&
    connected_components(&graph) == 1 &&
    !is_cyclic_undirected(&graph)
}

/// Every wall between two cells is either present on both sides or open on both sides.
pub fn walls_are_symmetric(grid: &Grid) -> bool {
    grid.cells().all(|cell| {
        WallSide::ALL.iter().all(|side| {
            match grid.neighbour_at_direction(cell.coordinate(), side.direction()) {
                Some(neighbour) => {
                    grid.wall(neighbour, side.opposite())
                        .map_or(false, |present| present == cell.wall(*side))
                }
                None => true,
            }
        })
    })
}

/// No cell on the edge of the grid is open towards the outside.
pub fn boundary_is_closed(grid: &Grid) -> bool {
    grid.cells().all(|cell| {
        WallSide::ALL
            .iter()
            .filter(|side| grid.neighbour_at_direction(cell.coordinate(), side.direction()).is_none())
            .all(|side| cell.wall(*side))
    })
}

/// Cells with exactly one way in or out.
pub fn dead_ends_count(grid: &Grid) -> usize {
    grid.cells().filter(|cell| cell.open_sides().len() == 1).count()
}
