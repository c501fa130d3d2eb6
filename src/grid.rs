use crate::observers::TileObserver;
use crate::tiles::{CompassPrimary, PositionSmallVec, Tile, TilePosition, TileState,
                   COMPASS_PRIMARIES};
use crate::units::{Height, Width};

use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};
use std::fmt;
use std::rc::Rc;

/// A rectangular field of tiles stored in row major order.
///
/// Every coordinate within the width and height exists exactly once and the
/// tiles themselves are never reallocated for the life of the grid; only
/// their states change. State changes go through `set_state`, which notifies
/// any registered observers.
pub struct TileGrid {
    width: Width,
    height: Height,
    tiles: Vec<Tile>,
    observers: Vec<Rc<dyn TileObserver>>,
}

impl fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "TileGrid :: width: {:?}, height: {:?}, observers: {}",
               self.width,
               self.height,
               self.observers.len())
    }
}

impl TileGrid {
    pub fn new(width: Width, height: Height) -> TileGrid {
        let (Width(w), Height(h)) = (width, height);
        debug_assert!(w > 0 && h > 0, "tile grid dimensions must be positive");

        let size = w * h;
        let mut tiles = Vec::with_capacity(size);
        for index in 0..size {
            let x = (index % w) as u32;
            let y = (index / w) as u32;
            tiles.push(Tile::new(TilePosition::new(x, y)));
        }

        TileGrid {
            width,
            height,
            tiles,
            observers: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Is the position within the grid's dimensions?
    #[inline]
    pub fn is_valid_position(&self, pos: TilePosition) -> bool {
        (pos.x as usize) < self.width.0 && (pos.y as usize) < self.height.0
    }

    /// The tile at `pos`, or None when the position is out of bounds.
    #[inline]
    pub fn tile(&self, pos: TilePosition) -> Option<&Tile> {
        self.tile_index(pos).map(|index| &self.tiles[index])
    }

    /// The state of the tile at `pos`, or None when out of bounds.
    #[inline]
    pub fn state(&self, pos: TilePosition) -> Option<TileState> {
        self.tile(pos).map(|tile| tile.state())
    }

    /// Assign a new state to the tile at `pos`, notifying every registered
    /// observer when the state actually changes.
    ///
    /// Panics if the position is outside the grid.
    pub fn set_state(&mut self, pos: TilePosition, state: TileState) {
        let index = self.tile_index(pos).expect("tile position outside the grid");
        let previous = self.tiles[index].state();
        if previous == state {
            return;
        }
        self.tiles[index].set_state(state);

        let tile = self.tiles[index];
        for observer in &self.observers {
            observer.tile_changed(&tile, previous);
        }
    }

    /// Positions directly to the North, South, East or West of `pos` that
    /// lie within the grid, in that fixed order.
    pub fn neighbours(&self, pos: TilePosition) -> PositionSmallVec {
        COMPASS_PRIMARIES.iter()
                         .filter_map(|&dir| pos.offset(dir))
                         .filter(|&p| self.is_valid_position(p))
                         .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  pos: TilePosition,
                                  direction: CompassPrimary)
                                  -> Option<TilePosition> {
        pos.offset(direction).and_then(|neighbour| {
            if self.is_valid_position(neighbour) {
                Some(neighbour)
            } else {
                None
            }
        })
    }

    /// Set every tile back to `Unvisited` without reallocating anything.
    pub fn reset(&mut self) {
        for pos in self.iter() {
            self.set_state(pos, TileState::Unvisited);
        }
    }

    /// Row major iterator over every position in the grid.
    #[inline]
    pub fn iter(&self) -> TilePositions {
        TilePositions {
            row_width: self.width.0,
            size: self.size(),
            index: 0,
        }
    }

    /// Positions of every tile satisfying the predicate, in row major order.
    pub fn filter_positions<P>(&self, predicate: P) -> Vec<TilePosition>
        where P: Fn(&Tile) -> bool
    {
        self.tiles
            .iter()
            .filter(|tile| predicate(tile))
            .map(|tile| tile.position())
            .collect()
    }

    /// Convert a position to its one dimensional index in 0..grid.size().
    /// Returns None if the position is invalid.
    #[inline]
    pub fn tile_index(&self, pos: TilePosition) -> Option<usize> {
        if self.is_valid_position(pos) {
            Some(pos.y as usize * self.width.0 + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn position_from_index(&self, index: usize) -> TilePosition {
        debug_assert!(index < self.size(), "tile index outside the grid");
        let Width(w) = self.width;
        TilePosition::new((index % w) as u32, (index / w) as u32)
    }

    pub fn add_observer(&mut self, observer: Rc<dyn TileObserver>) {
        self.observers.push(observer);
    }

    /// Graph of the grid's passable tiles: one node per tile (node index ==
    /// row major tile index), one edge per orthogonally adjacent passable
    /// pair. Suitable for connectivity queries independent of the engine's
    /// own searches.
    pub fn passage_graph(&self) -> Graph<(), (), Undirected> {
        let nodes = self.size();
        let mut graph = Graph::with_capacity(nodes, nodes);
        for _ in 0..nodes {
            let _ = graph.add_node(());
        }

        for tile in &self.tiles {
            if !tile.state().is_passable() {
                continue;
            }
            let pos = tile.position();
            let index = self.tile_index(pos).expect("stored tile has an invalid position");
            for neighbour in self.neighbours(pos) {
                let passable = self.state(neighbour)
                                   .map_or(false, |state| state.is_passable());
                if passable {
                    let neighbour_index =
                        self.tile_index(neighbour).expect("neighbour outside the grid");
                    // update_edge rather than add_edge: each pair is seen twice.
                    let _ = graph.update_edge(NodeIndex::new(index),
                                              NodeIndex::new(neighbour_index),
                                              ());
                }
            }
        }

        graph
    }
}

pub struct TilePositions {
    row_width: usize,
    size: usize,
    index: usize,
}

impl Iterator for TilePositions {
    type Item = TilePosition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.size {
            let pos = TilePosition::new((self.index % self.row_width) as u32,
                                        (self.index / self.row_width) as u32);
            self.index += 1;
            Some(pos)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size - self.index;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for TilePositions {} // default impl using size_hint()

impl<'a> IntoIterator for &'a TileGrid {
    type Item = TilePosition;
    type IntoIter = TilePositions;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::TileObserver;
    use crate::tiles::{CompassPrimary, Tile, TilePosition, TileState};
    use crate::units::{Height, Width};

    use itertools::Itertools;
    use petgraph::algo::has_path_connecting;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn grid(w: usize, h: usize) -> TileGrid {
        TileGrid::new(Width(w), Height(h))
    }

    #[test]
    fn neighbour_tiles() {
        let g = grid(10, 10);

        let check_expected_neighbours = |pos, expected_neighbours: &[TilePosition]| {
            let found: Vec<TilePosition> =
                g.neighbours(pos).iter().cloned().sorted().collect();
            let expected: Vec<TilePosition> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(found, expected);
        };
        let tp = |x, y| TilePosition::new(x, y);

        // corners
        check_expected_neighbours(tp(0, 0), &[tp(1, 0), tp(0, 1)]);
        check_expected_neighbours(tp(9, 0), &[tp(8, 0), tp(9, 1)]);
        check_expected_neighbours(tp(0, 9), &[tp(0, 8), tp(1, 9)]);
        check_expected_neighbours(tp(9, 9), &[tp(9, 8), tp(8, 9)]);

        // side element examples
        check_expected_neighbours(tp(1, 0), &[tp(0, 0), tp(1, 1), tp(2, 0)]);
        check_expected_neighbours(tp(0, 1), &[tp(0, 0), tp(0, 2), tp(1, 1)]);

        // somewhere with all four neighbours
        check_expected_neighbours(tp(1, 1), &[tp(0, 1), tp(1, 0), tp(2, 1), tp(1, 2)]);
    }

    #[test]
    fn neighbour_order_is_deterministic() {
        let g = grid(5, 5);
        let found: Vec<TilePosition> =
            g.neighbours(TilePosition::new(2, 2)).iter().cloned().collect();
        // North, South, East, West
        assert_eq!(found,
                   vec![TilePosition::new(2, 1),
                        TilePosition::new(2, 3),
                        TilePosition::new(3, 2),
                        TilePosition::new(1, 2)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = grid(2, 2);
        let tp = |x, y| TilePosition::new(x, y);
        let check_neighbour = |pos, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(pos, dir), expected);
        };
        check_neighbour(tp(0, 0), CompassPrimary::North, None);
        check_neighbour(tp(0, 0), CompassPrimary::South, Some(tp(0, 1)));
        check_neighbour(tp(0, 0), CompassPrimary::East, Some(tp(1, 0)));
        check_neighbour(tp(0, 0), CompassPrimary::West, None);

        check_neighbour(tp(1, 1), CompassPrimary::North, Some(tp(1, 0)));
        check_neighbour(tp(1, 1), CompassPrimary::South, None);
        check_neighbour(tp(1, 1), CompassPrimary::East, None);
        check_neighbour(tp(1, 1), CompassPrimary::West, Some(tp(0, 1)));
    }

    #[test]
    fn out_of_bounds_access_is_guarded() {
        let g = grid(4, 3);
        assert!(g.tile(TilePosition::new(4, 0)).is_none());
        assert!(g.tile(TilePosition::new(0, 3)).is_none());
        assert!(g.state(TilePosition::new(100, 100)).is_none());
        assert_eq!(g.tile_index(TilePosition::new(4, 2)), None);
        assert_eq!(g.tile_index(TilePosition::new(3, 2)), Some(11));
    }

    #[test]
    #[should_panic(expected = "outside the grid")]
    fn setting_an_out_of_bounds_tile_panics() {
        let mut g = grid(3, 4);
        g.set_state(TilePosition::new(3, 0), TileState::Wall);
    }

    #[test]
    fn iteration_is_row_major_and_exact() {
        let g = grid(3, 2);
        let positions: Vec<TilePosition> = g.iter().collect();
        assert_eq!(positions,
                   vec![TilePosition::new(0, 0),
                        TilePosition::new(1, 0),
                        TilePosition::new(2, 0),
                        TilePosition::new(0, 1),
                        TilePosition::new(1, 1),
                        TilePosition::new(2, 1)]);
        assert_eq!(g.iter().len(), 6);
        assert_eq!((&g).into_iter().count(), g.size());
    }

    #[test]
    fn index_conversions_roundtrip() {
        let g = grid(7, 5);
        for pos in g.iter() {
            let index = g.tile_index(pos).expect("iterated position must be valid");
            assert_eq!(g.position_from_index(index), pos);
        }
    }

    #[test]
    fn filtering_finds_matching_tiles() {
        let mut g = grid(4, 4);
        g.set_state(TilePosition::new(1, 1), TileState::Open);
        g.set_state(TilePosition::new(2, 3), TileState::Open);
        g.set_state(TilePosition::new(0, 0), TileState::Wall);

        let open = g.filter_positions(|tile: &Tile| tile.state() == TileState::Open);
        assert_eq!(open,
                   vec![TilePosition::new(1, 1), TilePosition::new(2, 3)]);
    }

    #[test]
    fn reset_returns_every_tile_to_unvisited() {
        let mut g = grid(3, 3);
        g.set_state(TilePosition::new(0, 0), TileState::Wall);
        g.set_state(TilePosition::new(1, 1), TileState::Open);
        g.reset();
        assert!(g.tiles().iter().all(|tile| tile.state() == TileState::Unvisited));
    }

    struct RecordingObserver {
        changes: RefCell<Vec<(TilePosition, TileState, TileState)>>,
    }
    impl TileObserver for RecordingObserver {
        fn tile_changed(&self, tile: &Tile, previous: TileState) {
            self.changes
                .borrow_mut()
                .push((tile.position(), previous, tile.state()));
        }
    }

    #[test]
    fn observers_hear_real_state_changes_only() {
        let mut g = grid(3, 3);
        let recorder = Rc::new(RecordingObserver { changes: RefCell::new(Vec::new()) });
        g.add_observer(recorder.clone());

        let pos = TilePosition::new(1, 2);
        g.set_state(pos, TileState::Frontier);
        g.set_state(pos, TileState::Frontier); // no change, no notification
        g.set_state(pos, TileState::Open);

        let seen = recorder.changes.borrow();
        assert_eq!(*seen,
                   vec![(pos, TileState::Unvisited, TileState::Frontier),
                        (pos, TileState::Frontier, TileState::Open)]);
    }

    #[test]
    fn passage_graph_connects_exactly_the_passable_tiles() {
        let mut g = grid(5, 5);
        let tp = |x, y| TilePosition::new(x, y);
        g.set_state(tp(2, 3), TileState::Start);
        g.set_state(tp(2, 2), TileState::Open);
        g.set_state(tp(2, 1), TileState::Goal);
        g.set_state(tp(1, 1), TileState::Wall);

        let start = NodeIndex::new(g.tile_index(tp(2, 3)).unwrap());
        let goal = NodeIndex::new(g.tile_index(tp(2, 1)).unwrap());
        let corner = NodeIndex::new(g.tile_index(tp(0, 0)).unwrap());
        let walled = NodeIndex::new(g.tile_index(tp(1, 1)).unwrap());

        let graph = g.passage_graph();
        assert!(has_path_connecting(&graph, start, goal, None));
        // unvisited and wall tiles take no part in any route
        assert!(!has_path_connecting(&graph, corner, goal, None));
        assert!(!has_path_connecting(&graph, walled, goal, None));

        // walling the corridor's middle severs the route
        g.set_state(tp(2, 2), TileState::Wall);
        let severed = g.passage_graph();
        assert!(!has_path_connecting(&severed, start, goal, None));
    }
}
