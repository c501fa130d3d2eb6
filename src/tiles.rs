use smallvec::SmallVec;
use std::cmp;
use std::convert::From;

pub type PositionSmallVec = SmallVec<[TilePosition; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct TilePosition {
    pub x: u32,
    pub y: u32,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

pub const COMPASS_PRIMARIES: [CompassPrimary; 4] = [CompassPrimary::North,
                                                    CompassPrimary::South,
                                                    CompassPrimary::East,
                                                    CompassPrimary::West];

/// The full set of states a tile moves through while a cave is grown.
///
/// `Unvisited` tiles have never been touched by the expansion. `Frontier`
/// tiles sit in the work queue awaiting a decision and `Processing` marks the
/// single tile whose decision is in flight. `Open` and `Wall` are the
/// terminal decisions. `Start` and `Goal` are the fixed endpoints and
/// `Visited` is a diagnostic recolouring applied by the route tracer.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum TileState {
    Unvisited,
    Frontier,
    Processing,
    Open,
    Wall,
    Start,
    Goal,
    Visited,
}

impl TileState {
    /// True for the states a route may pass through in a finished cave.
    #[inline]
    pub fn is_passable(self) -> bool {
        match self {
            TileState::Open | TileState::Start | TileState::Goal | TileState::Visited => true,
            _ => false,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Tile {
    position: TilePosition,
    state: TileState,
}

impl TilePosition {
    pub fn new(x: u32, y: u32) -> TilePosition {
        TilePosition { x, y }
    }

    /// Manhattan distance: the number of orthogonal steps between two
    /// positions. Admissible and consistent as a search heuristic on a
    /// 4-connected grid.
    #[inline]
    pub fn manhattan_distance(&self, other: TilePosition) -> u32 {
        let dx = cmp::max(self.x, other.x) - cmp::min(self.x, other.x);
        let dy = cmp::max(self.y, other.y) - cmp::min(self.y, other.y);
        dx + dy
    }

    /// The position one tile away in the given direction.
    /// Returns None if the position is not representable.
    #[inline]
    pub fn offset(&self, dir: CompassPrimary) -> Option<TilePosition> {
        let (x, y) = (self.x, self.y);
        match dir {
            CompassPrimary::North => {
                if y > 0 {
                    Some(TilePosition { x, y: y - 1 })
                } else {
                    None
                }
            }
            CompassPrimary::South => Some(TilePosition { x, y: y + 1 }),
            CompassPrimary::East => Some(TilePosition { x: x + 1, y }),
            CompassPrimary::West => {
                if x > 0 {
                    Some(TilePosition { x: x - 1, y })
                } else {
                    None
                }
            }
        }
    }
}

impl From<(u32, u32)> for TilePosition {
    fn from(x_y_pair: (u32, u32)) -> TilePosition {
        TilePosition::new(x_y_pair.0, x_y_pair.1)
    }
}

impl Tile {
    pub fn new(position: TilePosition) -> Tile {
        Tile {
            position,
            state: TileState::Unvisited,
        }
    }

    #[inline]
    pub fn position(&self) -> TilePosition {
        self.position
    }

    #[inline]
    pub fn state(&self) -> TileState {
        self.state
    }

    /// Manhattan distance between this tile and `other`.
    #[inline]
    pub fn distance_to(&self, other: &Tile) -> u32 {
        self.position.manhattan_distance(other.position())
    }

    pub(crate) fn set_state(&mut self, state: TileState) {
        self.state = state;
    }
}
