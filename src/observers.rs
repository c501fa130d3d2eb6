use crate::tiles::{Tile, TileState};

/// Callback interface for tile state changes.
///
/// A grid notifies every registered observer each time a tile's state
/// actually changes. Methods take `&self` so observers can be shared as
/// `Rc<dyn TileObserver>`; implementations that accumulate data wrap their
/// state in a `RefCell`.
pub trait TileObserver {
    fn tile_changed(&self, _tile: &Tile, _previous: TileState) {}
}

/// Observer that ignores every notification.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullTileObserver;

impl TileObserver for NullTileObserver {}
