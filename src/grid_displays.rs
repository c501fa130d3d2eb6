use crate::grid::TileGrid;
use crate::tiles::TileState;
use crate::units::Width;

use std::fmt;

/// One character per tile state for text renderings. Open floor is blank so
/// the carved space reads as space; everything blocking is visibly solid.
pub fn state_glyph(state: TileState) -> char {
    match state {
        TileState::Unvisited => '.',
        TileState::Frontier => ':',
        TileState::Processing => '?',
        TileState::Open => ' ',
        TileState::Wall => '#',
        TileState::Start => 'S',
        TileState::Goal => 'G',
        TileState::Visited => '*',
    }
}

/// Text rendering of the whole grid, one line per row. Each tile is drawn
/// as two copies of its glyph: terminal cells are roughly twice as tall as
/// wide, so doubling the columns keeps the maze square on screen.
impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Width(w) = self.width();
        for (index, tile) in self.tiles().iter().enumerate() {
            let glyph = state_glyph(tile.state());
            write!(f, "{}{}", glyph, glyph)?;
            if (index + 1) % w == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TilePosition;
    use crate::units::{Height, Width};

    use itertools::Itertools;

    #[test]
    fn every_state_has_its_own_glyph() {
        let states = [TileState::Unvisited,
                      TileState::Frontier,
                      TileState::Processing,
                      TileState::Open,
                      TileState::Wall,
                      TileState::Start,
                      TileState::Goal,
                      TileState::Visited];
        let glyphs: Vec<char> = states.iter().map(|&state| state_glyph(state)).unique().collect();
        assert_eq!(glyphs.len(), states.len());
    }

    #[test]
    fn display_draws_one_doubled_line_per_row() {
        let mut grid = TileGrid::new(Width(4), Height(3));
        grid.set_state(TilePosition::new(0, 0), TileState::Wall);
        grid.set_state(TilePosition::new(1, 1), TileState::Start);
        grid.set_state(TilePosition::new(2, 1), TileState::Open);
        grid.set_state(TilePosition::new(3, 2), TileState::Goal);

        let text = format!("{}", grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["##......", "..SS  ..", "......GG"]);
    }
}
