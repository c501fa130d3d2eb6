//! **caves** grows random cave mazes tile by tile while guaranteeing a
//! route between the start and goal always survives.

pub mod config;
pub mod grid;
pub mod grid_displays;
pub mod maze;
pub mod observers;
pub mod pacing;
pub mod pathing;
pub mod policies;
pub mod renderers;
pub mod tiles;
pub mod units;
mod utils;
