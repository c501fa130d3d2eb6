use crate::grid::TileGrid;
use crate::tiles::TileState;
use crate::units::{Height, Width};

use image::{Rgb, RgbImage};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_CELL_PIXELS: u8 = 10;

/// The colour scheme for image renderings: undecided tiles grey, carved
/// floor white on black walls, the endpoints yellow and green, the route
/// trace a paler yellow.
pub fn state_colour(state: TileState) -> Rgb<u8> {
    match state {
        TileState::Unvisited => Rgb([128, 128, 128]),
        TileState::Frontier => Rgb([176, 188, 204]),
        TileState::Processing => Rgb([255, 0, 0]),
        TileState::Open => Rgb([255, 255, 255]),
        TileState::Wall => Rgb([0, 0, 0]),
        TileState::Start => Rgb([255, 255, 0]),
        TileState::Goal => Rgb([0, 255, 0]),
        TileState::Visited => Rgb([255, 236, 160]),
    }
}

/// Paint the grid into an RGB image, one square block of `cell_pixels` per
/// tile. A zero pixel size is drawn as one pixel rather than producing an
/// empty image.
pub fn tile_grid_image(grid: &TileGrid, cell_pixels: u8) -> RgbImage {
    let cell = u32::from(cell_pixels.max(1));
    let (Width(w), Height(h)) = (grid.width(), grid.height());
    let mut img = RgbImage::new(w as u32 * cell, h as u32 * cell);

    for tile in grid.tiles() {
        let colour = state_colour(tile.state());
        let left = tile.position().x * cell;
        let top = tile.position().y * cell;
        for dy in 0..cell {
            for dx in 0..cell {
                img.put_pixel(left + dx, top + dy, colour);
            }
        }
    }
    img
}

#[derive(Debug)]
pub enum RenderError {
    /// Rendering to a file was requested without an output path.
    NoOutputFile,
    Image(image::ImageError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RenderError::NoOutputFile => write!(f, "no output file set in the render options"),
            RenderError::Image(ref e) => write!(f, "failed to write the maze image: {}", e),
        }
    }
}

impl Error for RenderError {}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> RenderError {
        RenderError::Image(e)
    }
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub cell_pixels: u8,
    pub output_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> RenderOptionsBuilder {
        RenderOptionsBuilder {
            options: RenderOptions {
                cell_pixels: DEFAULT_CELL_PIXELS,
                output_file: None,
            },
        }
    }

    pub fn cell_side_pixels_length(mut self, cell_pixels: u8) -> RenderOptionsBuilder {
        self.options.cell_pixels = cell_pixels;
        self
    }

    pub fn output_file(mut self, path: Option<PathBuf>) -> RenderOptionsBuilder {
        self.options.output_file = path;
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}

impl Default for RenderOptionsBuilder {
    fn default() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }
}

/// Render the grid to the PNG file named by the options.
pub fn render_tile_grid(grid: &TileGrid, options: &RenderOptions) -> Result<(), RenderError> {
    let path = options.output_file.as_ref().ok_or(RenderError::NoOutputFile)?;
    let img = tile_grid_image(grid, options.cell_pixels);
    img.save(path)?;
    Ok(())
}
