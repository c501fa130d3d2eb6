use caves::{
    config::{MazeConfig, PolicyChoice},
    grid::TileGrid,
    grid_displays::state_glyph,
    maze::Maze,
    observers::TileObserver,
    pacing::{generate_paced, NullPacer, SleepPacer},
    renderers,
    tiles::{Tile, TileState},
    units::{Height, Width},
};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use docopt::Docopt;
use error_chain::bail;
use itertools::Itertools;
use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde_derive::Deserialize;
use std::{
    cell::RefCell,
    fs::File,
    io,
    io::prelude::*,
    path::PathBuf,
    rc::Rc,
    time::Duration,
};

const USAGE: &str = "Caves

Usage:
    caves_driver -h | --help
    caves_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--policy=<name>] [--seed=<n>] [--text-out=<path>] [--image-out=<path> --cell-pixels=<n>] [--animate --delay-ms=<n>] [--trace-route] [--save-edges=<path>]

Options:
    -h --help            Show this screen.
    --grid-size=<n>      A square grid of n * n tiles.
    --grid-width=<w>     The grid width in a w*h grid [default: 20].
    --grid-height=<h>    The grid height in a w*h grid [default: 20].
    --policy=<name>      Decision policy, uniform-wall or neighbour-biased [default: neighbour-biased].
    --seed=<n>           Seed the random generator for a reproducible cave.
    --text-out=<path>    Write the text rendering to a file instead of stdout.
    --image-out=<path>   Write a PNG rendering of the cave to this path.
    --cell-pixels=<n>    Pixel count to render one tile side in the PNG [default: 10] max 255.
    --animate            Watch generation live in the terminal.
    --delay-ms=<n>       Milliseconds slept between animation frames [default: 4].
    --trace-route        After generation, trace the start to goal route step by step.
    --save-edges=<path>  Serialize the passage graph to a text file: line 1 is n(#vertices) m(#edges), every further line one edge. Uses 1-based vertex indices.
";

#[derive(Debug, Deserialize)]
struct CaveArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_policy: String,
    flag_seed: Option<u64>,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_animate: bool,
    flag_delay_ms: u64,
    flag_trace_route: bool,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {
        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            BadConfiguration(::caves::config::ConfigError);
            RenderFailure(::caves::renderers::RenderError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: CaveArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let policy: PolicyChoice = args.flag_policy.parse().map_err(Error::from)?;
    let mut config = MazeConfig::new(width, height, policy)?;
    config.seed = args.flag_seed;

    let mut maze = Maze::new(&config)?;

    let route_traced = if args.flag_animate {
        run_animated(&mut maze, &args)?
    } else {
        maze.generate();
        if args.flag_trace_route {
            Some(maze.validate_visually(&mut NullPacer))
        } else {
            None
        }
    };

    if args.flag_text_out.is_empty() {
        println!("{}", maze.grid());
    } else {
        write_text_to_file(&format!("{}", maze.grid()), &args.flag_text_out)
            .chain_err(|| format!("Failed to write the cave to text file {}", args.flag_text_out))?;
    }

    if !args.flag_image_out.is_empty() {
        let render_options = renderers::RenderOptionsBuilder::new()
            .cell_side_pixels_length(args.flag_cell_pixels)
            .output_file(Some(PathBuf::from(&args.flag_image_out)))
            .build();
        renderers::render_tile_grid(maze.grid(), &render_options)?;
    }

    if !args.flag_save_edges.is_empty() {
        save_passage_graph(maze.grid(), &args.flag_save_edges)?;
    }

    report(&maze, route_traced);
    Ok(())
}

fn report(maze: &Maze, route_traced: Option<bool>) {
    println!("policy: {}", maze.policy_name());
    println!("start ({}, {}), goal ({}, {})",
             maze.start().x,
             maze.start().y,
             maze.goal().x,
             maze.goal().y);

    let state_counts = maze.grid().tiles().iter().map(|tile| tile.state()).counts();
    for (state, count) in state_counts.iter().sorted_by_key(|&(_, &count)| count).rev() {
        println!("{:?}: {} tiles", state, count);
    }

    // Confirm the route with a plain graph search, independent of the
    // engine's own checks.
    let graph = maze.grid().passage_graph();
    let start = NodeIndex::new(maze.grid()
                                   .tile_index(maze.start())
                                   .expect("start lies within the grid"));
    let goal = NodeIndex::new(maze.grid()
                                  .tile_index(maze.goal())
                                  .expect("goal lies within the grid"));
    let connected = has_path_connecting(&graph, start, goal, None);
    println!("route start -> goal: {}",
             if connected { "confirmed" } else { "MISSING" });
    if let Some(found) = route_traced {
        println!("route trace: {}", if found { "goal reached" } else { "goal not reached" });
    }
}

fn state_terminal_colour(state: TileState) -> Color {
    match state {
        TileState::Unvisited => Color::DarkGrey,
        TileState::Frontier => Color::Cyan,
        TileState::Processing => Color::Red,
        TileState::Open => Color::White,
        TileState::Wall => Color::Grey,
        TileState::Start => Color::Yellow,
        TileState::Goal => Color::Green,
        TileState::Visited => Color::DarkYellow,
    }
}

/// Observer repainting each changed tile in place, two terminal columns per
/// tile. Paint failures are swallowed: notifications are fire and forget
/// and the cave does not care whether its audience kept up.
struct TerminalPainter {
    stdout: RefCell<io::Stdout>,
}

impl TerminalPainter {
    fn paint_tile(&self, tile: &Tile) -> io::Result<()> {
        let mut stdout = self.stdout.borrow_mut();
        let x = (tile.position().x * 2) as u16;
        let y = tile.position().y as u16;
        let glyph = state_glyph(tile.state());
        stdout.queue(MoveTo(x, y))?;
        stdout.queue(SetForegroundColor(state_terminal_colour(tile.state())))?;
        stdout.queue(Print(glyph))?;
        stdout.queue(Print(glyph))?;
        stdout.queue(ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    fn paint_grid(&self, grid: &TileGrid) -> io::Result<()> {
        for tile in grid.tiles() {
            self.paint_tile(tile)?;
        }
        Ok(())
    }
}

impl TileObserver for TerminalPainter {
    fn tile_changed(&self, tile: &Tile, _previous: TileState) {
        let _ = self.paint_tile(tile);
    }
}

fn run_animated(maze: &mut Maze, args: &CaveArgs) -> Result<Option<bool>> {
    let (Width(w), Height(h)) = (maze.grid().width(), maze.grid().height());
    let (term_cols, term_rows) = terminal::size()?;
    if w * 2 > term_cols as usize || h + 1 > term_rows as usize {
        bail!("a {}x{} cave does not fit this {}x{} terminal; shrink the grid or skip --animate",
              w,
              h,
              term_cols,
              term_rows);
    }

    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(Hide)?;
    io::stdout().execute(Clear(ClearType::All))?;

    let outcome = animate(maze, args);

    io::stdout().execute(Show)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    outcome
}

fn animate(maze: &mut Maze, args: &CaveArgs) -> Result<Option<bool>> {
    let painter = Rc::new(TerminalPainter { stdout: RefCell::new(io::stdout()) });
    painter.paint_grid(maze.grid())?;
    maze.add_observer(painter.clone());

    let mut pacer = SleepPacer::new(Duration::from_millis(args.flag_delay_ms));
    generate_paced(maze, &mut pacer);

    let route_traced = if args.flag_trace_route {
        Some(maze.validate_visually(&mut pacer))
    } else {
        None
    };

    // Leave the finished cave on screen until any key or other event lands.
    let _ = event::read()?;
    Ok(route_traced)
}

fn save_passage_graph(grid: &TileGrid, file_path: &str) -> Result<()> {
    let graph = grid.passage_graph();

    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", graph.node_count(), graph.edge_count()));
    for edge in graph.edge_references() {
        graph_data.push_str(&format!("{} {}\n",
                                     edge.source().index() + 1,
                                     edge.target().index() + 1));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write the passage graph to text file {}", file_path))?;
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
