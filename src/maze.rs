use crate::config::{ConfigError, MazeConfig};
use crate::grid::TileGrid;
use crate::observers::TileObserver;
use crate::pacing::Pacer;
use crate::pathing::CandidateQueue;
use crate::policies::{policy_for, DecisionPolicy, TileDecision};
use crate::tiles::{TilePosition, TileState};
use crate::units::{Height, Width};
use crate::utils;

use bit_set::BitSet;
use rand::{Rng, SeedableRng, XorShiftRng};
use std::rc::Rc;

/// What one call to `Maze::step` did with the tile it pulled off the queue.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerationStep {
    /// The popped tile had already left the frontier, so nothing was decided.
    Skipped(TilePosition),
    /// The route check failed and the tile was forced open to keep the
    /// goal reachable.
    Forced(TilePosition),
    /// The route survived either way, so the decision policy chose the
    /// tile's terminal state.
    Decided(TilePosition, TileDecision),
}

/// The generation and validation engine.
///
/// A maze owns one grid and grows an open region out from the start tile,
/// one frontier tile at a time. Each tile's terminal state comes from the
/// configured decision policy, except that any decision which would sever
/// the start to goal route is vetoed: the route check runs before every
/// decision and on failure the tile is forced open. The border ring is
/// always wall, the start and goal tiles are fixed once placed, and after
/// every finalised decision the goal remains reachable from the start
/// through open tiles or tiles that could still open.
///
/// All randomness comes from the injected generator, so a seeded maze
/// regenerates identically.
pub struct Maze {
    grid: TileGrid,
    policy: Box<dyn DecisionPolicy>,
    rng: XorShiftRng,
    start: TilePosition,
    goal: TilePosition,
    pinned: Option<(TilePosition, TilePosition)>,
    frontier: Vec<TilePosition>,
    explored: BitSet,
}

impl Maze {
    pub fn new(config: &MazeConfig) -> Result<Maze, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => XorShiftRng::from_seed(utils::xorshift_seed(seed)),
            None => rand::weak_rng(),
        };
        let grid = TileGrid::new(config.width, config.height);
        let explored = BitSet::with_capacity(grid.size());

        let mut maze = Maze {
            grid,
            policy: policy_for(config.policy),
            rng,
            start: TilePosition::new(0, 0),
            goal: TilePosition::new(0, 0),
            pinned: config.endpoints,
            frontier: Vec::new(),
            explored,
        };
        maze.initialize();
        Ok(maze)
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    #[inline]
    pub fn start(&self) -> TilePosition {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> TilePosition {
        self.goal
    }

    /// Number of frontier tiles still awaiting a decision.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.frontier.len()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn add_observer(&mut self, observer: Rc<dyn TileObserver>) {
        self.grid.add_observer(observer);
    }

    /// Run the generation loop to completion.
    pub fn generate(&mut self) {
        while self.step().is_some() {}
    }

    /// Pull one tile at random off the frontier queue and finalise it.
    ///
    /// Returns None once the queue is empty, which is the loop's only
    /// termination condition: every tile the expansion ever reaches is
    /// queued at most once, so the queue strictly shrinks overall.
    pub fn step(&mut self) -> Option<GenerationStep> {
        if self.frontier.is_empty() {
            return None;
        }

        let slot = self.rng.gen::<usize>() % self.frontier.len();
        let pos = self.frontier.swap_remove(slot);
        if self.grid.state(pos) != Some(TileState::Frontier) {
            return Some(GenerationStep::Skipped(pos));
        }

        // Held at Processing during the check: the tile neither helps nor
        // hurts the route until its decision lands.
        self.grid.set_state(pos, TileState::Processing);

        let step = if self.is_route_open() {
            let decision = self.policy.decide(pos, &self.grid, &mut self.rng);
            match decision {
                TileDecision::Open => self.finalise_open(pos),
                TileDecision::Wall => self.grid.set_state(pos, TileState::Wall),
            }
            GenerationStep::Decided(pos, decision)
        } else {
            self.finalise_open(pos);
            GenerationStep::Forced(pos)
        };

        debug_assert!(self.is_route_open(),
                      "goal unreachable after finalising ({}, {})",
                      pos.x,
                      pos.y);
        Some(step)
    }

    /// The silent reachability check gating every decision.
    ///
    /// Answers whether the goal is still reachable from the committed open
    /// region, optimistically assuming every undecided tile (frontier or
    /// unvisited) could yet become passable. The tile whose decision is in
    /// flight is held at `Processing` and excluded outright; the wall
    /// hypothesis is never simulated, a failure simply means the route
    /// cannot do without this tile and the caller must open it.
    ///
    /// Best-first search with the Manhattan distance to the goal as the
    /// heuristic, seeded from the current frontier queue with the open
    /// region as the initial closed set. Ties pop in insertion order.
    fn is_route_open(&self) -> bool {
        // Fast accept: a decided passage (or the start itself, on grids
        // small enough for the endpoints to touch) already borders the goal.
        for neighbour in self.grid.neighbours(self.goal) {
            match self.grid.state(neighbour) {
                Some(TileState::Open) | Some(TileState::Start) => return true,
                _ => {}
            }
        }

        let mut closed = self.explored.clone();
        let mut candidates = CandidateQueue::with_capacity(self.frontier.len());
        for &pos in &self.frontier {
            if closed.insert(self.tile_bit(pos)) {
                candidates.push(pos.manhattan_distance(self.goal), pos);
            }
        }

        while let Some(pos) = candidates.pop() {
            if pos == self.goal {
                return true;
            }
            for neighbour in self.grid.neighbours(pos) {
                let blocked = match self.grid.state(neighbour) {
                    Some(TileState::Wall) | Some(TileState::Processing) | None => true,
                    Some(_) => false,
                };
                if !blocked && closed.insert(self.tile_bit(neighbour)) {
                    candidates.push(neighbour.manhattan_distance(self.goal), neighbour);
                }
            }
        }
        false
    }

    /// Diagnostic route trace over the finished maze.
    ///
    /// Runs a full best-first search from start to goal through passable
    /// tiles, recolouring every open tile it expands to `Visited` so
    /// observers can watch the search spread, and yielding to the pacer
    /// between expansions. Generation state is not touched; the recolouring
    /// is cosmetic and `Visited` tiles stay passable, so the trace can be
    /// rerun. Returns whether the goal was reached.
    pub fn validate_visually(&mut self, pacer: &mut dyn Pacer) -> bool {
        let mut seen = utils::fnv_hashset::<TilePosition>(self.grid.size());
        let mut candidates = CandidateQueue::new();
        seen.insert(self.start);
        candidates.push(self.start.manhattan_distance(self.goal), self.start);

        while let Some(pos) = candidates.pop() {
            if pos == self.goal {
                return true;
            }
            if self.grid.state(pos) == Some(TileState::Open) {
                self.grid.set_state(pos, TileState::Visited);
            }
            for neighbour in self.grid.neighbours(pos) {
                let passable = self.grid
                                   .state(neighbour)
                                   .map_or(false, |state| state.is_passable());
                if passable && seen.insert(neighbour) {
                    candidates.push(neighbour.manhattan_distance(self.goal), neighbour);
                }
            }
            pacer.pause(candidates.len());
        }
        false
    }

    /// Discard all generation state and reinitialise, drawing fresh random
    /// placements and decisions from the generator as it stands.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.frontier.clear();
        self.explored.clear();
        self.initialize();
    }

    /// Reseed the generator, then `reset`. Two resets from the same seed
    /// regenerate the same maze.
    pub fn reset_seeded(&mut self, seed: u64) {
        self.rng = XorShiftRng::from_seed(utils::xorshift_seed(seed));
        self.reset();
    }

    fn initialize(&mut self) {
        let (Width(w), Height(h)) = (self.grid.width(), self.grid.height());

        for pos in self.grid.iter() {
            let on_ring = pos.x == 0 || pos.y == 0 || pos.x as usize == w - 1 ||
                          pos.y as usize == h - 1;
            if on_ring {
                self.grid.set_state(pos, TileState::Wall);
            }
        }

        // Endpoints sit on the rows just inside the top and bottom walls,
        // goal drawn first.
        let (start, goal) = match self.pinned {
            Some(endpoints) => endpoints,
            None => {
                let interior = w - 2;
                let goal_x = (self.rng.gen::<usize>() % interior + 1) as u32;
                let start_x = (self.rng.gen::<usize>() % interior + 1) as u32;
                (TilePosition::new(start_x, (h - 2) as u32), TilePosition::new(goal_x, 1))
            }
        };
        self.start = start;
        self.goal = goal;
        self.grid.set_state(goal, TileState::Goal);
        self.grid.set_state(start, TileState::Start);

        for neighbour in self.grid.neighbours(start) {
            if self.grid.state(neighbour) == Some(TileState::Unvisited) {
                self.grid.set_state(neighbour, TileState::Frontier);
                self.frontier.push(neighbour);
            }
        }
    }

    fn finalise_open(&mut self, pos: TilePosition) {
        self.grid.set_state(pos, TileState::Open);
        let bit = self.tile_bit(pos);
        self.explored.insert(bit);

        for neighbour in self.grid.neighbours(pos) {
            if self.grid.state(neighbour) == Some(TileState::Unvisited) {
                self.grid.set_state(neighbour, TileState::Frontier);
                self.frontier.push(neighbour);
            }
        }
    }

    #[inline]
    fn tile_bit(&self, pos: TilePosition) -> usize {
        self.grid.tile_index(pos).expect("maze positions always lie within its grid")
    }
}
