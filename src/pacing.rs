use crate::maze::Maze;

use std::thread;
use std::time::Duration;

/// Yield point between generation steps.
///
/// Pacing exists purely so a renderer can keep up with the engine; it never
/// changes what is generated, only when. `pause` receives the number of
/// frontier tiles still queued so an implementation can slow down as the
/// work runs out and a watcher can follow the endgame.
pub trait Pacer {
    fn pause(&mut self, remaining: usize);
}

/// Pacer for headless or batch runs: never pauses.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullPacer;

impl Pacer for NullPacer {
    fn pause(&mut self, _remaining: usize) {}
}

/// Pacer that sleeps for a fixed delay every stride-th call, where the
/// stride grows with the remaining queue size. A large maze animates at a
/// watchable wall-clock cost while the final tiles still land one sleep
/// apart.
#[derive(Copy, Clone, Debug)]
pub struct SleepPacer {
    delay: Duration,
    since_sleep: usize,
}

impl SleepPacer {
    pub fn new(delay: Duration) -> SleepPacer {
        SleepPacer {
            delay,
            since_sleep: 0,
        }
    }
}

impl Pacer for SleepPacer {
    fn pause(&mut self, remaining: usize) {
        self.since_sleep += 1;
        if self.since_sleep >= sleep_stride(remaining) {
            self.since_sleep = 0;
            thread::sleep(self.delay);
        }
    }
}

/// How many pause calls to batch between sleeps for a queue of this size.
fn sleep_stride(remaining: usize) -> usize {
    remaining / 64 + 1
}

/// Drive a maze to completion, yielding to the pacer after every step.
pub fn generate_paced(maze: &mut Maze, pacer: &mut dyn Pacer) {
    while maze.step().is_some() {
        pacer.pause(maze.remaining());
    }
}
