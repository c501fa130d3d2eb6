use crate::tiles::TilePosition;
use crate::units::{Height, Width};

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::u32;

// Smallest grid with a border ring, an interior column and distinct
// endpoint rows.
pub const MIN_WIDTH: usize = 3;
pub const MIN_HEIGHT: usize = 4;

/// The reference decision policies selectable by name.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PolicyChoice {
    UniformWall,
    NeighbourBiased,
}

impl PolicyChoice {
    pub fn as_str(&self) -> &'static str {
        match *self {
            PolicyChoice::UniformWall => "uniform-wall",
            PolicyChoice::NeighbourBiased => "neighbour-biased",
        }
    }
}

impl FromStr for PolicyChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<PolicyChoice, ConfigError> {
        match s {
            "uniform-wall" => Ok(PolicyChoice::UniformWall),
            "neighbour-biased" | "neighbor-biased" => Ok(PolicyChoice::NeighbourBiased),
            _ => Err(ConfigError::UnknownPolicy(s.to_owned())),
        }
    }
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum ConfigError {
    GridTooSmall { width: usize, height: usize },
    GridTooLarge { width: usize, height: usize },
    UnknownPolicy(String),
    BadEndpoints {
        start: TilePosition,
        goal: TilePosition,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::GridTooSmall { width, height } => {
                write!(f,
                       "grid of {}x{} tiles is too small: need at least {} columns and {} rows \
                        for the wall ring, the endpoints and an interior",
                       width,
                       height,
                       MIN_WIDTH,
                       MIN_HEIGHT)
            }
            ConfigError::GridTooLarge { width, height } => {
                write!(f, "grid of {}x{} tiles is too large to index", width, height)
            }
            ConfigError::UnknownPolicy(ref name) => {
                write!(f,
                       "unknown decision policy `{}` (expected uniform-wall or neighbour-biased)",
                       name)
            }
            ConfigError::BadEndpoints { start, goal } => {
                write!(f,
                       "endpoints start ({}, {}) / goal ({}, {}) must be interior tiles on the \
                        rows inside the bottom and top walls",
                       start.x,
                       start.y,
                       goal.x,
                       goal.y)
            }
        }
    }
}

impl Error for ConfigError {}

/// Everything needed to build a cave.
///
/// Constructed through `new` so bad dimensions fail before any grid is
/// allocated; dimensions are never clamped. The optional `seed` makes a
/// build reproducible and the optional `endpoints` pin the start and goal
/// instead of placing them randomly.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeConfig {
    pub width: Width,
    pub height: Height,
    pub policy: PolicyChoice,
    pub seed: Option<u64>,
    pub endpoints: Option<(TilePosition, TilePosition)>,
}

impl MazeConfig {
    pub fn new(width: usize, height: usize, policy: PolicyChoice) -> Result<MazeConfig, ConfigError> {
        let config = MazeConfig {
            width: Width(width),
            height: Height(height),
            policy,
            seed: None,
            endpoints: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every constraint, including any set after construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (Width(width), Height(height)) = (self.width, self.height);
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(ConfigError::GridTooSmall { width, height });
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= u32::MAX as usize => {}
            _ => return Err(ConfigError::GridTooLarge { width, height }),
        }

        if let Some((start, goal)) = self.endpoints {
            let interior_column = |pos: TilePosition| pos.x >= 1 && (pos.x as usize) <= width - 2;
            let start_ok = interior_column(start) && start.y as usize == height - 2;
            let goal_ok = interior_column(goal) && goal.y == 1;
            if !start_ok || !goal_ok {
                return Err(ConfigError::BadEndpoints { start, goal });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undersized_grids_are_rejected_not_clamped() {
        assert_eq!(MazeConfig::new(0, 10, PolicyChoice::UniformWall),
                   Err(ConfigError::GridTooSmall { width: 0, height: 10 }));
        assert_eq!(MazeConfig::new(10, 0, PolicyChoice::UniformWall),
                   Err(ConfigError::GridTooSmall { width: 10, height: 0 }));
        assert_eq!(MazeConfig::new(2, 8, PolicyChoice::UniformWall),
                   Err(ConfigError::GridTooSmall { width: 2, height: 8 }));
        assert_eq!(MazeConfig::new(8, 3, PolicyChoice::UniformWall),
                   Err(ConfigError::GridTooSmall { width: 8, height: 3 }));
        assert!(MazeConfig::new(3, 4, PolicyChoice::UniformWall).is_ok());
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let result = MazeConfig::new(70_000, 70_000, PolicyChoice::NeighbourBiased);
        assert_eq!(result,
                   Err(ConfigError::GridTooLarge {
                       width: 70_000,
                       height: 70_000,
                   }));
    }

    #[test]
    fn policy_names_parse_and_roundtrip() {
        assert_eq!("uniform-wall".parse::<PolicyChoice>(),
                   Ok(PolicyChoice::UniformWall));
        assert_eq!("neighbour-biased".parse::<PolicyChoice>(),
                   Ok(PolicyChoice::NeighbourBiased));
        assert_eq!("neighbor-biased".parse::<PolicyChoice>(),
                   Ok(PolicyChoice::NeighbourBiased));
        assert_eq!(PolicyChoice::UniformWall.as_str(), "uniform-wall");

        match "spiral".parse::<PolicyChoice>() {
            Err(ConfigError::UnknownPolicy(name)) => assert_eq!(name, "spiral"),
            other => panic!("expected an unknown policy error, got {:?}", other),
        }
    }

    #[test]
    fn pinned_endpoints_are_validated() {
        let mut config = MazeConfig::new(5, 5, PolicyChoice::UniformWall).unwrap();

        config.endpoints = Some((TilePosition::new(2, 3), TilePosition::new(2, 1)));
        assert!(config.validate().is_ok());

        // start off its row
        config.endpoints = Some((TilePosition::new(2, 2), TilePosition::new(2, 1)));
        assert!(config.validate().is_err());

        // goal on the border column
        config.endpoints = Some((TilePosition::new(2, 3), TilePosition::new(0, 1)));
        assert!(config.validate().is_err());

        // goal on the wall row itself
        config.endpoints = Some((TilePosition::new(2, 3), TilePosition::new(2, 0)));
        assert!(config.validate().is_err());
    }
}
