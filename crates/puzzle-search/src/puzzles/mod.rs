//! Worked puzzles built on the search engines.
//!
//! Each puzzle turns raw text into an input once, then answers two parts.

pub mod blizzards;
pub mod grid;
pub mod hill_climbing;
pub mod lava_surface;
pub mod minerals;
pub mod rock_tower;
pub mod valves;

use std::fmt;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use blizzards::Blizzards;
pub use hill_climbing::HillClimbing;
pub use lava_surface::LavaSurface;
pub use minerals::Minerals;
pub use rock_tower::RockTower;
pub use valves::Valves;

/// A two-part puzzle over a processed input.
pub trait Puzzle {
    type Input;

    fn parse(text: &str) -> Result<Self::Input>;
    fn part1(input: &Self::Input) -> Result<u64>;
    fn part2(input: &Self::Input) -> Result<u64>;
}

/// The puzzles the runner knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PuzzleKind {
    /// Fewest steps up a heightmap (breadth-first)
    HillClimbing,
    /// Height of a tower of falling rocks (breadth-first surface scan)
    RockTower,
    /// Exterior surface of a lava droplet (flood fill)
    LavaSurface,
    /// Most pressure released from valves (branch-and-bound)
    Valves,
    /// Most geodes from robot blueprints (branch-and-bound)
    Minerals,
    /// Fastest way through a blizzard valley (breadth-first over time)
    Blizzards,
}

impl PuzzleKind {
    pub const ALL: [PuzzleKind; 6] = [
        PuzzleKind::HillClimbing,
        PuzzleKind::RockTower,
        PuzzleKind::LavaSurface,
        PuzzleKind::Valves,
        PuzzleKind::Minerals,
        PuzzleKind::Blizzards,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PuzzleKind::HillClimbing => "hill-climbing",
            PuzzleKind::RockTower => "rock-tower",
            PuzzleKind::LavaSurface => "lava-surface",
            PuzzleKind::Valves => "valves",
            PuzzleKind::Minerals => "minerals",
            PuzzleKind::Blizzards => "blizzards",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PuzzleKind::HillClimbing => "fewest steps up a heightmap",
            PuzzleKind::RockTower => "height of a tower of falling rocks",
            PuzzleKind::LavaSurface => "exterior surface of a lava droplet",
            PuzzleKind::Valves => "most pressure released from valves",
            PuzzleKind::Minerals => "most geodes from robot blueprints",
            PuzzleKind::Blizzards => "fastest way through a blizzard valley",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_cli_values() {
        for kind in PuzzleKind::ALL {
            let parsed = PuzzleKind::from_str(kind.name(), false).unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.to_string())
            );
        }
    }
}
