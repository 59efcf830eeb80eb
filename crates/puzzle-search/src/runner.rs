//! Runs a puzzle over raw input text and records how long each stage took.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::puzzles::{
    Blizzards, HillClimbing, LavaSurface, Minerals, Puzzle, PuzzleKind, RockTower, Valves,
};

/// Which half of a puzzle to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Part {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

impl Part {
    pub fn number(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
        }
    }
}

/// Configuration for a run
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Only answer this part; both when `None`
    pub part: Option<Part>,
}

impl RunConfig {
    fn parts(&self) -> Vec<Part> {
        match self.part {
            Some(part) => vec![part],
            None => vec![Part::One, Part::Two],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartReport {
    pub part: u8,
    pub answer: u64,
    pub time_elapsed_ms: f64,
}

/// Result of running one puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub puzzle: PuzzleKind,
    pub processing_ms: f64,
    pub parts: Vec<PartReport>,
}

pub fn run(kind: PuzzleKind, text: &str, config: &RunConfig) -> Result<RunReport> {
    match kind {
        PuzzleKind::HillClimbing => run_puzzle::<HillClimbing>(kind, text, config),
        PuzzleKind::RockTower => run_puzzle::<RockTower>(kind, text, config),
        PuzzleKind::LavaSurface => run_puzzle::<LavaSurface>(kind, text, config),
        PuzzleKind::Valves => run_puzzle::<Valves>(kind, text, config),
        PuzzleKind::Minerals => run_puzzle::<Minerals>(kind, text, config),
        PuzzleKind::Blizzards => run_puzzle::<Blizzards>(kind, text, config),
    }
}

fn run_puzzle<P: Puzzle>(kind: PuzzleKind, text: &str, config: &RunConfig) -> Result<RunReport> {
    let (input, processing) = timed(|| P::parse(text));
    let input = input.with_context(|| format!("failed to process {kind} input"))?;
    info!(puzzle = %kind, elapsed_ms = millis(processing), "input processed");

    let mut parts = Vec::new();
    for part in config.parts() {
        let (answer, elapsed) = timed(|| match part {
            Part::One => P::part1(&input),
            Part::Two => P::part2(&input),
        });
        let answer = answer.with_context(|| format!("{kind} part {} failed", part.number()))?;
        info!(puzzle = %kind, part = part.number(), answer, elapsed_ms = millis(elapsed), "part solved");
        parts.push(PartReport {
            part: part.number(),
            answer,
            time_elapsed_ms: millis(elapsed),
        });
    }

    Ok(RunReport {
        puzzle: kind,
        processing_ms: millis(processing),
        parts,
    })
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
