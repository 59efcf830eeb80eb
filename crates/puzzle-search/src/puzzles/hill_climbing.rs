//! Fewest steps across a heightmap, climbing at most one level per step.
//!
//! `S` marks the start at elevation `a`, `E` the summit at elevation `z`.
//! Distances are accumulated through the traversal's discovery hook.

use anyhow::{anyhow, bail, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::grid::{Grid, Position};
use super::Puzzle;
use crate::bfs::Bfs;

#[derive(Debug, Clone)]
pub struct HeightMap {
    heights: Grid<u8>,
    start: Position,
    summit: Position,
}

pub struct HillClimbing;

impl Puzzle for HillClimbing {
    type Input = HeightMap;

    fn parse(text: &str) -> Result<HeightMap> {
        let marks = Grid::parse(text, |c| match c {
            'S' | 'E' | 'a'..='z' => Ok(c),
            other => bail!("unexpected character {other:?}"),
        })?;
        let single = |mark: char| -> Result<Position> {
            let mut found = marks.find(move |&c| c == mark);
            let pos = found.next().ok_or_else(|| anyhow!("no {mark:?} on the map"))?;
            if found.next().is_some() {
                bail!("more than one {mark:?} on the map");
            }
            Ok(pos)
        };
        let start = single('S')?;
        let summit = single('E')?;
        let heights = marks.map(|&c| elevation(c));

        Ok(HeightMap {
            heights,
            start,
            summit,
        })
    }

    fn part1(map: &HeightMap) -> Result<u64> {
        let summit = map.summit;
        fewest_steps(map, map.start, |pos, _| pos == summit, |from, to| to <= from + 1)
            .ok_or_else(|| anyhow!("the summit cannot be reached from the start"))
    }

    fn part2(map: &HeightMap) -> Result<u64> {
        // Walk down from the summit with the climbing rule reversed.
        fewest_steps(map, map.summit, |_, height| height == 0, |from, to| from <= to + 1)
            .ok_or_else(|| anyhow!("no lowest square reaches the summit"))
    }
}

fn elevation(c: char) -> u8 {
    match c {
        'S' => 0,
        'E' => b'z' - b'a',
        c => c as u8 - b'a',
    }
}

/// Hops from `from` to the nearest position accepted by `is_goal`.
fn fewest_steps(
    map: &HeightMap,
    from: Position,
    is_goal: impl Fn(Position, u8) -> bool,
    can_step: impl Fn(u8, u8) -> bool,
) -> Option<u64> {
    let heights = &map.heights;
    let height = |pos: Position| heights.get(pos).copied();
    let mut distances = FxHashMap::default();
    distances.insert(from, 0u64);

    let goal = Bfs::new(from, |&pos: &Position| {
        let here = height(pos).unwrap_or_default();
        pos.neighbors()
            .into_iter()
            .filter(|&next| height(next).is_some_and(|there| can_step(here, there)))
            .collect::<SmallVec<[Position; 4]>>()
    })
    .is_end(|&pos: &Position| height(pos).is_some_and(|h| is_goal(pos, h)))
    .on_visit(|&pos: &Position, parent: &Position| {
        let steps = distances[parent] + 1;
        distances.insert(pos, steps);
    })
    .search()?;

    distances.get(&goal).copied()
}
