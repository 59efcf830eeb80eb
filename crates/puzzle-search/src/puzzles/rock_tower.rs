//! Height of a tower of rocks falling into a chamber seven units wide while
//! jets of gas push them sideways.
//!
//! Long runs are not simulated in full. After each rock the top of the tower
//! is summarised by the empty cells a falling rock could still reach, found
//! with a breadth-first traversal from above. When the rock shape, jet index
//! and that surface repeat, the tower grows by the same amount every cycle.

use anyhow::{bail, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use super::Puzzle;
use crate::bfs::Bfs;

const WIDTH: i32 = 7;

/// Cells of each rock relative to its bottom-left corner, in falling order.
const ROCKS: [&[(i32, i32)]; 5] = [
    &[(0, 0), (1, 0), (2, 0), (3, 0)],
    &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
    &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
    &[(0, 0), (0, 1), (0, 2), (0, 3)],
    &[(0, 0), (1, 0), (0, 1), (1, 1)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jet {
    Left,
    Right,
}

impl Jet {
    fn shift(self) -> i32 {
        match self {
            Jet::Left => -1,
            Jet::Right => 1,
        }
    }
}

/// Settled rocks, one bit per column, bottom row first.
#[derive(Debug, Default)]
struct Chamber {
    rows: Vec<u8>,
    jet: usize,
    dropped: u64,
}

/// Rock shape, jet index and reachable surface after a rock settles.
type Snapshot = (usize, usize, Vec<(i32, i32)>);

impl Chamber {
    fn height(&self) -> u64 {
        self.rows.len() as u64
    }

    fn is_free(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= WIDTH || y < 0 {
            return false;
        }
        self.rows
            .get(y as usize)
            .map_or(true, |row| row & (1 << x) == 0)
    }

    fn fits(&self, rock: &[(i32, i32)], x: i32, y: i32) -> bool {
        rock.iter().all(|&(dx, dy)| self.is_free(x + dx, y + dy))
    }

    fn drop_rock(&mut self, jets: &[Jet]) {
        let rock = ROCKS[(self.dropped % ROCKS.len() as u64) as usize];
        let (mut x, mut y) = (2, self.rows.len() as i32 + 3);
        loop {
            let pushed = x + jets[self.jet].shift();
            self.jet = (self.jet + 1) % jets.len();
            if self.fits(rock, pushed, y) {
                x = pushed;
            }
            if !self.fits(rock, x, y - 1) {
                break;
            }
            y -= 1;
        }

        for &(dx, dy) in rock {
            let row = (y + dy) as usize;
            if row >= self.rows.len() {
                self.rows.resize(row + 1, 0);
            }
            self.rows[row] |= 1 << (x + dx);
        }
        self.dropped += 1;
    }

    /// Empty cells reachable from above the tower moving left, right or
    /// down, as `(column, depth below the top)` in sorted order.
    fn surface(&self) -> Vec<(i32, i32)> {
        let top = self.rows.len() as i32;
        let mut reached = vec![(0, 0)];
        Bfs::new((0, top), |&(x, y): &(i32, i32)| {
            [(x - 1, y), (x + 1, y), (x, y - 1)]
                .into_iter()
                .filter(|&(nx, ny)| self.is_free(nx, ny))
                .collect::<SmallVec<[(i32, i32); 3]>>()
        })
        .on_visit(|&(x, y): &(i32, i32), _: &(i32, i32)| reached.push((x, top - y)))
        .search();
        reached.sort_unstable();
        reached
    }

    fn snapshot(&self) -> Snapshot {
        let rock = ((self.dropped - 1) % ROCKS.len() as u64) as usize;
        (rock, self.jet, self.surface())
    }
}

fn simulate(jets: &[Jet], rocks: u64) -> u64 {
    let mut chamber = Chamber::default();
    while chamber.dropped < rocks {
        chamber.drop_rock(jets);
    }
    chamber.height()
}

/// Tower height after `rocks` rocks, extrapolating once the top repeats.
fn height_after(jets: &[Jet], rocks: u64) -> u64 {
    let mut chamber = Chamber::default();
    let mut heights = Vec::new();
    let mut seen: FxHashMap<Snapshot, u64> = FxHashMap::default();

    while chamber.dropped < rocks {
        chamber.drop_rock(jets);
        heights.push(chamber.height());
        let round = chamber.dropped - 1;

        let snapshot = chamber.snapshot();
        if let Some(&first) = seen.get(&snapshot) {
            let length = round - first;
            let growth = heights[round as usize] - heights[first as usize];
            let remaining = rocks - 1 - first;
            debug!(first, length, growth, "tower repeats");
            return heights[(first + remaining % length) as usize] + remaining / length * growth;
        }
        seen.insert(snapshot, round);
    }
    chamber.height()
}

pub struct RockTower;

impl Puzzle for RockTower {
    type Input = Vec<Jet>;

    fn parse(text: &str) -> Result<Vec<Jet>> {
        let jets = text
            .trim()
            .chars()
            .enumerate()
            .map(|(index, c)| match c {
                '<' => Ok(Jet::Left),
                '>' => Ok(Jet::Right),
                other => bail!("column {}: unexpected {other:?}", index + 1),
            })
            .collect::<Result<Vec<_>>>()?;
        if jets.is_empty() {
            bail!("no jets in the input");
        }
        Ok(jets)
    }

    fn part1(jets: &Vec<Jet>) -> Result<u64> {
        Ok(simulate(jets, 2022))
    }

    fn part2(jets: &Vec<Jet>) -> Result<u64> {
        Ok(height_after(jets, 1_000_000_000_000))
    }
}
