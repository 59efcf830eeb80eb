//! Crossing a valley of moving blizzards.
//!
//! States are `(position, minute)`. Blizzard patterns repeat every
//! `lcm(width, height)` minutes, so the deduplication key folds the minute
//! into that period: reaching the same cell at the same phase later is never
//! better in a breadth-first search.

use anyhow::{anyhow, bail, Result};
use smallvec::SmallVec;
use tracing::debug;

use super::grid::{Direction, Position};
use super::Puzzle;
use crate::bfs::Bfs;

#[derive(Debug, Clone)]
pub struct Valley {
    width: i32,
    height: i32,
    period: u32,
    /// `occupied[minute % period][y * width + x]`
    occupied: Vec<Vec<bool>>,
}

impl Valley {
    fn entrance(&self) -> Position {
        Position::new(0, -1)
    }

    fn exit(&self) -> Position {
        Position::new(self.width - 1, self.height)
    }

    fn is_free(&self, pos: Position, minute: u32) -> bool {
        if pos == self.entrance() || pos == self.exit() {
            return true;
        }
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return false;
        }
        let phase = &self.occupied[(minute % self.period) as usize];
        !phase[(pos.y * self.width + pos.x) as usize]
    }

    /// Minute of arrival at `to` when leaving `from` at `minute`.
    fn crossing(&self, from: Position, to: Position, minute: u32) -> Result<u32> {
        let traversal = Bfs::new(Expedition { pos: from, minute }, |e: &Expedition| {
            let minute = e.minute + 1;
            std::iter::once(e.pos)
                .chain(e.pos.neighbors())
                .filter(|&pos| self.is_free(pos, minute))
                .map(|pos| Expedition { pos, minute })
                .collect::<SmallVec<[Expedition; 5]>>()
        })
        .key(|e: &Expedition| (e.pos, e.minute % self.period))
        .is_end(|e: &Expedition| e.pos == to)
        .run();

        debug!(
            ?from,
            ?to,
            expanded = traversal.stats.expanded,
            "valley crossed"
        );
        traversal
            .end
            .map(|e| e.minute)
            .ok_or_else(|| anyhow!("no way from {from:?} to {to:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Expedition {
    pos: Position,
    minute: u32,
}

pub struct Blizzards;

impl Puzzle for Blizzards {
    type Input = Valley;

    fn parse(text: &str) -> Result<Valley> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() < 3 {
            bail!("valley needs two walls and at least one row");
        }
        let inner = &lines[1..lines.len() - 1];
        let width = lines[0].chars().count() as i32 - 2;
        let height = inner.len() as i32;
        if width < 1 {
            bail!("valley has no room between its walls");
        }

        let mut blizzards = Vec::new();
        for (y, line) in inner.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() as i32 != width + 2 {
                bail!("line {}: expected {} cells, found {}", y + 2, width + 2, cells.len());
            }
            for (x, &c) in cells[1..cells.len() - 1].iter().enumerate() {
                match c {
                    '.' => {}
                    c => {
                        let direction = Direction::from_arrow(c)
                            .ok_or_else(|| anyhow!("line {}: unexpected {c:?}", y + 2))?;
                        blizzards.push((Position::new(x as i32, y as i32), direction));
                    }
                }
            }
        }

        let period = lcm(width as u32, height as u32);
        let occupied = (0..period)
            .map(|minute| {
                let mut phase = vec![false; (width * height) as usize];
                for &(pos, direction) in &blizzards {
                    let (dx, dy) = direction.delta();
                    let x = (pos.x + dx * minute as i32).rem_euclid(width);
                    let y = (pos.y + dy * minute as i32).rem_euclid(height);
                    phase[(y * width + x) as usize] = true;
                }
                phase
            })
            .collect();

        Ok(Valley {
            width,
            height,
            period,
            occupied,
        })
    }

    fn part1(valley: &Valley) -> Result<u64> {
        let there = valley.crossing(valley.entrance(), valley.exit(), 0)?;
        Ok(there.into())
    }

    fn part2(valley: &Valley) -> Result<u64> {
        let there = valley.crossing(valley.entrance(), valley.exit(), 0)?;
        let back = valley.crossing(valley.exit(), valley.entrance(), there)?;
        let again = valley.crossing(valley.entrance(), valley.exit(), back)?;
        Ok(again.into())
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u32, b: u32) -> u32 {
    a / gcd(a, b) * b
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
#.######
#>>.<^<#
#.<..<<#
#>v.><>#
#<^v^^>#
######.#
";

    #[test]
    fn test_parse_sample() {
        let valley = Blizzards::parse(SAMPLE).unwrap();
        assert_eq!((valley.width, valley.height, valley.period), (6, 4, 12));
        assert!(!valley.is_free(Position::new(0, 0), 0));
        assert!(valley.is_free(Position::new(2, 0), 0));
        // The `>` at (0, 0) has moved on after one minute.
        assert!(valley.is_free(Position::new(0, 0), 1));
        assert!(!valley.is_free(Position::new(-1, 0), 1));
    }

    #[test]
    fn test_sample_part1() {
        let valley = Blizzards::parse(SAMPLE).unwrap();
        assert_eq!(Blizzards::part1(&valley).unwrap(), 18);
    }

    #[test]
    fn test_sample_part2() {
        let valley = Blizzards::parse(SAMPLE).unwrap();
        assert_eq!(Blizzards::part2(&valley).unwrap(), 54);
    }

    #[test]
    fn test_empty_valley() {
        let valley = Blizzards::parse("#.###\n#...#\n#...#\n###.#").unwrap();
        // Down into the valley, across two cells, down one more and out.
        assert_eq!(Blizzards::part1(&valley).unwrap(), 5);
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(6, 4), 12);
        assert_eq!(lcm(120, 25), 600);
    }

    #[test]
    fn test_rejects_unknown_cell() {
        let err = Blizzards::parse("#.##\n#.x#\n##.#").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
