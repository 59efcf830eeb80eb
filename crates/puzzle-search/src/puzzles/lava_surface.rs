//! Surface area of a droplet made of unit cubes.
//!
//! The exterior surface is found by flood-filling the air around the droplet
//! inside a bounding box padded by one cube on every side, so that all outside
//! air is connected.

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::Puzzle;
use crate::bfs::Bfs;

pub type Cube = [i32; 3];

const FACES: [Cube; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

fn adjacent(cube: Cube) -> impl Iterator<Item = Cube> {
    FACES
        .into_iter()
        .map(move |[dx, dy, dz]| [cube[0] + dx, cube[1] + dy, cube[2] + dz])
}

pub struct LavaSurface;

impl Puzzle for LavaSurface {
    type Input = Vec<Cube>;

    fn parse(text: &str) -> Result<Vec<Cube>> {
        text.lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(index, line)| -> Result<Cube> {
                let coords = line
                    .split(',')
                    .map(|part| part.trim().parse::<i32>())
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("line {}: bad coordinate in {line:?}", index + 1))?;
                match coords[..] {
                    [x, y, z] => Ok([x, y, z]),
                    _ => bail!("line {}: expected 3 coordinates, found {}", index + 1, coords.len()),
                }
            })
            .collect()
    }

    fn part1(cubes: &Vec<Cube>) -> Result<u64> {
        let droplet: FxHashSet<Cube> = cubes.iter().copied().collect();
        Ok(open_faces(&droplet, |_| true))
    }

    fn part2(cubes: &Vec<Cube>) -> Result<u64> {
        let droplet: FxHashSet<Cube> = cubes.iter().copied().collect();
        let Some((min, max)) = bounds(cubes) else {
            return Ok(0);
        };

        let inside_box =
            move |cube: &Cube| (0..3).all(|axis| cube[axis] >= min[axis] && cube[axis] <= max[axis]);

        let mut outside = FxHashSet::default();
        outside.insert(min);
        Bfs::new(min, |&cube: &Cube| {
            adjacent(cube)
                .filter(|next| inside_box(next) && !droplet.contains(next))
                .collect::<SmallVec<[Cube; 6]>>()
        })
        .on_visit(|&cube: &Cube, _: &Cube| {
            outside.insert(cube);
        })
        .search();

        Ok(open_faces(&droplet, |face| outside.contains(face)))
    }
}

/// Faces of the droplet whose neighbor cell is air accepted by `is_open`.
fn open_faces(droplet: &FxHashSet<Cube>, is_open: impl Fn(&Cube) -> bool) -> u64 {
    droplet
        .iter()
        .flat_map(|&cube| adjacent(cube))
        .filter(|next| !droplet.contains(next) && is_open(next))
        .count() as u64
}

/// Bounding box grown by one cube in every direction.
fn bounds(cubes: &[Cube]) -> Option<(Cube, Cube)> {
    let first = *cubes.first()?;
    let (mut min, mut max) = (first, first);
    for cube in cubes {
        for axis in 0..3 {
            min[axis] = min[axis].min(cube[axis]);
            max[axis] = max[axis].max(cube[axis]);
        }
    }
    Some((min.map(|v| v - 1), max.map(|v| v + 1)))
}
