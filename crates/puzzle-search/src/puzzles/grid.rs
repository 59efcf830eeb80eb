//! Grid primitives shared by the 2-D puzzles.

use anyhow::{bail, Result};
use smallvec::SmallVec;

/// Position on a grid; `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbors, unbounded.
    pub fn neighbors(self) -> SmallVec<[Position; 4]> {
        Direction::ALL.iter().map(|&d| self.step(d)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse the `^ v < >` arrows used in puzzle maps.
    pub fn from_arrow(c: char) -> Option<Direction> {
        match c {
            '^' => Some(Direction::Up),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            '>' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Rectangular grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from text, one row per non-empty line.
    ///
    /// `cell` converts a character; its error is reported with the line number.
    pub fn parse(text: &str, mut cell: impl FnMut(char) -> Result<T>) -> Result<Self> {
        let mut width = 0;
        let mut height = 0;
        let mut cells = Vec::new();

        for (index, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let row_len = line.chars().count();
            if height == 0 {
                width = row_len;
            } else if row_len != width {
                bail!("line {}: expected {width} cells, found {row_len}", index + 1);
            }
            for c in line.chars() {
                match cell(c) {
                    Ok(value) => cells.push(value),
                    Err(e) => bail!("line {}: {e}", index + 1),
                }
            }
            height += 1;
        }

        if height == 0 {
            bail!("empty grid");
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Bounds-checked access.
    pub fn get(&self, pos: Position) -> Option<&T> {
        if !self.contains(pos) {
            return None;
        }
        self.cells.get(pos.y as usize * self.width + pos.x as usize)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x as i32, y as i32)))
    }

    /// Same shape, each cell converted by `f`.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Positions whose cell satisfies `predicate`, in row-major order.
    pub fn find<'a>(
        &'a self,
        mut predicate: impl FnMut(&T) -> bool + 'a,
    ) -> impl Iterator<Item = Position> + 'a {
        self.positions()
            .filter(move |&pos| self.get(pos).is_some_and(&mut predicate))
    }
}
