//! Grid Navigation
//!
//! A cursor over the 4×4 cell grid. Every axis wraps, so the grid behaves as a
//! torus and a move can never fail.

use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Cells per row and per column
pub const GRID_SIZE: usize = 4;

/// Total number of cells
pub const NUM_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// A single step on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// Order matches the random-direction draw
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Pick one of the four directions with equal probability.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let slot = (rng.uniform() * 4.0) as usize;
        Self::ALL[slot.min(3)]
    }
}

/// Position on the grid, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    x: usize,
    y: usize,
}

impl Cursor {
    /// Create a cursor, wrapping coordinates onto the grid
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x: x % GRID_SIZE,
            y: y % GRID_SIZE,
        }
    }

    /// Row-major position of a cell index
    pub fn from_index(index: usize) -> Self {
        let index = index % NUM_CELLS;
        Self::new(index % GRID_SIZE, index / GRID_SIZE)
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    /// Linear cell index, `x + 4·y`
    pub fn index(&self) -> usize {
        self.x + GRID_SIZE * self.y
    }

    pub fn move_right(&mut self) {
        self.x = (self.x + 1) % GRID_SIZE;
    }

    pub fn move_left(&mut self) {
        self.x = (self.x + GRID_SIZE - 1) % GRID_SIZE;
    }

    pub fn move_down(&mut self) {
        self.y = (self.y + 1) % GRID_SIZE;
    }

    pub fn move_up(&mut self) {
        self.y = (self.y + GRID_SIZE - 1) % GRID_SIZE;
    }

    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Right => self.move_right(),
            Direction::Left => self.move_left(),
            Direction::Down => self.move_down(),
            Direction::Up => self.move_up(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
