use std::cmp::max;

use log::{debug, trace, warn};
use rand::Rng;

use crate::error::BoardError;
use Direction::*;

pub const MIN_DIMENSION: usize = 2;
pub const INITIAL_SPEED: u32 = 50;
pub const MIN_SPEED: u32 = 20;

// Order in which neighbors are searched when walking the body toward the tail
const SEARCH_ORDER: [Direction; 4] = [Up, Down, Left, Right];

/// Grid position as `(row, column)`.
pub type Coords = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }

    /// The neighbor of `pos` one step this way, or `None` if that falls off
    /// a `height` x `width` grid.
    pub fn step(self, pos: Coords, height: usize, width: usize) -> Option<Coords> {
        let (row, col) = pos;
        match self {
            Up => row.checked_sub(1).map(|r| (r, col)),
            Down => Some(row + 1).filter(|&r| r < height).map(|r| (r, col)),
            Left => col.checked_sub(1).map(|c| (row, c)),
            Right => Some(col + 1).filter(|&c| c < width).map(|c| (row, c)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Head,
    /// A body segment. The next segment toward the head is the neighbor in
    /// this direction, i.e. the way the snake went when it left the cell.
    BodyFrom(Direction),
    Empty,
    Food,
}

impl Cell {
    pub fn is_snake(self) -> bool {
        matches!(self, Cell::Head | Cell::BodyFrom(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Lost,
    Won,
}

pub fn check_dimensions(height: usize, width: usize) -> Result<(), BoardError> {
    if height < MIN_DIMENSION || width < MIN_DIMENSION {
        return Err(BoardError::InvalidDimensions { height, width });
    }
    Ok(())
}

/// The snake board. The snake itself is not stored as a list: it is the
/// `Head` cell plus the chain of `BodyFrom` cells pointing back at it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
    head: Coords,
    direction: Direction,
    size: usize,
    speed: u32,
    game_over: bool,
    won: bool,
}

impl Board {
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        check_dimensions(height, width)?;

        let head = (height / 2, width / 2);
        let mut cells = vec![Cell::Empty; height * width];
        cells[head.0 * width + head.1] = Cell::Head;

        Ok(Board {
            height,
            width,
            cells,
            head,
            direction: Up,
            size: 1,
            speed: INITIAL_SPEED,
            game_over: false,
            won: false,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn head(&self) -> Coords {
        self.head
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of 10ms quanta the player gets to steer before the next move.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn cell(&self, pos: Coords) -> Option<Cell> {
        if pos.0 < self.height && pos.1 < self.width {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width)
    }

    pub fn food(&self) -> Option<Coords> {
        self.cells
            .iter()
            .position(|&c| c == Cell::Food)
            .map(|i| (i / self.width, i % self.width))
    }

    pub fn outcome(&self) -> Outcome {
        match (self.game_over, self.won) {
            (_, true) => Outcome::Won,
            (true, false) => Outcome::Lost,
            (false, false) => Outcome::InProgress,
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// First move of a session. The starting direction is taken as given,
    /// there is no body yet to reverse into.
    pub fn launch<R>(&mut self, direction: Direction, rng: &mut R) -> Outcome
    where
        R: Rng + ?Sized,
    {
        if !self.game_over {
            self.direction = direction;
        }
        self.tick(None, rng)
    }

    /// Advances the snake by one cell. A request for the opposite of the
    /// current direction is ignored, `None` keeps going straight.
    pub fn tick<R>(&mut self, requested: Option<Direction>, rng: &mut R) -> Outcome
    where
        R: Rng + ?Sized,
    {
        if self.game_over {
            warn!("Tick on a finished board ignored ({:?})", self.outcome());
            return self.outcome();
        }

        if let Some(dir) = requested {
            if dir != self.direction && dir != self.direction.opposite() {
                trace!("Turning {:?} -> {:?}", self.direction, dir);
                self.direction = dir;
            }
        }

        let target = match self.direction.step(self.head, self.height, self.width) {
            Some(pos) => pos,
            None => {
                debug!("Hit the wall at {:?} heading {:?}", self.head, self.direction);
                self.game_over = true;
                return self.outcome();
            }
        };

        match self.cells[self.index(target)] {
            cell if cell.is_snake() => {
                debug!("Ran into own body at {:?}", target);
                self.game_over = true;
                return self.outcome();
            }
            Cell::Food => {
                self.propagate(self.head, self.direction, true);
                self.move_head(target);
                self.size += 1;

                if self.bake_food(rng) {
                    self.speed = max(self.speed.saturating_sub(1), MIN_SPEED);
                }
            }
            _ => {
                self.propagate(self.head, self.direction, false);
                self.move_head(target);
            }
        }

        if self.is_full() {
            self.won = true;
            self.game_over = true;
        }

        self.outcome()
    }

    /// Puts food on a random empty cell. Returns whether anything was placed.
    pub fn bake_food<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.won || !self.cells.contains(&Cell::Empty) {
            return false;
        }

        // Free space is usually plentiful, so rejection sampling is fine
        let idx = loop {
            let idx = rng.gen_range(0..self.cells.len());
            if self.cells[idx] == Cell::Empty {
                break idx;
            }
        };

        self.cells[idx] = Cell::Food;
        debug!("Food placed at {:?}", (idx / self.width, idx % self.width));
        true
    }

    ///////////////////////////////////////////////////////////////////////////

    // Walks the chain from `from` to the tail. Every segment but the tail
    // keeps its place; the tail is kept (tagged `new_tag` if it was the head)
    // when growing and cleared otherwise.
    fn propagate(&mut self, from: Coords, new_tag: Direction, growing: bool) {
        let mut pos = from;
        let mut tag = new_tag;
        let mut steps = 0;

        while let Some((next, next_tag)) = self.next_toward_tail(pos) {
            let idx = self.index(pos);
            self.cells[idx] = Cell::BodyFrom(tag);
            pos = next;
            tag = next_tag;

            steps += 1;
            debug_assert!(steps < self.size, "body chain longer than the snake");
        }

        let idx = self.index(pos);
        self.cells[idx] = if growing { Cell::BodyFrom(tag) } else { Cell::Empty };
    }

    // The neighbor whose tag points back at `pos`, together with that tag
    fn next_toward_tail(&self, pos: Coords) -> Option<(Coords, Direction)> {
        SEARCH_ORDER.iter().find_map(|&dir| {
            let neighbor = dir.step(pos, self.height, self.width)?;
            let back = dir.opposite();
            if self.cells[self.index(neighbor)] == Cell::BodyFrom(back) {
                Some((neighbor, back))
            } else {
                None
            }
        })
    }

    fn move_head(&mut self, target: Coords) {
        let idx = self.index(target);
        self.cells[idx] = Cell::Head;
        self.head = target;
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty && c != Cell::Food)
    }

    fn index(&self, pos: Coords) -> usize {
        pos.0 * self.width + pos.1
    }
}
