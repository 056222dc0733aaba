use crate::board::{Board, Cell};

const HEAD_CHAR: char = 'O';
const FOOD_CHAR: char = '.';
const BODY_VERTICAL_CHAR: char = '│';
const BODY_HORIZONTAL_CHAR: char = '─';

/// What a glyph is, so the terminal can pick its colors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Paint {
    Plain,
    Border,
    Head,
    Body,
    Food,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub paint: Paint,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', paint: Paint::Plain };

    fn border(ch: char) -> Self {
        Glyph { ch, paint: Paint::Border }
    }
}

impl From<Cell> for Glyph {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Glyph::BLANK,
            Cell::Head => Glyph { ch: HEAD_CHAR, paint: Paint::Head },
            Cell::BodyFrom(dir) => {
                let ch = if dir.is_vertical() { BODY_VERTICAL_CHAR } else { BODY_HORIZONTAL_CHAR };
                Glyph { ch, paint: Paint::Body }
            }
            Cell::Food => Glyph { ch: FOOD_CHAR, paint: Paint::Food },
        }
    }
}

/// A full-screen picture of a board: the bordered grid followed by a
/// status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    glyphs: Vec<Glyph>,
    status: String,
}

impl Frame {
    pub fn from_board(board: &Board) -> Self {
        let width = board.width() + 2;
        let height = board.height() + 2;
        let mut glyphs = Vec::with_capacity(width * height);

        glyphs.extend(horizontal_border(width));
        for row in board.rows() {
            glyphs.push(Glyph::border('|'));
            glyphs.extend(row.iter().map(|&cell| Glyph::from(cell)));
            glyphs.push(Glyph::border('|'));
        }
        glyphs.extend(horizontal_border(width));

        let status = format!("Size: {}", board.size());
        Frame { width, height, glyphs, status }
    }

    /// Width of the bordered grid, in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the bordered grid, in rows. The status line comes after.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Glyph]> + '_ {
        self.glyphs.chunks(self.width)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Terminal columns and rows needed to show the frame and its status line.
    pub fn footprint(board_height: usize, board_width: usize) -> (usize, usize) {
        (board_width.saturating_add(2), board_height.saturating_add(3))
    }
}

fn horizontal_border(width: usize) -> impl Iterator<Item = Glyph> {
    (0..width).map(move |x| {
        let ch = if x == 0 || x == width - 1 { '+' } else { '-' };
        Glyph::border(ch)
    })
}
