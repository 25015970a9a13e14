use std::fmt;

use serde::{Deserialize, Serialize};

pub const TEXT_COLUMNS: u32 = 80;
pub const TEXT_ROWS: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn cell_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn rgba_len(self) -> usize {
        self.cell_count().saturating_mul(4)
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

/// The sixteen VGA text-mode colors, in attribute-nibble order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellColor {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGrey = 7,
    DarkGrey = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    LightMagenta = 13,
    Yellow = 14,
    White = 15,
}

impl CellColor {
    pub const ALL: [CellColor; 16] = [
        CellColor::Black,
        CellColor::Blue,
        CellColor::Green,
        CellColor::Cyan,
        CellColor::Red,
        CellColor::Magenta,
        CellColor::Brown,
        CellColor::LightGrey,
        CellColor::DarkGrey,
        CellColor::LightBlue,
        CellColor::LightGreen,
        CellColor::LightCyan,
        CellColor::LightRed,
        CellColor::LightMagenta,
        CellColor::Yellow,
        CellColor::White,
    ];

    /// Only the low nibble is significant.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index & 0x0F) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub glyph: u8,
    pub fg: CellColor,
    pub bg: CellColor,
}

impl Cell {
    pub const fn new(glyph: u8, fg: CellColor, bg: CellColor) -> Self {
        Self { glyph, fg, bg }
    }

    /// A blank cell painted entirely in one color.
    pub const fn solid(color: CellColor) -> Self {
        Self::new(b' ', color, color)
    }

    /// VGA attribute byte: background in the high nibble, foreground in the low one.
    pub fn attribute(self) -> u8 {
        (self.bg.index() << 4) | self.fg.index()
    }

    /// The 16-bit word a VGA text buffer stores for this cell.
    pub fn vga_word(self) -> u16 {
        u16::from(self.glyph) | (u16::from(self.attribute()) << 8)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(b' ', CellColor::LightGrey, CellColor::Black)
    }
}

/// A fixed-size grid of character cells.
///
/// Rendering code only talks to this trait; whether the cells end up in an in-memory grid, a
/// window, or a real text-mode buffer is the host's concern.
pub trait CellSurface {
    fn size(&self) -> SurfaceSize;

    /// Resets every cell to `Cell::default()`.
    fn clear(&mut self);

    /// Writes one cell. Coordinates outside the surface are ignored.
    fn put(&mut self, x: u32, y: u32, cell: Cell);

    fn write_str(&mut self, x: u32, y: u32, text: &str, fg: CellColor, bg: CellColor) {
        for (i, byte) in text.bytes().enumerate() {
            self.put(x.saturating_add(i as u32), y, Cell::new(byte, fg, bg));
        }
    }
}

/// In-memory 80x25 text surface used by headless runs, tests, and the windowed host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    size: SurfaceSize,
    cells: Vec<Cell>,
}

impl TextGrid {
    pub fn new() -> Self {
        Self::with_size(SurfaceSize::new(TEXT_COLUMNS, TEXT_ROWS))
    }

    pub fn with_size(size: SurfaceSize) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size.cell_count()],
        }
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        if !self.size.contains(x, y) {
            return None;
        }
        self.cells.get(self.index(x, y)).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Glyphs of one row as text, trailing blanks trimmed.
    pub fn row_text(&self, y: u32) -> String {
        if y >= self.size.height {
            return String::new();
        }
        let start = self.index(0, y);
        let end = start + self.size.width as usize;
        let row: String = self.cells[start..end]
            .iter()
            .map(|c| char::from(c.glyph))
            .collect();
        row.trim_end().to_string()
    }

    pub fn vga_words(&self) -> impl Iterator<Item = u16> + '_ {
        self.cells.iter().map(|c| c.vga_word())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }
}

impl Default for TextGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSurface for TextGrid {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn put(&mut self, x: u32, y: u32, cell: Cell) {
        if !self.size.contains(x, y) {
            return;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.height {
            writeln!(f, "{}", self.row_text(y))?;
        }
        Ok(())
    }
}

/// Teletype-style writer: advances a cursor, wraps at the right edge, and wraps back to row 0
/// at the bottom instead of scrolling.
#[derive(Debug, Clone, Copy)]
pub struct TextCursor {
    pub column: u32,
    pub row: u32,
    pub fg: CellColor,
    pub bg: CellColor,
}

impl Default for TextCursor {
    fn default() -> Self {
        let blank = Cell::default();
        Self {
            column: 0,
            row: 0,
            fg: blank.fg,
            bg: blank.bg,
        }
    }
}

impl TextCursor {
    pub fn putchar<S: CellSurface + ?Sized>(&mut self, surface: &mut S, ch: u8) {
        let size = surface.size();
        if ch == b'\n' {
            self.column = 0;
            self.next_row(size);
            return;
        }
        surface.put(self.column, self.row, Cell::new(ch, self.fg, self.bg));
        self.column += 1;
        if self.column >= size.width {
            self.column = 0;
            self.next_row(size);
        }
    }

    pub fn write_str<S: CellSurface + ?Sized>(&mut self, surface: &mut S, text: &str) {
        for byte in text.bytes() {
            self.putchar(surface, byte);
        }
    }

    fn next_row(&mut self, size: SurfaceSize) {
        self.row += 1;
        if self.row >= size.height {
            self.row = 0;
        }
    }
}
