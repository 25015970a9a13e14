use crate::surface::{Cell, CellColor, SurfaceSize, TextGrid};

pub type Rgba = [u8; 4];

// A tiny block font (no external deps). Kept deliberately simple.
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;
const GLYPH_SCALE: u32 = 2;

/// Pixel size of one character cell when rasterized.
pub const TILE_W: u32 = 8;
pub const TILE_H: u32 = 12;

const GLYPH_OFFSET_X: u32 = (TILE_W - GLYPH_W * GLYPH_SCALE) / 2;
const GLYPH_OFFSET_Y: u32 = (TILE_H - GLYPH_H * GLYPH_SCALE) / 2;

/// RGB values of the standard VGA text palette.
pub fn vga_rgba(color: CellColor) -> Rgba {
    match color {
        CellColor::Black => [0x00, 0x00, 0x00, 0xFF],
        CellColor::Blue => [0x00, 0x00, 0xAA, 0xFF],
        CellColor::Green => [0x00, 0xAA, 0x00, 0xFF],
        CellColor::Cyan => [0x00, 0xAA, 0xAA, 0xFF],
        CellColor::Red => [0xAA, 0x00, 0x00, 0xFF],
        CellColor::Magenta => [0xAA, 0x00, 0xAA, 0xFF],
        CellColor::Brown => [0xAA, 0x55, 0x00, 0xFF],
        CellColor::LightGrey => [0xAA, 0xAA, 0xAA, 0xFF],
        CellColor::DarkGrey => [0x55, 0x55, 0x55, 0xFF],
        CellColor::LightBlue => [0x55, 0x55, 0xFF, 0xFF],
        CellColor::LightGreen => [0x55, 0xFF, 0x55, 0xFF],
        CellColor::LightCyan => [0x55, 0xFF, 0xFF, 0xFF],
        CellColor::LightRed => [0xFF, 0x55, 0x55, 0xFF],
        CellColor::LightMagenta => [0xFF, 0x55, 0xFF, 0xFF],
        CellColor::Yellow => [0xFF, 0xFF, 0x55, 0xFF],
        CellColor::White => [0xFF, 0xFF, 0xFF, 0xFF],
    }
}

/// Pixel dimensions of a rasterized grid at the given integer zoom.
pub fn raster_size(cells: SurfaceSize, zoom: u32) -> SurfaceSize {
    let zoom = zoom.max(1);
    SurfaceSize::new(cells.width * TILE_W * zoom, cells.height * TILE_H * zoom)
}

/// Draws a text grid into an RGBA frame buffer of `raster_size(grid.size(), zoom)` pixels.
///
/// Buffers of the wrong length are left untouched.
pub fn rasterize_grid(grid: &TextGrid, frame: &mut [u8], zoom: u32) {
    use crate::surface::CellSurface;

    let zoom = zoom.max(1);
    let cells = grid.size();
    let size = raster_size(cells, zoom);
    if frame.len() != size.rgba_len() {
        log::warn!(
            "rasterize_grid: frame has {} bytes, expected {} for {}x{}",
            frame.len(),
            size.rgba_len(),
            size.width,
            size.height
        );
        return;
    }

    let mut raster = CpuRaster { frame, size, zoom };
    for cy in 0..cells.height {
        for cx in 0..cells.width {
            if let Some(cell) = grid.cell(cx, cy) {
                raster.draw_cell(cx, cy, cell);
            }
        }
    }
}

struct CpuRaster<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
    zoom: u32,
}

impl CpuRaster<'_> {
    fn draw_cell(&mut self, cx: u32, cy: u32, cell: Cell) {
        let x0 = cx * TILE_W * self.zoom;
        let y0 = cy * TILE_H * self.zoom;
        self.fill_rect(x0, y0, TILE_W * self.zoom, TILE_H * self.zoom, vga_rgba(cell.bg));

        let Some(rows) = glyph_rows(cell.glyph) else {
            return;
        };
        let fg = vga_rgba(cell.fg);
        let px_size = GLYPH_SCALE * self.zoom;
        for (row, bits) in rows.into_iter().enumerate() {
            for col in 0..GLYPH_W {
                let mask = 1u8 << (GLYPH_W - 1 - col);
                if bits & mask == 0 {
                    continue;
                }
                let px = x0 + (GLYPH_OFFSET_X + col * GLYPH_SCALE) * self.zoom;
                let py = y0 + (GLYPH_OFFSET_Y + row as u32 * GLYPH_SCALE) * self.zoom;
                self.fill_rect(px, py, px_size, px_size, fg);
            }
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let max_x = x.saturating_add(w).min(self.size.width);
        let max_y = y.saturating_add(h).min(self.size.height);
        let width = self.size.width as usize;
        for py in y..max_y {
            let row_start = py as usize * width;
            for px in x..max_x {
                let idx = (row_start + px as usize) * 4;
                self.frame[idx..idx + 4].copy_from_slice(&color);
            }
        }
    }
}

/// Block-font rows for a glyph byte; `None` for glyphs that draw nothing.
fn glyph_rows(glyph: u8) -> Option<[u8; GLYPH_H as usize]> {
    let rows = match glyph.to_ascii_uppercase() {
        b' ' | 0 => return None,

        // Digits
        b'0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        b'1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        b'2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        b'3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        b'4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        b'5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        b'6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        b'7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        b'8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        b'9' => [0b111, 0b101, 0b111, 0b001, 0b111],

        // Letters
        b'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        b'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        b'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        b'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        b'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        b'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        b'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        b'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        b'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        b'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        b'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        b'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        b'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        b'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        b'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        b'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        b'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        b'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        b'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        b'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        b'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        b'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        b'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        b'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        b'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        b'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        // Punctuation and box drawing
        b'.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        b':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        b'-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        b'=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        b'|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        b'+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        b'>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        b'<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        b'!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        b'_' => [0b000, 0b000, 0b000, 0b000, 0b111],

        _ => [0b111, 0b001, 0b010, 0b000, 0b010], // '?'
    };
    Some(rows)
}
