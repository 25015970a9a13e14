use engine::surface::CellColor;
use serde::{Deserialize, Serialize};

pub const PIECE_KINDS: usize = 7;
pub const ROTATIONS: u8 = 4;
pub const MASK_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl PieceKind {
    /// Catalogue order; a kind's position here is its index.
    pub const ALL: [PieceKind; PIECE_KINDS] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Board cell value for a settled cell of this kind (0 means empty).
    pub fn cell_value(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_cell_value(value: u8) -> Option<Self> {
        value.checked_sub(1).and_then(|i| Self::from_index(i as usize))
    }

    pub fn color(self) -> CellColor {
        COLORS[self.index()]
    }

    pub fn letter(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }
}

pub fn next_rotation(rotation: u8) -> u8 {
    (rotation + 1) % ROTATIONS
}

const COLORS: [CellColor; PIECE_KINDS] = [
    CellColor::LightBlue,
    CellColor::Yellow,
    CellColor::LightMagenta,
    CellColor::Blue,
    CellColor::Brown,
    CellColor::LightGreen,
    CellColor::LightRed,
];

type Shape = [[u8; MASK_SIZE]; MASK_SIZE];

// Every rotation state is spelled out; none are derived by rotating another one.
const SHAPES: [[Shape; ROTATIONS as usize]; PIECE_KINDS] = [
    // I
    [
        [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]],
        [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
    ],
    // O: all four states are the same square
    [
        [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
        [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
        [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
        [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    ],
    // T
    [
        [[0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    ],
    // J
    [
        [[0, 0, 0, 0], [1, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
        [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 1, 1, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    ],
    // L
    [
        [[0, 0, 0, 0], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
        [[1, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
        [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    ],
    // S
    [
        [[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
        [[1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
        [[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
        [[1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    ],
    // Z
    [
        [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
        [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
        [[0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
    ],
];

/// A 4x4 occupancy mask; `(px, py)` is column, row from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask {
    rows: &'static Shape,
}

impl Mask {
    pub fn is_set(&self, px: usize, py: usize) -> bool {
        debug_assert!(px < MASK_SIZE && py < MASK_SIZE);
        self.rows[py][px] != 0
    }

    /// Occupied cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..MASK_SIZE)
            .flat_map(|py| (0..MASK_SIZE).map(move |px| (px, py)))
            .filter(move |&(px, py)| self.is_set(px, py))
    }

    pub fn count(&self) -> usize {
        self.cells().count()
    }

    pub fn to_grid(&self) -> [[bool; MASK_SIZE]; MASK_SIZE] {
        let mut grid = [[false; MASK_SIZE]; MASK_SIZE];
        for (px, py) in self.cells() {
            grid[py][px] = true;
        }
        grid
    }
}

pub fn mask(kind: PieceKind, rotation: u8) -> Mask {
    debug_assert!(rotation < ROTATIONS, "rotation {rotation} out of range");
    Mask {
        rows: &SHAPES[kind.index()][(rotation % ROTATIONS) as usize],
    }
}

pub fn color(kind: PieceKind) -> CellColor {
    kind.color()
}
