use serde::{Deserialize, Serialize};

pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Value in `[0, bound)`. `bound` must be non-zero.
    fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "next_below needs a non-zero bound");
        self.next_u32() % bound.max(1)
    }
}

pub const LCG_DEFAULT_SEED: u32 = 123_456_789;

/// Classic C-library style linear congruential generator producing 15-bit outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(LCG_DEFAULT_SEED)
    }
}

impl RandomSource for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.state / 65_536) % 32_768
    }
}

/// xorshift* generator; a zero seed is remapped since it would stay zero forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 {
            0x9E37_79B9_7F4A_7C15
        } else {
            seed
        };
        Self { state: seed }
    }
}

impl RandomSource for XorShift64 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngKind {
    #[default]
    Lcg,
    Xorshift,
}

/// Serializable choice of generator, so recorded game states replay identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceRng {
    Lcg(Lcg),
    XorShift(XorShift64),
}

impl PieceRng {
    pub fn new(kind: RngKind, seed: u64) -> Self {
        match kind {
            RngKind::Lcg => PieceRng::Lcg(Lcg::new(seed as u32)),
            RngKind::Xorshift => PieceRng::XorShift(XorShift64::new(seed)),
        }
    }

    pub fn kind(&self) -> RngKind {
        match self {
            PieceRng::Lcg(_) => RngKind::Lcg,
            PieceRng::XorShift(_) => RngKind::Xorshift,
        }
    }
}

impl Default for PieceRng {
    fn default() -> Self {
        PieceRng::Lcg(Lcg::default())
    }
}

impl RandomSource for PieceRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            PieceRng::Lcg(rng) => rng.next_u32(),
            PieceRng::XorShift(rng) => rng.next_u32(),
        }
    }
}
