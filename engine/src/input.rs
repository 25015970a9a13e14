use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Named boolean input signals the game consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Pause,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::MoveLeft,
        Signal::MoveRight,
        Signal::SoftDrop,
        Signal::Rotate,
        Signal::HardDrop,
        Signal::Pause,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalSet(u8);

impl SignalSet {
    pub const EMPTY: SignalSet = SignalSet(0);

    pub fn of(signals: &[Signal]) -> Self {
        let mut set = Self::EMPTY;
        for &signal in signals {
            set.insert(signal);
        }
        set
    }

    pub fn contains(self, signal: Signal) -> bool {
        self.0 & signal.bit() != 0
    }

    pub fn insert(&mut self, signal: Signal) {
        self.0 |= signal.bit();
    }

    pub fn remove(&mut self, signal: Signal) {
        self.0 &= !signal.bit();
    }

    pub fn set(&mut self, signal: Signal, asserted: bool) {
        if asserted {
            self.insert(signal);
        } else {
            self.remove(signal);
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Signal> {
        Signal::ALL.into_iter().filter(move |&s| self.contains(s))
    }
}

/// A source of input signals refreshed once per poll.
///
/// Signals stay asserted until the source itself drops them or the consumer calls `consume`;
/// transitions that happen between two polls are not queued.
pub trait InputSource {
    fn poll(&mut self);
    fn is_asserted(&self, signal: Signal) -> bool;
    fn consume(&mut self, signal: Signal);

    fn snapshot(&self) -> SignalSet {
        let mut set = SignalSet::EMPTY;
        for signal in Signal::ALL {
            set.set(signal, self.is_asserted(signal));
        }
        set
    }
}

/// What happens when the keyboard reports another press of a key that is already down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRepeat {
    /// Typematic repeats re-assert the signal, so holding a key repeats the action.
    #[default]
    Hardware,
    /// Only the first press of a hold asserts the signal.
    EdgeTriggered,
}

pub const SCANCODE_RELEASE_BIT: u8 = 0x80;

/// PS/2 scan code set 1 make codes.
pub mod scancode {
    pub const W: u8 = 0x11;
    pub const P: u8 = 0x19;
    pub const A: u8 = 0x1E;
    pub const S: u8 = 0x1F;
    pub const D: u8 = 0x20;
    pub const SPACE: u8 = 0x39;
}

pub fn signal_for_scancode(code: u8) -> Option<Signal> {
    match code & !SCANCODE_RELEASE_BIT {
        scancode::W => Some(Signal::Rotate),
        scancode::A => Some(Signal::MoveLeft),
        scancode::S => Some(Signal::SoftDrop),
        scancode::D => Some(Signal::MoveRight),
        scancode::SPACE => Some(Signal::HardDrop),
        scancode::P => Some(Signal::Pause),
        _ => None,
    }
}

/// Keyboard-backed input source fed with raw scan codes.
///
/// Scan codes are buffered as they arrive (the "hardware" side) and only decoded when `poll`
/// drains the buffer.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    repeat: KeyRepeat,
    pending: VecDeque<u8>,
    held: SignalSet,
    asserted: SignalSet,
}

impl KeyboardState {
    pub fn new(repeat: KeyRepeat) -> Self {
        Self {
            repeat,
            ..Self::default()
        }
    }

    pub fn repeat(&self) -> KeyRepeat {
        self.repeat
    }

    pub fn push_scancode(&mut self, code: u8) {
        self.pending.push_back(code);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn held(&self) -> SignalSet {
        self.held
    }

    /// Decodes one scan code immediately.
    pub fn apply_scancode(&mut self, code: u8) {
        let Some(signal) = signal_for_scancode(code) else {
            return;
        };
        let pressed = code & SCANCODE_RELEASE_BIT == 0;
        if !pressed {
            self.held.remove(signal);
            self.asserted.remove(signal);
            return;
        }

        let is_repeat = self.held.contains(signal);
        self.held.insert(signal);
        if is_repeat && (signal == Signal::Pause || self.repeat == KeyRepeat::EdgeTriggered) {
            return;
        }
        self.asserted.insert(signal);
    }

    /// Forgets every held key, e.g. after the window loses focus.
    pub fn release_all(&mut self) {
        self.pending.clear();
        self.held = SignalSet::EMPTY;
        self.asserted = SignalSet::EMPTY;
    }
}

impl InputSource for KeyboardState {
    fn poll(&mut self) {
        while let Some(code) = self.pending.pop_front() {
            self.apply_scancode(code);
        }
    }

    fn is_asserted(&self, signal: Signal) -> bool {
        self.asserted.contains(signal)
    }

    fn consume(&mut self, signal: Signal) {
        self.asserted.remove(signal);
    }
}

/// Script character for one frame: `a` left, `d` right, `s` soft drop, `w` rotate,
/// `_` hard drop, `p` pause, anything else (conventionally `.`) idle.
pub fn key_frame(ch: char) -> SignalSet {
    match ch {
        'a' => SignalSet::of(&[Signal::MoveLeft]),
        'd' => SignalSet::of(&[Signal::MoveRight]),
        's' => SignalSet::of(&[Signal::SoftDrop]),
        'w' => SignalSet::of(&[Signal::Rotate]),
        '_' => SignalSet::of(&[Signal::HardDrop]),
        'p' => SignalSet::of(&[Signal::Pause]),
        _ => SignalSet::EMPTY,
    }
}

/// Replays a fixed sequence of signal sets, one per poll; empty once exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<SignalSet>,
    current: SignalSet,
    polls: u64,
}

impl ScriptedInput {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = SignalSet>,
    {
        Self {
            frames: frames.into_iter().collect(),
            current: SignalSet::EMPTY,
            polls: 0,
        }
    }

    /// One frame per character; see `key_frame`.
    pub fn from_keys(keys: &str) -> Self {
        Self::new(keys.chars().map(key_frame))
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) {
        self.polls += 1;
        self.current = self.frames.pop_front().unwrap_or_default();
    }

    fn is_asserted(&self, signal: Signal) -> bool {
        self.current.contains(signal)
    }

    fn consume(&mut self, signal: Signal) {
        self.current.remove(signal);
    }
}
