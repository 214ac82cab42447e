//! Operating modes and the button-driven mode state machine.
//!
//! ```text
//! raw:   0       1       2       3       4        5        6       7
//! mode:  Loop0   Loop1   Loop2   Loop3   Tone440  Tone1k   White   Pink
//!        ─────────── loop clips ───────  ── sine presets ──  ─ noise ─
//! ```
//!
//! Each debounced button press advances one step, wrapping from `Pink` back
//! to `Loop0`. There is no terminal state.

/// Number of operating modes.
pub const MODE_COUNT: u8 = 8;

/// One of the eight operating modes, stored across contexts as its raw `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AudioMode {
    /// Recorded loop clip 0.
    #[default]
    Loop0 = 0,
    /// Recorded loop clip 1.
    Loop1 = 1,
    /// Recorded loop clip 2.
    Loop2 = 2,
    /// Recorded loop clip 3.
    Loop3 = 3,
    /// Sine tone, preset 0 (440 Hz by default).
    Tone440 = 4,
    /// Sine tone, preset 1 (1000 Hz by default).
    Tone1k = 5,
    /// LFSR white noise.
    WhiteNoise = 6,
    /// Voss-McCartney pink noise.
    PinkNoise = 7,
}

/// The generator a mode is routed to by the sample multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Loop clip index into the PCM bank (0–3).
    Loop(usize),
    /// Tone preset index (0–1).
    Tone(usize),
    White,
    Pink,
}

impl AudioMode {
    /// Decode a raw mode value.
    ///
    /// Returns `None` for anything outside `0..MODE_COUNT`; callers treat
    /// that as silence.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Loop0),
            1 => Some(Self::Loop1),
            2 => Some(Self::Loop2),
            3 => Some(Self::Loop3),
            4 => Some(Self::Tone440),
            5 => Some(Self::Tone1k),
            6 => Some(Self::WhiteNoise),
            7 => Some(Self::PinkNoise),
            _ => None,
        }
    }

    /// Raw value as stored in the shared mode cell.
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// The mode one step forward, wrapping modulo [`MODE_COUNT`].
    pub const fn next(self) -> Self {
        match Self::from_raw((self.raw() + 1) % MODE_COUNT) {
            Some(mode) => mode,
            None => Self::Loop0,
        }
    }

    /// Which generator this mode plays.
    pub const fn source(self) -> Source {
        match self {
            Self::Loop0 => Source::Loop(0),
            Self::Loop1 => Source::Loop(1),
            Self::Loop2 => Source::Loop(2),
            Self::Loop3 => Source::Loop(3),
            Self::Tone440 => Source::Tone(0),
            Self::Tone1k => Source::Tone(1),
            Self::WhiteNoise => Source::White,
            Self::PinkNoise => Source::Pink,
        }
    }

    /// Tone preset index if this is a tone sub-mode.
    pub const fn tone_preset(self) -> Option<usize> {
        match self.source() {
            Source::Tone(preset) => Some(preset),
            _ => None,
        }
    }
}

/// Cyclic mode state machine owned by the foreground loop.
///
/// Only rising edges drive it; the foreground discards falling edges before
/// they get here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeSequencer {
    current: AudioMode,
}

impl ModeSequencer {
    /// Start in [`AudioMode::Loop0`].
    pub const fn new() -> Self {
        Self {
            current: AudioMode::Loop0,
        }
    }

    /// Returns the current mode.
    pub fn current(&self) -> AudioMode {
        self.current
    }

    /// Step exactly one mode forward and return the new mode.
    pub fn advance(&mut self) -> AudioMode {
        self.current = self.current.next();
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_accepts_all_eight_modes() {
        for raw in 0..MODE_COUNT {
            let mode = AudioMode::from_raw(raw).unwrap();
            assert_eq!(mode.raw(), raw);
        }
    }

    #[test]
    fn from_raw_rejects_out_of_range() {
        assert_eq!(AudioMode::from_raw(8), None);
        assert_eq!(AudioMode::from_raw(0x80), None);
        assert_eq!(AudioMode::from_raw(u8::MAX), None);
    }

    #[test]
    fn next_wraps_from_pink_to_first_loop() {
        assert_eq!(AudioMode::PinkNoise.next(), AudioMode::Loop0);
        assert_eq!(AudioMode::Loop3.next(), AudioMode::Tone440);
    }

    #[test]
    fn sources_cover_every_generator() {
        assert_eq!(AudioMode::Loop2.source(), Source::Loop(2));
        assert_eq!(AudioMode::Tone440.source(), Source::Tone(0));
        assert_eq!(AudioMode::Tone1k.source(), Source::Tone(1));
        assert_eq!(AudioMode::WhiteNoise.source(), Source::White);
        assert_eq!(AudioMode::PinkNoise.source(), Source::Pink);
    }

    #[test]
    fn only_tone_modes_have_a_preset() {
        assert_eq!(AudioMode::Tone440.tone_preset(), Some(0));
        assert_eq!(AudioMode::Tone1k.tone_preset(), Some(1));
        assert_eq!(AudioMode::Loop0.tone_preset(), None);
        assert_eq!(AudioMode::PinkNoise.tone_preset(), None);
    }

    #[test]
    fn sequencer_starts_at_zero() {
        assert_eq!(ModeSequencer::new().current(), AudioMode::Loop0);
    }

    #[test]
    fn eight_advances_return_to_start() {
        let mut seq = ModeSequencer::new();
        let start = seq.current();
        for step in 1..=MODE_COUNT {
            let mode = seq.advance();
            if step < MODE_COUNT {
                assert_ne!(mode, start);
            }
        }
        assert_eq!(seq.current(), start);
    }
}
