use core::num::NonZeroU32;

/// Feedback tap bit positions of the 32-bit white-noise LFSR.
///
/// In 1-based polynomial notation this is x^32 + x^22 + x^2 + x + 1, a
/// maximal-length polynomial (period 2^32 − 1). Bit 31 is a tap, so the only
/// nonzero state whose left shift would be zero (`0x8000_0000`) always feeds
/// back a 1: no nonzero state can step to 0.
pub const LFSR_TAPS: [u32; 4] = [31, 21, 1, 0];

/// Power-on LFSR state.
pub const LFSR_SEED: u32 = 1;

/// Feedback steps per output byte.
const BITS_PER_BYTE: u32 = 8;

/// Number of Voss-McCartney bands.
pub const PINK_BANDS: usize = 8;

/// Pink band counter wraps at 2^7.
const PINK_COUNTER_MASK: u8 = 0x7F;

/// Band refreshed when the pink counter is 0 (no set bit to pick).
const PINK_WRAP_BAND: usize = PINK_BANDS - 1;

/// Fibonacci LFSR white-noise generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhiteNoise {
    state: u32,
}

impl Default for WhiteNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl WhiteNoise {
    /// Generator seeded with [`LFSR_SEED`].
    pub const fn new() -> Self {
        Self { state: LFSR_SEED }
    }

    /// Generator with a caller-chosen nonzero seed.
    pub const fn with_seed(seed: NonZeroU32) -> Self {
        Self { state: seed.get() }
    }

    /// Current register contents. Never 0.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// One feedback step: XOR the taps and shift the result in at bit 0.
    #[inline]
    pub fn step(&mut self) {
        let s = self.state;
        let feedback =
            (s >> LFSR_TAPS[0]) ^ (s >> LFSR_TAPS[1]) ^ (s >> LFSR_TAPS[2]) ^ (s >> LFSR_TAPS[3]);
        self.state = (s << 1) | (feedback & 1);
    }

    /// Eight feedback steps, then the low byte of the register.
    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        for _ in 0..BITS_PER_BYTE {
            self.step();
        }
        (self.state & 0xFF) as u8
    }
}

/// Voss-McCartney pink-noise approximation over eight white-noise bands.
///
/// Band `k` is refreshed on every call where the counter's lowest set bit is
/// `k`, i.e. once every `2^(k+1)` calls, so lower bands change fastest. Band
/// 7 is refreshed when the counter wraps to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinkNoise {
    bands: [u8; PINK_BANDS],
    counter: u8,
}

impl PinkNoise {
    /// All bands silent, counter at 0.
    pub const fn new() -> Self {
        Self {
            bands: [0; PINK_BANDS],
            counter: 0,
        }
    }

    pub fn bands(&self) -> &[u8; PINK_BANDS] {
        &self.bands
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Band the next call will refresh.
    pub fn next_band(&self) -> usize {
        if self.counter == 0 {
            PINK_WRAP_BAND
        } else {
            self.counter.trailing_zeros() as usize
        }
    }

    /// Refresh one band from `white`, advance the counter, and return
    /// `(sum of all bands) >> 4`.
    #[inline]
    pub fn next(&mut self, white: &mut WhiteNoise) -> u8 {
        let band = self.next_band();
        self.bands[band] = white.next_byte();
        self.counter = self.counter.wrapping_add(1) & PINK_COUNTER_MASK;

        let sum: u16 = self.bands.iter().map(|&b| u16::from(b)).sum();
        (sum >> 4) as u8
    }
}
