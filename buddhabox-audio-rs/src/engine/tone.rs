use core::f32::consts::TAU;

use micromath::F32Ext;

/// Number of entries in the tone wavetable. Indexed by the top 8 phase bits.
pub const WAVETABLE_LEN: usize = 256;

/// Phase increment that steps a 32-bit accumulator at `freq_hz` when it is
/// advanced `sample_rate_hz` times per second.
///
/// Formula: `floor(2^32 × freq_hz / sample_rate_hz)`, in 64-bit integers.
/// The result is truncated to 32 bits, so callers keep `freq_hz` below the
/// sample rate ([`EngineConfig::validate()`](super::EngineConfig::validate)
/// enforces half of it).
///
/// ```
/// use buddhabox::engine::frequency_word;
///
/// assert_eq!(frequency_word(440, 88_000), 21_474_836);
/// ```
pub const fn frequency_word(freq_hz: u32, sample_rate_hz: u32) -> u32 {
    (((freq_hz as u64) << 32) / sample_rate_hz as u64) as u32
}

/// Unsigned 8-bit single-cycle waveform.
#[derive(Clone, PartialEq, Eq)]
pub struct Wavetable {
    samples: [u8; WAVETABLE_LEN],
}

impl Wavetable {
    /// Build `128 + amplitude · sin(2πi / 256)` for every entry, rounded to
    /// the nearest code.
    ///
    /// This is the only floating-point code in the crate. Call it once at
    /// startup, never from the audio callback.
    pub fn sine(amplitude: u8) -> Self {
        let amplitude = f32::from(amplitude);
        let mut samples = [0u8; WAVETABLE_LEN];

        for (i, sample) in samples.iter_mut().enumerate() {
            let theta = i as f32 * TAU / WAVETABLE_LEN as f32;
            let value = F32Ext::round(128.0 + amplitude * F32Ext::sin(theta));
            *sample = value.clamp(0.0, 255.0) as u8;
        }

        Self { samples }
    }

    /// Entry selected by the top 8 bits of a 32-bit phase.
    #[inline]
    pub fn lookup(&self, phase: u32) -> u8 {
        self.samples[(phase >> 24) as usize]
    }

    /// All entries, in phase order.
    pub fn as_slice(&self) -> &[u8; WAVETABLE_LEN] {
        &self.samples
    }
}

/// Phase-accumulator oscillator.
///
/// Wraparound of the 32-bit phase is the periodic behaviour, not an
/// overflow: one full wrap is one waveform cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToneOscillator {
    phase: u32,
    increment: u32,
}

impl ToneOscillator {
    /// Oscillator at phase 0 stepping by `increment` per sample.
    pub const fn new(increment: u32) -> Self {
        Self {
            phase: 0,
            increment,
        }
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    /// Load a new frequency word and restart the cycle at phase 0.
    pub fn retune(&mut self, increment: u32) {
        self.increment = increment;
        self.phase = 0;
    }

    /// Emit `table[phase >> 24]`, then advance the phase.
    #[inline]
    pub fn next(&mut self, table: &Wavetable) -> u8 {
        let out = table.lookup(self.phase);
        self.phase = self.phase.wrapping_add(self.increment);
        out
    }
}
