//! Sample generators and the per-mode multiplexer.
//!
//! This module provides the [`SampleEngine`], which owns every generator the
//! audio callback can route to and produces one raw unsigned 8-bit sample per
//! call for the current [`AudioMode`](crate::AudioMode).
//!
//! # Generators
//!
//! ```text
//! Loop0..Loop3  → LoopPlayer     zero-order hold ×OVERSAMPLE, bias flip ^0x80
//! Tone440/1k    → ToneOscillator 32-bit phase accumulator over a 256-entry sine
//! WhiteNoise    → WhiteNoise     32-bit LFSR, 8 feedback steps per byte
//! PinkNoise     → PinkNoise      8-band Voss-McCartney, fed by the same LFSR
//! ```
//!
//! # Real-time contract
//!
//! Everything reachable from [`SampleEngine::next_sample()`] and
//! [`SampleEngine::enter_mode()`] is integer-only, allocation-free and
//! constant-bounded. Floating point appears only in [`Wavetable::sine()`],
//! which runs once inside [`SampleEngine::new()`].

mod mux;
mod noise;
mod pcm;
mod tone;
mod volume;

pub use mux::SampleEngine;
pub use noise::{PinkNoise, WhiteNoise, LFSR_SEED, LFSR_TAPS, PINK_BANDS};
pub use pcm::{LoopPlayer, PcmBank, PcmClip, BIAS_FLIP, PCM_CLIP_COUNT};
pub use tone::{frequency_word, ToneOscillator, Wavetable, WAVETABLE_LEN};
pub use volume::scale;

use crate::error::ConfigError;

/// Rate at which the audio callback runs, in Hz, when nothing else is known.
///
/// Firmware should pass the rate its PWM actually produces instead.
pub const SAMPLE_RATE_HZ: u32 = 88_000;

/// Zero-order-hold factor applied to recorded loops.
pub const OVERSAMPLE: u32 = 8;

/// Sine peak deviation from midscale (128). Leaves 27 codes of headroom.
pub const SINE_AMPLITUDE: u8 = 100;

/// Target frequencies of the two tone sub-modes, in Hz.
pub const TONE_PRESETS_HZ: [u32; 2] = [440, 1000];

/// Output value for unrecognised modes.
pub const SILENCE: u8 = 0;

/// Configuration for the sample engine.
///
/// [`EngineConfig::default()`] matches the stock board: 88 kHz,
/// 8× loop oversampling, a 440 Hz and a 1 kHz tone, sine amplitude 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Invocation rate of the audio callback in Hz. Default: 88 000.
    pub sample_rate_hz: u32,
    /// Loop oversample factor. Default: 8.
    pub oversample: u32,
    /// Sine amplitude around midscale. Default: 100. Max: 127.
    pub sine_amplitude: u8,
    /// Tone preset frequencies in Hz, indexed by tone sub-mode. Default: `[440, 1000]`.
    pub tone_presets_hz: [u32; 2],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            oversample: OVERSAMPLE,
            sine_amplitude: SINE_AMPLITUDE,
            tone_presets_hz: TONE_PRESETS_HZ,
        }
    }
}

impl EngineConfig {
    /// Check the configuration before any table or frequency word is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.oversample == 0 {
            return Err(ConfigError::ZeroOversample);
        }
        if self.sine_amplitude > 127 {
            return Err(ConfigError::AmplitudeTooLarge);
        }
        if self
            .tone_presets_hz
            .iter()
            .any(|&hz| hz >= self.sample_rate_hz / 2)
        {
            return Err(ConfigError::ToneAboveNyquist);
        }
        Ok(())
    }

    /// Phase increments for both tone presets at the configured rate.
    pub fn tone_words(&self) -> [u32; 2] {
        self.tone_presets_hz
            .map(|hz| frequency_word(hz, self.sample_rate_hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate_hz, 88_000);
        assert_eq!(config.oversample, 8);
        assert_eq!(config.sine_amplitude, 100);
        assert_eq!(config.tone_presets_hz, [440, 1000]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_rate() {
        let config = EngineConfig {
            sample_rate_hz: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleRate));
    }

    #[test]
    fn validate_rejects_zero_oversample() {
        let config = EngineConfig {
            oversample: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroOversample));
    }

    #[test]
    fn validate_rejects_tone_at_nyquist() {
        let config = EngineConfig {
            sample_rate_hz: 2000,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ToneAboveNyquist));
    }

    #[test]
    fn validate_rejects_full_scale_amplitude() {
        let config = EngineConfig {
            sine_amplitude: 128,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::AmplitudeTooLarge));
    }

    #[test]
    fn tone_words_match_frequency_word() {
        let words = EngineConfig::default().tone_words();
        assert_eq!(words[0], 21_474_836);
        assert_eq!(words[1], frequency_word(1000, 88_000));
    }
}
