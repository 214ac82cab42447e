//! Real-time audio core for the Buddhabox sound toy.
//!
//! Every output period the [`AudioCallback`] produces one unsigned 8-bit
//! amplitude: the current [`AudioMode`] picks a source (one of four recorded
//! loops, two sine presets, white or pink noise), the live volume scales it,
//! and the result goes to an [`AudioSink`].
//!
//! # Contexts
//!
//! The crate is written for three prioritised execution contexts that share
//! state only through [`SharedState`]:
//!
//! ```text
//! Audio callback  (highest, once per sample)   AudioPort    reads mode/volume, clears PendingUpdate
//! Tick service    (1 ms)                       TickPort     writes volume/tick, raises edge flags
//! Foreground loop (lowest, polls)              ControlPort  clears edge flags, writes mode, raises PendingUpdate
//! ```
//!
//! [`SharedState::split()`] hands out exactly one port per context, so the
//! single-writer/single-clearer contract of every field is enforced by types.
//!
//! # Quick start
//!
//! ```
//! use buddhabox::{
//!     AudioCallback, AudioSink, EngineConfig, Foreground, ForegroundConfig, PcmBank, PcmClip,
//!     SampleEngine, SharedState, TickConfig, TickService,
//! };
//!
//! static CLIP: [u8; 4] = [0x00, 0x40, 0x80, 0xC0];
//!
//! struct Dac(u8);
//! impl AudioSink for Dac {
//!     fn write_level(&mut self, level: u8) {
//!         self.0 = level;
//!     }
//! }
//!
//! let mut shared = SharedState::new();
//! let (tick_port, control_port, audio_port) = shared.split();
//!
//! let bank = PcmBank::new([PcmClip::new(&CLIP); 4]).unwrap();
//! let engine = SampleEngine::new(&EngineConfig::default(), bank).unwrap();
//! let mut audio = AudioCallback::new(engine, audio_port, Dac(0));
//! let mut tick = TickService::new(&TickConfig::default(), tick_port).unwrap();
//! let mut fg = Foreground::new(&ForegroundConfig::default(), control_port).unwrap();
//!
//! tick.on_tick(false, 0); // released button, pot at minimum -> full volume
//! fg.poll();
//! audio.run();
//! ```
//!
//! # Crate features
//!
//! - **`defmt`**: [`defmt::Format`] on public types and structured logging
//!   outside the per-sample path.
//!
//! [`defmt::Format`]: https://docs.rs/defmt

#![no_std]

pub mod callback;
pub mod control;
pub mod engine;
pub mod error;
pub mod foreground;
pub mod mode;
pub mod shared;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use callback::{AudioCallback, AudioSink};
pub use control::{deadline_reached, Deadline, Debouncer, Edge, TickConfig, TickService, VolumeMap};
pub use engine::{
    EngineConfig, LoopPlayer, PcmBank, PcmClip, PinkNoise, SampleEngine, ToneOscillator, Wavetable,
    WhiteNoise,
};
pub use error::ConfigError;
pub use foreground::{Foreground, ForegroundConfig, PollOutcome, StatusReport};
pub use mode::{AudioMode, ModeSequencer, Source};
pub use shared::{AudioPort, ControlPort, SharedState, TickPort};

#[cfg(test)]
mod tests {
    use super::*;

    static CLIP: [u8; 3] = [0x00, 0x40, 0xC0];

    /// Sink that remembers every level it was given.
    struct Recorder {
        levels: [u8; 64],
        len: usize,
    }

    impl AudioSink for Recorder {
        fn write_level(&mut self, level: u8) {
            if self.len < self.levels.len() {
                self.levels[self.len] = level;
                self.len += 1;
            }
        }
    }

    #[test]
    fn button_press_reaches_the_audio_callback() {
        let mut shared = SharedState::new();
        let (tick_port, control_port, audio_port) = shared.split();

        let bank = PcmBank::new([PcmClip::new(&CLIP); 4]).unwrap();
        let engine = SampleEngine::new(&EngineConfig::default(), bank).unwrap();
        let sink = Recorder {
            levels: [0; 64],
            len: 0,
        };
        let mut audio = AudioCallback::new(engine, audio_port, sink);
        let mut tick = TickService::new(&TickConfig::default(), tick_port).unwrap();
        let mut fg = Foreground::new(&ForegroundConfig::default(), control_port).unwrap();

        // Pot at minimum: full volume. Loop 0 plays 0x00 ^ 0x80 = 128 -> 127.
        tick.on_tick(false, 0);
        fg.poll();
        assert_eq!(audio.run(), 127);

        // Press and hold through the debounce window; one mode step per press.
        for _ in 0..4 {
            for _ in 0..15 {
                tick.on_tick(true, 0);
            }
            assert!(fg.poll().mode_changed.is_some());
            for _ in 0..15 {
                tick.on_tick(false, 0);
            }
            assert!(fg.poll().mode_changed.is_none());
        }
        assert_eq!(fg.mode(), AudioMode::Tone440);

        // First sample after the mode-entry reset is table[0] = 128.
        let level = audio.run();
        assert_eq!(level, engine::scale(128, 255));
        assert_eq!(audio.engine().tone().phase(), engine::frequency_word(440, 88_000));
        assert_eq!(audio.sink().len, 2);
    }

    #[test]
    fn silent_until_the_first_volume_reading() {
        let mut shared = SharedState::new();
        let (tick_port, _control_port, audio_port) = shared.split();

        let bank = PcmBank::new([PcmClip::new(&CLIP); 4]).unwrap();
        let engine = SampleEngine::new(&EngineConfig::default(), bank).unwrap();
        let sink = Recorder {
            levels: [0xAA; 64],
            len: 0,
        };
        let mut audio = AudioCallback::new(engine, audio_port, sink);
        let mut tick = TickService::new(&TickConfig::default(), tick_port).unwrap();

        audio.run();
        tick.on_tick(false, 0);
        audio.run();
        // CLIP[0] is held for 8 calls, so both calls play 0x00 ^ 0x80 = 128.
        assert_eq!(audio.sink().levels[..2], [0, 127]);
    }
}
