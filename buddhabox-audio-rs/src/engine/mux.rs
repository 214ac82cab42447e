use crate::error::ConfigError;
use crate::mode::{AudioMode, Source};

use super::noise::{PinkNoise, WhiteNoise};
use super::pcm::{LoopPlayer, PcmBank};
use super::tone::{ToneOscillator, Wavetable};
use super::{EngineConfig, SILENCE};

/// Every generator the audio callback can route to, plus the state that
/// selects between them.
///
/// Owned exclusively by the audio callback context.
pub struct SampleEngine {
    bank: PcmBank,
    player: LoopPlayer,
    table: Wavetable,
    tone: ToneOscillator,
    tone_words: [u32; 2],
    white: WhiteNoise,
    pink: PinkNoise,
}

impl SampleEngine {
    /// Validate `config`, build the sine table and both tone words.
    ///
    /// This is the only place frequency words and the wavetable are computed;
    /// mode changes later just select one. The oscillator starts on the
    /// second preset (1 kHz by default) at phase 0.
    pub fn new(config: &EngineConfig, bank: PcmBank) -> Result<Self, ConfigError> {
        config.validate()?;
        bank.check_oversample(config.oversample)?;

        let tone_words = config.tone_words();
        let table = Wavetable::sine(config.sine_amplitude);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Sample engine: {} Hz, oversample {}, tone words [{}, {}]",
            config.sample_rate_hz,
            config.oversample,
            tone_words[0],
            tone_words[1]
        );

        Ok(Self {
            bank,
            player: LoopPlayer::new(config.oversample),
            table,
            tone: ToneOscillator::new(tone_words[1]),
            tone_words,
            white: WhiteNoise::new(),
            pink: PinkNoise::new(),
        })
    }

    /// Apply a pending mode change: restart loop playback and, for a tone
    /// sub-mode, load its preset increment at phase 0.
    #[inline]
    pub fn enter_mode(&mut self, mode: Option<AudioMode>) {
        self.player.reset();

        if let Some(preset) = mode.and_then(AudioMode::tone_preset) {
            self.tone.retune(self.tone_words[preset]);
        }
    }

    /// One raw unsigned sample for `mode`. `None` is silence.
    #[inline]
    pub fn next_sample(&mut self, mode: Option<AudioMode>) -> u8 {
        let Some(mode) = mode else {
            return SILENCE;
        };

        match mode.source() {
            Source::Loop(index) => match self.bank.clip(index) {
                Some(clip) => self.player.next(clip),
                None => SILENCE,
            },
            Source::Tone(_) => self.tone.next(&self.table),
            Source::White => self.white.next_byte(),
            Source::Pink => self.pink.next(&mut self.white),
        }
    }

    pub fn player(&self) -> &LoopPlayer {
        &self.player
    }

    pub fn tone(&self) -> &ToneOscillator {
        &self.tone
    }

    pub fn table(&self) -> &Wavetable {
        &self.table
    }

    pub fn white(&self) -> &WhiteNoise {
        &self.white
    }

    pub fn pink(&self) -> &PinkNoise {
        &self.pink
    }
}
