use crate::error::ConfigError;

/// Number of recorded loop clips.
pub const PCM_CLIP_COUNT: usize = 4;

/// XOR applied to every clip byte: signed-centred (0x00 = silence) source
/// encoding to unsigned-centred (0x80 = silence) output encoding.
pub const BIAS_FLIP: u8 = 0x80;

/// A recorded loop: an opaque buffer of signed-centred 8-bit samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmClip {
    data: &'static [u8],
}

impl PcmClip {
    pub const fn new(data: &'static [u8]) -> Self {
        Self { data }
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub const fn data(&self) -> &'static [u8] {
        self.data
    }
}

/// The four loop clips, validated once at startup.
#[derive(Debug, Clone, Copy)]
pub struct PcmBank {
    clips: [PcmClip; PCM_CLIP_COUNT],
}

impl PcmBank {
    /// Build a bank, rejecting empty clips.
    ///
    /// Returns [`ConfigError::EmptyClip`] if any clip has no samples. The
    /// length-times-oversample check happens in
    /// [`PcmBank::check_oversample()`], once the factor is known.
    pub fn new(clips: [PcmClip; PCM_CLIP_COUNT]) -> Result<Self, ConfigError> {
        if clips.iter().any(PcmClip::is_empty) {
            return Err(ConfigError::EmptyClip);
        }
        Ok(Self { clips })
    }

    /// Ensure every clip's oversampled span fits the `u32` play position.
    pub fn check_oversample(&self, oversample: u32) -> Result<(), ConfigError> {
        for clip in &self.clips {
            let len = u32::try_from(clip.len()).map_err(|_| ConfigError::ClipTooLong)?;
            len.checked_mul(oversample)
                .ok_or(ConfigError::ClipTooLong)?;
        }
        Ok(())
    }

    /// Clip by index. `None` outside `0..PCM_CLIP_COUNT`.
    pub fn clip(&self, index: usize) -> Option<&PcmClip> {
        self.clips.get(index)
    }
}

/// Zero-order-hold loop playback.
///
/// The play position counts output samples; each clip byte is held for
/// `oversample` calls, and the position wraps to 0 at `len × oversample`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPlayer {
    position: u32,
    oversample: u32,
}

impl LoopPlayer {
    /// Player at position 0. `oversample` must be non-zero
    /// ([`EngineConfig::validate()`](super::EngineConfig::validate)).
    pub const fn new(oversample: u32) -> Self {
        Self {
            position: 0,
            oversample,
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    /// Restart from the first sample.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Emit `clip[position / oversample] ^ 0x80`, then advance and wrap.
    ///
    /// A position left over from a longer clip is wrapped to 0 before
    /// indexing, so a mode switch observed before its reset can never read
    /// outside the new clip.
    #[inline]
    pub fn next(&mut self, clip: &PcmClip) -> u8 {
        let span = clip.len() as u32 * self.oversample;
        if span == 0 {
            return BIAS_FLIP;
        }
        if self.position >= span {
            self.position = 0;
        }

        let byte = clip.data()[(self.position / self.oversample) as usize];

        self.position += 1;
        if self.position >= span {
            self.position = 0;
        }

        byte ^ BIAS_FLIP
    }
}
