/// Errors raised while validating configuration at startup.
///
/// None of these can occur inside the per-sample path; they are all checked
/// once, before any interrupt is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sample rate must be non-zero.
    ZeroSampleRate,
    /// Loop oversample factor must be non-zero.
    ZeroOversample,
    /// A tone preset is at or above half the sample rate.
    ToneAboveNyquist,
    /// Sine amplitude would leave the unsigned 8-bit range (must be <= 127).
    AmplitudeTooLarge,
    /// A loop clip has no samples.
    EmptyClip,
    /// A loop clip is so long that `len * oversample` does not fit in `u32`.
    ClipTooLong,
    /// Debounce threshold must be at least one sample.
    ZeroDebounceThreshold,
    /// ADC shift must leave at least one bit of a 16-bit reading (must be < 16).
    AdcShiftTooLarge,
    /// Deadline horizon exceeds half the tick counter range.
    DeadlineTooFar,
}
