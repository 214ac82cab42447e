use crate::error::ConfigError;
use crate::shared::TickPort;

use super::debounce::{Debouncer, DEBOUNCE_THRESHOLD};

/// Configuration for the tick service.
///
/// [`TickConfig::default()`] matches the stock board: a 1 ms tick,
/// 15-sample debounce, and a 12-bit pot mapped onto `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickConfig {
    /// Tick period in milliseconds. Default: 1.
    pub period_ms: u64,
    /// Consecutive agreeing samples to accept a button level. Default: 15.
    pub debounce_threshold: u8,
    /// Volume with the pot at its minimum reading. Default: 255.
    pub volume_max: u8,
    /// Right shift applied to the raw ADC reading. Default: 4 (12-bit ADC).
    pub adc_shift: u8,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            period_ms: 1,
            debounce_threshold: DEBOUNCE_THRESHOLD,
            volume_max: u8::MAX,
            adc_shift: 4,
        }
    }
}

impl TickConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_threshold == 0 {
            return Err(ConfigError::ZeroDebounceThreshold);
        }
        if self.adc_shift >= 16 {
            return Err(ConfigError::AdcShiftTooLarge);
        }
        Ok(())
    }

    pub fn volume_map(&self) -> VolumeMap {
        VolumeMap {
            max_scale: self.volume_max,
            shift: self.adc_shift,
        }
    }
}

/// Inverted linear pot-to-volume mapping: `max_scale − (raw >> shift)`.
///
/// With the defaults a 12-bit reading of 0 gives 255 and 4095 gives 0.
/// Readings that would go below 0 clamp to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeMap {
    pub max_scale: u8,
    pub shift: u8,
}

impl VolumeMap {
    #[inline]
    pub fn map(&self, raw: u16) -> u8 {
        let shifted = raw.checked_shr(u32::from(self.shift)).unwrap_or(0);
        let reduced = u8::try_from(shifted).unwrap_or(u8::MAX);
        self.max_scale.saturating_sub(reduced)
    }
}

/// Periodic sampler of the button and pot.
///
/// Owns the debouncer and the tick count; publishes through its
/// [`TickPort`].
pub struct TickService<'a> {
    debouncer: Debouncer,
    volume: VolumeMap,
    tick: u32,
    port: TickPort<'a>,
}

impl<'a> TickService<'a> {
    pub fn new(config: &TickConfig, port: TickPort<'a>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            debouncer: Debouncer::new(config.debounce_threshold),
            volume: config.volume_map(),
            tick: 0,
            port,
        })
    }

    /// One tick: debounce `button_pressed`, then publish the resulting edge,
    /// the volume for `adc_raw`, and the incremented tick counter.
    pub fn on_tick(&mut self, button_pressed: bool, adc_raw: u16) {
        if let Some(edge) = self.debouncer.update(button_pressed) {
            self.port.raise_edge(edge);
        }

        self.port.publish_volume(self.volume.map(adc_raw));

        self.tick = self.tick.wrapping_add(1);
        self.port.publish_tick(self.tick);
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn button_level(&self) -> bool {
        self.debouncer.level()
    }
}
