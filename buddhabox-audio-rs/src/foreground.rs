//! Lowest-priority poll loop: button edges → mode changes, periodic status.
//!
//! The firmware calls [`Foreground::poll()`] repeatedly from its idle
//! context. Each call:
//!
//! 1. Consumes the rising-edge flag once. If it was set, the mode advances
//!    one step and is published with PendingUpdate.
//! 2. Consumes the falling-edge flag once and discards it.
//! 3. Checks the status deadline; when reached, re-arms it and returns a
//!    [`StatusReport`] for the caller to log and show on the indicator.

use crate::control::Deadline;
use crate::error::ConfigError;
use crate::mode::{AudioMode, ModeSequencer};
use crate::shared::ControlPort;

/// Configuration for the foreground loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ForegroundConfig {
    /// Ticks between status reports. Default: 100 (100 ms at a 1 ms tick).
    pub status_interval_ticks: u32,
}

impl Default for ForegroundConfig {
    fn default() -> Self {
        Self {
            status_interval_ticks: 100,
        }
    }
}

/// Snapshot for the periodic status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub volume: u8,
    pub mode: AudioMode,
    pub tick: u32,
}

/// What one [`Foreground::poll()`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// New mode, if a rising edge was consumed.
    pub mode_changed: Option<AudioMode>,
    /// Set when the status interval elapsed on this poll.
    pub status: Option<StatusReport>,
}

/// Foreground state: the mode sequencer and the status deadline.
pub struct Foreground<'a> {
    port: ControlPort<'a>,
    sequencer: ModeSequencer,
    status: Deadline,
}

impl<'a> Foreground<'a> {
    /// Start at mode 0 with the first status report due one interval from
    /// the current tick.
    pub fn new(config: &ForegroundConfig, port: ControlPort<'a>) -> Result<Self, ConfigError> {
        let status = Deadline::new(port.tick(), config.status_interval_ticks)?;
        Ok(Self {
            port,
            sequencer: ModeSequencer::new(),
            status,
        })
    }

    pub fn mode(&self) -> AudioMode {
        self.sequencer.current()
    }

    /// Run one iteration of the poll loop.
    pub fn poll(&mut self) -> PollOutcome {
        let mut outcome = PollOutcome::default();

        if self.port.take_rising() {
            let mode = self.sequencer.advance();
            self.port.publish_mode(mode);
            outcome.mode_changed = Some(mode);

            #[cfg(feature = "defmt")]
            defmt::debug!("Mode -> {}", mode);
        }

        // Falling edges never change the mode; clearing keeps the flag fresh.
        let _ = self.port.take_falling();

        let now = self.port.tick();
        if self.status.poll(now) {
            outcome.status = Some(StatusReport {
                volume: self.port.volume(),
                mode: self.sequencer.current(),
                tick: now,
            });
        }

        outcome
    }
}
