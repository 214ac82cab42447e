//! Cross-context state with one writer and one reader/clearer per field.
//!
//! [`SharedState`] holds every value that crosses an execution context. It
//! is never accessed directly: [`SharedState::split()`] borrows it mutably
//! (so it can be called once per owner) and returns one port per context.
//! Each port only exposes the operations its context is allowed to perform.
//!
//! | Field          | Written by                          | Read / cleared by               |
//! |----------------|-------------------------------------|---------------------------------|
//! | mode           | [`ControlPort::publish_mode()`]     | [`AudioPort::mode()`]           |
//! | pending update | [`ControlPort::publish_mode()`]     | [`AudioPort::take_pending()`]   |
//! | volume         | [`TickPort::publish_volume()`]      | [`AudioPort`], [`ControlPort`]  |
//! | rising edge    | [`TickPort::raise_edge()`]          | [`ControlPort::take_rising()`]  |
//! | falling edge   | [`TickPort::raise_edge()`]          | [`ControlPort::take_falling()`] |
//! | tick counter   | [`TickPort::publish_tick()`]        | [`ControlPort::tick()`]         |
//!
//! Every field fits one atomic unit and only `load`/`store` are used, which
//! ARMv6-M supports without a critical section.
//!
//! # Poll-and-clear contract
//!
//! A flag is set by exactly one store from its producer per event and
//! cleared by exactly one store from its consumer. Setting an already-set
//! flag merges the events: at most one of each flag is pending at a time.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::control::Edge;
use crate::mode::AudioMode;

/// Backing cells for every cross-context value.
pub struct SharedState {
    mode: AtomicU8,
    pending_update: AtomicBool,
    volume: AtomicU8,
    rising: AtomicBool,
    falling: AtomicBool,
    tick: AtomicU32,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Power-on state: mode 0, volume 0, no flags, tick 0.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(AudioMode::Loop0.raw()),
            pending_update: AtomicBool::new(false),
            volume: AtomicU8::new(0),
            rising: AtomicBool::new(false),
            falling: AtomicBool::new(false),
            tick: AtomicU32::new(0),
        }
    }

    /// Hand out the three context ports.
    ///
    /// Borrowing `self` mutably means a given owner (typically a
    /// `StaticCell`-initialised `&'static mut SharedState`) can only split
    /// once, so there is exactly one port of each kind.
    pub fn split(&mut self) -> (TickPort<'_>, ControlPort<'_>, AudioPort<'_>) {
        let shared: &SharedState = self;
        (
            TickPort { shared },
            ControlPort { shared },
            AudioPort { shared },
        )
    }
}

/// Reads a sticky flag and clears it if it was set. Only the flag's single
/// consumer may call this.
#[inline]
fn take_flag(flag: &AtomicBool) -> bool {
    if flag.load(Ordering::Acquire) {
        flag.store(false, Ordering::Release);
        true
    } else {
        false
    }
}

// ── Tick service ─────────────────────────────────────────────────────────

/// Port held by the tick service.
pub struct TickPort<'a> {
    shared: &'a SharedState,
}

impl TickPort<'_> {
    /// Publish the latest volume reading.
    #[inline]
    pub fn publish_volume(&self, volume: u8) {
        self.shared.volume.store(volume, Ordering::Relaxed);
    }

    /// Publish the tick counter. The tick service owns the count itself.
    #[inline]
    pub fn publish_tick(&self, tick: u32) {
        self.shared.tick.store(tick, Ordering::Release);
    }

    /// Raise the sticky flag for a debounced edge.
    #[inline]
    pub fn raise_edge(&self, edge: Edge) {
        let flag = match edge {
            Edge::Rising => &self.shared.rising,
            Edge::Falling => &self.shared.falling,
        };
        flag.store(true, Ordering::Release);
    }
}

// ── Foreground loop ──────────────────────────────────────────────────────

/// Port held by the foreground loop.
pub struct ControlPort<'a> {
    shared: &'a SharedState,
}

impl ControlPort<'_> {
    /// Consume a pending rising edge. Returns `true` at most once per event.
    pub fn take_rising(&self) -> bool {
        take_flag(&self.shared.rising)
    }

    /// Consume a pending falling edge. Returns `true` at most once per event.
    pub fn take_falling(&self) -> bool {
        take_flag(&self.shared.falling)
    }

    /// Store a new mode, then raise PendingUpdate for the audio callback.
    ///
    /// The mode store happens first so a callback that sees the pending
    /// flag also sees the new mode.
    pub fn publish_mode(&self, mode: AudioMode) {
        self.shared.mode.store(mode.raw(), Ordering::Release);
        self.shared.pending_update.store(true, Ordering::Release);
    }

    /// Mode most recently published.
    pub fn mode(&self) -> Option<AudioMode> {
        AudioMode::from_raw(self.shared.mode.load(Ordering::Relaxed))
    }

    /// Latest volume, for status reporting.
    pub fn volume(&self) -> u8 {
        self.shared.volume.load(Ordering::Relaxed)
    }

    /// Latest published tick count.
    pub fn tick(&self) -> u32 {
        self.shared.tick.load(Ordering::Acquire)
    }
}

// ── Audio callback ───────────────────────────────────────────────────────

/// Port held by the audio callback.
pub struct AudioPort<'a> {
    shared: &'a SharedState,
}

impl AudioPort<'_> {
    /// Consume PendingUpdate. Returns `true` at most once per mode change.
    #[inline]
    pub fn take_pending(&self) -> bool {
        take_flag(&self.shared.pending_update)
    }

    /// Current mode, `None` if the stored value is out of range.
    #[inline]
    pub fn mode(&self) -> Option<AudioMode> {
        AudioMode::from_raw(self.shared.mode.load(Ordering::Acquire))
    }

    #[inline]
    pub fn volume(&self) -> u8 {
        self.shared.volume.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_state() {
        let mut shared = SharedState::new();
        let (_tick, control, audio) = shared.split();
        assert_eq!(audio.mode(), Some(AudioMode::Loop0));
        assert_eq!(audio.volume(), 0);
        assert!(!audio.take_pending());
        assert!(!control.take_rising());
        assert!(!control.take_falling());
        assert_eq!(control.tick(), 0);
    }

    #[test]
    fn rising_flag_is_taken_once() {
        let mut shared = SharedState::new();
        let (tick, control, _audio) = shared.split();

        tick.raise_edge(Edge::Rising);
        assert!(control.take_rising());
        assert!(!control.take_rising());
        assert!(!control.take_falling());
    }

    #[test]
    fn repeated_raises_merge_into_one_event() {
        let mut shared = SharedState::new();
        let (tick, control, _audio) = shared.split();

        tick.raise_edge(Edge::Falling);
        tick.raise_edge(Edge::Falling);
        assert!(control.take_falling());
        assert!(!control.take_falling());
    }

    #[test]
    fn publish_mode_raises_pending_once() {
        let mut shared = SharedState::new();
        let (_tick, control, audio) = shared.split();

        control.publish_mode(AudioMode::Tone440);
        assert_eq!(audio.mode(), Some(AudioMode::Tone440));
        assert_eq!(control.mode(), Some(AudioMode::Tone440));
        assert!(audio.take_pending());
        assert!(!audio.take_pending());
    }

    #[test]
    fn volume_and_tick_are_visible_downstream() {
        let mut shared = SharedState::new();
        let (tick, control, audio) = shared.split();

        tick.publish_volume(200);
        tick.publish_tick(u32::MAX);
        assert_eq!(audio.volume(), 200);
        assert_eq!(control.volume(), 200);
        assert_eq!(control.tick(), u32::MAX);
    }

    #[test]
    fn out_of_range_raw_mode_reads_as_none() {
        let mut shared = SharedState::new();
        shared.mode.store(42, Ordering::Relaxed);

        let (_tick, _control, audio) = shared.split();
        assert_eq!(audio.mode(), None);
    }
}
