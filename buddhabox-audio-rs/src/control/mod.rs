//! Low-rate input sampling: button debounce, volume, and the tick counter.
//!
//! The [`TickService`] runs once per tick period (1 ms by default). Each
//! call feeds the raw button level through the [`Debouncer`], raises a sticky
//! edge flag on a debounced transition, maps the pot reading to a volume
//! through [`VolumeMap`], and advances the wrapping tick counter.
//!
//! [`deadline_reached()`] and [`Deadline`] compare against that counter in a
//! way that survives wraparound.

mod deadline;
mod debounce;
mod tick;

pub use deadline::{deadline_reached, Deadline, MAX_HORIZON};
pub use debounce::{Debouncer, Edge, DEBOUNCE_THRESHOLD};
pub use tick::{TickConfig, TickService, VolumeMap};
