use crate::error::ConfigError;

/// Longest horizon for which [`deadline_reached()`] stays correct across
/// counter wraparound: half the `u32` range.
pub const MAX_HORIZON: u32 = i32::MAX as u32;

/// `true` once `tick` has reached or passed `goal`.
///
/// The unsigned difference is reinterpreted as signed, so the comparison is
/// translation-invariant and survives the counter wrapping, provided `tick`
/// and `goal` are never more than [`MAX_HORIZON`] apart.
///
/// ```
/// use buddhabox::deadline_reached;
///
/// assert!(deadline_reached(5, 5));
/// assert!(!deadline_reached(4, 5));
/// // goal set just before the counter wraps, tick just after
/// assert!(deadline_reached(3, u32::MAX - 2));
/// ```
#[inline]
pub fn deadline_reached(tick: u32, goal: u32) -> bool {
    (tick.wrapping_sub(goal) as i32) >= 0
}

/// A re-armable goal on the wrapping tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    goal: u32,
    horizon: u32,
}

impl Deadline {
    /// Deadline `horizon` ticks after `now`.
    ///
    /// Returns [`ConfigError::DeadlineTooFar`] if `horizon` exceeds
    /// [`MAX_HORIZON`].
    pub fn new(now: u32, horizon: u32) -> Result<Self, ConfigError> {
        if horizon > MAX_HORIZON {
            return Err(ConfigError::DeadlineTooFar);
        }
        Ok(Self {
            goal: now.wrapping_add(horizon),
            horizon,
        })
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn is_reached(&self, now: u32) -> bool {
        deadline_reached(now, self.goal)
    }

    /// If reached, move the goal to `now + horizon` and return `true`.
    pub fn poll(&mut self, now: u32) -> bool {
        if !self.is_reached(now) {
            return false;
        }
        self.goal = now.wrapping_add(self.horizon);
        true
    }
}
