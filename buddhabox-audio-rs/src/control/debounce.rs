/// Consecutive agreeing samples needed before a new level is accepted.
pub const DEBOUNCE_THRESHOLD: u8 = 15;

/// A debounced level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Released → pressed.
    Rising,
    /// Pressed → released.
    Falling,
}

/// Run-length debouncer for a binary input.
///
/// The stable level only flips after `threshold` consecutive raw samples
/// that disagree with it. A single agreeing sample resets the run, so a
/// glitch shorter than the threshold never produces an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    level: bool,
    run: u8,
    threshold: u8,
}

impl Debouncer {
    /// Debouncer starting in the released (`false`) state.
    ///
    /// A `threshold` of 0 behaves like 1 (every change is accepted at once);
    /// [`TickConfig::validate()`](super::TickConfig::validate) rejects it.
    pub const fn new(threshold: u8) -> Self {
        Self {
            level: false,
            run: 0,
            threshold,
        }
    }

    /// Current stable level.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Feed one raw sample. Returns the edge on the sample that completes a
    /// transition.
    pub fn update(&mut self, raw: bool) -> Option<Edge> {
        if raw == self.level {
            self.run = 0;
            return None;
        }

        self.run = self.run.saturating_add(1);
        if self.run < self.threshold {
            return None;
        }

        self.run = 0;
        self.level = raw;
        Some(if raw { Edge::Rising } else { Edge::Falling })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(db: &mut Debouncer, raw: bool, count: usize) -> Option<Edge> {
        let mut last = None;
        for _ in 0..count {
            if let Some(edge) = db.update(raw) {
                assert!(last.is_none(), "more than one edge in a single run");
                last = Some(edge);
            }
        }
        last
    }

    #[test]
    fn starts_released() {
        assert!(!Debouncer::new(DEBOUNCE_THRESHOLD).level());
    }

    #[test]
    fn rising_edge_on_fifteenth_sample() {
        let mut db = Debouncer::new(15);
        assert_eq!(feed(&mut db, true, 14), None);
        assert!(!db.level());
        assert_eq!(db.update(true), Some(Edge::Rising));
        assert!(db.level());
    }

    #[test]
    fn holding_does_not_repeat_edges() {
        let mut db = Debouncer::new(15);
        assert_eq!(feed(&mut db, true, 15), Some(Edge::Rising));
        assert_eq!(feed(&mut db, true, 1000), None);
    }

    #[test]
    fn falling_edge_after_release() {
        let mut db = Debouncer::new(15);
        feed(&mut db, true, 15);
        assert_eq!(feed(&mut db, false, 15), Some(Edge::Falling));
        assert!(!db.level());
    }

    #[test]
    fn short_glitch_is_rejected() {
        let mut db = Debouncer::new(15);
        for _ in 0..10 {
            assert_eq!(feed(&mut db, true, 14), None);
            assert_eq!(db.update(false), None);
        }
        assert!(!db.level());
    }

    #[test]
    fn threshold_of_one_follows_input() {
        let mut db = Debouncer::new(1);
        assert_eq!(db.update(true), Some(Edge::Rising));
        assert_eq!(db.update(false), Some(Edge::Falling));
    }

    #[test]
    fn zero_threshold_behaves_like_one() {
        let mut db = Debouncer::new(0);
        assert_eq!(db.update(true), Some(Edge::Rising));
    }
}
