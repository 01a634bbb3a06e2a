//! Soft drop release emulation.
//!
//! Most terminals never report key releases. Holding Down instead produces a
//! stream of repeated presses, so the drop is considered released once no
//! press has arrived for a short grace period.

use std::time::{Duration, Instant};

use crate::types::{GameAction, SOFT_DROP_GRACE_MS};

/// Tracks whether the soft drop key is held.
#[derive(Debug, Clone)]
pub struct SoftDropLatch {
    last_press: Option<Instant>,
    grace: Duration,
}

impl Default for SoftDropLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftDropLatch {
    pub fn new() -> Self {
        Self::with_grace_ms(SOFT_DROP_GRACE_MS)
    }

    pub fn with_grace_ms(grace_ms: u32) -> Self {
        Self {
            last_press: None,
            grace: Duration::from_millis(u64::from(grace_ms)),
        }
    }

    pub fn is_held(&self) -> bool {
        self.last_press.is_some()
    }

    /// Feed a mapped action. Repeated soft drop presses only refresh the
    /// latch; everything else passes through.
    pub fn filter(&mut self, action: GameAction, now: Instant) -> Option<GameAction> {
        match action {
            GameAction::SoftDrop(true) => {
                let first = self.last_press.replace(now).is_none();
                first.then_some(action)
            }
            GameAction::SoftDrop(false) => self.last_press.take().map(|_| action),
            other => Some(other),
        }
    }

    /// Release once the grace period has passed without a press.
    pub fn poll(&mut self, now: Instant) -> Option<GameAction> {
        let last = self.last_press?;
        if now.saturating_duration_since(last) < self.grace {
            return None;
        }
        self.last_press = None;
        Some(GameAction::SoftDrop(false))
    }

    /// When the next [`SoftDropLatch::poll`] could release.
    pub fn deadline(&self) -> Option<Instant> {
        self.last_press.map(|last| last + self.grace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_are_absorbed() {
        let mut latch = SoftDropLatch::new();
        let t0 = Instant::now();

        assert_eq!(
            latch.filter(GameAction::SoftDrop(true), t0),
            Some(GameAction::SoftDrop(true))
        );
        assert_eq!(
            latch.filter(GameAction::SoftDrop(true), t0 + Duration::from_millis(30)),
            None
        );
        assert!(latch.is_held());
        assert_eq!(latch.filter(GameAction::HardDrop, t0), Some(GameAction::HardDrop));
    }

    #[test]
    fn test_release_after_grace() {
        let mut latch = SoftDropLatch::with_grace_ms(100);
        let t0 = Instant::now();
        latch.filter(GameAction::SoftDrop(true), t0);
        latch.filter(GameAction::SoftDrop(true), t0 + Duration::from_millis(80));

        assert_eq!(latch.poll(t0 + Duration::from_millis(150)), None);
        assert_eq!(
            latch.poll(t0 + Duration::from_millis(180)),
            Some(GameAction::SoftDrop(false))
        );
        assert!(!latch.is_held());
        assert_eq!(latch.poll(t0 + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_explicit_release() {
        let mut latch = SoftDropLatch::new();
        let t0 = Instant::now();
        assert_eq!(latch.filter(GameAction::SoftDrop(false), t0), None);

        latch.filter(GameAction::SoftDrop(true), t0);
        assert_eq!(
            latch.filter(GameAction::SoftDrop(false), t0),
            Some(GameAction::SoftDrop(false))
        );
        assert_eq!(latch.deadline(), None);
    }
}
