//! Time sources.

use pubsync_core::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wall-clock time source, in microseconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// System wall clock (microseconds since the Unix epoch).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            micros: AtomicU64::new(start.as_micros()),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.micros.store(now.as_micros(), Ordering::SeqCst);
    }

    /// Move the clock forward and return the new reading.
    pub fn advance(&self, by: Duration) -> Timestamp {
        let step = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        let prev = self
            .micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |m| {
                Some(m.saturating_add(step))
            })
            .unwrap_or_else(|m| m);
        Timestamp(prev.saturating_add(step))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.micros.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(Timestamp(100));
        assert_eq!(clock.now(), Timestamp(100));
        assert_eq!(clock.advance(Duration::from_micros(50)), Timestamp(150));
        assert_eq!(clock.now(), Timestamp(150));
        clock.set(Timestamp(10));
        assert_eq!(clock.now(), Timestamp(10));
    }

    #[test]
    fn test_shared_clock() {
        let clock = Arc::new(ManualClock::new(Timestamp(1)));
        let shared: Arc<dyn Clock> = clock.clone();
        clock.advance(Duration::from_micros(1));
        assert_eq!(shared.now(), Timestamp(2));
    }
}
