//! External block clock

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonically non-decreasing block height supplied from outside the
/// DAO. Controllers only ever read the height; the surrounding harness
/// (chain runtime, test driver) advances it.
#[derive(Debug, Clone, Default)]
pub struct BlockClock {
    height: Arc<AtomicU64>,
}

impl BlockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(height: u64) -> Self {
        Self {
            height: Arc::new(AtomicU64::new(height)),
        }
    }

    pub fn height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }

    /// Move the clock forward to `height`. Never moves backwards.
    pub fn advance_to(&self, height: u64) {
        self.height.fetch_max(height, Ordering::SeqCst);
    }

    pub fn advance(&self, blocks: u64) {
        self.height.fetch_add(blocks, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_view() {
        let clock = BlockClock::new();
        let reader = clock.clone();
        clock.advance_to(100);
        assert_eq!(reader.height(), 100);
    }

    #[test]
    fn test_never_rewinds() {
        let clock = BlockClock::starting_at(1500);
        clock.advance_to(100);
        assert_eq!(clock.height(), 1500);
        clock.advance(5);
        assert_eq!(clock.height(), 1505);
    }
}
