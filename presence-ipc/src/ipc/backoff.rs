// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reconnect Backoff
//!
//! Delay policy for the reconnect scheduler: starts at a floor, doubles on
//! each consecutive failure, clamps at a ceiling, and resets to the floor
//! once a session becomes ready.

use std::time::Duration;

/// Exponential backoff state for reconnect scheduling.
#[derive(Debug, Clone)]
pub struct ReconnectBackoff {
    floor_ms: u64,
    ceiling_ms: u64,
    current_ms: u64,
}

impl ReconnectBackoff {
    /// Creates a backoff starting at `floor_ms`, clamped at `ceiling_ms`.
    pub fn new(floor_ms: u64, ceiling_ms: u64) -> Self {
        ReconnectBackoff {
            floor_ms,
            ceiling_ms,
            current_ms: floor_ms,
        }
    }

    /// Returns the delay to use for the next retry and advances the policy.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current_ms;
        self.current_ms = self.current_ms.saturating_mul(2).min(self.ceiling_ms);
        Duration::from_millis(delay)
    }

    /// Resets the delay to the floor. Called when a session becomes ready.
    pub fn reset(&mut self) {
        self.current_ms = self.floor_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_until_ceiling() {
        let mut backoff = ReconnectBackoff::new(500, 60_000);

        let delays: Vec<u64> = (0..9).map(|_| backoff.next_delay().as_millis() as u64).collect();
        assert_eq!(
            delays,
            vec![500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 60_000, 60_000]
        );
    }

    #[test]
    fn test_backoff_reset_returns_to_floor() {
        let mut backoff = ReconnectBackoff::new(500, 60_000);
        for _ in 0..5 {
            backoff.next_delay();
        }

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_millis(1_000));
    }

    #[test]
    fn test_backoff_clamps_uneven_ceiling() {
        // Ceiling need not be a power-of-two multiple of the floor.
        let mut backoff = ReconnectBackoff::new(400, 1_000);

        assert_eq!(backoff.next_delay(), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(), Duration::from_millis(800));
        assert_eq!(backoff.next_delay(), Duration::from_millis(1_000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(1_000));
    }

    #[test]
    fn test_backoff_no_overflow_at_extremes() {
        let mut backoff = ReconnectBackoff::new(u64::MAX / 2 + 1, u64::MAX);
        backoff.next_delay();
        assert_eq!(backoff.next_delay(), Duration::from_millis(u64::MAX));
    }
}
