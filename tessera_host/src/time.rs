// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host clock reads.

use std::sync::OnceLock;
use std::time::Instant;

use tessera_core::backend::Clock;
use tessera_core::time::{HostTime, Timebase};

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Returns the host [`Timebase`]: host ticks are nanoseconds.
#[must_use]
pub const fn timebase() -> Timebase {
    Timebase::NANOS
}

/// Returns nanoseconds elapsed since the first clock read in this process.
#[must_use]
pub fn now() -> HostTime {
    let epoch = *EPOCH.get_or_init(Instant::now);
    elapsed_to_host_time(epoch.elapsed())
}

fn elapsed_to_host_time(elapsed: std::time::Duration) -> HostTime {
    HostTime(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
}

/// [`Clock`] backed by [`now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> HostTime {
        now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timebase_is_nanos_identity() {
        assert_eq!(timebase(), Timebase::NANOS);
    }

    #[test]
    fn now_is_monotonic_non_decreasing() {
        let first = MonotonicClock.now();
        let second = MonotonicClock.now();
        assert!(second >= first, "monotonic clock should not go backwards");
    }

    #[test]
    fn elapsed_conversion_builds_nanosecond_ticks() {
        let elapsed = std::time::Duration::new(12, 345_678_901);
        assert_eq!(
            elapsed_to_host_time(elapsed),
            HostTime(12 * 1_000_000_000 + 345_678_901)
        );
    }

    #[test]
    fn elapsed_conversion_saturates() {
        let elapsed = std::time::Duration::new(u64::MAX, 999_999_999);
        assert_eq!(elapsed_to_host_time(elapsed), HostTime(u64::MAX));
    }
}
