// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine capacity and frame pacing presets.

use crate::time::Duration;

/// Capacity bounds for an [`Engine`](crate::engine::Engine).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of concurrently attached surfaces.
    pub max_surfaces: usize,
    /// Maximum number of concurrently attached controllers.
    pub max_controllers: usize,
}

impl EngineConfig {
    /// Handheld console preset: four display surfaces, eight controllers.
    #[must_use]
    pub const fn handheld() -> Self {
        Self {
            max_surfaces: 4,
            max_controllers: 8,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::handheld()
    }
}

/// Frame pacing for hosts that drive the scheduler in a loop.
///
/// Pacing is "tick, then pause": the host sleeps for [`pause`](Self::pause)
/// after every tick regardless of how long the tick took. Stage cost is not
/// compensated, so the effective rate is slightly below the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacingConfig {
    /// Nominal frame interval the loop aims for.
    pub frame_interval: Duration,
    /// Fixed pause inserted after each tick.
    pub pause: Duration,
}

impl PacingConfig {
    /// 60 Hz target (~16.67 ms per frame).
    #[must_use]
    pub const fn hz_60() -> Self {
        // 16.6ms at 1ns tick resolution.
        let interval = Duration(16_666_667);
        Self {
            frame_interval: interval,
            pause: interval,
        }
    }

    /// Pacing for an arbitrary target rate.
    ///
    /// # Panics
    ///
    /// Panics if `hz` is zero.
    #[must_use]
    pub const fn from_hz(hz: u32) -> Self {
        assert!(hz != 0, "frame rate must not be zero");
        let interval = Duration(1_000_000_000 / hz as u64);
        Self {
            frame_interval: interval,
            pause: interval,
        }
    }

    /// No pause at all; ticks run back to back (tests, offline rendering).
    #[must_use]
    pub const fn unpaced() -> Self {
        Self {
            frame_interval: Duration::ZERO,
            pause: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::hz_60()
    }
}
