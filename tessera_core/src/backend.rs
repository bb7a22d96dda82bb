// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contract for host integrations.
//!
//! The core never touches hardware or reads a clock by itself. A host
//! provides four pieces:
//!
//! - **Sensors**: a [`SensorSource`] producing one [`MotionSample`] per
//!   connected controller per tick.
//! - **Snap detection**: a [`SnapPolicy`] deciding, per frame and surface,
//!   whether the surface is docked.
//! - **Output**: a [`FrameSink`] receiving the finished
//!   [`CompositeFrame`]. Transmitting it to a display is the sink's business.
//! - **Time**: a [`Clock`] used to timestamp pipeline phases.
//!
//! They are bundled per tick in a [`FrameIo`] and handed to
//! [`Scheduler::tick`](crate::scheduler::Scheduler::tick).
//!
//! # Crate boundaries
//!
//! `tessera_core` owns the data model, the pipeline stages, and this
//! contract module. `tessera_host` implements the contract on top of `std`;
//! tests implement it with deterministic doubles.

use core::cell::Cell;

use crate::compositor::CompositeFrame;
use crate::controller::{ControllerId, MotionSample};
use crate::id::SurfaceId;
use crate::time::HostTime;

/// Supplies raw motion samples.
pub trait SensorSource {
    /// Reads the current sample for `controller`.
    ///
    /// Called once per connected controller per tick, in controller index
    /// order. Acquisition failures are the source's concern; it should
    /// return its best available reading.
    fn sample(&mut self, controller: ControllerId) -> MotionSample;
}

/// Decides whether surfaces are docked.
pub trait SnapPolicy {
    /// Returns the snap state `surface` should have on frame `frame_index`,
    /// or `None` to leave it unchanged.
    fn decide(&mut self, frame_index: u64, surface: SurfaceId) -> Option<bool>;
}

/// Outcome of handing a frame to a [`FrameSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SinkStatus {
    /// The frame was taken.
    Accepted,
    /// The sink could not take the frame; the tick's output is dropped.
    NotReady,
}

/// Receives finished composite frames.
pub trait FrameSink {
    /// Consumes one frame. The sink must copy what it needs before
    /// returning; the frame's storage is overwritten on the next tick.
    fn submit(&mut self, frame: &CompositeFrame) -> SinkStatus;
}

/// Reads monotonic host time.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> HostTime;
}

/// The collaborators used by one tick.
pub struct FrameIo<'a> {
    /// Motion sample source.
    pub sensors: &'a mut dyn SensorSource,
    /// Snap detection policy.
    pub snap: &'a mut dyn SnapPolicy,
    /// Composite frame consumer.
    pub sink: &'a mut dyn FrameSink,
    /// Phase timestamp source.
    pub clock: &'a dyn Clock,
}

impl core::fmt::Debug for FrameIo<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameIo").finish_non_exhaustive()
    }
}

/// A [`Clock`] that advances by a fixed step on every read.
///
/// Useful for deterministic phase timings in tests and offline runs.
#[derive(Debug, Default)]
pub struct StepClock {
    next: Cell<u64>,
    step: u64,
}

impl StepClock {
    /// Creates a clock starting at `start` and advancing `step` ticks per read.
    #[must_use]
    pub const fn new(start: u64, step: u64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> HostTime {
        let t = self.next.get();
        self.next.set(t.saturating_add(self.step));
        HostTime(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_clock_advances_per_read() {
        let clock = StepClock::new(100, 10);
        assert_eq!(clock.now(), HostTime(100));
        assert_eq!(clock.now(), HostTime(110));
        assert_eq!(clock.now(), HostTime(120));
    }
}
