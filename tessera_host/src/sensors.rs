// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sensor sources for hosts without inertial hardware.

use std::f32::consts::TAU;

use tessera_core::backend::SensorSource;
use tessera_core::controller::{ControllerId, MotionSample};

/// Every controller lies flat and still.
#[derive(Clone, Copy, Debug, Default)]
pub struct StillSensors;

impl SensorSource for StillSensors {
    fn sample(&mut self, _controller: ControllerId) -> MotionSample {
        MotionSample::LEVEL
    }
}

/// Deterministic sine-wave tilt.
///
/// Each controller sweeps pitch and roll through `±amplitude` degrees over
/// `period` samples, a quarter period out of phase with its neighbour by
/// slot index. The `n`th sample for a given controller slot is always the
/// same, so runs are reproducible.
#[derive(Clone, Debug)]
pub struct SyntheticMotion {
    amplitude: f32,
    period: u32,
    counts: Vec<u32>,
}

impl SyntheticMotion {
    /// Creates a source sweeping `±amplitude_degrees` over `period` samples.
    ///
    /// A zero period is treated as one.
    #[must_use]
    pub fn new(amplitude_degrees: f32, period: u32) -> Self {
        Self {
            amplitude: amplitude_degrees,
            period: period.max(1),
            counts: Vec::new(),
        }
    }

    /// The sample a controller in `slot` receives on its `n`th read.
    #[must_use]
    pub fn sample_at(&self, slot: u32, n: u32) -> MotionSample {
        let step = (n % self.period) as f32 / self.period as f32;
        let phase = TAU * step + (slot % 4) as f32 * TAU / 4.0;
        let pitch = (self.amplitude * phase.sin()).to_radians();
        let roll = (self.amplitude * phase.cos()).to_radians();
        // Gravity on +z tipped so that atan2(ay, az) and atan2(-ax, az)
        // recover the two angles.
        MotionSample {
            gz: phase.cos(),
            ..MotionSample::from_accel(-roll.tan(), pitch.tan(), 1.0)
        }
    }
}

impl Default for SyntheticMotion {
    /// Two degrees of sway over two seconds at 60 Hz.
    fn default() -> Self {
        Self::new(2.0, 120)
    }
}

impl SensorSource for SyntheticMotion {
    fn sample(&mut self, controller: ControllerId) -> MotionSample {
        let slot = controller.index() as usize;
        if self.counts.len() <= slot {
            self.counts.resize(slot + 1, 0);
        }
        let n = self.counts[slot];
        self.counts[slot] = n.wrapping_add(1);
        self.sample_at(controller.index(), n)
    }
}
