// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Motion fusion: raw inertial samples to orientation and cursor motion.
//!
//! The model is deliberately coarse. Pitch and roll come straight from the
//! gravity vector seen by the accelerometer, yaw is the raw z-axis gyro rate
//! (no integration over time), and the cursor moves by the tilt angle times a
//! fixed gain every tick:
//!
//! ```text
//! pitch = atan2(ay, az)        (degrees)
//! roll  = atan2(-ax, az)       (degrees)
//! yaw   = gz
//! x    += round(roll  * CURSOR_GAIN)
//! y    += round(pitch * CURSOR_GAIN)
//! ```
//!
//! followed by a clamp into the bound surface. The renderer applies a second,
//! display-only offset with its own gain ([`NUDGE_GAIN`](crate::render::NUDGE_GAIN));
//! the two gains are independent.

use kurbo::Vec2;

use crate::controller::{Cursor, MotionSample, Orientation};
use crate::surface::SurfaceSize;

/// Pixels of cursor travel per degree of tilt, per tick.
pub const CURSOR_GAIN: f64 = 5.0;

/// Computes orientation from one motion sample.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "angles are bounded by ±180 degrees and stored as f32"
)]
pub fn orientation(sample: &MotionSample) -> Orientation {
    let az = f64::from(sample.az);
    // `Vec2::atan2` is the angle of (x, y), i.e. `y.atan2(x)`.
    let pitch = Vec2::new(az, f64::from(sample.ay)).atan2().to_degrees();
    let roll = Vec2::new(az, -f64::from(sample.ax)).atan2().to_degrees();
    Orientation {
        pitch: pitch as f32,
        roll: roll as f32,
        yaw: sample.gz,
    }
}

/// Returns `(round(roll * gain), round(pitch * gain))` in whole pixels.
///
/// Non-finite angles produce no motion.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "float-to-int casts saturate; NaN maps to zero"
)]
pub fn tilt_offset(orientation: Orientation, gain: f64) -> (i64, i64) {
    let scaled = Vec2::new(f64::from(orientation.roll), f64::from(orientation.pitch)) * gain;
    let rounded = scaled.round();
    (rounded.x as i64, rounded.y as i64)
}

/// Moves `cursor` by `offset` and clamps it into `[0, w-1] × [0, h-1]`.
///
/// `bounds` must be non-empty, which every attached surface is.
#[must_use]
pub fn offset_clamped(cursor: Cursor, offset: (i64, i64), bounds: SurfaceSize) -> Cursor {
    Cursor {
        x: clamp_axis(cursor.x, offset.0, bounds.width),
        y: clamp_axis(cursor.y, offset.1, bounds.height),
    }
}

/// Integrates one tick of tilt into the stored cursor.
#[must_use]
pub fn integrate(cursor: Cursor, orientation: Orientation, bounds: SurfaceSize) -> Cursor {
    offset_clamped(cursor, tilt_offset(orientation, CURSOR_GAIN), bounds)
}

fn clamp_axis(position: u32, delta: i64, extent: u32) -> u32 {
    let max = i64::from(extent.saturating_sub(1));
    let moved = i64::from(position).saturating_add(delta).clamp(0, max);
    // In `0..=u32::MAX` after the clamp.
    u32::try_from(moved).unwrap_or(0)
}
