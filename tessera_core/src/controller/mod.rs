// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Motion-tracked controllers.
//!
//! A controller is bound to exactly one surface for its whole life and
//! contributes a cursor overlay to that surface. Its orientation and cursor
//! are written only by [`ControllerRegistry::apply_motion_sample`]; rendering
//! only reads them.
//!
//! Controllers can be suspended with
//! [`set_connected(id, false)`](ControllerRegistry::set_connected) (airplane
//! mode) without losing their handle or cursor; suspended controllers are
//! skipped by fusion and rendering. A controller whose surface was detached
//! is *orphaned* and likewise skipped.

mod registry;

use bitflags::bitflags;

pub use crate::id::ControllerId;
pub use registry::ControllerRegistry;

/// Physical form of a controller; selects its cursor color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControllerClass {
    /// A full, standalone controller.
    #[default]
    Standard,
    /// The left half of a split controller pair.
    LeftHalf,
    /// The right half of a split controller pair.
    RightHalf,
}

bitflags! {
    /// Pressed-button mask.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u16 {
        /// Face button A.
        const A = 1 << 0;
        /// Face button B.
        const B = 1 << 1;
        /// Face button X.
        const X = 1 << 2;
        /// Face button Y.
        const Y = 1 << 3;
        /// Left shoulder.
        const L = 1 << 4;
        /// Right shoulder.
        const R = 1 << 5;
        /// Left trigger.
        const ZL = 1 << 6;
        /// Right trigger.
        const ZR = 1 << 7;
        /// Minus / select.
        const MINUS = 1 << 8;
        /// Plus / start.
        const PLUS = 1 << 9;
        /// Home.
        const HOME = 1 << 10;
        /// Capture.
        const CAPTURE = 1 << 11;
    }
}

/// One tick's raw reading from a controller's inertial sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionSample {
    /// Accelerometer, x axis.
    pub ax: f32,
    /// Accelerometer, y axis.
    pub ay: f32,
    /// Accelerometer, z axis.
    pub az: f32,
    /// Gyroscope, x axis.
    pub gx: f32,
    /// Gyroscope, y axis.
    pub gy: f32,
    /// Gyroscope, z axis.
    pub gz: f32,
}

impl MotionSample {
    /// A controller lying flat and still: gravity on +z, no rotation.
    pub const LEVEL: Self = Self {
        ax: 0.0,
        ay: 0.0,
        az: 1.0,
        gx: 0.0,
        gy: 0.0,
        gz: 0.0,
    };

    /// Sample with only an accelerometer reading.
    #[must_use]
    pub const fn from_accel(ax: f32, ay: f32, az: f32) -> Self {
        Self {
            ax,
            ay,
            az,
            gx: 0.0,
            gy: 0.0,
            gz: 0.0,
        }
    }
}

/// Orientation derived from the last motion sample, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about the x axis.
    pub pitch: f32,
    /// Rotation about the y axis.
    pub roll: f32,
    /// Raw z-axis gyro rate.
    pub yaw: f32,
}

/// Cursor position in pixels on the bound surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Column, `0..width`.
    pub x: u32,
    /// Row, `0..height`.
    pub y: u32,
}

impl Cursor {
    /// Creates a cursor.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}
