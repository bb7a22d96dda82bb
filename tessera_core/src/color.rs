// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel format and the fixed palette used by the renderer and compositor.
//!
//! Pixels are packed `0xAARRGGBB` values, one `u32` per pixel, row-major.

use crate::controller::ControllerClass;

/// One packed ARGB pixel.
pub type Pixel = u32;

/// Fill for composite regions no surface covers (height shortfall).
pub const BACKGROUND: Pixel = 0xFF10_1010;

/// Cursor color for [`ControllerClass::Standard`].
pub const CURSOR_STANDARD: Pixel = 0xFFFF_FFFF;

/// Cursor color for [`ControllerClass::LeftHalf`].
pub const CURSOR_LEFT: Pixel = 0xFFFF_0000;

/// Cursor color for [`ControllerClass::RightHalf`].
pub const CURSOR_RIGHT: Pixel = 0xFF00_00FF;

/// Base color for a surface in composite slot `slot`.
///
/// `(slot + 1) * 60` is shifted into the red byte and `(slot + 1) * 80` into
/// the green byte. The products are OR-ed unmasked, so for slot 3 the green
/// term carries into the red byte; the mapping stays injective for every
/// slot a four-surface registry can produce.
#[must_use]
pub const fn slot_color(slot: u32) -> Pixel {
    let n = slot.wrapping_add(1);
    0xFF00_0000 | (n.wrapping_mul(60) << 16) | (n.wrapping_mul(80) << 8)
}

/// Cursor color for a controller class.
#[must_use]
pub const fn cursor_color(class: ControllerClass) -> Pixel {
    match class {
        ControllerClass::Standard => CURSOR_STANDARD,
        ControllerClass::LeftHalf => CURSOR_LEFT,
        ControllerClass::RightHalf => CURSOR_RIGHT,
    }
}
