// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface rendering: base fill plus controller cursor overlays.
//!
//! Each surface is painted from scratch every tick. The base color comes from
//! the surface's composite slot as assigned by the previous
//! [`combine`](crate::compositor::combine) (or at attach time), so a surface
//! that moves position in the composite changes color one tick later.
//!
//! Each cursor is drawn as a single pixel at the stored cursor position plus
//! a display-only *nudge* of `round(tilt * NUDGE_GAIN)`. The nudge is not
//! written back to the controller.

use crate::color::{self, Pixel};
use crate::controller::{ControllerRegistry, Cursor};
use crate::error::Result;
use crate::fusion;
use crate::id::SurfaceId;
use crate::surface::{SurfaceRegistry, SurfaceSize};

/// Pixels of render-time nudge per degree of tilt.
pub const NUDGE_GAIN: f64 = 10.0;

/// Repaints one surface and overlays the cursors bound to it.
///
/// Controllers are drawn in registry order, so where two cursors land on the
/// same pixel the later controller wins. Suspended controllers are skipped.
///
/// # Errors
///
/// [`Error::InvalidHandle`](crate::Error::InvalidHandle) if `id` is stale.
pub fn render_surface(
    surfaces: &mut SurfaceRegistry,
    controllers: &ControllerRegistry,
    id: SurfaceId,
) -> Result<()> {
    let i = surfaces.validate(id)?;
    let size = surfaces.size[i];
    let base = color::slot_color(surfaces.slot[i]);
    let pixels = &mut surfaces.pixels[i];

    pixels.fill(base);
    for (class, cursor, orientation) in controllers.bound_to(id) {
        let offset = fusion::tilt_offset(orientation, NUDGE_GAIN);
        let at = fusion::offset_clamped(cursor, offset, size);
        put_pixel(pixels, size, at, color::cursor_color(class));
    }
    Ok(())
}

fn put_pixel(pixels: &mut [Pixel], size: SurfaceSize, at: Cursor, value: Pixel) {
    let offset = at.y as usize * size.width as usize + at.x as usize;
    if let Some(p) = pixels.get_mut(offset) {
        *p = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{CURSOR_LEFT, CURSOR_RIGHT, CURSOR_STANDARD, slot_color};
    use crate::controller::{ControllerClass, MotionSample};
    use crate::error::{EntityKind, Error};

    fn pixel(surfaces: &SurfaceRegistry, id: SurfaceId, x: usize, y: usize) -> Pixel {
        let width = surfaces.size(id).unwrap().width as usize;
        surfaces.pixels(id).unwrap()[y * width + x]
    }

    #[test]
    fn fills_with_slot_color_and_draws_cursor_at_center() {
        let mut surfaces = SurfaceRegistry::new();
        let s = surfaces.attach_surface(64, 32).unwrap();
        let mut controllers = ControllerRegistry::new();
        controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();

        render_surface(&mut surfaces, &controllers, s).unwrap();

        assert_eq!(pixel(&surfaces, s, 0, 0), slot_color(0));
        assert_eq!(pixel(&surfaces, s, 63, 31), slot_color(0));
        assert_eq!(pixel(&surfaces, s, 32, 16), CURSOR_STANDARD);
        let cursors = surfaces
            .pixels(s)
            .unwrap()
            .iter()
            .filter(|&&p| p != slot_color(0))
            .count();
        assert_eq!(cursors, 1);
    }

    #[test]
    fn later_controller_wins_a_shared_pixel() {
        let mut surfaces = SurfaceRegistry::new();
        let s = surfaces.attach_surface(16, 16).unwrap();
        let mut controllers = ControllerRegistry::new();
        controllers
            .attach_controller(ControllerClass::LeftHalf, s, &surfaces)
            .unwrap();
        controllers
            .attach_controller(ControllerClass::RightHalf, s, &surfaces)
            .unwrap();

        render_surface(&mut surfaces, &controllers, s).unwrap();
        assert_eq!(pixel(&surfaces, s, 8, 8), CURSOR_RIGHT);
        assert_ne!(pixel(&surfaces, s, 8, 8), CURSOR_LEFT);
    }

    #[test]
    fn nudge_is_drawn_but_not_stored() {
        let mut surfaces = SurfaceRegistry::new();
        let s = surfaces.attach_surface(1280, 720).unwrap();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();
        // 45 degrees of roll to the left: integration moves x by -225, the
        // nudge by a further -450.
        controllers
            .apply_motion_sample(c, MotionSample::from_accel(1.0, 0.0, 1.0), &surfaces)
            .unwrap();
        assert_eq!(controllers.cursor(c), Ok(Cursor::new(415, 360)));

        render_surface(&mut surfaces, &controllers, s).unwrap();
        assert_eq!(pixel(&surfaces, s, 0, 360), CURSOR_STANDARD);
        assert_eq!(controllers.cursor(c), Ok(Cursor::new(415, 360)));
    }

    #[test]
    fn suspended_and_foreign_controllers_are_not_drawn() {
        let mut surfaces = SurfaceRegistry::new();
        let s0 = surfaces.attach_surface(8, 8).unwrap();
        let s1 = surfaces.attach_surface(8, 8).unwrap();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::Standard, s0, &surfaces)
            .unwrap();
        controllers
            .attach_controller(ControllerClass::LeftHalf, s1, &surfaces)
            .unwrap();
        controllers.set_connected(c, false).unwrap();

        render_surface(&mut surfaces, &controllers, s0).unwrap();
        assert!(
            surfaces
                .pixels(s0)
                .unwrap()
                .iter()
                .all(|&p| p == slot_color(0))
        );
    }

    #[test]
    fn stale_surface_is_invalid() {
        let mut surfaces = SurfaceRegistry::new();
        let s = surfaces.attach_surface(8, 8).unwrap();
        surfaces.detach_surface(s).unwrap();
        assert_eq!(
            render_surface(&mut surfaces, &ControllerRegistry::new(), s),
            Err(Error::InvalidHandle {
                kind: EntityKind::Surface
            })
        );
    }
}
