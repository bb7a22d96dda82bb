// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the clamping and layout laws.

use proptest::prelude::*;
use tessera_core::compositor::{CompositeFrame, combine};
use tessera_core::controller::{ControllerClass, ControllerRegistry, MotionSample};
use tessera_core::surface::SurfaceRegistry;

fn any_axis() -> impl Strategy<Value = f32> {
    prop_oneof![
        -4.0_f32..4.0,
        any::<f32>(),
        Just(0.0),
        Just(f32::NAN),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
    ]
}

fn any_sample() -> impl Strategy<Value = MotionSample> {
    (any_axis(), any_axis(), any_axis(), any_axis()).prop_map(|(ax, ay, az, gz)| MotionSample {
        ax,
        ay,
        az,
        gx: 0.0,
        gy: 0.0,
        gz,
    })
}

/// `(width, height, snapped, participating)` for up to four surfaces.
fn any_layout() -> impl Strategy<Value = Vec<(u32, u32, bool, bool)>> {
    prop::collection::vec((1_u32..24, 1_u32..24, any::<bool>(), any::<bool>()), 0..=4)
}

fn build(layout: &[(u32, u32, bool, bool)]) -> SurfaceRegistry {
    let mut surfaces = SurfaceRegistry::new();
    for (n, &(w, h, snapped, participating)) in layout.iter().enumerate() {
        let id = surfaces.attach_surface(w, h).unwrap();
        surfaces.set_snap_detected(id, snapped).unwrap();
        surfaces.set_participating(id, participating).unwrap();
        // Distinct content per surface.
        surfaces
            .pixels_mut(id)
            .unwrap()
            .fill(0xFF00_0000 | u32::try_from(n).unwrap());
    }
    surfaces
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(
        width in 1_u32..2000,
        height in 1_u32..2000,
        samples in prop::collection::vec(any_sample(), 1..20),
    ) {
        let mut surfaces = SurfaceRegistry::new();
        let s = surfaces.attach_surface(width, height).unwrap();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();

        for sample in samples {
            controllers.apply_motion_sample(c, sample, &surfaces).unwrap();
            let cursor = controllers.cursor(c).unwrap();
            prop_assert!(cursor.x < width, "x {} out of 0..{}", cursor.x, width);
            prop_assert!(cursor.y < height, "y {} out of 0..{}", cursor.y, height);
        }
    }

    #[test]
    fn combine_is_idempotent(layout in any_layout()) {
        let mut surfaces = build(&layout);
        let mut first = CompositeFrame::new();
        combine(&mut surfaces, &mut first);
        let mut second = CompositeFrame::new();
        combine(&mut surfaces, &mut second);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn composite_dimensions(layout in any_layout()) {
        let mut surfaces = build(&layout);
        let mut frame = CompositeFrame::new();
        combine(&mut surfaces, &mut frame);

        let placed = layout.iter().filter(|l| l.3);
        let width: u32 = placed.clone().map(|l| l.0).sum();
        let height = placed.map(|l| l.1).max().unwrap_or(0);
        prop_assert_eq!(frame.width(), width);
        prop_assert_eq!(frame.height(), height);
        prop_assert_eq!(frame.pixels().len(), (width * height) as usize);
    }

    #[test]
    fn snapped_surfaces_are_left_of_unsnapped(layout in any_layout()) {
        let mut surfaces = build(&layout);
        let mut frame = CompositeFrame::new();
        combine(&mut surfaces, &mut frame);

        let snapped: Vec<bool> = frame
            .order()
            .map(|id| surfaces.is_snap_detected(id).unwrap())
            .collect();
        // Once an unsnapped surface appears, no snapped one follows.
        let first_unsnapped = snapped.iter().position(|s| !s).unwrap_or(snapped.len());
        prop_assert!(snapped[first_unsnapped..].iter().all(|s| !s));

        // Within each group, attach order is preserved.
        for group in [true, false] {
            let indices: Vec<u32> = frame
                .order()
                .filter(|&id| surfaces.is_snap_detected(id).unwrap() == group)
                .map(|id| id.index())
                .collect();
            prop_assert!(indices.is_sorted());
        }

        // Slots follow placement order.
        for (position, id) in frame.order().enumerate() {
            prop_assert_eq!(surfaces.slot(id).unwrap(), u32::try_from(position).unwrap());
        }
    }
}
