// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal compositing of participating surfaces.
//!
//! [`combine`] lays out every connected, participating surface side by side,
//! left to right:
//!
//! 1. Snap-detected surfaces first, then the rest. Within each group surfaces
//!    keep attach (index) order.
//! 2. The composite is as wide as the sum of the placed widths and as tall as
//!    the tallest placed surface. Area below a shorter surface keeps the
//!    [`BACKGROUND`] fill.
//! 3. Each placed surface's slot index is rewritten to its position in this
//!    order; the renderer picks its base color from that slot on the next
//!    tick. Connected surfaces that do not participate take the slots after
//!    the placed ones, in attach order, so no two surfaces share a color.
//!
//! The output is a caller-owned [`CompositeFrame`] whose storage is reused
//! from tick to tick.

use alloc::vec::Vec;

use crate::color::{BACKGROUND, Pixel};
use crate::id::SurfaceId;
use crate::surface::SurfaceRegistry;

/// Where one surface landed in a [`CompositeFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The placed surface.
    pub surface: SurfaceId,
    /// Left edge in composite pixels.
    pub x: u32,
    /// Width of the placed surface.
    pub width: u32,
    /// Height of the placed surface.
    pub height: u32,
}

/// A composite frame: pixels plus the layout that produced them.
///
/// Create one with [`CompositeFrame::new`] and pass it to [`combine`] every
/// tick; the pixel and placement buffers are cleared and refilled in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositeFrame {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    placements: Vec<Placement>,
}

impl CompositeFrame {
    /// Creates an empty (0×0) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            placements: Vec::new(),
        }
    }

    /// Composite width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Composite height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, `width * height` long.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Placements in left-to-right order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Returns `true` if no surface was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Surfaces in left-to-right order.
    pub fn order(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.placements.iter().map(|p| p.surface)
    }
}

/// Composites all participating surfaces into `frame`.
///
/// Calling this twice without changing surface state yields identical frames.
/// With nothing participating the frame becomes 0×0 with empty buffers.
pub fn combine(surfaces: &mut SurfaceRegistry, frame: &mut CompositeFrame) {
    frame.placements.clear();

    let mut x = 0_u32;
    let mut height = 0_u32;
    for snapped_pass in [true, false] {
        for id in surfaces.ids() {
            let i = id.idx as usize;
            if !surfaces.participating[i] || surfaces.snap_detected[i] != snapped_pass {
                continue;
            }
            let size = surfaces.size[i];
            frame.placements.push(Placement {
                surface: id,
                x,
                width: size.width,
                height: size.height,
            });
            x = x.saturating_add(size.width);
            height = height.max(size.height);
        }
    }

    frame.width = x;
    frame.height = height;
    let stride = x as usize;
    frame.pixels.clear();
    frame.pixels.resize(stride * height as usize, BACKGROUND);

    for (position, placement) in frame.placements.iter().enumerate() {
        let i = placement.surface.idx as usize;
        let src_width = placement.width as usize;
        let left = placement.x as usize;
        for (row, src) in surfaces.pixels[i].chunks_exact(src_width).enumerate() {
            let start = row * stride + left;
            frame.pixels[start..start + src_width].copy_from_slice(src);
        }
        // At most `capacity` placements.
        surfaces.slot[i] = u32::try_from(position).unwrap_or(u32::MAX);
    }

    // Surfaces left out of the layout take the slots after the placed ones.
    let mut next = u32::try_from(frame.placements.len()).unwrap_or(u32::MAX);
    for idx in 0..surfaces.slot_count() {
        let Some(id) = surfaces.id_at(idx) else {
            continue;
        };
        let i = id.idx as usize;
        if !surfaces.participating[i] {
            surfaces.slot[i] = next;
            next = next.saturating_add(1);
        }
    }
}
