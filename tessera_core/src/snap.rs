// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stock [`SnapPolicy`] implementations.

use crate::backend::SnapPolicy;
use crate::id::SurfaceId;

/// Never touches snap state; callers set it through
/// [`SurfaceRegistry::set_snap_detected`](crate::surface::SurfaceRegistry::set_snap_detected).
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualSnap;

impl SnapPolicy for ManualSnap {
    fn decide(&mut self, _frame_index: u64, _surface: SurfaceId) -> Option<bool> {
        None
    }
}

/// Snaps the surface at one registry index for a window of frames.
///
/// The target is snapped while `start <= frame_index < end` and unsnapped
/// otherwise; every other surface is left alone. The handheld demo docks
/// surface 1 from frame 100 to frame 300.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameWindowSnap {
    /// Registry index of the surface to snap.
    pub target: u32,
    /// First snapped frame.
    pub start: u64,
    /// First unsnapped frame after the window.
    pub end: u64,
}

impl FrameWindowSnap {
    /// Creates a policy snapping `target` for frames `start..end`.
    #[must_use]
    pub const fn new(target: u32, start: u64, end: u64) -> Self {
        Self { target, start, end }
    }

    /// Surface 1, frames 100 to 300.
    #[must_use]
    pub const fn handheld_demo() -> Self {
        Self::new(1, 100, 300)
    }
}

impl SnapPolicy for FrameWindowSnap {
    fn decide(&mut self, frame_index: u64, surface: SurfaceId) -> Option<bool> {
        (surface.index() == self.target).then_some((self.start..self.end).contains(&frame_index))
    }
}
