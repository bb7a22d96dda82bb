// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface and controller identity types.
//!
//! Both handles carry a slot index and a generation counter. Detaching an
//! entry bumps the generation of its slot, so a handle kept across a detach
//! (or across the slot being reused) stops validating instead of silently
//! aliasing the new occupant.

use core::fmt;

/// A handle to a surface in a [`SurfaceRegistry`](crate::surface::SurfaceRegistry).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    /// Slot index into the registry's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the registry's generation for this slot.
    pub(crate) generation: u32,
}

impl SurfaceId {
    /// Rebuilds a handle from its raw parts, e.g. when decoding a recording.
    ///
    /// Registries still validate the generation, so a forged handle is
    /// merely stale.
    #[inline]
    #[must_use]
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self {
            idx: index,
            generation,
        }
    }

    /// Returns the raw slot index.
    ///
    /// Surfaces attached to an empty registry get indices 0, 1, 2, ... in
    /// attach order.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({}@gen{})", self.idx, self.generation)
    }
}

/// A handle to a controller in a [`ControllerRegistry`](crate::controller::ControllerRegistry).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ControllerId {
    /// Rebuilds a handle from its raw parts, e.g. when decoding a recording.
    ///
    /// Registries still validate the generation, so a forged handle is
    /// merely stale.
    #[inline]
    #[must_use]
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self {
            idx: index,
            generation,
        }
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControllerId({}@gen{})", self.idx, self.generation)
    }
}
