// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded struct-of-arrays storage for surfaces.

use alloc::vec::Vec;

use crate::color::Pixel;
use crate::config::EngineConfig;
use crate::error::{EntityKind, Error, Result};
use crate::id::SurfaceId;
use crate::slots::{Allocation, Slots};

/// Width and height of a surface in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the pixel in the middle of the surface (rounded down).
    #[must_use]
    pub const fn center(self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// Returns `width * height`, or `None` if it does not fit in `usize`.
    #[must_use]
    pub fn pixel_count(self) -> Option<usize> {
        usize::try_from(self.width)
            .ok()?
            .checked_mul(usize::try_from(self.height).ok()?)
    }
}

/// Struct-of-arrays storage for all attached surfaces.
///
/// Surfaces are addressed by [`SurfaceId`] handles. Detached surfaces release
/// their buffer immediately; their slot is recycled by a later attach with a
/// bumped generation.
#[derive(Debug)]
pub struct SurfaceRegistry {
    pub(crate) size: Vec<SurfaceSize>,
    pub(crate) pixels: Vec<Vec<Pixel>>,
    pub(crate) participating: Vec<bool>,
    pub(crate) snap_detected: Vec<bool>,
    pub(crate) slot: Vec<u32>,
    slots: Slots,
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceRegistry {
    /// Creates an empty registry with the handheld capacity (4 surfaces).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(EngineConfig::handheld().max_surfaces)
    }

    /// Creates an empty registry holding at most `capacity` live surfaces.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            size: Vec::with_capacity(capacity),
            pixels: Vec::with_capacity(capacity),
            participating: Vec::with_capacity(capacity),
            snap_detected: Vec::with_capacity(capacity),
            slot: Vec::with_capacity(capacity),
            slots: Slots::with_capacity(capacity),
        }
    }

    // -- Lifecycle --

    /// Attaches a new surface of the given size and returns its handle.
    ///
    /// The surface starts connected, participating in the composite, not
    /// snap-detected, and in the lowest composite slot no other surface
    /// occupies.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExceeded`] if the registry is full.
    /// - [`Error::EmptySurface`] if either dimension is zero.
    /// - [`Error::AllocationFailure`] if the pixel buffer cannot be obtained.
    ///
    /// On error the registry is left untouched.
    pub fn attach_surface(&mut self, width: u32, height: u32) -> Result<SurfaceId> {
        if self.slots.live_count() >= self.slots.capacity() {
            return Err(self.full());
        }
        if width == 0 || height == 0 {
            return Err(Error::EmptySurface { width, height });
        }

        let size = SurfaceSize::new(width, height);
        let buffer = allocate_pixels(size)?;
        let slot = self.lowest_free_composite_slot();

        let (idx, generation) = match self.slots.allocate().ok_or_else(|| self.full())? {
            Allocation::Reused { idx, generation } => {
                let i = idx as usize;
                self.size[i] = size;
                self.pixels[i] = buffer;
                self.participating[i] = true;
                self.snap_detected[i] = false;
                self.slot[i] = slot;
                (idx, generation)
            }
            Allocation::Fresh { idx, generation } => {
                self.size.push(size);
                self.pixels.push(buffer);
                self.participating.push(true);
                self.snap_detected.push(false);
                self.slot.push(slot);
                (idx, generation)
            }
        };

        Ok(SurfaceId { idx, generation })
    }

    /// Detaches a surface and releases its pixel buffer.
    ///
    /// Controllers bound to it become orphaned: they are skipped by fusion
    /// and rendering until detached themselves.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn detach_surface(&mut self, id: SurfaceId) -> Result<()> {
        let i = self.validate(id)?;
        self.pixels[i] = Vec::new();
        self.snap_detected[i] = false;
        self.slots.free(id.idx);
        Ok(())
    }

    // -- Caller-set state --

    /// Marks a surface as docked (snap-detected) or not.
    ///
    /// Snap-detected surfaces are placed before all others in the composite.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn set_snap_detected(&mut self, id: SurfaceId, snapped: bool) -> Result<()> {
        let i = self.validate(id)?;
        self.snap_detected[i] = snapped;
        Ok(())
    }

    /// Includes or excludes a surface from the composite.
    ///
    /// Excluded surfaces are still rendered; they take no space in the
    /// composite and are given a slot after every placed surface.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn set_participating(&mut self, id: SurfaceId, participating: bool) -> Result<()> {
        let i = self.validate(id)?;
        self.participating[i] = participating;
        Ok(())
    }

    // -- Queries --

    /// Returns whether `id` refers to a connected surface.
    #[must_use]
    pub fn is_connected(&self, id: SurfaceId) -> bool {
        self.slots.is_live(id.idx, id.generation)
    }

    /// Returns the size of a surface.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn size(&self, id: SurfaceId) -> Result<SurfaceSize> {
        Ok(self.size[self.validate(id)?])
    }

    /// Returns the composite slot index assigned by the last
    /// [`combine`](crate::compositor::combine) (or at attach time).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn slot(&self, id: SurfaceId) -> Result<u32> {
        Ok(self.slot[self.validate(id)?])
    }

    /// Returns whether a surface is snap-detected.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn is_snap_detected(&self, id: SurfaceId) -> Result<bool> {
        Ok(self.snap_detected[self.validate(id)?])
    }

    /// Returns whether a surface participates in the composite.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn is_participating(&self, id: SurfaceId) -> Result<bool> {
        Ok(self.participating[self.validate(id)?])
    }

    /// Returns a surface's pixels, row-major.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn pixels(&self, id: SurfaceId) -> Result<&[Pixel]> {
        let i = self.validate(id)?;
        Ok(&self.pixels[i])
    }

    /// Returns a surface's pixels for writing, row-major.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn pixels_mut(&mut self, id: SurfaceId) -> Result<&mut [Pixel]> {
        let i = self.validate(id)?;
        Ok(&mut self.pixels[i])
    }

    /// Returns the live surface at raw slot `idx`, if any.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<SurfaceId> {
        self.slots
            .live_generation(idx)
            .map(|generation| SurfaceId { idx, generation })
    }

    /// Returns an iterator over connected surfaces in attach (index) order.
    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        (0..self.slots.slot_count()).filter_map(|idx| self.id_at(idx))
    }

    /// Number of raw slots ever used; bounds for [`id_at`](Self::id_at).
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.slots.slot_count()
    }

    /// Number of connected surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.live_count()
    }

    /// Returns `true` if no surface is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of concurrently connected surfaces.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    // -- Internal helpers --

    /// Returns the array index for a live handle.
    pub(crate) fn validate(&self, id: SurfaceId) -> Result<usize> {
        if self.slots.is_live(id.idx, id.generation) {
            Ok(id.idx as usize)
        } else {
            Err(Error::InvalidHandle {
                kind: EntityKind::Surface,
            })
        }
    }

    fn full(&self) -> Error {
        Error::CapacityExceeded {
            kind: EntityKind::Surface,
            capacity: self.slots.capacity(),
        }
    }

    fn lowest_free_composite_slot(&self) -> u32 {
        let mut candidate = 0;
        while self.ids().any(|id| self.slot[id.idx as usize] == candidate) {
            candidate += 1;
        }
        candidate
    }
}

/// Fallibly allocates a zeroed buffer for `size`.
fn allocate_pixels(size: SurfaceSize) -> Result<Vec<Pixel>> {
    let failure = Error::AllocationFailure {
        width: size.width,
        height: size.height,
    };
    let count = size.pixel_count().ok_or(failure)?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(count).map_err(|_| failure)?;
    buffer.resize(count, 0);
    Ok(buffer)
}
