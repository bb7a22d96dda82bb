// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded struct-of-arrays storage for controllers.

use alloc::vec::Vec;

use super::{Buttons, ControllerClass, Cursor, MotionSample, Orientation};
use crate::config::EngineConfig;
use crate::error::{EntityKind, Error, Result};
use crate::fusion;
use crate::id::{ControllerId, SurfaceId};
use crate::slots::{Allocation, Slots};
use crate::surface::SurfaceRegistry;

/// Struct-of-arrays storage for all attached controllers.
#[derive(Debug)]
pub struct ControllerRegistry {
    class: Vec<ControllerClass>,
    surface: Vec<SurfaceId>,
    cursor: Vec<Cursor>,
    buttons: Vec<Buttons>,
    orientation: Vec<Orientation>,
    last_sample: Vec<MotionSample>,
    connected: Vec<bool>,
    slots: Slots,
}

impl Default for ControllerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerRegistry {
    /// Creates an empty registry with the handheld capacity (8 controllers).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(EngineConfig::handheld().max_controllers)
    }

    /// Creates an empty registry holding at most `capacity` live controllers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            class: Vec::with_capacity(capacity),
            surface: Vec::with_capacity(capacity),
            cursor: Vec::with_capacity(capacity),
            buttons: Vec::with_capacity(capacity),
            orientation: Vec::with_capacity(capacity),
            last_sample: Vec::with_capacity(capacity),
            connected: Vec::with_capacity(capacity),
            slots: Slots::with_capacity(capacity),
        }
    }

    // -- Lifecycle --

    /// Attaches a controller bound to `surface`.
    ///
    /// The cursor starts at the surface center with zero orientation and no
    /// buttons pressed. The binding never changes afterwards.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExceeded`] if the registry is full (checked first).
    /// - [`Error::InvalidHandle`] (surface) if `surface` is not connected.
    pub fn attach_controller(
        &mut self,
        class: ControllerClass,
        surface: SurfaceId,
        surfaces: &SurfaceRegistry,
    ) -> Result<ControllerId> {
        if self.slots.live_count() >= self.slots.capacity() {
            return Err(self.full());
        }
        let (cx, cy) = surfaces.size(surface)?.center();
        let cursor = Cursor::new(cx, cy);

        let (idx, generation) = match self.slots.allocate().ok_or_else(|| self.full())? {
            Allocation::Reused { idx, generation } => {
                let i = idx as usize;
                self.class[i] = class;
                self.surface[i] = surface;
                self.cursor[i] = cursor;
                self.buttons[i] = Buttons::empty();
                self.orientation[i] = Orientation::default();
                self.last_sample[i] = MotionSample::default();
                self.connected[i] = true;
                (idx, generation)
            }
            Allocation::Fresh { idx, generation } => {
                self.class.push(class);
                self.surface.push(surface);
                self.cursor.push(cursor);
                self.buttons.push(Buttons::empty());
                self.orientation.push(Orientation::default());
                self.last_sample.push(MotionSample::default());
                self.connected.push(true);
                (idx, generation)
            }
        };

        Ok(ControllerId { idx, generation })
    }

    /// Detaches a controller; its handle goes stale.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn detach_controller(&mut self, id: ControllerId) -> Result<()> {
        let i = self.validate(id)?;
        self.connected[i] = false;
        self.slots.free(id.idx);
        Ok(())
    }

    // -- Caller-set state --

    /// Suspends (`false`) or resumes (`true`) a controller.
    ///
    /// A suspended controller keeps its cursor and orientation but is skipped
    /// by fusion and rendering.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn set_connected(&mut self, id: ControllerId, connected: bool) -> Result<()> {
        let i = self.validate(id)?;
        self.connected[i] = connected;
        Ok(())
    }

    /// Replaces the pressed-button mask.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn set_buttons(&mut self, id: ControllerId, buttons: Buttons) -> Result<()> {
        let i = self.validate(id)?;
        self.buttons[i] = buttons;
        Ok(())
    }

    /// Fuses one motion sample into the controller's orientation and cursor.
    ///
    /// This is the only operation that moves a cursor. The result is always
    /// clamped to the bound surface, whatever the sample's magnitude.
    /// Suspended controllers and controllers whose surface has been detached
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn apply_motion_sample(
        &mut self,
        id: ControllerId,
        sample: MotionSample,
        surfaces: &SurfaceRegistry,
    ) -> Result<()> {
        let i = self.validate(id)?;
        if !self.connected[i] {
            return Ok(());
        }
        let Ok(bounds) = surfaces.size(self.surface[i]) else {
            // Orphaned.
            return Ok(());
        };

        let orientation = fusion::orientation(&sample);
        self.last_sample[i] = sample;
        self.orientation[i] = orientation;
        self.cursor[i] = fusion::integrate(self.cursor[i], orientation, bounds);
        Ok(())
    }

    // -- Queries --

    /// Returns `true` if `id` is live and not suspended.
    #[must_use]
    pub fn is_connected(&self, id: ControllerId) -> bool {
        self.validate(id).is_ok_and(|i| self.connected[i])
    }

    /// Returns `true` if `id` refers to a live controller, suspended or not.
    #[must_use]
    pub fn contains(&self, id: ControllerId) -> bool {
        self.slots.is_live(id.idx, id.generation)
    }

    /// Returns the surface this controller is bound to.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn surface(&self, id: ControllerId) -> Result<SurfaceId> {
        Ok(self.surface[self.validate(id)?])
    }

    /// Returns the stored cursor position.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn cursor(&self, id: ControllerId) -> Result<Cursor> {
        Ok(self.cursor[self.validate(id)?])
    }

    /// Returns the controller class.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn class(&self, id: ControllerId) -> Result<ControllerClass> {
        Ok(self.class[self.validate(id)?])
    }

    /// Returns the orientation computed from the last fused sample.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn orientation(&self, id: ControllerId) -> Result<Orientation> {
        Ok(self.orientation[self.validate(id)?])
    }

    /// Returns the pressed-button mask.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn buttons(&self, id: ControllerId) -> Result<Buttons> {
        Ok(self.buttons[self.validate(id)?])
    }

    /// Returns the last fused motion sample.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHandle`] if `id` is stale.
    pub fn last_sample(&self, id: ControllerId) -> Result<MotionSample> {
        Ok(self.last_sample[self.validate(id)?])
    }

    /// Returns the live controller at raw slot `idx`, if any.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<ControllerId> {
        self.slots
            .live_generation(idx)
            .map(|generation| ControllerId { idx, generation })
    }

    /// Returns an iterator over live controllers in index order.
    pub fn ids(&self) -> impl Iterator<Item = ControllerId> + '_ {
        (0..self.slots.slot_count()).filter_map(|idx| self.id_at(idx))
    }

    /// Number of raw slots ever used; bounds for [`id_at`](Self::id_at).
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.slots.slot_count()
    }

    /// Number of live controllers, including suspended ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.live_count()
    }

    /// Returns `true` if no controller is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of concurrently attached controllers.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    // -- Internal helpers --

    /// Returns `(class, cursor, orientation)` for every connected controller
    /// bound to `surface`, in index order.
    pub(crate) fn bound_to(
        &self,
        surface: SurfaceId,
    ) -> impl Iterator<Item = (ControllerClass, Cursor, Orientation)> + '_ {
        self.ids().filter_map(move |id| {
            let i = id.idx as usize;
            (self.connected[i] && self.surface[i] == surface)
                .then(|| (self.class[i], self.cursor[i], self.orientation[i]))
        })
    }

    fn validate(&self, id: ControllerId) -> Result<usize> {
        if self.slots.is_live(id.idx, id.generation) {
            Ok(id.idx as usize)
        } else {
            Err(Error::InvalidHandle {
                kind: EntityKind::Controller,
            })
        }
    }

    fn full(&self) -> Error {
        Error::CapacityExceeded {
            kind: EntityKind::Controller,
            capacity: self.slots.capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_surface() -> (SurfaceRegistry, SurfaceId) {
        let mut surfaces = SurfaceRegistry::new();
        let id = surfaces.attach_surface(1280, 720).unwrap();
        (surfaces, id)
    }

    #[test]
    fn attach_starts_at_surface_center() {
        let (surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::LeftHalf, s, &surfaces)
            .unwrap();

        assert_eq!(controllers.cursor(c), Ok(Cursor::new(640, 360)));
        assert_eq!(controllers.surface(c), Ok(s));
        assert_eq!(controllers.class(c), Ok(ControllerClass::LeftHalf));
        assert_eq!(controllers.buttons(c), Ok(Buttons::empty()));
        assert_eq!(controllers.orientation(c), Ok(Orientation::default()));
        assert!(controllers.is_connected(c));
    }

    #[test]
    fn attach_to_missing_surface_is_invalid() {
        let (mut surfaces, s) = one_surface();
        surfaces.detach_surface(s).unwrap();
        let mut controllers = ControllerRegistry::new();
        assert_eq!(
            controllers.attach_controller(ControllerClass::Standard, s, &surfaces),
            Err(Error::InvalidHandle {
                kind: EntityKind::Surface
            })
        );
        assert!(controllers.is_empty());
    }

    #[test]
    fn capacity_is_checked_before_surface() {
        let (mut surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::with_capacity(1);
        controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();
        surfaces.detach_surface(s).unwrap();
        assert_eq!(
            controllers.attach_controller(ControllerClass::Standard, s, &surfaces),
            Err(Error::CapacityExceeded {
                kind: EntityKind::Controller,
                capacity: 1
            })
        );
    }

    #[test]
    fn ninth_controller_exceeds_capacity() {
        let (surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::new();
        for _ in 0..8 {
            controllers
                .attach_controller(ControllerClass::Standard, s, &surfaces)
                .unwrap();
        }
        assert!(matches!(
            controllers.attach_controller(ControllerClass::Standard, s, &surfaces),
            Err(Error::CapacityExceeded { capacity: 8, .. })
        ));
    }

    #[test]
    fn motion_moves_cursor_and_records_sample() {
        let (surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();
        let sample = MotionSample::from_accel(0.0, 1.0, 1.0);

        controllers
            .apply_motion_sample(c, sample, &surfaces)
            .unwrap();
        assert_eq!(controllers.cursor(c), Ok(Cursor::new(640, 585)));
        assert_eq!(controllers.last_sample(c), Ok(sample));
    }

    #[test]
    fn suspended_controller_ignores_motion() {
        let (surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();
        controllers.set_connected(c, false).unwrap();

        controllers
            .apply_motion_sample(c, MotionSample::from_accel(0.0, 1.0, 1.0), &surfaces)
            .unwrap();
        assert_eq!(controllers.cursor(c), Ok(Cursor::new(640, 360)));
        assert!(!controllers.is_connected(c));
        assert!(controllers.contains(c));
    }

    #[test]
    fn orphaned_controller_ignores_motion() {
        let (mut surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();
        surfaces.detach_surface(s).unwrap();

        assert_eq!(
            controllers.apply_motion_sample(c, MotionSample::from_accel(5.0, 5.0, 0.1), &surfaces),
            Ok(())
        );
        assert_eq!(controllers.cursor(c), Ok(Cursor::new(640, 360)));
    }

    #[test]
    fn stale_controller_is_invalid() {
        let (surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::Standard, s, &surfaces)
            .unwrap();
        controllers.detach_controller(c).unwrap();

        let invalid = Err(Error::InvalidHandle {
            kind: EntityKind::Controller,
        });
        assert_eq!(
            controllers.apply_motion_sample(c, MotionSample::LEVEL, &surfaces),
            invalid
        );
        assert_eq!(controllers.set_buttons(c, Buttons::A), invalid);
        assert_eq!(controllers.detach_controller(c), invalid);
    }

    #[test]
    fn buttons_round_trip() {
        let (surfaces, s) = one_surface();
        let mut controllers = ControllerRegistry::new();
        let c = controllers
            .attach_controller(ControllerClass::RightHalf, s, &surfaces)
            .unwrap();
        controllers
            .set_buttons(c, Buttons::A | Buttons::ZR)
            .unwrap();
        assert_eq!(controllers.buttons(c), Ok(Buttons::A | Buttons::ZR));
    }

    #[test]
    fn bound_to_filters_surface_and_connection() {
        let mut surfaces = SurfaceRegistry::new();
        let s0 = surfaces.attach_surface(10, 10).unwrap();
        let s1 = surfaces.attach_surface(10, 10).unwrap();
        let mut controllers = ControllerRegistry::new();
        let a = controllers
            .attach_controller(ControllerClass::LeftHalf, s0, &surfaces)
            .unwrap();
        controllers
            .attach_controller(ControllerClass::Standard, s1, &surfaces)
            .unwrap();
        controllers
            .attach_controller(ControllerClass::RightHalf, s0, &surfaces)
            .unwrap();
        controllers.set_connected(a, false).unwrap();

        let classes: Vec<_> = controllers.bound_to(s0).map(|(class, ..)| class).collect();
        assert_eq!(classes, [ControllerClass::RightHalf]);
    }
}
