// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owned state one scheduler drives.

use crate::compositor::CompositeFrame;
use crate::config::EngineConfig;
use crate::controller::ControllerRegistry;
use crate::surface::SurfaceRegistry;

/// Surfaces, controllers, and the reusable composite frame.
///
/// Fields are public so hosts can attach, detach and configure entities
/// between ticks; during a tick the scheduler holds `&mut Engine`, so no
/// other mutation can interleave with it.
#[derive(Debug)]
pub struct Engine {
    /// Attached surfaces.
    pub surfaces: SurfaceRegistry,
    /// Attached controllers.
    pub controllers: ControllerRegistry,
    /// Output of the last composite.
    pub frame: CompositeFrame,
}

impl Engine {
    /// Creates an engine with empty registries sized by `config`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            surfaces: SurfaceRegistry::with_capacity(config.max_surfaces),
            controllers: ControllerRegistry::with_capacity(config.max_controllers),
            frame: CompositeFrame::new(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::handheld())
    }
}
