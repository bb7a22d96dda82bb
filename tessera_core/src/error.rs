// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised on the attach/detach path.
//!
//! Nothing in the steady-state tick (sensing, fusion, rendering,
//! compositing) produces an error: the scheduler walks live handles only and
//! skips entities that vanished between ticks.

use core::fmt;

/// Which registry an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A display surface.
    Surface,
    /// A motion-tracked controller.
    Controller,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Surface => "surface",
            Self::Controller => "controller",
        })
    }
}

/// Errors returned by registry and renderer operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The registry already holds its maximum number of live entries.
    ///
    /// Callers should reject the hotplug event or retry after a detach.
    #[error("{kind} table is full (capacity {capacity})")]
    CapacityExceeded {
        /// Which registry is full.
        kind: EntityKind,
        /// The registry's capacity.
        capacity: usize,
    },
    /// The handle does not refer to a live entry (never attached, or detached
    /// since). Not retryable.
    #[error("invalid or stale {kind} handle")]
    InvalidHandle {
        /// Which registry the handle belongs to.
        kind: EntityKind,
    },
    /// The pixel buffer for a new surface could not be allocated.
    ///
    /// Only the attach fails; surfaces already present keep running.
    #[error("could not allocate a {width}x{height} pixel buffer")]
    AllocationFailure {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// A surface was requested with a zero width or height.
    #[error("surface size {width}x{height} has no pixels")]
    EmptySurface {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
