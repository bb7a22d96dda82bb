// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display surface data model.
//!
//! A *surface* is one independently addressable pixel buffer, standing for a
//! physical or virtual display. Each surface has:
//!
//! - An identity ([`SurfaceId`]), a generational handle that goes stale when
//!   the surface is detached.
//! - A fixed size and a row-major pixel buffer allocated once at attach time.
//! - **Caller-set state**: [`snap_detected`](SurfaceRegistry::set_snap_detected)
//!   (docked surfaces are pinned to the leading edge of the composite) and
//!   [`participating`](SurfaceRegistry::set_participating) (whether the
//!   surface is placed in the composite at all).
//! - **Derived state**: the composite slot index, rewritten by
//!   [`combine`](crate::compositor::combine) every tick from the snap and
//!   participation flags.
//!
//! Surfaces are stored struct-of-arrays style in a bounded table; at most
//! [`EngineConfig::max_surfaces`](crate::config::EngineConfig::max_surfaces)
//! may be attached at once.
//!
//! # Handle discipline
//!
//! Every operation taking a [`SurfaceId`] is strict: a stale or detached
//! handle yields [`Error::InvalidHandle`](crate::Error::InvalidHandle) and
//! changes nothing.

mod registry;

pub use crate::id::SurfaceId;
pub use registry::{SurfaceRegistry, SurfaceSize};
