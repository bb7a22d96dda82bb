// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `std` host for tessera.
//!
//! This crate implements the collaborator contract from
//! [`tessera_core::backend`] on a desktop host:
//!
//! - [`MonotonicClock`] reads `std::time::Instant` as nanosecond host ticks.
//! - [`SyntheticMotion`] and [`StillSensors`] stand in for inertial hardware.
//! - [`LogSink`] reports frames through `tracing`; [`RawSink`] dumps pixels
//!   to any writer, optionally mirrored onto a fixed output size.
//! - [`Runner`] drives the scheduler with "tick, then fixed sleep" pacing
//!   until a frame limit is reached or a [`StopHandle`] fires.

mod runner;
mod sensors;
mod sinks;
mod time;

pub use runner::{RunSummary, Runner, StopHandle};
pub use sensors::{StillSensors, SyntheticMotion};
pub use sinks::{LogSink, RawSink};
pub use time::{MonotonicClock, now, timebase};
