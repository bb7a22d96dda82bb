// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surfaces, motion-tracked controllers, and horizontal compositing for
//! multi-display frames.
//!
//! `tessera_core` owns a small set of independent pixel surfaces (one per
//! attached display), the controllers bound to them, and the per-frame
//! pipeline that turns raw motion samples into a single composite frame. It
//! is `no_std` compatible (with `alloc`); everything that touches real
//! hardware or the passage of time is injected through the traits in
//! [`backend`].
//!
//! # Architecture
//!
//! ```text
//!   SnapPolicy ──► SurfaceRegistry::set_snap_detected
//!                                │
//!   SensorSource ──► MotionSample ──► ControllerRegistry::apply_motion_sample
//!                                │            (fusion: orientation + cursor)
//!                                ▼
//!   render_surface() for every connected surface (base fill + cursors)
//!                                │
//!                                ▼
//!   combine() ──► CompositeFrame ──► FrameSink::submit
//! ```
//!
//! **[`surface`]**: Arena registry of pixel surfaces with generational
//! handles, snap and participation state, and composite slot indices.
//!
//! **[`controller`]**: Arena registry of controllers: class, binding, cursor,
//! buttons, orientation.
//!
//! **[`fusion`]**: Converts a motion sample into pitch/roll/yaw and an
//! integrated, clamped cursor delta.
//!
//! **[`render`]**: Paints a surface's base color and overlays the cursors of
//! the controllers bound to it.
//!
//! **[`compositor`]**: Orders participating surfaces (snapped first) and
//! concatenates them into a reusable [`CompositeFrame`](compositor::CompositeFrame).
//!
//! **[`scale`]**: Nearest-neighbour rescaling for mirroring a composite onto
//! an output of a different resolution.
//!
//! **[`scheduler`]**: Drives one tick of the pipeline against an
//! [`Engine`](engine::Engine) and a set of collaborators.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-controller
//!   cursor update events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod color;
pub mod compositor;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod id;
pub mod render;
pub mod scale;
pub mod scheduler;
pub mod snap;
pub mod surface;
pub mod time;
pub mod trace;

mod slots;

pub use error::{EntityKind, Error, Result};
