// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Scheduler`](crate::scheduler::Scheduler) calls at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps during a tick and
//! produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`CursorUpdate`] events and the
//!   corresponding `TraceSink` method.

use crate::backend::SinkStatus;
#[cfg(feature = "trace-rich")]
use crate::controller::ControllerId;
use crate::id::SurfaceId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which stage of the tick is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Applying snap decisions.
    Snap,
    /// Reading motion samples and fusing them into cursors.
    Fuse,
    /// Repainting surfaces.
    Render,
    /// Building the composite frame.
    Composite,
    /// Handing the composite to the sink.
    Emit,
}

impl PhaseKind {
    /// All phases in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Snap,
        Self::Fuse,
        Self::Render,
        Self::Composite,
        Self::Emit,
    ];

    /// Lower-case name, as used in trace exports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Snap => "snap",
            Self::Fuse => "fuse",
            Self::Render => "render",
            Self::Composite => "composite",
            Self::Emit => "emit",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Snap => 0,
            Self::Fuse => 1,
            Self::Render => 2,
            Self::Composite => 3,
            Self::Emit => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTickEvent {
    /// Monotonic frame counter (first tick is 1).
    pub frame_index: u64,
    /// Host time when the tick started.
    pub now: HostTime,
    /// Connected surfaces at the start of the tick.
    pub surfaces: u32,
    /// Live controllers (including suspended ones) at the start of the tick.
    pub controllers: u32,
}

/// Marks the beginning of a pipeline phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a pipeline phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted when a snap decision flips a surface's snap state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapChangeEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The surface whose state changed.
    pub surface: SurfaceId,
    /// New snap state.
    pub snapped: bool,
}

/// Emitted after the composite is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
    /// Number of placed surfaces.
    pub placed: u32,
}

/// Emitted after the sink has seen the composite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmitEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of submission.
    pub submitted_at: HostTime,
    /// What the sink answered.
    pub status: SinkStatus,
}

/// Per-tick timing summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time when the tick started.
    pub now: HostTime,
    /// Snap phase duration in ticks (0 if not measured).
    pub snap_ticks: u64,
    /// Fuse phase duration in ticks (0 if not measured).
    pub fuse_ticks: u64,
    /// Render phase duration in ticks (0 if not measured).
    pub render_ticks: u64,
    /// Composite phase duration in ticks (0 if not measured).
    pub composite_ticks: u64,
    /// Emit phase duration in ticks (0 if not measured).
    pub emit_ticks: u64,
    /// Composite width.
    pub width: u32,
    /// Composite height.
    pub height: u32,
    /// Whether the sink refused the frame.
    pub dropped: bool,
}

impl FrameSummary {
    /// Sum of all measured phase durations.
    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.snap_ticks
            .saturating_add(self.fuse_ticks)
            .saturating_add(self.render_ticks)
            .saturating_add(self.composite_ticks)
            .saturating_add(self.emit_ticks)
    }
}

/// One controller's cursor after fusion.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorUpdate {
    /// The fused controller.
    pub controller: ControllerId,
    /// Cursor column after integration.
    pub x: u32,
    /// Cursor row after integration.
    pub y: u32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Roll in degrees.
    pub roll: f32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame pipeline.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of every tick.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called at the beginning of a pipeline phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pipeline phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when a surface's snap state flips.
    fn on_snap_change(&mut self, e: &SnapChangeEvent) {
        _ = e;
    }

    /// Called after the composite is built.
    fn on_composite(&mut self, e: &CompositeEvent) {
        _ = e;
    }

    /// Called after the sink has seen the frame.
    fn on_emit(&mut self, e: &EmitEvent) {
        _ = e;
    }

    /// Called with a per-tick timing summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with every fused cursor (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_cursor_updates(&mut self, frame_index: u64, updates: &[CursorUpdate]) {
        _ = (frame_index, updates);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` method forwarding one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident => $hook:ident($ty:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$hook(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`FrameTickEvent`].
        frame_tick => on_frame_tick(FrameTickEvent)
    );
    forward!(
        /// Emits a [`PhaseBeginEvent`].
        phase_begin => on_phase_begin(PhaseBeginEvent)
    );
    forward!(
        /// Emits a [`PhaseEndEvent`].
        phase_end => on_phase_end(PhaseEndEvent)
    );
    forward!(
        /// Emits a [`SnapChangeEvent`].
        snap_change => on_snap_change(SnapChangeEvent)
    );
    forward!(
        /// Emits a [`CompositeEvent`].
        composite => on_composite(CompositeEvent)
    );
    forward!(
        /// Emits an [`EmitEvent`].
        emit => on_emit(EmitEvent)
    );
    forward!(
        /// Emits a [`FrameSummary`].
        frame_summary => on_frame_summary(FrameSummary)
    );

    /// Emits cursor updates (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn cursor_updates(&mut self, frame_index: u64, updates: &[CursorUpdate]) {
        if let Some(s) = &mut self.sink {
            s.on_cursor_updates(frame_index, updates);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a tick and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: FrameTickEvent,
    phase_starts: [Option<HostTime>; 5],
    phase_ends: [Option<HostTime>; 5],
    width: u32,
    height: u32,
    dropped: bool,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given tick.
    #[must_use]
    pub fn new(tick: &FrameTickEvent) -> Self {
        Self {
            tick: *tick,
            phase_starts: [None; 5],
            phase_ends: [None; 5],
            width: 0,
            height: 0,
            dropped: false,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase.index()] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase.index()] = Some(t);
    }

    /// Records the composite dimensions.
    pub fn set_composite(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Sets whether the sink refused the frame.
    pub fn set_dropped(&mut self, dropped: bool) {
        self.dropped = dropped;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.frame_index,
            now: self.tick.now,
            snap_ticks: self.phase_duration(PhaseKind::Snap),
            fuse_ticks: self.phase_duration(PhaseKind::Fuse),
            render_ticks: self.phase_duration(PhaseKind::Render),
            composite_ticks: self.phase_duration(PhaseKind::Composite),
            emit_ticks: self.phase_duration(PhaseKind::Emit),
            width: self.width,
            height: self.height,
            dropped: self.dropped,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase.index();
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).ticks(),
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick() -> FrameTickEvent {
        FrameTickEvent {
            frame_index: 42,
            now: HostTime(1_000_000),
            surfaces: 2,
            controllers: 3,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_tick(&sample_tick());
        sink.on_emit(&EmitEvent {
            frame_index: 42,
            submitted_at: HostTime(5),
            status: SinkStatus::NotReady,
        });
        sink.on_frame_summary(&FrameSummaryBuilder::new(&sample_tick()).finish());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_tick(&sample_tick());
        tracer.composite(&CompositeEvent {
            frame_index: 42,
            width: 0,
            height: 0,
            placed: 0,
        });
    }

    #[test]
    fn phase_names_and_order() {
        let names: [&str; 5] = PhaseKind::ALL.map(PhaseKind::name);
        assert_eq!(names, ["snap", "fuse", "render", "composite", "emit"]);
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = FrameSummaryBuilder::new(&sample_tick());

        builder.phase_begin(PhaseKind::Snap, HostTime(1_000_000));
        builder.phase_end(PhaseKind::Snap, HostTime(1_000_010));
        builder.phase_begin(PhaseKind::Fuse, HostTime(1_000_010));
        builder.phase_end(PhaseKind::Fuse, HostTime(1_000_100));
        builder.phase_begin(PhaseKind::Render, HostTime(1_000_100));
        builder.phase_end(PhaseKind::Render, HostTime(1_001_600));
        builder.phase_begin(PhaseKind::Composite, HostTime(1_001_600));
        builder.phase_end(PhaseKind::Composite, HostTime(1_002_000));
        builder.phase_begin(PhaseKind::Emit, HostTime(1_002_000));
        builder.phase_end(PhaseKind::Emit, HostTime(1_002_050));
        builder.set_composite(2560, 720);
        builder.set_dropped(true);

        let summary = builder.finish();
        assert_eq!(summary.snap_ticks, 10);
        assert_eq!(summary.fuse_ticks, 90);
        assert_eq!(summary.render_ticks, 1500);
        assert_eq!(summary.composite_ticks, 400);
        assert_eq!(summary.emit_ticks, 50);
        assert_eq!(summary.total_ticks(), 2050);
        assert_eq!((summary.width, summary.height), (2560, 720));
        assert!(summary.dropped);
        assert_eq!(summary.frame_index, 42);
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let summary = FrameSummaryBuilder::new(&sample_tick()).finish();
        assert_eq!(summary.total_ticks(), 0);
        assert!(!summary.dropped);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            snaps: Vec<(u64, bool)>,
        }
        impl TraceSink for RecordingSink {
            fn on_snap_change(&mut self, e: &SnapChangeEvent) {
                self.snaps.push((e.frame_index, e.snapped));
            }
        }

        let mut sink = RecordingSink { snaps: Vec::new() };
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.snap_change(&SnapChangeEvent {
                frame_index: 100,
                surface: SurfaceId {
                    idx: 1,
                    generation: 0,
                },
                snapped: true,
            });
        }
        assert_eq!(sink.snaps, &[(100, true)]);
    }
}
