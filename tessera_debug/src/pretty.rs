// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use tessera_core::backend::SinkStatus;
use tessera_core::time::{HostTime, Timebase};
use tessera_core::trace::{
    CompositeEvent, CursorUpdate, EmitEvent, FrameSummary, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, SnapChangeEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    phases: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("phases", &self.phases)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::with_writer(Box::new(std::io::stderr()), timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            phases: true,
        }
    }

    /// Suppresses per-phase begin/end lines; summaries still carry the
    /// durations.
    #[must_use]
    pub fn without_phases(mut self) -> Self {
        self.phases = false;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ticks_to_us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.ticks_to_us(t.ticks())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} now={:.1}µs surfaces={} controllers={}",
            e.frame_index,
            self.host_us(e.now),
            e.surfaces,
            e.controllers,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        if !self.phases {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        if !self.phases {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            self.host_us(e.timestamp),
        );
    }

    fn on_snap_change(&mut self, e: &SnapChangeEvent) {
        let what = if e.snapped { "snapped" } else { "unsnapped" };
        let _ = writeln!(
            self.writer,
            "[snap] frame={} surface={} {what}",
            e.frame_index,
            e.surface.index(),
        );
    }

    fn on_composite(&mut self, e: &CompositeEvent) {
        let _ = writeln!(
            self.writer,
            "[composite] frame={} {}x{} placed={}",
            e.frame_index, e.width, e.height, e.placed,
        );
    }

    fn on_emit(&mut self, e: &EmitEvent) {
        let status = match e.status {
            SinkStatus::Accepted => "accepted",
            SinkStatus::NotReady => "DROPPED",
        };
        let _ = writeln!(
            self.writer,
            "[emit] frame={} at {:.1}µs {status}",
            e.frame_index,
            self.host_us(e.submitted_at),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let dropped = if s.dropped { "DROPPED" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} snap={:.1}µs fuse={:.1}µs render={:.1}µs \
             composite={:.1}µs emit={:.1}µs size={}x{} output={dropped}",
            s.frame_index,
            self.ticks_to_us(s.snap_ticks),
            self.ticks_to_us(s.fuse_ticks),
            self.ticks_to_us(s.render_ticks),
            self.ticks_to_us(s.composite_ticks),
            self.ticks_to_us(s.emit_ticks),
            s.width,
            s.height,
        );
    }

    fn on_cursor_updates(&mut self, frame_index: u64, updates: &[CursorUpdate]) {
        for u in updates {
            let _ = writeln!(
                self.writer,
                "[cursor] frame={frame_index} controller={} at ({}, {}) pitch={:.1}° roll={:.1}°",
                u.controller.index(),
                u.x,
                u.y,
                u.pitch,
                u.roll,
            );
        }
    }
}
