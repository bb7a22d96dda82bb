// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One pass of the frame pipeline.
//!
//! [`Scheduler::tick`] runs, strictly in order:
//!
//! 1. **Snap**: ask the [`SnapPolicy`](crate::backend::SnapPolicy) about every
//!    connected surface and apply the answers.
//! 2. **Fuse**: read one sample per connected, bound controller and fuse it
//!    into orientation and cursor.
//! 3. **Render**: repaint every connected surface.
//! 4. **Composite**: [`combine`] into the engine's frame.
//! 5. **Emit**: hand the frame to the [`FrameSink`](crate::backend::FrameSink).
//!
//! Each phase is timestamped through the [`Clock`](crate::backend::Clock)
//! and reported to the [`Tracer`]. Pacing is the host's job; see
//! [`PacingConfig`](crate::config::PacingConfig).
//!
//! The tick never fails. It walks raw registry slots and skips whatever is no
//! longer live, so entities detached between ticks simply drop out.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::backend::{FrameIo, SinkStatus};
use crate::compositor::combine;
use crate::engine::Engine;
use crate::render::render_surface;
#[cfg(feature = "trace-rich")]
use crate::trace::CursorUpdate;
use crate::trace::{
    CompositeEvent, EmitEvent, FrameSummary, FrameSummaryBuilder, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, SnapChangeEvent, Tracer,
};

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Frame counter of this tick.
    pub frame_index: u64,
    /// Surfaces whose snap state flipped.
    pub snap_changes: u32,
    /// Controllers that received a motion sample.
    pub controllers_fused: u32,
    /// Surfaces repainted.
    pub surfaces_rendered: u32,
    /// Composite width.
    pub width: u32,
    /// Composite height.
    pub height: u32,
    /// What the sink answered.
    pub status: SinkStatus,
    /// Phase timings.
    pub summary: FrameSummary,
}

/// Running totals across ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Ticks run.
    pub ticks: u64,
    /// Frames the sink accepted.
    pub frames_accepted: u64,
    /// Frames the sink refused with [`SinkStatus::NotReady`].
    pub frames_dropped: u64,
}

/// Drives the pipeline one tick at a time.
///
/// # Usage
///
/// ```rust,ignore
/// let mut io = FrameIo { sensors, snap, sink, clock };
/// loop {
///     let report = scheduler.tick(&mut engine, &mut io, &mut tracer);
///     sleep(pacing.pause);
/// }
/// ```
#[derive(Debug, Default)]
pub struct Scheduler {
    frame_index: u64,
    stats: SchedulerStats,
    #[cfg(feature = "trace-rich")]
    cursor_updates: Vec<CursorUpdate>,
}

impl Scheduler {
    /// Creates a scheduler whose first tick is frame 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame counter of the most recent tick (0 before the first).
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Running totals.
    #[must_use]
    pub const fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Runs snap, fuse, render, composite and emit once.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "registry sizes are bounded by small configured capacities"
    )]
    pub fn tick(
        &mut self,
        engine: &mut Engine,
        io: &mut FrameIo<'_>,
        tracer: &mut Tracer<'_>,
    ) -> TickReport {
        self.frame_index = self.frame_index.saturating_add(1);
        let frame_index = self.frame_index;

        let tick = FrameTickEvent {
            frame_index,
            now: io.clock.now(),
            surfaces: engine.surfaces.len() as u32,
            controllers: engine.controllers.len() as u32,
        };
        tracer.frame_tick(&tick);
        let mut summary = FrameSummaryBuilder::new(&tick);
        let mut phase = PhaseClock {
            frame_index,
            io,
            tracer: &mut *tracer,
            summary: &mut summary,
        };

        // -- Snap --
        phase.begin(PhaseKind::Snap);
        let mut snap_changes = 0;
        for idx in 0..engine.surfaces.slot_count() {
            let Some(id) = engine.surfaces.id_at(idx) else {
                continue;
            };
            let Some(snapped) = phase.io.snap.decide(frame_index, id) else {
                continue;
            };
            if engine.surfaces.is_snap_detected(id) == Ok(snapped) {
                continue;
            }
            if engine.surfaces.set_snap_detected(id, snapped).is_ok() {
                snap_changes += 1;
                phase.tracer.snap_change(&SnapChangeEvent {
                    frame_index,
                    surface: id,
                    snapped,
                });
            }
        }
        phase.end(PhaseKind::Snap);

        // -- Fuse --
        phase.begin(PhaseKind::Fuse);
        #[cfg(feature = "trace-rich")]
        self.cursor_updates.clear();
        let mut controllers_fused = 0;
        for idx in 0..engine.controllers.slot_count() {
            let Some(id) = engine.controllers.id_at(idx) else {
                continue;
            };
            if !engine.controllers.is_connected(id) {
                continue;
            }
            let bound = engine.controllers.surface(id);
            if !bound.is_ok_and(|s| engine.surfaces.is_connected(s)) {
                continue;
            }
            let sample = phase.io.sensors.sample(id);
            if engine
                .controllers
                .apply_motion_sample(id, sample, &engine.surfaces)
                .is_ok()
            {
                controllers_fused += 1;
                #[cfg(feature = "trace-rich")]
                if let (Ok(cursor), Ok(o)) = (
                    engine.controllers.cursor(id),
                    engine.controllers.orientation(id),
                ) {
                    self.cursor_updates.push(CursorUpdate {
                        controller: id,
                        x: cursor.x,
                        y: cursor.y,
                        pitch: o.pitch,
                        roll: o.roll,
                    });
                }
            }
        }
        #[cfg(feature = "trace-rich")]
        phase
            .tracer
            .cursor_updates(frame_index, &self.cursor_updates);
        phase.end(PhaseKind::Fuse);

        // -- Render --
        phase.begin(PhaseKind::Render);
        let mut surfaces_rendered = 0;
        for idx in 0..engine.surfaces.slot_count() {
            let Some(id) = engine.surfaces.id_at(idx) else {
                continue;
            };
            if render_surface(&mut engine.surfaces, &engine.controllers, id).is_ok() {
                surfaces_rendered += 1;
            }
        }
        phase.end(PhaseKind::Render);

        // -- Composite --
        phase.begin(PhaseKind::Composite);
        combine(&mut engine.surfaces, &mut engine.frame);
        let (width, height) = (engine.frame.width(), engine.frame.height());
        phase.tracer.composite(&CompositeEvent {
            frame_index,
            width,
            height,
            placed: engine.frame.placements().len() as u32,
        });
        phase.summary.set_composite(width, height);
        phase.end(PhaseKind::Composite);

        // -- Emit --
        phase.begin(PhaseKind::Emit);
        let submitted_at = phase.io.clock.now();
        let status = phase.io.sink.submit(&engine.frame);
        phase.tracer.emit(&EmitEvent {
            frame_index,
            submitted_at,
            status,
        });
        phase.summary.set_dropped(status == SinkStatus::NotReady);
        phase.end(PhaseKind::Emit);

        let summary = summary.finish();
        tracer.frame_summary(&summary);

        self.stats.ticks += 1;
        match status {
            SinkStatus::Accepted => self.stats.frames_accepted += 1,
            SinkStatus::NotReady => self.stats.frames_dropped += 1,
        }

        TickReport {
            frame_index,
            snap_changes,
            controllers_fused,
            surfaces_rendered,
            width,
            height,
            status,
            summary,
        }
    }
}

/// Timestamps phase boundaries into both the tracer and the summary.
struct PhaseClock<'p, 'io, 't> {
    frame_index: u64,
    io: &'p mut FrameIo<'io>,
    tracer: &'p mut Tracer<'t>,
    summary: &'p mut FrameSummaryBuilder,
}

impl PhaseClock<'_, '_, '_> {
    fn begin(&mut self, phase: PhaseKind) {
        let timestamp = self.io.clock.now();
        self.summary.phase_begin(phase, timestamp);
        self.tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase,
            timestamp,
        });
    }

    fn end(&mut self, phase: PhaseKind) {
        let timestamp = self.io.clock.now();
        self.summary.phase_end(phase, timestamp);
        self.tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase,
            timestamp,
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::backend::{FrameSink, SensorSource, StepClock};
    use crate::color::{CURSOR_STANDARD, slot_color};
    use crate::compositor::CompositeFrame;
    use crate::controller::{ControllerClass, ControllerId, MotionSample};
    use crate::snap::{FrameWindowSnap, ManualSnap};

    struct Still;

    impl SensorSource for Still {
        fn sample(&mut self, _: ControllerId) -> MotionSample {
            MotionSample::LEVEL
        }
    }

    #[derive(Default)]
    struct Collect {
        sizes: Vec<(u32, u32)>,
        refuse: bool,
    }

    impl FrameSink for Collect {
        fn submit(&mut self, frame: &CompositeFrame) -> SinkStatus {
            if self.refuse {
                return SinkStatus::NotReady;
            }
            self.sizes.push((frame.width(), frame.height()));
            SinkStatus::Accepted
        }
    }

    #[test]
    fn first_tick_renders_and_emits() {
        let mut engine = Engine::default();
        let s0 = engine.surfaces.attach_surface(8, 4).unwrap();
        let s1 = engine.surfaces.attach_surface(6, 4).unwrap();
        engine
            .controllers
            .attach_controller(ControllerClass::Standard, s1, &engine.surfaces)
            .unwrap();

        let (mut sensors, mut snap, mut sink) = (Still, ManualSnap, Collect::default());
        let clock = StepClock::new(0, 1);
        let mut io = FrameIo {
            sensors: &mut sensors,
            snap: &mut snap,
            sink: &mut sink,
            clock: &clock,
        };
        let mut scheduler = Scheduler::new();
        let report = scheduler.tick(&mut engine, &mut io, &mut Tracer::none());

        assert_eq!(report.frame_index, 1);
        assert_eq!(report.controllers_fused, 1);
        assert_eq!(report.surfaces_rendered, 2);
        assert_eq!((report.width, report.height), (14, 4));
        assert_eq!(report.status, SinkStatus::Accepted);
        assert_eq!(engine.frame.pixel(0, 0), Some(slot_color(0)));
        assert_eq!(engine.frame.pixel(8 + 3, 2), Some(CURSOR_STANDARD));
        assert_eq!(engine.surfaces.slot(s0), Ok(0));
        assert_eq!(sink.sizes, [(14, 4)]);
    }

    #[test]
    fn snap_window_reorders_and_restores() {
        let mut engine = Engine::default();
        let s0 = engine.surfaces.attach_surface(2, 2).unwrap();
        let s1 = engine.surfaces.attach_surface(2, 2).unwrap();

        let (mut sensors, mut sink) = (Still, Collect::default());
        let mut snap = FrameWindowSnap::new(1, 2, 4);
        let clock = StepClock::new(0, 1);
        let mut io = FrameIo {
            sensors: &mut sensors,
            snap: &mut snap,
            sink: &mut sink,
            clock: &clock,
        };
        let mut scheduler = Scheduler::new();
        let mut orders = Vec::new();
        let mut changes = Vec::new();
        for _ in 0..5 {
            let report = scheduler.tick(&mut engine, &mut io, &mut Tracer::none());
            orders.push(engine.frame.order().collect::<Vec<_>>());
            changes.push(report.snap_changes);
        }

        assert_eq!(orders, [[s0, s1], [s1, s0], [s1, s0], [s0, s1], [s0, s1]]);
        assert_eq!(changes, [0, 1, 0, 1, 0]);
    }

    #[test]
    fn refused_frames_are_counted_not_retried() {
        let mut engine = Engine::default();
        engine.surfaces.attach_surface(2, 2).unwrap();
        let (mut sensors, mut snap) = (Still, ManualSnap);
        let mut sink = Collect {
            refuse: true,
            ..Collect::default()
        };
        let clock = StepClock::new(0, 1);
        let mut io = FrameIo {
            sensors: &mut sensors,
            snap: &mut snap,
            sink: &mut sink,
            clock: &clock,
        };
        let mut scheduler = Scheduler::new();
        let report = scheduler.tick(&mut engine, &mut io, &mut Tracer::none());
        scheduler.tick(&mut engine, &mut io, &mut Tracer::none());

        assert_eq!(report.status, SinkStatus::NotReady);
        assert!(report.summary.dropped);
        assert_eq!(
            scheduler.stats(),
            SchedulerStats {
                ticks: 2,
                frames_accepted: 0,
                frames_dropped: 2
            }
        );
    }

    #[test]
    fn suspended_and_orphaned_controllers_are_not_sampled() {
        struct Counting(u32);
        impl SensorSource for Counting {
            fn sample(&mut self, _: ControllerId) -> MotionSample {
                self.0 += 1;
                MotionSample::LEVEL
            }
        }

        let mut engine = Engine::default();
        let s0 = engine.surfaces.attach_surface(2, 2).unwrap();
        let s1 = engine.surfaces.attach_surface(2, 2).unwrap();
        let a = engine
            .controllers
            .attach_controller(ControllerClass::Standard, s0, &engine.surfaces)
            .unwrap();
        engine
            .controllers
            .attach_controller(ControllerClass::Standard, s1, &engine.surfaces)
            .unwrap();
        engine
            .controllers
            .attach_controller(ControllerClass::Standard, s0, &engine.surfaces)
            .unwrap();
        engine.controllers.set_connected(a, false).unwrap();
        engine.surfaces.detach_surface(s1).unwrap();

        let (mut sensors, mut snap, mut sink) = (Counting(0), ManualSnap, Collect::default());
        let clock = StepClock::new(0, 1);
        let report = {
            let mut io = FrameIo {
                sensors: &mut sensors,
                snap: &mut snap,
                sink: &mut sink,
                clock: &clock,
            };
            Scheduler::new().tick(&mut engine, &mut io, &mut Tracer::none())
        };
        assert_eq!(report.controllers_fused, 1);
        assert_eq!(report.surfaces_rendered, 1);
        assert_eq!(sensors.0, 1);
    }

    #[test]
    fn phases_are_timed_in_order() {
        let mut engine = Engine::default();
        engine.surfaces.attach_surface(2, 2).unwrap();
        let (mut sensors, mut snap, mut sink) = (Still, ManualSnap, Collect::default());
        // Every clock read advances 10 ticks: each phase reads twice.
        let clock = StepClock::new(0, 10);
        let mut io = FrameIo {
            sensors: &mut sensors,
            snap: &mut snap,
            sink: &mut sink,
            clock: &clock,
        };
        let report = Scheduler::new().tick(&mut engine, &mut io, &mut Tracer::none());
        let s = report.summary;
        assert_eq!(s.snap_ticks, 10);
        assert_eq!(s.fuse_ticks, 10);
        assert_eq!(s.render_ticks, 10);
        assert_eq!(s.composite_ticks, 10);
        // Emit reads the clock once more for the submission timestamp.
        assert_eq!(s.emit_ticks, 20);
    }
}
