// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paced frame loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tessera_core::backend::{FrameIo, SinkStatus};
use tessera_core::config::PacingConfig;
use tessera_core::engine::Engine;
use tessera_core::scheduler::Scheduler;
use tessera_core::trace::Tracer;

/// Asks a running [`Runner`] to stop after its current tick.
///
/// Cloneable and `Send`; this is the only state shared across threads.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Requests a stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Totals for one [`Runner::run`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Frames the sink accepted.
    pub frames_accepted: u64,
    /// Frames the sink refused.
    pub frames_dropped: u64,
    /// Frame counter of the last tick.
    pub last_frame: u64,
    /// Whether the loop ended through the [`StopHandle`].
    pub stopped: bool,
}

/// Drives a [`Scheduler`] with "tick, then fixed sleep" pacing.
///
/// The pause does not account for how long the tick took, so the effective
/// rate runs slightly under the configured one.
#[derive(Debug)]
pub struct Runner {
    pacing: PacingConfig,
    frame_limit: Option<u64>,
    stop: StopHandle,
}

impl Runner {
    /// Creates a runner with no frame limit.
    #[must_use]
    pub fn new(pacing: PacingConfig) -> Self {
        Self {
            pacing,
            frame_limit: None,
            stop: StopHandle::default(),
        }
    }

    /// Stops after `frames` ticks of a single [`run`](Self::run).
    #[must_use]
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Handle for stopping the loop from elsewhere.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Pacing in use.
    #[must_use]
    pub const fn pacing(&self) -> PacingConfig {
        self.pacing
    }

    /// Ticks until the frame limit is reached or a stop is requested.
    ///
    /// Without a frame limit this only returns through the [`StopHandle`].
    pub fn run(
        &self,
        scheduler: &mut Scheduler,
        engine: &mut Engine,
        io: &mut FrameIo<'_>,
        tracer: &mut Tracer<'_>,
    ) -> RunSummary {
        let pause = std::time::Duration::from_nanos(self.pacing.pause.ticks());
        tracing::info!(
            surfaces = engine.surfaces.len(),
            controllers = engine.controllers.len(),
            pause_us = pause.as_micros(),
            frame_limit = ?self.frame_limit,
            "frame loop starting"
        );

        let mut summary = RunSummary::default();
        while self.frame_limit.is_none_or(|limit| summary.ticks < limit) {
            if self.stop.is_stopped() {
                summary.stopped = true;
                break;
            }

            let report = scheduler.tick(engine, io, tracer);
            summary.ticks += 1;
            summary.last_frame = report.frame_index;
            match report.status {
                SinkStatus::Accepted => summary.frames_accepted += 1,
                SinkStatus::NotReady => {
                    summary.frames_dropped += 1;
                    tracing::debug!(
                        frame = report.frame_index,
                        "sink not ready, frame dropped"
                    );
                }
            }
            if report.snap_changes > 0 {
                tracing::info!(
                    frame = report.frame_index,
                    changes = report.snap_changes,
                    width = report.width,
                    height = report.height,
                    "surface layout changed"
                );
            }
            tracing::trace!(
                frame = report.frame_index,
                fused = report.controllers_fused,
                rendered = report.surfaces_rendered,
                ticks = report.summary.total_ticks(),
                "tick"
            );

            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }

        tracing::info!(
            ticks = summary.ticks,
            accepted = summary.frames_accepted,
            dropped = summary.frames_dropped,
            stopped = summary.stopped,
            "frame loop finished"
        );
        summary
    }
}
