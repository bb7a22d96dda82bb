// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two handheld devices side by side, one docking and undocking.
//!
//! Attaches two 1280×720 surfaces: the first holds a split controller pair,
//! the second a standard controller. Surface 1 snaps at frame 100 and
//! releases at frame 300, jumping to the front of the composite in between.
//! The loop runs at 60 Hz unless `--no-pacing` is given.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tessera_core::backend::{FrameIo, FrameSink, SensorSource};
use tessera_core::config::{EngineConfig, PacingConfig};
use tessera_core::controller::ControllerClass;
use tessera_core::engine::Engine;
use tessera_core::scheduler::Scheduler;
use tessera_core::snap::FrameWindowSnap;
use tessera_core::trace::{
    CompositeEvent, CursorUpdate, EmitEvent, FrameSummary, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, SnapChangeEvent, TraceSink, Tracer,
};
use tessera_debug::chrome;
use tessera_debug::pretty::PrettyPrintSink;
use tessera_debug::recorder::RecorderSink;
use tessera_host::{LogSink, MonotonicClock, RawSink, Runner, StillSensors, SyntheticMotion};

const SURFACE_WIDTH: u32 = 1280;
const SURFACE_HEIGHT: u32 = 720;

#[derive(Parser, Debug)]
#[command(about = "Drive two handheld surfaces through a snap and an unsnap")]
struct Cli {
    /// Number of frames to run.
    #[arg(long, default_value_t = 400)]
    frames: u64,
    /// Run ticks back to back instead of at 60 Hz.
    #[arg(long)]
    no_pacing: bool,
    /// Keep every controller level instead of swaying.
    #[arg(long)]
    still: bool,
    /// Print every trace event to stderr.
    #[arg(long)]
    pretty: bool,
    /// Write a Chrome trace of the run to this file.
    #[arg(long, value_name = "PATH")]
    trace_json: Option<PathBuf>,
    /// Dump raw composite pixels to this file.
    #[arg(long, value_name = "PATH")]
    raw: Option<PathBuf>,
    /// Scale raw output to a fixed size, e.g. `640x180`.
    #[arg(long, value_name = "WxH", value_parser = parse_size, requires = "raw")]
    mirror: Option<(u32, u32)>,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got `{s}`"))?;
    let w: u32 = w.parse().map_err(|e| format!("bad width `{w}`: {e}"))?;
    let h: u32 = h.parse().map_err(|e| format!("bad height `{h}`: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("mirror size must be non-empty, got {w}x{h}"));
    }
    Ok((w, h))
}

/// Fans trace events out to the optional pretty printer and the recorder.
struct Tee {
    pretty: Option<PrettyPrintSink>,
    recorder: Option<RecorderSink>,
}

impl Tee {
    fn each(&mut self, mut f: impl FnMut(&mut dyn TraceSink)) {
        if let Some(p) = &mut self.pretty {
            f(p);
        }
        if let Some(r) = &mut self.recorder {
            f(r);
        }
    }
}

impl TraceSink for Tee {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.each(|s| s.on_frame_tick(e));
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.each(|s| s.on_phase_begin(e));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.each(|s| s.on_phase_end(e));
    }

    fn on_snap_change(&mut self, e: &SnapChangeEvent) {
        self.each(|s| s.on_snap_change(e));
    }

    fn on_composite(&mut self, e: &CompositeEvent) {
        self.each(|s| s.on_composite(e));
    }

    fn on_emit(&mut self, e: &EmitEvent) {
        self.each(|s| s.on_emit(e));
    }

    fn on_frame_summary(&mut self, e: &FrameSummary) {
        self.each(|s| s.on_frame_summary(e));
    }

    fn on_cursor_updates(&mut self, frame_index: u64, updates: &[CursorUpdate]) {
        self.each(|s| s.on_cursor_updates(frame_index, updates));
    }
}

fn build_engine() -> tessera_core::Result<Engine> {
    let mut engine = Engine::new(EngineConfig::handheld());
    let s0 = engine
        .surfaces
        .attach_surface(SURFACE_WIDTH, SURFACE_HEIGHT)?;
    let s1 = engine
        .surfaces
        .attach_surface(SURFACE_WIDTH, SURFACE_HEIGHT)?;
    for (class, surface) in [
        (ControllerClass::LeftHalf, s0),
        (ControllerClass::RightHalf, s0),
        (ControllerClass::Standard, s1),
    ] {
        engine
            .controllers
            .attach_controller(class, surface, &engine.surfaces)?;
    }
    Ok(engine)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
    let cli = Cli::parse();

    let mut engine = build_engine()?;
    let timebase = tessera_host::timebase();

    let mut sensors: Box<dyn SensorSource> = if cli.still {
        Box::new(StillSensors)
    } else {
        Box::new(SyntheticMotion::default())
    };
    let mut sink: Box<dyn FrameSink> = match (&cli.raw, cli.mirror) {
        (Some(path), Some((w, h))) => {
            Box::new(RawSink::mirrored(BufWriter::new(File::create(path)?), w, h))
        }
        (Some(path), None) => Box::new(RawSink::new(BufWriter::new(File::create(path)?))),
        (None, _) => Box::new(LogSink::new()),
    };
    let mut snap = FrameWindowSnap::handheld_demo();
    let mut tee = Tee {
        pretty: cli
            .pretty
            .then(|| PrettyPrintSink::stderr(timebase).without_phases()),
        recorder: cli.trace_json.is_some().then(RecorderSink::new),
    };

    let pacing = if cli.no_pacing {
        PacingConfig::unpaced()
    } else {
        PacingConfig::hz_60()
    };
    let runner = Runner::new(pacing).with_frame_limit(cli.frames);
    let mut scheduler = Scheduler::new();
    let mut io = FrameIo {
        sensors: sensors.as_mut(),
        snap: &mut snap,
        sink: sink.as_mut(),
        clock: &MonotonicClock,
    };
    let summary = runner.run(
        &mut scheduler,
        &mut engine,
        &mut io,
        &mut Tracer::new(&mut tee),
    );

    tracing::info!(
        frames = summary.ticks,
        dropped = summary.frames_dropped,
        width = engine.frame.width(),
        height = engine.frame.height(),
        "done"
    );

    if let (Some(path), Some(recorder)) = (&cli.trace_json, tee.recorder) {
        let mut out = BufWriter::new(File::create(path)?);
        chrome::export(recorder.as_bytes(), timebase, &mut out)?;
        tracing::info!(path = %path.display(), "wrote Chrome trace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_size_parses() {
        assert_eq!(parse_size("640x180"), Ok((640, 180)));
        assert_eq!(parse_size("32X18"), Ok((32, 18)));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn demo_engine_has_two_surfaces_and_three_controllers() {
        let engine = build_engine().unwrap();
        assert_eq!(engine.surfaces.len(), 2);
        assert_eq!(engine.controllers.len(), 3);
    }

    #[test]
    fn cli_rejects_mirror_without_raw() {
        assert!(Cli::try_parse_from(["snap_demo", "--mirror", "64x18"]).is_err());
        let cli =
            Cli::try_parse_from(["snap_demo", "--raw", "out.bin", "--mirror", "64x18"]).unwrap();
        assert_eq!(cli.mirror, Some((64, 18)));
    }
}
