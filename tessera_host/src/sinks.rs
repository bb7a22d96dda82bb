// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame sinks.

use std::io::Write;

use tessera_core::backend::{FrameSink, SinkStatus};
use tessera_core::color::{BACKGROUND, Pixel};
use tessera_core::compositor::CompositeFrame;
use tessera_core::scale::scale_nearest;

/// Accepts every frame and reports it through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink {
    frames: u64,
}

impl LogSink {
    /// Creates a sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: 0 }
    }

    /// Frames accepted so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for LogSink {
    fn submit(&mut self, frame: &CompositeFrame) -> SinkStatus {
        self.frames += 1;
        tracing::debug!(
            frame = self.frames,
            width = frame.width(),
            height = frame.height(),
            placed = frame.placements().len(),
            "composite frame"
        );
        SinkStatus::Accepted
    }
}

/// Writes raw pixel rows to a byte stream.
///
/// Pixels go out as native-endian `u32` ARGB, row-major, with no header; the
/// frame size is known from the trace or from the mirror setting. When a
/// mirror size is set, every frame is first scaled onto that fixed
/// resolution, so the stream has a constant frame size even as surfaces
/// come and go.
///
/// A write error answers [`SinkStatus::NotReady`] for that frame.
pub struct RawSink<W: Write> {
    writer: W,
    mirror: Option<Mirror>,
    frames: u64,
}

struct Mirror {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl<W: Write> std::fmt::Debug for RawSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSink")
            .field("mirror", &self.mirror_size())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl<W: Write> RawSink<W> {
    /// Writes frames at their composite size.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            mirror: None,
            frames: 0,
        }
    }

    /// Writes every frame scaled to `width × height`.
    #[must_use]
    pub fn mirrored(writer: W, width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            writer,
            mirror: Some(Mirror {
                width,
                height,
                pixels: vec![BACKGROUND; len],
            }),
            frames: 0,
        }
    }

    /// Output size, if mirroring.
    #[must_use]
    pub fn mirror_size(&self) -> Option<(u32, u32)> {
        self.mirror.as_ref().map(|m| (m.width, m.height))
    }

    /// Frames written so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, frame: &CompositeFrame) -> std::io::Result<()> {
        let pixels = match &mut self.mirror {
            Some(mirror) => {
                if frame.is_empty() {
                    mirror.pixels.fill(BACKGROUND);
                } else {
                    scale_nearest(
                        frame.pixels(),
                        frame.width(),
                        frame.height(),
                        &mut mirror.pixels,
                        mirror.width,
                        mirror.height,
                    );
                }
                &mirror.pixels[..]
            }
            None => frame.pixels(),
        };
        self.writer.write_all(bytemuck::cast_slice(pixels))?;
        self.writer.flush()
    }
}

impl<W: Write> FrameSink for RawSink<W> {
    fn submit(&mut self, frame: &CompositeFrame) -> SinkStatus {
        match self.write(frame) {
            Ok(()) => {
                self.frames += 1;
                SinkStatus::Accepted
            }
            Err(err) => {
                tracing::warn!(%err, "raw sink write failed; dropping frame");
                SinkStatus::NotReady
            }
        }
    }
}
