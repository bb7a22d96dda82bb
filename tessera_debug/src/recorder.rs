// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Cursor updates ([`on_cursor_updates`](TraceSink::on_cursor_updates)) store
//! only the count.

use tessera_core::backend::SinkStatus;
use tessera_core::id::SurfaceId;
use tessera_core::time::HostTime;
use tessera_core::trace::{
    CompositeEvent, CursorUpdate, EmitEvent, FrameSummary, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, SnapChangeEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_TICK: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_SNAP_CHANGE: u8 = 4;
const TAG_COMPOSITE: u8 = 5;
const TAG_EMIT: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;
const TAG_CURSOR_UPDATES_COUNT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_surface(&mut self, id: SurfaceId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Snap => 0,
            PhaseKind::Fuse => 1,
            PhaseKind::Render => 2,
            PhaseKind::Composite => 3,
            PhaseKind::Emit => 4,
        });
    }

    fn write_status(&mut self, s: SinkStatus) {
        self.write_u8(match s {
            SinkStatus::Accepted => 0,
            SinkStatus::NotReady => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.write_u8(TAG_FRAME_TICK);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_u32(e.surfaces);
        self.write_u32(e.controllers);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_snap_change(&mut self, e: &SnapChangeEvent) {
        self.write_u8(TAG_SNAP_CHANGE);
        self.write_u64(e.frame_index);
        self.write_surface(e.surface);
        self.write_bool(e.snapped);
    }

    fn on_composite(&mut self, e: &CompositeEvent) {
        self.write_u8(TAG_COMPOSITE);
        self.write_u64(e.frame_index);
        self.write_u32(e.width);
        self.write_u32(e.height);
        self.write_u32(e.placed);
    }

    fn on_emit(&mut self, e: &EmitEvent) {
        self.write_u8(TAG_EMIT);
        self.write_u64(e.frame_index);
        self.write_u64(e.submitted_at.ticks());
        self.write_status(e.status);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.ticks());
        self.write_u64(s.snap_ticks);
        self.write_u64(s.fuse_ticks);
        self.write_u64(s.render_ticks);
        self.write_u64(s.composite_ticks);
        self.write_u64(s.emit_ticks);
        self.write_u32(s.width);
        self.write_u32(s.height);
        self.write_bool(s.dropped);
    }

    fn on_cursor_updates(&mut self, frame_index: u64, updates: &[CursorUpdate]) {
        self.write_u8(TAG_CURSOR_UPDATES_COUNT);
        self.write_u64(frame_index);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "cursor update count capped at u32::MAX for recording"
        )]
        self.write_u32(updates.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`SnapChangeEvent`].
    SnapChange(SnapChangeEvent),
    /// A [`CompositeEvent`].
    Composite(CompositeEvent),
    /// An [`EmitEvent`].
    Emit(EmitEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// Cursor update count for a frame.
    CursorUpdatesCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of fused controllers.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_surface(&mut self) -> Option<SurfaceId> {
        let index = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(SurfaceId::from_raw(index, generation))
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        PhaseKind::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn read_status(&mut self) -> Option<SinkStatus> {
        Some(match self.read_u8()? {
            0 => SinkStatus::Accepted,
            _ => SinkStatus::NotReady,
        })
    }

    fn decode_frame_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameTick(FrameTickEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            surfaces: self.read_u32()?,
            controllers: self.read_u32()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_snap_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SnapChange(SnapChangeEvent {
            frame_index: self.read_u64()?,
            surface: self.read_surface()?,
            snapped: self.read_bool()?,
        }))
    }

    fn decode_composite(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Composite(CompositeEvent {
            frame_index: self.read_u64()?,
            width: self.read_u32()?,
            height: self.read_u32()?,
            placed: self.read_u32()?,
        }))
    }

    fn decode_emit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Emit(EmitEvent {
            frame_index: self.read_u64()?,
            submitted_at: HostTime(self.read_u64()?),
            status: self.read_status()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            snap_ticks: self.read_u64()?,
            fuse_ticks: self.read_u64()?,
            render_ticks: self.read_u64()?,
            composite_ticks: self.read_u64()?,
            emit_ticks: self.read_u64()?,
            width: self.read_u32()?,
            height: self.read_u32()?,
            dropped: self.read_bool()?,
        }))
    }

    fn decode_cursor_updates_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::CursorUpdatesCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_FRAME_TICK => self.decode_frame_tick(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_SNAP_CHANGE => self.decode_snap_change(),
            TAG_COMPOSITE => self.decode_composite(),
            TAG_EMIT => self.decode_emit(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_CURSOR_UPDATES_COUNT => self.decode_cursor_updates_count(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::controller::ControllerId;

    fn sample_summary() -> FrameSummary {
        FrameSummary {
            frame_index: 7,
            now: HostTime(1_000_000),
            snap_ticks: 10,
            fuse_ticks: 90,
            render_ticks: 1500,
            composite_ticks: 400,
            emit_ticks: 50,
            width: 2560,
            height: 720,
            dropped: true,
        }
    }

    #[test]
    fn frame_tick_survives_recording() {
        let mut rec = RecorderSink::new();
        let orig = FrameTickEvent {
            frame_index: 7,
            now: HostTime(1_000_000),
            surfaces: 2,
            controllers: 3,
        };
        rec.on_frame_tick(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, [RecordedEvent::FrameTick(orig)]);
    }

    #[test]
    fn snap_change_keeps_surface_generation() {
        let mut rec = RecorderSink::new();
        let orig = SnapChangeEvent {
            frame_index: 100,
            surface: SurfaceId::from_raw(1, 3),
            snapped: true,
        };
        rec.on_snap_change(&orig);

        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::SnapChange(e)) => {
                assert_eq!(e.surface.index(), 1);
                assert_eq!(e.surface.generation(), 3);
                assert!(e.snapped);
            }
            other => panic!("expected SnapChange, got {other:?}"),
        }
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 7,
            phase: PhaseKind::Emit,
            timestamp: HostTime(2000),
        });
        rec.on_emit(&EmitEvent {
            frame_index: 7,
            submitted_at: HostTime(2001),
            status: SinkStatus::NotReady,
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 7,
            phase: PhaseKind::Emit,
            timestamp: HostTime(2050),
        });
        rec.on_composite(&CompositeEvent {
            frame_index: 7,
            width: 2560,
            height: 720,
            placed: 2,
        });
        rec.on_frame_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(
            events[0],
            RecordedEvent::PhaseBegin(PhaseBeginEvent {
                phase: PhaseKind::Emit,
                ..
            })
        ));
        assert!(matches!(
            events[1],
            RecordedEvent::Emit(EmitEvent {
                status: SinkStatus::NotReady,
                ..
            })
        ));
        assert!(matches!(events[2], RecordedEvent::PhaseEnd(_)));
        assert!(matches!(
            events[3],
            RecordedEvent::Composite(CompositeEvent { placed: 2, .. })
        ));
        assert_eq!(events[4], RecordedEvent::FrameSummary(sample_summary()));
    }

    #[test]
    fn cursor_updates_store_count() {
        let mut rec = RecorderSink::new();
        let update = CursorUpdate {
            controller: ControllerId::from_raw(0, 0),
            x: 640,
            y: 585,
            pitch: 45.0,
            roll: 0.0,
        };
        rec.on_cursor_updates(42, &[update, update]);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::CursorUpdatesCount {
                frame_index: 42,
                count: 2
            }]
        );
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&sample_summary());
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }
}
