// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each prefixed with a tag
//! byte and a microsecond timestamp. [`decode`] reads them back as an
//! iterator of [`Record`].
//!
//! Bridge events carry no time of their own, so the recorder stamps them:
//! [`RecorderSink::new`] uses microseconds since the recorder was created,
//! [`RecorderSink::sequential`] uses the event's position in the recording
//! (deterministic, handy for tests and diffs).

use std::time::Instant;

use tether_core::activity::ActivityEvent;
use tether_core::bridge::BridgeState;
use tether_core::trace::{
    ActivityTraceEvent, EngineInitEvent, FinishEvent, FrameEvent, SurfaceChangedEvent,
    SurfaceCreatedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SURFACE_CREATED: u8 = 1;
const TAG_ENGINE_INIT: u8 = 2;
const TAG_SURFACE_CHANGED: u8 = 3;
const TAG_FRAME: u8 = 4;
const TAG_FINISH: u8 = 5;
const TAG_ACTIVITY: u8 = 6;

const FRAME_RENDERED: u8 = 0b01;
const FRAME_KEEP_RUNNING: u8 = 0b10;

// Activity codes 0..=7 come from `ActivityEvent::code`; focus changes use
// these two.
const ACTIVITY_FOCUS_LOST: u8 = 8;
const ACTIVITY_FOCUS_GAINED: u8 = 9;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Stamp {
    Monotonic(Instant),
    Sequence(u64),
}

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug)]
pub struct RecorderSink {
    buf: Vec<u8>,
    stamp: Stamp,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder stamping events with microseconds elapsed
    /// since this call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            stamp: Stamp::Monotonic(Instant::now()),
        }
    }

    /// Creates an empty recorder stamping events with their sequence number
    /// (0, 1, 2, …).
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            buf: Vec::new(),
            stamp: Stamp::Sequence(0),
        }
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

    fn begin(&mut self, tag: u8) {
        let ts = match &mut self.stamp {
            Stamp::Monotonic(start) => {
                u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
            }
            Stamp::Sequence(next) => {
                let ts = *next;
                *next += 1;
                ts
            }
        };
        self.write_u8(tag);
        self.write_u64(ts);
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_state(&mut self, s: BridgeState) {
        self.write_u8(match s {
            BridgeState::NotInitialized => 0,
            BridgeState::Initialized => 1,
            BridgeState::Finished => 2,
            BridgeState::Destroyed => 3,
        });
    }

    fn write_activity(&mut self, e: ActivityEvent) {
        let code = match e {
            ActivityEvent::FocusChanged(false) => ACTIVITY_FOCUS_LOST,
            ActivityEvent::FocusChanged(true) => ACTIVITY_FOCUS_GAINED,
            coded => coded
                .code()
                .and_then(|c| u8::try_from(c).ok())
                .unwrap_or(u8::MAX),
        };
        self.write_u8(code);
    }
}

impl TraceSink for RecorderSink {
    fn on_surface_created(&mut self, e: &SurfaceCreatedEvent) {
        self.begin(TAG_SURFACE_CREATED);
        self.write_u64(e.generation);
        self.write_state(e.state);
    }

    fn on_engine_init(&mut self, e: &EngineInitEvent) {
        self.begin(TAG_ENGINE_INIT);
        self.write_u64(e.generation);
        self.write_u32(e.argc);
    }

    fn on_surface_changed(&mut self, e: &SurfaceChangedEvent) {
        self.begin(TAG_SURFACE_CHANGED);
        self.write_u64(e.generation);
        self.write_u32(e.width);
        self.write_u32(e.height);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.begin(TAG_FRAME);
        self.write_u64(e.frame_index);
        let mut flags = 0;
        if e.rendered {
            flags |= FRAME_RENDERED;
        }
        if e.keep_running {
            flags |= FRAME_KEEP_RUNNING;
        }
        self.write_u8(flags);
    }

    fn on_finish(&mut self, e: &FinishEvent) {
        self.begin(TAG_FINISH);
        self.write_u64(e.frame_index);
    }

    fn on_activity(&mut self, e: &ActivityTraceEvent) {
        self.begin(TAG_ACTIVITY);
        self.write_activity(e.event);
        self.write_u8(u8::from(e.forwarded));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`SurfaceCreatedEvent`].
    SurfaceCreated(SurfaceCreatedEvent),
    /// An [`EngineInitEvent`].
    EngineInit(EngineInitEvent),
    /// A [`SurfaceChangedEvent`].
    SurfaceChanged(SurfaceChangedEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`FinishEvent`].
    Finish(FinishEvent),
    /// An [`ActivityTraceEvent`].
    Activity(ActivityTraceEvent),
}

/// A recorded event with its timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    /// Microseconds since recording started, or the sequence number for
    /// [`RecorderSink::sequential`] recordings.
    pub timestamp: u64,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Record`].
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
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_state(&mut self) -> Option<BridgeState> {
        Some(match self.read_u8()? {
            0 => BridgeState::NotInitialized,
            1 => BridgeState::Initialized,
            2 => BridgeState::Finished,
            _ => BridgeState::Destroyed,
        })
    }

    fn read_activity(&mut self) -> Option<ActivityEvent> {
        match self.read_u8()? {
            ACTIVITY_FOCUS_LOST => Some(ActivityEvent::FocusChanged(false)),
            ACTIVITY_FOCUS_GAINED => Some(ActivityEvent::FocusChanged(true)),
            code => ActivityEvent::from_code(i32::from(code)),
        }
    }

    fn decode_surface_created(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SurfaceCreated(SurfaceCreatedEvent {
            generation: self.read_u64()?,
            state: self.read_state()?,
        }))
    }

    fn decode_engine_init(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::EngineInit(EngineInitEvent {
            generation: self.read_u64()?,
            argc: self.read_u32()?,
        }))
    }

    fn decode_surface_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SurfaceChanged(SurfaceChangedEvent {
            generation: self.read_u64()?,
            width: self.read_u32()?,
            height: self.read_u32()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let flags = self.read_u8()?;
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index,
            rendered: flags & FRAME_RENDERED != 0,
            keep_running: flags & FRAME_KEEP_RUNNING != 0,
        }))
    }

    fn decode_finish(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Finish(FinishEvent {
            frame_index: self.read_u64()?,
        }))
    }

    fn decode_activity(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Activity(ActivityTraceEvent {
            event: self.read_activity()?,
            forwarded: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let timestamp = self.read_u64()?;
        let event = match tag {
            TAG_SURFACE_CREATED => self.decode_surface_created(),
            TAG_ENGINE_INIT => self.decode_engine_init(),
            TAG_SURFACE_CHANGED => self.decode_surface_changed(),
            TAG_FRAME => self.decode_frame(),
            TAG_FINISH => self.decode_finish(),
            TAG_ACTIVITY => self.decode_activity(),
            _ => None, // unknown tag → stop iteration
        }?;
        Some(Record { timestamp, event })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
