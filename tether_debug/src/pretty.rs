// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use tether_core::bridge::BridgeState;
use tether_core::trace::{
    ActivityTraceEvent, EngineInitEvent, FinishEvent, FrameEvent, SurfaceChangedEvent,
    SurfaceCreatedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Print every frame instead of only frames that change something.
    verbose_frames: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose_frames", &self.verbose_frames)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Frames that rendered and want to keep running are skipped unless
    /// [`verbose_frames`](Self::verbose_frames) is enabled; at 60 fps they
    /// would drown out everything else.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose_frames: false,
        }
    }

    /// Prints every frame, not only the ones that stop or are dropped.
    #[must_use]
    pub fn verbose_frames(mut self, verbose: bool) -> Self {
        self.verbose_frames = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn state_name(state: BridgeState) -> &'static str {
    match state {
        BridgeState::NotInitialized => "not-initialized",
        BridgeState::Initialized => "initialized",
        BridgeState::Finished => "finished",
        BridgeState::Destroyed => "destroyed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_surface_created(&mut self, e: &SurfaceCreatedEvent) {
        let _ = writeln!(
            self.writer,
            "[surface:created] generation={} state={}",
            e.generation,
            state_name(e.state),
        );
    }

    fn on_engine_init(&mut self, e: &EngineInitEvent) {
        let _ = writeln!(
            self.writer,
            "[engine:init] generation={} argc={}",
            e.generation, e.argc,
        );
    }

    fn on_surface_changed(&mut self, e: &SurfaceChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[surface:changed] generation={} size={}x{}",
            e.generation, e.width, e.height,
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        if e.rendered && e.keep_running && !self.verbose_frames {
            return;
        }
        let status = match (e.rendered, e.keep_running) {
            (false, _) => "dropped",
            (true, false) => "STOP",
            (true, true) => "ok",
        };
        let _ = writeln!(self.writer, "[frame] index={} {status}", e.frame_index);
    }

    fn on_finish(&mut self, e: &FinishEvent) {
        let _ = writeln!(self.writer, "[finish] after frame={}", e.frame_index);
    }

    fn on_activity(&mut self, e: &ActivityTraceEvent) {
        let routed = if e.forwarded { "forwarded" } else { "traced" };
        let _ = writeln!(self.writer, "[activity] {} {routed}", e.event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::activity::ActivityEvent;

    fn written(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_surface_created() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_surface_created(&SurfaceCreatedEvent {
            generation: 2,
            state: BridgeState::Initialized,
        });
        let output = written(sink);
        assert!(output.contains("[surface:created]"), "got: {output}");
        assert!(output.contains("generation=2"), "got: {output}");
        assert!(output.contains("state=initialized"), "got: {output}");
    }

    #[test]
    fn destroyed_state_is_named() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_surface_created(&SurfaceCreatedEvent {
            generation: 3,
            state: BridgeState::Destroyed,
        });
        let output = written(sink);
        assert!(output.contains("state=destroyed"), "got: {output}");
    }

    #[test]
    fn healthy_frames_are_quiet_by_default() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame(&FrameEvent {
            frame_index: 0,
            rendered: true,
            keep_running: true,
        });
        sink.on_frame(&FrameEvent {
            frame_index: 1,
            rendered: true,
            keep_running: false,
        });
        let output = written(sink);
        assert!(!output.contains("index=0"), "got: {output}");
        assert!(output.contains("[frame] index=1 STOP"), "got: {output}");
    }

    #[test]
    fn verbose_frames_prints_everything() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).verbose_frames(true);
        sink.on_frame(&FrameEvent {
            frame_index: 4,
            rendered: true,
            keep_running: true,
        });
        sink.on_activity(&ActivityTraceEvent {
            event: ActivityEvent::LowMemory,
            forwarded: true,
        });
        let output = written(sink);
        assert!(output.contains("[frame] index=4 ok"), "got: {output}");
        assert!(output.contains("[activity] low-memory forwarded"), "got: {output}");
    }
}
