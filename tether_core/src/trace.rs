// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the lifecycle bridge.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! bridge calls as it handles host callbacks. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::activity::ActivityEvent;
use crate::bridge::BridgeState;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the host reports a new GPU surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceCreatedEvent {
    /// 1-based count of surfaces seen by this bridge, including this one.
    pub generation: u64,
    /// Bridge state before the event was handled.
    pub state: BridgeState,
}

/// Emitted after the engine's one-time initialization ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineInitEvent {
    /// Surface generation whose creation triggered initialization.
    pub generation: u64,
    /// Number of arguments passed to the engine.
    pub argc: u32,
}

/// Emitted when the host reports new surface dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceChangedEvent {
    /// Current surface generation.
    pub generation: u64,
    /// New width in pixels.
    pub width: u32,
    /// New height in pixels.
    pub height: u32,
}

/// Emitted after each host draw callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEvent {
    /// 0-based index of this draw callback.
    pub frame_index: u64,
    /// Whether the engine was asked to render. `false` once the bridge has
    /// finished.
    pub rendered: bool,
    /// The engine's answer; `false` means stop. Always `false` when
    /// `rendered` is `false`.
    pub keep_running: bool,
}

/// Emitted when the bridge asks the shell to finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinishEvent {
    /// Index of the draw callback whose render failed.
    pub frame_index: u64,
}

/// Emitted for every activity lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivityTraceEvent {
    /// The notification.
    pub event: ActivityEvent,
    /// Whether any engine hook was called for it.
    pub forwarded: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the lifecycle bridge.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a surface-created callback arrives.
    fn on_surface_created(&mut self, e: &SurfaceCreatedEvent) {
        _ = e;
    }

    /// Called after engine initialization.
    fn on_engine_init(&mut self, e: &EngineInitEvent) {
        _ = e;
    }

    /// Called when a surface-changed callback arrives.
    fn on_surface_changed(&mut self, e: &SurfaceChangedEvent) {
        _ = e;
    }

    /// Called after each draw callback.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when the shell is asked to finish.
    fn on_finish(&mut self, e: &FinishEvent) {
        _ = e;
    }

    /// Called for each activity lifecycle notification.
    fn on_activity(&mut self, e: &ActivityTraceEvent) {
        _ = e;
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn on_surface_created(&mut self, e: &SurfaceCreatedEvent) {
        (**self).on_surface_created(e);
    }

    fn on_engine_init(&mut self, e: &EngineInitEvent) {
        (**self).on_engine_init(e);
    }

    fn on_surface_changed(&mut self, e: &SurfaceChangedEvent) {
        (**self).on_surface_changed(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        (**self).on_frame(e);
    }

    fn on_finish(&mut self, e: &FinishEvent) {
        (**self).on_finish(e);
    }

    fn on_activity(&mut self, e: &ActivityTraceEvent) {
        (**self).on_activity(e);
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

    /// Emits a [`SurfaceCreatedEvent`].
    #[inline]
    pub fn surface_created(&mut self, e: &SurfaceCreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_surface_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EngineInitEvent`].
    #[inline]
    pub fn engine_init(&mut self, e: &EngineInitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_engine_init(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SurfaceChangedEvent`].
    #[inline]
    pub fn surface_changed(&mut self, e: &SurfaceChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_surface_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FinishEvent`].
    #[inline]
    pub fn finish(&mut self, e: &FinishEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_finish(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ActivityTraceEvent`].
    #[inline]
    pub fn activity(&mut self, e: &ActivityTraceEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_activity(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> FrameEvent {
        FrameEvent {
            frame_index: 3,
            rendered: true,
            keep_running: true,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_surface_created(&SurfaceCreatedEvent {
            generation: 1,
            state: BridgeState::NotInitialized,
        });
        sink.on_frame(&sample_frame());
        sink.on_finish(&FinishEvent { frame_index: 3 });
        sink.on_activity(&ActivityTraceEvent {
            event: ActivityEvent::Pause,
            forwarded: false,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame(&sample_frame());
        tracer.surface_changed(&SurfaceChangedEvent {
            generation: 1,
            width: 1920,
            height: 1080,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame(&mut self, e: &FrameEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame(&sample_frame());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.frames, &[3]);
    }
}
