// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logcat output.
//!
//! [`init_logging`] routes the `log` facade to logcat on Android. [`LogSink`]
//! turns bridge trace events into `log` records so they land there too.

use std::sync::Once;

use tether_core::trace::{
    ActivityTraceEvent, EngineInitEvent, FinishEvent, FrameEvent, SurfaceChangedEvent,
    SurfaceCreatedEvent, TraceSink,
};

/// Logcat tag used for every record.
pub const LOG_TAG: &str = "tether";

static INIT: Once = Once::new();

/// Installs the logcat logger.
///
/// Safe to call more than once; only the first call has an effect. On
/// non-Android targets no logger is installed and the embedding program's
/// logger (if any) is used.
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(target_os = "android")]
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag(LOG_TAG),
        );
    });
}

/// Returns `true` once [`init_logging`] has run.
#[must_use]
pub fn logging_initialized() -> bool {
    INIT.is_completed()
}

/// A [`TraceSink`] that writes bridge events through the `log` facade.
///
/// Lifecycle events are logged at `info`, healthy frames at `trace` and
/// stopping or dropped frames at `warn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn on_surface_created(&mut self, e: &SurfaceCreatedEvent) {
        log::info!(
            target: LOG_TAG,
            "surface created (generation {}, state {:?})",
            e.generation,
            e.state
        );
    }

    fn on_engine_init(&mut self, e: &EngineInitEvent) {
        log::info!(
            target: LOG_TAG,
            "engine initialized on surface {} with {} argument(s)",
            e.generation,
            e.argc
        );
    }

    fn on_surface_changed(&mut self, e: &SurfaceChangedEvent) {
        log::debug!(
            target: LOG_TAG,
            "surface {} changed to {}x{}",
            e.generation,
            e.width,
            e.height
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        if !e.rendered {
            log::warn!(target: LOG_TAG, "frame {} dropped after finish", e.frame_index);
        } else if e.keep_running {
            log::trace!(target: LOG_TAG, "frame {}", e.frame_index);
        } else {
            log::warn!(target: LOG_TAG, "engine stopped at frame {}", e.frame_index);
        }
    }

    fn on_finish(&mut self, e: &FinishEvent) {
        log::info!(target: LOG_TAG, "finishing activity after frame {}", e.frame_index);
    }

    fn on_activity(&mut self, e: &ActivityTraceEvent) {
        if e.forwarded {
            log::debug!(target: LOG_TAG, "activity {} forwarded to engine", e.event);
        } else {
            log::debug!(target: LOG_TAG, "activity {}", e.event);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};

    use log::{Level, LevelFilter, Log, Metadata, Record};
    use tether_core::activity::ActivityEvent;
    use tether_core::bridge::BridgeState;

    /// Collects tether records per thread so parallel tests stay apart.
    struct Capture;

    static CAPTURE: Capture = Capture;
    static RECORDS: Mutex<Vec<(ThreadId, Level)>> = Mutex::new(Vec::new());

    impl Log for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            if record.target() == LOG_TAG {
                RECORDS
                    .lock()
                    .unwrap()
                    .push((thread::current().id(), record.level()));
            }
        }

        fn flush(&self) {}
    }

    /// Runs `f` and returns the levels it logged at on this thread.
    fn levels(f: impl FnOnce(&mut LogSink)) -> Vec<Level> {
        // Another test may have installed it already.
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Trace);

        let me = thread::current().id();
        RECORDS.lock().unwrap().retain(|(id, _)| *id != me);
        f(&mut LogSink);
        RECORDS
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == me)
            .map(|(_, level)| *level)
            .collect()
    }

    #[test]
    fn lifecycle_events_log_at_info() {
        let got = levels(|sink| {
            sink.on_surface_created(&SurfaceCreatedEvent {
                generation: 1,
                state: BridgeState::NotInitialized,
            });
            sink.on_engine_init(&EngineInitEvent {
                generation: 1,
                argc: 1,
            });
            sink.on_finish(&FinishEvent { frame_index: 3 });
        });
        assert_eq!(got, [Level::Info, Level::Info, Level::Info]);
    }

    #[test]
    fn frames_log_by_outcome() {
        let got = levels(|sink| {
            for (rendered, keep_running) in [(true, true), (true, false), (false, false)] {
                sink.on_frame(&FrameEvent {
                    frame_index: 0,
                    rendered,
                    keep_running,
                });
            }
        });
        assert_eq!(got, [Level::Trace, Level::Warn, Level::Warn]);
    }

    #[test]
    fn resizes_and_activity_log_at_debug() {
        let got = levels(|sink| {
            sink.on_surface_changed(&SurfaceChangedEvent {
                generation: 1,
                width: 720,
                height: 1280,
            });
            sink.on_activity(&ActivityTraceEvent {
                event: ActivityEvent::Pause,
                forwarded: true,
            });
            sink.on_activity(&ActivityTraceEvent {
                event: ActivityEvent::Destroy,
                forwarded: false,
            });
        });
        assert_eq!(got, [Level::Debug, Level::Debug, Level::Debug]);
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging();
        init_logging();
        assert!(logging_initialized(), "first call must mark logging ready");
    }
}
