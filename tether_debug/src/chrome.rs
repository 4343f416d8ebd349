// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Surface, activity, and shutdown events become global instant events so
//! they stand out across the whole timeline; frames become thread-scoped
//! instants on the render thread track.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

const PID: u32 = 0;
const RENDER_TID: u32 = 0;
const ACTIVITY_TID: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Record timestamps are used as microseconds directly.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = vec![
        json!({
            "ph": "M",
            "name": "thread_name",
            "pid": PID,
            "tid": RENDER_TID,
            "args": { "name": "render" },
        }),
        json!({
            "ph": "M",
            "name": "thread_name",
            "pid": PID,
            "tid": ACTIVITY_TID,
            "args": { "name": "activity" },
        }),
    ];

    for record in decode(bytes) {
        let ts = record.timestamp;
        match record.event {
            RecordedEvent::SurfaceCreated(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SurfaceCreated",
                    "cat": "Surface",
                    "ts": ts,
                    "pid": PID,
                    "tid": RENDER_TID,
                    "s": "g",
                    "args": {
                        "generation": e.generation,
                        "state": format!("{:?}", e.state),
                    }
                }));
            }
            RecordedEvent::EngineInit(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "EngineInit",
                    "cat": "Engine",
                    "ts": ts,
                    "pid": PID,
                    "tid": RENDER_TID,
                    "s": "g",
                    "args": {
                        "generation": e.generation,
                        "argc": e.argc,
                    }
                }));
            }
            RecordedEvent::SurfaceChanged(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SurfaceChanged",
                    "cat": "Surface",
                    "ts": ts,
                    "pid": PID,
                    "tid": RENDER_TID,
                    "s": "t",
                    "args": {
                        "generation": e.generation,
                        "width": e.width,
                        "height": e.height,
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": PID,
                    "tid": RENDER_TID,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "rendered": e.rendered,
                        "keep_running": e.keep_running,
                    }
                }));
            }
            RecordedEvent::Finish(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Finish",
                    "cat": "Shell",
                    "ts": ts,
                    "pid": PID,
                    "tid": RENDER_TID,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Activity(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": e.event.name(),
                    "cat": "Activity",
                    "ts": ts,
                    "pid": PID,
                    "tid": ACTIVITY_TID,
                    "s": "t",
                    "args": {
                        "forwarded": e.forwarded,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use tether_core::activity::ActivityEvent;
    use tether_core::bridge::BridgeState;
    use tether_core::trace::{
        ActivityTraceEvent, FinishEvent, FrameEvent, SurfaceCreatedEvent, TraceSink,
    };

    fn parse(bytes: &[u8]) -> Vec<Value> {
        let mut out = Vec::new();
        export(bytes, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::sequential();
        rec.on_surface_created(&SurfaceCreatedEvent {
            generation: 1,
            state: BridgeState::NotInitialized,
        });
        rec.on_frame(&FrameEvent {
            frame_index: 0,
            rendered: true,
            keep_running: false,
        });
        rec.on_finish(&FinishEvent { frame_index: 0 });
        rec.on_activity(&ActivityTraceEvent {
            event: ActivityEvent::Destroy,
            forwarded: true,
        });

        let parsed = parse(rec.as_bytes());
        // Two thread-name metadata records, then the four events.
        assert_eq!(parsed.len(), 6);
        assert_eq!(parsed[0]["ph"], "M");

        assert_eq!(parsed[2]["name"], "SurfaceCreated");
        assert_eq!(parsed[2]["s"], "g");
        assert_eq!(parsed[2]["args"]["state"], "NotInitialized");

        assert_eq!(parsed[3]["name"], "Frame");
        assert_eq!(parsed[3]["ts"], 1);
        assert_eq!(parsed[3]["args"]["keep_running"], false);

        assert_eq!(parsed[4]["name"], "Finish");
        assert_eq!(parsed[5]["name"], "destroy");
        assert_eq!(parsed[5]["tid"], ACTIVITY_TID);
    }

    #[test]
    fn export_empty_recording() {
        let parsed = parse(&[]);
        assert!(
            parsed.iter().all(|e| e["ph"] == "M"),
            "only metadata expected, got {parsed:?}"
        );
    }
}
