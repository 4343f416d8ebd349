// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated Android renderer lifecycle that exercises the tracing pipeline.
//!
//! Replays app launch, a few frames, a screen lock/unlock (which recreates the
//! GL surface), a low-memory warning, an engine-requested exit and the final
//! engine teardown.
//! Events go to both a [`PrettyPrintSink`](tether_debug::pretty::PrettyPrintSink)
//! and a [`RecorderSink`](tether_debug::recorder::RecorderSink), then a Chrome
//! trace JSON file is exported.

use std::fs::File;
use std::io::BufWriter;

use tether_core::activity::ActivityEvent;
use tether_core::config::{ResourceLocator, ResourceRoot};
use tether_core::trace::{
    ActivityTraceEvent, EngineInitEvent, FinishEvent, FrameEvent, SurfaceChangedEvent,
    SurfaceCreatedEvent, TraceSink, Tracer,
};
use tether_harness::{Scenario, Step};

use tether_debug::pretty::PrettyPrintSink;
use tether_debug::recorder::RecorderSink;

const FRAMES_BEFORE_LOCK: usize = 3;
const FRAMES_AFTER_UNLOCK: usize = 4;

/// Sends every event to both sinks.
struct Both<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Both<'_> {
    fn on_surface_created(&mut self, e: &SurfaceCreatedEvent) {
        self.pretty.on_surface_created(e);
        self.recorder.on_surface_created(e);
    }

    fn on_engine_init(&mut self, e: &EngineInitEvent) {
        self.pretty.on_engine_init(e);
        self.recorder.on_engine_init(e);
    }

    fn on_surface_changed(&mut self, e: &SurfaceChangedEvent) {
        self.pretty.on_surface_changed(e);
        self.recorder.on_surface_changed(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.pretty.on_frame(e);
        self.recorder.on_frame(e);
    }

    fn on_finish(&mut self, e: &FinishEvent) {
        self.pretty.on_finish(e);
        self.recorder.on_finish(e);
    }

    fn on_activity(&mut self, e: &ActivityTraceEvent) {
        self.pretty.on_activity(e);
        self.recorder.on_activity(e);
    }
}

fn main() {
    // -- resources -----------------------------------------------------------
    let locator = ResourceLocator {
        shared_path: "/storage/emulated/0".into(),
        package_name: "dev.tether.demo".into(),
        version_code: "12".into(),
        forced_archive_path: String::new(),
        archive_backed: true,
    };
    let root: ResourceRoot = locator.resolve().expect("demo locator is valid");
    println!("resources: {:?} in {:?}", root.kind, root.cwd);
    let config = root.to_config("/data/app/dev.tether.demo/base.apk");

    // -- lifecycle -----------------------------------------------------------
    let scenario = Scenario::new(config)
        .steps([
            Step::Activity(ActivityEvent::Create),
            Step::Activity(ActivityEvent::Start),
            Step::Activity(ActivityEvent::Resume),
            Step::SurfaceCreated,
            Step::SurfaceChanged(1080, 2340),
        ])
        .steps([Step::Draw(true); FRAMES_BEFORE_LOCK])
        // Screen lock.
        .steps([
            Step::Activity(ActivityEvent::FocusChanged(false)),
            Step::Activity(ActivityEvent::Pause),
            Step::Activity(ActivityEvent::Stop),
        ])
        // Unlock: the GL context was lost, so the surface comes back.
        .steps([
            Step::Activity(ActivityEvent::Restart),
            Step::Activity(ActivityEvent::Start),
            Step::Activity(ActivityEvent::Resume),
            Step::Activity(ActivityEvent::FocusChanged(true)),
            Step::SurfaceCreated,
            Step::SurfaceChanged(1080, 2340),
            Step::Activity(ActivityEvent::LowMemory),
        ])
        .steps([Step::Draw(true); FRAMES_AFTER_UNLOCK])
        // The engine quits; the host delivers one more frame before the
        // activity goes away.
        .steps([
            Step::Draw(false),
            Step::Draw(true),
            Step::Activity(ActivityEvent::Pause),
            Step::Activity(ActivityEvent::Destroy),
            Step::Shutdown,
        ]);

    // -- sinks ---------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    let report = {
        let mut both = Both {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut both);
        scenario.run_traced(&mut tracer)
    };

    println!(
        "inits={} notifications={} renders={} finishes={} state={:?}",
        report.inits(),
        report.notifications(),
        report.renders(),
        report.finishes,
        report.state,
    );

    // -- export Chrome trace -------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    tether_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} steps)", scenario.as_steps().len());
}
