// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted engines and lifecycle scenarios for exercising tether bridges.
//!
//! A [`Scenario`] is a list of host callbacks ([`Step`]s). Running it drives a
//! fresh [`LifecycleBridge`] wired to a [`ScriptedEngine`] and a
//! [`RecordingShell`], and returns a [`ScenarioReport`] describing every
//! engine call and shell request that resulted.
//!
//! ```rust
//! use tether_core::config::EngineConfig;
//! use tether_harness::{Scenario, Step};
//!
//! let report = Scenario::new(EngineConfig::new("assets", "app.apk", "app.apk"))
//!     .steps([Step::SurfaceCreated, Step::Draw(true), Step::Draw(false)])
//!     .run();
//! assert_eq!(report.inits(), 1);
//! assert_eq!(report.finishes, 1);
//! ```

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use tether_core::activity::ActivityEvent;
use tether_core::bridge::{BridgeState, BridgeStats, FrameOutcome, LifecycleBridge};
use tether_core::config::EngineConfig;
use tether_core::engine::Engine;
use tether_core::shell::Shell;
use tether_core::trace::Tracer;

/// One engine call observed by a [`ScriptedEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCall {
    /// `notify_surface_created()`
    SurfaceCreated,
    /// `configure(data_path, archive_path)`
    Configure {
        /// Data path received.
        data_path: String,
        /// Archive path received.
        archive_path: String,
    },
    /// `initialize(args)`
    Initialize(Vec<String>),
    /// `render_frame()` and the answer it gave.
    Render(bool),
    /// `focus_changed(focused)`
    FocusChanged(bool),
    /// `release_resources()`
    ReleaseResources,
    /// `low_memory()`
    LowMemory,
    /// `destroy()`, from a bridge shutdown.
    Destroy,
}

/// An [`Engine`] that records every call and answers renders from a queue.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEngine {
    calls: Vec<EngineCall>,
    next_render: Option<bool>,
}

impl ScriptedEngine {
    /// Creates an engine with an empty call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer for the next render. Unset answers are `true`.
    pub fn answer_next_render(&mut self, keep_running: bool) {
        self.next_render = Some(keep_running);
    }

    /// Returns the calls recorded so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Consumes the engine and returns its call log.
    #[must_use]
    pub fn into_calls(self) -> Vec<EngineCall> {
        self.calls
    }
}

impl Engine for ScriptedEngine {
    fn notify_surface_created(&mut self) {
        self.calls.push(EngineCall::SurfaceCreated);
    }

    fn configure(&mut self, data_path: &str, archive_path: &str) {
        self.calls.push(EngineCall::Configure {
            data_path: data_path.into(),
            archive_path: archive_path.into(),
        });
    }

    fn initialize(&mut self, args: &[String]) {
        self.calls.push(EngineCall::Initialize(args.to_vec()));
    }

    fn render_frame(&mut self) -> bool {
        let keep_running = self.next_render.take().unwrap_or(true);
        self.calls.push(EngineCall::Render(keep_running));
        keep_running
    }

    fn focus_changed(&mut self, focused: bool) {
        self.calls.push(EngineCall::FocusChanged(focused));
    }

    fn release_resources(&mut self) {
        self.calls.push(EngineCall::ReleaseResources);
    }

    fn low_memory(&mut self) {
        self.calls.push(EngineCall::LowMemory);
    }

    fn destroy(&mut self) {
        self.calls.push(EngineCall::Destroy);
    }
}

/// A [`Shell`] that counts finish requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordingShell {
    /// Number of `finish()` calls received.
    pub finishes: u32,
}

impl Shell for RecordingShell {
    fn finish(&mut self) {
        self.finishes += 1;
    }
}

/// One host callback in a [`Scenario`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// `onSurfaceCreated`
    SurfaceCreated,
    /// `onSurfaceChanged(width, height)`
    SurfaceChanged(u32, u32),
    /// `onDrawFrame`, with the answer the engine gives if it is asked to
    /// render.
    Draw(bool),
    /// An activity lifecycle notification.
    Activity(ActivityEvent),
    /// Engine teardown ([`LifecycleBridge::shutdown`]).
    Shutdown,
}

/// A scripted sequence of host callbacks.
#[derive(Clone, Debug)]
pub struct Scenario {
    config: EngineConfig,
    steps: Vec<Step>,
}

impl Scenario {
    /// Creates an empty scenario whose bridge uses `config`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            steps: Vec::new(),
        }
    }

    /// Appends steps.
    #[must_use]
    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Appends one step.
    #[must_use]
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Returns the steps in order.
    #[must_use]
    pub fn as_steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs the scenario against a fresh bridge.
    #[must_use]
    pub fn run(&self) -> ScenarioReport {
        self.run_traced(&mut Tracer::none())
    }

    /// Runs the scenario against a fresh bridge, emitting trace events.
    #[must_use]
    pub fn run_traced(&self, tracer: &mut Tracer<'_>) -> ScenarioReport {
        let mut bridge = LifecycleBridge::new(
            ScriptedEngine::new(),
            RecordingShell::default(),
            self.config.clone(),
        );
        let mut outcomes = Vec::new();
        let mut finished_after_render = None;

        for step in &self.steps {
            match *step {
                Step::SurfaceCreated => bridge.on_surface_created_traced(tracer),
                Step::SurfaceChanged(width, height) => {
                    bridge.on_surface_changed_traced(width, height, tracer);
                }
                Step::Draw(answer) => {
                    bridge.engine_mut().answer_next_render(answer);
                    let finishes_before = bridge.shell().finishes;
                    outcomes.push(bridge.on_draw_frame_traced(tracer));
                    // An answer the bridge never asked for must not leak into
                    // a later draw.
                    bridge.engine_mut().next_render = None;
                    if bridge.shell().finishes > finishes_before {
                        finished_after_render = Some(bridge.stats().frames_rendered);
                    }
                }
                Step::Activity(event) => bridge.on_activity_event_traced(event, tracer),
                Step::Shutdown => {
                    bridge.shutdown();
                }
            }
        }

        let state = bridge.state();
        let stats = bridge.stats();
        let (engine, shell) = bridge.into_parts();
        ScenarioReport {
            calls: engine.into_calls(),
            finishes: shell.finishes,
            finished_after_render,
            outcomes,
            state,
            stats,
        }
    }
}

/// What happened while running a [`Scenario`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Every engine call, oldest first.
    pub calls: Vec<EngineCall>,
    /// Number of shell finish requests.
    pub finishes: u32,
    /// Number of renders performed when the (first) finish was requested.
    pub finished_after_render: Option<u64>,
    /// Outcome of each draw step, in order.
    pub outcomes: Vec<FrameOutcome>,
    /// Bridge state after the last step.
    pub state: BridgeState,
    /// Bridge counters after the last step.
    pub stats: BridgeStats,
}

impl ScenarioReport {
    fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Number of `initialize` calls.
    #[must_use]
    pub fn inits(&self) -> usize {
        self.count(|c| matches!(c, EngineCall::Initialize(_)))
    }

    /// Number of `render_frame` calls.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.count(|c| matches!(c, EngineCall::Render(_)))
    }

    /// Number of surface-created notifications.
    #[must_use]
    pub fn notifications(&self) -> usize {
        self.count(|c| *c == EngineCall::SurfaceCreated)
    }

    /// Position of the first call matching `pred` in the log.
    #[must_use]
    pub fn position(&self, pred: impl Fn(&EngineCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn config() -> EngineConfig {
        EngineConfig::new(
            ".",
            "/sdcard/Android/obb/org.example/main.7.org.example.obb",
            "/data/app/org.example/base.apk",
        )
    }

    fn run(steps: &[Step]) -> ScenarioReport {
        Scenario::new(config()).steps(steps.iter().copied()).run()
    }

    #[test]
    fn third_frame_failure_finishes_once() {
        let report = run(&[
            Step::SurfaceCreated,
            Step::Draw(true),
            Step::Draw(true),
            Step::Draw(false),
        ]);
        assert_eq!(report.inits(), 1);
        assert_eq!(report.renders(), 3);
        assert_eq!(report.finishes, 1);
        assert_eq!(report.finished_after_render, Some(3));
        assert_eq!(
            report.outcomes,
            [
                FrameOutcome::Continue,
                FrameOutcome::Continue,
                FrameOutcome::Finished
            ]
        );
        assert_eq!(report.state, BridgeState::Finished);
    }

    #[test]
    fn recreated_surface_renders_once() {
        let report = run(&[Step::SurfaceCreated, Step::SurfaceCreated, Step::Draw(true)]);
        assert_eq!(report.inits(), 1);
        assert_eq!(report.notifications(), 2);
        assert_eq!(report.renders(), 1);
        assert_eq!(report.finishes, 0);
    }

    #[test]
    fn configure_precedes_initialize_with_executable_path() {
        let report = run(&[Step::SurfaceCreated]);
        assert_eq!(
            report.calls,
            [
                EngineCall::SurfaceCreated,
                EngineCall::Configure {
                    data_path: ".".into(),
                    archive_path: "/sdcard/Android/obb/org.example/main.7.org.example.obb"
                        .into(),
                },
                EngineCall::Initialize(vec!["/data/app/org.example/base.apk".into()]),
            ]
        );
    }

    #[test]
    fn init_runs_at_most_once_for_any_surface_count() {
        for surfaces in 0..6 {
            let steps = vec![Step::SurfaceCreated; surfaces];
            let report = run(&steps);
            assert_eq!(report.inits(), surfaces.min(1), "surfaces={surfaces}");
            assert_eq!(report.notifications(), surfaces, "surfaces={surfaces}");
        }
    }

    #[test]
    fn resizes_make_no_engine_calls() {
        let report = run(&[
            Step::SurfaceChanged(640, 480),
            Step::SurfaceCreated,
            Step::SurfaceChanged(1920, 1080),
            Step::SurfaceChanged(1080, 1920),
        ]);
        assert_eq!(report.calls.len(), 3, "only the init sequence expected");
        assert_eq!(report.state, BridgeState::Initialized);
    }

    #[test]
    fn unused_answers_do_not_leak() {
        // The `false` is never consumed because the bridge already finished;
        // the recreated surface must not resurrect rendering.
        let report = run(&[
            Step::SurfaceCreated,
            Step::Draw(false),
            Step::Draw(false),
            Step::SurfaceCreated,
            Step::Draw(true),
        ]);
        assert_eq!(report.renders(), 1);
        assert_eq!(report.finishes, 1);
        assert_eq!(report.stats.frames, 3);
        assert_eq!(report.stats.frames_rendered, 1);
    }

    #[test]
    fn screen_lock_cycle() {
        let report = run(&[
            Step::SurfaceCreated,
            Step::SurfaceChanged(1080, 1920),
            Step::Draw(true),
            Step::Activity(ActivityEvent::Pause),
            Step::Activity(ActivityEvent::Stop),
            Step::Activity(ActivityEvent::Restart),
            Step::Activity(ActivityEvent::Start),
            Step::Activity(ActivityEvent::Resume),
            Step::SurfaceCreated,
            Step::Draw(true),
        ]);
        let pause = report
            .position(|c| *c == EngineCall::FocusChanged(false))
            .unwrap();
        assert_eq!(report.calls[pause + 1], EngineCall::ReleaseResources);
        assert!(
            report.position(|c| *c == EngineCall::FocusChanged(true)) > Some(pause),
            "focus regained after pause"
        );
        assert_eq!(report.inits(), 1);
        assert_eq!(report.notifications(), 2);
        assert_eq!(report.renders(), 2);
    }

    #[test]
    fn recreated_activity_keeps_the_engine() {
        // Rotation: the activity is destroyed and recreated in the same
        // process, and the engine keeps rendering on the new surface.
        let report = run(&[
            Step::SurfaceCreated,
            Step::Activity(ActivityEvent::Destroy),
            Step::SurfaceCreated,
            Step::Draw(true),
        ]);
        assert_eq!(report.position(|c| *c == EngineCall::Destroy), None);
        assert_eq!(report.inits(), 1);
        assert_eq!(report.notifications(), 2);
        assert_eq!(report.renders(), 1);
        assert_eq!(report.state, BridgeState::Initialized);
    }

    #[test]
    fn no_engine_calls_after_shutdown() {
        let report = run(&[
            Step::SurfaceCreated,
            Step::Shutdown,
            Step::SurfaceCreated,
            Step::Draw(true),
            Step::Activity(ActivityEvent::Resume),
            Step::Shutdown,
        ]);
        let destroy = report.position(|c| *c == EngineCall::Destroy).unwrap();
        assert_eq!(destroy, report.calls.len() - 1, "destroy must be the last call");
        assert_eq!(report.count(|c| *c == EngineCall::Destroy), 1);
        assert_eq!(report.renders(), 0);
        assert_eq!(report.outcomes, [FrameOutcome::Finished]);
        assert_eq!(report.finishes, 0);
        assert_eq!(report.state, BridgeState::Destroyed);
    }

    #[test]
    fn activity_before_first_surface_is_ignored() {
        let report = run(&[
            Step::Activity(ActivityEvent::Create),
            Step::Activity(ActivityEvent::Start),
            Step::Activity(ActivityEvent::Resume),
            Step::SurfaceCreated,
        ]);
        assert_eq!(report.position(|c| matches!(c, EngineCall::FocusChanged(_))), None);
    }

    #[test]
    fn scenario_builder_appends() {
        let scenario = Scenario::new(config())
            .then(Step::SurfaceCreated)
            .steps([Step::Draw(true), Step::Activity(ActivityEvent::LowMemory)]);
        assert_eq!(scenario.as_steps().len(), 3);
        let report = scenario.run();
        assert_eq!(report.calls.last(), Some(&EngineCall::LowMemory));
    }
}
