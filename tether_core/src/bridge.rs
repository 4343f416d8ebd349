// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle bridge.
//!
//! [`LifecycleBridge`] translates the host's GPU-surface renderer callbacks
//! into [`Engine`] calls:
//!
//! ```text
//!   host render thread
//!       │
//!       ├─ surface created ──► notify_surface_created()
//!       │                      └─ first time only: configure() ──► initialize([exe])
//!       ├─ surface changed ──► (nothing)
//!       ├─ draw frame ───────► render_frame() ── false ──► Shell::finish()
//!       └─ shutdown ─────────► destroy()
//! ```
//!
//! State is owned by the bridge instance, so several bridges (e.g. under
//! test) never share an "engine running" flag:
//!
//! ```text
//!   NotInitialized ──first surface──► Initialized ──render false──► Finished
//!         │                               │                           │
//!         └───────────── shutdown ────────┴──────────► Destroyed ◄────┘
//! ```
//!
//! All transitions are one-way. Surface creation is forwarded in every state
//! but `Destroyed`; only the first one initializes.

use alloc::vec;

use crate::activity::ActivityEvent;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::shell::Shell;
use crate::trace::{
    ActivityTraceEvent, EngineInitEvent, FinishEvent, FrameEvent, SurfaceChangedEvent,
    SurfaceCreatedEvent, Tracer,
};

/// Lifecycle state of a [`LifecycleBridge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BridgeState {
    /// No surface has been created yet; the engine has not been initialized.
    #[default]
    NotInitialized,
    /// The engine has been initialized and frames are being rendered.
    Initialized,
    /// The engine reported a render failure and the shell was asked to
    /// finish. No further frames are rendered.
    Finished,
    /// The engine was torn down with
    /// [`shutdown`](LifecycleBridge::shutdown). Nothing reaches it anymore.
    Destroyed,
}

impl BridgeState {
    /// Returns `true` once the engine's one-time initialization has run.
    #[inline]
    #[must_use]
    pub const fn is_initialized(self) -> bool {
        !matches!(self, Self::NotInitialized)
    }

    /// Returns `true` while the engine is initialized and not torn down.
    #[inline]
    #[must_use]
    pub const fn engine_live(self) -> bool {
        matches!(self, Self::Initialized | Self::Finished)
    }
}

/// Result of a draw callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameOutcome {
    /// The engine rendered a frame and wants to continue.
    Continue,
    /// The engine asked to stop (now or earlier) or was shut down. No frame
    /// was rendered after that.
    Finished,
}

impl FrameOutcome {
    /// Returns `true` if the host should keep delivering frames.
    #[inline]
    #[must_use]
    pub const fn keep_running(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Counters describing what a bridge has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Number of surface-created callbacks handled.
    pub surfaces_created: u64,
    /// Number of draw callbacks handled, rendered or not.
    pub frames: u64,
    /// Number of draw callbacks that reached the engine.
    pub frames_rendered: u64,
}

/// Forwards host surface callbacks to an [`Engine`].
///
/// The bridge is driven from a single host render thread; every method takes
/// `&mut self` and none of them block.
#[derive(Debug)]
pub struct LifecycleBridge<E, S> {
    engine: E,
    shell: S,
    config: EngineConfig,
    state: BridgeState,
    stats: BridgeStats,
}

impl<E: Engine, S: Shell> LifecycleBridge<E, S> {
    /// Creates a bridge in the [`BridgeState::NotInitialized`] state.
    ///
    /// `config` is read on the first surface creation and never modified.
    #[must_use]
    pub fn new(engine: E, shell: S, config: EngineConfig) -> Self {
        Self {
            engine,
            shell,
            config,
            state: BridgeState::NotInitialized,
            stats: BridgeStats::default(),
        }
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> BridgeState {
        self.state
    }

    /// Returns the counters accumulated so far.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// Returns the configuration pushed into the engine on initialization.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine.
    #[inline]
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the engine mutably.
    #[inline]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Returns the shell.
    #[inline]
    #[must_use]
    pub const fn shell(&self) -> &S {
        &self.shell
    }

    /// Consumes the bridge and returns its engine and shell.
    #[must_use]
    pub fn into_parts(self) -> (E, S) {
        (self.engine, self.shell)
    }

    /// Handles the host's surface-created callback.
    ///
    /// See [`on_surface_created_traced`](Self::on_surface_created_traced).
    pub fn on_surface_created(&mut self) {
        self.on_surface_created_traced(&mut Tracer::none());
    }

    /// Handles the host's surface-created callback, emitting trace events.
    ///
    /// The engine is notified unless it has been shut down. On the first call
    /// only, the engine is then configured and initialized with
    /// `[executable_path]` as its argument list, and the bridge moves to
    /// [`BridgeState::Initialized`].
    pub fn on_surface_created_traced(&mut self, tracer: &mut Tracer<'_>) {
        self.stats.surfaces_created += 1;
        let generation = self.stats.surfaces_created;
        tracer.surface_created(&SurfaceCreatedEvent {
            generation,
            state: self.state,
        });

        if self.state == BridgeState::Destroyed {
            return;
        }
        self.engine.notify_surface_created();

        if self.state.is_initialized() {
            return;
        }

        self.engine
            .configure(&self.config.data_path, &self.config.archive_path);
        let args = vec![self.config.executable_path.clone()];
        self.engine.initialize(&args);
        self.state = BridgeState::Initialized;

        tracer.engine_init(&EngineInitEvent {
            generation,
            argc: 1,
        });
    }

    /// Handles the host's surface-changed callback.
    ///
    /// This is intentionally inert: no engine call, no state change.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.on_surface_changed_traced(width, height, &mut Tracer::none());
    }

    /// Handles the host's surface-changed callback, emitting a trace event.
    pub fn on_surface_changed_traced(&mut self, width: u32, height: u32, tracer: &mut Tracer<'_>) {
        tracer.surface_changed(&SurfaceChangedEvent {
            generation: self.stats.surfaces_created,
            width,
            height,
        });
    }

    /// Handles the host's draw callback.
    ///
    /// See [`on_draw_frame_traced`](Self::on_draw_frame_traced).
    pub fn on_draw_frame(&mut self) -> FrameOutcome {
        self.on_draw_frame_traced(&mut Tracer::none())
    }

    /// Handles the host's draw callback, emitting trace events.
    ///
    /// Renders one frame. If the engine returns `false`, the shell is asked to
    /// finish and the bridge moves to [`BridgeState::Finished`]. Draw
    /// callbacks that arrive after that, or after
    /// [`shutdown`](Self::shutdown), neither render nor finish again.
    pub fn on_draw_frame_traced(&mut self, tracer: &mut Tracer<'_>) -> FrameOutcome {
        let frame_index = self.stats.frames;
        self.stats.frames += 1;

        if matches!(self.state, BridgeState::Finished | BridgeState::Destroyed) {
            tracer.frame(&FrameEvent {
                frame_index,
                rendered: false,
                keep_running: false,
            });
            return FrameOutcome::Finished;
        }

        self.stats.frames_rendered += 1;
        let keep_running = self.engine.render_frame();
        tracer.frame(&FrameEvent {
            frame_index,
            rendered: true,
            keep_running,
        });

        if keep_running {
            return FrameOutcome::Continue;
        }

        self.state = BridgeState::Finished;
        self.shell.finish();
        tracer.finish(&FinishEvent { frame_index });
        FrameOutcome::Finished
    }

    /// Handles an activity lifecycle notification.
    ///
    /// See [`on_activity_event_traced`](Self::on_activity_event_traced).
    pub fn on_activity_event(&mut self, event: ActivityEvent) {
        self.on_activity_event_traced(event, &mut Tracer::none());
    }

    /// Handles an activity lifecycle notification, emitting a trace event.
    ///
    /// Events are only forwarded while the engine is live (see
    /// [`BridgeState::engine_live`]). Resume/pause drive focus (pause also
    /// releases GPU resources) and low-memory reaches its hook. The remaining
    /// events are only traced. `Destroy` in particular leaves the engine
    /// alone: Android recreates activities inside one process (e.g. on
    /// rotation) and the engine outlives them. Use
    /// [`shutdown`](Self::shutdown) to tear it down.
    pub fn on_activity_event_traced(&mut self, event: ActivityEvent, tracer: &mut Tracer<'_>) {
        let forwarded = self.state.engine_live() && self.forward_activity(event);
        tracer.activity(&ActivityTraceEvent { event, forwarded });
    }

    /// Tears the engine down and moves to [`BridgeState::Destroyed`].
    ///
    /// [`Engine::destroy`] is called if the engine was initialized and has not
    /// been shut down already. Returns whether it was called. After this, the
    /// bridge forwards nothing: surfaces are not notified, frames are not
    /// rendered, and activity events are only traced.
    pub fn shutdown(&mut self) -> bool {
        let live = self.state.engine_live();
        if live {
            self.engine.destroy();
        }
        self.state = BridgeState::Destroyed;
        live
    }

    fn forward_activity(&mut self, event: ActivityEvent) -> bool {
        match event {
            ActivityEvent::Resume => self.engine.focus_changed(true),
            ActivityEvent::Pause => {
                self.engine.focus_changed(false);
                self.engine.release_resources();
            }
            ActivityEvent::LowMemory => self.engine.low_memory(),
            ActivityEvent::Create
            | ActivityEvent::Start
            | ActivityEvent::Stop
            | ActivityEvent::Restart
            | ActivityEvent::Destroy
            | ActivityEvent::FocusChanged(_) => return false,
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
