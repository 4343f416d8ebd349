// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process-wide bridge slot.
//!
//! JNI entry points are free functions, so the bridge they drive has to live
//! somewhere global. [`Registry`] is that slot; the JNI glue uses the single
//! static instance behind [`install`], tests build their own.
//!
//! Callbacks that arrive before [`install`] are logged and ignored. Draw
//! callbacks report "keep running" in that case so the host loop stays alive
//! until an engine exists.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use tether_core::activity::ActivityEvent;
use tether_core::bridge::{BridgeState, LifecycleBridge};
use tether_core::config::{ConfigError, EngineConfig};
use tether_core::engine::Engine;
use tether_core::shell::Shell;
use tether_core::trace::Tracer;

use crate::logging::{LOG_TAG, LogSink, init_logging};
use crate::shell::ActivityShell;

/// The engine type stored in a [`Registry`].
pub type BoxedEngine = Box<dyn Engine + Send>;

/// Errors returned by [`install`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallError {
    /// The configuration cannot drive initialization.
    Config(ConfigError),
    /// An engine is already installed in this process.
    AlreadyInstalled,
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid engine configuration: {err}"),
            Self::AlreadyInstalled => f.write_str("an engine is already installed"),
        }
    }
}

impl std::error::Error for InstallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::AlreadyInstalled => None,
        }
    }
}

impl From<ConfigError> for InstallError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// A lockable slot holding at most one [`LifecycleBridge`].
pub struct Registry<S = ActivityShell> {
    slot: Mutex<Option<LifecycleBridge<BoxedEngine, S>>>,
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Registry<S> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<LifecycleBridge<BoxedEngine, S>>> {
        self.slot.lock().unwrap_or_else(|poisoned| {
            log::error!(target: LOG_TAG, "bridge slot was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

impl<S: Shell> Registry<S> {
    /// Installs `engine` behind a fresh bridge.
    ///
    /// The configuration is validated first. Only one engine may be installed
    /// per registry.
    pub fn install(
        &self,
        engine: BoxedEngine,
        shell: S,
        config: EngineConfig,
    ) -> Result<(), InstallError> {
        config.validate()?;
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(InstallError::AlreadyInstalled);
        }
        log::info!(
            target: LOG_TAG,
            "engine installed (data {:?}, archive {:?})",
            config.data_path,
            config.archive_path
        );
        *slot = Some(LifecycleBridge::new(engine, shell, config));
        Ok(())
    }

    /// Returns `true` once an engine is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.lock().is_some()
    }

    /// Returns the installed bridge's state, if any.
    #[must_use]
    pub fn state(&self) -> Option<BridgeState> {
        self.lock().as_ref().map(LifecycleBridge::state)
    }

    /// Runs `f` against the installed bridge with a logcat tracer.
    ///
    /// Returns `None` (and logs `callback`) when nothing is installed.
    pub fn with_bridge<R>(
        &self,
        callback: &str,
        f: impl FnOnce(&mut LifecycleBridge<BoxedEngine, S>, &mut Tracer<'_>) -> R,
    ) -> Option<R> {
        let mut slot = self.lock();
        let Some(bridge) = slot.as_mut() else {
            log::warn!(target: LOG_TAG, "{callback} before install; ignored");
            return None;
        };
        let mut sink = LogSink;
        let mut tracer = Tracer::new(&mut sink);
        Some(f(bridge, &mut tracer))
    }

    /// Forwards a surface-created callback.
    pub fn surface_created(&self) {
        self.with_bridge("onSurfaceCreated", |bridge, tracer| {
            bridge.on_surface_created_traced(tracer);
        });
    }

    /// Forwards a surface-changed callback.
    pub fn surface_changed(&self, width: u32, height: u32) {
        self.with_bridge("onSurfaceChanged", |bridge, tracer| {
            bridge.on_surface_changed_traced(width, height, tracer);
        });
    }

    /// Forwards a draw callback and returns whether the host should keep
    /// drawing.
    #[must_use]
    pub fn draw_frame(&self) -> bool {
        self.with_bridge("onDrawFrame", |bridge, tracer| {
            bridge.on_draw_frame_traced(tracer).keep_running()
        })
        .unwrap_or(true)
    }

    /// Forwards an activity lifecycle notification.
    pub fn activity_event(&self, event: ActivityEvent) {
        self.with_bridge(event.name(), |bridge, tracer| {
            bridge.on_activity_event_traced(event, tracer);
        });
    }

    /// Tears the installed engine down. Later callbacks reach nothing.
    pub fn shutdown(&self) {
        let destroyed = self.with_bridge("destroy", |bridge, _| bridge.shutdown());
        if destroyed == Some(true) {
            log::info!(target: LOG_TAG, "engine destroyed");
        }
    }
}

pub(crate) static REGISTRY: Registry = Registry::new();

/// Installs the process-wide engine the JNI entry points drive.
///
/// Call this once from the application's own init path (for example
/// `JNI_OnLoad`), before the renderer's first surface. The activity shell
/// picks up whatever activity `nativeSetActivity` registered. Logcat output
/// is set up here, so install errors the caller logs are not lost.
pub fn install(engine: BoxedEngine, config: EngineConfig) -> Result<(), InstallError> {
    init_logging();
    REGISTRY.install(engine, ActivityShell, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Counters {
        inits: AtomicU32,
        renders: AtomicU32,
        finishes: AtomicU32,
        releases: AtomicU32,
        destroys: AtomicU32,
    }

    struct CountingEngine {
        counters: Arc<Counters>,
        fail_at: u32,
    }

    impl Engine for CountingEngine {
        fn notify_surface_created(&mut self) {}

        fn configure(&mut self, _data_path: &str, _archive_path: &str) {}

        fn initialize(&mut self, _args: &[String]) {
            self.counters.inits.fetch_add(1, Ordering::Relaxed);
        }

        fn render_frame(&mut self) -> bool {
            let n = self.counters.renders.fetch_add(1, Ordering::Relaxed) + 1;
            n != self.fail_at
        }

        fn release_resources(&mut self) {
            self.counters.releases.fetch_add(1, Ordering::Relaxed);
        }

        fn destroy(&mut self) {
            self.counters.destroys.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct CountingShell(Arc<Counters>);

    impl Shell for CountingShell {
        fn finish(&mut self) {
            self.0.finishes.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn installed(fail_at: u32) -> (Registry<CountingShell>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let registry = Registry::new();
        registry
            .install(
                Box::new(CountingEngine {
                    counters: counters.clone(),
                    fail_at,
                }),
                CountingShell(counters.clone()),
                EngineConfig::new(".", "main.obb", "/data/app/base.apk"),
            )
            .unwrap();
        (registry, counters)
    }

    #[test]
    fn callbacks_before_install_are_ignored() {
        let registry = Registry::<CountingShell>::new();
        registry.surface_created();
        registry.surface_changed(1, 1);
        registry.activity_event(ActivityEvent::Pause);
        assert!(registry.draw_frame(), "host loop must stay alive");
        assert!(!registry.is_installed());
        assert_eq!(registry.state(), None);
    }

    #[test]
    fn install_rejects_invalid_config() {
        let registry = Registry::<CountingShell>::new();
        let counters = Arc::new(Counters::default());
        let err = registry
            .install(
                Box::new(CountingEngine {
                    counters: counters.clone(),
                    fail_at: 0,
                }),
                CountingShell(counters),
                EngineConfig::new("assets", "base.apk", ""),
            )
            .unwrap_err();
        assert_eq!(err, InstallError::Config(ConfigError::EmptyExecutablePath));
        assert!(!registry.is_installed());
    }

    #[test]
    fn second_install_is_rejected() {
        let (registry, counters) = installed(0);
        let err = registry
            .install(
                Box::new(CountingEngine {
                    counters: counters.clone(),
                    fail_at: 0,
                }),
                CountingShell(counters),
                EngineConfig::new(".", "", "exe"),
            )
            .unwrap_err();
        assert_eq!(err, InstallError::AlreadyInstalled);
    }

    #[test]
    fn drives_installed_bridge_until_finish() {
        let (registry, counters) = installed(2);
        assert_eq!(registry.state(), Some(BridgeState::NotInitialized));
        registry.surface_created();
        registry.surface_changed(1080, 1920);
        assert!(registry.draw_frame());
        assert!(!registry.draw_frame(), "second render fails");
        assert!(!registry.draw_frame(), "finished bridges stay finished");

        assert_eq!(counters.inits.load(Ordering::Relaxed), 1);
        assert_eq!(counters.renders.load(Ordering::Relaxed), 2);
        assert_eq!(counters.finishes.load(Ordering::Relaxed), 1);
        assert_eq!(registry.state(), Some(BridgeState::Finished));
    }

    #[test]
    fn activity_events_reach_installed_engine() {
        let (registry, counters) = installed(0);
        registry.surface_created();
        registry.activity_event(ActivityEvent::Pause);
        assert_eq!(counters.releases.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn activity_destroy_leaves_engine_running() {
        let (registry, counters) = installed(0);
        registry.surface_created();
        registry.activity_event(ActivityEvent::Destroy);
        registry.surface_created();
        assert!(registry.draw_frame());
        assert_eq!(counters.destroys.load(Ordering::Relaxed), 0);
        assert_eq!(counters.renders.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn shutdown_stops_rendering() {
        let (registry, counters) = installed(0);
        registry.surface_created();
        registry.shutdown();
        registry.shutdown();
        assert!(!registry.draw_frame(), "destroyed engines do not render");
        assert_eq!(counters.destroys.load(Ordering::Relaxed), 1);
        assert_eq!(counters.renders.load(Ordering::Relaxed), 0);
        assert_eq!(registry.state(), Some(BridgeState::Destroyed));
    }

    #[test]
    fn process_install_sets_up_logging_first() {
        // An invalid config never reaches the process-wide slot, but logging
        // must be ready so the caller can report the error.
        let counters = Arc::new(Counters::default());
        let err = install(
            Box::new(CountingEngine {
                counters,
                fail_at: 0,
            }),
            EngineConfig::new("assets", "base.apk", ""),
        )
        .unwrap_err();
        assert_eq!(err, InstallError::Config(ConfigError::EmptyExecutablePath));
        assert!(crate::logging::logging_initialized(), "install must init logging");
        assert!(!REGISTRY.is_installed());
    }

    #[test]
    fn install_error_reports_source() {
        use std::error::Error as _;
        let err = InstallError::from(ConfigError::EmptyPackageName);
        assert!(err.source().is_some(), "config errors carry a source");
        assert!(err.to_string().contains("package name"), "got: {err}");
    }
}
