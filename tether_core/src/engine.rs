// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine contract for the lifecycle bridge.
//!
//! Tether does not render anything itself. GPU resource management, frame
//! timing and the actual draw live in an *engine* that the embedding
//! application supplies. The bridge only decides *when* the engine
//! hears about a lifecycle event:
//!
//! - **Surface notification**: every time the host creates a GPU surface,
//!   including recreations after screen lock or context loss.
//! - **Configuration**: data and archive paths, pushed once before init.
//! - **Initialization**: one-time startup with an `argv`-style list whose
//!   first element is the executable path.
//! - **Rendering**: one frame per host draw callback; returning `false`
//!   asks the host to shut down.
//!
//! The activity-level hooks ([`focus_changed`](Engine::focus_changed),
//! [`release_resources`](Engine::release_resources),
//! [`low_memory`](Engine::low_memory), [`destroy`](Engine::destroy)) default
//! to no-ops so a minimal engine only implements the four required methods.
//!
//! # Crate boundaries
//!
//! `tether_core` owns this contract and the [`LifecycleBridge`] that drives
//! it. Platform crates (e.g. `tether_backend_android`) turn host callbacks
//! into bridge calls. Applications implement [`Engine`] and hand it to the
//! platform crate.
//!
//! [`LifecycleBridge`]: crate::bridge::LifecycleBridge

use alloc::boxed::Box;
use alloc::string::String;

/// The native engine the bridge forwards lifecycle events to.
///
/// Implemented by the real engine and by test doubles, enabling generic
/// bridges and scripted lifecycle tests.
///
/// # Call order
///
/// A bridge drives an engine like this:
///
/// ```rust,ignore
/// // first surface
/// engine.notify_surface_created();
/// engine.configure(&config.data_path, &config.archive_path);
/// engine.initialize(&[config.executable_path.clone()]);
///
/// // every host draw callback
/// if !engine.render_frame() {
///     shell.finish();
/// }
///
/// // surface recreated (screen lock, context loss)
/// engine.notify_surface_created();
/// ```
pub trait Engine {
    /// Called whenever the host has created a GPU surface.
    ///
    /// Surfaces may be destroyed and recreated many times during one process
    /// lifetime; the engine should (re)allocate GPU-side resources here.
    fn notify_surface_created(&mut self);

    /// Sets the engine's resource paths. Called once, before
    /// [`initialize`](Self::initialize).
    fn configure(&mut self, data_path: &str, archive_path: &str);

    /// One-time engine startup.
    ///
    /// `args[0]` is the executable path by convention. Failures are the
    /// engine's own business; the bridge does not observe them.
    fn initialize(&mut self, args: &[String]);

    /// Renders one frame. Returns `false` when the application should stop.
    fn render_frame(&mut self) -> bool;

    /// The hosting activity gained or lost input focus.
    fn focus_changed(&mut self, focused: bool) {
        _ = focused;
    }

    /// The host is pausing and the GL context may be lost; drop GPU resources
    /// that can be reloaded later.
    fn release_resources(&mut self) {}

    /// The host reported memory pressure.
    fn low_memory(&mut self) {}

    /// The engine is being torn down for good. Called at most once, by
    /// [`LifecycleBridge::shutdown`](crate::bridge::LifecycleBridge::shutdown).
    fn destroy(&mut self) {}
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    #[inline]
    fn notify_surface_created(&mut self) {
        (**self).notify_surface_created();
    }

    #[inline]
    fn configure(&mut self, data_path: &str, archive_path: &str) {
        (**self).configure(data_path, archive_path);
    }

    #[inline]
    fn initialize(&mut self, args: &[String]) {
        (**self).initialize(args);
    }

    #[inline]
    fn render_frame(&mut self) -> bool {
        (**self).render_frame()
    }

    #[inline]
    fn focus_changed(&mut self, focused: bool) {
        (**self).focus_changed(focused);
    }

    #[inline]
    fn release_resources(&mut self) {
        (**self).release_resources();
    }

    #[inline]
    fn low_memory(&mut self) {
        (**self).low_memory();
    }

    #[inline]
    fn destroy(&mut self) {
        (**self).destroy();
    }
}

impl<E: Engine + ?Sized> Engine for &mut E {
    #[inline]
    fn notify_surface_created(&mut self) {
        (**self).notify_surface_created();
    }

    #[inline]
    fn configure(&mut self, data_path: &str, archive_path: &str) {
        (**self).configure(data_path, archive_path);
    }

    #[inline]
    fn initialize(&mut self, args: &[String]) {
        (**self).initialize(args);
    }

    #[inline]
    fn render_frame(&mut self) -> bool {
        (**self).render_frame()
    }

    #[inline]
    fn focus_changed(&mut self, focused: bool) {
        (**self).focus_changed(focused);
    }

    #[inline]
    fn release_resources(&mut self) {
        (**self).release_resources();
    }

    #[inline]
    fn low_memory(&mut self) {
        (**self).low_memory();
    }

    #[inline]
    fn destroy(&mut self) {
        (**self).destroy();
    }
}
