// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle bridge between host GPU-surface callbacks and a native engine.
//!
//! `tether_core` connects a host's renderer callbacks (on Android, the
//! `GLSurfaceView.Renderer` trio) to an engine implemented elsewhere. It is
//! `no_std` compatible (with `alloc`) and holds no global state: every
//! [`LifecycleBridge`](bridge::LifecycleBridge) owns its own lifecycle state.
//!
//! # Architecture
//!
//! ```text
//!   Host (surface + activity callbacks)
//!       │
//!       ▼
//!   LifecycleBridge ──► Engine (notify / configure / initialize / render)
//!       │
//!       └── render false ──► Shell::finish()
//!       │
//!       ▼
//!   Tracer ──► TraceSink (pretty, recorder, logcat, …)
//! ```
//!
//! **[`bridge`]**: The [`LifecycleBridge`](bridge::LifecycleBridge) state
//! machine: one-time initialization on the first surface, per-frame rendering,
//! shutdown on render failure.
//!
//! **[`engine`]**: The [`Engine`](engine::Engine) trait the native engine (or
//! a test double) implements.
//!
//! **[`shell`]**: The [`Shell`](shell::Shell) trait for terminating the
//! hosting activity.
//!
//! **[`activity`]**: Activity lifecycle notifications and which of them reach
//! the engine.
//!
//! **[`config`]**: [`EngineConfig`](config::EngineConfig) and Android
//! resource-location resolution.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! bridge instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod activity;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod shell;
pub mod trace;
