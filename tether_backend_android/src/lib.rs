// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Android backend for tether.
//!
//! This crate connects a Java `GLSurfaceView.Renderer` to a
//! [`LifecycleBridge`](tether_core::bridge::LifecycleBridge):
//!
//! - exported `Java_dev_tether_TetherRenderer_*` entry points ([`jni_glue`])
//! - a process-wide bridge slot ([`registry`])
//! - an `Activity.finish()` shell ([`shell`])
//! - logcat output for bridge traces ([`logging`])
//!
//! The matching Java class is expected to look like:
//!
//! ```java
//! package dev.tether;
//!
//! public final class TetherRenderer implements GLSurfaceView.Renderer {
//!     public native void nativeSetActivity(Activity activity);
//!     public native void nativeOnActivityEvent(int code);
//!     public native void nativeOnFocusChanged(boolean hasFocus);
//!     public native void nativeDestroy();
//!     private native void nativeOnSurfaceCreated();
//!     private native void nativeOnSurfaceChanged(int width, int height);
//!     private native boolean nativeOnDrawFrame();
//!
//!     public void onSurfaceCreated(GL10 gl, EGLConfig config) { nativeOnSurfaceCreated(); }
//!     public void onSurfaceChanged(GL10 gl, int w, int h) { nativeOnSurfaceChanged(w, h); }
//!     public void onDrawFrame(GL10 gl) { nativeOnDrawFrame(); }
//! }
//! ```
//!
//! The application installs its engine once, before the first surface, with
//! [`install`].

#![expect(
    unsafe_code,
    reason = "JNI entry points are exported with #[unsafe(no_mangle)]"
)]

pub mod jni_glue;
pub mod logging;
pub mod registry;
pub mod shell;

pub use registry::{InstallError, install};
