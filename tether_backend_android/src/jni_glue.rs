// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exported JNI entry points for `dev.tether.TetherRenderer`.
//!
//! Every entry point catches panics: unwinding into the JVM is undefined
//! behavior, so a panic is logged and turned into the callback's neutral
//! result instead.

use std::panic::{self, AssertUnwindSafe};

use jni::JNIEnv;
use jni::objects::JObject;
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jint};
use tether_core::activity::ActivityEvent;

use crate::logging::{LOG_TAG, init_logging};
use crate::registry::REGISTRY;
use crate::shell::{self, ActivityHandle};

/// Runs `f`, logging and swallowing any panic.
fn guarded<R>(callback: &str, fallback: R, f: impl FnOnce() -> R) -> R {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        log::error!(target: LOG_TAG, "{callback} panicked");
        fallback
    })
}

fn surface_size(width: jint, height: jint) -> Option<(u32, u32)> {
    Some((u32::try_from(width).ok()?, u32::try_from(height).ok()?))
}

/// `void nativeSetActivity(Activity activity)`
///
/// Registers the activity the shell finishes. Passing `null` unregisters it.
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_tether_TetherRenderer_nativeSetActivity(
    env: JNIEnv<'_>,
    _this: JObject<'_>,
    activity: JObject<'_>,
) {
    init_logging();
    guarded("nativeSetActivity", (), || {
        if activity.is_null() {
            shell::clear_activity();
            return;
        }
        match ActivityHandle::new(&env, &activity) {
            Ok(handle) => shell::set_activity(handle),
            Err(err) => log::error!(target: LOG_TAG, "cannot pin activity: {err}"),
        }
    });
}

/// `void nativeOnSurfaceCreated()`
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_tether_TetherRenderer_nativeOnSurfaceCreated(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
) {
    init_logging();
    guarded("nativeOnSurfaceCreated", (), || REGISTRY.surface_created());
}

/// `void nativeOnSurfaceChanged(int width, int height)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_tether_TetherRenderer_nativeOnSurfaceChanged(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    width: jint,
    height: jint,
) {
    let Some((width, height)) = surface_size(width, height) else {
        log::warn!(target: LOG_TAG, "ignoring negative surface size {width}x{height}");
        return;
    };
    guarded("nativeOnSurfaceChanged", (), || {
        REGISTRY.surface_changed(width, height);
    });
}

/// `boolean nativeOnDrawFrame()`
///
/// Returns `false` once the engine has asked to stop.
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_tether_TetherRenderer_nativeOnDrawFrame(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
) -> jboolean {
    if guarded("nativeOnDrawFrame", true, || REGISTRY.draw_frame()) {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// `void nativeOnActivityEvent(int code)`
///
/// See [`ActivityEvent::from_code`] for the code table.
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_tether_TetherRenderer_nativeOnActivityEvent(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    code: jint,
) {
    let Some(event) = ActivityEvent::from_code(code) else {
        log::warn!(target: LOG_TAG, "unknown activity event code {code}");
        return;
    };
    guarded("nativeOnActivityEvent", (), || REGISTRY.activity_event(event));
}

/// `void nativeDestroy()`
///
/// Tears the engine down. Unlike the activity's own destroy notification this
/// is final for the process.
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_tether_TetherRenderer_nativeDestroy(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
) {
    guarded("nativeDestroy", (), || REGISTRY.shutdown());
}

/// `void nativeOnFocusChanged(boolean hasFocus)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_tether_TetherRenderer_nativeOnFocusChanged(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    has_focus: jboolean,
) {
    let event = ActivityEvent::FocusChanged(has_focus != JNI_FALSE);
    guarded("nativeOnFocusChanged", (), || REGISTRY.activity_event(event));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_sizes_are_rejected() {
        assert_eq!(surface_size(1280, 720), Some((1280, 720)));
        assert_eq!(surface_size(0, 0), Some((0, 0)));
        assert_eq!(surface_size(-1, 720), None);
        assert_eq!(surface_size(1280, -720), None);
    }

    #[test]
    fn guarded_swallows_panics() {
        assert!(guarded("test", true, || panic!("boom")), "fallback expected");
        assert_eq!(guarded("test", 0, || 7), 7);
    }
}
