// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Activity.finish()` shell.
//!
//! The hosting activity is handed over once through
//! `nativeSetActivity(Activity)` and kept as a JNI global reference.
//! [`ActivityShell`] looks it up when the bridge asks to finish, so the
//! activity may be registered before or after [`install`](crate::install).

use std::sync::{Arc, Mutex, MutexGuard};

use jni::objects::{GlobalRef, JObject};
use jni::{JNIEnv, JavaVM};
use tether_core::shell::Shell;

use crate::logging::LOG_TAG;

/// The hosting activity, pinned for use from any thread.
pub struct ActivityHandle {
    vm: JavaVM,
    activity: GlobalRef,
}

impl std::fmt::Debug for ActivityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityHandle").finish_non_exhaustive()
    }
}

impl ActivityHandle {
    /// Pins `activity` with a global reference.
    pub fn new(env: &JNIEnv<'_>, activity: &JObject<'_>) -> jni::errors::Result<Self> {
        Ok(Self {
            vm: env.get_java_vm()?,
            activity: env.new_global_ref(activity)?,
        })
    }

    /// Calls `Activity.finish()` on the current thread, attaching it to the
    /// VM if needed.
    fn finish(&self) -> jni::errors::Result<()> {
        let mut env = self.vm.attach_current_thread()?;
        let result = env.call_method(&self.activity, "finish", "()V", &[]);
        if result.is_err() && env.exception_check().unwrap_or(false) {
            env.exception_describe()?;
            env.exception_clear()?;
        }
        result.map(drop)
    }
}

/// A lockable slot holding the current activity handle.
///
/// Readers get a shared clone of the handle; the lock is never held while
/// the handle is used, so registering a new activity never waits on a JNI
/// call.
pub(crate) struct ActivitySlot<H> {
    inner: Mutex<Option<Arc<H>>>,
}

impl<H> ActivitySlot<H> {
    pub(crate) const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<H>>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::error!(target: LOG_TAG, "activity slot was poisoned; recovering");
            poisoned.into_inner()
        })
    }

    pub(crate) fn set(&self, handle: H) {
        *self.lock() = Some(Arc::new(handle));
    }

    pub(crate) fn clear(&self) {
        self.lock().take();
    }

    pub(crate) fn current(&self) -> Option<Arc<H>> {
        self.lock().clone()
    }
}

static ACTIVITY: ActivitySlot<ActivityHandle> = ActivitySlot::new();

/// Registers the hosting activity, replacing any previous one.
pub fn set_activity(handle: ActivityHandle) {
    ACTIVITY.set(handle);
}

/// Forgets the hosting activity. Its global reference is released once no
/// finish call is using it anymore.
pub fn clear_activity() {
    ACTIVITY.clear();
}

/// [`Shell`] that finishes the registered Android activity.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActivityShell;

impl Shell for ActivityShell {
    fn finish(&mut self) {
        let Some(handle) = ACTIVITY.current() else {
            log::warn!(target: LOG_TAG, "finish requested but no activity is registered");
            return;
        };
        if let Err(err) = handle.finish() {
            log::error!(target: LOG_TAG, "Activity.finish() failed: {err}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
