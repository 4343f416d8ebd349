// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host activity lifecycle notifications.
//!
//! Besides the three surface callbacks, the host activity reports its own
//! lifecycle (create, resume, pause, …). [`ActivityEvent`] names those
//! notifications; [`LifecycleBridge::on_activity_event`] decides which ones
//! reach the engine:
//!
//! | Event | Engine call |
//! |---|---|
//! | `Resume` | `focus_changed(true)` |
//! | `Pause` | `focus_changed(false)`, then `release_resources()` |
//! | `LowMemory` | `low_memory()` |
//! | everything else | none |
//!
//! Window focus changes are traced but not forwarded; engine focus follows
//! the resume/pause pair.
//!
//! [`LifecycleBridge::on_activity_event`]: crate::bridge::LifecycleBridge::on_activity_event

use core::fmt;

/// A lifecycle notification from the hosting activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivityEvent {
    /// The activity was created.
    Create,
    /// The activity became visible.
    Start,
    /// The activity moved to the foreground.
    Resume,
    /// The activity is leaving the foreground.
    Pause,
    /// The activity is no longer visible.
    Stop,
    /// The activity is being destroyed.
    Destroy,
    /// The activity is restarting after a stop.
    Restart,
    /// The system is low on memory.
    LowMemory,
    /// The activity window gained (`true`) or lost (`false`) focus.
    FocusChanged(bool),
}

impl ActivityEvent {
    /// Decodes the integer code used on the JNI boundary.
    ///
    /// Codes `0..=7` map to `Create`, `Start`, `Resume`, `Pause`, `Stop`,
    /// `Destroy`, `Restart`, and `LowMemory`. Focus changes travel through a
    /// separate entry point, so they have no code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Create,
            1 => Self::Start,
            2 => Self::Resume,
            3 => Self::Pause,
            4 => Self::Stop,
            5 => Self::Destroy,
            6 => Self::Restart,
            7 => Self::LowMemory,
            _ => return None,
        })
    }

    /// Returns the JNI code for this event, or `None` for focus changes.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        Some(match self {
            Self::Create => 0,
            Self::Start => 1,
            Self::Resume => 2,
            Self::Pause => 3,
            Self::Stop => 4,
            Self::Destroy => 5,
            Self::Restart => 6,
            Self::LowMemory => 7,
            Self::FocusChanged(_) => return None,
        })
    }

    /// Returns a short lowercase name for logs and traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Destroy => "destroy",
            Self::Restart => "restart",
            Self::LowMemory => "low-memory",
            Self::FocusChanged(true) => "focus-gained",
            Self::FocusChanged(false) => "focus-lost",
        }
    }
}

impl fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_cover_every_coded_event() {
        let mut code = 0;
        while let Some(event) = ActivityEvent::from_code(code) {
            assert_eq!(event.code(), Some(code), "code must map back for {event}");
            code += 1;
        }
        assert_eq!(code, 8, "expected eight coded events");
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(ActivityEvent::from_code(-1), None);
        assert_eq!(ActivityEvent::from_code(8), None);
    }

    #[test]
    fn focus_changes_have_no_code() {
        assert_eq!(ActivityEvent::FocusChanged(true).code(), None);
        assert_eq!(ActivityEvent::FocusChanged(false).name(), "focus-lost");
    }
}
