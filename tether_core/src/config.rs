// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration and resource-location resolution.
//!
//! [`EngineConfig`] carries the three values the bridge pushes into the engine
//! on first surface creation: the data path and archive path (via
//! [`Engine::configure`]) and the executable path (as `args[0]` of
//! [`Engine::initialize`]).
//!
//! [`ResourceLocator`] derives the data and archive paths from what an Android
//! host knows about itself. Three layouts are supported:
//!
//! | Layout | Working directory | Archive |
//! |---|---|---|
//! | [`Loose`](ResourceKind::Loose) | `{shared}/Android/data/{package}` | none |
//! | [`Apk`](ResourceKind::Apk) | `assets` | the forced archive path (usually the APK) |
//! | [`Obb`](ResourceKind::Obb) | `.` | `{shared}/Android/obb/{package}/main.{version}.{package}.obb` |
//!
//! [`Engine::configure`]: crate::engine::Engine::configure
//! [`Engine::initialize`]: crate::engine::Engine::initialize

use alloc::format;
use alloc::string::String;
use core::fmt;

/// Errors from configuration validation and resource resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The executable path is empty, so the engine would get no `argv[0]`.
    EmptyExecutablePath,
    /// The package name is empty, so no per-package directory can be derived.
    EmptyPackageName,
    /// An expansion-file layout was requested without a version code.
    EmptyVersionCode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExecutablePath => f.write_str("executable path is empty"),
            Self::EmptyPackageName => f.write_str("package name is empty"),
            Self::EmptyVersionCode => {
                f.write_str("version code is required to locate the expansion file")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Paths handed to the engine before its one-time initialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory the engine resolves resources against.
    pub data_path: String,
    /// Archive the engine reads resources from; empty when resources are loose
    /// files.
    pub archive_path: String,
    /// Path of the running executable (on Android, the APK). Passed as
    /// `args[0]`.
    pub executable_path: String,
}

impl EngineConfig {
    /// Creates a configuration from its three paths.
    #[must_use]
    pub fn new(
        data_path: impl Into<String>,
        archive_path: impl Into<String>,
        executable_path: impl Into<String>,
    ) -> Self {
        Self {
            data_path: data_path.into(),
            archive_path: archive_path.into(),
            executable_path: executable_path.into(),
        }
    }

    /// Checks that the configuration can drive initialization.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyExecutablePath`] if there is no executable
    /// path to use as `args[0]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.executable_path.is_empty() {
            return Err(ConfigError::EmptyExecutablePath);
        }
        Ok(())
    }
}

/// Where resources come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Plain files in the package's shared-storage data directory.
    Loose,
    /// The `assets` directory of an explicitly given archive (usually the APK).
    Apk,
    /// A Google Play expansion file (`.obb`) in shared storage.
    Obb,
}

/// A resolved resource location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRoot {
    /// Which layout was selected.
    pub kind: ResourceKind,
    /// Working directory for resource lookups.
    pub cwd: String,
    /// Archive path, empty for [`ResourceKind::Loose`].
    pub archive: String,
}

impl ResourceRoot {
    /// Builds the [`EngineConfig`] for this location.
    #[must_use]
    pub fn to_config(&self, executable_path: impl Into<String>) -> EngineConfig {
        EngineConfig::new(self.cwd.clone(), self.archive.clone(), executable_path)
    }
}

/// Inputs for resolving a [`ResourceRoot`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceLocator {
    /// Root of shared (external) storage, e.g. `/sdcard`.
    pub shared_path: String,
    /// Application package name, e.g. `com.example.game`.
    pub package_name: String,
    /// Application version code, used in expansion-file names.
    pub version_code: String,
    /// Archive to read from instead of an expansion file. Empty when unset.
    pub forced_archive_path: String,
    /// Whether the engine reads resources from an archive at all.
    pub archive_backed: bool,
}

impl ResourceLocator {
    /// Resolves the resource location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPackageName`] when a layout that embeds the
    /// package name is selected without one, and
    /// [`ConfigError::EmptyVersionCode`] when the expansion-file layout is
    /// selected without a version code.
    pub fn resolve(&self) -> Result<ResourceRoot, ConfigError> {
        if !self.archive_backed {
            self.require_package()?;
            return Ok(ResourceRoot {
                kind: ResourceKind::Loose,
                cwd: format!("{}/Android/data/{}", self.shared_path, self.package_name),
                archive: String::new(),
            });
        }

        if !self.forced_archive_path.is_empty() {
            return Ok(ResourceRoot {
                kind: ResourceKind::Apk,
                cwd: String::from("assets"),
                archive: self.forced_archive_path.clone(),
            });
        }

        self.require_package()?;
        if self.version_code.is_empty() {
            return Err(ConfigError::EmptyVersionCode);
        }
        let package = &self.package_name;
        Ok(ResourceRoot {
            kind: ResourceKind::Obb,
            cwd: String::from("."),
            archive: format!(
                "{}/Android/obb/{package}/main.{}.{package}.obb",
                self.shared_path, self.version_code
            ),
        })
    }

    fn require_package(&self) -> Result<(), ConfigError> {
        if self.package_name.is_empty() {
            Err(ConfigError::EmptyPackageName)
        } else {
            Ok(())
        }
    }
}
