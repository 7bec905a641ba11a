// SPDX-License-Identifier: GPL-3.0-only

//! Arbiter configuration
//!
//! ```toml
//! protected_mount_points = ["/home"]
//! fat_markers = ["fat"]
//!
//! [udisks]
//! interactive_auth = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use diskinfo_types::DEFAULT_FAT_MARKERS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protected_paths::DEFAULT_PROTECTED_MOUNT_POINTS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Mount points refused on unmount in addition to the built-in ones
    pub protected_mount_points: Vec<PathBuf>,

    /// Volume kinds treated as the generic FAT family in addition to the
    /// built-in markers
    pub fat_markers: Vec<String>,

    pub udisks: UdisksConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdisksConfig {
    /// Let polkit prompt for credentials during mount/unmount
    pub interactive_auth: bool,
}

impl ArbiterConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Built-in protected mount points followed by the configured ones.
    pub fn protected_mount_points(&self) -> Vec<PathBuf> {
        DEFAULT_PROTECTED_MOUNT_POINTS
            .iter()
            .map(PathBuf::from)
            .chain(self.protected_mount_points.iter().cloned())
            .collect()
    }

    /// Built-in FAT markers followed by the configured ones.
    pub fn fat_markers(&self) -> Vec<String> {
        DEFAULT_FAT_MARKERS
            .iter()
            .map(|m| m.to_string())
            .chain(self.fat_markers.iter().cloned())
            .collect()
    }
}
