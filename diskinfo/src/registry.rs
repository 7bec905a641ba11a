// SPDX-License-Identifier: GPL-3.0-only

//! Registry enumeration

use std::collections::HashSet;
use std::path::PathBuf;

use diskinfo_contracts::StorageError;
use diskinfo_types::RegistrySnapshot;

use crate::DiskArbiter;

impl DiskArbiter {
    /// Every block node the platform knows, unfiltered and in platform order.
    ///
    /// An empty snapshot means there are no devices; a platform that cannot
    /// be enumerated yields `StorageErrorKind::Unavailable`.
    pub async fn list_all_devices(&self) -> Result<RegistrySnapshot, StorageError> {
        let snapshot = self.backend().list_devices().await?;
        tracing::debug!(devices = snapshot.len(), "enumerated device registry");
        Ok(snapshot)
    }

    /// Mount points of every registered device that has one.
    pub async fn mounted_volumes(&self) -> Result<Vec<PathBuf>, StorageError> {
        let descriptions = self.backend().describe_devices().await?;

        let mut seen_names = HashSet::new();
        let mut seen_paths = HashSet::new();
        let mut volumes = Vec::new();

        for description in descriptions {
            if !seen_names.insert(description.bsd_name) {
                continue;
            }
            if let Some(path) = description.volume_path
                && seen_paths.insert(path.clone())
            {
                volumes.push(path);
            }
        }

        Ok(volumes)
    }
}
