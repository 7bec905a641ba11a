// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashSet;

use diskinfo_contracts::StorageError;
use diskinfo_types::DiskDescription;

use crate::DiskArbiter;

impl DiskArbiter {
    /// EFI System Partitions in registry order, each listed once.
    pub async fn list_esps(&self) -> Result<Vec<String>, StorageError> {
        let esps: Vec<String> = self
            .esp_descriptions()
            .await?
            .into_iter()
            .map(|d| d.bsd_name)
            .collect();

        tracing::debug!(count = esps.len(), "located EFI system partitions");
        Ok(esps)
    }

    /// EFI System Partitions that currently have a mount point.
    pub async fn list_mounted_esps(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .esp_descriptions()
            .await?
            .into_iter()
            .filter(DiskDescription::is_mounted)
            .map(|d| d.bsd_name)
            .collect())
    }

    async fn esp_descriptions(&self) -> Result<Vec<DiskDescription>, StorageError> {
        let mut seen = HashSet::new();
        Ok(self
            .backend()
            .describe_devices()
            .await?
            .into_iter()
            .filter(|d| seen.insert(d.bsd_name.clone()))
            .filter(DiskDescription::is_esp)
            .collect())
    }
}
