// SPDX-License-Identifier: GPL-3.0-only

//! Descriptor resolution for device identifiers and mount paths

use std::path::{Path, PathBuf};

use diskinfo_contracts::StorageError;
use diskinfo_types::{DeviceIdentifier, DiskDescriptor, VolumeIcon};

use crate::DiskArbiter;

/// Custom icon stored at the root of a mounted volume.
pub const CUSTOM_VOLUME_ICON: &str = ".VolumeIcon.icns";

impl DiskArbiter {
    /// Resolve a device identifier (`disk2s1`, `/dev/rdisk2s1`, `sda1`) or an
    /// existing mount path into a descriptor.
    ///
    /// Unknown devices, paths that do not exist, and inputs that are neither
    /// resolve to `Ok(None)`.
    pub async fn describe(&self, target: &str) -> Result<Option<DiskDescriptor>, StorageError> {
        match DeviceIdentifier::parse(target) {
            Some(DeviceIdentifier::MountPath(path)) => {
                if !self.backend().path_exists(&path) {
                    tracing::debug!(path = %path.display(), "path does not exist");
                    return Ok(None);
                }
                self.describe_volume(&path).await
            }
            Some(DeviceIdentifier::Device(name)) => self.describe_device(name.as_str()).await,
            None => {
                tracing::debug!(input = target, "not a device identifier or path");
                Ok(None)
            }
        }
    }

    /// Resolve a normalized device name.
    pub async fn describe_device(
        &self,
        bsd_name: &str,
    ) -> Result<Option<DiskDescriptor>, StorageError> {
        match self.backend().describe_device(bsd_name).await? {
            Some(description) => Ok(Some(self.resolve_description(description).await?)),
            None => Ok(None),
        }
    }

    /// Resolve the device mounted at `mount_path`.
    pub async fn describe_volume(
        &self,
        mount_path: &Path,
    ) -> Result<Option<DiskDescriptor>, StorageError> {
        match self.backend().describe_volume(mount_path).await? {
            Some(description) => Ok(Some(self.resolve_description(description).await?)),
            None => Ok(None),
        }
    }

    pub async fn mount_point(&self, target: &str) -> Result<Option<PathBuf>, StorageError> {
        Ok(self.describe(target).await?.and_then(|d| d.mount_point))
    }

    /// Whether `path` is exactly the mount point of some volume.
    pub async fn is_mount_point(&self, path: &Path) -> Result<bool, StorageError> {
        if !self.backend().path_exists(path) {
            return Ok(false);
        }
        Ok(self
            .backend()
            .describe_volume(path)
            .await?
            .is_some_and(|d| d.volume_path.as_deref() == Some(path)))
    }

    /// BSD name of the device behind a mount path or identifier.
    pub async fn bsd_name(&self, target: &str) -> Result<Option<String>, StorageError> {
        Ok(self.describe(target).await?.map(|d| d.bsd_name))
    }

    pub async fn parent(&self, target: &str) -> Result<Option<String>, StorageError> {
        Ok(self.describe(target).await?.and_then(|d| d.parent_bsd_name))
    }

    pub async fn partition_slice(&self, target: &str) -> Result<Option<u32>, StorageError> {
        Ok(self.describe(target).await?.and_then(|d| d.partition_slice))
    }

    /// Icon reference for a volume: its custom icon file when mounted and
    /// present, otherwise whatever the platform reports.
    pub async fn icon(&self, target: &str) -> Result<Option<VolumeIcon>, StorageError> {
        let Some(descriptor) = self.describe(target).await? else {
            return Ok(None);
        };

        if let Some(mount_point) = descriptor.mount_point() {
            let custom = mount_point.join(CUSTOM_VOLUME_ICON);
            if self.backend().path_exists(&custom) {
                return Ok(Some(VolumeIcon::Custom(custom)));
            }
        }

        Ok(descriptor.icon)
    }
}
