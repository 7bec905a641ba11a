// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use async_trait::async_trait;

use diskinfo_types::{Dissenter, DiskDescription, RegistrySnapshot};

use crate::StorageError;

/// The host's disk-arbitration and device-registry service.
///
/// Implementations translate platform objects into the typed models once,
/// here, so nothing above this trait sees platform property keys other than
/// the raw registry entries.
#[async_trait]
pub trait DiskArbitration: Send + Sync {
    /// Short backend name for logs (e.g. "udisks2").
    fn name(&self) -> &'static str;

    /// Every block device node currently registered, in platform order.
    ///
    /// Fails only when the platform cannot be enumerated at all.
    async fn list_devices(&self) -> Result<RegistrySnapshot, StorageError>;

    /// Descriptions of every registered device node, in registry order.
    ///
    /// One enumeration of the platform; fails the way `list_devices` does.
    async fn describe_devices(&self) -> Result<Vec<DiskDescription>, StorageError>;

    /// Describe a device node by its normalized name.
    async fn describe_device(&self, bsd_name: &str)
    -> Result<Option<DiskDescription>, StorageError>;

    /// Describe the device mounted at `mount_path`.
    async fn describe_volume(
        &self,
        mount_path: &Path,
    ) -> Result<Option<DiskDescription>, StorageError>;

    /// Mount a leaf partition slice and wait for the platform to finish.
    async fn mount(&self, bsd_name: &str, mount_path: Option<&Path>) -> Result<(), Dissenter>;

    /// Unmount a leaf partition slice and wait for the platform to finish.
    async fn unmount(&self, bsd_name: &str, force: bool) -> Result<(), Dissenter>;

    /// Whether `path` exists on the host filesystem.
    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
