// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use async_trait::async_trait;
use diskinfo_contracts::{DiskArbitration, StorageError};
use diskinfo_types::{DiskDescription, Dissenter, DissenterStatus, RegistrySnapshot};
use zbus::Connection;

use crate::describe::{describe_block, object_for_mount_point};
use crate::error::DiskError;
use crate::index::BlockIndex;
use crate::mount::{mount_filesystem, unmount_filesystem};
use crate::registry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UdisksOptions {
    /// Allow polkit to prompt for credentials during mount/unmount.
    pub interactive_auth: bool,
}

/// Disk arbitration backed by the UDisks2 daemon on the system bus.
#[derive(Debug, Clone)]
pub struct UdisksArbitration {
    connection: Connection,
    options: UdisksOptions,
}

impl UdisksArbitration {
    pub async fn system(options: UdisksOptions) -> Result<Self, DiskError> {
        let connection = Connection::system()
            .await
            .map_err(|e| DiskError::ConnectionFailed(e.to_string()))?;
        Ok(Self::with_connection(connection, options))
    }

    pub fn with_connection(connection: Connection, options: UdisksOptions) -> Self {
        Self {
            connection,
            options,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    async fn index(&self) -> Result<BlockIndex, DiskError> {
        BlockIndex::build(&self.connection).await
    }

    async fn dissenting_index(&self) -> Result<BlockIndex, Dissenter> {
        self.index()
            .await
            .map_err(|e| Dissenter::new(DissenterStatus::NotReady, e.to_string()))
    }
}

#[async_trait]
impl DiskArbitration for UdisksArbitration {
    fn name(&self) -> &'static str {
        "udisks2"
    }

    async fn list_devices(&self) -> Result<RegistrySnapshot, StorageError> {
        let index = self
            .index()
            .await
            .map_err(|e| StorageError::unavailable(format!("Failed to enumerate block devices: {e}")))?;
        Ok(registry::snapshot(&self.connection, &index).await?)
    }

    async fn describe_devices(&self) -> Result<Vec<DiskDescription>, StorageError> {
        let index = self
            .index()
            .await
            .map_err(|e| StorageError::unavailable(format!("Failed to enumerate block devices: {e}")))?;

        let mut descriptions = Vec::new();
        for (bsd_name, object_path) in index.iter() {
            match describe_block(&self.connection, &index, bsd_name, object_path).await {
                Ok(description) => descriptions.push(description),
                Err(e) => {
                    tracing::warn!(bsd_name, "skipping block object {}: {}", object_path.as_str(), e);
                }
            }
        }

        Ok(descriptions)
    }

    async fn describe_device(
        &self,
        bsd_name: &str,
    ) -> Result<Option<DiskDescription>, StorageError> {
        let index = self.index().await?;
        let Some(object_path) = index.object_path_for_name(bsd_name) else {
            return Ok(None);
        };
        let description = describe_block(&self.connection, &index, bsd_name, object_path).await?;
        Ok(Some(description))
    }

    async fn describe_volume(
        &self,
        mount_path: &Path,
    ) -> Result<Option<DiskDescription>, StorageError> {
        let index = self.index().await?;
        let Some((bsd_name, object_path)) =
            object_for_mount_point(&self.connection, &index, mount_path).await
        else {
            return Ok(None);
        };
        let description = describe_block(&self.connection, &index, bsd_name, object_path).await?;
        Ok(Some(description))
    }

    async fn mount(&self, bsd_name: &str, mount_path: Option<&Path>) -> Result<(), Dissenter> {
        if let Some(path) = mount_path {
            return Err(Dissenter::new(
                DissenterStatus::Unsupported,
                format!(
                    "UDisks2 chooses its own mount point; cannot mount at {}",
                    path.display()
                ),
            ));
        }

        let index = self.dissenting_index().await?;
        let object_path = index
            .object_path_for_name(bsd_name)
            .ok_or_else(|| Dissenter::new(DissenterStatus::NotFound, bsd_name))?;

        let mounted_at =
            mount_filesystem(&self.connection, object_path, self.options.interactive_auth).await?;
        tracing::info!(bsd_name, mount_point = %mounted_at, "UDisks2 mount finished");
        Ok(())
    }

    async fn unmount(&self, bsd_name: &str, force: bool) -> Result<(), Dissenter> {
        let index = self.dissenting_index().await?;
        let object_path = index
            .object_path_for_name(bsd_name)
            .ok_or_else(|| Dissenter::new(DissenterStatus::NotFound, bsd_name))?;

        unmount_filesystem(
            &self.connection,
            object_path,
            force,
            self.options.interactive_auth,
        )
        .await?;
        tracing::info!(bsd_name, force, "UDisks2 unmount finished");
        Ok(())
    }
}
