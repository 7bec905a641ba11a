// SPDX-License-Identifier: GPL-3.0-only

//! Device name to UDisks2 block object path index.
//!
//! Rebuilt on every query so the registry view is never older than the call
//! that asked for it.

use std::collections::HashMap;

use diskinfo_types::normalize_device_name;
use udisks2::block::BlockProxy;
use zbus::Connection;
use zbus::zvariant::OwnedObjectPath;

use crate::dbus::bytestring as bs;
use crate::error::DiskError;
use crate::manager::UDisks2ManagerProxy;

#[derive(Debug, Clone, Default)]
pub struct BlockIndex {
    /// Normalized device names in the order UDisks2 reported them
    entries: Vec<(String, OwnedObjectPath)>,
}

impl BlockIndex {
    pub async fn build(connection: &Connection) -> Result<Self, DiskError> {
        let manager_proxy = UDisks2ManagerProxy::new(connection)
            .await
            .map_err(|e| DiskError::DBusError(e.to_string()))?;

        let block_paths = manager_proxy
            .get_block_devices(HashMap::new())
            .await
            .map_err(|e| DiskError::DBusError(e.to_string()))?;

        let mut entries = Vec::with_capacity(block_paths.len());
        for obj in block_paths {
            let proxy = match BlockProxy::builder(connection).path(&obj)?.build().await {
                Ok(p) => p,
                Err(e) => {
                    tracing::info!("Could not get block device {}: {}", obj.as_str(), e);
                    continue;
                }
            };

            let device = device_node(&proxy).await;
            if device.is_empty() {
                continue;
            }
            entries.push((normalize_device_name(&device).to_string(), obj));
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnedObjectPath)> {
        self.entries.iter().map(|(name, path)| (name.as_str(), path))
    }

    pub fn object_path_for_name(&self, name: &str) -> Option<&OwnedObjectPath> {
        let name = normalize_device_name(name);
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, path)| path)
    }

    pub fn name_for_object_path(&self, path: &OwnedObjectPath) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, candidate)| candidate == path)
            .map(|(name, _)| name.as_str())
    }
}

/// Kernel device node (`/dev/sda1`) for a block object.
///
/// `Device` is preferred over `PreferredDevice` here: the latter may be a
/// `/dev/mapper` or by-id symlink, which does not carry the slice structure.
pub(crate) async fn device_node(proxy: &BlockProxy<'_>) -> String {
    if let Ok(bytes) = proxy.device().await {
        let device = bs::decode_c_string_bytes(&bytes);
        if !device.is_empty() {
            return device;
        }
    }

    proxy
        .preferred_device()
        .await
        .map(|bytes| bs::decode_c_string_bytes(&bytes))
        .unwrap_or_default()
}
