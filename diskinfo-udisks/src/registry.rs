// SPDX-License-Identifier: GPL-3.0-only

//! Registry snapshot built from the UDisks2 block objects.

use diskinfo_types::registry::keys;
use diskinfo_types::{RegistryEntry, RegistrySnapshot};
use udisks2::{block::BlockProxy, partition::PartitionProxy, partitiontable::PartitionTableProxy};
use zbus::Connection;
use zbus::zvariant::OwnedObjectPath;

use crate::describe::{normalize_guid, scheme_content};
use crate::error::DiskError;
use crate::index::BlockIndex;

pub(crate) async fn registry_entry(
    connection: &Connection,
    bsd_name: &str,
    object_path: &OwnedObjectPath,
) -> Result<RegistryEntry, DiskError> {
    let block = BlockProxy::builder(connection)
        .path(object_path)?
        .build()
        .await?;
    let partition = PartitionProxy::builder(connection)
        .path(object_path)?
        .build()
        .await?;
    let table = PartitionTableProxy::builder(connection)
        .path(object_path)?
        .build()
        .await?;

    let mut entry = RegistryEntry::new(bsd_name);

    if let Ok(size) = block.size().await {
        entry = entry.with(keys::SIZE, i64::try_from(size).unwrap_or(i64::MAX));
    }
    if let Ok(read_only) = block.read_only().await {
        entry = entry.with(keys::WRITABLE, !read_only);
    }

    let is_partition = partition.table().await.is_ok();
    let table_type = table.type_().await.ok();

    entry = entry
        .with(keys::WHOLE, !is_partition)
        .with(keys::LEAF, table_type.is_none());

    let content = if is_partition {
        partition.type_().await.ok().map(|t| normalize_guid(&t))
    } else {
        table_type.as_deref().map(scheme_content)
    };
    if let Some(content) = content.filter(|c| !c.is_empty()) {
        entry = entry.with(keys::CONTENT, content);
    }

    Ok(entry)
}

pub(crate) async fn snapshot(
    connection: &Connection,
    index: &BlockIndex,
) -> Result<RegistrySnapshot, DiskError> {
    let mut snapshot = RegistrySnapshot::new();

    for (bsd_name, object_path) in index.iter() {
        match registry_entry(connection, bsd_name, object_path).await {
            Ok(entry) => snapshot.push(entry),
            Err(e) => {
                tracing::warn!(bsd_name, "skipping block object {}: {}", object_path.as_str(), e);
            }
        }
    }

    Ok(snapshot)
}
