// SPDX-License-Identifier: GPL-3.0-only

//! Translation of UDisks2 block objects into `DiskDescription`.

use std::path::Path;

use diskinfo_types::{DiskDescription, VolumeIcon};
use udisks2::{
    block::BlockProxy, drive::DriveProxy, filesystem::FilesystemProxy,
    partition::PartitionProxy, partitiontable::PartitionTableProxy,
};
use uuid::Uuid;
use zbus::Connection;
use zbus::zvariant::OwnedObjectPath;

use crate::dbus::bytestring as bs;
use crate::error::DiskError;
use crate::index::{BlockIndex, device_node};

pub(crate) const GPT_SCHEME: &str = "GUID_partition_scheme";
pub(crate) const MBR_SCHEME: &str = "FDisk_partition_scheme";

/// Partition-scheme name for a UDisks2 `PartitionTable.Type`.
pub(crate) fn scheme_content(table_type: &str) -> String {
    match table_type {
        "gpt" => GPT_SCHEME.to_string(),
        "dos" => MBR_SCHEME.to_string(),
        other => other.to_string(),
    }
}

/// Uppercase hyphenated form for anything that parses as a UUID; other
/// identifiers (MBR type bytes, FAT serials) are returned unchanged.
pub(crate) fn normalize_guid(value: &str) -> String {
    match Uuid::parse_str(value) {
        Ok(uuid) => uuid.hyphenated().to_string().to_uppercase(),
        Err(_) => value.to_string(),
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn infer_connection_bus(device: &str, model: &str, vendor: &str) -> String {
    let device = device.to_lowercase();
    let model = model.to_lowercase();
    let vendor = vendor.to_lowercase();

    if device.contains("loop") {
        return "loop".to_string();
    }
    if device.contains("nvme") {
        return "nvme".to_string();
    }
    if device.contains("mmcblk") {
        return "mmc".to_string();
    }
    if device.contains("sr") {
        return "optical".to_string();
    }
    if model.contains("usb") || vendor.contains("usb") {
        return "usb".to_string();
    }

    "ata".to_string()
}

/// What the block object's `Drive` says about the physical device.
#[derive(Debug, Default)]
struct DriveFacts {
    model: Option<String>,
    protocol: Option<String>,
}

async fn drive_facts(
    connection: &Connection,
    block: &BlockProxy<'_>,
    device: &str,
) -> Result<DriveFacts, DiskError> {
    let drive_path = match block.drive().await {
        Ok(path) if path.as_str() != "/" => path,
        _ => {
            return Ok(DriveFacts {
                model: None,
                protocol: device
                    .contains("loop")
                    .then(|| "loop".to_string()),
            });
        }
    };

    let drive = DriveProxy::builder(connection)
        .path(&drive_path)?
        .build()
        .await?;

    let model = drive.model().await.ok().and_then(non_empty);
    let vendor = drive.vendor().await.unwrap_or_default();
    let protocol = drive
        .connection_bus()
        .await
        .ok()
        .and_then(non_empty)
        .unwrap_or_else(|| {
            infer_connection_bus(device, model.as_deref().unwrap_or_default(), &vendor)
        });

    Ok(DriveFacts {
        model,
        protocol: Some(protocol),
    })
}

/// Build the description of one block object.
pub(crate) async fn describe_block(
    connection: &Connection,
    index: &BlockIndex,
    bsd_name: &str,
    object_path: &OwnedObjectPath,
) -> Result<DiskDescription, DiskError> {
    let block = BlockProxy::builder(connection)
        .path(object_path)?
        .build()
        .await?;
    let device = device_node(&block).await;

    let mut description = DiskDescription::new(bsd_name);

    let partition = PartitionProxy::builder(connection)
        .path(object_path)?
        .build()
        .await?;
    let partition_table = partition.table().await.ok();

    if let Some(table_path) = &partition_table {
        description.media_whole = Some(false);
        description.parent_bsd_name = index.name_for_object_path(table_path).map(str::to_string);
        description.media_name = partition.name().await.ok().and_then(non_empty);
        description.media_content = partition
            .type_()
            .await
            .ok()
            .and_then(non_empty)
            .map(|t| normalize_guid(&t));
    } else {
        // PartitionTable carries no disk GUID, so whole disks have no media UUID.
        description.media_whole = Some(true);
        let table = PartitionTableProxy::builder(connection)
            .path(object_path)?
            .build()
            .await?;
        description.media_content = table
            .type_()
            .await
            .ok()
            .and_then(non_empty)
            .map(|t| scheme_content(&t));
    }

    let drive = drive_facts(connection, &block, &device).await?;
    if partition_table.is_none() {
        description.media_name = drive.model;
    }
    description.device_protocol = drive.protocol;

    description.media_writable = block.read_only().await.ok().map(|ro| !ro);
    description.device_internal = block.hint_system().await.ok();
    description.media_icon = block
        .hint_icon_name()
        .await
        .ok()
        .and_then(non_empty)
        .map(VolumeIcon::Named);

    let usage = block.id_usage().await.unwrap_or_default();
    if usage == "filesystem" {
        description.volume_kind = block.id_type().await.ok().and_then(non_empty);
        description.volume_type = block.id_version().await.ok().and_then(non_empty);
        description.volume_name = block.id_label().await.ok().and_then(non_empty);
        description.volume_uuid = block
            .id_uuid()
            .await
            .ok()
            .and_then(non_empty)
            .map(|u| normalize_guid(&u));
        description.volume_path = mount_points(connection, object_path)
            .await
            .into_iter()
            .next();
    }

    tracing::debug!(
        bsd_name,
        device = %device,
        whole = ?description.media_whole,
        "described block object"
    );

    Ok(description)
}

/// Current mount points of a block object; empty when it has no filesystem.
pub(crate) async fn mount_points(
    connection: &Connection,
    object_path: &OwnedObjectPath,
) -> Vec<std::path::PathBuf> {
    let proxy = match FilesystemProxy::builder(connection).path(object_path) {
        Ok(builder) => match builder.build().await {
            Ok(proxy) => proxy,
            Err(_) => return Vec::new(),
        },
        Err(_) => return Vec::new(),
    };

    proxy
        .mount_points()
        .await
        .map(bs::decode_mount_points)
        .unwrap_or_default()
}

fn canonicalize_best_effort(path: &Path) -> Option<std::path::PathBuf> {
    std::fs::canonicalize(path).ok()
}

/// Find the block object mounted at `mount_path`.
pub(crate) async fn object_for_mount_point<'a>(
    connection: &Connection,
    index: &'a BlockIndex,
    mount_path: &Path,
) -> Option<(&'a str, &'a OwnedObjectPath)> {
    let wanted_canon = canonicalize_best_effort(mount_path);

    for (name, object_path) in index.iter() {
        for mount_point in mount_points(connection, object_path).await {
            if mount_point == mount_path {
                return Some((name, object_path));
            }
            if let Some(ref canon) = wanted_canon
                && canonicalize_best_effort(&mount_point).as_ref() == Some(canon)
            {
                return Some((name, object_path));
            }
        }
    }

    None
}
