// SPDX-License-Identifier: GPL-3.0-only

//! Resolved disk descriptor
//!
//! A descriptor is a value snapshot. It is rebuilt on every query and never
//! updated in place; the parent disk is referenced by name only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{DeviceName, DiskDescription, VolumeIcon, classify_filesystem_with_markers};

/// Sentinel returned by string projections when the platform had no value.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskDescriptor {
    pub bsd_name: String,
    pub parent_bsd_name: Option<String>,
    pub partition_slice: Option<u32>,
    pub volume_uuid: Option<String>,
    /// Media UUID of the containing whole disk
    pub media_uuid: Option<String>,
    pub volume_name: Option<String>,
    pub media_name: Option<String>,
    pub media_content: Option<String>,
    pub filesystem_kind: Option<String>,
    pub mount_point: Option<PathBuf>,
    pub is_internal: bool,
    pub is_writable: bool,
    pub device_protocol: Option<String>,
    /// Media content of the containing whole disk
    pub partition_scheme_map: Option<String>,
    pub icon: Option<VolumeIcon>,
}

impl DiskDescriptor {
    /// Combine a node's description with the description of its containing
    /// whole disk (the parent, or the node itself when it is whole).
    pub fn from_descriptions<S: AsRef<str>>(
        description: DiskDescription,
        containing_disk: Option<&DiskDescription>,
        fat_markers: &[S],
    ) -> Self {
        let name = DeviceName::parse(&description.bsd_name);
        let parent_bsd_name = description
            .parent_bsd_name
            .clone()
            .or_else(|| name.as_ref().and_then(|n| n.parent().map(ToOwned::to_owned)));
        let partition_slice = name.as_ref().and_then(DeviceName::slice_index);

        let filesystem_kind = description.volume_kind.as_deref().map(|kind| {
            classify_filesystem_with_markers(kind, description.volume_type.as_deref(), fat_markers)
        });

        let containing_disk = containing_disk.or_else(|| {
            (parent_bsd_name.is_none()).then_some(&description)
        });
        let media_uuid = containing_disk.and_then(|d| d.media_uuid.clone());
        let partition_scheme_map = containing_disk.and_then(|d| d.media_content.clone());

        Self {
            parent_bsd_name,
            partition_slice,
            media_uuid,
            partition_scheme_map,
            filesystem_kind,
            is_internal: description.device_internal.unwrap_or(false),
            is_writable: description.media_writable.unwrap_or(false),
            bsd_name: description.bsd_name,
            volume_uuid: description.volume_uuid,
            volume_name: description.volume_name,
            media_name: description.media_name,
            media_content: description.media_content,
            mount_point: description.volume_path,
            device_protocol: description.device_protocol,
            icon: description.media_icon,
        }
    }

    pub fn mount_point(&self) -> Option<&Path> {
        self.mount_point.as_deref()
    }

    pub fn volume_name(&self) -> &str {
        or_not_available(&self.volume_name)
    }

    pub fn volume_uuid(&self) -> &str {
        or_not_available(&self.volume_uuid)
    }

    pub fn media_uuid(&self) -> &str {
        or_not_available(&self.media_uuid)
    }

    pub fn media_name(&self) -> &str {
        or_not_available(&self.media_name)
    }

    pub fn filesystem_kind(&self) -> &str {
        or_not_available(&self.filesystem_kind)
    }

    pub fn device_protocol(&self) -> &str {
        or_not_available(&self.device_protocol)
    }

    pub fn is_writable(&self) -> bool {
        self.is_writable
    }

    pub fn is_internal(&self) -> bool {
        self.is_internal
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent_bsd_name.as_deref()
    }

    pub fn partition_slice(&self) -> Option<u32> {
        self.partition_slice
    }

    pub fn partition_scheme_map(&self) -> Option<&str> {
        self.partition_scheme_map.as_deref()
    }
}

fn or_not_available(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_FAT_MARKERS;

    fn whole_disk() -> DiskDescription {
        DiskDescription {
            media_content: Some("GUID_partition_scheme".to_string()),
            media_uuid: Some("9A1C1A4E-5E7B-4C51-8F2A-6D0B2C3E4F50".to_string()),
            media_writable: Some(true),
            ..DiskDescription::new("disk0")
        }
    }

    #[test]
    fn partition_takes_scheme_and_media_uuid_from_parent() {
        let partition = DiskDescription {
            volume_kind: Some("msdos".to_string()),
            volume_type: Some("MS-DOS (FAT32)".to_string()),
            volume_name: Some("EFI".to_string()),
            ..DiskDescription::new("disk0s1")
        };
        let parent = whole_disk();

        let descriptor =
            DiskDescriptor::from_descriptions(partition, Some(&parent), DEFAULT_FAT_MARKERS);

        assert_eq!(descriptor.parent(), Some("disk0"));
        assert_eq!(descriptor.partition_slice(), Some(1));
        assert_eq!(descriptor.filesystem_kind(), "FAT32");
        assert_eq!(descriptor.partition_scheme_map(), Some("GUID_partition_scheme"));
        assert_eq!(descriptor.media_uuid(), "9A1C1A4E-5E7B-4C51-8F2A-6D0B2C3E4F50");
    }

    #[test]
    fn whole_disk_is_its_own_containing_disk() {
        let descriptor =
            DiskDescriptor::from_descriptions(whole_disk(), None, DEFAULT_FAT_MARKERS);

        assert_eq!(descriptor.parent(), None);
        assert_eq!(descriptor.partition_slice(), None);
        assert_eq!(descriptor.partition_scheme_map(), Some("GUID_partition_scheme"));
        assert!(descriptor.is_writable());
    }

    #[test]
    fn partition_without_resolvable_parent_has_no_media_uuid() {
        let descriptor = DiskDescriptor::from_descriptions(
            DiskDescription::new("disk4s2"),
            None,
            DEFAULT_FAT_MARKERS,
        );

        assert_eq!(descriptor.parent(), Some("disk4"));
        assert_eq!(descriptor.media_uuid, None);
        assert_eq!(descriptor.partition_scheme_map(), None);
    }

    #[test]
    fn partition_media_uuid_comes_only_from_the_containing_disk() {
        let partition = DiskDescription {
            media_uuid: Some("5B1E0C3A-7F2D-4E8B-9A61-0C2D4E6F8A1B".to_string()),
            ..DiskDescription::new("nvme0n1p1")
        };
        let guidless_disk = DiskDescription {
            media_content: Some("GUID_partition_scheme".to_string()),
            ..DiskDescription::new("nvme0n1")
        };

        let descriptor =
            DiskDescriptor::from_descriptions(partition, Some(&guidless_disk), DEFAULT_FAT_MARKERS);

        assert_eq!(descriptor.media_uuid(), NOT_AVAILABLE);
        assert_eq!(descriptor.partition_scheme_map(), Some("GUID_partition_scheme"));
    }

    #[test]
    fn missing_values_project_to_sentinels() {
        let descriptor = DiskDescriptor::from_descriptions(
            DiskDescription::new("disk9s9"),
            None,
            DEFAULT_FAT_MARKERS,
        );

        assert_eq!(descriptor.volume_name(), NOT_AVAILABLE);
        assert_eq!(descriptor.volume_uuid(), NOT_AVAILABLE);
        assert_eq!(descriptor.device_protocol(), NOT_AVAILABLE);
        assert_eq!(descriptor.filesystem_kind(), NOT_AVAILABLE);
        assert_eq!(descriptor.mount_point(), None);
        assert!(!descriptor.is_internal());
        assert!(!descriptor.is_writable());
    }

    #[test]
    fn descriptor_serialization() {
        let descriptor =
            DiskDescriptor::from_descriptions(whole_disk(), None, DEFAULT_FAT_MARKERS);

        let json = serde_json::to_string(&descriptor).unwrap();
        let deserialized: DiskDescriptor = serde_json::from_str(&json).unwrap();

        assert_eq!(descriptor, deserialized);
    }
}
