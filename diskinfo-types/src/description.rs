// SPDX-License-Identifier: GPL-3.0-only

//! Typed platform description of a single device node
//!
//! Backends fill this in once, at the platform boundary. Every field the
//! platform did not report stays `None`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the icon of a volume comes from. Nothing here renders icons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeIcon {
    /// A custom icon file stored at the root of the mounted volume.
    Custom(PathBuf),

    /// A resource inside a platform bundle (e.g. a kernel extension).
    Bundle {
        bundle_identifier: String,
        resource_file: String,
    },

    /// A themed icon name (e.g. UDisks2 `HintIconName`).
    Named(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskDescription {
    // === Media ===
    /// Device node name (e.g. "disk0s1", "sda1")
    pub bsd_name: String,

    /// Whole disk this node lives on, `None` for whole disks
    pub parent_bsd_name: Option<String>,

    /// Media name; the GPT partition name for partitions
    pub media_name: Option<String>,

    /// Media content: partition type GUID, or the scheme name of a whole disk
    pub media_content: Option<String>,

    pub media_uuid: Option<String>,

    pub media_writable: Option<bool>,

    pub media_whole: Option<bool>,

    pub media_icon: Option<VolumeIcon>,

    // === Volume ===
    /// Raw filesystem kind (e.g. "msdos", "apfs", "vfat", "ext4")
    pub volume_kind: Option<String>,

    /// Refinement of the kind (e.g. "MS-DOS (FAT32)", "FAT16")
    pub volume_type: Option<String>,

    pub volume_name: Option<String>,

    pub volume_uuid: Option<String>,

    /// Current mount point
    pub volume_path: Option<PathBuf>,

    // === Device ===
    pub device_internal: Option<bool>,

    /// Bus protocol (e.g. "USB", "PCI-Express", "usb", "nvme")
    pub device_protocol: Option<String>,
}

impl DiskDescription {
    pub fn new(bsd_name: impl Into<String>) -> Self {
        Self {
            bsd_name: bsd_name.into(),
            ..Self::default()
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.volume_path.is_some()
    }
}
