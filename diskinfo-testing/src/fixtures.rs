use std::path::PathBuf;

use diskinfo_types::registry::keys;
use diskinfo_types::{
    DiskDescription, ESP_MEDIA_NAME, ESP_PARTITION_TYPE, RegistryEntry, VolumeIcon,
};

pub const GPT_SCHEME: &str = "GUID_partition_scheme";
pub const MBR_SCHEME: &str = "FDisk_partition_scheme";
pub const APFS_PARTITION_TYPE: &str = "7C3457EF-0000-11AA-AA11-00306543ECAC";

/// One fake device node: its registry entry and its description.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub description: DiskDescription,
    leaf: Option<bool>,
    registered: bool,
}

impl FakeDevice {
    pub fn whole_disk(bsd_name: &str) -> Self {
        Self {
            description: DiskDescription {
                media_whole: Some(true),
                media_writable: Some(true),
                ..DiskDescription::new(bsd_name)
            },
            leaf: None,
            registered: true,
        }
    }

    pub fn partition(bsd_name: &str) -> Self {
        Self {
            description: DiskDescription {
                media_whole: Some(false),
                media_writable: Some(true),
                ..DiskDescription::new(bsd_name)
            },
            leaf: None,
            registered: true,
        }
    }

    /// A GPT EFI System Partition with a FAT32 volume named "EFI".
    pub fn esp(bsd_name: &str) -> Self {
        Self::partition(bsd_name)
            .media_name(ESP_MEDIA_NAME)
            .content(ESP_PARTITION_TYPE)
            .filesystem("msdos", Some("MS-DOS (FAT32)"))
            .volume_name("EFI")
    }

    pub fn scheme(mut self, scheme: &str) -> Self {
        self.description.media_content = Some(scheme.to_string());
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.description.media_content = Some(content.to_string());
        self
    }

    pub fn media_name(mut self, name: &str) -> Self {
        self.description.media_name = Some(name.to_string());
        self
    }

    pub fn media_uuid(mut self, uuid: &str) -> Self {
        self.description.media_uuid = Some(uuid.to_string());
        self
    }

    pub fn filesystem(mut self, kind: &str, refinement: Option<&str>) -> Self {
        self.description.volume_kind = Some(kind.to_string());
        self.description.volume_type = refinement.map(str::to_string);
        self
    }

    pub fn volume_name(mut self, name: &str) -> Self {
        self.description.volume_name = Some(name.to_string());
        self
    }

    pub fn volume_uuid(mut self, uuid: &str) -> Self {
        self.description.volume_uuid = Some(uuid.to_string());
        self
    }

    pub fn mounted_at(mut self, path: impl Into<PathBuf>) -> Self {
        self.description.volume_path = Some(path.into());
        self
    }

    pub fn icon(mut self, icon: VolumeIcon) -> Self {
        self.description.media_icon = Some(icon);
        self
    }

    pub fn protocol(mut self, protocol: &str) -> Self {
        self.description.device_protocol = Some(protocol.to_string());
        self
    }

    pub fn internal(mut self, internal: bool) -> Self {
        self.description.device_internal = Some(internal);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.description.media_writable = Some(false);
        self
    }

    /// Override the registry `Leaf` flag derived from the node shape.
    pub fn leaf(mut self, leaf: bool) -> Self {
        self.leaf = Some(leaf);
        self
    }

    /// Describable, but absent from registry enumeration.
    pub fn unregistered(mut self) -> Self {
        self.registered = false;
        self
    }

    pub fn bsd_name(&self) -> &str {
        &self.description.bsd_name
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn registry_entry(&self) -> RegistryEntry {
        let whole = self.description.media_whole.unwrap_or(false);
        let leaf = self.leaf.unwrap_or(!whole || self.description.media_content.is_none());

        let mut entry = RegistryEntry::new(self.bsd_name())
            .with(keys::WHOLE, whole)
            .with(keys::LEAF, leaf)
            .with(
                keys::WRITABLE,
                self.description.media_writable.unwrap_or(false),
            );
        if let Some(content) = &self.description.media_content {
            entry = entry.with(keys::CONTENT, content.as_str());
        }
        entry
    }
}
