//! TOML lab specs describing a fake device registry.

use std::fs;
use std::path::{Path, PathBuf};

use diskinfo_types::DeviceName;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TestingError};
use crate::fake::FakeArbitration;
use crate::fixtures::FakeDevice;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabSpec {
    pub name: String,
    #[serde(default)]
    pub existing_paths: Vec<PathBuf>,
    pub disks: Vec<DiskSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskSpec {
    pub bsd_name: String,
    pub scheme: Option<String>,
    pub media_name: Option<String>,
    pub media_uuid: Option<String>,
    pub protocol: Option<String>,
    #[serde(default)]
    pub internal: bool,
    #[serde(default = "default_writable")]
    pub writable: bool,
    #[serde(default)]
    pub partitions: Vec<PartitionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionSpec {
    pub slice: u32,
    pub content: Option<String>,
    pub media_name: Option<String>,
    pub fs: Option<String>,
    pub fs_type: Option<String>,
    pub volume_name: Option<String>,
    pub volume_uuid: Option<String>,
    pub mount_point: Option<PathBuf>,
    pub leaf: Option<bool>,
}

fn default_writable() -> bool {
    true
}

pub fn specs_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/lab-specs")
}

pub fn spec_path_for_name(spec_name: &str) -> PathBuf {
    specs_root().join(format!("{}.toml", spec_name))
}

pub fn load_by_name(spec_name: &str) -> Result<LabSpec> {
    let path = spec_path_for_name(spec_name);
    if !path.exists() {
        return Err(TestingError::SpecNotFound {
            spec_name: spec_name.to_string(),
        });
    }

    let raw = fs::read_to_string(&path).map_err(|error| TestingError::SpecIo {
        path: path.clone(),
        reason: error.to_string(),
    })?;

    from_toml_str(spec_name, &raw)
}

pub fn from_toml_str(spec_name: &str, raw: &str) -> Result<LabSpec> {
    let spec: LabSpec = toml::from_str(raw).map_err(|error| TestingError::SpecInvalid {
        spec_name: spec_name.to_string(),
        reason: error.to_string(),
    })?;

    validate(&spec)?;
    Ok(spec)
}

pub fn validate(spec: &LabSpec) -> Result<()> {
    let invalid = |reason: String| TestingError::SpecInvalid {
        spec_name: if spec.name.is_empty() {
            "<unknown>".to_string()
        } else {
            spec.name.clone()
        },
        reason,
    };

    if spec.name.is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }

    if spec.disks.is_empty() {
        return Err(invalid("disks must not be empty".to_string()));
    }

    for disk in &spec.disks {
        let is_whole = DeviceName::parse(&disk.bsd_name).is_some_and(|n| n.is_whole_disk());
        if !is_whole {
            return Err(invalid(format!(
                "'{}' is not a whole-disk name",
                disk.bsd_name
            )));
        }

        let mut slices: Vec<u32> = disk.partitions.iter().map(|p| p.slice).collect();
        slices.sort_unstable();
        if slices.windows(2).any(|w| w[0] == w[1]) {
            return Err(invalid(format!(
                "'{}' declares the same slice twice",
                disk.bsd_name
            )));
        }
        if slices.first() == Some(&0) {
            return Err(invalid(format!(
                "'{}' slices are numbered from 1",
                disk.bsd_name
            )));
        }
    }

    Ok(())
}

impl LabSpec {
    /// Build the fake registry this spec describes.
    pub fn build(&self) -> FakeArbitration {
        let fake = FakeArbitration::new();

        for disk in &self.disks {
            let mut whole = FakeDevice::whole_disk(&disk.bsd_name).internal(disk.internal);
            if let Some(scheme) = &disk.scheme {
                whole = whole.scheme(scheme);
            }
            if let Some(name) = &disk.media_name {
                whole = whole.media_name(name);
            }
            if let Some(uuid) = &disk.media_uuid {
                whole = whole.media_uuid(uuid);
            }
            if let Some(protocol) = &disk.protocol {
                whole = whole.protocol(protocol);
            }
            if !disk.writable {
                whole = whole.read_only();
            }
            fake.add_device(whole);

            for partition in &disk.partitions {
                fake.add_device(partition.device(disk));
            }
        }

        self.existing_paths
            .iter()
            .cloned()
            .fold(fake, FakeArbitration::with_existing_path)
    }
}

impl PartitionSpec {
    fn device(&self, disk: &DiskSpec) -> FakeDevice {
        let bsd_name = partition_name(&disk.bsd_name, self.slice);
        let mut device = FakeDevice::partition(&bsd_name).internal(disk.internal);

        if let Some(content) = &self.content {
            device = device.content(content);
        }
        if let Some(name) = &self.media_name {
            device = device.media_name(name);
        }
        if let Some(fs) = &self.fs {
            device = device.filesystem(fs, self.fs_type.as_deref());
        }
        if let Some(name) = &self.volume_name {
            device = device.volume_name(name);
        }
        if let Some(uuid) = &self.volume_uuid {
            device = device.volume_uuid(uuid);
        }
        if let Some(path) = &self.mount_point {
            device = device.mounted_at(path.clone());
        }
        if let Some(protocol) = &disk.protocol {
            device = device.protocol(protocol);
        }
        if let Some(leaf) = self.leaf {
            device = device.leaf(leaf);
        }
        if !disk.writable {
            device = device.read_only();
        }
        device
    }
}

/// Slice name on a whole disk, using the platform naming family of `disk`.
pub fn partition_name(disk: &str, slice: u32) -> String {
    let ends_with_digit = disk.chars().last().is_some_and(|c| c.is_ascii_digit());
    if disk.starts_with("disk") {
        format!("{disk}s{slice}")
    } else if ends_with_digit {
        format!("{disk}p{slice}")
    } else {
        format!("{disk}{slice}")
    }
}
