// SPDX-License-Identifier: GPL-3.0-only

//! Disk information and mount arbitration
//!
//! [`DiskArbiter`] is the single entry point. It owns a platform backend
//! implementing [`DiskArbitration`] (UDisks2 by default) and answers:
//!
//! - registry enumeration: [`DiskArbiter::list_all_devices`],
//!   [`DiskArbiter::mounted_volumes`]
//! - descriptor lookups by device identifier or mount path:
//!   [`DiskArbiter::describe`] and its convenience projections
//! - EFI System Partition discovery: [`DiskArbiter::list_esps`],
//!   [`DiskArbiter::list_mounted_esps`]
//! - mounting and unmounting: [`DiskArbiter::mount`],
//!   [`DiskArbiter::unmount`]
//!
//! Descriptors are snapshots; every call asks the platform again.

mod arbiter;
mod esp;
mod mount;
mod registry;
mod resolver;

pub mod config;
pub mod logging;
pub mod protected_paths;

pub use arbiter::DiskArbiter;
pub use config::{ArbiterConfig, ConfigError, UdisksConfig};
pub use resolver::CUSTOM_VOLUME_ICON;

pub use diskinfo_contracts::{DiskArbitration, StorageError, StorageErrorKind};
pub use diskinfo_types::{
    DeviceIdentifier, DeviceName, DiskDescription, DiskDescriptor, Dissenter, DissenterStatus,
    ESP_MEDIA_NAME, ESP_PARTITION_TYPE, MountRequest, MountResult, NOT_AVAILABLE, Refusal,
    RegistryEntry, RegistrySnapshot, UnmountRequest, VolumeIcon, classify_filesystem,
};

#[cfg(feature = "udisks")]
pub use diskinfo_udisks::{UdisksArbitration, UdisksOptions};
