// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for disk information and mount arbitration
//!
//! This crate defines the single source of truth for the types exchanged
//! between the arbiter and its platform backends:
//!
//! - **diskinfo-udisks**: builds these types from UDisks2 objects
//! - **diskinfo-testing**: builds them from in-memory fixtures
//! - **diskinfo**: consumes them to resolve descriptors and drive mounts
//!
//! ## Layers
//!
//! - `RegistrySnapshot` → raw, dynamically keyed device registry entries
//! - `DiskDescription` → typed platform description, one per device node
//! - `DiskDescriptor` → resolved view including parent-disk attributes
//!
//! Platform-specific keys are translated once, by the backend, into the
//! typed layers.

pub mod description;
pub mod descriptor;
pub mod device_name;
pub mod esp;
pub mod filesystem;
pub mod mount;
pub mod registry;

pub use description::{DiskDescription, VolumeIcon};
pub use descriptor::{DiskDescriptor, NOT_AVAILABLE};
pub use device_name::{DeviceIdentifier, DeviceName, DeviceNameKind, normalize_device_name};
pub use esp::{ESP_MEDIA_NAME, ESP_PARTITION_TYPE, is_esp_partition_type};
pub use filesystem::{DEFAULT_FAT_MARKERS, classify_filesystem, classify_filesystem_with_markers};
pub use mount::{Dissenter, DissenterStatus, MountRequest, MountResult, Refusal, UnmountRequest};
pub use registry::{PropertyValue, RegistryEntry, RegistrySnapshot};
