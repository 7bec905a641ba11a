// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 implementation of the disk arbitration contract
//!
//! Block objects exported by UDisks2 on the system bus play the role of the
//! device registry; their `Block`, `Partition`, `PartitionTable`,
//! `Filesystem` and `Drive` interfaces are translated into
//! `diskinfo_types` models in one place (`describe`).

mod dbus;

pub mod arbitration;
pub mod describe;
pub mod error;
pub mod index;
pub mod manager;
pub mod mount;
pub mod registry;

pub use arbitration::{UdisksArbitration, UdisksOptions};
pub use error::DiskError;
pub use mount::{dissenter_from_udisks, status_for_error_name, status_for_udisks_error};
