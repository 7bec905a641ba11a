// SPDX-License-Identifier: GPL-3.0-only

//! Mount and unmount requests, results and the dissenter taxonomy

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Base of the Disk Arbitration return codes (`err_local | err_local_diskarbitration`).
const DA_RETURN_BASE: u32 = 0xF8DA_0000;

/// Fixed taxonomy of reasons a platform refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DissenterStatus {
    Error,
    Busy,
    BadArgument,
    ExclusiveAccess,
    NoResources,
    NotFound,
    NotMounted,
    NotPermitted,
    NotPrivileged,
    NotReady,
    NotWritable,
    Unsupported,
    Unknown,
}

impl DissenterStatus {
    /// Map a Disk Arbitration status code; anything unrecognised is `Unknown`.
    pub fn from_code(code: u32) -> Self {
        match code.wrapping_sub(DA_RETURN_BASE) {
            0x01 => Self::Error,
            0x02 => Self::Busy,
            0x03 => Self::BadArgument,
            0x04 => Self::ExclusiveAccess,
            0x05 => Self::NoResources,
            0x06 => Self::NotFound,
            0x07 => Self::NotMounted,
            0x08 => Self::NotPermitted,
            0x09 => Self::NotPrivileged,
            0x0A => Self::NotReady,
            0x0B => Self::NotWritable,
            0x0C => Self::Unsupported,
            _ => Self::Unknown,
        }
    }

    /// Disk Arbitration status code, `None` for `Unknown`.
    pub fn code(self) -> Option<u32> {
        let offset = match self {
            Self::Error => 0x01,
            Self::Busy => 0x02,
            Self::BadArgument => 0x03,
            Self::ExclusiveAccess => 0x04,
            Self::NoResources => 0x05,
            Self::NotFound => 0x06,
            Self::NotMounted => 0x07,
            Self::NotPermitted => 0x08,
            Self::NotPrivileged => 0x09,
            Self::NotReady => 0x0A,
            Self::NotWritable => 0x0B,
            Self::Unsupported => 0x0C,
            Self::Unknown => return None,
        };
        Some(DA_RETURN_BASE | offset)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Busy => "Busy",
            Self::BadArgument => "Bad Argument",
            Self::ExclusiveAccess => "Exclusive Access",
            Self::NoResources => "No Resources",
            Self::NotFound => "Not Found",
            Self::NotMounted => "Not Mounted",
            Self::NotPermitted => "Not Permitted",
            Self::NotPrivileged => "Not Privileged",
            Self::NotReady => "Not Ready",
            Self::NotWritable => "Not Writable",
            Self::Unsupported => "Unsupported",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DissenterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A platform refusal: the mapped status plus whatever text came with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dissenter {
    pub status: DissenterStatus,
    pub message: Option<String>,
}

impl Dissenter {
    pub fn new(status: DissenterStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }
}

impl From<DissenterStatus> for Dissenter {
    fn from(status: DissenterStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }
}

impl fmt::Display for Dissenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.status, message),
            None => write!(f, "{}", self.status),
        }
    }
}

/// Why a request was refused before reaching the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Refusal {
    /// The target has no resolvable mount point.
    NotMounted,

    /// The mount point is a protected system path.
    ProtectedMountPoint(PathBuf),
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMounted => f.write_str("target is not mounted"),
            Self::ProtectedMountPoint(path) => {
                write!(f, "{} is a protected mount point", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountRequest {
    /// Device identifier; must name a leaf partition slice
    pub device: String,

    /// Explicit mount point, otherwise the platform picks one
    pub mount_path: Option<PathBuf>,
}

impl MountRequest {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            mount_path: None,
        }
    }

    pub fn at(mut self, path: impl Into<PathBuf>) -> Self {
        self.mount_path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmountRequest {
    /// Device identifier or mount path
    pub target: String,

    /// Unmount even if files are still open on the volume
    pub force: bool,
}

impl UnmountRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            force: false,
        }
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Outcome of a mount or unmount request.
///
/// `success` is always meaningful; `status` and `refusal` only explain a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountResult {
    pub success: bool,
    pub status: Option<DissenterStatus>,
    pub message: Option<String>,
    pub refusal: Option<Refusal>,

    /// Mount point after a successful mount
    pub mount_point: Option<PathBuf>,
}

impl MountResult {
    pub fn completed(mount_point: Option<PathBuf>) -> Self {
        Self {
            success: true,
            status: None,
            message: None,
            refusal: None,
            mount_point,
        }
    }

    pub fn already_mounted(mount_point: &Path) -> Self {
        Self::completed(Some(mount_point.to_path_buf()))
    }

    pub fn dissented(dissenter: Dissenter) -> Self {
        Self {
            success: false,
            status: Some(dissenter.status),
            message: dissenter.message,
            refusal: None,
            mount_point: None,
        }
    }

    pub fn refused(refusal: Refusal) -> Self {
        Self {
            success: false,
            status: None,
            message: Some(refusal.to_string()),
            refusal: Some(refusal),
            mount_point: None,
        }
    }
}
