// SPDX-License-Identifier: GPL-3.0-only

//! Error types for UDisks2 backend operations

use diskinfo_contracts::{StorageError, StorageErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiskError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("D-Bus error: {0}")]
    DBusError(String),

    #[error("Zbus Error: {0}")]
    ZbusError(#[from] zbus::Error),
}

impl From<DiskError> for StorageError {
    fn from(err: DiskError) -> Self {
        let kind = match &err {
            DiskError::ConnectionFailed(_) => StorageErrorKind::Unavailable,
            DiskError::DBusError(_) | DiskError::ZbusError(_) => StorageErrorKind::Internal,
        };
        StorageError::new(kind, err.to_string())
    }
}
