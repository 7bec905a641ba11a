// SPDX-License-Identifier: GPL-3.0-only

//! Mount controller
//!
//! Requests are validated before the platform is contacted: identifier
//! shape first, then mount state and protected paths. Platform dissents are
//! reported in the result rather than as errors.

use diskinfo_contracts::StorageError;
use diskinfo_types::{
    DeviceIdentifier, DeviceName, MountRequest, MountResult, Refusal, UnmountRequest,
};

use crate::DiskArbiter;
use crate::protected_paths::protected_match;

fn leaf_slice(input: &str) -> Result<DeviceName, StorageError> {
    DeviceName::from_identifier(input)
        .filter(DeviceName::is_leaf_slice)
        .ok_or_else(|| {
            StorageError::invalid_input(format!("'{input}' is not a leaf partition slice"))
        })
}

impl DiskArbiter {
    /// Mount a leaf partition slice and wait for the platform to finish.
    ///
    /// A slice already mounted at an existing path succeeds without a
    /// platform call.
    pub async fn mount(&self, request: &MountRequest) -> Result<MountResult, StorageError> {
        let name = leaf_slice(&request.device)?;

        let description = self
            .backend()
            .describe_device(name.as_str())
            .await?
            .ok_or_else(|| StorageError::not_found(format!("device '{name}' is not registered")))?;

        if let Some(path) = &description.volume_path
            && self.backend().path_exists(path)
        {
            tracing::debug!(bsd_name = %name, mount_point = %path.display(), "already mounted");
            return Ok(MountResult::already_mounted(path));
        }

        if let Err(dissenter) = self
            .backend()
            .mount(name.as_str(), request.mount_path.as_deref())
            .await
        {
            tracing::warn!(
                bsd_name = %name,
                status = %dissenter.status,
                code = ?dissenter.status.code(),
                "mount dissented: {}",
                dissenter
            );
            return Ok(MountResult::dissented(dissenter));
        }

        let mount_point = self
            .backend()
            .describe_device(name.as_str())
            .await?
            .and_then(|d| d.volume_path);
        tracing::info!(
            bsd_name = %name,
            mount_point = ?mount_point,
            "mounted"
        );
        Ok(MountResult::completed(mount_point))
    }

    /// Unmount a leaf partition slice, named directly or by its mount path.
    pub async fn unmount(&self, request: &UnmountRequest) -> Result<MountResult, StorageError> {
        let (bsd_name, mount_point) = match DeviceIdentifier::parse(&request.target) {
            Some(DeviceIdentifier::Device(name)) => {
                if !name.is_leaf_slice() {
                    return Err(StorageError::invalid_input(format!(
                        "'{}' is not a leaf partition slice",
                        request.target
                    )));
                }
                let mount_point = self
                    .backend()
                    .describe_device(name.as_str())
                    .await?
                    .and_then(|d| d.volume_path);
                (name.as_str().to_string(), mount_point)
            }
            Some(DeviceIdentifier::MountPath(path)) => {
                match self.backend().describe_volume(&path).await? {
                    Some(description) => {
                        let mount_point = description.volume_path.or(Some(path));
                        (description.bsd_name, mount_point)
                    }
                    None => (String::new(), None),
                }
            }
            None => {
                return Err(StorageError::invalid_input(format!(
                    "'{}' is neither a device identifier nor a mount path",
                    request.target
                )));
            }
        };

        let Some(mount_point) = mount_point else {
            tracing::debug!(request = %request.target, "unmount refused: not mounted");
            return Ok(MountResult::refused(Refusal::NotMounted));
        };

        if let Some(protected) = protected_match(&mount_point, &self.config().protected_mount_points())
        {
            tracing::warn!(
                request = %request.target,
                mount_point = %mount_point.display(),
                "unmount refused: protected mount point"
            );
            return Ok(MountResult::refused(Refusal::ProtectedMountPoint(protected)));
        }

        let name = leaf_slice(&bsd_name)?;
        self.require_registry_leaf(&name).await?;

        if let Err(dissenter) = self.backend().unmount(name.as_str(), request.force).await {
            tracing::warn!(
                bsd_name = %name,
                status = %dissenter.status,
                code = ?dissenter.status.code(),
                "unmount dissented: {}",
                dissenter
            );
            return Ok(MountResult::dissented(dissenter));
        }

        tracing::info!(
            bsd_name = %name,
            mount_point = %mount_point.display(),
            force = request.force,
            "unmounted"
        );
        Ok(MountResult::completed(None))
    }

    /// The registry must list `name` with its `Leaf` flag set.
    async fn require_registry_leaf(&self, name: &DeviceName) -> Result<(), StorageError> {
        let snapshot = self.list_all_devices().await?;
        let is_leaf = snapshot
            .get(name.as_str())
            .is_some_and(|entry| entry.is_leaf());

        if is_leaf {
            Ok(())
        } else {
            Err(StorageError::invalid_input(format!(
                "'{name}' is not a leaf in the device registry"
            )))
        }
    }
}
