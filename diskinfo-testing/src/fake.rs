//! In-memory disk arbitration backend.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use diskinfo_contracts::{DiskArbitration, StorageError};
use diskinfo_types::{DiskDescription, Dissenter, DissenterStatus, RegistrySnapshot};

use crate::fixtures::FakeDevice;
use crate::ledger::{CallLedger, PlatformCall};

/// Mount root used when a mount request does not name a path.
pub const DEFAULT_MOUNT_ROOT: &str = "/Volumes";

#[derive(Debug, Default)]
struct FakeState {
    devices: Vec<FakeDevice>,
    existing_paths: HashSet<PathBuf>,
    enumeration_error: Option<String>,
    mount_dissent: Option<Dissenter>,
    unmount_dissent: Option<Dissenter>,
    ledger: CallLedger,
}

impl FakeState {
    fn device(&self, bsd_name: &str) -> Option<&FakeDevice> {
        self.devices.iter().find(|d| d.bsd_name() == bsd_name)
    }

    fn device_mut(&mut self, bsd_name: &str) -> Option<&mut FakeDevice> {
        self.devices.iter_mut().find(|d| d.bsd_name() == bsd_name)
    }
}

/// A scriptable `DiskArbitration` implementation.
///
/// Mounts succeed unless a dissent was scripted; a successful mount records
/// its mount point as an existing path, and an unmount removes it.
#[derive(Debug, Default)]
pub struct FakeArbitration {
    state: Mutex<FakeState>,
}

impl FakeArbitration {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_device(self, device: FakeDevice) -> Self {
        self.add_device(device);
        self
    }

    pub fn with_existing_path(self, path: impl Into<PathBuf>) -> Self {
        self.add_existing_path(path);
        self
    }

    /// Register a device; a mounted device's mount point counts as existing.
    pub fn add_device(&self, device: FakeDevice) {
        let mut state = self.state();
        if let Some(path) = &device.description.volume_path {
            state.existing_paths.insert(path.clone());
        }
        state.devices.push(device);
    }

    pub fn add_existing_path(&self, path: impl Into<PathBuf>) {
        self.state().existing_paths.insert(path.into());
    }

    pub fn remove_path(&self, path: &Path) {
        self.state().existing_paths.remove(path);
    }

    /// Make registry enumeration fail until cleared.
    pub fn fail_enumeration(&self, reason: impl Into<String>) {
        self.state().enumeration_error = Some(reason.into());
    }

    pub fn restore_enumeration(&self) {
        self.state().enumeration_error = None;
    }

    /// The next platform mount call dissents with `dissenter`.
    pub fn dissent_next_mount(&self, dissenter: Dissenter) {
        self.state().mount_dissent = Some(dissenter);
    }

    /// The next platform unmount call dissents with `dissenter`.
    pub fn dissent_next_unmount(&self, dissenter: Dissenter) {
        self.state().unmount_dissent = Some(dissenter);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state().ledger.calls().to_vec()
    }

    pub fn mutation_calls(&self) -> Vec<PlatformCall> {
        self.state().ledger.mutations().cloned().collect()
    }

    pub fn clear_calls(&self) {
        self.state().ledger.clear();
    }

    pub fn description(&self, bsd_name: &str) -> Option<DiskDescription> {
        self.state().device(bsd_name).map(|d| d.description.clone())
    }
}

#[async_trait]
impl DiskArbitration for FakeArbitration {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn list_devices(&self) -> Result<RegistrySnapshot, StorageError> {
        let mut state = self.state();
        state.ledger.record(PlatformCall::ListDevices);

        if let Some(reason) = &state.enumeration_error {
            return Err(StorageError::unavailable(reason.clone()));
        }

        Ok(state
            .devices
            .iter()
            .filter(|d| d.is_registered())
            .map(FakeDevice::registry_entry)
            .collect())
    }

    async fn describe_devices(&self) -> Result<Vec<DiskDescription>, StorageError> {
        let mut state = self.state();
        state.ledger.record(PlatformCall::DescribeDevices);

        if let Some(reason) = &state.enumeration_error {
            return Err(StorageError::unavailable(reason.clone()));
        }

        Ok(state
            .devices
            .iter()
            .filter(|d| d.is_registered())
            .map(|d| d.description.clone())
            .collect())
    }

    async fn describe_device(
        &self,
        bsd_name: &str,
    ) -> Result<Option<DiskDescription>, StorageError> {
        let mut state = self.state();
        state
            .ledger
            .record(PlatformCall::DescribeDevice(bsd_name.to_string()));
        Ok(state.device(bsd_name).map(|d| d.description.clone()))
    }

    async fn describe_volume(
        &self,
        mount_path: &Path,
    ) -> Result<Option<DiskDescription>, StorageError> {
        let mut state = self.state();
        state
            .ledger
            .record(PlatformCall::DescribeVolume(mount_path.to_path_buf()));
        Ok(state
            .devices
            .iter()
            .find(|d| d.description.volume_path.as_deref() == Some(mount_path))
            .map(|d| d.description.clone()))
    }

    async fn mount(&self, bsd_name: &str, mount_path: Option<&Path>) -> Result<(), Dissenter> {
        let mut state = self.state();
        state.ledger.record(PlatformCall::Mount {
            bsd_name: bsd_name.to_string(),
            mount_path: mount_path.map(Path::to_path_buf),
        });

        if let Some(dissenter) = state.mount_dissent.take() {
            return Err(dissenter);
        }

        let device = state
            .device_mut(bsd_name)
            .ok_or_else(|| Dissenter::new(DissenterStatus::NotFound, bsd_name))?;

        if device.description.volume_kind.is_none() {
            return Err(Dissenter::new(
                DissenterStatus::Unsupported,
                format!("{bsd_name} has no recognised filesystem"),
            ));
        }

        let target = match mount_path {
            Some(path) => path.to_path_buf(),
            None => {
                let label = device
                    .description
                    .volume_name
                    .clone()
                    .unwrap_or_else(|| bsd_name.to_string());
                Path::new(DEFAULT_MOUNT_ROOT).join(label)
            }
        };
        device.description.volume_path = Some(target.clone());
        state.existing_paths.insert(target);
        Ok(())
    }

    async fn unmount(&self, bsd_name: &str, force: bool) -> Result<(), Dissenter> {
        let mut state = self.state();
        state.ledger.record(PlatformCall::Unmount {
            bsd_name: bsd_name.to_string(),
            force,
        });

        if let Some(dissenter) = state.unmount_dissent.take() {
            return Err(dissenter);
        }

        let device = state
            .device_mut(bsd_name)
            .ok_or_else(|| Dissenter::new(DissenterStatus::NotFound, bsd_name))?;
        let previous = device
            .description
            .volume_path
            .take()
            .ok_or_else(|| Dissenter::from(DissenterStatus::NotMounted))?;
        state.existing_paths.remove(&previous);
        Ok(())
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.state().existing_paths.contains(path)
    }
}
