//! Record of the platform calls a fake backend received.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    ListDevices,
    DescribeDevices,
    DescribeDevice(String),
    DescribeVolume(PathBuf),
    Mount {
        bsd_name: String,
        mount_path: Option<PathBuf>,
    },
    Unmount {
        bsd_name: String,
        force: bool,
    },
}

impl PlatformCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mount { .. } | Self::Unmount { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallLedger {
    calls: Vec<PlatformCall>,
}

impl CallLedger {
    pub fn record(&mut self, call: PlatformCall) {
        self.calls.push(call);
    }

    pub fn calls(&self) -> &[PlatformCall] {
        &self.calls
    }

    pub fn mutations(&self) -> impl Iterator<Item = &PlatformCall> {
        self.calls.iter().filter(|call| call.is_mutation())
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}
