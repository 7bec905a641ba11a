// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use diskinfo_contracts::{DiskArbitration, StorageError};
use diskinfo_types::{DiskDescription, DiskDescriptor, DeviceName};

use crate::config::ArbiterConfig;

/// Explicit arbitration context: one platform backend plus configuration.
///
/// Every operation re-reads the platform; the arbiter itself holds no device
/// state and may be shared between tasks.
#[derive(Clone)]
pub struct DiskArbiter {
    backend: Arc<dyn DiskArbitration>,
    config: ArbiterConfig,
    fat_markers: Vec<String>,
}

impl DiskArbiter {
    pub fn new(backend: Arc<dyn DiskArbitration>, config: ArbiterConfig) -> Self {
        let fat_markers = config.fat_markers();
        Self {
            backend,
            config,
            fat_markers,
        }
    }

    pub fn with_backend(backend: Arc<dyn DiskArbitration>) -> Self {
        Self::new(backend, ArbiterConfig::default())
    }

    /// Connect to UDisks2 on the system bus.
    #[cfg(feature = "udisks")]
    pub async fn system(config: ArbiterConfig) -> Result<Self, StorageError> {
        let options = diskinfo_udisks::UdisksOptions {
            interactive_auth: config.udisks.interactive_auth,
        };
        let backend = diskinfo_udisks::UdisksArbitration::system(options).await?;
        tracing::info!("using {} disk arbitration backend", backend.name());
        Ok(Self::new(Arc::new(backend), config))
    }

    pub fn backend(&self) -> &dyn DiskArbitration {
        self.backend.as_ref()
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Resolve a platform description into a descriptor, looking up the
    /// containing whole disk when the node is not whole itself.
    pub(crate) async fn resolve_description(
        &self,
        description: DiskDescription,
    ) -> Result<DiskDescriptor, StorageError> {
        let parent = description.parent_bsd_name.clone().or_else(|| {
            DeviceName::parse(&description.bsd_name)
                .and_then(|name| name.parent().map(ToOwned::to_owned))
        });

        let containing_disk = match parent {
            Some(parent) => {
                let found = self.backend.describe_device(&parent).await?;
                if found.is_none() {
                    tracing::debug!(
                        bsd_name = %description.bsd_name,
                        parent = %parent,
                        "containing disk not described"
                    );
                }
                found
            }
            None => None,
        };

        Ok(DiskDescriptor::from_descriptions(
            description,
            containing_disk.as_ref(),
            &self.fat_markers,
        ))
    }
}

impl std::fmt::Debug for DiskArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskArbiter")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}
