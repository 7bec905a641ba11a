#![allow(dead_code)]

use std::sync::Arc;

use diskinfo::{ArbiterConfig, DiskArbiter, DiskArbitration};
use diskinfo_testing::FakeArbitration;
use diskinfo_testing::spec::load_by_name;

pub fn arbiter_with_config(
    fake: FakeArbitration,
    config: ArbiterConfig,
) -> (Arc<FakeArbitration>, DiskArbiter) {
    let fake = Arc::new(fake);
    let backend: Arc<dyn DiskArbitration> = fake.clone();
    (fake, DiskArbiter::new(backend, config))
}

pub fn arbiter(fake: FakeArbitration) -> (Arc<FakeArbitration>, DiskArbiter) {
    arbiter_with_config(fake, ArbiterConfig::default())
}

/// Arbiter over one of the bundled lab specs.
pub fn lab(spec_name: &str) -> (Arc<FakeArbitration>, DiskArbiter) {
    let spec = load_by_name(spec_name).expect("bundled lab spec");
    arbiter(spec.build())
}
