mod common;

use std::path::PathBuf;

use diskinfo::StorageErrorKind;
use diskinfo_testing::{FakeArbitration, PlatformCall};

#[tokio::test]
async fn lists_every_device_in_platform_order() {
    let (_fake, arbiter) = common::lab("mac-gpt");

    let snapshot = arbiter.list_all_devices().await.expect("enumerate");
    let names: Vec<&str> = snapshot.bsd_names().collect();

    assert_eq!(
        names,
        vec!["disk0", "disk0s1", "disk0s2", "disk0s3", "disk2", "disk2s1", "disk2s2"]
    );
}

#[tokio::test]
async fn enumeration_failure_is_distinct_from_no_devices() {
    let (_empty, empty_arbiter) = common::arbiter(FakeArbitration::new());
    let snapshot = empty_arbiter.list_all_devices().await.expect("empty registry");
    assert!(snapshot.is_empty());

    let (fake, arbiter) = common::lab("mac-gpt");
    fake.fail_enumeration("registry unavailable");

    let err = arbiter.list_all_devices().await.expect_err("enumeration fails");
    assert_eq!(err.kind, StorageErrorKind::Unavailable);
    assert_eq!(fake.calls(), vec![PlatformCall::ListDevices]);
}

#[tokio::test]
async fn mounted_volumes_follow_registry_order() {
    let (_fake, arbiter) = common::lab("mac-gpt");

    let volumes = arbiter.mounted_volumes().await.expect("mounted volumes");

    assert_eq!(
        volumes,
        vec![
            PathBuf::from("/"),
            PathBuf::from("/private/var/vm"),
            PathBuf::from("/Volumes/STICK"),
        ]
    );
}

#[tokio::test]
async fn mounted_volumes_enumerate_the_platform_once() {
    let (fake, arbiter) = common::lab("mac-gpt");

    arbiter.mounted_volumes().await.expect("mounted volumes");

    assert_eq!(fake.calls(), vec![PlatformCall::DescribeDevices]);
}
