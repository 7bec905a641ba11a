mod common;

use std::path::{Path, PathBuf};

use diskinfo::{
    ArbiterConfig, Dissenter, DissenterStatus, MountRequest, Refusal, StorageErrorKind,
    UnmountRequest,
};
use diskinfo_testing::fixtures::{FakeDevice, GPT_SCHEME};
use diskinfo_testing::{FakeArbitration, PlatformCall};

#[tokio::test]
async fn mounting_an_already_mounted_slice_skips_the_platform() {
    let (fake, arbiter) = common::lab("mac-gpt");

    let result = arbiter
        .mount(&MountRequest::new("disk2s2"))
        .await
        .expect("mount");

    assert!(result.success);
    assert_eq!(result.mount_point, Some(PathBuf::from("/Volumes/STICK")));
    assert!(fake.mutation_calls().is_empty());
}

#[tokio::test]
async fn stale_mount_point_is_mounted_again() {
    let (fake, arbiter) = common::lab("mac-gpt");
    fake.remove_path(Path::new("/Volumes/STICK"));

    let result = arbiter
        .mount(&MountRequest::new("/dev/disk2s2"))
        .await
        .expect("mount");

    assert!(result.success);
    assert_eq!(
        fake.mutation_calls(),
        vec![PlatformCall::Mount {
            bsd_name: "disk2s2".to_string(),
            mount_path: None,
        }]
    );
}

#[tokio::test]
async fn non_leaf_identifiers_are_rejected_without_platform_calls() {
    let (fake, arbiter) = common::lab("mac-gpt");

    for device in [
        "disk0",
        "/dev/disk2",
        "disk3s1s1",
        "disk0s4294967296",
        "/Volumes/STICK",
        "garbage!",
    ] {
        let err = arbiter
            .mount(&MountRequest::new(device))
            .await
            .expect_err("rejected");
        assert_eq!(err.kind, StorageErrorKind::InvalidInput, "{device}");
    }

    for target in ["disk0", "/dev/disk2", "disk3s1s1", "disk0s4294967296", "garbage!"] {
        let err = arbiter
            .unmount(&UnmountRequest::new(target).forced())
            .await
            .expect_err("rejected");
        assert_eq!(err.kind, StorageErrorKind::InvalidInput, "{target}");
    }

    assert!(
        fake.calls()
            .iter()
            .all(|call| !call.is_mutation()),
        "no mount or unmount may reach the platform: {:?}",
        fake.calls()
    );
}

#[tokio::test]
async fn unknown_slice_is_not_found() {
    let (fake, arbiter) = common::lab("mac-gpt");

    let err = arbiter
        .mount(&MountRequest::new("disk9s1"))
        .await
        .expect_err("unknown device");

    assert_eq!(err.kind, StorageErrorKind::NotFound);
    assert!(fake.mutation_calls().is_empty());
}

#[tokio::test]
async fn mount_reports_the_new_mount_point() {
    let (fake, arbiter) = common::lab("mac-gpt");

    let result = arbiter
        .mount(&MountRequest::new("disk2s1"))
        .await
        .expect("mount");

    assert!(result.success);
    assert_eq!(result.status, None);
    assert_eq!(result.mount_point, Some(PathBuf::from("/Volumes/EFI")));
    assert_eq!(
        arbiter.mount_point("disk2s1").await.expect("lookup"),
        Some(PathBuf::from("/Volumes/EFI"))
    );
    assert_eq!(fake.mutation_calls().len(), 1);
}

#[tokio::test]
async fn mount_at_explicit_path_is_forwarded() {
    let (fake, arbiter) = common::lab("mac-gpt");

    let result = arbiter
        .mount(&MountRequest::new("disk0s1").at("/mnt/esp"))
        .await
        .expect("mount");

    assert!(result.success);
    assert_eq!(result.mount_point, Some(PathBuf::from("/mnt/esp")));
    assert_eq!(
        fake.mutation_calls(),
        vec![PlatformCall::Mount {
            bsd_name: "disk0s1".to_string(),
            mount_path: Some(PathBuf::from("/mnt/esp")),
        }]
    );
}

#[tokio::test]
async fn platform_dissent_is_a_failed_result() {
    let (fake, arbiter) = common::lab("mac-gpt");
    fake.dissent_next_mount(Dissenter::new(DissenterStatus::ExclusiveAccess, "claimed"));

    let result = arbiter
        .mount(&MountRequest::new("disk2s1"))
        .await
        .expect("dissent is not an error");

    assert!(!result.success);
    assert_eq!(result.status, Some(DissenterStatus::ExclusiveAccess));
    assert_eq!(result.message.as_deref(), Some("claimed"));
    assert_eq!(result.mount_point, None);
}

#[tokio::test]
async fn protected_mount_points_are_never_unmounted() {
    let (fake, arbiter) = common::lab("mac-gpt");

    for target in ["/", "/private/var/vm", "disk0s2", "disk0s3", "/dev/rdisk0s2"] {
        let result = arbiter
            .unmount(&UnmountRequest::new(target).forced())
            .await
            .expect("refusal is not an error");

        assert!(!result.success, "{target}");
        assert!(
            matches!(result.refusal, Some(Refusal::ProtectedMountPoint(_))),
            "{target}: {:?}",
            result.refusal
        );
    }

    assert!(fake.mutation_calls().is_empty());
}

#[tokio::test]
async fn configured_mount_points_are_protected_too() {
    let spec = diskinfo_testing::spec::load_by_name("mac-gpt").expect("bundled lab spec");
    let (fake, arbiter) = common::arbiter_with_config(
        spec.build(),
        ArbiterConfig {
            protected_mount_points: vec![PathBuf::from("/Volumes/STICK")],
            ..ArbiterConfig::default()
        },
    );

    let result = arbiter
        .unmount(&UnmountRequest::new("disk2s2"))
        .await
        .expect("refusal is not an error");

    assert_eq!(
        result.refusal,
        Some(Refusal::ProtectedMountPoint(PathBuf::from("/Volumes/STICK")))
    );
    assert!(fake.mutation_calls().is_empty());
}

#[tokio::test]
async fn unmounting_an_unmounted_slice_is_refused() {
    let (fake, arbiter) = common::lab("mac-gpt");

    for target in ["disk2s1", "disk9s1", "/Volumes/Nope"] {
        let result = arbiter
            .unmount(&UnmountRequest::new(target))
            .await
            .expect("refusal is not an error");
        assert!(!result.success);
        assert_eq!(result.refusal, Some(Refusal::NotMounted), "{target}");
    }

    assert!(fake.mutation_calls().is_empty());
}

#[tokio::test]
async fn unmount_by_mount_path_resolves_the_device() {
    let (fake, arbiter) = common::lab("mac-gpt");

    let result = arbiter
        .unmount(&UnmountRequest::new("/Volumes/STICK"))
        .await
        .expect("unmount");

    assert!(result.success);
    assert_eq!(
        fake.mutation_calls(),
        vec![PlatformCall::Unmount {
            bsd_name: "disk2s2".to_string(),
            force: false,
        }]
    );
    assert_eq!(arbiter.mount_point("disk2s2").await.expect("lookup"), None);
}

#[tokio::test]
async fn force_flag_reaches_the_platform() {
    let (fake, arbiter) = common::lab("mac-gpt");

    let result = arbiter
        .unmount(&UnmountRequest::new("/dev/disk2s2").forced())
        .await
        .expect("unmount");

    assert!(result.success);
    assert_eq!(
        fake.mutation_calls(),
        vec![PlatformCall::Unmount {
            bsd_name: "disk2s2".to_string(),
            force: true,
        }]
    );
}

#[tokio::test]
async fn unmount_requires_a_registry_leaf() {
    let (fake, arbiter) = common::arbiter(
        FakeArbitration::new()
            .with_device(FakeDevice::whole_disk("disk4").scheme(GPT_SCHEME))
            .with_device(
                FakeDevice::partition("disk4s1")
                    .filesystem("apfs", None)
                    .mounted_at("/Volumes/Container")
                    .leaf(false),
            )
            .with_device(
                FakeDevice::partition("disk4s2")
                    .filesystem("hfs", None)
                    .mounted_at("/Volumes/Hidden")
                    .unregistered(),
            ),
    );

    for target in ["disk4s1", "/Volumes/Hidden"] {
        let err = arbiter
            .unmount(&UnmountRequest::new(target))
            .await
            .expect_err("not a registry leaf");
        assert_eq!(err.kind, StorageErrorKind::InvalidInput, "{target}");
    }

    assert!(fake.mutation_calls().is_empty());
}

#[tokio::test]
async fn unmount_dissent_carries_the_mapped_status() {
    let (fake, arbiter) = common::lab("mac-gpt");
    fake.dissent_next_unmount(Dissenter::from(DissenterStatus::from_code(0xF8DA_0009)));

    let result = arbiter
        .unmount(&UnmountRequest::new("disk2s2"))
        .await
        .expect("dissent is not an error");

    assert!(!result.success);
    assert_eq!(result.status, Some(DissenterStatus::NotPrivileged));
    assert_eq!(result.refusal, None);
    assert_eq!(
        arbiter.mount_point("disk2s2").await.expect("lookup"),
        Some(PathBuf::from("/Volumes/STICK"))
    );
}

#[tokio::test]
async fn mount_unmount_roundtrip() {
    let (fake, arbiter) = common::lab("linux-nvme");
    fake.add_device(
        FakeDevice::partition("sdb1")
            .content("EBD0A0A2-B9E5-4433-87C0-68B6B72699C7")
            .filesystem("vfat", Some("FAT32"))
            .volume_name("USB"),
    );

    let mounted = arbiter
        .mount(&MountRequest::new("/dev/sdb1"))
        .await
        .expect("mount");
    let mount_point = mounted.mount_point.expect("mount point");
    assert!(arbiter.is_mount_point(&mount_point).await.expect("lookup"));

    let unmounted = arbiter
        .unmount(&UnmountRequest::new(mount_point.to_string_lossy()))
        .await
        .expect("unmount");
    assert!(unmounted.success);
    assert!(!arbiter.is_mount_point(&mount_point).await.expect("lookup"));
    assert_eq!(fake.mutation_calls().len(), 2);
}
