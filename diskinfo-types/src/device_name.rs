// SPDX-License-Identifier: GPL-3.0-only

//! Device identifier parsing
//!
//! Identifiers arrive either as device node names (`disk2s1`, `/dev/disk2s1`,
//! `/dev/rdisk2s1`, `sda1`, `nvme0n1p2`) or as mount paths. Every entry point
//! normalizes them here before matching.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEV_PREFIX: &str = "/dev/";

/// Linux families whose partitions are suffixed with `p<N>` (`nvme0n1p1`).
const P_SEPARATED_FAMILIES: &[&str] = &["mmcblk", "loop", "nbd", "md"];

/// Linux families named by drive letters (`sda`, `sda1`).
const LETTER_FAMILIES: &[&str] = &["xvd", "sd", "vd", "hd"];

/// Shape of a device node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceNameKind {
    /// A whole disk (`disk0`, `sda`, `nvme0n1`).
    WholeDisk,

    /// A leaf partition slice with its slice number (`disk0s1`, `sda1`).
    Slice { index: u32 },

    /// A node below a slice (`disk3s1s1`); never treated as a leaf slice.
    Nested,
}

/// A normalized device node name together with its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceName {
    name: String,
    parent: Option<String>,
    kind: DeviceNameKind,
}

impl DeviceName {
    /// Parse an already normalized name (no `/dev/` prefix).
    pub fn parse(name: &str) -> Option<Self> {
        if name.is_empty() || !is_node_token(name) {
            return None;
        }

        let families: [fn(&str) -> FamilyMatch; 3] =
            [parse_darwin, parse_p_separated, parse_letter_family];
        for parse_family in families {
            match parse_family(name) {
                FamilyMatch::Name(parsed) => return Some(parsed),
                FamilyMatch::Invalid => return None,
                FamilyMatch::Other => {}
            }
        }

        // dm-0, sr0, zram0 ...
        name.starts_with(|c: char| c.is_ascii_alphabetic())
            .then(|| Self::whole(name))
    }

    /// Normalize `input` and parse it.
    pub fn from_identifier(input: &str) -> Option<Self> {
        Self::parse(normalize_device_name(input.trim()))
    }

    fn whole(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            kind: DeviceNameKind::WholeDisk,
        }
    }

    fn slice(name: &str, parent: &str, index: u32) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(parent.to_string()),
            kind: DeviceNameKind::Slice { index },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceNameKind {
        self.kind
    }

    /// Whole disk containing this node, `None` for whole disks.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_whole_disk(&self) -> bool {
        self.kind == DeviceNameKind::WholeDisk
    }

    pub fn is_leaf_slice(&self) -> bool {
        matches!(self.kind, DeviceNameKind::Slice { .. })
    }

    pub fn slice_index(&self) -> Option<u32> {
        match self.kind {
            DeviceNameKind::Slice { index } => Some(index),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What a caller-supplied string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceIdentifier {
    Device(DeviceName),
    MountPath(PathBuf),
}

impl DeviceIdentifier {
    /// Classify `input` as a mount path or a device node name.
    ///
    /// Absolute paths outside `/dev/` are mount paths; whether they exist is
    /// left to the caller. Returns `None` for anything else that does not
    /// look like a device node.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.starts_with('/') && !input.starts_with(DEV_PREFIX) {
            return Some(Self::MountPath(PathBuf::from(input)));
        }
        DeviceName::from_identifier(input).map(Self::Device)
    }
}

/// Strip the `/dev/` prefix and the raw-device `r` of `rdiskN`.
pub fn normalize_device_name(input: &str) -> &str {
    let name = input.strip_prefix(DEV_PREFIX).unwrap_or(input);
    match name.strip_prefix('r') {
        Some(rest) if rest.starts_with("disk") => rest,
        _ => name,
    }
}

fn is_node_token(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Outcome of matching a name against one naming family.
enum FamilyMatch {
    /// Not this family's shape.
    Other,
    /// This family's shape, but the slice number does not fit a `u32`.
    Invalid,
    Name(DeviceName),
}

fn slice_match(name: &str, parent: &str, digits: &str) -> FamilyMatch {
    match digits.parse() {
        Ok(index) => FamilyMatch::Name(DeviceName::slice(name, parent, index)),
        Err(_) => FamilyMatch::Invalid,
    }
}

/// `diskN`, `diskNsM`, `diskNsMsK`...
fn parse_darwin(name: &str) -> FamilyMatch {
    let Some(rest) = name.strip_prefix("disk") else {
        return FamilyMatch::Other;
    };
    let parts: Vec<&str> = rest.split('s').collect();
    if !parts.iter().all(|p| all_digits(p)) {
        return FamilyMatch::Other;
    }

    let parent = format!("disk{}", parts[0]);
    match parts.len() {
        1 => FamilyMatch::Name(DeviceName::whole(name)),
        2 => slice_match(name, &parent, parts[1]),
        _ => FamilyMatch::Name(DeviceName {
            name: name.to_string(),
            parent: Some(parent),
            kind: DeviceNameKind::Nested,
        }),
    }
}

fn is_p_family_whole(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("nvme") {
        return match rest.split_once('n') {
            Some((controller, namespace)) => all_digits(controller) && all_digits(namespace),
            None => false,
        };
    }

    P_SEPARATED_FAMILIES
        .iter()
        .any(|family| name.strip_prefix(family).is_some_and(all_digits))
}

/// `nvme0n1`, `nvme0n1p2`, `mmcblk0p1`, `loop3p1`...
fn parse_p_separated(name: &str) -> FamilyMatch {
    if is_p_family_whole(name) {
        return FamilyMatch::Name(DeviceName::whole(name));
    }

    let Some(split) = name.rfind('p') else {
        return FamilyMatch::Other;
    };
    let (base, suffix) = (&name[..split], &name[split + 1..]);
    if !all_digits(suffix) || !is_p_family_whole(base) {
        return FamilyMatch::Other;
    }

    slice_match(name, base, suffix)
}

/// `sda`, `sda1`, `xvdb3`...
fn parse_letter_family(name: &str) -> FamilyMatch {
    let Some(rest) = LETTER_FAMILIES
        .iter()
        .find_map(|family| name.strip_prefix(family))
    else {
        return FamilyMatch::Other;
    };

    let letters_end = rest
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(rest.len());
    if letters_end == 0 {
        return FamilyMatch::Other;
    }

    let digits = &rest[letters_end..];
    if digits.is_empty() {
        return FamilyMatch::Name(DeviceName::whole(name));
    }
    if !all_digits(digits) {
        return FamilyMatch::Other;
    }

    let base = &name[..name.len() - digits.len()];
    slice_match(name, base, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dev_and_raw_prefixes() {
        assert_eq!(normalize_device_name("/dev/disk2s1"), "disk2s1");
        assert_eq!(normalize_device_name("/dev/rdisk2s1"), "disk2s1");
        assert_eq!(normalize_device_name("disk2"), "disk2");
        assert_eq!(normalize_device_name("/dev/sda1"), "sda1");
        assert_eq!(normalize_device_name("/dev/ram0"), "ram0");
    }

    #[test]
    fn darwin_names_follow_component_count() {
        let whole = DeviceName::parse("disk0").unwrap();
        assert!(whole.is_whole_disk());
        assert_eq!(whole.parent(), None);

        let slice = DeviceName::parse("disk0s1").unwrap();
        assert_eq!(slice.kind(), DeviceNameKind::Slice { index: 1 });
        assert_eq!(slice.parent(), Some("disk0"));

        let nested = DeviceName::parse("disk3s1s1").unwrap();
        assert_eq!(nested.kind(), DeviceNameKind::Nested);
        assert!(!nested.is_leaf_slice());
        assert_eq!(nested.parent(), Some("disk3"));
    }

    #[test]
    fn linux_partition_names_resolve_parent() {
        let sda1 = DeviceName::parse("sda1").unwrap();
        assert_eq!(sda1.parent(), Some("sda"));
        assert_eq!(sda1.slice_index(), Some(1));

        let nvme = DeviceName::parse("nvme0n1p2").unwrap();
        assert_eq!(nvme.parent(), Some("nvme0n1"));
        assert_eq!(nvme.slice_index(), Some(2));

        let mmc = DeviceName::parse("mmcblk0p1").unwrap();
        assert_eq!(mmc.parent(), Some("mmcblk0"));

        assert!(DeviceName::parse("nvme0n1").unwrap().is_whole_disk());
        assert!(DeviceName::parse("sdb").unwrap().is_whole_disk());
        assert!(DeviceName::parse("dm-0").unwrap().is_whole_disk());
    }

    #[test]
    fn overflowing_slice_numbers_are_not_devices() {
        for name in ["disk0s4294967296", "sda4294967296", "nvme0n1p99999999999"] {
            assert!(DeviceName::parse(name).is_none(), "{name}");
        }
        assert!(DeviceIdentifier::parse("/dev/rdisk0s4294967296").is_none());

        let largest = DeviceName::parse("disk0s4294967295").unwrap();
        assert_eq!(largest.slice_index(), Some(u32::MAX));
        assert_eq!(largest.parent(), Some("disk0"));
    }

    #[test]
    fn rejects_non_node_tokens() {
        assert!(DeviceName::parse("").is_none());
        assert!(DeviceName::parse("disk0/s1").is_none());
        assert!(DeviceName::parse("0disk").is_none());
        assert!(DeviceIdentifier::parse("hello world").is_none());
    }

    #[test]
    fn identifiers_split_paths_from_devices() {
        assert_eq!(
            DeviceIdentifier::parse("/Volumes/EFI"),
            Some(DeviceIdentifier::MountPath(PathBuf::from("/Volumes/EFI")))
        );
        match DeviceIdentifier::parse("/dev/disk1s2") {
            Some(DeviceIdentifier::Device(name)) => assert_eq!(name.as_str(), "disk1s2"),
            other => panic!("unexpected identifier: {other:?}"),
        }
    }
}
