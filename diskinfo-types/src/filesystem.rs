// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem kind classification
//!
//! Generic enumeration layers collapse every FAT variant into one kind
//! (`msdos` on Darwin, `vfat` under UDisks2). The refinement string reported
//! next to it ("MS-DOS (FAT32)", "FAT16", ...) names the actual variant.

/// Kinds treated as the generic FAT family marker.
pub const DEFAULT_FAT_MARKERS: &[&str] = &["msdos", "vfat"];

/// Refinement substrings in priority order; the first match wins.
const FAT_VARIANTS: &[(&str, &str)] = &[("exfat", "exFAT"), ("fat16", "FAT16"), ("fat32", "FAT32")];

/// Canonical filesystem name for a raw kind and optional refinement.
pub fn classify_filesystem(kind: &str, refinement: Option<&str>) -> String {
    classify_filesystem_with_markers(kind, refinement, DEFAULT_FAT_MARKERS)
}

/// Same as [`classify_filesystem`] with an explicit marker list.
pub fn classify_filesystem_with_markers<S: AsRef<str>>(
    kind: &str,
    refinement: Option<&str>,
    markers: &[S],
) -> String {
    let is_fat_family = markers
        .iter()
        .any(|marker| kind.eq_ignore_ascii_case(marker.as_ref()));
    if !is_fat_family {
        return kind.to_string();
    }

    let Some(refinement) = refinement else {
        return kind.to_string();
    };
    let refinement = refinement.to_lowercase();

    FAT_VARIANTS
        .iter()
        .find(|(needle, _)| refinement.contains(needle))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| kind.to_string())
}
