// SPDX-License-Identifier: GPL-3.0-only

//! Mount points that are never unmounted

use std::path::{Path, PathBuf};

/// The root volume and the swap volume.
pub const DEFAULT_PROTECTED_MOUNT_POINTS: &[&str] = &["/", "/private/var/vm"];

/// Return the protected entry `mount_point` matches, if any.
///
/// Matching is exact; a volume mounted below a protected path is not itself
/// protected. Symlinks are resolved on both sides when the paths exist.
pub fn protected_match(mount_point: &Path, protected: &[PathBuf]) -> Option<PathBuf> {
    if let Some(hit) = protected.iter().find(|p| p.as_path() == mount_point) {
        return Some(hit.clone());
    }

    let Ok(canonical_mount) = mount_point.canonicalize() else {
        tracing::debug!(
            "Could not canonicalize mount point {:?}, comparing literally",
            mount_point
        );
        return None;
    };

    protected
        .iter()
        .find(|p| p.canonicalize().is_ok_and(|c| c == canonical_mount))
        .cloned()
}
