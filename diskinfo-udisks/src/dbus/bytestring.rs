// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 exports paths as NUL-terminated byte arrays (`ay`).

use std::path::PathBuf;

pub(crate) fn decode_c_string_bytes(bytes: &[u8]) -> String {
    let raw = bytes.split(|b| *b == 0).next().unwrap_or(bytes);
    String::from_utf8_lossy(raw).to_string()
}

pub(crate) fn decode_mount_points(mount_points: Vec<Vec<u8>>) -> Vec<PathBuf> {
    mount_points
        .into_iter()
        .map(|mp| decode_c_string_bytes(&mp))
        .filter(|decoded| !decoded.is_empty())
        .map(PathBuf::from)
        .collect()
}
