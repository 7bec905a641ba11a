// SPDX-License-Identifier: GPL-3.0-only

//! EFI System Partition identification

use uuid::Uuid;

use crate::DiskDescription;

/// Media name carried by EFI System Partitions.
pub const ESP_MEDIA_NAME: &str = "EFI System Partition";

/// GPT partition type GUID of an EFI System Partition.
pub const ESP_PARTITION_TYPE: &str = "C12A7328-F81F-11D2-BA4B-00A0C93EC93B";

/// Whether `content` is the ESP partition type GUID, in any letter case.
pub fn is_esp_partition_type(content: &str) -> bool {
    match (Uuid::parse_str(content.trim()), Uuid::parse_str(ESP_PARTITION_TYPE)) {
        (Ok(found), Ok(esp)) => found == esp,
        _ => false,
    }
}

impl DiskDescription {
    /// Both the media name and the partition type must identify an ESP.
    pub fn is_esp(&self) -> bool {
        self.media_name.as_deref() == Some(ESP_MEDIA_NAME)
            && self
                .media_content
                .as_deref()
                .is_some_and(is_esp_partition_type)
    }
}
