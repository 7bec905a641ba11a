// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem mount/unmount through `org.freedesktop.UDisks2.Filesystem`

use std::collections::HashMap;

use diskinfo_types::{Dissenter, DissenterStatus};
use udisks2::filesystem::FilesystemProxy;
use zbus::Connection;
use zbus::zvariant::{OwnedObjectPath, Value};

const DBUS_ERROR_PREFIX: &str = "org.freedesktop.DBus.Error.";

/// Map a generic `org.freedesktop.DBus.Error.*` name onto the dissenter
/// taxonomy. UDisks2's own error names arrive already typed as
/// `udisks2::Error` variants.
pub fn status_for_error_name(name: &str) -> DissenterStatus {
    match name.strip_prefix(DBUS_ERROR_PREFIX) {
        Some("InvalidArgs") => DissenterStatus::BadArgument,
        Some("UnknownObject" | "UnknownMethod" | "UnknownInterface") => DissenterStatus::NotFound,
        Some("AccessDenied") => DissenterStatus::NotPermitted,
        Some("NoMemory" | "LimitsExceeded") => DissenterStatus::NoResources,
        Some("Timeout" | "NoReply") => DissenterStatus::NotReady,
        _ => DissenterStatus::Unknown,
    }
}

/// Dissenter status for a failed UDisks2 call.
pub fn status_for_udisks_error(error: &udisks2::Error) -> DissenterStatus {
    use udisks2::Error;

    match error {
        Error::DeviceBusy | Error::AlreadyMounted | Error::AlreadyUnmounting => {
            DissenterStatus::Busy
        }
        Error::MountedByOtherUser => DissenterStatus::ExclusiveAccess,
        Error::NotMounted => DissenterStatus::NotMounted,
        Error::OptionNotPermitted => DissenterStatus::NotPermitted,
        Error::NotAuthorized | Error::NotAuthorizedCanObtain | Error::NotAuthorizedDismissed => {
            DissenterStatus::NotPrivileged
        }
        Error::NotSupported => DissenterStatus::Unsupported,
        Error::TimedOut | Error::WouldWakeup => DissenterStatus::NotReady,
        Error::Failed | Error::Cancelled | Error::AlreadyCancelled | Error::Iscsi(_) => {
            DissenterStatus::Error
        }
        Error::Zbus(zbus::Error::MethodError(name, _, _)) => status_for_error_name(name.as_str()),
        Error::Zbus(_) => DissenterStatus::Error,
    }
}

pub fn dissenter_from_udisks(error: udisks2::Error) -> Dissenter {
    match error {
        udisks2::Error::Zbus(inner) => dissenter_from_zbus(inner),
        other => Dissenter::new(status_for_udisks_error(&other), other.to_string()),
    }
}

pub(crate) fn dissenter_from_zbus(error: zbus::Error) -> Dissenter {
    match error {
        zbus::Error::MethodError(name, message, _) => {
            let status = status_for_error_name(name.as_str());
            Dissenter::new(status, message.unwrap_or_else(|| name.to_string()))
        }
        other => Dissenter::new(DissenterStatus::Error, other.to_string()),
    }
}

async fn filesystem_proxy<'a>(
    connection: &'a Connection,
    object_path: &'a OwnedObjectPath,
) -> Result<FilesystemProxy<'a>, Dissenter> {
    FilesystemProxy::builder(connection)
        .path(object_path)
        .map_err(dissenter_from_zbus)?
        .build()
        .await
        .map_err(dissenter_from_zbus)
}

pub(crate) async fn mount_filesystem(
    connection: &Connection,
    object_path: &OwnedObjectPath,
    interactive_auth: bool,
) -> Result<String, Dissenter> {
    let proxy = filesystem_proxy(connection, object_path).await?;

    let mut opts: HashMap<&str, Value<'_>> = HashMap::new();
    opts.insert("auth.no_user_interaction", Value::from(!interactive_auth));

    proxy.mount(opts).await.map_err(dissenter_from_udisks)
}

pub(crate) async fn unmount_filesystem(
    connection: &Connection,
    object_path: &OwnedObjectPath,
    force: bool,
    interactive_auth: bool,
) -> Result<(), Dissenter> {
    let proxy = filesystem_proxy(connection, object_path).await?;

    let mut opts: HashMap<&str, Value<'_>> = HashMap::new();
    opts.insert("auth.no_user_interaction", Value::from(!interactive_auth));
    if force {
        opts.insert("force", Value::from(true));
    }

    proxy.unmount(opts).await.map_err(dissenter_from_udisks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn udisks_errors_map_to_dissenter_statuses() {
        use udisks2::{Error, Iscsi};

        let cases = [
            (Error::DeviceBusy, DissenterStatus::Busy),
            (Error::AlreadyMounted, DissenterStatus::Busy),
            (Error::AlreadyUnmounting, DissenterStatus::Busy),
            (Error::MountedByOtherUser, DissenterStatus::ExclusiveAccess),
            (Error::NotMounted, DissenterStatus::NotMounted),
            (Error::OptionNotPermitted, DissenterStatus::NotPermitted),
            (Error::NotAuthorized, DissenterStatus::NotPrivileged),
            (Error::NotAuthorizedCanObtain, DissenterStatus::NotPrivileged),
            (Error::NotAuthorizedDismissed, DissenterStatus::NotPrivileged),
            (Error::NotSupported, DissenterStatus::Unsupported),
            (Error::TimedOut, DissenterStatus::NotReady),
            (Error::WouldWakeup, DissenterStatus::NotReady),
            (Error::Failed, DissenterStatus::Error),
            (Error::Cancelled, DissenterStatus::Error),
            (Error::AlreadyCancelled, DissenterStatus::Error),
            (Error::Iscsi(Iscsi::LoginFailed), DissenterStatus::Error),
        ];

        for (error, expected) in cases {
            let label = format!("{error:?}");
            let dissenter = dissenter_from_udisks(error);
            assert_eq!(dissenter.status, expected, "{label}");
            assert!(dissenter.message.is_some(), "{label}");
        }
    }

    #[test]
    fn busy_unmount_is_a_busy_dissent() {
        let dissenter = dissenter_from_udisks(udisks2::Error::DeviceBusy);
        assert_eq!(dissenter.status, DissenterStatus::Busy);
        assert_eq!(
            dissenter.message.as_deref(),
            Some("Attempting to unmount a device that is busy.")
        );
    }

    #[test]
    fn generic_dbus_errors_map_to_dissenter_statuses() {
        let cases = [
            ("org.freedesktop.DBus.Error.InvalidArgs", DissenterStatus::BadArgument),
            ("org.freedesktop.DBus.Error.UnknownObject", DissenterStatus::NotFound),
            ("org.freedesktop.DBus.Error.AccessDenied", DissenterStatus::NotPermitted),
            ("org.freedesktop.DBus.Error.NoMemory", DissenterStatus::NoResources),
            ("org.freedesktop.DBus.Error.NoReply", DissenterStatus::NotReady),
            ("org.freedesktop.UDisks2.Error.SomethingNew", DissenterStatus::Unknown),
            ("com.example.Error", DissenterStatus::Unknown),
        ];

        for (name, expected) in cases {
            assert_eq!(status_for_error_name(name), expected, "{name}");
        }
    }

    #[test]
    fn transport_failures_are_generic_dissents() {
        let error = udisks2::Error::from(zbus::Error::Failure("socket closed".into()));
        assert_eq!(status_for_udisks_error(&error), DissenterStatus::Error);

        let dissenter = dissenter_from_udisks(error);
        assert_eq!(dissenter.status, DissenterStatus::Error);
        assert!(dissenter.message.is_some());
    }
}
