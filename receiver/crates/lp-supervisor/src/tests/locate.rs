use crate::FailureReason;
use crate::locate::{classify_spawn_error, find_executable};

use std::io;
use std::path::Path;

const MISSING: &str = "linkplay-definitely-not-installed-player";

#[test]
fn test_missing_executable_is_not_found() {
    assert!(find_executable(Path::new(MISSING)).is_none());
}

#[cfg(unix)]
#[test]
fn test_shell_is_found() {
    assert!(find_executable(Path::new("sh")).is_some());
}

#[test]
fn test_os_not_found_is_executable_not_found() {
    let error = io::Error::from(io::ErrorKind::NotFound);

    let info = classify_spawn_error(Path::new(MISSING), &error);

    assert_eq!(info.reason, FailureReason::ExecutableNotFound);
    assert_eq!(info.message, error.to_string());
}

#[test]
fn test_other_error_for_missing_executable_is_executable_not_found() {
    let error = io::Error::from(io::ErrorKind::PermissionDenied);

    let info = classify_spawn_error(Path::new(MISSING), &error);

    assert_eq!(info.reason, FailureReason::ExecutableNotFound);
}

#[cfg(unix)]
#[test]
fn test_other_error_for_present_executable_is_spawn_failed() {
    let error = io::Error::from(io::ErrorKind::PermissionDenied);

    let info = classify_spawn_error(Path::new("sh"), &error);

    assert_eq!(info.reason, FailureReason::SpawnFailed);
}
