use crate::state::{ErrorInfo, FailureReason};

use std::io;
use std::path::{Path, PathBuf};

/// Resolve the player executable the way a spawn would.
///
/// Bare names are searched on PATH; anything with a path separator is
/// checked directly. This is a best-effort probe: the file can appear or
/// disappear between the probe and a spawn.
pub fn find_executable(program: &Path) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Classify a failed spawn.
///
/// "Not found" from the OS is taken at its word. Anything else is
/// cross-checked with a lookup, since a missing interpreter or an
/// unreadable PATH entry can surface as a different error kind.
pub(crate) fn classify_spawn_error(program: &Path, error: &io::Error) -> ErrorInfo {
    let reason = if error.kind() == io::ErrorKind::NotFound || find_executable(program).is_none()
    {
        FailureReason::ExecutableNotFound
    } else {
        FailureReason::SpawnFailed
    };

    ErrorInfo::new(reason, error.to_string())
}
