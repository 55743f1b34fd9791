//! OS-level operations on the player process.

use crate::command::PlayerCommand;
use crate::state::{ExitInfo, Termination};

use std::io::{self, BufRead, BufReader, PipeReader};
use std::process::{ExitStatus, Stdio};

use log::{debug, warn};
use tokio::process::Child;
use tokio::sync::oneshot;

const OUTPUT_TARGET: &str = "player";

/// Spawn the player with stdin closed and stdout/stderr merged.
///
/// With `forward_output` the merged stream is logged line by line at debug
/// level; without it both streams are discarded.
pub(crate) fn spawn(command: &PlayerCommand, forward_output: bool) -> io::Result<Child> {
    let mut cmd = command.to_command();
    cmd.stdin(Stdio::null()).kill_on_drop(true);

    let output = if forward_output {
        let (reader, writer) = io::pipe()?;
        cmd.stdout(writer.try_clone()?).stderr(writer);
        Some(reader)
    } else {
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        None
    };

    let child = cmd.spawn()?;

    // Our copies of the write end live in `cmd`; the reader only sees EOF
    // once the player holds the last one.
    drop(cmd);

    if let Some(reader) = output {
        forward_output_lines(reader, child.id().unwrap_or_default());
    }

    Ok(child)
}

fn forward_output_lines(reader: PipeReader, pid: u32) {
    let spawned = std::thread::Builder::new()
        .name(String::from("player-output"))
        .spawn(move || {
            let mut reader = BufReader::new(reader);
            let mut line = Vec::new();

            loop {
                line.clear();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        let text = String::from_utf8_lossy(&line);
                        debug!(target: OUTPUT_TARGET, "[{pid}] {}", text.trim_end());
                    }
                    Err(e) => {
                        debug!(target: OUTPUT_TARGET, "[{pid}] output closed: {e}");
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        warn!("Failed to start player output forwarder: {e}");
    }
}

/// How a player that exits after [`request_termination`] ended.
#[cfg(unix)]
pub(crate) const TERMINATION_ON_REQUEST: Termination = Termination::Graceful;

/// Without signals the terminate request is already a kill.
#[cfg(not(unix))]
pub(crate) const TERMINATION_ON_REQUEST: Termination = Termination::Forced;

/// Ask the player to exit (SIGTERM).
#[cfg(unix)]
pub(crate) fn request_termination(child: &mut Child) -> io::Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    // Already reaped
    let Some(pid) = child.id() else {
        return Ok(());
    };

    let pid = i32::try_from(pid).map_err(io::Error::other)?;
    kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(io::Error::from)
}

/// Without signals the only termination available is the forced one.
#[cfg(not(unix))]
pub(crate) fn request_termination(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

/// Kill the player unconditionally (SIGKILL).
pub(crate) fn force_kill(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

/// Kill and reap a child whose spawn completed after the supervisor gave up.
pub(crate) fn discard_late_spawn(result: oneshot::Receiver<io::Result<Child>>) {
    tokio::spawn(async move {
        if let Ok(Ok(mut child)) = result.await {
            warn!(
                "Discarding player (pid {:?}) spawned after the start attempt was abandoned",
                child.id()
            );
            child.start_kill().ok();
            child.wait().await.ok();
        }
    });
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Classify an exit nobody asked for.
pub(crate) fn unrequested_exit(status: ExitStatus) -> ExitInfo {
    let signal = exit_signal(&status);
    let termination = if signal.is_some() {
        Termination::Crashed
    } else {
        Termination::Normal
    };

    ExitInfo::new(status.code(), signal, termination)
}

/// Classify an exit that followed a stop request. `status` is None when the
/// exit was never observed.
pub(crate) fn requested_exit(status: Option<ExitStatus>, termination: Termination) -> ExitInfo {
    match status {
        Some(status) => ExitInfo::new(status.code(), exit_signal(&status), termination),
        None => ExitInfo::new(None, None, termination),
    }
}
