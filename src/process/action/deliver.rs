use nix::errno::Errno;
use nix::sys::signal::{kill, killpg};
use nix::unistd::Pid;

use crate::process::signal::ProcessSignal;

/// Delivers `signal` to `pid`, or to the process group `pid` leads.
///
/// Shared by every Unix action so errno mapping stays in one place.
pub(crate) fn deliver_signal(
    pid: u32,
    signal: ProcessSignal,
    group: bool,
) -> Result<(), std::io::Error> {
    // Check for invalid pid
    if pid == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Invalid PID: 0",
        ));
    }

    // Convert u32 to i32 safely, checking for overflow
    let pid_i32 = match i32::try_from(pid) {
        Ok(p) => p,
        Err(_) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("PID {} is too large for this system", pid),
            ));
        }
    };

    let sig = signal.to_native().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("{:?} is not available on this platform", signal),
        )
    })?;

    let target = Pid::from_raw(pid_i32);
    let result = if group { killpg(target, sig) } else { kill(target, sig) };

    match result {
        Ok(_) => Ok(()),
        Err(e) => match e {
            Errno::ESRCH => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Process with PID {} does not exist", pid),
            )),
            Errno::EPERM => Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("Permission denied to send {:?} to PID {}", signal, pid),
            )),
            _ => Err(std::io::Error::other(format!(
                "Failed to send {:?} to PID {}: {}",
                signal, pid, e
            ))),
        },
    }
}
