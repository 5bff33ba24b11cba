/// Terminate a process by process ID (Unix).
///
/// Sends SIGTERM to the process, or to its process group when `group` is
/// set, so the target can clean up before exiting.
///
/// # Errors
///
/// Returns an error if:
/// - The process does not exist (no such process)
/// - Permission denied
/// - Invalid process ID
///
/// # Examples
///
/// ```rust,no_run
/// use tcrm_subprocess::process::action::terminate::terminate_process;
///
/// let pid = 1234;
/// match terminate_process(pid, false) {
///     Ok(()) => println!("Process terminated successfully"),
///     Err(e) => eprintln!("Failed to terminate process: {}", e),
/// }
/// ```
#[cfg(unix)]
pub fn terminate_process(pid: u32, group: bool) -> Result<(), std::io::Error> {
    use crate::process::action::deliver::deliver_signal;
    use crate::process::signal::ProcessSignal;

    deliver_signal(pid, ProcessSignal::SIGTERM, group)
}

/// Terminate a process by process ID (Windows).
///
/// Generates a CTRL+BREAK console event for the process group whose id is
/// `pid`. Only children launched with a new process group can be reached this
/// way; the event is asynchronous and the target may handle it.
///
/// # Examples
///
/// ```rust,no_run
/// use tcrm_subprocess::process::action::terminate::terminate_process;
///
/// let pid = 1234;
/// match terminate_process(pid, true) {
///     Ok(()) => println!("Break event sent"),
///     Err(e) => eprintln!("Failed to terminate process: {}", e),
/// }
/// ```
#[cfg(windows)]
pub fn terminate_process(pid: u32, _group: bool) -> Result<(), std::io::Error> {
    use windows::Win32::System::Console::{CTRL_BREAK_EVENT, GenerateConsoleCtrlEvent};

    if pid == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Invalid PID: 0",
        ));
    }

    unsafe {
        GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid).map_err(|e| {
            std::io::Error::other(format!(
                "Failed to send break event to process group {}: {:?}",
                pid, e
            ))
        })
    }
}

#[cfg(not(any(unix, windows)))]
pub fn terminate_process(_pid: u32, _group: bool) -> Result<(), std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "Unsupported platform",
    ))
}
