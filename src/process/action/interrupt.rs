/// Interrupt a process by process ID (Unix).
///
/// Sends SIGINT to the process, or to its process group when `group` is set.
///
/// # Returns
///
/// - `Ok(())` if the signal was sent successfully
/// - `Err(std::io::Error)` if interrupting failed
///
/// # Example
/// ```rust,no_run
/// use tcrm_subprocess::process::action::interrupt::interrupt_process;
/// let pid = 1234;
/// interrupt_process(pid, false).unwrap();
/// ```
#[cfg(unix)]
pub fn interrupt_process(pid: u32, group: bool) -> Result<(), std::io::Error> {
    use crate::process::action::deliver::deliver_signal;
    use crate::process::signal::ProcessSignal;

    deliver_signal(pid, ProcessSignal::SIGINT, group)
}

/// Interrupt a process (Windows).
///
/// Generates a CTRL+C console event for every process sharing the caller's
/// console, the caller included; `pid` and `group` only serve validation.
/// A CTRL+C event cannot be directed at a single process group, and a child
/// started with a new process group ignores it. This is a platform limitation.
///
/// # Example
/// ```rust,no_run
/// use tcrm_subprocess::process::action::interrupt::interrupt_process;
/// let pid = 1234;
/// interrupt_process(pid, false).unwrap();
/// ```
#[cfg(windows)]
pub fn interrupt_process(pid: u32, _group: bool) -> Result<(), std::io::Error> {
    use windows::Win32::System::Console::{CTRL_C_EVENT, GenerateConsoleCtrlEvent};

    // Validate PID
    if pid == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Invalid PID: 0",
        ));
    }

    unsafe {
        GenerateConsoleCtrlEvent(CTRL_C_EVENT, 0).map_err(|e| {
            let error_message = match e.code().0 as u32 {
                0x80070005 => format!("Access denied when sending interrupt to PID {}", pid),
                0x80070057 => format!("Invalid parameter when sending interrupt to PID {}", pid),
                _ => format!(
                    "Failed to send interrupt to process with PID {}: {:?}",
                    pid, e
                ),
            };

            std::io::Error::other(error_message)
        })?;

        Ok(())
    }
}

/// Process interrupting is not available on this platform.
#[cfg(not(any(unix, windows)))]
pub fn interrupt_process(_pid: u32, _group: bool) -> Result<(), std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "Process interrupting not supported on this platform",
    ))
}
