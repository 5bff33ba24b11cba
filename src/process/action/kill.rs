/// Forcibly kill a process by process ID (Unix).
///
/// Sends SIGKILL to the process, or to its process group when `group` is set.
///
/// # Example
/// ```rust,no_run
/// use tcrm_subprocess::process::action::kill::kill_process;
/// let pid = 1234;
/// kill_process(pid, false).unwrap();
/// ```
#[cfg(unix)]
pub fn kill_process(pid: u32, group: bool) -> Result<(), std::io::Error> {
    use crate::process::action::deliver::deliver_signal;
    use crate::process::signal::ProcessSignal;

    deliver_signal(pid, ProcessSignal::SIGKILL, group)
}

/// Forcibly kill a process and every descendant (Windows).
///
/// Walks a process snapshot to collect the whole descendant tree, terminates
/// each descendant, then the process itself with exit code 137. Only the
/// result for the process itself is reported; descendants that already exited
/// or cannot be opened are skipped.
///
/// # Example
/// ```rust,no_run
/// use tcrm_subprocess::process::action::kill::kill_process;
/// let pid = 1234;
/// kill_process(pid, false).unwrap();
/// ```
#[cfg(windows)]
pub fn kill_process(pid: u32, _group: bool) -> Result<(), std::io::Error> {
    if pid == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Invalid PID: 0",
        ));
    }

    for descendant in descendant_process_ids(pid) {
        let _ = terminate_by_id(descendant);
    }

    terminate_by_id(pid)
}

/// Exit code given to processes killed on Windows, matching 128 + SIGKILL.
#[cfg(windows)]
const KILLED_EXIT_CODE: u32 = 137;

#[cfg(windows)]
fn terminate_by_id(pid: u32) -> Result<(), std::io::Error> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};

    unsafe {
        let process_handle = OpenProcess(PROCESS_TERMINATE, false, pid).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Failed to open process with PID {}: {:?}", pid, e),
            )
        })?;

        let result = TerminateProcess(process_handle, KILLED_EXIT_CODE).map_err(|e| {
            std::io::Error::other(format!(
                "Failed to terminate process with PID {}: {:?}",
                pid, e
            ))
        });

        let _ = CloseHandle(process_handle);
        result
    }
}

/// Collects the ids of every descendant of `root`, children first.
#[cfg(windows)]
fn descendant_process_ids(root: u32) -> Vec<u32> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
        TH32CS_SNAPPROCESS,
    };

    let mut parents: Vec<(u32, u32)> = Vec::new();

    unsafe {
        let Ok(snapshot) = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) else {
            return Vec::new();
        };

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                parents.push((entry.th32ProcessID, entry.th32ParentProcessID));
                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }

        let _ = CloseHandle(snapshot);
    }

    collect_descendants(root, &parents)
}

/// Breadth-first walk over `(pid, parent_pid)` pairs.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn collect_descendants(root: u32, parents: &[(u32, u32)]) -> Vec<u32> {
    let mut result = Vec::new();
    let mut frontier = std::collections::VecDeque::from([root]);

    while let Some(parent) = frontier.pop_front() {
        for &(pid, ppid) in parents {
            // pid 0 is the idle process and parents itself on Windows
            if ppid == parent && pid != root && pid != 0 && !result.contains(&pid) {
                result.push(pid);
                frontier.push_back(pid);
            }
        }
    }

    result
}

#[cfg(not(any(unix, windows)))]
pub fn kill_process(_pid: u32, _group: bool) -> Result<(), std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "Process killing not supported on this platform",
    ))
}
