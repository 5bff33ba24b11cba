#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::process::action::{interrupt::interrupt_process, kill::kill_process, terminate::terminate_process};

/// Signals that can be sent to a child process.
///
/// The numbering follows POSIX (Linux values) on every platform, so the same
/// value means the same request everywhere. On Unix each variant is delivered
/// as the signal of the same name. Windows has no signals; see
/// [`send_signal_to_process_id`] for how requests are emulated there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(i32)]
pub enum ProcessSignal {
    /// Hangup detected on controlling terminal or death of controlling process
    SIGHUP = 1,
    /// Interrupt from keyboard
    SIGINT = 2,
    /// Quit from keyboard
    SIGQUIT = 3,
    /// Illegal instruction
    SIGILL = 4,
    /// Trace/breakpoint trap
    SIGTRAP = 5,
    /// Abort signal from abort(3), also known as SIGIOT
    SIGABRT = 6,
    /// Bus error (bad memory access)
    SIGBUS = 7,
    /// Floating point exception
    SIGFPE = 8,
    /// Kill signal, cannot be caught or ignored
    SIGKILL = 9,
    /// User-defined signal 1
    SIGUSR1 = 10,
    /// Invalid memory reference
    SIGSEGV = 11,
    /// User-defined signal 2
    SIGUSR2 = 12,
    /// Broken pipe: write to pipe with no readers
    SIGPIPE = 13,
    /// Timer signal from alarm(2)
    SIGALRM = 14,
    /// Termination signal
    SIGTERM = 15,
    /// Stack fault on coprocessor (unused)
    SIGSTKFLT = 16,
    /// Child stopped or terminated
    SIGCHLD = 17,
    /// Continue if stopped
    SIGCONT = 18,
    /// Stop process
    SIGSTOP = 19,
    /// Stop typed at terminal
    SIGTSTP = 20,
    /// Terminal input for background process
    SIGTTIN = 21,
    /// Terminal output for background process
    SIGTTOU = 22,
    /// Urgent condition on socket
    SIGURG = 23,
    /// CPU time limit exceeded
    SIGXCPU = 24,
    /// File size limit exceeded
    SIGXFSZ = 25,
    /// Virtual alarm clock
    SIGVTALRM = 26,
    /// Profiling timer expired
    SIGPROF = 27,
    /// Window resize signal
    SIGWINCH = 28,
    /// I/O now possible
    SIGIO = 29,
}

impl ProcessSignal {
    /// Every signal, in numeric order.
    pub const ALL: [ProcessSignal; 29] = [
        ProcessSignal::SIGHUP,
        ProcessSignal::SIGINT,
        ProcessSignal::SIGQUIT,
        ProcessSignal::SIGILL,
        ProcessSignal::SIGTRAP,
        ProcessSignal::SIGABRT,
        ProcessSignal::SIGBUS,
        ProcessSignal::SIGFPE,
        ProcessSignal::SIGKILL,
        ProcessSignal::SIGUSR1,
        ProcessSignal::SIGSEGV,
        ProcessSignal::SIGUSR2,
        ProcessSignal::SIGPIPE,
        ProcessSignal::SIGALRM,
        ProcessSignal::SIGTERM,
        ProcessSignal::SIGSTKFLT,
        ProcessSignal::SIGCHLD,
        ProcessSignal::SIGCONT,
        ProcessSignal::SIGSTOP,
        ProcessSignal::SIGTSTP,
        ProcessSignal::SIGTTIN,
        ProcessSignal::SIGTTOU,
        ProcessSignal::SIGURG,
        ProcessSignal::SIGXCPU,
        ProcessSignal::SIGXFSZ,
        ProcessSignal::SIGVTALRM,
        ProcessSignal::SIGPROF,
        ProcessSignal::SIGWINCH,
        ProcessSignal::SIGIO,
    ];

    /// The POSIX number of this signal.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(raw: i32) -> Option<ProcessSignal> {
        if (1..=29).contains(&raw) {
            Some(Self::ALL[(raw - 1) as usize])
        } else {
            None
        }
    }

    /// The native signal with the same name, if this platform has one.
    #[cfg(unix)]
    pub(crate) fn to_native(self) -> Option<nix::sys::signal::Signal> {
        use nix::sys::signal::Signal;

        let sig = match self {
            ProcessSignal::SIGHUP => Signal::SIGHUP,
            ProcessSignal::SIGINT => Signal::SIGINT,
            ProcessSignal::SIGQUIT => Signal::SIGQUIT,
            ProcessSignal::SIGILL => Signal::SIGILL,
            ProcessSignal::SIGTRAP => Signal::SIGTRAP,
            ProcessSignal::SIGABRT => Signal::SIGABRT,
            ProcessSignal::SIGBUS => Signal::SIGBUS,
            ProcessSignal::SIGFPE => Signal::SIGFPE,
            ProcessSignal::SIGKILL => Signal::SIGKILL,
            ProcessSignal::SIGUSR1 => Signal::SIGUSR1,
            ProcessSignal::SIGSEGV => Signal::SIGSEGV,
            ProcessSignal::SIGUSR2 => Signal::SIGUSR2,
            ProcessSignal::SIGPIPE => Signal::SIGPIPE,
            ProcessSignal::SIGALRM => Signal::SIGALRM,
            ProcessSignal::SIGTERM => Signal::SIGTERM,
            #[cfg(all(
                target_os = "linux",
                any(
                    target_arch = "x86_64",
                    target_arch = "x86",
                    target_arch = "aarch64",
                    target_arch = "arm"
                )
            ))]
            ProcessSignal::SIGSTKFLT => Signal::SIGSTKFLT,
            #[cfg(not(all(
                target_os = "linux",
                any(
                    target_arch = "x86_64",
                    target_arch = "x86",
                    target_arch = "aarch64",
                    target_arch = "arm"
                )
            )))]
            ProcessSignal::SIGSTKFLT => return None,
            ProcessSignal::SIGCHLD => Signal::SIGCHLD,
            ProcessSignal::SIGCONT => Signal::SIGCONT,
            ProcessSignal::SIGSTOP => Signal::SIGSTOP,
            ProcessSignal::SIGTSTP => Signal::SIGTSTP,
            ProcessSignal::SIGTTIN => Signal::SIGTTIN,
            ProcessSignal::SIGTTOU => Signal::SIGTTOU,
            ProcessSignal::SIGURG => Signal::SIGURG,
            ProcessSignal::SIGXCPU => Signal::SIGXCPU,
            ProcessSignal::SIGXFSZ => Signal::SIGXFSZ,
            ProcessSignal::SIGVTALRM => Signal::SIGVTALRM,
            ProcessSignal::SIGPROF => Signal::SIGPROF,
            ProcessSignal::SIGWINCH => Signal::SIGWINCH,
            ProcessSignal::SIGIO => Signal::SIGIO,
        };
        Some(sig)
    }
}

impl TryFrom<i32> for ProcessSignal {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        ProcessSignal::from_raw(raw).ok_or(raw)
    }
}

/// Send a signal to a process by process ID.
///
/// On Unix the signal is delivered with `kill(2)`, or `killpg(2)` when
/// `group` is set (the process must then lead its own process group).
///
/// Windows has no signals, so requests are emulated:
/// - [`ProcessSignal::SIGINT`] generates a CTRL+C console event. The event
///   reaches every process attached to the caller's console, the caller
///   included, and cannot target a process on another console. Graceful
///   interruption is therefore weaker than on Unix; making it precise needs an
///   intermediate supervisor process, which this crate does not provide.
/// - [`ProcessSignal::SIGKILL`] forcibly terminates the whole descendant tree
///   of the process, then the process itself.
/// - Every other signal generates a CTRL+BREAK event for the process group
///   whose id is `process_id`; it only works for children launched with a
///   new process group.
///
/// # Errors
///
/// Returns an error if:
/// - The process does not exist
/// - Permission denied
/// - The signal has no equivalent on this platform
///
/// # Examples
///
/// ```rust,no_run
/// use tcrm_subprocess::process::signal::{ProcessSignal, send_signal_to_process_id};
///
/// let pid = 1234;
/// match send_signal_to_process_id(ProcessSignal::SIGTERM, pid, false) {
///     Ok(()) => println!("Signal sent successfully"),
///     Err(e) => eprintln!("Failed to send signal: {}", e),
/// }
/// ```
pub fn send_signal_to_process_id(
    signal: ProcessSignal,
    process_id: u32,
    group: bool,
) -> std::io::Result<()> {
    match signal {
        ProcessSignal::SIGINT => interrupt_process(process_id, group),
        ProcessSignal::SIGTERM => terminate_process(process_id, group),
        ProcessSignal::SIGKILL => kill_process(process_id, group),
        #[cfg(unix)]
        other => crate::process::action::deliver::deliver_signal(process_id, other, group),
        #[cfg(not(unix))]
        _ => terminate_process(process_id, group),
    }
}
