use std::process::{Child, ExitStatus};
use std::time::Duration;

use crate::process::error::SubprocessError;
use crate::process::pipe::PipeEndpoint;
use crate::process::pump::PumpHandle;
use crate::process::signal::{ProcessSignal, send_signal_to_process_id};

/// An exclusively owned handle to a spawned child.
///
/// The exit status is unset until collected by [`poll`](Self::poll) or one of
/// the wait methods; once collected it never changes. Dropping the handle
/// closes every owned pipe and then reaps the child, blocking until it exits.
///
/// # Example
///
/// ```rust,no_run
/// use tcrm_subprocess::process::{config::RunBuilder, redirect::Redirect};
///
/// let mut process = RunBuilder::new(["sleep", "10"]).spawn().unwrap();
/// assert!(!process.poll().unwrap());
/// process.kill();
/// let code = process.wait().unwrap();
/// assert!(code < 0);
/// ```
#[derive(Debug)]
pub struct RunningProcess {
    child: Option<Child>,
    pid: u32,
    cin: PipeEndpoint,
    cout: PipeEndpoint,
    cerr: PipeEndpoint,
    returncode: Option<i64>,
    args: Vec<String>,
    soft_kill: bool,
    process_group: bool,
    sinks: Vec<PumpHandle<()>>,
}

impl RunningProcess {
    pub(crate) fn new(child: Child, args: Vec<String>) -> Self {
        RunningProcess {
            pid: child.id(),
            child: Some(child),
            cin: PipeEndpoint::invalid(),
            cout: PipeEndpoint::invalid(),
            cerr: PipeEndpoint::invalid(),
            returncode: None,
            args,
            soft_kill: false,
            process_group: false,
            sinks: Vec::new(),
        }
    }

    pub(crate) fn with_pipes(mut self, cin: PipeEndpoint, cout: PipeEndpoint, cerr: PipeEndpoint) -> Self {
        self.cin = cin;
        self.cout = cout;
        self.cerr = cerr;
        self
    }

    pub(crate) fn with_process_group(mut self, process_group: bool) -> Self {
        self.process_group = process_group;
        self
    }

    pub(crate) fn with_sinks(mut self, sinks: Vec<PumpHandle<()>>) -> Self {
        self.sinks = sinks;
        self
    }

    /// OS process id, `0` after [`close`](Self::close).
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Exit code if collected. Negative `-N` means killed by signal `N`.
    pub fn returncode(&self) -> Option<i64> {
        self.returncode
    }

    /// The command line the process was launched with.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn soft_kill(&self) -> bool {
        self.soft_kill
    }

    /// Makes [`kill`](Self::kill) send a graceful terminate request instead.
    pub fn set_soft_kill(&mut self, soft_kill: bool) {
        self.soft_kill = soft_kill;
    }

    /// Whether the child leads its own process group.
    pub fn is_process_group(&self) -> bool {
        self.process_group
    }

    /// Parent end of the child's stdin, invalid unless `cin` was [`Redirect::Pipe`](crate::process::redirect::Redirect::Pipe).
    pub fn cin(&mut self) -> &mut PipeEndpoint {
        &mut self.cin
    }

    pub fn cout(&mut self) -> &mut PipeEndpoint {
        &mut self.cout
    }

    pub fn cerr(&mut self) -> &mut PipeEndpoint {
        &mut self.cerr
    }

    /// Moves the stdin endpoint out, leaving the field invalid.
    pub fn take_cin(&mut self) -> PipeEndpoint {
        self.cin.take_endpoint()
    }

    pub fn take_cout(&mut self) -> PipeEndpoint {
        self.cout.take_endpoint()
    }

    pub fn take_cerr(&mut self) -> PipeEndpoint {
        self.cerr.take_endpoint()
    }

    pub(crate) fn take_sinks(&mut self) -> Vec<PumpHandle<()>> {
        std::mem::take(&mut self.sinks)
    }

    /// Checks without blocking whether the child has exited.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::Os`] if the OS query fails.
    pub fn poll(&mut self) -> Result<bool, SubprocessError> {
        if self.returncode.is_some() {
            return Ok(true);
        }
        let Some(child) = self.child.as_mut() else {
            return Ok(false);
        };
        match child.try_wait()? {
            Some(status) => {
                self.collect(status);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Blocks until the child exits and returns its exit code.
    ///
    /// Calling it again after collection returns the same code immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::Os`] if the OS wait fails.
    pub fn wait(&mut self) -> Result<i64, SubprocessError> {
        if let Some(code) = self.returncode {
            return Ok(code);
        }
        let child = self.child.as_mut().ok_or_else(not_running)?;
        let status = child.wait()?;
        Ok(self.collect(status))
    }

    /// Blocks for at most `timeout` until the child exits.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::TimeoutExpired`] with empty output if the
    /// child is still running when `timeout` elapses. The process is left
    /// untouched; call `wait` again or escalate with
    /// [`terminate`](Self::terminate) or [`kill`](Self::kill).
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<i64, SubprocessError> {
        if let Some(code) = self.returncode {
            return Ok(code);
        }
        let child = self.child.as_mut().ok_or_else(not_running)?;
        match wait_child_timeout(child, timeout)? {
            Some(status) => Ok(self.collect(status)),
            None => Err(SubprocessError::TimeoutExpired {
                command: self.args.clone(),
                timeout,
                cout: Vec::new(),
                cerr: Vec::new(),
            }),
        }
    }

    /// Delivers `signal` to the child, or to its process group if it leads one.
    ///
    /// Returns `false` without doing anything once the exit status has been
    /// collected, and `false` if delivery failed. Never waits for the child
    /// to exit. See [`send_signal_to_process_id`] for the Windows emulation.
    pub fn send_signal(&mut self, signal: ProcessSignal) -> bool {
        if self.returncode.is_some() || self.pid == 0 {
            return false;
        }

        match send_signal_to_process_id(signal, self.pid, self.process_group) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(pid = self.pid, signal = ?signal, group = self.process_group, "Signal sent");
                true
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(pid = self.pid, signal = ?signal, error = %_e, "Failed to send signal");
                false
            }
        }
    }

    /// Asks the child to exit gracefully.
    pub fn terminate(&mut self) -> bool {
        self.send_signal(ProcessSignal::SIGTERM)
    }

    /// Forcibly stops the child, or terminates it gracefully with soft kill set.
    pub fn kill(&mut self) -> bool {
        if self.soft_kill {
            self.terminate()
        } else {
            self.send_signal(ProcessSignal::SIGKILL)
        }
    }

    /// Closes the stdin endpoint, signalling end-of-file to the child.
    pub fn close_cin(&mut self) {
        self.cin.close();
    }

    /// Discards the child's stdout in the background.
    pub fn ignore_cout(&mut self) {
        self.cout.take_endpoint().drain_and_close_async();
    }

    pub fn ignore_cerr(&mut self) {
        self.cerr.take_endpoint().drain_and_close_async();
    }

    /// Discards both output streams in the background.
    pub fn ignore_output(&mut self) {
        self.ignore_cout();
        self.ignore_cerr();
    }

    /// Releases everything this handle owns.
    ///
    /// Closes the owned pipes, then reaps the child (blocking until it exits),
    /// then releases the native handle. Safe to call more than once; the exit
    /// code stays available afterwards.
    pub fn close(&mut self) {
        self.cin.close();
        self.cout.close();
        self.cerr.close();

        if self.pid != 0 {
            if let Err(_e) = self.wait() {
                #[cfg(feature = "tracing")]
                tracing::warn!(pid = self.pid, error = %_e, "Failed to reap child on close");
            }
        }

        self.child = None;
        self.pid = 0;
        self.sinks.clear();
    }

    fn collect(&mut self, status: ExitStatus) -> i64 {
        let code = exit_code(status);
        #[cfg(feature = "tracing")]
        tracing::debug!(pid = self.pid, returncode = code, "Child reaped");
        self.returncode = Some(code);
        code
    }
}

impl Drop for RunningProcess {
    fn drop(&mut self) {
        self.close();
    }
}

fn not_running() -> SubprocessError {
    SubprocessError::Os(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        "process handle is closed",
    ))
}

/// Maps an exit status onto the crate's exit code convention.
#[cfg(unix)]
pub(crate) fn exit_code(status: ExitStatus) -> i64 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => i64::from(code),
        (None, Some(signal)) => -i64::from(signal),
        (None, None) => crate::process::completed::UNSET_RETURNCODE,
    }
}

#[cfg(not(unix))]
pub(crate) fn exit_code(status: ExitStatus) -> i64 {
    // Windows exit codes are unsigned 32-bit values.
    match status.code() {
        Some(code) => i64::from(code as u32),
        None => crate::process::completed::UNSET_RETURNCODE,
    }
}

/// Waits on the process object itself, so the deadline is exact.
#[cfg(windows)]
fn wait_child_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    use std::os::windows::io::AsRawHandle;
    use windows::Win32::Foundation::{HANDLE, WAIT_OBJECT_0, WAIT_TIMEOUT};
    use windows::Win32::System::Threading::{INFINITE, WaitForSingleObject};

    let millis = u32::try_from(timeout.as_millis())
        .unwrap_or(INFINITE - 1)
        .min(INFINITE - 1);
    let event = unsafe { WaitForSingleObject(HANDLE(child.as_raw_handle()), millis) };
    if event == WAIT_TIMEOUT {
        return Ok(None);
    }
    if event != WAIT_OBJECT_0 {
        return Err(std::io::Error::last_os_error());
    }
    child.try_wait()
}

/// Polls with an adaptive sleep, 1 ms doubling up to 100 ms.
#[cfg(not(windows))]
fn wait_child_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    use std::time::Instant;

    let Some(deadline) = Instant::now().checked_add(timeout) else {
        return child.wait().map(Some);
    };
    let mut delay = Duration::from_millis(1);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        std::thread::sleep(delay.min(deadline - now));
        delay = (delay * 2).min(Duration::from_millis(100));
    }
}
