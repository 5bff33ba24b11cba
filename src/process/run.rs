//! Run-to-completion on top of [`spawn`](crate::process::launcher::spawn).

use std::time::{Duration, Instant};

use crate::process::completed::CompletedProcess;
use crate::process::config::RunOptions;
use crate::process::error::SubprocessError;
use crate::process::launcher;
use crate::process::pipe::PipeEndpoint;
use crate::process::pump::{Capture, PumpHandle, StreamPump};
use crate::process::running::RunningProcess;

/// How long captures keep draining after a timed-out child has been reaped.
const TIMEOUT_GRACE: Duration = Duration::from_millis(100);

/// Launches `command` and waits for it to finish.
///
/// Output streams set to [`Redirect::Pipe`](crate::process::redirect::Redirect::Pipe)
/// are captured into [`CompletedProcess::cout`] and [`CompletedProcess::cerr`].
/// `options.timeout` bounds capture and wait together.
///
/// # Errors
///
/// Everything [`launcher::spawn`] returns, plus:
/// - [`SubprocessError::TimeoutExpired`] once the deadline passes; the child
///   has been sent a terminate request (or killed, if the request cannot be
///   delivered) and reaped, and the error carries the output captured so far
/// - [`SubprocessError::CalledProcess`] for a non-zero exit code when
///   `options.raise_on_nonzero` is set
///
/// # Example
///
/// ```rust,no_run
/// use tcrm_subprocess::process::{config::RunOptions, redirect::Redirect, run::run};
///
/// let completed = run(["echo", "hello", "world"], RunOptions::new().cout(Redirect::Pipe)).unwrap();
/// assert_eq!(completed.returncode, 0);
/// assert_eq!(completed.cout, b"hello world\n");
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn run<I, S>(command: I, options: RunOptions) -> Result<CompletedProcess, SubprocessError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let timeout = options.timeout;
    let check = options.raise_on_nonzero;
    let mut process = launcher::spawn(command, options)?;
    run_process(&mut process, timeout, check)
}

/// Captures the piped output of an already running process and waits for it.
///
/// Behaves like [`run`] for a process the caller spawned. Pipes the caller
/// already took off `process` are not captured.
///
/// # Errors
///
/// See [`run`].
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(pid = process.pid())))]
pub fn run_process(
    process: &mut RunningProcess,
    timeout: Option<Duration>,
    check: bool,
) -> Result<CompletedProcess, SubprocessError> {
    // A deadline past the end of `Instant` is no deadline.
    let deadline = timeout.and_then(|timeout| Instant::now().checked_add(timeout));

    let mut cout = start_capture(process.take_cout())?;
    let mut cerr = start_capture(process.take_cerr())?;
    let mut sinks = process.take_sinks();

    let captured_in_time = cout
        .iter_mut()
        .chain(cerr.iter_mut())
        .map(|capture| &mut capture.handle)
        .chain(sinks.iter_mut())
        .all(|handle| finish(handle, deadline));

    let waited = match deadline {
        _ if !captured_in_time => None,
        None => Some(process.wait()?),
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match process.wait_timeout(remaining) {
                Ok(code) => Some(code),
                Err(SubprocessError::TimeoutExpired { .. }) => None,
                Err(e) => return Err(e),
            }
        }
    };

    let Some(returncode) = waited else {
        return Err(expire(
            process,
            timeout.unwrap_or_default(),
            cout.as_mut(),
            cerr.as_mut(),
        ));
    };

    let completed = CompletedProcess {
        args: process.args().to_vec(),
        returncode,
        cout: cout.map(|capture| capture.buffer.take()).unwrap_or_default(),
        cerr: cerr.map(|capture| capture.buffer.take()).unwrap_or_default(),
    };

    if check {
        completed.check_returncode()
    } else {
        Ok(completed)
    }
}

fn start_capture(pipe: PipeEndpoint) -> Result<Option<Capture>, SubprocessError> {
    if !pipe.is_valid() {
        return Ok(None);
    }
    Ok(Some(StreamPump::capture(pipe)?))
}

fn finish(handle: &mut PumpHandle<()>, deadline: Option<Instant>) -> bool {
    match deadline {
        Some(deadline) => handle.wait_until(deadline),
        None => {
            handle.wait();
            true
        }
    }
}

/// Terminates and reaps a timed-out child, then builds the error with
/// whatever output the captures collected.
fn expire(
    process: &mut RunningProcess,
    timeout: Duration,
    cout: Option<&mut Capture>,
    cerr: Option<&mut Capture>,
) -> SubprocessError {
    #[cfg(feature = "tracing")]
    tracing::debug!(pid = process.pid(), ?timeout, "Timeout expired, terminating");

    // A child that cannot be asked to exit would never be reaped.
    if !process.terminate() {
        process.send_signal(crate::process::signal::ProcessSignal::SIGKILL);
    }
    if let Err(_e) = process.wait() {
        #[cfg(feature = "tracing")]
        tracing::warn!(pid = process.pid(), error = %_e, "Failed to reap timed-out child");
    }

    let grace = Instant::now() + TIMEOUT_GRACE;
    let snapshot = |capture: Option<&mut Capture>| match capture {
        Some(capture) => {
            capture.handle.wait_until(grace);
            capture.buffer.snapshot()
        }
        None => Vec::new(),
    };

    SubprocessError::TimeoutExpired {
        command: process.args().to_vec(),
        timeout,
        cout: snapshot(cout),
        cerr: snapshot(cerr),
    }
}
