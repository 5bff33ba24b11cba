//! Async facade over the blocking runner.
//!
//! The runner blocks on pipe reads and the OS wait, so it is moved onto
//! tokio's blocking thread pool instead of the async workers.

use crate::helper::tracing::MaybeInstrument;
use crate::process::completed::CompletedProcess;
use crate::process::config::RunOptions;
use crate::process::error::SubprocessError;
use crate::process::run;

/// Runs `command` to completion without blocking the async runtime.
///
/// Same semantics and errors as [`run::run`]. A panic inside the runner
/// surfaces as [`SubprocessError::Os`].
///
/// # Example
///
/// ```rust,no_run
/// use tcrm_subprocess::{async_tokio::run_async, process::{config::RunOptions, redirect::Redirect}};
///
/// #[tokio::main]
/// async fn main() {
///     let completed = run_async(["echo", "hi"], RunOptions::new().cout(Redirect::Pipe))
///         .await
///         .unwrap();
///     assert_eq!(completed.cout, b"hi\n");
/// }
/// ```
pub async fn run_async<I, S>(
    command: I,
    options: RunOptions,
) -> Result<CompletedProcess, SubprocessError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let command: Vec<String> = command.into_iter().map(Into::into).collect();

    tokio::task::spawn_blocking(move || run::run(command, options))
        .maybe_instrument("run")
        .await
        .map_err(|e| SubprocessError::Os(std::io::Error::other(e)))?
}
