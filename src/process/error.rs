use std::io;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while launching, waiting on, or running a child process.
///
/// The timeout and non-zero-exit variants carry whatever output had been
/// captured, so a caller can diagnose the failure without rerunning it.
#[derive(Error, Debug)]
pub enum SubprocessError {
    /// The executable could not be resolved on the search path.
    ///
    /// Raised before any OS resource is allocated.
    #[error("Command \"{command}\" not found")]
    CommandNotFound { command: String },

    /// The platform spawn primitive failed.
    ///
    /// Every pipe created for the attempt has been released.
    #[error("Failed to spawn \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Any other OS primitive failure (wait, handle flags, pipe creation).
    #[error("OS error: {0}")]
    Os(#[from] io::Error),

    /// The wait deadline elapsed.
    #[error("Command \"{}\" timed out after {timeout:?}", .command.join(" "))]
    TimeoutExpired {
        command: Vec<String>,
        timeout: Duration,
        cout: Vec<u8>,
        cerr: Vec<u8>,
    },

    /// The child exited with a non-zero code and a check was requested.
    #[error("Command \"{}\" returned non-zero exit status {returncode}", .command.join(" "))]
    CalledProcess {
        command: Vec<String>,
        returncode: i64,
        cout: Vec<u8>,
        cerr: Vec<u8>,
    },

    #[error("Invalid redirection: {0}")]
    InvalidRedirect(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl SubprocessError {
    /// Captured stdout carried by a timeout or non-zero-exit error.
    pub fn cout(&self) -> Option<&[u8]> {
        match self {
            SubprocessError::TimeoutExpired { cout, .. }
            | SubprocessError::CalledProcess { cout, .. } => Some(cout),
            _ => None,
        }
    }

    /// Captured stderr carried by a timeout or non-zero-exit error.
    pub fn cerr(&self) -> Option<&[u8]> {
        match self {
            SubprocessError::TimeoutExpired { cerr, .. }
            | SubprocessError::CalledProcess { cerr, .. } => Some(cerr),
            _ => None,
        }
    }

    pub fn returncode(&self) -> Option<i64> {
        match self {
            SubprocessError::CalledProcess { returncode, .. } => Some(*returncode),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SubprocessError::TimeoutExpired { .. })
    }
}
