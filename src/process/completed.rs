use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::process::error::SubprocessError;

/// Exit code of a [`CompletedProcess`] that never ran.
pub const UNSET_RETURNCODE: i64 = -1;

/// Result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompletedProcess {
    /// The command line used to launch the process, program included.
    pub args: Vec<String>,

    /// Exit code. A negative value `-N` means the process was killed by signal `N`.
    pub returncode: i64,

    /// Captured stdout, empty unless stdout was piped.
    pub cout: Vec<u8>,

    /// Captured stderr, empty unless stderr was piped.
    pub cerr: Vec<u8>,
}

impl Default for CompletedProcess {
    fn default() -> Self {
        CompletedProcess {
            args: Vec::new(),
            returncode: UNSET_RETURNCODE,
            cout: Vec::new(),
            cerr: Vec::new(),
        }
    }
}

impl CompletedProcess {
    /// `true` if and only if the exit code is zero.
    pub fn success(&self) -> bool {
        self.returncode == 0
    }

    pub fn cout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.cout)
    }

    pub fn cerr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.cerr)
    }

    /// Turns a non-zero exit code into [`SubprocessError::CalledProcess`].
    pub fn check_returncode(self) -> Result<Self, SubprocessError> {
        if self.success() {
            Ok(self)
        } else {
            Err(SubprocessError::CalledProcess {
                command: self.args,
                returncode: self.returncode,
                cout: self.cout,
                cerr: self.cerr,
            })
        }
    }
}

impl From<&CompletedProcess> for bool {
    fn from(completed: &CompletedProcess) -> Self {
        completed.success()
    }
}
