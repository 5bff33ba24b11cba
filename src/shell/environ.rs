//! Environment and working-directory accessors.
//!
//! The process environment and working directory are global state.
//! Changing the environment is `unsafe` because another thread may be
//! reading it at the same time; see [`set_env`].

use std::collections::HashMap;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::shell::which::clear_program_cache;

/// Value of the environment variable `name`, `None` if unset or not unicode.
pub fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Sets (`Some`) or removes (`None`) the environment variable `name`.
///
/// Changing `PATH`, in any letter case, clears the program cache.
///
/// # Safety
///
/// Same contract as [`std::env::set_var`]: no other thread may read or write
/// the environment while this runs. That includes spawning a child with an
/// inherited environment.
pub unsafe fn set_env(name: &str, value: Option<&str>) {
    // SAFETY: forwarded to the caller.
    unsafe {
        match value {
            Some(value) => env::set_var(name, value),
            None => env::remove_var(name),
        }
    }

    if name.eq_ignore_ascii_case("PATH") {
        clear_program_cache();
    }
}

/// A snapshot of the whole environment. Variables that are not unicode are skipped.
pub fn current_env_copy() -> HashMap<String, String> {
    env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

pub fn get_cwd() -> io::Result<PathBuf> {
    env::current_dir()
}

pub fn set_cwd(path: impl AsRef<Path>) -> io::Result<()> {
    env::set_current_dir(path)
}

/// Restores the working directory on drop.
///
/// # Example
///
/// ```rust,no_run
/// use tcrm_subprocess::shell::environ::{CwdGuard, set_cwd};
///
/// {
///     let _guard = CwdGuard::new().unwrap();
///     set_cwd(std::env::temp_dir()).unwrap();
/// }
/// // back in the original directory
/// ```
#[derive(Debug)]
pub struct CwdGuard {
    saved: PathBuf,
}

impl CwdGuard {
    pub fn new() -> io::Result<Self> {
        Ok(CwdGuard { saved: get_cwd()? })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        if let Err(_e) = set_cwd(&self.saved) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, path = %self.saved.display(), "Failed to restore working directory");
        }
    }
}

/// Restores the whole environment on drop.
///
/// Variables added while the guard was alive are removed, changed ones get
/// their old value back.
#[derive(Debug)]
pub struct EnvGuard {
    saved: HashMap<String, String>,
}

impl EnvGuard {
    /// Snapshots the environment.
    ///
    /// # Safety
    ///
    /// Dropping the guard writes the environment, so the contract of
    /// [`set_env`] must hold at the point where the guard is dropped.
    pub unsafe fn new() -> Self {
        EnvGuard {
            saved: current_env_copy(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: `EnvGuard::new` makes the caller uphold `set_env`'s
        // contract for the drop.
        unsafe {
            for key in current_env_copy().into_keys() {
                if !self.saved.contains_key(&key) {
                    set_env(&key, None);
                }
            }
            for (key, value) in &self.saved {
                if get_env(key).as_deref() != Some(value.as_str()) {
                    set_env(key, Some(value));
                }
            }
        }
    }
}
