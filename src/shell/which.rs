//! Executable lookup on the search path.
//!
//! Names resolved through `PATH` are remembered in a process-wide cache.
//! The cache is cleared whenever `PATH` is changed through
//! [`set_env`](crate::shell::environ::set_env); callers changing the
//! environment by other means should call [`clear_program_cache`].

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, PoisonError};

/// Resolved programs, keyed by the name they were looked up with.
static PROGRAM_CACHE: LazyLock<Mutex<HashMap<String, PathBuf>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Resolves `name` to the path of an executable file.
///
/// A name containing a path separator is checked directly (relative names
/// against the current directory) and never cached. A bare name is looked up
/// in the cache, then in each `PATH` entry in order. On Windows every
/// `PATHEXT` suffix is tried when the name itself does not exist.
///
/// Returns `None` if nothing matches.
///
/// # Examples
///
/// ```rust
/// use tcrm_subprocess::shell::which::find_program;
///
/// assert!(find_program("definitely-not-a-real-program-322").is_none());
/// ```
pub fn find_program(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    if has_separator(name) {
        return try_executable(Path::new(name)).and_then(|path| std::path::absolute(path).ok());
    }

    let mut cache = PROGRAM_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(path) = cache.get(name) {
        return Some(path.clone());
    }

    let search_path = env::var_os("PATH")?;
    let found = env::split_paths(&search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .find_map(|dir| try_executable(&dir.join(name)))?;

    #[cfg(feature = "tracing")]
    tracing::trace!(program = name, path = %found.display(), "Program resolved");

    cache.insert(name.to_string(), found.clone());
    Some(found)
}

/// Forgets the cached path of `name`. Returns `true` if it was cached.
pub fn invalidate_program(name: &str) -> bool {
    PROGRAM_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(name)
        .is_some()
}

/// Forgets every cached path.
pub fn clear_program_cache() {
    PROGRAM_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

/// Returns `true` if `name` is currently cached.
pub fn is_cached(name: &str) -> bool {
    PROGRAM_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(name)
}

fn has_separator(name: &str) -> bool {
    name.contains('/') || (cfg!(windows) && (name.contains('\\') || name.contains(':')))
}

fn try_executable(path: &Path) -> Option<PathBuf> {
    if is_executable(path) {
        return Some(path.to_path_buf());
    }

    #[cfg(windows)]
    {
        let extensions = env::var("PATHEXT").unwrap_or_else(|_| ".EXE".to_string());
        for ext in extensions.split(';').filter(|ext| !ext.is_empty()) {
            let mut candidate = path.as_os_str().to_os_string();
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
