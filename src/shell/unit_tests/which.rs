use std::fs;
use std::path::PathBuf;

use crate::shell::{
    environ::{get_env, set_env},
    which::{clear_program_cache, find_program, invalidate_program, is_cached},
};

use super::env_lock;

#[cfg(unix)]
const KNOWN_PROGRAM: &str = "sh";
#[cfg(windows)]
const KNOWN_PROGRAM: &str = "cmd";

#[test]
fn unknown_program_is_not_found() {
    assert!(find_program("yay-322").is_none());
    assert!(!is_cached("yay-322"));
    assert!(find_program("").is_none());
}

#[test]
fn known_program_resolves_to_an_existing_file() {
    let path = find_program(KNOWN_PROGRAM).unwrap();
    assert!(path.is_file());
    assert!(path.is_absolute() || path.components().count() > 1);
}

/// An executable that only lives in a private directory put in front of
/// `PATH`, so no other test can resolve (and cache) its name.
struct PrivateProgram {
    dir: PathBuf,
    name: String,
    saved_path: Option<String>,
}

impl PrivateProgram {
    /// Callers must hold [`env_lock`].
    fn install(tag: &str) -> Self {
        let name = format!("tcrm-private-{tag}-{}", std::process::id());
        let dir = std::env::temp_dir().join(format!("{name}-dir"));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(&name);
        fs::write(&file, b"#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&file, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let saved_path = get_env("PATH");
        let mut entries = vec![dir.clone()];
        if let Some(path) = saved_path.as_deref() {
            entries.extend(std::env::split_paths(path));
        }
        let joined = std::env::join_paths(entries).unwrap();
        // SAFETY: env_lock is held and the original entries stay reachable.
        unsafe { set_env("PATH", joined.to_str()) };

        PrivateProgram {
            dir,
            name,
            saved_path,
        }
    }
}

impl Drop for PrivateProgram {
    fn drop(&mut self) {
        // SAFETY: env_lock is still held by the test owning this value.
        unsafe { set_env("PATH", self.saved_path.as_deref()) };
        let _ = fs::remove_dir_all(&self.dir);
    }
}

#[test]
fn resolved_names_are_cached_and_invalidated() {
    let _guard = env_lock();
    let program = PrivateProgram::install("cache");
    let name = program.name.as_str();

    assert!(!is_cached(name));
    let first = find_program(name).unwrap();
    assert_eq!(first, program.dir.join(name));
    assert!(is_cached(name));
    assert_eq!(find_program(name).unwrap(), first);

    assert!(invalidate_program(name));
    assert!(!invalidate_program(name));
    assert!(!is_cached(name));

    find_program(name).unwrap();
    clear_program_cache();
    assert!(!is_cached(name));
}

#[test]
fn setting_path_clears_the_cache() {
    let _guard = env_lock();
    let program = PrivateProgram::install("path");
    let name = program.name.as_str();

    find_program(name).unwrap();
    assert!(is_cached(name));

    let path = get_env("PATH").unwrap();
    // SAFETY: env_lock is held and PATH keeps its value.
    unsafe { set_env("PATH", Some(&path)) };
    assert!(!is_cached(name));
}

#[test]
fn paths_with_separators_are_checked_directly() {
    let path = find_program(KNOWN_PROGRAM).unwrap();
    let direct = find_program(path.to_str().unwrap()).unwrap();
    assert_eq!(direct, path);
    assert!(!is_cached(path.to_str().unwrap()));

    assert!(find_program("./definitely/not/here").is_none());
}

#[cfg(unix)]
#[test]
fn non_executable_files_are_skipped() {
    let file = std::env::temp_dir().join(format!("tcrm-which-{}", std::process::id()));
    std::fs::write(&file, b"#!/bin/sh\n").unwrap();
    let found = find_program(file.to_str().unwrap());
    std::fs::remove_file(&file).unwrap();
    assert!(found.is_none());
}
