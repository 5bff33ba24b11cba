use crate::shell::environ::{
    CwdGuard, EnvGuard, current_env_copy, get_cwd, get_env, set_cwd, set_env,
};

use super::env_lock;

#[test]
fn set_and_remove() {
    let _guard = env_lock();
    let name = "TCRM_SUBPROCESS_SET_AND_REMOVE";

    // SAFETY: env_lock is held and no other test uses this variable.
    unsafe { set_env(name, Some("value")) };
    assert_eq!(get_env(name).as_deref(), Some("value"));
    assert_eq!(current_env_copy().get(name).map(String::as_str), Some("value"));

    unsafe { set_env(name, None) };
    assert!(get_env(name).is_none());
    assert!(!current_env_copy().contains_key(name));
}

#[test]
fn env_guard_restores_everything() {
    let _guard = env_lock();
    let kept = "TCRM_SUBPROCESS_GUARD_KEPT";
    let added = "TCRM_SUBPROCESS_GUARD_ADDED";
    // SAFETY: env_lock is held for the whole test, guard drop included.
    unsafe {
        set_env(kept, Some("before"));

        {
            let _env = EnvGuard::new();
            set_env(kept, Some("after"));
            set_env(added, Some("new"));
            assert_eq!(get_env(kept).as_deref(), Some("after"));
        }

        assert_eq!(get_env(kept).as_deref(), Some("before"));
        assert!(get_env(added).is_none());
        set_env(kept, None);
    }
}

#[test]
fn cwd_guard_restores_directory() {
    let _guard = env_lock();
    let original = get_cwd().unwrap();
    let temp = std::env::temp_dir().canonicalize().unwrap();

    {
        let _cwd = CwdGuard::new().unwrap();
        set_cwd(&temp).unwrap();
        assert_eq!(get_cwd().unwrap().canonicalize().unwrap(), temp);
    }

    assert_eq!(get_cwd().unwrap(), original);
}

#[test]
fn set_cwd_to_missing_directory_fails() {
    assert!(set_cwd("/nonexistent/dir/322").is_err());
}
