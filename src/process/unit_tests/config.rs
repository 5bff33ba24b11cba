use std::collections::HashMap;
use std::time::Duration;

use crate::process::{
    config::{RunBuilder, RunOptions},
    error::SubprocessError,
    redirect::Redirect,
};

fn command(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn defaults() {
    let options = RunOptions::default();
    assert!(matches!(options.cin, Redirect::Inherit));
    assert!(matches!(options.cout, Redirect::Inherit));
    assert!(matches!(options.cerr, Redirect::Inherit));
    assert!(!options.new_process_group);
    assert!(options.working_dir.is_none());
    assert!(options.env.is_empty());
    assert!(options.timeout.is_none());
    assert!(!options.raise_on_nonzero);
    assert!(!options.soft_kill);
}

#[test]
fn builder() {
    let options = RunOptions::new()
        .cin("input")
        .cout(Redirect::Pipe)
        .cerr(Redirect::ToStdout)
        .new_process_group(true)
        .working_dir("/home/user/project")
        .env([("RUST_LOG", "debug"), ("APP_ENV", "test")])
        .timeout_ms(300)
        .raise_on_nonzero(true)
        .soft_kill(true)
        .create_no_window(true)
        .detached_process(true);

    assert!(matches!(options.cin, Redirect::Bytes(ref b) if b == b"input"));
    assert!(matches!(options.cout, Redirect::Pipe));
    assert!(matches!(options.cerr, Redirect::ToStdout));
    assert!(options.new_process_group);
    assert_eq!(options.working_dir.as_deref(), Some("/home/user/project"));
    assert_eq!(options.env.get("RUST_LOG").map(String::as_str), Some("debug"));
    assert_eq!(options.timeout, Some(Duration::from_millis(300)));
    assert!(options.raise_on_nonzero);
    assert!(options.soft_kill);
    assert!(options.create_no_window);
    assert!(options.detached_process);
}

#[test]
fn env_hashmap() {
    let mut env = HashMap::new();
    env.insert("FOO".to_string(), "bar".to_string());
    let options = RunOptions::new().env(env.clone());
    assert_eq!(options.env, env);
}

#[test]
fn timeout_secs_negative_means_infinite() {
    assert_eq!(RunOptions::new().timeout_secs(-1.0).timeout, None);
    assert_eq!(RunOptions::new().timeout_secs(f64::NAN).timeout, None);
    assert_eq!(
        RunOptions::new().timeout_secs(1.5).timeout,
        Some(Duration::from_millis(1500))
    );
    assert_eq!(RunOptions::new().timeout_secs(0.0).timeout, Some(Duration::ZERO));
}

#[test]
fn timeout_secs_beyond_duration_range_means_infinite() {
    assert_eq!(RunOptions::new().timeout_secs(1e30).timeout, None);
    assert_eq!(RunOptions::new().timeout_secs(f64::INFINITY).timeout, None);
}

#[test]
fn validation() {
    assert!(RunOptions::new().validate(&command(&["echo", "hello"])).is_ok());

    match RunOptions::new().validate(&[]) {
        Err(SubprocessError::InvalidConfiguration(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(RunOptions::new().timeout_ms(0).validate(&command(&["echo"])).is_ok());

    match RunOptions::new()
        .working_dir("/nonexistent/dir/322")
        .validate(&command(&["echo"]))
    {
        Err(SubprocessError::InvalidConfiguration(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    match RunOptions::new()
        .env([("BAD=KEY", "value")])
        .validate(&command(&["echo"]))
    {
        Err(SubprocessError::InvalidConfiguration(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn run_builder_collects_command() {
    let builder = RunBuilder::new(["cargo"])
        .arg("build")
        .args(["--release", "--quiet"])
        .cout(Redirect::Pipe)
        .timeout_ms(5000)
        .raise_on_nonzero(true);

    assert_eq!(builder.command, command(&["cargo", "build", "--release", "--quiet"]));
    assert!(matches!(builder.options.cout, Redirect::Pipe));
    assert_eq!(builder.options.timeout, Some(Duration::from_secs(5)));
    assert!(builder.options.raise_on_nonzero);
}
