use std::collections::HashMap;

use crate::process::{error::SubprocessError, validator::ConfigValidator};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn reject_empty_command_line() {
    assert!(ConfigValidator::validate_command_line(&[]).is_err());
    assert!(ConfigValidator::validate_command_line(&strings(&[""])).is_err());
    assert!(ConfigValidator::validate_command_line(&strings(&["   "])).is_err());
}

#[test]
fn reject_program_with_surrounding_whitespace() {
    assert!(ConfigValidator::validate_program(" echo").is_err());
    assert!(ConfigValidator::validate_program("echo ").is_err());
    assert!(ConfigValidator::validate_program("echo").is_ok());
}

#[test]
fn reject_null_bytes() {
    assert!(ConfigValidator::validate_program("ec\0ho").is_err());
    assert!(ConfigValidator::validate_args(&strings(&["arg\0with\0nulls"])).is_err());
    assert!(ConfigValidator::validate_working_dir("/tmp\0").is_err());
}

#[test]
fn accepts_arguments_passed_verbatim() {
    let args = strings(&[
        "",
        "hello world",
        "--input=data.txt",
        "'quoted arg'",
        "\"double quoted arg\"",
        "C:\\Program Files\\App",
        "$PATH",
        "a | b",
    ]);
    assert!(ConfigValidator::validate_args(&args).is_ok());
}

#[test]
fn long_values_are_left_to_the_os() {
    let long = "x".repeat(5000);
    assert!(ConfigValidator::validate_args(&[long.clone()]).is_ok());

    let mut env = HashMap::new();
    env.insert("K".repeat(2000), long);
    assert!(ConfigValidator::validate_env_vars(&env).is_ok());
}

#[test]
fn null_byte_error_names_argument_position_not_content() {
    let mut args = strings(&["ok"]);
    args.push(format!("{}\0", "y".repeat(3000)));
    match ConfigValidator::validate_args(&args) {
        Err(SubprocessError::InvalidConfiguration(message)) => {
            assert!(message.contains("Argument 2"));
            assert!(message.contains("3001 bytes"));
            assert!(!message.contains("yyy"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn working_dir_must_be_an_existing_directory() {
    let dir = std::env::temp_dir();
    assert!(ConfigValidator::validate_working_dir(dir.to_str().unwrap()).is_ok());
    assert!(ConfigValidator::validate_working_dir("/nonexistent/path/322").is_err());

    let file = dir.join(format!("tcrm-validator-{}", std::process::id()));
    std::fs::write(&file, b"").unwrap();
    let result = ConfigValidator::validate_working_dir(file.to_str().unwrap());
    std::fs::remove_file(&file).unwrap();
    assert!(result.is_err());
}

#[test]
fn env_keys_must_be_non_empty_without_equals() {
    let mut env = HashMap::new();
    env.insert(String::new(), "value".to_string());
    assert!(ConfigValidator::validate_env_vars(&env).is_err());

    let mut env = HashMap::new();
    env.insert("KEY=BAD".to_string(), "value".to_string());
    assert!(ConfigValidator::validate_env_vars(&env).is_err());

    let mut env = HashMap::new();
    env.insert("PATH".to_string(), "/usr/bin:/bin".to_string());
    env.insert("CUSTOM_VAR".to_string(), "some value = with spaces".to_string());
    assert!(ConfigValidator::validate_env_vars(&env).is_ok());
}
