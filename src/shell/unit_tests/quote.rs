use std::borrow::Cow;

use crate::shell::quote::{escape_shell_arg, join_args};

#[test]
fn plain_arguments_are_borrowed() {
    for arg in ["echo", "file.txt", "--flag=value", "/usr/bin/env", "a+b", "x,y"] {
        assert!(matches!(escape_shell_arg(arg), Cow::Borrowed(a) if a == arg));
    }
}

#[test]
fn special_characters_are_quoted() {
    assert_eq!(escape_shell_arg("hello world"), "\"hello world\"");
    assert_eq!(escape_shell_arg("$HOME"), "\"$HOME\"");
    assert_eq!(escape_shell_arg("it's"), "\"it's\"");
    assert_eq!(escape_shell_arg(""), "\"\"");
}

#[test]
fn quotes_and_backslashes_are_escaped() {
    assert_eq!(escape_shell_arg(r#"a"b"#), r#""a\"b""#);
    assert_eq!(escape_shell_arg(r"C:\Program Files"), r#""C:\\Program Files""#);
}

#[test]
fn join() {
    assert_eq!(join_args(&["echo", "hello world"]), "echo \"hello world\"");
    assert_eq!(join_args::<&str>(&[]), "");
    assert_eq!(
        join_args(&vec!["ls".to_string(), "-la".to_string()]),
        "ls -la"
    );
}
