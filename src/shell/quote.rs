use std::borrow::Cow;

/// Characters that never need quoting.
fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+' | '/' | ',' | ':' | '=')
}

/// Quotes `arg` for display as a single shell token.
///
/// Arguments made only of plain characters are returned as-is. Anything else,
/// including the empty string, is wrapped in double quotes with `"` and `\`
/// escaped by a backslash.
///
/// # Examples
///
/// ```rust
/// use tcrm_subprocess::shell::quote::escape_shell_arg;
///
/// assert_eq!(escape_shell_arg("hello"), "hello");
/// assert_eq!(escape_shell_arg("hello world"), "\"hello world\"");
/// assert_eq!(escape_shell_arg(r#"say "hi""#), r#""say \"hi\"""#);
/// assert_eq!(escape_shell_arg(""), "\"\"");
/// ```
pub fn escape_shell_arg(arg: &str) -> Cow<'_, str> {
    if !arg.is_empty() && arg.chars().all(is_plain) {
        return Cow::Borrowed(arg);
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Renders a command vector as one line, quoting each element as needed.
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| escape_shell_arg(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
