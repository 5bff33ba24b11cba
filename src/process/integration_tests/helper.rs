pub(crate) fn command(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Prints `text` followed by the platform line terminator.
pub(crate) fn echo(text: &str) -> Vec<String> {
    #[cfg(windows)]
    let cmd = command(&["cmd", "/C", &format!("echo {text}")]);
    #[cfg(unix)]
    let cmd = command(&["echo", text]);
    cmd
}

pub(crate) fn sleep(seconds: u32) -> Vec<String> {
    #[cfg(windows)]
    let cmd = command(&["powershell", "-Command", &format!("Start-Sleep -Seconds {seconds}")]);
    #[cfg(unix)]
    let cmd = command(&["sleep", &seconds.to_string()]);
    cmd
}

/// Copies stdin to stdout.
pub(crate) fn cat() -> Vec<String> {
    #[cfg(windows)]
    let cmd = command(&["findstr", "^"]);
    #[cfg(unix)]
    let cmd = command(&["cat"]);
    cmd
}

/// Runs a snippet through the platform shell.
pub(crate) fn shell(script: &str) -> Vec<String> {
    #[cfg(windows)]
    let cmd = command(&["cmd", "/C", script]);
    #[cfg(unix)]
    let cmd = command(&["sh", "-c", script]);
    cmd
}

/// Prints the value of an environment variable.
pub(crate) fn print_env(name: &str) -> Vec<String> {
    #[cfg(windows)]
    let cmd = command(&["cmd", "/C", &format!("echo %{name}%")]);
    #[cfg(unix)]
    let cmd = command(&["printenv", name]);
    cmd
}

#[cfg(windows)]
pub(crate) const NEWLINE: &str = "\r\n";
#[cfg(unix)]
pub(crate) const NEWLINE: &str = "\n";

pub(crate) fn line(text: &str) -> Vec<u8> {
    format!("{text}{NEWLINE}").into_bytes()
}
