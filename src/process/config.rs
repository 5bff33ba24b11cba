use std::collections::HashMap;
use std::time::Duration;

use crate::process::completed::CompletedProcess;
use crate::process::error::SubprocessError;
use crate::process::launcher;
use crate::process::redirect::Redirect;
use crate::process::run;
use crate::process::running::RunningProcess;
use crate::process::validator::ConfigValidator;

/// Launch configuration for one child process.
///
/// Consumed by [`launcher::spawn`] and [`run::run`]; changing a value after
/// launch has no effect on the child.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Standard input of the child.
    pub cin: Redirect,

    /// Standard output of the child.
    pub cout: Redirect,

    /// Standard error of the child.
    pub cerr: Redirect,

    /// Start the child in a new process group.
    pub new_process_group: bool,

    /// Working directory for the child, `None` inherits the parent's.
    pub working_dir: Option<String>,

    /// Complete environment for the child, empty inherits the parent's.
    pub env: HashMap<String, String>,

    /// Deadline for [`run::run`], `None` waits forever.
    pub timeout: Option<Duration>,

    /// Make [`run::run`] fail when the child exits with a non-zero code.
    pub raise_on_nonzero: bool,

    /// Downgrade [`RunningProcess::kill`] to a graceful terminate.
    pub soft_kill: bool,

    /// Windows only: do not create a console window for the child.
    pub create_no_window: bool,

    /// Windows only: detach the child from the parent's console.
    pub detached_process: bool,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cin(mut self, cin: impl Into<Redirect>) -> Self {
        self.cin = cin.into();
        self
    }

    pub fn cout(mut self, cout: impl Into<Redirect>) -> Self {
        self.cout = cout.into();
        self
    }

    pub fn cerr(mut self, cerr: impl Into<Redirect>) -> Self {
        self.cerr = cerr.into();
        self
    }

    pub fn new_process_group(mut self, b: bool) -> Self {
        self.new_process_group = b;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env<K, V, I>(mut self, env: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.env = env.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_ms(self, timeout: u64) -> Self {
        self.timeout(Duration::from_millis(timeout))
    }

    /// Sets the deadline in seconds.
    ///
    /// A negative or NaN value means no deadline, and so does a value too
    /// large to represent as a [`Duration`].
    pub fn timeout_secs(mut self, seconds: f64) -> Self {
        self.timeout = if seconds < 0.0 {
            None
        } else {
            Duration::try_from_secs_f64(seconds).ok()
        };
        self
    }

    pub fn raise_on_nonzero(mut self, b: bool) -> Self {
        self.raise_on_nonzero = b;
        self
    }

    pub fn soft_kill(mut self, b: bool) -> Self {
        self.soft_kill = b;
        self
    }

    pub fn create_no_window(mut self, b: bool) -> Self {
        self.create_no_window = b;
        self
    }

    pub fn detached_process(mut self, b: bool) -> Self {
        self.detached_process = b;
        self
    }

    /// Validates these options together with the command they will launch.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::InvalidConfiguration`] for a bad command
    /// line, working directory or environment. Any timeout is valid; zero
    /// expires immediately.
    pub fn validate(&self, command: &[String]) -> Result<(), SubprocessError> {
        ConfigValidator::validate_command_line(command)?;

        if let Some(dir) = &self.working_dir {
            ConfigValidator::validate_working_dir(dir)?;
        }

        ConfigValidator::validate_env_vars(&self.env)
    }
}

/// A command line paired with its [`RunOptions`].
///
/// # Example
///
/// ```rust,no_run
/// use tcrm_subprocess::process::{config::RunBuilder, redirect::Redirect};
///
/// let completed = RunBuilder::new(["echo", "hello", "world"])
///     .cout(Redirect::Pipe)
///     .run()
///     .unwrap();
/// assert_eq!(completed.cout_lossy().trim_end(), "hello world");
/// ```
#[derive(Debug, Default)]
pub struct RunBuilder {
    pub command: Vec<String>,
    pub options: RunOptions,
}

impl RunBuilder {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RunBuilder {
            command: command.into_iter().map(Into::into).collect(),
            options: RunOptions::default(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.command.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cin(mut self, cin: impl Into<Redirect>) -> Self {
        self.options = self.options.cin(cin);
        self
    }

    pub fn cout(mut self, cout: impl Into<Redirect>) -> Self {
        self.options = self.options.cout(cout);
        self
    }

    pub fn cerr(mut self, cerr: impl Into<Redirect>) -> Self {
        self.options = self.options.cerr(cerr);
        self
    }

    pub fn new_process_group(mut self, b: bool) -> Self {
        self.options.new_process_group = b;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.options = self.options.working_dir(dir);
        self
    }

    pub fn env<K, V, I>(mut self, env: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.options = self.options.env(env);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.options = self.options.timeout_ms(timeout);
        self
    }

    pub fn raise_on_nonzero(mut self, b: bool) -> Self {
        self.options.raise_on_nonzero = b;
        self
    }

    pub fn soft_kill(mut self, b: bool) -> Self {
        self.options.soft_kill = b;
        self
    }

    /// Launches the command and waits for it, see [`run::run`].
    pub fn run(self) -> Result<CompletedProcess, SubprocessError> {
        run::run(self.command, self.options)
    }

    /// Launches the command without waiting, see [`launcher::spawn`].
    pub fn spawn(self) -> Result<RunningProcess, SubprocessError> {
        launcher::spawn(self.command, self.options)
    }
}
