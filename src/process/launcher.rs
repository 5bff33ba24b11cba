//! Spawning a child with its three standard streams wired per [`Redirect`].

use std::fs::File;
use std::io::{Read, Write};
use std::process::{Command, Stdio};

use crate::process::config::RunOptions;
use crate::process::error::SubprocessError;
use crate::process::pipe::{PipeEndpoint, PipePair};
use crate::process::pump::StreamPump;
use crate::process::redirect::{Redirect, StreamKind};
use crate::process::running::RunningProcess;
use crate::shell::quote::join_args;
use crate::shell::which::find_program;

#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
const NULL_DEVICE: &str = "/dev/null";

/// The handle given to the child for one stream.
#[derive(Debug)]
enum ChildEnd {
    Inherit,
    File(File),
}

impl ChildEnd {
    fn into_stdio(self) -> Stdio {
        match self {
            ChildEnd::Inherit => Stdio::inherit(),
            ChildEnd::File(file) => Stdio::from(file),
        }
    }

    /// A second handle to the same destination, for aliasing.
    fn duplicate(&self, stream: StreamKind) -> Result<ChildEnd, SubprocessError> {
        match self {
            ChildEnd::Inherit => Ok(ChildEnd::File(parent_stream(stream)?)),
            ChildEnd::File(file) => Ok(ChildEnd::File(file.try_clone()?)),
        }
    }
}

/// Work left for after the spawn.
enum Pending {
    Nothing,
    Feed(Box<dyn Read + Send>),
    Sink(Box<dyn Write + Send>),
}

/// One realized stream: what the child gets and what the parent keeps.
struct Wiring {
    child: ChildEnd,
    parent: PipeEndpoint,
    discard: PipeEndpoint,
    pending: Pending,
}

impl Wiring {
    fn child_only(child: ChildEnd) -> Self {
        Wiring {
            child,
            parent: PipeEndpoint::invalid(),
            discard: PipeEndpoint::invalid(),
            pending: Pending::Nothing,
        }
    }
}

/// Launches `command` with `options` and returns without waiting.
///
/// The program name is resolved with
/// [`find_program`](crate::shell::which::find_program) before any handle is
/// allocated. Streams set to [`Redirect::Pipe`] leave their parent end on the
/// returned process. In-process input sources and output writers are served
/// by background pumps; their fields on the process stay invalid.
///
/// # Errors
///
/// - [`SubprocessError::InvalidConfiguration`] if `options` fail validation
/// - [`SubprocessError::CommandNotFound`] if the program cannot be resolved
/// - [`SubprocessError::InvalidRedirect`] if a target is not allowed for its stream
/// - [`SubprocessError::Spawn`] if the OS refuses to start the process
/// - [`SubprocessError::Os`] if a pipe or pump cannot be created
///
/// # Example
///
/// ```rust,no_run
/// use std::io::Write;
/// use tcrm_subprocess::process::{config::RunOptions, launcher::spawn, redirect::Redirect};
///
/// let options = RunOptions::new().cin(Redirect::Pipe).cout(Redirect::Pipe);
/// let mut process = spawn(["cat"], options).unwrap();
/// process.cin().write_all(b"hello").unwrap();
/// process.close_cin();
/// assert_eq!(process.cout().read_all(), b"hello");
/// assert_eq!(process.wait().unwrap(), 0);
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn spawn<I, S>(command: I, options: RunOptions) -> Result<RunningProcess, SubprocessError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let command: Vec<String> = command.into_iter().map(Into::into).collect();
    options.validate(&command)?;

    let RunOptions {
        cin,
        cout,
        cerr,
        new_process_group,
        working_dir,
        env,
        soft_kill,
        create_no_window,
        detached_process,
        ..
    } = options;

    let Some((name, args)) = command.split_first() else {
        return Err(SubprocessError::InvalidConfiguration(
            "Command line cannot be empty".to_string(),
        ));
    };
    let program = find_program(name).ok_or_else(|| SubprocessError::CommandNotFound {
        command: name.clone(),
    })?;

    for (stream, target) in [
        (StreamKind::Cin, &cin),
        (StreamKind::Cout, &cout),
        (StreamKind::Cerr, &cerr),
    ] {
        target
            .allowed_for(stream)
            .map_err(SubprocessError::InvalidRedirect)?;
    }

    let cin = realize(StreamKind::Cin, cin)?;
    let (cout, cerr) = realize_outputs(cout, cerr)?;

    let mut cmd = Command::new(&program);
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.arg0(name);
    }
    cmd.args(args);

    if let Some(dir) = &working_dir {
        cmd.current_dir(dir);
    }
    if !env.is_empty() {
        cmd.env_clear();
        cmd.envs(&env);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        if new_process_group {
            cmd.process_group(0);
        }
        let _ = (create_no_window, detached_process);
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        use windows::Win32::System::Threading::{
            CREATE_NEW_PROCESS_GROUP, CREATE_NO_WINDOW, DETACHED_PROCESS,
        };

        let mut flags = 0;
        if new_process_group {
            flags |= CREATE_NEW_PROCESS_GROUP.0;
        }
        if create_no_window {
            flags |= CREATE_NO_WINDOW.0;
        }
        if detached_process {
            flags |= DETACHED_PROCESS.0;
        }
        cmd.creation_flags(flags);
    }
    #[cfg(not(any(unix, windows)))]
    let _ = (new_process_group, create_no_window, detached_process);

    let Wiring {
        child: cin_child,
        parent: cin_parent,
        discard: mut cin_discard,
        pending: cin_pending,
    } = cin;
    let Wiring {
        child: cout_child,
        parent: cout_parent,
        discard: mut cout_discard,
        pending: cout_pending,
    } = cout;
    let Wiring {
        child: cerr_child,
        parent: cerr_parent,
        discard: mut cerr_discard,
        pending: cerr_pending,
    } = cerr;

    cmd.stdin(cin_child.into_stdio());
    cmd.stdout(cout_child.into_stdio());
    cmd.stderr(cerr_child.into_stdio());

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            #[cfg(feature = "tracing")]
            tracing::error!(command = %join_args(&command), error = %source, "Failed to spawn process");
            return Err(SubprocessError::Spawn {
                command: join_args(&command),
                source,
            });
        }
    };

    // Release the parent's copies of the child ends.
    drop(cmd);
    cin_discard.close();
    cout_discard.close();
    cerr_discard.close();

    #[cfg(feature = "tracing")]
    tracing::debug!(pid = child.id(), command = %join_args(&command), "Process spawned");

    let mut process = RunningProcess::new(child, command)
        .with_process_group(new_process_group);
    process.set_soft_kill(soft_kill);

    let cin_parent = match cin_pending {
        Pending::Feed(source) => {
            StreamPump::feed(source, cin_parent, true)?;
            PipeEndpoint::invalid()
        }
        _ => cin_parent,
    };

    let mut sinks = Vec::new();
    let cout_parent = match cout_pending {
        Pending::Sink(sink) => {
            sinks.push(StreamPump::drain_to(cout_parent, sink)?);
            PipeEndpoint::invalid()
        }
        _ => cout_parent,
    };
    let cerr_parent = match cerr_pending {
        Pending::Sink(sink) => {
            sinks.push(StreamPump::drain_to(cerr_parent, sink)?);
            PipeEndpoint::invalid()
        }
        _ => cerr_parent,
    };

    Ok(process
        .with_pipes(cin_parent, cout_parent, cerr_parent)
        .with_sinks(sinks))
}

/// Realizes cout and cerr, resolving aliases once both concrete ends exist.
///
/// An alias pointing back at its own stream means inherit. When each output
/// aliases the other, each gets the parent's corresponding stream.
fn realize_outputs(cout: Redirect, cerr: Redirect) -> Result<(Wiring, Wiring), SubprocessError> {
    let cout = match cout {
        Redirect::ToStdout => Redirect::Inherit,
        other => other,
    };
    let cerr = match cerr {
        Redirect::ToStderr => Redirect::Inherit,
        other => other,
    };

    match (cout, cerr) {
        (Redirect::ToStderr, Redirect::ToStdout) => Ok((
            Wiring::child_only(ChildEnd::File(parent_stream(StreamKind::Cerr)?)),
            Wiring::child_only(ChildEnd::File(parent_stream(StreamKind::Cout)?)),
        )),
        (Redirect::ToStderr, cerr) => {
            let cerr = realize(StreamKind::Cerr, cerr)?;
            let cout = Wiring::child_only(cerr.child.duplicate(StreamKind::Cerr)?);
            Ok((cout, cerr))
        }
        (cout, Redirect::ToStdout) => {
            let cout = realize(StreamKind::Cout, cout)?;
            let cerr = Wiring::child_only(cout.child.duplicate(StreamKind::Cout)?);
            Ok((cout, cerr))
        }
        (cout, cerr) => Ok((
            realize(StreamKind::Cout, cout)?,
            realize(StreamKind::Cerr, cerr)?,
        )),
    }
}

/// Turns one non-alias target into concrete handles.
fn realize(stream: StreamKind, target: Redirect) -> Result<Wiring, SubprocessError> {
    let is_input = stream == StreamKind::Cin;

    let wiring = match target {
        Redirect::Inherit => Wiring::child_only(ChildEnd::Inherit),
        Redirect::ToStdout | Redirect::ToStderr => {
            return Err(SubprocessError::InvalidRedirect(format!(
                "{stream} cannot be aliased here"
            )));
        }
        Redirect::Handle(endpoint) => {
            let file = endpoint.into_file().ok_or_else(|| {
                SubprocessError::InvalidRedirect(format!("{stream} was given a closed endpoint"))
            })?;
            Wiring::child_only(ChildEnd::File(file))
        }
        Redirect::Detach => Wiring::child_only(ChildEnd::File(open_null_device(is_input)?)),
        Redirect::Pipe => {
            let (child, parent) = split_pipe(is_input)?;
            Wiring {
                child,
                parent,
                discard: PipeEndpoint::invalid(),
                pending: Pending::Nothing,
            }
        }
        Redirect::Close => {
            let (child, discard) = split_pipe(is_input)?;
            Wiring {
                child,
                parent: PipeEndpoint::invalid(),
                discard,
                pending: Pending::Nothing,
            }
        }
        Redirect::Bytes(bytes) => fed(Box::new(std::io::Cursor::new(bytes)))?,
        Redirect::Reader(reader) => fed(reader)?,
        Redirect::File(file) => fed(Box::new(file))?,
        Redirect::Writer(writer) => {
            let (child, parent) = split_pipe(false)?;
            Wiring {
                child,
                parent,
                discard: PipeEndpoint::invalid(),
                pending: Pending::Sink(writer),
            }
        }
    };
    Ok(wiring)
}

fn fed(source: Box<dyn Read + Send>) -> Result<Wiring, SubprocessError> {
    let (child, parent) = split_pipe(true)?;
    Ok(Wiring {
        child,
        parent,
        discard: PipeEndpoint::invalid(),
        pending: Pending::Feed(source),
    })
}

/// Creates a pipe and splits it into the child's end and the parent's end.
///
/// For the child's stdin the child reads; for its outputs the child writes.
fn split_pipe(child_reads: bool) -> Result<(ChildEnd, PipeEndpoint), SubprocessError> {
    let (reader, writer) = PipePair::create(false)?.into_parts();
    let (child, parent) = if child_reads {
        (reader, writer)
    } else {
        (writer, reader)
    };
    let file = child.into_file().ok_or_else(|| {
        SubprocessError::Os(std::io::Error::other("pipe end closed before spawn"))
    })?;
    Ok((ChildEnd::File(file), parent))
}

fn open_null_device(read: bool) -> Result<File, SubprocessError> {
    let file = File::options()
        .read(read)
        .write(!read)
        .open(NULL_DEVICE)?;
    Ok(file)
}

/// Duplicates the parent's own stdout or stderr.
fn parent_stream(stream: StreamKind) -> Result<File, SubprocessError> {
    #[cfg(unix)]
    {
        use std::os::fd::AsFd;
        let owned = match stream {
            StreamKind::Cerr => std::io::stderr().as_fd().try_clone_to_owned()?,
            _ => std::io::stdout().as_fd().try_clone_to_owned()?,
        };
        Ok(File::from(owned))
    }
    #[cfg(windows)]
    {
        use std::os::windows::io::AsHandle;
        let owned = match stream {
            StreamKind::Cerr => std::io::stderr().as_handle().try_clone_to_owned()?,
            _ => std::io::stdout().as_handle().try_clone_to_owned()?,
        };
        Ok(File::from(owned))
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = stream;
        Err(SubprocessError::Os(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Stream duplication not supported on this platform",
        )))
    }
}
