use std::fmt;
use std::fs::File;
use std::io::{Read, Write};

use crate::process::pipe::PipeEndpoint;

/// Which standard stream of the child a [`Redirect`] is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Cin,
    Cout,
    Cerr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Cin => f.write_str("cin"),
            StreamKind::Cout => f.write_str("cout"),
            StreamKind::Cerr => f.write_str("cerr"),
        }
    }
}

/// Where one standard stream of a child process reads from or writes to.
///
/// `Bytes`, `Reader` and `File` are in-process data sources and only valid
/// for `cin`. `Writer` is an in-process sink and only valid for `cout` and
/// `cerr`. `ToStdout`/`ToStderr` alias an output stream to the other one.
/// Any other combination is rejected at spawn time.
#[derive(Default)]
pub enum Redirect {
    /// Use the parent's own stream.
    #[default]
    Inherit,
    /// Write to whatever the child's stdout resolves to.
    ToStdout,
    /// Write to whatever the child's stderr resolves to.
    ToStderr,
    /// Hand an already-open endpoint to the child.
    ///
    /// The child receives a duplicate; the endpoint itself is released when
    /// the consumed options are dropped. Pass `endpoint.try_clone()?` to keep
    /// using it afterwards.
    Handle(PipeEndpoint),
    /// Allocate a fresh pipe whose parent end is kept on the `RunningProcess`.
    Pipe,
    /// Give the child a pipe whose other end is closed right after spawn.
    Close,
    /// Wire nothing from the parent; the child gets the null device.
    Detach,
    /// Feed these bytes to the child's stdin, then close it.
    Bytes(Vec<u8>),
    /// Feed everything read from this source to the child's stdin, then close it.
    Reader(Box<dyn Read + Send>),
    /// Feed the contents of this file to the child's stdin, then close it.
    File(File),
    /// Copy everything the child writes on this stream into the writer.
    Writer(Box<dyn Write + Send>),
}

impl Redirect {
    /// Returns `true` for the in-process sources fed through a pump.
    pub fn is_input_source(&self) -> bool {
        matches!(
            self,
            Redirect::Bytes(_) | Redirect::Reader(_) | Redirect::File(_)
        )
    }

    /// Checks that this target makes sense for `stream`.
    pub(crate) fn allowed_for(&self, stream: StreamKind) -> Result<(), String> {
        match (stream, self) {
            (StreamKind::Cin, Redirect::ToStdout | Redirect::ToStderr) => {
                Err("cin cannot be aliased to an output stream".to_string())
            }
            (StreamKind::Cin, Redirect::Writer(_)) => {
                Err("cin cannot read from an output sink".to_string())
            }
            (StreamKind::Cout | StreamKind::Cerr, r) if r.is_input_source() => Err(format!(
                "{} cannot write into an input source ({:?})",
                stream, r
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redirect::Inherit => f.write_str("Inherit"),
            Redirect::ToStdout => f.write_str("ToStdout"),
            Redirect::ToStderr => f.write_str("ToStderr"),
            Redirect::Handle(endpoint) => f.debug_tuple("Handle").field(endpoint).finish(),
            Redirect::Pipe => f.write_str("Pipe"),
            Redirect::Close => f.write_str("Close"),
            Redirect::Detach => f.write_str("Detach"),
            Redirect::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Redirect::Reader(_) => f.write_str("Reader(..)"),
            Redirect::File(file) => f.debug_tuple("File").field(file).finish(),
            Redirect::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl From<PipeEndpoint> for Redirect {
    fn from(endpoint: PipeEndpoint) -> Self {
        Redirect::Handle(endpoint)
    }
}

impl From<File> for Redirect {
    fn from(file: File) -> Self {
        Redirect::File(file)
    }
}

impl From<Vec<u8>> for Redirect {
    fn from(bytes: Vec<u8>) -> Self {
        Redirect::Bytes(bytes)
    }
}

impl From<&[u8]> for Redirect {
    fn from(bytes: &[u8]) -> Self {
        Redirect::Bytes(bytes.to_vec())
    }
}

impl From<String> for Redirect {
    fn from(text: String) -> Self {
        Redirect::Bytes(text.into_bytes())
    }
}

impl From<&str> for Redirect {
    fn from(text: &str) -> Self {
        Redirect::Bytes(text.as_bytes().to_vec())
    }
}
