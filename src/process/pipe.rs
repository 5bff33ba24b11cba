//! Cross-platform pipe primitives.
//!
//! A [`PipeEndpoint`] owns one end of an OS pipe. It is closed exactly once:
//! either explicitly through [`PipeEndpoint::close`] or when it is dropped.
//! After closing, the endpoint is invalid and every read or write on it is
//! rejected with [`std::io::ErrorKind::InvalidInput`].
//!
//! # Example
//!
//! ```rust
//! use std::io::{Read, Write};
//! use tcrm_subprocess::process::pipe::PipePair;
//!
//! let mut pair = PipePair::create(false).unwrap();
//! let mut writer = pair.take_writer();
//! writer.write_all(b"ping").unwrap();
//! writer.close();
//!
//! let mut reader = pair.take_reader();
//! assert_eq!(reader.read_all(), b"ping");
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::process::Stdio;

use crate::process::error::SubprocessError;

/// Chunk size used by every copy loop in this crate.
pub(crate) const BUFFER_SIZE: usize = 2048;

/// One end of an OS pipe, or the invalid sentinel once closed.
#[derive(Debug, Default)]
pub struct PipeEndpoint {
    file: Option<File>,
}

impl PipeEndpoint {
    /// Returns the invalid sentinel endpoint.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.file.is_some()
    }

    /// Closes the endpoint.
    ///
    /// Returns `true` if an open handle was released and `false` if the
    /// endpoint was already closed. Calling it repeatedly is harmless.
    pub fn close(&mut self) -> bool {
        self.file.take().is_some()
    }

    /// Moves the handle out, leaving this endpoint invalid.
    ///
    /// Not named `take` so it never collides with [`Read::take`].
    pub fn take_endpoint(&mut self) -> PipeEndpoint {
        PipeEndpoint {
            file: self.file.take(),
        }
    }

    /// Duplicates the underlying OS handle.
    pub fn try_clone(&self) -> io::Result<PipeEndpoint> {
        match &self.file {
            Some(file) => Ok(PipeEndpoint {
                file: Some(file.try_clone()?),
            }),
            None => Err(closed_error()),
        }
    }

    /// Marks the handle as inherited (or not) by child processes created later.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::InvalidRedirect`] for an invalid endpoint and
    /// [`SubprocessError::Os`] if the platform call fails.
    pub fn set_inheritable(&self, inheritable: bool) -> Result<(), SubprocessError> {
        let file = self.file.as_ref().ok_or_else(|| {
            SubprocessError::InvalidRedirect("set_inheritable: pipe endpoint is closed".to_string())
        })?;
        os_set_inheritable(file, inheritable)?;
        Ok(())
    }

    /// Reads until end-of-file or the first error, returning everything read.
    ///
    /// An invalid endpoint yields an empty buffer.
    pub fn read_all(&mut self) -> Vec<u8> {
        let mut result = Vec::new();
        let mut buffer = [0u8; BUFFER_SIZE];
        loop {
            match self.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => result.extend_from_slice(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        result
    }

    /// Consumes and discards everything the other end writes, on a background
    /// thread, then closes the endpoint.
    ///
    /// Used when nobody will read a child's output but the child must not
    /// stall on a full pipe.
    pub fn drain_and_close_async(self) {
        if !self.is_valid() {
            return;
        }

        let mut endpoint = self;
        let spawned = std::thread::Builder::new()
            .name("tcrm-pipe-drain".to_string())
            .spawn(move || {
                let mut buffer = [0u8; 1024];
                loop {
                    match endpoint.read(&mut buffer) {
                        Ok(0) => break,
                        Ok(_) => {}
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(_) => break,
                    }
                }
                endpoint.close();
            });

        if let Err(_e) = spawned {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "Failed to start drain thread, closing pipe instead");
        }
    }

    pub fn into_file(self) -> Option<File> {
        self.file
    }

    pub(crate) fn into_stdio(self) -> Option<Stdio> {
        self.file.map(Stdio::from)
    }
}

impl Read for PipeEndpoint {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.file {
            Some(file) => file.read(buf),
            None => Err(closed_error()),
        }
    }
}

impl Write for PipeEndpoint {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.file {
            Some(file) => file.write(buf),
            None => Err(closed_error()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Err(closed_error()),
        }
    }
}

impl From<File> for PipeEndpoint {
    fn from(file: File) -> Self {
        PipeEndpoint { file: Some(file) }
    }
}

#[cfg(unix)]
impl From<std::os::fd::OwnedFd> for PipeEndpoint {
    fn from(fd: std::os::fd::OwnedFd) -> Self {
        PipeEndpoint::from(File::from(fd))
    }
}

#[cfg(windows)]
impl From<std::os::windows::io::OwnedHandle> for PipeEndpoint {
    fn from(handle: std::os::windows::io::OwnedHandle) -> Self {
        PipeEndpoint::from(File::from(handle))
    }
}

/// A connected read/write endpoint pair.
///
/// Both ends are released when the pair is dropped; use the `take_*` methods
/// to move an end elsewhere first.
#[derive(Debug, Default)]
pub struct PipePair {
    reader: PipeEndpoint,
    writer: PipeEndpoint,
}

impl PipePair {
    /// Creates a new pipe.
    ///
    /// With `inheritable == false` neither end is inherited by child
    /// processes created later; mark an end explicitly with
    /// [`PipeEndpoint::set_inheritable`] to change that.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::Os`] if the platform call fails.
    pub fn create(inheritable: bool) -> Result<PipePair, SubprocessError> {
        let (reader, writer) = os_pipe(inheritable)?;
        Ok(PipePair {
            reader: PipeEndpoint::from(reader),
            writer: PipeEndpoint::from(writer),
        })
    }

    pub fn reader(&self) -> &PipeEndpoint {
        &self.reader
    }

    pub fn writer(&self) -> &PipeEndpoint {
        &self.writer
    }

    pub fn take_reader(&mut self) -> PipeEndpoint {
        self.reader.take_endpoint()
    }

    pub fn take_writer(&mut self) -> PipeEndpoint {
        self.writer.take_endpoint()
    }

    pub fn close_reader(&mut self) -> bool {
        self.reader.close()
    }

    pub fn close_writer(&mut self) -> bool {
        self.writer.close()
    }

    pub fn close(&mut self) {
        self.reader.close();
        self.writer.close();
    }

    /// Returns `true` while at least one end is still open.
    pub fn is_open(&self) -> bool {
        self.reader.is_valid() || self.writer.is_valid()
    }

    pub fn into_parts(mut self) -> (PipeEndpoint, PipeEndpoint) {
        (self.reader.take_endpoint(), self.writer.take_endpoint())
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "pipe endpoint is closed")
}

#[cfg(unix)]
fn os_pipe(inheritable: bool) -> io::Result<(File, File)> {
    // Close-on-exec is set at creation time where pipe2 exists.
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let (reader, writer) = nix::unistd::pipe2(nix::fcntl::OFlag::O_CLOEXEC)?;
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    let (reader, writer) = nix::unistd::pipe()?;

    let reader = File::from(reader);
    let writer = File::from(writer);
    os_set_inheritable(&reader, inheritable)?;
    os_set_inheritable(&writer, inheritable)?;
    Ok((reader, writer))
}

#[cfg(unix)]
fn os_set_inheritable(file: &File, inheritable: bool) -> io::Result<()> {
    use nix::fcntl::{FcntlArg, FdFlag, fcntl};
    use std::os::fd::AsFd;

    let fd = file.as_fd();
    let mut flags = FdFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFD)?);
    flags.set(FdFlag::FD_CLOEXEC, !inheritable);
    fcntl(fd, FcntlArg::F_SETFD(flags))?;
    Ok(())
}

#[cfg(windows)]
fn os_pipe(inheritable: bool) -> io::Result<(File, File)> {
    use std::os::windows::io::{FromRawHandle, OwnedHandle};
    use windows::Win32::Foundation::HANDLE;
    use windows::Win32::Security::SECURITY_ATTRIBUTES;
    use windows::Win32::System::Pipes::CreatePipe;

    let attributes = SECURITY_ATTRIBUTES {
        nLength: std::mem::size_of::<SECURITY_ATTRIBUTES>() as u32,
        lpSecurityDescriptor: std::ptr::null_mut(),
        bInheritHandle: inheritable.into(),
    };
    let mut reader = HANDLE::default();
    let mut writer = HANDLE::default();

    unsafe {
        CreatePipe(
            &mut reader,
            &mut writer,
            Some(&attributes as *const SECURITY_ATTRIBUTES),
            0,
        )
    }
    .map_err(|e| io::Error::other(format!("CreatePipe failed: {}", e)))?;

    // SAFETY: CreatePipe succeeded, so both handles are open and owned by us.
    let reader = unsafe { OwnedHandle::from_raw_handle(reader.0) };
    let writer = unsafe { OwnedHandle::from_raw_handle(writer.0) };
    Ok((File::from(reader), File::from(writer)))
}

#[cfg(windows)]
fn os_set_inheritable(file: &File, inheritable: bool) -> io::Result<()> {
    use std::os::windows::io::AsRawHandle;
    use windows::Win32::Foundation::{
        HANDLE, HANDLE_FLAG_INHERIT, HANDLE_FLAGS, SetHandleInformation,
    };

    let flags = if inheritable {
        HANDLE_FLAG_INHERIT
    } else {
        HANDLE_FLAGS(0)
    };
    unsafe { SetHandleInformation(HANDLE(file.as_raw_handle()), HANDLE_FLAG_INHERIT.0, flags) }
        .map_err(|e| io::Error::other(format!("SetHandleInformation failed: {}", e)))
}

#[cfg(not(any(unix, windows)))]
fn os_pipe(_inheritable: bool) -> io::Result<(File, File)> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Pipes not supported on this platform",
    ))
}

#[cfg(not(any(unix, windows)))]
fn os_set_inheritable(_file: &File, _inheritable: bool) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Handle inheritance not supported on this platform",
    ))
}
