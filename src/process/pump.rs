//! Background byte pumps between pipe endpoints and in-process sources/sinks.
//!
//! Each pump runs on its own OS thread and owns the endpoint it was given.
//! Completion is observed through a [`PumpHandle`]; the thread itself is never
//! joined, so a pump blocked on a pipe held open by a grandchild cannot stall
//! its caller past a deadline.
//!
//! Read and write failures inside a pump are swallowed: the visible effect is
//! truncated output, never an error in the waiting thread.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::process::pipe::{BUFFER_SIZE, PipeEndpoint};

/// Completion signal of one pump.
///
/// The pump's result is delivered once. A pump thread that panicked counts as
/// finished with no result.
#[derive(Debug)]
pub struct PumpHandle<T> {
    receiver: Receiver<T>,
    result: Option<T>,
    finished: bool,
}

impl<T> PumpHandle<T> {
    fn new(receiver: Receiver<T>) -> Self {
        PumpHandle {
            receiver,
            result: None,
            finished: false,
        }
    }

    /// Returns `true` once the pump has stopped. Never blocks.
    pub fn is_finished(&mut self) -> bool {
        if !self.finished {
            match self.receiver.try_recv() {
                Ok(value) => self.complete(Some(value)),
                Err(TryRecvError::Disconnected) => self.complete(None),
                Err(TryRecvError::Empty) => {}
            }
        }
        self.finished
    }

    /// Blocks until the pump stops.
    pub fn wait(&mut self) {
        if !self.finished {
            let value = self.receiver.recv().ok();
            self.complete(value);
        }
    }

    /// Blocks until the pump stops or `deadline` passes.
    ///
    /// Returns `true` if the pump finished in time.
    pub fn wait_until(&mut self, deadline: Instant) -> bool {
        if self.finished {
            return true;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        match self.receiver.recv_timeout(remaining) {
            Ok(value) => self.complete(Some(value)),
            Err(RecvTimeoutError::Disconnected) => self.complete(None),
            Err(RecvTimeoutError::Timeout) => {}
        }
        self.finished
    }

    /// The pump's result, once finished.
    pub fn into_result(mut self) -> Option<T> {
        self.is_finished();
        self.result
    }

    fn complete(&mut self, value: Option<T>) {
        self.result = value;
        self.finished = true;
    }
}

/// Bytes accumulated by a capture pump, readable while the pump still runs.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// A copy of everything captured so far.
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Moves the captured bytes out, leaving the buffer empty.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.bytes.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn append(&self, chunk: &[u8]) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(chunk);
    }
}

/// A running capture: the shared buffer plus the pump's completion signal.
#[derive(Debug)]
pub struct Capture {
    pub buffer: CaptureBuffer,
    pub handle: PumpHandle<()>,
}

/// Starts the single-direction copy loops.
pub struct StreamPump;

impl StreamPump {
    /// Reads `pipe` to end-of-file into a shared buffer, then closes it.
    ///
    /// # Errors
    ///
    /// Fails only if the pump thread cannot be started.
    pub fn capture(pipe: PipeEndpoint) -> io::Result<Capture> {
        let buffer = CaptureBuffer::default();
        let sink = buffer.clone();
        let handle = Self::start("tcrm-pump-capture", move || {
            let mut pipe = pipe;
            copy_chunks(&mut pipe, |chunk| {
                sink.append(chunk);
                Ok(())
            });
            pipe.close();
        })?;
        Ok(Capture { buffer, handle })
    }

    /// Copies everything read from `pipe` into `sink`, chunk by chunk, then
    /// closes the pipe and flushes the sink.
    ///
    /// # Errors
    ///
    /// Fails only if the pump thread cannot be started.
    pub fn drain_to(
        pipe: PipeEndpoint,
        sink: Box<dyn Write + Send>,
    ) -> io::Result<PumpHandle<()>> {
        Self::start("tcrm-pump-sink", move || {
            let mut pipe = pipe;
            let mut sink = sink;
            copy_chunks(&mut pipe, |chunk| sink.write_all(chunk));
            pipe.close();
            let _ = sink.flush();
        })
    }

    /// Writes everything read from `source` into `pipe`.
    ///
    /// With `auto_close` the pipe is closed once the source is exhausted or a
    /// write fails, so the reader on the other side sees end-of-file; the
    /// handle then yields `None`. Without it the still-open pipe is handed
    /// back through the handle.
    ///
    /// # Errors
    ///
    /// Fails only if the pump thread cannot be started.
    pub fn feed(
        source: Box<dyn Read + Send>,
        pipe: PipeEndpoint,
        auto_close: bool,
    ) -> io::Result<PumpHandle<Option<PipeEndpoint>>> {
        Self::start("tcrm-pump-feed", move || {
            let mut source = source;
            let mut pipe = pipe;
            copy_chunks(&mut source, |chunk| pipe.write_all(chunk));
            if auto_close {
                pipe.close();
                None
            } else {
                Some(pipe)
            }
        })
    }

    fn start<T, F>(name: &str, work: F) -> io::Result<PumpHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                #[cfg(feature = "tracing")]
                tracing::trace!(pump = std::thread::current().name(), "Pump started");

                let result = work();
                // The receiver may be gone if nobody waits for this pump.
                let _ = sender.send(result);

                #[cfg(feature = "tracing")]
                tracing::trace!(pump = std::thread::current().name(), "Pump finished");
            })?;
        Ok(PumpHandle::new(receiver))
    }
}

/// Reads fixed-size chunks from `source` and hands each to `write` until
/// end-of-file, a read error, or a write error.
fn copy_chunks<R, W>(source: &mut R, mut write: W)
where
    R: Read + ?Sized,
    W: FnMut(&[u8]) -> io::Result<()>,
{
    let mut buffer = [0u8; BUFFER_SIZE];
    loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(error = %_e, "Pump read failed, stopping");
                break;
            }
        };
        if let Err(_e) = write(&buffer[..n]) {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %_e, "Pump write failed, stopping");
            break;
        }
    }
}
