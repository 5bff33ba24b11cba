use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::process::{
    config::RunBuilder,
    error::SubprocessError,
    pipe::PipeEndpoint,
    redirect::Redirect,
};

use super::helper::{echo, line, shell};

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn cerr_to_cout_merges_into_the_stdout_pipe() {
    let completed = RunBuilder::new(shell("echo err 1>&2"))
        .cout(Redirect::Pipe)
        .cerr(Redirect::ToStdout)
        .run()
        .unwrap();

    assert!(completed.cout_lossy().starts_with("err"));
    assert!(completed.cerr.is_empty());
}

#[test]
fn cerr_to_cout_does_not_redirect_cout() {
    // cout keeps going to its own pipe; only cerr follows it.
    let completed = RunBuilder::new(shell("echo out"))
        .cout(Redirect::Pipe)
        .cerr(Redirect::ToStdout)
        .run()
        .unwrap();

    assert_eq!(completed.cout, line("out"));
    assert!(completed.cerr.is_empty());
}

#[test]
fn cout_to_cerr_merges_into_the_stderr_pipe() {
    let completed = RunBuilder::new(echo("to stderr"))
        .cout(Redirect::ToStderr)
        .cerr(Redirect::Pipe)
        .run()
        .unwrap();

    assert!(completed.cout.is_empty());
    assert_eq!(completed.cerr, line("to stderr"));
}

#[test]
fn self_alias_means_inherit() {
    let completed = RunBuilder::new(echo("inherited"))
        .cout(Redirect::ToStdout)
        .cerr(Redirect::ToStderr)
        .run()
        .unwrap();
    assert_eq!(completed.returncode, 0);
}

#[test]
fn writer_sink_receives_output() {
    let sink = SharedSink::default();
    let completed = RunBuilder::new(echo("into writer"))
        .cout(Redirect::Writer(Box::new(sink.clone())))
        .run()
        .unwrap();

    assert!(completed.cout.is_empty());
    assert_eq!(*sink.0.lock().unwrap(), line("into writer"));
}

#[test]
fn spawn_with_writer_exposes_no_raw_handle() {
    let sink = SharedSink::default();
    let mut process = RunBuilder::new(echo("sink"))
        .cout(Redirect::Writer(Box::new(sink)))
        .spawn()
        .unwrap();
    assert!(!process.cout().is_valid());
    assert_eq!(process.wait().unwrap(), 0);
}

#[test]
fn handle_redirect_writes_into_a_file() {
    let path = std::env::temp_dir().join(format!("tcrm-handle-{}", std::process::id()));
    let file = std::fs::File::create(&path).unwrap();

    let completed = RunBuilder::new(echo("into file"))
        .cout(PipeEndpoint::from(file))
        .run()
        .unwrap();
    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(completed.returncode, 0);
    assert!(completed.cout.is_empty());
    assert_eq!(written, line("into file"));
}

#[test]
fn closed_handle_is_rejected() {
    match RunBuilder::new(echo("x")).cout(PipeEndpoint::invalid()).run() {
        Err(SubprocessError::InvalidRedirect(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn input_source_for_output_is_rejected() {
    match RunBuilder::new(echo("x")).cout("bytes").run() {
        Err(SubprocessError::InvalidRedirect(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn alias_for_input_is_rejected() {
    match RunBuilder::new(echo("x")).cin(Redirect::ToStdout).run() {
        Err(SubprocessError::InvalidRedirect(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn closed_cin_reads_end_of_file() {
    let completed = RunBuilder::new(["cat"])
        .cin(Redirect::Close)
        .cout(Redirect::Pipe)
        .run()
        .unwrap();
    assert_eq!(completed.returncode, 0);
    assert!(completed.cout.is_empty());
}

#[cfg(unix)]
#[test]
fn detached_cin_reads_nothing() {
    let completed = RunBuilder::new(["cat"])
        .cin(Redirect::Detach)
        .cout(Redirect::Pipe)
        .run()
        .unwrap();
    assert_eq!(completed.returncode, 0);
    assert!(completed.cout.is_empty());
}

#[cfg(unix)]
#[test]
fn closed_cout_breaks_the_writer() {
    // The child's stdout has no reader; writing fails instead of hanging.
    let completed = RunBuilder::new(["sh", "-c", "trap '' PIPE; while echo lost; do :; done; exit 7"])
        .cout(Redirect::Close)
        .run()
        .unwrap();
    assert_eq!(completed.returncode, 7);
}
