//! Example: Feed one process's stdout into another's stdin
use tcrm_subprocess::process::{
    config::RunOptions, launcher::spawn, pipe::PipePair, redirect::Redirect, run::run_process,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (reader, writer) = PipePair::create(false)?.into_parts();

    #[cfg(unix)]
    let (producer, consumer) = (["sh", "-c", "ls -1 /"], ["sort", "-r"]);
    #[cfg(windows)]
    let (producer, consumer) = (["cmd", "/C", "dir /B C:\\"], ["sort", "/R"]);

    let mut producer = spawn(producer, RunOptions::new().cout(writer))?;
    let mut consumer = spawn(consumer, RunOptions::new().cin(reader).cout(Redirect::Pipe))?;

    producer.wait()?;
    let completed = run_process(&mut consumer, None, true)?;
    print!("{}", completed.cout_lossy());
    Ok(())
}
