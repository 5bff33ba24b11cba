//! Example: Print tracing messages while running a command
use tcrm_subprocess::process::{config::RunBuilder, redirect::Redirect};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    #[cfg(windows)]
    let builder = RunBuilder::new(["cmd.exe", "/C", "echo Hello!"]);
    #[cfg(unix)]
    let builder = RunBuilder::new(["sh", "-c", "echo Hello!"]);

    let completed = builder
        .cout(Redirect::Pipe)
        .cerr(Redirect::Pipe)
        .timeout_ms(5000)
        .run()?;

    print!("Output: {}", completed.cout_lossy());
    println!("Exit code: {}", completed.returncode);
    Ok(())
}
