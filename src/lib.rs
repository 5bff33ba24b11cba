//! # tcrm-subprocess
//!
//! A Rust library for launching child processes, wiring their standard
//! streams, and controlling their lifecycle.
//!
//! ## Features
//!
//! - **Stream Redirection**: Inherit, pipe, alias stdout/stderr, close, detach,
//!   or feed stdin from bytes, readers and files
//! - **Deadlock-free Capture**: One background pump per stream, so a chatty
//!   child never stalls on a full pipe
//! - **Lifecycle Control**: Poll, wait, wait with timeout, signal, terminate, kill
//! - **Timeouts with Partial Output**: A timed-out run is terminated, reaped, and
//!   reports what it printed so far
//! - **Process Groups**: Signal a child and everything it started
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tcrm_subprocess::process::{config::RunOptions, redirect::Redirect, run::run};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let completed = run(
//!         ["echo", "Hello, World!"],
//!         RunOptions::new().cout(Redirect::Pipe),
//!     )?;
//!
//!     assert!(completed.success());
//!     println!("{}", completed.cout_lossy());
//!     Ok(())
//! }
//! ```
//!
//! ## Advanced Usage
//!
//! ### Timeout with Partial Output
//!
//! ```rust,no_run
//! use tcrm_subprocess::process::{config::RunBuilder, error::SubprocessError, redirect::Redirect};
//!
//! let result = RunBuilder::new(["sh", "-c", "echo started; sleep 10"])
//!     .cout(Redirect::Pipe)
//!     .new_process_group(true)
//!     .timeout_ms(1000)
//!     .run();
//!
//! match result {
//!     Err(SubprocessError::TimeoutExpired { cout, .. }) => {
//!         assert_eq!(cout, b"started\n");
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! ### Pipeline Between Two Processes
//!
//! ```rust,no_run
//! use tcrm_subprocess::process::{
//!     config::RunOptions, launcher::spawn, pipe::PipePair, redirect::Redirect, run::run_process,
//! };
//!
//! let (reader, writer) = PipePair::create(false).unwrap().into_parts();
//!
//! let mut producer = spawn(["echo", "through the pipe"], RunOptions::new().cout(writer)).unwrap();
//! let mut consumer = spawn(
//!     ["cat"],
//!     RunOptions::new().cin(reader).cout(Redirect::Pipe),
//! )
//! .unwrap();
//!
//! producer.wait().unwrap();
//! let completed = run_process(&mut consumer, None, false).unwrap();
//! assert_eq!(completed.cout, b"through the pipe\n");
//! ```
//!
//! ### Driving a Process by Hand
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tcrm_subprocess::process::config::RunBuilder;
//!
//! let mut process = RunBuilder::new(["sleep", "10"]).spawn().unwrap();
//! if process.wait_timeout(Duration::from_millis(200)).is_err() {
//!     process.terminate();
//! }
//! let code = process.wait().unwrap();
//! assert!(code != 0);
//! ```
//!
//! ## Validation
//!
//! Launch parameters are validated before any OS resource is allocated:
//! - Empty commands and names with surrounding whitespace
//! - Null bytes in the command line, working directory and environment
//! - Missing working directories
//!
//! ## Optional Features
//!
//! - `serde`: Enable serialization support for result and signal types
//! - `tokio`: Enable the async facade in [`async_tokio`]
//! - `tracing`: Enable structured logging integration

#[cfg(feature = "tokio")]
pub mod async_tokio;
mod helper;
pub mod process;
pub mod shell;
