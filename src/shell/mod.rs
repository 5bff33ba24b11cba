//! Small shell-level helpers the launcher relies on: executable lookup with a
//! process-wide cache, argument quoting, and environment/working-directory
//! accessors.

pub mod environ;
pub mod quote;
pub mod which;
