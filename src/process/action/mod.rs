#[cfg(unix)]
pub(crate) mod deliver;
pub mod interrupt;
pub mod kill;
pub mod terminate;
