#[cfg(feature = "tokio")]
pub(crate) mod tracing;
