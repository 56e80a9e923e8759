//! Observability subsystem.
//!
//! Every deployment step emits a `tracing` event with the contract name,
//! address and transaction hash as structured fields.

pub mod logging;

pub use logging::init_logging;
