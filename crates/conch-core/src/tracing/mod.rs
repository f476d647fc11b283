//! Observability for conch.
//! `tracing` with an `EnvFilter` read from `CONCH_LOG`.

pub mod setup;

pub use setup::init_tracing;
