//! conch-core: shared vocabulary for the conch report cache and dispatch layer.
//!
//! - Types: report kinds, output formats, compression tags, requests and results
//! - Errors: one `thiserror` enum per subsystem with stable error codes
//! - Config: TOML configuration with layered resolution
//! - Tracing: `tracing-subscriber` setup driven by `CONCH_LOG`

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::ConchConfig;
pub use types::{
    CacheKey, Compression, Display, Format, ReportKind, ReportKinds, ReportRequest, ReportRes,
};
