//! Domain types shared by the cache and the dispatch layer.

pub mod compression;
pub mod format;
pub mod report_kind;
pub mod request;

pub use compression::Compression;
pub use format::Format;
pub use report_kind::{ReportKind, ReportKinds};
pub use request::{CacheKey, Display, ReportRequest, ReportRes};
