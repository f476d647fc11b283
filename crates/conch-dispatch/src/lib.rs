//! conch-dispatch: the orchestration layer.
//!
//! - [`combination`]: reconciles report kinds, format and display into one
//!   valid output format
//! - [`policy`]: the owned, ordered policy set with saved/dirty tracking
//! - [`engine`]: capabilities expected from the local analysis engine and
//!   the daemon client
//! - [`router`]: the facade choosing local or daemon execution once at
//!   `init` and dispatching every call to the active engine

pub mod combination;
pub mod engine;
pub mod policy;
pub mod router;

pub use combination::{resolve, CombinationResult};
pub use engine::{
    AnalysisEngine, DaemonClient, FileStatus, NoDaemon, Registration, ReportEngine, XsltSource,
};
pub use policy::{Policy, PolicySet};
pub use router::{ExecutionMode, ExecutionRouter, Progress};
