//! Capabilities the router expects from its two execution backends.
//!
//! Both backends share [`ReportEngine`]. The local engine adds option and
//! XSLT hooks; the daemon client adds connection management and takes
//! policies as serialized contents rather than indices.

use std::path::Path;

use conch_core::errors::EngineError;
use conch_core::types::{Display, ReportRequest, ReportRes};

use crate::policy::Policy;

/// Outcome of registering a file for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The file was not known and has been queued.
    New,
    /// The file was already registered.
    Known,
}

/// Analysis state of one file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileStatus {
    Done,
    /// Still running; `fraction` is in `[0, 1]`.
    Pending { fraction: f64 },
}

/// Stylesheet handed to an XSLT transform.
#[derive(Debug, Clone, Copy)]
pub enum XsltSource<'a> {
    File(&'a Path),
    Memory(&'a str),
}

/// Operations common to the local engine and the daemon client.
pub trait ReportEngine: Send + Sync {
    fn open_file(&self, file: &str) -> Result<Registration, EngineError>;

    fn is_done(&self, file: &str) -> Result<FileStatus, EngineError>;

    /// Produce a report. `request.format` is already resolved.
    fn get_report(&self, request: &ReportRequest) -> Result<ReportRes, EngineError>;

    fn remove_report(&self, files: &[String]) -> Result<(), EngineError>;

    fn validate_policy_memory(
        &self,
        file: &str,
        policy: &str,
        display: &Display,
    ) -> Result<ReportRes, EngineError>;

    fn validate_policy_file(
        &self,
        file: &str,
        policy_path: &str,
        display: &Display,
    ) -> Result<ReportRes, EngineError>;
}

/// The in-process analysis engine.
pub trait AnalysisEngine: ReportEngine {
    /// Validate against the policy at `index` of the router's policy set.
    fn validate_policy(
        &self,
        file: &str,
        index: usize,
        policy: &Policy,
        display: &Display,
    ) -> Result<ReportRes, EngineError>;

    fn set_option(&self, name: &str, value: &str) -> Result<(), EngineError>;

    fn transform_with_xslt(&self, report: &str, xslt: XsltSource<'_>)
        -> Result<String, EngineError>;
}

/// Client of a remote analysis daemon.
pub trait DaemonClient: ReportEngine {
    fn init(&mut self, address: &str, port: u16) -> Result<(), EngineError>;

    /// Tear the connection down. Idempotent.
    fn close(&mut self);

    /// Address of the open connection, if any.
    fn address(&self) -> Option<(String, u16)>;

    /// Validate against a serialized policy definition.
    fn validate_policy(
        &self,
        file: &str,
        policy: &str,
        display: &Display,
    ) -> Result<ReportRes, EngineError>;
}

/// Daemon client for builds without daemon support. `init` always fails,
/// so a router using it falls back to local execution.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDaemon;

impl NoDaemon {
    fn unavailable() -> EngineError {
        EngineError::Connection {
            message: "daemon support is not available".to_string(),
        }
    }
}

impl ReportEngine for NoDaemon {
    fn open_file(&self, _file: &str) -> Result<Registration, EngineError> {
        Err(Self::unavailable())
    }

    fn is_done(&self, _file: &str) -> Result<FileStatus, EngineError> {
        Err(Self::unavailable())
    }

    fn get_report(&self, _request: &ReportRequest) -> Result<ReportRes, EngineError> {
        Err(Self::unavailable())
    }

    fn remove_report(&self, _files: &[String]) -> Result<(), EngineError> {
        Err(Self::unavailable())
    }

    fn validate_policy_memory(
        &self,
        _file: &str,
        _policy: &str,
        _display: &Display,
    ) -> Result<ReportRes, EngineError> {
        Err(Self::unavailable())
    }

    fn validate_policy_file(
        &self,
        _file: &str,
        _policy_path: &str,
        _display: &Display,
    ) -> Result<ReportRes, EngineError> {
        Err(Self::unavailable())
    }
}

impl DaemonClient for NoDaemon {
    fn init(&mut self, _address: &str, _port: u16) -> Result<(), EngineError> {
        Err(Self::unavailable())
    }

    fn close(&mut self) {}

    fn address(&self) -> Option<(String, u16)> {
        None
    }

    fn validate_policy(
        &self,
        _file: &str,
        _policy: &str,
        _display: &Display,
    ) -> Result<ReportRes, EngineError> {
        Err(Self::unavailable())
    }
}
