//! The execution router.
//!
//! Owns the report cache, the policy set, the local engine and the daemon
//! client. The execution mode is chosen once per `init()` and every later
//! call is dispatched to the engine of that mode.

use std::path::{Path, PathBuf};

use conch_core::config::ConchConfig;
use conch_core::constants::POLICY_REPORT_SEPARATOR;
use conch_core::errors::{ConchErrorCode, ConfigError, DispatchError, EngineError};
use conch_core::types::{Display, ReportRequest, ReportRes};
use conch_storage::ReportCache;
use tracing::{debug, info, warn};

use crate::combination;
use crate::engine::{
    AnalysisEngine, DaemonClient, FileStatus, NoDaemon, Registration, ReportEngine, XsltSource,
};
use crate::policy::{Policy, PolicySet};

/// Where calls are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// `init()` has not completed yet. Calls go to the local engine.
    Unconfigured,
    Local,
    Daemon,
}

/// Aggregated analysis progress of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub done: bool,
    /// Weighted completion in `[0, 100]`.
    pub percent: f64,
}

/// Single entry point for analysis, reporting and policy validation.
pub struct ExecutionRouter<L: AnalysisEngine, D: DaemonClient = NoDaemon> {
    // Fields drop in declaration order: the daemon connection goes first.
    daemon: D,
    local: L,
    policies: PolicySet,
    cache: ReportCache,
    config: ConchConfig,
    configuration_file: Option<PathBuf>,
    mode: ExecutionMode,
    daemon_request: Option<bool>,
    daemon_connected: bool,
    options: Vec<String>,
}

impl<L: AnalysisEngine> ExecutionRouter<L, NoDaemon> {
    /// Router without daemon support.
    pub fn local_only(local: L, cache: ReportCache) -> Self {
        Self::new(local, NoDaemon, cache)
    }
}

impl<L: AnalysisEngine, D: DaemonClient> ExecutionRouter<L, D> {
    pub fn new(local: L, daemon: D, cache: ReportCache) -> Self {
        Self {
            daemon,
            local,
            policies: PolicySet::new(),
            cache,
            config: ConchConfig::default(),
            configuration_file: None,
            mode: ExecutionMode::Unconfigured,
            daemon_request: None,
            daemon_connected: false,
            options: Vec::new(),
        }
    }

    /// Load the configuration once and open the report cache its
    /// `[storage]` section describes. `init()` must still be called.
    pub fn from_config(
        local: L,
        daemon: D,
        configuration_file: Option<PathBuf>,
    ) -> Result<Self, DispatchError> {
        let config = ConchConfig::load(configuration_file.as_deref())?;
        let cache = ReportCache::from_config(&config.storage)?;
        info!(
            backend = cache.backend_name(),
            compression = cache.compression().name(),
            "report cache opened"
        );
        let mut router = Self::new(local, daemon, cache);
        router.configuration_file = configuration_file;
        router.config = config;
        Ok(router)
    }

    /// Never use the daemon, whatever the configuration says.
    pub fn without_daemon(mut self) -> Self {
        self.daemon_request = Some(false);
        self
    }

    pub fn with_configuration_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.configuration_file = Some(path.into());
        self
    }

    // ---- Lifecycle ----

    /// Load the configuration and select the execution mode.
    ///
    /// When the daemon is requested but cannot be reached the router falls
    /// back to local execution once; later calls never retry. Asking again
    /// with `set_use_daemon(true)` and calling `init()` does.
    pub fn init(&mut self) -> Result<ExecutionMode, DispatchError> {
        let config = ConchConfig::load(self.configuration_file.as_deref())?;
        let wanted = self
            .daemon_request
            .unwrap_or_else(|| config.daemon.effective_enabled());
        let (address, port) = config.daemon_address();
        self.policies
            .set_export_directory(config.policies.effective_directory());
        self.config = config;
        self.disconnect();

        self.mode = if !wanted {
            ExecutionMode::Local
        } else {
            match self.daemon.init(&address, port) {
                Ok(()) => {
                    self.daemon_connected = true;
                    ExecutionMode::Daemon
                }
                Err(e) => {
                    let unavailable = ConfigError::DaemonUnavailable {
                        address: format!("{address}:{port}"),
                        message: e.to_string(),
                    };
                    warn!(
                        code = unavailable.error_code(),
                        error = %unavailable,
                        "falling back to local execution"
                    );
                    ExecutionMode::Local
                }
            }
        };
        info!(mode = ?self.mode, "execution mode selected");
        Ok(self.mode)
    }

    /// Close the daemon connection. The recorded mode is kept.
    pub fn close(&mut self) {
        self.disconnect();
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn use_daemon(&self) -> bool {
        self.mode == ExecutionMode::Daemon
    }

    /// Request (or refuse) daemon execution. Applied at the next `init()`.
    pub fn set_use_daemon(&mut self, use_daemon: bool) {
        self.daemon_request = Some(use_daemon);
    }

    pub fn daemon_address(&self) -> (String, u16) {
        self.config.daemon_address()
    }

    /// Applied at the next `init()`.
    pub fn set_configuration_file(&mut self, path: impl Into<PathBuf>) {
        self.configuration_file = Some(path.into());
    }

    pub fn configuration_file(&self) -> Option<&Path> {
        self.configuration_file.as_deref()
    }

    pub fn config(&self) -> &ConchConfig {
        &self.config
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    pub fn local_engine(&self) -> &L {
        &self.local
    }

    pub fn daemon_client(&self) -> &D {
        &self.daemon
    }

    // ---- Options ----

    /// Pass an engine option through to the local engine.
    ///
    /// `--Name=Value` sets `Name` to `Value`, `--Name` sets it to `1`. Other
    /// shapes are only recorded. Accepted options are kept in order.
    pub fn add_option(&mut self, option: &str) -> Result<(), DispatchError> {
        if let Some(body) = option.strip_prefix("--") {
            let (name, value) = body.split_once('=').unwrap_or((body, "1"));
            if name.is_empty() {
                return Err(DispatchError::InvalidOption {
                    option: option.to_string(),
                    message: "missing option name".to_string(),
                });
            }
            self.local
                .set_option(name, value)
                .map_err(|e| DispatchError::InvalidOption {
                    option: option.to_string(),
                    message: engine_message(e),
                })?;
        }
        debug!(option, "option accepted");
        self.options.push(option.to_string());
        Ok(())
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    // ---- Analysis ----

    /// Queue every file for analysis. A failing file is logged and skipped.
    pub fn analyze(&self, files: &[String]) -> Result<(), DispatchError> {
        if files.is_empty() {
            return Err(DispatchError::EmptyFileList);
        }
        for file in files {
            if let Err(e) = self.analyze_file(file) {
                warn!(file = %file, error = %e, "analysis dispatch failed");
            }
        }
        Ok(())
    }

    pub fn analyze_file(&self, file: &str) -> Result<Registration, DispatchError> {
        if file.is_empty() {
            return Err(DispatchError::EmptyPath);
        }
        debug!(file, mode = ?self.mode, "dispatch open_file");
        Ok(self.engine().open_file(file)?)
    }

    /// Each file weighs `100 / N` percent; a pending file contributes its
    /// fraction of that share. A failing file counts as pending at zero.
    pub fn is_done(&self, files: &[String]) -> Progress {
        if files.is_empty() {
            return Progress {
                done: true,
                percent: 100.0,
            };
        }

        let share = 100.0 / files.len() as f64;
        let mut done = true;
        let mut percent = 0.0;
        for file in files {
            match self.engine().is_done(file) {
                Ok(FileStatus::Done) => percent += share,
                Ok(FileStatus::Pending { fraction }) => {
                    done = false;
                    percent += fraction.clamp(0.0, 1.0) * share;
                }
                Err(e) => {
                    done = false;
                    warn!(file = %file, error = %e, "progress query failed");
                }
            }
        }
        Progress { done, percent }
    }

    // ---- Reports ----

    /// Resolve the output format, then dispatch with the resolved format.
    pub fn get_report(&self, request: &ReportRequest) -> Result<ReportRes, DispatchError> {
        let resolved = combination::resolve(
            request.kinds,
            request.format,
            request.files.len(),
            &request.display,
        );
        if !resolved.valid {
            return Err(DispatchError::InvalidCombination {
                reason: resolved.reason.unwrap_or_default(),
            });
        }
        if request.files.is_empty() {
            return Err(DispatchError::EmptyFileList);
        }

        let mut request = request.clone();
        request.format = resolved.format;
        debug!(
            files = request.files.len(),
            format = request.format.display_name(),
            mode = ?self.mode,
            "dispatch get_report"
        );
        Ok(self.engine().get_report(&request)?)
    }

    /// Drop every cached report of the files. Always served by the local
    /// cache. Returns the number of records removed.
    pub fn remove_report(&self, files: &[String]) -> Result<usize, DispatchError> {
        if files.is_empty() {
            return Err(DispatchError::EmptyFileList);
        }
        let mut removed = 0;
        for file in files {
            removed += self.cache.remove_report(file)?;
        }
        Ok(removed)
    }

    // ---- Policy validation ----

    pub fn validate_policy(
        &self,
        file: &str,
        index: usize,
        display: &Display,
    ) -> Result<ReportRes, DispatchError> {
        let policy = self
            .policies
            .get(index)
            .ok_or(DispatchError::PolicyNotFound { index })?;

        if self.mode == ExecutionMode::Daemon {
            debug!(file, index, "dispatch validate_policy to daemon");
            Ok(self
                .daemon
                .validate_policy(file, &policy.dump_schema(), display)?)
        } else {
            debug!(file, index, "dispatch validate_policy locally");
            Ok(self.local.validate_policy(file, index, policy, display)?)
        }
    }

    /// Always served by the local engine.
    pub fn validate_policy_memory(
        &self,
        file: &str,
        policy: &str,
        display: &Display,
    ) -> Result<ReportRes, DispatchError> {
        Ok(self.local.validate_policy_memory(file, policy, display)?)
    }

    /// Validate against each policy file in order, stopping at the first
    /// error. Reports are concatenated, each followed by `"\r\n"`. The result
    /// is valid only when every policy passed.
    pub fn validate_policies(
        &self,
        file: &str,
        policies: &[String],
        display: &Display,
    ) -> Result<ReportRes, DispatchError> {
        if policies.is_empty() {
            return Err(DispatchError::EmptyPolicyList);
        }

        let mut result = ReportRes::with_verdict(String::new(), true);
        for policy in policies {
            let one = self.local.validate_policy_file(file, policy, display)?;
            result.report.push_str(&one.report);
            result.report.push_str(POLICY_REPORT_SEPARATOR);
            if one.has_valid {
                result.valid &= one.valid;
            } else {
                result.has_valid = false;
            }
        }
        if !result.has_valid {
            result.valid = false;
        }
        Ok(result)
    }

    // ---- XSLT ----

    pub fn transform_with_xslt_file(
        &self,
        report: &str,
        xslt: &Path,
    ) -> Result<String, DispatchError> {
        Ok(self
            .local
            .transform_with_xslt(report, XsltSource::File(xslt))?)
    }

    pub fn transform_with_xslt_memory(
        &self,
        report: &str,
        xslt: &str,
    ) -> Result<String, DispatchError> {
        Ok(self
            .local
            .transform_with_xslt(report, XsltSource::Memory(xslt))?)
    }

    // ---- Policy set ----

    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    pub fn policy(&self, index: usize) -> Option<&Policy> {
        self.policies.get(index)
    }

    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    pub fn add_policy(&mut self, policy: Policy) -> usize {
        self.policies.add(policy)
    }

    pub fn remove_policy(&mut self, index: usize) -> Result<Policy, DispatchError> {
        Ok(self.policies.remove(index)?)
    }

    pub fn clear_policies(&mut self) {
        self.policies.clear();
    }

    /// Returns the index of the first imported policy.
    pub fn import_policy_from_file(&mut self, path: &Path) -> Result<usize, DispatchError> {
        Ok(self.policies.import_from_file(path)?)
    }

    pub fn import_policy_from_memory(
        &mut self,
        bytes: &[u8],
        label: &str,
    ) -> Result<usize, DispatchError> {
        Ok(self.policies.import_from_memory(bytes, label)?)
    }

    pub fn policy_exists(&self, title: &str) -> bool {
        self.policies.policy_exists(title)
    }

    pub fn save_policies(&mut self) -> Result<usize, DispatchError> {
        Ok(self.policies.save_all()?)
    }

    pub fn save_policy(
        &mut self,
        index: usize,
        path: Option<&Path>,
    ) -> Result<PathBuf, DispatchError> {
        Ok(self.policies.save_one(index, path)?)
    }

    pub fn is_policies_saved(&self) -> bool {
        self.policies.is_all_saved()
    }

    pub fn is_policy_saved(&self, index: usize) -> bool {
        self.policies.is_saved(index)
    }

    // ---- Internals ----

    fn engine(&self) -> &dyn ReportEngine {
        match self.mode {
            ExecutionMode::Daemon => &self.daemon,
            ExecutionMode::Local | ExecutionMode::Unconfigured => &self.local,
        }
    }

    fn disconnect(&mut self) {
        if self.daemon_connected {
            self.daemon.close();
            self.daemon_connected = false;
            info!("daemon connection closed");
        }
    }
}

impl<L: AnalysisEngine, D: DaemonClient> Drop for ExecutionRouter<L, D> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn engine_message(error: EngineError) -> String {
    match error {
        EngineError::Rejected { message, .. } => message,
        other => other.to_string(),
    }
}
