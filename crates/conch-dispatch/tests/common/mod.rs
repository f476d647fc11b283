//! Shared test helpers: scripted engines and an isolated configuration.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use conch_core::errors::EngineError;
use conch_core::types::{Display, ReportRequest, ReportRes};
use conch_dispatch::{
    AnalysisEngine, DaemonClient, FileStatus, Policy, Registration, ReportEngine, XsltSource,
};
use conch_storage::ReportCache;
use tempfile::TempDir;

/// Serializes tests that touch environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Recorded calls, shared between a fake and the test inspecting it.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

/// Scripted engine usable as local engine and daemon client.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub name: &'static str,
    pub log: CallLog,
    pub progress: HashMap<String, FileStatus>,
    pub failing_files: HashSet<String>,
    pub policy_files: HashMap<String, ReportRes>,
    pub rejected_options: HashSet<String>,
    known: Mutex<HashSet<String>>,
    // Daemon side.
    pub refuse_connection: bool,
    connected: Option<(String, u16)>,
}

impl FakeEngine {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = log.clone();
        self
    }

    pub fn with_progress(mut self, file: &str, status: FileStatus) -> Self {
        self.progress.insert(file.to_string(), status);
        self
    }

    pub fn failing_on(mut self, file: &str) -> Self {
        self.failing_files.insert(file.to_string());
        self
    }

    pub fn with_policy_file(mut self, path: &str, result: ReportRes) -> Self {
        self.policy_files.insert(path.to_string(), result);
        self
    }

    pub fn rejecting_option(mut self, name: &str) -> Self {
        self.rejected_options.insert(name.to_string());
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.refuse_connection = true;
        self
    }

    fn check(&self, file: &str) -> Result<(), EngineError> {
        if self.failing_files.contains(file) {
            Err(EngineError::UnknownFile {
                file: file.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl ReportEngine for FakeEngine {
    fn open_file(&self, file: &str) -> Result<Registration, EngineError> {
        self.log.push(format!("{}:open_file:{file}", self.name));
        self.check(file)?;
        if self.known.lock().unwrap().insert(file.to_string()) {
            Ok(Registration::New)
        } else {
            Ok(Registration::Known)
        }
    }

    fn is_done(&self, file: &str) -> Result<FileStatus, EngineError> {
        self.log.push(format!("{}:is_done:{file}", self.name));
        self.check(file)?;
        Ok(self
            .progress
            .get(file)
            .copied()
            .unwrap_or(FileStatus::Done))
    }

    fn get_report(&self, request: &ReportRequest) -> Result<ReportRes, EngineError> {
        self.log.push(format!(
            "{}:get_report:{}",
            self.name,
            request.format.display_name()
        ));
        Ok(ReportRes::with_report(format!(
            "{} report for {}",
            self.name,
            request.files.join(",")
        )))
    }

    fn remove_report(&self, files: &[String]) -> Result<(), EngineError> {
        self.log
            .push(format!("{}:remove_report:{}", self.name, files.join(",")));
        Ok(())
    }

    fn validate_policy_memory(
        &self,
        file: &str,
        policy: &str,
        _display: &Display,
    ) -> Result<ReportRes, EngineError> {
        self.log
            .push(format!("{}:validate_policy_memory:{file}", self.name));
        Ok(ReportRes::with_verdict(policy.to_string(), true))
    }

    fn validate_policy_file(
        &self,
        file: &str,
        policy_path: &str,
        _display: &Display,
    ) -> Result<ReportRes, EngineError> {
        self.log.push(format!(
            "{}:validate_policy_file:{file}:{policy_path}",
            self.name
        ));
        self.policy_files
            .get(policy_path)
            .cloned()
            .ok_or_else(|| EngineError::rejected("validate_policy_file", "no such policy"))
    }
}

impl AnalysisEngine for FakeEngine {
    fn validate_policy(
        &self,
        file: &str,
        index: usize,
        policy: &Policy,
        _display: &Display,
    ) -> Result<ReportRes, EngineError> {
        self.log
            .push(format!("{}:validate_policy:{file}:{index}", self.name));
        Ok(ReportRes::with_verdict(policy.title().to_string(), true))
    }

    fn set_option(&self, name: &str, value: &str) -> Result<(), EngineError> {
        self.log
            .push(format!("{}:set_option:{name}={value}", self.name));
        if self.rejected_options.contains(name) {
            Err(EngineError::rejected("set_option", format!("Option {name} is unknown")))
        } else {
            Ok(())
        }
    }

    fn transform_with_xslt(
        &self,
        report: &str,
        xslt: XsltSource<'_>,
    ) -> Result<String, EngineError> {
        let kind = match xslt {
            XsltSource::File(_) => "file",
            XsltSource::Memory(_) => "memory",
        };
        self.log.push(format!("{}:xslt:{kind}", self.name));
        Ok(format!("<transformed>{report}</transformed>"))
    }
}

impl DaemonClient for FakeEngine {
    fn init(&mut self, address: &str, port: u16) -> Result<(), EngineError> {
        self.log.push(format!("{}:init:{address}:{port}", self.name));
        if self.refuse_connection {
            return Err(EngineError::Connection {
                message: "connection refused".to_string(),
            });
        }
        self.connected = Some((address.to_string(), port));
        Ok(())
    }

    fn close(&mut self) {
        if self.connected.take().is_some() {
            self.log.push(format!("{}:close", self.name));
        }
    }

    fn address(&self) -> Option<(String, u16)> {
        self.connected.clone()
    }

    fn validate_policy(
        &self,
        file: &str,
        policy: &str,
        _display: &Display,
    ) -> Result<ReportRes, EngineError> {
        self.log
            .push(format!("{}:validate_policy:{file}:{policy}", self.name));
        Ok(ReportRes::with_verdict(String::new(), true))
    }
}

/// Environment with no user configuration and no `CONCH_*` overrides.
/// Holds the environment lock for its lifetime.
pub struct TestEnv {
    pub home: TempDir,
    _lock: MutexGuard<'static, ()>,
}

impl TestEnv {
    pub fn new() -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        for key in [
            "CONCH_DAEMON_ENABLED",
            "CONCH_DAEMON_ADDRESS",
            "CONCH_DAEMON_PORT",
            "CONCH_STORAGE_DIRECTORY",
            "CONCH_STORAGE_COMPRESSION",
            "CONCH_POLICIES_DIRECTORY",
        ] {
            std::env::remove_var(key);
        }
        let home = TempDir::new().unwrap();
        std::env::set_var("HOME", home.path());
        Self { home, _lock: lock }
    }

    /// Write a configuration file and return its path.
    pub fn config_file(&self, toml: &str) -> PathBuf {
        let path = self.home.path().join("router.toml");
        std::fs::write(&path, toml).unwrap();
        path
    }

    /// Configuration enabling the daemon at `10.0.0.5:4242`.
    pub fn daemon_config(&self) -> PathBuf {
        self.config_file(
            r#"
[daemon]
enabled = true
address = "10.0.0.5"
port = 4242
"#,
        )
    }
}

pub fn cache() -> ReportCache {
    let cache = ReportCache::open_in_memory().unwrap();
    cache.init().unwrap();
    cache
}

pub fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
