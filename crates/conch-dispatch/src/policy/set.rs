//! The ordered, owned set of policies.

use std::fs;
use std::path::{Path, PathBuf};

use conch_core::errors::PolicyError;
use tracing::{debug, info};

use super::{xml, Policy};

#[derive(Debug, Clone)]
struct Entry {
    policy: Policy,
    saved: bool,
}

/// Ordered list of policies with per-entry saved tracking.
///
/// Indices are positional: removing an entry shifts the later ones down.
/// Anything added, imported or edited is unsaved until exported.
#[derive(Debug, Default)]
pub struct PolicySet {
    entries: Vec<Entry>,
    export_directory: Option<PathBuf>,
}

impl PolicySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory receiving exports of policies with no source path.
    pub fn with_export_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_directory = Some(dir.into());
        self
    }

    pub fn set_export_directory(&mut self, dir: Option<PathBuf>) {
        self.export_directory = dir;
    }

    pub fn export_directory(&self) -> Option<&Path> {
        self.export_directory.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Policy> {
        self.entries.get(index).map(|e| &e.policy)
    }

    /// Mutable access; the entry becomes unsaved.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Policy> {
        self.entries.get_mut(index).map(|e| {
            e.saved = false;
            &mut e.policy
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Policy> {
        self.entries.iter().map(|e| &e.policy)
    }

    /// Append a policy and return its index.
    pub fn add(&mut self, policy: Policy) -> usize {
        self.entries.push(Entry {
            policy,
            saved: false,
        });
        self.entries.len() - 1
    }

    /// Remove and return the policy at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Policy, PolicyError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index).policy)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Import every policy of a definition file. Returns the index of the
    /// first imported policy. Nothing is added on failure.
    pub fn import_from_file(&mut self, path: &Path) -> Result<usize, PolicyError> {
        let xml = fs::read_to_string(path).map_err(|e| PolicyError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut policies = xml::parse_policies(&xml, &path.display().to_string())?;
        // A file holding several policies cannot be the export target of each.
        if let [single] = policies.as_mut_slice() {
            single.set_source(Some(path.to_path_buf()));
        }
        info!(path = %path.display(), count = policies.len(), "imported policies");
        Ok(self.append(policies))
    }

    /// Import every policy of an in-memory definition. `label` names the
    /// source in errors and is the fallback title.
    pub fn import_from_memory(&mut self, bytes: &[u8], label: &str) -> Result<usize, PolicyError> {
        let xml = std::str::from_utf8(bytes).map_err(|e| PolicyError::Import {
            message: format!("{label}: {e}"),
        })?;
        let policies = xml::parse_policies(xml, label)?;
        debug!(label, count = policies.len(), "imported policies from memory");
        Ok(self.append(policies))
    }

    /// Export every unsaved entry. Returns how many were written.
    pub fn save_all(&mut self) -> Result<usize, PolicyError> {
        let pending: Vec<usize> = (0..self.entries.len())
            .filter(|&i| !self.entries[i].saved)
            .collect();
        for &index in &pending {
            self.export(index, None)?;
        }
        Ok(pending.len())
    }

    /// Export one entry whatever its saved state. Returns the written path.
    pub fn save_one(&mut self, index: usize, path: Option<&Path>) -> Result<PathBuf, PolicyError> {
        self.check_index(index)?;
        self.export(index, path)
    }

    pub fn is_all_saved(&self) -> bool {
        self.entries.iter().all(|e| e.saved)
    }

    /// False for an out-of-range index.
    pub fn is_saved(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.saved)
    }

    pub fn policy_exists(&self, title: &str) -> bool {
        self.entries.iter().any(|e| e.policy.title() == title)
    }

    fn append(&mut self, policies: Vec<Policy>) -> usize {
        let first = self.entries.len();
        self.entries.extend(policies.into_iter().map(|policy| Entry {
            policy,
            saved: false,
        }));
        first
    }

    fn check_index(&self, index: usize) -> Result<(), PolicyError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(PolicyError::IndexOutOfRange {
                index,
                size: self.entries.len(),
            })
        }
    }

    /// Explicit path, else the source path, else a file in the export
    /// directory named after the title. Generated names get a `-2`, `-3`, ...
    /// suffix while another entry already owns that path.
    fn export_target(&self, index: usize, path: Option<&Path>) -> Result<PathBuf, PolicyError> {
        let policy = &self.entries[index].policy;
        if let Some(p) = path.or(policy.source()) {
            return Ok(p.to_path_buf());
        }
        let Some(dir) = &self.export_directory else {
            return Err(PolicyError::Export {
                title: policy.title().to_string(),
                message: "no destination path and no policies directory".to_string(),
            });
        };

        let taken = |candidate: &Path| {
            self.entries
                .iter()
                .enumerate()
                .any(|(i, e)| i != index && e.policy.source() == Some(candidate))
        };
        let stem = policy.export_stem();
        let mut candidate = dir.join(format!("{stem}.xml"));
        let mut n = 2;
        while taken(&candidate) {
            candidate = dir.join(format!("{stem}-{n}.xml"));
            n += 1;
        }
        Ok(candidate)
    }

    fn export(&mut self, index: usize, path: Option<&Path>) -> Result<PathBuf, PolicyError> {
        let target = self.export_target(index, path)?;
        let io_error = |e: std::io::Error| PolicyError::Io {
            path: target.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let entry = &mut self.entries[index];
        fs::write(&target, entry.policy.export_document()).map_err(io_error)?;
        entry.policy.set_source(Some(target.clone()));
        entry.saved = true;
        debug!(title = entry.policy.title(), path = %target.display(), "exported policy");
        Ok(target)
    }
}
