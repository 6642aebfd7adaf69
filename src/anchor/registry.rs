// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// Evidence registry — the append-only local mapping from evidence hash to
// anchor record.
//
// Process-wide shared state. Concurrent scans may race on the same hash;
// last write wins, which is safe because any record written for a hash is
// a valid record for that hash. The registry owns the backing file; the
// verification path only reads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use super::AnchorRecord;

pub struct EvidenceRegistry {
    path: Option<PathBuf>,
    entries: DashMap<String, AnchorRecord>,
}

impl EvidenceRegistry {
    /// Registry with no backing file. Used in tests and when persistence
    /// is not wanted.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: DashMap::new(),
        }
    }

    /// Open (or create) a registry backed by a JSON file. A missing file
    /// starts empty; a corrupt file is logged and abandoned rather than
    /// blocking startup.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, AnchorRecord>>(&raw) {
                Ok(saved) => {
                    for (hash, record) in saved {
                        entries.insert(hash, record);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "evidence registry file is corrupt, starting empty");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read evidence registry, starting empty");
            }
        }

        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn get(&self, evidence_hash: &str) -> Option<AnchorRecord> {
        self.entries.get(evidence_hash).map(|r| r.clone())
    }

    /// Insert (or overwrite) the record for a hash and persist.
    pub fn record(&self, evidence_hash: &str, record: AnchorRecord) {
        self.entries.insert(evidence_hash.to_string(), record);
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best-effort write-back. Persistence failures degrade durability,
    /// not correctness, so they log and continue.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let snapshot: BTreeMap<String, AnchorRecord> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!(path = %path.display(), error = %e, "could not create registry directory");
                    return;
                }
            }
        }

        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    tracing::warn!(path = %path.display(), error = %e, "could not persist evidence registry");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize evidence registry");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
