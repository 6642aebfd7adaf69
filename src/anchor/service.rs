// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// Anchoring service — the anchor/verify state machine.
//
// States: DISABLED (no backend configured, terminal for the process
// lifetime), CONNECTED (backend injected). A CONNECTED service degrades
// to a simulated record per call when a live attempt fails; that is not
// a durable state transition. `anchor` never returns an error to the
// caller — every path produces a record.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::fusion::Category;

use super::registry::EvidenceRegistry;
use super::{AnchorMode, AnchorRecord, LedgerClient, LedgerError};

/// Hard ceiling on any single ledger call.
pub const DEFAULT_LEDGER_TIMEOUT_MS: u64 = 8_000;

/// Domain tag mixed into deterministic local-registry references.
const LOCAL_REFERENCE_TAG: &str = "local-registry";

/// Operator-facing anchoring policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorPolicy {
    /// Anchor on the backend when configured, with local fallback.
    Auto,
    /// Anchoring explicitly switched off; records are marked OFFLINE.
    Off,
}

/// Result of a verification query. `NotFound` is a normal outcome, not an
/// error; `backend_checked` distinguishes "the ledger was consulted and
/// has no entry" from "the backend is disabled or unreachable".
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    Anchored(AnchorRecord),
    NotFound {
        backend_checked: bool,
        detail: String,
    },
}

pub struct AnchoringService {
    ledger: Option<Arc<dyn LedgerClient>>,
    registry: Arc<EvidenceRegistry>,
    policy: AnchorPolicy,
    timeout: Duration,
}

impl AnchoringService {
    pub fn new(
        ledger: Option<Arc<dyn LedgerClient>>,
        registry: Arc<EvidenceRegistry>,
        policy: AnchorPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            registry,
            policy,
            timeout,
        }
    }

    /// Service with no backend: every anchor lands in the local registry.
    pub fn disabled(registry: Arc<EvidenceRegistry>) -> Self {
        Self::new(
            None,
            registry,
            AnchorPolicy::Auto,
            Duration::from_millis(DEFAULT_LEDGER_TIMEOUT_MS),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.ledger.is_some() && self.policy == AnchorPolicy::Auto
    }

    /// The network label used on records.
    fn network(&self) -> String {
        self.ledger
            .as_ref()
            .map(|l| l.network().to_string())
            .unwrap_or_else(|| "local".to_string())
    }

    // -----------------------------------------------------------------
    // anchor
    // -----------------------------------------------------------------

    /// Durably record a fingerprint. Infallible by design: every failure
    /// mode degrades to a locally stored record.
    pub async fn anchor(&self, evidence_hash: &str, category: Category) -> AnchorRecord {
        if self.policy == AnchorPolicy::Off {
            let record = self.offline_record(evidence_hash, category);
            self.registry.record(evidence_hash, record.clone());
            return record;
        }

        let Some(ledger) = self.ledger.clone() else {
            let record = self.local_registry_record(evidence_hash, category);
            self.registry.record(evidence_hash, record.clone());
            tracing::debug!(evidence_hash, "anchoring backend disabled, recorded locally");
            return record;
        };

        // Capacity gate: an underfunded operator skips the submission
        // entirely rather than burning a doomed attempt.
        if let Err(e) = self.bounded(ledger.capacity()).await {
            tracing::warn!(evidence_hash, error = %e, "ledger capacity check failed, simulating anchor");
            let record = self.simulated_record(evidence_hash, category, &e);
            self.registry.record(evidence_hash, record.clone());
            return record;
        }

        match self.bounded(ledger.submit(evidence_hash, category.as_str())).await {
            Ok(receipt) => {
                let record = AnchorRecord {
                    mode: AnchorMode::OnChain,
                    explorer_url: ledger.explorer_url(&receipt.reference),
                    reference: receipt.reference,
                    network: ledger.network().to_string(),
                    category: category.as_str().to_string(),
                    timestamp: receipt
                        .consensus_timestamp
                        .unwrap_or_else(|| chrono::Utc::now().timestamp()),
                    note: None,
                };
                self.registry.record(evidence_hash, record.clone());
                tracing::info!(evidence_hash, reference = %record.reference, "evidence anchored on chain");
                record
            }
            Err(e) => {
                tracing::warn!(evidence_hash, error = %e, "ledger submission failed, simulating anchor");
                let record = self.simulated_record(evidence_hash, category, &e);
                self.registry.record(evidence_hash, record.clone());
                record
            }
        }
    }

    // -----------------------------------------------------------------
    // verify
    // -----------------------------------------------------------------

    /// Report whether and how a fingerprint was anchored. The local
    /// registry is authoritative for simulated/local records and caches
    /// on-chain anchors made by this process; the live backend is only
    /// consulted on a local miss.
    pub async fn verify(&self, evidence_hash: &str) -> VerifyOutcome {
        if let Some(record) = self.registry.get(evidence_hash) {
            return VerifyOutcome::Anchored(record);
        }

        let Some(ledger) = self.ledger.clone() else {
            return VerifyOutcome::NotFound {
                backend_checked: false,
                detail: "anchoring backend disabled and hash absent from local registry"
                    .to_string(),
            };
        };

        match self.bounded(ledger.lookup(evidence_hash)).await {
            Ok(Some(entry)) => VerifyOutcome::Anchored(AnchorRecord {
                mode: AnchorMode::OnChain,
                explorer_url: ledger.explorer_url(&entry.reference),
                reference: entry.reference,
                network: ledger.network().to_string(),
                category: entry.category.unwrap_or_else(|| "UNKNOWN".to_string()),
                timestamp: entry
                    .timestamp
                    .unwrap_or_else(|| chrono::Utc::now().timestamp()),
                note: None,
            }),
            Ok(None) => VerifyOutcome::NotFound {
                backend_checked: true,
                detail: "fingerprint was never anchored on this network".to_string(),
            },
            Err(e) => VerifyOutcome::NotFound {
                backend_checked: false,
                detail: format!("ledger lookup failed: {e}"),
            },
        }
    }

    // -----------------------------------------------------------------
    // Record constructors
    // -----------------------------------------------------------------

    fn local_registry_record(&self, evidence_hash: &str, category: Category) -> AnchorRecord {
        AnchorRecord {
            mode: AnchorMode::LocalRegistry,
            reference: local_reference(evidence_hash),
            network: self.network(),
            explorer_url: None,
            category: category.as_str().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            note: Some("anchoring backend unconfigured".to_string()),
        }
    }

    fn simulated_record(
        &self,
        _evidence_hash: &str,
        category: Category,
        cause: &LedgerError,
    ) -> AnchorRecord {
        AnchorRecord {
            mode: AnchorMode::Simulated,
            reference: hex::encode(rand::random::<[u8; 32]>()),
            network: self.network(),
            explorer_url: None,
            category: category.as_str().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            note: Some(format!("live submission failed: {cause}")),
        }
    }

    fn offline_record(&self, evidence_hash: &str, category: Category) -> AnchorRecord {
        AnchorRecord {
            mode: AnchorMode::Offline,
            reference: local_reference(evidence_hash),
            network: self.network(),
            explorer_url: None,
            category: category.as_str().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            note: Some("anchoring switched off by operator".to_string()),
        }
    }

    /// Apply the hard per-call timeout to a ledger future.
    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, LedgerError>>,
    ) -> Result<T, LedgerError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

/// Deterministic pseudo-reference for local-registry records: the same
/// fingerprint always maps to the same reference.
pub fn local_reference(evidence_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(LOCAL_REFERENCE_TAG.as_bytes());
    hasher.update(b":");
    hasher.update(evidence_hash.as_bytes());
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{LedgerEntry, LedgerReceipt};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted ledger backend for the state machine tests.
    struct ScriptedLedger {
        capacity: Result<(), &'static str>,
        submit: Result<&'static str, &'static str>,
        lookup: Option<LedgerEntry>,
        lookup_fails: bool,
        submits: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedLedger {
        fn healthy() -> Self {
            Self {
                capacity: Ok(()),
                submit: Ok("0xfeedface"),
                lookup: None,
                lookup_fails: false,
                submits: AtomicUsize::new(0),
                delay: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl LedgerClient for ScriptedLedger {
        fn network(&self) -> &str {
            "testnet"
        }

        async fn capacity(&self) -> Result<(), LedgerError> {
            self.capacity
                .map_err(|e| LedgerError::InsufficientFunds(e.to_string()))
        }

        async fn submit(
            &self,
            _evidence_hash: &str,
            _category: &str,
        ) -> Result<LedgerReceipt, LedgerError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.submit {
                Ok(reference) => Ok(LedgerReceipt {
                    reference: reference.to_string(),
                    consensus_timestamp: Some(1_700_000_000),
                }),
                Err(e) => Err(LedgerError::Rejected(e.to_string())),
            }
        }

        async fn lookup(&self, _evidence_hash: &str) -> Result<Option<LedgerEntry>, LedgerError> {
            if self.lookup_fails {
                return Err(LedgerError::Transport("connection refused".to_string()));
            }
            Ok(self.lookup.clone())
        }

        fn explorer_url(&self, reference: &str) -> Option<String> {
            Some(format!("https://explorer.test/tx/{reference}"))
        }
    }

    fn service_with(ledger: ScriptedLedger) -> AnchoringService {
        AnchoringService::new(
            Some(Arc::new(ledger)),
            Arc::new(EvidenceRegistry::in_memory()),
            AnchorPolicy::Auto,
            Duration::from_millis(200),
        )
    }

    const HASH: &str = "a3f6c1d2e5b4978812345678123456781234567812345678123456781234cafe";

    #[tokio::test]
    async fn disabled_service_records_locally_with_deterministic_reference() {
        let service = AnchoringService::disabled(Arc::new(EvidenceRegistry::in_memory()));
        let record = service.anchor(HASH, Category::Scam).await;

        assert_eq!(record.mode, AnchorMode::LocalRegistry);
        assert_eq!(record.reference, local_reference(HASH));
        assert_eq!(record.category, "SCAM");

        // Same hash, same pseudo-reference.
        let again = service.anchor(HASH, Category::Scam).await;
        assert_eq!(again.reference, record.reference);
    }

    #[tokio::test]
    async fn disabled_double_anchor_is_idempotent_in_effect() {
        let service = AnchoringService::disabled(Arc::new(EvidenceRegistry::in_memory()));
        let first = service.anchor(HASH, Category::Deepfake).await;
        let second = service.anchor(HASH, Category::Deepfake).await;
        assert_eq!(first.mode, AnchorMode::LocalRegistry);
        assert_eq!(second.mode, AnchorMode::LocalRegistry);
        // Both records are individually valid for the hash.
        assert_eq!(first.reference, second.reference);
    }

    #[tokio::test]
    async fn successful_submission_returns_on_chain_record() {
        let service = service_with(ScriptedLedger::healthy());
        let record = service.anchor(HASH, Category::Deepfake).await;

        assert_eq!(record.mode, AnchorMode::OnChain);
        assert_eq!(record.reference, "0xfeedface");
        assert_eq!(record.network, "testnet");
        assert_eq!(
            record.explorer_url.as_deref(),
            Some("https://explorer.test/tx/0xfeedface")
        );
        assert_eq!(record.timestamp, 1_700_000_000);
    }

    #[tokio::test]
    async fn submission_failure_falls_back_to_simulated() {
        let service = service_with(ScriptedLedger {
            submit: Err("execution reverted"),
            ..ScriptedLedger::healthy()
        });
        let record = service.anchor(HASH, Category::Fake).await;

        assert_eq!(record.mode, AnchorMode::Simulated);
        assert_eq!(record.reference.len(), 64);
        assert!(record.reference.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(record.note.as_deref().unwrap().contains("execution reverted"));
    }

    #[tokio::test]
    async fn insufficient_funds_skip_submission_entirely() {
        let ledger = ScriptedLedger {
            capacity: Err("0 wei available"),
            ..ScriptedLedger::healthy()
        };
        let submits = Arc::new(ledger);
        let service = AnchoringService::new(
            Some(submits.clone() as Arc<dyn LedgerClient>),
            Arc::new(EvidenceRegistry::in_memory()),
            AnchorPolicy::Auto,
            Duration::from_millis(200),
        );

        let record = service.anchor(HASH, Category::Scam).await;
        assert_eq!(record.mode, AnchorMode::Simulated);
        assert_eq!(submits.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_ledger_times_out_into_simulated() {
        let service = service_with(ScriptedLedger {
            delay: Some(Duration::from_secs(5)),
            ..ScriptedLedger::healthy()
        });
        let record = service.anchor(HASH, Category::Deepfake).await;
        assert_eq!(record.mode, AnchorMode::Simulated);
        assert!(record.note.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn off_policy_produces_offline_record() {
        let service = AnchoringService::new(
            None,
            Arc::new(EvidenceRegistry::in_memory()),
            AnchorPolicy::Off,
            Duration::from_millis(200),
        );
        let record = service.anchor(HASH, Category::Safe).await;
        assert_eq!(record.mode, AnchorMode::Offline);
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn verify_returns_exact_stored_record_after_simulated_anchor() {
        let service = service_with(ScriptedLedger {
            submit: Err("nope"),
            ..ScriptedLedger::healthy()
        });
        let record = service.anchor(HASH, Category::Scam).await;
        let outcome = service.verify(HASH).await;
        assert_eq!(outcome, VerifyOutcome::Anchored(record));
    }

    #[tokio::test]
    async fn verify_miss_with_disabled_backend() {
        let service = AnchoringService::disabled(Arc::new(EvidenceRegistry::in_memory()));
        match service.verify(HASH).await {
            VerifyOutcome::NotFound {
                backend_checked,
                detail,
            } => {
                assert!(!backend_checked);
                assert!(detail.contains("disabled"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_miss_with_consulted_backend() {
        let service = service_with(ScriptedLedger::healthy());
        match service.verify(HASH).await {
            VerifyOutcome::NotFound {
                backend_checked, ..
            } => assert!(backend_checked),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_unreachable_backend_is_distinguished() {
        let service = service_with(ScriptedLedger {
            lookup_fails: true,
            ..ScriptedLedger::healthy()
        });
        match service.verify(HASH).await {
            VerifyOutcome::NotFound {
                backend_checked,
                detail,
            } => {
                assert!(!backend_checked);
                assert!(detail.contains("lookup failed"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_finds_entry_on_live_backend() {
        let service = service_with(ScriptedLedger {
            lookup: Some(LedgerEntry {
                reference: "0xabc".to_string(),
                category: Some("DEEPFAKE".to_string()),
                timestamp: Some(1_699_999_999),
            }),
            ..ScriptedLedger::healthy()
        });
        match service.verify(HASH).await {
            VerifyOutcome::Anchored(record) => {
                assert_eq!(record.mode, AnchorMode::OnChain);
                assert_eq!(record.reference, "0xabc");
                assert_eq!(record.category, "DEEPFAKE");
                assert_eq!(record.timestamp, 1_699_999_999);
            }
            other => panic!("expected Anchored, got {other:?}"),
        }
    }

    #[test]
    fn local_reference_is_deterministic_64_hex() {
        let a = local_reference(HASH);
        let b = local_reference(HASH);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, local_reference("other"));
    }
}
