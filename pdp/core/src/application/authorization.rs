// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Decision Aggregator
//!
//! Orchestrates one authorization call:
//!
//! ```text
//! authorize(caller_id, device_id, method, path)
//!   └─ CallerCredentials::authenticate      ← CredentialsMissing
//!   └─ IdentityResolver::resolve            ← IdentityNotFound
//!   └─ DevicePostureProvider::fetch         ← never fails (untrusted default)
//!   └─ PolicyEngine::evaluate               ← fail-closed Decision
//! ```
//!
//! Posture and policy are sequential because the policy input includes the
//! posture. Nothing is retried and nothing is cached: a transient upstream
//! failure shows up as a restrictive posture or a deny for this call only.
//! Dropping the returned future (client disconnect) abandons any in-flight
//! upstream request; neither call mutates shared state.

use std::sync::Arc;
use tracing::info;

use super::authentication::CallerCredentials;
use crate::domain::decision::{Decision, DecisionRequest, PolicyEngine};
use crate::domain::device::{DevicePosture, DevicePostureProvider};
use crate::domain::error::AccessError;
use crate::domain::identity::{Identity, IdentityResolver};

/// Everything one authorization call established.
#[derive(Debug, Clone)]
pub struct Authorization {
    pub identity: Identity,
    pub posture: DevicePosture,
    pub decision: Decision,
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        self.decision.allow
    }
}

pub struct AuthorizationService {
    identities: Arc<dyn IdentityResolver>,
    posture: Arc<dyn DevicePostureProvider>,
    policy: Arc<dyn PolicyEngine>,
}

impl AuthorizationService {
    pub fn new(
        identities: Arc<dyn IdentityResolver>,
        posture: Arc<dyn DevicePostureProvider>,
        policy: Arc<dyn PolicyEngine>,
    ) -> Self {
        Self {
            identities,
            posture,
            policy,
        }
    }

    /// Run the pipeline and return the decision, whichever way it went.
    pub async fn authorize(
        &self,
        caller_id: Option<&str>,
        device_id: Option<&str>,
        method: &str,
        path: &str,
    ) -> Result<Authorization, AccessError> {
        let credentials = CallerCredentials::authenticate(caller_id, device_id)
            .inspect_err(|_| record_outcome("credentials_missing"))?;

        let identity = match self.identities.resolve(&credentials.caller_id).await {
            Some(identity) => identity,
            None => {
                info!(caller_id = %credentials.caller_id, "Unknown caller");
                record_outcome("identity_not_found");
                return Err(AccessError::IdentityNotFound(credentials.caller_id));
            }
        };

        let posture = self.posture.fetch(&credentials.device_id, &identity.id).await;

        let request = DecisionRequest::new(identity, posture, method, path);
        let decision = self.policy.evaluate(&request).await;

        info!(
            caller_id = %request.identity.id,
            device_id = %request.posture.device_id,
            device_trusted = request.posture.trusted,
            method = %request.method,
            path = ?request.path_segments,
            allow = decision.allow,
            "Authorization decided"
        );
        record_outcome(if decision.allow { "allow" } else { "deny" });

        Ok(Authorization {
            identity: request.identity,
            posture: request.posture,
            decision,
        })
    }

    /// [`Self::authorize`], with a deny turned into [`AccessError::Denied`].
    pub async fn enforce(
        &self,
        caller_id: Option<&str>,
        device_id: Option<&str>,
        method: &str,
        path: &str,
    ) -> Result<Authorization, AccessError> {
        let authorization = self.authorize(caller_id, device_id, method, path).await?;
        if authorization.is_allowed() {
            Ok(authorization)
        } else {
            Err(AccessError::Denied)
        }
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("aegis_pdp_decisions_total", "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::PolicyInput;
    use crate::domain::device::TrustLevel;
    use crate::infrastructure::identity_catalog::StaticIdentityCatalog;
    use async_trait::async_trait;
    use metrics::{Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedPosture(DevicePosture);

    #[async_trait]
    impl DevicePostureProvider for FixedPosture {
        async fn fetch(&self, device_id: &str, _identity_id: &str) -> DevicePosture {
            DevicePosture {
                device_id: device_id.to_string(),
                ..self.0.clone()
            }
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    /// Records every request and answers with a fixed verdict.
    struct RecordingPolicy {
        verdict: bool,
        seen: Mutex<Vec<DecisionRequest>>,
    }

    #[async_trait]
    impl PolicyEngine for RecordingPolicy {
        async fn evaluate(&self, request: &DecisionRequest) -> Decision {
            self.seen.lock().unwrap().push(request.clone());
            Decision::from_verdict(json!({ "result": self.verdict }))
        }

        async fn diagnose(&self, _input: &PolicyInput<'_>) -> Value {
            Value::Null
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    fn service(verdict: bool) -> (AuthorizationService, Arc<RecordingPolicy>) {
        let policy = Arc::new(RecordingPolicy {
            verdict,
            seen: Mutex::new(Vec::new()),
        });
        let posture = FixedPosture(DevicePosture {
            device_id: String::new(),
            trusted: true,
            compliance_score: 95,
            trust_level: TrustLevel::High,
        });
        let service = AuthorizationService::new(
            Arc::new(StaticIdentityCatalog::demo()),
            Arc::new(posture),
            policy.clone(),
        );
        (service, policy)
    }

    #[tokio::test]
    async fn test_allow_carries_request_context() {
        let (service, policy) = service(true);

        let auth = service
            .authorize(Some("admin-001"), Some("laptop-1"), "GET", "/api/data")
            .await
            .unwrap();

        assert!(auth.is_allowed());
        assert_eq!(auth.identity.id, "admin-001");
        assert_eq!(auth.posture.device_id, "laptop-1");

        let seen = policy.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, "GET");
        assert_eq!(seen[0].path_segments, vec!["api", "data"]);
        assert_eq!(seen[0].posture.compliance_score, 95);
    }

    #[tokio::test]
    async fn test_deny_is_a_decision_not_an_error() {
        let (service, _) = service(false);

        let auth = service
            .authorize(Some("admin-001"), Some("laptop-1"), "GET", "/api/data")
            .await
            .unwrap();
        assert!(!auth.is_allowed());

        let enforced = service
            .enforce(Some("admin-001"), Some("laptop-1"), "GET", "/api/data")
            .await;
        assert_eq!(enforced.unwrap_err(), AccessError::Denied);
    }

    #[tokio::test]
    async fn test_unknown_caller_skips_policy() {
        let (service, policy) = service(true);

        let result = service
            .authorize(Some("mallory"), Some("laptop-1"), "GET", "/api/data")
            .await;

        assert_eq!(result.unwrap_err(), AccessError::IdentityNotFound("mallory".to_string()));
        assert!(policy.seen.lock().unwrap().is_empty());
    }

    /// Tallies `aegis_pdp_decisions_total` increments per `outcome` label.
    #[derive(Default)]
    struct OutcomeRecorder {
        counts: Arc<Mutex<HashMap<String, u64>>>,
    }

    struct OutcomeCounter {
        outcome: String,
        counts: Arc<Mutex<HashMap<String, u64>>>,
    }

    impl CounterFn for OutcomeCounter {
        fn increment(&self, value: u64) {
            *self.counts.lock().unwrap().entry(self.outcome.clone()).or_default() += value;
        }

        fn absolute(&self, value: u64) {
            self.counts.lock().unwrap().insert(self.outcome.clone(), value);
        }
    }

    impl Recorder for OutcomeRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            if key.name() != "aegis_pdp_decisions_total" {
                return Counter::noop();
            }
            let outcome = key
                .labels()
                .find(|label| label.key() == "outcome")
                .map(|label| label.value().to_string())
                .unwrap_or_default();
            Counter::from_arc(Arc::new(OutcomeCounter {
                outcome,
                counts: self.counts.clone(),
            }))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_every_outcome_is_counted() {
        let recorder = OutcomeRecorder::default();
        let (allowing, _) = service(true);
        let (denying, _) = service(false);

        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let _ = allowing.authorize(Some("admin-001"), Some("laptop-1"), "GET", "/api/data").await;
                let _ = denying.authorize(Some("user-001"), Some("laptop-1"), "GET", "/api/data").await;
                let _ = denying.authorize(Some("guest-001"), Some("laptop-1"), "GET", "/api/data").await;
                let _ = allowing.authorize(Some("mallory"), Some("laptop-1"), "GET", "/api/data").await;
                let _ = allowing.authorize(None, Some("laptop-1"), "GET", "/api/data").await;
            });
        });

        let counts = recorder.counts.lock().unwrap();
        assert_eq!(counts.get("allow"), Some(&1));
        assert_eq!(counts.get("deny"), Some(&2));
        assert_eq!(counts.get("identity_not_found"), Some(&1));
        assert_eq!(counts.get("credentials_missing"), Some(&1));
    }
}
