// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use aegis_pdp_core::domain::decision::{Decision, DecisionRequest, PolicyEngine, PolicyInput};
use aegis_pdp_core::domain::device::{DevicePosture, DevicePostureProvider, TrustLevel};
use aegis_pdp_core::domain::error::CatalogError;
use aegis_pdp_core::domain::gateway_config::GatewayConfig;
use aegis_pdp_core::domain::identity::IdentityResolver;
use aegis_pdp_core::infrastructure::{StaticIdentityCatalog, StaticResourceCatalog};
use aegis_pdp_core::presentation::api::{app, AppState};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubPosture {
    reachable: bool,
}

#[async_trait]
impl DevicePostureProvider for StubPosture {
    async fn fetch(&self, device_id: &str, _identity_id: &str) -> DevicePosture {
        if !self.reachable {
            return DevicePosture::untrusted(device_id);
        }
        DevicePosture {
            device_id: device_id.to_string(),
            trusted: true,
            compliance_score: 95,
            trust_level: TrustLevel::High,
        }
    }

    async fn health_check(&self) -> bool {
        self.reachable
    }
}

/// Allows when the caller's roles intersect `allowed_roles`; `None` models
/// an unreachable engine.
struct StubPolicy {
    allowed_roles: Option<Vec<&'static str>>,
}

#[async_trait]
impl PolicyEngine for StubPolicy {
    async fn evaluate(&self, request: &DecisionRequest) -> Decision {
        match &self.allowed_roles {
            Some(roles) => {
                let allow = roles.iter().any(|role| request.identity.has_role(role));
                Decision::from_verdict(json!({ "result": allow }))
            }
            None => Decision::fail_closed(),
        }
    }

    async fn diagnose(&self, input: &PolicyInput<'_>) -> Value {
        json!({ "echo": input })
    }

    async fn health_check(&self) -> bool {
        self.allowed_roles.is_some()
    }
}

fn router(allowed_roles: Option<Vec<&'static str>>, posture_reachable: bool) -> Router {
    let state = AppState::new(
        Arc::new(StaticIdentityCatalog::demo()),
        Arc::new(StubPosture {
            reachable: posture_reachable,
        }),
        Arc::new(StubPolicy { allowed_roles }),
        StaticResourceCatalog::demo(),
    );
    app(Arc::new(state))
}

fn everyone() -> Option<Vec<&'static str>> {
    Some(vec!["admin", "manager", "user", "guest"])
}

async fn get(router: Router, uri: &str, caller: Option<&str>, device: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(caller) = caller {
        request = request.header("X-User-Id", caller);
    }
    if let Some(device) = device {
        request = request.header("X-Device-Id", device);
    }

    let response = router
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_missing_credentials_is_401() {
    let (status, body) = get(router(everyone(), true), "/api/data", Some("user-001"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Missing credentials"}));

    let (status, _) = get(router(everyone(), true), "/api/profile", None, Some("laptop-1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let (status, body) = get(router(everyone(), true), "/api/profile", Some("ghost"), Some("laptop-1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
}

#[tokio::test]
async fn test_denial_and_outage_are_indistinguishable() {
    let denied = get(router(Some(vec![]), true), "/api/data", Some("admin-001"), Some("laptop-1")).await;
    let outage = get(router(None, false), "/api/data", Some("admin-001"), Some("laptop-1")).await;

    assert_eq!(denied.0, StatusCode::FORBIDDEN);
    assert_eq!(denied, outage);
    assert_eq!(denied.1, json!({"error": "Access denied"}));
}

#[tokio::test]
async fn test_data_is_filtered_by_role() {
    let cases = [
        ("admin-001", vec![1, 2, 3, 4, 5]),
        ("manager-001", vec![1, 2, 3]),
        ("user-001", vec![1, 2]),
        ("guest-001", vec![1]),
    ];

    for (caller, expected) in cases {
        let (status, body) = get(router(everyone(), true), "/api/data", Some(caller), Some("laptop-1")).await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<u64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_u64().unwrap())
            .collect();
        let expected: Vec<u64> = expected.into_iter().collect();
        assert_eq!(ids, expected, "{}", caller);
        assert_eq!(body["total"], expected.len());
        assert_eq!(body["device_trusted"], true);
    }
}

#[tokio::test]
async fn test_profile() {
    let (status, body) = get(router(everyone(), true), "/api/profile", Some("user-001"), Some("laptop-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_granted"], true);
    assert_eq!(body["user"]["user_id"], "user-001");
    assert_eq!(body["user"]["realm_access"]["roles"], json!(["user"]));
    assert_eq!(body["device"]["device_id"], "laptop-1");
}

#[tokio::test]
async fn test_admin_users_follows_policy() {
    let admins_only = || router(Some(vec!["admin"]), true);

    let (status, body) = get(admins_only(), "/api/admin/users", Some("admin-001"), Some("laptop-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);

    let (status, _) = get(admins_only(), "/api/admin/users", Some("user-001"), Some("laptop-1")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_public_endpoints_need_no_credentials() {
    let (status, body) = get(router(None, false), "/public/info", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "operational");
    assert!(body["endpoints"].as_array().unwrap().contains(&json!("/api/data")));

    let (status, body) = get(router(None, false), "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["policy_engine_connected"], false);
    assert_eq!(body["device_posture_connected"], false);
}

#[tokio::test]
async fn test_diagnostic_never_fails() {
    let (status, body) = get(router(None, false), "/api/diagnostic", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "unknown");
    assert_eq!(body["user"]["exists"], false);
    assert_eq!(body["system_status"]["policy_engine_connected"], false);

    let (status, body) = get(router(everyone(), true), "/api/diagnostic", Some("admin-001"), Some("laptop-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["roles"], json!(["admin"]));
    assert_eq!(body["policy_diagnostic"]["echo"]["input"]["path"], json!(["api", "diagnostic"]));
    assert_eq!(body["system_status"]["device_posture_connected"], true);
}

#[tokio::test]
async fn test_from_config_loads_identity_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("identities.yaml");
    std::fs::write(
        &catalog,
        r#"
- user_id: ops-007
  email: ops@zerotrust.local
  full_name: Ops Engineer
  department: SRE
  clearance_level: secret
  realm_access:
    roles: [manager]
"#,
    )
    .unwrap();

    let config = GatewayConfig {
        identity_catalog: Some(catalog),
        ..GatewayConfig::default()
    };
    let state = AppState::from_config(&config).unwrap();

    let ops = state.identities.resolve("ops-007").await.unwrap();
    assert!(ops.has_role("manager"));
    assert!(state.identities.resolve("admin-001").await.is_none());
    assert_eq!(state.identities.list().await.len(), 1);
}

#[tokio::test]
async fn test_from_config_without_catalog_serves_demo_identities() {
    let state = AppState::from_config(&GatewayConfig::default()).unwrap();
    assert_eq!(state.identities.list().await.len(), 4);
}

#[test]
fn test_from_config_rejects_unreadable_catalog() {
    let config = GatewayConfig {
        identity_catalog: Some("/nonexistent/identities.yaml".into()),
        ..GatewayConfig::default()
    };
    assert!(matches!(
        AppState::from_config(&config),
        Err(CatalogError::Io { .. })
    ));
}
