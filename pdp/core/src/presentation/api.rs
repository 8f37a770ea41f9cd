// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::{FromRequestParts, OriginalUri, State},
    http::{request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::application::authentication::{CALLER_ID_HEADER, DEVICE_ID_HEADER};
use crate::application::classifier;
use crate::application::{AuthorizationService, DiagnosticReporter};
use crate::domain::decision::PolicyEngine;
use crate::domain::device::DevicePostureProvider;
use crate::domain::error::{AccessError, CatalogError};
use crate::domain::gateway_config::GatewayConfig;
use crate::domain::identity::IdentityResolver;
use crate::infrastructure::{
    HttpDevicePostureClient, HttpPolicyEngineClient, StaticIdentityCatalog, StaticResourceCatalog,
};

const SERVICE_NAME: &str = "aegis-pdp";

const ENDPOINTS: &[&str] = &[
    "/public/info",
    "/api/profile",
    "/api/data",
    "/api/admin/users",
    "/api/diagnostic",
];

pub struct AppState {
    pub authorization: AuthorizationService,
    pub diagnostics: DiagnosticReporter,
    pub identities: Arc<dyn IdentityResolver>,
    pub resources: StaticResourceCatalog,
}

impl AppState {
    pub fn new(
        identities: Arc<dyn IdentityResolver>,
        posture: Arc<dyn DevicePostureProvider>,
        policy: Arc<dyn PolicyEngine>,
        resources: StaticResourceCatalog,
    ) -> Self {
        Self {
            authorization: AuthorizationService::new(identities.clone(), posture.clone(), policy.clone()),
            diagnostics: DiagnosticReporter::new(identities.clone(), posture, policy),
            identities,
            resources,
        }
    }

    /// Wire the HTTP upstream clients and catalogs described by `config`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, CatalogError> {
        let identities = match &config.identity_catalog {
            Some(path) => StaticIdentityCatalog::from_yaml_file(path)?,
            None => StaticIdentityCatalog::demo(),
        };

        let client = reqwest::Client::new();
        let posture = HttpDevicePostureClient::with_client(
            client.clone(),
            config.device_posture.url.clone(),
            config.device_posture.timeout,
            config.health_probe_timeout,
        );
        let policy = HttpPolicyEngineClient::with_client(
            client,
            config.policy_engine.url.clone(),
            config.policy_engine.timeout,
            config.health_probe_timeout,
        );

        Ok(Self::new(
            Arc::new(identities),
            Arc::new(posture),
            Arc::new(policy),
            StaticResourceCatalog::demo(),
        ))
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/public/info", get(public_info))
        .route("/api/profile", get(profile))
        .route("/api/data", get(data))
        .route("/api/admin/users", get(admin_users))
        .route("/api/diagnostic", get(diagnostic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Caller and device ids as sent, before authentication.
#[derive(Debug, Clone, Default)]
pub struct CallerMetadata {
    pub caller_id: Option<String>,
    pub device_id: Option<String>,
}

impl<S> FromRequestParts<S> for CallerMetadata
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        Ok(Self {
            caller_id: header(CALLER_ID_HEADER),
            device_id: header(DEVICE_ID_HEADER),
        })
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::FORBIDDEN);
        let message = match self {
            AccessError::CredentialsMissing => "Missing credentials",
            AccessError::IdentityNotFound(_) => "User not found",
            AccessError::Denied => "Access denied",
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let status = state.diagnostics.upstream_status().await;
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now(),
        "policy_engine_connected": status.policy_engine_connected,
        "device_posture_connected": status.device_posture_connected,
    }))
}

async fn public_info() -> Json<Value> {
    Json(json!({
        "message": "Zero Trust Demo API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "endpoints": ENDPOINTS,
    }))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    caller: CallerMetadata,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Value>, AccessError> {
    let auth = state
        .authorization
        .enforce(caller.caller_id.as_deref(), caller.device_id.as_deref(), method.as_str(), uri.path())
        .await?;

    Ok(Json(json!({
        "user": auth.identity,
        "device": auth.posture,
        "access_granted": true,
    })))
}

async fn data(
    State(state): State<Arc<AppState>>,
    caller: CallerMetadata,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Value>, AccessError> {
    let auth = state
        .authorization
        .enforce(caller.caller_id.as_deref(), caller.device_id.as_deref(), method.as_str(), uri.path())
        .await?;

    let visible = classifier::filter(state.resources.resources(), &auth.identity.roles);

    Ok(Json(json!({
        "total": visible.len(),
        "data": visible,
        "user_role": auth.identity.roles,
        "device_trusted": auth.posture.trusted,
    })))
}

async fn admin_users(
    State(state): State<Arc<AppState>>,
    caller: CallerMetadata,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Value>, AccessError> {
    // Who counts as an administrator is the policy engine's call.
    state
        .authorization
        .enforce(caller.caller_id.as_deref(), caller.device_id.as_deref(), method.as_str(), uri.path())
        .await?;

    let users = state.identities.list().await;
    Ok(Json(json!({
        "total": users.len(),
        "users": users,
    })))
}

async fn diagnostic(State(state): State<Arc<AppState>>, caller: CallerMetadata) -> impl IntoResponse {
    let snapshot = state
        .diagnostics
        .diagnose(caller.caller_id.as_deref(), caller.device_id.as_deref())
        .await;
    Json(snapshot)
}
