//! HTTP boundary: request validation, capture decoding, route handlers.
//!
//! Field validation happens here, before any pipeline runs; the exact
//! messages are part of the external contract. Handlers only ever return
//! assembled envelopes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::classify::api::{Capture, ClassifierApi};
use crate::error::{AuditError, AuditResult};
use crate::response::{airline_response, bottle_response, failure_response, sticker_response};
use crate::service;
use crate::store::RuleStore;

/// Shared collaborators injected into every handler.
pub struct AppState {
    pub store: Arc<dyn RuleStore>,
    pub classifier: Arc<dyn ClassifierApi>,
}

/// One capture as sent by the browser: caller id plus base64 JPEG.
#[derive(Debug, Deserialize)]
pub struct CapturePayload {
    pub id: u64,
    pub blob: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleAuditRequest {
    #[serde(default)]
    pub items: Option<Vec<CapturePayload>>,
    #[serde(default)]
    pub airline_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StickerAuditRequest {
    #[serde(default)]
    pub image: Option<CapturePayload>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/actions", post(audit_bottles))
        .route("/api/stickers", post(audit_stickers))
        .route("/api/airlines/by-flight/:code", get(airline_by_flight))
        .with_state(state)
}

/// Binds and serves the API until the process stops.
pub async fn serve(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Audit API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn validate_bottle_request(request: BottleAuditRequest) -> AuditResult<(String, Vec<Capture>)> {
    let airline_name = request
        .airline_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AuditError::Validation("Airline name is required".to_string()))?;

    let items = request
        .items
        .filter(|items| !items.is_empty())
        .ok_or_else(|| AuditError::Validation("Items are required".to_string()))?;

    Ok((airline_name, decode_captures(&items)?))
}

fn validate_sticker_request(request: StickerAuditRequest) -> AuditResult<Capture> {
    let image = request
        .image
        .ok_or_else(|| AuditError::Validation("Image is required".to_string()))?;
    decode_capture(&image)
}

fn decode_captures(items: &[CapturePayload]) -> AuditResult<Vec<Capture>> {
    items.iter().map(decode_capture).collect()
}

fn decode_capture(item: &CapturePayload) -> AuditResult<Capture> {
    let bytes = BASE64.decode(item.blob.as_bytes()).map_err(|e| {
        AuditError::Validation(format!("item {} is not valid base64: {e}", item.id))
    })?;
    Ok(Capture { id: item.id, bytes })
}

async fn audit_bottles(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BottleAuditRequest>,
) -> Response {
    let (airline_name, captures) = match validate_bottle_request(request) {
        Ok(valid) => valid,
        Err(err) => return failure_response(&err),
    };

    bottle_response(
        service::audit_bottles(
            state.classifier.as_ref(),
            state.store.as_ref(),
            &airline_name,
            &captures,
        )
        .await,
    )
}

async fn audit_stickers(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StickerAuditRequest>,
) -> Response {
    let capture = match validate_sticker_request(request) {
        Ok(capture) => capture,
        Err(err) => return failure_response(&err),
    };

    sticker_response(
        service::audit_stickers(state.classifier.as_ref(), state.store.as_ref(), &capture).await,
    )
}

async fn airline_by_flight(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Response {
    airline_response(service::airline_for_flight(state.store.as_ref(), &code))
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn healthz(State(state): State<Arc<AppState>>) -> Response {
    match state.store.health_check() {
        Ok(()) => (StatusCode::OK, Json(HealthBody { status: "ok" })).into_response(),
        Err(err) => {
            error!(error = %err, "Store health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthBody { status: "unavailable" }),
            )
                .into_response()
        }
    }
}
