//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Rendering configuration, 503 while shutting down

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use hearth_ssr::{RenderMode, Theme};

use crate::state::AppState;

/// Health report (passive data).
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub render_mode: RenderMode,
    pub bot_timeout_ms: u64,
    pub default_theme: Theme,
}

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Rendering configuration (passive, no render).
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.assembler.config();
    let healthy = !state.is_shutting_down();
    let report = HealthReport {
        healthy,
        render_mode: config.mode,
        bot_timeout_ms: config.bot_timeout_ms,
        default_theme: config.default_theme,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
