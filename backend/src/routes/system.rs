//! System statistics endpoints
//!
//! Uptime is measured from a process-wide start timestamp that is captured
//! once and never changes.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::env;

static PROCESS_STARTED_AT: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Pin the process start time. Call once at startup.
pub fn mark_process_start() -> DateTime<Utc> {
    *PROCESS_STARTED_AT
}

/// Create system routes
pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/public", get(public_stats))
        .route("/stats", get(stats))
        .route("/health", get(system_health))
}

#[derive(Debug, Serialize)]
pub struct UserStats {
    pub total: i64,
    pub active_sessions: u32,
}

#[derive(Debug, Serialize)]
pub struct UptimeStats {
    pub seconds: i64,
    pub formatted: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EnvironmentStats {
    pub deployment: String,
    pub debug: bool,
}

impl EnvironmentStats {
    /// `DEPLOYMENT_ENV` defaults to `local`; `DEBUG` is on unless set to
    /// something other than `true`
    fn from_values(deployment: Option<String>, debug: Option<String>) -> Self {
        Self {
            deployment: deployment.unwrap_or_else(|| "local".to_string()),
            debug: debug.map_or(true, |value| value.eq_ignore_ascii_case("true")),
        }
    }
}

/// Statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users: UserStats,
    pub uptime: UptimeStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentStats>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SystemHealthResponse {
    pub status: String,
    pub service: String,
    pub uptime: String,
    pub timestamp: DateTime<Utc>,
}

/// Render an uptime the way the dashboard shows it.
///
/// `"{d}d {h}h"` from one day, `"{h}h {m}m"` from one hour, `"{m}m {s}s"` below.
pub fn format_uptime(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (days, hours, minutes, secs) = (
        seconds / 86_400,
        seconds / 3_600,
        (seconds % 3_600) / 60,
        seconds % 60,
    );

    if days >= 1 {
        format!("{}d {}h", days, hours % 24)
    } else if hours >= 1 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", seconds / 60, secs)
    }
}

fn uptime_now() -> UptimeStats {
    let started_at = *PROCESS_STARTED_AT;
    let seconds = (Utc::now() - started_at).num_seconds();

    UptimeStats {
        seconds,
        formatted: format_uptime(seconds),
        started_at,
    }
}

/// Basic statistics, no authentication required
///
/// GET /api/v1/system/stats/public
async fn public_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let total = state.store().count_users().await?;

    Ok(Json(StatsResponse {
        users: UserStats {
            total,
            active_sessions: 0,
        },
        uptime: uptime_now(),
        environment: None,
        timestamp: Utc::now(),
    }))
}

/// Full statistics for an authenticated user
///
/// GET /api/v1/system/stats
async fn stats(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> ApiResult<Json<StatsResponse>> {
    let total = state.store().count_users().await?;

    Ok(Json(StatsResponse {
        users: UserStats {
            total,
            active_sessions: 1,
        },
        uptime: uptime_now(),
        environment: Some(EnvironmentStats::from_values(
            env::var("DEPLOYMENT_ENV").ok(),
            env::var("DEBUG").ok(),
        )),
        timestamp: Utc::now(),
    }))
}

/// GET /api/v1/system/health
async fn system_health() -> Json<SystemHealthResponse> {
    Json(SystemHealthResponse {
        status: "healthy".to_string(),
        service: "backend".to_string(),
        uptime: uptime_now().formatted,
        timestamp: Utc::now(),
    })
}
