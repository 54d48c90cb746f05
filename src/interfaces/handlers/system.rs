use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::Duration,
};

use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use humantime::format_duration;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use sysinfo::System;

use crate::AppState;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

const CACHE_TTL_SECS: i64 = 5;

#[derive(Serialize, Clone)]
struct SystemInfo {
    os: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    store: String,
    version: String,
    memory_usage: String,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<Option<HealthCheckResponse>>> = Lazy::new(|| RwLock::new(None));

/// True for the single caller that moves an expired window forward to `now`.
fn claim_refresh(last_check: &AtomicI64, now: i64) -> bool {
    let last = last_check.load(Ordering::Acquire);
    now - last > CACHE_TTL_SECS
        && last_check
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
}

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let mut sys = System::new_all();
    sys.refresh_all();

    let system_info = SystemInfo {
        os: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let (status, store) = match state.health.check_connection().await {
        Ok(()) => ("healthy", "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            ("degraded", "Unavailable")
        }
    };

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or("Unknown".to_string(), |p| {
            format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0)
        });

    HealthCheckResponse {
        status: status.to_string(),
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        store: store.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
        system: system_info,
    }
}

/// Process and store status. One request per five-second window rebuilds
/// the report; the others are served the cached copy.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    if !claim_refresh(&LAST_CHECK, Utc::now().timestamp()) {
        if let Some(cached) = CACHED_STATUS.read().clone() {
            return HttpResponse::Ok().json(cached);
        }
    }

    let response = build_health_response(&state).await;
    *CACHED_STATUS.write() = Some(response.clone());
    HttpResponse::Ok().json(response)
}
