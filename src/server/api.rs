//! api.rs — Rutas HTTP: /health, /kpis, /api/criminalgroups y la página del mapa en /

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir};
use tracing::warn;

use crate::data::records::load_records;
use crate::models::types::{AppCfg, Kpis, Marker};
use crate::server::page::render_index;

#[derive(Clone)]
pub struct ApiState {
    pub cfg: Arc<AppCfg>,
}

pub fn router(state: ApiState) -> Router {
    let web = ServeDir::new(&state.cfg.web_dir);
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(index))
        .route("/api/criminalgroups", get(criminal_groups))
        .route("/kpis", get(kpis))
        .fallback_service(web)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

/// 500 genérico: el detalle solo va al log.
fn load_failed() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Failed to load data" }))).into_response()
}

/// El CSV entero, leído de disco en cada llamada.
async fn criminal_groups(State(st): State<ApiState>) -> Response {
    match load_records(&st.cfg.csv_path).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            warn!("criminalgroups: {e:?}");
            load_failed()
        }
    }
}

async fn kpis(State(st): State<ApiState>) -> Response {
    let records = match load_records(&st.cfg.csv_path).await {
        Ok(r) => r,
        Err(e) => {
            warn!("kpis: {e:?}");
            return load_failed();
        }
    };
    // filas cortas no traen todas las claves
    let mut columns: Vec<String> = Vec::new();
    for k in records.iter().flat_map(|r| r.keys()) {
        if !columns.iter().any(|c| c == k) { columns.push(k.to_string()); }
    }
    let total = records.len();
    let invalid_coords = records
        .into_iter()
        .map(Marker::from_record)
        .filter(|m| !m.is_visible())
        .count();
    Json(Kpis {
        records: total,
        columns,
        invalid_coords,
        snapshot_ts_utc: chrono::Utc::now().to_rfc3339(),
    })
    .into_response()
}

async fn index(State(st): State<ApiState>) -> impl IntoResponse {
    Html(render_index(&st.cfg))
}
