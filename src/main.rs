//! main.rs — servidor del mapa de grupos criminales

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gangmap::models::types::AppCfg;
use gangmap::server::api::{router, ApiState};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppCfg::from_env();

    // El CSV se lee en cada petición: si falta ahora solo avisamos
    if !cfg.csv_path.exists() {
        warn!("No existe {} (la API devolverá 500 hasta que aparezca)", cfg.csv_path.display());
    }
    if cfg.maps_api_key.is_none() {
        warn!("Sin GOOGLE_API_KEY: la página no podrá cargar el mapa");
    }

    let bind = cfg.bind.clone();
    let app = router(ApiState { cfg: Arc::new(cfg) });
    info!("Escuchando en http://{}", bind);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}
