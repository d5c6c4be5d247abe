//! client.rs — carga de registros desde `/api/criminalgroups`

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{error, info};

use super::map::MapView;
use crate::models::types::Record;

pub const DATA_PATH: &str = "/api/criminalgroups";

pub async fn fetch_records(client: &Client, url: &str) -> Result<Vec<Record>> {
    let resp = client.get(url).send().await.with_context(|| format!("GET {url}"))?;
    let s = resp.status();
    if !s.is_success() {
        anyhow::bail!("HTTP {} en {}", s, url);
    }
    resp.json::<Vec<Record>>().await.context("JSON de registros")
}

impl MapView {
    /// Una sola petición. Si falla se registra y el mapa se queda sin marcadores.
    pub async fn load(&mut self, client: &Client, url: &str) {
        match fetch_records(client, url).await {
            Ok(records) => {
                info!("{} registros cargados de {url}", records.len());
                self.set_records(records);
            }
            Err(e) => error!("failed to load markers: {e:?}"),
        }
    }
}
