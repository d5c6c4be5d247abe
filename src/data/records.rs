//! records.rs
//!
//! Lectura del CSV de grupos criminales (`preprocessed_metadata_criminalgroups.csv`)
//!
//! - La primera línea da las claves de cada registro
//! - Las líneas vacías se saltan
//! - Los valores quedan como texto, sin tipar: la conversión de
//!   coordenadas la hace quien pinta el mapa

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::models::types::Record;

pub fn parse_records_csv(raw: &str) -> Result<Vec<Record>> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_bytes());
    let headers = rdr.headers().context("cabecera CSV")?.clone();

    let mut out: Vec<Record> = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row.with_context(|| format!("fila CSV {}", i + 2))?;
        // línea vacía: una sola celda vacía
        if row.len() == 1 && row[0].is_empty() { continue; }
        // Papa las guardaría en `__parsed_extra`; aquí se descartan para que
        // todos los valores sigan siendo texto
        if row.len() > headers.len() {
            debug!("fila {}: {} celdas sobrantes descartadas", i + 2, row.len() - headers.len());
        }
        out.push(headers.iter().zip(row.iter()).collect());
    }
    Ok(out)
}

pub async fn load_records(path: &Path) -> Result<Vec<Record>> {
    let txt = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("leer {}", path.display()))?;
    parse_records_csv(&txt).with_context(|| format!("parsear {}", path.display()))
}
