//! types.rs
//! Modelos de datos compartidos por el servicio y el cliente: registros del CSV,
//! marcadores, panel de detalle, configuración y KPIs

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Una fila del CSV: pares columna → valor en el orden de la cabecera.
///
/// Se serializa como objeto JSON conservando ese orden.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self { Self::default() }

    /// Inserta o sobreescribe. Una clave repetida conserva su posición y
    /// se queda con el último valor (igual que un objeto JS).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut r = Record::new();
        for (k, v) in iter { r.insert(k, v); }
        r
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("un objeto con valores de texto")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut r = Record::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    r.insert(k, v);
                }
                Ok(r)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Pin del mapa. `details` es el registro completo del que sale.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub details: Record,
}

impl Marker {
    pub fn position(&self) -> LatLng { LatLng { lat: self.lat, lng: self.lng } }

    /// El widget descarta posiciones no finitas.
    pub fn is_visible(&self) -> bool { self.lat.is_finite() && self.lng.is_finite() }
}

/// Tarjeta del panel: (etiqueta, columna del CSV)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CardSpec {
    pub label: &'static str,
    pub field: &'static str,
}

pub const TITLE_FIELD: &str = "gang_name";
pub const LAT_FIELD: &str = "Latitude";
pub const LNG_FIELD: &str = "Longitude";

pub const DETAIL_CARDS: [CardSpec; 4] = [
    CardSpec { label: "Area Name:", field: "Area Name" },
    CardSpec { label: "City", field: "City" },
    CardSpec { label: "Primary Offence", field: "Keyword" },
    CardSpec { label: "Full Address", field: "Full Address" },
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailCard {
    pub label: &'static str,
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailPanel {
    pub title: Option<String>,
    pub cards: Vec<DetailCard>,
}

impl DetailPanel {
    pub fn for_record(r: &Record) -> Self {
        Self {
            title: r.get(TITLE_FIELD).map(str::to_string),
            cards: DETAIL_CARDS
                .iter()
                .map(|c| DetailCard { label: c.label, value: r.get(c.field).map(str::to_string) })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MapCfg {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
}

impl Default for MapCfg {
    fn default() -> Self {
        Self {
            center: LatLng { lat: 31.069079, lng: 72.776204 },
            zoom: 7,
            min_zoom: 6,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCfg {
    pub bind: String,
    pub csv_path: PathBuf,
    pub web_dir: PathBuf,
    pub maps_api_key: Option<String>,
    pub map: MapCfg,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            csv_path: PathBuf::from("constants/preprocessed_metadata_criminalgroups.csv"),
            web_dir: PathBuf::from("web"),
            maps_api_key: None,
            map: MapCfg::default(),
        }
    }
}

impl AppCfg {
    /// Config por defecto con lo que venga del entorno encima.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut c = AppCfg::default();
        if let Some(v) = get("BIND") { c.bind = v; }
        if let Some(v) = get("CSV_PATH") { c.csv_path = v.into(); }
        if let Some(v) = get("WEB_DIR") { c.web_dir = v.into(); }
        c.maps_api_key = get("GOOGLE_API_KEY")
            .or_else(|| get("NEXT_PUBLIC_GOOGLE_API_KEY"))
            .filter(|k| !k.trim().is_empty());
        c
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Kpis {
    pub records: usize,
    pub columns: Vec<String>,
    pub invalid_coords: usize,
    pub snapshot_ts_utc: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn record_keeps_header_order_in_json() {
        let r: Record = [("b", "1"), ("a", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"b":"1","a":"2","c":"3"}"#);
    }

    #[test]
    fn duplicate_key_keeps_first_slot_and_last_value() {
        let r: Record = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(r.len(), 2);
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(r.get("a"), Some("3"));
    }

    #[test]
    fn record_from_json_object() {
        let r: Record = serde_json::from_str(r#"{"City":"Lahore","gang_name":"X"}"#).unwrap();
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![("City", "Lahore"), ("gang_name", "X")]);
        assert!(serde_json::from_str::<Record>(r#"{"n": 1}"#).is_err());
    }

    #[test]
    fn panel_has_exactly_the_four_cards() {
        let r: Record = [
            ("gang_name", "Group A"),
            ("Area Name", "Area 1"),
            ("City", "City 1"),
            ("Keyword", "Extortion"),
            ("Full Address", "Street 1"),
            ("Latitude", "31.5"),
        ]
        .into_iter()
        .collect();
        let p = DetailPanel::for_record(&r);
        assert_eq!(p.title.as_deref(), Some("Group A"));
        let cards: Vec<_> = p.cards.iter().map(|c| (c.label, c.value.as_deref())).collect();
        assert_eq!(
            cards,
            vec![
                ("Area Name:", Some("Area 1")),
                ("City", Some("City 1")),
                ("Primary Offence", Some("Extortion")),
                ("Full Address", Some("Street 1")),
            ]
        );
    }

    #[test]
    fn cfg_from_env_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("BIND", "127.0.0.1:9000"),
            ("CSV_PATH", "/tmp/x.csv"),
            ("NEXT_PUBLIC_GOOGLE_API_KEY", "k"),
        ]
        .into_iter()
        .collect();
        let c = AppCfg::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.bind, "127.0.0.1:9000");
        assert_eq!(c.csv_path, PathBuf::from("/tmp/x.csv"));
        assert_eq!(c.web_dir, PathBuf::from("web"));
        assert_eq!(c.maps_api_key.as_deref(), Some("k"));
        assert_eq!(c.map.zoom, 7);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let c = AppCfg::from_lookup(|k| (k == "GOOGLE_API_KEY").then(|| "  ".to_string()));
        assert!(c.maps_api_key.is_none());
    }
}
