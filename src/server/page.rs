//! page.rs
//!
//! Página del mapa servida en `/`.
//!
//! - Carga el widget de mapas con la API key del entorno
//! - Pide `/api/criminalgroups` una vez y pinta un pin por registro
//! - Click en un pin: panel lateral con `gang_name` y las cuatro tarjetas
//!
//! Centro, zoom y tarjetas salen de `MapCfg` / `DETAIL_CARDS`, los mismos
//! que usa `view::MapView`.

use serde::Serialize;

use crate::models::types::{AppCfg, CardSpec, LatLng, DETAIL_CARDS, LAT_FIELD, LNG_FIELD, TITLE_FIELD};
use crate::view::DATA_PATH;

#[derive(Serialize)]
struct PageCfg<'a> {
    endpoint: &'a str,
    center: LatLng,
    zoom: u8,
    min_zoom: u8,
    api_key: Option<&'a str>,
    title_field: &'a str,
    lat_field: &'a str,
    lng_field: &'a str,
    cards: &'a [CardSpec],
}

pub fn render_index(cfg: &AppCfg) -> String {
    let page = PageCfg {
        endpoint: DATA_PATH,
        center: cfg.map.center,
        zoom: cfg.map.zoom,
        min_zoom: cfg.map.min_zoom,
        api_key: cfg.maps_api_key.as_deref(),
        title_field: TITLE_FIELD,
        lat_field: LAT_FIELD,
        lng_field: LNG_FIELD,
        cards: &DETAIL_CARDS,
    };
    // serializar un struct de campos simples no falla
    let json = serde_json::to_string(&page).unwrap_or_else(|_| "{}".into());
    INDEX_HTML.replace("__PAGE_CFG__", &json.replace("</", "<\\/"))
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Criminal groups map</title>
<style>
  html, body { margin: 0; height: 100%; font-family: system-ui, sans-serif; }
  #map { width: 100vw; height: 100vh; }
  #sheet { position: fixed; top: 0; right: 0; width: 500px; max-width: 100vw; height: 100vh;
           background: #fff; box-shadow: -4px 0 16px rgba(0,0,0,.2); padding: 24px;
           box-sizing: border-box; overflow-y: auto; transform: translateX(100%);
           transition: transform .2s ease-out; }
  #sheet.open { transform: none; }
  #sheet-close { position: absolute; top: 12px; right: 12px; border: 0; background: none;
                 font-size: 20px; cursor: pointer; }
  #sheet-title { font-size: 1.5rem; font-weight: 700; margin: 0 0 16px; }
  .card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 12px 16px; margin-bottom: 8px; color: #374151; }
  .card-label { font-size: .875rem; font-weight: 500; }
  .card-value { font-size: 1.5rem; font-weight: 700; }
</style>
</head>
<body>
<div id="map"></div>
<aside id="sheet" aria-hidden="true">
  <button id="sheet-close" aria-label="Close">&times;</button>
  <h2 id="sheet-title"></h2>
  <div id="sheet-cards"></div>
</aside>
<script>
const CFG = __PAGE_CFG__;
let map = null;
let selected = null;

const sheet = document.getElementById("sheet");

function closePanel() {
  sheet.classList.remove("open");
  sheet.setAttribute("aria-hidden", "true");
  selected = null;
}

function openPanel(marker) {
  selected = marker.details;
  document.getElementById("sheet-title").textContent = selected[CFG.title_field] ?? "";
  const cards = document.getElementById("sheet-cards");
  cards.replaceChildren();
  for (const c of CFG.cards) {
    const el = document.createElement("div");
    el.className = "card";
    const label = document.createElement("div");
    label.className = "card-label";
    label.textContent = c.label;
    const value = document.createElement("div");
    value.className = "card-value";
    value.textContent = selected[c.field] ?? "";
    el.append(label, value);
    cards.append(el);
  }
  map.setCenter({ lat: marker.lat, lng: marker.lng });
  sheet.classList.add("open");
  sheet.setAttribute("aria-hidden", "false");
}

async function loadMarkers() {
  try {
    const resp = await fetch(CFG.endpoint);
    const data = await resp.json();
    const markers = data.map((row) => ({
      lat: parseFloat(row[CFG.lat_field]),
      lng: parseFloat(row[CFG.lng_field]),
      details: row,
    }));
    for (const m of markers) {
      if (!Number.isFinite(m.lat) || !Number.isFinite(m.lng)) continue;
      const pin = new google.maps.Marker({ position: { lat: m.lat, lng: m.lng }, map });
      pin.addListener("click", () => openPanel(m));
    }
  } catch (error) {
    console.error("Failed to load markers", error);
  }
}

function initMap() {
  map = new google.maps.Map(document.getElementById("map"), {
    center: CFG.center,
    zoom: CFG.zoom,
    minZoom: CFG.min_zoom,
  });
  loadMarkers();
}

document.getElementById("sheet-close").addEventListener("click", closePanel);
document.addEventListener("keydown", (e) => { if (e.key === "Escape") closePanel(); });

if (CFG.api_key) {
  const s = document.createElement("script");
  s.src = "https://maps.googleapis.com/maps/api/js?key=" + encodeURIComponent(CFG.api_key) + "&callback=initMap";
  s.async = true;
  document.head.append(s);
}
</script>
</body>
</html>
"#;
