//! map.rs
//!
//! Estado de la vista de mapa: marcadores, centro, selección y panel lateral.
//!
//! Es el mismo flujo que ejecuta la página en el navegador
//! (carga → marcadores → click → panel → cerrar), sin el widget.

use crate::models::types::{DetailPanel, LatLng, MapCfg, Marker, Record, LAT_FIELD, LNG_FIELD};

/// Espacios que `parseFloat` salta: categoría Zs, terminadores de línea y BOM.
/// No coincide con `char::is_whitespace` (U+0085 no cuenta en JS).
fn is_js_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{b}' | '\u{c}' | '\r' | ' ' | '\u{a0}' | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}' | '\u{2029}' | '\u{202f}' | '\u{205f}' | '\u{3000}' | '\u{feff}'
    )
}

/// `parseFloat` de JS: salta espacios iniciales y usa el prefijo numérico
/// más largo. Sin prefijo válido devuelve NaN.
pub fn parse_float(s: &str) -> f64 {
    let s = s.trim_start_matches(is_js_space);
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') { i += 1; }
    if s[i..].starts_with("Infinity") {
        return if b.first() == Some(&b'-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() { i += 1; }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        digits += j - frac_start;
        i = j;
    }
    if digits == 0 { return f64::NAN; }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') { j += 1; }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        if j > exp_start { i = j; }
    }

    s[..i].parse().unwrap_or(f64::NAN)
}

impl Marker {
    pub fn from_record(details: Record) -> Self {
        let coord = |k: &str| details.get(k).map(parse_float).unwrap_or(f64::NAN);
        let (lat, lng) = (coord(LAT_FIELD), coord(LNG_FIELD));
        Marker { lat, lng, details }
    }
}

pub fn markers_from_records(records: Vec<Record>) -> Vec<Marker> {
    records.into_iter().map(Marker::from_record).collect()
}

#[derive(Clone, Debug)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    markers: Vec<Marker>,
    selected: Option<Record>,
    panel_open: bool,
}

impl MapView {
    pub fn new(cfg: &MapCfg) -> Self {
        Self {
            center: cfg.center,
            zoom: cfg.zoom,
            min_zoom: cfg.min_zoom,
            markers: Vec::new(),
            selected: None,
            panel_open: false,
        }
    }

    pub fn set_records(&mut self, records: Vec<Record>) {
        self.markers = markers_from_records(records);
    }

    pub fn markers(&self) -> &[Marker] { &self.markers }

    /// Solo los que el widget llega a pintar; el índice es el de `markers()`.
    pub fn visible_markers(&self) -> impl Iterator<Item = (usize, &Marker)> {
        self.markers.iter().enumerate().filter(|(_, m)| m.is_visible())
    }

    /// Abre el panel con el registro del marcador y centra el mapa en él.
    /// Un índice fuera de rango o un marcador no visible no cambia nada.
    pub fn click_marker(&mut self, idx: usize) -> Option<DetailPanel> {
        let m = self.markers.get(idx).filter(|m| m.is_visible())?;
        self.center = m.position();
        self.selected = Some(m.details.clone());
        self.panel_open = true;
        self.panel()
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Record> { self.selected.as_ref() }

    pub fn is_panel_open(&self) -> bool { self.panel_open }

    pub fn panel(&self) -> Option<DetailPanel> {
        if !self.panel_open { return None; }
        self.selected.as_ref().map(DetailPanel::for_record)
    }
}
