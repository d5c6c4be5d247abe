pub mod client;
pub mod map;

pub use client::{fetch_records, DATA_PATH};
pub use map::{markers_from_records, parse_float, MapView};
