pub mod records;

pub use records::{load_records, parse_records_csv};
