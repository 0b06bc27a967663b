// Adapters layer: codecs and external sources around the scoring core.

pub mod csv_table;
pub mod http;
pub mod report;
