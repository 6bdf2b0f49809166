// Adapters layer: concrete implementations for external systems (http, files, database).

pub mod csv_sink;
pub mod database;
pub mod http;
pub mod storage;
