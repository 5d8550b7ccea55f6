//! Persistence layer: libSQL-backed storage for finished profiles.

pub mod libsql_backend;
pub mod migrations;
pub mod sink;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use sink::ProfileStoreSink;
pub use traits::ProfileStore;
