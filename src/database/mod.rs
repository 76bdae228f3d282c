pub mod manager;
pub mod memoizer;
pub mod memory;
pub mod models;
pub mod store;

pub use manager::{Database, DatabaseError, PgConnector, PgSettings};
pub use memoizer::{ConnectionMemoizer, ConnectionState, Connector};
pub use memory::MemoryStore;
pub use store::{PgStore, Store};
