// Entrant Registry - Core Library
// Exposes the record store and request handler for the API server and tests

pub mod entrant;
pub mod error;
pub mod store;
pub mod handler;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod http;
#[cfg(feature = "server")]
pub mod telemetry;

// Re-export commonly used types
pub use entrant::{Entrant, EntrantId, Field, NewEntrant};
pub use error::{StoreError, StoreResult};
pub use store::{default_seed, EntrantStore, InMemoryEntrantStore};
pub use handler::{EntrantHandler, Reply};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
