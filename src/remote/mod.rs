//! Remote Store Layer
//!
//! Client-side access to the three remote tables. The abstract interface
//! is [`StoreClient`]; implementations cover the hosted REST store and an
//! in-memory stand-in for tests and offline runs.

mod http;
mod memory;
mod traits;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use traits::StoreClient;
