//! Bot conversation state
//!
//! Chat-scoped state values backed by the key-value store.

pub mod storage;

pub use storage::StateStorage;
