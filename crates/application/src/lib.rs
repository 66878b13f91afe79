//! Jimeng Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (storage, clock, HTTP transport)
//! - Settings and history stores over the key-value port
//! - Request descriptor building
//! - Use case orchestration (generation submit, tools)

pub mod error;
pub mod history_store;
pub mod keys;
pub mod ports;
pub mod request_builder;
pub mod settings_store;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use history_store::HistoryStore;
pub use ports::{
    Clock, FixedClock, GenerationTransport, KeyValueStore, MemoryStore, StorageError,
    TransportError, TransportResponse,
};
pub use request_builder::build_generation_request;
pub use settings_store::SettingsStore;
pub use use_cases::{RunTool, SubmitError, SubmitGeneration, Tool};
