//! Jimeng Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus curl rendering.

pub mod adapters;
pub mod codegen;
pub mod http;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestTransport, SystemClock};
pub use codegen::{DEFAULT_FILE_PLACEHOLDER, render_curl};
pub use http::{BodyBuildError, build_multipart_form, load_attachment};
pub use persistence::FileKeyValueStore;
pub use serialization::{
    SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
