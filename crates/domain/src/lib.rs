//! Jimeng Domain - Core business types
//!
//! This crate defines the domain model of the generation console: regional
//! endpoint settings, generation forms, request descriptors, history
//! records and the submission state machine.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod generation;
pub mod history;
pub mod request;
pub mod settings;
pub mod state;

pub use error::{DomainError, DomainResult};
pub use generation::{
    GenerationForm, ImageSource, ImageToImageForm, TextToImageForm, VideoGenerationForm,
};
pub use history::{GenerationHistory, GenerationType, HistoryItem, NewHistoryItem};
pub use request::{
    FileAttachment, Header, HttpMethod, Part, PartValue, RequestBody, RequestDescriptor,
};
pub use settings::{ConfigMap, DEFAULT_BASE_URL, EnvConfig, Region, Settings};
pub use state::{SubmissionErrorKind, SubmissionState};
