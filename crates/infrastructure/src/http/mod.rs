//! HTTP infrastructure utilities.
//!
//! This module provides:
//! - Multipart form building from request parts
//! - Loading local files as attachments

mod body_builder;

pub use body_builder::{BodyBuildError, build_multipart_form, load_attachment};
