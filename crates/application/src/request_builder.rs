//! Request descriptor builder
//!
//! Turns form values and the active endpoint configuration into a
//! [`RequestDescriptor`]. Forms without binary attachments are sent as JSON;
//! any attachment switches the whole request to multipart with the model id
//! repeated in the query string.

use jimeng_domain::{
    EnvConfig, GenerationForm, GenerationType, HttpMethod, ImageSource, Part, RequestBody,
    RequestDescriptor,
};
use serde_json::json;

/// Text-to-image endpoint.
pub const TEXT_TO_IMAGE_PATH: &str = "/v1/images/generations";
/// Image-to-image endpoint.
pub const IMAGE_TO_IMAGE_PATH: &str = "/v1/images/compositions";
/// Video endpoint.
pub const VIDEO_PATH: &str = "/v1/videos/generations";
/// Token validity check.
pub const TOKEN_CHECK_PATH: &str = "/token/check";
/// Remaining credit lookup.
pub const TOKEN_POINTS_PATH: &str = "/token/points";
/// Model listing.
pub const MODELS_PATH: &str = "/v1/models";

/// Returns the endpoint path for a generation type.
#[must_use]
pub const fn generation_path(kind: GenerationType) -> &'static str {
    match kind {
        GenerationType::TextToImage => TEXT_TO_IMAGE_PATH,
        GenerationType::ImageToImage => IMAGE_TO_IMAGE_PATH,
        GenerationType::VideoGeneration => VIDEO_PATH,
    }
}

/// Builds the request for a generation form.
///
/// The form is expected to be validated already.
#[must_use]
pub fn build_generation_request(config: &EnvConfig, form: &GenerationForm) -> RequestDescriptor {
    let url = config.endpoint(generation_path(form.kind()));

    if !form.has_file() {
        return RequestDescriptor::new(HttpMethod::Post, url)
            .with_bearer_token(&config.token)
            .with_body(RequestBody::Json(form.json_body()));
    }

    let url = with_model_query(url, form.model());
    RequestDescriptor::new(HttpMethod::Post, url)
        .with_bearer_token(&config.token)
        .with_body(RequestBody::Multipart {
            parts: multipart_parts(form),
        })
}

fn with_model_query(url: String, model: &str) -> String {
    match serde_urlencoded::to_string([("model", model)]) {
        Ok(query) => format!("{url}?{query}"),
        Err(_) => url,
    }
}

fn multipart_parts(form: &GenerationForm) -> Vec<Part> {
    let mut parts: Vec<Part> = form
        .text_fields()
        .into_iter()
        .map(|(name, value)| Part::text(name, value))
        .collect();

    let is_video = form.kind() == GenerationType::VideoGeneration;
    for (index, source) in form.image_sources().iter().enumerate() {
        match source {
            ImageSource::Url(url) if url.is_empty() => {}
            ImageSource::Url(url) => {
                let name = if is_video { "filePaths" } else { "images" };
                parts.push(Part::text(name, url.clone()));
            }
            ImageSource::File { attachment, .. } => {
                let name = if is_video {
                    format!("image_file_{}", index + 1)
                } else {
                    "images".to_string()
                };
                parts.push(Part::file(name, attachment.clone()));
            }
        }
    }
    parts
}

/// Builds `POST /token/check` with the token as JSON body.
#[must_use]
pub fn build_token_check_request(config: &EnvConfig) -> RequestDescriptor {
    token_request(config, TOKEN_CHECK_PATH)
}

/// Builds `POST /token/points` with the token as JSON body.
#[must_use]
pub fn build_token_points_request(config: &EnvConfig) -> RequestDescriptor {
    token_request(config, TOKEN_POINTS_PATH)
}

fn token_request(config: &EnvConfig, path: &str) -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Post, config.endpoint(path))
        .with_bearer_token(&config.token)
        .with_body(RequestBody::Json(json!({ "token": config.token })))
}

/// Builds `GET /v1/models`.
#[must_use]
pub fn build_models_request(config: &EnvConfig) -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Get, config.endpoint(MODELS_PATH))
        .with_bearer_token(&config.token)
}
