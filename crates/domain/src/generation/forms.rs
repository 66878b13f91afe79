//! Generation form values.
//!
//! Each form knows how to present itself as a JSON object, as an ordered
//! list of stringified scalar fields for multipart encoding, and as a
//! history snapshot with every binary attachment replaced by `null`.

use serde_json::{Map, Value, json};

use crate::error::{DomainError, DomainResult};
use crate::history::GenerationType;
use crate::request::FileAttachment;

/// A reference image (or video frame) given either by URL or as an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Remote URL, possibly still empty while the user is typing.
    Url(String),
    /// Local file content. `url` keeps whatever the entry's URL field held.
    File {
        /// Uploaded content.
        attachment: FileAttachment,
        /// URL text left on the entry, usually empty.
        url: String,
    },
}

impl ImageSource {
    /// Creates a URL source.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Creates a file source with an empty URL field.
    #[must_use]
    pub const fn file(attachment: FileAttachment) -> Self {
        Self::File {
            attachment,
            url: String::new(),
        }
    }

    /// Returns true if the entry contributes to the request.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        match self {
            Self::Url(url) => !url.is_empty(),
            Self::File { .. } => true,
        }
    }

    /// Returns true if the entry holds binary content.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the non-empty URL, if this is a URL entry.
    #[must_use]
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) if !url.is_empty() => Some(url),
            Self::Url(_) | Self::File { .. } => None,
        }
    }

    /// Snapshot stored in history: the file handle is never persisted.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        match self {
            Self::Url(url) => json!({ "type": "url", "url": url, "file": null }),
            Self::File { url, .. } => json!({ "type": "file", "url": url, "file": null }),
        }
    }
}

fn url_list(sources: &[ImageSource]) -> Value {
    Value::Array(
        sources
            .iter()
            .filter_map(ImageSource::as_url)
            .map(|url| Value::String(url.to_string()))
            .collect(),
    )
}

fn require_prompt(prompt: &str) -> DomainResult<()> {
    if prompt.trim().is_empty() {
        return Err(DomainError::Validation("prompt is required".to_string()));
    }
    Ok(())
}

fn require_strength(strength: f64) -> DomainResult<()> {
    if !(0.0..=1.0).contains(&strength) {
        return Err(DomainError::Validation(format!(
            "sample strength must be between 0 and 1, got {strength}"
        )));
    }
    Ok(())
}

fn insert_negative_prompt(object: &mut Map<String, Value>, negative_prompt: Option<&String>) {
    if let Some(negative) = negative_prompt {
        object.insert("negative_prompt".to_string(), Value::String(negative.clone()));
    }
}

/// Text-to-image form.
#[derive(Debug, Clone, PartialEq)]
pub struct TextToImageForm {
    /// Model identifier.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Negative prompt; `None` when the field is not part of the form.
    pub negative_prompt: Option<String>,
    /// Aspect ratio, e.g. `1:1`.
    pub ratio: String,
    /// Output resolution, e.g. `1k`.
    pub resolution: String,
    /// Sampling strength in `[0, 1]`.
    pub sample_strength: f64,
}

impl Default for TextToImageForm {
    fn default() -> Self {
        Self {
            model: "jimeng-4.0".to_string(),
            prompt: String::new(),
            negative_prompt: Some(String::new()),
            ratio: "1:1".to_string(),
            resolution: "1k".to_string(),
            sample_strength: 0.5,
        }
    }
}

impl TextToImageForm {
    fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("model".to_string(), json!(self.model));
        object.insert("prompt".to_string(), json!(self.prompt));
        insert_negative_prompt(&mut object, self.negative_prompt.as_ref());
        object.insert("ratio".to_string(), json!(self.ratio));
        object.insert("resolution".to_string(), json!(self.resolution));
        object.insert("sampleStrength".to_string(), json!(self.sample_strength));
        Value::Object(object)
    }
}

/// Image-to-image form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageToImageForm {
    /// Model identifier.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Negative prompt; `None` when the field is not part of the form.
    pub negative_prompt: Option<String>,
    /// Reference images in order.
    pub images: Vec<ImageSource>,
    /// Aspect ratio.
    pub ratio: String,
    /// Output resolution.
    pub resolution: String,
    /// Sampling strength in `[0, 1]`.
    pub sample_strength: f64,
    /// Let the server pick the ratio from the references.
    pub intelligent_ratio: bool,
}

impl Default for ImageToImageForm {
    fn default() -> Self {
        Self {
            model: "jimeng-4.0".to_string(),
            prompt: String::new(),
            negative_prompt: Some(String::new()),
            images: vec![ImageSource::url("")],
            ratio: "1:1".to_string(),
            resolution: "1k".to_string(),
            sample_strength: 0.5,
            intelligent_ratio: false,
        }
    }
}

impl ImageToImageForm {
    fn object_with(&self, images: Value) -> Value {
        let mut object = Map::new();
        object.insert("model".to_string(), json!(self.model));
        object.insert("prompt".to_string(), json!(self.prompt));
        insert_negative_prompt(&mut object, self.negative_prompt.as_ref());
        object.insert("images".to_string(), images);
        object.insert("ratio".to_string(), json!(self.ratio));
        object.insert("resolution".to_string(), json!(self.resolution));
        object.insert("sampleStrength".to_string(), json!(self.sample_strength));
        object.insert("intelligentRatio".to_string(), json!(self.intelligent_ratio));
        Value::Object(object)
    }
}

/// Video generation form.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoGenerationForm {
    /// Model identifier.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Aspect ratio, e.g. `16:9`.
    pub ratio: String,
    /// Output resolution, e.g. `720p`.
    pub resolution: String,
    /// Clip length in seconds.
    pub duration: u32,
    /// Optional key frames in order.
    pub file_paths: Vec<ImageSource>,
}

impl Default for VideoGenerationForm {
    fn default() -> Self {
        Self {
            model: "jimeng-video-3.0".to_string(),
            prompt: String::new(),
            ratio: "16:9".to_string(),
            resolution: "720p".to_string(),
            duration: 5,
            file_paths: Vec::new(),
        }
    }
}

impl VideoGenerationForm {
    fn object_with(&self, file_paths: Value) -> Value {
        json!({
            "model": self.model,
            "prompt": self.prompt,
            "ratio": self.ratio,
            "resolution": self.resolution,
            "duration": self.duration,
            "filePaths": file_paths,
        })
    }
}

/// Any of the generation forms.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationForm {
    /// Text-to-image.
    TextToImage(TextToImageForm),
    /// Image-to-image.
    ImageToImage(ImageToImageForm),
    /// Video generation.
    Video(VideoGenerationForm),
}

impl GenerationForm {
    /// Returns the generation kind.
    #[must_use]
    pub const fn kind(&self) -> GenerationType {
        match self {
            Self::TextToImage(_) => GenerationType::TextToImage,
            Self::ImageToImage(_) => GenerationType::ImageToImage,
            Self::Video(_) => GenerationType::VideoGeneration,
        }
    }

    /// Returns the selected model.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::TextToImage(form) => &form.model,
            Self::ImageToImage(form) => &form.model,
            Self::Video(form) => &form.model,
        }
    }

    /// Replaces the selected model.
    pub fn set_model(&mut self, model: impl Into<String>) {
        let model = model.into();
        match self {
            Self::TextToImage(form) => form.model = model,
            Self::ImageToImage(form) => form.model = model,
            Self::Video(form) => form.model = model,
        }
    }

    /// Returns the prompt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::TextToImage(form) => &form.prompt,
            Self::ImageToImage(form) => &form.prompt,
            Self::Video(form) => &form.prompt,
        }
    }

    /// Returns the image entries of the form's repeatable field.
    #[must_use]
    pub fn image_sources(&self) -> &[ImageSource] {
        match self {
            Self::TextToImage(_) => &[],
            Self::ImageToImage(form) => &form.images,
            Self::Video(form) => &form.file_paths,
        }
    }

    /// Returns true if any image entry holds a binary attachment.
    #[must_use]
    pub fn has_file(&self) -> bool {
        self.image_sources().iter().any(ImageSource::is_file)
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` describing the first missing or
    /// out-of-range field.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Self::TextToImage(form) => {
                require_prompt(&form.prompt)?;
                require_strength(form.sample_strength)
            }
            Self::ImageToImage(form) => {
                require_prompt(&form.prompt)?;
                require_strength(form.sample_strength)?;
                if !form.images.iter().any(ImageSource::is_usable) {
                    return Err(DomainError::Validation(
                        "at least one reference image is required".to_string(),
                    ));
                }
                Ok(())
            }
            Self::Video(_) => Ok(()),
        }
    }

    /// JSON request body: every field, image lists collapsed to their URLs.
    #[must_use]
    pub fn json_body(&self) -> Value {
        match self {
            Self::TextToImage(form) => form.to_json(),
            Self::ImageToImage(form) => form.object_with(url_list(&form.images)),
            Self::Video(form) => form.object_with(url_list(&form.file_paths)),
        }
    }

    /// Stringified scalar fields in multipart order.
    ///
    /// Empty optional text fields are left out.
    #[must_use]
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("model", self.model().to_string()), ("prompt", self.prompt().to_string())];
        match self {
            Self::TextToImage(form) => {
                push_negative(&mut fields, form.negative_prompt.as_deref());
                fields.push(("ratio", form.ratio.clone()));
                fields.push(("resolution", form.resolution.clone()));
                fields.push(("sampleStrength", form.sample_strength.to_string()));
            }
            Self::ImageToImage(form) => {
                push_negative(&mut fields, form.negative_prompt.as_deref());
                fields.push(("ratio", form.ratio.clone()));
                fields.push(("resolution", form.resolution.clone()));
                fields.push(("sampleStrength", form.sample_strength.to_string()));
                fields.push(("intelligentRatio", form.intelligent_ratio.to_string()));
            }
            Self::Video(form) => {
                fields.push(("ratio", form.ratio.clone()));
                fields.push(("resolution", form.resolution.clone()));
                fields.push(("duration", form.duration.to_string()));
            }
        }
        fields
    }

    /// Form values as persisted in a history record.
    #[must_use]
    pub fn params_snapshot(&self) -> Value {
        let snapshot = |sources: &[ImageSource]| {
            Value::Array(sources.iter().map(ImageSource::snapshot).collect())
        };
        match self {
            Self::TextToImage(form) => form.to_json(),
            Self::ImageToImage(form) => form.object_with(snapshot(&form.images)),
            Self::Video(form) => form.object_with(snapshot(&form.file_paths)),
        }
    }
}

fn push_negative(fields: &mut Vec<(&'static str, String)>, negative_prompt: Option<&str>) {
    if let Some(negative) = negative_prompt.filter(|n| !n.is_empty()) {
        fields.push(("negative_prompt", negative.to_string()));
    }
}
