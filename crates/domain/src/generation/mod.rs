//! Generation forms, model catalogue and response handling

mod forms;
mod models;
mod result;

pub use forms::{
    GenerationForm, ImageSource, ImageToImageForm, TextToImageForm, VideoGenerationForm,
};
pub use models::{
    IMAGE_MODELS, ModelOption, VIDEO_MODELS, available_models, catalogue, resolve_model,
};
pub use result::{extract_image_urls, extract_result_urls, extract_video_url};
