//! Model catalogue per region.

use crate::history::GenerationType;
use crate::settings::Region;

/// A selectable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    /// Identifier sent to the API.
    pub value: &'static str,
    /// Regions where the model is not offered.
    pub disabled_in: &'static [Region],
}

impl ModelOption {
    /// Returns true if the model can be used in `region`.
    #[must_use]
    pub fn is_available_in(&self, region: Region) -> bool {
        !self.disabled_in.contains(&region)
    }
}

/// Image models, shared by text-to-image and image-to-image.
pub const IMAGE_MODELS: &[ModelOption] = &[
    ModelOption {
        value: "jimeng-4.0",
        disabled_in: &[],
    },
    ModelOption {
        value: "jimeng-4.1",
        disabled_in: &[Region::International],
    },
    ModelOption {
        value: "nanobanana",
        disabled_in: &[Region::Cn],
    },
    ModelOption {
        value: "nanobananapro",
        disabled_in: &[Region::Cn],
    },
];

/// Video models.
pub const VIDEO_MODELS: &[ModelOption] = &[
    ModelOption {
        value: "jimeng-video-3.0",
        disabled_in: &[],
    },
    ModelOption {
        value: "jimeng-video-3.0-pro",
        disabled_in: &[],
    },
    ModelOption {
        value: "jimeng-video-3.0-fast",
        disabled_in: &[Region::International],
    },
];

/// Returns the full catalogue for a generation kind.
#[must_use]
pub const fn catalogue(kind: GenerationType) -> &'static [ModelOption] {
    match kind {
        GenerationType::TextToImage | GenerationType::ImageToImage => IMAGE_MODELS,
        GenerationType::VideoGeneration => VIDEO_MODELS,
    }
}

/// Returns the models offered in `region` for a generation kind.
#[must_use]
pub fn available_models(kind: GenerationType, region: Region) -> Vec<&'static ModelOption> {
    catalogue(kind)
        .iter()
        .filter(|model| model.is_available_in(region))
        .collect()
}

/// Returns `requested` if it is offered in `region`, otherwise the first offered model.
#[must_use]
pub fn resolve_model(kind: GenerationType, region: Region, requested: &str) -> String {
    let available = available_models(kind, region);
    if available.iter().any(|model| model.value == requested) {
        return requested.to_string();
    }
    available
        .first()
        .map_or_else(|| requested.to_string(), |model| model.value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn international_image_models() {
        let values: Vec<_> = available_models(GenerationType::TextToImage, Region::International)
            .iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(values, vec!["jimeng-4.0", "nanobanana", "nanobananapro"]);
    }

    #[test]
    fn cn_video_models_include_fast() {
        let values: Vec<_> = available_models(GenerationType::VideoGeneration, Region::Cn)
            .iter()
            .map(|m| m.value)
            .collect();
        assert!(values.contains(&"jimeng-video-3.0-fast"));
    }

    #[test]
    fn unavailable_model_falls_back_to_first() {
        assert_eq!(
            resolve_model(GenerationType::ImageToImage, Region::Cn, "nanobanana"),
            "jimeng-4.0"
        );
        assert_eq!(
            resolve_model(GenerationType::ImageToImage, Region::Cn, "jimeng-4.1"),
            "jimeng-4.1"
        );
        assert_eq!(
            resolve_model(
                GenerationType::VideoGeneration,
                Region::International,
                "jimeng-video-3.0-fast"
            ),
            "jimeng-video-3.0"
        );
    }
}
