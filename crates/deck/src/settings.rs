//! Image generation settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeckError;

/// Text-to-image model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageModel {
    #[default]
    #[serde(rename = "gemini-2.5-flash-image")]
    Flash25Image,
    #[serde(rename = "gemini-3-pro-image-preview")]
    Pro3ImagePreview,
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Tall9x16,
}

/// Output resolution; only honored by [`ImageModel::Pro3ImagePreview`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageModel {
    pub const ALL: [ImageModel; 2] = [ImageModel::Flash25Image, ImageModel::Pro3ImagePreview];

    /// API identifier used in the request path.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageModel::Flash25Image => "gemini-2.5-flash-image",
            ImageModel::Pro3ImagePreview => "gemini-3-pro-image-preview",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ImageModel::Flash25Image => "Nano Banana (2.5 Flash Image)",
            ImageModel::Pro3ImagePreview => "Nano Banana Pro (3 Pro Image)",
        }
    }

    /// Whether requests for this model carry an `imageSize`.
    pub fn supports_image_size(self) -> bool {
        matches!(self, ImageModel::Pro3ImagePreview)
    }
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 6] = [
        AspectRatio::Portrait3x4,
        AspectRatio::Portrait4x5,
        AspectRatio::Portrait2x3,
        AspectRatio::Square,
        AspectRatio::Landscape16x9,
        AspectRatio::Tall9x16,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Portrait4x5 => "4:5",
            AspectRatio::Portrait2x3 => "2:3",
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Tall9x16 => "9:16",
        }
    }
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [ImageSize::OneK, ImageSize::TwoK, ImageSize::FourK];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }
}

macro_rules! str_enum_impls {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DeckError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| DeckError::UnknownOption {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

str_enum_impls!(ImageModel, "model");
str_enum_impls!(AspectRatio, "aspect ratio");
str_enum_impls!(ImageSize, "image size");

/// Settings for the external image generation API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub api_key: String,
    pub model: ImageModel,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
}

impl AiSettings {
    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Persisted settings as written by any version; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAiSettings {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    aspect_ratio: Option<String>,
    #[serde(default)]
    image_size: Option<String>,
}

/// Serializes settings as compact JSON.
pub fn serialize_ai_settings(settings: &AiSettings) -> String {
    // Four plain string fields always serialize.
    serde_json::to_string(settings).unwrap_or_else(|_| String::from("{}"))
}

/// Parses a settings snapshot, filling missing, empty or unknown values
/// with defaults.
///
/// Returns `None` for non-JSON text, a non-object document, or fields that
/// are present with a non-string type.
pub fn parse_ai_settings(text: &str) -> Option<AiSettings> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    if !value.is_object() {
        return None;
    }
    let stored: StoredAiSettings = serde_json::from_value(value).ok()?;
    Some(AiSettings {
        api_key: stored.api_key.unwrap_or_default(),
        model: parse_or_default(stored.model),
        aspect_ratio: parse_or_default(stored.aspect_ratio),
        image_size: parse_or_default(stored.image_size),
    })
}

fn parse_or_default<T: FromStr + Default>(raw: Option<String>) -> T {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = AiSettings::default();
        assert_eq!(s.model.as_str(), "gemini-2.5-flash-image");
        assert_eq!(s.aspect_ratio.as_str(), "3:4");
        assert_eq!(s.image_size.as_str(), "1K");
        assert!(!s.has_api_key());
    }

    #[test]
    fn serializes_with_wire_values() {
        let s = AiSettings {
            api_key: "k".into(),
            model: ImageModel::Pro3ImagePreview,
            aspect_ratio: AspectRatio::Landscape16x9,
            image_size: ImageSize::FourK,
        };
        let json = serialize_ai_settings(&s);
        assert_eq!(
            json,
            r#"{"apiKey":"k","model":"gemini-3-pro-image-preview","aspectRatio":"16:9","imageSize":"4K"}"#
        );
        assert_eq!(parse_ai_settings(&json), Some(s));
    }

    #[test]
    fn fills_missing_and_empty_fields() {
        let s = parse_ai_settings(r#"{"apiKey":"abc","model":"","aspectRatio":"1:1"}"#).unwrap();
        assert_eq!(s.api_key, "abc");
        assert_eq!(s.model, ImageModel::Flash25Image);
        assert_eq!(s.aspect_ratio, AspectRatio::Square);
        assert_eq!(s.image_size, ImageSize::OneK);

        assert_eq!(parse_ai_settings("{}"), Some(AiSettings::default()));
        assert_eq!(
            parse_ai_settings(r#"{"apiKey":null}"#),
            Some(AiSettings::default())
        );
    }

    #[test]
    fn unknown_values_fall_back() {
        let s = parse_ai_settings(r#"{"model":"dall-e","imageSize":"8K"}"#).unwrap();
        assert_eq!(s.model, ImageModel::Flash25Image);
        assert_eq!(s.image_size, ImageSize::OneK);
    }

    #[test]
    fn rejects_bad_documents() {
        assert_eq!(parse_ai_settings("nope"), None);
        assert_eq!(parse_ai_settings("null"), None);
        assert_eq!(parse_ai_settings("[]"), None);
        assert_eq!(parse_ai_settings(r#"{"apiKey":42}"#), None);
    }

    #[test]
    fn from_str_roundtrip_and_errors() {
        for m in ImageModel::ALL {
            assert_eq!(m.as_str().parse::<ImageModel>().unwrap(), m);
        }
        for r in AspectRatio::ALL {
            assert_eq!(r.to_string().parse::<AspectRatio>().unwrap(), r);
        }
        let err = "5:7".parse::<AspectRatio>().unwrap_err();
        assert_eq!(err.to_string(), "unknown aspect ratio: 5:7");
    }

    #[test]
    fn only_pro_model_takes_image_size() {
        assert!(ImageModel::Pro3ImagePreview.supports_image_size());
        assert!(!ImageModel::Flash25Image.supports_image_size());
    }

    #[test]
    fn has_api_key_trims() {
        let s = AiSettings {
            api_key: "   ".into(),
            ..Default::default()
        };
        assert!(!s.has_api_key());
    }
}
