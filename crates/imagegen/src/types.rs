//! Request and response types for the `generateContent` API.

use cardstudio_deck::{AiSettings, AspectRatio, ImageSize};
use serde::{Deserialize, Serialize};

/// Media type assumed when the response names none.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// A generated image carried inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub mime_type: String,
    /// Base64 image bytes, as returned by the API.
    pub data: String,
}

impl ImageRef {
    /// Formats the image as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 1],
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: AspectRatio,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<ImageSize>,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a single-turn image request. `imageSize` is only sent to
    /// models that accept it.
    pub(crate) fn new(prompt: &'a str, settings: &AiSettings) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["IMAGE"],
                image_config: ImageConfig {
                    aspect_ratio: settings.aspect_ratio,
                    image_size: settings
                        .model
                        .supports_image_size()
                        .then_some(settings.image_size),
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

/// A response part; the API has used both camelCase and snake_case names.
#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default, rename = "inlineData")]
    inline_data_camel: Option<InlineData>,
    #[serde(default, rename = "inline_data")]
    inline_data_snake: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
struct InlineData {
    #[serde(default)]
    data: Option<String>,
    #[serde(default, rename = "mimeType")]
    mime_type_camel: Option<String>,
    #[serde(default, rename = "mime_type")]
    mime_type_snake: Option<String>,
}

impl GenerateResponse {
    /// Extracts the first inline image of the first candidate.
    ///
    /// A part with `inlineData` wins over one with `inline_data`.
    pub(crate) fn into_image(self) -> Option<ImageRef> {
        let parts = self
            .candidates?
            .into_iter()
            .next()?
            .content?
            .parts
            .unwrap_or_default();

        let inline = match parts.iter().position(|p| p.inline_data_camel.is_some()) {
            Some(i) => parts.into_iter().nth(i)?.inline_data_camel?,
            None => parts.into_iter().find_map(|p| p.inline_data_snake)?,
        };

        let data = inline.data.filter(|d| !d.is_empty())?;
        let mime_type = [inline.mime_type_camel, inline.mime_type_snake]
            .into_iter()
            .flatten()
            .find(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        Some(ImageRef { mime_type, data })
    }
}
