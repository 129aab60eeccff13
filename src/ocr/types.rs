//! OCR Types
//!
//! Raw block types as returned by the document-analysis service. Field names
//! follow the Textract wire format so saved `AnalyzeDocument` responses can be
//! deserialized directly.

use serde::{Deserialize, Serialize};

use crate::detection::PixelBox;

/// Block categories reported by the analysis service
pub mod block_type {
    pub const KEY_VALUE_SET: &str = "KEY_VALUE_SET";
    pub const WORD: &str = "WORD";
    pub const LINE: &str = "LINE";
    pub const PAGE: &str = "PAGE";
}

/// A full analysis response (`{"Blocks": [...]}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

/// One block as produced by the analysis service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl RawBlock {
    /// Build a block with text and a bounding box
    pub fn new(block_type: &str, text: Option<&str>, bounding_box: NormalizedBox) -> Self {
        Self {
            id: None,
            block_type: Some(block_type.to_string()),
            text: text.map(str::to_string),
            geometry: Some(Geometry {
                bounding_box: Some(bounding_box),
            }),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn bounding_box(&self) -> Option<&NormalizedBox> {
        self.geometry.as_ref()?.bounding_box.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<NormalizedBox>,
}

/// Bounding box as fractions of the image width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

impl NormalizedBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Convert to pixel coordinates given image dimensions
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> PixelBox {
        let width = f64::from(image_width);
        let height = f64::from(image_height);
        let left = self.left * width;
        let top = self.top * height;
        PixelBox {
            left,
            top,
            right: left + self.width * width,
            bottom: top + self.height * height,
        }
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Document analysis service call failed: {0}")]
    Api(String),

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),
}
