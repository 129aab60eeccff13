//! Detection Normalizer
//!
//! Turns the service's raw block sequence into a `DetectionSet`.

use thiserror::Error;

use crate::ocr::{block_type, RawBlock};

use super::DetectionSet;

/// Block categories that become detections (when they carry text)
pub const INCLUDED_BLOCK_TYPES: [&str; 2] = [block_type::KEY_VALUE_SET, block_type::WORD];

/// Validation errors for malformed analysis responses
#[derive(Debug, Error, PartialEq)]
pub enum DetectionError {
    #[error("Malformed block at position {index} (id: {}): {reason}", .id.as_deref().unwrap_or("none"))]
    MalformedBlock {
        index: usize,
        id: Option<String>,
        reason: &'static str,
    },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

impl DetectionError {
    fn malformed(index: usize, block: &RawBlock, reason: &'static str) -> Self {
        Self::MalformedBlock {
            index,
            id: block.id.clone(),
            reason,
        }
    }
}

/// Normalize raw blocks against an image of `width` x `height` pixels
///
/// Blocks are visited in the order received. Only text-bearing
/// `KEY_VALUE_SET` and `WORD` blocks are kept; each gets the next label. Any
/// malformed block aborts the whole run.
pub fn normalize(
    blocks: &[RawBlock],
    width: u32,
    height: u32,
) -> Result<DetectionSet, DetectionError> {
    if width == 0 || height == 0 {
        return Err(DetectionError::InvalidDimensions { width, height });
    }

    let mut entries = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        let category = block
            .block_type
            .as_deref()
            .ok_or_else(|| DetectionError::malformed(index, block, "missing block type"))?;

        if !INCLUDED_BLOCK_TYPES.contains(&category) {
            continue;
        }

        let text = match block.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => continue,
        };

        let bbox = block
            .bounding_box()
            .ok_or_else(|| DetectionError::malformed(index, block, "missing bounding box"))?;

        if !bbox.is_finite() {
            return Err(DetectionError::malformed(
                index,
                block,
                "non-finite bounding box",
            ));
        }

        entries.push((text.to_string(), bbox.to_pixels(width, height)));
    }

    tracing::debug!(
        blocks = blocks.len(),
        detections = entries.len(),
        "Normalized analysis blocks"
    );

    Ok(DetectionSet::from_entries(entries))
}
