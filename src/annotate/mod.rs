//! Annotation Module
//!
//! Renders detections onto the source image so a reviewer can audit them:
//!
//! 1. A red outline around every detection box
//! 2. A white legend strip appended below the image
//! 3. One `label: text` entry per detection, laid out in a three-column grid
//!
//! The result is PNG-encoded once; callers decide whether it is written to
//! disk or base64-encoded for a response.

mod font;
mod layout;
mod render;

pub use font::{FontError, FontSource, LegendFont, FONT_SIZE};
pub use layout::LegendLayout;
pub use render::{draw_highlight, STROKE_WIDTH};

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use image::{imageops, ImageFormat, Rgb, RgbImage};
use thiserror::Error;

use crate::detection::DetectionSet;

pub const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LEGEND_TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode annotated image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Layout error: {0}")]
    Layout(String),
}

/// A decoded source image together with its original encoded bytes
#[derive(Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    pixels: RgbImage,
}

impl SourceImage {
    /// Decode an encoded image and convert it to 8-bit RGB
    pub fn decode(bytes: impl Into<Vec<u8>>) -> Result<Self, RenderError> {
        let bytes = bytes.into();
        let pixels = image::load_from_memory(&bytes)
            .map_err(RenderError::Decode)?
            .to_rgb8();

        Ok(Self { bytes, pixels })
    }

    /// The bytes as received, for the analysis service
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("encoded_len", &self.bytes.len())
            .field("dimensions", &self.pixels.dimensions())
            .finish()
    }
}

/// PNG-encoded annotated image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl AnnotatedImage {
    fn encode(canvas: &RgbImage) -> Result<Self, RenderError> {
        let mut png = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(RenderError::Encode)?;

        Ok(Self {
            png,
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Canvas dimensions, legend included
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }
}

/// Draws highlight boxes and the legend
#[derive(Debug, Clone)]
pub struct Annotator {
    font: LegendFont,
    layout: LegendLayout,
}

impl Annotator {
    pub fn new(font: LegendFont, layout: LegendLayout) -> Self {
        Self { font, layout }
    }

    /// Annotator with the default layout and the font at `font_path`, or the
    /// embedded font when that is unset or fails to load
    pub fn with_font_path(font_path: Option<&Path>) -> Result<Self, FontError> {
        Ok(Self::new(LegendFont::load(font_path)?, LegendLayout::default()))
    }

    /// Render `detections` onto `source` and encode the result as PNG
    pub fn annotate(
        &self,
        source: &SourceImage,
        detections: &DetectionSet,
    ) -> Result<AnnotatedImage, RenderError> {
        let canvas = self.render(source.pixels(), detections)?;
        AnnotatedImage::encode(&canvas)
    }

    /// Render without encoding
    pub fn render(
        &self,
        source: &RgbImage,
        detections: &DetectionSet,
    ) -> Result<RgbImage, RenderError> {
        let mut highlighted = source.clone();
        for detection in detections {
            draw_highlight(&mut highlighted, &detection.bbox, HIGHLIGHT_COLOR);
        }

        let (width, height) = highlighted.dimensions();
        let legend_height = self.layout.height(detections.len());
        let canvas_height = u32::try_from(u64::from(height) + legend_height).map_err(|_| {
            RenderError::Layout(format!(
                "legend for {} detections does not fit below a {}px image",
                detections.len(),
                height
            ))
        })?;

        let mut canvas = RgbImage::from_pixel(width, canvas_height, BACKGROUND_COLOR);
        imageops::replace(&mut canvas, &highlighted, 0, 0);

        for (index, detection) in detections.iter().enumerate() {
            let (x, y) = self.layout.cell_origin(index, width, height);
            let entry = format!("{}: {}", detection.label, detection.text);
            self.font.draw(&mut canvas, LEGEND_TEXT_COLOR, x, y, &entry);
        }

        tracing::debug!(
            width,
            height = canvas_height,
            detections = detections.len(),
            "Rendered annotated image"
        );

        Ok(canvas)
    }
}
