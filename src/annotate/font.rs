//! Legend font
//!
//! A configured TrueType/OpenType font when it loads, the embedded DejaVu Sans
//! otherwise. Load failures of the configured font are logged and recovered.

use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use thiserror::Error;

/// Pixel size for legend text
pub const FONT_SIZE: f32 = 16.0;

static EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ab_glyph::InvalidFont,
    },

    #[error("Embedded font is invalid: {0}")]
    Embedded(#[source] ab_glyph::InvalidFont),
}

/// Where the legend font came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Embedded,
    File(PathBuf),
}

/// Font used for legend entries
#[derive(Clone)]
pub struct LegendFont {
    font: FontArc,
    scale: PxScale,
    source: FontSource,
}

impl std::fmt::Debug for LegendFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegendFont")
            .field("source", &self.source)
            .field("scale", &self.scale.y)
            .finish_non_exhaustive()
    }
}

impl LegendFont {
    /// Load the configured font, falling back to the embedded one
    pub fn load(path: Option<&Path>) -> Result<Self, FontError> {
        let Some(path) = path else {
            tracing::debug!("No legend font configured, using embedded font");
            return Self::embedded();
        };

        match Self::from_file(path) {
            Ok(font) => {
                tracing::info!(path = %path.display(), "Loaded legend font");
                Ok(font)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Legend font unavailable, falling back to embedded font");
                Self::embedded()
            }
        }
    }

    /// The DejaVu Sans face compiled into the binary
    pub fn embedded() -> Result<Self, FontError> {
        let font = FontArc::try_from_slice(EMBEDDED_FONT).map_err(FontError::Embedded)?;
        Ok(Self::new(font, FontSource::Embedded))
    }

    /// Load a TrueType/OpenType font from disk
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let font = FontArc::try_from_vec(data).map_err(|source| FontError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(font, FontSource::File(path.to_path_buf())))
    }

    fn new(font: FontArc, source: FontSource) -> Self {
        Self {
            font,
            scale: PxScale::from(FONT_SIZE),
            source,
        }
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Draw a single line of text with its top-left corner at `(x, y)`
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}
