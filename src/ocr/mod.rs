//! OCR Module
//!
//! Seam over the external document-analysis service. The service is treated
//! as a black box that returns blocks with normalized geometry, in whatever
//! order it chooses.
//!
//! Backends:
//! - Textract `AnalyzeDocument` with the `FORMS` feature
//! - Static replay of a saved response
//!
//! ## Usage
//!
//! ```rust,ignore
//! use idlens_server::ocr::{DocumentAnalyzer, StaticAnalyzer};
//!
//! let analyzer = StaticAnalyzer::from_json(&std::fs::read_to_string("response.json")?)?;
//! let blocks = analyzer.analyze(&image_bytes).await?;
//! ```

mod provider;
mod textract;
mod types;

pub use provider::{DocumentAnalyzer, StaticAnalyzer};
pub use textract::TextractAnalyzer;
pub use types::{block_type, AnalyzeResponse, Geometry, NormalizedBox, OcrError, RawBlock};

#[cfg(test)]
pub(crate) use provider::FailingAnalyzer;
