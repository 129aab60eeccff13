//! IdLens Server Library
//!
//! Field extraction for photographed identity documents. OCR is delegated to an
//! external document-analysis service; this crate turns its detections into a
//! reviewable highlight image and a fixed set of form fields.
//!
//! # Modules
//!
//! - `detection`: Normalizes raw OCR blocks into labelled pixel-space detections
//! - `annotate`: Draws highlight boxes and the legend, encodes the result
//! - `fields`: Positional lookup of the six identity fields
//! - `ocr`: Document analyzer seam (Textract, static replay)
//! - `pipeline`: Decode, analyze, annotate, extract
//! - `storage`: Local images directory
//! - `routes`: HTTP endpoints

pub mod annotate;
pub mod config;
pub mod detection;
pub mod error;
pub mod fields;
pub mod ocr;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod storage;
