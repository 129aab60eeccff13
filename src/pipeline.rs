//! Analysis pipeline
//!
//! One run: analyze the image with the external service, normalize the
//! blocks, render the annotated image and read the fields. Either everything
//! is produced or the run fails; nothing partial is returned.

use std::sync::Arc;

use thiserror::Error;

use crate::annotate::{AnnotatedImage, Annotator, RenderError, SourceImage};
use crate::detection::{normalize, DetectionError, DetectionSet};
use crate::fields::FieldRecord;
use crate::ocr::{DocumentAnalyzer, OcrError, RawBlock};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Analysis(#[from] OcrError),

    #[error("Invalid analysis response: {0}")]
    Validation(#[from] DetectionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Rendering task failed: {0}")]
    Worker(String),
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub fields: FieldRecord,
    pub annotated: AnnotatedImage,
    pub detections: DetectionSet,
}

/// Analyzer plus annotator
#[derive(Clone)]
pub struct AnalysisPipeline {
    analyzer: Arc<dyn DocumentAnalyzer>,
    annotator: Arc<Annotator>,
}

impl AnalysisPipeline {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>, annotator: Arc<Annotator>) -> Self {
        Self {
            analyzer,
            annotator,
        }
    }

    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer.name()
    }

    /// Run the full pipeline for an already decoded image
    ///
    /// Rendering happens on the blocking pool; the run is still sequential.
    pub async fn run(&self, source: SourceImage) -> Result<AnalysisOutput, PipelineError> {
        let blocks = self.analyzer.analyze(source.bytes()).await?;

        tracing::debug!(
            analyzer = self.analyzer.name(),
            blocks = blocks.len(),
            "Document analyzed"
        );

        let annotator = Arc::clone(&self.annotator);
        tokio::task::spawn_blocking(move || process(&annotator, &source, &blocks))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }
}

/// Normalize, annotate and extract from an analysis response
pub fn process(
    annotator: &Annotator,
    source: &SourceImage,
    blocks: &[RawBlock],
) -> Result<AnalysisOutput, PipelineError> {
    let (width, height) = source.dimensions();
    let detections = normalize(blocks, width, height)?;
    let annotated = annotator.annotate(source, &detections)?;
    let fields = FieldRecord::from_detections(&detections);

    Ok(AnalysisOutput {
        fields,
        annotated,
        detections,
    })
}
