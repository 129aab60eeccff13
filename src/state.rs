//! Application state management

use std::sync::Arc;

use crate::annotate::{Annotator, FontError};
use crate::config::Config;
use crate::ocr::DocumentAnalyzer;
use crate::pipeline::AnalysisPipeline;
use crate::storage::{ImageStore, StorageError};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to prepare image storage: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to load legend font: {0}")]
    Font(#[from] FontError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: AnalysisPipeline,
    image_store: ImageStore,
}

impl AppState {
    /// Create a new application state
    ///
    /// Loads the legend font (falling back to the embedded font) and creates
    /// the images directory.
    pub async fn new(config: Config, analyzer: Arc<dyn DocumentAnalyzer>) -> Result<Self, StateError> {
        let annotator = Annotator::with_font_path(config.render.font_path.as_deref())?;
        let pipeline = AnalysisPipeline::new(analyzer, Arc::new(annotator));

        let image_store = ImageStore::new(config.storage.images_dir.clone());
        image_store.ensure_dir().await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                image_store,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the analysis pipeline
    pub fn pipeline(&self) -> &AnalysisPipeline {
        &self.inner.pipeline
    }

    /// Get the image store
    pub fn image_store(&self) -> &ImageStore {
        &self.inner.image_store
    }
}
