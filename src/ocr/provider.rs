//! Document Analyzers
//!
//! Defines the analyzer trait and the non-network implementation used for
//! replaying saved responses.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::types::{AnalyzeResponse, OcrError, RawBlock};

/// Document analysis backend
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Analyze an encoded image and return the raw block sequence, in the
    /// order the backend produced it
    async fn analyze(&self, image_data: &[u8]) -> Result<Vec<RawBlock>, OcrError>;
}

/// Analyzer that returns a fixed block list
///
/// Used to replay a saved `AnalyzeDocument` response and in tests. Counts how
/// many times it was invoked.
#[derive(Debug, Default)]
pub struct StaticAnalyzer {
    blocks: Vec<RawBlock>,
    calls: AtomicUsize,
}

impl StaticAnalyzer {
    pub fn new(blocks: Vec<RawBlock>) -> Self {
        Self {
            blocks,
            calls: AtomicUsize::new(0),
        }
    }

    /// Parse a saved response in the service's JSON wire format
    pub fn from_json(json: &str) -> Result<Self, OcrError> {
        let response: AnalyzeResponse = serde_json::from_str(json)
            .map_err(|e| OcrError::MalformedResponse(e.to_string()))?;
        Ok(Self::new(response.blocks))
    }

    /// Number of `analyze` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentAnalyzer for StaticAnalyzer {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn analyze(&self, _image_data: &[u8]) -> Result<Vec<RawBlock>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.blocks.clone())
    }
}

/// Analyzer that always fails
#[cfg(test)]
pub struct FailingAnalyzer;

#[cfg(test)]
#[async_trait]
impl DocumentAnalyzer for FailingAnalyzer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn analyze(&self, _image_data: &[u8]) -> Result<Vec<RawBlock>, OcrError> {
        Err(OcrError::Api("service unavailable".to_string()))
    }
}
