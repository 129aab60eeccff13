//! Textract document analyzer
//!
//! Wraps the AWS SDK `AnalyzeDocument` call with the `FORMS` feature.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_textract::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::Blob,
    types::{Block, Document, FeatureType},
    Client,
};

use crate::config::OcrConfig;

use super::provider::DocumentAnalyzer;
use super::types::{Geometry, NormalizedBox, OcrError, RawBlock};

/// Textract-backed analyzer
#[derive(Clone)]
pub struct TextractAnalyzer {
    client: Client,
}

impl TextractAnalyzer {
    /// Create a new client from configuration
    ///
    /// Static credentials are used when both keys are configured; otherwise
    /// the SDK's default credential chain applies.
    pub async fn new(config: &OcrConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "idlens",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        tracing::info!(region = %config.region, "Textract client configured");

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl DocumentAnalyzer for TextractAnalyzer {
    fn name(&self) -> &'static str {
        "textract"
    }

    async fn analyze(&self, image_data: &[u8]) -> Result<Vec<RawBlock>, OcrError> {
        let document = Document::builder()
            .bytes(Blob::new(image_data.to_vec()))
            .build();

        let output = self
            .client
            .analyze_document()
            .document(document)
            .feature_types(FeatureType::Forms)
            .send()
            .await
            .map_err(|e| OcrError::Api(format!("AnalyzeDocument failed: {}", DisplayErrorContext(&e))))?;

        Ok(output.blocks().iter().map(raw_block).collect())
    }
}

fn raw_block(block: &Block) -> RawBlock {
    RawBlock {
        id: block.id().map(str::to_string),
        block_type: block.block_type().map(|t| t.as_str().to_string()),
        text: block.text().map(str::to_string),
        geometry: block.geometry().map(|geometry| Geometry {
            bounding_box: geometry.bounding_box().map(|b| NormalizedBox {
                width: f64::from(b.width()),
                height: f64::from(b.height()),
                left: f64::from(b.left()),
                top: f64::from(b.top()),
            }),
        }),
    }
}
