//! File-mode annotator
//!
//! Annotates an image on disk and prints the label mapping and the extracted
//! fields. With `--blocks` a saved `AnalyzeDocument` response is replayed
//! instead of calling Textract.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idlens_server::annotate::{Annotator, SourceImage};
use idlens_server::config::Config;
use idlens_server::detection::DetectionSet;
use idlens_server::ocr::{DocumentAnalyzer, StaticAnalyzer, TextractAnalyzer};
use idlens_server::pipeline::{AnalysisOutput, AnalysisPipeline};

#[derive(Parser)]
#[command(name = "idlens-annotate")]
#[command(about = "Highlight recognized text on an identity document image")]
#[command(version)]
struct Cli {
    /// JPEG or PNG image to annotate
    image: PathBuf,

    /// Saved AnalyzeDocument response to replay instead of calling Textract
    #[arg(short, long)]
    blocks: Option<PathBuf>,

    /// Where to write the annotated PNG
    #[arg(short, long, default_value = "highlighted_with_labels.png")]
    output: PathBuf,

    /// TrueType/OpenType font for legend text
    #[arg(long, env = "LEGEND_FONT_PATH")]
    font: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "idlens_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data = std::fs::read(&cli.image)
        .with_context(|| format!("Failed to read {}", cli.image.display()))?;
    let source = SourceImage::decode(data)
        .with_context(|| format!("Failed to decode {}", cli.image.display()))?;

    let analyzer: Arc<dyn DocumentAnalyzer> = match &cli.blocks {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Arc::new(StaticAnalyzer::from_json(&json)?)
        }
        None => {
            let config = Config::from_env()?;
            Arc::new(TextractAnalyzer::new(&config.ocr).await)
        }
    };

    let annotator = Annotator::with_font_path(cli.font.as_deref())?;
    let pipeline = AnalysisPipeline::new(analyzer, Arc::new(annotator));
    let output = pipeline.run(source).await?;

    std::fs::write(&cli.output, output.annotated.as_bytes())
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    print!("{}", report(&output)?);

    tracing::info!(
        output = %cli.output.display(),
        detections = output.detections.len(),
        "Annotated image saved"
    );

    Ok(())
}

/// Label mapping, the mapping as JSON, and the extracted fields
fn report(output: &AnalysisOutput) -> serde_json::Result<String> {
    let mut out = String::from("Label to Text Mapping:\n");
    for detection in &output.detections {
        out.push_str(&format!("{} = {}\n", detection.label, detection.text));
    }

    out.push_str("\nJSON Output:\n");
    out.push_str(&serde_json::to_string_pretty(&label_map(&output.detections))?);
    out.push_str("\n\nExtracted Fields:\n");
    out.push_str(&serde_json::to_string_pretty(&output.fields)?);
    out.push('\n');

    Ok(out)
}

/// `{"1": "text", ...}` in label order
fn label_map(detections: &DetectionSet) -> serde_json::Value {
    let map = detections
        .iter()
        .map(|d| (d.label.to_string(), serde_json::Value::from(d.text.clone())))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlens_server::detection::PixelBox;
    use idlens_server::fields::FieldRecord;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn output(texts: &[&str]) -> AnalysisOutput {
        let detections = DetectionSet::from_entries(
            texts
                .iter()
                .map(|t| (t.to_string(), PixelBox::new(1.0, 1.0, 4.0, 4.0))),
        );

        let mut png = Vec::new();
        RgbImage::from_pixel(20, 10, Rgb([255, 255, 255]))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let source = SourceImage::decode(png).unwrap();
        let annotated = Annotator::with_font_path(None)
            .unwrap()
            .annotate(&source, &detections)
            .unwrap();

        AnalysisOutput {
            fields: FieldRecord::from_detections(&detections),
            annotated,
            detections,
        }
    }

    #[test]
    fn test_report_sections() {
        let text = report(&output(&["MÜNCHEN", "D"])).unwrap();

        assert!(text.starts_with("Label to Text Mapping:\n1 = MÜNCHEN\n2 = D\n"));
        assert!(text.contains("\nJSON Output:\n{\n  \"1\": \"MÜNCHEN\",\n  \"2\": \"D\"\n}\n"));
        assert!(text.contains("\nExtracted Fields:\n{\n  \"First Name\": \"\","));
    }

    #[test]
    fn test_label_map_keeps_label_order() {
        let texts: Vec<String> = (1..=12).map(|i| format!("W{}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let map = label_map(&output(&refs).detections);

        let keys: Vec<&str> = map.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys[..3], ["1", "2", "3"]);
        assert_eq!(keys[9..], ["10", "11", "12"]);
    }
}
