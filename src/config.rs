//! Configuration management for IdLens Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded and annotated images
    pub images_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub region: String,
    /// Override for the Textract endpoint (local emulators)
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// TrueType/OpenType font for legend text
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_REGION: &str = "ap-south-1";

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: DEFAULT_PORT,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            storage: StorageConfig {
                images_dir: PathBuf::from("images"),
            },
            ocr: OcrConfig {
                region: DEFAULT_REGION.to_string(),
                endpoint: None,
                access_key: None,
                secret_key: None,
            },
            render: RenderConfig { font_path: None },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset or empty variables
    /// take their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", var("SERVER_PORT"), defaults.server.port)?,
                max_upload_bytes: parse_var(
                    "MAX_UPLOAD_BYTES",
                    var("MAX_UPLOAD_BYTES"),
                    defaults.server.max_upload_bytes,
                )?,
            },
            storage: StorageConfig {
                images_dir: var("IMAGES_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.images_dir),
            },
            ocr: OcrConfig {
                region: var("AWS_REGION").unwrap_or(defaults.ocr.region),
                endpoint: var("TEXTRACT_ENDPOINT"),
                access_key: var("AWS_ACCESS_KEY_ID"),
                secret_key: var("AWS_SECRET_ACCESS_KEY"),
            },
            render: RenderConfig {
                font_path: var("LEGEND_FONT_PATH").map(PathBuf::from),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name,
            value: raw,
        }),
    }
}
