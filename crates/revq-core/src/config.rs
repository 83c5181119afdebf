use std::path::PathBuf;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

/// All settings the pipeline needs, read from the environment exactly once.
///
/// Components receive this by reference; nothing reads the environment
/// mid-pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub openai_base_url: String,
    pub pdf_path: PathBuf,
    pub qdrant_url: String,
    pub collection: String,
}

impl Config {
    /// Read and validate the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first required key that
    /// is absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            openai_api_key: require("OPENAI_API_KEY")?,
            embedding_model: require("OPENAI_EMBEDDING_MODEL")?,
            chat_model: require("OPENAI_CHAT_MODEL")?,
            openai_base_url: optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned()),
            pdf_path: PathBuf::from(require("PDF_PATH")?),
            qdrant_url: require("QDRANT_URL")?,
            collection: require("QDRANT_COLLECTION")?,
        })
    }

    /// File name recorded in chunk metadata, derived from the PDF path.
    #[must_use]
    pub fn pdf_file_name(&self) -> String {
        self.pdf_path
            .file_name()
            .map_or_else(|| self.pdf_path.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
