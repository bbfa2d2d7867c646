use crate::domain::errors::StyleError;
use std::{env::var, path::PathBuf};

const QDRANT_GRPC: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "image";
// The store rejected larger batches when the dataset was first loaded.
pub const DEFAULT_BATCH_SIZE: usize = 166;
const CHAT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const CHAT_MODEL_MULTIMODAL: &str = "gemini-1.5-pro";

/// Process wide settings, read once at startup. The collection name and batch
/// size are command line arguments backed by `COLLECTION_NAME` and
/// `INGEST_BATCH_SIZE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub qdrant_url: String,
    pub chat_api_key: Option<String>,
    pub chat_api_base: String,
    pub chat_model: String,
    pub embedding_cache_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            qdrant_url: QDRANT_GRPC.into(),
            chat_api_key: None,
            chat_api_base: CHAT_API_BASE.into(),
            chat_model: CHAT_MODEL_MULTIMODAL.into(),
            embedding_cache_dir: None,
        }
    }
}

impl Settings {
    /// Loads `.env` and reads the settings from the environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        Settings {
            qdrant_url: lookup("QDRANT_URL").unwrap_or(defaults.qdrant_url),
            chat_api_key: lookup("CHAT_API_KEY").or_else(|| lookup("api_key")),
            chat_api_base: lookup("CHAT_API_BASE").unwrap_or(defaults.chat_api_base),
            chat_model: lookup("CHAT_MODEL_IMAGE").unwrap_or(defaults.chat_model),
            embedding_cache_dir: lookup("EMBEDDING_CACHE_DIR").map(PathBuf::from),
        }
    }
}

/// Value parser for `--batch-size` / `INGEST_BATCH_SIZE`.
pub fn parse_batch_size(value: &str) -> Result<usize, StyleError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(StyleError::Config("batch size must be at least 1".into())),
        Ok(size) => Ok(size),
        Err(e) => Err(StyleError::Config(format!(
            "invalid batch size {:?}: {}",
            value, e
        ))),
    }
}
