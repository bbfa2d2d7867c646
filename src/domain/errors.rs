use thiserror::Error;

/// Failures surfaced to the user. Adapters work with `anyhow`, services map
/// into these variants where an operation ends.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Error loading image: {uri} - {reason}")]
    ImageLoad { uri: String, reason: String },

    #[error("Similarity query by {query} failed: {reason}")]
    Retrieval { query: String, reason: String },

    #[error("An error occurred while generating styling recommendations: {0}")]
    Recommendation(String),

    #[error("Failed to register batch {batch}: {reason}")]
    Ingestion { batch: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StyleError {
    pub fn image_load(uri: &str, err: anyhow::Error) -> Self {
        StyleError::ImageLoad {
            uri: uri.to_string(),
            reason: format!("{:#}", err),
        }
    }

    pub fn retrieval(query: &str, err: anyhow::Error) -> Self {
        StyleError::Retrieval {
            query: query.to_string(),
            reason: format!("{:#}", err),
        }
    }

    pub fn recommendation(err: anyhow::Error) -> Self {
        StyleError::Recommendation(format!("{:#}", err))
    }

    pub fn ingestion(batch: usize, err: anyhow::Error) -> Self {
        StyleError::Ingestion {
            batch,
            reason: format!("{:#}", err),
        }
    }
}
