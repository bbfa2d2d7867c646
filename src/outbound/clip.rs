use crate::domain::ports::Embedder;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use fastembed::{
    EmbeddingModel, ImageEmbedding, ImageEmbeddingModel, ImageInitOptions, InitOptions,
    TextEmbedding,
};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};

/// Both CLIP ViT-B/32 towers project into the same 512 dimensional space.
const CLIP_DIMENSIONS: u64 = 512;

/// Local CLIP embeddings: the vision tower for images, the text tower for queries.
pub struct ClipEmbedder {
    text: Arc<TextEmbedding>,
    vision: Arc<ImageEmbedding>,
}

impl ClipEmbedder {
    /// Loads both models, downloading them into `cache_dir` on first use.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let mut text_options = InitOptions::new(EmbeddingModel::ClipVitB32);
        let mut vision_options = ImageInitOptions::new(ImageEmbeddingModel::ClipVitB32);
        if let Some(dir) = cache_dir {
            text_options = text_options.with_cache_dir(dir.clone());
            vision_options = vision_options.with_cache_dir(dir);
        }

        info!("Loading CLIP ViT-B/32 text and vision models");
        let text = TextEmbedding::try_new(text_options)?;
        let vision = ImageEmbedding::try_new(vision_options)?;

        Ok(ClipEmbedder {
            text: Arc::new(text),
            vision: Arc::new(vision),
        })
    }
}

#[async_trait]
impl Embedder for ClipEmbedder {
    fn dimensions(&self) -> u64 {
        CLIP_DIMENSIONS
    }

    async fn embed_images(&self, paths: Vec<PathBuf>) -> Result<Vec<Vec<f32>>> {
        debug!("Embedding {} images", paths.len());
        let vision = Arc::clone(&self.vision);
        tokio::task::spawn_blocking(move || vision.embed(paths, None))
            .await?
            .map_err(anyhow::Error::from)
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let texts = vec![text.to_string()];
        let model = Arc::clone(&self.text);
        tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await??
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no embedding returned for query"))
    }
}
