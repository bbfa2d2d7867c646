use super::models::{LoadedImage, VectorInput, VectorOutput};
use anyhow::Result;
use async_trait::async_trait;
use std::{collections::HashMap, path::PathBuf, vec::Vec};

#[async_trait]
pub trait Chat: 'static + Send + Sync {
    /// Sends one prompt together with base64 encoded JPEG images and returns the answer text.
    async fn get_recommendation(&self, prompt: &str, images_base64: &[String]) -> Result<String>;
}

#[async_trait]
pub trait Embedder: 'static + Send + Sync {
    fn dimensions(&self) -> u64;

    async fn embed_images(&self, paths: Vec<PathBuf>) -> Result<Vec<Vec<f32>>>;

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait ImageLoader: 'static + Send + Sync {
    /// Resolves a local path or http(s) URL into an encoded image.
    async fn load(&self, uri: &str) -> Result<LoadedImage>;
}

#[async_trait]
pub trait VectorDB: 'static + Sync + Send {
    async fn create_collection(&self, collection: &str, dimensions: u64) -> Result<bool>;

    async fn collection_exists(&self, collection: &str) -> Result<bool>;

    async fn delete_collection(&self, collection: &str) -> Result<bool>;

    async fn upsert_points(&self, collection_name: &str, inputs: &[VectorInput]) -> Result<bool>;

    async fn search_points(
        &self,
        collection_name: &str,
        input_vectors: &[f32],
        limit: u64,
        payload_required: HashMap<String, String>,
    ) -> Result<Vec<VectorOutput>>;

    async fn find_by_ids(&self, collection_name: &str, ids: &[u64]) -> Result<Vec<VectorOutput>>;
}

/// Opens the named collection, creating it when it does not exist yet.
pub async fn get_or_create_collection(
    vector_db: &dyn VectorDB,
    collection: &str,
    dimensions: u64,
) -> Result<()> {
    if !vector_db.collection_exists(collection).await? {
        vector_db.create_collection(collection, dimensions).await?;
    }
    Ok(())
}
