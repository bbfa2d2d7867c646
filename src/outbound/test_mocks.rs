#[cfg(test)]
pub mod tests {
    use std::{collections::HashMap, path::PathBuf, sync::Mutex};

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use rand::Rng;
    use tracing::debug;

    use crate::domain::{
        models::{LoadedImage, VectorInput, VectorOutput},
        ports::{Chat, Embedder, ImageLoader, VectorDB},
    };

    const DIMENSIONS: u64 = 512;

    #[derive(Default)]
    pub struct ChatMock {
        fail: bool,
        prompts: Mutex<Vec<(String, usize)>>,
    }

    impl ChatMock {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        /// Every prompt received, with the number of images attached.
        pub fn prompts(&self) -> Vec<(String, usize)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Chat for ChatMock {
        async fn get_recommendation(
            &self,
            prompt: &str,
            images_base64: &[String],
        ) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), images_base64.len()));
            if self.fail {
                return Err(anyhow!("quota exceeded"));
            }
            Ok("Wear the navy blazer.".to_string())
        }
    }

    #[derive(Default)]
    pub struct EmbedderMock {
        fail_images: bool,
        fail_text: bool,
    }

    impl EmbedderMock {
        pub fn failing() -> Self {
            Self {
                fail_images: true,
                fail_text: true,
            }
        }

        pub fn failing_images() -> Self {
            Self {
                fail_images: true,
                fail_text: false,
            }
        }

        fn random_embedding() -> Vec<f32> {
            let mut rng = rand::thread_rng();
            (0..DIMENSIONS).map(|_| rng.gen()).collect()
        }
    }

    #[async_trait]
    impl Embedder for EmbedderMock {
        fn dimensions(&self) -> u64 {
            DIMENSIONS
        }

        async fn embed_images(&self, paths: Vec<PathBuf>) -> Result<Vec<Vec<f32>>> {
            if self.fail_images {
                return Err(anyhow!("cannot decode image"));
            }
            Ok(paths.iter().map(|_| Self::random_embedding()).collect())
        }

        async fn embed_text(&self, _text: &str) -> Result<Vec<f32>> {
            if self.fail_text {
                return Err(anyhow!("tokenizer missing"));
            }
            Ok(Self::random_embedding())
        }
    }

    #[derive(Default)]
    pub struct ImageLoaderMock {
        failing: Vec<String>,
    }

    impl ImageLoaderMock {
        pub fn failing_for(uris: &[&str]) -> Self {
            Self {
                failing: uris.iter().map(|u| u.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl ImageLoader for ImageLoaderMock {
        async fn load(&self, uri: &str) -> Result<LoadedImage> {
            if self.failing.iter().any(|f| f == uri) {
                return Err(anyhow!("Invalid image path: {}", uri));
            }
            Ok(LoadedImage {
                uri: uri.to_string(),
                base64: format!("base64:{}", uri),
            })
        }
    }

    #[derive(Default)]
    pub struct VectorDBMock {
        store_embeddings: Mutex<HashMap<String, Vec<VectorInput>>>,
        upsert_calls: Mutex<Vec<usize>>,
        fail_upsert_after: Option<usize>,
        ignore_limit: bool,
    }

    impl VectorDBMock {
        pub fn new() -> Self {
            Self::default()
        }

        /// Lets the first `successful` upserts through and rejects the rest.
        pub fn failing_upsert_after(self, successful: usize) -> Self {
            Self {
                fail_upsert_after: Some(successful),
                ..self
            }
        }

        /// Returns every stored entry from `search_points`, whatever the limit.
        pub fn ignoring_limit(self) -> Self {
            Self {
                ignore_limit: true,
                ..self
            }
        }

        /// Sizes of the accepted upsert calls, in order.
        pub fn upsert_calls(&self) -> Vec<usize> {
            self.upsert_calls.lock().unwrap().clone()
        }

        pub fn entries(&self, collection_name: &str) -> Vec<VectorInput> {
            self.store_embeddings
                .lock()
                .unwrap()
                .get(collection_name)
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl VectorDB for VectorDBMock {
        async fn create_collection(&self, collection_name: &str, _dimensions: u64) -> Result<bool> {
            let mut store = self.store_embeddings.lock().unwrap();
            if !store.contains_key(collection_name) {
                store.insert(collection_name.to_string(), Vec::new());
            }
            Ok(true)
        }

        async fn collection_exists(&self, collection_name: &str) -> Result<bool> {
            let store = self.store_embeddings.lock().unwrap();
            Ok(store.contains_key(collection_name))
        }

        async fn delete_collection(&self, collection_name: &str) -> Result<bool> {
            let mut store = self.store_embeddings.lock().unwrap();
            let result = store.remove(collection_name);
            Ok(result.is_some())
        }

        async fn find_by_ids(
            &self,
            collection_name: &str,
            ids: &[u64],
        ) -> Result<Vec<VectorOutput>> {
            let store = self.store_embeddings.lock().unwrap();
            let collection = store
                .get(collection_name)
                .ok_or_else(|| anyhow!("Collection {} missing in store", collection_name))?;

            Ok(collection
                .iter()
                .filter(|v| ids.contains(&v.id))
                .map(|v| VectorOutput {
                    id: v.id,
                    score: None,
                    payload: v.payload.clone(),
                })
                .collect())
        }

        async fn upsert_points(
            &self,
            collection_name: &str,
            inputs: &[VectorInput],
        ) -> Result<bool> {
            let mut calls = self.upsert_calls.lock().unwrap();
            if let Some(limit) = self.fail_upsert_after {
                if calls.len() >= limit {
                    return Err(anyhow!("batch too large"));
                }
            }

            let mut store = self.store_embeddings.lock().unwrap();
            let collection = store
                .get_mut(collection_name)
                .ok_or_else(|| anyhow!("Collection {} missing in store", collection_name))?;

            inputs.iter().for_each(|input| {
                // Find and remove an existing entry with the same ID
                collection.retain(|entry| entry.id != input.id);

                // Insert a new entry
                collection.push(input.clone());
            });
            calls.push(inputs.len());
            Ok(true)
        }

        async fn search_points(
            &self,
            collection_name: &str,
            _input_vectors: &[f32],
            limit: u64,
            _payload_required: HashMap<String, String>,
        ) -> Result<Vec<VectorOutput>> {
            let store = self.store_embeddings.lock().unwrap();
            match store.get(collection_name) {
                Some(entries) => {
                    debug!(
                        "Found {} entries in collection {}",
                        entries.len(),
                        collection_name
                    );

                    let limit = if self.ignore_limit {
                        entries.len()
                    } else {
                        limit as usize
                    };
                    Ok(entries
                        .iter()
                        .take(limit)
                        .map(|entry| VectorOutput {
                            id: entry.id,
                            score: Some(1.0),
                            payload: entry.payload.clone(),
                        })
                        .collect())
                }
                None => Ok(Vec::new()),
            }
        }
    }

    #[tokio::test]
    async fn test_embedder_mock() {
        let embedder = EmbedderMock::default();

        let embeddings = embedder
            .embed_images(vec![PathBuf::from("a.png"), PathBuf::from("b.png")])
            .await
            .unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), 512);

        assert!(EmbedderMock::failing_images()
            .embed_text("test")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_vector_db_mock() {
        let vector_db_mock = VectorDBMock::new();

        let id = 1;
        let collection = "test";

        assert!(!vector_db_mock.collection_exists(collection).await.unwrap());
        let created = vector_db_mock
            .create_collection(collection, 512)
            .await
            .unwrap();
        assert!(created);

        let mut input = VectorInput::new(id, vec![0.1, 0.2, 0.3], HashMap::new());
        let inserted = vector_db_mock
            .upsert_points(collection, &[input.clone()])
            .await
            .unwrap();
        assert!(inserted);

        let outputs = vector_db_mock
            .search_points(collection, &[0.1, 0.2, 0.3], 10, HashMap::new())
            .await
            .unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].id, id);

        // Upsert with existing ID replaces the entry
        input.payload = HashMap::from([("key".to_string(), "value".to_string())]);
        vector_db_mock
            .upsert_points(collection, &[input])
            .await
            .unwrap();

        let points = vector_db_mock
            .find_by_ids(collection, &[id, 99])
            .await
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].payload.get("key"), Some(&"value".to_string()));
    }
}
