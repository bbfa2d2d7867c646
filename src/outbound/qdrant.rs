use crate::domain::{
    models::{VectorInput, VectorOutput},
    ports::VectorDB,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        point_id::PointIdOptions, Condition, CreateCollectionBuilder, Distance, Filter,
        GetPointsBuilder, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder, Value,
        VectorParamsBuilder,
    },
    Payload, Qdrant,
};
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

pub struct QdrantClient {
    client: Qdrant,
}

impl QdrantClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl VectorDB for QdrantClient {
    async fn create_collection(&self, collection: &str, dimensions: u64) -> Result<bool> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(dimensions, Distance::Cosine)),
            )
            .await
            .map(|r| r.result)
            .map_err(anyhow::Error::from)
    }

    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        self.client
            .collection_exists(collection)
            .await
            .map_err(anyhow::Error::from)
    }

    async fn delete_collection(&self, collection_name: &str) -> Result<bool> {
        self.client
            .delete_collection(collection_name)
            .await
            .map(|r| r.result)
            .map_err(anyhow::Error::from)
    }

    async fn upsert_points(&self, collection_name: &str, inputs: &[VectorInput]) -> Result<bool> {
        let points = inputs
            .iter()
            .map(|input| -> Result<PointStruct> {
                let payload = Payload::try_from(json!(input.payload))?;
                Ok(PointStruct::new(input.id, input.embedding.clone(), payload))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Upserting {} points into {}", points.len(), collection_name);
        let request = UpsertPointsBuilder::new(collection_name, points).wait(true);
        self.client
            .upsert_points(request)
            .await
            .map(|r| r.result.is_some())
            .map_err(anyhow::Error::from)
    }

    async fn search_points(
        &self,
        collection_name: &str,
        input_vectors: &[f32],
        limit: u64,
        payload_required: HashMap<String, String>,
    ) -> Result<Vec<VectorOutput>> {
        let filter: Vec<Condition> = payload_required
            .iter()
            .map(|(key, value)| Condition::matches(key, value.to_string()))
            .collect();
        let result = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection_name, input_vectors.to_vec(), limit)
                    .filter(Filter::all(filter))
                    .with_payload(true),
            )
            .await?;

        result
            .result
            .into_iter()
            .map(|r| -> Result<VectorOutput> {
                Ok(VectorOutput {
                    id: numeric_id(r.id)?,
                    score: Some(r.score),
                    payload: string_payload(r.payload),
                })
            })
            .collect()
    }

    async fn find_by_ids(&self, collection_name: &str, ids: &[u64]) -> Result<Vec<VectorOutput>> {
        let ids: Vec<PointId> = ids.iter().map(|id| PointId::from(*id)).collect();
        let result = self
            .client
            .get_points(GetPointsBuilder::new(collection_name, ids).with_payload(true))
            .await?;

        result
            .result
            .into_iter()
            .map(|r| -> Result<VectorOutput> {
                Ok(VectorOutput {
                    id: numeric_id(r.id)?,
                    score: None,
                    payload: string_payload(r.payload),
                })
            })
            .collect()
    }
}

fn numeric_id(id: Option<PointId>) -> Result<u64> {
    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Num(id)) => Ok(id),
        other => Err(anyhow!("Invalid point id {:?}", other)),
    }
}

fn string_payload(payload: HashMap<String, Value>) -> HashMap<String, String> {
    payload
        .into_iter()
        .map(|(k, v)| {
            let value = match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            };
            (k, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id() {
        assert_eq!(numeric_id(Some(PointId::from(7u64))).unwrap(), 7);
        assert!(numeric_id(None).is_err());
        let uuid = PointId::from("8c0a3b5e-3c7f-4f7d-9a44-000000000000".to_string());
        assert!(numeric_id(Some(uuid)).is_err());
    }

    #[test]
    fn test_string_payload_unquotes_strings() {
        let payload = HashMap::from([
            ("id".to_string(), Value::from("3")),
            ("uri".to_string(), Value::from("Data/a.png")),
        ]);
        let payload = string_payload(payload);
        assert_eq!(payload["id"], "3");
        assert_eq!(payload["uri"], "Data/a.png");
    }
}
