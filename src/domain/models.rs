use std::collections::HashMap;

/// Payload key holding the string identifier of an image record.
pub const PAYLOAD_ID: &str = "id";
/// Payload key holding the source path or URL of an image record.
pub const PAYLOAD_URI: &str = "uri";

/// An image registered in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub uri: String,
    pub point_id: u64,
}

impl ImageRecord {
    pub fn new(position: u64, uri: String) -> Self {
        ImageRecord {
            id: position.to_string(),
            uri,
            point_id: position,
        }
    }

    pub fn payload(&self) -> HashMap<String, String> {
        HashMap::from([
            (PAYLOAD_ID.to_string(), self.id.clone()),
            (PAYLOAD_URI.to_string(), self.uri.clone()),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct VectorInput {
    pub id: u64,
    pub embedding: Vec<f32>,
    pub payload: HashMap<String, String>,
}

impl VectorInput {
    pub fn new(id: u64, embedding: Vec<f32>, payload: HashMap<String, String>) -> Self {
        Self {
            id,
            embedding,
            payload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VectorOutput {
    pub id: u64,
    pub score: Option<f32>,
    pub payload: HashMap<String, String>,
}

/// One reference returned by a similarity query.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalHit {
    pub id: String,
    pub uri: String,
    pub score: Option<f32>,
}

impl From<VectorOutput> for RetrievalHit {
    fn from(output: VectorOutput) -> Self {
        let id = output
            .payload
            .get(PAYLOAD_ID)
            .cloned()
            .unwrap_or_else(|| output.id.to_string());
        let uri = output.payload.get(PAYLOAD_URI).cloned().unwrap_or_default();
        RetrievalHit {
            id,
            uri,
            score: output.score,
        }
    }
}

/// An image resolved from a hit, ready to be shown or sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub uri: String,
    pub base64: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_payload() {
        let record = ImageRecord::new(7, "Data/g.png".to_string());
        assert_eq!(record.id, "7");
        assert_eq!(record.point_id, 7);

        let payload = record.payload();
        assert_eq!(payload.get(PAYLOAD_ID), Some(&"7".to_string()));
        assert_eq!(payload.get(PAYLOAD_URI), Some(&"Data/g.png".to_string()));
    }

    #[test]
    fn test_hit_from_output_without_id_payload() {
        let output = VectorOutput {
            id: 42,
            score: Some(0.5),
            payload: HashMap::from([(PAYLOAD_URI.to_string(), "x.png".to_string())]),
        };
        let hit = RetrievalHit::from(output);
        assert_eq!(hit.id, "42");
        assert_eq!(hit.uri, "x.png");
        assert_eq!(hit.score, Some(0.5));
    }
}
