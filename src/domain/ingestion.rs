use super::{
    errors::StyleError,
    file_utils::list_image_files,
    models::{ImageRecord, VectorInput, PAYLOAD_URI},
    ports::{get_or_create_collection, Embedder, VectorDB},
};
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionOptions {
    pub collection_name: String,
    pub batch_size: usize,
    pub skip_existing: bool,
    pub recreate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub records: usize,
    pub batches: usize,
    pub skipped: usize,
}

/// Assigns ids in listing order. `paths` is expected to be sorted already.
/// Ids are dense over recognized images: other files in the folder never take a number.
pub fn assign_records(paths: &[PathBuf]) -> Vec<ImageRecord> {
    paths
        .iter()
        .enumerate()
        .map(|(position, path)| ImageRecord::new(position as u64, path.display().to_string()))
        .collect()
}

/// Splits records into contiguous batches of at most `batch_size`.
pub fn plan_batches(
    records: &[ImageRecord],
    batch_size: usize,
) -> Result<Vec<&[ImageRecord]>, StyleError> {
    if batch_size == 0 {
        return Err(StyleError::Config("batch size must be at least 1".into()));
    }
    Ok(records.chunks(batch_size).collect())
}

pub struct IngestionService {
    embedder: Arc<dyn Embedder>,
    vector_db: Arc<dyn VectorDB>,
}

impl IngestionService {
    pub fn new(embedder: Arc<dyn Embedder>, vector_db: Arc<dyn VectorDB>) -> Self {
        IngestionService {
            embedder,
            vector_db,
        }
    }

    pub async fn ingest(
        &self,
        root_path: &PathBuf,
        options: &IngestionOptions,
    ) -> Result<IngestionSummary, StyleError> {
        let files_list = list_image_files(root_path).map_err(|e| {
            StyleError::Config(format!("cannot read {}: {}", root_path.display(), e))
        })?;
        let records = assign_records(&files_list);
        let batches = plan_batches(&records, options.batch_size)?;

        info!(
            "Registering {} images from {} in {} batches",
            records.len(),
            root_path.display(),
            batches.len()
        );

        let collection = options.collection_name.as_str();
        self.prepare_collection(collection, options.recreate)
            .await
            .map_err(|e| StyleError::ingestion(0, e))?;

        // Create a progress bar with the total length of the vector.
        let progress_bar = ProgressBar::new(records.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("Registering [{elapsed_precise}] [{wide_bar}] {pos}/{len} ({eta})")
                .map_err(|e| StyleError::Config(e.to_string()))?,
        );

        let mut summary = IngestionSummary {
            records: records.len(),
            ..Default::default()
        };

        for (index, batch) in batches.iter().enumerate() {
            let skipped = self
                .register_batch(collection, batch, options.skip_existing)
                .await
                .map_err(|e| {
                    progress_bar.abandon();
                    StyleError::ingestion(index, e)
                })?;

            info!(
                "Batch {} registered: ids {}..={}, {} skipped",
                index,
                batch[0].id,
                batch[batch.len() - 1].id,
                skipped
            );
            summary.batches += 1;
            summary.skipped += skipped;
            progress_bar.inc(batch.len() as u64);
        }

        progress_bar.finish_with_message("Images stored to the vector database.");
        Ok(summary)
    }

    async fn prepare_collection(&self, collection: &str, recreate: bool) -> Result<()> {
        if recreate && self.vector_db.collection_exists(collection).await? {
            self.vector_db.delete_collection(collection).await?;
        }
        get_or_create_collection(
            self.vector_db.as_ref(),
            collection,
            self.embedder.dimensions(),
        )
        .await
    }

    /// Registers one batch and returns how many records were already present.
    async fn register_batch(
        &self,
        collection: &str,
        batch: &[ImageRecord],
        skip_existing: bool,
    ) -> Result<usize> {
        let pending: Vec<&ImageRecord> = if skip_existing {
            let ids: Vec<u64> = batch.iter().map(|r| r.point_id).collect();
            let existing = self.vector_db.find_by_ids(collection, &ids).await?;
            batch
                .iter()
                .filter(|record| {
                    !existing.iter().any(|entry| {
                        entry.id == record.point_id
                            && entry.payload.get(PAYLOAD_URI) == Some(&record.uri)
                    })
                })
                .collect()
        } else {
            batch.iter().collect()
        };

        let skipped = batch.len() - pending.len();
        if pending.is_empty() {
            return Ok(skipped);
        }

        let paths: Vec<PathBuf> = pending.iter().map(|r| PathBuf::from(&r.uri)).collect();
        let embeddings = self
            .embedder
            .embed_images(paths)
            .await
            .context("embedding images")?;

        if embeddings.len() != pending.len() {
            return Err(anyhow!(
                "expected {} embeddings, got {}",
                pending.len(),
                embeddings.len()
            ));
        }

        let inputs: Vec<VectorInput> = pending
            .iter()
            .zip(embeddings)
            .map(|(record, embedding)| {
                VectorInput::new(record.point_id, embedding, record.payload())
            })
            .collect();

        self.vector_db
            .upsert_points(collection, &inputs)
            .await
            .context("upserting points")?;

        Ok(skipped)
    }
}
