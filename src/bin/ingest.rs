use anyhow::Result;
use clap::Parser;
use fashion_stylist::config::{
    parse_batch_size, Settings, DEFAULT_BATCH_SIZE, DEFAULT_COLLECTION,
};
use fashion_stylist::domain::ingestion::{IngestionOptions, IngestionService};
use fashion_stylist::outbound::clip::ClipEmbedder;
use fashion_stylist::outbound::qdrant::QdrantClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// Stores every image of a dataset folder in the vector database.
#[derive(Parser, Debug)]
#[command(name = "ingest", version)]
struct Cli {
    /// Folder holding the png/jpg dataset
    #[arg(default_value = "Data")]
    dataset: PathBuf,

    /// Records per upsert call
    #[arg(
        long,
        env = "INGEST_BATCH_SIZE",
        value_parser = parse_batch_size,
        default_value_t = DEFAULT_BATCH_SIZE
    )]
    batch_size: usize,

    /// Collection to fill
    #[arg(long, env = "COLLECTION_NAME", default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Leave records whose id and path are already stored untouched
    #[arg(long)]
    skip_existing: bool,

    /// Drop the collection before registering
    #[arg(long)]
    recreate: bool,
}

/// Main entry point.
#[tokio::main]
async fn main() -> Result<()> {
    // load env from .env file before clap reads it
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Set up tracing for logging.
    let file_appender = rolling::never("logs", "ingest.log");
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(file_appender)
        .with_target(false)
        .without_time()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::from_env();

    let embedder = Arc::new(ClipEmbedder::new(settings.embedding_cache_dir.clone())?);
    let vector_db = Arc::new(QdrantClient::new(&settings.qdrant_url)?);

    let options = IngestionOptions {
        collection_name: cli.collection,
        batch_size: cli.batch_size,
        skip_existing: cli.skip_existing,
        recreate: cli.recreate,
    };

    let service = IngestionService::new(embedder, vector_db);
    let summary = service.ingest(&cli.dataset, &options).await?;

    info!("{:?}", summary);
    println!(
        "Images stored to the vector database: {} records in {} batches ({} skipped).",
        summary.records, summary.batches, summary.skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_batch_size_flag() {
        let cli = Cli::try_parse_from(["ingest", "Photos", "--batch-size", "40"]).unwrap();
        assert_eq!(cli.dataset, PathBuf::from("Photos"));
        assert_eq!(cli.batch_size, 40);

        assert!(Cli::try_parse_from(["ingest", "--batch-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["ingest", "--batch-size", "many"]).is_err());
    }

    #[test]
    fn test_collection_flag() {
        let cli = Cli::try_parse_from(["ingest", "--collection", "lookbook", "--recreate"]).unwrap();
        assert_eq!(cli.collection, "lookbook");
        assert!(cli.recreate);
        assert!(!cli.skip_existing);
    }
}
