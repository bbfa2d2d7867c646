use anyhow::{anyhow, Result};
use clap::Parser;
use fashion_stylist::config::{Settings, DEFAULT_COLLECTION};
use fashion_stylist::domain::file_utils::is_image;
use fashion_stylist::domain::preferences::PreferenceSet;
use fashion_stylist::domain::session::{StyleRequest, StylingSession};
use fashion_stylist::outbound::clip::ClipEmbedder;
use fashion_stylist::outbound::console::render_report;
use fashion_stylist::outbound::image_provider::ImageCrateLoader;
use fashion_stylist::outbound::openai::OpenAI;
use fashion_stylist::outbound::qdrant::QdrantClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// Answer a few quick questions, upload an image, or enter a query to get
/// personalized fashion recommendations.
#[derive(Parser, Debug)]
#[command(name = "fashion-stylist", version)]
struct Cli {
    #[command(flatten)]
    preferences: PreferenceSet,

    /// Image to retrieve similar fashion items for (jpg, jpeg or png)
    #[arg(long, value_name = "PATH", value_parser = parse_upload)]
    image: Option<PathBuf>,

    /// Styling query, e.g. "white sneakers with a denim jacket"
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,

    /// Collection to query
    #[arg(long, env = "COLLECTION_NAME", default_value = DEFAULT_COLLECTION)]
    collection: String,
}

fn parse_upload(value: &str) -> Result<PathBuf> {
    let path = PathBuf::from(value);
    if !is_image(&path) {
        return Err(anyhow!("only jpg, jpeg and png uploads are supported"));
    }
    if !path.is_file() {
        return Err(anyhow!("{} is not a file", path.display()));
    }
    Ok(path)
}

/// Main entry point.
#[tokio::main]
async fn main() -> Result<()> {
    // load env from .env file before clap reads it
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Set up tracing for logging.
    let file_appender = rolling::never("logs", "session.log");
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
    let image_loader = Arc::new(ImageCrateLoader::new());
    let chat = Arc::new(OpenAI::new(&settings));

    let mut session =
        StylingSession::new(embedder, vector_db, image_loader, chat, &cli.collection);
    session.await_trigger();

    let request = StyleRequest {
        preferences: cli.preferences,
        image: cli.image,
        query: cli.query,
    };
    if request.image.is_none() && request.query.is_none() {
        tracing::warn!("Neither an image nor a query was given, nothing to retrieve");
    }

    let report = session.run(&request).await;
    render_report(&report, &mut std::io::stdout().lock())?;

    Ok(())
}
