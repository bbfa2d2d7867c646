use super::{
    errors::StyleError,
    models::{LoadedImage, RetrievalHit},
    ports::{get_or_create_collection, Chat, Embedder, ImageLoader, VectorDB},
    preferences::PreferenceSet,
};
use anyhow::{anyhow, Result};
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tracing::{debug, info, warn};

/// Maximum number of references returned by one similarity query.
pub const MAX_RESULTS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingTrigger,
    Retrieving,
    Recommending,
    IdleWithResults,
}

/// What the user asked for in one trigger.
#[derive(Debug, Clone, Default)]
pub struct StyleRequest {
    pub preferences: PreferenceSet,
    pub image: Option<PathBuf>,
    pub query: Option<String>,
}

impl StyleRequest {
    fn text_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Image,
    Text,
}

impl QueryKind {
    fn label(&self) -> &'static str {
        match self {
            QueryKind::Image => "image",
            QueryKind::Text => "text",
        }
    }
}

/// Outcome of one similarity query and the resolution of its hits.
#[derive(Debug)]
pub struct RetrievalSection {
    pub kind: QueryKind,
    pub hits: Vec<RetrievalHit>,
    pub images: Vec<LoadedImage>,
    pub failures: Vec<StyleError>,
}

impl RetrievalSection {
    fn new(kind: QueryKind) -> Self {
        RetrievalSection {
            kind,
            hits: Vec::new(),
            images: Vec::new(),
            failures: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum Recommendation {
    Skipped,
    Generated(String),
    Failed(StyleError),
}

#[derive(Debug)]
pub struct SessionReport {
    /// Last state reached; `Recommending` whether the model answered or failed.
    pub state: SessionState,
    pub sections: Vec<RetrievalSection>,
    pub recommendation: Recommendation,
}

impl SessionReport {
    /// All resolved images, image query results first.
    pub fn retrieved_images(&self) -> Vec<&LoadedImage> {
        self.sections.iter().flat_map(|s| s.images.iter()).collect()
    }
}

pub struct StylingSession {
    embedder: Arc<dyn Embedder>,
    vector_db: Arc<dyn VectorDB>,
    image_loader: Arc<dyn ImageLoader>,
    chat: Arc<dyn Chat>,
    collection_name: String,
    state: SessionState,
}

impl StylingSession {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vector_db: Arc<dyn VectorDB>,
        image_loader: Arc<dyn ImageLoader>,
        chat: Arc<dyn Chat>,
        collection_name: &str,
    ) -> Self {
        StylingSession {
            embedder,
            vector_db,
            image_loader,
            chat,
            collection_name: collection_name.to_string(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Marks the form as filled in and ready for a trigger.
    pub fn await_trigger(&mut self) {
        self.transition(SessionState::AwaitingTrigger);
    }

    /// Runs one retrieval and recommendation pass.
    pub async fn run(&mut self, request: &StyleRequest) -> SessionReport {
        if self.state == SessionState::Idle {
            self.await_trigger();
        }
        self.transition(SessionState::Retrieving);

        let mut sections = Vec::new();

        if let Err(e) = get_or_create_collection(
            self.vector_db.as_ref(),
            &self.collection_name,
            self.embedder.dimensions(),
        )
        .await
        {
            warn!("Collection {} is not available: {}", self.collection_name, e);
        }

        if let Some(image) = &request.image {
            let query = image.display().to_string();
            let section = self
                .retrieve(QueryKind::Image, &query, self.embed_image(image))
                .await;
            sections.push(section);
        }

        if let Some(text) = request.text_query() {
            let section = self
                .retrieve(QueryKind::Text, text, self.embedder.embed_text(text))
                .await;
            sections.push(section);
        }

        let images: Vec<String> = sections
            .iter()
            .flat_map(|s| s.images.iter().map(|i| i.base64.clone()))
            .collect();

        let recommendation = if images.is_empty() {
            info!("No images retrieved, skipping recommendation");
            self.transition(SessionState::IdleWithResults);
            Recommendation::Skipped
        } else {
            self.transition(SessionState::Recommending);
            let prompt = request.preferences.prompt();
            match self.chat.get_recommendation(&prompt, &images).await {
                Ok(text) => Recommendation::Generated(text),
                Err(e) => {
                    warn!("Recommendation failed: {:#}", e);
                    Recommendation::Failed(StyleError::recommendation(e))
                }
            }
        };

        SessionReport {
            state: self.state,
            sections,
            recommendation,
        }
    }

    async fn embed_image(&self, image: &PathBuf) -> Result<Vec<f32>> {
        self.embedder
            .embed_images(vec![image.clone()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no embedding returned for {}", image.display()))
    }

    async fn retrieve(
        &self,
        kind: QueryKind,
        query: &str,
        embedding: impl std::future::Future<Output = Result<Vec<f32>>>,
    ) -> RetrievalSection {
        let mut section = RetrievalSection::new(kind);

        let hits = match self.search(embedding).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Similarity query by {} failed: {:#}", kind.label(), e);
                section.failures.push(StyleError::retrieval(kind.label(), e));
                return section;
            }
        };
        info!(
            "Query by {} {:?} returned {} references",
            kind.label(),
            query,
            hits.len()
        );

        for hit in &hits {
            match self.image_loader.load(&hit.uri).await {
                Ok(image) => section.images.push(image),
                Err(e) => {
                    warn!("Error loading image {}: {:#}", hit.uri, e);
                    section.failures.push(StyleError::image_load(&hit.uri, e));
                }
            }
        }
        section.hits = hits;
        section
    }

    async fn search(
        &self,
        embedding: impl std::future::Future<Output = Result<Vec<f32>>>,
    ) -> Result<Vec<RetrievalHit>> {
        let embedding = embedding.await?;
        let outputs = self
            .vector_db
            .search_points(
                &self.collection_name,
                &embedding,
                MAX_RESULTS,
                HashMap::new(),
            )
            .await?;

        Ok(outputs
            .into_iter()
            .take(MAX_RESULTS as usize)
            .map(RetrievalHit::from)
            .collect())
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
