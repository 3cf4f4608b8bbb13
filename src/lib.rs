pub mod core;

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

pub use crate::core::api::client::{FetchError, TmdbClient};
pub use crate::core::api::types::{
    CastMember, Category, MovieDetail, MovieSummary, Video,
};
pub use crate::core::api::MovieGateway;
pub use crate::core::catalog::aggregate::AGGREGATE_FAILURE_MESSAGE;
pub use crate::core::config::{ApiSettings, AppConfig, ConfigError};
pub use crate::core::state::{FetchResult, LiveState, DEFAULT_FAILURE_MESSAGE};
pub use crate::core::storage::models::FavoriteRecord;
pub use crate::core::storage::repository::{FavoriteRepository, StorageError};

use crate::core::catalog::Catalog;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client error: {0}")]
    Client(#[from] FetchError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Installs the global `tracing` subscriber. Honors `RUST_LOG`, defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init();
}

/// Operations offered to the presentation layer.
#[derive(Clone)]
pub struct MovieService {
    catalog: Catalog,
    favorites: FavoriteRepository,
    all_movies: Arc<LiveState<Vec<MovieSummary>>>,
}

impl MovieService {
    pub fn new(gateway: Arc<dyn MovieGateway>, favorites: FavoriteRepository) -> Self {
        Self {
            catalog: Catalog::new(gateway),
            favorites,
            all_movies: Arc::new(LiveState::new()),
        }
    }

    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let client = TmdbClient::from_settings(config.api.clone())?;
        let favorites = FavoriteRepository::connect(&config.database_url).await?;
        tracing::info!(base_url = %config.api.base_url, "movie service ready");
        Ok(Self::new(Arc::new(client), favorites))
    }

    pub async fn fetch_category(&self, category: Category) -> FetchResult<Vec<MovieSummary>> {
        self.catalog.category(category).await
    }

    pub async fn fetch_detail(&self, movie_id: i64) -> FetchResult<MovieDetail> {
        self.catalog.detail(movie_id).await
    }

    pub async fn fetch_credits(&self, movie_id: i64) -> FetchResult<Vec<CastMember>> {
        self.catalog.credits(movie_id).await
    }

    pub async fn fetch_similar(&self, movie_id: i64) -> FetchResult<Vec<MovieSummary>> {
        self.catalog.similar(movie_id).await
    }

    pub async fn fetch_trailers(&self, movie_id: i64) -> FetchResult<Vec<Video>> {
        self.catalog.trailers(movie_id).await
    }

    pub async fn fetch_aggregate(&self) -> FetchResult<Vec<MovieSummary>> {
        self.catalog.aggregate().await
    }

    pub async fn fetch_browse(&self) -> FetchResult<Vec<MovieSummary>> {
        self.catalog.browse().await
    }

    pub async fn search(&self, query: &str) -> FetchResult<Vec<MovieSummary>> {
        self.catalog.search(query).await
    }

    pub fn watch_aggregate(&self) -> watch::Receiver<FetchResult<Vec<MovieSummary>>> {
        self.all_movies.subscribe()
    }

    /// Re-runs the aggregate fetch, publishing `Loading` first.
    pub async fn refresh_aggregate(&self) -> FetchResult<Vec<MovieSummary>> {
        self.all_movies.run(self.catalog.aggregate()).await
    }

    pub async fn add_favorite(&self, detail: &MovieDetail) -> Result<FavoriteRecord, StorageError> {
        let record = FavoriteRecord::from_detail(detail);
        self.favorites.put(&record).await?;
        Ok(record)
    }

    pub async fn remove_favorite(&self, movie_id: i64) -> Result<(), StorageError> {
        self.favorites.delete_by_id(movie_id).await?;
        Ok(())
    }

    pub async fn list_favorites(&self) -> Result<Vec<FavoriteRecord>, StorageError> {
        self.favorites.list_all().await
    }

    pub async fn is_favorite(&self, movie_id: i64) -> Result<bool, StorageError> {
        self.favorites.contains(movie_id).await
    }
}
