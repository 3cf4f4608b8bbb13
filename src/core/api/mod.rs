pub mod client;
pub mod types;

use async_trait::async_trait;

use client::FetchError;
use types::{CastMember, Category, MovieDetail, MovieSummary, Video};

/// Read-only queries against the movie metadata service.
///
/// Implementations raise [`FetchError`]; turning errors into
/// `FetchResult::Failure` is the caller's job.
#[async_trait]
pub trait MovieGateway: Send + Sync {
    async fn list_category(
        &self,
        category: Category,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError>;

    async fn movie_detail(&self, movie_id: i64) -> Result<MovieDetail, FetchError>;

    async fn movie_credits(&self, movie_id: i64) -> Result<Vec<CastMember>, FetchError>;

    async fn similar_movies(
        &self,
        movie_id: i64,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError>;

    async fn movie_videos(&self, movie_id: i64) -> Result<Vec<Video>, FetchError>;

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError>;
}
