pub mod aggregate;

use std::fmt::Display;
use std::sync::Arc;

use crate::core::api::types::{CastMember, Category, MovieDetail, MovieSummary, Video};
use crate::core::api::MovieGateway;
use crate::core::state::FetchResult;

/// Categories listed on the search screen before the user types a query.
pub const BROWSE_CATEGORIES: [Category; 3] =
    [Category::NowPlaying, Category::Popular, Category::Upcoming];

/// Boundary between the gateway and callers: every gateway error stops here
/// and comes out as `FetchResult::Failure`.
#[derive(Clone)]
pub struct Catalog {
    gateway: Arc<dyn MovieGateway>,
}

impl Catalog {
    pub fn new(gateway: Arc<dyn MovieGateway>) -> Self {
        Self { gateway }
    }

    pub async fn category(&self, category: Category) -> FetchResult<Vec<MovieSummary>> {
        fetch_category(self.gateway.as_ref(), category).await
    }

    pub async fn detail(&self, movie_id: i64) -> FetchResult<MovieDetail> {
        settle("detail", self.gateway.movie_detail(movie_id).await)
    }

    pub async fn credits(&self, movie_id: i64) -> FetchResult<Vec<CastMember>> {
        settle("credits", self.gateway.movie_credits(movie_id).await)
    }

    pub async fn similar(&self, movie_id: i64) -> FetchResult<Vec<MovieSummary>> {
        settle("similar", self.gateway.similar_movies(movie_id, 1).await)
    }

    /// YouTube trailers only; teasers, clips and other hosts are dropped.
    pub async fn trailers(&self, movie_id: i64) -> FetchResult<Vec<Video>> {
        settle("videos", self.gateway.movie_videos(movie_id).await).map(|videos| {
            videos
                .into_iter()
                .filter(Video::is_youtube_trailer)
                .collect()
        })
    }

    pub async fn search(&self, query: &str) -> FetchResult<Vec<MovieSummary>> {
        settle("search", self.gateway.search_movies(query).await)
    }

    pub async fn aggregate(&self) -> FetchResult<Vec<MovieSummary>> {
        aggregate::aggregate_categories(Arc::clone(&self.gateway), &Category::ALL).await
    }

    pub async fn browse(&self) -> FetchResult<Vec<MovieSummary>> {
        aggregate::aggregate_categories(Arc::clone(&self.gateway), &BROWSE_CATEGORIES).await
    }
}

pub(crate) async fn fetch_category(
    gateway: &dyn MovieGateway,
    category: Category,
) -> FetchResult<Vec<MovieSummary>> {
    let result = gateway
        .list_category(category, category.default_page())
        .await;
    settle(category.path(), result)
}

fn settle<T, E: Display>(operation: &str, result: Result<T, E>) -> FetchResult<T> {
    if let Err(error) = &result {
        tracing::warn!(operation, %error, "movie api call failed");
    }
    FetchResult::from_result(result)
}
