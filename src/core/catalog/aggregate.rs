use std::sync::Arc;

use tokio::task::JoinSet;

use super::fetch_category;
use crate::core::api::types::{Category, MovieSummary};
use crate::core::api::MovieGateway;
use crate::core::state::FetchResult;

pub const AGGREGATE_FAILURE_MESSAGE: &str = "Failed to load all movies";

/// Concatenates every list in order if all members succeeded.
///
/// Any member that is not `Success` collapses the whole result into a single
/// generic failure; individual messages are dropped.
pub fn combine_all<T>(results: Vec<FetchResult<Vec<T>>>) -> FetchResult<Vec<T>> {
    let mut combined = Vec::new();
    for result in results {
        match result {
            FetchResult::Success(items) => combined.extend(items),
            FetchResult::Loading | FetchResult::Failure(_) => {
                return FetchResult::Failure(AGGREGATE_FAILURE_MESSAGE.to_string());
            }
        }
    }
    FetchResult::Success(combined)
}

/// Fetches all `categories` concurrently and merges them with [`combine_all`].
///
/// Dropping the returned future aborts any member still in flight.
pub async fn aggregate_categories(
    gateway: Arc<dyn MovieGateway>,
    categories: &[Category],
) -> FetchResult<Vec<MovieSummary>> {
    let mut tasks = JoinSet::new();
    for (index, category) in categories.iter().copied().enumerate() {
        let gateway = Arc::clone(&gateway);
        tasks.spawn(async move { (index, fetch_category(gateway.as_ref(), category).await) });
    }

    let mut slots: Vec<FetchResult<Vec<MovieSummary>>> =
        categories.iter().map(|_| FetchResult::Loading).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = result,
            Err(error) => tracing::warn!(%error, "category fetch task did not complete"),
        }
    }

    let combined = combine_all(slots);
    match &combined {
        FetchResult::Success(movies) => tracing::info!(
            categories = categories.len(),
            movies = movies.len(),
            "aggregate fetch succeeded"
        ),
        _ => tracing::info!(categories = categories.len(), "aggregate fetch failed"),
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::core::api::client::FetchError;
    use crate::core::api::types::{CastMember, MovieDetail, Video};

    /// Serves one movie per category, except `Upcoming`, which either panics
    /// or parks until `release` is notified.
    #[derive(Default)]
    struct ScriptedGateway {
        panic_on_upcoming: bool,
        started: Notify,
        release: Notify,
        finished: AtomicBool,
    }

    #[async_trait]
    impl MovieGateway for ScriptedGateway {
        async fn list_category(
            &self,
            category: Category,
            _page: u32,
        ) -> Result<Vec<MovieSummary>, FetchError> {
            if category == Category::Upcoming {
                if self.panic_on_upcoming {
                    panic!("upcoming listing blew up");
                }
                self.started.notify_one();
                self.release.notified().await;
                self.finished.store(true, Ordering::SeqCst);
            }
            Ok(vec![movie(i64::from(category.default_page()))])
        }

        async fn movie_detail(&self, _movie_id: i64) -> Result<MovieDetail, FetchError> {
            Err(unused())
        }

        async fn movie_credits(&self, _movie_id: i64) -> Result<Vec<CastMember>, FetchError> {
            Err(unused())
        }

        async fn similar_movies(
            &self,
            _movie_id: i64,
            _page: u32,
        ) -> Result<Vec<MovieSummary>, FetchError> {
            Err(unused())
        }

        async fn movie_videos(&self, _movie_id: i64) -> Result<Vec<Video>, FetchError> {
            Err(unused())
        }

        async fn search_movies(&self, _query: &str) -> Result<Vec<MovieSummary>, FetchError> {
            Err(unused())
        }
    }

    fn unused() -> FetchError {
        FetchError::Api {
            status: 501,
            message: "not scripted".to_string(),
        }
    }

    fn movie(id: i64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            release_date: "2024-01-01".to_string(),
            poster_path: format!("/{id}.jpg"),
        }
    }

    #[test]
    fn combine_all_concatenates_in_order_and_keeps_empty_lists() {
        let combined = combine_all(vec![
            FetchResult::Success(vec![movie(1), movie(2)]),
            FetchResult::Success(Vec::new()),
            FetchResult::Success(vec![movie(3)]),
        ]);
        let ids: Vec<i64> = combined
            .success()
            .expect("all members succeeded")
            .iter()
            .map(|movie| movie.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn combine_all_fails_on_any_failure_with_generic_message() {
        let combined = combine_all(vec![
            FetchResult::Success(vec![movie(1)]),
            FetchResult::Failure("timeout".to_string()),
            FetchResult::Failure("401".to_string()),
        ]);
        assert_eq!(
            combined,
            FetchResult::Failure(AGGREGATE_FAILURE_MESSAGE.to_string())
        );
    }

    #[test]
    fn combine_all_treats_unresolved_member_as_failure() {
        let combined = combine_all(vec![FetchResult::Success(vec![movie(1)]), FetchResult::Loading]);
        assert_eq!(combined.failure_message(), Some(AGGREGATE_FAILURE_MESSAGE));
    }

    #[test]
    fn combine_all_of_nothing_is_empty_success() {
        let combined = combine_all::<MovieSummary>(Vec::new());
        assert_eq!(combined, FetchResult::Success(Vec::new()));
    }

    #[tokio::test]
    async fn panicking_member_fails_the_whole_aggregate() {
        let gateway = Arc::new(ScriptedGateway {
            panic_on_upcoming: true,
            ..ScriptedGateway::default()
        });

        let result = aggregate_categories(gateway, &Category::ALL).await;

        assert_eq!(
            result,
            FetchResult::Failure(AGGREGATE_FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn dropping_aggregate_aborts_blocked_member() {
        let gateway = Arc::new(ScriptedGateway::default());
        let shared: Arc<dyn MovieGateway> = gateway.clone();

        tokio::select! {
            _ = aggregate_categories(shared, &Category::ALL) => {
                panic!("aggregate cannot finish while upcoming is parked");
            }
            _ = gateway.started.notified() => {}
        }

        gateway.release.notify_one();
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }

        assert!(!gateway.finished.load(Ordering::SeqCst));
    }
}
