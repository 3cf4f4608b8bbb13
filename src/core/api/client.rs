use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::types::{
    ApiErrorBody, CastMember, Category, CreditsResponse, MovieDetail, MovieSummary, PagedResponse,
    Video,
};
use super::MovieGateway;
use crate::core::config::ApiSettings;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// TMDB v3 client. Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, settings: ApiSettings) -> Self {
        Self { client, settings }
    }

    pub fn from_settings(settings: ApiSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self::new(client, settings))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.url(path);
        tracing::debug!(%url, "requesting movie api");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.settings.api_key.as_str()),
                ("language", self.settings.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MovieGateway for TmdbClient {
    async fn list_category(
        &self,
        category: Category,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        let response: PagedResponse<MovieSummary> = self
            .get_json(category.path(), &[("page", page.to_string())])
            .await?;
        Ok(response.results)
    }

    async fn movie_detail(&self, movie_id: i64) -> Result<MovieDetail, FetchError> {
        self.get_json(&format!("movie/{movie_id}"), &[]).await
    }

    async fn movie_credits(&self, movie_id: i64) -> Result<Vec<CastMember>, FetchError> {
        let response: CreditsResponse = self
            .get_json(&format!("movie/{movie_id}/credits"), &[])
            .await?;
        Ok(response.cast)
    }

    async fn similar_movies(
        &self,
        movie_id: i64,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        let response: PagedResponse<MovieSummary> = self
            .get_json(
                &format!("movie/{movie_id}/similar"),
                &[("page", page.to_string())],
            )
            .await?;
        Ok(response.results)
    }

    async fn movie_videos(&self, movie_id: i64) -> Result<Vec<Video>, FetchError> {
        let response: PagedResponse<Video> = self
            .get_json(&format!("movie/{movie_id}/videos"), &[])
            .await?;
        Ok(response.results)
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        let response: PagedResponse<MovieSummary> = self
            .get_json("search/movie", &[("query", query.to_string())])
            .await?;
        Ok(response.results)
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> FetchError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.status_message)
        .filter(|message| !message.trim().is_empty())
        .or_else(|| status.canonical_reason().map(ToString::to_string))
        .unwrap_or_else(|| "unexpected status code".to_string());
    FetchError::Api {
        status: status.as_u16(),
        message,
    }
}
