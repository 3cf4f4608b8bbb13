use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::api::types::MovieDetail;

/// Separator used when genre and language names are flattened into one column.
pub const LIST_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FavoriteRecord {
    pub id: i64,
    pub title: String,
    pub poster_path: String,
    pub release_date: String,
    pub vote_average: f64,
    pub overview: String,
    pub runtime: i64,
    pub backdrop_path: String,
    pub tagline: String,
    pub genres: String,
    pub spoken_languages: String,
}

impl FavoriteRecord {
    pub fn from_detail(detail: &MovieDetail) -> Self {
        Self {
            id: detail.id,
            title: detail.title.clone(),
            poster_path: detail.poster_path.clone().unwrap_or_default(),
            release_date: detail.release_date.clone().unwrap_or_default(),
            vote_average: detail.vote_average.unwrap_or_default(),
            overview: detail.overview.clone().unwrap_or_default(),
            runtime: detail.runtime.unwrap_or_default(),
            backdrop_path: detail.backdrop_path.clone().unwrap_or_default(),
            tagline: detail.tagline.clone().unwrap_or_default(),
            genres: join_names(detail.genres.iter().map(|genre| genre.name.as_str())),
            spoken_languages: join_names(
                detail
                    .spoken_languages
                    .iter()
                    .map(|language| language.name.as_str()),
            ),
        }
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(LIST_SEPARATOR)
}
