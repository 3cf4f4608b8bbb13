use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NowPlaying,
    Popular,
    Upcoming,
    TopRated,
}

impl Category {
    /// Order used when categories are concatenated into one list.
    pub const ALL: [Category; 4] = [
        Category::NowPlaying,
        Category::Popular,
        Category::Upcoming,
        Category::TopRated,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Category::NowPlaying => "movie/now_playing",
            Category::Popular => "movie/popular",
            Category::Upcoming => "movie/upcoming",
            Category::TopRated => "movie/top_rated",
        }
    }

    pub fn default_page(self) -> u32 {
        match self {
            Category::NowPlaying => 3,
            Category::Popular => 4,
            Category::Upcoming => 1,
            Category::TopRated => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub runtime: Option<i64>,
    #[serde(default)]
    pub adult: bool,
    pub backdrop_path: Option<String>,
    pub belongs_to_collection: Option<CollectionDetails>,
    pub budget: Option<i64>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub popularity: Option<f64>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    pub release_date: Option<String>,
    pub revenue: Option<i64>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    #[serde(default)]
    pub video: bool,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

impl MovieDetail {
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            release_date: self.release_date.clone().unwrap_or_default(),
            poster_path: self.poster_path.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionDetails {
    pub id: i64,
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCompany {
    pub id: i64,
    pub logo_path: Option<String>,
    pub name: String,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind == "Trailer"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PagedResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreditsResponse {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub status_message: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
