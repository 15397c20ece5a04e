use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnimeType {
    #[default]
    #[serde(rename = "TV")]
    Tv,
    Movie,
    #[serde(rename = "OVA")]
    Ova,
    #[serde(rename = "ONA")]
    Ona,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AiringStatus {
    #[default]
    Airing,
    Completed,
    Upcoming,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    #[default]
    Sub,
    Dub,
}

impl StreamType {
    pub fn as_query_param(&self) -> &'static str {
        match self {
            StreamType::Sub => "sub",
            StreamType::Dub => "dub",
        }
    }
}

impl std::str::FromStr for StreamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sub" => Ok(StreamType::Sub),
            "dub" => Ok(StreamType::Dub),
            other => Err(format!("unknown stream type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EpisodeCounts {
    pub sub: Option<u32>,
    pub dub: Option<u32>,
    pub eps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_title: Option<String>,
    #[serde(default)]
    pub poster: String,
    #[serde(rename = "type", default)]
    pub kind: AnimeType,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub episodes: EpisodeCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Anime {
    /// Case-insensitive substring match on the title only
    pub fn title_matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }

    /// Case-insensitive substring match on the title or alternative title
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title_matches(needle_lower)
            || self
                .alternative_title
                .as_deref()
                .is_some_and(|alt| alt.to_lowercase().contains(needle_lower))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub number: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dub: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillers: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetails {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_title: Option<String>,
    #[serde(default)]
    pub poster: String,
    #[serde(rename = "type", default)]
    pub kind: AnimeType,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub status: AiringStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anilist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<EpisodeCounts>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes_list: Option<Vec<Episode>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub name: String,
    pub server_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub file: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingLink {
    pub sources: Vec<VideoSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<serde_json::Value>>,
    pub server: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_pages: u32,
    pub current_page: u32,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub page_info: PageInfo,
    pub response: Vec<Anime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HomepageData {
    pub spotlight: Vec<Anime>,
    pub trending: Vec<Anime>,
    pub top_airing: Vec<Anime>,
    pub most_popular: Vec<Anime>,
    pub most_favorite: Vec<Anime>,
    pub latest_episode: Vec<Anime>,
    pub top_upcoming: Vec<Anime>,
    pub genres: Vec<String>,
}
