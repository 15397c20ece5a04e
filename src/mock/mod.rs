//! In-memory stand-in for the backend, used when it cannot be reached.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::api::envelope::Envelope;
use crate::api::models::{
    AiringStatus, Anime, AnimeDetails, Episode, HomepageData, PageInfo, SearchResponse, Server,
    StreamType, StreamingLink,
};
use crate::config::MockConfig;

pub mod catalog;

pub const PAGE_SIZE: usize = 10;
pub const SUGGESTION_LIMIT: usize = 5;

/// Simulated response delay range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub min: Duration,
    pub max: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from(&MockConfig::default())
    }
}

impl From<&MockConfig> for Latency {
    fn from(config: &MockConfig) -> Self {
        Self {
            min: Duration::from_millis(config.min_latency_ms),
            max: Duration::from_millis(config.min_latency_ms.max(config.max_latency_ms)),
        }
    }
}

pub struct MockProvider {
    catalog: Vec<Anime>,
    episodes: Vec<Episode>,
    genres: Vec<String>,
    latency: Latency,
}

impl MockProvider {
    pub fn new(latency: Latency) -> Self {
        Self {
            catalog: catalog::anime_catalog(),
            episodes: catalog::episode_list(),
            genres: catalog::genre_list(),
            latency,
        }
    }

    /// Replace the anime fixture, mostly for paging tests
    pub fn with_catalog(mut self, catalog: Vec<Anime>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &[Anime] {
        &self.catalog
    }

    async fn delay(&self) {
        let wait = self.latency.sample();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    fn head(&self, n: usize) -> Vec<Anime> {
        self.catalog.iter().take(n).cloned().collect()
    }

    pub async fn homepage(&self) -> Envelope<HomepageData> {
        self.delay().await;

        Envelope::ok(HomepageData {
            spotlight: self.head(2),
            trending: self.head(3),
            top_airing: self.head(4),
            most_popular: self.catalog.clone(),
            most_favorite: self.head(3),
            latest_episode: self.head(4),
            top_upcoming: self.head(2),
            genres: self.genres.clone(),
        })
    }

    pub async fn search(&self, keyword: &str, page: u32) -> Envelope<SearchResponse> {
        self.delay().await;

        let needle = keyword.to_lowercase();
        let matches: Vec<Anime> = self
            .catalog
            .iter()
            .filter(|anime| anime.matches(&needle))
            .cloned()
            .collect();

        debug!(keyword, matches = matches.len(), "Mock search");
        Envelope::ok(paginate(matches, page))
    }

    pub async fn suggestions(&self, keyword: &str) -> Envelope<Vec<String>> {
        self.delay().await;

        let needle = keyword.to_lowercase();
        let titles = self
            .catalog
            .iter()
            .filter(|anime| anime.title_matches(&needle))
            .map(|anime| anime.title.clone())
            .take(SUGGESTION_LIMIT)
            .collect();

        Envelope::ok(titles)
    }

    pub async fn anime_details(&self, id: &str) -> Envelope<AnimeDetails> {
        self.delay().await;

        let Some(anime) = self.catalog.iter().find(|a| a.id == id) else {
            return Envelope::failure("Anime not found");
        };

        Envelope::ok(AnimeDetails {
            id: anime.id.clone(),
            title: anime.title.clone(),
            alternative_title: anime.alternative_title.clone(),
            poster: anime.poster.clone(),
            kind: anime.kind,
            duration: anime.duration.clone(),
            quality: "HD".to_string(),
            release_date: "2020".to_string(),
            status: AiringStatus::Airing,
            mal_id: None,
            anilist_id: None,
            episodes: Some(anime.episodes),
            synopsis: anime
                .description
                .clone()
                .unwrap_or_else(|| "No synopsis available.".to_string()),
            genres: anime.genres.clone().unwrap_or_default(),
            episodes_list: Some(self.episodes.clone()),
        })
    }

    /// `most-popular` sorts a copy by rating, `top-airing` keeps airing
    /// shows, anything else is the whole catalog. `category` is accepted for
    /// parity with the backend route and ignored.
    pub async fn anime_list(
        &self,
        query: &str,
        _category: Option<&str>,
        page: u32,
    ) -> Envelope<SearchResponse> {
        self.delay().await;

        let mut listed = self.catalog.clone();
        match query {
            "most-popular" => listed.sort_by(|a, b| {
                b.rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.rating.unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            "top-airing" => listed.retain(|a| a.status.as_deref() == Some("Airing")),
            _ => {}
        }

        Envelope::ok(paginate(listed, page))
    }

    pub async fn episodes(&self, _anime_id: &str) -> Envelope<Vec<Episode>> {
        self.delay().await;
        Envelope::ok(self.episodes.clone())
    }

    pub async fn genres(&self) -> Envelope<Vec<String>> {
        self.delay().await;
        Envelope::ok(self.genres.clone())
    }

    /// Fixed server list, served without simulated latency
    pub async fn servers(&self, _episode_id: &str) -> Envelope<Vec<Server>> {
        Envelope::ok(catalog::server_list())
    }

    /// A single playable source for whichever server was asked for
    pub async fn streaming_links(
        &self,
        _episode_id: &str,
        server: &str,
        _stream_type: StreamType,
    ) -> Envelope<StreamingLink> {
        Envelope::ok(catalog::streaming_link(server))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(Latency::default())
    }
}

pub fn total_pages(match_count: usize) -> u32 {
    match_count.div_ceil(PAGE_SIZE).max(1) as u32
}

fn paginate(items: Vec<Anime>, page: u32) -> SearchResponse {
    let total_pages = total_pages(items.len());
    let start = (page.max(1) as usize - 1) * PAGE_SIZE;

    SearchResponse {
        page_info: PageInfo {
            total_pages,
            current_page: page,
            has_next_page: page < total_pages,
        },
        response: items.into_iter().skip(start).take(PAGE_SIZE).collect(),
    }
}
