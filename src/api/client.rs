use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::availability::{AvailabilityCache, Prober};
use super::envelope::Envelope;
use super::models::{
    AnimeDetails, Episode, HomepageData, SearchResponse, Server, StreamType, StreamingLink,
};
use super::transport::{HttpTransport, Query, Transport};
use crate::config::Config;
use crate::error::Result;
use crate::mock::{Latency, MockProvider};

/// One backend route: path, query string and the message reported when it
/// fails without a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Query,
    pub failure: &'static str,
}

impl Endpoint {
    fn new(path: impl Into<String>, failure: &'static str) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            failure,
        }
    }

    fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn homepage() -> Self {
        Self::new("/home/", "Failed to fetch homepage data")
    }

    pub fn search(keyword: &str, page: u32) -> Self {
        Self::new("/search/", "Failed to search anime")
            .param("keyword", keyword)
            .param("page", page)
    }

    pub fn suggestions(keyword: &str) -> Self {
        Self::new("/suggestion/", "Failed to fetch suggestions").param("keyword", keyword)
    }

    pub fn anime_details(anime_id: &str) -> Self {
        Self::new(
            format!("/anime/{}/", urlencoding::encode(anime_id)),
            "Failed to fetch anime details",
        )
    }

    pub fn anime_list(query: &str, category: Option<&str>, page: u32) -> Self {
        let path = match category {
            Some(category) => format!(
                "/animes/{}/{}/",
                urlencoding::encode(query),
                urlencoding::encode(category)
            ),
            None => format!("/animes/{}/", urlencoding::encode(query)),
        };
        Self::new(path, "Failed to fetch anime list").param("page", page)
    }

    pub fn episodes(anime_id: &str) -> Self {
        Self::new(
            format!("/episodes/{}/", urlencoding::encode(anime_id)),
            "Failed to fetch episodes",
        )
    }

    pub fn servers(episode_id: &str) -> Self {
        Self::new("/servers/", "Failed to fetch servers").param("id", episode_id)
    }

    pub fn streaming_links(episode_id: &str, server: &str, stream_type: StreamType) -> Self {
        Self::new("/stream/", "Failed to fetch streaming links")
            .param("id", episode_id)
            .param("server", server)
            .param("type", stream_type.as_query_param())
    }

    pub fn genres() -> Self {
        Self::new("/genres/", "Failed to fetch genres")
    }
}

/// Availability probe plus the mock data served when it says no
struct Fallback {
    prober: Prober,
    mock: Arc<MockProvider>,
}

/// Typed access to the anime backend. Every call resolves to an
/// [`Envelope`]; transport and decode errors never escape.
pub struct AnimeClient {
    transport: Arc<dyn Transport>,
    /// `None` for the direct variant, which never probes or falls back
    fallback: Option<Fallback>,
}

impl AnimeClient {
    /// Talk to the backend only; failures become `success: false`.
    pub fn direct(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            fallback: None,
        }
    }

    /// Probe once through `cache` and serve `mock` whenever the backend is
    /// down or a request fails.
    pub fn with_fallback(
        transport: Arc<dyn Transport>,
        cache: Arc<AvailabilityCache>,
        mock: Arc<MockProvider>,
    ) -> Self {
        Self {
            fallback: Some(Fallback {
                prober: Prober::new(cache, transport.clone()),
                mock,
            }),
            transport,
        }
    }

    pub fn from_config(config: &Config, cache: Arc<AvailabilityCache>) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
            &config.api.base_url,
            config.effective_timeout(),
            config.probe_timeout(),
        )?);

        if config.api.mock_fallback {
            let mock = Arc::new(MockProvider::new(Latency::from(&config.mock)));
            Ok(Self::with_fallback(transport, cache, mock))
        } else {
            Ok(Self::direct(transport))
        }
    }

    pub fn uses_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<Envelope<T>> {
        let body = self.transport.get(&endpoint.path, &endpoint.query).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Route `endpoint` to the backend when it is reachable, otherwise (or on
    /// any error) to the mock call built by `serve_mock`.
    async fn resolve<'a, T, F, Fut>(&'a self, endpoint: Endpoint, serve_mock: F) -> Envelope<T>
    where
        T: DeserializeOwned,
        F: FnOnce(&'a MockProvider) -> Fut,
        Fut: Future<Output = Envelope<T>>,
    {
        let Some(Fallback { prober, mock }) = &self.fallback else {
            return match self.fetch(&endpoint).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(path = %endpoint.path, error = %e, "{}", endpoint.failure);
                    Envelope::failure(endpoint.failure)
                }
            };
        };

        if !prober.is_available().await {
            debug!(path = %endpoint.path, "Backend unavailable, serving mock data");
            return serve_mock(mock.as_ref()).await;
        }

        match self.fetch(&endpoint).await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(path = %endpoint.path, error = %e, "Request failed, serving mock data");
                serve_mock(mock.as_ref()).await
            }
        }
    }

    pub async fn homepage(&self) -> Envelope<HomepageData> {
        self.resolve(Endpoint::homepage(), |mock| mock.homepage())
            .await
    }

    pub async fn search_anime(&self, keyword: &str, page: u32) -> Envelope<SearchResponse> {
        self.resolve(Endpoint::search(keyword, page), |mock| {
            mock.search(keyword, page)
        })
        .await
    }

    pub async fn suggestions(&self, keyword: &str) -> Envelope<Vec<String>> {
        self.resolve(Endpoint::suggestions(keyword), |mock| {
            mock.suggestions(keyword)
        })
        .await
    }

    pub async fn anime_details(&self, anime_id: &str) -> Envelope<AnimeDetails> {
        self.resolve(Endpoint::anime_details(anime_id), |mock| {
            mock.anime_details(anime_id)
        })
        .await
    }

    pub async fn anime_list(
        &self,
        query: &str,
        category: Option<&str>,
        page: u32,
    ) -> Envelope<SearchResponse> {
        self.resolve(Endpoint::anime_list(query, category, page), |mock| {
            mock.anime_list(query, category, page)
        })
        .await
    }

    pub async fn episodes(&self, anime_id: &str) -> Envelope<Vec<Episode>> {
        self.resolve(Endpoint::episodes(anime_id), |mock| mock.episodes(anime_id))
            .await
    }

    pub async fn servers(&self, episode_id: &str) -> Envelope<Vec<Server>> {
        self.resolve(Endpoint::servers(episode_id), |mock| {
            mock.servers(episode_id)
        })
        .await
    }

    pub async fn streaming_links(
        &self,
        episode_id: &str,
        server: &str,
        stream_type: StreamType,
    ) -> Envelope<StreamingLink> {
        self.resolve(
            Endpoint::streaming_links(episode_id, server, stream_type),
            |mock| mock.streaming_links(episode_id, server, stream_type),
        )
        .await
    }

    pub async fn genres(&self) -> Envelope<Vec<String>> {
        self.resolve(Endpoint::genres(), |mock| mock.genres()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::availability::Availability;
    use crate::api::testing::FakeTransport;
    use serde_json::json;
    use std::time::Duration;

    fn fallback_client(transport: Arc<FakeTransport>) -> AnimeClient {
        AnimeClient::with_fallback(
            transport,
            Arc::new(AvailabilityCache::new()),
            Arc::new(MockProvider::new(Latency::none())),
        )
    }

    #[test]
    fn test_endpoint_paths_and_params() {
        assert_eq!(Endpoint::homepage().path, "/home/");
        assert_eq!(Endpoint::genres().path, "/genres/");

        let search = Endpoint::search("one piece", 2);
        assert_eq!(search.path, "/search/");
        assert_eq!(
            search.query,
            vec![("keyword", "one piece".to_string()), ("page", "2".to_string())]
        );

        assert_eq!(Endpoint::anime_list("top-airing", None, 1).path, "/animes/top-airing/");
        assert_eq!(
            Endpoint::anime_list("genre", Some("slice of life"), 1).path,
            "/animes/genre/slice%20of%20life/"
        );
        assert_eq!(Endpoint::anime_details("a/b").path, "/anime/a%2Fb/");
        assert_eq!(Endpoint::episodes("naruto-100").path, "/episodes/naruto-100/");

        let stream = Endpoint::streaming_links("ep-1", "hd1", StreamType::Dub);
        assert_eq!(stream.path, "/stream/");
        assert_eq!(
            stream.query,
            vec![
                ("id", "ep-1".to_string()),
                ("server", "hd1".to_string()),
                ("type", "dub".to_string())
            ]
        );
        assert_eq!(Endpoint::servers("ep-1").query, vec![("id", "ep-1".to_string())]);
    }

    #[tokio::test]
    async fn test_probe_runs_once_across_all_endpoints() {
        let transport = Arc::new(FakeTransport::unreachable());
        let client = fallback_client(transport.clone());

        for _ in 0..3 {
            assert!(client.homepage().await.success);
            assert!(client.search_anime("one", 1).await.success);
            assert!(client.suggestions("na").await.success);
            assert!(client.anime_details("naruto-100").await.success);
            assert!(client.anime_list("most-popular", None, 1).await.success);
            assert!(client.episodes("naruto-100").await.success);
            assert!(client.servers("ep-1").await.success);
            assert!(client.streaming_links("ep-1", "hd1", StreamType::Sub).await.success);
            assert!(client.genres().await.success);
        }

        assert_eq!(transport.probe_count(), 1);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_serves_fixed_servers() {
        let client = fallback_client(Arc::new(FakeTransport::unreachable()));

        let servers = client.servers("any-episode").await;
        assert!(servers.success);
        let ids: Vec<String> = servers
            .data
            .unwrap()
            .into_iter()
            .map(|s| s.server_id)
            .collect();
        assert_eq!(ids, ["hd1", "hd2", "serverx"]);
    }

    #[tokio::test]
    async fn test_reachable_backend_body_is_returned_verbatim() {
        let transport = Arc::new(FakeTransport::reachable().respond(
            "/genres/",
            json!({"success": true, "data": ["Isekai"]}),
        ));
        let client = fallback_client(transport.clone());

        let genres = client.genres().await;
        assert_eq!(genres, Envelope::ok(vec!["Isekai".to_string()]));
        assert_eq!(transport.calls(), vec![("/genres/".to_string(), Vec::new())]);
    }

    #[tokio::test]
    async fn test_backend_business_failure_is_not_replaced() {
        let transport = Arc::new(FakeTransport::reachable().respond(
            "/anime/naruto-100/",
            json!({"success": false, "message": "Scrape failed"}),
        ));
        let client = fallback_client(transport);

        let details = client.anime_details("naruto-100").await;
        assert_eq!(details, Envelope::failure("Scrape failed"));
    }

    #[tokio::test]
    async fn test_request_error_falls_back_to_mock() {
        let transport = Arc::new(FakeTransport::reachable());
        let client = fallback_client(transport.clone());

        let result = client.search_anime("one", 1).await;
        let data = result.data.unwrap();
        assert_eq!(data.response.len(), 1);
        assert_eq!(data.response[0].title, "One Piece");
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_decode_error_falls_back_to_mock() {
        let transport =
            Arc::new(FakeTransport::reachable().respond("/home/", json!({"unexpected": true})));
        let client = fallback_client(transport);

        let home = client.homepage().await.data.unwrap();
        assert_eq!(home.spotlight.len(), 2);
    }

    #[tokio::test]
    async fn test_stream_fallback_after_backend_error() {
        let client = fallback_client(Arc::new(FakeTransport::reachable()));

        let link = client
            .streaming_links("ep-9", "serverx", StreamType::Sub)
            .await
            .data
            .unwrap();
        assert_eq!(link.server, "serverx");
        assert_eq!(link.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_direct_client_never_probes() {
        let transport = Arc::new(FakeTransport::unreachable());
        let client = AnimeClient::direct(transport.clone());
        assert!(!client.uses_fallback());

        assert_eq!(
            client.search_anime("one", 1).await,
            Envelope::failure("Failed to search anime")
        );
        assert_eq!(
            client.servers("ep-1").await,
            Envelope::failure("Failed to fetch servers")
        );
        assert_eq!(
            client.anime_list("top-airing", Some("tv"), 2).await,
            Envelope::failure("Failed to fetch anime list")
        );
        assert_eq!(transport.probe_count(), 0);
        assert_eq!(transport.calls().len(), 3);
        assert_eq!(transport.calls()[2].0, "/animes/top-airing/tv/");
    }

    #[tokio::test]
    async fn test_shared_cache_spans_clients() {
        let cache = Arc::new(AvailabilityCache::new());
        let transport = Arc::new(FakeTransport::unreachable());
        let mock = Arc::new(MockProvider::new(Latency::none()));

        let first = AnimeClient::with_fallback(transport.clone(), cache.clone(), mock.clone());
        let second = AnimeClient::with_fallback(transport.clone(), cache.clone(), mock);

        first.genres().await;
        second.genres().await;
        assert_eq!(transport.probe_count(), 1);
        assert_eq!(cache.get(), Availability::Unavailable);

        cache.reset();
        second.genres().await;
        assert_eq!(transport.probe_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_across_clients_probe_once() {
        let cache = Arc::new(AvailabilityCache::new());
        let transport =
            Arc::new(FakeTransport::unreachable().with_probe_delay(Duration::from_millis(50)));
        let mock = Arc::new(MockProvider::new(Latency::none()));

        let first = AnimeClient::with_fallback(transport.clone(), cache.clone(), mock.clone());
        let second = AnimeClient::with_fallback(transport.clone(), cache.clone(), mock);

        let (a, b) = tokio::join!(first.genres(), second.genres());
        assert!(a.success && b.success);
        assert_eq!(transport.probe_count(), 1);
        assert_eq!(cache.get(), Availability::Unavailable);
    }
}
