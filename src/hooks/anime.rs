use std::sync::Arc;

use futures::FutureExt;

use super::{FetchHook, Guard};
use crate::api::AnimeClient;
use crate::config::HookConfig;
use crate::api::models::{
    AnimeDetails, Episode, HomepageData, SearchResponse, Server, StreamType, StreamingLink,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    pub keyword: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInput {
    pub query: String,
    pub category: Option<String>,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInput {
    pub episode_id: String,
    pub server: String,
    pub stream_type: StreamType,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn search_guard(input: &SearchInput) -> Guard {
    if blank(&input.keyword) {
        Guard::Clear
    } else {
        Guard::Fetch
    }
}

fn keyword_guard(keyword: &String) -> Guard {
    if blank(keyword) {
        Guard::Clear
    } else {
        Guard::Fetch
    }
}

fn anime_id_guard(id: &String) -> Guard {
    if id.is_empty() {
        Guard::Reject("Anime ID is required")
    } else {
        Guard::Fetch
    }
}

fn episode_id_guard(id: &String) -> Guard {
    if id.is_empty() {
        Guard::Reject("Episode ID is required")
    } else {
        Guard::Fetch
    }
}

fn stream_guard(input: &StreamInput) -> Guard {
    episode_id_guard(&input.episode_id)
}

pub fn use_homepage(client: Arc<AnimeClient>) -> FetchHook<(), HomepageData> {
    let hook = FetchHook::new(
        move |()| {
            let client = client.clone();
            async move { client.homepage().await }.boxed()
        },
        "Failed to fetch homepage data",
    );
    hook.update(());
    hook
}

pub fn use_search_anime(
    client: Arc<AnimeClient>,
    keyword: &str,
    page: u32,
) -> FetchHook<SearchInput, SearchResponse> {
    let hook = FetchHook::new(
        move |input: SearchInput| {
            let client = client.clone();
            async move { client.search_anime(&input.keyword, input.page).await }.boxed()
        },
        "Failed to search anime",
    )
    .with_guard(search_guard);
    hook.update(SearchInput {
        keyword: keyword.to_string(),
        page,
    });
    hook
}

pub fn use_suggestions(
    client: Arc<AnimeClient>,
    keyword: &str,
    config: &HookConfig,
) -> FetchHook<String, Vec<String>> {
    let hook = FetchHook::new(
        move |keyword: String| {
            let client = client.clone();
            async move { client.suggestions(&keyword).await }.boxed()
        },
        "Failed to fetch suggestions",
    )
    .with_guard(keyword_guard)
    .with_debounce(config.suggestion_debounce());
    hook.update(keyword.to_string());
    hook
}

pub fn use_anime_details(
    client: Arc<AnimeClient>,
    anime_id: &str,
) -> FetchHook<String, AnimeDetails> {
    let hook = FetchHook::new(
        move |id: String| {
            let client = client.clone();
            async move { client.anime_details(&id).await }.boxed()
        },
        "Failed to fetch anime details",
    )
    .with_guard(anime_id_guard);
    hook.update(anime_id.to_string());
    hook
}

pub fn use_anime_list(
    client: Arc<AnimeClient>,
    query: &str,
    category: Option<&str>,
    page: u32,
) -> FetchHook<ListInput, SearchResponse> {
    let hook = FetchHook::new(
        move |input: ListInput| {
            let client = client.clone();
            async move {
                client
                    .anime_list(&input.query, input.category.as_deref(), input.page)
                    .await
            }
            .boxed()
        },
        "Failed to fetch anime list",
    );
    hook.update(ListInput {
        query: query.to_string(),
        category: category.map(str::to_string),
        page,
    });
    hook
}

pub fn use_episodes(client: Arc<AnimeClient>, anime_id: &str) -> FetchHook<String, Vec<Episode>> {
    let hook = FetchHook::new(
        move |id: String| {
            let client = client.clone();
            async move { client.episodes(&id).await }.boxed()
        },
        "Failed to fetch episodes",
    )
    .with_guard(anime_id_guard);
    hook.update(anime_id.to_string());
    hook
}

pub fn use_servers(client: Arc<AnimeClient>, episode_id: &str) -> FetchHook<String, Vec<Server>> {
    let hook = FetchHook::new(
        move |id: String| {
            let client = client.clone();
            async move { client.servers(&id).await }.boxed()
        },
        "Failed to fetch servers",
    )
    .with_guard(episode_id_guard);
    hook.update(episode_id.to_string());
    hook
}

pub fn use_streaming_links(
    client: Arc<AnimeClient>,
    input: StreamInput,
) -> FetchHook<StreamInput, StreamingLink> {
    let hook = FetchHook::new(
        move |input: StreamInput| {
            let client = client.clone();
            async move {
                client
                    .streaming_links(&input.episode_id, &input.server, input.stream_type)
                    .await
            }
            .boxed()
        },
        "Failed to fetch streaming links",
    )
    .with_guard(stream_guard);
    hook.update(input);
    hook
}

pub fn use_genres(client: Arc<AnimeClient>) -> FetchHook<(), Vec<String>> {
    let hook = FetchHook::new(
        move |()| {
            let client = client.clone();
            async move { client.genres().await }.boxed()
        },
        "Failed to fetch genres",
    );
    hook.update(());
    hook
}
