use crate::api::models::{Anime, AnimeType, Episode, EpisodeCounts, Server, StreamingLink, VideoSource};

fn counts(eps: u32) -> EpisodeCounts {
    EpisodeCounts {
        sub: Some(eps),
        dub: Some(eps),
        eps,
    }
}

fn genres(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|g| g.to_string()).collect())
}

#[allow(clippy::too_many_arguments)]
fn anime(
    id: &str,
    title: &str,
    alternative_title: &str,
    poster: &str,
    duration: &str,
    eps: u32,
    rating: f64,
    status: &str,
    genre_names: &[&str],
    description: &str,
) -> Anime {
    Anime {
        id: id.to_string(),
        title: title.to_string(),
        alternative_title: Some(alternative_title.to_string()),
        poster: format!("https://cdn.noitatnemucod.net/thumbnail/300x400/100/{poster}.jpg"),
        kind: AnimeType::Tv,
        duration: duration.to_string(),
        episodes: counts(eps),
        rating: Some(rating),
        status: Some(status.to_string()),
        genres: genres(genre_names),
        description: Some(description.to_string()),
    }
}

pub fn anime_catalog() -> Vec<Anime> {
    vec![
        anime(
            "one-piece-100",
            "One Piece",
            "ワンピース",
            "db8603d2f4fa78e1c42f6cf829030a18",
            "24m",
            1000,
            8.5,
            "Airing",
            &["Action", "Adventure", "Comedy", "Drama", "Shounen"],
            "Gold Roger was known as the \"Pirate King,\" the strongest and most infamous being to have sailed the Grand Line.",
        ),
        anime(
            "naruto-100",
            "Naruto",
            "ナルト",
            "32c83e2ad4a43229996356840db3982c",
            "23m",
            220,
            8.3,
            "Completed",
            &["Action", "Adventure", "Martial Arts", "Shounen", "Super Power"],
            "Naruto Uzumaki is a hyperactive and knuckle-headed ninja still living in Konohagakure.",
        ),
        anime(
            "attack-on-titan-100",
            "Attack on Titan",
            "進撃の巨人",
            "da3a3d57e29aa0dba87cd6e1596b78e9",
            "24m",
            75,
            9.0,
            "Completed",
            &["Action", "Drama", "Fantasy", "Military", "Mystery"],
            "Centuries ago, mankind was slaughtered to near extinction by monstrous humanoid creatures called Titans.",
        ),
        anime(
            "demon-slayer-100",
            "Demon Slayer",
            "鬼滅の刃",
            "fd414879634ea83ad2c4fc1c33e8ac43",
            "24m",
            26,
            8.7,
            "Completed",
            &["Action", "Historical", "Shounen", "Supernatural"],
            "Tanjirou Kamado lives with his impoverished family on a remote mountain.",
        ),
        anime(
            "jujutsu-kaisen-100",
            "Jujutsu Kaisen",
            "呪術廻戦",
            "73d003618cd260df44e93a5baf9acb56",
            "24m",
            24,
            8.5,
            "Completed",
            &["Action", "School", "Shounen", "Supernatural"],
            "Idly indulging in baseless paranormal activities with the Occult Club.",
        ),
    ]
}

pub fn episode_list() -> Vec<Episode> {
    [
        "I'm Luffy! The Man Who's Gonna Be King of the Pirates!",
        "Enter the Great Swordsman! Pirate Hunter, Roronoa Zoro!",
        "Morgan versus Luffy! Who's This Mysterious Pretty Girl?",
    ]
    .iter()
    .zip(1u32..)
    .map(|(title, number)| Episode {
        id: format!("one-piece-100-ep{number}"),
        number,
        title: title.to_string(),
        poster: None,
        duration: Some("24m".to_string()),
        sub: Some(true),
        dub: Some(true),
        fillers: None,
    })
    .collect()
}

pub fn genre_list() -> Vec<String> {
    [
        "Action",
        "Adventure",
        "Comedy",
        "Drama",
        "Fantasy",
        "Horror",
        "Mystery",
        "Romance",
        "Sci-Fi",
        "Slice of Life",
        "Sports",
        "Supernatural",
        "Thriller",
    ]
    .iter()
    .map(|g| g.to_string())
    .collect()
}

pub fn server_list() -> Vec<Server> {
    [("HD-1", "hd1"), ("HD-2", "hd2"), ("Server X", "serverx")]
        .iter()
        .map(|(name, id)| Server {
            name: name.to_string(),
            server_id: id.to_string(),
        })
        .collect()
}

/// Public HLS test stream played for every episode
pub const FALLBACK_STREAM_URL: &str = "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8";

pub fn streaming_link(server: &str) -> StreamingLink {
    StreamingLink {
        sources: vec![VideoSource {
            file: FALLBACK_STREAM_URL.to_string(),
            kind: "hls".to_string(),
            label: Some("Auto".to_string()),
        }],
        tracks: Some(Vec::new()),
        server: server.to_string(),
    }
}
