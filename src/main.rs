use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use animestream::api::models::StreamType;
use animestream::api::{AnimeClient, AvailabilityCache};
use animestream::config::{self, Config};
use animestream::error::{Error, Result};

const USAGE: &str = "usage: animestream <command> [args]

commands:
  home
  search <keyword> [page]
  suggest <keyword>
  anime <id>
  list <query> [category] [page]
  episodes <anime-id>
  servers <episode-id>
  stream <episode-id> <server> [sub|dub]
  genres";

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "animestream.log");

    let filter = EnvFilter::builder()
        .with_default_directive(
            "animestream=info"
                .parse()
                .map_err(|e| Error::Usage(format!("bad log directive: {e}")))?,
        )
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Home,
    Search { keyword: String, page: u32 },
    Suggest { keyword: String },
    Anime { id: String },
    List { query: String, category: Option<String>, page: u32 },
    Episodes { anime_id: String },
    Servers { episode_id: String },
    Stream { episode_id: String, server: String, stream_type: StreamType },
    Genres,
}

fn parse_page(arg: Option<&String>) -> Result<u32> {
    match arg {
        None => Ok(1),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Usage(format!("page must be a number, got {raw:?}"))),
    }
}

fn required<'a>(args: &'a [String], idx: usize, name: &str) -> Result<&'a String> {
    args.get(idx)
        .ok_or_else(|| Error::Usage(format!("missing <{name}>")))
}

fn parse_command(args: &[String]) -> Result<Command> {
    let Some(command) = args.first() else {
        return Err(Error::Usage("missing command".to_string()));
    };

    let command = match command.as_str() {
        "home" => Command::Home,
        "search" => Command::Search {
            keyword: required(args, 1, "keyword")?.clone(),
            page: parse_page(args.get(2))?,
        },
        "suggest" => Command::Suggest {
            keyword: required(args, 1, "keyword")?.clone(),
        },
        "anime" => Command::Anime {
            id: required(args, 1, "id")?.clone(),
        },
        "list" => {
            let query = required(args, 1, "query")?.clone();
            // A numeric second argument is the page, not a category
            match args.get(2) {
                Some(arg) if arg.parse::<u32>().is_ok() => Command::List {
                    query,
                    category: None,
                    page: parse_page(Some(arg))?,
                },
                category => Command::List {
                    query,
                    category: category.cloned(),
                    page: parse_page(args.get(3))?,
                },
            }
        }
        "episodes" => Command::Episodes {
            anime_id: required(args, 1, "anime-id")?.clone(),
        },
        "servers" => Command::Servers {
            episode_id: required(args, 1, "episode-id")?.clone(),
        },
        "stream" => Command::Stream {
            episode_id: required(args, 1, "episode-id")?.clone(),
            server: required(args, 2, "server")?.clone(),
            stream_type: match args.get(3) {
                Some(raw) => raw.parse().map_err(Error::Usage)?,
                None => StreamType::Sub,
            },
        },
        "genres" => Command::Genres,
        other => return Err(Error::Usage(format!("unknown command: {other}"))),
    };

    Ok(command)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &AnimeClient, command: Command) -> Result<()> {
    match command {
        Command::Home => print_json(&client.homepage().await),
        Command::Search { keyword, page } => print_json(&client.search_anime(&keyword, page).await),
        Command::Suggest { keyword } => print_json(&client.suggestions(&keyword).await),
        Command::Anime { id } => print_json(&client.anime_details(&id).await),
        Command::List {
            query,
            category,
            page,
        } => print_json(&client.anime_list(&query, category.as_deref(), page).await),
        Command::Episodes { anime_id } => print_json(&client.episodes(&anime_id).await),
        Command::Servers { episode_id } => print_json(&client.servers(&episode_id).await),
        Command::Stream {
            episode_id,
            server,
            stream_type,
        } => print_json(
            &client
                .streaming_links(&episode_id, &server, stream_type)
                .await,
        ),
        Command::Genres => print_json(&client.genres().await),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // stdout carries command output, so logs go to a file
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = Config::load()?;
    info!(
        base_url = %config.api.base_url,
        mock_fallback = config.api.mock_fallback,
        "Loaded config"
    );

    let client = AnimeClient::from_config(&config, Arc::new(AvailabilityCache::new()))?;
    run(&client, command).await
}
