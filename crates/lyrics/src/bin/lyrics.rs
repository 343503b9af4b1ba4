// ABOUTME: CLI binary for the lyrics extraction engine.
// ABOUTME: Extracts lyrics from a page, searches for a song, or prints the templated candidate URLs.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use digests_lyrics::{candidate_urls, Lyrics, LyricsManager};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lyrics")]
#[command(about = "Find and extract song lyrics from lyrics websites")]
struct Cli {
    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks", global = true)]
    allow_private_networks: bool,

    /// Per-request timeout in seconds
    #[arg(long = "request-timeout", global = true, default_value_t = 30)]
    request_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract lyrics from a single page
    Extract {
        url: String,
        /// Song to pick on pages holding a whole album
        #[arg(long)]
        song: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        /// Print the lyrics record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search the supported sites for a song
    Search(SearchArgs),
    /// Print the templated candidate URLs for a song
    Urls {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        song: String,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    artist: String,
    #[arg(long)]
    song: String,
    #[arg(long)]
    album: Option<String>,
    /// Search API key; without it only templated URLs are tried
    #[arg(long = "api-key", default_value = "")]
    api_key: String,
    /// Search engine id scoping results to lyrics sites
    #[arg(long = "engine-id", default_value = "")]
    engine_id: String,
    /// Resolve up to this many results concurrently instead of stopping at the first
    #[arg(long = "max-results")]
    max_results: Option<usize>,
    /// Overall deadline for --max-results, in seconds
    #[arg(long = "timeout-secs", default_value_t = 30)]
    timeout_secs: u64,
    #[arg(long)]
    json: bool,
}

/// How lyrics are printed. A batch stays a JSON array even with one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Text,
    Json,
    JsonList,
}

impl Output {
    fn new(json: bool, batch: bool) -> Self {
        match (json, batch) {
            (false, _) => Output::Text,
            (true, false) => Output::Json,
            (true, true) => Output::JsonList,
        }
    }
}

fn print_lyrics(out: &mut impl Write, lyrics: &[Lyrics], output: Output) -> io::Result<()> {
    if output != Output::Text {
        let rendered = match (output, lyrics) {
            (Output::Json, [single]) => serde_json::to_string_pretty(single),
            _ => serde_json::to_string_pretty(lyrics),
        };
        writeln!(out, "{}", rendered.map_err(io::Error::other)?)?;
        return Ok(());
    }

    for (i, item) in lyrics.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        match &item.artist {
            Some(artist) => writeln!(out, "{} - {}", artist, item.title)?,
            None => writeln!(out, "{}", item.title)?,
        }
        writeln!(out, "[{}] {}", item.origin.source_name, item.origin.url)?;
        writeln!(out)?;
        writeln!(out, "{}", item.lyrics)?;
    }
    Ok(())
}

async fn run(cli: Cli, out: &mut impl Write) -> Result<(), String> {
    let builder = LyricsManager::builder()
        .allow_private_networks(cli.allow_private_networks)
        .timeout(Duration::from_secs(cli.request_timeout));

    let (lyrics, output) = match cli.command {
        Command::Urls {
            artist,
            album,
            song,
        } => {
            for url in candidate_urls(&artist, album.as_deref(), &song) {
                writeln!(out, "{}", url).map_err(|e| format!("error writing output: {}", e))?;
            }
            return Ok(());
        }
        Command::Extract {
            url,
            song,
            artist,
            json,
        } => {
            let manager = builder.build();
            let lyrics = manager
                .extract_lyrics(&url, song.as_deref(), artist.as_deref())
                .await
                .map_err(|e| format!("error extracting {}: {}", url, e))?;
            (vec![lyrics], Output::new(json, false))
        }
        Command::Search(args) => {
            let manager = builder.search_engine_id(&args.engine_id).build();
            let mut result = manager
                .search_lyrics(&args.song, args.album.as_deref(), &args.artist, &args.api_key)
                .map_err(|e| format!("error starting search: {}", e))?;
            let lyrics = match args.max_results {
                Some(max) => {
                    let items = result
                        .to_list(max, Duration::from_secs(args.timeout_secs))
                        .await;
                    if items.is_empty() {
                        return Err(format!("no lyrics found for {}", result.query()));
                    }
                    items
                }
                None => vec![result
                    .next(true)
                    .await
                    .map_err(|e| format!("error searching: {}", e))?],
            };
            (lyrics, Output::new(args.json, args.max_results.is_some()))
        }
    };

    print_lyrics(out, &lyrics, output).map_err(|e| format!("error writing output: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    match run(cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(1)
        }
    }
}
