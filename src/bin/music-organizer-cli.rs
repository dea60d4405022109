use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use music_organizer::state::format_duration;
use music_organizer::{
    AlbumDetailsViewModel, Config, FavoriteAlbum, FavoriteStore, FavoritesViewModel, LastFmApi,
    Repository, SearchViewModel, TopAlbumsViewModel,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "music-organizer-cli")]
#[command(about = "Search Last.fm and keep a list of favorite albums", long_about = None)]
struct Cli {
    /// Last.fm API key (can also be set via LASTFM_API_KEY env var)
    #[arg(long, env = "LASTFM_API_KEY", default_value = "")]
    api_key: String,

    /// Favorites database file
    #[arg(long, default_value = music_organizer::config::DEFAULT_DATABASE_PATH)]
    db: PathBuf,

    /// Last.fm web service URL
    #[arg(long, default_value = music_organizer::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Log requests and retries
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search artists by name
    Search {
        artist: String,

        /// Number of result pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// List an artist's most played albums
    TopAlbums {
        artist: String,

        /// Number of result pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show tracks and metadata of an album
    Album { artist: String, album: String },
    /// Save one of an artist's top albums as favorite
    Favorite { artist: String, album: String },
    /// List saved favorites
    Favorites,
    /// Show the stored details of a favorite
    FavoriteDetails { mbid: String },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("music_organizer=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn require_api_key(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.api_key.is_empty() {
        return Err("a Last.fm API key is required (--api-key or LASTFM_API_KEY)".into());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::new(cli.api_key)
        .with_base_url(cli.base_url)
        .with_database_path(cli.db);

    let repository = Repository::new(
        Arc::new(LastFmApi::new(&config)?),
        Arc::new(FavoriteStore::open(&config.database_path)?),
        config.retry,
    );

    match &cli.command {
        Commands::Search { artist, pages } => {
            require_api_key(&config)?;
            println!("Searching for '{}'...", artist);
            let vm = SearchViewModel::new(repository, config.page_debounce);
            vm.search(artist).await;
            for _ in 1..*pages {
                let loaded = vm.state().artists.len();
                vm.on_scroll_position_changed(loaded.saturating_sub(1));
                vm.next_page(artist).await;
            }

            let state = vm.state();
            if state.is_error {
                return Err("artist search failed".into());
            }
            for (i, item) in state.artists.iter().enumerate() {
                println!("{}. {} ({} listeners)", i + 1, item.name, item.listeners);
            }
        }
        Commands::TopAlbums { artist, pages } => {
            require_api_key(&config)?;
            let vm = TopAlbumsViewModel::new(repository, config.page_debounce);
            vm.load(artist).await;
            for _ in 1..*pages {
                let loaded = vm.state().albums.len();
                vm.on_scroll_position_changed(loaded.saturating_sub(1));
                vm.next_page(artist).await;
            }

            let state = vm.state();
            if state.is_error {
                return Err("loading top albums failed".into());
            }
            println!(
                "Top albums of {} (page {}/{}):",
                artist, state.page, state.total_pages
            );
            for (i, album) in state.albums.iter().enumerate() {
                println!("{}. {} ({} plays)", i + 1, album.name, album.playcount);
            }
        }
        Commands::Album { artist, album } => {
            require_api_key(&config)?;
            let vm = AlbumDetailsViewModel::new(repository);
            vm.load(artist, album).await;

            let state = vm.state();
            let Some(details) = state.album else {
                return Err(format!("could not load '{}' by {}", album, artist).into());
            };
            println!("{} - {}", details.artist, details.name);
            println!(
                "   {} listeners, {} plays",
                details.listeners, details.playcount
            );
            let tags = details.tag_names();
            if !tags.is_empty() {
                println!("   Tags: {}", tags.join(", "));
            }
            for (i, track) in details.track_list().iter().enumerate() {
                println!(
                    "{:>3}. {} [{}]",
                    track.rank().unwrap_or(i as u64 + 1),
                    track.name,
                    format_duration(track.duration)
                );
            }
            println!(
                "   {} tracks, {}",
                details.track_count(),
                format_duration(details.total_duration())
            );
            if let Some(wiki) = details.wiki.as_ref().filter(|w| !w.summary.is_empty()) {
                println!();
                println!("{}", wiki.summary);
            }
        }
        Commands::Favorite { artist, album } => {
            require_api_key(&config)?;
            let vm = TopAlbumsViewModel::new(repository, config.page_debounce);
            vm.load(artist).await;

            let state = vm.state();
            let Some(item) = state
                .albums
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(album))
            else {
                return Err(format!("'{}' is not among {}'s top albums", album, artist).into());
            };

            let favorite = FavoriteAlbum::from_album_item(item);
            let mbid = favorite.mbid.clone();
            vm.save_album_as_favorite(favorite).await;
            if !vm.state().is_favorite {
                return Err(format!("could not save '{}'", album).into());
            }
            println!("✅ Saved {} - {} ({})", artist, item.name, mbid);
        }
        Commands::Favorites => {
            let vm = FavoritesViewModel::new(repository);
            vm.load().await;

            let state = vm.state();
            if state.is_error {
                return Err("reading favorites failed".into());
            }
            for album in &state.albums {
                println!(
                    "{} - {} ({} plays) [{}]",
                    album.artist_name, album.album_name, album.play_count, album.mbid
                );
            }
        }
        Commands::FavoriteDetails { mbid } => {
            let vm = FavoritesViewModel::new(repository);
            vm.open(mbid).await;

            let Some(details) = vm.state().selected else {
                return Err(format!("no stored details for {}", mbid).into());
            };
            println!("{} - {}", details.artist_name, details.album_name);
            for track in &details.tracks {
                println!(
                    "{:>3}. {} [{}]",
                    track.position,
                    track.name,
                    format_duration(track.duration)
                );
            }
            println!(
                "   {} tracks, {}",
                details.total_tracks,
                format_duration(details.total_duration)
            );
        }
    }

    Ok(())
}
