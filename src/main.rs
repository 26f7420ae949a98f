mod error;
mod logging;

use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand};
use emojidb_cache::{Database, Emoji, Favorites, KeyValueStore, Loader, Repository};
use emojidb_config::Config;
use emojidb_source::SourceHandle;
use emojidb_source::backend::LocalSource;
use emojidb_sync::Outcome;
use exn::{OptionExt, ResultExt};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "emojidb", version, about = "Query a local, synchronized emoji store")]
struct Cli {
    /// Config file (TOML, YAML or JSON).
    #[arg(short, long, global = true, env = "EMOJIDB_CONFIG")]
    config: Option<PathBuf>,
    /// Database file, overriding the configured one.
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the dataset if the store is empty or out of date.
    Sync {
        /// JSON file holding the dataset, overriding the configured one.
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// List every emoji in a group.
    Group { group: u32 },
    /// Search by free text; the last word may be incomplete.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Look up an emoji by shortcode.
    Shortcode { shortcode: String },
    /// Look up an emoji by the emoji itself.
    Get { unicode: String },
    /// Record a use of an emoji.
    Favorite { unicode: String },
    /// The most used emoji.
    Top {
        #[arg(default_value_t = 8)]
        n: u32,
    },
    /// Show or set the preferred skin tone (0 to 5).
    SkinTone { tone: Option<u8> },
    /// Delete the database files.
    Reset,
}

fn print_emoji(emoji: &Emoji) {
    let shortcodes: Vec<String> = emoji.shortcodes.iter().map(|s| format!(":{s}:")).collect();
    println!("{}\t{}\t{}", emoji.unicode, emoji.annotation, shortcodes.join(" "));
}

fn print_all(emojis: &[Emoji]) {
    emojis.iter().for_each(print_emoji);
}

async fn sync(config: &Config, db: &Database, source: Option<PathBuf>) -> Result<()> {
    let path = source.or_else(|| config.source.path.clone()).ok_or_raise(|| ErrorKind::NoSource)?;
    let source: SourceHandle = Arc::new(LocalSource::new(path).or_raise(|| ErrorKind::Source)?);
    let loader = Loader::from(db);
    let outcome = match loader.is_empty().await.or_raise(|| ErrorKind::Cache)? {
        true => emojidb_sync::load_first_time(&source, &loader).await,
        false => emojidb_sync::check_for_updates(&source, &loader).await,
    }
    .or_raise(|| ErrorKind::Sync)?;
    match outcome {
        Outcome::UpToDate => println!("Already up to date"),
        Outcome::Loaded { removed, inserted } => println!("Loaded {inserted} emoji (replaced {removed})"),
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let path = cli.database.unwrap_or_else(|| config.database.path.clone());
    if let Command::Reset = cli.command {
        return Database::delete(&path).await.or_raise(|| ErrorKind::Cache);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Cache)?;
    }
    let db = Database::connect_with(&path, config.database.settings()).await.or_raise(|| ErrorKind::Cache)?;
    let repo = Repository::from(&db);
    let result = match cli.command {
        Command::Sync { source } => sync(&config, &db, source).await,
        Command::Group { group } => repo.get_by_group(group).await.map(|e| print_all(&e)).or_raise(|| ErrorKind::Cache),
        Command::Search { query } => repo
            .search_by_query(&query.join(" "))
            .await
            .map(|e| print_all(&e))
            .or_raise(|| ErrorKind::Cache),
        Command::Shortcode { shortcode } => repo
            .search_by_shortcode(&shortcode)
            .await
            .map(|e| e.iter().for_each(print_emoji))
            .or_raise(|| ErrorKind::Cache),
        Command::Get { unicode } => repo
            .get_by_unicode(&unicode)
            .await
            .map(|e| e.iter().for_each(print_emoji))
            .or_raise(|| ErrorKind::Cache),
        Command::Favorite { unicode } => Favorites::from(&db)
            .increment(&unicode)
            .await
            .map(|count| println!("{unicode}\t{count}"))
            .or_raise(|| ErrorKind::Cache),
        Command::Top { n } => Favorites::from(&db).top(n).await.map(|e| print_all(&e)).or_raise(|| ErrorKind::Cache),
        Command::SkinTone { tone } => {
            let kv = KeyValueStore::from(&db);
            let result = match tone {
                Some(tone) => kv.set_preferred_skin_tone(tone).await,
                None => kv.get_preferred_skin_tone().await.map(|tone| println!("{tone}")),
            };
            result.or_raise(|| ErrorKind::Cache)
        },
        // Handled before connecting.
        Command::Reset => Ok(()),
    };
    db.close().await;
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::Verbosity::from_flags(cli.verbose, cli.quiet));
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["emojidb", "top", "3", "--database", "/tmp/emoji.sqlite", "-v"]).unwrap();
        assert!(matches!(cli.command, Command::Top { n: 3 }));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/emoji.sqlite")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::try_parse_from(["emojidb", "search", "grinning", "fa"]).unwrap();
        let Command::Search { query } = cli.command else { panic!("expected search") };
        assert_eq!(query.join(" "), "grinning fa");
    }

    #[test]
    fn test_search_requires_a_query() {
        assert!(Cli::try_parse_from(["emojidb", "search"]).is_err());
    }
}
