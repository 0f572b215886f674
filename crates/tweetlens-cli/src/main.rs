mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tweetlens_analytics::AnalyticsConfig;
use tweetlens_core::{AppConfig, LexiconFile};
use tweetlens_store::TweetLibrary;

#[derive(Debug, Parser)]
#[command(name = "tweetlens-cli")]
#[command(about = "Tweet sentiment and analytics from the command line")]
struct Cli {
    /// JSON Lines tweet dataset (overrides TWEETLENS_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// YAML lexicon overrides (overrides TWEETLENS_LEXICON_PATH)
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a piece of text for sentiment
    Score {
        text: String,
    },
    /// List the records most similar to a record
    Similar {
        id: i64,

        #[arg(short, long, default_value_t = 5)]
        n: i64,
    },
    /// Most frequent words across the dataset or a subset of records
    Words {
        /// Number of words to show; every word when omitted
        #[arg(short, long)]
        n: Option<i64>,

        /// Restrict counting to these record ids
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,
    },
    /// Records whose cleaned text contains a keyword
    Search {
        keyword: String,
    },
    /// Records created between two YYYYMMDD dates, inclusive
    Filter {
        start_date: String,
        end_date: String,
    },
    /// Show one random record
    Random,
    /// Record and sentiment label counts
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("tweetlens-cli ready; see --help for commands");
        return Ok(());
    };

    let config = tweetlens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let overrides = load_overrides(cli.lexicon.as_ref(), &config)?;
    let analytics = AnalyticsConfig::from_app_config(&config);

    let library = if let Commands::Score { .. } = command {
        TweetLibrary::from_tweets(&analytics, &[], overrides.as_ref())?
    } else {
        let data_path = cli
            .data
            .or_else(|| config.data_path.clone())
            .context("no dataset given; pass --data or set TWEETLENS_DATA_PATH")?;
        TweetLibrary::from_dataset(&analytics, &data_path, overrides.as_ref())?
    };

    match command {
        Commands::Score { text } => {
            let score = library.score_text(&text)?;
            print_output(cli.json, &score, || report::render_score(&text, &score))?;
        }
        Commands::Similar { id, n } => {
            let hits = library.similar(id, n)?;
            print_output(cli.json, &hits, || report::render_similar(id, &hits))?;
        }
        Commands::Words { n, ids } => {
            let ids = (!ids.is_empty()).then_some(ids);
            let words = match n {
                Some(n) => library.top_words(ids.as_deref(), n)?,
                None => library.word_counts(ids.as_deref())?.into_entries(),
            };
            print_output(cli.json, &words, || report::render_words(&words))?;
        }
        Commands::Search { keyword } => {
            let records = library.search(&keyword)?;
            print_output(cli.json, &records, || report::render_records(&records))?;
        }
        Commands::Filter {
            start_date,
            end_date,
        } => {
            let records = library.filter_dates(&start_date, &end_date)?;
            print_output(cli.json, &records, || report::render_records(&records))?;
        }
        Commands::Random => match library.random() {
            Some(record) => {
                print_output(cli.json, &record, || {
                    report::render_records(std::slice::from_ref(&record))
                })?;
            }
            None => println!("dataset has no records"),
        },
        Commands::Stats => {
            let records = library.all();
            println!("{}", report::render_stats(&records, library.index_len()));
        }
    }

    Ok(())
}

fn load_overrides(
    flag: Option<&PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<Option<LexiconFile>> {
    let Some(path) = flag.or(config.lexicon_path.as_ref()) else {
        return Ok(None);
    };
    let file = tweetlens_core::load_lexicon_file(path)?;
    tracing::info!(path = %path.display(), words = file.words.len(), "lexicon overrides loaded");
    Ok(Some(file))
}

fn print_output<T, F>(json: bool, value: &T, table: F) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", table());
    }
    Ok(())
}
