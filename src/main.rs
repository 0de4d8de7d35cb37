use clap::{Parser, Subcommand};
use log::{debug, error, info, LevelFilter};
use mail_triage::dates::{DateExtractor, ExtractionStrategy};
use mail_triage::{setup_logging, Config, GmailProvider, RetrySettings, UnreadTriage};

#[derive(Parser)]
#[clap(name = "Mail Triage")]
#[clap(version = "0.3.0")]
#[clap(about = "Unread-email triage with calendar date extraction", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Force use of stderr-only logging (no file logging)
    #[clap(long, short, action)]
    memory_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch unread-email summaries and print them as JSON
    #[clap(name = "unread")]
    Unread {
        /// Maximum number of unread messages to fetch
        #[clap(long, default_value_t = 5)]
        max_results: u32,
    },

    /// Extract calendar dates from a piece of text
    #[clap(name = "extract-dates")]
    ExtractDates {
        /// The text to scan
        text: String,

        /// Return raw un-normalized matches instead of one ISO timestamp
        #[clap(long, action)]
        raw: bool,
    },

    /// Test the current credentials against the Gmail API
    #[clap(name = "check")]
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Date extraction is offline; skip logging setup noise for it
    if let Commands::ExtractDates { text, raw } = &cli.command {
        let strategy = if *raw {
            ExtractionStrategy::AllMatchesRaw
        } else {
            ExtractionStrategy::FirstMatchNormalized
        };
        let extractor = DateExtractor::new().with_strategy(strategy);
        println!("{}", serde_json::to_string_pretty(&extractor.extract(text))?);
        return Ok(());
    }

    let log_file = if cli.memory_only {
        env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .init();
        String::from("stderr-only")
    } else {
        setup_logging(LevelFilter::Debug, None)?
    };

    info!("Mail triage starting, logs in {}", log_file);

    let config = Config::from_env()?;
    let provider = GmailProvider::new(&config);

    match cli.command {
        Commands::Unread { max_results } => {
            debug!("Fetching up to {} unread messages", max_results);
            let triage = UnreadTriage::new(provider, RetrySettings::from_env());

            match triage.fetch_unread_summaries(max_results).await {
                Ok(summaries) => {
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                }
                Err(e) => {
                    error!("Failed to fetch unread emails: {}", e);
                    eprintln!("Failed to fetch unread emails: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check => match provider.get_profile().await {
            Ok(profile) => {
                println!("{}", serde_json::to_string_pretty(&profile)?);
                println!("Credentials are valid and working");
            }
            Err(e) => {
                error!("Credential check failed: {}", e);
                eprintln!("Credential check failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::ExtractDates { .. } => unreachable!("handled above"),
    }

    Ok(())
}
