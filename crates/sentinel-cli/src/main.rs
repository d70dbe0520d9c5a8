mod analyze;
mod history;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sentinel-cli")]
#[command(about = "Sentinel command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a video's comments and run the bulk sentiment analysis
    Analyze {
        /// YouTube video URL (watch, youtu.be, embed, or /v/ form)
        url: String,

        /// Maximum number of comments to fetch and analyze
        #[arg(long)]
        max_comments: Option<usize>,

        /// Comments per analysis call
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Skip the pause between analysis chunks
        #[arg(long)]
        no_delay: bool,

        /// Analyze without writing the result to the database
        #[arg(long)]
        no_save: bool,

        /// Preview what would be analyzed without calling any API
        #[arg(long)]
        dry_run: bool,
    },
    /// Show recent stored analyses
    History {
        /// Number of analyses to show
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            url,
            max_comments,
            chunk_size,
            no_delay,
            no_save,
            dry_run,
        } => {
            analyze::run_analyze(&analyze::AnalyzeArgs {
                url,
                max_comments,
                chunk_size,
                no_delay,
                no_save,
                dry_run,
            })
            .await
        }
        Commands::History { limit } => history::run_history(limit).await,
    }
}
