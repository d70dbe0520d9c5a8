//! The `analyze` command: fetch → bulk analysis → persist.
//!
//! Ctrl-c mid-run cancels the pipeline cleanly: already-analyzed chunks are
//! kept and the partial aggregate is printed (and stored, unless
//! `--no-save`).

use std::time::Duration;

use chrono::Utc;

use sentinel_analysis::{AnalysisClient, BulkOptions, CancelToken};
use sentinel_core::VideoMetadata;

pub(crate) struct AnalyzeArgs {
    pub url: String,
    pub max_comments: Option<usize>,
    pub chunk_size: Option<usize>,
    pub no_delay: bool,
    pub no_save: bool,
    pub dry_run: bool,
}

/// Run the full analyze flow for one video URL.
///
/// # Errors
///
/// Returns an error if the URL is not a YouTube video URL, configuration is
/// missing, or the metadata/comment fetch fails. Per-chunk analysis
/// failures are skipped inside the pipeline, not propagated.
pub(crate) async fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let config = sentinel_core::load_app_config()?;

    let video_id = sentinel_youtube::extract_video_id(&args.url)
        .ok_or_else(|| anyhow::anyhow!("not a recognizable YouTube video URL: {}", args.url))?;

    let max_comments = args.max_comments.unwrap_or(config.max_comments);

    let youtube =
        sentinel_youtube::YoutubeClient::new(&config.youtube_api_key, config.request_timeout_secs)?;

    let video = youtube.get_video_metadata(&video_id).await?;
    println!(
        "video: {} — {} ({} comments on record)",
        video.channel, video.title, video.comment_count
    );

    let comments = youtube.get_comments(&video_id, max_comments).await?;
    println!("fetched {} comments", comments.len());

    if args.dry_run {
        let chunk_size = args.chunk_size.unwrap_or(config.chunk_size);
        let eligible = comments.iter().filter(|c| !c.text.trim().is_empty()).count();
        println!(
            "dry-run: would analyze {eligible} non-empty comments in chunks of {chunk_size}"
        );
        return Ok(());
    }

    let analyzer = AnalysisClient::new(
        &config.gemini_api_key,
        &config.gemini_model,
        config.request_timeout_secs,
        config.min_secs_between_calls,
    )?;

    let options = BulkOptions {
        chunk_size: args.chunk_size.unwrap_or(config.chunk_size),
        inter_chunk_delay: if args.no_delay {
            Duration::ZERO
        } else {
            Duration::from_secs(config.inter_chunk_delay_secs)
        },
        max_comments,
    };

    let cancel = CancelToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupt received — finishing current chunk, keeping progress");
            cancel_on_signal.cancel();
        }
    });

    let progress = |done: usize, total: usize, label: &str| {
        println!("  analyzed {done}/{total} comments ({label})");
    };

    let analysis = sentinel_analysis::analyze_bulk(
        &analyzer,
        &comments,
        &options,
        &cancel,
        Some(&progress),
    )
    .await;

    print_summary(&video, &analysis);

    if args.no_save {
        return Ok(());
    }

    let pool_config = sentinel_db::PoolConfig::from_app_config(&config);
    let pool = sentinel_db::connect_pool(&config.database_url, pool_config).await?;
    sentinel_db::run_migrations(&pool).await?;

    let analysis_data = serde_json::to_value(&analysis)?;
    let total = i64::try_from(comments.len()).unwrap_or(i64::MAX);
    let analysis_id = sentinel_db::insert_analysis(
        &pool,
        &video.id,
        Some(&video.title),
        Some(&video.channel),
        Utc::now(),
        total,
        analysis.overall_sentiment.average_score,
        &analysis_data,
    )
    .await?;
    sentinel_db::insert_comments(&pool, analysis_id, &video.id, &comments).await?;

    println!("stored analysis {analysis_id} for video {}", video.id);
    Ok(())
}

fn print_summary(video: &VideoMetadata, analysis: &sentinel_analysis::AggregatedAnalysis) {
    let sentiment = &analysis.overall_sentiment;
    println!();
    println!("analysis for {} ({})", video.title, video.id);
    println!(
        "  sentiment: {} positive / {} neutral / {} negative, average {:.3}",
        sentiment.positive, sentiment.neutral, sentiment.negative, sentiment.average_score
    );
    println!(
        "  chunks: {} merged, {} skipped; {} comments in aggregate",
        analysis.chunks_merged, analysis.chunks_skipped, analysis.total_comments_analyzed
    );

    if !analysis.top_entities.is_empty() {
        println!("  top entities:");
        for entity in analysis.top_entities.iter().take(5) {
            let kind = entity.kind.as_deref().unwrap_or("OTHER");
            println!("    {} ({kind}) × {}", entity.name, entity.count);
        }
    }

    if !analysis.key_themes.is_empty() {
        println!("  themes:");
        for theme in analysis.key_themes.iter().take(5) {
            println!(
                "    {} × {} [{}]",
                theme.theme, theme.frequency, theme.sentiment
            );
        }
    }
}
