//! Read-only history listing.

/// Show recent stored analyses, newest first.
///
/// # Errors
///
/// Returns an error if config loading or the database query fails.
pub(crate) async fn run_history(limit: i64) -> anyhow::Result<()> {
    let config = sentinel_core::load_app_config()?;
    let pool_config = sentinel_db::PoolConfig::from_app_config(&config);
    let pool = sentinel_db::connect_pool(&config.database_url, pool_config).await?;
    sentinel_db::run_migrations(&pool).await?;

    let rows = sentinel_db::list_analysis_history(&pool, limit).await?;

    if rows.is_empty() {
        println!("no stored analyses; run `sentinel-cli analyze <url>` first");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<40} {:>8} {:>9}  {}",
        "id", "video", "title", "comments", "avg", "date"
    );
    for row in rows {
        let title = row.video_title.unwrap_or_default();
        let title = match title.char_indices().nth(38) {
            Some((idx, _)) => format!("{}…", &title[..idx]),
            None => title,
        };
        println!(
            "{:<6} {:<12} {:<40} {:>8} {:>9.3}  {}",
            row.id,
            row.video_id,
            title,
            row.total_comments_analyzed,
            row.average_sentiment,
            row.analysis_date.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
