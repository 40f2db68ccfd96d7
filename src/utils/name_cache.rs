use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// employee_id => last display name seen on a badge event
pub static NAME_CACHE: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000) // tune based on headcount
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Remember the display name attached to a swipe
pub async fn remember(employee_id: &str, name: &str) {
    NAME_CACHE
        .insert(employee_id.to_string(), name.to_string())
        .await;
}

/// Last name seen for this employee, if any
pub async fn last_seen_name(employee_id: &str) -> Option<String> {
    NAME_CACHE.get(employee_id).await
}

/// Batch insert names
async fn batch_remember(rows: &[(String, String)]) {
    let futures: Vec<_> = rows
        .iter()
        .map(|(employee_id, name)| NAME_CACHE.insert(employee_id.clone(), name.clone()))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load display names from RECENT badge events into the cache (batched).
/// Oldest rows first, so a fresher name overwrites an older one.
pub async fn warmup_name_cache(pool: &MySqlPool, days: u32, batch_size: usize) -> Result<()> {
    let cutoff =
        (chrono::Local::now().date_naive() - chrono::Duration::days(i64::from(days))).to_string();

    let mut stream = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT employee_id, employee_name
        FROM badge_events
        WHERE employee_name IS NOT NULL
          AND employee_name <> ''
          AND occurred_at >= ?
        ORDER BY occurred_at ASC
        "#,
    )
    .bind(&cutoff)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id, name) = row?;
        batch.push((employee_id, name));
        total_count += 1;

        if batch.len() >= batch_size {
            batch_remember(&batch).await;
            batch.clear();
        }
    }

    // Insert any remaining rows
    if !batch.is_empty() {
        batch_remember(&batch).await;
    }

    log::info!(
        "Name cache warmup complete: {} swipes (last {} days)",
        total_count,
        days
    );

    Ok(())
}
