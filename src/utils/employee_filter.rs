use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real headcount.
const FILTER_CAPACITY: usize = 50_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMPLOYEE_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(employee_id: &str) -> String {
    employee_id.trim().to_string()
}

/// Check whether an employee id has been seen before (false positives possible)
pub fn might_exist(employee_id: &str) -> bool {
    let employee_id = normalize(employee_id);
    EMPLOYEE_FILTER
        .read()
        .expect("employee filter poisoned")
        .contains(&employee_id)
}

/// Record a newly seen employee id
pub fn insert(employee_id: &str) {
    let employee_id = normalize(employee_id);
    EMPLOYEE_FILTER
        .write()
        .expect("employee filter poisoned")
        .add(&employee_id);
}

/// Warm up the filter from schedules and prior events using streaming + batching
pub async fn warmup_employee_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>(
        "SELECT employee_id FROM work_schedules \
         UNION SELECT DISTINCT employee_id FROM badge_events",
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&employee_id));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Employee filter warmup complete: {} ids", total);
    Ok(())
}

/// Insert a batch of normalized employee ids
fn insert_batch(employee_ids: &[String]) {
    let mut filter = EMPLOYEE_FILTER
        .write()
        .expect("employee filter poisoned");

    for employee_id in employee_ids {
        filter.add(employee_id);
    }
}
