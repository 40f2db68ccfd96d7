use crate::model::badge_event::{BadgeEvent, EventType};
use crate::utils::{employee_filter, name_cache};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct RecordBadgeEvent {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "B-4471")]
    pub badge_id: Option<String>,

    #[schema(example = "John Doe")]
    pub employee_name: Option<String>,

    /// Kiosk-local ISO-8601 timestamp; the server clock is used when absent
    #[schema(example = "2025-05-10T08:30:00")]
    pub occurred_at: Option<String>,

    #[schema(example = "entry")]
    pub event_type: EventType,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EventFilter {
    /// Filter by employee ID
    #[schema(example = "EMP-001")]
    pub employee_id: Option<String>,
    /// First calendar day included
    #[param(value_type = String, format = "date")]
    #[schema(example = "2025-05-01", value_type = String, format = "date")]
    pub date_from: Option<NaiveDate>,
    /// Last calendar day included
    #[param(value_type = String, format = "date")]
    #[schema(example = "2025-05-31", value_type = String, format = "date")]
    pub date_to: Option<NaiveDate>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 20)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct EventListResponse {
    pub data: Vec<BadgeEvent>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Kiosk badge-swipe ingest
#[utoipa::path(
    post,
    path = "/kiosk/badge",
    request_body = RecordBadgeEvent,
    responses(
        (status = 200, description = "Event recorded", body = Object, example = json!({
            "message": "Recorded entry for EMP-001",
            "employee_id": "EMP-001",
            "occurred_at": "2025-05-10T08:30:00"
        })),
        (status = 400, description = "Employee id missing", body = Object, example = json!({
            "message": "Employee id is required"
        })),
        (status = 503, description = "Event store unavailable", body = Object, example = json!({
            "message": "Could not record entry, try again"
        }))
    ),
    tag = "Kiosk"
)]
pub async fn record_event(
    pool: web::Data<MySqlPool>,
    payload: web::Json<RecordBadgeEvent>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let employee_id = payload.employee_id.trim().to_string();
    if employee_id.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Employee id is required"
        })));
    }

    if !employee_filter::might_exist(&employee_id) {
        // first swipe for this id, or a typo at the kiosk
        warn!(employee_id = %employee_id, "badge event for never-seen employee id");
    }

    // Best-effort display name: payload first, then the last name this
    // employee swiped with.
    let employee_name = match payload.employee_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => name_cache::last_seen_name(&employee_id).await,
    };

    let occurred_at = payload
        .occurred_at
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string()
        });

    let result = sqlx::query(
        r#"
        INSERT INTO badge_events (employee_id, badge_id, employee_name, occurred_at, event_type)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee_id)
    .bind(&payload.badge_id)
    .bind(&employee_name)
    .bind(&occurred_at)
    .bind(payload.event_type)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            if let Some(name) = &employee_name {
                name_cache::remember(&employee_id, name).await;
            }
            employee_filter::insert(&employee_id);

            Ok(HttpResponse::Ok().json(json!({
                "message": format!("Recorded {} for {}", payload.event_type, employee_id),
                "employee_id": employee_id,
                "occurred_at": occurred_at,
            })))
        }
        Err(e) => {
            error!(error = %e, employee_id = %employee_id, "Failed to record badge event");
            Ok(HttpResponse::ServiceUnavailable().json(json!({
                "message": format!("Could not record {}, try again", payload.event_type)
            })))
        }
    }
}

/// Raw badge-event audit listing
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(EventFilter),
    responses(
        (status = 200, description = "Paginated raw event list", body = EventListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Events"
)]
pub async fn list_events(
    pool: web::Data<MySqlPool>,
    query: web::Query<EventFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(20).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    // occurred_at is the raw ISO-8601 string; well-formed values order
    // lexicographically, and malformed ones are skipped by reconciliation
    // anyway.
    let mut where_sql = String::from(" WHERE 1=1");
    let mut binds: Vec<String> = Vec::new();

    if let Some(employee_id) = query.employee_id.as_deref() {
        where_sql.push_str(" AND employee_id = ?");
        binds.push(employee_id.to_string());
    }

    if let Some(date_from) = query.date_from {
        where_sql.push_str(" AND occurred_at >= ?");
        binds.push(date_from.to_string());
    }

    if let Some(next_day) = query.date_to.and_then(|d| d.succ_opt()) {
        where_sql.push_str(" AND occurred_at < ?");
        binds.push(next_day.to_string());
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM badge_events{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count_q = count_q.bind(bind);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count badge events");
        ErrorInternalServerError("Database error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, badge_id, employee_name, occurred_at, event_type
        FROM badge_events
        {}
        ORDER BY occurred_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, BadgeEvent>(&data_sql);
    for bind in &binds {
        data_q = data_q.bind(bind);
    }

    let events = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch badge events");
            ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(EventListResponse {
        data: events,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
