use crate::model::attendance::AttendanceRecord;
use crate::model::badge_event::BadgeEvent;
use crate::model::work_schedule::WorkSchedule;
use crate::presence;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
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
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceReportResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub total: usize,
}

/// Projected attendance view
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Reconciled attendance records", body = AttendanceReportResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_report(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    // ---------- raw events for the requested window ----------
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

    let events_sql = format!(
        "SELECT id, employee_id, badge_id, employee_name, occurred_at, event_type \
         FROM badge_events{}",
        where_sql
    );
    debug!(sql = %events_sql, query = ?query, "Fetching badge events for reconciliation");

    let mut events_q = sqlx::query_as::<_, BadgeEvent>(&events_sql);
    for bind in &binds {
        events_q = events_q.bind(bind);
    }

    let events = events_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch badge events");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- active schedules ----------
    // id order keeps "first match" stable for duplicate weekday rows
    let mut schedules_sql = String::from(
        "SELECT id, employee_id, day_of_week, start_time, end_time, is_active \
         FROM work_schedules WHERE is_active = 1",
    );
    if query.employee_id.is_some() {
        schedules_sql.push_str(" AND employee_id = ?");
    }
    schedules_sql.push_str(" ORDER BY id");

    let mut schedules_q = sqlx::query_as::<_, WorkSchedule>(&schedules_sql);
    if let Some(employee_id) = query.employee_id.as_deref() {
        schedules_q = schedules_q.bind(employee_id);
    }

    let schedules = schedules_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch work schedules");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- pure projection ----------
    let records = presence::reconcile(&events, &schedules);

    Ok(HttpResponse::Ok().json(AttendanceReportResponse {
        total: records.len(),
        data: records,
    }))
}
