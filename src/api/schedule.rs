use crate::model::work_schedule::WorkSchedule;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

const UPDATABLE_COLUMNS: [&str; 5] = [
    "employee_id",
    "day_of_week",
    "start_time",
    "end_time",
    "is_active",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateSchedule {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    /// 0 = Sunday … 6 = Saturday
    #[schema(example = 1)]
    pub day_of_week: u8,

    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,

    #[schema(example = "17:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,

    /// Defaults to active
    #[schema(example = true)]
    pub is_active: Option<bool>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSchedule {
    pub employee_id: Option<String>,
    pub day_of_week: Option<u8>,
    #[schema(example = "08:30:00", value_type = String, format = "time")]
    pub start_time: Option<NaiveTime>,
    #[schema(example = "16:30:00", value_type = String, format = "time")]
    pub end_time: Option<NaiveTime>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ScheduleFilter {
    /// Filter by employee ID
    #[schema(example = "EMP-001")]
    pub employee_id: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 20)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct ScheduleListResponse {
    pub data: Vec<WorkSchedule>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 5)]
    pub total: i64,
}

/// Create a weekly schedule window
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateSchedule,
    responses(
        (status = 201, description = "Schedule created", body = Object, example = json!({
            "message": "Schedule created successfully"
        })),
        (status = 400, description = "Invalid weekday", body = Object, example = json!({
            "message": "day_of_week must be 0 (Sunday) through 6 (Saturday)"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn create_schedule(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSchedule>,
) -> actix_web::Result<impl Responder> {
    if payload.day_of_week > 6 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "day_of_week must be 0 (Sunday) through 6 (Saturday)"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO work_schedules (employee_id, day_of_week, start_time, end_time, is_active)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id.trim())
    .bind(payload.day_of_week)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(payload.is_active.unwrap_or(true))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = %payload.employee_id, "Failed to create schedule");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Schedule created successfully"
    })))
}

/// List schedule windows
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    params(ScheduleFilter),
    responses(
        (status = 200, description = "Paginated schedule list", body = ScheduleListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn list_schedules(
    pool: web::Data<MySqlPool>,
    query: web::Query<ScheduleFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(20).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut binds: Vec<String> = Vec::new();

    if let Some(employee_id) = query.employee_id.as_deref() {
        where_sql.push_str(" AND employee_id = ?");
        binds.push(employee_id.to_string());
    }

    let count_sql = format!("SELECT COUNT(*) FROM work_schedules{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count_q = count_q.bind(bind);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count schedules");
        ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        "SELECT id, employee_id, day_of_week, start_time, end_time, is_active \
         FROM work_schedules{} ORDER BY employee_id, day_of_week LIMIT ? OFFSET ?",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, WorkSchedule>(&data_sql);
    for bind in &binds {
        data_q = data_q.bind(bind);
    }

    let schedules = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch schedules");
            ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(ScheduleListResponse {
        data: schedules,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Update a schedule window
#[utoipa::path(
    put,
    path = "/api/v1/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    request_body = UpdateSchedule,
    responses(
        (status = 200, description = "Schedule updated successfully"),
        (status = 400, description = "Unknown column in payload"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn update_schedule(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let schedule_id = path.into_inner();

    if let Some(obj) = body.as_object() {
        if let Some(unknown) = obj.keys().find(|k| !UPDATABLE_COLUMNS.contains(&k.as_str())) {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": format!("Unknown column: {}", unknown)
            })));
        }
        if let Some(day) = obj.get("day_of_week").and_then(Value::as_u64) {
            if day > 6 {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "day_of_week must be 0 (Sunday) through 6 (Saturday)"
                })));
            }
        }
    }

    let update = build_update_sql("work_schedules", &body, "id", schedule_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Schedule not found"));
    }

    Ok(HttpResponse::Ok().body("Schedule updated successfully"))
}

/// Delete a schedule window
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Schedule not found", body = Object, example = json!({
            "message": "Schedule not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn delete_schedule(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let schedule_id = path.into_inner();

    let result = sqlx::query("DELETE FROM work_schedules WHERE id = ?")
        .bind(schedule_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Schedule not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, schedule_id, "Failed to delete schedule");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
