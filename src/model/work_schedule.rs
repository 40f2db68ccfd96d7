use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Recurring work-time window for one employee on one weekday.
/// Owned and edited by HR administration; read-only to reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkSchedule {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    /// 0 = Sunday … 6 = Saturday
    #[schema(example = 1)]
    pub day_of_week: u8,

    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,

    #[schema(example = "17:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,

    #[schema(example = true)]
    pub is_active: bool,
}
