use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Projected per-employee, per-day attendance row. Never persisted:
/// recomputed from the badge events and schedules on every pass.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe", nullable = true)]
    pub employee_name: Option<String>,

    #[schema(example = "B-4471", nullable = true)]
    pub badge_id: Option<String>,

    #[schema(example = "2025-05-10", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "08:30:00", value_type = String, format = "time", nullable = true)]
    pub time_in: Option<NaiveTime>,

    #[schema(example = "17:45:00", value_type = String, format = "time", nullable = true)]
    pub time_out: Option<NaiveTime>,

    #[schema(example = "9h15", nullable = true)]
    pub duration: Option<String>,

    #[schema(example = "present")]
    pub status: AttendanceStatus,

    #[schema(example = "09:00:00", value_type = String, format = "time", nullable = true)]
    pub scheduled_start: Option<NaiveTime>,

    #[schema(example = "17:00:00", value_type = String, format = "time", nullable = true)]
    pub scheduled_end: Option<NaiveTime>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Late,
    EarlyLeave,
    Absent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn attendance_status_serde_kebab_case() {
        let s: AttendanceStatus = serde_json::from_str("\"early-leave\"").unwrap();
        assert!(matches!(s, AttendanceStatus::EarlyLeave));
        let v = serde_json::to_value(AttendanceStatus::EarlyLeave).unwrap();
        assert_eq!(v, serde_json::json!("early-leave"));
    }

    #[test]
    fn attendance_status_display_matches_wire_form() {
        assert_eq!(AttendanceStatus::Late.to_string(), "late");
        assert_eq!(AttendanceStatus::EarlyLeave.to_string(), "early-leave");
        assert_eq!(
            AttendanceStatus::from_str("absent").unwrap(),
            AttendanceStatus::Absent
        );
    }
}
