use crate::api::attendance::{AttendanceQuery, AttendanceReportResponse};
use crate::api::event::{EventFilter, EventListResponse, RecordBadgeEvent};
use crate::api::schedule::{
    CreateSchedule, ScheduleFilter, ScheduleListResponse, UpdateSchedule,
};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::badge_event::{BadgeEvent, EventType};
use crate::model::work_schedule::WorkSchedule;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Presence API",
        version = "1.0.0",
        description = r#"
## Presence reconciliation service

Ingests raw badge swipes from kiosk terminals and projects them into
per-employee, per-day attendance records.

### Key Features
- **Kiosk ingest**
  - Append-only badge event recording with server-clock fallback
- **Attendance projection**
  - Deterministic reconciliation of unordered entry/exit events,
    scheduled-hours comparison, and a present / late / early-leave /
    absent classification
- **Schedule administration**
  - Weekly recurring work-time windows per employee and weekday
- **Event audit**
  - Paginated raw-event listing for HR review

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::event::record_event,
        crate::api::event::list_events,

        crate::api::attendance::attendance_report,

        crate::api::schedule::create_schedule,
        crate::api::schedule::list_schedules,
        crate::api::schedule::update_schedule,
        crate::api::schedule::delete_schedule
    ),
    components(
        schemas(
            RecordBadgeEvent,
            BadgeEvent,
            EventType,
            EventFilter,
            EventListResponse,
            AttendanceQuery,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceReportResponse,
            CreateSchedule,
            UpdateSchedule,
            ScheduleFilter,
            ScheduleListResponse,
            WorkSchedule
        )
    ),
    tags(
        (name = "Kiosk", description = "Badge-swipe ingest APIs"),
        (name = "Events", description = "Raw badge event audit APIs"),
        (name = "Attendance", description = "Reconciled attendance APIs"),
        (name = "Schedule", description = "Work schedule administration APIs"),
    )
)]
pub struct ApiDoc;
