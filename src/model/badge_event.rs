use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One raw badge swipe, exactly as submitted by a kiosk terminal.
///
/// `occurred_at` keeps the raw ISO-8601 string from the kiosk: the append
/// path validates shape only, so a malformed timestamp can exist in the
/// store and is skipped at reconciliation time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BadgeEvent {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "B-4471", nullable = true)]
    pub badge_id: Option<String>,

    #[schema(example = "John Doe", nullable = true)]
    pub employee_name: Option<String>,

    #[schema(example = "2025-05-10T08:30:00")]
    pub occurred_at: String,

    #[schema(example = "entry")]
    pub event_type: EventType,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EventType {
    #[display(fmt = "entry")]
    Entry,
    #[display(fmt = "exit")]
    Exit,
}
