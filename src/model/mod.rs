pub mod attendance;
pub mod badge_event;
pub mod work_schedule;
