use crate::model::work_schedule::WorkSchedule;
use chrono::{Datelike, NaiveDate};

/// Resolves the active weekly window for an employee on a calendar date.
///
/// The weekday index (0 = Sunday … 6 = Saturday) is derived from the date.
/// When several active rows match the same employee and weekday the first
/// one in store order wins.
pub fn resolve<'a>(
    schedules: &'a [WorkSchedule],
    employee_id: &str,
    date: NaiveDate,
) -> Option<&'a WorkSchedule> {
    let weekday = date.weekday().num_days_from_sunday();
    schedules.iter().find(|s| {
        s.is_active && s.employee_id == employee_id && u32::from(s.day_of_week) == weekday
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn schedule(id: u64, employee_id: &str, day_of_week: u8, start_h: u32, is_active: bool) -> WorkSchedule {
        WorkSchedule {
            id,
            employee_id: employee_id.to_string(),
            day_of_week,
            start_time: NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            is_active,
        }
    }

    #[test]
    fn resolves_matching_weekday() {
        // 2025-05-10 is a Saturday (weekday index 6)
        let date = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let schedules = vec![
            schedule(1, "E1", 1, 9, true),
            schedule(2, "E1", 6, 10, true),
        ];
        let found = resolve(&schedules, "E1", date).unwrap();
        assert_eq!(found.id, 2);
    }

    #[test]
    fn skips_inactive_and_other_employees() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let schedules = vec![
            schedule(1, "E1", 6, 9, false),
            schedule(2, "E2", 6, 9, true),
        ];
        assert!(resolve(&schedules, "E1", date).is_none());
    }

    #[test]
    fn first_active_match_wins_on_duplicates() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let schedules = vec![
            schedule(7, "E1", 6, 8, true),
            schedule(8, "E1", 6, 10, true),
        ];
        assert_eq!(resolve(&schedules, "E1", date).unwrap().id, 7);
    }

    #[test]
    fn none_when_no_window_defined() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 12).unwrap();
        assert!(resolve(&[], "E1", date).is_none());
    }
}
