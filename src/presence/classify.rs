use crate::model::attendance::AttendanceStatus;
use chrono::{NaiveTime, Timelike};

/// Entries up to this many minutes after the scheduled start are still on time.
pub const LATE_GRACE_MINUTES: u32 = 15;

/// Assumed shift start when no schedule exists for the day (09:00).
pub const DEFAULT_START_MINUTES: u32 = 9 * 60;

/// Exits before this minute of the day count as leaving early (17:00).
pub const EARLY_LEAVE_CUTOFF_MINUTES: u32 = 17 * 60;

/// Classifies one reconciled day. Rules apply in this exact order, first
/// match wins:
///
/// 1. no entry at all → `Absent`
/// 2. entry more than [`LATE_GRACE_MINUTES`] past the scheduled start
///    (or past 09:15 when no schedule is known) → `Late`
/// 3. exit known and before 17:00 → `EarlyLeave`
/// 4. otherwise → `Present`
///
/// Lateness short-circuits early-leave: an employee who is both late and
/// leaves early is reported late.
pub fn classify(
    time_in: Option<NaiveTime>,
    time_out: Option<NaiveTime>,
    scheduled_start: Option<NaiveTime>,
) -> AttendanceStatus {
    let Some(time_in) = time_in else {
        return AttendanceStatus::Absent;
    };

    let expected_start = scheduled_start
        .map(minutes_of_day)
        .unwrap_or(DEFAULT_START_MINUTES);

    if minutes_of_day(time_in) > expected_start + LATE_GRACE_MINUTES {
        return AttendanceStatus::Late;
    }

    if let Some(time_out) = time_out {
        if minutes_of_day(time_out) < EARLY_LEAVE_CUTOFF_MINUTES {
            return AttendanceStatus::EarlyLeave;
        }
    }

    AttendanceStatus::Present
}

fn minutes_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn no_entry_is_absent() {
        assert_eq!(classify(None, None, None), AttendanceStatus::Absent);
        // even with an exit and a schedule on file
        assert_eq!(
            classify(None, Some(t(16, 0)), Some(t(9, 0))),
            AttendanceStatus::Absent
        );
    }

    #[test]
    fn default_threshold_is_nine_fifteen_exclusive() {
        assert_eq!(classify(Some(t(9, 15)), None, None), AttendanceStatus::Present);
        assert_eq!(classify(Some(t(9, 16)), None, None), AttendanceStatus::Late);
    }

    #[test]
    fn scheduled_start_gets_fifteen_minutes_grace() {
        let sched = Some(t(8, 0));
        assert_eq!(
            classify(Some(t(8, 15)), Some(t(17, 30)), sched),
            AttendanceStatus::Present
        );
        assert_eq!(
            classify(Some(t(8, 16)), Some(t(17, 30)), sched),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn exit_before_seventeen_is_early_leave() {
        assert_eq!(
            classify(Some(t(8, 0)), Some(t(16, 59)), None),
            AttendanceStatus::EarlyLeave
        );
        assert_eq!(
            classify(Some(t(8, 0)), Some(t(17, 0)), None),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn lateness_short_circuits_early_leave() {
        // late entry AND early exit must report late
        assert_eq!(
            classify(Some(t(10, 0)), Some(t(15, 0)), Some(t(9, 0))),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn open_day_without_exit_is_present_when_on_time() {
        assert_eq!(classify(Some(t(8, 30)), None, None), AttendanceStatus::Present);
    }
}
