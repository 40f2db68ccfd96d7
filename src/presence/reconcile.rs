use crate::model::attendance::AttendanceRecord;
use crate::model::badge_event::{BadgeEvent, EventType};
use crate::model::work_schedule::WorkSchedule;
use crate::presence::{classify, duration, schedule};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;

/// Folds raw badge events into one attendance record per employee per day.
///
/// Pure projection: no side effects, no internal state. Calling it twice
/// with the same inputs yields identical output, and the per-day fold is
/// commutative, so the arrival order of events never changes the result.
/// Events with an empty employee id or an unparsable timestamp are dropped
/// without failing the pass.
pub fn reconcile(events: &[BadgeEvent], schedules: &[WorkSchedule]) -> Vec<AttendanceRecord> {
    let mut days: BTreeMap<(String, NaiveDate), DayFold> = BTreeMap::new();

    for event in events {
        if event.employee_id.trim().is_empty() {
            tracing::warn!(event_id = event.id, "skipping badge event without an employee id");
            continue;
        }
        let Some(at) = parse_event_timestamp(&event.occurred_at) else {
            tracing::warn!(
                event_id = event.id,
                occurred_at = %event.occurred_at,
                "skipping badge event with an unparsable timestamp"
            );
            continue;
        };

        let day = days
            .entry((event.employee_id.clone(), at.date()))
            .or_default();

        match event.event_type {
            EventType::Entry => {
                day.time_in = Some(day.time_in.map_or(at.time(), |t| t.min(at.time())));
            }
            EventType::Exit => {
                day.time_out = Some(day.time_out.map_or(at.time(), |t| t.max(at.time())));
            }
        }
        absorb_latest(&mut day.employee_name, at, event.employee_name.as_deref());
        absorb_latest(&mut day.badge_id, at, event.badge_id.as_deref());
    }

    days.into_iter()
        .map(|((employee_id, date), day)| {
            let window = schedule::resolve(schedules, &employee_id, date);
            let duration = match (day.time_in, day.time_out) {
                (Some(time_in), Some(time_out)) => {
                    Some(duration::format_duration(time_in, time_out))
                }
                _ => None,
            };
            let status =
                classify::classify(day.time_in, day.time_out, window.map(|w| w.start_time));
            AttendanceRecord {
                employee_id,
                employee_name: day.employee_name.map(|(_, name)| name),
                badge_id: day.badge_id.map(|(_, badge)| badge),
                date,
                time_in: day.time_in,
                time_out: day.time_out,
                duration,
                status,
                scheduled_start: window.map(|w| w.start_time),
                scheduled_end: window.map(|w| w.end_time),
            }
        })
        .collect()
}

#[derive(Default)]
struct DayFold {
    time_in: Option<NaiveTime>,
    time_out: Option<NaiveTime>,
    employee_name: Option<(NaiveDateTime, String)>,
    badge_id: Option<(NaiveDateTime, String)>,
}

/// Later non-empty values win and a present value is never overwritten by
/// an empty one. "Later" is the event timestamp, with the value itself as
/// the tie-break on identical timestamps, so the fold stays independent of
/// arrival order.
fn absorb_latest(
    slot: &mut Option<(NaiveDateTime, String)>,
    at: NaiveDateTime,
    value: Option<&str>,
) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    let newer = match slot {
        None => true,
        Some((seen_at, seen)) => at > *seen_at || (at == *seen_at && value > seen.as_str()),
    };
    if newer {
        *slot = Some((at, value.to_string()));
    }
}

/// Accepts RFC-3339 (the offset is read as the kiosk's wall clock, single
/// local calendar assumption) and the naive `YYYY-MM-DD[T ]HH:MM[:SS[.f]]`
/// forms kiosks actually send.
pub fn parse_event_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn event(id: u64, employee_id: &str, occurred_at: &str, event_type: EventType) -> BadgeEvent {
        BadgeEvent {
            id,
            employee_id: employee_id.to_string(),
            badge_id: None,
            employee_name: None,
            occurred_at: occurred_at.to_string(),
            event_type,
        }
    }

    fn named(mut e: BadgeEvent, name: Option<&str>, badge: Option<&str>) -> BadgeEvent {
        e.employee_name = name.map(str::to_string);
        e.badge_id = badge.map(str::to_string);
        e
    }

    fn saturday_schedule(employee_id: &str, start_h: u32, start_m: u32) -> WorkSchedule {
        // 2025-05-10 is a Saturday
        WorkSchedule {
            id: 1,
            employee_id: employee_id.to_string(),
            day_of_week: 6,
            start_time: NaiveTime::from_hms_opt(start_h, start_m, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            is_active: true,
        }
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn full_day_without_schedule_is_present() {
        let events = vec![
            event(1, "E1", "2025-05-10T08:30:00", EventType::Entry),
            event(2, "E1", "2025-05-10T17:45:00", EventType::Exit),
        ];
        let records = reconcile(&events, &[]);
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.time_in, Some(t(8, 30)));
        assert_eq!(rec.time_out, Some(t(17, 45)));
        assert_eq!(rec.duration.as_deref(), Some("9h15"));
        assert_eq!(rec.status, AttendanceStatus::Present);
        assert_eq!(rec.scheduled_start, None);
    }

    #[test]
    fn entry_after_default_threshold_is_late() {
        let events = vec![event(1, "E2", "2025-05-10T09:30:00", EventType::Entry)];
        let records = reconcile(&events, &[]);
        let rec = &records[0];
        assert_eq!(rec.status, AttendanceStatus::Late);
        assert_eq!(rec.time_out, None);
        assert_eq!(rec.duration, None);
    }

    #[test]
    fn early_exit_against_schedule_is_early_leave() {
        let events = vec![
            event(1, "E1", "2025-05-10T08:00:00", EventType::Entry),
            event(2, "E1", "2025-05-10T16:30:00", EventType::Exit),
        ];
        let schedules = vec![saturday_schedule("E1", 9, 0)];
        let rec = &reconcile(&events, &schedules)[0];
        assert_eq!(rec.status, AttendanceStatus::EarlyLeave);
        assert_eq!(rec.scheduled_start, Some(t(9, 0)));
        assert_eq!(rec.scheduled_end, Some(t(17, 0)));
    }

    #[test]
    fn earliest_entry_wins_regardless_of_arrival_order() {
        let events = vec![
            event(1, "E1", "2025-05-10T09:10:00", EventType::Entry),
            event(2, "E1", "2025-05-10T08:50:00", EventType::Entry),
        ];
        let rec = &reconcile(&events, &[])[0];
        assert_eq!(rec.time_in, Some(t(8, 50)));
    }

    #[test]
    fn malformed_event_does_not_poison_the_group() {
        let events = vec![
            event(1, "E1", "2025-05-10T08:30:00", EventType::Entry),
            event(2, "E1", "not-a-timestamp", EventType::Exit),
            event(3, "E1", "2025-05-10T17:45:00", EventType::Exit),
        ];
        let records = reconcile(&events, &[]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration.as_deref(), Some("9h15"));
    }

    #[test]
    fn empty_employee_id_is_skipped() {
        let events = vec![
            event(1, "  ", "2025-05-10T08:30:00", EventType::Entry),
            event(2, "E1", "2025-05-10T08:30:00", EventType::Entry),
        ];
        let records = reconcile(&events, &[]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "E1");
    }

    #[test]
    fn exit_only_day_is_absent() {
        let events = vec![event(1, "E1", "2025-05-10T16:00:00", EventType::Exit)];
        let rec = &reconcile(&events, &[])[0];
        assert_eq!(rec.status, AttendanceStatus::Absent);
        assert_eq!(rec.time_in, None);
        assert_eq!(rec.time_out, Some(t(16, 0)));
        assert_eq!(rec.duration, None);
    }

    #[test]
    fn no_events_no_record() {
        assert!(reconcile(&[], &[saturday_schedule("E1", 9, 0)]).is_empty());
    }

    #[test]
    fn result_is_independent_of_event_order() {
        let events = vec![
            named(
                event(1, "E1", "2025-05-10T08:30:00", EventType::Entry),
                Some("J. Doe"),
                Some("B-1"),
            ),
            event(2, "E1", "2025-05-10T12:01:00", EventType::Exit),
            named(
                event(3, "E1", "2025-05-10T17:45:00", EventType::Exit),
                Some("John Doe"),
                None,
            ),
            event(4, "E2", "2025-05-10T09:30:00", EventType::Entry),
            event(5, "E1", "2025-05-11T09:00:00", EventType::Entry),
        ];
        let schedules = vec![saturday_schedule("E1", 9, 0)];

        let baseline = reconcile(&events, &schedules);

        let mut reversed = events.clone();
        reversed.reverse();
        assert_eq!(reconcile(&reversed, &schedules), baseline);

        let mut rotated = events.clone();
        rotated.rotate_left(2);
        assert_eq!(reconcile(&rotated, &schedules), baseline);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let events = vec![
            event(1, "E1", "2025-05-10T08:30:00", EventType::Entry),
            event(2, "E1", "2025-05-10T17:45:00", EventType::Exit),
        ];
        assert_eq!(reconcile(&events, &[]), reconcile(&events, &[]));
    }

    #[test]
    fn records_come_out_sorted_by_employee_and_date() {
        let events = vec![
            event(1, "E2", "2025-05-11T09:00:00", EventType::Entry),
            event(2, "E1", "2025-05-12T09:00:00", EventType::Entry),
            event(3, "E1", "2025-05-10T09:00:00", EventType::Entry),
        ];
        let keys: Vec<_> = reconcile(&events, &[])
            .into_iter()
            .map(|r| (r.employee_id, r.date))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("E1".to_string(), NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()),
                ("E1".to_string(), NaiveDate::from_ymd_opt(2025, 5, 12).unwrap()),
                ("E2".to_string(), NaiveDate::from_ymd_opt(2025, 5, 11).unwrap()),
            ]
        );
    }

    #[test]
    fn latest_nonempty_name_wins_and_empty_never_overwrites() {
        let events = vec![
            named(
                event(1, "E1", "2025-05-10T08:30:00", EventType::Entry),
                Some("Old Name"),
                Some("B-1"),
            ),
            named(
                event(2, "E1", "2025-05-10T12:00:00", EventType::Exit),
                Some("New Name"),
                None,
            ),
            // a later swipe with no name must not erase the one we have
            event(3, "E1", "2025-05-10T17:45:00", EventType::Exit),
        ];
        let rec = &reconcile(&events, &[])[0];
        assert_eq!(rec.employee_name.as_deref(), Some("New Name"));
        assert_eq!(rec.badge_id.as_deref(), Some("B-1"));
    }

    #[test]
    fn swipes_on_different_dates_stay_separate() {
        let events = vec![
            event(1, "E1", "2025-05-10T22:00:00", EventType::Entry),
            event(2, "E1", "2025-05-11T06:00:00", EventType::Exit),
        ];
        let records = reconcile(&events, &[]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time_out, None);
        assert_eq!(records[1].status, AttendanceStatus::Absent);
    }

    #[test]
    fn timestamp_formats_accepted() {
        assert!(parse_event_timestamp("2025-05-10T08:30:00").is_some());
        assert!(parse_event_timestamp("2025-05-10 08:30:00").is_some());
        assert!(parse_event_timestamp("2025-05-10T08:30:00.123").is_some());
        assert!(parse_event_timestamp("2025-05-10T08:30:00+06:00").is_some());
        assert!(parse_event_timestamp("2025-05-10T08:30").is_some());
        assert!(parse_event_timestamp("10/05/2025 08:30").is_none());
        assert!(parse_event_timestamp("").is_none());
    }
}
