use chrono::{NaiveTime, Timelike};

const DAY_MINUTES: i32 = 24 * 60;

/// Formats the elapsed time between two clock times as `"{hours}h{minutes:02}"`.
///
/// An exit numerically earlier than the entry is read as happening on the
/// following calendar day, so the elapsed time wraps across midnight and
/// the result is always non-negative.
pub fn format_duration(time_in: NaiveTime, time_out: NaiveTime) -> String {
    let mut elapsed = minutes_of_day(time_out) - minutes_of_day(time_in);
    if elapsed < 0 {
        elapsed += DAY_MINUTES;
    }
    format!("{}h{:02}", elapsed / 60, elapsed % 60)
}

fn minutes_of_day(t: NaiveTime) -> i32 {
    (t.hour() * 60 + t.minute()) as i32
}
