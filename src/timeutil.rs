use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Timelike};

use crate::error::LocalTimeError;

pub(crate) const EDITABLE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_local_datetime(epoch_seconds: i64) -> String {
    format_datetime_in_tz(epoch_seconds, &Local)
}

pub fn parse_local_datetime(input: &str) -> Result<i64, LocalTimeError> {
    parse_datetime_in_tz(input, &Local)
}

pub fn is_epoch_past(end_epoch: i64) -> bool {
    is_epoch_past_at(end_epoch, Local::now().timestamp())
}

pub fn is_epoch_past_at(end_epoch: i64, now_epoch: i64) -> bool {
    end_epoch < now_epoch
}

pub fn is_within_window(start_epoch: i64, end_epoch: i64) -> bool {
    is_within_window_at(start_epoch, end_epoch, Local::now().timestamp())
}

pub fn is_within_window_at(start_epoch: i64, end_epoch: i64, now_epoch: i64) -> bool {
    start_epoch <= now_epoch && now_epoch <= end_epoch
}

pub fn is_within_daily_window(start_epoch: i64, end_epoch: i64) -> bool {
    is_within_daily_window_at(start_epoch, end_epoch, &Local::now())
}

// Compares seconds-since-local-midnight only; a window whose end-of-day
// falls before its start-of-day crosses local midnight and never matches.
pub fn is_within_daily_window_at(start_epoch: i64, end_epoch: i64, now: &DateTime<Local>) -> bool {
    is_within_daily_window_in_tz(start_epoch, end_epoch, now)
}

pub(crate) fn is_within_daily_window_in_tz<Tz>(
    start_epoch: i64,
    end_epoch: i64,
    now: &DateTime<Tz>,
) -> bool
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let timezone = now.timezone();
    let (Some(start_of_day), Some(end_of_day)) = (
        seconds_of_day_in_tz(start_epoch, &timezone),
        seconds_of_day_in_tz(end_epoch, &timezone),
    ) else {
        return false;
    };
    let now_of_day = now.time().num_seconds_from_midnight();
    start_of_day <= now_of_day && now_of_day <= end_of_day
}

pub(crate) fn format_datetime_in_tz<Tz>(epoch_seconds: i64, timezone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    match timezone.timestamp_opt(epoch_seconds, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.naive_local().format(EDITABLE_FORMAT).to_string()
        }
        LocalResult::None => String::new(),
    }
}

pub(crate) fn parse_datetime_in_tz<Tz>(input: &str, timezone: &Tz) -> Result<i64, LocalTimeError>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .map_err(|_| LocalTimeError::Invalid(input.to_string()))?;
    let naive = naive.with_nanosecond(0).unwrap_or(naive);
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.timestamp()),
        LocalResult::Ambiguous(first, _second) => Ok(first.timestamp()),
        LocalResult::None => Err(LocalTimeError::Nonexistent(input.to_string())),
    }
}

fn seconds_of_day_in_tz<Tz>(epoch_seconds: i64, timezone: &Tz) -> Option<u32>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    match timezone.timestamp_opt(epoch_seconds, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            Some(dt.time().num_seconds_from_midnight())
        }
        LocalResult::None => None,
    }
}
