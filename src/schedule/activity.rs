use chrono::{DateTime, Datelike, Local, TimeZone};

use crate::schedule::model::Schedule;
use crate::timeutil::{is_epoch_past_at, is_within_daily_window_in_tz, is_within_window_at};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Activity {
    Active,
    Stale,
    Pending,
}

pub fn classify(schedule: &Schedule) -> Activity {
    classify_at(schedule, &Local::now())
}

pub fn classify_at(schedule: &Schedule, now: &DateTime<Local>) -> Activity {
    classify_in_tz(schedule, now)
}

pub(crate) fn classify_in_tz<Tz>(schedule: &Schedule, now: &DateTime<Tz>) -> Activity
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let now_epoch = now.timestamp();

    if !schedule.is_recurring() {
        return if is_within_window_at(schedule.start, schedule.end, now_epoch) {
            Activity::Active
        } else if is_epoch_past_at(schedule.end, now_epoch) {
            Activity::Stale
        } else {
            Activity::Pending
        };
    }

    // Recurring schedules ignore the calendar date, so they never go stale.
    if is_within_window_at(schedule.start, schedule.end, now_epoch)
        || (schedule.runs_on(now.weekday())
            && is_within_daily_window_in_tz(schedule.start, schedule.end, now))
    {
        Activity::Active
    } else {
        Activity::Pending
    }
}
