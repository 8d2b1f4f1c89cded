use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::Serialize;

use super::SessionRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total_pomodoros: usize,
    pub today_pomodoros: usize,
    pub week_pomodoros: usize,
    pub month_pomodoros: usize,
    pub total_focus_seconds: i64,
    pub average_session_seconds: i64,
    pub completed_tasks: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl Stats {
    /// Aggregates completed focus sessions. Breaks are ignored. Calendar
    /// boundaries (day, week starting Sunday, month) follow the time zone of
    /// `now`.
    pub fn compute<Tz: TimeZone>(
        records: &[SessionRecord],
        completed_tasks: u32,
        now: &DateTime<Tz>,
    ) -> Self {
        let timezone = now.timezone();
        let today = now.date_naive();
        let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));

        let focus_days: Vec<NaiveDate> = records
            .iter()
            .filter(|record| record.is_completed_focus())
            .map(|record| record.started_at.with_timezone(&timezone).date_naive())
            .collect();

        let total_pomodoros = focus_days.len();
        let today_pomodoros = focus_days.iter().filter(|day| **day == today).count();
        let week_pomodoros = focus_days.iter().filter(|day| **day >= week_start).count();
        let month_pomodoros = focus_days
            .iter()
            .filter(|day| day.year() == today.year() && day.month() == today.month())
            .count();

        let total_focus_seconds: i64 = records
            .iter()
            .filter(|record| record.is_completed_focus())
            .map(SessionRecord::duration_seconds)
            .sum();

        let average_session_seconds = if total_pomodoros > 0 {
            total_focus_seconds / total_pomodoros as i64
        } else {
            0
        };

        let active_days: BTreeSet<NaiveDate> = focus_days.into_iter().collect();

        Self {
            total_pomodoros,
            today_pomodoros,
            week_pomodoros,
            month_pomodoros,
            total_focus_seconds,
            average_session_seconds,
            completed_tasks,
            current_streak: current_streak(&active_days, today),
            longest_streak: longest_streak(&active_days),
        }
    }
}

fn current_streak(active_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);
    let mut cursor = if active_days.contains(&today) {
        today
    } else if active_days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while active_days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

fn longest_streak(active_days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in active_days {
        run = match previous {
            Some(previous) if *day - previous == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    longest
}
