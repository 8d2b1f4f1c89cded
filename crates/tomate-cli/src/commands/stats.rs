use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use clap::ValueEnum;
use serde::Serialize;
use tomate_adapters::{SqliteSessionRepository, SqliteTaskRepository};
use tomate_core::{Config, SessionRecord, SessionRepository, Stats, TaskRepository, Translator};

use super::translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    All,
}

impl Period {
    fn label(&self, translator: &Translator) -> String {
        match self {
            Period::Today => translator.get("stats.period_today"),
            Period::Week => translator.get("stats.period_week"),
            Period::Month => translator.get("stats.period_month"),
            Period::All => translator.get("stats.period_all"),
        }
    }

    /// First instant of the period in the time zone of `now`; `None` for all
    /// time. Weeks start on Sunday.
    fn start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let first_day = match self {
            Period::Today => today,
            Period::Week => {
                today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
            }
            Period::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?,
            Period::All => return None,
        };

        now.timezone()
            .from_local_datetime(&first_day.and_hms_opt(0, 0, 0)?)
            .earliest()
            .map(|start| start.with_timezone(&Utc))
    }
}

#[derive(Serialize)]
struct StatsOutput {
    period: Period,
    pomodoros: usize,
    focus_seconds: i64,
    average_session_seconds: i64,
    overall: Stats,
}

pub async fn execute(period: Period, json: bool) -> Result<()> {
    let translator = translator();
    let database_path = Config::database_path();

    if !database_path.exists() {
        println!("{}", translator.get("error.no_data"));
        return Ok(());
    }

    let sessions = SqliteSessionRepository::new(&database_path)
        .map_err(|error| anyhow!("database access error: {}", error))?;
    let records = sessions
        .find_all()
        .map_err(|error| anyhow!("read error: {}", error))?;
    let completed_tasks = SqliteTaskRepository::new(&database_path)
        .and_then(|tasks| tasks.count_completed())
        .unwrap_or(0);

    let now = Local::now();
    let overall = Stats::compute(&records, completed_tasks, &now);
    let in_period = records_in_period(records, period, &now);
    let period_stats = Stats::compute(&in_period, completed_tasks, &now);

    if json {
        let output = StatsOutput {
            period,
            pomodoros: period_stats.total_pomodoros,
            focus_seconds: period_stats.total_focus_seconds,
            average_session_seconds: period_stats.average_session_seconds,
            overall,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if overall.total_pomodoros == 0 {
        println!("{}", translator.get("stats.no_sessions"));
        return Ok(());
    }

    display_stats(&period_stats, &overall, period, &translator);

    Ok(())
}

fn records_in_period<Tz: TimeZone>(
    records: Vec<SessionRecord>,
    period: Period,
    now: &DateTime<Tz>,
) -> Vec<SessionRecord> {
    match period.start(now) {
        Some(start) => records
            .into_iter()
            .filter(|record| record.started_at >= start)
            .collect(),
        None => records,
    }
}

fn display_stats(period_stats: &Stats, overall: &Stats, period: Period, translator: &Translator) {
    let days = translator.get("stats.days");

    println!(
        "{} ({})\n",
        translator.get("stats.header"),
        period.label(translator)
    );
    println!(
        "   {:<20} {}",
        translator.get("stats.total_pomodoros"),
        period_stats.total_pomodoros
    );
    println!(
        "   {:<20} {}",
        translator.get("stats.focus_time"),
        format_duration(period_stats.total_focus_seconds)
    );
    println!(
        "   {:<20} {}",
        translator.get("stats.average"),
        format_duration(period_stats.average_session_seconds)
    );
    println!();
    println!("   {:<20} {}", translator.get("stats.today"), overall.today_pomodoros);
    println!("   {:<20} {}", translator.get("stats.week"), overall.week_pomodoros);
    println!("   {:<20} {}", translator.get("stats.month"), overall.month_pomodoros);
    println!(
        "   {:<20} {}",
        translator.get("stats.completed_tasks"),
        overall.completed_tasks
    );
    println!(
        "   {:<20} {} {}",
        translator.get("stats.current_streak"),
        overall.current_streak,
        days
    );
    println!(
        "   {:<20} {} {}",
        translator.get("stats.longest_streak"),
        overall.longest_streak,
        days
    );
}

fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        format!("{}h {:02}min", hours, minutes)
    } else {
        format!("{}min", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomate_core::TimerMode;

    fn wednesday_afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 14, 30, 0).unwrap()
    }

    #[test]
    fn today_starts_at_midnight() {
        let start = Period::Today.start(&wednesday_afternoon()).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_starts_on_sunday() {
        let start = Period::Week.start(&wednesday_afternoon()).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_starts_on_the_first() {
        let start = Period::Month.start(&wednesday_afternoon()).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn all_has_no_start() {
        assert!(Period::All.start(&wednesday_afternoon()).is_none());
    }

    #[test]
    fn records_in_period_filters_by_start_time() {
        let now = wednesday_afternoon();
        let records = vec![
            SessionRecord::completed(TimerMode::Focus, 25, now - Duration::days(10), None),
            SessionRecord::completed(TimerMode::Focus, 25, now - Duration::hours(1), None),
        ];

        assert_eq!(records_in_period(records.clone(), Period::Week, &now).len(), 1);
        assert_eq!(records_in_period(records, Period::All, &now).len(), 2);
    }

    #[test]
    fn format_duration_uses_hours_when_needed() {
        assert_eq!(format_duration(25 * 60), "25min");
        assert_eq!(format_duration(3600 + 5 * 60), "1h 05min");
        assert_eq!(format_duration(0), "0min");
    }
}
