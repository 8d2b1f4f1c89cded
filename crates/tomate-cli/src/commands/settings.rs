use std::num::NonZeroU32;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use tomate_core::{Config, TimerSettings, Translator};
use tomate_protocol::{Request, Response};

use super::{expect_ok, send, translator};
use crate::client::DaemonClient;

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show the timer settings
    Show,
    /// Change one or more timer settings
    Set(SettingsOverrides),
}

#[derive(Args, Default)]
pub struct SettingsOverrides {
    /// Focus duration in minutes
    #[arg(long)]
    focus: Option<NonZeroU32>,
    /// Short break duration in minutes
    #[arg(long)]
    short_break: Option<NonZeroU32>,
    /// Long break duration in minutes
    #[arg(long)]
    long_break: Option<NonZeroU32>,
    /// Completed pomodoros between long breaks
    #[arg(long)]
    interval: Option<NonZeroU32>,
    #[arg(long)]
    auto_start_breaks: Option<bool>,
    #[arg(long)]
    auto_start_pomodoros: Option<bool>,
}

impl SettingsOverrides {
    fn is_empty(&self) -> bool {
        self.focus.is_none()
            && self.short_break.is_none()
            && self.long_break.is_none()
            && self.interval.is_none()
            && self.auto_start_breaks.is_none()
            && self.auto_start_pomodoros.is_none()
    }

    fn apply(&self, settings: TimerSettings) -> TimerSettings {
        TimerSettings {
            focus_duration_minutes: self.focus.unwrap_or(settings.focus_duration_minutes),
            short_break_duration_minutes: self
                .short_break
                .unwrap_or(settings.short_break_duration_minutes),
            long_break_duration_minutes: self
                .long_break
                .unwrap_or(settings.long_break_duration_minutes),
            long_break_interval: self.interval.unwrap_or(settings.long_break_interval),
            auto_start_breaks: self.auto_start_breaks.unwrap_or(settings.auto_start_breaks),
            auto_start_pomodoros: self
                .auto_start_pomodoros
                .unwrap_or(settings.auto_start_pomodoros),
        }
    }
}

pub async fn execute(command: SettingsCommand) -> Result<()> {
    let translator = translator();
    let daemon_running = DaemonClient::new().is_running().await;

    let current = if daemon_running {
        match send(Request::GetSettings, &translator).await? {
            Response::Settings(settings) => settings,
            _ => bail!("{}", translator.get("error.unexpected_response")),
        }
    } else {
        Config::load()?.timer
    };

    match command {
        SettingsCommand::Show => print_settings(&current, &translator),
        SettingsCommand::Set(overrides) => {
            if overrides.is_empty() {
                print_settings(&current, &translator);
                return Ok(());
            }

            let updated = overrides.apply(current);

            if daemon_running {
                let response = send(Request::UpdateSettings { settings: updated }, &translator).await?;
                expect_ok(response, &translator)?;
            } else {
                let mut config = Config::load()?;
                config.timer = updated;
                config.save()?;
            }

            println!("{}", translator.get("settings.updated"));
            print_settings(&updated, &translator);
            println!("\n{}", translator.get("settings.apply_hint"));
        }
    }

    Ok(())
}

fn print_settings(settings: &TimerSettings, translator: &Translator) {
    let minutes = translator.get("settings.minutes");
    let yes_no = |value: bool| {
        if value {
            translator.get("settings.yes")
        } else {
            translator.get("settings.no")
        }
    };

    println!("{}\n", translator.get("settings.header"));
    println!(
        "   {:<24} {} {}",
        translator.get("settings.focus"),
        settings.focus_duration_minutes,
        minutes
    );
    println!(
        "   {:<24} {} {}",
        translator.get("settings.short_break"),
        settings.short_break_duration_minutes,
        minutes
    );
    println!(
        "   {:<24} {} {}",
        translator.get("settings.long_break"),
        settings.long_break_duration_minutes,
        minutes
    );
    println!(
        "   {:<24} {} {}",
        translator.get("settings.interval"),
        settings.long_break_interval,
        translator.get("settings.sessions")
    );
    println!(
        "   {:<24} {}",
        translator.get("settings.auto_start_breaks"),
        yes_no(settings.auto_start_breaks)
    );
    println!(
        "   {:<24} {}",
        translator.get("settings.auto_start_pomodoros"),
        yes_no(settings.auto_start_pomodoros)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_change_nothing() {
        let overrides = SettingsOverrides::default();
        let settings = TimerSettings::default();

        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(settings), settings);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = SettingsOverrides {
            focus: NonZeroU32::new(50),
            auto_start_breaks: Some(true),
            ..SettingsOverrides::default()
        };

        let updated = overrides.apply(TimerSettings::default());

        assert_eq!(updated.focus_duration_minutes.get(), 50);
        assert!(updated.auto_start_breaks);
        assert_eq!(updated.short_break_duration_minutes.get(), 5);
        assert_eq!(updated.long_break_interval.get(), 4);
        assert!(!updated.auto_start_pomodoros);
    }
}
