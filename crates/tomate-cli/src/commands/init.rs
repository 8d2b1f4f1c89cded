use std::num::NonZeroU32;
use std::ops::RangeInclusive;

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input};
use tomate_core::{Config, Translator};

const DURATION_RANGE: RangeInclusive<u32> = 1..=240;
const INTERVAL_RANGE: RangeInclusive<u32> = 1..=12;

pub fn execute(force: bool) -> Result<()> {
    let existing = Config::load().unwrap_or_default();
    let translator = Translator::new(existing.general.language);
    let config_path = Config::config_path();

    if config_path.exists() && !force {
        bail!(
            "{}",
            translator.format("init.exists", &[("path", &config_path.display().to_string())])
        );
    }

    if force && config_path.exists() {
        println!("{}\n", translator.get("init.overwrite"));
    }

    println!("{}\n", translator.get("init.welcome"));

    let config = prompt_configuration(existing, &translator)?;
    let saved_path = config.save()?;

    println!(
        "\n{}",
        translator.format("init.saved", &[("path", &saved_path.display().to_string())])
    );
    println!("{}", translator.get("init.next_step"));

    Ok(())
}

fn prompt_configuration(mut config: Config, translator: &Translator) -> Result<Config> {
    let defaults = config.timer;

    config.timer.focus_duration_minutes = prompt_number(
        translator,
        "init.prompt_focus",
        defaults.focus_duration_minutes,
        DURATION_RANGE,
    )?;
    config.timer.short_break_duration_minutes = prompt_number(
        translator,
        "init.prompt_short_break",
        defaults.short_break_duration_minutes,
        DURATION_RANGE,
    )?;
    config.timer.long_break_duration_minutes = prompt_number(
        translator,
        "init.prompt_long_break",
        defaults.long_break_duration_minutes,
        DURATION_RANGE,
    )?;
    config.timer.long_break_interval = prompt_number(
        translator,
        "init.prompt_interval",
        defaults.long_break_interval,
        INTERVAL_RANGE,
    )?;

    config.timer.auto_start_breaks = Confirm::new()
        .with_prompt(translator.get("init.prompt_auto_start_breaks"))
        .default(defaults.auto_start_breaks)
        .interact()?;
    config.timer.auto_start_pomodoros = Confirm::new()
        .with_prompt(translator.get("init.prompt_auto_start_pomodoros"))
        .default(defaults.auto_start_pomodoros)
        .interact()?;
    config.notifications.sound_enabled = Confirm::new()
        .with_prompt(translator.get("init.prompt_sound"))
        .default(config.notifications.sound_enabled)
        .interact()?;

    Ok(config)
}

fn prompt_number(
    translator: &Translator,
    prompt_key: &str,
    default: NonZeroU32,
    range: RangeInclusive<u32>,
) -> Result<NonZeroU32> {
    let out_of_range = range_message(translator, &range);

    let value = Input::<NonZeroU32>::new()
        .with_prompt(translator.get(prompt_key))
        .default(default)
        .validate_with(|input: &NonZeroU32| -> Result<(), String> {
            if range.contains(&input.get()) {
                Ok(())
            } else {
                Err(out_of_range.clone())
            }
        })
        .interact_text()?;

    Ok(value)
}

fn range_message(translator: &Translator, range: &RangeInclusive<u32>) -> String {
    translator.format(
        "init.invalid_range",
        &[
            ("min", &range.start().to_string()),
            ("max", &range.end().to_string()),
        ],
    )
}
