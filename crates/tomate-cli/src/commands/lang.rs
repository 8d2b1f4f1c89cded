use anyhow::{anyhow, Result};
use tomate_core::{Config, Language, Translator};

pub fn execute(language: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let translator = Translator::new(config.general.language);

    match language {
        Some(code) => set_language(config, &code, &translator),
        None => {
            println!("{}", current_language_message(config.general.language, &translator));
            Ok(())
        }
    }
}

fn set_language(mut config: Config, code: &str, translator: &Translator) -> Result<()> {
    let language: Language = code.parse().map_err(|_| {
        let available = Language::available_codes();
        anyhow!(
            "{}",
            translator.format(
                "lang.unsupported",
                &[("lang", code), ("available", available.as_str())]
            )
        )
    })?;

    config.general.language = language;
    config.save()?;

    let translator = Translator::new(language);
    println!(
        "{}",
        translator.format("lang.set", &[("name", language.display_name())])
    );

    Ok(())
}

fn current_language_message(language: Language, translator: &Translator) -> String {
    translator.format(
        "lang.current",
        &[("name", language.display_name()), ("code", language.code())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_language_is_described_in_its_own_words() {
        let language = Language::Fr;
        let translator = Translator::new(language);

        let message = current_language_message(language, &translator);

        assert!(message.contains("Français"));
        assert!(message.contains("(fr)"));
    }

    #[test]
    fn unsupported_language_is_rejected_before_saving() {
        let result = set_language(Config::default(), "klingon", &Translator::default());

        assert_eq!(
            result.unwrap_err().to_string(),
            "Unsupported language: klingon. Available: en, fr"
        );
    }
}
