use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Languages with a bundled locale file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

#[derive(Error, Debug)]
#[error("unsupported language: {requested}. Available languages: {available}")]
pub struct UnsupportedLanguageError {
    requested: String,
    available: String,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    /// Name of the language written in that language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
        }
    }

    pub(super) fn locale_source(&self) -> &'static str {
        match self {
            Language::En => include_str!("locales/en.toml"),
            Language::Fr => include_str!("locales/fr.toml"),
        }
    }

    /// Comma separated list of supported codes, for help and error text.
    pub fn available_codes() -> String {
        Self::ALL
            .iter()
            .map(Language::code)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Accepts codes, English and native names, and POSIX or BCP 47 locale tags
/// such as `fr_FR.UTF-8` or `en-GB`. Only the primary subtag is significant.
impl FromStr for Language {
    type Err = UnsupportedLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let requested = s.trim();
        let primary = requested
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match primary.as_str() {
            "en" | "english" => Ok(Language::En),
            "fr" | "french" | "français" | "francais" => Ok(Language::Fr),
            _ => Err(UnsupportedLanguageError {
                requested: requested.to_string(),
                available: Self::available_codes(),
            }),
        }
    }
}
