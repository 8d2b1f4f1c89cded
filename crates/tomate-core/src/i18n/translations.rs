use super::Language;
use crate::domain::TimerMode;
use std::collections::HashMap;

/// Looks up user-facing strings by dotted key (`section.name`).
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    translations: HashMap<String, String>,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            translations: parse_translations(language.locale_source()),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Missing keys fall back to the key itself.
    pub fn get(&self, key: &str) -> String {
        self.translations
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.get(key), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    pub fn mode(&self, mode: TimerMode) -> String {
        self.get(match mode {
            TimerMode::Focus => "mode.focus",
            TimerMode::ShortBreak => "mode.short_break",
            TimerMode::LongBreak => "mode.long_break",
        })
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

fn parse_translations(content: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();

    if let Ok(toml::Value::Table(table)) = toml::from_str::<toml::Value>(content) {
        flatten("", &table, &mut result);
    }

    result
}

fn flatten(prefix: &str, table: &toml::value::Table, result: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::String(text) => {
                result.insert(full_key, text.clone());
            }
            toml::Value::Table(nested) => flatten(&full_key, nested, result),
            _ => {}
        }
    }
}
