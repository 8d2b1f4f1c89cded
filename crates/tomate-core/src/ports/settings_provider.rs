use std::sync::{Arc, RwLock};

use crate::domain::TimerSettings;

/// Read-only access to the timer settings, consulted at every transition.
pub trait SettingsProvider: Send + Sync {
    fn current(&self) -> TimerSettings;
}

impl SettingsProvider for TimerSettings {
    fn current(&self) -> TimerSettings {
        *self
    }
}

/// Settings shared between the engine and whoever edits them.
///
/// Updates replace the whole snapshot at once; the engine only sees the new
/// values at its next transition.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<TimerSettings>>,
}

impl SharedSettings {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn replace(&self, settings: TimerSettings) {
        match self.inner.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }
}

impl SettingsProvider for SharedSettings {
    fn current(&self) -> TimerSettings {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    #[test]
    fn fixed_settings_return_themselves() {
        let settings = TimerSettings::default();

        assert_eq!(settings.current(), settings);
    }

    #[test]
    fn replace_is_visible_to_clones() {
        let shared = SharedSettings::new(TimerSettings::default());
        let engine_view = shared.clone();

        shared.replace(TimerSettings {
            focus_duration_minutes: NonZeroU32::new(50).unwrap(),
            ..Default::default()
        });

        assert_eq!(engine_view.current().focus_duration_minutes.get(), 50);
    }
}
