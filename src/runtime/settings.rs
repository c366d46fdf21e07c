use tracing::{debug, warn};

use crate::config::Settings;

/// Settings for this run. A missing, unreadable or invalid config never
/// stops startup; it only costs the user their overrides.
pub fn load_settings() -> Settings {
    settings_or_default(Settings::load())
}

fn settings_or_default(loaded: Result<Settings, ::config::ConfigError>) -> Settings {
    let checked = loaded
        .map_err(|e| format!("cannot read config: {e}"))
        .and_then(|settings| match settings.validate() {
            Ok(()) => Ok(settings),
            Err(msg) => Err(format!("invalid config: {msg}")),
        });

    match checked {
        Ok(settings) => {
            debug!(?settings.schedule, "settings loaded");
            settings
        }
        Err(reason) => {
            warn!(%reason, "falling back to default settings");
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_settings_are_kept() {
        let mut settings = Settings::default();
        settings.schedule.min_interval_secs = 3;
        settings.schedule.max_interval_secs = 4;

        let kept = settings_or_default(Ok(settings));
        assert_eq!(kept.schedule.min_interval_secs, 3);
        assert_eq!(kept.schedule.max_interval_secs, 4);
    }

    #[test]
    fn invalid_or_unreadable_settings_fall_back_to_defaults() {
        let defaults = Settings::default();

        let mut broken = Settings::default();
        broken.schedule.tick_ms = 0;
        assert_eq!(settings_or_default(Ok(broken)).schedule.tick_ms, defaults.schedule.tick_ms);

        let unreadable = Err(::config::ConfigError::Message("bad toml".into()));
        assert_eq!(
            settings_or_default(unreadable).schedule.min_interval_secs,
            defaults.schedule.min_interval_secs
        );
    }
}
