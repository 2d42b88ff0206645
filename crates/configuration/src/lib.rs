use core_types::EventTag;
use std::path::{Path, PathBuf};

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    CalendarSettings, Config, ContextSettings, DEFAULT_CALENDAR_PATH, DEFAULT_LOOKBACK_DAYS,
    OutputFormat, OutputSettings,
};

/// Prefix for environment overrides, e.g. `EVENT_FLAGS__CONTEXT__LOOKBACK_DAYS=3`.
pub const ENV_PREFIX: &str = "EVENT_FLAGS";

/// Loads the application configuration.
///
/// Sources, lowest priority first: built-in defaults, the TOML file (`config.toml`
/// unless `path` is given; a missing file is fine), then `EVENT_FLAGS__*` environment
/// variables. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = config::Config::builder()
        .set_default("calendar.path", settings::DEFAULT_CALENDAR_PATH)?
        .set_default("context.lookback_days", i64::from(settings::DEFAULT_LOOKBACK_DAYS))?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(
        calendar = %config.calendar.path.display(),
        lookback_days = config.context.lookback_days,
        aliases = config.aliases.len(),
        "Configuration loaded."
    );

    Ok(config)
}

/// The directory containing the running executable, where a packaged install keeps
/// its `data/` directory.
pub fn install_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Checks the user-supplied tables for entries that would corrupt normalization.
///
/// Table keys are compared upper-cased; tags are upper-case by convention and the
/// key case of a config source is not guaranteed to survive.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for (alias, target) in &config.aliases {
        if target.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "alias '{alias}' maps to an empty tag"
            )));
        }
        // An alias spelled like a canonical tag would make normalization non-idempotent.
        if let Some(known) = EventTag::known(&alias.to_ascii_uppercase()) {
            if known.as_str() != target {
                return Err(ConfigError::ValidationError(format!(
                    "alias '{alias}' shadows the canonical tag {known}"
                )));
            }
        } else if EventTag::from(target.trim()).is_rule_based() {
            return Err(ConfigError::ValidationError(format!(
                "alias '{alias}' targets {target}, which only the date rules may set"
            )));
        }
    }

    for (tag, text) in &config.definitions {
        if text.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "definition for '{tag}' is empty"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let config = Config::default();
        assert_eq!(config.context.lookback_days, 7);
        assert_eq!(config.calendar.path, Path::new("data/event_calendar.json"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn loads_values_from_toml() {
        let file = write_toml(
            r#"
            [calendar]
            path = "/srv/calendar.json"

            [context]
            lookback_days = 3

            [output]
            format = "table"

            [aliases]
            FED_DECISION = "FOMC"

            [definitions]
            CPI = "Inflation print; rates-sensitive sectors may gap."
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.calendar.path, Path::new("/srv/calendar.json"));
        assert_eq!(config.context.lookback_days, 3);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(
            config
                .aliases
                .iter()
                .any(|(k, v)| k.eq_ignore_ascii_case("FED_DECISION") && v == "FOMC")
        );
        assert!(config.definitions.keys().any(|k| k.eq_ignore_ascii_case("CPI")));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_toml("[context]\nlookback_days = 0\n");
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.context.lookback_days, 0);
        assert_eq!(config.calendar.path, Path::new(DEFAULT_CALENDAR_PATH));
    }

    #[test]
    fn negative_lookback_is_rejected() {
        let file = write_toml("[context]\nlookback_days = -1\n");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/event-flags.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn alias_shadowing_a_canonical_tag_is_rejected() {
        let mut config = Config::default();
        config
            .aliases
            .insert("MONTH_END".to_string(), "QUARTER_END".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn alias_onto_a_rule_tag_is_rejected() {
        let mut config = Config::default();
        config
            .aliases
            .insert("OPEX_DAY".to_string(), "MONTHLY_OPEX".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn relative_calendar_path_prefers_the_install_dir() {
        let install = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(install.path().join("data")).unwrap();
        std::fs::write(install.path().join("data/event_calendar.json"), "{}").unwrap();

        let settings = CalendarSettings::default();
        assert_eq!(
            settings.resolve_path(Some(install.path())),
            install.path().join("data/event_calendar.json")
        );
    }

    #[test]
    fn relative_calendar_path_falls_back_to_the_working_dir() {
        let empty_install = tempfile::tempdir().unwrap();
        let settings = CalendarSettings::default();

        assert_eq!(
            settings.resolve_path(Some(empty_install.path())),
            PathBuf::from(DEFAULT_CALENDAR_PATH)
        );
        assert_eq!(settings.resolve_path(None), PathBuf::from(DEFAULT_CALENDAR_PATH));
    }

    #[test]
    fn absolute_calendar_path_is_untouched() {
        let install = tempfile::tempdir().unwrap();
        let settings = CalendarSettings {
            path: PathBuf::from("/srv/event_calendar.json"),
        };
        assert_eq!(
            settings.resolve_path(Some(install.path())),
            Path::new("/srv/event_calendar.json")
        );
    }

    #[test]
    fn install_dir_is_the_executable_directory() {
        let dir = install_dir().unwrap();
        assert!(std::env::current_exe().unwrap().starts_with(dir));
    }

    #[test]
    fn empty_entries_are_rejected() {
        let mut config = Config::default();
        config.aliases.insert("CPI_PRINT".to_string(), " ".to_string());
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.definitions.insert("CPI".to_string(), String::new());
        assert!(validate(&config).is_err());
    }
}
