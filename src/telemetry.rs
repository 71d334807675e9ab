//! Telemetry
//!
//! Optional JSON trace log. Standard output belongs to the preview line,
//! so events only ever go to a file.
//!
//! `BRAILLE_LOG` turns logging on and may name a level. `BRAILLE_TRACE_LOG`
//! overrides the destination. Both win over the config file.

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::ChronoUtc;

use crate::config::Config;

const LEVEL_VAR: &str = "BRAILLE_LOG";
const PATH_VAR: &str = "BRAILLE_TRACE_LOG";
const DEFAULT_FILE: &str = "bytes_as_braille_trace.jsonl";

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Where and how much to trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSettings {
    pub path: PathBuf,
    pub level: LevelFilter,
}

impl TraceSettings {
    /// Resolve settings from the config and the process environment.
    /// `None` means tracing stays off.
    pub fn from_config(config: &Config) -> Option<Self> {
        Self::resolve(config, |name| env::var(name).ok())
    }

    fn resolve(config: &Config, var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let env_level = var(LEVEL_VAR);
        if !config.logs && env_level.is_none() {
            return None;
        }

        // an unparsable value (e.g. BRAILLE_LOG=yes) only switches logging on
        let level = [env_level.as_deref(), config.log_level.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|name| name.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::DEBUG);
        if level == LevelFilter::OFF {
            return None;
        }

        let path = var(PATH_VAR)
            .map(PathBuf::from)
            .or_else(|| config.log_file.clone())
            .unwrap_or_else(|| env::temp_dir().join(DEFAULT_FILE));

        Some(Self { path, level })
    }
}

/// Install the global subscriber once, if logging is enabled
pub fn init_tracing(config: &Config) {
    let Some(settings) = TraceSettings::from_config(config) else {
        return;
    };

    let _ = TRACING_INIT.get_or_init(|| {
        let file = match OpenOptions::new().create(true).append(true).open(&settings.path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("trace log {}: {err}", settings.path.display());
                return;
            }
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(settings.level)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(file)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_disabled_by_default() {
        assert_eq!(TraceSettings::resolve(&Config::default(), no_env), None);
    }

    #[test]
    fn test_config_enables_logging() {
        let config = Config {
            logs: true,
            ..Config::default()
        };
        let settings = TraceSettings::resolve(&config, no_env).unwrap();
        assert_eq!(settings.level, LevelFilter::DEBUG);
        assert_eq!(settings.path, env::temp_dir().join(DEFAULT_FILE));
    }

    #[test]
    fn test_config_level_and_file() {
        let config = Config {
            logs: true,
            log_level: Some("warn".into()),
            log_file: Some(PathBuf::from("/var/tmp/braille.jsonl")),
            ..Config::default()
        };
        let settings = TraceSettings::resolve(&config, no_env).unwrap();
        assert_eq!(settings.level, LevelFilter::WARN);
        assert_eq!(settings.path, PathBuf::from("/var/tmp/braille.jsonl"));
    }

    #[test]
    fn test_environment_overrides_config() {
        let config = Config {
            log_level: Some("warn".into()),
            log_file: Some(PathBuf::from("/var/tmp/braille.jsonl")),
            ..Config::default()
        };
        let env = |name: &str| match name {
            LEVEL_VAR => Some("trace".to_string()),
            PATH_VAR => Some("/tmp/override.jsonl".to_string()),
            _ => None,
        };
        let settings = TraceSettings::resolve(&config, env).unwrap();
        assert_eq!(settings.level, LevelFilter::TRACE);
        assert_eq!(settings.path, PathBuf::from("/tmp/override.jsonl"));
    }

    #[test]
    fn test_unparsable_env_level_falls_back() {
        let config = Config {
            log_level: Some("info".into()),
            ..Config::default()
        };
        let env = |name: &str| (name == LEVEL_VAR).then(|| "yes".to_string());
        let settings = TraceSettings::resolve(&config, env).unwrap();
        assert_eq!(settings.level, LevelFilter::INFO);
    }

    #[test]
    fn test_level_off_disables() {
        let config = Config {
            logs: true,
            log_level: Some("off".into()),
            ..Config::default()
        };
        assert_eq!(TraceSettings::resolve(&config, no_env), None);
    }
}
