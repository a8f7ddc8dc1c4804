//! Configuration file loading.
//!
//! The file is TOML with the shape of [`StudyConfig`]; every key is
//! optional:
//!
//! ```toml
//! correlation_window = 12
//! vix_lag = 1
//! portfolios = ["Innovation", "SPE", "SPC"]
//!
//! [regression]
//! window = 36
//! factors = ["SMB", "HML"]
//!
//! [stats]
//! window = 12
//! periods_per_year = 12.0
//! ```

use albany::StudyConfig;
use albany_regression::FactorSelection;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for a study configuration
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load the configuration file, or the defaults when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<StudyConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(StudyConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Window a subcommand's `--window` flag sets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowTarget {
    /// Rolling regression window
    #[default]
    Regression,
    /// Rolling statistics window
    Stats,
    /// Rolling correlation window
    Correlation,
}

/// Command-line settings that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub(crate) window: Option<usize>,
    pub(crate) target: WindowTarget,
    pub(crate) factors: Option<FactorSelection>,
}

impl Overrides {
    pub(crate) fn apply(&self, mut config: StudyConfig) -> StudyConfig {
        if let Some(window) = self.window {
            match self.target {
                WindowTarget::Regression => config.regression.window = window,
                WindowTarget::Stats => config.stats.window = window,
                WindowTarget::Correlation => config.correlation_window = window,
            }
        }
        if let Some(factors) = self.factors {
            config.regression.factors = factors;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_partial_toml() {
        let config: StudyConfig = toml::from_str(
            r#"
            vix_lag = 2

            [regression]
            window = 24
            factors = ["Mkt-RF", "SMB", "HML"]
            "#,
        )
        .unwrap();

        assert_eq!(config.vix_lag, 2);
        assert_eq!(config.regression.window, 24);
        assert_eq!(config.regression.factors.column_names(), vec!["Mkt-RF", "SMB", "HML"]);
        assert_eq!(config.stats.window, 12);
        assert_eq!(config.correlation_window, 12);
    }

    #[test]
    fn test_unknown_factor_rejected() {
        let parsed: Result<StudyConfig, _> = toml::from_str(
            r#"
            [regression]
            factors = ["QMJ"]
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load(Some(Path::new("/nonexistent/albany.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let overrides = Overrides {
            window: Some(6),
            target: WindowTarget::Regression,
            factors: Some(FactorSelection::none()),
        };
        let config = overrides.apply(StudyConfig::default());
        assert_eq!(config.regression.window, 6);
        assert_eq!(config.stats.window, 12);
        assert_eq!(config.correlation_window, 12);
        assert!(config.regression.factors.is_empty());

        let untouched = Overrides::default().apply(StudyConfig::default());
        assert_eq!(untouched.regression.window, 36);
    }

    #[rstest]
    #[case(WindowTarget::Regression, (6, 12, 12))]
    #[case(WindowTarget::Stats, (36, 6, 12))]
    #[case(WindowTarget::Correlation, (36, 12, 6))]
    fn test_window_override_target(
        #[case] target: WindowTarget,
        #[case] expected: (usize, usize, usize),
    ) {
        let overrides = Overrides {
            window: Some(6),
            target,
            ..Default::default()
        };
        let config = overrides.apply(StudyConfig::default());
        assert_eq!(
            (
                config.regression.window,
                config.stats.window,
                config.correlation_window
            ),
            expected
        );
    }
}
