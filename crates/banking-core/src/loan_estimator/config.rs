use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::fallback::FallbackCoefficients;
use crate::error::BankingError;
use crate::BankingResult;

/// Path list (platform path-list syntax) of candidate model artifacts.
pub const MODEL_PATHS_ENV: &str = "BANKING_LOAN_MODEL_PATHS";

/// JSON file with fallback coefficients.
pub const FALLBACK_CONFIG_ENV: &str = "BANKING_LOAN_FALLBACK_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Candidate artifact locations, tried in order.
    #[serde(default = "default_model_search_paths")]
    pub model_search_paths: Vec<PathBuf>,
    #[serde(default)]
    pub fallback: FallbackCoefficients,
}

fn default_model_search_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("loan_tool_output/loan_amount_model.json"),
        PathBuf::from("models/loan_amount_model.json"),
    ]
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            model_search_paths: default_model_search_paths(),
            fallback: FallbackCoefficients::default(),
        }
    }
}

impl EstimatorConfig {
    /// Build from `BANKING_LOAN_MODEL_PATHS` and `BANKING_LOAN_FALLBACK_CONFIG`,
    /// falling back to the built-in defaults for anything unset.
    pub fn from_env() -> BankingResult<Self> {
        let model_search_paths = match env::var_os(MODEL_PATHS_ENV) {
            Some(raw) => env::split_paths(&raw)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => default_model_search_paths(),
        };

        let fallback = match env::var(FALLBACK_CONFIG_ENV) {
            Ok(path) => read_json::<FallbackCoefficients>(Path::new(&path))?,
            Err(_) => FallbackCoefficients::default(),
        };

        let config = Self {
            model_search_paths,
            fallback,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a full estimator configuration from a JSON file.
    pub fn from_file(path: &Path) -> BankingResult<Self> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BankingResult<()> {
        self.fallback.validate()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> BankingResult<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        BankingError::invalid_input(
            "config",
            format!("failed to read '{}': {e}", path.display()),
        )
    })?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.model_search_paths.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_with_partial_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_search_paths": ["a.json", "b.json"], "fallback": {{"income_multiplier": "0.4"}}}}"#
        )
        .unwrap();

        let config = EstimatorConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.model_search_paths,
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        assert_eq!(config.fallback.income_multiplier, dec!(0.4));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(EstimatorConfig::from_file(Path::new("/nonexistent/estimator.json")).is_err());
    }
}
