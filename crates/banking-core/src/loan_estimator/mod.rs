//! Loan amount estimation.
//!
//! A trained regression artifact is loaded lazily, once per estimator, from
//! the first usable path in the configured search list. When none loads, the
//! estimate comes from the deterministic formula in [`fallback`]. A missing
//! model is an expected condition and is never reported as an error.

pub mod config;
pub mod fallback;
pub mod model;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::BankingError;
use crate::time_value::round_money;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::BankingResult;

pub use config::EstimatorConfig;
pub use fallback::{CreditScoreBand, FallbackCoefficients};
pub use model::{FeatureVector, LoanModel, ModelLoadError};

pub(crate) const MIN_CREDIT_SCORE: u32 = 300;
const MAX_CREDIT_SCORE: u32 = 900;
const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 100;
const MIN_TENURE_YEARS: u32 = 1;
const MAX_TENURE_YEARS: u32 = 40;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanEstimateInput {
    pub age: u32,
    pub monthly_income: Money,
    pub credit_score: u32,
    pub tenure_years: u32,
    #[serde(default)]
    pub existing_loan_amount: Money,
    #[serde(default)]
    pub dependents: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    Model,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanEstimateResult {
    pub eligible_loan_amount: Money,
    pub method_used: EstimationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

impl LoanEstimateInput {
    pub fn validate(&self) -> BankingResult<()> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(BankingError::invalid_input(
                "age",
                format!("age must be within {MIN_AGE}..={MAX_AGE}"),
            ));
        }
        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&self.credit_score) {
            return Err(BankingError::invalid_input(
                "credit_score",
                format!("credit_score must be within {MIN_CREDIT_SCORE}..={MAX_CREDIT_SCORE}"),
            ));
        }
        if !(MIN_TENURE_YEARS..=MAX_TENURE_YEARS).contains(&self.tenure_years) {
            return Err(BankingError::invalid_input(
                "tenure_years",
                format!("tenure_years must be within {MIN_TENURE_YEARS}..={MAX_TENURE_YEARS}"),
            ));
        }
        if self.monthly_income < Decimal::ZERO {
            return Err(BankingError::invalid_input(
                "monthly_income",
                "monthly_income cannot be negative",
            ));
        }
        if self.existing_loan_amount < Decimal::ZERO {
            return Err(BankingError::invalid_input(
                "existing_loan_amount",
                "existing_loan_amount cannot be negative",
            ));
        }
        Ok(())
    }

    /// Features in the order the model was trained on.
    pub fn features(&self) -> FeatureVector {
        [
            Decimal::from(self.age),
            self.monthly_income,
            Decimal::from(self.credit_score),
            Decimal::from(self.tenure_years),
            self.existing_loan_amount,
            Decimal::from(self.dependents),
        ]
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct LoadedModel {
    path: Option<PathBuf>,
    model: LoanModel,
}

/// Loan estimator with a lazily loaded, read-only model.
#[derive(Debug)]
pub struct LoanEstimator {
    config: EstimatorConfig,
    model: OnceLock<Option<LoadedModel>>,
}

impl LoanEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            model: OnceLock::new(),
        }
    }

    /// Estimator with an already deserialized model; the search path is
    /// never consulted.
    pub fn with_model(model: LoanModel, fallback: FallbackCoefficients) -> BankingResult<Self> {
        model
            .validate()
            .map_err(|reason| BankingError::invalid_input("model", reason))?;
        let estimator = Self::new(EstimatorConfig {
            model_search_paths: Vec::new(),
            fallback,
        });
        let _ = estimator.model.set(Some(LoadedModel { path: None, model }));
        Ok(estimator)
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Whether predictions come from a trained model. Triggers the one-time
    /// load if it has not happened yet.
    pub fn has_model(&self) -> bool {
        self.loaded().is_some()
    }

    fn loaded(&self) -> Option<&LoadedModel> {
        // get_or_init runs the loader exactly once; concurrent first callers
        // block until it finishes.
        self.model.get_or_init(|| self.load_first()).as_ref()
    }

    fn load_first(&self) -> Option<LoadedModel> {
        for path in &self.config.model_search_paths {
            match LoanModel::load(path) {
                Ok(model) => {
                    info!(
                        path = %path.display(),
                        kind = model.kind(),
                        "Loan model loaded"
                    );
                    return Some(LoadedModel {
                        path: Some(path.clone()),
                        model,
                    });
                }
                Err(ModelLoadError::Missing { .. }) => {
                    debug!(path = %path.display(), "Loan model candidate not present");
                }
                Err(e) => {
                    warn!(error = %e, "Skipping unusable loan model");
                }
            }
        }

        let reason = ModelLoadError::Unavailable {
            searched: self.config.model_search_paths.len(),
        };
        warn!(reason = %reason, "Loan estimates will use the fallback formula");
        None
    }

    pub fn estimate(
        &self,
        input: &LoanEstimateInput,
    ) -> BankingResult<ComputationOutput<LoanEstimateResult>> {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();

        input.validate()?;

        let (raw, method, model_path, methodology) = match self.loaded() {
            Some(loaded) => (
                loaded.model.predict(&input.features())?,
                EstimationMethod::Model,
                loaded.path.as_ref().map(|p| p.display().to_string()),
                "Loan estimate (trained regression model)",
            ),
            None => (
                self.config.fallback.estimate(input)?,
                EstimationMethod::Fallback,
                None,
                "Loan estimate (fallback: min(income capacity, credit score cap) - existing loans)",
            ),
        };

        if raw < Decimal::ZERO {
            warnings.push(format!("Model predicted {raw}; clamped to zero"));
        }
        let amount = round_money(raw.max(Decimal::ZERO));

        debug!(method = ?method, amount = %amount, "Loan estimate computed");

        let output = LoanEstimateResult {
            eligible_loan_amount: amount,
            method_used: method,
            model_path,
        };

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            methodology,
            &serde_json::json!({
                "features": input,
                "income_multiplier": self.config.fallback.income_multiplier.to_string(),
            }),
            warnings,
            elapsed,
            output,
        ))
    }
}

// ---------------------------------------------------------------------------
// Process-wide default
// ---------------------------------------------------------------------------

static DEFAULT_ESTIMATOR: OnceLock<LoanEstimator> = OnceLock::new();

/// Estimator configured from the environment, created on first use.
pub fn default_estimator() -> &'static LoanEstimator {
    DEFAULT_ESTIMATOR.get_or_init(|| {
        let config = EstimatorConfig::from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Invalid estimator configuration; using defaults");
            EstimatorConfig::default()
        });
        LoanEstimator::new(config)
    })
}

/// Estimate with the process-wide default estimator.
pub fn estimate_loan(input: &LoanEstimateInput) -> BankingResult<ComputationOutput<LoanEstimateResult>> {
    default_estimator().estimate(input)
}
