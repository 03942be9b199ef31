//! Serialized regression artifacts for loan-amount prediction.
//!
//! Artifacts are JSON documents tagged by `kind`. Two shapes are supported:
//! a linear model (`intercept` + one coefficient per feature) and a forest of
//! binary regression trees whose leaf values are averaged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::time_value::{checked_product, checked_sum, checked_total};
use crate::BankingResult;

/// Feature order every artifact is trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "monthly_income",
    "credit_score",
    "tenure_years",
    "existing_loan_amount",
    "dependents",
];

pub const FEATURE_COUNT: usize = 6;

pub type FeatureVector = [Decimal; FEATURE_COUNT];

/// Why a candidate artifact could not be used. Never surfaced to callers of
/// the estimator; it only drives logging before the fallback kicks in.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file {path} not found")]
    Missing { path: PathBuf },

    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse model file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("incompatible model schema in {path}: {reason}")]
    Schema { path: PathBuf, reason: String },

    #[error("no usable model among {searched} candidate path(s)")]
    Unavailable { searched: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoanModel {
    Linear {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        intercept: Decimal,
        coefficients: Vec<Decimal>,
    },
    Forest {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        trees: Vec<RegressionTree>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Node 0 is the root.
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go `left` when `features[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: Decimal,
        left: usize,
        right: usize,
    },
    Leaf { value: Decimal },
}

impl LoanModel {
    /// Read and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.is_file() {
            return Err(ModelLoadError::Missing {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: LoanModel =
            serde_json::from_str(&contents).map_err(|source| ModelLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        model.validate().map_err(|reason| ModelLoadError::Schema {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LoanModel::Linear { .. } => "linear",
            LoanModel::Forest { .. } => "forest",
        }
    }

    /// Check that the artifact matches the feature layout and is well formed.
    pub fn validate(&self) -> Result<(), String> {
        let names = match self {
            LoanModel::Linear { feature_names, .. } | LoanModel::Forest { feature_names, .. } => {
                feature_names
            }
        };
        if let Some(names) = names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(format!(
                    "feature_names {names:?} do not match expected {FEATURE_NAMES:?}"
                ));
            }
        }

        match self {
            LoanModel::Linear { coefficients, .. } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(format!(
                        "expected {FEATURE_COUNT} coefficients, found {}",
                        coefficients.len()
                    ));
                }
            }
            LoanModel::Forest { trees, .. } => {
                if trees.is_empty() {
                    return Err("forest has no trees".into());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
                }
            }
        }
        Ok(())
    }

    /// Raw prediction. Features large enough to overflow the arithmetic are
    /// reported as an input error.
    pub fn predict(&self, features: &FeatureVector) -> BankingResult<Decimal> {
        match self {
            LoanModel::Linear {
                intercept,
                coefficients,
                ..
            } => coefficients
                .iter()
                .zip(features.iter())
                .try_fold(*intercept, |acc, (c, x)| {
                    checked_sum(acc, checked_product(*c, *x, "features")?, "features")
                }),
            LoanModel::Forest { trees, .. } => {
                let sum = checked_total(trees.iter().map(|t| t.predict(features)), "features")?;
                Ok(sum / Decimal::from(trees.len() as u64))
            }
        }
    }
}

impl RegressionTree {
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    return Err(format!("node {i} splits on unknown feature {feature}"));
                }
                // Children must point forward, which also rules out cycles.
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {i} has invalid child index {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, features: &FeatureVector) -> Decimal {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}
