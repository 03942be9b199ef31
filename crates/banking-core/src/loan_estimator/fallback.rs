//! Deterministic loan estimate used when no trained model is available.
//!
//! eligible = min(income_multiplier * monthly_income * tenure_years,
//!                credit_score_cap(credit_score)) - existing_loan_amount
//!
//! clamped at zero. The coefficients are configuration, not derived values;
//! the defaults below are the ones the service ships with. With them, a
//! one-year tenure gives 60% of annual income (`monthly_income * 12 * 0.6`).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::LoanEstimateInput;
use crate::error::BankingError;
use crate::time_value::checked_product;
use crate::types::Money;
use crate::BankingResult;

/// Upper bound on the loan for credit scores at or above `min_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreBand {
    pub min_score: u32,
    pub max_loan: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackCoefficients {
    /// Loan amount per unit of monthly income for each year of tenure.
    /// 7.2 = 60% of annual income per year.
    #[serde(default = "default_income_multiplier")]
    pub income_multiplier: Decimal,
    /// Bands sorted by ascending `min_score`; the first band must start at or
    /// below the lowest valid score (300).
    #[serde(default = "default_credit_score_bands")]
    pub credit_score_bands: Vec<CreditScoreBand>,
}

fn default_income_multiplier() -> Decimal {
    dec!(7.2)
}

fn default_credit_score_bands() -> Vec<CreditScoreBand> {
    vec![
        CreditScoreBand {
            min_score: 300,
            max_loan: dec!(500_000),
        },
        CreditScoreBand {
            min_score: 550,
            max_loan: dec!(1_500_000),
        },
        CreditScoreBand {
            min_score: 650,
            max_loan: dec!(3_000_000),
        },
        CreditScoreBand {
            min_score: 750,
            max_loan: dec!(5_000_000),
        },
    ]
}

impl Default for FallbackCoefficients {
    fn default() -> Self {
        Self {
            income_multiplier: default_income_multiplier(),
            credit_score_bands: default_credit_score_bands(),
        }
    }
}

impl FallbackCoefficients {
    pub fn validate(&self) -> BankingResult<()> {
        if self.income_multiplier < Decimal::ZERO {
            return Err(BankingError::invalid_input(
                "income_multiplier",
                "income_multiplier cannot be negative",
            ));
        }
        let Some(first) = self.credit_score_bands.first() else {
            return Err(BankingError::invalid_input(
                "credit_score_bands",
                "at least one credit score band is required",
            ));
        };
        if first.min_score > super::MIN_CREDIT_SCORE {
            return Err(BankingError::invalid_input(
                "credit_score_bands",
                format!("first band must start at or below {}", super::MIN_CREDIT_SCORE),
            ));
        }
        for pair in self.credit_score_bands.windows(2) {
            if pair[1].min_score <= pair[0].min_score {
                return Err(BankingError::invalid_input(
                    "credit_score_bands",
                    "bands must be sorted by strictly ascending min_score",
                ));
            }
        }
        if self.credit_score_bands.iter().any(|b| b.max_loan < Decimal::ZERO) {
            return Err(BankingError::invalid_input(
                "credit_score_bands",
                "max_loan cannot be negative",
            ));
        }
        Ok(())
    }

    /// Loan ceiling implied by the credit score.
    pub fn credit_score_cap(&self, credit_score: u32) -> Money {
        self.credit_score_bands
            .iter()
            .rev()
            .find(|b| credit_score >= b.min_score)
            .map_or(Decimal::ZERO, |b| b.max_loan)
    }

    /// Income-based capacity before the credit-score cap.
    pub fn income_capacity(&self, input: &LoanEstimateInput) -> BankingResult<Money> {
        let per_year = checked_product(self.income_multiplier, input.monthly_income, "monthly_income")?;
        checked_product(per_year, Decimal::from(input.tenure_years), "monthly_income")
    }

    pub fn estimate(&self, input: &LoanEstimateInput) -> BankingResult<Money> {
        let capacity = self
            .income_capacity(input)?
            .min(self.credit_score_cap(input.credit_score));
        Ok((capacity - input.existing_loan_amount).max(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(income: Decimal, score: u32, tenure: u32, existing: Decimal) -> LoanEstimateInput {
        LoanEstimateInput {
            age: 35,
            monthly_income: income,
            credit_score: score,
            tenure_years: tenure,
            existing_loan_amount: existing,
            dependents: 1,
        }
    }

    #[test]
    fn test_one_year_is_sixty_percent_of_annual_income() {
        let c = FallbackCoefficients::default();
        // 50_000 * 12 * 0.6
        assert_eq!(
            c.estimate(&input(dec!(50_000), 780, 1, Decimal::ZERO)).unwrap(),
            dec!(360_000)
        );
    }

    #[test]
    fn test_income_bound() {
        let c = FallbackCoefficients::default();
        // 7.2 * 50_000 * 10 = 3_600_000, below the 750+ cap
        assert_eq!(
            c.estimate(&input(dec!(50_000), 780, 10, Decimal::ZERO)).unwrap(),
            dec!(3_600_000)
        );
    }

    #[test]
    fn test_credit_score_bound() {
        let c = FallbackCoefficients::default();
        // income capacity 7.2 * 200_000 * 20 = 28_800_000, capped at 1_500_000
        assert_eq!(
            c.estimate(&input(dec!(200_000), 600, 20, Decimal::ZERO)).unwrap(),
            dec!(1_500_000)
        );
    }

    #[test]
    fn test_existing_loans_reduce_and_clamp() {
        let c = FallbackCoefficients::default();
        // 7.2 * 20_000 * 2 = 288_000
        assert_eq!(
            c.estimate(&input(dec!(20_000), 780, 2, dec!(100_000))).unwrap(),
            dec!(188_000)
        );
        assert_eq!(
            c.estimate(&input(dec!(20_000), 780, 2, dec!(300_000))).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_huge_income_is_invalid_input() {
        let c = FallbackCoefficients::default();
        let err = c
            .estimate(&input(Decimal::MAX, 780, 40, Decimal::ZERO))
            .unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { ref field, .. } if field == "monthly_income"));
    }

    #[test]
    fn test_band_edges() {
        let c = FallbackCoefficients::default();
        assert_eq!(c.credit_score_cap(300), dec!(500_000));
        assert_eq!(c.credit_score_cap(549), dec!(500_000));
        assert_eq!(c.credit_score_cap(550), dec!(1_500_000));
        assert_eq!(c.credit_score_cap(900), dec!(5_000_000));
    }

    #[test]
    fn test_unsorted_bands_rejected() {
        let c = FallbackCoefficients {
            income_multiplier: dec!(7.2),
            credit_score_bands: vec![
                CreditScoreBand {
                    min_score: 300,
                    max_loan: dec!(1),
                },
                CreditScoreBand {
                    min_score: 300,
                    max_loan: dec!(2),
                },
            ],
        };
        assert!(c.validate().is_err());
        assert!(FallbackCoefficients::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: FallbackCoefficients = serde_json::from_str(r#"{"income_multiplier": "0.5"}"#).unwrap();
        assert_eq!(c.income_multiplier, dec!(0.5));
        assert_eq!(c.credit_score_bands.len(), 4);
    }
}
