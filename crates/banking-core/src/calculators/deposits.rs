use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{require_non_negative, require_positive};
use crate::error::BankingError;
use crate::time_value::{
    checked_product, checked_sum, fv_annuity_due, growth_factor, monthly_rate, months_in,
    percent_to_rate, require_months, round_money,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::BankingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Systematic investment plan: a fixed amount invested every month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_investment: Money,
    pub annual_rate_pct: Percent,
    pub tenure_years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipOutput {
    pub months: u32,
    pub invested_amount: Money,
    pub estimated_returns: Money,
    pub maturity_value: Money,
}

/// Lump-sum fixed deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub tenure_years: Years,
    /// Compounding periods per year (1 = yearly, 4 = quarterly, 12 = monthly).
    #[serde(default = "default_compounding_frequency")]
    pub compounding_frequency: u32,
}

fn default_compounding_frequency() -> u32 {
    1
}

/// Daily compounding.
const MAX_COMPOUNDING_FREQUENCY: u32 = 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdOutput {
    pub maturity_value: Money,
    pub interest_earned: Money,
}

/// Recurring deposit: a fixed amount deposited at the start of every month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdInput {
    pub monthly_deposit: Money,
    pub annual_rate_pct: Percent,
    pub tenure_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdOutput {
    pub total_deposited: Money,
    pub interest_earned: Money,
    pub maturity_value: Money,
}

// ---------------------------------------------------------------------------
// SIP
// ---------------------------------------------------------------------------

/// Future value of monthly contributions, each invested at the start of the
/// month and compounded monthly until maturity.
pub fn calculate_sip(input: &SipInput) -> BankingResult<ComputationOutput<SipOutput>> {
    let start = Instant::now();

    require_non_negative("monthly_investment", input.monthly_investment)?;
    require_positive("tenure_years", input.tenure_years)?;
    require_non_negative("annual_rate_pct", input.annual_rate_pct)?;

    let n = months_in("tenure_years", input.tenure_years)?;
    if n == 0 {
        return Err(BankingError::invalid_input(
            "tenure_years",
            "tenure must cover at least one month",
        ));
    }

    let rate = monthly_rate(input.annual_rate_pct);
    let maturity = round_money(fv_annuity_due(input.monthly_investment, rate, n)?);
    let invested = round_money(checked_product(
        input.monthly_investment,
        Decimal::from(n),
        "monthly_investment",
    )?);

    let output = SipOutput {
        months: n,
        invested_amount: invested,
        estimated_returns: maturity - invested,
        maturity_value: maturity,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP future value (annuity-due, monthly compounding)",
        &serde_json::json!({
            "monthly_investment": input.monthly_investment.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "months": n,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// FD
// ---------------------------------------------------------------------------

/// Maturity value of a fixed deposit: P * (1 + r/f)^(f*t).
pub fn calculate_fd(input: &FdInput) -> BankingResult<ComputationOutput<FdOutput>> {
    let start = Instant::now();

    require_positive("principal", input.principal)?;
    require_positive("tenure_years", input.tenure_years)?;
    require_non_negative("annual_rate_pct", input.annual_rate_pct)?;
    if !(1..=MAX_COMPOUNDING_FREQUENCY).contains(&input.compounding_frequency) {
        return Err(BankingError::invalid_input(
            "compounding_frequency",
            format!("compounding_frequency must be within 1..={MAX_COMPOUNDING_FREQUENCY}"),
        ));
    }
    // Same horizon limit as the monthly calculators.
    months_in("tenure_years", input.tenure_years)?;

    let freq = Decimal::from(input.compounding_frequency);
    let periodic_rate = percent_to_rate(input.annual_rate_pct) / freq;
    let factor = growth_factor(periodic_rate, freq * input.tenure_years)?;
    let maturity = round_money(checked_product(input.principal, factor, "principal")?);

    let output = FdOutput {
        maturity_value: maturity,
        interest_earned: maturity - round_money(input.principal),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed deposit maturity (periodic compounding)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure_years": input.tenure_years.to_string(),
            "compounding_frequency": input.compounding_frequency,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// RD
// ---------------------------------------------------------------------------

/// Maturity of a recurring deposit. Deposit k (1-based) earns interest for
/// the remaining n - k + 1 months.
pub fn calculate_rd(input: &RdInput) -> BankingResult<ComputationOutput<RdOutput>> {
    let start = Instant::now();

    require_non_negative("monthly_deposit", input.monthly_deposit)?;
    require_non_negative("annual_rate_pct", input.annual_rate_pct)?;
    let n = require_months("tenure_months", input.tenure_months)?;
    let rate = monthly_rate(input.annual_rate_pct);

    // The last deposit grows for one month, the first for all n months.
    let step = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    let mut maturity = Decimal::ZERO;
    for _ in 0..n {
        factor = checked_product(factor, step, "tenure_months")?;
        let grown = checked_product(input.monthly_deposit, factor, "monthly_deposit")?;
        maturity = checked_sum(maturity, grown, "monthly_deposit")?;
    }

    let maturity = round_money(maturity);
    let deposited = round_money(checked_product(
        input.monthly_deposit,
        Decimal::from(n),
        "monthly_deposit",
    )?);

    let output = RdOutput {
        total_deposited: deposited,
        interest_earned: maturity - deposited,
        maturity_value: maturity,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Recurring deposit maturity (sum of monthly deposits, monthly compounding)",
        &serde_json::json!({
            "monthly_deposit": input.monthly_deposit.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure_months": n,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fd(principal: Decimal, rate: Decimal, years: Decimal, freq: u32) -> FdOutput {
        calculate_fd(&FdInput {
            principal,
            annual_rate_pct: rate,
            tenure_years: years,
            compounding_frequency: freq,
        })
        .unwrap()
        .result
    }

    fn rd(deposit: Decimal, rate: Decimal, months: u32) -> RdOutput {
        calculate_rd(&RdInput {
            monthly_deposit: deposit,
            annual_rate_pct: rate,
            tenure_months: months,
        })
        .unwrap()
        .result
    }

    #[test]
    fn test_sip_zero_rate_is_sum_of_contributions() {
        let out = calculate_sip(&SipInput {
            monthly_investment: dec!(5000),
            annual_rate_pct: Decimal::ZERO,
            tenure_years: dec!(2),
        })
        .unwrap();
        assert_eq!(out.result.months, 24);
        assert_eq!(out.result.maturity_value, dec!(120_000));
        assert_eq!(out.result.estimated_returns, Decimal::ZERO);
    }

    #[test]
    fn test_sip_one_year_twelve_percent() {
        // 1000 * ((1.01^12 - 1) / 0.01) * 1.01 = 12809.33
        let out = calculate_sip(&SipInput {
            monthly_investment: dec!(1000),
            annual_rate_pct: dec!(12),
            tenure_years: dec!(1),
        })
        .unwrap();
        assert_eq!(out.result.maturity_value, dec!(12809.33));
        assert_eq!(out.result.invested_amount, dec!(12000));
    }

    #[test]
    fn test_sip_rejects_sub_month_tenure() {
        let err = calculate_sip(&SipInput {
            monthly_investment: dec!(1000),
            annual_rate_pct: dec!(12),
            tenure_years: dec!(0.01),
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_fd_yearly_compounding() {
        // 10_000 * 1.1^2 = 12_100
        let out = fd(dec!(10_000), dec!(10), dec!(2), 1);
        assert_eq!(out.maturity_value, dec!(12_100));
        assert_eq!(out.interest_earned, dec!(2_100));
    }

    #[test]
    fn test_fd_quarterly_beats_yearly() {
        let yearly = fd(dec!(10_000), dec!(8), dec!(3), 1);
        let quarterly = fd(dec!(10_000), dec!(8), dec!(3), 4);
        assert!(quarterly.maturity_value > yearly.maturity_value);
    }

    #[test]
    fn test_fd_fractional_tenure() {
        // Half a year of yearly compounding at 21%: 100 * 1.21^0.5 = 110
        let out = fd(dec!(100), dec!(21), dec!(0.5), 1);
        assert_eq!(out.maturity_value, dec!(110));
    }

    #[test]
    fn test_fd_monotonic_in_rate_and_tenure() {
        let mut last = Decimal::ZERO;
        for rate in [dec!(0), dec!(2), dec!(4.5), dec!(7), dec!(9.25)] {
            let m = fd(dec!(50_000), rate, dec!(5), 4).maturity_value;
            assert!(m > last || (rate.is_zero() && m == dec!(50_000)));
            last = m;
        }
        let mut last = Decimal::ZERO;
        for years in [dec!(1), dec!(2), dec!(3.5), dec!(10)] {
            let m = fd(dec!(50_000), dec!(6), years, 12).maturity_value;
            assert!(m > last);
            last = m;
        }
    }

    #[test]
    fn test_fd_validation() {
        let bad = FdInput {
            principal: dec!(1000),
            annual_rate_pct: dec!(5),
            tenure_years: dec!(1),
            compounding_frequency: 0,
        };
        assert!(calculate_fd(&bad).is_err());
    }

    #[test]
    fn test_rd_matches_annuity_due() {
        // 100 deposited for 2 months at 12% p.a.: 100*1.01^2 + 100*1.01 = 203.01
        let out = rd(dec!(100), dec!(12), 2);
        assert_eq!(out.maturity_value, dec!(203.01));
        assert_eq!(out.total_deposited, dec!(200));
        assert_eq!(out.interest_earned, dec!(3.01));
    }

    #[test]
    fn test_rd_monotonic_in_rate_and_tenure() {
        let mut last = Decimal::ZERO;
        for rate in [dec!(1), dec!(3), dec!(6.5), dec!(8)] {
            let m = rd(dec!(2_000), rate, 24).maturity_value;
            assert!(m > last);
            last = m;
        }
        let mut last = Decimal::ZERO;
        for months in [1, 6, 12, 60, 120] {
            let m = rd(dec!(2_000), dec!(7), months).maturity_value;
            assert!(m > last);
            last = m;
        }
    }

    #[test]
    fn test_rd_zero_tenure_rejected() {
        assert!(calculate_rd(&RdInput {
            monthly_deposit: dec!(100),
            annual_rate_pct: dec!(5),
            tenure_months: 0,
        })
        .is_err());
    }

    #[test]
    fn test_rd_tenure_above_cap_rejected() {
        let err = calculate_rd(&RdInput {
            monthly_deposit: dec!(100),
            annual_rate_pct: Decimal::ZERO,
            tenure_months: u32::MAX,
        })
        .unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { ref field, .. } if field == "tenure_months"));
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let err = calculate_rd(&RdInput {
            monthly_deposit: Decimal::MAX,
            annual_rate_pct: dec!(12),
            tenure_months: 24,
        })
        .unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { .. }));

        let err = calculate_sip(&SipInput {
            monthly_investment: Decimal::MAX,
            annual_rate_pct: Decimal::ZERO,
            tenure_years: dec!(2),
        })
        .unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { .. }));
    }

    #[test]
    fn test_fd_compounding_horizon_is_bounded() {
        let mut inp = FdInput {
            principal: dec!(1000),
            annual_rate_pct: Decimal::ZERO,
            tenure_years: dec!(1),
            compounding_frequency: u32::MAX,
        };
        assert!(calculate_fd(&inp).is_err());
        inp.compounding_frequency = 365;
        assert!(calculate_fd(&inp).is_ok());
        inp.tenure_years = dec!(1_000_000);
        assert!(calculate_fd(&inp).is_err());
    }
}
