use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::BankingError;
use crate::types::{Money, Percent, Rate, Years};
use crate::BankingResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest horizon any calculator simulates or compounds over (100 years).
pub const MAX_TENURE_MONTHS: u32 = 1200;

/// Round a monetary amount to cents, half away from zero.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncate a monetary amount to cents. Used where rounding up would break a
/// ceiling (e.g. an affordability cap).
pub fn truncate_money(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// 7.5 -> 0.075
pub fn percent_to_rate(pct: Percent) -> Rate {
    pct / dec!(100)
}

/// Annual percentage to a monthly periodic rate (10% -> 0.00833..).
pub fn monthly_rate(annual_pct: Percent) -> Rate {
    annual_pct / dec!(1200)
}

/// Whole months in a tenure given in (possibly fractional) years, rounded to
/// the nearest month. At most [`MAX_TENURE_MONTHS`].
pub fn months_in(field: &str, years: Years) -> BankingResult<u32> {
    years
        .checked_mul(MONTHS_PER_YEAR)
        .map(|m| m.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|m| m.to_u32())
        .filter(|m| *m <= MAX_TENURE_MONTHS)
        .ok_or_else(|| {
            BankingError::invalid_input(
                field,
                format!("tenure must be within 0..={MAX_TENURE_MONTHS} months"),
            )
        })
}

/// Month count given directly: 1..=MAX_TENURE_MONTHS.
pub fn require_months(field: &str, months: u32) -> BankingResult<u32> {
    if months == 0 || months > MAX_TENURE_MONTHS {
        return Err(BankingError::invalid_input(
            field,
            format!("{field} must be within 1..={MAX_TENURE_MONTHS}"),
        ));
    }
    Ok(months)
}

fn out_of_range(context: &str) -> BankingError {
    BankingError::invalid_input(context, "result exceeds the supported decimal range")
}

/// Multiply two decimals, reporting overflow as an input error on `context`.
pub fn checked_product(a: Decimal, b: Decimal, context: &str) -> BankingResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(context))
}

/// Add two decimals, reporting overflow as an input error on `context`.
pub fn checked_sum(a: Decimal, b: Decimal, context: &str) -> BankingResult<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(context))
}

/// Sum a sequence, reporting overflow as an input error on `context`.
pub fn checked_total<I>(values: I, context: &str) -> BankingResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked_sum(acc, v, context))
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> BankingResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = checked_product(result, factor, "periods")?;
    }
    Ok(result)
}

/// (1 + r)^t for a possibly fractional number of periods. Integral period
/// counts go through [`compound`]; only true fractions use `powd`.
pub fn growth_factor(rate: Rate, periods: Decimal) -> BankingResult<Decimal> {
    if periods.fract().is_zero() {
        if let Some(n) = periods.to_u32() {
            return compound(rate, n);
        }
    }
    (Decimal::ONE + rate)
        .checked_powd(periods)
        .ok_or_else(|| out_of_range("periods"))
}

/// Future value of a level annuity paid at the start of each period:
/// FV = pmt * [((1+r)^n - 1) / r] * (1 + r)
pub fn fv_annuity_due(pmt: Money, rate: Rate, n: u32) -> BankingResult<Money> {
    if rate.is_zero() {
        return checked_product(pmt, Decimal::from(n), "periods");
    }
    let factor = compound(rate, n)?;
    let annuity = checked_product((factor - Decimal::ONE) / rate, Decimal::ONE + rate, "periods")?;
    checked_product(pmt, annuity, "periods")
}

/// Present value of a level annuity paid at the end of each period:
/// PV = pmt * [(1 - (1+r)^-n) / r]
pub fn pv_annuity(pmt: Money, rate: Rate, n: u32) -> BankingResult<Money> {
    if rate.is_zero() || n == 0 {
        return checked_product(pmt, Decimal::from(n), "periods");
    }
    let factor = compound(rate, n)?;
    // The annuity factor is at most n, so only the final multiply can overflow.
    let annuity = (Decimal::ONE - Decimal::ONE / factor) / rate;
    checked_product(pmt, annuity, "periods")
}

/// Level payment that amortises `principal` over `n` periods:
/// PMT = P * r * (1+r)^n / ((1+r)^n - 1)
pub fn level_payment(principal: Money, rate: Rate, n: u32) -> BankingResult<Money> {
    if n == 0 {
        return Err(BankingError::invalid_input(
            "periods",
            "Number of periods must be > 0",
        ));
    }
    let periods = Decimal::from(n);
    if rate.is_zero() {
        return Ok(principal / periods);
    }

    let factor = compound(rate, n)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Ok(principal / periods);
    }
    let scaled = checked_product(checked_product(principal, rate, "principal")?, factor, "principal")?;
    scaled
        .checked_div(denom)
        .ok_or_else(|| out_of_range("principal"))
}
