use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::require_non_negative;
use crate::error::BankingError;
use crate::time_value::{checked_sum, percent_to_rate, round_money};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One marginal-rate slab. The lower bound is the previous slab's upper bound
/// (zero for the first slab); `upper: None` marks the open-ended top slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub upper: Option<Money>,
    pub rate_pct: Percent,
}

/// A complete tax table: standard deduction plus ordered slabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    pub standard_deduction: Money,
    pub slabs: Vec<TaxSlab>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Concessional regime: higher standard deduction, more slabs.
    #[default]
    New,
    /// Legacy regime: lower standard deduction, steeper slabs.
    Old,
    Custom(TaxTable),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    pub gross_income: Money,
    /// Deductions claimed on top of the regime's standard deduction.
    #[serde(default)]
    pub deductions: Money,
    #[serde(default)]
    pub regime: TaxRegime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlabTax {
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate_pct: Percent,
    pub taxable_amount: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxOutput {
    pub gross_income: Money,
    pub standard_deduction: Money,
    pub total_deductions: Money,
    pub taxable_income: Money,
    pub tax_owed: Money,
    pub effective_rate_pct: Percent,
    pub marginal_rate_pct: Percent,
    pub brackets: Vec<SlabTax>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxableIncomeInput {
    pub gross_income_yearly: Money,
    #[serde(default = "default_standard_deduction")]
    pub standard_deduction: Money,
    #[serde(default)]
    pub other_deductions: Money,
}

fn default_standard_deduction() -> Money {
    dec!(50_000)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxableIncomeOutput {
    pub taxable_income: Money,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn slab(upper: Option<Decimal>, rate_pct: Decimal) -> TaxSlab {
    TaxSlab { upper, rate_pct }
}

impl TaxRegime {
    pub fn table(&self) -> TaxTable {
        match self {
            TaxRegime::New => TaxTable {
                standard_deduction: dec!(75_000),
                slabs: vec![
                    slab(Some(dec!(300_000)), dec!(0)),
                    slab(Some(dec!(700_000)), dec!(5)),
                    slab(Some(dec!(1_000_000)), dec!(10)),
                    slab(Some(dec!(1_200_000)), dec!(15)),
                    slab(Some(dec!(1_500_000)), dec!(20)),
                    slab(None, dec!(30)),
                ],
            },
            TaxRegime::Old => TaxTable {
                standard_deduction: dec!(50_000),
                slabs: vec![
                    slab(Some(dec!(250_000)), dec!(0)),
                    slab(Some(dec!(500_000)), dec!(5)),
                    slab(Some(dec!(1_000_000)), dec!(20)),
                    slab(None, dec!(30)),
                ],
            },
            TaxRegime::Custom(table) => table.clone(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TaxRegime::New => "new",
            TaxRegime::Old => "old",
            TaxRegime::Custom(_) => "custom",
        }
    }
}

fn validate_table(table: &TaxTable) -> BankingResult<()> {
    require_non_negative("standard_deduction", table.standard_deduction)?;
    if table.slabs.is_empty() {
        return Err(BankingError::invalid_input("slabs", "tax table has no slabs"));
    }

    let mut lower = Decimal::ZERO;
    let last = table.slabs.len() - 1;
    for (i, s) in table.slabs.iter().enumerate() {
        if s.rate_pct < Decimal::ZERO || s.rate_pct > dec!(100) {
            return Err(BankingError::invalid_input(
                "slabs",
                format!("slab {i} rate must be within 0..=100"),
            ));
        }
        match (s.upper, i == last) {
            (None, true) => {}
            (None, false) => {
                return Err(BankingError::invalid_input(
                    "slabs",
                    "only the last slab may be open-ended",
                ))
            }
            (Some(_), true) => {
                return Err(BankingError::invalid_input(
                    "slabs",
                    "the last slab must be open-ended",
                ))
            }
            (Some(upper), false) => {
                if upper <= lower {
                    return Err(BankingError::invalid_input(
                        "slabs",
                        format!("slab {i} upper bound must exceed {lower}"),
                    ));
                }
                lower = upper;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Income tax under a marginal-rate slab table.
pub fn calculate_income_tax(
    input: &IncomeTaxInput,
) -> BankingResult<ComputationOutput<IncomeTaxOutput>> {
    let start = Instant::now();

    require_non_negative("gross_income", input.gross_income)?;
    require_non_negative("deductions", input.deductions)?;

    let table = input.regime.table();
    validate_table(&table)?;

    let total_deductions = checked_sum(table.standard_deduction, input.deductions, "deductions")?;
    let taxable = (input.gross_income - total_deductions).max(Decimal::ZERO);

    let mut brackets = Vec::with_capacity(table.slabs.len());
    let mut lower = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    let mut marginal = table.slabs[0].rate_pct;

    for s in &table.slabs {
        let ceiling = s.upper.map_or(taxable, |u| u.min(taxable));
        let amount = (ceiling - lower).max(Decimal::ZERO);
        let slab_tax = round_money(amount * percent_to_rate(s.rate_pct));
        if amount > Decimal::ZERO {
            marginal = s.rate_pct;
        }
        tax = checked_sum(tax, slab_tax, "gross_income")?;
        brackets.push(SlabTax {
            lower,
            upper: s.upper,
            rate_pct: s.rate_pct,
            taxable_amount: amount,
            tax: slab_tax,
        });
        if let Some(u) = s.upper {
            lower = u;
        }
    }

    let effective = if input.gross_income > Decimal::ZERO {
        round_money(tax / input.gross_income * dec!(100))
    } else {
        Decimal::ZERO
    };

    let output = IncomeTaxOutput {
        gross_income: round_money(input.gross_income),
        standard_deduction: table.standard_deduction,
        total_deductions: round_money(total_deductions),
        taxable_income: round_money(taxable),
        tax_owed: tax,
        effective_rate_pct: effective,
        marginal_rate_pct: marginal,
        brackets,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Income tax (marginal slab table after standard and claimed deductions)",
        &serde_json::json!({
            "regime": input.regime.label(),
            "gross_income": input.gross_income.to_string(),
            "deductions": input.deductions.to_string(),
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Taxable income after a standard deduction and other deductions, floored
/// at zero.
pub fn calculate_taxable_income(
    input: &TaxableIncomeInput,
) -> BankingResult<ComputationOutput<TaxableIncomeOutput>> {
    let start = Instant::now();

    require_non_negative("gross_income_yearly", input.gross_income_yearly)?;
    require_non_negative("standard_deduction", input.standard_deduction)?;
    require_non_negative("other_deductions", input.other_deductions)?;

    let deductions = checked_sum(
        input.standard_deduction,
        input.other_deductions,
        "other_deductions",
    )?;
    let taxable = (input.gross_income_yearly - deductions).max(Decimal::ZERO);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Taxable income (gross less deductions, floored at zero)",
        input,
        Vec::new(),
        elapsed,
        TaxableIncomeOutput {
            taxable_income: round_money(taxable),
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
