use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::BankingError;
use crate::time_value::{checked_sum, round_money};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::BankingResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetWorthInput {
    #[serde(default)]
    pub assets: BTreeMap<String, Money>,
    #[serde(default)]
    pub liabilities: BTreeMap<String, Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthOutput {
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub net_worth: Money,
}

fn total(field: &str, entries: &BTreeMap<String, Money>) -> BankingResult<Money> {
    let mut sum = Decimal::ZERO;
    for (name, value) in entries {
        if *value < Decimal::ZERO {
            return Err(BankingError::invalid_input(
                field,
                format!("'{name}' cannot be negative"),
            ));
        }
        sum = checked_sum(sum, *value, field)?;
    }
    Ok(sum)
}

/// Net worth = total assets - total liabilities.
pub fn calculate_net_worth(
    input: &NetWorthInput,
) -> BankingResult<ComputationOutput<NetWorthOutput>> {
    let start = Instant::now();

    let assets = total("assets", &input.assets)?;
    let liabilities = total("liabilities", &input.liabilities)?;

    // Round the totals first so that net worth decomposes exactly into its
    // asset and liability parts.
    let total_assets = round_money(assets);
    let total_liabilities = round_money(liabilities);
    let output = NetWorthOutput {
        total_assets,
        total_liabilities,
        net_worth: total_assets - total_liabilities,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Net worth (sum of assets less sum of liabilities)",
        &serde_json::json!({
            "asset_count": input.assets.len(),
            "liability_count": input.liabilities.len(),
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book(pairs: &[(&str, Decimal)]) -> BTreeMap<String, Decimal> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn net(assets: BTreeMap<String, Decimal>, liabilities: BTreeMap<String, Decimal>) -> Decimal {
        calculate_net_worth(&NetWorthInput {
            assets,
            liabilities,
        })
        .unwrap()
        .result
        .net_worth
    }

    #[test]
    fn test_basic_net_worth() {
        let out = calculate_net_worth(&NetWorthInput {
            assets: book(&[("house", dec!(5_000_000)), ("savings", dec!(250_000.50))]),
            liabilities: book(&[("mortgage", dec!(3_000_000)), ("card", dec!(12_000.25))]),
        })
        .unwrap()
        .result;
        assert_eq!(out.total_assets, dec!(5_250_000.50));
        assert_eq!(out.total_liabilities, dec!(3_012_000.25));
        assert_eq!(out.net_worth, dec!(2_238_000.25));
    }

    #[test]
    fn test_decomposes_into_assets_minus_liabilities() {
        let assets = book(&[("a", dec!(10.10)), ("b", dec!(0.005))]);
        let liabilities = book(&[("x", dec!(3.333)), ("y", dec!(7))]);

        let combined = net(assets.clone(), liabilities.clone());
        let only_assets = net(assets, BTreeMap::new());
        let only_liabilities = net(BTreeMap::new(), liabilities);
        // Liabilities alone give a negative net worth.
        assert_eq!(combined, only_assets + only_liabilities);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(net(BTreeMap::new(), BTreeMap::new()), Decimal::ZERO);
    }

    #[test]
    fn test_negative_entry_rejected() {
        let res = calculate_net_worth(&NetWorthInput {
            assets: book(&[("car", dec!(-1))]),
            liabilities: BTreeMap::new(),
        });
        assert!(res.is_err());
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let err = calculate_net_worth(&NetWorthInput {
            assets: book(&[("a", Decimal::MAX), ("b", dec!(1))]),
            liabilities: BTreeMap::new(),
        })
        .unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { ref field, .. } if field == "assets"));
    }
}
