use serde_json::Value;

use super::{payload, scalar};

/// The single headline number of each computation, in lookup order.
const HEADLINE_KEYS: [&str; 13] = [
    "monthly_installment",
    "maturity_value",
    "required_corpus",
    "projected_corpus",
    "eligible_loan_amount",
    "months_to_payoff",
    "remaining_balance",
    "tax_owed",
    "taxable_income",
    "savings_target",
    "unallocated_amount",
    "net_worth",
    "balance",
];

/// Print just the key answer, falling back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = payload(value);
    if let Value::Object(map) = result {
        for key in HEADLINE_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return scalar(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, scalar(val));
        }
    }
    scalar(result)
}
