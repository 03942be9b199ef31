use banking_core::calculators::{
    budget, credit_card, deposits, emi, home_loan, income_tax, net_worth, retirement,
};
use banking_core::BankingError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

// ===========================================================================
// EMI
// ===========================================================================

fn emi_input(principal: Decimal, rate: Decimal, months: u32) -> emi::EmiInput {
    emi::EmiInput {
        principal,
        annual_rate_pct: rate,
        tenure_months: months,
        include_schedule: false,
    }
}

#[test]
fn test_emi_standard_amortization() {
    let out = emi::calculate_emi(&emi_input(dec!(100_000), dec!(10), 12))
        .unwrap()
        .result;
    assert_eq!(out.monthly_installment, dec!(8791.59));
    assert_eq!(out.total_interest, dec!(5499.08));
    assert_eq!(out.total_payment, dec!(8791.59) * dec!(12));
}

#[test]
fn test_emi_total_payment_never_below_principal() {
    for principal in [dec!(1), dec!(100), dec!(99_999.99), dec!(2_500_000)] {
        for rate in [dec!(0), dec!(0.5), dec!(7.25), dec!(18), dec!(36)] {
            for months in [1, 3, 7, 60, 360] {
                let out = emi::calculate_emi(&emi_input(principal, rate, months))
                    .unwrap()
                    .result;
                assert!(
                    out.total_payment >= principal,
                    "principal {principal} rate {rate} months {months}: paid {}",
                    out.total_payment
                );
            }
        }
    }
}

#[test]
fn test_emi_schedule_interest_matches_total() {
    let mut input = emi_input(dec!(500_000), dec!(8.5), 240);
    input.include_schedule = true;
    let out = emi::calculate_emi(&input).unwrap().result;
    let schedule = out.schedule.unwrap();

    assert_eq!(schedule.len(), 240);
    assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);
    let (last, level) = schedule.split_last().unwrap();
    assert!(level.iter().all(|r| r.installment == out.monthly_installment));

    // The schedule differs from the quoted totals only by the final
    // installment's rounding adjustment.
    let interest: Decimal = schedule.iter().map(|r| r.interest).sum();
    assert_eq!(
        interest,
        out.total_interest - (out.monthly_installment - last.installment)
    );
    let paid: Decimal = schedule.iter().map(|r| r.installment).sum();
    assert_eq!(paid - interest, dec!(500_000));
}

#[test]
fn test_emi_tenure_is_bounded() {
    let mut input = emi_input(dec!(10_000), dec!(0), u32::MAX);
    input.include_schedule = true;
    let err = emi::calculate_emi(&input).unwrap_err();
    assert!(matches!(err, BankingError::InvalidInput { ref field, .. } if field == "tenure_months"));
}

#[test]
fn test_emi_rejects_bad_input() {
    let err = emi::calculate_emi(&emi_input(dec!(0), dec!(10), 12)).unwrap_err();
    assert!(matches!(err, BankingError::InvalidInput { .. }));
    let err = emi::calculate_emi(&emi_input(dec!(1000), dec!(-1), 12)).unwrap_err();
    assert!(matches!(err, BankingError::InvalidInput { .. }));
    let err = emi::calculate_emi(&emi_input(dec!(1000), dec!(10), 0)).unwrap_err();
    assert!(matches!(err, BankingError::InvalidInput { .. }));
}

// ===========================================================================
// Deposits
// ===========================================================================

fn fd_maturity(rate: Decimal, years: Decimal) -> Decimal {
    deposits::calculate_fd(&deposits::FdInput {
        principal: dec!(25_000),
        annual_rate_pct: rate,
        tenure_years: years,
        compounding_frequency: 4,
    })
    .unwrap()
    .result
    .maturity_value
}

fn rd_maturity(rate: Decimal, months: u32) -> Decimal {
    deposits::calculate_rd(&deposits::RdInput {
        monthly_deposit: dec!(2_000),
        annual_rate_pct: rate,
        tenure_months: months,
    })
    .unwrap()
    .result
    .maturity_value
}

#[test]
fn test_fd_monotone_in_rate_and_tenure() {
    let rates = [dec!(1), dec!(4), dec!(6.5), dec!(9)];
    for pair in rates.windows(2) {
        assert!(fd_maturity(pair[0], dec!(5)) < fd_maturity(pair[1], dec!(5)));
    }
    let tenures = [dec!(0.5), dec!(1), dec!(2.5), dec!(10)];
    for pair in tenures.windows(2) {
        assert!(fd_maturity(dec!(7), pair[0]) < fd_maturity(dec!(7), pair[1]));
    }
}

#[test]
fn test_rd_monotone_in_rate_and_tenure() {
    let rates = [dec!(0), dec!(3), dec!(7.1), dec!(12)];
    for pair in rates.windows(2) {
        assert!(rd_maturity(pair[0], 24) < rd_maturity(pair[1], 24));
    }
    for pair in [6u32, 12, 36, 120].windows(2) {
        assert!(rd_maturity(dec!(6), pair[0]) < rd_maturity(dec!(6), pair[1]));
    }
}

#[test]
fn test_sip_returns_split() {
    let out = deposits::calculate_sip(&deposits::SipInput {
        monthly_investment: dec!(5_000),
        annual_rate_pct: dec!(12),
        tenure_years: dec!(10),
    })
    .unwrap()
    .result;
    assert_eq!(out.months, 120);
    assert_eq!(out.invested_amount, dec!(600_000));
    assert_eq!(
        out.maturity_value,
        out.invested_amount + out.estimated_returns
    );
    assert!(out.estimated_returns > Decimal::ZERO);
}

// ===========================================================================
// Retirement
// ===========================================================================

#[test]
fn test_retirement_corpus_grows_with_inflation() {
    let base = retirement::RetirementCorpusInput {
        current_age: 30,
        retirement_age: 60,
        life_expectancy: 85,
        monthly_expense: dec!(40_000),
        inflation_pct: dec!(5),
        expected_return_pct: dec!(8),
    };
    let low = retirement::calculate_retirement_corpus(&base).unwrap().result;
    let high = retirement::calculate_retirement_corpus(&retirement::RetirementCorpusInput {
        inflation_pct: dec!(6),
        ..base.clone()
    })
    .unwrap()
    .result;

    assert_eq!(low.years_to_retirement, 30);
    assert_eq!(low.years_in_retirement, 25);
    assert!(high.monthly_expense_at_retirement > low.monthly_expense_at_retirement);
    assert!(high.required_corpus > low.required_corpus);
}

#[test]
fn test_retirement_age_order_enforced() {
    let res = retirement::calculate_retirement_corpus(&retirement::RetirementCorpusInput {
        current_age: 60,
        retirement_age: 55,
        life_expectancy: 85,
        monthly_expense: dec!(10_000),
        inflation_pct: dec!(5),
        expected_return_pct: dec!(8),
    });
    assert!(matches!(res, Err(BankingError::InvalidInput { .. })));
}

#[test]
fn test_retirement_savings_projection_parts_add_up() {
    let out = retirement::project_retirement_savings(&retirement::RetirementSavingsInput {
        current_savings: dec!(200_000),
        monthly_addition: dec!(10_000),
        annual_return_pct: dec!(9),
        years_to_retirement: dec!(20),
    })
    .unwrap()
    .result;
    assert_eq!(out.months, 240);
    assert_eq!(out.total_contributions, dec!(2_600_000));
    assert_eq!(
        out.projected_corpus,
        out.future_value_of_savings + out.future_value_of_additions
    );
}

// ===========================================================================
// Home loan
// ===========================================================================

#[test]
fn test_home_loan_emi_fits_allowance() {
    let out = home_loan::calculate_home_loan_eligibility(&home_loan::HomeLoanEligibilityInput {
        monthly_income: dec!(120_000),
        existing_emi: dec!(15_000),
        tenure_years: dec!(20),
        interest_rate_pct: dec!(8.75),
        max_emi_ratio: dec!(0.5),
        monthly_expenses: None,
    })
    .unwrap()
    .result;

    assert_eq!(out.max_emi_allowed, dec!(60_000));
    assert_eq!(out.available_emi, dec!(45_000));
    assert_eq!(out.tenure_months, 240);

    let check = emi::calculate_emi(&emi_input(out.eligible_loan_amount, dec!(8.75), 240))
        .unwrap()
        .result;
    assert!(check.monthly_installment <= out.available_emi);
}

#[test]
fn test_home_loan_existing_emi_exhausts_allowance() {
    let out = home_loan::calculate_home_loan_eligibility(&home_loan::HomeLoanEligibilityInput {
        monthly_income: dec!(50_000),
        existing_emi: dec!(30_000),
        tenure_years: dec!(15),
        interest_rate_pct: dec!(9),
        max_emi_ratio: dec!(0.5),
        monthly_expenses: None,
    })
    .unwrap()
    .result;
    assert_eq!(out.eligible_loan_amount, Decimal::ZERO);
}

// ===========================================================================
// Credit card
// ===========================================================================

#[test]
fn test_card_payoff_final_payment_is_partial() {
    let out = credit_card::calculate_card_payoff(&credit_card::CardPayoffInput {
        balance: dec!(50_000),
        annual_rate_pct: dec!(36),
        monthly_payment: dec!(5_000),
    })
    .unwrap()
    .result;
    assert!(out.months_to_payoff > 10);
    assert!(out.final_payment <= dec!(5_000));
    assert_eq!(out.total_paid, dec!(50_000) + out.total_interest);
}

#[test]
fn test_card_payoff_payment_too_small() {
    let res = credit_card::calculate_card_payoff(&credit_card::CardPayoffInput {
        balance: dec!(100_000),
        annual_rate_pct: dec!(42),
        monthly_payment: dec!(3_000),
    });
    assert!(matches!(res, Err(BankingError::NonConverging { .. })));
}

#[test]
fn test_minimum_payments_leave_balance() {
    let out = credit_card::project_minimum_payments(&credit_card::MinimumPaymentInput {
        current_balance: dec!(20_000),
        monthly_interest_pct: dec!(3),
        minimum_payment_pct: dec!(5),
        months: 12,
    })
    .unwrap()
    .result;
    assert!(out.remaining_balance > Decimal::ZERO);
    assert!(out.remaining_balance < dec!(20_000));
    assert!(out.total_interest > Decimal::ZERO);
}

// ===========================================================================
// Tax
// ===========================================================================

#[test]
fn test_income_tax_monotone_in_gross() {
    for regime in [income_tax::TaxRegime::New, income_tax::TaxRegime::Old] {
        let mut previous = Decimal::ZERO;
        let mut gross = Decimal::ZERO;
        while gross <= dec!(3_000_000) {
            let out = income_tax::calculate_income_tax(&income_tax::IncomeTaxInput {
                gross_income: gross,
                deductions: Decimal::ZERO,
                regime: regime.clone(),
            })
            .unwrap()
            .result;
            assert!(out.tax_owed >= previous, "tax fell at gross {gross}");
            previous = out.tax_owed;
            gross += dec!(50_000);
        }
    }
}

#[test]
fn test_income_tax_brackets_sum_to_total() {
    let out = income_tax::calculate_income_tax(&income_tax::IncomeTaxInput {
        gross_income: dec!(1_875_000),
        deductions: Decimal::ZERO,
        regime: income_tax::TaxRegime::New,
    })
    .unwrap()
    .result;
    // 1_875_000 - 75_000 standard deduction
    assert_eq!(out.taxable_income, dec!(1_800_000));
    let bracket_total: Decimal = out.brackets.iter().map(|b| b.tax).sum();
    assert_eq!(bracket_total, out.tax_owed);
    assert_eq!(out.marginal_rate_pct, dec!(30));
}

#[test]
fn test_taxable_income_floors_at_zero() {
    let out = income_tax::calculate_taxable_income(&income_tax::TaxableIncomeInput {
        gross_income_yearly: dec!(40_000),
        standard_deduction: dec!(50_000),
        other_deductions: Decimal::ZERO,
    })
    .unwrap()
    .result;
    assert_eq!(out.taxable_income, Decimal::ZERO);
}

// ===========================================================================
// Budget and net worth
// ===========================================================================

#[test]
fn test_budget_rejects_over_allocation() {
    let mut allocations = BTreeMap::new();
    allocations.insert("needs".to_string(), dec!(50));
    allocations.insert("wants".to_string(), dec!(30));
    allocations.insert("savings".to_string(), dec!(20.01));
    let res = budget::plan_budget(&budget::BudgetPlanInput {
        monthly_income: dec!(80_000),
        allocations,
    });
    assert!(matches!(res, Err(BankingError::InvalidInput { .. })));
}

#[test]
fn test_savings_advice_tiers() {
    let pct = |expenses: Decimal| {
        budget::recommend_savings(&budget::SavingsAdviceInput {
            monthly_income: dec!(100_000),
            monthly_expenses: expenses,
        })
        .unwrap()
        .result
        .recommended_savings_pct
    };
    assert_eq!(pct(dec!(70_000)), dec!(20));
    assert_eq!(pct(dec!(70_001)), dec!(10));
    assert_eq!(pct(dec!(90_000)), dec!(10));
    assert_eq!(pct(dec!(95_000)), dec!(0));
}

#[test]
fn test_net_worth_from_json() {
    let input: net_worth::NetWorthInput = serde_json::from_str(
        r#"{"assets": {"cash": "1500.75", "car": "300000"}, "liabilities": {"car_loan": "120000"}}"#,
    )
    .unwrap();
    let out = net_worth::calculate_net_worth(&input).unwrap().result;
    assert_eq!(out.net_worth, dec!(181_500.75));
}
