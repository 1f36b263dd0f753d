//! One full computation run.
//!
//! ```text
//! records ─► intake ─► BalanceCalculator ─► balances
//!               │
//!               └─► ExpenseSettler (per expense) ─► byExpense ─► SettlementAggregator ─► summary
//! ```
//!
//! Invalid records are skipped and reported; they never abort the run. An
//! expense that would push a running balance out of range is rejected the
//! same way and leaves the table untouched.

use std::collections::BTreeMap;

use evensplit_ledger::{BalanceCalculator, ExpenseValidator, Intake, Roster, admit};
use evensplit_types::{
    Balances, CalculationInput, CalculationResults, ComputationWarning, Expense, ParticipantId,
    Rejection, Result, SettlementConfig,
};

use crate::{ConservationCheck, ExpenseSettler, SettlementAggregator};

/// Run intake, balances, per-expense settlement and aggregation over a raw
/// input document.
///
/// # Errors
/// Only an invalid `config` fails the run. Bad expense records end up in
/// [`CalculationResults::rejected`].
pub fn compute_results(input: CalculationInput, config: &SettlementConfig) -> Result<CalculationResults> {
    config.validate()?;
    let intake = admit(input.participants, input.expenses, config);
    Ok(settle_intake(intake, config))
}

/// Same as [`compute_results`] for expenses that are already constructed.
///
/// They still go through roster, duplicate-id and contribution checks.
///
/// # Errors
/// Only an invalid `config` fails the run.
pub fn compute_for_expenses(
    participants: impl IntoIterator<Item = ParticipantId>,
    expenses: impl IntoIterator<Item = Expense>,
    config: &SettlementConfig,
) -> Result<CalculationResults> {
    config.validate()?;
    let roster = Roster::new(participants);
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    {
        let mut validator = ExpenseValidator::new(&roster, config);
        for expense in expenses {
            match validator.validate(&expense) {
                Ok(()) => accepted.push(expense),
                Err(err) => {
                    tracing::warn!(expense = %expense.id(), code = err.code(), error = %err, "Expense rejected");
                    rejected.push(Rejection::new(expense.id().clone(), &err));
                }
            }
        }
    }

    let warnings = roster.warnings();
    Ok(settle_intake(
        Intake {
            roster,
            expenses: accepted,
            rejected,
            warnings,
        },
        config,
    ))
}

fn settle_intake(intake: Intake, config: &SettlementConfig) -> CalculationResults {
    let Intake {
        roster,
        expenses: admitted,
        mut rejected,
        mut warnings,
    } = intake;

    let mut balances = Balances::zeroed(roster.participants());
    let mut expenses = Vec::with_capacity(admitted.len());
    for expense in admitted {
        match BalanceCalculator::apply(&mut balances, &expense) {
            Ok(()) => expenses.push(expense),
            Err(err) => {
                tracing::warn!(expense = %expense.id(), code = err.code(), error = %err, "Expense rejected");
                rejected.push(Rejection::new(expense.id().clone(), &err));
            }
        }
    }

    let settler = ExpenseSettler::new(config);
    let check = ConservationCheck::new(config.tolerance);
    let mut by_expense = BTreeMap::new();
    for expense in &expenses {
        match settler.settle(expense) {
            Ok(settlement) => {
                debug_assert!(
                    check
                        .verify_settled_total(&BalanceCalculator::expense_deltas(expense), &settlement)
                        .is_ok()
                );
                by_expense.insert(expense.id().clone(), settlement);
            }
            Err(warning) => {
                tracing::warn!(expense = %expense.id(), %warning, "Expense left unsettled");
                warnings.push(warning);
            }
        }
    }

    let transactions = SettlementAggregator::breakdown(by_expense);

    let balanced = match check.verify_zero_sum(&balances) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Global balances do not net to zero");
            warnings.push(ComputationWarning::GlobalImbalance {
                residual: balances.total(),
            });
            false
        }
    };

    let net_settlement = config
        .include_net_settlement
        .then(|| settler.settle_balances(&balances));

    tracing::info!(
        participants = roster.len(),
        accepted = expenses.len(),
        rejected = rejected.len(),
        warnings = warnings.len(),
        transfers = transactions.summary.len(),
        total = %transactions.summary.total(),
        "Settlement computed"
    );

    let results = CalculationResults {
        balances,
        transactions,
        rejected,
        warnings,
        net_settlement,
    };

    let Some(scale) = config.result_scale else {
        return results;
    };
    let mut rounded = results.rounded(scale);
    debug_assert!(check.verify_summary(&rounded.transactions).is_ok());
    if balanced {
        if let Err(err) = check.verify_zero_sum(&rounded.balances) {
            tracing::warn!(error = %err, scale, "Rounded balances do not net to zero");
            let residual = rounded.balances.total();
            rounded
                .warnings
                .push(ComputationWarning::GlobalImbalance { residual });
        }
    }
    rounded
}

#[cfg(test)]
mod tests {
    use evensplit_types::{EvensplitError, ExpenseId};
    use rust_decimal::Decimal;

    use super::*;

    fn people(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().copied().map(ParticipantId::from).collect()
    }

    #[test]
    fn even_split_scenario() {
        let results = compute_for_expenses(
            people(&["A", "B", "C"]),
            [Expense::dummy_even("e1", "A", 90, &["A", "B", "C"])],
            &SettlementConfig::default(),
        )
        .unwrap();

        assert_eq!(results.balances.get("A"), Decimal::new(60, 0));
        assert_eq!(results.balances.get("B"), Decimal::new(-30, 0));
        assert_eq!(results.balances.get("C"), Decimal::new(-30, 0));

        let e1 = &results.transactions.by_expense[&ExpenseId::from("e1")];
        assert_eq!(e1.amount("B", "A"), Decimal::new(30, 0));
        assert_eq!(e1.amount("C", "A"), Decimal::new(30, 0));
        assert_eq!(results.transactions.summary, *e1);
        assert!(results.is_clean());
        assert!(results.net_settlement.is_none());
    }

    #[test]
    fn participant_without_expenses_has_zero_balance() {
        let results = compute_for_expenses(
            people(&["A", "B", "Idle"]),
            [Expense::dummy_even("e1", "A", 10, &["A", "B"])],
            &SettlementConfig::default(),
        )
        .unwrap();
        assert!(results.balances.contains("Idle"));
        assert_eq!(results.balances.get("Idle"), Decimal::ZERO);
    }

    #[test]
    fn invalid_config_fails_the_run() {
        let config = SettlementConfig {
            tolerance: Decimal::new(-1, 0),
            ..SettlementConfig::default()
        };
        let err = compute_results(CalculationInput::default(), &config).unwrap_err();
        assert!(matches!(err, EvensplitError::Configuration(_)));
    }

    #[test]
    fn relaxed_mismatch_is_balanced_but_not_settled() {
        let config = SettlementConfig {
            require_exact_contributions: false,
            ..SettlementConfig::default()
        };
        let results = compute_for_expenses(
            people(&["A", "B"]),
            [
                Expense::dummy_manual("short", "A", 100, &[("A", 20), ("B", 50)]),
                Expense::dummy_even("fine", "B", 10, &["A", "B"]),
            ],
            &config,
        )
        .unwrap();

        assert!(!results.transactions.by_expense.contains_key(&ExpenseId::from("short")));
        assert!(results.transactions.by_expense.contains_key(&ExpenseId::from("fine")));
        assert!(results.warnings.iter().any(|w| matches!(
            w,
            ComputationWarning::UnbalancedExpense { expense_id, .. } if expense_id.as_str() == "short"
        )));
        assert!(
            results
                .warnings
                .iter()
                .any(|w| matches!(w, ComputationWarning::GlobalImbalance { .. }))
        );
        // A: +100 - 20 - 5, B: -50 + 10 - 5
        assert_eq!(results.balances.get("A"), Decimal::new(75, 0));
        assert_eq!(results.balances.get("B"), Decimal::new(-45, 0));
    }

    #[test]
    fn net_settlement_when_enabled() {
        let config = SettlementConfig {
            include_net_settlement: true,
            ..SettlementConfig::default()
        };
        let results = compute_for_expenses(
            people(&["A", "B"]),
            [
                Expense::dummy_even("e1", "A", 100, &["A", "B"]),
                Expense::dummy_even("e2", "B", 60, &["A", "B"]),
            ],
            &config,
        )
        .unwrap();

        // Per expense: B→A 50, A→B 30. Net: B→A 20.
        assert_eq!(results.transactions.summary.amount("B", "A"), Decimal::new(50, 0));
        assert_eq!(results.transactions.summary.amount("A", "B"), Decimal::new(30, 0));
        let net = results.net_settlement.unwrap();
        assert_eq!(net.amount("B", "A"), Decimal::new(20, 0));
        assert_eq!(net.len(), 1);
    }

    #[test]
    fn result_scale_rounds_output() {
        let config = SettlementConfig {
            result_scale: Some(2),
            ..SettlementConfig::default()
        };
        let results = compute_for_expenses(
            people(&["A", "B", "C"]),
            [Expense::dummy_even("e1", "A", 100, &["A", "B", "C"])],
            &config,
        )
        .unwrap();
        // 66.67 - 33.33 - 33.33 would leave a cent over; the largest gain gives it back.
        assert_eq!(results.balances.get("A"), Decimal::new(6666, 2));
        assert_eq!(results.balances.get("B"), Decimal::new(-3333, 2));
        assert_eq!(results.balances.get("C"), Decimal::new(-3333, 2));
        assert_eq!(results.balances.total(), Decimal::ZERO);
        assert_eq!(results.transactions.summary.amount("C", "A"), Decimal::new(3333, 2));
        assert!(results.is_clean());
    }

    #[test]
    fn rounded_summary_matches_rounded_expenses() {
        let config = SettlementConfig {
            result_scale: Some(2),
            ..SettlementConfig::default()
        };
        let results = compute_for_expenses(
            people(&["A", "B", "C"]),
            [
                Expense::dummy_even("e1", "A", 100, &["A", "B", "C"]),
                Expense::dummy_even("e2", "A", 100, &["A", "B", "C"]),
                Expense::dummy_even("e3", "A", 100, &["A", "B", "C"]),
            ],
            &config,
        )
        .unwrap();

        for map in results.transactions.by_expense.values() {
            assert_eq!(map.amount("B", "A"), Decimal::new(3333, 2));
        }
        assert_eq!(results.transactions.summary.amount("B", "A"), Decimal::new(9999, 2));
        assert_eq!(results.transactions.summary.amount("C", "A"), Decimal::new(9999, 2));
        let check = ConservationCheck::new(config.tolerance);
        assert!(check.verify_summary(&results.transactions).is_ok());
        assert!(check.verify_zero_sum(&results.balances).is_ok());
        assert_eq!(results.balances.get("A"), Decimal::new(200, 0));
        assert!(results.is_clean());
    }

    #[test]
    fn amounts_near_the_limit_do_not_overflow() {
        let max = evensplit_types::constants::MAX_AMOUNT;
        let big = |id: &str| Expense::evenly(id, "", "A", max, [ParticipantId::from("B")]).unwrap();
        let results = compute_for_expenses(
            people(&["A", "B"]),
            [big("e1"), big("e2")],
            &SettlementConfig::default(),
        )
        .unwrap();

        assert_eq!(results.balances.get("A"), max * Decimal::TWO);
        assert_eq!(results.balances.get("B"), -max * Decimal::TWO);
        assert_eq!(results.transactions.summary.amount("B", "A"), max * Decimal::TWO);
        assert!(results.is_clean());
    }

    #[test]
    fn oversized_record_is_rejected_not_fatal() {
        let input: CalculationInput = serde_json::from_str(
            r#"{
                "participants": ["A", "B"],
                "expenses": [
                    { "id": "huge", "name": "", "payer": "A", "amount": "50000000000000000000000000000",
                      "involvedParticipants": ["B"], "splitEvenly": true },
                    { "id": "fine", "name": "", "payer": "A", "amount": "10",
                      "involvedParticipants": ["B"], "splitEvenly": true }
                ]
            }"#,
        )
        .unwrap();
        let results = compute_results(input, &SettlementConfig::default()).unwrap();

        assert_eq!(results.rejected.len(), 1);
        assert_eq!(results.rejected[0].expense_id.as_str(), "huge");
        assert_eq!(results.rejected[0].code, 109);
        assert_eq!(results.balances.get("A"), Decimal::new(10, 0));
    }

    #[test]
    fn duplicate_constructed_expense_rejected() {
        let results = compute_for_expenses(
            people(&["A", "B"]),
            [
                Expense::dummy_even("e1", "A", 10, &["A", "B"]),
                Expense::dummy_even("e1", "B", 10, &["A", "B"]),
            ],
            &SettlementConfig::default(),
        )
        .unwrap();
        assert_eq!(results.rejected.len(), 1);
        assert_eq!(results.rejected[0].code, 108);
        assert_eq!(results.balances.get("A"), Decimal::new(5, 0));
    }
}
