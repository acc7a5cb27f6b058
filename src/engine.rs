//! Financial State Machine: resolve a choice against the current state
//!
//! `apply` is pure: given the same state, scenario and choice it always
//! produces the same next state and outcome text. It never advances the
//! quarter; the caller does that once the outcome has been shown.

use crate::error::{GameError, Result};
use crate::scenario::ScenarioInstance;
use crate::state::{FinancialState, InitialValues};
use crate::types::Choice;
use serde::{Deserialize, Serialize};

/// Cash position at or below which the company is insolvent
pub const CASH_FLOOR: f64 = -200_000.0;

/// When a game ends
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerminationRule {
    /// Game over once margin <= 0 or cash flow <= -200,000
    #[default]
    MarginOrCashFloor,
    /// Play forever
    Endless,
}

impl TerminationRule {
    pub fn is_terminal(&self, state: &FinancialState) -> bool {
        match self {
            TerminationRule::MarginOrCashFloor => state.margin() <= 0.0 || state.cash_flow() <= CASH_FLOOR,
            TerminationRule::Endless => false,
        }
    }
}

/// Apply `choice` for `scenario` and return the next state with the outcome text
pub fn apply(
    state: &FinancialState,
    scenario: &ScenarioInstance,
    choice: Choice,
    rule: TerminationRule,
) -> Result<(FinancialState, String)> {
    if state.is_game_over() {
        return Err(GameError::InvalidTransition {
            action: "apply a choice",
            phase: "the game is over".to_string(),
        });
    }

    let resolution = scenario.template.resolve(choice, &scenario.parameters);

    let mut next = state.clone();
    next.apply_deltas(&resolution.deltas);
    let game_over = rule.is_terminal(&next);
    next.set_game_over(game_over);
    next.record(scenario.name(), choice);

    tracing::debug!(
        scenario = scenario.name(),
        choice = %choice,
        margin = next.margin(),
        cash_flow = next.cash_flow(),
        "Choice applied"
    );
    if next.is_game_over() {
        tracing::info!(
            "Game over in quarter {}: margin {:.2}%, cash flow {:.0}",
            next.quarter(),
            next.margin(),
            next.cash_flow()
        );
    }

    Ok((next, resolution.explanation))
}

/// Parse a raw "A"/"B" label, then apply. Invalid labels fail before any
/// state is touched.
pub fn apply_label(
    state: &FinancialState,
    scenario: &ScenarioInstance,
    label: &str,
    rule: TerminationRule,
) -> Result<(FinancialState, String)> {
    let choice: Choice = label.parse()?;
    apply(state, scenario, choice, rule)
}

/// Fresh initial state: quarter 1, empty history
pub fn restart(initial: &InitialValues) -> FinancialState {
    FinancialState::new(initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Catalog, CatalogSet, ParameterRange, ScenarioKind, ScenarioOption, ScenarioTemplate,
    };
    use crate::types::{EffectDeltas, Metric, Parameters};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn scope_creep(extra_hours: i64, hourly_rate: i64) -> ScenarioInstance {
        let catalog = Catalog::classic().unwrap();
        let template = catalog.get("Scope Creep").unwrap();
        let mut params = Parameters::new();
        params.insert("extra_hours".into(), extra_hours);
        params.insert("hourly_rate".into(), hourly_rate);
        ScenarioInstance::with_parameters(Arc::clone(template), params).unwrap()
    }

    /// A scenario whose options move nothing, or the given deltas
    fn scripted(a: EffectDeltas) -> ScenarioInstance {
        let template = ScenarioTemplate {
            name: "Scripted",
            kind: ScenarioKind::Growth,
            description_template: "Quarter {n}.",
            parameter_ranges: vec![ParameterRange::new("n", 1, 1)],
            learning: "Nothing to learn.",
            options: [
                ScenarioOption::fixed("Act", "Acted.", a),
                ScenarioOption::fixed("Wait", "Waited.", EffectDeltas::NONE),
            ],
        };
        let mut rng = StdRng::seed_from_u64(0);
        ScenarioInstance::generate(Arc::new(template), &mut rng)
    }

    #[test]
    fn test_scope_creep_absorb_example() {
        let state = FinancialState::default();
        assert_eq!(state.costs(), 4_100_000.0);
        assert_eq!(state.margin(), 18.0);

        let (next, outcome) = apply(&state, &scope_creep(50, 150), Choice::A, TerminationRule::default()).unwrap();
        assert_eq!(next.costs(), 4_107_500.0);
        assert_eq!(next.revenue(), 5_000_000.0);
        assert_eq!(next.margin(), 17.85);
        assert!(outcome.contains("$7,500"));
        assert!(!next.is_game_over());
    }

    #[test]
    fn test_apply_does_not_touch_input_or_quarter() {
        let state = FinancialState::default();
        let (next, _) = apply(&state, &scope_creep(50, 150), Choice::B, TerminationRule::default()).unwrap();
        assert_eq!(state, FinancialState::default());
        assert_eq!(next.quarter(), 1);
        assert_eq!(next.history().len(), 1);
        assert_eq!(next.history()[0].scenario_name, "Scope Creep");
        assert_eq!(next.history()[0].choice, Choice::B);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let catalog = Catalog::from_set(CatalogSet::Full).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = FinancialState::default();
        for i in 0..30 {
            let scenario = catalog.next_scenario(&mut rng);
            let choice = if i % 2 == 0 { Choice::A } else { Choice::B };
            let first = apply(&state, &scenario, choice, TerminationRule::Endless).unwrap();
            let second = apply(&state, &scenario, choice, TerminationRule::Endless).unwrap();
            assert_eq!(first, second);
            state = first.0;
        }
    }

    #[test]
    fn test_history_grows_by_one_and_is_never_rewritten() {
        let catalog = Catalog::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = FinancialState::default();
        for n in 1..=12 {
            let before = state.history().to_vec();
            let scenario = catalog.next_scenario(&mut rng);
            state = apply(&state, &scenario, Choice::A, TerminationRule::Endless).unwrap().0;
            state.advance_quarter();
            assert_eq!(state.history().len(), n);
            assert_eq!(&state.history()[..n - 1], before.as_slice());
            assert_eq!(state.history()[n - 1].quarter, n as u32);
        }
    }

    #[test]
    fn test_margin_consistent_after_every_apply() {
        let catalog = Catalog::from_set(CatalogSet::Full).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        let mut state = FinancialState::default();
        for _ in 0..100 {
            let scenario = catalog.next_scenario(&mut rng);
            state = apply(&state, &scenario, Choice::B, TerminationRule::Endless).unwrap().0;
            let expected = ((state.revenue() - state.costs()) / state.revenue() * 100.0 * 100.0).round() / 100.0;
            assert_eq!(state.margin(), expected);
            assert!((1.0..=5.0).contains(&state.team_morale()));
            assert!((1.0..=5.0).contains(&state.client_satisfaction()));
            assert!(state.technical_debt() >= 0.0);
        }
    }

    #[test]
    fn test_zero_margin_ends_game() {
        let state = FinancialState::with_financials(1_000_000.0, 1_000_000.0, 500_000.0);
        assert_eq!(state.margin(), 0.0);
        let (next, _) = apply(&state, &scripted(EffectDeltas::NONE), Choice::B, TerminationRule::default()).unwrap();
        assert!(next.is_game_over());
        assert!(next.history()[0].game_over);
    }

    #[test]
    fn test_cash_floor_ends_game_regardless_of_margin() {
        let state = FinancialState::with_financials(5_000_000.0, 3_000_000.0, -250_000.0);
        assert_eq!(state.margin(), 40.0);
        let (next, _) = apply(&state, &scripted(EffectDeltas::NONE), Choice::B, TerminationRule::default()).unwrap();
        assert!(next.is_game_over());
    }

    #[test]
    fn test_cash_floor_is_inclusive() {
        let state = FinancialState::with_financials(5_000_000.0, 4_000_000.0, -150_000.0);
        let drain = EffectDeltas::from_pairs(&[(Metric::CashFlow, -50_000.0)]);
        let (next, _) = apply(&state, &scripted(drain), Choice::A, TerminationRule::default()).unwrap();
        assert_eq!(next.cash_flow(), CASH_FLOOR);
        assert!(next.is_game_over());
    }

    #[test]
    fn test_endless_rule_never_terminates() {
        let state = FinancialState::with_financials(1_000_000.0, 2_000_000.0, -1_000_000.0);
        let (next, _) = apply(&state, &scripted(EffectDeltas::NONE), Choice::A, TerminationRule::Endless).unwrap();
        assert!(!next.is_game_over());
    }

    #[test]
    fn test_zero_revenue_recovers() {
        let state = FinancialState::default();
        let wipe = EffectDeltas::from_pairs(&[(Metric::Revenue, -5_000_000.0)]);
        let (next, _) = apply(&state, &scripted(wipe), Choice::A, TerminationRule::default()).unwrap();
        assert_eq!(next.margin(), 0.0);
        assert!(next.is_game_over(), "Zero margin is terminal");
    }

    #[test]
    fn test_fixed_outcome_includes_learning_note() {
        let (_, outcome) =
            apply(&FinancialState::default(), &scripted(EffectDeltas::NONE), Choice::A, TerminationRule::default())
                .unwrap();
        assert_eq!(outcome, "Acted. Nothing to learn.");
    }

    #[test]
    fn test_invalid_label_rejected_before_mutation() {
        let state = FinancialState::default();
        let err = apply_label(&state, &scope_creep(50, 150), "C", TerminationRule::default()).unwrap_err();
        assert_eq!(err, GameError::InvalidChoice("C".to_string()));
        assert!(state.history().is_empty());

        let (next, _) = apply_label(&state, &scope_creep(50, 150), "a", TerminationRule::default()).unwrap();
        assert_eq!(next.costs(), 4_107_500.0);
    }

    #[test]
    fn test_apply_after_game_over_rejected() {
        let mut state = FinancialState::default();
        state.set_game_over(true);
        let err = apply(&state, &scope_creep(50, 150), Choice::A, TerminationRule::default()).unwrap_err();
        assert!(matches!(err, GameError::InvalidTransition { .. }));
    }

    #[test]
    fn test_restart_restores_initial_values() {
        let mut state = apply(&FinancialState::default(), &scope_creep(80, 180), Choice::A, TerminationRule::default())
            .unwrap()
            .0;
        for _ in 0..6 {
            state.advance_quarter();
        }
        let fresh = restart(&InitialValues::default());
        assert_eq!(fresh, FinancialState::default());
        assert_eq!(fresh.quarter(), 1);
        assert!(fresh.history().is_empty());
        assert_ne!(state, fresh);
    }
}
