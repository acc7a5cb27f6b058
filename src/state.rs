//! Financial state of the company and its quarter-by-quarter history
//!
//! `margin` is derived: it is recomputed from revenue and costs after every
//! mutation and never set on its own. Morale and satisfaction live in
//! [1.0, 5.0]; technical debt never goes below zero.

use crate::error::{GameError, Result};
use crate::types::{Choice, EffectDeltas};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Starting values for a new game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InitialValues {
    pub revenue: f64,
    /// Fraction, e.g. 0.18 for an 18% margin
    pub initial_margin: f64,
    pub team_morale: f64,
    pub client_satisfaction: f64,
    pub cash_flow: f64,
}

impl Default for InitialValues {
    fn default() -> Self {
        Self {
            revenue: 5_000_000.0,
            initial_margin: 0.18,
            team_morale: 4.0,
            client_satisfaction: 4.0,
            cash_flow: 500_000.0,
        }
    }
}

/// Immutable copy of the state at the moment a choice was applied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistorySnapshot {
    pub quarter: u32,
    pub scenario_name: String,
    pub choice: Choice,
    pub revenue: f64,
    pub costs: f64,
    pub margin: f64,
    pub team_morale: f64,
    pub client_satisfaction: f64,
    pub technical_debt: f64,
    pub cash_flow: f64,
    pub game_over: bool,
    pub score_at_time: f64,
}

/// Company state. Fields are read through getters so the clamps and the
/// derived margin always hold; deserialized states go through the same
/// clamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StateRecord")]
pub struct FinancialState {
    revenue: f64,
    costs: f64,
    /// Percentage, two decimals
    margin: f64,
    team_morale: f64,
    client_satisfaction: f64,
    technical_debt: f64,
    cash_flow: f64,
    quarter: u32,
    game_over: bool,
    history: Vec<HistorySnapshot>,
}

/// Wire form of `FinancialState`. A serialized `margin` is ignored and
/// recomputed from revenue and costs.
#[derive(Deserialize)]
struct StateRecord {
    revenue: f64,
    costs: f64,
    team_morale: f64,
    client_satisfaction: f64,
    #[serde(default)]
    technical_debt: f64,
    cash_flow: f64,
    #[serde(default = "first_quarter")]
    quarter: u32,
    #[serde(default)]
    game_over: bool,
    #[serde(default)]
    history: Vec<HistorySnapshot>,
}

fn first_quarter() -> u32 {
    1
}

impl From<StateRecord> for FinancialState {
    fn from(record: StateRecord) -> Self {
        let mut state = Self {
            revenue: record.revenue,
            costs: record.costs,
            margin: 0.0,
            team_morale: clamp_rating(record.team_morale),
            client_satisfaction: clamp_rating(record.client_satisfaction),
            technical_debt: record.technical_debt.max(0.0),
            cash_flow: record.cash_flow,
            quarter: record.quarter.max(1),
            game_over: record.game_over,
            history: record.history,
        };
        state.recompute_margin();
        state
    }
}

impl Default for FinancialState {
    fn default() -> Self {
        Self::new(&InitialValues::default())
    }
}

impl FinancialState {
    pub fn new(initial: &InitialValues) -> Self {
        let revenue = initial.revenue;
        let costs = round2(revenue * (1.0 - initial.initial_margin));
        let mut state = Self {
            revenue,
            costs,
            margin: 0.0,
            team_morale: clamp_rating(initial.team_morale),
            client_satisfaction: clamp_rating(initial.client_satisfaction),
            technical_debt: 0.0,
            cash_flow: initial.cash_flow,
            quarter: 1,
            game_over: false,
            history: Vec::new(),
        };
        state.recompute_margin();
        state
    }

    /// State with arbitrary financials and default ratings, margin derived
    pub fn with_financials(revenue: f64, costs: f64, cash_flow: f64) -> Self {
        let mut state = Self {
            revenue,
            costs,
            cash_flow,
            ..Self::default()
        };
        state.recompute_margin();
        state
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn costs(&self) -> f64 {
        self.costs
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn team_morale(&self) -> f64 {
        self.team_morale
    }

    pub fn client_satisfaction(&self) -> f64 {
        self.client_satisfaction
    }

    pub fn technical_debt(&self) -> f64 {
        self.technical_debt
    }

    pub fn cash_flow(&self) -> f64 {
        self.cash_flow
    }

    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn history(&self) -> &[HistorySnapshot] {
        &self.history
    }

    pub fn quarters_resolved(&self) -> usize {
        self.history.len()
    }

    /// Move to the next quarter. No-op once the game is over.
    pub fn advance_quarter(&mut self) {
        if !self.game_over {
            self.quarter += 1;
        }
    }

    pub(crate) fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    /// Add deltas, respecting the clamps, then recompute the margin
    pub fn apply_deltas(&mut self, deltas: &EffectDeltas) {
        self.revenue += deltas.revenue;
        self.costs += deltas.costs;
        self.team_morale = clamp_rating(self.team_morale + deltas.morale);
        self.client_satisfaction = clamp_rating(self.client_satisfaction + deltas.satisfaction);
        self.technical_debt = (self.technical_debt + deltas.debt).max(0.0);
        self.cash_flow += deltas.cash_flow;
        self.recompute_margin();
    }

    fn recompute_margin(&mut self) {
        self.margin = compute_margin(self.revenue, self.costs).unwrap_or_else(|e| {
            tracing::warn!("{}; margin reported as 0", e);
            0.0
        });
    }

    /// Weighted composite used for ranking, floored at zero
    pub fn score(&self) -> f64 {
        let score = self.margin * 10.0
            + (self.team_morale - 3.0) * 50.0
            + (self.client_satisfaction - 3.0) * 50.0
            + self.technical_debt * -20.0
            + (self.cash_flow / 10_000.0).min(50.0);
        score.max(0.0)
    }

    pub(crate) fn record(&mut self, scenario_name: &str, choice: Choice) {
        let snapshot = HistorySnapshot {
            quarter: self.quarter,
            scenario_name: scenario_name.to_string(),
            choice,
            revenue: self.revenue,
            costs: self.costs,
            margin: self.margin,
            team_morale: self.team_morale,
            client_satisfaction: self.client_satisfaction,
            technical_debt: self.technical_debt,
            cash_flow: self.cash_flow,
            game_over: self.game_over,
            score_at_time: self.score(),
        };
        self.history.push(snapshot);
    }
}

/// `(revenue - costs) / revenue * 100`, rounded to two decimals
pub fn compute_margin(revenue: f64, costs: f64) -> Result<f64> {
    if revenue == 0.0 {
        return Err(GameError::DivisionUndefined { costs });
    }
    Ok(round2((revenue - costs) / revenue * 100.0))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clamp_rating(value: f64) -> f64 {
    value.clamp(MIN_RATING, MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;

    #[test]
    fn test_initial_state() {
        let state = FinancialState::default();
        assert_eq!(state.revenue, 5_000_000.0);
        assert_eq!(state.costs, 4_100_000.0);
        assert_eq!(state.margin, 18.0);
        assert_eq!(state.team_morale, 4.0);
        assert_eq!(state.client_satisfaction, 4.0);
        assert_eq!(state.technical_debt, 0.0);
        assert_eq!(state.cash_flow, 500_000.0);
        assert_eq!(state.quarter, 1);
        assert!(!state.game_over);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_initial_score() {
        // 18*10 + 50 + 50 + 0 + min(50, 50)
        assert!((FinancialState::default().score() - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_margin() {
        assert_eq!(compute_margin(5_000_000.0, 4_107_500.0).unwrap(), 17.85);
        assert_eq!(compute_margin(1_000_000.0, 1_000_000.0).unwrap(), 0.0);
        assert_eq!(compute_margin(3.0, 2.0).unwrap(), 33.33);
        assert_eq!(compute_margin(100.0, 250.0).unwrap(), -150.0);
        assert_eq!(
            compute_margin(0.0, 10.0).unwrap_err(),
            GameError::DivisionUndefined { costs: 10.0 }
        );
    }

    #[test]
    fn test_zero_revenue_margin_is_zero() {
        let mut state = FinancialState::default();
        state.apply_deltas(&EffectDeltas::from_pairs(&[(Metric::Revenue, -5_000_000.0)]));
        assert_eq!(state.revenue, 0.0);
        assert_eq!(state.margin, 0.0);
    }

    #[test]
    fn test_ratings_clamped() {
        let mut state = FinancialState::default();
        for _ in 0..10 {
            state.apply_deltas(&EffectDeltas::from_pairs(&[(Metric::Morale, 0.7), (Metric::Satisfaction, -0.9)]));
            assert!(state.team_morale <= MAX_RATING);
            assert!(state.client_satisfaction >= MIN_RATING);
        }
        assert_eq!(state.team_morale, 5.0);
        assert_eq!(state.client_satisfaction, 1.0);
    }

    #[test]
    fn test_debt_floored() {
        let mut state = FinancialState::default();
        state.apply_deltas(&EffectDeltas::from_pairs(&[(Metric::Debt, 1.5)]));
        state.apply_deltas(&EffectDeltas::from_pairs(&[(Metric::Debt, -4.0)]));
        assert_eq!(state.technical_debt, 0.0);
    }

    #[test]
    fn test_score_floored_at_zero() {
        let mut state = FinancialState::with_financials(1_000_000.0, 3_000_000.0, -500_000.0);
        state.apply_deltas(&EffectDeltas::from_pairs(&[(Metric::Debt, 10.0)]));
        assert_eq!(state.score(), 0.0);
    }

    #[test]
    fn test_score_caps_cash_contribution() {
        let rich = FinancialState::with_financials(5_000_000.0, 4_100_000.0, 50_000_000.0);
        let capped = FinancialState::with_financials(5_000_000.0, 4_100_000.0, 500_000.0);
        assert_eq!(rich.score(), capped.score());
    }

    #[test]
    fn test_initial_values_partial_json() {
        let initial: InitialValues = serde_json::from_str(r#"{"revenue": 1000000.0}"#).unwrap();
        assert_eq!(initial.revenue, 1_000_000.0);
        assert_eq!(initial.initial_margin, 0.18);
        let state = FinancialState::new(&initial);
        assert_eq!(state.costs, 820_000.0);
        assert_eq!(state.margin, 18.0);
    }

    #[test]
    fn test_deserialize_restores_invariants() {
        let json = r#"{
            "revenue": 100.0,
            "costs": 50.0,
            "margin": 99.0,
            "team_morale": 9.0,
            "client_satisfaction": 0.2,
            "technical_debt": -3.0,
            "cash_flow": 1000.0,
            "quarter": 0
        }"#;
        let state: FinancialState = serde_json::from_str(json).unwrap();
        assert_eq!(state.margin(), 50.0);
        assert_eq!(state.team_morale(), MAX_RATING);
        assert_eq!(state.client_satisfaction(), MIN_RATING);
        assert_eq!(state.technical_debt(), 0.0);
        assert_eq!(state.quarter(), 1);
        assert!(!state.is_game_over());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_serialized_state_reloads_unchanged() {
        let mut state = FinancialState::default();
        state.apply_deltas(&EffectDeltas::from_pairs(&[(Metric::Costs, 7_500.0), (Metric::Debt, 0.5)]));
        state.record("Feature Creep", Choice::A);
        state.advance_quarter();

        let json = serde_json::to_string(&state).unwrap();
        let reloaded: FinancialState = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, state);
        assert_eq!(reloaded.margin(), 17.85);
    }

    #[test]
    fn test_advance_quarter_stops_at_game_over() {
        let mut state = FinancialState::default();
        state.advance_quarter();
        assert_eq!(state.quarter(), 2);
        state.set_game_over(true);
        state.advance_quarter();
        assert_eq!(state.quarter(), 2);
    }
}
