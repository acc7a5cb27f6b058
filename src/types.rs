//! Core value types shared by the catalog, the state machine and the session

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Concrete parameter values drawn for one scenario instance
pub type Parameters = BTreeMap<String, i64>;

/// One of the two mutually exclusive responses to a scenario
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    pub const ALL: [Choice; 2] = [Choice::A, Choice::B];

    pub fn label(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Choice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Choice::A),
            "B" | "b" => Ok(Choice::B),
            other => Err(GameError::InvalidChoice(other.to_string())),
        }
    }
}

/// A metric an option can move
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    Costs,
    Morale,
    Satisfaction,
    Debt,
    CashFlow,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Costs => "costs",
            Metric::Morale => "morale",
            Metric::Satisfaction => "satisfaction",
            Metric::Debt => "debt",
            Metric::CashFlow => "cash_flow",
        }
    }
}

/// Signed deltas applied to the financial state. Absent metrics are zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct EffectDeltas {
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub costs: f64,
    #[serde(default)]
    pub morale: f64,
    #[serde(default)]
    pub satisfaction: f64,
    #[serde(default)]
    pub debt: f64,
    #[serde(default)]
    pub cash_flow: f64,
}

impl EffectDeltas {
    pub const NONE: EffectDeltas = EffectDeltas {
        revenue: 0.0,
        costs: 0.0,
        morale: 0.0,
        satisfaction: 0.0,
        debt: 0.0,
        cash_flow: 0.0,
    };

    /// Build from (metric, delta) pairs; repeated metrics accumulate
    pub fn from_pairs(pairs: &[(Metric, f64)]) -> Self {
        pairs
            .iter()
            .fold(Self::NONE, |acc, &(metric, delta)| acc.with(metric, acc.get(metric) + delta))
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::Costs => self.costs,
            Metric::Morale => self.morale,
            Metric::Satisfaction => self.satisfaction,
            Metric::Debt => self.debt,
            Metric::CashFlow => self.cash_flow,
        }
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        match metric {
            Metric::Revenue => self.revenue = value,
            Metric::Costs => self.costs = value,
            Metric::Morale => self.morale = value,
            Metric::Satisfaction => self.satisfaction = value,
            Metric::Debt => self.debt = value,
            Metric::CashFlow => self.cash_flow = value,
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parsing() {
        assert_eq!("A".parse::<Choice>().unwrap(), Choice::A);
        assert_eq!(" b ".parse::<Choice>().unwrap(), Choice::B);
        assert_eq!(
            "C".parse::<Choice>().unwrap_err(),
            GameError::InvalidChoice("C".to_string())
        );
        assert!("".parse::<Choice>().is_err());
        assert!("AB".parse::<Choice>().is_err());
    }

    #[test]
    fn test_deltas_from_pairs_accumulates() {
        let deltas = EffectDeltas::from_pairs(&[
            (Metric::Costs, 1_000.0),
            (Metric::Morale, -0.5),
            (Metric::Costs, 500.0),
        ]);
        assert_eq!(deltas.costs, 1_500.0);
        assert_eq!(deltas.morale, -0.5);
        assert_eq!(deltas.revenue, 0.0);
        assert!(!deltas.is_zero());
        assert!(EffectDeltas::default().is_zero());
    }

    #[test]
    fn test_metric_serialization() {
        assert_eq!(serde_json::to_string(&Metric::CashFlow).unwrap(), "\"cash_flow\"");
        assert_eq!(Metric::CashFlow.name(), "cash_flow");
    }
}
