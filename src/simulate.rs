//! Autoplay Simulation for Catalog Balancing
//!
//! Plays thousands of seeded games with a fixed policy to see:
//! - How often a policy ends in game over, and how fast
//! - The spread of final scores
//! - Whether every scenario is actually being drawn

use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::engine::{self, TerminationRule};
use crate::error::Result;
use crate::scenario::ScenarioInstance;
use crate::state::FinancialState;
use crate::types::Choice;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Median, OrderStatistics};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How the simulated player picks an option
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    AlwaysA,
    AlwaysB,
    #[default]
    Random,
    /// Pick whichever option yields the higher score right now
    Greedy,
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "always_a" | "a" => Ok(Policy::AlwaysA),
            "always_b" | "b" => Ok(Policy::AlwaysB),
            "random" => Ok(Policy::Random),
            "greedy" => Ok(Policy::Greedy),
            other => Err(format!(
                "unknown policy '{}': expected always_a, always_b, random or greedy",
                other
            )),
        }
    }
}

impl Policy {
    fn pick<R: Rng + ?Sized>(
        &self,
        state: &FinancialState,
        scenario: &ScenarioInstance,
        rule: TerminationRule,
        rng: &mut R,
    ) -> Result<Choice> {
        Ok(match self {
            Policy::AlwaysA => Choice::A,
            Policy::AlwaysB => Choice::B,
            Policy::Random => {
                if rng.gen_bool(0.5) {
                    Choice::A
                } else {
                    Choice::B
                }
            }
            Policy::Greedy => {
                let (a, _) = engine::apply(state, scenario, Choice::A, rule)?;
                let (b, _) = engine::apply(state, scenario, Choice::B, rule)?;
                if b.score() > a.score() {
                    Choice::B
                } else {
                    Choice::A
                }
            }
        })
    }
}

/// Configuration for an autoplay run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub games: u32,
    /// Quarters after which a surviving game stops
    pub max_quarters: u32,
    pub policy: Policy,
    /// Catalog, termination rule, initial values and seed
    pub game: GameConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 1000,
            max_quarters: 20,
            policy: Policy::default(),
            game: GameConfig::default(),
        }
    }
}

/// Distribution summary of final scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResults {
    pub games: u32,
    pub policy: Policy,
    pub max_quarters: u32,
    /// Fraction of games that hit the termination rule
    pub game_over_rate: f64,
    /// Mean number of resolved quarters per game
    pub mean_quarters: f64,
    pub final_score: ScoreSummary,
    /// How often each scenario was drawn across all games
    pub scenario_draws: BTreeMap<String, u32>,
}

/// Run the simulation
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationResults> {
    let mut rng = match config.game.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let catalog = Catalog::from_set(config.game.catalog)?;
    let rule = config.game.termination;

    let mut scenario_draws: BTreeMap<String, u32> =
        catalog.templates().iter().map(|t| (t.name.to_string(), 0)).collect();
    let mut final_scores = Vec::with_capacity(config.games as usize);
    let mut quarters_played = Vec::with_capacity(config.games as usize);
    let mut game_overs = 0u32;

    for _ in 0..config.games {
        let mut state = engine::restart(&config.game.initial);

        for _ in 0..config.max_quarters {
            let scenario = catalog.next_scenario(&mut rng);
            *scenario_draws.entry(scenario.name().to_string()).or_default() += 1;

            let choice = config.policy.pick(&state, &scenario, rule, &mut rng)?;
            state = engine::apply(&state, &scenario, choice, rule)?.0;

            if state.is_game_over() {
                break;
            }
            state.advance_quarter();
        }

        if state.is_game_over() {
            game_overs += 1;
        }
        final_scores.push(state.score());
        quarters_played.push(state.quarters_resolved() as f64);
    }

    let games = config.games.max(1) as f64;
    let mean_quarters = quarters_played.iter().sum::<f64>() / games;

    tracing::info!(
        "Simulated {} games with {:?}: {:.1}% game over",
        config.games,
        config.policy,
        game_overs as f64 / games * 100.0
    );

    Ok(SimulationResults {
        games: config.games,
        policy: config.policy,
        max_quarters: config.max_quarters,
        game_over_rate: game_overs as f64 / games,
        mean_quarters,
        final_score: summarize(final_scores),
        scenario_draws,
    })
}

fn summarize(scores: Vec<f64>) -> ScoreSummary {
    if scores.is_empty() {
        return ScoreSummary::default();
    }
    let mut data = Data::new(scores);
    ScoreSummary {
        mean: data.mean().unwrap_or(0.0),
        // Undefined for a single game
        std_dev: data.std_dev().filter(|s| s.is_finite()).unwrap_or(0.0),
        median: data.median(),
        p10: data.percentile(10),
        p90: data.percentile(90),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSet;

    fn config(policy: Policy, seed: u64) -> SimulationConfig {
        SimulationConfig {
            games: 200,
            max_quarters: 12,
            policy,
            game: GameConfig {
                seed: Some(seed),
                ..GameConfig::default()
            },
        }
    }

    #[test]
    fn test_simulation_runs() {
        let results = run_simulation(&config(Policy::Random, 42)).unwrap();
        assert_eq!(results.games, 200);
        assert!(results.mean_quarters > 0.0 && results.mean_quarters <= 12.0);
        assert!((0.0..=1.0).contains(&results.game_over_rate));
        assert!(results.final_score.mean >= 0.0);
        assert!(results.final_score.p10 <= results.final_score.p90);
        assert_eq!(results.scenario_draws.len(), 10);
        assert!(results.scenario_draws.values().all(|&n| n > 0), "Every scenario should be drawn");
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let a = run_simulation(&config(Policy::Random, 7)).unwrap();
        let b = run_simulation(&config(Policy::Random, 7)).unwrap();
        assert_eq!(a.final_score.mean, b.final_score.mean);
        assert_eq!(a.scenario_draws, b.scenario_draws);
    }

    #[test]
    fn test_greedy_policy_runs() {
        let greedy = run_simulation(&config(Policy::Greedy, 3)).unwrap();
        assert!(greedy.final_score.median >= 0.0);
    }

    #[test]
    fn test_endless_never_ends() {
        let mut cfg = config(Policy::AlwaysA, 11);
        cfg.game.catalog = CatalogSet::Full;
        cfg.game.termination = TerminationRule::Endless;
        let results = run_simulation(&cfg).unwrap();
        assert_eq!(results.game_over_rate, 0.0);
        assert_eq!(results.mean_quarters, 12.0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("greedy".parse::<Policy>().unwrap(), Policy::Greedy);
        assert_eq!("always_b".parse::<Policy>().unwrap(), Policy::AlwaysB);
        assert!("sometimes".parse::<Policy>().is_err());
    }

    #[test]
    fn test_summarize_single_score() {
        let summary = summarize(vec![120.0]);
        assert_eq!(summary.mean, 120.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.median, 120.0);
    }
}
