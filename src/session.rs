//! Game session: one player's game, owned by the rendering layer
//!
//! ```text
//! AwaitingScenario ──next_scenario──▶ ScenarioPending ──present──▶ AwaitingChoice
//!        ▲                                   │                          │
//!        │                                   └──────────choose──────────┤
//!        │                                                              ▼
//!        └────────────advance (not terminal)───────────────────── OutcomeDisplayed
//!                                                                       │
//!                                          GameOver ◀──advance (terminal)┘
//!                                             │
//!                                          restart ──▶ AwaitingScenario
//! ```
//!
//! Nothing here is global. Each session owns its state, catalog and random
//! source; serving several players means holding several sessions.

use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::engine::{self, TerminationRule};
use crate::error::{GameError, Result};
use crate::scenario::ScenarioInstance;
use crate::state::{FinancialState, HistorySnapshot};
use crate::types::Choice;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingScenario,
    ScenarioPending,
    AwaitingChoice,
    OutcomeDisplayed,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::AwaitingScenario => "awaiting a scenario",
            Phase::ScenarioPending => "a scenario is pending",
            Phase::AwaitingChoice => "awaiting a choice",
            Phase::OutcomeDisplayed => "the outcome is displayed",
            Phase::GameOver => "the game is over",
        };
        f.write_str(text)
    }
}

pub struct GameSession {
    id: String,
    started_at: DateTime<Utc>,
    config: GameConfig,
    catalog: Catalog,
    rng: StdRng,
    state: FinancialState,
    phase: Phase,
    pending: Option<ScenarioInstance>,
    last_outcome: Option<String>,
}

impl GameSession {
    /// Start a game from configuration. Fails if the starting values or the
    /// catalog are invalid.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let catalog = Catalog::from_set(config.catalog)?;
        Self::with_parts(config, catalog, rng)
    }

    /// Start a game with an explicit catalog and random source
    pub fn with_parts(config: GameConfig, catalog: Catalog, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let state = engine::restart(&config.initial);
        let id = Uuid::new_v4().to_string();
        tracing::info!(
            "Session {} started with {} scenarios ({:?})",
            id,
            catalog.len(),
            config.termination
        );

        Ok(Self {
            id,
            started_at: Utc::now(),
            config,
            catalog,
            rng,
            state,
            phase: Phase::AwaitingScenario,
            pending: None,
            last_outcome: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &FinancialState {
        &self.state
    }

    pub fn history(&self) -> &[HistorySnapshot] {
        self.state.history()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> Option<&ScenarioInstance> {
        self.pending.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&str> {
        self.last_outcome.as_deref()
    }

    pub fn score(&self) -> f64 {
        self.state.score()
    }

    pub fn termination(&self) -> TerminationRule {
        self.config.termination
    }

    /// The scenario for this quarter. Draws one if none is pending, otherwise
    /// returns the pending one unchanged.
    pub fn next_scenario(&mut self) -> Result<&ScenarioInstance> {
        match self.phase {
            Phase::AwaitingScenario => {
                let scenario = self.catalog.next_scenario(&mut self.rng);
                tracing::debug!("Quarter {}: drew '{}'", self.state.quarter(), scenario.name());
                self.pending = Some(scenario);
                self.phase = Phase::ScenarioPending;
            }
            Phase::ScenarioPending | Phase::AwaitingChoice => {}
            phase => return Err(self.invalid("draw a scenario", phase)),
        }
        self.pending_scenario("draw a scenario")
    }

    /// Mark the pending scenario as shown to the player
    pub fn present(&mut self) -> Result<&ScenarioInstance> {
        match self.phase {
            Phase::ScenarioPending | Phase::AwaitingChoice => {
                self.phase = Phase::AwaitingChoice;
                self.pending_scenario("present a scenario")
            }
            phase => Err(self.invalid("present a scenario", phase)),
        }
    }

    /// Resolve the pending scenario with `choice`; returns the outcome text
    pub fn choose(&mut self, choice: Choice) -> Result<&str> {
        if !matches!(self.phase, Phase::ScenarioPending | Phase::AwaitingChoice) {
            return Err(self.invalid("choose", self.phase));
        }
        let scenario = self
            .pending
            .as_ref()
            .ok_or_else(|| self.invalid("choose", self.phase))?;

        let (next, outcome) = engine::apply(&self.state, scenario, choice, self.config.termination)?;

        tracing::info!(
            "Quarter {}: '{}' -> {} (margin {:.2}%, score {:.1})",
            next.quarter(),
            scenario.name(),
            choice,
            next.margin(),
            next.score()
        );

        self.state = next;
        self.pending = None;
        self.phase = Phase::OutcomeDisplayed;
        Ok(self.last_outcome.insert(outcome).as_str())
    }

    /// Parse "A"/"B" and choose. Invalid labels leave the session untouched.
    pub fn choose_label(&mut self, label: &str) -> Result<&str> {
        let choice: Choice = label.parse()?;
        self.choose(choice)
    }

    /// Move past the displayed outcome: next quarter, or game over
    pub fn advance(&mut self) -> Result<Phase> {
        if self.phase != Phase::OutcomeDisplayed {
            return Err(self.invalid("advance", self.phase));
        }

        if self.state.is_game_over() {
            self.phase = Phase::GameOver;
        } else {
            self.state.advance_quarter();
            self.phase = Phase::AwaitingScenario;
        }
        Ok(self.phase)
    }

    /// Reset to the initial state and clear history. Allowed from any phase.
    pub fn restart(&mut self) {
        tracing::info!(
            "Session {} restarted after {} quarters (score {:.1})",
            self.id,
            self.state.quarters_resolved(),
            self.state.score()
        );
        self.state = engine::restart(&self.config.initial);
        self.pending = None;
        self.last_outcome = None;
        self.phase = Phase::AwaitingScenario;
    }

    fn pending_scenario(&self, action: &'static str) -> Result<&ScenarioInstance> {
        self.pending.as_ref().ok_or_else(|| self.invalid(action, self.phase))
    }

    fn invalid(&self, action: &'static str, phase: Phase) -> GameError {
        GameError::InvalidTransition {
            action,
            phase: phase.to_string(),
        }
    }
}
