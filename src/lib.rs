//! Margin Masters - quarterly business-scenario game engine
//!
//! The player runs a consultancy's books one quarter at a time. Each quarter
//! a business scenario is drawn and the player picks response A or B; the
//! choice moves revenue, costs, morale, client satisfaction, technical debt
//! and cash flow, and the company either survives to the next quarter or
//! goes under.
//!
//! # Quick Start for a Rendering Layer
//!
//! ```rust,ignore
//! use margin_masters::{GameConfig, GameSession, Choice, Phase};
//!
//! let mut session = GameSession::new(GameConfig::default())?;
//!
//! let scenario = session.next_scenario()?;
//! println!("{}", scenario.rendered_text);
//!
//! let outcome = session.choose(Choice::A)?;
//! println!("{}", outcome);
//!
//! if session.advance()? == Phase::GameOver {
//!     session.restart();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │           Rendering layer (terminal, web, ...)       │
//! └─────────────────────┬───────────────────────────────┘
//!                       │ owns a GameSession
//!                       ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  Catalog::next_scenario() → ScenarioInstance         │
//! │  engine::apply()          → (FinancialState, text)   │
//! │  engine::restart()        → FinancialState           │
//! │  state() / history()      → read-only accessors      │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod scenario;
pub mod session;
pub mod simulate;
pub mod state;
pub mod types;

// Core API
pub use catalog::{Catalog, CatalogSet, EffectSpec, ScenarioKind, ScenarioTemplate};
pub use engine::{apply, apply_label, restart, TerminationRule};
pub use error::{GameError, Result};
pub use scenario::ScenarioInstance;
pub use state::{FinancialState, HistorySnapshot, InitialValues};
pub use types::*;

// Session driving
pub use config::GameConfig;
pub use session::{GameSession, Phase};

// Balancing and export
pub use report::{history_digest, SessionExport};
pub use simulate::{run_simulation, Policy, SimulationConfig, SimulationResults};
