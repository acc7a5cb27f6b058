//! Error types for the game core
//!
//! Only `InvalidChoice`, `EmptyCatalog`, `InvalidTemplate`, `InvalidConfig`
//! and `InvalidTransition` ever leave the library. `DivisionUndefined` is raised
//! while computing the margin and recovered inside the state machine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// The player's choice was not `A` or `B`
    #[error("invalid choice '{0}': expected A or B")]
    InvalidChoice(String),

    /// Margin requested while revenue is zero
    #[error("margin undefined: revenue is zero (costs {costs:.2})")]
    DivisionUndefined { costs: f64 },

    /// A catalog was built with no templates
    #[error("scenario catalog is empty")]
    EmptyCatalog,

    /// A template failed validation when the catalog was built
    #[error("invalid scenario template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    /// Starting values that cannot produce a playable game
    #[error("invalid game config: {0}")]
    InvalidConfig(String),

    /// A session operation was called in a phase that does not allow it
    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: String },
}

impl GameError {
    pub fn invalid_template(name: &str, reason: impl Into<String>) -> Self {
        GameError::InvalidTemplate {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
