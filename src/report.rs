//! Reporting helpers for the rendering layer: money formatting, the
//! quarter table, chart series and JSON export.

use crate::config::GameConfig;
use crate::session::GameSession;
use crate::state::{FinancialState, HistorySnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Whole-dollar amount with thousands separators: `7500.0` -> `"7,500"`
pub fn money(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        return "0".to_string();
    }

    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// (quarter, margin %) points for a margin progression chart
pub fn margin_series(history: &[HistorySnapshot]) -> Vec<(u32, f64)> {
    history.iter().map(|h| (h.quarter, h.margin)).collect()
}

/// Plain-text quarter table
pub fn history_table(history: &[HistorySnapshot]) -> String {
    let mut out = format!(
        "{:>7}  {:<36} {:>6} {:>14} {:>14} {:>8} {:>8}\n",
        "Quarter", "Scenario", "Choice", "Revenue", "Costs", "Margin", "Score"
    );
    for h in history {
        out.push_str(&format!(
            "{:>7}  {:<36} {:>6} {:>14} {:>14} {:>7.1}% {:>8.1}\n",
            h.quarter,
            h.scenario_name,
            h.choice,
            money(h.revenue),
            money(h.costs),
            h.margin,
            h.score_at_time
        ));
    }
    out
}

/// One-line summary of the live metrics
pub fn metrics_line(state: &FinancialState) -> String {
    format!(
        "Revenue ${} | Costs ${} | Margin {:.2}% | Morale {:.1} | Satisfaction {:.1} | Debt {:.1} | Cash ${} | Score {:.1}",
        money(state.revenue()),
        money(state.costs()),
        state.margin(),
        state.team_morale(),
        state.client_satisfaction(),
        state.technical_debt(),
        money(state.cash_flow()),
        state.score()
    )
}

/// SHA-256 over the serialized history, hex encoded. Two seeded runs that
/// played the same game produce the same digest.
pub fn history_digest(history: &[HistorySnapshot]) -> String {
    let mut hasher = Sha256::new();
    // Serializing plain structs of numbers and strings cannot fail
    let bytes = serde_json::to_vec(history).unwrap_or_default();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}

/// Everything the rendering layer may want to save or chart
#[derive(Debug, Clone, Serialize)]
pub struct SessionExport<'a> {
    pub session_id: &'a str,
    pub started_at: DateTime<Utc>,
    pub exported_at: DateTime<Utc>,
    pub config: &'a GameConfig,
    pub state: &'a FinancialState,
    pub score: f64,
    pub history_digest: String,
}

impl<'a> SessionExport<'a> {
    pub fn from_session(session: &'a GameSession) -> Self {
        Self {
            session_id: session.id(),
            started_at: session.started_at(),
            exported_at: Utc::now(),
            config: session.config(),
            state: session.state(),
            score: session.score(),
            history_digest: history_digest(session.history()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Choice;

    fn snapshot(quarter: u32, margin: f64) -> HistorySnapshot {
        HistorySnapshot {
            quarter,
            scenario_name: "Scope Creep".to_string(),
            choice: Choice::A,
            revenue: 5_000_000.0,
            costs: 4_107_500.0,
            margin,
            team_morale: 4.0,
            client_satisfaction: 4.0,
            technical_debt: 0.0,
            cash_flow: 500_000.0,
            game_over: false,
            score_at_time: 328.5,
        }
    }

    #[test]
    fn test_money() {
        assert_eq!(money(7_500.0), "7,500");
        assert_eq!(money(8_625.4), "8,625");
        assert_eq!(money(999.0), "999");
        assert_eq!(money(1_000.0), "1,000");
        assert_eq!(money(4_107_500.0), "4,107,500");
        assert_eq!(money(-250_000.0), "-250,000");
        assert_eq!(money(-0.3), "0");
    }

    #[test]
    fn test_margin_series() {
        let history = vec![snapshot(1, 17.85), snapshot(2, 16.2)];
        assert_eq!(margin_series(&history), vec![(1, 17.85), (2, 16.2)]);
    }

    #[test]
    fn test_history_table() {
        let table = history_table(&[snapshot(1, 17.85)]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Quarter"));
        assert!(lines[1].contains("Scope Creep"));
        assert!(lines[1].contains("4,107,500"));
        assert!(lines[1].contains("17.9%"));
    }

    #[test]
    fn test_history_digest() {
        let a = history_digest(&[snapshot(1, 17.85)]);
        let b = history_digest(&[snapshot(1, 17.85)]);
        let c = history_digest(&[snapshot(1, 17.86)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_session_export_json() {
        let session = GameSession::new(GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        })
        .unwrap();
        let json = SessionExport::from_session(&session).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["session_id"], session.id());
        assert_eq!(value["state"]["quarter"], 1);
        assert_eq!(value["config"]["catalog"], "standard");
        assert!(value["state"]["history"].as_array().unwrap().is_empty());
    }
}
