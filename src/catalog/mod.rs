//! Scenario Catalog: the fixed set of business events a quarter can draw
//!
//! Two template families ship with the crate:
//! - `standard`: fixed effect vectors that move morale, satisfaction,
//!   technical debt and cash flow as well as the P&L (the canonical set)
//! - `classic`: parametric formulas that only touch revenue and costs,
//!   with a computed cost/benefit sentence as the outcome
//!
//! Both are variants of one `EffectSpec`, so the state machine never needs
//! to know which family a scenario came from.
//!
//! Revenue rule: `Receivables` templates (billing, collections, aging) never
//! change revenue. Revenue already recognized stays recognized; late money
//! shows up as a provision in costs and a hole in cash flow. `Catalog::new`
//! rejects any receivables template that breaks this.

mod classic;
mod standard;

use crate::error::{GameError, Result};
use crate::scenario::{placeholders, ScenarioInstance};
use crate::types::{Choice, EffectDeltas, Parameters};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Computes deltas and an explanation from a scenario's drawn parameters
pub type Formula = fn(&Parameters) -> Resolution;

/// How an option turns into deltas
#[derive(Clone, Copy)]
pub enum EffectSpec {
    /// Constant effect vector; the outcome is the option text plus the learning note
    Fixed(EffectDeltas),
    /// Deltas computed from the scenario parameters, with their own explanation
    Formula(Formula),
}

impl fmt::Debug for EffectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectSpec::Fixed(deltas) => f.debug_tuple("Fixed").field(deltas).finish(),
            EffectSpec::Formula(_) => f.write_str("Formula(..)"),
        }
    }
}

/// A resolved option: the deltas to apply and the sentence explaining them
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub deltas: EffectDeltas,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Delivery,
    People,
    Receivables,
    Investment,
    Growth,
}

/// Inclusive integer range a parameter is drawn from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ParameterRange {
    pub name: &'static str,
    pub min: i64,
    pub max: i64,
}

impl ParameterRange {
    pub const fn new(name: &'static str, min: i64, max: i64) -> Self {
        Self { name, min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One of the two responses a template offers
#[derive(Debug, Clone)]
pub struct ScenarioOption {
    /// Button label
    pub label: &'static str,
    /// What happened, shown as the first half of a fixed outcome
    pub outcome: &'static str,
    pub effect: EffectSpec,
}

impl ScenarioOption {
    pub fn fixed(label: &'static str, outcome: &'static str, deltas: EffectDeltas) -> Self {
        Self {
            label,
            outcome,
            effect: EffectSpec::Fixed(deltas),
        }
    }

    pub fn formula(label: &'static str, formula: Formula) -> Self {
        Self {
            label,
            outcome: "",
            effect: EffectSpec::Formula(formula),
        }
    }
}

/// A scenario definition. Immutable once the catalog is built.
#[derive(Debug, Clone)]
pub struct ScenarioTemplate {
    pub name: &'static str,
    pub kind: ScenarioKind,
    pub description_template: &'static str,
    /// Parameters drawn per instance. A parameter need not appear in the
    /// description (e.g. a negotiated bonus the player only learns later).
    pub parameter_ranges: Vec<ParameterRange>,
    /// Lesson appended to fixed-effect outcomes
    pub learning: &'static str,
    /// Indexed by `Choice`: `[A, B]`
    pub options: [ScenarioOption; 2],
}

impl ScenarioTemplate {
    pub fn option(&self, choice: Choice) -> &ScenarioOption {
        match choice {
            Choice::A => &self.options[0],
            Choice::B => &self.options[1],
        }
    }

    pub fn range(&self, name: &str) -> Option<&ParameterRange> {
        self.parameter_ranges.iter().find(|r| r.name == name)
    }

    /// Resolve an option against concrete parameters
    pub fn resolve(&self, choice: Choice, parameters: &Parameters) -> Resolution {
        let option = self.option(choice);
        match option.effect {
            EffectSpec::Fixed(deltas) => Resolution {
                deltas,
                explanation: format!("{} {}", option.outcome, self.learning).trim().to_string(),
            },
            EffectSpec::Formula(formula) => formula(parameters),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GameError::invalid_template(self.name, "name is empty"));
        }

        for range in &self.parameter_ranges {
            if range.min > range.max {
                return Err(GameError::invalid_template(
                    self.name,
                    format!("range for '{}' has min {} > max {}", range.name, range.min, range.max),
                ));
            }
        }

        for placeholder in placeholders(self.description_template) {
            if self.range(placeholder).is_none() {
                return Err(GameError::invalid_template(
                    self.name,
                    format!("placeholder '{{{}}}' has no parameter range", placeholder),
                ));
            }
        }

        if self.kind == ScenarioKind::Receivables {
            // Formulas are checked at both corners of the parameter space
            let corners = [
                self.corner_parameters(|r| r.min),
                self.corner_parameters(|r| r.max),
            ];
            for choice in Choice::ALL {
                for params in &corners {
                    if self.resolve(choice, params).deltas.revenue != 0.0 {
                        return Err(GameError::invalid_template(
                            self.name,
                            format!("receivables option {} changes revenue", choice),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn corner_parameters(&self, pick: impl Fn(&ParameterRange) -> i64) -> Parameters {
        self.parameter_ranges
            .iter()
            .map(|r| (r.name.to_string(), pick(r)))
            .collect()
    }
}

/// Which template family a game draws from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSet {
    /// Effect-vector templates
    #[default]
    Standard,
    /// Parametric-formula templates
    Classic,
    /// Both families
    Full,
}

/// Validated, non-empty list of templates
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<Arc<ScenarioTemplate>>,
}

impl Catalog {
    /// Build a catalog, validating every template
    pub fn new(templates: Vec<ScenarioTemplate>) -> Result<Self> {
        if templates.is_empty() {
            return Err(GameError::EmptyCatalog);
        }

        let mut names = HashSet::new();
        for template in &templates {
            template.validate()?;
            if !names.insert(template.name) {
                return Err(GameError::invalid_template(template.name, "duplicate template name"));
            }
        }

        tracing::debug!("Scenario catalog built with {} templates", templates.len());

        Ok(Self {
            templates: templates.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_set(set: CatalogSet) -> Result<Self> {
        let templates = match set {
            CatalogSet::Standard => standard::templates(),
            CatalogSet::Classic => classic::templates(),
            CatalogSet::Full => {
                let mut all = standard::templates();
                all.extend(classic::templates());
                all
            }
        };
        Self::new(templates)
    }

    pub fn standard() -> Result<Self> {
        Self::from_set(CatalogSet::Standard)
    }

    pub fn classic() -> Result<Self> {
        Self::from_set(CatalogSet::Classic)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[Arc<ScenarioTemplate>] {
        &self.templates
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ScenarioTemplate>> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Draw one scenario: a uniformly chosen template with uniformly drawn
    /// parameters. Reads no game state; only consumes `rng`.
    pub fn next_scenario<R: Rng + ?Sized>(&self, rng: &mut R) -> ScenarioInstance {
        // Never empty: `new` rejects empty template lists
        let template = &self.templates[rng.gen_range(0..self.templates.len())];
        ScenarioInstance::generate(Arc::clone(template), rng)
    }

    /// Serializable summaries for listing
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.templates.iter().map(|t| CatalogEntry::from(t.as_ref())).collect()
    }
}

/// Listing view of a template
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: ScenarioKind,
    pub description: String,
    pub parameters: Vec<ParameterRange>,
    pub options: Vec<CatalogOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogOption {
    pub choice: Choice,
    pub label: String,
    pub effect: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deltas: Option<EffectDeltas>,
}

impl From<&ScenarioTemplate> for CatalogEntry {
    fn from(template: &ScenarioTemplate) -> Self {
        let options = Choice::ALL
            .iter()
            .map(|&choice| {
                let option = template.option(choice);
                let (effect, deltas) = match option.effect {
                    EffectSpec::Fixed(d) => ("fixed", Some(d)),
                    EffectSpec::Formula(_) => ("formula", None),
                };
                CatalogOption {
                    choice,
                    label: option.label.to_string(),
                    effect,
                    deltas,
                }
            })
            .collect();

        Self {
            name: template.name.to_string(),
            kind: template.kind,
            description: template.description_template.to_string(),
            parameters: template.parameter_ranges.clone(),
            options,
        }
    }
}
