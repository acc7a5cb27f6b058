//! Scenario instances: one concrete draw of a template per quarter

use crate::catalog::ScenarioTemplate;
use crate::error::{GameError, Result};
use crate::types::{Choice, Parameters};
use rand::Rng;
use std::sync::Arc;

/// A template with its parameters drawn and its description rendered.
/// Consumed by exactly one `apply`.
#[derive(Debug, Clone)]
pub struct ScenarioInstance {
    pub template: Arc<ScenarioTemplate>,
    pub parameters: Parameters,
    pub rendered_text: String,
}

impl ScenarioInstance {
    /// Draw every parameter uniformly from its inclusive range and render
    pub fn generate<R: Rng + ?Sized>(template: Arc<ScenarioTemplate>, rng: &mut R) -> Self {
        let parameters: Parameters = template
            .parameter_ranges
            .iter()
            .map(|range| (range.name.to_string(), rng.gen_range(range.min..=range.max)))
            .collect();
        let rendered_text = render(template.description_template, &parameters);

        Self {
            template,
            parameters,
            rendered_text,
        }
    }

    /// Build an instance from known parameters (replays, tests, scripted tutorials).
    /// Every declared parameter must be present and inside its range.
    pub fn with_parameters(template: Arc<ScenarioTemplate>, parameters: Parameters) -> Result<Self> {
        for range in &template.parameter_ranges {
            match parameters.get(range.name) {
                Some(&value) if range.contains(value) => {}
                Some(&value) => {
                    return Err(GameError::invalid_template(
                        template.name,
                        format!(
                            "parameter '{}' = {} outside [{}, {}]",
                            range.name, value, range.min, range.max
                        ),
                    ))
                }
                None => {
                    return Err(GameError::invalid_template(
                        template.name,
                        format!("missing parameter '{}'", range.name),
                    ))
                }
            }
        }

        let rendered_text = render(template.description_template, &parameters);
        Ok(Self {
            template,
            parameters,
            rendered_text,
        })
    }

    pub fn name(&self) -> &'static str {
        self.template.name
    }

    pub fn option_label(&self, choice: Choice) -> &'static str {
        self.template.option(choice).label
    }
}

/// Names inside `{...}` in a description template, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                found.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    found
}

/// Substitute each parameter into its `{name}` placeholder
pub fn render(template: &str, parameters: &Parameters) -> String {
    parameters.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), &value.to_string())
    })
}
