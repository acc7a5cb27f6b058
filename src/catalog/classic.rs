//! Parametric-formula templates: revenue and costs only.
//!
//! Deltas are computed from the drawn parameters and explained with a
//! cost/benefit sentence. Optional bonus content next to the standard set.

use super::{ParameterRange, Resolution, ScenarioKind, ScenarioOption, ScenarioTemplate};
use crate::report::money;
use crate::types::{EffectDeltas, Parameters};

/// Blended hourly rate used for rework and overtime
const HOURLY_RATE: f64 = 150.0;
const REWORK_RATE: f64 = 120.0;
const OVERTIME_MULTIPLIER: f64 = 1.5;
const CHANGE_ORDER_MARKUP: f64 = 1.15;
const PROVISION_RATE: f64 = 0.05;

fn param(params: &Parameters, name: &str) -> f64 {
    params.get(name).copied().unwrap_or(0) as f64
}

fn resolution(revenue: f64, costs: f64, explanation: String) -> Resolution {
    Resolution {
        deltas: EffectDeltas {
            revenue,
            costs,
            ..EffectDeltas::NONE
        },
        explanation,
    }
}

pub(super) fn templates() -> Vec<ScenarioTemplate> {
    vec![
        scope_creep(),
        resource_investment(),
        timeline_pressure(),
        quality_issue(),
        receivable(
            "Invoice Submitted Late",
            "Invoices worth ${amount} were submitted late. Cash flow may be impacted.",
            200_000,
            ("Expedite submissions", "Accept delays"),
        ),
        receivable(
            "Invoice Paid Late",
            "Outstanding invoices worth ${amount} delayed 80-90 days. Provision for doubtful debts needed.",
            200_000,
            ("Follow up aggressively", "Wait for payment"),
        ),
        receivable(
            "Revenue Recognized But Not Billed",
            "Revenue of ${amount} recognized but not yet billed. Aging may require cost provision.",
            150_000,
            ("Ensure billing immediately", "Defer billing"),
        ),
        receivable(
            "Outstanding Invoices 80-90 days",
            "Invoices worth ${amount} are 80-90 days outstanding. Risk of provisions for bad debt.",
            200_000,
            ("Implement stricter collection", "Maintain current approach"),
        ),
    ]
}

fn scope_creep_cost(params: &Parameters) -> f64 {
    param(params, "extra_hours") * param(params, "hourly_rate")
}

fn scope_creep() -> ScenarioTemplate {
    fn absorb(params: &Parameters) -> Resolution {
        let extra_cost = scope_creep_cost(params);
        resolution(
            0.0,
            extra_cost,
            format!(
                "Absorbed extra work costing ${}, increasing costs and lowering margin.",
                money(extra_cost)
            ),
        )
    }

    fn change_order(params: &Parameters) -> Resolution {
        let extra_cost = scope_creep_cost(params);
        let billed = (extra_cost * CHANGE_ORDER_MARKUP).trunc();
        resolution(
            billed,
            extra_cost,
            format!(
                "Change order added ${} revenue, costs increased by ${}.",
                money(billed),
                money(extra_cost)
            ),
        )
    }

    ScenarioTemplate {
        name: "Scope Creep",
        kind: ScenarioKind::Delivery,
        description_template: "Client requests extra features beyond original scope, adding {extra_hours} hours of work at ${hourly_rate}/hour.",
        parameter_ranges: vec![
            ParameterRange::new("extra_hours", 20, 80),
            ParameterRange::new("hourly_rate", 120, 180),
        ],
        learning: "",
        options: [
            ScenarioOption::formula("Absorb the work", absorb),
            ScenarioOption::formula("Request change order", change_order),
        ],
    }
}

fn resource_investment() -> ScenarioTemplate {
    fn approve(params: &Parameters) -> Resolution {
        let invest = param(params, "cost");
        resolution(
            0.0,
            invest,
            format!(
                "Invested ${} in tools/training, increasing costs but may improve future efficiency.",
                money(invest)
            ),
        )
    }

    fn defer(_: &Parameters) -> Resolution {
        resolution(
            0.0,
            0.0,
            "Deferred investment, margin protected but team efficiency may suffer.".to_string(),
        )
    }

    ScenarioTemplate {
        name: "Resource Investment",
        kind: ScenarioKind::Investment,
        description_template: "Invest ${cost} in tools or training to improve team efficiency.",
        parameter_ranges: vec![ParameterRange::new("cost", 5_000, 15_000)],
        learning: "",
        options: [
            ScenarioOption::formula("Approve investment", approve),
            ScenarioOption::formula("Defer to protect margin", defer),
        ],
    }
}

fn timeline_pressure() -> ScenarioTemplate {
    fn overtime(params: &Parameters) -> Resolution {
        let overtime_cost = (param(params, "overtime_hours") * HOURLY_RATE * OVERTIME_MULTIPLIER).trunc();
        resolution(
            0.0,
            overtime_cost,
            format!(
                "Overtime costs ${} incurred, meeting deadline but margin drops.",
                money(overtime_cost)
            ),
        )
    }

    fn negotiate(params: &Parameters) -> Resolution {
        let bonus = param(params, "bonus");
        resolution(
            bonus,
            0.0,
            format!(
                "Negotiated timeline; minor revenue bonus ${}, avoided overtime costs.",
                money(bonus)
            ),
        )
    }

    ScenarioTemplate {
        name: "Timeline Pressure",
        kind: ScenarioKind::Delivery,
        description_template: "Client wants delivery {weeks} weeks earlier, requiring {overtime_hours} hours overtime at 1.5x rate.",
        // `bonus` is drawn with the scenario but only revealed by the outcome
        parameter_ranges: vec![
            ParameterRange::new("weeks", 2, 6),
            ParameterRange::new("overtime_hours", 80, 200),
            ParameterRange::new("bonus", 5_000, 15_000),
        ],
        learning: "",
        options: [
            ScenarioOption::formula("Accept overtime", overtime),
            ScenarioOption::formula("Negotiate timeline", negotiate),
        ],
    }
}

fn quality_issue() -> ScenarioTemplate {
    fn proper(params: &Parameters) -> Resolution {
        let cost = param(params, "fix_hours") * REWORK_RATE;
        resolution(0.0, cost, format!("Proper fix costs ${}, quality improved.", money(cost)))
    }

    fn quick(params: &Parameters) -> Resolution {
        let cost = param(params, "quick_hours") * REWORK_RATE;
        resolution(
            0.0,
            cost,
            format!("Quick fix costs ${}, but may incur future debt.", money(cost)),
        )
    }

    ScenarioTemplate {
        name: "Quality Issue",
        kind: ScenarioKind::Delivery,
        description_template: "Bugs found require {fix_hours} hours to fix properly, or {quick_hours} hours for quick workaround.",
        parameter_ranges: vec![
            ParameterRange::new("fix_hours", 40, 100),
            ParameterRange::new("quick_hours", 10, 25),
        ],
        learning: "",
        options: [
            ScenarioOption::formula("Proper fix", proper),
            ScenarioOption::formula("Quick fix", quick),
        ],
    }
}

/// Billing and aging events. Either choice books a 5% provision and never
/// touches revenue.
fn provision(params: &Parameters) -> Resolution {
    let provision = (param(params, "amount") * PROVISION_RATE).trunc();
    resolution(
        0.0,
        provision,
        format!(
            "Provisioned 5% (${}) of invoice amount due to late submission/payment or aging.",
            money(provision)
        ),
    )
}

fn receivable(
    name: &'static str,
    description_template: &'static str,
    max_amount: i64,
    labels: (&'static str, &'static str),
) -> ScenarioTemplate {
    ScenarioTemplate {
        name,
        kind: ScenarioKind::Receivables,
        description_template,
        parameter_ranges: vec![ParameterRange::new("amount", 50_000, max_amount)],
        learning: "",
        options: [
            ScenarioOption::formula(labels.0, provision),
            ScenarioOption::formula(labels.1, provision),
        ],
    }
}
