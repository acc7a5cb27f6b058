//! Effect-vector templates: the canonical catalog.
//!
//! Every option is a constant delta vector. Parameters only colour the
//! description; the consequences are the same whatever was drawn.

use super::{ParameterRange, ScenarioKind, ScenarioOption, ScenarioTemplate};
use crate::types::{EffectDeltas, Metric::*};

pub(super) fn templates() -> Vec<ScenarioTemplate> {
    vec![
        feature_creep(),
        early_delivery_request(),
        release_defects(),
        key_developer_resigns(),
        team_burnout(),
        overdue_client_payment(),
        unbilled_work_in_progress(),
        production_outage(),
        training_investment(),
        upsell_opportunity(),
    ]
}

fn feature_creep() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Feature Creep",
        kind: ScenarioKind::Delivery,
        description_template: "The client asks for {extra_features} extra features mid-sprint, roughly {extra_hours} hours of unplanned work.",
        parameter_ranges: vec![
            ParameterRange::new("extra_features", 2, 6),
            ParameterRange::new("extra_hours", 40, 160),
        ],
        learning: "Unbilled scope is the most common silent margin leak; a change order turns goodwill into revenue.",
        options: [
            ScenarioOption::fixed(
                "Absorb the work",
                "The team absorbed the extra features without a change order. The client is delighted, but the hours came straight out of margin.",
                EffectDeltas::from_pairs(&[
                    (Costs, 45_000.0),
                    (Morale, -0.3),
                    (Satisfaction, 0.3),
                    (Debt, 0.5),
                    (CashFlow, -45_000.0),
                ]),
            ),
            ScenarioOption::fixed(
                "Raise a change order",
                "A change order was signed for the extra features. Revenue and costs both grew, and the client grumbled about the paperwork.",
                EffectDeltas::from_pairs(&[
                    (Revenue, 60_000.0),
                    (Costs, 40_000.0),
                    (Satisfaction, -0.2),
                    (CashFlow, 20_000.0),
                ]),
            ),
        ],
    }
}

fn early_delivery_request() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Early Delivery Request",
        kind: ScenarioKind::Delivery,
        description_template: "The client wants the release {weeks} weeks early, which needs about {overtime_hours} hours of overtime at 1.5x.",
        parameter_ranges: vec![
            ParameterRange::new("weeks", 2, 6),
            ParameterRange::new("overtime_hours", 80, 200),
        ],
        learning: "Overtime is paid at a premium and borrowed from future productivity; a renegotiated date usually costs less than it feels.",
        options: [
            ScenarioOption::fixed(
                "Accept overtime",
                "The team worked overtime and hit the earlier date. Costs rose and the shortcuts taken will need revisiting.",
                EffectDeltas::from_pairs(&[
                    (Costs, 35_000.0),
                    (Morale, -0.6),
                    (Satisfaction, 0.4),
                    (Debt, 0.3),
                    (CashFlow, -35_000.0),
                ]),
            ),
            ScenarioOption::fixed(
                "Negotiate the timeline",
                "You held the original date. The client was disappointed, the team was relieved.",
                EffectDeltas::from_pairs(&[(Satisfaction, -0.3), (Morale, 0.1)]),
            ),
        ],
    }
}

fn release_defects() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Release Defects",
        kind: ScenarioKind::Delivery,
        description_template: "Testing found {bug_count} defects in the release candidate. A proper fix needs {fix_hours} hours; a workaround needs {quick_hours}.",
        parameter_ranges: vec![
            ParameterRange::new("bug_count", 3, 15),
            ParameterRange::new("fix_hours", 40, 100),
            ParameterRange::new("quick_hours", 10, 25),
        ],
        learning: "Cheap fixes are a loan against the codebase; technical debt drags every future quarter's score.",
        options: [
            ScenarioOption::fixed(
                "Proper fix",
                "The defects were fixed at the root. It cost more this quarter and paid down some technical debt.",
                EffectDeltas::from_pairs(&[
                    (Costs, 25_000.0),
                    (Debt, -0.5),
                    (Satisfaction, 0.2),
                    (CashFlow, -25_000.0),
                ]),
            ),
            ScenarioOption::fixed(
                "Quick workaround",
                "A workaround shipped on time and cheaply. The underlying problems are still there.",
                EffectDeltas::from_pairs(&[
                    (Costs, 6_000.0),
                    (Debt, 1.0),
                    (Satisfaction, -0.1),
                    (CashFlow, -6_000.0),
                ]),
            ),
        ],
    }
}

fn key_developer_resigns() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Key Developer Resigns",
        kind: ScenarioKind::People,
        description_template: "A senior developer with {tenure_years} years on the account has resigned. A replacement would need {ramp_weeks} weeks to ramp up.",
        parameter_ranges: vec![
            ParameterRange::new("tenure_years", 2, 9),
            ParameterRange::new("ramp_weeks", 4, 12),
        ],
        learning: "Knowledge walking out of the door is expensive; replacement costs usually exceed retention costs.",
        options: [
            ScenarioOption::fixed(
                "Counter-offer",
                "The developer accepted a raise and stayed. Payroll went up, the team kept its expert.",
                EffectDeltas::from_pairs(&[(Costs, 30_000.0), (Morale, 0.2), (CashFlow, -30_000.0)]),
            ),
            ScenarioOption::fixed(
                "Backfill with a contractor",
                "A contractor filled the seat at a premium rate. Context was lost and the client noticed.",
                EffectDeltas::from_pairs(&[
                    (Costs, 55_000.0),
                    (Morale, -0.3),
                    (Satisfaction, -0.2),
                    (Debt, 0.5),
                    (CashFlow, -55_000.0),
                ]),
            ),
        ],
    }
}

fn team_burnout() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Team Burnout",
        kind: ScenarioKind::People,
        description_template: "{overtime_weeks} straight weeks of overtime have left {affected_staff} people showing signs of burnout.",
        parameter_ranges: vec![
            ParameterRange::new("overtime_weeks", 3, 10),
            ParameterRange::new("affected_staff", 2, 8),
        ],
        learning: "Morale is a leading indicator: it feeds the score directly and quietly erodes delivery quality.",
        options: [
            ScenarioOption::fixed(
                "Give recovery time",
                "You slowed delivery so people could recover. Some billable hours were lost this quarter.",
                EffectDeltas::from_pairs(&[(Revenue, -40_000.0), (Morale, 0.8), (CashFlow, -40_000.0)]),
            ),
            ScenarioOption::fixed(
                "Push through",
                "Deadlines were met, but the team is running on empty and mistakes are creeping in.",
                EffectDeltas::from_pairs(&[(Morale, -0.7), (Satisfaction, -0.2), (Debt, 0.5)]),
            ),
        ],
    }
}

fn overdue_client_payment() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Overdue Client Payment",
        kind: ScenarioKind::Receivables,
        description_template: "Invoices worth ${amount} are {days_late} days overdue. A provision for doubtful debts may be needed.",
        parameter_ranges: vec![
            ParameterRange::new("amount", 150_000, 300_000),
            ParameterRange::new("days_late", 60, 90),
        ],
        learning: "Revenue already recognized does not change when the client pays late; the damage lands in provisions and cash.",
        options: [
            ScenarioOption::fixed(
                "Follow up aggressively",
                "Collections chased the invoices and most of the cash came in. The client relationship took a small hit.",
                EffectDeltas::from_pairs(&[(Costs, 5_000.0), (Satisfaction, -0.3), (CashFlow, 120_000.0)]),
            ),
            ScenarioOption::fixed(
                "Wait for payment",
                "You waited. A provision was booked and the cash gap widened.",
                EffectDeltas::from_pairs(&[(Costs, 7_500.0), (CashFlow, -60_000.0)]),
            ),
        ],
    }
}

fn unbilled_work_in_progress() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Unbilled Work in Progress",
        kind: ScenarioKind::Receivables,
        description_template: "${amount} of work has been recognized as revenue but not billed, and has been ageing for {aging_days} days.",
        parameter_ranges: vec![
            ParameterRange::new("amount", 100_000, 250_000),
            ParameterRange::new("aging_days", 30, 120),
        ],
        learning: "Recognized-but-unbilled revenue is only as good as the invoice behind it; ageing WIP needs a cost provision.",
        options: [
            ScenarioOption::fixed(
                "Bill immediately",
                "Invoices went out the same week. Cash arrived and the client queried a few line items.",
                EffectDeltas::from_pairs(&[(Costs, 2_000.0), (Satisfaction, -0.1), (CashFlow, 90_000.0)]),
            ),
            ScenarioOption::fixed(
                "Defer billing",
                "Billing slipped another month. The ageing balance attracted a provision and cash stayed tight.",
                EffectDeltas::from_pairs(&[(Costs, 6_000.0), (CashFlow, -40_000.0)]),
            ),
        ],
    }
}

fn production_outage() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Production Outage",
        kind: ScenarioKind::Delivery,
        description_template: "A production outage lasted {outage_hours} hours and affected {affected_users} users.",
        parameter_ranges: vec![
            ParameterRange::new("outage_hours", 1, 12),
            ParameterRange::new("affected_users", 500, 20_000),
        ],
        learning: "Incidents are cheapest to learn from right after they happen; skipped post-mortems come back as repeat outages.",
        options: [
            ScenarioOption::fixed(
                "Post-mortem and hardening",
                "A full post-mortem led to monitoring and resilience work. The client appreciated the transparency.",
                EffectDeltas::from_pairs(&[
                    (Costs, 40_000.0),
                    (Debt, -1.0),
                    (Satisfaction, 0.3),
                    (Morale, -0.1),
                    (CashFlow, -40_000.0),
                ]),
            ),
            ScenarioOption::fixed(
                "Patch and move on",
                "A hotfix restored service. The root cause is still in the system and the client is nervous.",
                EffectDeltas::from_pairs(&[
                    (Costs, 8_000.0),
                    (Debt, 1.5),
                    (Satisfaction, -0.5),
                    (CashFlow, -8_000.0),
                ]),
            ),
        ],
    }
}

fn training_investment() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Training Investment",
        kind: ScenarioKind::Investment,
        description_template: "A vendor offers a {course_days}-day certification program for {seats} engineers.",
        parameter_ranges: vec![
            ParameterRange::new("course_days", 2, 5),
            ParameterRange::new("seats", 4, 12),
        ],
        learning: "Investment shows up as cost now and as capability later; margin-only thinking always defers it.",
        options: [
            ScenarioOption::fixed(
                "Approve the training",
                "The team got certified. Costs rose this quarter and engineers are applying better practices.",
                EffectDeltas::from_pairs(&[
                    (Costs, 20_000.0),
                    (Morale, 0.4),
                    (Debt, -0.5),
                    (CashFlow, -20_000.0),
                ]),
            ),
            ScenarioOption::fixed(
                "Defer to protect margin",
                "Margin was protected. Engineers who asked for the training feel overlooked.",
                EffectDeltas::from_pairs(&[(Morale, -0.2)]),
            ),
        ],
    }
}

fn upsell_opportunity() -> ScenarioTemplate {
    ScenarioTemplate {
        name: "Upsell Opportunity",
        kind: ScenarioKind::Growth,
        description_template: "The client is interested in a {module_count}-module extension to the current contract, starting in {start_weeks} weeks.",
        parameter_ranges: vec![
            ParameterRange::new("module_count", 1, 4),
            ParameterRange::new("start_weeks", 2, 8),
        ],
        learning: "Growth is only healthy if the team can staff it; revenue bought with overload is paid back in morale and debt.",
        options: [
            ScenarioOption::fixed(
                "Pursue the extension",
                "The extension was signed. Revenue jumped and the team is stretched across more work.",
                EffectDeltas::from_pairs(&[
                    (Revenue, 150_000.0),
                    (Costs, 110_000.0),
                    (Morale, -0.2),
                    (Debt, 0.5),
                    (CashFlow, 40_000.0),
                ]),
            ),
            ScenarioOption::fixed(
                "Focus on current delivery",
                "You declined for now and doubled down on the existing scope. The client valued the focus.",
                EffectDeltas::from_pairs(&[(Satisfaction, 0.2), (Morale, 0.1)]),
            ),
        ],
    }
}
