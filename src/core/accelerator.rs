use serde::Serialize;

use super::format::format_inr;
use super::solver::{ContributionTarget, required_monthly_contribution};
use super::types::{ConfidenceLabel, InputProfile, ProjectionResult};

pub const ADEQUACY_DISCLAIMER: &str = "This confidence score is a heuristic summary of your \
inputs, not a statistical probability of success.";

const CORPUS_WEIGHT: f64 = 0.40;
const TIME_WEIGHT: f64 = 0.15;
const RETURN_WEIGHT: f64 = 0.20;
const SIP_WEIGHT: f64 = 0.15;
const INFLATION_WEIGHT: f64 = 0.10;

/// Share of the remaining horizon an extra SIP is assumed to pull forward.
const TIMELINE_IMPACT_FACTOR: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdequacySubScores {
    pub corpus_coverage: u32,
    pub time_buffer: u32,
    pub return_sensitivity: u32,
    pub sip_adequacy: u32,
    pub inflation_awareness: u32,
}

impl AdequacySubScores {
    const ALIGNED: Self = Self {
        corpus_coverage: 100,
        time_buffer: 100,
        return_sensitivity: 100,
        sip_adequacy: 100,
        inflation_awareness: 100,
    };

    fn weighted_total(self) -> u32 {
        let total = f64::from(self.corpus_coverage) * CORPUS_WEIGHT
            + f64::from(self.time_buffer) * TIME_WEIGHT
            + f64::from(self.return_sensitivity) * RETURN_WEIGHT
            + f64::from(self.sip_adequacy) * SIP_WEIGHT
            + f64::from(self.inflation_awareness) * INFLATION_WEIGHT;
        total.round().clamp(0.0, 100.0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceleratorResult {
    pub required_monthly_sip: f64,
    pub accelerator_amount: f64,
    pub current_sip: f64,
    pub years_to_retirement: u32,
    pub confidence_score: u32,
    pub confidence_label: ConfidenceLabel,
    pub sub_scores: AdequacySubScores,
    pub action_summary: String,
    pub disclaimer: &'static str,
}

pub fn compute_accelerator(profile: &InputProfile, projection: &ProjectionResult) -> AcceleratorResult {
    let years_to_retirement = profile.years_to_retirement();
    let current_sip = profile.monthly_sip;

    if years_to_retirement == 0 || projection.required_corpus <= 0.0 {
        return AcceleratorResult {
            required_monthly_sip: current_sip,
            accelerator_amount: 0.0,
            current_sip,
            years_to_retirement,
            confidence_score: 100,
            confidence_label: ConfidenceLabel::Strong,
            sub_scores: AdequacySubScores::ALIGNED,
            action_summary: "Your plan is already aligned with your retirement goals.".to_string(),
            disclaimer: ADEQUACY_DISCLAIMER,
        };
    }

    let months = profile.months_to_retirement();
    let required_monthly_sip = required_monthly_contribution(ContributionTarget {
        target_corpus: projection.required_corpus,
        existing_corpus: 0.0,
        annual_return_pct: profile.expected_returns,
        months,
    });
    let accelerator_amount = (required_monthly_sip - current_sip).round().max(0.0);

    let sub_scores = AdequacySubScores {
        corpus_coverage: corpus_coverage_score(projection.expected_corpus, projection.required_corpus),
        time_buffer: time_buffer_score(years_to_retirement),
        return_sensitivity: return_sensitivity_score(profile.expected_returns - profile.inflation_rate),
        sip_adequacy: sip_adequacy_score(accelerator_amount, current_sip),
        inflation_awareness: if profile.inflation_rate > 0.0 { 100 } else { 50 },
    };
    let confidence_score = sub_scores.weighted_total();

    AcceleratorResult {
        required_monthly_sip: required_monthly_sip.round(),
        accelerator_amount,
        current_sip,
        years_to_retirement,
        confidence_score,
        confidence_label: ConfidenceLabel::from_score(confidence_score, 75, 50),
        sub_scores,
        action_summary: action_summary(accelerator_amount, current_sip, months),
        disclaimer: ADEQUACY_DISCLAIMER,
    }
}

fn corpus_coverage_score(expected: f64, required: f64) -> u32 {
    if expected <= 0.0 || required <= 0.0 {
        return 0;
    }
    (expected / required * 100.0).round().min(100.0) as u32
}

fn time_buffer_score(years: u32) -> u32 {
    match years {
        30.. => 100,
        20..=29 => 80,
        10..=19 => 60,
        _ => 30,
    }
}

fn return_sensitivity_score(real_return: f64) -> u32 {
    if real_return >= 8.0 {
        100
    } else if real_return >= 6.0 {
        80
    } else if real_return >= 4.0 {
        60
    } else if real_return >= 2.0 {
        40
    } else {
        20
    }
}

fn sip_adequacy_score(accelerator_amount: f64, current_sip: f64) -> u32 {
    if accelerator_amount <= 0.0 {
        return 100;
    }
    if current_sip <= 0.0 {
        return 30;
    }
    let ratio = accelerator_amount / current_sip;
    if ratio <= 0.1 {
        90
    } else if ratio <= 0.25 {
        70
    } else if ratio <= 0.5 {
        50
    } else {
        30
    }
}

fn action_summary(accelerator_amount: f64, current_sip: f64, months_to_retirement: u32) -> String {
    if accelerator_amount <= 0.0 {
        return "Your current SIP is sufficient to reach your retirement goal.".to_string();
    }
    let amount = format_inr(accelerator_amount);
    if current_sip <= 0.0 {
        return format!("Starting a SIP of {amount}/month puts your retirement goal within reach.");
    }

    let months_impact = (accelerator_amount / current_sip
        * f64::from(months_to_retirement)
        * TIMELINE_IMPACT_FACTOR)
        .round() as u64;
    let years = months_impact / 12;
    let months = months_impact % 12;

    match (years, months) {
        (0, _) => format!(
            "Adding {amount}/month may reduce your timeline by approximately {months_impact} months."
        ),
        (_, 0) => format!(
            "Adding {amount}/month may reduce your timeline by approximately {years} years."
        ),
        _ => format!(
            "Adding {amount}/month may reduce your timeline by approximately {years} years and {months} months."
        ),
    }
}
