use std::fmt;

use serde::Serialize;

use super::error::validate_profile;
use super::format::{format_inr_grouped, round_thousand};
use super::solver::growth_factor;
use super::types::{DepletionAge, FreedomAge, InputProfile, ProjectionResult};

/// Severity of a blind spot, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    AtRisk,
    NeedsAttention,
    OnTrack,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::AtRisk => "at-risk",
            Severity::NeedsAttention => "needs-attention",
            Severity::OnTrack => "on-track",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::AtRisk => "At Risk",
            Severity::NeedsAttention => "Needs Attention",
            Severity::OnTrack => "On Track",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlindSpotKind {
    RetirementTimeline,
    CorpusGap,
    Sustainability,
    SipAdequacy,
    InflationLifestyle,
}

impl BlindSpotKind {
    pub const ALL: [BlindSpotKind; 5] = [
        BlindSpotKind::RetirementTimeline,
        BlindSpotKind::CorpusGap,
        BlindSpotKind::Sustainability,
        BlindSpotKind::SipAdequacy,
        BlindSpotKind::InflationLifestyle,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BlindSpotKind::RetirementTimeline => "retirement-timeline",
            BlindSpotKind::CorpusGap => "corpus-gap",
            BlindSpotKind::Sustainability => "sustainability",
            BlindSpotKind::SipAdequacy => "sip-adequacy",
            BlindSpotKind::InflationLifestyle => "inflation-lifestyle",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BlindSpotKind::RetirementTimeline => "Retirement Timeline Risk",
            BlindSpotKind::CorpusGap => "Corpus Shortfall Risk",
            BlindSpotKind::Sustainability => "Sustainability Risk",
            BlindSpotKind::SipAdequacy => "Savings Adequacy Risk",
            BlindSpotKind::InflationLifestyle => "Inflation Risk",
        }
    }

    pub fn impact(&self) -> &'static str {
        match self {
            BlindSpotKind::RetirementTimeline => {
                "Delaying retirement affects not just finances, but freedom, health, and quality of life during your most valuable years."
            }
            BlindSpotKind::CorpusGap => {
                "Even small gaps today can become significant shortfalls over decades, potentially reducing retirement lifestyle choices."
            }
            BlindSpotKind::Sustainability => {
                "Running out of funds later in life creates dependency risk when you have fewer options to recover."
            }
            BlindSpotKind::SipAdequacy => {
                "Insufficient savings today compounds into large future gaps, making later corrections much more difficult."
            }
            BlindSpotKind::InflationLifestyle => {
                "Inflation silently erodes purchasing power, meaning today's comfortable expenses may not sustain tomorrow's lifestyle."
            }
        }
    }

    pub fn resolution(&self, severity: Severity) -> &'static str {
        use BlindSpotKind::*;
        use Severity::*;
        match (self, severity) {
            (RetirementTimeline, AtRisk) => {
                "Consider adjusting your retirement age, increasing monthly contributions, or revisiting expected returns."
            }
            (RetirementTimeline, NeedsAttention) => {
                "Small improvements in savings rate or investment horizon can better align your timeline."
            }
            (RetirementTimeline, OnTrack) => {
                "Your current timeline appears sustainable under these assumptions."
            }
            (CorpusGap, AtRisk) => {
                "This gap can be closed by increasing monthly SIP, extending investment horizon, or revisiting return assumptions."
            }
            (CorpusGap, NeedsAttention) => {
                "Minor adjustments to contributions or timeline can help close this gap."
            }
            (CorpusGap, OnTrack) => {
                "Your expected corpus meets your retirement needs under current assumptions."
            }
            (Sustainability, AtRisk) => {
                "Consider creating a withdrawal buffer, planning for lower expenses, or adding a post-retirement income stream."
            }
            (Sustainability, NeedsAttention) => {
                "Adding a safety margin to your withdrawal plan can improve sustainability."
            }
            (Sustainability, OnTrack) => {
                "Your withdrawal strategy appears sustainable through retirement."
            }
            (SipAdequacy, AtRisk) => {
                "Gradually increasing your monthly SIP or starting earlier can materially improve outcomes."
            }
            (SipAdequacy, NeedsAttention) => {
                "Small, regular increases to your SIP can compound significantly over time."
            }
            (SipAdequacy, OnTrack) => "Your current SIP appears adequate for your retirement goals.",
            (InflationLifestyle, AtRisk) => {
                "Plan for conservative inflation assumptions and consider building an inflation-protected income stream."
            }
            (InflationLifestyle, NeedsAttention) => {
                "Regularly reviewing and adjusting for inflation helps maintain lifestyle expectations."
            }
            (InflationLifestyle, OnTrack) => {
                "Your inflation planning appears aligned with lifestyle expectations."
            }
        }
    }

    pub fn edit_targets(&self) -> &'static [&'static str] {
        match self {
            BlindSpotKind::RetirementTimeline => &["monthlySIP", "retirementAge", "expectedReturns"],
            BlindSpotKind::CorpusGap => &["monthlySIP", "expectedReturns", "sipIncreaseRate"],
            BlindSpotKind::Sustainability => {
                &["monthlyExpenses", "inflationRate", "retirementReturns"]
            }
            BlindSpotKind::SipAdequacy => &["monthlySIP", "sipIncreaseRate"],
            BlindSpotKind::InflationLifestyle => &["inflationRate", "monthlyExpenses"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum SpotValue {
    Currency(f64),
    Age(u32),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindSpot {
    #[serde(rename = "id")]
    pub kind: BlindSpotKind,
    pub title: &'static str,
    #[serde(flatten)]
    pub value: SpotValue,
    pub raw_value: Option<f64>,
    pub severity: Severity,
    pub severity_label: &'static str,
    pub message: String,
    pub impact: &'static str,
    pub resolution: &'static str,
    pub edit_targets: &'static [&'static str],
    pub is_resolved: bool,
}

impl BlindSpot {
    fn new(kind: BlindSpotKind, value: SpotValue, raw_value: Option<f64>, severity: Severity, message: String) -> Self {
        Self {
            kind,
            title: kind.title(),
            value,
            raw_value,
            severity,
            severity_label: severity.label(),
            message,
            impact: kind.impact(),
            resolution: kind.resolution(severity),
            edit_targets: kind.edit_targets(),
            is_resolved: severity == Severity::OnTrack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindSpotSummary {
    pub total: usize,
    pub resolved: usize,
    pub at_risk: usize,
    pub message: String,
}

pub fn compute_blind_spots(profile: &InputProfile, projection: &ProjectionResult) -> Option<Vec<BlindSpot>> {
    if let Err(err) = validate_profile(profile) {
        log::warn!("blind spot analysis skipped, insufficient data: {err}");
        return None;
    }
    if !projection.is_finite() {
        log::warn!("blind spot analysis skipped, projection metrics are not finite");
        return None;
    }

    Some(vec![
        retirement_timeline(profile, projection.freedom_age),
        corpus_gap(projection.expected_corpus, projection.required_corpus),
        sustainability(projection.depletion_age),
        sip_adequacy(projection.sip_gap, profile.monthly_sip),
        inflation_lifestyle(profile),
    ])
}

pub fn summarize(spots: &[BlindSpot]) -> BlindSpotSummary {
    let total = spots.len();
    let resolved = spots.iter().filter(|spot| spot.is_resolved).count();
    let at_risk = spots
        .iter()
        .filter(|spot| spot.severity == Severity::AtRisk)
        .count();

    let message = if resolved == total {
        "All areas appear on track under current assumptions.".to_string()
    } else if at_risk == 1 {
        "1 area needs immediate attention.".to_string()
    } else if at_risk > 1 {
        format!("{at_risk} areas need immediate attention.")
    } else {
        "Review these considerations to strengthen your retirement plan.".to_string()
    };

    BlindSpotSummary {
        total,
        resolved,
        at_risk,
        message,
    }
}

fn retirement_timeline(profile: &InputProfile, freedom_age: FreedomAge) -> BlindSpot {
    let kind = BlindSpotKind::RetirementTimeline;
    match freedom_age {
        FreedomAge::Achieved => BlindSpot::new(
            kind,
            SpotValue::Text("Achieved".to_string()),
            None,
            Severity::OnTrack,
            "Your plan indicates sustainability through your expected lifespan.".to_string(),
        ),
        FreedomAge::AtRisk(age) => {
            let severity = if age >= profile.retirement_age.saturating_add(10) {
                Severity::OnTrack
            } else if age < 90 {
                Severity::AtRisk
            } else {
                Severity::NeedsAttention
            };
            BlindSpot::new(
                kind,
                SpotValue::Age(age),
                Some(f64::from(age)),
                severity,
                format!("Based on current inputs, your corpus may deplete by age {age}."),
            )
        }
    }
}

fn corpus_gap(expected: f64, required: f64) -> BlindSpot {
    let gap = required - expected;
    let rounded = round_thousand(gap.abs());

    let severity = if gap <= 0.0 {
        Severity::OnTrack
    } else {
        let gap_pct = if expected > 0.0 { gap / expected * 100.0 } else { 100.0 };
        if gap_pct > 20.0 {
            Severity::AtRisk
        } else {
            Severity::NeedsAttention
        }
    };

    let message = if gap > 0.0 {
        format!(
            "Shortfall of approximately {} between required and expected corpus.",
            format_inr_grouped(rounded)
        )
    } else {
        "Expected corpus meets or exceeds required amount under current assumptions.".to_string()
    };

    BlindSpot::new(
        BlindSpotKind::CorpusGap,
        SpotValue::Currency(rounded),
        Some(gap),
        severity,
        message,
    )
}

fn sustainability(depletion_age: DepletionAge) -> BlindSpot {
    let kind = BlindSpotKind::Sustainability;
    let severity = match depletion_age {
        _ if depletion_age.lasts_until(90) => Severity::OnTrack,
        DepletionAge::Depleted(age) if age < 80 => Severity::AtRisk,
        _ => Severity::NeedsAttention,
    };

    match depletion_age {
        DepletionAge::Depleted(age) => BlindSpot::new(
            kind,
            SpotValue::Age(age),
            Some(f64::from(age)),
            severity,
            format!("Under current assumptions, funds may last until age {age}."),
        ),
        DepletionAge::NeverDepletes => BlindSpot::new(
            kind,
            SpotValue::Text("Never".to_string()),
            None,
            severity,
            "Under current assumptions, funds last beyond your expected lifespan.".to_string(),
        ),
    }
}

fn sip_adequacy(sip_gap: f64, monthly_sip: f64) -> BlindSpot {
    let rounded = round_thousand(sip_gap.abs());

    let severity = if sip_gap <= 0.0 {
        Severity::OnTrack
    } else {
        let gap_pct = if monthly_sip > 0.0 { sip_gap / monthly_sip * 100.0 } else { 100.0 };
        if gap_pct > 50.0 {
            Severity::AtRisk
        } else {
            Severity::NeedsAttention
        }
    };

    let message = if sip_gap > 0.0 {
        format!(
            "Monthly savings may need to increase by {} to meet targets.",
            format_inr_grouped(rounded)
        )
    } else {
        "Current monthly savings appear sufficient under these assumptions.".to_string()
    };

    BlindSpot::new(
        BlindSpotKind::SipAdequacy,
        SpotValue::Currency(rounded),
        Some(sip_gap),
        severity,
        message,
    )
}

fn inflation_lifestyle(profile: &InputProfile) -> BlindSpot {
    let years = profile.years_to_retirement();
    let projected = profile.monthly_expenses * growth_factor(profile.inflation_rate, years);
    let factor = if profile.monthly_expenses > 0.0 {
        projected / profile.monthly_expenses
    } else {
        1.0
    };

    let severity = if factor > 3.0 {
        Severity::AtRisk
    } else if factor > 2.0 {
        Severity::NeedsAttention
    } else {
        Severity::OnTrack
    };

    let rounded = round_thousand(projected);
    BlindSpot::new(
        BlindSpotKind::InflationLifestyle,
        SpotValue::Currency(rounded),
        Some(projected),
        severity,
        format!(
            "Monthly expenses could grow to {} by retirement due to inflation.",
            format_inr_grouped(rounded)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::project;

    fn sample_profile() -> InputProfile {
        InputProfile {
            current_age: 30,
            retirement_age: 60,
            lifespan_age: 85,
            monthly_expenses: 50_000.0,
            monthly_sip: 20_000.0,
            money_saved: 1_000_000.0,
            expected_returns: 12.0,
            retirement_returns: 8.0,
            inflation_rate: 6.0,
            sip_increase_rate: 0.0,
            withdrawal_increase_rate: 0.0,
            monthly_income: None,
        }
    }

    fn spot(spots: &[BlindSpot], kind: BlindSpotKind) -> &BlindSpot {
        spots
            .iter()
            .find(|spot| spot.kind == kind)
            .expect("every kind is present")
    }

    #[test]
    fn severity_orders_worst_first() {
        assert!(Severity::AtRisk < Severity::NeedsAttention);
        assert!(Severity::NeedsAttention < Severity::OnTrack);
        assert_eq!(Severity::NeedsAttention.to_string(), "needs-attention");
    }

    #[test]
    fn produces_all_five_kinds_in_order() {
        let profile = sample_profile();
        let projection = project(&profile);
        let spots = compute_blind_spots(&profile, &projection).expect("valid inputs");
        let kinds: Vec<_> = spots.iter().map(|spot| spot.kind).collect();
        assert_eq!(kinds, BlindSpotKind::ALL.to_vec());
        for spot in &spots {
            assert_eq!(spot.is_resolved, spot.severity == Severity::OnTrack);
            assert_eq!(spot.resolution, spot.kind.resolution(spot.severity));
            assert!(!spot.edit_targets.is_empty());
        }
        assert_eq!(
            spot(&spots, BlindSpotKind::Sustainability).severity,
            Severity::OnTrack
        );
        assert_eq!(
            spot(&spots, BlindSpotKind::InflationLifestyle).severity,
            Severity::AtRisk
        );
    }

    #[test]
    fn zero_sip_gap_is_resolved() {
        let spot = sip_adequacy(0.0, 20_000.0);
        assert_eq!(spot.severity, Severity::OnTrack);
        assert!(spot.is_resolved);
        assert_eq!(spot.severity_label, "On Track");
    }

    #[test]
    fn sip_gap_grades_against_current_sip() {
        assert_eq!(sip_adequacy(10_000.0, 20_000.0).severity, Severity::NeedsAttention);
        assert_eq!(sip_adequacy(10_001.0, 20_000.0).severity, Severity::AtRisk);
        assert_eq!(sip_adequacy(1.0, 0.0).severity, Severity::AtRisk);
        let spot = sip_adequacy(12_400.0, 20_000.0);
        assert_eq!(spot.value, SpotValue::Currency(12_000.0));
        assert!(spot.message.contains("₹12,000"));
    }

    #[test]
    fn corpus_gap_thresholds() {
        assert_eq!(corpus_gap(100.0, 90.0).severity, Severity::OnTrack);
        assert_eq!(corpus_gap(100.0, 120.0).severity, Severity::NeedsAttention);
        assert_eq!(corpus_gap(100.0, 121.0).severity, Severity::AtRisk);
        assert_eq!(corpus_gap(0.0, 1.0).severity, Severity::AtRisk);
        let spot = corpus_gap(10_000_000.0, 10_250_400.0);
        assert_eq!(spot.value, SpotValue::Currency(250_000.0));
        assert!(spot.message.contains("₹2,50,000"));
    }

    #[test]
    fn sustainability_thresholds() {
        assert_eq!(sustainability(DepletionAge::NeverDepletes).severity, Severity::OnTrack);
        assert_eq!(sustainability(DepletionAge::Depleted(90)).severity, Severity::OnTrack);
        assert_eq!(sustainability(DepletionAge::Depleted(85)).severity, Severity::NeedsAttention);
        assert_eq!(sustainability(DepletionAge::Depleted(80)).severity, Severity::NeedsAttention);
        assert_eq!(sustainability(DepletionAge::Depleted(79)).severity, Severity::AtRisk);
    }

    #[test]
    fn timeline_thresholds() {
        let profile = sample_profile();
        assert_eq!(
            retirement_timeline(&profile, FreedomAge::Achieved).severity,
            Severity::OnTrack
        );
        assert_eq!(
            retirement_timeline(&profile, FreedomAge::AtRisk(70)).severity,
            Severity::OnTrack
        );
        assert_eq!(
            retirement_timeline(&profile, FreedomAge::AtRisk(69)).severity,
            Severity::AtRisk
        );

        let mut late = sample_profile();
        late.retirement_age = 85;
        assert_eq!(
            retirement_timeline(&late, FreedomAge::AtRisk(91)).severity,
            Severity::NeedsAttention
        );
    }

    #[test]
    fn inflation_lifestyle_tracks_expense_multiple() {
        let profile = sample_profile();
        // 1.06^30 is about 5.74
        assert_eq!(inflation_lifestyle(&profile).severity, Severity::AtRisk);

        let mut short = sample_profile();
        short.retirement_age = 45;
        // 1.06^15 is about 2.40
        assert_eq!(inflation_lifestyle(&short).severity, Severity::NeedsAttention);

        short.inflation_rate = 0.0;
        let spot = inflation_lifestyle(&short);
        assert_eq!(spot.severity, Severity::OnTrack);
        assert_eq!(spot.value, SpotValue::Currency(50_000.0));
    }

    #[test]
    fn invalid_profile_yields_insufficient_data() {
        let profile = sample_profile();
        let projection = project(&profile);
        let mut broken = profile.clone();
        broken.retirement_age = broken.current_age;
        assert!(compute_blind_spots(&broken, &projection).is_none());

        let mut nan = projection.clone();
        nan.sip_gap = f64::NAN;
        assert!(compute_blind_spots(&profile, &nan).is_none());
    }

    #[test]
    fn summary_counts_resolved_and_at_risk() {
        let spots = vec![
            sip_adequacy(0.0, 20_000.0),
            sustainability(DepletionAge::Depleted(70)),
            corpus_gap(100.0, 200.0),
        ];
        let summary = summarize(&spots);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.at_risk, 2);
        assert_eq!(summary.message, "2 areas need immediate attention.");

        let all_good = summarize(&[sip_adequacy(0.0, 1.0)]);
        assert!(all_good.message.starts_with("All areas"));
    }

    #[test]
    fn serializes_value_with_unit_tag() {
        let json = serde_json::to_value(sip_adequacy(0.0, 1.0)).expect("serializes");
        assert_eq!(json["id"], "sip-adequacy");
        assert_eq!(json["unit"], "currency");
        assert_eq!(json["severity"], "on-track");
        assert_eq!(json["isResolved"], true);
        assert!(json["editTargets"].is_array());
    }

    #[test]
    fn blind_spots_are_deterministic() {
        let profile = sample_profile();
        let projection = project(&profile);
        assert_eq!(
            compute_blind_spots(&profile, &projection),
            compute_blind_spots(&profile, &projection)
        );
    }

    #[test]
    fn extreme_ages_are_rejected_without_overflow() {
        let profile = InputProfile {
            retirement_age: u32::MAX - 1,
            lifespan_age: u32::MAX,
            ..sample_profile()
        };
        let projection = project(&profile);
        assert!(compute_blind_spots(&profile, &projection).is_none());

        let timeline = retirement_timeline(&profile, FreedomAge::AtRisk(u32::MAX));
        assert_eq!(timeline.severity, Severity::OnTrack);

        let inflation = inflation_lifestyle(&profile);
        assert_eq!(inflation.severity, Severity::AtRisk);
    }
}
