use serde::Serialize;

use super::engine::{
    AccumulationPlan, WithdrawalPlan, corpus_at_retirement, depletion_age, required_corpus,
    simulate_accumulation, simulate_withdrawal,
};
use super::format::format_inr;
use super::solver::{
    BisectConfig, ContributionTarget, bisect_min_satisfying, required_monthly_contribution,
};
use super::types::{
    ConfidenceLabel, DepletionAge, InputProfile, ProjectionResult, ProjectionSettings,
};

pub const AGGRESSIVE_DISCLAIMER: &str = "These scenarios show what is mathematically required \
for early retirement. They are not recommendations.";

const INCOME_HEALTH_WEIGHT: f64 = 0.6;
const LIFESPAN_WEIGHT: f64 = 0.4;
const HIGH_EXPENSE_SHARE: f64 = 0.7;
const LOW_SIP_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealityWarning {
    #[serde(rename = "type")]
    pub level: WarningLevel,
    pub message: String,
    pub fix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReality {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub current_sip: f64,
    pub monthly_surplus: f64,
    pub current_sip_income_ratio: f64,
    pub max_possible_sip: f64,
    pub warnings: Vec<RealityWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurvivalStatus {
    Safe,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalMode {
    pub status: SurvivalStatus,
    pub depletion_age: DepletionAge,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RealisticPlan {
    IncomeRequired {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Infeasible {
        message: String,
        requires: String,
    },
    #[serde(rename_all = "camelCase")]
    Optimized {
        earliest_retirement_age: u32,
        used_surplus: f64,
        years_earlier: u32,
        note: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggressiveScenario {
    pub target_age: u32,
    pub years_to_target: u32,
    pub required_corpus: f64,
    pub required_sip: f64,
    pub required_income: f64,
    pub current_income: f64,
    pub income_gap: f64,
    pub income_multiplier: Option<f64>,
    pub is_realistic: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggressiveMode {
    pub scenarios: Vec<AggressiveScenario>,
    pub disclaimer: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealitySubScores {
    pub income_expense_health: u32,
    pub lifespan_coverage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealityConfidence {
    pub score: u32,
    pub label: ConfidenceLabel,
    pub components: RealitySubScores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealityTiers {
    pub financial_reality: FinancialReality,
    pub survival: SurvivalMode,
    pub realistic: RealisticPlan,
    pub aggressive: AggressiveMode,
    pub confidence: RealityConfidence,
}

pub fn compute_reality_tiers(profile: &InputProfile, projection: &ProjectionResult) -> RealityTiers {
    compute_reality_tiers_with(profile, projection, &ProjectionSettings::default())
}

pub fn compute_reality_tiers_with(
    profile: &InputProfile,
    projection: &ProjectionResult,
    settings: &ProjectionSettings,
) -> RealityTiers {
    let financial_reality = financial_reality(profile);
    let survival = survival_mode(profile, projection.depletion_age, settings.survival_horizon_years);
    let realistic = realistic_plan(profile, &financial_reality);
    let aggressive = aggressive_mode(profile, settings);
    let confidence = reality_confidence(profile, &financial_reality, projection.depletion_age);

    log::debug!(
        "reality tiers: survival={:?} confidence={}",
        survival.status,
        confidence.score
    );

    RealityTiers {
        financial_reality,
        survival,
        realistic,
        aggressive,
        confidence,
    }
}

fn declared_income(profile: &InputProfile) -> f64 {
    profile.monthly_income.unwrap_or(0.0).max(0.0)
}

pub fn financial_reality(profile: &InputProfile) -> FinancialReality {
    let income = declared_income(profile);
    let expenses = profile.monthly_expenses;
    let sip = profile.monthly_sip;
    let surplus = income - expenses - sip;
    let sip_ratio = if income > 0.0 { sip / income } else { 0.0 };

    let mut warnings = Vec::new();
    if income <= 0.0 {
        warnings.push(RealityWarning {
            level: WarningLevel::Info,
            message: "Add your monthly income to unlock realistic optimization.".to_string(),
            fix: "Enter your net monthly take-home pay.".to_string(),
        });
    } else {
        if surplus < 0.0 {
            warnings.push(RealityWarning {
                level: WarningLevel::Critical,
                message: format!(
                    "Your expenses and SIP exceed your income by {}/month.",
                    format_inr(-surplus)
                ),
                fix: "Reduce expenses or pause part of your SIP until cash flow is positive."
                    .to_string(),
            });
        }
        let expense_share = expenses / income;
        if expense_share > HIGH_EXPENSE_SHARE {
            warnings.push(RealityWarning {
                level: WarningLevel::Warning,
                message: format!(
                    "Expenses take {:.0}% of your income.",
                    expense_share * 100.0
                ),
                fix: "Keeping expenses below 70% of income leaves room to save.".to_string(),
            });
        }
        if sip_ratio < LOW_SIP_SHARE {
            warnings.push(RealityWarning {
                level: WarningLevel::Info,
                message: format!("You invest {:.0}% of your income.", sip_ratio * 100.0),
                fix: "Raising your SIP toward 15-20% of income strengthens your plan.".to_string(),
            });
        }
    }

    FinancialReality {
        monthly_income: income,
        monthly_expenses: expenses,
        current_sip: sip,
        monthly_surplus: surplus,
        current_sip_income_ratio: sip_ratio,
        max_possible_sip: sip + surplus.max(0.0),
        warnings,
    }
}

pub fn survival_mode(profile: &InputProfile, depletion: DepletionAge, horizon_years: u32) -> SurvivalMode {
    let (status, message) = match depletion {
        DepletionAge::NeverDepletes => (
            SurvivalStatus::Safe,
            format!(
                "Your corpus is projected to last beyond age {}.",
                profile.lifespan_age
            ),
        ),
        DepletionAge::Depleted(age) if age >= profile.retirement_age.saturating_add(horizon_years) => (
            SurvivalStatus::Warning,
            format!(
                "Your corpus may run out at age {age}, before your expected lifespan of {}.",
                profile.lifespan_age
            ),
        ),
        DepletionAge::Depleted(age) => (
            SurvivalStatus::Danger,
            format!(
                "Your corpus may run out at age {age}, only {} years into retirement.",
                age.saturating_sub(profile.retirement_age)
            ),
        ),
    };

    SurvivalMode {
        status,
        depletion_age: depletion,
        message,
    }
}

/// True when retiring at `retirement_age` with `monthly_sip` never depletes.
fn sustainable_at(profile: &InputProfile, retirement_age: u32, monthly_sip: f64) -> bool {
    let accumulation = simulate_accumulation(AccumulationPlan {
        starting_corpus: profile.money_saved,
        monthly_sip,
        start_age: profile.current_age,
        years: retirement_age.saturating_sub(profile.current_age),
        annual_return_pct: profile.expected_returns,
        sip_increase_rate_pct: profile.sip_increase_rate,
    });
    let corpus = corpus_at_retirement(&accumulation, profile.money_saved);
    let withdrawal = simulate_withdrawal(WithdrawalPlan::for_profile(profile, retirement_age, corpus));
    depletion_age(&withdrawal) == DepletionAge::NeverDepletes
}

pub fn realistic_plan(profile: &InputProfile, reality: &FinancialReality) -> RealisticPlan {
    if reality.monthly_income <= 0.0 {
        return RealisticPlan::IncomeRequired {
            message: "We need your monthly income to show what is realistically possible within your budget."
                .to_string(),
        };
    }

    let surplus = reality.monthly_surplus;
    if surplus < 0.0 {
        let deficit = format_inr(-surplus);
        return RealisticPlan::Infeasible {
            message: format!("Your current plan spends {deficit}/month more than you earn."),
            requires: format!(
                "Cut expenses or SIP by at least {deficit}/month before optimizing your retirement age."
            ),
        };
    }

    let sip = profile.monthly_sip;
    let config = BisectConfig {
        tolerance: 1.0,
        max_iterations: 64,
    };
    let earliest = (profile.current_age.saturating_add(1)..profile.retirement_age)
        .find(|&age| sustainable_at(profile, age, sip + surplus));

    if let Some(age) = earliest {
        let extra = bisect_min_satisfying(0.0, surplus, config, |extra| {
            sustainable_at(profile, age, sip + extra)
        })
        .unwrap_or(surplus);
        let used_surplus = extra.ceil().min(surplus);
        let years_earlier = profile.retirement_age - age;
        return RealisticPlan::Optimized {
            earliest_retirement_age: age,
            used_surplus,
            years_earlier,
            note: format!(
                "Uses {} of your {} monthly surplus; the rest stays as a buffer.",
                format_inr(used_surplus),
                format_inr(surplus)
            ),
        };
    }

    let note = if sustainable_at(profile, profile.retirement_age, sip) {
        "Your current plan is already optimal within realistic constraints.".to_string()
    } else {
        "Even your planned retirement age is not sustainable yet; direct your surplus toward your SIP first."
            .to_string()
    };
    RealisticPlan::Optimized {
        earliest_retirement_age: profile.retirement_age,
        used_surplus: 0.0,
        years_earlier: 0,
        note,
    }
}

pub fn aggressive_mode(profile: &InputProfile, settings: &ProjectionSettings) -> AggressiveMode {
    let income = declared_income(profile);
    let scenarios = settings
        .aggressive_target_ages
        .iter()
        .copied()
        .filter(|&target| target > profile.current_age)
        .filter(|&target| target - profile.current_age >= settings.aggressive_min_years)
        .map(|target_age| {
            let years_to_target = target_age - profile.current_age;
            let target_corpus = required_corpus(profile, settings.required_corpus_rule, target_age);
            let required_sip = required_monthly_contribution(ContributionTarget {
                target_corpus,
                existing_corpus: profile.money_saved,
                annual_return_pct: profile.expected_returns,
                months: years_to_target.saturating_mul(12),
            })
            .round();
            let required_income = required_sip + profile.monthly_expenses + settings.income_buffer;
            let is_realistic = required_income <= income * settings.income_stretch;
            let income_gap = required_income - income;
            let income_multiplier = (income > 0.0).then(|| required_income / income);

            let message = if is_realistic {
                match income_multiplier {
                    Some(multiplier) if multiplier > 1.0 => format!(
                        "Possible with {:.0}% income growth",
                        (multiplier - 1.0) * 100.0
                    ),
                    _ => "Possible with your current income".to_string(),
                }
            } else {
                format!("Requires {}/month additional income", format_inr(income_gap))
            };

            AggressiveScenario {
                target_age,
                years_to_target,
                required_corpus: target_corpus,
                required_sip,
                required_income,
                current_income: income,
                income_gap,
                income_multiplier,
                is_realistic,
                message,
            }
        })
        .collect();

    AggressiveMode {
        scenarios,
        disclaimer: AGGRESSIVE_DISCLAIMER,
    }
}

pub fn reality_confidence(
    profile: &InputProfile,
    reality: &FinancialReality,
    depletion: DepletionAge,
) -> RealityConfidence {
    let components = RealitySubScores {
        income_expense_health: income_expense_health(reality),
        lifespan_coverage: lifespan_coverage(profile, depletion),
    };
    let score = (f64::from(components.income_expense_health) * INCOME_HEALTH_WEIGHT
        + f64::from(components.lifespan_coverage) * LIFESPAN_WEIGHT)
        .round()
        .clamp(0.0, 100.0) as u32;

    RealityConfidence {
        score,
        label: ConfidenceLabel::from_score(score, 80, 50),
        components,
    }
}

fn income_expense_health(reality: &FinancialReality) -> u32 {
    if reality.monthly_income <= 0.0 {
        return 0;
    }
    let savings_capacity = (reality.monthly_income - reality.monthly_expenses) / reality.monthly_income;
    if savings_capacity >= 0.4 {
        100
    } else if savings_capacity >= 0.3 {
        85
    } else if savings_capacity >= 0.2 {
        70
    } else if savings_capacity >= 0.1 {
        50
    } else if savings_capacity >= 0.0 {
        30
    } else {
        10
    }
}

fn lifespan_coverage(profile: &InputProfile, depletion: DepletionAge) -> u32 {
    let DepletionAge::Depleted(age) = depletion else {
        return 100;
    };
    let span = profile.lifespan_age.saturating_sub(profile.retirement_age);
    if span == 0 {
        return 100;
    }
    let covered = age.saturating_sub(profile.retirement_age);
    (f64::from(covered) / f64::from(span) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u32
}
