use super::solver::{
    BisectConfig, ContributionTarget, bisect_min_satisfying, expand_upper_bound, growth_factor,
    required_monthly_contribution,
};
use super::types::{
    DepletionAge, FreedomAge, InputProfile, MAX_AGE, Phase, ProjectionResult, ProjectionSettings,
    RequiredCorpusRule, SimulationRow,
};

#[derive(Debug, Clone, Copy)]
pub struct AccumulationPlan {
    pub starting_corpus: f64,
    pub monthly_sip: f64,
    pub start_age: u32,
    pub years: u32,
    pub annual_return_pct: f64,
    pub sip_increase_rate_pct: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct WithdrawalPlan {
    pub starting_corpus: f64,
    pub retirement_age: u32,
    pub lifespan_age: u32,
    pub monthly_expenses: f64,
    pub inflation_rate_pct: f64,
    pub withdrawal_increase_rate_pct: f64,
    pub annual_return_pct: f64,
    pub contributed_to_date: f64,
}

impl WithdrawalPlan {
    pub fn for_profile(profile: &InputProfile, retirement_age: u32, starting_corpus: f64) -> Self {
        Self {
            starting_corpus,
            retirement_age,
            lifespan_age: profile.lifespan_age,
            monthly_expenses: profile.monthly_expenses,
            inflation_rate_pct: profile.inflation_rate,
            withdrawal_increase_rate_pct: profile.withdrawal_increase_rate,
            annual_return_pct: profile.retirement_returns,
            contributed_to_date: 0.0,
        }
    }
}

pub fn project(profile: &InputProfile) -> ProjectionResult {
    project_with(profile, &ProjectionSettings::default())
}

pub fn project_with(profile: &InputProfile, settings: &ProjectionSettings) -> ProjectionResult {
    let accumulation = simulate_accumulation(AccumulationPlan {
        starting_corpus: profile.money_saved,
        monthly_sip: profile.monthly_sip,
        start_age: profile.current_age,
        years: profile.years_to_retirement(),
        annual_return_pct: profile.expected_returns,
        sip_increase_rate_pct: profile.sip_increase_rate,
    });
    let expected_corpus = corpus_at_retirement(&accumulation, profile.money_saved);
    let contributed_to_date = accumulation
        .last()
        .map(|row| row.cumulative_contributed)
        .unwrap_or(profile.money_saved);

    let withdrawal = simulate_withdrawal(WithdrawalPlan {
        contributed_to_date,
        ..WithdrawalPlan::for_profile(profile, profile.retirement_age, expected_corpus)
    });
    let depletion_age = depletion_age(&withdrawal);

    let required_corpus = required_corpus(profile, settings.required_corpus_rule, profile.retirement_age);
    let required_monthly_sip = required_monthly_contribution(ContributionTarget {
        target_corpus: required_corpus,
        existing_corpus: 0.0,
        annual_return_pct: profile.expected_returns,
        months: profile.months_to_retirement(),
    });
    let sip_gap = (required_monthly_sip - profile.monthly_sip).max(0.0);

    log::debug!(
        "projection: expected={expected_corpus:.0} required={required_corpus:.0} depletion={depletion_age:?} sip_gap={sip_gap:.0}"
    );

    let mut rows = accumulation;
    rows.extend(withdrawal);

    ProjectionResult {
        rows,
        expected_corpus,
        required_corpus,
        required_monthly_sip,
        depletion_age,
        freedom_age: FreedomAge::from(depletion_age),
        sip_gap,
    }
}

/// Contribute-then-grow yearly accumulation.
///
/// Contributions land at the start of each year, so the whole year's SIP
/// earns the full annual return.
pub fn simulate_accumulation(plan: AccumulationPlan) -> Vec<SimulationRow> {
    let years = plan.years.min(MAX_AGE);
    let mut rows = Vec::with_capacity(years as usize);
    let mut corpus = plan.starting_corpus;
    let mut monthly_sip = plan.monthly_sip;
    let mut contributed = plan.starting_corpus;

    for year in 1..=years {
        let starting_corpus = corpus;
        let annual_contribution = monthly_sip * 12.0;
        corpus += annual_contribution;
        contributed += annual_contribution;
        corpus *= 1.0 + plan.annual_return_pct / 100.0;

        rows.push(SimulationRow {
            age: plan.start_age.saturating_add(year),
            phase: Phase::Accumulation,
            starting_corpus,
            monthly_contribution: monthly_sip,
            monthly_withdrawal: 0.0,
            return_rate_pct: plan.annual_return_pct,
            ending_corpus: corpus,
            cumulative_contributed: contributed,
        });

        monthly_sip *= 1.0 + plan.sip_increase_rate_pct / 100.0;
    }

    rows
}

/// Withdraw-then-grow yearly drawdown, stopping at the first exhausted year.
pub fn simulate_withdrawal(plan: WithdrawalPlan) -> Vec<SimulationRow> {
    let years = plan
        .lifespan_age
        .saturating_sub(plan.retirement_age)
        .min(MAX_AGE);
    let step_up = plan
        .inflation_rate_pct
        .max(plan.withdrawal_increase_rate_pct);
    let mut rows = Vec::with_capacity(years as usize);
    let mut corpus = plan.starting_corpus;
    let mut monthly_withdrawal = plan.monthly_expenses;

    for year in 1..=years {
        let starting_corpus = corpus;
        corpus -= monthly_withdrawal * 12.0;
        if corpus > 0.0 {
            corpus *= 1.0 + plan.annual_return_pct / 100.0;
        }

        rows.push(SimulationRow {
            age: plan.retirement_age.saturating_add(year),
            phase: Phase::Withdrawal,
            starting_corpus,
            monthly_contribution: 0.0,
            monthly_withdrawal,
            return_rate_pct: plan.annual_return_pct,
            ending_corpus: corpus.max(0.0),
            cumulative_contributed: plan.contributed_to_date,
        });

        if corpus <= 0.0 {
            break;
        }
        monthly_withdrawal *= 1.0 + step_up / 100.0;
    }

    rows
}

pub fn corpus_at_retirement(accumulation: &[SimulationRow], starting_corpus: f64) -> f64 {
    accumulation
        .last()
        .map(|row| row.ending_corpus)
        .unwrap_or(starting_corpus)
}

pub fn depletion_age(withdrawal: &[SimulationRow]) -> DepletionAge {
    match withdrawal.last() {
        Some(row) if row.ending_corpus <= 0.0 => DepletionAge::Depleted(row.age),
        _ => DepletionAge::NeverDepletes,
    }
}

pub fn required_corpus(profile: &InputProfile, rule: RequiredCorpusRule, retirement_age: u32) -> f64 {
    match rule {
        RequiredCorpusRule::ExpenseMultiple { multiple } => {
            let years = retirement_age.saturating_sub(profile.current_age);
            profile.monthly_expenses * 12.0 * multiple * growth_factor(profile.inflation_rate, years)
        }
        RequiredCorpusRule::SolvedNoDepletion => solve_no_depletion_corpus(profile, retirement_age),
    }
}

fn solve_no_depletion_corpus(profile: &InputProfile, retirement_age: u32) -> f64 {
    if profile.lifespan_age <= retirement_age || profile.monthly_expenses <= 0.0 {
        return 0.0;
    }

    let lasts = |corpus: f64| {
        let rows = simulate_withdrawal(WithdrawalPlan::for_profile(profile, retirement_age, corpus));
        depletion_age(&rows) == DepletionAge::NeverDepletes
    };

    let years = profile.lifespan_age - retirement_age;
    let first_year = profile.monthly_expenses * 12.0;
    let Some(hi) = expand_upper_bound(first_year * f64::from(years), 64, lasts) else {
        log::warn!("required corpus search did not find an upper bound");
        return f64::MAX;
    };

    bisect_min_satisfying(0.0, hi, BisectConfig::default(), lasts).unwrap_or(hi)
}
