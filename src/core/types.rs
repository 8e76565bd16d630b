use serde::Serialize;

pub const MAX_AGE: u32 = 120;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Phase {
    Accumulation,
    Withdrawal,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RequiredCorpusRule {
    /// `12 * monthly_expenses * multiple`, inflated to the retirement year.
    ExpenseMultiple { multiple: f64 },
    /// Smallest retirement corpus the withdrawal simulation carries to lifespan.
    SolvedNoDepletion,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionSettings {
    pub required_corpus_rule: RequiredCorpusRule,
    pub survival_horizon_years: u32,
    pub aggressive_target_ages: Vec<u32>,
    pub aggressive_min_years: u32,
    pub income_buffer: f64,
    pub income_stretch: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            required_corpus_rule: RequiredCorpusRule::ExpenseMultiple { multiple: 25.0 },
            survival_horizon_years: 15,
            aggressive_target_ages: vec![55, 50, 45, 40, 35],
            aggressive_min_years: 5,
            income_buffer: 20_000.0,
            income_stretch: 1.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputProfile {
    pub current_age: u32,
    pub retirement_age: u32,
    pub lifespan_age: u32,
    pub monthly_expenses: f64,
    pub monthly_sip: f64,
    pub money_saved: f64,
    pub expected_returns: f64,
    pub retirement_returns: f64,
    pub inflation_rate: f64,
    pub sip_increase_rate: f64,
    pub withdrawal_increase_rate: f64,
    pub monthly_income: Option<f64>,
}

impl InputProfile {
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    pub fn months_to_retirement(&self) -> u32 {
        self.years_to_retirement().saturating_mul(12)
    }

    pub fn withdrawal_step_up(&self) -> f64 {
        self.inflation_rate.max(self.withdrawal_increase_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRow {
    pub age: u32,
    pub phase: Phase,
    pub starting_corpus: f64,
    pub monthly_contribution: f64,
    pub monthly_withdrawal: f64,
    pub return_rate_pct: f64,
    pub ending_corpus: f64,
    pub cumulative_contributed: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "age", rename_all = "kebab-case")]
pub enum DepletionAge {
    Depleted(u32),
    NeverDepletes,
}

impl DepletionAge {
    pub fn age(self) -> Option<u32> {
        match self {
            DepletionAge::Depleted(age) => Some(age),
            DepletionAge::NeverDepletes => None,
        }
    }

    pub fn lasts_until(self, age: u32) -> bool {
        match self {
            DepletionAge::Depleted(depleted_at) => depleted_at >= age,
            DepletionAge::NeverDepletes => true,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "age", rename_all = "kebab-case")]
pub enum FreedomAge {
    Achieved,
    AtRisk(u32),
}

impl From<DepletionAge> for FreedomAge {
    fn from(value: DepletionAge) -> Self {
        match value {
            DepletionAge::Depleted(age) => FreedomAge::AtRisk(age),
            DepletionAge::NeverDepletes => FreedomAge::Achieved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub rows: Vec<SimulationRow>,
    pub expected_corpus: f64,
    pub required_corpus: f64,
    pub required_monthly_sip: f64,
    pub depletion_age: DepletionAge,
    pub freedom_age: FreedomAge,
    pub sip_gap: f64,
}

impl ProjectionResult {
    pub fn accumulation_rows(&self) -> impl Iterator<Item = &SimulationRow> {
        self.rows
            .iter()
            .filter(|row| row.phase == Phase::Accumulation)
    }

    pub fn withdrawal_rows(&self) -> impl Iterator<Item = &SimulationRow> {
        self.rows.iter().filter(|row| row.phase == Phase::Withdrawal)
    }

    pub fn is_finite(&self) -> bool {
        self.expected_corpus.is_finite()
            && self.required_corpus.is_finite()
            && self.required_monthly_sip.is_finite()
            && self.sip_gap.is_finite()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ConfidenceLabel {
    Strong,
    Moderate,
    Low,
}

impl ConfidenceLabel {
    pub fn from_score(score: u32, strong_at: u32, moderate_at: u32) -> Self {
        if score >= strong_at {
            ConfidenceLabel::Strong
        } else if score >= moderate_at {
            ConfidenceLabel::Moderate
        } else {
            ConfidenceLabel::Low
        }
    }
}
