mod accelerator;
mod blind_spots;
mod engine;
mod error;
mod format;
mod reality;
mod solver;
mod types;

pub use accelerator::{ADEQUACY_DISCLAIMER, AcceleratorResult, AdequacySubScores, compute_accelerator};
pub use blind_spots::{
    BlindSpot, BlindSpotKind, BlindSpotSummary, Severity, SpotValue, compute_blind_spots, summarize,
};
pub use engine::{
    AccumulationPlan, WithdrawalPlan, project, project_with, required_corpus, simulate_accumulation,
    simulate_withdrawal,
};
pub use error::{ProfileError, validate_profile, validate_settings};
pub use format::{format_inr, format_inr_grouped};
pub use reality::{
    AGGRESSIVE_DISCLAIMER, AggressiveMode, AggressiveScenario, FinancialReality, RealisticPlan,
    RealityConfidence, RealitySubScores, RealityTiers, RealityWarning, SurvivalMode,
    SurvivalStatus, WarningLevel, compute_reality_tiers, compute_reality_tiers_with,
};
pub use solver::{ContributionTarget, required_monthly_contribution};
pub use types::{
    ConfidenceLabel, DepletionAge, FreedomAge, InputProfile, Phase, ProjectionResult,
    ProjectionSettings, RequiredCorpusRule, SimulationRow,
};
