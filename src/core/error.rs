use thiserror::Error;

use super::types::{InputProfile, MAX_AGE, ProjectionSettings, RequiredCorpusRule};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("retirementAge ({retirement_age}) must be greater than currentAge ({current_age})")]
    RetirementNotAfterCurrent {
        current_age: u32,
        retirement_age: u32,
    },

    #[error("lifespanAge ({lifespan_age}) must be >= retirementAge ({retirement_age})")]
    LifespanBeforeRetirement {
        retirement_age: u32,
        lifespan_age: u32,
    },

    #[error("{field} must be a finite amount >= 0, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{field} must be a finite percentage above -100, got {value}")]
    InvalidRate { field: &'static str, value: f64 },

    #[error("{field} must be a positive finite number, got {value}")]
    InvalidSetting { field: &'static str, value: f64 },

    #[error("{field} must be at most {max} years, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

fn check_years(field: &'static str, value: u32) -> Result<(), ProfileError> {
    if value > MAX_AGE {
        return Err(ProfileError::OutOfRange {
            field,
            value,
            max: MAX_AGE,
        });
    }
    Ok(())
}

pub fn validate_profile(profile: &InputProfile) -> Result<(), ProfileError> {
    check_years("currentAge", profile.current_age)?;
    check_years("retirementAge", profile.retirement_age)?;
    check_years("lifespanAge", profile.lifespan_age)?;

    if profile.retirement_age <= profile.current_age {
        return Err(ProfileError::RetirementNotAfterCurrent {
            current_age: profile.current_age,
            retirement_age: profile.retirement_age,
        });
    }

    if profile.lifespan_age < profile.retirement_age {
        return Err(ProfileError::LifespanBeforeRetirement {
            retirement_age: profile.retirement_age,
            lifespan_age: profile.lifespan_age,
        });
    }

    let amounts = [
        ("monthlyExpenses", Some(profile.monthly_expenses)),
        ("monthlySIP", Some(profile.monthly_sip)),
        ("moneySaved", Some(profile.money_saved)),
        ("monthlyIncome", profile.monthly_income),
    ];
    for (field, value) in amounts {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::InvalidAmount { field, value });
            }
        }
    }

    let rates = [
        ("expectedReturns", profile.expected_returns),
        ("retirementReturns", profile.retirement_returns),
        ("inflationRate", profile.inflation_rate),
        ("sipIncreaseRate", profile.sip_increase_rate),
        ("withdrawalIncreaseRate", profile.withdrawal_increase_rate),
    ];
    for (field, value) in rates {
        if !value.is_finite() || value <= -100.0 {
            return Err(ProfileError::InvalidRate { field, value });
        }
    }

    Ok(())
}

pub fn validate_settings(settings: &ProjectionSettings) -> Result<(), ProfileError> {
    check_years("survivalHorizonYears", settings.survival_horizon_years)?;
    check_years("aggressiveMinYears", settings.aggressive_min_years)?;
    for &age in &settings.aggressive_target_ages {
        check_years("aggressiveTargetAges", age)?;
    }
    if let RequiredCorpusRule::ExpenseMultiple { multiple } = settings.required_corpus_rule {
        if !multiple.is_finite() || multiple <= 0.0 {
            return Err(ProfileError::InvalidSetting {
                field: "corpusMultiple",
                value: multiple,
            });
        }
    }
    if !settings.income_stretch.is_finite() || settings.income_stretch <= 0.0 {
        return Err(ProfileError::InvalidSetting {
            field: "incomeStretch",
            value: settings.income_stretch,
        });
    }
    if !settings.income_buffer.is_finite() || settings.income_buffer < 0.0 {
        return Err(ProfileError::InvalidSetting {
            field: "incomeBuffer",
            value: settings.income_buffer,
        });
    }
    Ok(())
}
