const RATE_EPSILON: f64 = 1e-12;

pub fn monthly_rate(annual_pct: f64) -> f64 {
    (1.0 + annual_pct / 100.0).powf(1.0 / 12.0) - 1.0
}

/// `(1 + annual_pct%)^years`; horizons past `i32::MAX` saturate the exponent.
pub fn growth_factor(annual_pct: f64, years: u32) -> f64 {
    (1.0 + annual_pct / 100.0).powi(i32::try_from(years).unwrap_or(i32::MAX))
}

pub fn future_value_factor(monthly_rate: f64, months: u32) -> f64 {
    let n = f64::from(months);
    // linear limit
    if monthly_rate.abs() < RATE_EPSILON {
        return n;
    }
    ((1.0 + monthly_rate).powf(n) - 1.0) / monthly_rate
}

#[derive(Debug, Clone, Copy)]
pub struct ContributionTarget {
    pub target_corpus: f64,
    pub existing_corpus: f64,
    pub annual_return_pct: f64,
    pub months: u32,
}

pub fn required_monthly_contribution(target: ContributionTarget) -> f64 {
    let shortfall = target.target_corpus - target.existing_corpus;
    if shortfall <= 0.0 || target.months == 0 {
        return 0.0;
    }

    let factor = future_value_factor(monthly_rate(target.annual_return_pct), target.months);
    if !factor.is_finite() || factor <= RATE_EPSILON {
        return 0.0;
    }
    (shortfall / factor).max(0.0)
}

#[derive(Debug, Clone, Copy)]
pub struct BisectConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            max_iterations: 200,
        }
    }
}

/// Smallest value in `[lo, hi]` satisfying a monotone predicate. The returned
/// value always satisfies it; `None` when even `hi` fails.
pub fn bisect_min_satisfying<F>(lo: f64, hi: f64, config: BisectConfig, satisfies: F) -> Option<f64>
where
    F: Fn(f64) -> bool,
{
    if satisfies(lo) {
        return Some(lo);
    }
    if !satisfies(hi) {
        return None;
    }

    let mut lo = lo;
    let mut hi = hi;
    let mut it = 0;
    while it < config.max_iterations && (hi - lo).abs() > config.tolerance {
        it += 1;
        let mid = (lo + hi) * 0.5;
        if satisfies(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(hi)
}

pub fn expand_upper_bound<F>(start: f64, max_doublings: u32, satisfies: F) -> Option<f64>
where
    F: Fn(f64) -> bool,
{
    let mut hi = start.max(1.0);
    for _ in 0..max_doublings {
        if satisfies(hi) {
            return Some(hi);
        }
        hi *= 2.0;
    }
    None
}
