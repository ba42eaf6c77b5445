//! Social-security contribution base and worker contributions.
//!
//! The monthly base is the annual gross (benefits in kind included) divided
//! by twelve, clamped to the group's regulatory floor and ceiling. Groups
//! whose limits are daily are clamped on the daily figure.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    BaseLimits, ContractType, ContributionBreakdown, ContributionGroup, ContributionRates,
    SocialSecurityConfig,
};

/// Clamps `base` to `[base_min, base_max]`.
///
/// With `is_daily`, the limits are per day: the base is divided by
/// `days_in_month`, clamped, and multiplied back. A base already within the
/// limits is returned untouched, so applying the function twice changes
/// nothing.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nomina_core::calculations::social_security::apply_base_limits;
///
/// assert_eq!(apply_base_limits(dec!(1000), dec!(1381.20), dec!(4909.50), false, 30), dec!(1381.20));
/// assert_eq!(apply_base_limits(dec!(1000), dec!(46.04), dec!(163.65), true, 30), dec!(1381.20));
/// ```
pub fn apply_base_limits(
    base: Decimal,
    base_min: Decimal,
    base_max: Decimal,
    is_daily: bool,
    days_in_month: u32,
) -> Decimal {
    if !is_daily || days_in_month == 0 {
        return base.min(base_max).max(base_min);
    }
    let days = Decimal::from(days_in_month);
    let daily = base / days;
    if daily < base_min {
        base_min * days
    } else if daily > base_max {
        base_max * days
    } else {
        base
    }
}

/// Worker contributions on an already limited monthly base.
///
/// The unemployment rate is chosen by contract permanence; the other three
/// concepts have a single rate.
pub fn contributions(
    adjusted_base: Decimal,
    rates: &ContributionRates,
    contract: ContractType,
) -> ContributionBreakdown {
    ContributionBreakdown {
        common_contingencies: adjusted_base * rates.common_contingencies,
        unemployment: adjusted_base * rates.unemployment(contract),
        training: adjusted_base * rates.training,
        mei: adjusted_base * rates.mei,
    }
}

/// Base limiting and contributions bound to one year's configuration.
#[derive(Debug, Clone, Copy)]
pub struct SocialSecurityCalculator<'a> {
    config: &'a SocialSecurityConfig,
}

impl<'a> SocialSecurityCalculator<'a> {
    pub fn new(config: &'a SocialSecurityConfig) -> Self {
        Self { config }
    }

    /// Monthly contribution base for an annual gross, after limits.
    pub fn monthly_base(
        &self,
        annual_gross: Decimal,
        group: ContributionGroup,
    ) -> Decimal {
        let monthly = annual_gross / Decimal::from(12);
        let BaseLimits { min, max, is_daily } = self.config.limits_for(group);
        let adjusted = apply_base_limits(monthly, min, max, is_daily, self.config.days_in_month);
        if adjusted != monthly {
            debug!(
                group = group.as_str(),
                %monthly,
                %adjusted,
                "contribution base limited"
            );
        }
        adjusted
    }

    pub fn contributions(
        &self,
        adjusted_base: Decimal,
        contract: ContractType,
    ) -> ContributionBreakdown {
        contributions(adjusted_base, &self.config.rates, contract)
    }
}
