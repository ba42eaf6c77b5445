//! Regulatory constants for one fiscal year.
//!
//! A [`FiscalYearConfig`] is an immutable snapshot: build it once (normally
//! with [`FiscalYearConfig::fy2025`]) and pass it to the calculators. A new
//! fiscal year means a new snapshot, never mutation of an existing one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BracketSchedule, ContractType, ContributionGroup, TaxBracket};

/// Errors reported by [`FiscalYearConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FiscalYearConfigError {
    #[error("rate '{name}' must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    #[error("amount '{name}' must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    #[error("days per month must be positive")]
    ZeroDaysInMonth,

    #[error("minimum base for group '{group}' ({min}) exceeds its maximum ({max})")]
    MinimumAboveMaximum {
        group: &'static str,
        min: Decimal,
        max: Decimal,
    },

    #[error("work-income reduction thresholds must be strictly ascending")]
    ReductionThresholdsOutOfOrder,

    #[error("at least one per-child amount is required")]
    NoChildAmounts,
}

/// Floor and ceiling for a contribution base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseLimits {
    pub min: Decimal,
    pub max: Decimal,
    /// Limits are per day rather than per month.
    pub is_daily: bool,
}

/// Minimum contribution base for each group.
///
/// Monthly groups hold a monthly amount, daily groups a daily amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumBases {
    pub engineers: Decimal,
    pub technical_engineers: Decimal,
    pub administrative_heads: Decimal,
    pub other: Decimal,
    pub daily_adult: Decimal,
    pub minor: Decimal,
}

impl MinimumBases {
    pub fn for_group(
        &self,
        group: ContributionGroup,
    ) -> Decimal {
        match group {
            ContributionGroup::Engineers => self.engineers,
            ContributionGroup::TechnicalEngineers => self.technical_engineers,
            ContributionGroup::AdministrativeHeads => self.administrative_heads,
            ContributionGroup::Other => self.other,
            ContributionGroup::DailyAdult => self.daily_adult,
            ContributionGroup::Minor => self.minor,
        }
    }
}

/// Worker-side contribution rates, one per concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    pub common_contingencies: Decimal,
    pub unemployment_indefinite: Decimal,
    pub unemployment_temporary: Decimal,
    pub training: Decimal,
    pub mei: Decimal,
}

impl ContributionRates {
    pub fn unemployment(
        &self,
        contract: ContractType,
    ) -> Decimal {
        match contract {
            ContractType::Indefinite => self.unemployment_indefinite,
            ContractType::Temporary => self.unemployment_temporary,
        }
    }

    fn named(&self) -> [(&'static str, Decimal); 5] {
        [
            ("common_contingencies", self.common_contingencies),
            ("unemployment_indefinite", self.unemployment_indefinite),
            ("unemployment_temporary", self.unemployment_temporary),
            ("training", self.training),
            ("mei", self.mei),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityConfig {
    pub base_max_monthly: Decimal,
    pub base_max_daily: Decimal,
    pub days_in_month: u32,
    pub base_min: MinimumBases,
    pub rates: ContributionRates,
}

impl SocialSecurityConfig {
    /// Floor and ceiling that apply to `group`.
    pub fn limits_for(
        &self,
        group: ContributionGroup,
    ) -> BaseLimits {
        let is_daily = group.is_daily();
        BaseLimits {
            min: self.base_min.for_group(group),
            max: if is_daily {
                self.base_max_daily
            } else {
                self.base_max_monthly
            },
            is_daily,
        }
    }
}

/// Two-tier disability amounts plus the assistance extra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabilityAmounts {
    /// Degree of at least 33 %.
    pub moderate: Decimal,
    /// Degree of at least 65 %.
    pub severe: Decimal,
    /// Needs help from a third party or has reduced mobility.
    pub help_extra: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMinimumConfig {
    pub personal: Decimal,
    pub age_65_increment: Decimal,
    /// Added on top of the 65 increment.
    pub age_75_increment: Decimal,
    pub child_age_limit: u32,
    /// Amounts for the 1st, 2nd, 3rd and 4th-and-later child.
    pub child_amounts: Vec<Decimal>,
    pub child_under_3_extra: Decimal,
    pub ascendant_65: Decimal,
    pub ascendant_75: Decimal,
    pub own_disability: DisabilityAmounts,
    pub relative_disability: DisabilityAmounts,
}

/// Constants of the work-income reduction table.
///
/// The piecewise function is continuous by construction of these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkReductionConfig {
    pub first_threshold: Decimal,
    pub max_reduction: Decimal,
    pub second_threshold: Decimal,
    pub first_slope: Decimal,
    pub third_threshold: Decimal,
    pub second_base: Decimal,
    pub second_slope: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensesConfig {
    pub general: Decimal,
    pub geographic_mobility: Decimal,
    pub disabled_worker: Decimal,
    pub severely_disabled_worker: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingConfig {
    pub housing_gross_limit: Decimal,
    pub housing_rate: Decimal,
    pub housing_max: Decimal,
    /// Added to the family minimum when child-support annuities are paid.
    pub annuity_minimum_increment: Decimal,
    pub ceuta_melilla_factor: Decimal,
    /// Percentages, not fractions.
    pub max_rate: Decimal,
    pub min_rate_special: Decimal,
    pub min_rate_special_ceuta_melilla: Decimal,
    pub min_rate_short_contract: Decimal,
    pub min_rate_short_contract_ceuta_melilla: Decimal,
}

/// Every regulatory constant needed to go from gross to net for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearConfig {
    pub tax_year: i32,
    pub state_scale: BracketSchedule,
    pub regional_scale: BracketSchedule,
    pub social_security: SocialSecurityConfig,
    pub family_minimum: FamilyMinimumConfig,
    pub work_reduction: WorkReductionConfig,
    pub expenses: ExpensesConfig,
    pub withholding: WithholdingConfig,
}

impl FiscalYearConfig {
    /// The 2025 snapshot: state and Catalan scales, 2025 SS bases and rates.
    pub fn fy2025() -> Self {
        Self {
            tax_year: 2025,
            state_scale: BracketSchedule::from_trusted(vec![
                TaxBracket::new(dec!(0), Some(dec!(12450)), dec!(0.095)),
                TaxBracket::new(dec!(12450), Some(dec!(20200)), dec!(0.12)),
                TaxBracket::new(dec!(20200), Some(dec!(35200)), dec!(0.15)),
                TaxBracket::new(dec!(35200), Some(dec!(60000)), dec!(0.185)),
                TaxBracket::new(dec!(60000), Some(dec!(300000)), dec!(0.225)),
                TaxBracket::new(dec!(300000), None, dec!(0.245)),
            ]),
            regional_scale: BracketSchedule::from_trusted(vec![
                TaxBracket::new(dec!(0), Some(dec!(12450)), dec!(0.12)),
                TaxBracket::new(dec!(12450), Some(dec!(17707.20)), dec!(0.12)),
                TaxBracket::new(dec!(17707.20), Some(dec!(21000)), dec!(0.14)),
                TaxBracket::new(dec!(21000), Some(dec!(33007.20)), dec!(0.15)),
                TaxBracket::new(dec!(33007.20), Some(dec!(53407.20)), dec!(0.188)),
                TaxBracket::new(dec!(53407.20), Some(dec!(90000)), dec!(0.215)),
                TaxBracket::new(dec!(90000), None, dec!(0.235)),
            ]),
            social_security: SocialSecurityConfig {
                base_max_monthly: dec!(4909.50),
                base_max_daily: dec!(163.65),
                days_in_month: 30,
                base_min: MinimumBases {
                    engineers: dec!(1929.00),
                    technical_engineers: dec!(1599.60),
                    administrative_heads: dec!(1391.70),
                    other: dec!(1381.20),
                    daily_adult: dec!(46.04),
                    minor: dec!(46.04),
                },
                rates: ContributionRates {
                    common_contingencies: dec!(0.0470),
                    unemployment_indefinite: dec!(0.0155),
                    unemployment_temporary: dec!(0.0160),
                    training: dec!(0.0010),
                    mei: dec!(0.0013),
                },
            },
            family_minimum: FamilyMinimumConfig {
                personal: dec!(5550),
                age_65_increment: dec!(1150),
                age_75_increment: dec!(1400),
                child_age_limit: 25,
                child_amounts: vec![dec!(2400), dec!(2700), dec!(4000), dec!(4500)],
                child_under_3_extra: dec!(2800),
                ascendant_65: dec!(1150),
                ascendant_75: dec!(2550),
                own_disability: DisabilityAmounts {
                    moderate: dec!(3000),
                    severe: dec!(9000),
                    help_extra: dec!(3000),
                },
                relative_disability: DisabilityAmounts {
                    moderate: dec!(3000),
                    severe: dec!(9000),
                    help_extra: dec!(3000),
                },
            },
            work_reduction: WorkReductionConfig {
                first_threshold: dec!(14852),
                max_reduction: dec!(7302),
                second_threshold: dec!(17673.52),
                first_slope: dec!(1.75),
                third_threshold: dec!(19747.50),
                second_base: dec!(2364.34),
                second_slope: dec!(1.14),
            },
            expenses: ExpensesConfig {
                general: dec!(2000),
                geographic_mobility: dec!(2000),
                disabled_worker: dec!(3500),
                severely_disabled_worker: dec!(7750),
            },
            withholding: WithholdingConfig {
                housing_gross_limit: dec!(33007.20),
                housing_rate: dec!(0.02),
                housing_max: dec!(660.14),
                annuity_minimum_increment: dec!(1980),
                ceuta_melilla_factor: dec!(0.40),
                max_rate: dec!(47),
                min_rate_special: dec!(15),
                min_rate_special_ceuta_melilla: dec!(6),
                min_rate_short_contract: dec!(2),
                min_rate_short_contract_ceuta_melilla: dec!(0.80),
            },
        }
    }

    /// Checks that rates are fractions, amounts are non-negative and the
    /// thresholds are ordered.
    ///
    /// Scales are already validated when a [`BracketSchedule`] is built.
    ///
    /// # Errors
    ///
    /// Returns the first [`FiscalYearConfigError`] found.
    pub fn validate(&self) -> Result<(), FiscalYearConfigError> {
        let ss = &self.social_security;
        if ss.days_in_month == 0 {
            return Err(FiscalYearConfigError::ZeroDaysInMonth);
        }
        for (name, value) in ss.rates.named() {
            check_rate(name, value)?;
        }
        for group in ContributionGroup::ALL {
            let limits = ss.limits_for(group);
            check_amount("base_min", limits.min)?;
            if limits.min > limits.max {
                return Err(FiscalYearConfigError::MinimumAboveMaximum {
                    group: group.as_str(),
                    min: limits.min,
                    max: limits.max,
                });
            }
        }

        let family = &self.family_minimum;
        if family.child_amounts.is_empty() {
            return Err(FiscalYearConfigError::NoChildAmounts);
        }
        check_amount("personal", family.personal)?;
        check_amount("age_65_increment", family.age_65_increment)?;
        check_amount("age_75_increment", family.age_75_increment)?;
        check_amount("child_under_3_extra", family.child_under_3_extra)?;
        for amount in &family.child_amounts {
            check_amount("child_amounts", *amount)?;
        }

        let reduction = &self.work_reduction;
        if reduction.first_threshold >= reduction.second_threshold
            || reduction.second_threshold >= reduction.third_threshold
        {
            return Err(FiscalYearConfigError::ReductionThresholdsOutOfOrder);
        }
        check_amount("max_reduction", reduction.max_reduction)?;
        check_amount("second_base", reduction.second_base)?;

        check_amount("general", self.expenses.general)?;
        check_rate("housing_rate", self.withholding.housing_rate)?;
        check_rate("ceuta_melilla_factor", self.withholding.ceuta_melilla_factor)?;

        Ok(())
    }
}

fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), FiscalYearConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(FiscalYearConfigError::InvalidRate { name, value });
    }
    Ok(())
}

fn check_amount(
    name: &'static str,
    value: Decimal,
) -> Result<(), FiscalYearConfigError> {
    if value < Decimal::ZERO {
        return Err(FiscalYearConfigError::NegativeAmount { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fy2025_is_valid() {
        assert_eq!(FiscalYearConfig::fy2025().validate(), Ok(()));
    }

    #[test]
    fn fy2025_scales_satisfy_schedule_invariants() {
        let config = FiscalYearConfig::fy2025();

        assert!(BracketSchedule::new(config.state_scale.brackets().to_vec()).is_ok());
        assert!(BracketSchedule::new(config.regional_scale.brackets().to_vec()).is_ok());
    }

    #[test]
    fn limits_for_daily_group_use_daily_maximum() {
        let config = FiscalYearConfig::fy2025();

        let limits = config.social_security.limits_for(ContributionGroup::Minor);

        assert_eq!(
            limits,
            BaseLimits {
                min: dec!(46.04),
                max: dec!(163.65),
                is_daily: true,
            }
        );
    }

    #[test]
    fn limits_for_monthly_group_use_monthly_maximum() {
        let config = FiscalYearConfig::fy2025();

        let limits = config.social_security.limits_for(ContributionGroup::Other);

        assert_eq!(limits.min, dec!(1381.20));
        assert_eq!(limits.max, dec!(4909.50));
        assert!(!limits.is_daily);
    }

    #[test]
    fn unemployment_rate_depends_on_contract() {
        let rates = FiscalYearConfig::fy2025().social_security.rates;

        assert_eq!(rates.unemployment(ContractType::Indefinite), dec!(0.0155));
        assert_eq!(rates.unemployment(ContractType::Temporary), dec!(0.0160));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut config = FiscalYearConfig::fy2025();
        config.social_security.rates.mei = dec!(1.3);

        assert_eq!(
            config.validate(),
            Err(FiscalYearConfigError::InvalidRate {
                name: "mei",
                value: dec!(1.3),
            })
        );
    }

    #[test]
    fn validate_rejects_unordered_reduction_thresholds() {
        let mut config = FiscalYearConfig::fy2025();
        config.work_reduction.second_threshold = dec!(10000);

        assert_eq!(
            config.validate(),
            Err(FiscalYearConfigError::ReductionThresholdsOutOfOrder)
        );
    }

    #[test]
    fn validate_rejects_minimum_above_maximum() {
        let mut config = FiscalYearConfig::fy2025();
        config.social_security.base_min.engineers = dec!(5000);

        assert_eq!(
            config.validate(),
            Err(FiscalYearConfigError::MinimumAboveMaximum {
                group: "enginyeres",
                min: dec!(5000),
                max: dec!(4909.50),
            })
        );
    }
}
