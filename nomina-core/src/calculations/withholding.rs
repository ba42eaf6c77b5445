//! Withholding quota and withholding rate.
//!
//! Unlike the net-pay orchestrator, which subtracts the family minimum from
//! the base, the withholding procedure taxes the base and the minimum
//! separately on the same scale and takes the difference. The rate is the
//! quota over gross pay, truncated, with floors by contract duration and an
//! overall ceiling. Regularization during the year is not modelled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{non_negative, truncate_euro};
use crate::calculations::scale::tax_on_base;
use crate::models::{BracketSchedule, SalaryBreakdown, WithholdingConfig};

/// Contract classes that carry a minimum withholding rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithholdingContract {
    #[default]
    General,
    /// Special employment relationships.
    Special,
    /// Contracts shorter than one year.
    UnderOneYear,
}

/// Inputs of the withholding-rate calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingInput {
    /// Annual gross pay (retribuciones).
    pub gross: Decimal,
    /// Base for withholding: net work income after reduction.
    pub base: Decimal,
    pub family_minimum: Decimal,
    /// Child-support annuities paid by court order.
    #[serde(default)]
    pub annuities: Decimal,
    /// Paying a home loan that entitles to the housing reduction.
    #[serde(default)]
    pub home_loan: bool,
    /// Residence in Ceuta, Melilla or La Palma.
    #[serde(default)]
    pub ceuta_melilla: bool,
    #[serde(default)]
    pub contract: WithholdingContract,
}

impl WithholdingInput {
    /// Inputs taken from a gross-to-net breakdown: gross including benefits,
    /// and net work income after the reduction as the base. The other
    /// circumstances start at their defaults.
    pub fn from_breakdown(breakdown: &SalaryBreakdown) -> Self {
        Self {
            gross: breakdown.gross_including_benefits,
            base: non_negative(breakdown.net_work_income - breakdown.work_income_reduction),
            family_minimum: breakdown.family_minimum,
            annuities: Decimal::ZERO,
            home_loan: false,
            ceuta_melilla: false,
            contract: WithholdingContract::General,
        }
    }
}

/// Result of [`WithholdingCalculator::calculate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingResult {
    pub quota: Decimal,
    pub housing_reduction: Decimal,
    /// Percentage, truncated to two decimals.
    pub rate: Decimal,
    /// `gross × rate / 100`, truncated.
    pub annual_withholding: Decimal,
}

/// Quota owed on `base` once the tax on the family minimum is removed.
///
/// With annuities smaller than the base, the base is split into the
/// annuities and the rest, each taxed on its own, and the minimum side is
/// increased by `annuity_minimum_increment`.
pub fn withholding_quota(
    schedule: &BracketSchedule,
    config: &WithholdingConfig,
    base: Decimal,
    family_minimum: Decimal,
    annuities: Decimal,
) -> Decimal {
    let split = annuities > Decimal::ZERO && base - annuities > Decimal::ZERO;

    let (on_base, on_minimum) = if split {
        (
            tax_on_base(schedule, base - annuities) + tax_on_base(schedule, annuities),
            tax_on_base(schedule, family_minimum + config.annuity_minimum_increment),
        )
    } else {
        (
            tax_on_base(schedule, base),
            tax_on_base(schedule, family_minimum),
        )
    };

    non_negative(on_base - on_minimum)
}

/// Housing reduction (minoración por vivienda) for gross pay under the limit.
pub fn housing_reduction(
    config: &WithholdingConfig,
    gross: Decimal,
    home_loan: bool,
) -> Decimal {
    if !home_loan || gross >= config.housing_gross_limit {
        return Decimal::ZERO;
    }
    truncate_euro(gross * config.housing_rate).min(config.housing_max)
}

/// Withholding computations bound to a scale and a year's constants.
#[derive(Debug, Clone, Copy)]
pub struct WithholdingCalculator<'a> {
    schedule: &'a BracketSchedule,
    config: &'a WithholdingConfig,
}

impl<'a> WithholdingCalculator<'a> {
    pub fn new(
        schedule: &'a BracketSchedule,
        config: &'a WithholdingConfig,
    ) -> Self {
        Self { schedule, config }
    }

    pub fn calculate(
        &self,
        input: &WithholdingInput,
    ) -> WithholdingResult {
        let quota = withholding_quota(
            self.schedule,
            self.config,
            input.base,
            input.family_minimum,
            input.annuities,
        );
        let housing = housing_reduction(self.config, input.gross, input.home_loan);
        let rate = withholding_rate(
            self.config,
            quota,
            housing,
            input.gross,
            input.ceuta_melilla,
            input.contract,
        );

        WithholdingResult {
            quota,
            housing_reduction: housing,
            rate,
            annual_withholding: truncate_euro(input.gross * rate / Decimal::ONE_HUNDRED),
        }
    }
}

/// Withholding percentage: the quota less the housing reduction over gross,
/// truncated, raised to the contract's floor and capped at the maximum.
///
/// Residents of Ceuta and Melilla have their quota reduced first.
pub fn withholding_rate(
    config: &WithholdingConfig,
    quota: Decimal,
    housing: Decimal,
    gross: Decimal,
    ceuta_melilla: bool,
    contract: WithholdingContract,
) -> Decimal {
    let quota = if ceuta_melilla {
        quota * config.ceuta_melilla_factor
    } else {
        quota
    };
    let difference = non_negative(quota - housing);

    let rate = if gross > Decimal::ZERO {
        truncate_euro(difference / gross * Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    let floor = match (contract, ceuta_melilla) {
        (WithholdingContract::General, _) => Decimal::ZERO,
        (WithholdingContract::Special, false) => config.min_rate_special,
        (WithholdingContract::Special, true) => config.min_rate_special_ceuta_melilla,
        (WithholdingContract::UnderOneYear, false) => config.min_rate_short_contract,
        (WithholdingContract::UnderOneYear, true) => config.min_rate_short_contract_ceuta_melilla,
    };

    rate.max(floor).min(config.max_rate)
}
