//! Gross-to-net orchestration.
//!
//! # Steps
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Gross including benefits in kind |
//! | 2    | Monthly contribution base (gross / 12, limited by group) |
//! | 3    | Worker contributions, monthly and annual |
//! | 4    | Deductible expenses |
//! | 5    | Net work income (1 − annual contributions − 4 − other deductions) |
//! | 6    | Work-income reduction on 5 |
//! | 7    | Family minimum |
//! | 8    | Taxable base (5 − 6 − 7, minimum 0) |
//! | 9    | Annual IRPF on the combined state + regional scale |
//! | 10   | Per-period gross and tax (annual / periods), the monthly contribution, net |
//! | 11   | Monthly-equivalent net (net per period × periods / 12) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nomina_core::{ContributionGroup, FiscalYearConfig, NetPayCalculator, PayrollInput, Region};
//!
//! let calculator = NetPayCalculator::new(FiscalYearConfig::fy2025(), Region::Catalunya).unwrap();
//! let input = PayrollInput::new(dec!(30000), ContributionGroup::Other);
//!
//! let breakdown = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(breakdown.annual_contributions, dec!(1944.00));
//! assert!(breakdown.taxable_base < dec!(30000));
//! assert!(breakdown.net_per_period < dec!(2500));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::non_negative;
use crate::calculations::expenses::deductible_expenses;
use crate::calculations::family_minimum::FamilyMinimumCalculator;
use crate::calculations::scale::{combine_schedules, tax_on_base};
use crate::calculations::social_security::SocialSecurityCalculator;
use crate::calculations::withholding::WithholdingCalculator;
use crate::calculations::work_reduction::work_income_reduction;
use crate::models::{
    BracketSchedule, FiscalYearConfig, FiscalYearConfigError, PayrollInput, Region,
    SalaryBreakdown,
};

/// Errors that can occur while computing a salary breakdown.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollError {
    /// The number of pay periods must be at least one.
    #[error("pay periods must be at least 1, got {0}")]
    InvalidPayPeriods(u32),

    /// The fiscal-year configuration failed validation.
    #[error("invalid fiscal-year configuration: {0}")]
    InvalidConfig(#[from] FiscalYearConfigError),

    /// The input asks for a region this calculator was not built for.
    #[error("calculator is set up for region '{expected}', input asks for '{actual}'")]
    RegionMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A money input was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// Gross plus benefits in kind does not fit in a decimal amount.
    #[error("gross {gross} plus benefits in kind {benefits} is too large")]
    AmountTooLarge { gross: Decimal, benefits: Decimal },
}

/// Computes salary breakdowns for one fiscal year and region.
///
/// The combined scale is merged once, at construction; afterwards the
/// calculator is read-only and can be shared across threads.
#[derive(Debug, Clone)]
pub struct NetPayCalculator {
    config: FiscalYearConfig,
    region: Region,
    combined_scale: BracketSchedule,
}

impl NetPayCalculator {
    /// Validates `config` and prepares the combined scale for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn new(
        config: FiscalYearConfig,
        region: Region,
    ) -> Result<Self, PayrollError> {
        config.validate()?;
        let combined_scale = match region {
            Region::Catalunya => combine_schedules(&config.state_scale, &config.regional_scale),
        };
        Ok(Self {
            config,
            region,
            combined_scale,
        })
    }

    pub fn config(&self) -> &FiscalYearConfig {
        &self.config
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// The merged state + regional scale.
    pub fn combined_scale(&self) -> &BracketSchedule {
        &self.combined_scale
    }

    pub fn family_minimum(&self) -> FamilyMinimumCalculator<'_> {
        FamilyMinimumCalculator::new(&self.config.family_minimum)
    }

    pub fn social_security(&self) -> SocialSecurityCalculator<'_> {
        SocialSecurityCalculator::new(&self.config.social_security)
    }

    pub fn withholding(&self) -> WithholdingCalculator<'_> {
        WithholdingCalculator::new(&self.combined_scale, &self.config.withholding)
    }

    /// Runs the full gross-to-net calculation for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError`] if:
    /// - `pay_periods` is zero
    /// - the input's region differs from the calculator's
    /// - gross, benefits in kind or other deductions are negative
    /// - gross plus benefits in kind overflows
    pub fn calculate(
        &self,
        input: &PayrollInput,
    ) -> Result<SalaryBreakdown, PayrollError> {
        self.check_input(input)?;

        let gross_including_benefits = input
            .gross_annual
            .checked_add(input.benefits_in_kind)
            .ok_or(PayrollError::AmountTooLarge {
                gross: input.gross_annual,
                benefits: input.benefits_in_kind,
            })?;

        let social_security = self.social_security();
        let contribution_base =
            social_security.monthly_base(gross_including_benefits, input.contribution_group);
        let contributions = social_security.contributions(contribution_base, input.contract_type);
        let annual_contributions = contributions.annual_total();

        let deductible_expenses = deductible_expenses(
            &self.config.expenses,
            gross_including_benefits,
            annual_contributions,
            input.geographic_mobility,
            input.worker_disability,
        );

        let net_work_income = gross_including_benefits
            - annual_contributions
            - deductible_expenses
            - input.other_deductions;
        let work_income_reduction =
            work_income_reduction(&self.config.work_reduction, net_work_income);
        let family_minimum = self.family_minimum().calculate(&input.family);
        debug!(
            %net_work_income,
            %work_income_reduction,
            %family_minimum,
            "computed taxable base components"
        );

        let taxable_base = self.taxable_base(net_work_income, work_income_reduction, family_minimum);
        let annual_tax = tax_on_base(&self.combined_scale, taxable_base);

        let periods = Decimal::from(input.pay_periods);
        let gross_per_period = gross_including_benefits / periods;
        let contributions_per_period = contributions.monthly_total();
        let tax_per_period = annual_tax / periods;
        let net_per_period = gross_per_period - contributions_per_period - tax_per_period;
        let net_monthly_equivalent = net_per_period * periods / Decimal::from(12);

        Ok(SalaryBreakdown {
            input: input.clone(),
            gross_including_benefits,
            contribution_base,
            contributions,
            annual_contributions,
            deductible_expenses,
            net_work_income,
            work_income_reduction,
            family_minimum,
            taxable_base,
            annual_tax,
            gross_per_period,
            contributions_per_period,
            tax_per_period,
            net_per_period,
            net_monthly_equivalent,
        })
    }

    fn check_input(
        &self,
        input: &PayrollInput,
    ) -> Result<(), PayrollError> {
        if input.pay_periods == 0 {
            return Err(PayrollError::InvalidPayPeriods(input.pay_periods));
        }
        if input.region != self.region {
            return Err(PayrollError::RegionMismatch {
                expected: self.region.as_str(),
                actual: input.region.as_str(),
            });
        }
        for (field, value) in [
            ("gross_annual", input.gross_annual),
            ("benefits_in_kind", input.benefits_in_kind),
            ("other_deductions", input.other_deductions),
        ] {
            if value < Decimal::ZERO {
                return Err(PayrollError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }

    /// Net work income less reduction and minimum; never negative.
    fn taxable_base(
        &self,
        net_work_income: Decimal,
        reduction: Decimal,
        family_minimum: Decimal,
    ) -> Decimal {
        let base = net_work_income - reduction - family_minimum;
        if base < Decimal::ZERO {
            warn!(%base, "negative taxable base clamped to zero");
        }
        non_negative(base)
    }
}
