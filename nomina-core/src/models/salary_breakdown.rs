use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ContractType, ContributionGroup, FamilyProfile, Region};
use crate::calculations::common::round_euro;

/// Disability status of the worker for the deductible-expenses increment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerDisability {
    #[default]
    None,
    /// Degree between 33 % and 65 %.
    Disabled,
    /// Degree of at least 65 %, or needing assistance or having reduced mobility.
    SeverelyDisabled,
}

/// Everything the orchestrator needs for one gross-to-net calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    pub gross_annual: Decimal,
    #[serde(default)]
    pub benefits_in_kind: Decimal,
    pub pay_periods: u32,
    /// Echoed only; extra payments are always treated as prorated for the
    /// contribution base.
    #[serde(default)]
    pub prorated_extra_payments: bool,
    pub contribution_group: ContributionGroup,
    #[serde(default)]
    pub contract_type: ContractType,
    #[serde(default)]
    pub other_deductions: Decimal,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub geographic_mobility: bool,
    #[serde(default)]
    pub worker_disability: WorkerDisability,
    #[serde(default)]
    pub family: FamilyProfile,
}

impl PayrollInput {
    /// Input with the given gross, 12 periods, no extras and a 30-year-old
    /// taxpayer without dependents.
    pub fn new(
        gross_annual: Decimal,
        contribution_group: ContributionGroup,
    ) -> Self {
        Self {
            gross_annual,
            benefits_in_kind: Decimal::ZERO,
            pay_periods: 12,
            prorated_extra_payments: false,
            contribution_group,
            contract_type: ContractType::Indefinite,
            other_deductions: Decimal::ZERO,
            region: Region::Catalunya,
            geographic_mobility: false,
            worker_disability: WorkerDisability::None,
            family: FamilyProfile::default(),
        }
    }

    /// The same scenario with a different gross salary.
    pub fn with_gross(
        &self,
        gross_annual: Decimal,
    ) -> Self {
        Self {
            gross_annual,
            ..self.clone()
        }
    }
}

/// The four worker-side contribution concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionConcept {
    CommonContingencies,
    Unemployment,
    Training,
    Mei,
}

impl ContributionConcept {
    pub const ALL: [ContributionConcept; 4] = [
        Self::CommonContingencies,
        Self::Unemployment,
        Self::Training,
        Self::Mei,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CommonContingencies => "Common contingencies",
            Self::Unemployment => "Unemployment",
            Self::Training => "Vocational training",
            Self::Mei => "MEI",
        }
    }
}

/// Worker contributions for one month, per concept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    pub common_contingencies: Decimal,
    pub unemployment: Decimal,
    pub training: Decimal,
    pub mei: Decimal,
}

impl ContributionBreakdown {
    pub fn monthly(
        &self,
        concept: ContributionConcept,
    ) -> Decimal {
        match concept {
            ContributionConcept::CommonContingencies => self.common_contingencies,
            ContributionConcept::Unemployment => self.unemployment,
            ContributionConcept::Training => self.training,
            ContributionConcept::Mei => self.mei,
        }
    }

    /// Twelve monthly contributions; mid-year changes are not modelled.
    pub fn annual(
        &self,
        concept: ContributionConcept,
    ) -> Decimal {
        self.monthly(concept) * Decimal::from(12)
    }

    pub fn monthly_total(&self) -> Decimal {
        self.common_contingencies + self.unemployment + self.training + self.mei
    }

    pub fn annual_total(&self) -> Decimal {
        self.monthly_total() * Decimal::from(12)
    }
}

/// Full result of one gross-to-net calculation.
///
/// Values are unrounded; use [`SalaryBreakdown::summary`] for the rounded
/// figures shown to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub input: PayrollInput,
    pub gross_including_benefits: Decimal,
    /// Monthly contribution base after applying the group's limits.
    pub contribution_base: Decimal,
    pub contributions: ContributionBreakdown,
    pub annual_contributions: Decimal,
    pub deductible_expenses: Decimal,
    pub net_work_income: Decimal,
    pub work_income_reduction: Decimal,
    pub family_minimum: Decimal,
    pub taxable_base: Decimal,
    pub annual_tax: Decimal,
    pub gross_per_period: Decimal,
    pub contributions_per_period: Decimal,
    pub tax_per_period: Decimal,
    pub net_per_period: Decimal,
    pub net_monthly_equivalent: Decimal,
}

impl SalaryBreakdown {
    pub fn net_annual(&self) -> Decimal {
        self.net_per_period * Decimal::from(self.input.pay_periods)
    }

    pub fn summary(&self) -> NetPaySummary {
        NetPaySummary {
            net_per_period: round_euro(self.net_per_period),
            net_monthly_equivalent: round_euro(self.net_monthly_equivalent),
            annual_tax: round_euro(self.annual_tax),
            annual_contributions: round_euro(self.annual_contributions),
        }
    }
}

/// The rounded figures returned to callers of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPaySummary {
    pub net_per_period: Decimal,
    pub net_monthly_equivalent: Decimal,
    pub annual_tax: Decimal,
    pub annual_contributions: Decimal,
}
