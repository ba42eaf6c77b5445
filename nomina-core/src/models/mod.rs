mod configuration_error;
mod contribution_group;
mod family_profile;
mod fiscal_year_config;
mod salary_breakdown;
mod tax_bracket;

pub use configuration_error::ConfigurationError;
pub use contribution_group::{ContractType, ContributionGroup, Region};
pub use family_profile::{Child, DependentRelative, FamilyProfile};
pub use fiscal_year_config::{
    BaseLimits, ContributionRates, DisabilityAmounts, ExpensesConfig, FamilyMinimumConfig,
    FiscalYearConfig, FiscalYearConfigError, MinimumBases, SocialSecurityConfig,
    WithholdingConfig, WorkReductionConfig,
};
pub use salary_breakdown::{
    ContributionBreakdown, ContributionConcept, NetPaySummary, PayrollInput, SalaryBreakdown,
    WorkerDisability,
};
pub use tax_bracket::{BracketSchedule, ScheduleError, TaxBracket};
