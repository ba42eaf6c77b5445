//! Request-level inputs and their conversion into [`PayrollInput`].
//!
//! A request carries everything as flat values: string keys for the
//! contribution group, contract type and region, and comma-separated lists
//! for children, ascendants and dependent relatives. Keys and lists are
//! validated here so the calculators only ever see well-formed inputs.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nomina_data::SalaryRequest;
//!
//! let mut request = SalaryRequest::new(dec!(30000), "altres");
//! request.children_ages = "2, 10".to_string();
//!
//! let input = request.to_input().unwrap();
//!
//! assert_eq!(input.family.children.len(), 2);
//! assert_eq!(input.family.children[0].age, 2);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nomina_core::{
    Child, ConfigurationError, ContractType, ContributionGroup, DependentRelative,
    FamilyProfile, PayrollInput, Region, WorkerDisability,
};

/// Errors raised while turning a request into a [`PayrollInput`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A list entry is not a non-negative integer.
    #[error("invalid entry '{token}' in list '{field}'")]
    InvalidList { field: &'static str, token: String },

    /// A list is longer than the list it annotates.
    #[error("'{field}' has {len} entries but '{other}' only has {other_len}")]
    ListLengthMismatch {
        field: &'static str,
        len: usize,
        other: &'static str,
        other_len: usize,
    },

    #[error("unknown worker disability '{0}' (expected 'none', 'disabled' or 'severe')")]
    UnknownWorkerDisability(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// A single gross-to-net request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRequest {
    pub gross: Decimal,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_pay_periods")]
    pub pay_periods: u32,
    #[serde(default)]
    pub prorated_extra_payments: bool,
    #[serde(default)]
    pub benefits_in_kind: Decimal,
    pub contribution_group: String,
    #[serde(default = "default_contract_type")]
    pub contract_type: String,
    #[serde(default)]
    pub other_deductions: Decimal,
    #[serde(default)]
    pub geographic_mobility: bool,
    #[serde(default)]
    pub worker_disability: String,
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default)]
    pub disability_percent: u32,
    #[serde(default)]
    pub needs_help: bool,
    #[serde(default)]
    pub children_ages: String,
    #[serde(default)]
    pub children_disabilities: String,
    #[serde(default)]
    pub ascendant_ages: String,
    #[serde(default)]
    pub relatives_disability: String,
    #[serde(default)]
    pub relatives_help: String,
}

fn default_region() -> String {
    Region::Catalunya.as_str().to_string()
}

fn default_pay_periods() -> u32 {
    12
}

fn default_contract_type() -> String {
    ContractType::Indefinite.as_str().to_string()
}

fn default_age() -> u32 {
    30
}

impl SalaryRequest {
    /// A request with defaults everywhere except gross and group.
    pub fn new(
        gross: Decimal,
        contribution_group: &str,
    ) -> Self {
        Self {
            gross,
            region: default_region(),
            pay_periods: default_pay_periods(),
            prorated_extra_payments: false,
            benefits_in_kind: Decimal::ZERO,
            contribution_group: contribution_group.to_string(),
            contract_type: default_contract_type(),
            other_deductions: Decimal::ZERO,
            geographic_mobility: false,
            worker_disability: String::new(),
            age: default_age(),
            disability_percent: 0,
            needs_help: false,
            children_ages: String::new(),
            children_disabilities: String::new(),
            ascendant_ages: String::new(),
            relatives_disability: String::new(),
            relatives_help: String::new(),
        }
    }

    /// Validates every key and list and builds the calculator input.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] for unknown keys, malformed list entries,
    /// or annotation lists longer than the list they annotate.
    pub fn to_input(&self) -> Result<PayrollInput, RequestError> {
        let contribution_group = ContributionGroup::parse(&self.contribution_group)?;

        Ok(PayrollInput {
            gross_annual: self.gross,
            benefits_in_kind: self.benefits_in_kind,
            pay_periods: self.pay_periods,
            prorated_extra_payments: self.prorated_extra_payments,
            contribution_group,
            contract_type: ContractType::parse(&self.contract_type)?,
            other_deductions: self.other_deductions,
            region: Region::parse(&self.region)?,
            geographic_mobility: self.geographic_mobility,
            worker_disability: parse_worker_disability(&self.worker_disability)?,
            family: self.family()?,
        })
    }

    fn family(&self) -> Result<FamilyProfile, RequestError> {
        let ages = parse_int_list("children_ages", &self.children_ages)?;
        let disabilities = parse_int_list("children_disabilities", &self.children_disabilities)?;
        let disabilities = pad_to(
            disabilities,
            0,
            ("children_disabilities", "children_ages"),
            ages.len(),
        )?;
        let children = ages
            .into_iter()
            .zip(disabilities)
            .map(|(age, percent)| Child::with_disability(age, percent))
            .collect();

        let percents = parse_int_list("relatives_disability", &self.relatives_disability)?;
        let help = pad_to(
            parse_bool_list(&self.relatives_help),
            false,
            ("relatives_help", "relatives_disability"),
            percents.len(),
        )?;
        let relatives = percents
            .into_iter()
            .zip(help)
            .map(|(disability_percent, needs_help)| DependentRelative {
                disability_percent,
                needs_help,
            })
            .collect();

        Ok(FamilyProfile {
            age: self.age,
            children,
            ascendant_ages: parse_int_list("ascendant_ages", &self.ascendant_ages)?,
            disability_percent: self.disability_percent,
            needs_help: self.needs_help,
            relatives,
        })
    }
}

/// Two gross salaries under otherwise identical circumstances.
///
/// Only the taxpayer's age is taken into account for the family minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementRequest {
    pub previous_gross: Decimal,
    pub new_gross: Decimal,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_pay_periods")]
    pub pay_periods: u32,
    #[serde(default)]
    pub prorated_extra_payments: bool,
    #[serde(default)]
    pub benefits_in_kind: Decimal,
    pub contribution_group: String,
    #[serde(default = "default_contract_type")]
    pub contract_type: String,
    #[serde(default)]
    pub other_deductions: Decimal,
    #[serde(default = "default_age")]
    pub age: u32,
}

impl IncrementRequest {
    /// Input for the previous gross; the new gross is applied with
    /// [`PayrollInput::with_gross`].
    pub fn to_input(&self) -> Result<PayrollInput, RequestError> {
        let mut request = SalaryRequest::new(self.previous_gross, &self.contribution_group);
        request.region = self.region.clone();
        request.pay_periods = self.pay_periods;
        request.prorated_extra_payments = self.prorated_extra_payments;
        request.benefits_in_kind = self.benefits_in_kind;
        request.contract_type = self.contract_type.clone();
        request.other_deductions = self.other_deductions;
        request.age = self.age;
        request.to_input()
    }
}

/// Splits a comma-separated list of non-negative integers.
///
/// Blank entries are skipped, so `""`, `" "` and `"3,,5"` are all fine.
///
/// # Errors
///
/// Returns [`RequestError::InvalidList`] naming `field` and the first
/// entry that is not an integer.
pub fn parse_int_list(
    field: &'static str,
    list: &str,
) -> Result<Vec<u32>, RequestError> {
    tokens(list)
        .map(|token| {
            token.parse::<u32>().map_err(|_| RequestError::InvalidList {
                field,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Splits a comma-separated list of flags: `true`, `1` and `yes` are true
/// (any case); any other entry is false.
pub fn parse_bool_list(list: &str) -> Vec<bool> {
    tokens(list)
        .map(|token| matches!(token.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .collect()
}

fn tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|token| !token.is_empty())
}

fn pad_to<T: Clone>(
    mut values: Vec<T>,
    fill: T,
    (field, other): (&'static str, &'static str),
    len: usize,
) -> Result<Vec<T>, RequestError> {
    if values.len() > len {
        return Err(RequestError::ListLengthMismatch {
            field,
            len: values.len(),
            other,
            other_len: len,
        });
    }
    values.resize(len, fill);
    Ok(values)
}

fn parse_worker_disability(key: &str) -> Result<WorkerDisability, RequestError> {
    match key.trim().to_ascii_lowercase().as_str() {
        "" | "none" => Ok(WorkerDisability::None),
        "disabled" => Ok(WorkerDisability::Disabled),
        "severe" | "severely_disabled" => Ok(WorkerDisability::SeverelyDisabled),
        _ => Err(RequestError::UnknownWorkerDisability(key.to_string())),
    }
}
