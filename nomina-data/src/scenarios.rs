//! CSV loader for batches of salary scenarios.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter. Optional
//! columns may be left out entirely or left empty.
//!
//! | Column                   | Required | Type    | Notes                                  |
//! |--------------------------|----------|---------|----------------------------------------|
//! | `name`                   | yes      | string  | Label echoed in the output             |
//! | `gross`                  | yes      | decimal | Annual gross, e.g. `30000.00`          |
//! | `contribution_group`     | yes      | string  | Code (`altres`, `caps`, …) or label    |
//! | `pay_periods`            | no       | integer | Defaults to `12`                       |
//! | `prorated_extra_payments`| no       | bool    | Echoed only                            |
//! | `benefits_in_kind`       | no       | decimal |                                        |
//! | `contract_type`          | no       | string  | `indefinite` (default) or `temporary`  |
//! | `other_deductions`       | no       | decimal |                                        |
//! | `region`                 | no       | string  | Only `catalunya`                       |
//! | `geographic_mobility`    | no       | bool    | Adds the mobility expenses             |
//! | `worker_disability`      | no       | string  | `none` (default), `disabled`, `severe` |
//! | `age`                    | no       | integer | Defaults to `30`                       |
//! | `disability_percent`     | no       | integer |                                        |
//! | `needs_help`             | no       | bool    |                                        |
//! | `children_ages`          | no       | list    | Quote lists with commas: `"2,10"`      |
//! | `children_disabilities`  | no       | list    |                                        |
//! | `ascendant_ages`         | no       | list    |                                        |
//! | `relatives_disability`   | no       | list    |                                        |
//! | `relatives_help`         | no       | list    | `true`/`1`/`yes` entries are true      |
//!
//! ### Example
//!
//! ```csv
//! name,gross,contribution_group,pay_periods,children_ages
//! junior,22000,altres,14,
//! parent,38000,caps,12,"2,10"
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use nomina_core::PayrollInput;

use crate::request::{RequestError, SalaryRequest};

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    gross: Decimal,
    contribution_group: String,
    #[serde(default)]
    pay_periods: Option<u32>,
    #[serde(default)]
    prorated_extra_payments: Option<bool>,
    #[serde(default)]
    benefits_in_kind: Option<Decimal>,
    #[serde(default)]
    contract_type: Option<String>,
    #[serde(default)]
    other_deductions: Option<Decimal>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    geographic_mobility: Option<bool>,
    #[serde(default)]
    worker_disability: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    disability_percent: Option<u32>,
    #[serde(default)]
    needs_help: Option<bool>,
    #[serde(default)]
    children_ages: Option<String>,
    #[serde(default)]
    children_disabilities: Option<String>,
    #[serde(default)]
    ascendant_ages: Option<String>,
    #[serde(default)]
    relatives_disability: Option<String>,
    #[serde(default)]
    relatives_help: Option<String>,
}

/// Errors that can occur while loading a scenario batch.
#[derive(Debug, Error)]
pub enum ScenarioLoadError {
    /// Bad structure, missing required column or type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but its keys or lists are invalid. `row` is 1-based,
    /// not counting the header.
    #[error("invalid scenario '{name}' on row {row}: {source}")]
    InvalidRow {
        name: String,
        row: usize,
        source: RequestError,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// One named, validated scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    /// 1-based row number in the source file.
    pub row: usize,
    pub input: PayrollInput,
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Scenario, ScenarioLoadError> {
    let mut request = SalaryRequest::new(row.gross, &row.contribution_group);
    if let Some(pay_periods) = row.pay_periods {
        request.pay_periods = pay_periods;
    }
    if let Some(region) = row.region {
        request.region = region;
    }
    if let Some(contract_type) = row.contract_type {
        request.contract_type = contract_type;
    }
    if let Some(age) = row.age {
        request.age = age;
    }
    request.prorated_extra_payments = row.prorated_extra_payments.unwrap_or_default();
    request.benefits_in_kind = row.benefits_in_kind.unwrap_or_default();
    request.other_deductions = row.other_deductions.unwrap_or_default();
    request.geographic_mobility = row.geographic_mobility.unwrap_or_default();
    request.worker_disability = row.worker_disability.unwrap_or_default();
    request.disability_percent = row.disability_percent.unwrap_or_default();
    request.needs_help = row.needs_help.unwrap_or_default();
    request.children_ages = row.children_ages.unwrap_or_default();
    request.children_disabilities = row.children_disabilities.unwrap_or_default();
    request.ascendant_ages = row.ascendant_ages.unwrap_or_default();
    request.relatives_disability = row.relatives_disability.unwrap_or_default();
    request.relatives_help = row.relatives_help.unwrap_or_default();

    let input = request
        .to_input()
        .map_err(|source| ScenarioLoadError::InvalidRow {
            name: row.name.clone(),
            row: row_number,
            source,
        })?;

    Ok(Scenario {
        name: row.name,
        row: row_number,
        input,
    })
}

/// Parses CSV text into scenarios, in file order.
///
/// # Errors
///
/// * [`ScenarioLoadError::Parse`] if the CSV is malformed.
/// * [`ScenarioLoadError::InvalidRow`] for the first row whose keys or
///   lists do not validate.
pub fn load_from_str(input: &str) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let scenarios = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = scenarios.len(), "loaded scenarios");
    Ok(scenarios)
}

/// Reads `path` and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use nomina_core::{Child, ContractType, ContributionGroup, WorkerDisability};

    use super::*;

    const MINIMAL_CSV: &str = "\
name,gross,contribution_group
base,30000,altres
";

    const FULL_CSV: &str = "\
name,gross,contribution_group,pay_periods,benefits_in_kind,contract_type,other_deductions,region,age,disability_percent,needs_help,children_ages,children_disabilities,ascendant_ages,relatives_disability,relatives_help
family,42000.50,caps,14,1200,temporary,300,catalunya,45,0,false,\"2,10\",\"0,33\",78,65,yes
";

    #[test]
    fn load_minimal_row_uses_defaults() {
        let scenarios = load_from_str(MINIMAL_CSV).unwrap();

        assert_eq!(
            scenarios,
            vec![Scenario {
                name: "base".to_string(),
                row: 1,
                input: PayrollInput::new(dec!(30000), ContributionGroup::Other),
            }]
        );
    }

    #[test]
    fn load_full_row() {
        let scenarios = load_from_str(FULL_CSV).unwrap();
        let input = &scenarios[0].input;

        assert_eq!(input.gross_annual, dec!(42000.50));
        assert_eq!(input.contribution_group, ContributionGroup::AdministrativeHeads);
        assert_eq!(input.pay_periods, 14);
        assert_eq!(input.benefits_in_kind, dec!(1200));
        assert_eq!(input.contract_type, ContractType::Temporary);
        assert_eq!(input.other_deductions, dec!(300));
        assert_eq!(input.family.age, 45);
        assert_eq!(
            input.family.children,
            vec![Child::new(2), Child::with_disability(10, 33)]
        );
        assert_eq!(input.family.ascendant_ages, vec![78]);
        assert_eq!(input.family.relatives.len(), 1);
        assert!(input.family.relatives[0].needs_help);
    }

    #[test]
    fn empty_optional_cells_are_defaults() {
        let csv = "\
name,gross,contribution_group,pay_periods,age,children_ages
a,25000,altres,,,
";
        let scenarios = load_from_str(csv).unwrap();

        assert_eq!(scenarios[0].input.pay_periods, 12);
        assert_eq!(scenarios[0].input.family.age, 30);
        assert!(scenarios[0].input.family.children.is_empty());
    }

    #[test]
    fn expense_and_proration_columns_reach_the_input() {
        let csv = "\
name,gross,contribution_group,prorated_extra_payments,geographic_mobility,worker_disability
mover,30000,altres,true,true,severe
plain,30000,altres,,,
";
        let scenarios = load_from_str(csv).unwrap();

        let mover = &scenarios[0].input;
        assert!(mover.prorated_extra_payments);
        assert!(mover.geographic_mobility);
        assert_eq!(mover.worker_disability, WorkerDisability::SeverelyDisabled);

        let plain = &scenarios[1].input;
        assert!(!plain.prorated_extra_payments);
        assert!(!plain.geographic_mobility);
        assert_eq!(plain.worker_disability, WorkerDisability::None);
    }

    #[test]
    fn unknown_worker_disability_is_an_invalid_row() {
        let csv = "\
name,gross,contribution_group,worker_disability
a,30000,altres,partial
";

        assert!(matches!(
            load_from_str(csv),
            Err(ScenarioLoadError::InvalidRow {
                source: RequestError::UnknownWorkerDisability(_),
                ..
            })
        ));
    }

    #[test]
    fn invalid_group_reports_name_and_row() {
        let csv = "\
name,gross,contribution_group
ok,30000,altres
bad,30000,pilots
";
        let err = load_from_str(csv).unwrap_err();

        match err {
            ScenarioLoadError::InvalidRow { name, row, .. } => {
                assert_eq!(name, "bad");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_required_column_is_a_parse_error() {
        let csv = "name,gross\na,30000\n";

        assert!(matches!(
            load_from_str(csv),
            Err(ScenarioLoadError::Parse(_))
        ));
    }

    #[test]
    fn header_only_yields_no_scenarios() {
        let csv = "name,gross,contribution_group\n";

        assert_eq!(load_from_str(csv).unwrap(), vec![]);
    }
}
