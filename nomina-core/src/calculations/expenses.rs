//! Deductible work expenses (otros gastos deducibles).
//!
//! Every worker deducts the general amount; geographic mobility and an
//! active worker's disability add to it. The total can never exceed the
//! income left after contributions.

use rust_decimal::Decimal;

use crate::models::{ExpensesConfig, WorkerDisability};

/// Expenses deductible from `gross` once `contributions` are paid.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nomina_core::{FiscalYearConfig, WorkerDisability};
/// use nomina_core::calculations::expenses::deductible_expenses;
///
/// let config = FiscalYearConfig::fy2025().expenses;
///
/// assert_eq!(
///     deductible_expenses(&config, dec!(30000), dec!(1944), false, WorkerDisability::None),
///     dec!(2000)
/// );
/// assert_eq!(
///     deductible_expenses(&config, dec!(1500), dec!(1000), false, WorkerDisability::None),
///     dec!(500)
/// );
/// ```
pub fn deductible_expenses(
    config: &ExpensesConfig,
    gross: Decimal,
    contributions: Decimal,
    geographic_mobility: bool,
    disability: WorkerDisability,
) -> Decimal {
    let available = gross - contributions;
    if available < Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mobility = if geographic_mobility {
        config.geographic_mobility
    } else {
        Decimal::ZERO
    };
    let disability = match disability {
        WorkerDisability::None => Decimal::ZERO,
        WorkerDisability::Disabled => config.disabled_worker,
        WorkerDisability::SeverelyDisabled => config.severely_disabled_worker,
    };

    (config.general + mobility + disability).min(available)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::FiscalYearConfig;

    fn config() -> ExpensesConfig {
        FiscalYearConfig::fy2025().expenses
    }

    #[test]
    fn general_expense_only() {
        let result =
            deductible_expenses(&config(), dec!(30000), dec!(1944), false, WorkerDisability::None);

        assert_eq!(result, dec!(2000));
    }

    #[test]
    fn mobility_and_severe_disability_add_up() {
        let result = deductible_expenses(
            &config(),
            dec!(30000),
            dec!(1944),
            true,
            WorkerDisability::SeverelyDisabled,
        );

        assert_eq!(result, dec!(11750));
    }

    #[test]
    fn moderate_disability_increment() {
        let result =
            deductible_expenses(&config(), dec!(30000), dec!(1944), false, WorkerDisability::Disabled);

        assert_eq!(result, dec!(5500));
    }

    #[test]
    fn capped_at_income_after_contributions() {
        let result =
            deductible_expenses(&config(), dec!(1500), dec!(1000), true, WorkerDisability::None);

        assert_eq!(result, dec!(500));
    }

    #[test]
    fn zero_when_contributions_exceed_gross() {
        let result =
            deductible_expenses(&config(), dec!(0), dec!(1074.01), false, WorkerDisability::None);

        assert_eq!(result, dec!(0));
    }
}
