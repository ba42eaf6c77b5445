//! Reduction for obtaining work income (reducción por obtención de
//! rendimientos del trabajo).
//!
//! | Net work income `rn`              | Reduction                              |
//! |-----------------------------------|----------------------------------------|
//! | `rn <= first_threshold`           | `max_reduction`                        |
//! | `rn <= second_threshold`          | `max_reduction - first_slope × excess` |
//! | `rn <= third_threshold`           | `second_base - second_slope × excess`  |
//! | above                             | 0                                      |
//!
//! `excess` is measured from the previous threshold. Sloped tiers are rounded
//! to the cent and never go below zero.

use rust_decimal::Decimal;

use crate::calculations::common::{non_negative, round_euro};
use crate::models::WorkReductionConfig;

/// Reduction applicable to `net_work_income`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nomina_core::FiscalYearConfig;
/// use nomina_core::calculations::work_reduction::work_income_reduction;
///
/// let config = FiscalYearConfig::fy2025().work_reduction;
///
/// assert_eq!(work_income_reduction(&config, dec!(12000)), dec!(7302));
/// assert_eq!(work_income_reduction(&config, dec!(16000)), dec!(5293.00));
/// assert_eq!(work_income_reduction(&config, dec!(25000)), dec!(0));
/// ```
pub fn work_income_reduction(
    config: &WorkReductionConfig,
    net_work_income: Decimal,
) -> Decimal {
    let rn = net_work_income;
    if rn <= config.first_threshold {
        return config.max_reduction;
    }
    if rn <= config.second_threshold {
        let value = config.max_reduction - config.first_slope * (rn - config.first_threshold);
        return non_negative(round_euro(value));
    }
    if rn <= config.third_threshold {
        let value = config.second_base - config.second_slope * (rn - config.second_threshold);
        return non_negative(round_euro(value));
    }
    Decimal::ZERO
}
