//! Personal and family minimum (mínimo personal y familiar).
//!
//! The minimum is the sum of independent allowances: the taxpayer's own
//! (with age increments), one per qualifying child, one per elderly
//! ascendant, and the disability amounts for the taxpayer and each dependent.
//! Children and ascendant sub-totals are rounded before being added, and the
//! grand total is rounded again.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nomina_core::calculations::FamilyMinimumCalculator;
//! use nomina_core::{Child, FamilyProfile, FiscalYearConfig};
//!
//! let config = FiscalYearConfig::fy2025();
//! let calculator = FamilyMinimumCalculator::new(&config.family_minimum);
//!
//! let mut profile = FamilyProfile::single(40);
//! profile.children = vec![Child::new(2), Child::new(10)];
//!
//! // 5550 + 2400 + 2700 + 2800 (first child is under 3)
//! assert_eq!(calculator.calculate(&profile), dec!(13450.00));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_euro;
use crate::models::{DisabilityAmounts, FamilyMinimumConfig, FamilyProfile};

const AGE_65: u32 = 65;
const AGE_75: u32 = 75;
const CHILD_UNDER_3: u32 = 3;
const DISABILITY_MODERATE: u32 = 33;
const DISABILITY_SEVERE: u32 = 65;

/// Computes the family minimum from a [`FamilyProfile`].
#[derive(Debug, Clone, Copy)]
pub struct FamilyMinimumCalculator<'a> {
    config: &'a FamilyMinimumConfig,
}

impl<'a> FamilyMinimumCalculator<'a> {
    pub fn new(config: &'a FamilyMinimumConfig) -> Self {
        Self { config }
    }

    /// Total tax-free allowance for `profile`, rounded to the cent.
    pub fn calculate(
        &self,
        profile: &FamilyProfile,
    ) -> Decimal {
        let total = self.taxpayer(profile.age)
            + self.children(profile)
            + self.ascendants(&profile.ascendant_ages)
            + self.disability(profile);
        round_euro(total)
    }

    /// Personal allowance plus the cumulative 65 and 75 increments.
    fn taxpayer(
        &self,
        age: u32,
    ) -> Decimal {
        let mut minimum = self.config.personal;
        if age >= AGE_65 {
            minimum += self.config.age_65_increment;
        }
        if age >= AGE_75 {
            minimum += self.config.age_75_increment;
        }
        minimum
    }

    /// Per-child amounts by birth order, plus the under-3 extra. Children
    /// past the age limit add nothing but keep their place in the order.
    fn children(
        &self,
        profile: &FamilyProfile,
    ) -> Decimal {
        let mut by_order = Decimal::ZERO;
        let mut under_3 = Decimal::ZERO;
        for (index, child) in profile.children.iter().enumerate() {
            if child.age >= self.config.child_age_limit {
                continue;
            }
            by_order += self.child_amount(index);
            if child.age < CHILD_UNDER_3 {
                under_3 += self.config.child_under_3_extra;
            }
        }
        round_euro(by_order) + round_euro(under_3)
    }

    /// Amount for the child at zero-based `index`; beyond the table, the
    /// last tier repeats.
    fn child_amount(
        &self,
        index: usize,
    ) -> Decimal {
        let amounts = &self.config.child_amounts;
        amounts
            .get(index)
            .or_else(|| amounts.last())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// One tier per ascendant: 75 and over, or 65 to 74.
    fn ascendants(
        &self,
        ages: &[u32],
    ) -> Decimal {
        let total: Decimal = ages
            .iter()
            .map(|&age| {
                if age >= AGE_75 {
                    self.config.ascendant_75
                } else if age >= AGE_65 {
                    self.config.ascendant_65
                } else {
                    Decimal::ZERO
                }
            })
            .sum();
        round_euro(total)
    }

    fn disability(
        &self,
        profile: &FamilyProfile,
    ) -> Decimal {
        let own = disability_amount(
            &self.config.own_disability,
            profile.disability_percent,
            profile.needs_help,
        );

        let relatives = &self.config.relative_disability;
        let children: Decimal = profile
            .children
            .iter()
            .map(|child| disability_amount(relatives, child.disability_percent, false))
            .sum();
        let others: Decimal = profile
            .relatives
            .iter()
            .map(|relative| {
                disability_amount(relatives, relative.disability_percent, relative.needs_help)
            })
            .sum();

        own + children + others
    }
}

/// Two-tier disability amount plus the assistance extra.
fn disability_amount(
    amounts: &DisabilityAmounts,
    percent: u32,
    needs_help: bool,
) -> Decimal {
    let tier = if percent >= DISABILITY_SEVERE {
        amounts.severe
    } else if percent >= DISABILITY_MODERATE {
        amounts.moderate
    } else {
        Decimal::ZERO
    };
    if needs_help {
        tier + amounts.help_extra
    } else {
        tier
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Child, DependentRelative, FiscalYearConfig};

    fn minimum(profile: &FamilyProfile) -> Decimal {
        let config = FiscalYearConfig::fy2025();
        FamilyMinimumCalculator::new(&config.family_minimum).calculate(profile)
    }

    // =========================================================================
    // taxpayer tests
    // =========================================================================

    #[test]
    fn young_taxpayer_gets_personal_allowance_only() {
        assert_eq!(minimum(&FamilyProfile::single(30)), dec!(5550.00));
    }

    #[test]
    fn age_70_adds_only_the_65_increment() {
        assert_eq!(minimum(&FamilyProfile::single(70)), dec!(6700.00));
    }

    #[test]
    fn age_80_adds_both_increments() {
        assert_eq!(minimum(&FamilyProfile::single(80)), dec!(8100.00));
    }

    #[test]
    fn age_thresholds_are_inclusive() {
        assert_eq!(minimum(&FamilyProfile::single(65)), dec!(6700.00));
        assert_eq!(minimum(&FamilyProfile::single(75)), dec!(8100.00));
    }

    // =========================================================================
    // children tests
    // =========================================================================

    #[test]
    fn two_children_get_first_and_second_amounts_and_one_under_3_extra() {
        let mut profile = FamilyProfile::single(30);
        profile.children = vec![Child::new(2), Child::new(10)];

        assert_eq!(minimum(&profile), dec!(13450.00));
    }

    #[test]
    fn fifth_child_reuses_last_tier() {
        let mut profile = FamilyProfile::single(30);
        profile.children = (0..5).map(|_| Child::new(10)).collect();

        // 2400 + 2700 + 4000 + 4500 + 4500
        assert_eq!(minimum(&profile), dec!(5550) + dec!(18100));
    }

    #[test]
    fn children_25_and_over_add_nothing_but_keep_their_order_slot() {
        let mut profile = FamilyProfile::single(50);
        profile.children = vec![Child::new(27), Child::new(20)];

        assert_eq!(minimum(&profile), dec!(5550) + dec!(2700));
    }

    #[test]
    fn younger_sibling_after_two_adults_gets_third_child_amount() {
        let mut profile = FamilyProfile::single(55);
        profile.children = vec![Child::new(30), Child::new(26), Child::new(2)];

        assert_eq!(minimum(&profile), dec!(5550) + dec!(4000) + dec!(2800));
    }

    #[test]
    fn disabled_child_adds_relative_disability_amount() {
        let mut profile = FamilyProfile::single(30);
        profile.children = vec![Child::with_disability(10, 40)];

        assert_eq!(minimum(&profile), dec!(5550) + dec!(2400) + dec!(3000));
    }

    // =========================================================================
    // ascendant tests
    // =========================================================================

    #[test]
    fn ascendants_use_a_single_tier_each() {
        let mut profile = FamilyProfile::single(45);
        profile.ascendant_ages = vec![60, 68, 80];

        assert_eq!(minimum(&profile), dec!(5550) + dec!(1150) + dec!(2550));
    }

    // =========================================================================
    // disability tests
    // =========================================================================

    #[test]
    fn own_disability_tiers() {
        let mut profile = FamilyProfile::single(30);

        profile.disability_percent = 32;
        assert_eq!(minimum(&profile), dec!(5550.00));

        profile.disability_percent = 33;
        assert_eq!(minimum(&profile), dec!(8550.00));

        profile.disability_percent = 65;
        assert_eq!(minimum(&profile), dec!(14550.00));
    }

    #[test]
    fn own_help_extra_is_independent_of_degree() {
        let mut profile = FamilyProfile::single(30);
        profile.needs_help = true;

        assert_eq!(minimum(&profile), dec!(8550.00));
    }

    #[test]
    fn relatives_disability_and_help() {
        let mut profile = FamilyProfile::single(30);
        profile.relatives = vec![
            DependentRelative {
                disability_percent: 70,
                needs_help: true,
            },
            DependentRelative {
                disability_percent: 10,
                needs_help: false,
            },
        ];

        assert_eq!(minimum(&profile), dec!(5550) + dec!(9000) + dec!(3000));
    }
}
