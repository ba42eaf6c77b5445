//! Progressive scale evaluation and merging.
//!
//! The state and regional IRPF scales are defined independently, with
//! different cut points. [`combine_schedules`] merges them into one schedule
//! whose marginal rate at every income level is the sum of both, so the
//! rest of the engine only ever deals with a single scale.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nomina_core::calculations::scale::{combine_schedules, tax_on_base};
//! use nomina_core::{BracketSchedule, TaxBracket};
//!
//! let state = BracketSchedule::new(vec![
//!     TaxBracket::new(dec!(0), Some(dec!(10000)), dec!(0.10)),
//!     TaxBracket::new(dec!(10000), None, dec!(0.20)),
//! ]).unwrap();
//! let regional = BracketSchedule::new(vec![
//!     TaxBracket::new(dec!(0), Some(dec!(5000)), dec!(0.05)),
//!     TaxBracket::new(dec!(5000), None, dec!(0.10)),
//! ]).unwrap();
//!
//! let combined = combine_schedules(&state, &regional);
//!
//! assert_eq!(combined.brackets().len(), 3);
//! // 5000 × 0.15 + 5000 × 0.20 + 2000 × 0.30
//! assert_eq!(tax_on_base(&combined, dec!(12000)), dec!(2350.00));
//! ```

use rust_decimal::Decimal;

use crate::models::{BracketSchedule, TaxBracket};

/// Tax owed on `base` under `schedule`, unrounded.
///
/// Each bracket taxes only the slice of the base that falls inside it, so the
/// result is continuous across bracket boundaries.
pub fn tax_on_base(
    schedule: &BracketSchedule,
    base: Decimal,
) -> Decimal {
    let mut tax = Decimal::ZERO;
    for bracket in schedule.brackets() {
        if base <= bracket.lower_bound {
            break;
        }
        let upper = match bracket.upper_bound {
            Some(upper) if base >= upper => upper,
            _ => base,
        };
        let taxable = upper - bracket.lower_bound;
        if taxable <= Decimal::ZERO {
            continue;
        }
        tax += taxable * bracket.rate;
    }
    tax
}

/// Merges two schedules into one that applies both marginal rates at once.
///
/// The merged cut points are the union of both schedules' bounds. Outside a
/// schedule's defined range its rate counts as zero. The last cut point opens
/// a final, unbounded bracket.
pub fn combine_schedules(
    a: &BracketSchedule,
    b: &BracketSchedule,
) -> BracketSchedule {
    let mut points: Vec<Decimal> = a.boundaries().chain(b.boundaries()).collect();
    points.sort_unstable();
    points.dedup();

    let combined_rate = |point: Decimal| a.rate_at(point) + b.rate_at(point);

    let mut brackets: Vec<TaxBracket> = points
        .windows(2)
        .map(|pair| TaxBracket::new(pair[0], Some(pair[1]), combined_rate(pair[0])))
        .collect();

    // Both schedules start at zero, so there is always at least one point.
    if let Some(&last) = points.last() {
        brackets.push(TaxBracket::new(last, None, combined_rate(last)));
    }

    BracketSchedule::from_trusted(brackets)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::FiscalYearConfig;

    fn two_band(
        cut: Decimal,
        low_rate: Decimal,
        high_rate: Decimal,
    ) -> BracketSchedule {
        BracketSchedule::new(vec![
            TaxBracket::new(dec!(0), Some(cut), low_rate),
            TaxBracket::new(cut, None, high_rate),
        ])
        .unwrap()
    }

    // =========================================================================
    // tax_on_base tests
    // =========================================================================

    #[test]
    fn tax_on_base_zero_base_owes_nothing() {
        let schedule = two_band(dec!(100), dec!(0.1), dec!(0.2));

        assert_eq!(tax_on_base(&schedule, dec!(0)), dec!(0));
    }

    #[test]
    fn tax_on_base_within_first_bracket() {
        let schedule = two_band(dec!(100), dec!(0.1), dec!(0.2));

        assert_eq!(tax_on_base(&schedule, dec!(50)), dec!(5.0));
    }

    #[test]
    fn tax_on_base_at_boundary_uses_only_lower_bracket() {
        let schedule = two_band(dec!(100), dec!(0.1), dec!(0.2));

        assert_eq!(tax_on_base(&schedule, dec!(100)), dec!(10.0));
    }

    #[test]
    fn tax_on_base_spans_brackets() {
        let schedule = two_band(dec!(100), dec!(0.1), dec!(0.2));

        // 100 × 0.1 + 50 × 0.2
        assert_eq!(tax_on_base(&schedule, dec!(150)), dec!(20.0));
    }

    #[test]
    fn tax_on_base_stops_at_bounded_top() {
        let schedule =
            BracketSchedule::new(vec![TaxBracket::new(dec!(0), Some(dec!(100)), dec!(0.1))])
                .unwrap();

        assert_eq!(tax_on_base(&schedule, dec!(1000)), dec!(10.0));
    }

    #[test]
    fn tax_on_base_negative_base_owes_nothing() {
        let schedule = two_band(dec!(100), dec!(0.1), dec!(0.2));

        assert_eq!(tax_on_base(&schedule, dec!(-50)), dec!(0));
    }

    #[test]
    fn tax_on_base_skips_gaps_between_brackets() {
        let schedule = BracketSchedule::new(vec![
            TaxBracket::new(dec!(0), Some(dec!(100)), dec!(0.1)),
            TaxBracket::new(dec!(200), None, dec!(0.5)),
        ])
        .unwrap();

        // 100 × 0.1 + 0 for the gap + 50 × 0.5
        assert_eq!(tax_on_base(&schedule, dec!(250)), dec!(35.0));
    }

    // =========================================================================
    // combine_schedules tests
    // =========================================================================

    #[test]
    fn combine_schedules_unions_cut_points() {
        let a = two_band(dec!(100), dec!(0.1), dec!(0.2));
        let b = two_band(dec!(50), dec!(0.05), dec!(0.15));

        let combined = combine_schedules(&a, &b);

        assert_eq!(
            combined.brackets(),
            &[
                TaxBracket::new(dec!(0), Some(dec!(50)), dec!(0.15)),
                TaxBracket::new(dec!(50), Some(dec!(100)), dec!(0.25)),
                TaxBracket::new(dec!(100), None, dec!(0.35)),
            ]
        );
    }

    #[test]
    fn combine_schedules_treats_undefined_range_as_zero_rate() {
        let bounded =
            BracketSchedule::new(vec![TaxBracket::new(dec!(0), Some(dec!(100)), dec!(0.1))])
                .unwrap();
        let open = two_band(dec!(50), dec!(0.2), dec!(0.3));

        let combined = combine_schedules(&bounded, &open);

        assert_eq!(
            combined.brackets().last(),
            Some(&TaxBracket::new(dec!(100), None, dec!(0.3)))
        );
    }

    #[test]
    fn combine_schedules_matches_sum_of_parts_for_2025_scales() {
        let config = FiscalYearConfig::fy2025();
        let combined = combine_schedules(&config.state_scale, &config.regional_scale);

        for base in [
            dec!(0),
            dec!(12450),
            dec!(17707.20),
            dec!(25000),
            dec!(53407.20),
            dec!(75000.55),
            dec!(350000),
        ] {
            assert_eq!(
                tax_on_base(&combined, base),
                tax_on_base(&config.state_scale, base) + tax_on_base(&config.regional_scale, base),
                "base {base}"
            );
        }
    }

    #[test]
    fn combine_schedules_2025_top_rate_is_sum_of_top_rates() {
        let config = FiscalYearConfig::fy2025();

        let combined = combine_schedules(&config.state_scale, &config.regional_scale);

        assert_eq!(
            combined.brackets().last(),
            Some(&TaxBracket::new(dec!(300000), None, dec!(0.480)))
        );
        assert_eq!(combined.brackets()[0].rate, dec!(0.215));
    }
}
