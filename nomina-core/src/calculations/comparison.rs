//! Salary comparisons and gross sweeps.
//!
//! [`increment`] compares two gross salaries under otherwise identical
//! circumstances. [`salary_blocks`] splits a gross salary into consecutive
//! blocks and reports where each extra euro of a block ends up.
//! [`share_curve`] reports, for growing gross salaries, the share of gross
//! that goes to net pay, IRPF and each contribution concept.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::payroll::{NetPayCalculator, PayrollError};
use crate::models::{ContributionConcept, PayrollInput, SalaryBreakdown};

/// Largest gross salary a sweep accepts.
pub const SWEEP_GROSS_LIMIT: Decimal = dec!(10000000);

/// Largest number of points [`share_curve`] will produce.
pub const MAX_SWEEP_POINTS: usize = 100_000;

/// Errors raised by [`salary_blocks`] and [`share_curve`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SweepError {
    #[error("gross salary {gross} is above the sweep limit of {limit}")]
    GrossTooLarge { gross: Decimal, limit: Decimal },

    #[error("sweep step must be positive, got {0}")]
    InvalidStep(Decimal),

    #[error("a step of {step} up to {gross} needs more than {max} points")]
    TooManyPoints {
        gross: Decimal,
        step: Decimal,
        max: usize,
    },

    #[error(transparent)]
    Payroll(#[from] PayrollError),
}

/// Net difference between two gross salaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPayIncrement {
    pub previous: SalaryBreakdown,
    pub new: SalaryBreakdown,
    /// Difference in `net_per_period × pay_periods`.
    pub annual_net_delta: Decimal,
    /// Difference in the monthly-equivalent net.
    pub monthly_net_delta: Decimal,
}

impl NetPayIncrement {
    /// Part of the gross rise that reaches the worker, as a percentage.
    ///
    /// `None` when the gross did not change.
    pub fn retained_percent(&self) -> Option<Decimal> {
        let gross_delta =
            self.new.gross_including_benefits - self.previous.gross_including_benefits;
        if gross_delta.is_zero() {
            return None;
        }
        Some(self.annual_net_delta / gross_delta * Decimal::ONE_HUNDRED)
    }
}

/// An amount attributed to one contribution concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptAmount {
    pub concept: ContributionConcept,
    pub amount: Decimal,
}

/// Where the euros between `lower` and `upper` gross go, annually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBlock {
    pub lower: Decimal,
    pub upper: Decimal,
    pub net: Decimal,
    pub tax: Decimal,
    pub contributions: Vec<ConceptAmount>,
}

impl SalaryBlock {
    pub fn contributions_total(&self) -> Decimal {
        self.contributions.iter().map(|c| c.amount).sum()
    }
}

/// Percentages of one gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePoint {
    pub gross: Decimal,
    pub net_percent: Decimal,
    pub tax_percent: Decimal,
    pub contributions: Vec<ConceptAmount>,
}

/// Computes the breakdowns for `input` and for the same input at
/// `new_gross`, and their net differences.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use nomina_core::calculations::comparison::increment;
/// use nomina_core::{ContributionGroup, FiscalYearConfig, NetPayCalculator, PayrollInput, Region};
///
/// let calculator = NetPayCalculator::new(FiscalYearConfig::fy2025(), Region::Catalunya).unwrap();
/// let input = PayrollInput::new(dec!(30000), ContributionGroup::Other);
///
/// let result = increment(&calculator, &input, dec!(32000)).unwrap();
///
/// assert!(result.annual_net_delta > dec!(0));
/// assert!(result.annual_net_delta < dec!(2000));
/// ```
pub fn increment(
    calculator: &NetPayCalculator,
    input: &PayrollInput,
    new_gross: Decimal,
) -> Result<NetPayIncrement, PayrollError> {
    let previous = calculator.calculate(input)?;
    let new = calculator.calculate(&input.with_gross(new_gross))?;

    let annual_net_delta = new.net_annual() - previous.net_annual();
    let monthly_net_delta = new.net_monthly_equivalent - previous.net_monthly_equivalent;
    debug!(
        previous = %input.gross_annual,
        new = %new_gross,
        %annual_net_delta,
        "computed increment"
    );

    Ok(NetPayIncrement {
        previous,
        new,
        annual_net_delta,
        monthly_net_delta,
    })
}

/// Block size used for a gross salary: 1 000 up to 100 000, 10 000 up to
/// 1 000 000, 100 000 up to [`SWEEP_GROSS_LIMIT`].
pub fn block_size(gross: Decimal) -> Result<Decimal, SweepError> {
    check_limit(gross)?;
    Ok(if gross > dec!(1000000) {
        dec!(100000)
    } else if gross > dec!(100000) {
        dec!(10000)
    } else {
        dec!(1000)
    })
}

/// Splits `input.gross_annual` into blocks and attributes each block's
/// euros to net pay, IRPF and the contribution concepts.
///
/// Block edges are the multiples of the block size strictly below gross,
/// followed by gross itself. The first block is measured from nothing at
/// all, so it carries the contribution floor and any benefits in kind.
/// Summing every block gives the full breakdown at gross.
pub fn salary_blocks(
    calculator: &NetPayCalculator,
    input: &PayrollInput,
) -> Result<Vec<SalaryBlock>, SweepError> {
    let gross = input.gross_annual;
    let size = block_size(gross)?;

    let mut blocks = Vec::new();
    let mut lower = Decimal::ZERO;
    let mut previous: Option<SalaryBreakdown> = None;

    for upper in edges(gross, size) {
        let current = calculator.calculate(&input.with_gross(upper))?;
        blocks.push(block_between(lower, upper, previous.as_ref(), &current));
        lower = upper;
        previous = Some(current);
    }

    debug!(%gross, %size, count = blocks.len(), "computed salary blocks");
    Ok(blocks)
}

/// For each multiple of `step` below `input.gross_annual`, and for gross
/// itself, the percentage of that gross going to net pay, IRPF and each
/// contribution concept.
pub fn share_curve(
    calculator: &NetPayCalculator,
    input: &PayrollInput,
    step: Decimal,
) -> Result<Vec<SharePoint>, SweepError> {
    let gross = input.gross_annual;
    check_limit(gross)?;
    if step <= Decimal::ZERO {
        return Err(SweepError::InvalidStep(step));
    }
    let points = gross.checked_div(step).map(|n| n.ceil());
    if points.is_none_or(|n| n > Decimal::from(MAX_SWEEP_POINTS)) {
        return Err(SweepError::TooManyPoints {
            gross,
            step,
            max: MAX_SWEEP_POINTS,
        });
    }

    edges(gross, step)
        .into_iter()
        .map(|point| {
            let breakdown = calculator.calculate(&input.with_gross(point))?;
            Ok(share_point(point, &breakdown))
        })
        .collect()
}

fn check_limit(gross: Decimal) -> Result<(), SweepError> {
    if gross > SWEEP_GROSS_LIMIT {
        return Err(SweepError::GrossTooLarge {
            gross,
            limit: SWEEP_GROSS_LIMIT,
        });
    }
    Ok(())
}

/// `size, 2 × size, …` strictly below `gross`, then `gross`. Empty when
/// gross is not positive.
fn edges(
    gross: Decimal,
    size: Decimal,
) -> Vec<Decimal> {
    let mut points = Vec::new();
    if gross <= Decimal::ZERO {
        return points;
    }
    let mut point = size;
    while point < gross {
        points.push(point);
        point += size;
    }
    points.push(gross);
    points
}

fn block_between(
    lower: Decimal,
    upper: Decimal,
    previous: Option<&SalaryBreakdown>,
    current: &SalaryBreakdown,
) -> SalaryBlock {
    let net_before = previous.map_or(Decimal::ZERO, SalaryBreakdown::net_annual);
    let tax_before = previous.map_or(Decimal::ZERO, |b| b.annual_tax);

    let contributions = ContributionConcept::ALL
        .iter()
        .map(|&concept| {
            let before = previous.map_or(Decimal::ZERO, |b| b.contributions.annual(concept));
            ConceptAmount {
                concept,
                amount: current.contributions.annual(concept) - before,
            }
        })
        .collect();

    SalaryBlock {
        lower,
        upper,
        net: current.net_annual() - net_before,
        tax: current.annual_tax - tax_before,
        contributions,
    }
}

fn share_point(
    gross: Decimal,
    breakdown: &SalaryBreakdown,
) -> SharePoint {
    let percent = |amount: Decimal| amount / gross * Decimal::ONE_HUNDRED;
    SharePoint {
        gross,
        net_percent: percent(breakdown.net_annual()),
        tax_percent: percent(breakdown.annual_tax),
        contributions: ContributionConcept::ALL
            .iter()
            .map(|&concept| ConceptAmount {
                concept,
                amount: percent(breakdown.contributions.annual(concept)),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{ContributionGroup, FiscalYearConfig, Region};

    fn calculator() -> NetPayCalculator {
        NetPayCalculator::new(FiscalYearConfig::fy2025(), Region::Catalunya).unwrap()
    }

    fn input(gross: Decimal) -> PayrollInput {
        PayrollInput::new(gross, ContributionGroup::Other)
    }

    fn close(
        a: Decimal,
        b: Decimal,
    ) -> bool {
        (a - b).abs() < dec!(0.000001)
    }

    // =========================================================================
    // increment tests
    // =========================================================================

    #[test]
    fn increment_deltas_match_independent_breakdowns() {
        let calculator = calculator();

        let result = increment(&calculator, &input(dec!(30000)), dec!(35000)).unwrap();

        let previous = calculator.calculate(&input(dec!(30000))).unwrap();
        let new = calculator.calculate(&input(dec!(35000))).unwrap();
        assert_eq!(result.annual_net_delta, new.net_annual() - previous.net_annual());
        assert_eq!(
            result.monthly_net_delta,
            new.net_monthly_equivalent - previous.net_monthly_equivalent
        );
    }

    #[test]
    fn increment_to_same_gross_is_zero() {
        let result = increment(&calculator(), &input(dec!(30000)), dec!(30000)).unwrap();

        assert_eq!(result.annual_net_delta, dec!(0));
        assert_eq!(result.retained_percent(), None);
    }

    #[test]
    fn raise_keeps_part_of_the_gross() {
        let result = increment(&calculator(), &input(dec!(30000)), dec!(31000)).unwrap();
        let retained = result.retained_percent().unwrap();

        assert!(retained > dec!(40) && retained < dec!(100), "retained {retained}");
    }

    // =========================================================================
    // block_size tests
    // =========================================================================

    #[test]
    fn block_size_tiers() {
        assert_eq!(block_size(dec!(100000)).unwrap(), dec!(1000));
        assert_eq!(block_size(dec!(100000.01)).unwrap(), dec!(10000));
        assert_eq!(block_size(dec!(1000000)).unwrap(), dec!(10000));
        assert_eq!(block_size(dec!(10000000)).unwrap(), dec!(100000));
    }

    #[test]
    fn block_size_rejects_gross_above_limit() {
        assert_eq!(
            block_size(dec!(10000000.01)),
            Err(SweepError::GrossTooLarge {
                gross: dec!(10000000.01),
                limit: SWEEP_GROSS_LIMIT,
            })
        );
    }

    // =========================================================================
    // salary_blocks tests
    // =========================================================================

    #[test]
    fn blocks_end_at_gross_without_an_empty_last_block() {
        let blocks = salary_blocks(&calculator(), &input(dec!(3500))).unwrap();

        let edges: Vec<(Decimal, Decimal)> = blocks.iter().map(|b| (b.lower, b.upper)).collect();
        assert_eq!(
            edges,
            vec![
                (dec!(0), dec!(1000)),
                (dec!(1000), dec!(2000)),
                (dec!(2000), dec!(3000)),
                (dec!(3000), dec!(3500)),
            ]
        );
    }

    #[test]
    fn blocks_on_exact_multiple_do_not_repeat_gross() {
        let blocks = salary_blocks(&calculator(), &input(dec!(3000))).unwrap();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks.last().map(|b| b.upper), Some(dec!(3000)));
    }

    #[test]
    fn blocks_for_zero_gross_are_empty() {
        assert_eq!(salary_blocks(&calculator(), &input(dec!(0))).unwrap(), vec![]);
    }

    #[test]
    fn blocks_add_up_to_the_full_breakdown() {
        let calculator = calculator();
        let gross = dec!(42500);

        let blocks = salary_blocks(&calculator, &input(gross)).unwrap();
        let full = calculator.calculate(&input(gross)).unwrap();

        let net: Decimal = blocks.iter().map(|b| b.net).sum();
        let tax: Decimal = blocks.iter().map(|b| b.tax).sum();
        let contributions: Decimal = blocks.iter().map(SalaryBlock::contributions_total).sum();
        assert!(close(net, full.net_annual()));
        assert!(close(tax, full.annual_tax));
        assert!(close(contributions, full.annual_contributions));
    }

    #[test]
    fn blocks_above_contribution_ceiling_have_no_contributions() {
        let blocks = salary_blocks(&calculator(), &input(dec!(80000))).unwrap();

        let last = blocks.last().unwrap();
        assert_eq!(last.contributions_total(), dec!(0));
    }

    #[test]
    fn blocks_reject_gross_above_limit() {
        let result = salary_blocks(&calculator(), &input(dec!(20000000)));

        assert!(matches!(result, Err(SweepError::GrossTooLarge { .. })));
    }

    // =========================================================================
    // share_curve tests
    // =========================================================================

    #[test]
    fn share_curve_rejects_zero_step() {
        assert_eq!(
            share_curve(&calculator(), &input(dec!(30000)), dec!(0)),
            Err(SweepError::InvalidStep(dec!(0)))
        );
    }

    #[test]
    fn share_curve_rejects_tiny_step() {
        let result = share_curve(&calculator(), &input(dec!(10000000)), dec!(1));

        assert!(matches!(result, Err(SweepError::TooManyPoints { .. })));
    }

    #[test]
    fn share_curve_points_end_at_gross() {
        let points = share_curve(&calculator(), &input(dec!(25500)), dec!(5000)).unwrap();

        let grosses: Vec<Decimal> = points.iter().map(|p| p.gross).collect();
        assert_eq!(
            grosses,
            vec![
                dec!(5000),
                dec!(10000),
                dec!(15000),
                dec!(20000),
                dec!(25000),
                dec!(25500)
            ]
        );
    }

    #[test]
    fn share_curve_percentages_add_up_to_one_hundred() {
        let points = share_curve(&calculator(), &input(dec!(60000)), dec!(10000)).unwrap();

        for point in points {
            let contributions: Decimal = point.contributions.iter().map(|c| c.amount).sum();
            let total = point.net_percent + point.tax_percent + contributions;
            assert!(close(total, dec!(100)), "gross {} adds to {total}", point.gross);
        }
    }
}
