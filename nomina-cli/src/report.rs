//! Plain-text and CSV renderings of calculation results.
//!
//! Every amount is rounded with [`round_euro`] and printed with two
//! decimals; percentages are printed with two decimals as well.

use std::fmt;
use std::io;

use rust_decimal::Decimal;
use serde::Serialize;

use nomina_core::calculations::common::round_euro;
use nomina_core::calculations::{
    ConceptAmount, NetPayIncrement, SalaryBlock, SharePoint, WithholdingResult,
};
use nomina_core::{BracketSchedule, ContributionConcept, SalaryBreakdown};

/// An amount rounded to the cent, always with two decimals.
pub fn euro(value: Decimal) -> String {
    format!("{:.2}", round_euro(value))
}

fn percent(value: Decimal) -> String {
    format!("{:.2} %", round_euro(value))
}

fn concept_amount(
    amounts: &[ConceptAmount],
    concept: ContributionConcept,
) -> Decimal {
    amounts
        .iter()
        .find(|a| a.concept == concept)
        .map_or(Decimal::ZERO, |a| a.amount)
}

/// Full gross-to-net breakdown.
pub struct BreakdownReport<'a>(pub &'a SalaryBreakdown);

impl fmt::Display for BreakdownReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let b = self.0;
        let input = &b.input;
        writeln!(
            f,
            "Group:                        {}",
            input.contribution_group.label()
        )?;
        writeln!(f, "Contract:                     {}", input.contract_type.as_str())?;
        writeln!(f, "Region:                       {}", input.region.as_str())?;
        writeln!(
            f,
            "Gross incl. benefits:         {:>12}",
            euro(b.gross_including_benefits)
        )?;
        writeln!(f, "Contribution base (monthly):  {:>12}", euro(b.contribution_base))?;
        for concept in ContributionConcept::ALL {
            writeln!(
                f,
                "  {:<28}{:>12}",
                concept.label(),
                euro(b.contributions.annual(concept))
            )?;
        }
        writeln!(f, "Contributions (annual):       {:>12}", euro(b.annual_contributions))?;
        writeln!(f, "Deductible expenses:          {:>12}", euro(b.deductible_expenses))?;
        writeln!(f, "Net work income:              {:>12}", euro(b.net_work_income))?;
        writeln!(f, "Work-income reduction:        {:>12}", euro(b.work_income_reduction))?;
        writeln!(f, "Family minimum:               {:>12}", euro(b.family_minimum))?;
        writeln!(f, "Taxable base:                 {:>12}", euro(b.taxable_base))?;
        writeln!(f, "IRPF (annual):                {:>12}", euro(b.annual_tax))?;
        writeln!(f, "Per pay period ({}):", input.pay_periods)?;
        writeln!(f, "  Gross                       {:>12}", euro(b.gross_per_period))?;
        writeln!(f, "  Contributions               {:>12}", euro(b.contributions_per_period))?;
        writeln!(f, "  IRPF                        {:>12}", euro(b.tax_per_period))?;
        writeln!(f, "  Net                         {:>12}", euro(b.net_per_period))?;
        writeln!(f, "Net (annual):                 {:>12}", euro(b.net_annual()))?;
        write!(
            f,
            "Net monthly equivalent:       {:>12}",
            euro(b.net_monthly_equivalent)
        )
    }
}

pub struct IncrementReport<'a>(pub &'a NetPayIncrement);

impl fmt::Display for IncrementReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let i = self.0;
        writeln!(f, "{:<24}{:>14}{:>14}", "", "previous", "new")?;
        writeln!(
            f,
            "{:<24}{:>14}{:>14}",
            "Gross",
            euro(i.previous.input.gross_annual),
            euro(i.new.input.gross_annual)
        )?;
        writeln!(
            f,
            "{:<24}{:>14}{:>14}",
            "IRPF (annual)",
            euro(i.previous.annual_tax),
            euro(i.new.annual_tax)
        )?;
        writeln!(
            f,
            "{:<24}{:>14}{:>14}",
            "Contributions (annual)",
            euro(i.previous.annual_contributions),
            euro(i.new.annual_contributions)
        )?;
        writeln!(
            f,
            "{:<24}{:>14}{:>14}",
            "Net (annual)",
            euro(i.previous.net_annual()),
            euro(i.new.net_annual())
        )?;
        writeln!(f, "Annual net change:      {:>14}", euro(i.annual_net_delta))?;
        write!(f, "Monthly net change:     {:>14}", euro(i.monthly_net_delta))?;
        if let Some(retained) = i.retained_percent() {
            write!(f, "\nShare of raise kept:    {:>14}", percent(retained))?;
        }
        Ok(())
    }
}

/// One line per block: net, IRPF and each contribution concept.
pub struct BlocksReport<'a>(pub &'a [SalaryBlock]);

impl fmt::Display for BlocksReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:>12} {:>12} {:>11} {:>11}", "from", "to", "net", "IRPF")?;
        for concept in ContributionConcept::ALL {
            write!(f, " {:>11}", short_label(concept))?;
        }
        for block in self.0 {
            write!(
                f,
                "\n{:>12} {:>12} {:>11} {:>11}",
                euro(block.lower),
                euro(block.upper),
                euro(block.net),
                euro(block.tax)
            )?;
            for concept in ContributionConcept::ALL {
                write!(f, " {:>11}", euro(concept_amount(&block.contributions, concept)))?;
            }
        }
        Ok(())
    }
}

/// One line per gross step, as percentages of that gross.
pub struct SharesReport<'a>(pub &'a [SharePoint]);

impl fmt::Display for SharesReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:>12} {:>9} {:>9}", "gross", "net", "IRPF")?;
        for concept in ContributionConcept::ALL {
            write!(f, " {:>9}", short_label(concept))?;
        }
        for point in self.0 {
            write!(
                f,
                "\n{:>12} {:>9} {:>9}",
                euro(point.gross),
                euro(point.net_percent),
                euro(point.tax_percent)
            )?;
            for concept in ContributionConcept::ALL {
                write!(f, " {:>9}", euro(concept_amount(&point.contributions, concept)))?;
            }
        }
        Ok(())
    }
}

fn short_label(concept: ContributionConcept) -> &'static str {
    match concept {
        ContributionConcept::CommonContingencies => "common",
        ContributionConcept::Unemployment => "unempl.",
        ContributionConcept::Training => "training",
        ContributionConcept::Mei => "MEI",
    }
}

/// Brackets of a schedule with rates as percentages.
pub struct ScaleReport<'a>(pub &'a BracketSchedule);

impl fmt::Display for ScaleReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:>12} {:>12} {:>9}", "from", "to", "rate")?;
        for bracket in self.0.brackets() {
            let upper = bracket.upper_bound.map_or_else(|| "-".to_string(), euro);
            write!(
                f,
                "\n{:>12} {:>12} {:>9}",
                euro(bracket.lower_bound),
                upper,
                percent(bracket.rate * Decimal::ONE_HUNDRED)
            )?;
        }
        Ok(())
    }
}

pub struct WithholdingReport<'a>(pub &'a WithholdingResult);

impl fmt::Display for WithholdingReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let w = self.0;
        writeln!(f, "Withholding quota:     {:>12}", euro(w.quota))?;
        writeln!(f, "Housing reduction:     {:>12}", euro(w.housing_reduction))?;
        writeln!(f, "Withholding rate:      {:>12}", percent(w.rate))?;
        write!(f, "Annual withholding:    {:>12}", euro(w.annual_withholding))
    }
}

/// One line of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub name: String,
    pub gross: Decimal,
    pub pay_periods: u32,
    pub annual_contributions: Decimal,
    pub annual_tax: Decimal,
    pub net_per_period: Decimal,
    pub net_monthly_equivalent: Decimal,
}

impl BatchRow {
    pub fn new(
        name: &str,
        breakdown: &SalaryBreakdown,
    ) -> Self {
        let summary = breakdown.summary();
        Self {
            name: name.to_string(),
            gross: breakdown.input.gross_annual,
            pay_periods: breakdown.input.pay_periods,
            annual_contributions: summary.annual_contributions,
            annual_tax: summary.annual_tax,
            net_per_period: summary.net_per_period,
            net_monthly_equivalent: summary.net_monthly_equivalent,
        }
    }
}

pub struct BatchReport<'a>(pub &'a [BatchRow]);

impl fmt::Display for BatchReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{:<24} {:>12} {:>4} {:>12} {:>12} {:>12} {:>12}",
            "name", "gross", "n", "SS", "IRPF", "net/period", "net/month"
        )?;
        for row in self.0 {
            write!(
                f,
                "\n{:<24} {:>12} {:>4} {:>12} {:>12} {:>12} {:>12}",
                row.name,
                euro(row.gross),
                row.pay_periods,
                euro(row.annual_contributions),
                euro(row.annual_tax),
                euro(row.net_per_period),
                euro(row.net_monthly_equivalent)
            )?;
        }
        Ok(())
    }
}

/// Writes batch rows as CSV with a header line.
pub fn write_batch_csv<W: io::Write>(
    rows: &[BatchRow],
    writer: W,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomina_core::calculations::{increment, salary_blocks};
    use nomina_core::{ContributionGroup, FiscalYearConfig, NetPayCalculator, PayrollInput, Region};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn calculator() -> NetPayCalculator {
        NetPayCalculator::new(FiscalYearConfig::fy2025(), Region::Catalunya).unwrap()
    }

    #[test]
    fn euro_rounds_and_pads_to_two_decimals() {
        assert_eq!(euro(dec!(1944)), "1944.00");
        assert_eq!(euro(dec!(0.125)), "0.13");
        assert_eq!(euro(dec!(2.5)), "2.50");
    }

    #[test]
    fn breakdown_report_shows_rounded_figures() {
        let breakdown = calculator()
            .calculate(&PayrollInput::new(dec!(30000), ContributionGroup::Other))
            .unwrap();

        let text = BreakdownReport(&breakdown).to_string();

        assert!(text.contains("Contributions (annual):"));
        assert!(text.contains("1944.00"));
        assert!(text.contains("Per pay period (12):"));
        assert!(text.contains("Sou mensual; Adulta; altres"));
    }

    #[test]
    fn increment_report_shows_share_kept() {
        let input = PayrollInput::new(dec!(30000), ContributionGroup::Other);
        let result = increment(&calculator(), &input, dec!(36000)).unwrap();

        let text = IncrementReport(&result).to_string();

        assert!(text.contains("30000.00"));
        assert!(text.contains("36000.00"));
        assert!(text.contains("Share of raise kept:"));
    }

    #[test]
    fn blocks_report_has_a_line_per_block() {
        let input = PayrollInput::new(dec!(2500), ContributionGroup::Other);
        let blocks = salary_blocks(&calculator(), &input).unwrap();

        let text = BlocksReport(&blocks).to_string();

        assert_eq!(text.lines().count(), 1 + blocks.len());
        assert!(text.lines().last().unwrap().contains("2500.00"));
    }

    #[test]
    fn scale_report_marks_open_top_bracket() {
        let calculator = calculator();

        let text = ScaleReport(calculator.combined_scale()).to_string();

        let last = text.lines().last().unwrap();
        assert!(last.contains("300000.00"));
        assert!(last.contains(" - "));
        assert!(last.contains("48.00 %"));
    }

    #[test]
    fn batch_csv_has_header_and_rows() {
        let breakdown = calculator()
            .calculate(&PayrollInput::new(dec!(30000), ContributionGroup::Other))
            .unwrap();
        let rows = vec![BatchRow::new("base", &breakdown)];
        let mut out = Vec::new();

        write_batch_csv(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "name,gross,pay_periods,annual_contributions,annual_tax,net_per_period,net_monthly_equivalent"
            )
        );
        assert!(lines.next().unwrap().starts_with("base,30000,12,1944.00,"));
    }
}
