use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info};

use nomina_cli::logging;
use nomina_cli::report::{
    BatchReport, BatchRow, BlocksReport, BreakdownReport, IncrementReport, ScaleReport,
    SharesReport, WithholdingReport, write_batch_csv,
};
use nomina_cli::utils::parse_amount;
use nomina_core::calculations::{
    WithholdingContract, WithholdingInput, increment, salary_blocks, share_curve,
};
use nomina_core::{FiscalYearConfig, NetPayCalculator, Region};
use nomina_data::{IncrementRequest, SalaryRequest, scenarios, snapshot};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Gross-to-net salary calculator for Spanish IRPF and social security.
///
/// Uses the built-in 2025 constants (state and Catalan scales) unless a
/// TOML snapshot is given.
#[derive(Debug, Parser)]
#[command(name = "nomina", version)]
struct Cli {
    /// Fiscal-year snapshot to use instead of the built-in 2025 constants.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Log filter: a level ("debug") or any RUST_LOG-style directive.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Full breakdown for one gross salary.
    Calculate(PayrollArgs),

    /// Net difference between two gross salaries.
    Increment(IncrementArgs),

    /// Where each block of the gross salary ends up.
    Blocks(PayrollArgs),

    /// Share of gross going to net, IRPF and contributions as gross grows.
    Shares {
        #[command(flatten)]
        payroll: PayrollArgs,

        /// Gross step between points.
        #[arg(long, default_value = "1000", value_parser = parse_amount)]
        step: Decimal,
    },

    /// Breakdowns for every scenario in a CSV file.
    Batch {
        file: PathBuf,

        /// Print CSV instead of a table.
        #[arg(long)]
        csv: bool,
    },

    /// Combined state + regional scale.
    Scale {
        /// Print the whole fiscal-year snapshot as TOML instead.
        #[arg(long)]
        dump_snapshot: bool,
    },

    /// Withholding rate for the salary.
    Withholding {
        #[command(flatten)]
        payroll: PayrollArgs,

        /// Court-ordered child-support annuities.
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        annuities: Decimal,

        /// Paying a loan on the main home.
        #[arg(long)]
        home_loan: bool,

        /// Resident in Ceuta, Melilla or La Palma.
        #[arg(long)]
        ceuta_melilla: bool,

        #[arg(long, value_enum, default_value_t = ContractArg::General)]
        contract: ContractArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ContractArg {
    General,
    Special,
    UnderOneYear,
}

impl From<ContractArg> for WithholdingContract {
    fn from(value: ContractArg) -> Self {
        match value {
            ContractArg::General => WithholdingContract::General,
            ContractArg::Special => WithholdingContract::Special,
            ContractArg::UnderOneYear => WithholdingContract::UnderOneYear,
        }
    }
}

#[derive(Debug, Args)]
struct PayrollArgs {
    /// Annual gross salary.
    #[arg(value_parser = parse_amount)]
    gross: Decimal,

    /// Contribution group: code (enginyeres, tecniques, caps, altres,
    /// diaria, menor) or official label.
    #[arg(long, short, default_value = "altres")]
    group: String,

    #[arg(long, short = 'n', default_value_t = 12)]
    pay_periods: u32,

    /// Extra payments are prorated (informational only).
    #[arg(long)]
    prorated: bool,

    /// Annual benefits in kind.
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    benefits: Decimal,

    /// indefinite or temporary.
    #[arg(long, default_value = "indefinite")]
    contract_type: String,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    other_deductions: Decimal,

    #[arg(long, default_value = "catalunya")]
    region: String,

    /// Geographic mobility expenses increment.
    #[arg(long)]
    mobility: bool,

    /// Worker disability for the expenses increment: none, disabled, severe.
    #[arg(long, default_value = "none")]
    worker_disability: String,

    #[arg(long, default_value_t = 30)]
    age: u32,

    #[arg(long, default_value_t = 0)]
    disability: u32,

    #[arg(long)]
    needs_help: bool,

    /// Comma-separated ages, e.g. "2,10".
    #[arg(long, default_value = "")]
    children: String,

    /// Comma-separated disability percentages, in the order of --children.
    #[arg(long, default_value = "")]
    children_disabilities: String,

    /// Comma-separated ages of ascendants living with the taxpayer.
    #[arg(long, default_value = "")]
    ascendants: String,

    /// Comma-separated disability percentages of other relatives.
    #[arg(long, default_value = "")]
    relatives_disability: String,

    /// Comma-separated flags (true/1/yes) in the order of --relatives-disability.
    #[arg(long, default_value = "")]
    relatives_help: String,
}

impl PayrollArgs {
    fn to_request(&self) -> SalaryRequest {
        SalaryRequest {
            gross: self.gross,
            region: self.region.clone(),
            pay_periods: self.pay_periods,
            prorated_extra_payments: self.prorated,
            benefits_in_kind: self.benefits,
            contribution_group: self.group.clone(),
            contract_type: self.contract_type.clone(),
            other_deductions: self.other_deductions,
            geographic_mobility: self.mobility,
            worker_disability: self.worker_disability.clone(),
            age: self.age,
            disability_percent: self.disability,
            needs_help: self.needs_help,
            children_ages: self.children.clone(),
            children_disabilities: self.children_disabilities.clone(),
            ascendant_ages: self.ascendants.clone(),
            relatives_disability: self.relatives_disability.clone(),
            relatives_help: self.relatives_help.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct IncrementArgs {
    #[arg(value_parser = parse_amount)]
    previous_gross: Decimal,

    #[arg(value_parser = parse_amount)]
    new_gross: Decimal,

    #[arg(long, short, default_value = "altres")]
    group: String,

    #[arg(long, short = 'n', default_value_t = 12)]
    pay_periods: u32,

    #[arg(long)]
    prorated: bool,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    benefits: Decimal,

    #[arg(long, default_value = "indefinite")]
    contract_type: String,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    other_deductions: Decimal,

    #[arg(long, default_value = "catalunya")]
    region: String,

    #[arg(long, default_value_t = 30)]
    age: u32,
}

impl IncrementArgs {
    fn to_request(&self) -> IncrementRequest {
        IncrementRequest {
            previous_gross: self.previous_gross,
            new_gross: self.new_gross,
            region: self.region.clone(),
            pay_periods: self.pay_periods,
            prorated_extra_payments: self.prorated,
            benefits_in_kind: self.benefits,
            contribution_group: self.group.clone(),
            contract_type: self.contract_type.clone(),
            other_deductions: self.other_deductions,
            age: self.age,
        }
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn load_config(snapshot: Option<&PathBuf>) -> Result<FiscalYearConfig> {
    match snapshot {
        Some(path) => snapshot::load_from_file(path)
            .with_context(|| format!("failed to load snapshot '{}'", path.display())),
        None => Ok(FiscalYearConfig::fy2025()),
    }
}

fn run(
    command: Command,
    config: FiscalYearConfig,
) -> Result<()> {
    let tax_year = config.tax_year;
    let calculator =
        NetPayCalculator::new(config, Region::Catalunya).context("invalid fiscal-year config")?;
    debug!(tax_year, "calculator ready");

    match command {
        Command::Calculate(args) => {
            let input = args.to_request().to_input()?;
            let breakdown = calculator.calculate(&input)?;
            println!("{}", BreakdownReport(&breakdown));
        }
        Command::Increment(args) => {
            let request = args.to_request();
            let input = request.to_input()?;
            let result = increment(&calculator, &input, request.new_gross)?;
            println!("{}", IncrementReport(&result));
        }
        Command::Blocks(args) => {
            let input = args.to_request().to_input()?;
            let blocks = salary_blocks(&calculator, &input)?;
            println!("{}", BlocksReport(&blocks));
        }
        Command::Shares { payroll, step } => {
            let input = payroll.to_request().to_input()?;
            let points = share_curve(&calculator, &input, step)?;
            println!("{}", SharesReport(&points));
        }
        Command::Batch { file, csv } => {
            let loaded = scenarios::load_from_file(&file)
                .with_context(|| format!("failed to load scenarios from '{}'", file.display()))?;
            info!(count = loaded.len(), "running batch");
            let rows = loaded
                .iter()
                .map(|scenario| {
                    let breakdown = calculator
                        .calculate(&scenario.input)
                        .with_context(|| format!("scenario '{}' failed", scenario.name))?;
                    Ok(BatchRow::new(&scenario.name, &breakdown))
                })
                .collect::<Result<Vec<_>>>()?;
            if csv {
                write_batch_csv(&rows, io::stdout().lock())?;
            } else {
                println!("{}", BatchReport(&rows));
            }
        }
        Command::Scale { dump_snapshot } => {
            if dump_snapshot {
                print!("{}", snapshot::to_toml_string(calculator.config())?);
            } else {
                println!("Tax year {tax_year}");
                println!("{}", ScaleReport(calculator.combined_scale()));
            }
        }
        Command::Withholding {
            payroll,
            annuities,
            home_loan,
            ceuta_melilla,
            contract,
        } => {
            let input = payroll.to_request().to_input()?;
            let breakdown = calculator.calculate(&input)?;
            let withholding_input = WithholdingInput {
                annuities,
                home_loan,
                ceuta_melilla,
                contract: contract.into(),
                ..WithholdingInput::from_breakdown(&breakdown)
            };
            let result = calculator.withholding().calculate(&withholding_input);
            println!("{}", WithholdingReport(&result));
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = load_config(cli.snapshot.as_ref())?;
    run(cli.command, config)
}
