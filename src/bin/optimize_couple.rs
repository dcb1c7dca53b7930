//! Find the best filing ages for a couple
//!
//! Each spouse is given as a birthdate plus either a PIA or an earnings CSV.
//! Prints the winning filing ages, their NPV and the benefit periods behind it.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use ssa_benefits::strategy::{strategy_sum_periods, sum_benefit_periods, BenefitPeriod};
use ssa_benefits::{
    load_earnings_csv, Birthdate, CalculationConfig, Couple, Money, MonthDate, MonthDuration,
    OptimalStrategy, OptimizerMethod, Recipient, StrategyOptimizer,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliMethod {
    BruteForce,
    Memoized,
    Parallel,
}

impl From<CliMethod> for OptimizerMethod {
    fn from(value: CliMethod) -> Self {
        match value {
            CliMethod::BruteForce => OptimizerMethod::BruteForce,
            CliMethod::Memoized => OptimizerMethod::Memoized,
            CliMethod::Parallel => OptimizerMethod::Parallel,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "optimize_couple", about = "Optimal Social Security filing ages for a couple")]
struct Args {
    /// Lay birthdates, YYYY-MM-DD, one per spouse
    #[arg(long, num_args = 2, required = true)]
    birthdate: Vec<NaiveDate>,

    /// PIAs in dollars, one per spouse
    #[arg(long, num_args = 2)]
    pia: Vec<f64>,

    /// Earnings CSVs, one per spouse (overrides --pia)
    #[arg(long, num_args = 2)]
    earnings: Vec<PathBuf>,

    /// Ages at death in years, one per spouse
    #[arg(long, num_args = 2, default_values_t = [85, 85])]
    death_age: Vec<i32>,

    /// Annual discount rate, e.g. 0.025
    #[arg(long, default_value_t = 0.0)]
    discount_rate: f64,

    /// Evaluation month, YYYY-MM
    #[arg(long)]
    as_of: Option<MonthDate>,

    #[arg(long, value_enum, default_value_t = CliMethod::Memoized)]
    method: CliMethod,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CoupleReport {
    strategy: OptimalStrategy,
    filing_dates: [MonthDate; 2],
    undiscounted_total: Money,
    periods: Vec<BenefitPeriod>,
}

fn build_recipient(args: &Args, index: usize) -> Result<Recipient> {
    let birthdate = Birthdate::from_naive_date(args.birthdate[index])?;
    let mut recipient = if let Some(path) = args.earnings.get(index) {
        let records = load_earnings_csv(path)
            .with_context(|| format!("loading earnings from {}", path.display()))?;
        Recipient::with_earnings(birthdate, records)
    } else if let Some(&pia) = args.pia.get(index) {
        Recipient::with_pia(birthdate, Money::from_dollars(pia)?)
    } else {
        bail!("spouse {} needs --earnings or --pia", index + 1);
    };
    recipient.set_name(format!("Spouse {}", index + 1));
    if index == 0 {
        recipient.mark_first();
    } else {
        recipient.mark_second();
    }
    Ok(recipient)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = CalculationConfig::default().with_method(args.method.into());
    config.annual_discount_rate = args.discount_rate;
    if let Some(as_of) = args.as_of {
        config.current_date = as_of;
    }

    let mut recipients = [build_recipient(&args, 0)?, build_recipient(&args, 1)?];
    for recipient in recipients.iter_mut() {
        config.apply_current_year(recipient);
    }
    let final_dates = [0, 1].map(|i| {
        recipients[i]
            .birthdate()
            .date_at_lay_age(MonthDuration::from_years_months(args.death_age[i], 0))
    });
    let couple = Couple::new([&recipients[0], &recipients[1]], final_dates);

    let start = Instant::now();
    let strategy = StrategyOptimizer::new(couple, config.clone()).optimize()?;
    let elapsed = start.elapsed();

    let periods = strategy_sum_periods(&couple, strategy.filing_ages);
    let report = CoupleReport {
        filing_dates: [0, 1].map(|i| recipients[i].birthdate().date_at_ssa_age(strategy.filing_ages[i])),
        undiscounted_total: sum_benefit_periods(&periods),
        periods,
        strategy,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Couple Filing Strategy");
    println!("======================\n");
    for (i, recipient) in recipients.iter().enumerate() {
        println!(
            "{}: born {}, PIA {}, file at {} ({})",
            recipient.name(),
            recipient.birthdate().lay_birthdate_string(),
            recipient.primary_insurance_amount(),
            report.strategy.filing_ages[i],
            report.filing_dates[i]
        );
    }
    println!();
    println!(
        "NPV as of {} at {:.2}%: {}",
        config.current_date,
        config.annual_discount_rate * 100.0,
        report.strategy.npv
    );
    println!("Undiscounted lifetime total: {}", report.undiscounted_total);
    println!(
        "Evaluated {} strategies in {:?} ({:?})",
        report.strategy.evaluated, elapsed, config.method
    );
    println!();

    println!("{:>9} {:>10} {:>10} {:>10} {:>12}", "Spouse", "Type", "Start", "End", "Monthly");
    println!("{}", "-".repeat(55));
    for period in &report.periods {
        println!(
            "{:>9} {:>10} {:>10} {:>10} {:>12}",
            recipients[period.recipient_index].short_name(9),
            format!("{:?}", period.benefit_type),
            period.start_date.to_string(),
            period.end_date.to_string(),
            period.amount.string()
        );
    }
    Ok(())
}
