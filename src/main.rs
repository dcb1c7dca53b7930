//! SSA Benefits CLI
//!
//! Single-recipient report: PIA derivation, benefit by filing age and the
//! best filing month by NPV

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use ssa_benefits::recipient::ColaAdjustment;
use ssa_benefits::strategy::{earliest_filing, strategy_sum_cents_single};
use ssa_benefits::{
    load_earnings_csv, Birthdate, CalculationConfig, Money, MonthDate, MonthDuration, Recipient,
};

#[derive(Parser, Debug)]
#[command(name = "ssa_benefits", about = "Social Security benefit report for one person")]
struct Args {
    /// Lay birthdate, YYYY-MM-DD
    #[arg(long)]
    birthdate: NaiveDate,

    /// Known PIA in dollars, used when no earnings file is given
    #[arg(long)]
    pia: Option<f64>,

    /// Earnings history CSV (Year,TaxedEarnings[,TaxedMedicareEarnings,Incomplete])
    #[arg(long)]
    earnings: Option<PathBuf>,

    /// JSON calculation config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Annual discount rate, e.g. 0.025
    #[arg(long)]
    discount_rate: Option<f64>,

    /// Evaluation month, YYYY-MM
    #[arg(long)]
    as_of: Option<MonthDate>,

    /// Age at death in years
    #[arg(long, default_value_t = 85)]
    death_age: i32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct AgeBenefit {
    age: MonthDuration,
    monthly: Money,
}

#[derive(Debug, Serialize)]
struct Report {
    birthdate: String,
    pia: Money,
    aime: Option<Money>,
    normal_retirement_age: MonthDuration,
    cola_adjustments: Vec<ColaAdjustment>,
    benefits_by_age: Vec<AgeBenefit>,
    best_filing_age: MonthDuration,
    best_npv: Money,
}

fn build_recipient(args: &Args) -> Result<Recipient> {
    let birthdate = Birthdate::from_naive_date(args.birthdate)?;
    match (&args.earnings, args.pia) {
        (Some(path), _) => {
            let records = load_earnings_csv(path)
                .with_context(|| format!("loading earnings from {}", path.display()))?;
            Ok(Recipient::with_earnings(birthdate, records))
        }
        (None, Some(pia)) => Ok(Recipient::with_pia(birthdate, Money::from_dollars(pia)?)),
        (None, None) => bail!("either --earnings or --pia is required"),
    }
}

fn load_config(args: &Args) -> Result<CalculationConfig> {
    let mut config = match &args.config {
        Some(path) => CalculationConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => CalculationConfig::default(),
    };
    if let Some(rate) = args.discount_rate {
        config.annual_discount_rate = rate;
    }
    if let Some(as_of) = args.as_of {
        config.current_date = as_of;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let mut recipient = build_recipient(&args)?;
    config.apply_current_year(&mut recipient);

    let death_age = MonthDuration::from_years_months(args.death_age, 0);
    let final_date = recipient.birthdate().date_at_lay_age(death_age);

    let benefits_by_age = (62..=70)
        .map(|years| {
            let age = MonthDuration::from_years_months(years, 0);
            AgeBenefit {
                age,
                monthly: recipient.benefit_at_age(age),
            }
        })
        .collect();

    let mut best: Option<(MonthDuration, i64)> = None;
    let mut age = earliest_filing(&recipient, config.current_date);
    while age <= MonthDuration::from_years_months(70, 0) {
        let cents = strategy_sum_cents_single(
            &recipient,
            final_date,
            config.current_date,
            config.annual_discount_rate,
            age,
        )?;
        if best.map_or(true, |(_, best_cents)| cents > best_cents) {
            best = Some((age, cents));
        }
        age.increment();
    }
    let Some((best_filing_age, best_cents)) = best else {
        bail!("no filing ages left as of {}", config.current_date);
    };

    let report = Report {
        birthdate: recipient.birthdate().lay_birthdate_string(),
        pia: recipient.primary_insurance_amount(),
        aime: if recipient.is_pia_only() {
            None
        } else {
            Some(recipient.monthly_indexed_earnings()?)
        },
        normal_retirement_age: recipient.normal_retirement_age(),
        cola_adjustments: if recipient.is_pia_only() {
            Vec::new()
        } else {
            recipient.pia().cola_adjustments()?
        },
        benefits_by_age,
        best_filing_age,
        best_npv: Money::from_cents(best_cents),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("SSA Benefits Report");
    println!("===================\n");
    println!("Birthdate:              {}", report.birthdate);
    if let Some(aime) = report.aime {
        println!("AIME:                   {}", aime);
        println!("Earned credits:         {}", recipient.earned_credits());
    }
    println!("PIA:                    {}", report.pia);
    println!("Normal retirement age:  {}", report.normal_retirement_age);
    println!();

    if !report.cola_adjustments.is_empty() {
        println!("{:>6} {:>7} {:>12} {:>12}", "Year", "COLA", "Start", "End");
        println!("{}", "-".repeat(40));
        for cola in &report.cola_adjustments {
            println!(
                "{:>6} {:>6.1}% {:>12} {:>12}",
                cola.year,
                cola.cola,
                cola.start.string(),
                cola.end.string()
            );
        }
        println!();
    }

    println!("{:>10} {:>12}", "File at", "Monthly");
    println!("{}", "-".repeat(23));
    for row in &report.benefits_by_age {
        println!("{:>10} {:>12}", row.age.years(), row.monthly.whole_dollars());
    }
    println!();

    println!(
        "Best filing age: {} ({}), lifetime value {} through age {}",
        report.best_filing_age,
        recipient.birthdate().date_at_ssa_age(report.best_filing_age),
        report.best_npv.whole_dollars(),
        args.death_age
    );
    Ok(())
}
