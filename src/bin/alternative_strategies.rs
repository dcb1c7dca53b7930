//! Print every filing month for one person and how close it is to optimal
//!
//! One row per year of age, one column per month, each cell the NPV as a
//! percentage of the best month.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use ssa_benefits::strategy::{
    calculate_alternative_strategies, earliest_filing, format_filing_age,
    strategy_sum_cents_single, YearGroup,
};
use ssa_benefits::{
    load_earnings_csv, Birthdate, CalculationConfig, Money, MonthDate, MonthDuration, Recipient,
};

#[derive(Parser, Debug)]
#[command(name = "alternative_strategies", about = "Filing month alternatives for one person")]
struct Args {
    /// Lay birthdate, YYYY-MM-DD
    #[arg(long)]
    birthdate: NaiveDate,

    /// Known PIA in dollars
    #[arg(long)]
    pia: Option<f64>,

    /// Earnings history CSV
    #[arg(long)]
    earnings: Option<PathBuf>,

    /// Age at death in years
    #[arg(long, default_value_t = 85)]
    death_age: i32,

    /// Annual discount rate, e.g. 0.025
    #[arg(long, default_value_t = 0.0)]
    discount_rate: f64,

    /// Evaluation month, YYYY-MM
    #[arg(long)]
    as_of: Option<MonthDate>,

    /// Print the groups as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = CalculationConfig::default();
    config.annual_discount_rate = args.discount_rate;
    if let Some(as_of) = args.as_of {
        config.current_date = as_of;
    }

    let birthdate = Birthdate::from_naive_date(args.birthdate)?;
    let mut recipient = match (&args.earnings, args.pia) {
        (Some(path), _) => Recipient::with_earnings(
            birthdate,
            load_earnings_csv(path).with_context(|| format!("loading {}", path.display()))?,
        ),
        (None, Some(pia)) => Recipient::with_pia(birthdate, Money::from_dollars(pia)?),
        (None, None) => bail!("either --earnings or --pia is required"),
    };
    config.apply_current_year(&mut recipient);

    let death_age = MonthDuration::from_years_months(args.death_age, 0);
    let final_date = recipient.birthdate().date_at_lay_age(death_age);

    // Best single filing month first, so every cell can be scored against it
    let mut optimal: Option<(MonthDuration, i64)> = None;
    let mut age = earliest_filing(&recipient, config.current_date);
    while age <= MonthDuration::from_years_months(70, 0) && age <= death_age {
        let cents = strategy_sum_cents_single(
            &recipient,
            final_date,
            config.current_date,
            config.annual_discount_rate,
            age,
        )?;
        if optimal.map_or(true, |(_, best)| cents > best) {
            optimal = Some((age, cents));
        }
        age.increment();
    }
    let Some((optimal_age, optimal_cents)) = optimal else {
        bail!("no filing ages left as of {}", config.current_date);
    };

    let groups: Vec<YearGroup> = calculate_alternative_strategies(
        &recipient,
        death_age,
        config.annual_discount_rate,
        Money::from_cents(optimal_cents),
        optimal_age,
        config.current_date,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    println!(
        "Optimal: file at {} for {} (PIA {})\n",
        format_filing_age(optimal_age),
        Money::from_cents(optimal_cents).whole_dollars(),
        recipient.primary_insurance_amount()
    );

    print!("{:>5}", "Age");
    for month in 0..12 {
        print!(" {:>7}", format!("+{}m", month));
    }
    println!();
    println!("{}", "-".repeat(5 + 12 * 8));

    for group in &groups {
        print!("{:>5}", group.year);
        for result in &group.results {
            let cell = if result.is_placeholder() {
                "-".to_string()
            } else if result.is_optimal {
                "*best*".to_string()
            } else {
                format!("{:.1}%", result.percent_of_optimal)
            };
            print!(" {:>7}", cell);
        }
        println!();
    }
    Ok(())
}
