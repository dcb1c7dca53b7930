//! Benefit period composition for a couple
//!
//! One filing-age pair becomes a short list of non-overlapping periods:
//! - Earner personal benefit (filing year, then later years)
//! - Dependent personal benefit, cut off where a survivor benefit takes over
//! - Optional survivor benefit for the dependent
//! - Optional spousal benefit, capped so the dependent's combined benefit
//!   stays at or below half the earner's PIA

use crate::money::Money;
use crate::month_time::{MonthDate, MonthDuration, MONTHS_IN_YEAR};
use crate::recipient::Recipient;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BenefitType {
    Personal,
    Spousal,
    Survivor,
}

/// Level monthly benefit paid to one recipient over an inclusive month range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenefitPeriod {
    /// Index of the recipient within the couple
    pub recipient_index: usize,

    pub benefit_type: BenefitType,

    pub amount: Money,

    pub start_date: MonthDate,
    pub end_date: MonthDate,
}

impl BenefitPeriod {
    /// Number of covered months
    pub fn months(&self) -> i32 {
        self.end_date.subtract_date(self.start_date).as_months() + 1
    }

    /// Undiscounted total over the period
    pub fn total(&self) -> Money {
        Money::from_cents(self.amount.cents() * self.months() as i64)
    }
}

/// Two recipients and the month each stops receiving benefits
#[derive(Debug, Clone, Copy)]
pub struct Couple<'a> {
    pub recipients: [&'a Recipient; 2],
    pub final_dates: [MonthDate; 2],
}

impl<'a> Couple<'a> {
    pub fn new(recipients: [&'a Recipient; 2], final_dates: [MonthDate; 2]) -> Self {
        Self {
            recipients,
            final_dates,
        }
    }

    /// Same couple with the recipients in the opposite order
    pub fn swapped(&self) -> Self {
        Self {
            recipients: [self.recipients[1], self.recipients[0]],
            final_dates: [self.final_dates[1], self.final_dates[0]],
        }
    }

    pub fn roles(&self) -> CoupleRoles {
        CoupleRoles::new(self)
    }
}

/// Earner/dependent assignment, fixed for every strategy of a couple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoupleRoles {
    pub earner: usize,
    pub dependent: usize,

    /// Whether the dependent can draw on the earner's record at all
    pub spousal_eligible: bool,
}

impl CoupleRoles {
    pub fn new(couple: &Couple<'_>) -> Self {
        // Ties keep the first recipient as earner
        let (earner, dependent) = if couple.recipients[1].higher_earnings_than(couple.recipients[0]) {
            (1, 0)
        } else {
            (0, 1)
        };
        let spousal_eligible = couple.recipients[dependent]
            .eligible_for_spousal_benefit(couple.recipients[earner]);
        Self {
            earner,
            dependent,
            spousal_eligible,
        }
    }
}

/// Personal benefit in the filing year and in every year after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalAmounts {
    pub first_year: Money,
    pub later: Money,
}

impl PersonalAmounts {
    pub fn compute(recipient: &Recipient, filing: MonthDate) -> Self {
        let january_after = MonthDate::from_years_months(filing.year() + 1, 0);
        Self {
            first_year: recipient.benefit_on_date(filing, filing),
            later: recipient.benefit_on_date(filing, january_after),
        }
    }
}

/// Source of the per-strategy benefit amounts
///
/// Implementations may precompute; both must agree with the direct
/// `Recipient` rules.
pub trait BenefitLookup {
    fn personal(&self, index: usize, filing: MonthDate) -> PersonalAmounts;

    /// Spousal benefit for a period starting on `start`
    fn spousal(&self, earner_filing: MonthDate, dependent_filing: MonthDate, start: MonthDate) -> Money;
}

/// Evaluates every amount straight from the recipients
pub struct DirectBenefits<'c, 'a> {
    couple: &'c Couple<'a>,
    roles: CoupleRoles,
}

impl<'c, 'a> DirectBenefits<'c, 'a> {
    pub fn new(couple: &'c Couple<'a>, roles: CoupleRoles) -> Self {
        Self { couple, roles }
    }
}

impl BenefitLookup for DirectBenefits<'_, '_> {
    fn personal(&self, index: usize, filing: MonthDate) -> PersonalAmounts {
        PersonalAmounts::compute(self.couple.recipients[index], filing)
    }

    fn spousal(&self, earner_filing: MonthDate, dependent_filing: MonthDate, start: MonthDate) -> Money {
        let earner = self.couple.recipients[self.roles.earner];
        self.couple.recipients[self.roles.dependent].spousal_benefit_on_date_given_start_date(
            earner,
            earner_filing,
            dependent_filing,
            start,
        )
    }
}

fn push_period(
    out: &mut Vec<BenefitPeriod>,
    recipient_index: usize,
    benefit_type: BenefitType,
    amount: Money,
    start_date: MonthDate,
    end_date: MonthDate,
) {
    out.push(BenefitPeriod {
        recipient_index,
        benefit_type,
        amount,
        start_date,
        end_date,
    });
}

/// Personal periods from `filing` through `final_date` with known amounts
///
/// Months left in the filing year are paid `first_year`, the rest `later`;
/// equal amounts collapse into one period.
pub fn push_personal_periods(
    out: &mut Vec<BenefitPeriod>,
    recipient_index: usize,
    filing: MonthDate,
    final_date: MonthDate,
    amounts: PersonalAmounts,
) {
    let total_months = final_date.subtract_date(filing).as_months() + 1;
    if total_months <= 0 {
        return;
    }
    let first_months = (MONTHS_IN_YEAR - filing.month_index()).min(total_months);
    let later_months = total_months - first_months;

    if later_months > 0 && amounts.first_year == amounts.later {
        push_period(out, recipient_index, BenefitType::Personal, amounts.later, filing, final_date);
        return;
    }

    push_period(
        out,
        recipient_index,
        BenefitType::Personal,
        amounts.first_year,
        filing,
        filing.add_months(first_months - 1),
    );
    if later_months > 0 {
        push_period(
            out,
            recipient_index,
            BenefitType::Personal,
            amounts.later,
            filing.add_months(first_months),
            final_date,
        );
    }
}

/// Personal benefit periods for one recipient filing on `filing`
pub fn personal_benefit_periods(
    recipient: &Recipient,
    filing: MonthDate,
    final_date: MonthDate,
    recipient_index: usize,
) -> Vec<BenefitPeriod> {
    let mut periods = Vec::with_capacity(2);
    push_personal_periods(
        &mut periods,
        recipient_index,
        filing,
        final_date,
        PersonalAmounts::compute(recipient, filing),
    );
    periods
}

/// Every benefit period for a couple filing at `filing_ages`
pub fn strategy_sum_periods(couple: &Couple<'_>, filing_ages: [MonthDuration; 2]) -> Vec<BenefitPeriod> {
    let roles = couple.roles();
    let mut periods = Vec::with_capacity(6);
    compose_periods(couple, roles, &DirectBenefits::new(couple, roles), filing_ages, &mut periods);
    periods
}

/// Period composition shared by every evaluation path
pub fn compose_periods<L: BenefitLookup>(
    couple: &Couple<'_>,
    roles: CoupleRoles,
    lookup: &L,
    filing_ages: [MonthDuration; 2],
    out: &mut Vec<BenefitPeriod>,
) {
    let (e, d) = (roles.earner, roles.dependent);
    let earner = couple.recipients[e];
    let dependent = couple.recipients[d];
    let earner_final = couple.final_dates[e];
    let dependent_final = couple.final_dates[d];

    let earner_filing = earner.birthdate().date_at_ssa_age(filing_ages[e]);
    let mut dependent_filing = dependent.birthdate().date_at_ssa_age(filing_ages[d]);
    if dependent.primary_insurance_amount().is_zero() && dependent_filing < earner_filing {
        dependent_filing = earner_filing;
    }

    let survivor_start = earner_final.add_months(1).max(dependent_filing);
    let dependent_personal = lookup.personal(d, dependent_filing);

    let mut survivor = None;
    if dependent_final > survivor_start {
        let amount = dependent.survivor_benefit(earner, earner_filing, earner_final, survivor_start);
        if dependent_personal.later < amount {
            survivor = Some(amount);
        }
    }

    push_personal_periods(out, e, earner_filing, earner_final, lookup.personal(e, earner_filing));

    let dependent_personal_end = match survivor {
        Some(_) => survivor_start.add_months(-1),
        None => dependent_final,
    };
    push_personal_periods(out, d, dependent_filing, dependent_personal_end, dependent_personal);

    if let Some(amount) = survivor {
        push_period(out, d, BenefitType::Survivor, amount, survivor_start, dependent_final);
    }

    if roles.spousal_eligible {
        let start = earner_filing.max(dependent_filing);
        // Never paid past the dependent's own final month
        let end = survivor_start.add_months(-1).min(dependent_final);
        if end >= start {
            let spousal = lookup.spousal(earner_filing, dependent_filing, start);
            let cap = earner.primary_insurance_amount().times(0.5).sub(dependent_personal.later);
            let amount = Money::min(spousal, Money::max(Money::zero(), cap));
            push_period(out, d, BenefitType::Spousal, amount, start, end);
        }
    }
}

/// Undiscounted sum of every period
pub fn sum_benefit_periods(periods: &[BenefitPeriod]) -> Money {
    periods.iter().map(BenefitPeriod::total).sum()
}
