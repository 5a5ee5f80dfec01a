//! Billing schedules and the next-billing-date calculator.
//!
//! Occurrence `k` of a schedule is `start + k * interval`, always computed
//! from the start date. A day clamped to a short month therefore comes back
//! on the following long month (`01-31`, `02-29`, `03-31`, ...).
//!
//! Every search over a schedule runs under a step budget derived from the
//! distance between the start date and a horizon, and fails with
//! [`EngineError::IterationLimit`] once the budget is spent.
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{BillingInterval, EngineError, ResultEngine};

/// How far past "now" the calculator may look for the next charge.
pub const HORIZON_YEARS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillingSchedule {
    start: NaiveDate,
    interval: BillingInterval,
}

impl BillingSchedule {
    #[must_use]
    pub const fn new(start: NaiveDate, interval: BillingInterval) -> Self {
        Self { start, interval }
    }

    /// The `k`-th billing date; occurrence 0 is the start date.
    pub fn occurrence(&self, k: u32) -> ResultEngine<NaiveDate> {
        self.interval.advance(self.start, k)
    }

    /// Billing dates in order, starting with the start date.
    ///
    /// The iterator ends after yielding the first error.
    #[must_use]
    pub fn occurrences(&self) -> Occurrences {
        Occurrences {
            schedule: *self,
            next: 0,
            done: false,
        }
    }

    /// Number of steps needed to walk from the start date past `horizon`.
    fn step_budget(&self, horizon: NaiveDate) -> u32 {
        let months = i64::from(horizon.year() - self.start.year()) * 12
            + i64::from(horizon.month()) - i64::from(self.start.month());
        let steps = months.max(0) / i64::from(self.interval.months()) + 2;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// First occurrence accepted by `accept`, looking no further than
    /// `horizon`.
    pub fn find(
        &self,
        horizon: NaiveDate,
        accept: impl Fn(NaiveDate) -> bool,
    ) -> ResultEngine<NaiveDate> {
        let limit = self.step_budget(horizon);
        for occurrence in self.occurrences().take(limit as usize) {
            let occurrence = occurrence?;
            if accept(occurrence) {
                return Ok(occurrence);
            }
            if occurrence > horizon {
                break;
            }
        }
        tracing::warn!(
            start = %self.start,
            interval = %self.interval,
            %horizon,
            "billing schedule did not reach its target within {limit} steps"
        );
        Err(EngineError::IterationLimit {
            start: self.start,
            limit,
        })
    }

    /// First occurrence on or after `date`.
    pub fn first_on_or_after(
        &self,
        date: NaiveDate,
        horizon: NaiveDate,
    ) -> ResultEngine<NaiveDate> {
        self.find(horizon, |occurrence| occurrence >= date)
    }
}

/// Iterator over the billing dates of a [`BillingSchedule`].
#[derive(Clone, Debug)]
pub struct Occurrences {
    schedule: BillingSchedule,
    next: u32,
    done: bool,
}

impl Iterator for Occurrences {
    type Item = ResultEngine<NaiveDate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.schedule.occurrence(self.next);
        match self.next.checked_add(1) {
            Some(next) if item.is_ok() => self.next = next,
            _ => self.done = true,
        }
        Some(item)
    }
}

/// Next billing date strictly after `now`.
///
/// A start date that is still in the future is returned unchanged: the
/// subscription has not been charged yet. Billing dates are compared at
/// midnight, so a charge due today is already past once the day has begun.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use engine::{BillingInterval, next_billing_date_at};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let now = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let next = next_billing_date_at(start, BillingInterval::Monthly, now).unwrap();
/// assert_eq!(next, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
/// ```
pub fn next_billing_date_at(
    start: NaiveDate,
    interval: BillingInterval,
    now: NaiveDateTime,
) -> ResultEngine<NaiveDate> {
    if start.and_time(NaiveTime::MIN) > now {
        return Ok(start);
    }

    let horizon = now
        .date()
        .checked_add_months(Months::new(HORIZON_YEARS * 12))
        .ok_or_else(|| EngineError::DateOverflow(format!("{now} + {HORIZON_YEARS} years")))?;

    BillingSchedule::new(start, interval).find(horizon, |occurrence| {
        occurrence.and_time(NaiveTime::MIN) > now
    })
}

/// [`next_billing_date_at`] relative to the current UTC time.
pub fn next_billing_date(start: NaiveDate, interval: BillingInterval) -> ResultEngine<NaiveDate> {
    next_billing_date_at(start, interval, Utc::now().naive_utc())
}

/// Next billing date rendered as `YYYY-MM-DD`, for callers holding a raw
/// interval label.
///
/// Returns an empty string when the label is not a billing interval or the
/// calculation fails; the cause is logged.
#[must_use]
pub fn next_billing_date_label(start: NaiveDate, interval: &str, now: NaiveDateTime) -> String {
    let interval = match interval.parse::<BillingInterval>() {
        Ok(interval) => interval,
        Err(_) => return String::new(),
    };
    match next_billing_date_at(start, interval, now) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(err) => {
            tracing::warn!("cannot compute next billing date from {start}: {err}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn future_start_is_returned_unchanged() {
        let start = date(2099, 1, 1);
        let next = next_billing_date_at(start, BillingInterval::Monthly, at(2024, 6, 10, 12));
        assert_eq!(next.unwrap(), start);
    }

    #[test]
    fn monthly_steps_to_first_future_date() {
        let next =
            next_billing_date_at(date(2024, 1, 15), BillingInterval::Monthly, at(2024, 6, 10, 0));
        assert_eq!(next.unwrap(), date(2024, 6, 15));
    }

    #[test]
    fn charge_due_today_is_already_past() {
        let next =
            next_billing_date_at(date(2024, 1, 15), BillingInterval::Monthly, at(2024, 6, 15, 8));
        assert_eq!(next.unwrap(), date(2024, 7, 15));

        let midnight = date(2024, 6, 15).and_time(NaiveTime::MIN);
        let next = next_billing_date_at(date(2024, 1, 15), BillingInterval::Monthly, midnight);
        assert_eq!(next.unwrap(), date(2024, 7, 15));
    }

    #[test]
    fn start_today_after_midnight_moves_one_period() {
        let next =
            next_billing_date_at(date(2024, 3, 1), BillingInterval::Yearly, at(2024, 3, 1, 10));
        assert_eq!(next.unwrap(), date(2025, 3, 1));
    }

    #[test]
    fn quarterly_and_yearly_steps() {
        let now = at(2024, 5, 20, 0);
        assert_eq!(
            next_billing_date_at(date(2023, 11, 30), BillingInterval::Quarterly, now).unwrap(),
            date(2024, 5, 30)
        );
        assert_eq!(
            next_billing_date_at(date(2020, 2, 29), BillingInterval::Yearly, now).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn month_end_start_does_not_drift() {
        let schedule = BillingSchedule::new(date(2024, 1, 31), BillingInterval::Monthly);
        let dates: Vec<_> = schedule.occurrences().take(4).map(Result::unwrap).collect();
        assert_eq!(
            dates,
            [date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn occurrences_stop_after_overflow() {
        let schedule = BillingSchedule::new(
            NaiveDate::MAX.with_day(1).unwrap(),
            BillingInterval::Yearly,
        );
        let items: Vec<_> = schedule.occurrences().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(EngineError::DateOverflow(_))));
    }

    #[test]
    fn search_past_horizon_hits_iteration_limit() {
        let schedule = BillingSchedule::new(date(2000, 1, 1), BillingInterval::Monthly);
        let result = schedule.first_on_or_after(date(2030, 1, 1), date(2001, 1, 1));
        assert!(matches!(
            result,
            Err(EngineError::IterationLimit { start, .. }) if start == date(2000, 1, 1)
        ));
    }

    #[test]
    fn label_surface_returns_sentinel_on_unknown_interval() {
        let now = at(2024, 6, 10, 0);
        assert_eq!(next_billing_date_label(date(2024, 1, 15), "월간", now), "2024-06-15");
        assert_eq!(next_billing_date_label(date(2024, 1, 15), "fortnightly", now), "");
    }
}
