//! Stay-total calculation — pure, no side effects.
//!
//! Booking forms recompute the total whenever the room selection or either
//! date changes; a non-positive date range means "form not complete yet"
//! and prices to zero rather than erroring.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Number of billable nights between two calendar dates.
///
/// If `check_out` is not strictly after `check_in` the stay is zero nights.
/// Otherwise at least one night is always charged.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
  let days = (check_out - check_in).num_days();
  if days <= 0 { 0 } else { days.max(1) }
}

/// Total for a stay: billable nights × nightly rate.
///
/// No currency rounding is applied beyond the rate's own precision.
pub fn stay_total(
  nightly_rate: Decimal,
  check_in: NaiveDate,
  check_out: NaiveDate,
) -> Decimal {
  Decimal::from(nights(check_in, check_out)) * nightly_rate
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use rust_decimal::Decimal;

  use super::{nights, stay_total};

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn three_nights_at_one_hundred() {
    let total = stay_total(Decimal::from(100), d(2024, 1, 1), d(2024, 1, 4));
    assert_eq!(total, Decimal::from(300));
  }

  #[test]
  fn same_day_prices_to_zero() {
    let total = stay_total(Decimal::from(100), d(2024, 1, 1), d(2024, 1, 1));
    assert_eq!(total, Decimal::ZERO);
  }

  #[test]
  fn inverted_range_prices_to_zero() {
    let total = stay_total(Decimal::from(100), d(2024, 1, 4), d(2024, 1, 1));
    assert_eq!(total, Decimal::ZERO);
    assert_eq!(nights(d(2024, 1, 4), d(2024, 1, 1)), 0);
  }

  #[test]
  fn one_night_minimum() {
    assert_eq!(nights(d(2024, 1, 1), d(2024, 1, 2)), 1);
  }

  #[test]
  fn fractional_rate_keeps_precision() {
    let rate = Decimal::new(9950, 2); // 99.50
    let total = stay_total(rate, d(2024, 6, 10), d(2024, 6, 12));
    assert_eq!(total, Decimal::new(19900, 2));
  }

  #[test]
  fn month_boundary() {
    assert_eq!(nights(d(2024, 1, 30), d(2024, 2, 2)), 3);
  }
}
