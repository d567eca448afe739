//! Calendar view over the injected wall clock

use chrono::NaiveDate;

pub use mockable::{Clock, DefaultClock};

/// Today's date in UTC, as used for age calculations
pub trait CalendarClock {
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> CalendarClock for C {
    fn today(&self) -> NaiveDate {
        self.utc().date_naive()
    }
}

/// Clock pinned to noon UTC on a single date
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn local(&self) -> chrono::DateTime<chrono::Local> {
        self.utc().with_timezone(&chrono::Local)
    }

    fn utc(&self) -> chrono::DateTime<chrono::Utc> {
        self.0.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_today_is_the_utc_date() {
        let mut clock = MockClock::new();
        clock
            .expect_utc()
            .return_const(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());

        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_default_clock_is_after_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert!(DefaultClock.today() > epoch);
    }
}
