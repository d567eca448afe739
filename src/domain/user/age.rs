//! Age eligibility
//!
//! Ages are whole calendar years: the count increments on the birthday, and a
//! 29 February birthday only completes its year on 1 March in non-leap years.

use chrono::{Datelike, NaiveDate};

use super::validation::UserValidationError;

/// Minimum age, in whole years, for holding an account
pub const MINIMUM_AGE: i32 = 13;

/// Whole years elapsed between `birth_date` and `reference_date`.
///
/// Negative when the birth date lies after the reference date.
pub fn age_in_years(birth_date: NaiveDate, reference_date: NaiveDate) -> i32 {
    let years = reference_date.year() - birth_date.year();
    let birthday_passed =
        (reference_date.month(), reference_date.day()) >= (birth_date.month(), birth_date.day());

    if birthday_passed { years } else { years - 1 }
}

/// Check that the holder of `birth_date` is at least [`MINIMUM_AGE`] on `reference_date`
pub fn validate_age(
    birth_date: NaiveDate,
    reference_date: NaiveDate,
) -> Result<(), UserValidationError> {
    let age = age_in_years(birth_date, reference_date);

    if age < MINIMUM_AGE {
        return Err(UserValidationError::AgeTooLow {
            age,
            minimum: MINIMUM_AGE,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_on_and_around_birthday() {
        let birth = date(2000, 6, 15);

        assert_eq!(age_in_years(birth, date(2013, 6, 14)), 12);
        assert_eq!(age_in_years(birth, date(2013, 6, 15)), 13);
        assert_eq!(age_in_years(birth, date(2013, 12, 31)), 13);
    }

    #[test]
    fn test_age_is_calendar_aware_not_365_days() {
        // 13 * 365 days after the birth date falls short of the birthday
        // because of the leap days in between
        let birth = date(2004, 3, 10);
        let reference = birth + chrono::Duration::days(13 * 365);

        assert_eq!(reference, date(2017, 3, 7));
        assert_eq!(age_in_years(birth, reference), 12);
    }

    #[test]
    fn test_leap_day_birthday() {
        let birth = date(2008, 2, 29);

        assert_eq!(age_in_years(birth, date(2021, 2, 28)), 12);
        assert_eq!(age_in_years(birth, date(2021, 3, 1)), 13);
        assert_eq!(age_in_years(birth, date(2024, 2, 29)), 16);
    }

    #[test]
    fn test_future_birth_date_is_negative() {
        assert_eq!(age_in_years(date(2030, 1, 1), date(2025, 1, 1)), -5);
    }

    #[test]
    fn test_validate_age_boundaries() {
        let reference = date(2024, 5, 20);

        assert!(validate_age(date(2011, 5, 20), reference).is_ok());
        assert!(validate_age(date(1970, 1, 1), reference).is_ok());
        assert_eq!(
            validate_age(date(2011, 5, 21), reference),
            Err(UserValidationError::AgeTooLow { age: 12, minimum: 13 })
        );
    }

    #[test]
    fn test_validate_age_rejects_future_birth_date() {
        let result = validate_age(date(2025, 1, 1), date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(UserValidationError::AgeTooLow { age: -1, .. })
        ));
    }
}
