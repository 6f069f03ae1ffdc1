//! Birthdate to Ba Zi chart lookup.
//!
//! The lookup is a fixed chart for every valid birthdate. Computing real
//! pillars needs the sexagenary calendar, which this crate does not carry.

use crate::models::{Birthdate, FourPillarChart};
use crate::Result;
use tracing::debug;

const YEAR_PILLAR: &str = "甲子";
const MONTH_PILLAR: &str = "丙寅";
const DAY_PILLAR: &str = "戊辰";
const HOUR_PILLAR: &str = "庚申";

/// Validate `birthdate` and return its four-pillar chart.
pub fn lookup_chart(birthdate: &Birthdate) -> Result<FourPillarChart> {
    birthdate.validate()?;

    debug!(
        "Looking up chart for {}-{:02}-{:02} {:02}h",
        birthdate.year, birthdate.month, birthdate.day, birthdate.hour
    );

    Ok(FourPillarChart {
        year: YEAR_PILLAR.to_string(),
        month: MONTH_PILLAR.to_string(),
        day: DAY_PILLAR.to_string(),
        hour: HOUR_PILLAR.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_lookup_returns_known_chart() {
        let chart = lookup_chart(&Birthdate::new(1990, 5, 15, 8)).unwrap();
        assert_eq!(chart.year, "甲子");
        assert_eq!(chart.month, "丙寅");
        assert_eq!(chart.day, "戊辰");
        assert_eq!(chart.hour, "庚申");
    }

    #[test]
    fn test_lookup_fills_every_pillar_for_valid_dates() {
        for birthdate in [
            Birthdate::new(1900, 1, 1, 0),
            Birthdate::new(1964, 2, 29, 12),
            Birthdate::new(2001, 12, 31, 23),
        ] {
            let chart = lookup_chart(&birthdate).unwrap();
            assert!(chart.pillars().iter().all(|p| !p.is_empty()));
        }
    }

    #[test]
    fn test_lookup_rejects_invalid_birthdate() {
        let err = lookup_chart(&Birthdate::new(1990, 2, 30, 8)).unwrap_err();
        assert!(matches!(err, Error::InvalidBirthdate(_)));
    }
}
