//! Calendar period type for time-series observations.
//!
//! Source datasets carry either annual periods (`"2021"`) or quarterly
//! periods (`"2021-Q3"`, `"2021Q3"`). Both forms parse into [`Period`],
//! which orders chronologically and knows its own prior-year position.

use chrono::NaiveDate;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A calendar period: a full year or a specific quarter of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// A calendar year (annual datasets: population, NHA indicators).
    Year(i32),
    /// A calendar quarter (quarterly datasets: CPI).
    Quarter {
        /// Calendar year.
        year: i32,
        /// Quarter number, 1-4.
        quarter: u8,
    },
}

impl Period {
    /// Creates a quarterly period.
    ///
    /// # Errors
    ///
    /// Returns an error if `quarter` is not in the range 1-4.
    pub const fn quarter(year: i32, quarter: u8) -> Result<Self, InvalidQuarterError> {
        match quarter {
            1..=4 => Ok(Self::Quarter { year, quarter }),
            _ => Err(InvalidQuarterError { quarter }),
        }
    }

    /// Returns the calendar year of this period.
    #[must_use]
    pub const fn year(self) -> i32 {
        match self {
            Self::Year(year) | Self::Quarter { year, .. } => year,
        }
    }

    /// Returns the same calendar position exactly one year earlier.
    #[must_use]
    pub const fn prior_year(self) -> Self {
        match self {
            Self::Year(year) => Self::Year(year - 1),
            Self::Quarter { year, quarter } => Self::Quarter {
                year: year - 1,
                quarter,
            },
        }
    }

    /// Returns the first calendar day of this period, for chart axes.
    ///
    /// `None` only for years outside chrono's supported range.
    #[must_use]
    pub fn first_day(self) -> Option<NaiveDate> {
        match self {
            Self::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
            Self::Quarter { year, quarter } => {
                NaiveDate::from_ymd_opt(year, u32::from(quarter) * 3 - 2, 1)
            }
        }
    }

    /// Sort key: years order before their own quarters, quarters order by
    /// quarter number.
    const fn sort_key(self) -> (i32, u8) {
        match self {
            Self::Year(year) => (year, 0),
            Self::Quarter { year, quarter } => (year, quarter),
        }
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Quarter { year, quarter } => write!(f, "{year}-Q{quarter}"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || PeriodParseError {
            input: trimmed.to_string(),
        };

        if let Some((year_part, quarter_part)) =
            trimmed.split_once("-Q").or_else(|| trimmed.split_once('Q'))
        {
            let year: i32 = year_part.parse().map_err(|_| err())?;
            let quarter: u8 = quarter_part.parse().map_err(|_| err())?;
            return Self::quarter(year, quarter).map_err(|_| err());
        }

        let year: i32 = trimmed.parse().map_err(|_| err())?;
        Ok(Self::Year(year))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Error returned when a quarter number is outside the range 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidQuarterError {
    /// The invalid quarter number that was provided.
    pub quarter: u8,
}

impl std::fmt::Display for InvalidQuarterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid quarter {}: expected 1-4", self.quarter)
    }
}

impl std::error::Error for InvalidQuarterError {}

/// Error returned when a period string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError {
    /// The string that failed to parse.
    pub input: String,
}

impl std::fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid period {:?}: expected YYYY, YYYYQn, or YYYY-Qn",
            self.input
        )
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashed_quarter() {
        let period: Period = "2021-Q3".parse().unwrap();
        assert_eq!(
            period,
            Period::Quarter {
                year: 2021,
                quarter: 3
            }
        );
    }

    #[test]
    fn parses_compact_quarter() {
        let period: Period = "2021Q3".parse().unwrap();
        assert_eq!(
            period,
            Period::Quarter {
                year: 2021,
                quarter: 3
            }
        );
    }

    #[test]
    fn parses_bare_year() {
        let period: Period = "2021".parse().unwrap();
        assert_eq!(period, Period::Year(2021));
    }

    #[test]
    fn rejects_quarter_out_of_range() {
        assert!("2021-Q5".parse::<Period>().is_err());
        assert!("2021-Q0".parse::<Period>().is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-period".parse::<Period>().is_err());
        assert!("Q3".parse::<Period>().is_err());
    }

    #[test]
    fn orders_chronologically_across_years() {
        let q4_2020 = Period::quarter(2020, 4).unwrap();
        let q1_2021 = Period::quarter(2021, 1).unwrap();
        assert!(q4_2020 < q1_2021);
        assert!(Period::Year(2021) < q1_2021);
        assert!(Period::Year(2020) < Period::Year(2021));
    }

    #[test]
    fn prior_year_keeps_calendar_position() {
        let q3_2021 = Period::quarter(2021, 3).unwrap();
        assert_eq!(q3_2021.prior_year(), Period::quarter(2020, 3).unwrap());
        assert_eq!(Period::Year(2021).prior_year(), Period::Year(2020));
    }

    #[test]
    fn first_day_of_quarter() {
        let q3 = Period::quarter(2021, 3).unwrap();
        assert_eq!(
            q3.first_day(),
            NaiveDate::from_ymd_opt(2021, 7, 1)
        );
    }

    #[test]
    fn displays_round_trip() {
        for s in ["2021", "2021-Q3"] {
            let period: Period = s.parse().unwrap();
            assert_eq!(period.to_string(), s);
        }
    }
}
