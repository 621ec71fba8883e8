use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{0}")]
pub struct PeriodError(pub String);

/// One unit of remote trip data.  Older data is published as one archive per
/// year, recent data as one archive per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    year: u16,
    month: Option<u8>,
}

impl Period {
    pub fn yearly(year: u16) -> Period {
        Period { year, month: None }
    }

    pub fn monthly(year: u16, month: u8) -> Result<Period, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError(format!("Month of year {} not in 1..=12", month)));
        }
        Ok(Period {
            year,
            month: Some(month),
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    /// Name of the archive, e.g. `202512-citibike-tripdata.zip` or
    /// `2018-citibike-tripdata.zip`.
    pub fn file_name(&self) -> String {
        match self.month {
            Some(month) => format!("{}{:02}-citibike-tripdata.zip", self.year, month),
            None => format!("{}-citibike-tripdata.zip", self.year),
        }
    }

    /// Directory relative to the output root, `2025/12` or `2018`.
    pub fn relative_dir(&self) -> PathBuf {
        let mut dir = PathBuf::from(self.year.to_string());
        if let Some(month) = self.month {
            dir.push(format!("{:02}", month));
        }
        dir
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.file_name())
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.month {
            Some(month) => write!(f, "{}-{:02}", self.year, month),
            None => write!(f, "{}", self.year),
        }
    }
}

/// Accepts `2018`, `2025-12` or `202512`.
impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_year = |x: &str| {
            if x.len() != 4 {
                return Err(PeriodError(format!("Failed parsing {} as a year", s)));
            }
            x.parse::<u16>()
                .map_err(|_| PeriodError(format!("Failed parsing {} as a year", s)))
        };
        let parse_month = |x: &str| {
            x.parse::<u8>()
                .map_err(|_| PeriodError(format!("Failed parsing {} as a month", s)))
        };
        let s = s.trim();
        match (s.split_once('-'), s.len()) {
            (Some((year, month)), _) => Period::monthly(parse_year(year)?, parse_month(month)?),
            (None, 6) if s.is_ascii() => {
                Period::monthly(parse_year(&s[0..4])?, parse_month(&s[4..])?)
            }
            (None, _) => Ok(Period::yearly(parse_year(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn monthly_names_are_zero_padded() {
        let period = Period::monthly(2025, 3).unwrap();
        assert_eq!(period.file_name(), "202503-citibike-tripdata.zip");
        assert_eq!(period.relative_dir(), Path::new("2025").join("03"));
        assert_eq!(
            period.url("https://s3.amazonaws.com/tripdata"),
            "https://s3.amazonaws.com/tripdata/202503-citibike-tripdata.zip"
        );
        assert_eq!(period.to_string(), "2025-03");
    }

    #[test]
    fn yearly_names_have_no_month() {
        let period = Period::yearly(2018);
        assert_eq!(period.file_name(), "2018-citibike-tripdata.zip");
        assert_eq!(period.relative_dir(), Path::new("2018"));
        assert_eq!(
            period.url("https://s3.amazonaws.com/tripdata/"),
            "https://s3.amazonaws.com/tripdata/2018-citibike-tripdata.zip"
        );
        assert_eq!(period.month(), None);
    }

    #[test]
    fn every_month_is_two_digits() {
        for month in 1..=12 {
            let period = Period::monthly(2024, month).unwrap();
            let name = period.file_name();
            assert_eq!(&name[4..6], format!("{:02}", month));
            assert_eq!(period.relative_dir().components().count(), 2);
        }
    }

    #[test]
    fn invalid_month() {
        assert!(Period::monthly(2025, 0).is_err());
        assert!(Period::monthly(2025, 13).is_err());
    }

    #[test]
    fn parse_period() {
        assert_eq!("2018".parse::<Period>(), Ok(Period::yearly(2018)));
        assert_eq!("2025-12".parse::<Period>(), Period::monthly(2025, 12));
        assert_eq!("202512".parse::<Period>(), Period::monthly(2025, 12));
        assert_eq!("2025-1".parse::<Period>(), Period::monthly(2025, 1));
        assert!("2025-13".parse::<Period>().is_err());
        assert!("25".parse::<Period>().is_err());
        assert!("abcd".parse::<Period>().is_err());
    }
}
