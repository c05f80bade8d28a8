use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Bar intervals a dashboard view can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    #[default]
    OneDay,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
}

impl Interval {
    pub const ALL: [Self; 4] = [Self::OneHour, Self::OneDay, Self::OneWeek, Self::OneMonth];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::OneWeek => "1wk",
            Self::OneMonth => "1mo",
        }
    }

    /// Approximate number of bars per year, used to annualize volatility.
    pub const fn periods_per_year(self) -> f64 {
        match self {
            Self::OneHour => 252.0 * 6.5,
            Self::OneDay => 252.0,
            Self::OneWeek => 52.0,
            Self::OneMonth => 12.0,
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1h" | "60m" => Ok(Self::OneHour),
            "1d" => Ok(Self::OneDay),
            "1wk" | "1w" => Ok(Self::OneWeek),
            "1mo" => Ok(Self::OneMonth),
            other => Err(ValidationError::InvalidInterval {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_interval() {
        let interval = Interval::from_str("1d").expect("must parse");
        assert_eq!(interval, Interval::OneDay);
        assert_eq!(Interval::from_str("1W").expect("alias"), Interval::OneWeek);
    }

    #[test]
    fn rejects_invalid_interval() {
        let err = Interval::from_str("2h").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidInterval { .. }));
    }
}
