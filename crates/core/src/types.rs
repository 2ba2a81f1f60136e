use serde::{Deserialize, Serialize};

/// Reporting window accepted by the metrics endpoints.
///
/// Unrecognized period codes fall back to [`Period::ThirtyDays`]; that
/// silent default is part of the API contract, unlike other malformed
/// inputs which are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
    #[serde(rename = "1y")]
    OneYear,
}

impl Period {
    /// Parse a period code, falling back to the 30-day default.
    pub fn parse(code: &str) -> Self {
        match code {
            "7d" => Period::SevenDays,
            "30d" => Period::ThirtyDays,
            "90d" => Period::NinetyDays,
            "1y" => Period::OneYear,
            _ => Period::ThirtyDays,
        }
    }

    /// Number of calendar days covered by this period.
    pub fn days(self) -> u32 {
        match self {
            Period::SevenDays => 7,
            Period::ThirtyDays => 30,
            Period::NinetyDays => 90,
            Period::OneYear => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::SevenDays => "7d",
            Period::ThirtyDays => "30d",
            Period::NinetyDays => "90d",
            Period::OneYear => "1y",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse_known_codes() {
        assert_eq!(Period::parse("7d"), Period::SevenDays);
        assert_eq!(Period::parse("30d"), Period::ThirtyDays);
        assert_eq!(Period::parse("90d"), Period::NinetyDays);
        assert_eq!(Period::parse("1y"), Period::OneYear);
    }

    #[test]
    fn test_period_parse_falls_back_to_30d() {
        assert_eq!(Period::parse("14d"), Period::ThirtyDays);
        assert_eq!(Period::parse(""), Period::ThirtyDays);
    }

    #[test]
    fn test_period_days() {
        assert_eq!(Period::SevenDays.days(), 7);
        assert_eq!(Period::OneYear.days(), 365);
    }

    #[test]
    fn test_period_serde_codes() {
        let json = serde_json::to_string(&Period::NinetyDays).unwrap();
        assert_eq!(json, "\"90d\"");
        let back: Period = serde_json::from_str("\"1y\"").unwrap();
        assert_eq!(back, Period::OneYear);
    }
}
