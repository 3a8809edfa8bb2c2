//! Sharding policies.
//!
//! Descriptors declare their policy in a loose wire form ([`ShardingSpec`]):
//! a type tag plus optional count and date fields, exactly as they appear in
//! configuration. [`ShardingPolicy::from_spec`] validates that form into the
//! typed policy the resolver works on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date_format::BucketFormat;
use crate::error::{Result, ShardingError};

/// Upper bound on precise shard counts.
pub const MAX_PRECISE_SHARDS: i64 = 10_000;

/// Bucket format used when a date policy does not name one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y";

/// Policy type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardingType {
    Precise,
    Date,
}

impl ShardingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShardingType::Precise => "precise",
            ShardingType::Date => "date",
        }
    }
}

impl FromStr for ShardingType {
    type Err = ShardingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "precise" => Ok(ShardingType::Precise),
            "date" | "date_range" => Ok(ShardingType::Date),
            _ => Err(ShardingError::UnsupportedShardingType(s.to_string())),
        }
    }
}

impl fmt::Display for ShardingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy fields as declared by a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardingSpec {
    #[serde(rename = "type")]
    pub sharding_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,

    /// Absent, empty, `"open"` or `"now"` for an open-ended range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl ShardingSpec {
    pub fn precise(count: i64) -> Self {
        Self {
            sharding_type: ShardingType::Precise.as_str().to_string(),
            count: Some(count),
            ..Self::default()
        }
    }

    pub fn date(start: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            sharding_type: ShardingType::Date.as_str().to_string(),
            date_start: Some(start.into()),
            date_format: Some(format.into()),
            ..Self::default()
        }
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.date_end = Some(end.into());
        self
    }
}

/// End of a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeEnd {
    /// Resolved against the clock at resolution time
    Open,
    Until(NaiveDate),
}

impl DateRangeEnd {
    fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(DateRangeEnd::Open),
            Some(s) if s.eq_ignore_ascii_case("open") || s.eq_ignore_ascii_case("now") => {
                Ok(DateRangeEnd::Open)
            }
            Some(s) => parse_policy_date(s).map(DateRangeEnd::Until),
        }
    }
}

/// Validated date-range policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangePolicy {
    start: NaiveDate,
    end: DateRangeEnd,
    format: BucketFormat,
}

impl DateRangePolicy {
    pub fn new(start: NaiveDate, end: DateRangeEnd, format: BucketFormat) -> Result<Self> {
        if let DateRangeEnd::Until(end) = end {
            if end < start {
                return Err(ShardingError::invalid_policy(format!(
                    "date range end {} is before start {}",
                    end, start
                )));
            }
        }
        Ok(Self { start, end, format })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> DateRangeEnd {
        self.end
    }

    pub fn format(&self) -> &BucketFormat {
        &self.format
    }

    /// Concrete end date given today's date.
    pub fn end_date(&self, today: NaiveDate) -> NaiveDate {
        match self.end {
            DateRangeEnd::Open => today,
            DateRangeEnd::Until(end) => end,
        }
    }
}

/// Typed sharding policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardingPolicy {
    Precise { count: u32 },
    DateRange(DateRangePolicy),
}

impl ShardingPolicy {
    pub fn precise(count: i64) -> Result<Self> {
        if count <= 0 {
            return Err(ShardingError::invalid_policy(format!(
                "shard count must be positive, got {}",
                count
            )));
        }
        if count > MAX_PRECISE_SHARDS {
            return Err(ShardingError::invalid_policy(format!(
                "shard count {} exceeds the maximum of {}",
                count, MAX_PRECISE_SHARDS
            )));
        }
        // bounded by MAX_PRECISE_SHARDS above
        Ok(ShardingPolicy::Precise { count: count as u32 })
    }

    pub fn date_range(start: &str, end: Option<&str>, format: &str) -> Result<Self> {
        let start = parse_policy_date(start)?;
        let end = DateRangeEnd::parse(end)?;
        let format = BucketFormat::parse(format)?;
        DateRangePolicy::new(start, end, format).map(ShardingPolicy::DateRange)
    }

    pub fn from_spec(spec: &ShardingSpec) -> Result<Self> {
        match spec.sharding_type.parse::<ShardingType>()? {
            ShardingType::Precise => {
                let count = spec.count.ok_or_else(|| {
                    ShardingError::invalid_policy("precise sharding requires a count")
                })?;
                Self::precise(count)
            }
            ShardingType::Date => {
                let start = spec.date_start.as_deref().ok_or_else(|| {
                    ShardingError::invalid_policy("date sharding requires a start date")
                })?;
                let format = spec.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
                Self::date_range(start, spec.date_end.as_deref(), format)
            }
        }
    }

    pub fn sharding_type(&self) -> ShardingType {
        match self {
            ShardingPolicy::Precise { .. } => ShardingType::Precise,
            ShardingPolicy::DateRange(_) => ShardingType::Date,
        }
    }

    /// Open-ended date range that has not started yet as of `today`.
    ///
    /// Resolving such a policy fails as an inverted range.
    pub fn starts_after(&self, today: NaiveDate) -> bool {
        match self {
            ShardingPolicy::DateRange(range) => {
                range.end() == DateRangeEnd::Open && range.start() > today
            }
            ShardingPolicy::Precise { .. } => false,
        }
    }

    /// Whether the key set depends on the date the policy is resolved on.
    pub fn is_time_dependent(&self) -> bool {
        matches!(
            self,
            ShardingPolicy::DateRange(DateRangePolicy {
                end: DateRangeEnd::Open,
                ..
            })
        )
    }
}

/// Parse a policy date: `YYYY-MM-DD`, `YYYY-MM` (first of month) or `YYYY`
/// (first of January).
pub fn parse_policy_date(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();
    let unparseable = || ShardingError::invalid_policy(format!("unparseable date '{}'", raw));

    let expanded = match s.len() {
        4 if s.bytes().all(|b| b.is_ascii_digit()) => format!("{}-01-01", s),
        7 if s.as_bytes()[4] == b'-' => format!("{}-01", s),
        _ => s.to_string(),
    };

    NaiveDate::parse_from_str(&expanded, "%Y-%m-%d").map_err(|_| unparseable())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_starts_after() {
        let open = ShardingPolicy::date_range("2020-03-01", None, "%Y").unwrap();
        assert!(open.starts_after(date(1970, 1, 1)));
        assert!(!open.starts_after(date(2020, 3, 1)));

        let closed = ShardingPolicy::date_range("2020-03-01", Some("2021-01-01"), "%Y").unwrap();
        assert!(!closed.starts_after(date(1970, 1, 1)));
        assert!(!ShardingPolicy::precise(3).unwrap().starts_after(date(1970, 1, 1)));
    }

    #[test]
    fn test_sharding_type_tags() {
        assert_eq!("precise".parse::<ShardingType>().unwrap(), ShardingType::Precise);
        assert_eq!("Date".parse::<ShardingType>().unwrap(), ShardingType::Date);
        assert_eq!("date_range".parse::<ShardingType>().unwrap(), ShardingType::Date);
        assert_eq!(
            "hash".parse::<ShardingType>().unwrap_err(),
            ShardingError::UnsupportedShardingType("hash".to_string())
        );
    }

    #[test]
    fn test_precise_bounds() {
        assert_eq!(ShardingPolicy::precise(10).unwrap(), ShardingPolicy::Precise { count: 10 });
        assert!(matches!(ShardingPolicy::precise(0), Err(ShardingError::InvalidPolicy(_))));
        assert!(matches!(ShardingPolicy::precise(-1), Err(ShardingError::InvalidPolicy(_))));
        assert!(matches!(
            ShardingPolicy::precise(MAX_PRECISE_SHARDS + 1),
            Err(ShardingError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_parse_policy_date_forms() {
        assert_eq!(parse_policy_date("2020-03-01").unwrap(), date(2020, 3, 1));
        assert_eq!(parse_policy_date("2020-03").unwrap(), date(2020, 3, 1));
        assert_eq!(parse_policy_date("2020").unwrap(), date(2020, 1, 1));
        assert_eq!(parse_policy_date(" 2020-03-01 ").unwrap(), date(2020, 3, 1));
        assert!(parse_policy_date("2020-02-30").is_err());
        assert!(parse_policy_date("yesterday").is_err());
        assert!(parse_policy_date("").is_err());
    }

    #[test]
    fn test_from_spec_date() {
        let policy = ShardingPolicy::from_spec(&ShardingSpec::date("2020-03-01", "%Y")).unwrap();
        assert!(policy.is_time_dependent());
        assert_eq!(policy.sharding_type(), ShardingType::Date);

        let bounded = ShardingSpec::date("2020-03-01", "%Y").with_end("2022-01-01");
        let policy = ShardingPolicy::from_spec(&bounded).unwrap();
        assert!(!policy.is_time_dependent());
    }

    #[test]
    fn test_from_spec_open_end_aliases() {
        for end in ["", "open", "NOW"] {
            let spec = ShardingSpec::date("2020", "%Y").with_end(end);
            assert!(ShardingPolicy::from_spec(&spec).unwrap().is_time_dependent());
        }
    }

    #[test]
    fn test_from_spec_defaults_format_to_year() {
        let spec = ShardingSpec {
            sharding_type: "date".to_string(),
            date_start: Some("2020".to_string()),
            ..ShardingSpec::default()
        };
        match ShardingPolicy::from_spec(&spec).unwrap() {
            ShardingPolicy::DateRange(range) => assert_eq!(range.format().pattern(), "%Y"),
            other => panic!("unexpected policy {:?}", other),
        }
    }

    #[test]
    fn test_from_spec_errors() {
        let missing_count = ShardingSpec {
            sharding_type: "precise".to_string(),
            ..ShardingSpec::default()
        };
        assert!(matches!(
            ShardingPolicy::from_spec(&missing_count),
            Err(ShardingError::InvalidPolicy(_))
        ));

        let inverted = ShardingSpec::date("2022-01-01", "%Y").with_end("2021-12-31");
        assert!(matches!(
            ShardingPolicy::from_spec(&inverted),
            Err(ShardingError::InvalidPolicy(_))
        ));

        let unknown = ShardingSpec {
            sharding_type: "hash".to_string(),
            count: Some(4),
            ..ShardingSpec::default()
        };
        assert!(matches!(
            ShardingPolicy::from_spec(&unknown),
            Err(ShardingError::UnsupportedShardingType(_))
        ));
    }

    #[test]
    fn test_spec_deserializes_type_tag() {
        let spec: ShardingSpec =
            serde_json::from_str(r#"{"type":"date","date_start":"2020-03-01","date_format":"%Y"}"#)
                .unwrap();
        assert_eq!(spec, ShardingSpec::date("2020-03-01", "%Y"));
    }
}
