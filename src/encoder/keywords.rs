use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{UtcOffset, Weekday};

use crate::wire::WireValue;

/// Error returned when keyword text does not name a known keyword
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{text}'")]
pub struct ParseKeywordError {
    pub kind: &'static str,
    pub text: String,
}

impl ParseKeywordError {
    fn new(kind: &'static str, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Unit accepted by the date arithmetic operators (`$dateAdd`, `$dateDiff`, `$dateTrunc`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateUnit {
    Year,
    Quarter,
    Week,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl DateUnit {
    pub const ALL: [DateUnit; 9] = [
        DateUnit::Year,
        DateUnit::Quarter,
        DateUnit::Week,
        DateUnit::Month,
        DateUnit::Day,
        DateUnit::Hour,
        DateUnit::Minute,
        DateUnit::Second,
        DateUnit::Millisecond,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateUnit::Year => "year",
            DateUnit::Quarter => "quarter",
            DateUnit::Week => "week",
            DateUnit::Month => "month",
            DateUnit::Day => "day",
            DateUnit::Hour => "hour",
            DateUnit::Minute => "minute",
            DateUnit::Second => "second",
            DateUnit::Millisecond => "millisecond",
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateUnit {
    type Err = ParseKeywordError;

    /// Case-insensitive, so `"DAY"` and `"day"` both parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKeywordError::new("date unit", s))
    }
}

/// Keyword accepted by `$meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetaDataKeyword {
    TextScore,
    IndexKey,
}

impl MetaDataKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            MetaDataKeyword::TextScore => "textScore",
            MetaDataKeyword::IndexKey => "indexKey",
        }
    }
}

impl fmt::Display for MetaDataKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaDataKeyword {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textScore" => Ok(MetaDataKeyword::TextScore),
            "indexKey" => Ok(MetaDataKeyword::IndexKey),
            _ => Err(ParseKeywordError::new("metadata keyword", s)),
        }
    }
}

/// A timezone operand: an Olson identifier such as `"Asia/Shanghai"` or a UTC offset such as `"+08:00"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timezone(Cow<'static, str>);

impl Timezone {
    pub const UTC: Timezone = Timezone(Cow::Borrowed("UTC"));

    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Timezone(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UtcOffset> for Timezone {
    /// Renders `+hh:mm`; seconds are not expressible in the engine's offset syntax and are dropped
    fn from(offset: UtcOffset) -> Self {
        let (hours, minutes, _) = offset.as_hms();
        let sign = if offset.is_negative() { '-' } else { '+' };
        Timezone(Cow::Owned(format!(
            "{}{:02}:{:02}",
            sign,
            hours.unsigned_abs(),
            minutes.unsigned_abs()
        )))
    }
}

/// Three-letter lowercase day name accepted as `startOfWeek`
pub fn weekday_abbreviation(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sunday => "sun",
        Weekday::Monday => "mon",
        Weekday::Tuesday => "tue",
        Weekday::Wednesday => "wed",
        Weekday::Thursday => "thu",
        Weekday::Friday => "fri",
        Weekday::Saturday => "sat",
    }
}

/// Type codes understood by `$type` comparisons and `$convert`'s `to` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Double,
    String,
    Document,
    Array,
    Binary,
    ObjectId,
    Boolean,
    DateTime,
    Null,
    RegularExpression,
    JavaScript,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
}

impl WireType {
    pub fn code(self) -> i32 {
        match self {
            WireType::Double => 1,
            WireType::String => 2,
            WireType::Document => 3,
            WireType::Array => 4,
            WireType::Binary => 5,
            WireType::ObjectId => 7,
            WireType::Boolean => 8,
            WireType::DateTime => 9,
            WireType::Null => 10,
            WireType::RegularExpression => 11,
            WireType::JavaScript => 13,
            WireType::Int32 => 16,
            WireType::Timestamp => 17,
            WireType::Int64 => 18,
            WireType::Decimal128 => 19,
            WireType::MinKey => -1,
            WireType::MaxKey => 127,
        }
    }
}

/// A domain keyword operand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    DateUnit(DateUnit),
    MetaData(MetaDataKeyword),
    Timezone(Timezone),
    Weekday(Weekday),
    WireType(WireType),
}

impl Keyword {
    /// Wire form of the keyword: its spelling as a string, or the numeric code for a type
    pub fn to_wire_value(&self) -> WireValue {
        match self {
            Keyword::DateUnit(unit) => WireValue::String(unit.as_str().to_string()),
            Keyword::MetaData(keyword) => WireValue::String(keyword.as_str().to_string()),
            Keyword::Timezone(timezone) => WireValue::String(timezone.as_str().to_string()),
            Keyword::Weekday(weekday) => {
                WireValue::String(weekday_abbreviation(*weekday).to_string())
            }
            Keyword::WireType(wire_type) => WireValue::Int32(wire_type.code()),
        }
    }
}

impl From<DateUnit> for Keyword {
    fn from(unit: DateUnit) -> Self {
        Keyword::DateUnit(unit)
    }
}

impl From<MetaDataKeyword> for Keyword {
    fn from(keyword: MetaDataKeyword) -> Self {
        Keyword::MetaData(keyword)
    }
}

impl From<Timezone> for Keyword {
    fn from(timezone: Timezone) -> Self {
        Keyword::Timezone(timezone)
    }
}

impl From<UtcOffset> for Keyword {
    fn from(offset: UtcOffset) -> Self {
        Keyword::Timezone(offset.into())
    }
}

impl From<Weekday> for Keyword {
    fn from(weekday: Weekday) -> Self {
        Keyword::Weekday(weekday)
    }
}

impl From<WireType> for Keyword {
    fn from(wire_type: WireType) -> Self {
        Keyword::WireType(wire_type)
    }
}

/// Aggregation system variables
pub mod system_variables {
    /// Current datetime, constant for the whole pipeline
    pub const NOW: &str = "$$NOW";
    /// Current timestamp, only on replica sets and sharded clusters
    pub const CLUSTER_TIME: &str = "$$CLUSTER_TIME";
    /// The root document being processed
    pub const ROOT: &str = "$$ROOT";
    /// Start of the current field path, `$$ROOT` unless rebound
    pub const CURRENT: &str = "$$CURRENT";
    /// Evaluates to a missing value; used to exclude fields conditionally
    pub const REMOVE: &str = "$$REMOVE";
    pub const DESCEND: &str = "$$DESCEND";
    pub const PRUNE: &str = "$$PRUNE";
    pub const KEEP: &str = "$$KEEP";
    /// Metadata results of an Atlas Search query
    pub const SEARCH_META: &str = "$$SEARCH_META";
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn test_date_unit_spelling() {
        let spelled: Vec<&str> = DateUnit::ALL.iter().map(|unit| unit.as_str()).collect();
        assert_eq!(
            spelled,
            vec![
                "year",
                "quarter",
                "week",
                "month",
                "day",
                "hour",
                "minute",
                "second",
                "millisecond"
            ]
        );
    }

    #[test]
    fn test_date_unit_from_str_ignores_case() {
        assert_eq!("Day".parse::<DateUnit>(), Ok(DateUnit::Day));
        assert_eq!("MILLISECOND".parse::<DateUnit>(), Ok(DateUnit::Millisecond));
        let err = "fortnight".parse::<DateUnit>().unwrap_err();
        assert_eq!(err.to_string(), "unknown date unit 'fortnight'");
    }

    #[test]
    fn test_date_unit_serde_matches_spelling() {
        for unit in DateUnit::ALL {
            assert_eq!(
                serde_json::to_value(unit).unwrap(),
                serde_json::json!(unit.as_str())
            );
        }
    }

    #[test]
    fn test_meta_data_keyword() {
        assert_eq!(MetaDataKeyword::TextScore.to_string(), "textScore");
        assert_eq!("indexKey".parse::<MetaDataKeyword>(), Ok(MetaDataKeyword::IndexKey));
        assert!("textscore".parse::<MetaDataKeyword>().is_err());
    }

    #[test]
    fn test_timezone_from_offset() {
        assert_eq!(Timezone::from(offset!(+8)).as_str(), "+08:00");
        assert_eq!(Timezone::from(offset!(-5:30)).as_str(), "-05:30");
        assert_eq!(Timezone::from(UtcOffset::UTC).as_str(), "+00:00");
        assert_eq!(Timezone::new("Asia/Shanghai").to_string(), "Asia/Shanghai");
    }

    #[test]
    fn test_keyword_wire_values() {
        assert_eq!(
            Keyword::from(Weekday::Wednesday).to_wire_value(),
            WireValue::String("wed".to_string())
        );
        assert_eq!(
            Keyword::from(WireType::Decimal128).to_wire_value(),
            WireValue::Int32(19)
        );
        assert_eq!(
            Keyword::from(WireType::MinKey).to_wire_value(),
            WireValue::Int32(-1)
        );
        assert_eq!(
            Keyword::from(Timezone::UTC).to_wire_value(),
            WireValue::String("UTC".to_string())
        );
    }
}
