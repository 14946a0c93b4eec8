use super::{Field, Operator};
use crate::encoder::Expr;

/// $dateAdd - Add a number of time units to a date
///
/// Example:
/// ```json
/// {"$dateAdd": {"startDate": "$purchaseDate", "unit": "day", "amount": 3}}
/// ```
pub fn date_add(
    start_date: impl Into<Expr>,
    unit: impl Into<Expr>,
    amount: impl Into<Expr>,
) -> Operator {
    date_add_with(start_date, unit, amount, None)
}

pub fn date_add_with(
    start_date: impl Into<Expr>,
    unit: impl Into<Expr>,
    amount: impl Into<Expr>,
    timezone: Option<Expr>,
) -> Operator {
    shift("$dateAdd", start_date.into(), unit.into(), amount.into(), timezone)
}

/// $dateSubtract - Subtract a number of time units from a date
pub fn date_subtract(
    start_date: impl Into<Expr>,
    unit: impl Into<Expr>,
    amount: impl Into<Expr>,
) -> Operator {
    date_subtract_with(start_date, unit, amount, None)
}

pub fn date_subtract_with(
    start_date: impl Into<Expr>,
    unit: impl Into<Expr>,
    amount: impl Into<Expr>,
    timezone: Option<Expr>,
) -> Operator {
    shift("$dateSubtract", start_date.into(), unit.into(), amount.into(), timezone)
}

fn shift(keyword: &'static str, start_date: Expr, unit: Expr, amount: Expr, timezone: Option<Expr>) -> Operator {
    Operator::document(
        keyword,
        [
            Field::required("startDate", start_date),
            Field::required("unit", unit),
            Field::required("amount", amount),
            Field::optional("timezone", timezone),
        ],
    )
}

/// $dateDiff - Difference between two dates in the given unit
pub fn date_diff(
    start_date: impl Into<Expr>,
    end_date: impl Into<Expr>,
    unit: impl Into<Expr>,
) -> Operator {
    date_diff_with(start_date, end_date, unit, None, None)
}

/// $dateDiff with optional `timezone` and `startOfWeek`
///
/// Example:
/// ```json
/// {"$dateDiff": {"startDate": "$start", "endDate": "$end", "unit": "week", "startOfWeek": "mon"}}
/// ```
pub fn date_diff_with(
    start_date: impl Into<Expr>,
    end_date: impl Into<Expr>,
    unit: impl Into<Expr>,
    timezone: Option<Expr>,
    start_of_week: Option<Expr>,
) -> Operator {
    Operator::document(
        "$dateDiff",
        [
            Field::required("startDate", start_date),
            Field::required("endDate", end_date),
            Field::required("unit", unit),
            Field::optional("timezone", timezone),
            Field::optional("startOfWeek", start_of_week),
        ],
    )
}

/// Parts of a date for `$dateFromParts`
///
/// A calendar date uses `year`, `month` and `day`. An ISO week date uses
/// `isoWeekYear`, `isoWeek` and `isoDayOfWeek` in the same positions; the
/// naming is fixed by the constructor.
#[derive(Debug, Clone)]
pub struct DateParts {
    iso: bool,
    year: Expr,
    month_or_week: Option<Expr>,
    day: Option<Expr>,
    hour: Option<Expr>,
    minute: Option<Expr>,
    second: Option<Expr>,
    millisecond: Option<Expr>,
    timezone: Option<Expr>,
}

impl DateParts {
    /// Calendar date parts starting from the year
    pub fn new(year: impl Into<Expr>) -> Self {
        Self::with_calendar(false, year.into())
    }

    /// ISO week date parts starting from the ISO week-numbering year
    pub fn iso(iso_week_year: impl Into<Expr>) -> Self {
        Self::with_calendar(true, iso_week_year.into())
    }

    fn with_calendar(iso: bool, year: Expr) -> Self {
        Self {
            iso,
            year,
            month_or_week: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            millisecond: None,
            timezone: None,
        }
    }

    pub fn is_iso(&self) -> bool {
        self.iso
    }

    /// Month, or the ISO week for ISO parts
    pub fn month(mut self, month: impl Into<Expr>) -> Self {
        self.month_or_week = Some(month.into());
        self
    }

    pub fn iso_week(self, iso_week: impl Into<Expr>) -> Self {
        self.month(iso_week)
    }

    /// Day of month, or the ISO day of week for ISO parts
    pub fn day(mut self, day: impl Into<Expr>) -> Self {
        self.day = Some(day.into());
        self
    }

    pub fn iso_day_of_week(self, iso_day_of_week: impl Into<Expr>) -> Self {
        self.day(iso_day_of_week)
    }

    pub fn hour(mut self, hour: impl Into<Expr>) -> Self {
        self.hour = Some(hour.into());
        self
    }

    pub fn minute(mut self, minute: impl Into<Expr>) -> Self {
        self.minute = Some(minute.into());
        self
    }

    pub fn second(mut self, second: impl Into<Expr>) -> Self {
        self.second = Some(second.into());
        self
    }

    pub fn millisecond(mut self, millisecond: impl Into<Expr>) -> Self {
        self.millisecond = Some(millisecond.into());
        self
    }

    pub fn timezone(mut self, timezone: impl Into<Expr>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    fn into_fields(self) -> [Field; 8] {
        let (year, month, day) = if self.iso {
            ("isoWeekYear", "isoWeek", "isoDayOfWeek")
        } else {
            ("year", "month", "day")
        };
        [
            Field::required(year, self.year),
            Field::optional(month, self.month_or_week),
            Field::optional(day, self.day),
            Field::optional("hour", self.hour),
            Field::optional("minute", self.minute),
            Field::optional("second", self.second),
            Field::optional("millisecond", self.millisecond),
            Field::optional("timezone", self.timezone),
        ]
    }
}

/// $dateFromParts - Build a date from its parts
///
/// Example:
/// ```json
/// {"$dateFromParts": {"year": 2017, "month": 2, "day": 8, "hour": 12, "timezone": "America/New_York"}}
/// ```
pub fn date_from_parts(parts: DateParts) -> Operator {
    Operator::document("$dateFromParts", parts.into_fields())
}

/// $dateFromParts from an ISO week date
pub fn date_from_iso_parts(
    iso_week_year: impl Into<Expr>,
    iso_week: Option<Expr>,
    iso_day_of_week: Option<Expr>,
) -> Operator {
    let mut parts = DateParts::iso(iso_week_year);
    parts.month_or_week = iso_week;
    parts.day = iso_day_of_week;
    date_from_parts(parts)
}

/// $dateFromString - Parse a date string
pub fn date_from_string(
    date_string: impl Into<Expr>,
    format: Option<Expr>,
    timezone: Option<Expr>,
    on_error: Option<Expr>,
    on_null: Option<Expr>,
) -> Operator {
    Operator::document(
        "$dateFromString",
        [
            Field::required("dateString", date_string),
            Field::optional("format", format),
            Field::optional("timezone", timezone),
            Field::optional("onError", on_error),
            Field::optional("onNull", on_null),
        ],
    )
}

/// $dateToParts - Split a date into its parts
pub fn date_to_parts(date: impl Into<Expr>) -> Operator {
    date_to_parts_with(date, None, None)
}

/// $dateToParts with optional `timezone` and `iso8601` flag
///
/// Example:
/// ```json
/// {"$dateToParts": {"date": "$date", "iso8601": true}}
/// ```
pub fn date_to_parts_with(date: impl Into<Expr>, timezone: Option<Expr>, iso8601: Option<Expr>) -> Operator {
    Operator::document(
        "$dateToParts",
        [
            Field::required("date", date),
            Field::optional("timezone", timezone),
            Field::optional("iso8601", iso8601),
        ],
    )
}

/// $dateToString - Format a date as text
pub fn date_to_string(
    date: impl Into<Expr>,
    format: Option<Expr>,
    timezone: Option<Expr>,
    on_error: Option<Expr>,
) -> Operator {
    Operator::document(
        "$dateToString",
        [
            Field::required("date", date),
            Field::optional("format", format),
            Field::optional("timezone", timezone),
            Field::optional("onError", on_error),
        ],
    )
}

/// $dateTrunc - Truncate a date to a unit
pub fn date_trunc(date: impl Into<Expr>, unit: impl Into<Expr>) -> Operator {
    date_trunc_with(date, unit, None, None, None)
}

pub fn date_trunc_with(
    date: impl Into<Expr>,
    unit: impl Into<Expr>,
    bin_size: Option<Expr>,
    timezone: Option<Expr>,
    start_of_week: Option<Expr>,
) -> Operator {
    Operator::document(
        "$dateTrunc",
        [
            Field::required("date", date),
            Field::required("unit", unit),
            Field::optional("binSize", bin_size),
            Field::optional("timezone", timezone),
            Field::optional("startOfWeek", start_of_week),
        ],
    )
}

fn date_portion(keyword: &'static str, date: Expr, timezone: Option<Expr>) -> Operator {
    Operator::document(
        keyword,
        [Field::required("date", date), Field::optional("timezone", timezone)],
    )
}

macro_rules! date_portion_operators {
    ($($(#[$meta:meta])* $name:ident, $name_with:ident => $keyword:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(date: impl Into<Expr>) -> Operator {
                Operator::scalar($keyword, date)
            }

            #[doc = concat!("`", $keyword, "` in document form, with an optional timezone")]
            pub fn $name_with(date: impl Into<Expr>, timezone: Option<Expr>) -> Operator {
                date_portion($keyword, date.into(), timezone)
            }
        )+
    };
}

date_portion_operators! {
    /// $dayOfMonth - Day of the month, 1 to 31
    day_of_month, day_of_month_with => "$dayOfMonth",
    /// $dayOfWeek - Day of the week, 1 (Sunday) to 7 (Saturday)
    day_of_week, day_of_week_with => "$dayOfWeek",
    /// $dayOfYear - Day of the year, 1 to 366
    day_of_year, day_of_year_with => "$dayOfYear",
    /// $hour
    hour, hour_with => "$hour",
    /// $isoDayOfWeek - ISO weekday, 1 (Monday) to 7 (Sunday)
    iso_day_of_week, iso_day_of_week_with => "$isoDayOfWeek",
    /// $isoWeek - ISO week number, 1 to 53
    iso_week, iso_week_with => "$isoWeek",
    /// $isoWeekYear
    iso_week_year, iso_week_year_with => "$isoWeekYear",
    /// $millisecond
    millisecond, millisecond_with => "$millisecond",
    /// $minute
    minute, minute_with => "$minute",
    /// $month
    month, month_with => "$month",
    /// $second
    second, second_with => "$second",
    /// $week - Week of the year, 0 to 53
    week, week_with => "$week",
    /// $year
    year, year_with => "$year",
}

/// $toDate
pub fn to_date(expression: impl Into<Expr>) -> Operator {
    Operator::scalar("$toDate", expression)
}
