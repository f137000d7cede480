//! Value coercion shared by the mapper, sorter and filterer
//!
//! Rows arrive as loosely typed JSON from the platform, and the table
//! renderer compares them the way a browser would: `String(value)` for
//! text, `new Date(value)` for timestamps. These helpers reproduce those
//! coercions so the same row set sorts and filters identically here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::{Number, Value};

/// Format of the `modDate` display column, e.g. "Jan 1, 2024, 10:00 AM"
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Same layout as [`DISPLAY_DATE_FORMAT`], in the form chrono parses
const DISPLAY_DATE_PARSE_FORMAT: &str = "%b %d, %Y, %I:%M %p";

/// Salesforce REST timestamps use a colon-less offset (`+0000`)
const SALESFORCE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Coerce a JSON value the way JavaScript's `String()` does
pub fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => js_number(n),
        Value::String(s) => s.clone(),
        // Array.prototype.toString joins with commas and blanks out nulls
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn js_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// JavaScript truthiness of an optional JSON value
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// `value ? String(value) : ''`
pub fn text_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(Some(v)) => js_string(v),
        _ => String::new(),
    }
}

/// Parse a timestamp value into an absolute instant
///
/// Accepts epoch milliseconds, RFC 3339, Salesforce's `+0000` offset form,
/// bare dates (UTC midnight), offset-less date-times and the `modDate`
/// display format. The last two carry no zone, so they are read as wall
/// clock time in `timezone`.
pub fn parse_timestamp(value: &Value, timezone: Tz) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => parse_timestamp_str(s, timezone),
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str, timezone: Tz) -> Option<DateTime<Utc>> {
    // Newer ICU builds put a narrow no-break space before the meridiem
    let s = raw.trim().replace('\u{202f}', " ");
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(&s, SALESFORCE_DATETIME_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    let local = NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&s, DISPLAY_DATE_PARSE_FORMAT))
        .ok()?;
    timezone
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Instant of a timestamp value in epoch milliseconds
pub fn timestamp_millis(value: &Value, timezone: Tz) -> Option<i64> {
    parse_timestamp(value, timezone).map(|dt| dt.timestamp_millis())
}

/// Render an instant in the `modDate` display format
pub fn format_display_date(instant: DateTime<Utc>, timezone: Tz) -> String {
    instant
        .with_timezone(&timezone)
        .format(DISPLAY_DATE_FORMAT)
        .to_string()
}
