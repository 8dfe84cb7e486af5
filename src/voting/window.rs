use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Inclusive UTC limits on a vote's creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UtcBounds {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// The optional inclusive calendar range used to filter votes before they
/// are counted. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// `from` starts at local midnight, `to` ends at 23:59:59.999 local time.
    pub fn bounds(&self, offset: FixedOffset) -> UtcBounds {
        let start = NaiveTime::MIN;
        let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        UtcBounds {
            from: self.from.and_then(|d| local_to_utc(offset, d, start)),
            to: self.to.and_then(|d| local_to_utc(offset, d, end)),
        }
    }
}

fn local_to_utc(offset: FixedOffset, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if !ISO_DATE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
