//! Calendar features: cyclical day-of-year / day-of-week encodings and the
//! festival-window flag.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::error::{ForecastError, Result};

/// Period used for the day-of-year encoding.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Period used for the day-of-week encoding.
pub const DAYS_PER_WEEK: f64 = 7.0;

/// Festival tolerance in days when none is configured.
pub const DEFAULT_FESTIVAL_WINDOW_DAYS: u32 = 7;

/// Reference festival dates used when none are configured.
pub const DEFAULT_FESTIVAL_DATES: [&str; 3] = ["2022-10-15", "2023-10-24", "2024-11-01"];

/// Parse a date string.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and
/// RFC 3339 timestamps; only the calendar date is kept.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let s = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(ForecastError::Validation(format!("invalid date: {input:?}")))
}

/// Sine/cosine encoding of `value` on a cycle of length `period`.
fn cyclical_encode(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

/// Cyclical date encodings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicalFeatures {
    pub sin_doy: f64,
    pub cos_doy: f64,
    pub sin_dow: f64,
    pub cos_dow: f64,
}

impl CyclicalFeatures {
    /// Encode a date.
    ///
    /// Day of year is 1-based (Jan 1 = 1); weekday is 0-based with Monday = 0.
    /// Both conventions are fixed by the trained model.
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_year = date.ordinal() as f64;
        let weekday = date.weekday().num_days_from_monday() as f64;

        let (sin_doy, cos_doy) = cyclical_encode(day_of_year, DAYS_PER_YEAR);
        let (sin_dow, cos_dow) = cyclical_encode(weekday, DAYS_PER_WEEK);

        Self {
            sin_doy,
            cos_doy,
            sin_dow,
            cos_dow,
        }
    }
}

/// Known event dates with a symmetric, inclusive day tolerance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FestivalCalendar {
    dates: Vec<NaiveDate>,
    window_days: u32,
}

impl FestivalCalendar {
    /// Create a calendar; dates are sorted and deduplicated.
    pub fn new(mut dates: Vec<NaiveDate>, window_days: u32) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates, window_days }
    }

    /// Create a calendar from date strings.
    pub fn from_strings<I, S>(dates: I, window_days: u32) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = dates
            .into_iter()
            .map(|d| parse_date(d.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(parsed, window_days))
    }

    /// Reference dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Tolerance in days on either side of each reference date.
    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// True if `date` lies within the window of any reference date.
    pub fn is_festival(&self, date: NaiveDate) -> bool {
        let window = i64::from(self.window_days);
        self.dates
            .iter()
            .any(|f| (date - *f).num_days().abs() <= window)
    }

    /// Festival flag as a model feature (1.0 or 0.0).
    pub fn flag(&self, date: NaiveDate) -> f64 {
        if self.is_festival(date) {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for FestivalCalendar {
    fn default() -> Self {
        let dates = DEFAULT_FESTIVAL_DATES
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect();
        Self::new(dates, DEFAULT_FESTIVAL_WINDOW_DAYS)
    }
}

/// All calendar-derived features for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarFeatures {
    pub cyclical: CyclicalFeatures,
    pub festival_flag: f64,
}

impl CalendarFeatures {
    /// Derive features for an already parsed date.
    pub fn derive(date: NaiveDate, festivals: &FestivalCalendar) -> Self {
        Self {
            cyclical: CyclicalFeatures::from_date(date),
            festival_flag: festivals.flag(date),
        }
    }

    /// Parse `date` and derive its features.
    pub fn from_str_date(date: &str, festivals: &FestivalCalendar) -> Result<Self> {
        Ok(Self::derive(parse_date(date)?, festivals))
    }
}
