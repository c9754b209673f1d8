//! Item dates from the content registry.
//!
//! Registries hand out `last_modified` as text. Accepted forms:
//!
//! | Input                        | Meaning                 |
//! |------------------------------|-------------------------|
//! | `2024-06-15`                 | midnight UTC            |
//! | `2024-06-15T14:30:45Z`       | UTC                     |
//! | `2024-06-15T14:30:45`        | taken as UTC            |
//! | `2024-06-15 14:30:45`        | taken as UTC            |
//! | `2024-06-15T14:30:45.250Z`   | fraction dropped        |
//! | `2024-06-15T14:30:45+00:00`  | zero offset only        |
//!
//! Anything else (non-zero offsets included) is treated as undated.

/// A UTC timestamp with second precision.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// 1970-01-01 was a Thursday
const DAY_NAMES: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse a registry date; `None` when it is not a usable UTC date.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (date, time) = match s.split_once(['T', ' ']) {
            Some((date, time)) => (date, Some(time)),
            None => (s, None),
        };

        let mut ymd = date.splitn(3, '-');
        let year = number(ymd.next()?, 4)?;
        let month = number(ymd.next()?, 2)?;
        let day = number(ymd.next()?, 2)?;

        let (hour, minute, second) = match time {
            None => (0, 0, 0),
            Some(time) => {
                let time = strip_utc_suffix(time)?;
                // fractional seconds are dropped
                let time = time.split_once('.').map_or(time, |(whole, _)| whole);
                let mut hms = time.splitn(3, ':');
                (
                    number(hms.next()?, 2)?,
                    number(hms.next()?, 2)?,
                    number(hms.next()?, 2)?,
                )
            }
        };

        let dt = Self::new(
            u16::try_from(year).ok()?,
            u8::try_from(month).ok()?,
            u8::try_from(day).ok()?,
            u8::try_from(hour).ok()?,
            u8::try_from(minute).ok()?,
            u8::try_from(second).ok()?,
        );
        dt.is_valid().then_some(dt)
    }

    /// Calendar and clock bounds (leap years included).
    pub fn is_valid(self) -> bool {
        (1..=12).contains(&self.month)
            && (1..=days_in_month(self.year, self.month)).contains(&self.day)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`, used by Atom `updated` and Dublin Core `dc:date`.
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// `Sat, 15 Jun 2024 14:30:45 GMT`, used by RSS `pubDate` and `lastBuildDate`.
    pub fn to_rfc2822(self) -> String {
        let weekday = self.days_since_epoch().rem_euclid(7) as usize;
        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            DAY_NAMES[weekday],
            self.day,
            MONTH_NAMES[usize::from(self.month - 1)],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    /// Days relative to 1970-01-01 (proleptic Gregorian calendar).
    fn days_since_epoch(self) -> i64 {
        let month = i64::from(self.month);
        let year = i64::from(self.year) - i64::from(month <= 2);
        let era = year.div_euclid(400);
        let year_of_era = year - era * 400;
        let day_of_year = (153 * ((month + 9) % 12) + 2) / 5 + i64::from(self.day) - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * 146_097 + day_of_era - 719_468
    }
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
    match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Fixed-width ASCII number.
fn number(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn strip_utc_suffix(time: &str) -> Option<&str> {
    if let Some(time) = time.strip_suffix('Z') {
        return Some(time);
    }
    match time.find(['+', '-']) {
        Some(at) if matches!(&time[at..], "+00:00" | "-00:00" | "+0000") => Some(&time[..at]),
        Some(_) => None,
        None => Some(time),
    }
}
