//! Calendar expression resolution against a caller-supplied reference date.
//!
//! Never reads the system clock: every relative expression ("besok",
//! "jumat depan", "3 okt") is resolved against `today`.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;
use thiserror::Error;

/// `2025-10-03`, `2025/10/03`.
static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").unwrap());

/// `3/10/2025`, `3-10-25`, `3.10`.
static NUMERIC_DMY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-/.](\d{1,2})(?:[-/.](\d{2}|\d{4}))?$").unwrap()
});

/// `tgl 3 okt`, `tanggal 3 oktober 2025`, `3 oct`.
static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:tgl|tanggal)\.?\s*)?(\d{1,2})\s+([a-z]+)\.?(?:\s+(\d{4}))?$").unwrap()
});

/// `october 3`, `oct 3rd, 2025`.
static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?$").unwrap()
});

/// `jumat depan`, `hari senin`, `next friday`, `rabu ini`.
static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(next|this)\s+)?(?:hari\s+)?([a-z']+)(?:\s+(depan|ini))?$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("empty date expression")]
    Empty,

    #[error("unrecognized date expression '{0}'")]
    Unrecognized(String),

    #[error("no such calendar date '{0}'")]
    InvalidDate(String),
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "jan" | "januari" | "january" => 1,
        "feb" | "februari" | "pebruari" | "february" => 2,
        "mar" | "maret" | "march" => 3,
        "apr" | "april" => 4,
        "mei" | "may" => 5,
        "jun" | "juni" | "june" => 6,
        "jul" | "juli" | "july" => 7,
        "agu" | "agt" | "agus" | "agustus" | "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "okt" | "oktober" | "oct" | "october" => 10,
        "nov" | "nop" | "november" | "nopember" => 11,
        "des" | "desember" | "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday_named(name: &str) -> Option<Weekday> {
    let day = match name {
        "senin" | "monday" | "mon" => Weekday::Mon,
        "selasa" | "tuesday" | "tue" => Weekday::Tue,
        "rabu" | "wednesday" | "wed" => Weekday::Wed,
        "kamis" | "thursday" | "thu" => Weekday::Thu,
        "jumat" | "jum'at" | "friday" | "fri" => Weekday::Fri,
        "sabtu" | "saturday" | "sat" => Weekday::Sat,
        "minggu" | "ahad" | "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

/// First `day` strictly after `today`; the same weekday means a week later.
pub fn next_weekday(today: NaiveDate, day: Weekday) -> NaiveDate {
    let ahead = (day.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Days::new(u64::from(ahead))
}

/// First `day` on or after `today`.
fn upcoming_weekday(today: NaiveDate, day: Weekday) -> NaiveDate {
    let ahead = (day.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    today + Days::new(u64::from(ahead))
}

fn ymd(expr: &str, year: i32, month: u32, day: u32) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateError::InvalidDate(expr.into()))
}

/// A day and month without a year: this year, or next year if already past.
fn upcoming_day_month(
    expr: &str,
    today: NaiveDate,
    month: u32,
    day: u32,
) -> Result<NaiveDate, DateError> {
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Ok(date),
        _ => ymd(expr, today.year() + 1, month, day),
    }
}

fn parse_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;
    Some(if text.len() == 2 { 2000 + year } else { year })
}

fn parse_num(text: &str) -> Option<u32> {
    text.parse().ok()
}

fn day_month_year(
    expr: &str,
    today: NaiveDate,
    day: &str,
    month: u32,
    year: Option<&str>,
) -> Result<NaiveDate, DateError> {
    let day = parse_num(day).ok_or_else(|| DateError::InvalidDate(expr.into()))?;
    match year.and_then(parse_year) {
        Some(year) => ymd(expr, year, month, day),
        None => upcoming_day_month(expr, today, month, day),
    }
}

/// Resolve a date expression relative to `today`.
///
/// Accepted forms: ISO `YYYY-MM-DD`, numeric `D/M[/YYYY]`, `[tgl] D <month>
/// [YYYY]`, `<month> D[, YYYY]`, `hari ini`/`today`, `besok`/`tomorrow`,
/// `lusa`/`day after tomorrow`, `<weekday> [depan|ini]`, `next <weekday>`.
pub fn resolve_date(expr: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let normalized = expr
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let text = normalized.as_str();
    if text.is_empty() {
        return Err(DateError::Empty);
    }

    match text {
        "hari ini" | "today" | "sekarang" => return Ok(today),
        "besok" | "tomorrow" => return Ok(today + Days::new(1)),
        "lusa" | "day after tomorrow" | "the day after tomorrow" => {
            return Ok(today + Days::new(2));
        }
        _ => {}
    }

    if let Some(caps) = ISO_RE.captures(text) {
        let year = caps[1].parse().map_err(|_| DateError::InvalidDate(expr.into()))?;
        let month = parse_num(&caps[2]).ok_or_else(|| DateError::InvalidDate(expr.into()))?;
        let day = parse_num(&caps[3]).ok_or_else(|| DateError::InvalidDate(expr.into()))?;
        return ymd(expr, year, month, day);
    }

    if let Some(caps) = NUMERIC_DMY_RE.captures(text) {
        let month = parse_num(&caps[2]).ok_or_else(|| DateError::InvalidDate(expr.into()))?;
        return day_month_year(expr, today, &caps[1], month, caps.get(3).map(|m| m.as_str()));
    }

    if let Some(caps) = DAY_MONTH_RE.captures(text)
        && let Some(month) = month_number(&caps[2])
    {
        return day_month_year(expr, today, &caps[1], month, caps.get(3).map(|m| m.as_str()));
    }

    if let Some(caps) = MONTH_DAY_RE.captures(text)
        && let Some(month) = month_number(&caps[1])
    {
        return day_month_year(expr, today, &caps[2], month, caps.get(3).map(|m| m.as_str()));
    }

    if let Some(caps) = WEEKDAY_RE.captures(text)
        && let Some(day) = weekday_named(&caps[2])
    {
        let this = caps.get(1).is_some_and(|m| m.as_str() == "this")
            || caps.get(3).is_some_and(|m| m.as_str() == "ini");
        let next = caps.get(1).is_some_and(|m| m.as_str() == "next");
        return Ok(if this && !next {
            upcoming_weekday(today, day)
        } else {
            next_weekday(today, day)
        });
    }

    Err(DateError::Unrecognized(expr.trim().to_string()))
}
