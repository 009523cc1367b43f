//! Conversions between the 12-hour display form ("8:00am"), the 24-hour
//! storage form ("08:00:00"), and the minutes-since-midnight integers the
//! conflict engine compares. All functions are pure.

use crate::error::AppError;
use chrono::NaiveTime;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses "H:MMam" / "H:MMpm" (case-insensitive). 12am maps to 00:00,
/// 12pm to 12:00.
pub fn parse_display_time(s: &str) -> Result<u32, AppError> {
    let trimmed = s.trim();
    let lower = trimmed.to_ascii_lowercase();

    let (clock, is_pm) = if let Some(rest) = lower.strip_suffix("am") {
        (rest, false)
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest, true)
    } else {
        return Err(AppError::Parse(format!("Invalid time '{}': expected H:MMam/pm", s)));
    };

    let (hour_str, minute_str) = clock
        .split_once(':')
        .ok_or_else(|| AppError::Parse(format!("Invalid time '{}': expected H:MMam/pm", s)))?;

    let hour: u32 = hour_str
        .parse()
        .map_err(|_| AppError::Parse(format!("Invalid hour in '{}'", s)))?;
    if minute_str.len() != 2 {
        return Err(AppError::Parse(format!("Invalid minutes in '{}': expected two digits", s)));
    }
    let minute: u32 = minute_str
        .parse()
        .map_err(|_| AppError::Parse(format!("Invalid minutes in '{}'", s)))?;

    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(AppError::Parse(format!("Time '{}' out of range", s)));
    }

    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    Ok(hour24 * 60 + minute)
}

/// Parses "HH:MM" or "HH:MM:SS"; seconds are tolerated and ignored.
pub fn parse_storage_time(s: &str) -> Result<u32, AppError> {
    let trimmed = s.trim();
    let mut parts = trimmed.split(':');

    let hour_str = parts.next().unwrap_or("");
    let minute_str = parts
        .next()
        .ok_or_else(|| AppError::Parse(format!("Invalid time '{}': expected HH:MM[:SS]", s)))?;
    let second_str = parts.next();

    if parts.next().is_some() {
        return Err(AppError::Parse(format!("Invalid time '{}': expected HH:MM[:SS]", s)));
    }

    let hour: u32 = hour_str
        .parse()
        .map_err(|_| AppError::Parse(format!("Invalid hour in '{}'", s)))?;
    let minute: u32 = minute_str
        .parse()
        .map_err(|_| AppError::Parse(format!("Invalid minutes in '{}'", s)))?;
    if let Some(sec) = second_str {
        let second: u32 = sec
            .parse()
            .map_err(|_| AppError::Parse(format!("Invalid seconds in '{}'", s)))?;
        if second > 59 {
            return Err(AppError::Parse(format!("Time '{}' out of range", s)));
        }
    }

    if hour > 23 || minute > 59 {
        return Err(AppError::Parse(format!("Time '{}' out of range", s)));
    }

    Ok(hour * 60 + minute)
}

/// Accepts either form; the UI sends display times, stored records use the
/// storage form.
pub fn parse_any_time(s: &str) -> Result<u32, AppError> {
    parse_storage_time(s).or_else(|_| parse_display_time(s))
}

pub fn format_display(minutes: u32) -> String {
    let hour24 = (minutes / 60) % 24;
    let minute = minutes % 60;
    let period = if hour24 >= 12 { "pm" } else { "am" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02}{}", hour12, minute, period)
}

pub fn format_storage(minutes: u32) -> String {
    format!("{:02}:{:02}:00", (minutes / 60) % 24, minutes % 60)
}

pub fn to_naive_time(minutes: u32) -> Result<NaiveTime, AppError> {
    NaiveTime::from_hms_opt((minutes / 60) % 24, minutes % 60, 0)
        .ok_or_else(|| AppError::InvalidRange(format!("{} is not a valid minute of day", minutes)))
}
