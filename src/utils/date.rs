use crate::errors::{AppError, AppResult};
use crate::models::attendance::DATE_FMT;
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// `--date` value, or today when omitted.
pub fn date_or_today(s: Option<&str>) -> AppResult<NaiveDate> {
    match s {
        Some(d) => parse_date(d),
        None => Ok(today()),
    }
}
