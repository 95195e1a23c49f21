use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AppError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
}

impl NewAuthor {
    /// Builds an author from raw form values. The birth date is required; an
    /// empty date of death means the author is living or the date is unknown.
    pub fn parse(name: &str, birthdate: &str, date_of_death: Option<&str>) -> Result<Self> {
        let birth_date = parse_date("birthdate", birthdate)?;
        let date_of_death = match date_of_death {
            Some(s) if !s.is_empty() => Some(parse_date("date_of_death", s)?),
            _ => None,
        };

        Ok(Self {
            name: name.to_string(),
            birth_date,
            date_of_death,
        })
    }
}

/// Strict `YYYY-MM-DD` parsing for a named form field.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        AppError::InvalidInput(format!("{} must be a YYYY-MM-DD date, got {:?}: {}", field, value, e))
    })
}
