//! Conversion of local dates between the server wire format and [`NaiveDate`].
//!
//! The backend stores calendar dates without a time zone and exchanges them as
//! `yyyy-MM-dd` strings. Entities keep them as `Option<NaiveDate>`; the serde
//! helpers in [`local_date`] do the conversion at the JSON boundary.

use chrono::NaiveDate;
use thiserror::Error;

/// Wire format used by the backend for local dates
pub const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Error raised when a date received from the server cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The value is not a `yyyy-MM-dd` calendar date
    #[error("Invalid local date '{value}': expected yyyy-MM-dd")]
    InvalidLocalDate { value: String },
}

/// Parse a local date sent by the server.
///
/// A missing or empty value yields `Ok(None)`.
pub fn convert_local_date_from_server(value: Option<&str>) -> Result<Option<NaiveDate>, DateError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, LOCAL_DATE_FORMAT)
            .map(Some)
            .map_err(|_| DateError::InvalidLocalDate {
                value: raw.to_string(),
            }),
    }
}

/// Format a local date for the server. `None` stays `None`.
pub fn convert_local_date_to_server(date: Option<&NaiveDate>) -> Option<String> {
    date.map(|d| d.format(LOCAL_DATE_FORMAT).to_string())
}

/// Serde adapter for `Option<NaiveDate>` fields carried as `yyyy-MM-dd`.
///
/// Use together with `#[serde(default)]` so that an absent field becomes `None`.
pub mod local_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{convert_local_date_from_server, convert_local_date_to_server};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match convert_local_date_to_server(date.as_ref()) {
            Some(formatted) => serializer.serialize_some(&formatted),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        convert_local_date_from_server(raw.as_deref()).map_err(de::Error::custom)
    }
}
