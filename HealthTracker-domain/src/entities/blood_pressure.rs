use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;
use crate::date_utils::local_date;

/// A blood pressure reading as exchanged with the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BloodPressure {
    /// Unique identifier, assigned by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Day the reading was taken
    #[serde(default, with = "local_date", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,

    /// Systolic blood pressure (the higher number)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "Systolic is required"),
        range(min = 40, max = 300, message = "Systolic must be between 40 and 300")
    )]
    pub systolic: Option<i32>,

    /// Diastolic blood pressure (the lower number)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "Diastolic is required"),
        range(min = 20, max = 200, message = "Diastolic must be between 20 and 200")
    )]
    pub diastolic: Option<i32>,

    /// Owner of the reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Login of the owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
}

impl BloodPressure {
    /// Create a reading that has not been persisted yet
    pub fn new(date: NaiveDate, systolic: i32, diastolic: i32) -> Self {
        Self {
            date: Some(date),
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            ..Self::default()
        }
    }
}

impl Entity for BloodPressure {
    const RESOURCE_PATH: &'static str = "blood-pressures";
    const ENTITY_NAME: &'static str = "bloodPressure";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
