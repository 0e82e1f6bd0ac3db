use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;
use crate::date_utils::local_date;

/// A body weight reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Weight {
    /// Unique identifier, assigned by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Day the weight was measured
    #[serde(default, with = "local_date", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,

    /// Measured weight, in the user's preferred unit
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "Weight is required"),
        range(min = 1.0, max = 1000.0, message = "Weight must be between 1 and 1000")
    )]
    pub weight: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
}

impl Entity for Weight {
    const RESOURCE_PATH: &'static str = "weights";
    const ENTITY_NAME: &'static str = "weight";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
