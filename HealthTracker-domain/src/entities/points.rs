use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;
use crate::date_utils::local_date;

/// Daily points: one each for exercising, eating well and skipping alcohol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Points {
    /// Unique identifier, assigned by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Day the points were earned
    #[serde(default, with = "local_date", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 1, message = "Exercise must be 0 or 1"))]
    pub exercise: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 1, message = "Meals must be 0 or 1"))]
    pub meals: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 1, message = "Alcohol must be 0 or 1"))]
    pub alcohol: Option<i32>,

    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 140, message = "Notes cannot exceed 140 characters"))]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
}

impl Points {
    /// Total points earned that day
    pub fn total(&self) -> i32 {
        [self.exercise, self.meals, self.alcohol]
            .iter()
            .map(|p| p.unwrap_or(0))
            .sum()
    }
}

impl Entity for Points {
    const RESOURCE_PATH: &'static str = "points";
    const ENTITY_NAME: &'static str = "points";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
