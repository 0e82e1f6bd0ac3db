use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

/// Unit used to display weight readings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Units {
    /// Kilograms
    Kg,

    /// Pounds
    Lb,
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Kg => write!(f, "KG"),
            Units::Lb => write!(f, "LB"),
        }
    }
}

/// Per-user settings. Carries no date fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Unique identifier, assigned by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Points the user aims for every week
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "Weekly goal is required"),
        range(min = 10, max = 21, message = "Weekly goal must be between 10 and 21")
    )]
    pub weekly_goal: Option<i32>,

    /// Preferred weight unit
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "Weight units are required"))]
    pub weight_units: Option<Units>,

    /// Owner of the preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Login of the owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
}

impl Entity for Preferences {
    const RESOURCE_PATH: &'static str = "preferences";
    const ENTITY_NAME: &'static str = "preferences";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
