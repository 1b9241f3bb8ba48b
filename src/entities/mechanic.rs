//! Mechanic entity

use serde::{Deserialize, Serialize};

use crate::entities::lenient;

pub type MechanicId = i64;

/// A shop mechanic as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mechanic {
    pub id: MechanicId,

    pub name: String,

    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub hourly_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Mechanic {
    /// Display status; the `active` flag and free-text status are both in use
    pub fn status_label(&self) -> String {
        if let Some(status) = &self.status {
            return status.clone();
        }
        match self.active {
            Some(false) => "inactive".to_string(),
            _ => "active".to_string(),
        }
    }
}
