//! Inventory parts and part attachment

use serde::{Deserialize, Serialize};

use crate::entities::lenient;

pub type PartId = i64;

/// An inventory part as returned by `GET /parts/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,

    #[serde(default)]
    pub part_number: String,

    #[serde(default)]
    pub part_name: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub stock_qty: i64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub unit_cost: f64,
}

impl Part {
    /// Cost formatted as dollars, e.g. `$12.50`
    pub fn cost_display(&self) -> String {
        format!("${:.2}", self.unit_cost)
    }
}

/// Body for `POST /work-orders/:id/parts`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartAttachment {
    pub part_id: PartId,
    pub qty: u32,
}
