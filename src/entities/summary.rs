//! Work order summary rollup (parts, labor, notes)

use serde::{Deserialize, Serialize};

use crate::entities::lenient;
use crate::entities::work_order::WorkOrderId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub work_order_id: Option<WorkOrderId>,

    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub total_parts: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub labor_hours: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub notes_count: Option<i64>,
}

impl Summary {
    pub fn parts(&self) -> i64 {
        self.total_parts.unwrap_or(0)
    }

    pub fn labor_display(&self) -> String {
        format!("{:.1}", self.labor_hours.unwrap_or(0.0))
    }

    pub fn notes(&self) -> i64 {
        self.notes_count.unwrap_or(0)
    }
}

/// The summary endpoint returns either one row or an array of rows
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SummaryPayload {
    Many(Vec<Summary>),
    One(Summary),
    Empty(Option<()>),
}

impl SummaryPayload {
    /// Pick the row for `id`, else the first row, else zeros
    pub fn for_work_order(self, id: WorkOrderId) -> Summary {
        match self {
            SummaryPayload::One(row) => row,
            SummaryPayload::Many(rows) => {
                let matching = rows.iter().position(|r| r.work_order_id == Some(id));
                match matching {
                    Some(idx) => rows.into_iter().nth(idx).unwrap_or_default(),
                    None => rows.into_iter().next().unwrap_or_default(),
                }
            }
            SummaryPayload::Empty(_) => Summary::default(),
        }
    }
}
