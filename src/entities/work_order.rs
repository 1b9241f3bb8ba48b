//! Work order entity - a unit of repair work tracked through a status lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::lenient;
use crate::entities::mechanic::MechanicId;
use crate::entities::unit::UnitId;

pub type WorkOrderId = i64;

/// Work order lifecycle status
///
/// Canonical spelling is underscored; hyphenated spellings are accepted on input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    #[default]
    Pending,
    #[serde(alias = "in-progress")]
    InProgress,
    #[serde(alias = "on-hold")]
    OnHold,
    Completed,
    #[serde(alias = "cancelled")]
    Canceled,
}

impl WorkOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Pending => "pending",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::OnHold => "on_hold",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Canceled => "canceled",
        }
    }

    /// Human label used for tabs and headings
    pub fn label(&self) -> &'static str {
        match self {
            WorkOrderStatus::Pending => "Pending",
            WorkOrderStatus::InProgress => "In Progress",
            WorkOrderStatus::OnHold => "On Hold",
            WorkOrderStatus::Completed => "Completed",
            WorkOrderStatus::Canceled => "Canceled",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Canceled)
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WorkOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(WorkOrderStatus::Pending),
            "in_progress" => Ok(WorkOrderStatus::InProgress),
            "on_hold" => Ok(WorkOrderStatus::OnHold),
            "completed" => Ok(WorkOrderStatus::Completed),
            "canceled" | "cancelled" => Ok(WorkOrderStatus::Canceled),
            _ => Err(format!(
                "Invalid status: {}. Use pending, in_progress, on_hold, completed, or canceled",
                s
            )),
        }
    }
}

/// Work order priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    #[serde(other)]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!(
                "Invalid priority: {}. Use critical, high, medium, or low",
                s
            )),
        }
    }
}

/// Repair category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[serde(rename = "PM")]
    Pm,
    Brakes,
    Engine,
    Electrical,
    Tires,
    Body,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Pm,
        Category::Brakes,
        Category::Engine,
        Category::Electrical,
        Category::Tires,
        Category::Body,
        Category::Other,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Pm => write!(f, "PM"),
            Category::Brakes => write!(f, "Brakes"),
            Category::Engine => write!(f, "Engine"),
            Category::Electrical => write!(f, "Electrical"),
            Category::Tires => write!(f, "Tires"),
            Category::Body => write!(f, "Body"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pm" => Ok(Category::Pm),
            "brakes" => Ok(Category::Brakes),
            "engine" => Ok(Category::Engine),
            "electrical" => Ok(Category::Electrical),
            "tires" => Ok(Category::Tires),
            "body" => Ok(Category::Body),
            "other" => Ok(Category::Other),
            _ => Err(format!(
                "Invalid category: {}. Use PM, Brakes, Engine, Electrical, Tires, Body, or Other",
                s
            )),
        }
    }
}

/// Service bay slot label, `A` through `L`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bay(char);

impl Bay {
    pub const FIRST: char = 'A';
    pub const LAST: char = 'L';

    pub fn new(label: char) -> Result<Self, String> {
        let upper = label.to_ascii_uppercase();
        if (Self::FIRST..=Self::LAST).contains(&upper) {
            Ok(Bay(upper))
        } else {
            Err(format!("Invalid bay: {}. Use A through L", label))
        }
    }

    pub fn all() -> Vec<Bay> {
        (Self::FIRST..=Self::LAST).map(Bay).collect()
    }

    pub fn label(&self) -> char {
        self.0
    }
}

impl std::fmt::Display for Bay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Bay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Bay::new(c),
            _ => Err(format!("Invalid bay: {}. Use A through L", s)),
        }
    }
}

impl TryFrom<String> for Bay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bay> for String {
    fn from(bay: Bay) -> Self {
        bay.0.to_string()
    }
}

/// A work order as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: WorkOrderId,

    pub unit_id: UnitId,

    /// Denormalized unit number, when the backend joins it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,

    pub title: String,

    #[serde(default)]
    pub complaint: String,

    #[serde(default)]
    pub status: WorkOrderStatus,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub category: Category,

    #[serde(
        default,
        deserialize_with = "lenient::opt_bay",
        skip_serializing_if = "Option::is_none"
    )]
    pub bay: Option<Bay>,

    /// Older schema: paused work keeps `in_progress` and sets this flag
    #[serde(default)]
    pub on_hold: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_reason: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub odometer_start: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<MechanicId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanic_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub opened_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed_at: Option<DateTime<Utc>>,
}

impl WorkOrder {
    /// Status with the `on_hold` flag folded in
    pub fn lifecycle_status(&self) -> WorkOrderStatus {
        match self.status {
            WorkOrderStatus::InProgress if self.on_hold => WorkOrderStatus::OnHold,
            other => other,
        }
    }

    /// Friendly number, e.g. `WO-00042`
    pub fn number(&self) -> String {
        wo_number(self.id)
    }
}

/// Body for `POST /work-orders`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWorkOrder {
    pub unit_id: UnitId,
    pub title: String,
    pub complaint: String,
    pub priority: Priority,
    pub category: Category,
    pub bay: Option<Bay>,
}

/// Format a work order id as `WO-00042`
pub fn wo_number(id: WorkOrderId) -> String {
    format!("WO-{:05}", id)
}

/// Resolve a work order reference (`42` or `WO-00042`) to its id
pub fn parse_wo_reference(reference: &str) -> Option<WorkOrderId> {
    let trimmed = reference.trim();
    let digits = trimmed
        .strip_prefix("WO-")
        .or_else(|| trimmed.strip_prefix("wo-"))
        .unwrap_or(trimmed);
    digits.parse().ok().filter(|id: &WorkOrderId| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_work_order_defaults() {
        let wo: WorkOrder = serde_json::from_str(
            r#"{"id":1,"status":"pending","unit_id":7,"title":"Brake check","priority":"high"}"#,
        )
        .unwrap();
        assert_eq!(wo.status, WorkOrderStatus::Pending);
        assert_eq!(wo.priority, Priority::High);
        assert_eq!(wo.category, Category::Other);
        assert!(wo.complaint.is_empty());
        assert!(wo.bay.is_none());
        assert!(!wo.on_hold);
    }

    #[test]
    fn test_hyphenated_status_accepted() {
        let wo: WorkOrder = serde_json::from_str(
            r#"{"id":2,"status":"on-hold","unit_id":1,"title":"Wiring"}"#,
        )
        .unwrap();
        assert_eq!(wo.lifecycle_status(), WorkOrderStatus::OnHold);
        assert_eq!("in-progress".parse::<WorkOrderStatus>(), Ok(WorkOrderStatus::InProgress));
    }

    #[test]
    fn test_on_hold_flag_folds_into_status() {
        let wo: WorkOrder = serde_json::from_str(
            r#"{"id":3,"status":"in_progress","on_hold":true,"unit_id":1,"title":"Tires"}"#,
        )
        .unwrap();
        assert_eq!(wo.status, WorkOrderStatus::InProgress);
        assert_eq!(wo.lifecycle_status(), WorkOrderStatus::OnHold);
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(serde_json::to_string(&Category::Pm).unwrap(), "\"PM\"");
        assert_eq!(serde_json::to_string(&Category::Brakes).unwrap(), "\"Brakes\"");
        assert_eq!("pm".parse::<Category>(), Ok(Category::Pm));
        assert!("paint".parse::<Category>().is_err());
    }

    #[test]
    fn test_bay_range() {
        assert_eq!("c".parse::<Bay>().unwrap().label(), 'C');
        assert!("M".parse::<Bay>().is_err());
        assert!("AB".parse::<Bay>().is_err());
        assert_eq!(Bay::all().len(), 12);
        assert!(serde_json::from_str::<Bay>("\"Z\"").is_err());
        assert_eq!(serde_json::to_string(&Bay::new('b').unwrap()).unwrap(), "\"B\"");
    }

    #[test]
    fn test_unknown_category_and_priority_fall_back() {
        let wo: WorkOrder = serde_json::from_str(
            r#"{"id":4,"unit_id":1,"title":"Shocks","category":"Suspension","priority":"urgent"}"#,
        )
        .unwrap();
        assert_eq!(wo.category, Category::Other);
        assert_eq!(wo.priority, Priority::Medium);
    }

    #[test]
    fn test_odd_rows_keep_the_list() {
        let list: Vec<WorkOrder> = serde_json::from_str(
            r#"[
                {"id":1,"unit_id":1,"title":"Brakes","bay":"B","opened_at":"2024-05-01T10:00:00Z"},
                {"id":2,"unit_id":1,"title":"Wiring","bay":"","odometer_start":"54000"},
                {"id":3,"unit_id":2,"title":"Tires","bay":"Q","opened_at":"2024-05-01 10:00:00"},
                {"id":4,"unit_id":2,"title":"Body","bay":null,"closed_at":"never"}
            ]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].bay.map(|b| b.label()), Some('B'));
        assert!(list[1].bay.is_none());
        assert_eq!(list[1].odometer_start, Some(54000));
        assert!(list[2].bay.is_none());
        assert_eq!(list[2].opened_at, list[0].opened_at);
        assert!(list[3].closed_at.is_none());
    }

    #[test]
    fn test_wo_number() {
        assert_eq!(wo_number(1), "WO-00001");
        assert_eq!(wo_number(123456), "WO-123456");
    }

    #[test]
    fn test_parse_wo_reference() {
        assert_eq!(parse_wo_reference("42"), Some(42));
        assert_eq!(parse_wo_reference("WO-00042"), Some(42));
        assert_eq!(parse_wo_reference("wo-7"), Some(7));
        assert_eq!(parse_wo_reference("0"), None);
        assert_eq!(parse_wo_reference("abc"), None);
    }
}
